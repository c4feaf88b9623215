//! Page text normalization for right-to-left scripts
//!
//! Text pulled out of Arabic PDFs comes back as logical-order base letters.
//! [`RtlDisplayNormalizer`] replaces each letter with its contextual
//! presentation form (isolated, final, initial, medial), fuses lam-alef
//! ligatures, drops harakat, and then reorders every line into visual order
//! with the Unicode bidirectional algorithm.

use unicode_bidi::BidiInfo;

use regdoc_core::Page;

/// Transforms page text once, before chunking
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;

    /// Normalize every page in place
    fn normalize_pages(&self, pages: &mut [Page]) {
        for page in pages.iter_mut() {
            page.content = self.normalize(&page.content);
        }
    }
}

/// Leaves text untouched
pub struct IdentityNormalizer;

impl TextNormalizer for IdentityNormalizer {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Arabic shaping followed by bidi visual reordering
#[derive(Default)]
pub struct RtlDisplayNormalizer;

impl RtlDisplayNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for RtlDisplayNormalizer {
    fn normalize(&self, text: &str) -> String {
        let shaped = reshape_arabic(text);
        shaped
            .split('\n')
            .map(reorder_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reorder one line from logical to visual order
fn reorder_line(line: &str) -> String {
    if line.is_empty() {
        return String::new();
    }

    let bidi_info = BidiInfo::new(line, None);
    bidi_info
        .paragraphs
        .iter()
        .map(|para| bidi_info.reorder_line(para, para.range.clone()).into_owned())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joining {
    /// Never connects (hamza)
    NonJoining,
    /// Connects to the preceding letter only (alef, dal, reh, waw...)
    Right,
    /// Connects on both sides
    Dual,
    /// Tatweel: connects on both sides and has a single form
    Causing,
}

/// Isolated presentation form and joining class of an Arabic letter.
///
/// Presentation forms are laid out consecutively as isolated, final,
/// initial, medial, so the other forms are offsets from the isolated one.
fn letter_forms(c: char) -> Option<(u32, Joining)> {
    use Joining::{Causing, Dual, NonJoining, Right};

    let entry = match c {
        '\u{0621}' => (0xFE80, NonJoining),
        '\u{0622}' => (0xFE81, Right),
        '\u{0623}' => (0xFE83, Right),
        '\u{0624}' => (0xFE85, Right),
        '\u{0625}' => (0xFE87, Right),
        '\u{0626}' => (0xFE89, Dual),
        '\u{0627}' => (0xFE8D, Right),
        '\u{0628}' => (0xFE8F, Dual),
        '\u{0629}' => (0xFE93, Right),
        '\u{062A}' => (0xFE95, Dual),
        '\u{062B}' => (0xFE99, Dual),
        '\u{062C}' => (0xFE9D, Dual),
        '\u{062D}' => (0xFEA1, Dual),
        '\u{062E}' => (0xFEA5, Dual),
        '\u{062F}' => (0xFEA9, Right),
        '\u{0630}' => (0xFEAB, Right),
        '\u{0631}' => (0xFEAD, Right),
        '\u{0632}' => (0xFEAF, Right),
        '\u{0633}' => (0xFEB1, Dual),
        '\u{0634}' => (0xFEB5, Dual),
        '\u{0635}' => (0xFEB9, Dual),
        '\u{0636}' => (0xFEBD, Dual),
        '\u{0637}' => (0xFEC1, Dual),
        '\u{0638}' => (0xFEC5, Dual),
        '\u{0639}' => (0xFEC9, Dual),
        '\u{063A}' => (0xFECD, Dual),
        '\u{0640}' => (0x0640, Causing),
        '\u{0641}' => (0xFED1, Dual),
        '\u{0642}' => (0xFED5, Dual),
        '\u{0643}' => (0xFED9, Dual),
        '\u{0644}' => (0xFEDD, Dual),
        '\u{0645}' => (0xFEE1, Dual),
        '\u{0646}' => (0xFEE5, Dual),
        '\u{0647}' => (0xFEE9, Dual),
        '\u{0648}' => (0xFEED, Right),
        '\u{0649}' => (0xFEEF, Right),
        '\u{064A}' => (0xFEF1, Dual),
        _ => return None,
    };
    Some(entry)
}

/// Isolated form of the lam-alef ligature for the given alef, final form is +1
fn lam_alef_ligature(alef: char) -> Option<u32> {
    match alef {
        '\u{0622}' => Some(0xFEF5),
        '\u{0623}' => Some(0xFEF7),
        '\u{0625}' => Some(0xFEF9),
        '\u{0627}' => Some(0xFEFB),
        _ => None,
    }
}

fn is_harakah(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// A letter after ligature fusion, before contextual form selection
struct Glyph {
    /// Isolated presentation form, or the original char when not shapeable
    base: u32,
    joining: Joining,
    shapeable: bool,
}

impl Glyph {
    fn joins_forward(&self) -> bool {
        matches!(self.joining, Joining::Dual | Joining::Causing)
    }

    fn joins_backward(&self) -> bool {
        matches!(self.joining, Joining::Right | Joining::Dual | Joining::Causing)
    }
}

/// Replace Arabic letters with their contextual presentation forms
pub fn reshape_arabic(text: &str) -> String {
    let chars: Vec<char> = text.chars().filter(|c| !is_harakah(*c)).collect();

    let mut glyphs: Vec<Glyph> = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\u{0644}' {
            if let Some(ligature) = chars.get(i + 1).and_then(|next| lam_alef_ligature(*next)) {
                glyphs.push(Glyph {
                    base: ligature,
                    joining: Joining::Right,
                    shapeable: true,
                });
                i += 2;
                continue;
            }
        }

        match letter_forms(c) {
            Some((base, joining)) => glyphs.push(Glyph {
                base,
                joining,
                shapeable: true,
            }),
            None => glyphs.push(Glyph {
                base: c as u32,
                joining: Joining::NonJoining,
                shapeable: false,
            }),
        }
        i += 1;
    }

    let mut shaped = String::with_capacity(text.len());
    for (idx, glyph) in glyphs.iter().enumerate() {
        if !glyph.shapeable || glyph.joining == Joining::Causing {
            shaped.extend(char::from_u32(glyph.base));
            continue;
        }

        let joins_prev = idx > 0 && glyphs[idx - 1].joins_forward() && glyph.joins_backward();
        let joins_next = glyph.joins_forward()
            && glyphs.get(idx + 1).is_some_and(|next| next.joins_backward());

        let offset = match (glyph.joining, joins_prev, joins_next) {
            (Joining::Dual, true, true) => 3,
            (Joining::Dual, false, true) => 2,
            (_, true, _) => 1,
            _ => 0,
        };

        shaped.extend(char::from_u32(glyph.base + offset));
    }

    shaped
}
