//! HTML rendering of the question form

use html_escape::{encode_double_quoted_attribute, encode_text};

pub const TITLE: &str = "FCAI Regulations Chatbot";
pub const DESCRIPTION: &str =
    "Ask a question about the faculty's internal regulations and get an answer with page citations.";
pub const PLACEHOLDER: &str =
    "مثال: ما هي شروط القبول في الكلية؟ / Example: What are the admission requirements?";
pub const FOOTER_TIP: &str = "Tip: answers are drawn from the official regulations PDF.";

const QUESTION_ROWS: u32 = 5;
const ANSWER_ROWS: u32 = 15;

/// Render the single page of the interface
///
/// Both fields are escaped, so the answer area shows model output verbatim.
pub fn render_page(question: &str, answer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; }}
textarea {{ width: 100%; box-sizing: border-box; font-size: 1rem; unicode-bidi: plaintext; }}
.actions {{ margin: 0.75rem 0; display: flex; gap: 0.5rem; }}
.actions a, .actions button {{ padding: 0.4rem 1.2rem; font-size: 1rem; }}
footer {{ color: #666; font-size: 0.9rem; margin-top: 1rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{description}</p>
<form method="post" action="/ask">
<label for="question">Your question</label>
<textarea id="question" name="question" rows="{question_rows}" placeholder="{placeholder}" dir="auto">{question}</textarea>
<div class="actions">
<button type="submit">Submit</button>
<a href="/clear" role="button">Clear</a>
</div>
</form>
<label for="answer">Answer</label>
<textarea id="answer" rows="{answer_rows}" readonly dir="auto">{answer}</textarea>
<footer>{tip}</footer>
</body>
</html>
"#,
        title = TITLE,
        description = encode_text(DESCRIPTION),
        question_rows = QUESTION_ROWS,
        placeholder = encode_double_quoted_attribute(PLACEHOLDER),
        question = encode_text(question),
        answer_rows = ANSWER_ROWS,
        answer = encode_text(answer),
        tip = encode_text(FOOTER_TIP),
    )
}
