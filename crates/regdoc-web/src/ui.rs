//! Terminal output around the server lifecycle

use colored::*;

use crate::page::TITLE;

/// Display startup banner
pub fn display_banner(address: &str, entries: usize) {
    let width = 60;
    let top_border = format!("┌{}┐", "─".repeat(width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(width - 2));

    println!();
    println!("{}", top_border.blue());
    for line in banner_lines(address, entries) {
        let padding = (width - 4).saturating_sub(line.chars().count());
        println!("{}", format!("│  {}{}│", line, " ".repeat(padding)).blue());
    }
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "💡 Tip: Open the address above in a browser and ask in Arabic or English".dimmed()
    );
    println!();
}

fn banner_lines(address: &str, entries: usize) -> Vec<String> {
    vec![
        TITLE.to_string(),
        String::new(),
        format!("Index: {} chunks", entries),
        format!("Listening on http://{}", address),
    ]
}

/// Display the reason the interface is not started
pub fn display_unavailable(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
    eprintln!(
        "{}",
        "Set GOOGLE_API_KEY in the environment or a .env file and restart.".dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lines() {
        let lines = banner_lines("127.0.0.1:7860", 42);
        assert_eq!(lines[0], "FCAI Regulations Chatbot");
        assert_eq!(lines[2], "Index: 42 chunks");
        assert_eq!(lines[3], "Listening on http://127.0.0.1:7860");
    }
}
