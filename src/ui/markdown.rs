//! Markdown-to-terminal rendering for assistant replies.
//!
//! `termimad` keeps lists, headings, tables, and code fences readable in a
//! plain terminal without a full TUI view.

use termimad::MadSkin;

/// Render markdown into plain terminal text with structure preserved.
pub fn render_markdown_for_terminal(input: &str) -> String {
    let skin = MadSkin::no_style();
    let formatted = skin.text(input, None).to_string();
    formatted.trim_end_matches('\n').to_string()
}
