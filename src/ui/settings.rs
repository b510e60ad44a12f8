//! Centralized UI strings, glyphs, and colors for the terminal output.

use crossterm::style::Color;

pub const INDENT_1: &str = "  ";
pub const SNIPPET_PREVIEW_LINES: usize = 12;

pub const PROMPT_PRIMARY: &str = "> ";
pub const PROMPT_APPROVAL: &str = "• approve? [y/n] ";

pub const LABEL_AGENT: &str = "toolgate";
pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_ASSISTANT: &str = "🤖:";
pub const LABEL_SYSTEM: &str = "⚙️:";

pub const GLYPH_SECTION_BULLET: &str = "•";

pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_AGENT_LABEL: Color = Color::Green;
pub const COLOR_MODEL_NAME: Color = Color::Yellow;
pub const COLOR_ACTIVITY_TEXT: Color = Color::Grey;
pub const COLOR_DETAIL_TEXT: Color = Color::DarkGrey;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_APPROVAL_TEXT: Color = Color::Cyan;
pub const COLOR_FAREWELL: Color = Color::Red;
