//! Rendering contract and the default terminal renderer.
//!
//! `RenderSink` is the UI contract consumed by the collector, driver, and
//! session loop. Tests substitute a recording sink instead of writing to the
//! terminal.

use crate::ui::markdown::render_markdown_for_terminal;
use crate::ui::settings;
use crossterm::style::Stylize;

/// Injectable rendering interface used by orchestration code.
pub trait RenderSink: Send + Sync {
    /// Render the startup banner.
    fn header(&self, model: &str, user_id: &str);
    /// Render one message produced by the agent during a cycle.
    fn agent_message(&self, author: &str, content: &str);
    /// Render a status line about suspension handling.
    fn activity(&self, text: &str);
    /// Render an indented detail line under the last status line.
    fn detail(&self, text: &str);
    /// Render a block the operator has to read before deciding.
    fn approval_block(&self, text: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    /// Render the greeting shown before the first prompt.
    fn welcome(&self, text: &str);
    /// Render the farewell shown when the session ends.
    fn farewell(&self, text: &str);
}

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl RenderSink for Renderer {
    fn header(&self, model: &str, user_id: &str) {
        if self.color {
            eprintln!(
                "{} {} running with model {} as {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                settings::LABEL_AGENT.with(settings::COLOR_AGENT_LABEL).bold(),
                model.with(settings::COLOR_MODEL_NAME).bold(),
                user_id.bold(),
            );
        } else {
            eprintln!(
                "{} {} running with model {model} as {user_id}",
                settings::GLYPH_SECTION_BULLET,
                settings::LABEL_AGENT
            );
        }
    }

    fn agent_message(&self, author: &str, content: &str) {
        let rendered = render_markdown_for_terminal(content);
        if rendered.is_empty() {
            return;
        }
        if self.color {
            println!(
                "{} {}",
                format!("{} [{author}]", settings::LABEL_ASSISTANT).bold(),
                rendered
            );
        } else {
            println!("{} [{author}] {rendered}", settings::LABEL_ASSISTANT);
        }
    }

    fn activity(&self, text: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::LABEL_SYSTEM,
                text.with(settings::COLOR_ACTIVITY_TEXT).bold()
            );
        } else {
            eprintln!("{} {text}", settings::LABEL_SYSTEM);
        }
    }

    fn detail(&self, text: &str) {
        if self.color {
            eprintln!(
                "{}{}",
                settings::INDENT_1,
                text.with(settings::COLOR_DETAIL_TEXT)
            );
        } else {
            eprintln!("{}{text}", settings::INDENT_1);
        }
    }

    fn approval_block(&self, text: &str) {
        let mut lines = text.lines();
        for line in lines.by_ref().take(settings::SNIPPET_PREVIEW_LINES) {
            if self.color {
                eprintln!(
                    "{}{}",
                    settings::INDENT_1,
                    line.with(settings::COLOR_APPROVAL_TEXT)
                );
            } else {
                eprintln!("{}{line}", settings::INDENT_1);
            }
        }
        let remaining = lines.count();
        if remaining > 0 {
            self.detail(&format!("... {remaining} more line(s)"));
        }
    }

    fn warn(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_WARNING.with(settings::COLOR_WARNING).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_WARNING);
        }
    }

    fn error(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_ERROR.with(settings::COLOR_ERROR).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_ERROR);
        }
    }

    fn welcome(&self, text: &str) {
        if self.color {
            println!("{}", text.with(settings::COLOR_AGENT_LABEL));
        } else {
            println!("{text}");
        }
    }

    fn farewell(&self, text: &str) {
        if self.color {
            println!("{}", text.with(settings::COLOR_FAREWELL));
        } else {
            println!("{text}");
        }
    }
}
