//! Default configuration constants.

/// Toolkit exposed when none is configured.
pub(super) const DEFAULT_TOOLKIT: &str = "GoogleShopping";
/// Maximum number of tool definitions fetched from the catalog.
pub(super) const DEFAULT_TOOL_LIMIT: usize = 100;
/// Thread id shared by every turn of one process.
pub(super) const DEFAULT_SESSION_ID: &str = "1";
pub(super) const DEFAULT_ARCADE_BASE_URL: &str = "https://api.arcade.dev";
pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// Built-in system prompt for the shopping assistant.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../templates/system_prompt.md");
