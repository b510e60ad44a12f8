//! CLI argument parsing via clap.

use clap::Parser;
use toolgate::build_info;

/// Chat with a tool-calling agent that pauses for tool authorization and
/// approval. Works with any OpenAI-compatible API.
#[derive(Debug, Parser)]
#[command(
    name = "toolgate",
    version = build_info::LONG_VERSION,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Path to config file (default: ./toolgate.toml or ~/.config/toolgate/toolgate.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override model id (OPENAI_MODEL).
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Override the user id tools are authorized for (ARCADE_USER_ID).
    #[arg(short = 'u', long = "user-id")]
    pub user_id: Option<String>,

    /// Conversation thread id.
    #[arg(long = "session")]
    pub session: Option<String>,

    /// Expose every tool of this toolkit. Repeatable; replaces configured toolkits.
    #[arg(long = "toolkit", value_name = "NAME")]
    pub toolkits: Vec<String>,

    /// Expose one extra tool by name. Repeatable.
    #[arg(long = "tool", value_name = "NAME")]
    pub tools: Vec<String>,

    /// Maximum number of tool definitions to fetch.
    #[arg(long = "limit")]
    pub limit: Option<usize>,

    /// Abandon a turn after this many suspension rounds.
    #[arg(long = "max-rounds")]
    pub max_rounds: Option<u32>,

    /// How approval prompts are answered: ask, all, or none.
    #[arg(
        long = "approve",
        value_name = "POLICY",
        default_value = "ask",
        value_parser = ["ask", "all", "none"]
    )]
    pub approve: String,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn defaults_leave_config_untouched() {
        let args = Args::parse_from(["toolgate"]);
        assert!(args.model.is_none());
        assert!(args.toolkits.is_empty());
        assert_eq!(args.approve, "ask");
        assert!(!args.no_color);
    }

    #[test]
    fn repeatable_toolkit_and_tool_flags() {
        let args = Args::parse_from([
            "toolgate",
            "--toolkit",
            "GoogleShopping",
            "--toolkit",
            "Gmail",
            "--tool",
            "Slack_SendMessage",
            "--max-rounds",
            "5",
        ]);
        assert_eq!(args.toolkits, vec!["GoogleShopping", "Gmail"]);
        assert_eq!(args.tools, vec!["Slack_SendMessage"]);
        assert_eq!(args.max_rounds, Some(5));
    }

    #[test]
    fn unknown_approval_policy_is_rejected() {
        assert!(Args::try_parse_from(["toolgate", "--approve", "maybe"]).is_err());
        let args = Args::parse_from(["toolgate", "--approve", "none"]);
        assert_eq!(args.approve, "none");
    }
}
