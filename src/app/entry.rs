//! Startup: resolve config, discover tools, run the interactive session.

use super::AppError;
use crate::cli::Args;
use std::sync::Arc;
use std::time::Duration;
use toolgate::agent::{ChatAgent, ChatAgentOptions, MemorySaver};
use toolgate::api::ApiClient;
use toolgate::build_info;
use toolgate::catalog::{ArcadeClient, ToolCatalog, ToolQuery};
use toolgate::collector::{ApprovalPolicy, DecisionCollector};
use toolgate::config::{load_config, validate_required, Config};
use toolgate::driver::TurnDriver;
use toolgate::frontend::{Frontend, TerminalFrontend};
use toolgate::session::{Session, SessionLoop};
use toolgate::ui::render::{RenderSink, Renderer};
use tracing::{debug, info};

/// Layer command-line flags over the loaded config.
fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(model) = &args.model {
        config.agent.model = model.clone();
    }
    if let Some(user_id) = &args.user_id {
        config.arcade.user_id = user_id.clone();
    }
    if let Some(session) = &args.session {
        config.agent.session_id = session.clone();
    }
    if !args.toolkits.is_empty() {
        config.tools.toolkits = args.toolkits.clone();
    }
    for tool in &args.tools {
        if !config.tools.tools.contains(tool) {
            config.tools.tools.push(tool.clone());
        }
    }
    if let Some(limit) = args.limit {
        config.tools.limit = limit;
    }
    if args.max_rounds.is_some() {
        config.agent.max_rounds = args.max_rounds;
    }
    if args.no_color {
        config.display.color = false;
    }
}

pub(crate) async fn run(args: Args) -> Result<(), AppError> {
    let (mut config, source) = load_config(args.config.as_deref())?;
    apply_cli_overrides(&mut config, &args);
    validate_required(&config)?;
    debug!(?source, build = %build_info::startup_metadata_line(), "configuration resolved");

    let renderer: Arc<dyn RenderSink> = Arc::new(Renderer::new(config.display.color));
    if config.arcade.api_key.is_empty() {
        renderer.warn("ARCADE_API_KEY is not set; tool discovery will likely be rejected");
    }

    let catalog = Arc::new(ArcadeClient::new(
        &config.arcade,
        Duration::from_secs(config.api.timeout_secs),
    ));
    let tools = catalog
        .list_tools(&ToolQuery {
            toolkits: config.tools.toolkits.clone(),
            tools: config.tools.tools.clone(),
            user_id: config.arcade.user_id.clone(),
            limit: config.tools.limit,
        })
        .await?;
    info!(count = tools.len(), "tool definitions loaded");
    if tools.is_empty() {
        renderer.warn("no tools matched the configured toolkits; the agent can only chat");
    }

    let agent = ChatAgent::new(
        ChatAgentOptions {
            model: config.agent.model.clone(),
            system_prompt: config.agent.system_prompt.clone(),
            tools,
            require_approval: config.tools.require_approval.clone(),
            user_id: config.arcade.user_id.clone(),
        },
        Box::new(ApiClient::new(&config.api)),
        catalog.clone(),
        Arc::new(MemorySaver::new()),
    );

    let policy = ApprovalPolicy::parse(&args.approve).unwrap_or_default();
    let frontend: Arc<dyn Frontend> = Arc::new(TerminalFrontend::new());
    let collector = DecisionCollector::new(catalog, frontend.clone(), renderer.clone())
        .with_policy(policy);
    let driver = TurnDriver::new(Arc::new(agent), Arc::new(collector), renderer.clone())
        .with_max_rounds(config.agent.max_rounds);

    renderer.header(&config.agent.model, &config.arcade.user_id);
    let mut session = Session::new(config.agent.session_id.clone());
    SessionLoop::new(driver, frontend, renderer)
        .run(&mut session)
        .await?;
    info!(turns = session.turns(), "session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_flags_override_file_values() {
        let mut config = Config::default();
        config.agent.model = "from-file".into();
        config.tools.tools = vec!["Gmail_ListEmails".into()];
        let args = Args::parse_from([
            "toolgate",
            "--model",
            "gpt-4o-mini",
            "--user-id",
            "me@example.com",
            "--toolkit",
            "Gmail",
            "--tool",
            "Gmail_ListEmails",
            "--tool",
            "Gmail_SendEmail",
            "--limit",
            "20",
            "--no-color",
        ]);
        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.arcade.user_id, "me@example.com");
        assert_eq!(config.tools.toolkits, vec!["Gmail"]);
        assert_eq!(config.tools.tools, vec!["Gmail_ListEmails", "Gmail_SendEmail"]);
        assert_eq!(config.tools.limit, 20);
        assert!(!config.display.color);
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = Config::default();
        config.agent.max_rounds = Some(4);
        apply_cli_overrides(&mut config, &Args::parse_from(["toolgate"]));
        assert_eq!(config.tools.toolkits, vec!["GoogleShopping"]);
        assert_eq!(config.agent.max_rounds, Some(4));
        assert_eq!(config.agent.session_id, "1");
        assert!(config.display.color);
    }
}
