//! Suspension resolution.
//!
//! The collector is the only component that blocks on the outside world while
//! a turn is paused: it waits for authorization flows to finish and asks the
//! operator about individual tool calls. Authorization failures become
//! denials here and never reach the driver as errors.

use crate::catalog::AuthorizationService;
use crate::decision::Decision;
use crate::error::FrontendError;
use crate::frontend::{confirm, Frontend};
use crate::suspension::SuspensionKind;
use crate::ui::render::RenderSink;
use crate::ui::settings;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How approval suspensions are answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Ask the operator for each call.
    #[default]
    Ask,
    /// Approve every call without asking.
    All,
    /// Deny every call without asking.
    None,
}

impl ApprovalPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ask" => Some(Self::Ask),
            "all" => Some(Self::All),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::All => "all",
            Self::None => "none",
        }
    }
}

/// Turns one classified suspension into a decision.
#[async_trait]
pub trait SuspensionResolver: Send + Sync {
    async fn resolve(&self, kind: &SuspensionKind) -> Result<Decision, FrontendError>;
}

/// Default resolver: authorization waits plus operator prompts.
pub struct DecisionCollector {
    auth: Arc<dyn AuthorizationService>,
    frontend: Arc<dyn Frontend>,
    renderer: Arc<dyn RenderSink>,
    policy: ApprovalPolicy,
}

impl DecisionCollector {
    pub fn new(
        auth: Arc<dyn AuthorizationService>,
        frontend: Arc<dyn Frontend>,
        renderer: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            auth,
            frontend,
            renderer,
            policy: ApprovalPolicy::Ask,
        }
    }

    pub fn with_policy(mut self, policy: ApprovalPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn await_authorization(
        &self,
        tool_name: &str,
        authorization_id: &str,
        url: &str,
    ) -> Decision {
        self.renderer
            .activity(&format!("Authorization required for tool call {tool_name}"));
        if url.is_empty() {
            self.renderer
                .detail("no authorization link was provided; waiting anyway");
        } else {
            self.renderer
                .activity(&format!("Please authorize in your browser: {url}"));
        }
        self.renderer
            .activity("Waiting for you to complete authorization...");

        match self.auth.wait_for_completion(authorization_id).await {
            Ok(_) => {
                info!(tool = %tool_name, authorization_id, "authorization granted");
                self.renderer
                    .activity(&format!("Authorization granted for {tool_name}"));
                Decision::GRANTED
            }
            Err(err) => {
                warn!(tool = %tool_name, authorization_id, error = %err, "authorization failed");
                self.renderer.error(&format!("authorization for tool {tool_name} failed: {err}"));
                Decision::DENIED
            }
        }
    }

    async fn ask_approval(
        &self,
        tool_name: &str,
        input: &Value,
    ) -> Result<Decision, FrontendError> {
        self.renderer
            .activity(&format!("Tool call {tool_name} needs your approval"));
        self.renderer.approval_block(&pretty_input(input));

        let decision = match self.policy {
            ApprovalPolicy::All => {
                self.renderer.detail("auto-approved (policy: all)");
                Decision::GRANTED
            }
            ApprovalPolicy::None => {
                self.renderer.detail("auto-denied (policy: none)");
                Decision::DENIED
            }
            ApprovalPolicy::Ask => {
                self.renderer.activity("Do you approve this tool call?");
                let approved = confirm(self.frontend.as_ref(), settings::PROMPT_APPROVAL).await?;
                Decision::from_bool(approved)
            }
        };
        debug!(
            tool = %tool_name,
            approved = decision.authorized,
            policy = self.policy.label(),
            "approval resolved"
        );
        Ok(decision)
    }
}

#[async_trait]
impl SuspensionResolver for DecisionCollector {
    async fn resolve(&self, kind: &SuspensionKind) -> Result<Decision, FrontendError> {
        match kind {
            SuspensionKind::AuthorizationRequired {
                tool_name,
                authorization_id,
                url,
            } => Ok(self
                .await_authorization(tool_name, authorization_id, url)
                .await),
            SuspensionKind::ApprovalRequired { tool_name, input } => {
                self.ask_approval(tool_name, input).await
            }
            SuspensionKind::Unrecognized { tool_name } => {
                let tool = tool_name.as_deref().unwrap_or("an unknown tool");
                warn!(tool, "unrecognized suspension denied");
                self.renderer.warn(&format!("unrecognized suspension for {tool}; denying it"));
                Ok(Decision::DENIED)
            }
        }
    }
}

fn pretty_input(input: &Value) -> String {
    serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string())
}
