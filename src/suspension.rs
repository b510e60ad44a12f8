//! Suspension payloads raised by an execution cycle and their classification.
//!
//! A suspension is the raw JSON value the execution collaborator emits when a
//! tool call cannot proceed without an outside decision. The runner never
//! inspects those fields ad hoc: [`classify`] maps every payload onto exactly one
//! [`SuspensionKind`] and the rest of the crate matches on that enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool label used when a recognized payload does not name its tool.
pub const UNKNOWN_TOOL: &str = "unknown";

/// One suspension request raised during an execution cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suspension {
    pub value: Value,
}

impl Suspension {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Payload for a tool that needs the user to finish an OAuth-style flow.
    pub fn authorization(tool_name: &str, authorization_id: &str, url: &str) -> Self {
        Self::new(serde_json::json!({
            "authorization_required": true,
            "hitl_required": false,
            "tool_name": tool_name,
            "authorization_response": { "id": authorization_id, "url": url },
        }))
    }

    /// Payload for a tool call that needs explicit operator approval.
    pub fn approval(tool_name: &str, input: Value) -> Self {
        Self::new(serde_json::json!({
            "authorization_required": false,
            "hitl_required": true,
            "tool_name": tool_name,
            "input": input,
        }))
    }

    /// Tool name declared by the payload, if any.
    pub fn tool_name(&self) -> Option<&str> {
        self.value.get("tool_name").and_then(Value::as_str)
    }

    fn flag(&self, key: &str) -> bool {
        self.value.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Closed set of suspension kinds the runner knows how to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum SuspensionKind {
    /// The tool needs the user to authorize it out of band.
    AuthorizationRequired {
        tool_name: String,
        authorization_id: String,
        url: String,
    },
    /// The tool call needs an explicit yes/no from the operator.
    ApprovalRequired { tool_name: String, input: Value },
    /// Neither flag was set, or the payload was unusable. Always denied.
    Unrecognized { tool_name: Option<String> },
}

impl SuspensionKind {
    /// Short label used in status lines and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthorizationRequired { .. } => "authorization",
            Self::ApprovalRequired { .. } => "approval",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::AuthorizationRequired { tool_name, .. }
            | Self::ApprovalRequired { tool_name, .. } => Some(tool_name),
            Self::Unrecognized { tool_name } => tool_name.as_deref(),
        }
    }
}

/// Classify one suspension payload.
///
/// First match wins: the authorization flag outranks the human-in-the-loop
/// flag. An authorization payload with no request id cannot be waited on, so
/// it is unrecognized rather than demoted to an approval prompt.
pub fn classify(suspension: &Suspension) -> SuspensionKind {
    let tool_name = suspension.tool_name().map(str::to_string);

    if suspension.flag("authorization_required") {
        let response = suspension.value.get("authorization_response");
        let authorization_id = response
            .and_then(|r| r.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty());
        let Some(authorization_id) = authorization_id else {
            return SuspensionKind::Unrecognized { tool_name };
        };
        let url = response
            .and_then(|r| r.get("url"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        return SuspensionKind::AuthorizationRequired {
            tool_name: tool_name.unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
            authorization_id: authorization_id.to_string(),
            url: url.to_string(),
        };
    }

    if suspension.flag("hitl_required") {
        return SuspensionKind::ApprovalRequired {
            tool_name: tool_name.unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
            input: suspension.value.get("input").cloned().unwrap_or(Value::Null),
        };
    }

    SuspensionKind::Unrecognized { tool_name }
}
