//! HTTP client for OpenAI-compatible chat completion APIs.

use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;

mod client;

pub use client::ApiClient;

/// Minimal model API interface used by the chat agent.
///
/// Tests provide scripted responses through this trait while the production
/// path uses [`ApiClient`].
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}
