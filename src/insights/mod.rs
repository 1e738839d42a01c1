//! Insight gateway: the one network boundary of the dashboard.
//!
//! Sends a compact snapshot of the visible projects to a summarization
//! provider and always resolves with an [`InsightResult`]. Transport errors,
//! timeouts, malformed output and schema violations are logged and replaced
//! with [`InsightResult::fallback`].

pub mod gemini;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::InsightError;
use crate::types::{InsightResult, InsightsConfig, Project};

pub use gemini::GeminiClient;
pub use prompts::{InsightRequest, ProjectSummary};

/// Environment variables checked for the API credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// A text-generation backend able to answer an [`InsightRequest`].
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &InsightRequest) -> Result<InsightResult, InsightError>;
}

pub struct InsightGateway {
    provider: Option<Arc<dyn InsightProvider>>,
    timeout: Duration,
}

impl InsightGateway {
    pub fn new(provider: Arc<dyn InsightProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    /// A gateway with no provider; every request resolves to the fallback.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
        }
    }

    /// Build the Gemini-backed gateway from config and the process environment.
    pub fn from_config(config: &InsightsConfig) -> Self {
        if !config.enabled {
            log::info!("Automated insights disabled in config");
            return Self::disabled();
        }

        let api_key = match resolve_api_key(config, |name| std::env::var(name).ok()) {
            Some(key) => key,
            None => {
                log::warn!("{}", InsightError::MissingCredential);
                return Self::disabled();
            }
        };

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        match GeminiClient::new(&api_key, &config.model, &config.api_base_url, timeout) {
            Ok(client) => {
                log::info!("Automated insights via {} ({}s timeout)", config.model, timeout.as_secs());
                Self::new(Arc::new(client), timeout)
            }
            Err(e) => {
                log::warn!("Failed to build insight client: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Summarize `projects`. Never fails: any error becomes the fallback.
    pub async fn project_insights(&self, projects: &[Project]) -> InsightResult {
        match self.try_project_insights(projects).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "Insight request failed [{}/{:?}]: {}",
                    e.kind(),
                    e.error_type(),
                    e
                );
                InsightResult::fallback()
            }
        }
    }

    async fn try_project_insights(&self, projects: &[Project]) -> Result<InsightResult, InsightError> {
        let provider = self.provider.as_ref().ok_or(InsightError::MissingCredential)?;
        let request = InsightRequest::for_projects(projects);
        log::debug!(
            "Requesting insights for {} projects from {}",
            request.project_count,
            provider.name()
        );

        match tokio::time::timeout(self.timeout, provider.generate(&request)).await {
            Ok(result) => result,
            Err(_) => Err(InsightError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// First non-empty credential from the environment, then from config.
pub fn resolve_api_key(
    config: &InsightsConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| env(name))
        .chain(config.api_key.clone())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
