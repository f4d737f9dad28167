//! Bullet extraction — turns one section's raw content into at most five short points.
//!
//! Two strategies, chosen once at construction:
//! - `Remote`: asks the generative service, single attempt, bounded by a timeout.
//! - `Local`: deterministic line cleanup, no external dependency.
//!
//! Every remote failure (transport, auth, quota, timeout, empty or unusable
//! answer) is logged and answered by the local strategy. Callers always get a
//! bounded, renderable list and never see the error.

pub mod local;
pub mod prompts;
pub mod remote;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bullets::local::local_points;
use crate::bullets::prompts::BULLET_SYSTEM;
use crate::bullets::remote::{build_bullet_prompt, parse_points};
use crate::config::Config;
use crate::llm_client::{CompletionService, LlmClient, LlmError};

/// Upper bound on points per section.
pub const MAX_POINTS: usize = 5;

/// Which strategy produced a `BulletSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    Remote,
    Local,
}

/// The points for one section. Consumed once by the section renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletSet {
    pub section_name: String,
    /// At most `MAX_POINTS` entries.
    pub points: Vec<String>,
    pub source: PointSource,
}

#[derive(Clone)]
pub enum BulletExtractor {
    Remote {
        service: Arc<dyn CompletionService>,
        timeout: Duration,
    },
    Local,
}

impl std::fmt::Debug for BulletExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulletExtractor::Remote { timeout, .. } => f
                .debug_struct("Remote")
                .field("timeout", timeout)
                .finish_non_exhaustive(),
            BulletExtractor::Local => f.write_str("Local"),
        }
    }
}

impl BulletExtractor {
    /// Remote when an API key is configured, local otherwise.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        match &config.gemini_api_key {
            Some(key) => {
                let client = LlmClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    config.bullet_timeout,
                )?;
                Ok(Self::remote(Arc::new(client), config.bullet_timeout))
            }
            None => Ok(Self::Local),
        }
    }

    pub fn remote(service: Arc<dyn CompletionService>, timeout: Duration) -> Self {
        Self::Remote { service, timeout }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            BulletExtractor::Remote { .. } => "remote",
            BulletExtractor::Local => "local",
        }
    }

    /// Points for one section. Infallible by contract.
    pub async fn points_for(&self, section_title: &str, content: &str) -> BulletSet {
        if let BulletExtractor::Remote { service, timeout } = self {
            match remote_points(service.as_ref(), *timeout, section_title, content).await {
                Ok(points) => {
                    debug!(section = section_title, count = points.len(), "Remote bullet points");
                    return BulletSet {
                        section_name: section_title.to_string(),
                        points,
                        source: PointSource::Remote,
                    };
                }
                Err(reason) => {
                    warn!(
                        section = section_title,
                        %reason,
                        "Remote bullet extraction failed, using local fallback"
                    );
                }
            }
        }

        BulletSet {
            section_name: section_title.to_string(),
            points: local_points(content),
            source: PointSource::Local,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RemoteFailure {
    #[error(transparent)]
    Service(#[from] LlmError),
    #[error("no answer within {0:?}")]
    Timeout(Duration),
    #[error("answer contained no usable points")]
    Unparseable,
}

async fn remote_points(
    service: &dyn CompletionService,
    timeout: Duration,
    section_title: &str,
    content: &str,
) -> Result<Vec<String>, RemoteFailure> {
    let prompt = build_bullet_prompt(section_title, content);
    let answer = tokio::time::timeout(timeout, service.complete(&prompt, BULLET_SYSTEM))
        .await
        .map_err(|_| RemoteFailure::Timeout(timeout))??;

    let points = parse_points(&answer);
    if points.is_empty() {
        return Err(RemoteFailure::Unparseable);
    }
    Ok(points)
}
