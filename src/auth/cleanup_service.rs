//! Background sweep that deletes expired access tokens.
//!
//! Tokens that are never presented again would otherwise stay in the store
//! forever; `resolve` only removes the ones it sees.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::token_service::TokenService;
use crate::errors::Result;
use crate::observability::metrics;

#[derive(Clone)]
pub struct CleanupService {
    tokens: Arc<TokenService>,
}

impl CleanupService {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Delete expired tokens and refresh the active-token gauge.
    pub async fn run_once(&self) -> Result<usize> {
        let removed = self.tokens.purge_expired(Utc::now()).await?;
        let active = self.tokens.count_tokens().await?;
        metrics::set_active_tokens(active).await;

        if removed > 0 {
            info!(removed, active, "expired access tokens removed");
        } else {
            debug!(active, "no expired access tokens");
        }
        Ok(removed)
    }

    /// Run [`run_once`](Self::run_once) every `period` until the task is aborted.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once().await {
                    warn!(error = %err, "access token cleanup failed");
                }
            }
        })
    }
}
