//! API module for the Liked Videos Analyzer
//!
//! Serves dashboard views as JSON. The dataset is shared read-only between
//! requests; each request builds its own filter chain from query parameters.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::dataset::Dataset;

pub mod handlers;
pub mod models;
pub mod server;

/// API Server for handling REST requests
#[derive(Debug)]
pub struct ApiServer {
    dataset: Arc<Dataset>,
    config: Arc<Config>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(dataset: Arc<Dataset>, config: Arc<Config>, port: u16) -> Self {
        Self {
            dataset,
            config,
            port,
        }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.port);
        server::start_http_server(self.dataset, self.config, self.port).await
    }
}
