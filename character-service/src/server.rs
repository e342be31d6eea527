use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{router, store::CharacterStore};

/// Serves the character API on an already bound listener.
pub struct Server {
    listener: TcpListener,
    store: Arc<CharacterStore>,
}

impl Server {
    /// Starts from an empty store.
    pub fn new(listener: TcpListener) -> Self {
        Self::with_store(listener, Arc::new(CharacterStore::new()))
    }

    pub fn with_store(listener: TcpListener, store: Arc<CharacterStore>) -> Self {
        Self { listener, store }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until `shutdown` resolves, then stops accepting
    /// connections and lets in-flight requests drain.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server { listener, store } = self;
        let app = router::app(Arc::clone(&store));

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("http server failed")?;

        let characters = store.len().await;
        info!(characters, "server shut down");
        Ok(())
    }

    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
            }
            info!("shutdown requested");
        })
        .await
    }
}
