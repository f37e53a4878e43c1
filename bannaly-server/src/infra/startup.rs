use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::infra::app_state::AppState;

/// Work run once the state is built and before the listener accepts
/// connections.
#[async_trait]
pub trait StartupHooks: Send + Sync {
    async fn run(&self, state: &AppState) -> Result<()>;
}

/// Starts the collection load in the background. Requests that arrive
/// before it finishes see the `loading` status.
#[derive(Debug, Default)]
pub struct ProdStartupHooks;

#[async_trait]
impl StartupHooks for ProdStartupHooks {
    async fn run(&self, state: &AppState) -> Result<()> {
        let loader = state.loader();
        let cache = state.collections();
        tokio::spawn(async move {
            loader.run(&cache).await;
            info!(status = cache.get().label(), "video collection load finished");
        });
        Ok(())
    }
}

/// Runs the collection load to completion before returning.
#[derive(Debug, Default)]
pub struct BlockingStartupHooks;

#[async_trait]
impl StartupHooks for BlockingStartupHooks {
    async fn run(&self, state: &AppState) -> Result<()> {
        state.loader().run(&state.collections()).await;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopStartupHooks;

#[async_trait]
impl StartupHooks for NoopStartupHooks {
    async fn run(&self, _state: &AppState) -> Result<()> {
        Ok(())
    }
}
