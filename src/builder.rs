use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::{Config, Engine, ReachflowError, Result, collab::Collaborators};

/// Builder for [`Engine`]. Collaborators are required; everything else has
/// sensible defaults.
#[derive(Default)]
pub struct EngineBuilder {
    async_worker_thread_number: Option<u16>,
    rt: Option<Arc<Runtime>>,
    config: Option<Config>,
    collab: Option<Collaborators>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn async_worker_thread_number(
        mut self,
        n: u16,
    ) -> Self {
        self.async_worker_thread_number = Some(n);
        self
    }

    /// Use an externally owned runtime instead of building one.
    pub fn runtime(
        mut self,
        runtime: Arc<Runtime>,
    ) -> Self {
        self.rt = Some(runtime);
        self
    }

    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = Some(config);
        self
    }

    pub fn collaborators(
        mut self,
        collab: Collaborators,
    ) -> Self {
        self.collab = Some(collab);
        self
    }

    pub fn build(self) -> Result<Engine> {
        let collab = self.collab.ok_or(ReachflowError::Engine("collaborators are required".to_string()))?;

        let mut config = self.config.unwrap_or_default();
        if let Some(n) = self.async_worker_thread_number {
            config.async_worker_thread_number = n;
        }

        let runtime = match self.rt {
            Some(runtime) => runtime,
            None => Arc::new(Builder::new_multi_thread().worker_threads(config.async_worker_thread_number.into()).enable_all().build().unwrap()),
        };

        Ok(Engine::new(runtime, config, collab))
    }
}
