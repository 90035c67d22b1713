use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{DataSource, DexConfig};
use crate::data::loader::{fetch_pokedex, load_pokedex, LoadError, Pokedex};
use crate::oracle::client::{GeminiClient, GenerativeBackend, OracleError};

use super::controller::{Controller, Outcome};
use super::messages::Message;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to load Pokémon data: {0}")]
    Load(#[from] LoadError),
    #[error("blocking loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Load the dataset named by the config. Any failure is fatal to the session.
pub async fn load_source(source: &DataSource) -> Result<Pokedex, StartError> {
    match source {
        DataSource::File(path) => {
            let path = path.clone();
            Ok(tokio::task::spawn_blocking(move || load_pokedex(&path)).await??)
        }
        DataSource::Url(url) => Ok(fetch_pokedex(&reqwest::Client::new(), url).await?),
    }
}

/// Drives a [`Controller`]: messages are applied synchronously, requested AI
/// calls run as independent tokio tasks, and their completions come back
/// as messages in whatever order they finish.
pub struct Runtime {
    controller: Controller,
    backend: Arc<dyn GenerativeBackend>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
}

impl Runtime {
    pub fn new(controller: Controller, backend: Arc<dyn GenerativeBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Runtime {
            controller,
            backend,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Load the catalog and wire up the Gemini backend from `config`.
    pub async fn start(config: &DexConfig) -> Result<Self, StartError> {
        let pokedex = load_source(&config.data_source).await?;
        if !config.has_api_key() {
            tracing::warn!("no API key configured; AI features will fail");
        }
        let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::from_config(config));
        Ok(Runtime::new(Controller::new(pokedex), backend))
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Number of AI calls whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a message, spawning the AI call it requests, if any.
    pub fn dispatch(&mut self, message: Message) -> Outcome {
        let outcome = self.controller.update(message);
        if let Outcome::Dispatch(request) = &outcome {
            let request = request.clone();
            let backend = Arc::clone(&self.backend);
            let tx = self.tx.clone();
            self.in_flight += 1;
            tokio::spawn(async move {
                let fallback = request.clone();
                let call = tokio::spawn(async move { request.run(backend.as_ref()).await });
                // A panicked call still completes its ticket so `in_flight` drains.
                let completion = match call.await {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::error!(
                            ticket = fallback.ticket().0,
                            error = %e,
                            "AI request task failed"
                        );
                        fallback.failed(OracleError::Aborted(e.to_string()))
                    }
                };
                // The receiver only goes away with the runtime itself.
                let _ = tx.send(completion);
            });
        }
        outcome
    }

    /// Wait for the next AI completion and apply it. Returns `None` when
    /// nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Outcome> {
        if self.in_flight == 0 {
            return None;
        }
        let message = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(self.controller.update(message))
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }
}
