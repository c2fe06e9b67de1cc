//! Fatal run errors and the observer channel that reports them.

use log::error;

use crate::compute::statistics::StatisticsError;
use crate::schema::{ConfigError, MatrixError};

/// Errors that end an evolutionary run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Failed to construct candidate: {0}")]
    Construction(String),
    #[error("Failed to project candidate: {0}")]
    Projection(#[from] MatrixError),
    #[error("Fitness evaluation failed: {0}")]
    Evaluation(#[from] StatisticsError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Candidate fitness is already cached; mutating it would leave the score stale")]
    AlreadyEvaluated,
}

impl EvolutionError {
    /// Construction failure with a message.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }
}

/// Receives every fatal error raised by a run.
pub trait ErrorListener: Send + Sync {
    fn on_error(&self, error: &EvolutionError);
}

impl<F> ErrorListener for F
where
    F: Fn(&EvolutionError) + Send + Sync,
{
    fn on_error(&self, error: &EvolutionError) {
        self(error)
    }
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered error listeners.
///
/// With no listeners, errors go to the `log` error stream.
#[derive(Default)]
pub struct ErrorChannel {
    listeners: Vec<(ListenerId, Box<dyn ErrorListener>)>,
    next_id: u64,
}

impl ErrorChannel {
    pub fn subscribe(&mut self, listener: impl ErrorListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an error to every listener, or to the log if there are none.
    pub fn report(&self, err: &EvolutionError) {
        if self.listeners.is_empty() {
            error!("Evolution run aborted: {}", err);
            return;
        }
        for (_, listener) in &self.listeners {
            listener.on_error(err);
        }
    }
}

impl std::fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
