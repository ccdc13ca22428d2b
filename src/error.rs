use thiserror::Error;

/// Failures of a fan-out call as a whole.
///
/// These never describe a user-level failure of one element; those are carried
/// per element by the result-collecting primitives. A `FanOutError` means the
/// call produced no output at all.
#[derive(Error, Debug)]
pub enum FanOutError {
    /// A task panicked. Every other task still ran to completion before this
    /// was reported. `index` is the lowest panicking index.
    #[error("task {index} panicked: {message}")]
    TaskPanicked { index: usize, message: String },

    /// The runtime refused to start the thread for `index`. Tasks spawned
    /// before it were joined.
    #[error("failed to spawn task {index}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// The runtime cancelled the async task for `index` before it finished.
    #[error("task {index} was cancelled")]
    TaskCancelled { index: usize },

    /// The slot for `index` was still unwritten after the join. Spawn failures
    /// return [`FanOutError::Spawn`] before slots are read, and every task
    /// that ran writes its slot, so this signals a bug in the engine.
    #[error("task {index} exited without producing a result")]
    MissingResult { index: usize },
}

impl FanOutError {
    /// Index of the task the error is attributed to.
    pub fn index(&self) -> usize {
        match self {
            FanOutError::TaskPanicked { index, .. }
            | FanOutError::Spawn { index, .. }
            | FanOutError::TaskCancelled { index }
            | FanOutError::MissingResult { index } => *index,
        }
    }
}

/// Render a panic payload the way the default panic hook does.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
