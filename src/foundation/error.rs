/// Result alias used across the crate.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors surfaced by the scheduler, its combinators and the session layer.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// Invalid configuration (frame rates, ranges, saved data).
    #[error("validation error: {0}")]
    Validation(String),

    /// A task body failed while being resumed.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// A runtime failure attributed to the innermost thread whose body raised it.
    #[error("thread '{thread}' failed: {source}")]
    Thread {
        /// Name of the failing thread.
        thread: String,
        /// Original failure.
        #[source]
        source: Box<FlowError>,
    },

    /// Persisted data could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else (sink I/O and friends).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowError {
    /// Build a [`FlowError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlowError::Runtime`].
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Build a [`FlowError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attribute this error to `thread` unless an inner thread already claimed it.
    pub fn in_thread(self, thread: &str) -> Self {
        match self {
            Self::Thread { .. } => self,
            other => Self::Thread {
                thread: thread.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// Name of the thread this error was attributed to, if any.
    pub fn thread_name(&self) -> Option<&str> {
        match self {
            Self::Thread { thread, .. } => Some(thread),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}
