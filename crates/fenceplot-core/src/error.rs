pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can occur while interpreting a single fenced block.
///
/// None of these are fatal: every renderer converts them into a notice scoped to the block that
/// produced them (see [`Error::notice`]).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Malformed payload ({kind}): {message}")]
    MalformedPayload { kind: String, message: String },

    #[error("Initialization Error: {message}")]
    Initialization { message: String },

    #[error("JesseCode Error: {message}")]
    ScriptExecution { message: String },
}

impl Error {
    pub fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// User-facing text shown in place of the block.
    pub fn notice(&self) -> String {
        match self {
            Self::MalformedPayload { .. } => MALFORMED_NOTICE.to_string(),
            Self::Initialization { .. } | Self::ScriptExecution { .. } => self.to_string(),
        }
    }

    /// Alert title used by board-style notices.
    pub fn title(&self) -> &'static str {
        match self {
            Self::MalformedPayload { .. } => "Invalid graph data",
            Self::Initialization { .. } => "Failed to initialize board",
            Self::ScriptExecution { .. } => "Failed to parse JesseCode: Syntax Error",
        }
    }
}

pub const MALFORMED_NOTICE: &str = "Invalid graph data received.";
