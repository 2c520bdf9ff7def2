use std::path::PathBuf;

/// Errors raised by the decode and analysis core.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The script file does not exist.
    #[error("input not found: {}", .path.display())]
    InputNotFound { path: PathBuf },
    /// The threshold handed to the key derivation is not a finite number.
    #[error("invalid threshold: '{0}'")]
    InvalidThreshold(String),
    /// A spoken line has no speaker separator and the policy is to reject it.
    #[error("line {line_no} has no speaker separator: '{line}'")]
    MalformedLine { line_no: usize, line: String },
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
