//! Error types.
//!
//! Library code returns [`StageError`], whose variants follow the failure
//! taxonomy of the reweighting stage. The binary converts it into [`AppError`],
//! which carries the process exit code.

use thiserror::Error;

/// Failures raised while configuring or running the muon reweighting stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// Unsupported variable, file/variable mismatch, unknown spline kind,
    /// missing or mistyped parameter, missing event array, wrong stage state.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Calibration table could not be resolved, read or parsed.
    #[error("resource error: {0}")]
    Resource(String),

    /// Degenerate calibration data or out-of-domain evaluation.
    #[error("data error: {0}")]
    Data(String),

    /// Failure writing an export file.
    #[error("io error: {0}")]
    Io(String),
}

impl StageError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            StageError::Configuration(_) | StageError::Resource(_) | StageError::Io(_) => 2,
            StageError::Data(_) => 3,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<StageError> for AppError {
    fn from(err: StageError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_errors_map_to_exit_codes() {
        let app: AppError = StageError::config("bad variable").into();
        assert_eq!(app.exit_code(), 2);
        assert_eq!(app.to_string(), "configuration error: bad variable");

        let app: AppError = StageError::data("trailing zero").into();
        assert_eq!(app.exit_code(), 3);
    }
}
