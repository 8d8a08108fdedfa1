use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// An external tool (tar, git) could not be run or exited non-zero.
    #[error("{tool}: {message}")]
    Tool { tool: &'static str, message: String },
}

impl AppError {
    /// Build a `Tool` error from a failed spawn, distinguishing a missing
    /// binary from other launch failures.
    pub fn tool_spawn(tool: &'static str, err: &std::io::Error) -> Self {
        let message = if err.kind() == std::io::ErrorKind::NotFound {
            "command not found in PATH".to_string()
        } else {
            err.to_string()
        };
        AppError::Tool { tool, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn invalid_path_error_display() {
        let err = AppError::InvalidPath("/nonexistent".into());
        assert_eq!(err.to_string(), "Invalid path: /nonexistent");
    }

    #[test]
    fn tool_error_display() {
        let err = AppError::Tool {
            tool: "tar",
            message: "exited with status 2".into(),
        };
        assert_eq!(err.to_string(), "tar: exited with status 2");
    }

    #[test]
    fn tool_spawn_missing_binary() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = AppError::tool_spawn("git", &io_err);
        assert_eq!(err.to_string(), "git: command not found in PATH");
    }
}
