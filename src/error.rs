use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Config,
    Fetch,
    Mutation,
    NotFound,
    Notify,
    Internal,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fetch, message)
    }

    pub fn mutation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Mutation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn notify(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Notify, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Usage => "USAGE_ERROR",
            ErrorKind::Config => "CONFIG_ERROR",
            ErrorKind::Fetch => "FETCH_ERROR",
            ErrorKind::Mutation => "MUTATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Notify => "NOTIFY_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Exit code when this error terminates the process. Per-item mutation
    /// and notification failures are reported inline and a completed run
    /// still exits 0; only usage/config errors and pre-mutation fetch
    /// errors normally propagate this far.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::Usage | ErrorKind::Config => 2,
            ErrorKind::Fetch => 3,
            ErrorKind::Mutation | ErrorKind::NotFound => 4,
            ErrorKind::Notify => 5,
            ErrorKind::Internal => 10,
        }
    }

    pub fn as_json(&self) -> Value {
        json!({
            "ok": false,
            "error": {
                "code": self.code(),
                "message": self.message,
            }
        })
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn codes_and_exit_codes_match() {
        let err = AppError::usage("bad flags");
        assert_eq!(err.code(), "USAGE_ERROR");
        assert_eq!(err.exit_code(), 2);

        let err = AppError::config("missing project id");
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert_eq!(err.exit_code(), 2);

        let err = AppError::fetch("listing failed");
        assert_eq!(err.code(), "FETCH_ERROR");
        assert_eq!(err.exit_code(), 3);

        let err = AppError::mutation("create failed");
        assert_eq!(err.code(), "MUTATION_ERROR");
        assert_eq!(err.exit_code(), 4);

        let err = AppError::internal("boom");
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn as_json_carries_code_and_message() {
        let err = AppError::fetch("connection refused");
        let value = err.as_json();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "FETCH_ERROR");
        assert_eq!(value["error"]["message"], "connection refused");
    }
}
