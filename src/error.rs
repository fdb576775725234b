/// Application error carrying the process exit code it maps to.
///
/// Exit codes:
/// - `2`: configuration or input files (boundary GeoJSON, CLI values)
/// - `3`: relational store
/// - `4`: remote INE API (transport, HTTP status, payload shape)
/// - `5`: writing exports or charts
#[derive(Clone, thiserror::Error)]
#[error("{message}")]
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

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
