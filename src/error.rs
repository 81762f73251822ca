use crate::data::household::HouseholdError;
use crate::data::loader::LoadError;

/// Exit code for configuration and user-input problems.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for data loading and runtime problems.
pub const EXIT_RUNTIME: u8 = 4;

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

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(EXIT_RUNTIME, err.to_string())
    }
}

impl From<HouseholdError> for AppError {
    fn from(err: HouseholdError) -> Self {
        let code = match err {
            HouseholdError::NotConfigured => EXIT_CONFIG,
            HouseholdError::Busy | HouseholdError::Request { .. } => EXIT_RUNTIME,
        };
        AppError::new(code, err.to_string())
    }
}
