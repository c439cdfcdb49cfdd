//! Application-level error type.
//!
//! `main` prints the message and exits with the carried code:
//!
//! - 2: usage, plan, or configuration problems
//! - 3: persistence failures (an output CSV could not be written)
//! - 4: driver/simulator failures (session setup, protocol errors, result
//!   format drift)

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

    /// Bad invocation, plan file, or configuration.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// An output file could not be written; in-memory records are retained.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// The browser session or the simulator page failed.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::new(4, message)
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
