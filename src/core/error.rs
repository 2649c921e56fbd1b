// Centralized error handling for the dashboard

use thiserror::Error;

/// Errors that can occur during login
///
/// The display text is what the login form shows in its message field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("ID must be 3 digits.")]
    InvalidIdFormat,

    #[error("No staff with that ID.")]
    UserNotFound,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Enter two-step code.")]
    TwoStepRequired,

    #[error("Invalid two-step code.")]
    InvalidTwoStepCode,
}

/// Errors raised by a persistence provider
///
/// Session and inbox operations log these and carry on; they never reach
/// the user.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors parsing a console command line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unterminated quote in command")]
    UnterminatedQuote,
}
