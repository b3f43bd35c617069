// errors.rs
use std::fmt;

/// Errors that abort a whole run. Anything recoverable (a bad row, an
/// unparseable field) stays out of this enum and is reported through
/// `diagnostics` instead.
#[derive(Debug)]
pub enum ScrapeError {
    /// Inputs failed validation before any network traffic happened.
    InvalidInput(String),
    /// The remote source never produced a usable page, after retries.
    RemoteUnavailable { attempts: u32, last_cause: String },
    /// The snapshot could not be written to disk.
    Persistence(String),
}

impl ScrapeError {
    /// Process exit code for this failure; 0 is reserved for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScrapeError::InvalidInput(_) => 2,
            ScrapeError::RemoteUnavailable { .. } => 3,
            ScrapeError::Persistence(_) => 4,
        }
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            ScrapeError::RemoteUnavailable { attempts, last_cause } => {
                write!(f, "Remote unavailable after {attempts} attempts: {last_cause}")
            }
            ScrapeError::Persistence(msg) => write!(f, "Persistence failure: {msg}"),
        }
    }
}

impl std::error::Error for ScrapeError {}
