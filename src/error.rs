//! Error handling for Auris
//!
//! No error in this crate terminates a session: feature extraction degrades
//! to conservative defaults, advisor failures fall back to the minimal
//! intervention strategy, and the worst observable outcome is a diagnostic
//! violation list alongside gently processed audio.

use thiserror::Error;

/// Result type alias for Auris operations
pub type Result<T> = std::result::Result<T, AurisError>;

/// Main error type for Auris operations
#[derive(Error, Debug)]
pub enum AurisError {
    // Audio Input Errors
    #[error("Audio contains no samples")]
    EmptyAudio,

    #[error("Invalid audio input: {reason}")]
    InvalidAudio { reason: String },

    #[error("Unsupported WAV format: {reason}")]
    UnsupportedWav { reason: String },

    // Advisor Errors
    #[error("Strategy advisor '{advisor}' unavailable: {reason}")]
    AdvisorUnavailable { advisor: String, reason: String },

    #[error("Strategy advisor returned malformed output: {reason}")]
    AdvisorMalformed { reason: String },

    // Safety Errors
    #[error("Strategy rejected by safety validation: {violations:?}")]
    UnsafeStrategy { violations: Vec<String> },

    // Lookup Errors
    #[error("Unknown strategy preset: {name}")]
    UnknownPreset { name: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AurisError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AurisError::EmptyAudio => "EMPTY_AUDIO",
            AurisError::InvalidAudio { .. } => "INVALID_AUDIO",
            AurisError::UnsupportedWav { .. } => "UNSUPPORTED_WAV",
            AurisError::AdvisorUnavailable { .. } => "ADVISOR_UNAVAILABLE",
            AurisError::AdvisorMalformed { .. } => "ADVISOR_MALFORMED",
            AurisError::UnsafeStrategy { .. } => "UNSAFE_STRATEGY",
            AurisError::UnknownPreset { .. } => "UNKNOWN_PRESET",
            AurisError::Io(_) => "IO_ERROR",
            AurisError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Advisor and safety failures are recoverable: the decision engine
    /// substitutes the conservative fallback strategy and the cycle
    /// continues.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AurisError::AdvisorUnavailable { .. } => true,
            AurisError::AdvisorMalformed { .. } => true,
            AurisError::UnsafeStrategy { .. } => true,
            AurisError::UnknownPreset { .. } => true,
            AurisError::EmptyAudio => true,
            _ => false,
        }
    }
}
