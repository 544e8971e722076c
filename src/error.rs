//! Error kinds surfaced by the decision pipeline.
//!
//! Every fatal condition maps to exactly one variant, so the one-shot runner can
//! translate it into an exit status and the daemon can log it and move on.

use crate::constants::*;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or unparsable configuration, or an invalid value inside it.
    #[error("{0}")]
    Config(String),

    /// Conflicting or malformed command-line arguments.
    #[error("{0}")]
    Argument(String),

    /// Automatic geolocation was required but failed.
    #[error("could not determine current location: {0}")]
    LocationUnavailable(String),

    /// Invalid coordinates or no usable sunrise/sunset for the date.
    #[error("sunrise/sunset calculation failed: {0}")]
    SolarComputation(String),

    /// A single OS setting could not be applied.
    #[error("failed to set {setting} to '{value}': {reason}")]
    ApplyStep {
        setting: &'static str,
        value: String,
        reason: String,
    },

    /// The custom script is missing, not executable, or exited non-zero.
    #[error("custom script failed: {0}")]
    CustomScript(String),
}

impl Error {
    /// Process exit status used by one-shot invocations.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Argument(_) => EXIT_ARGUMENT_ERROR,
            Error::Config(_) => EXIT_CONFIG_ERROR,
            Error::LocationUnavailable(_) => EXIT_LOCATION_UNAVAILABLE,
            Error::SolarComputation(_) => EXIT_SOLAR_ERROR,
            Error::CustomScript(_) => EXIT_CUSTOM_SCRIPT_ERROR,
            Error::ApplyStep { .. } => EXIT_APPLY_ERROR,
        }
    }

    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration error",
            Error::Argument(_) => "argument error",
            Error::LocationUnavailable(_) => "location unavailable",
            Error::SolarComputation(_) => "solar computation error",
            Error::ApplyStep { .. } => "apply step error",
            Error::CustomScript(_) => "custom script error",
        }
    }
}
