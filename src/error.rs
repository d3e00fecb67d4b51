use thiserror::Error;

/// The aircraft asset could not be resolved.
///
/// This is the only failure the engine ever observes at runtime, and it is not fatal: the engine
/// keeps running without a body mesh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load aircraft model from {path}: {reason}")]
pub struct ModelLoadError {
    pub path: String,
    pub reason: String,
}

impl ModelLoadError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown flight mode {0:?}")]
pub struct ParseFlightModeError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown camera preset {0:?}")]
pub struct ParseCameraPresetError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown display toggle {0:?}")]
pub struct ParseToggleError(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[cfg(feature = "serde")]
    #[error("invalid engine configuration")]
    Parse(#[from] serde_yaml::Error),

    #[error("initial {angle} must be finite, got {value}")]
    NonFiniteAngle { angle: &'static str, value: f64 },
}
