use crate::arcs::ArcPolicy;
use crate::attitude::{AttitudeState, FlightMode};
use crate::camera::CameraPreset;
use crate::error::ConfigError;
use crate::visibility::DisplayToggles;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Initial attitude, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttitudeConfig {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub mode: FlightMode,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            yaw: 20.,
            pitch: 20.,
            roll: 20.,
            mode: FlightMode::None,
        }
    }
}

impl AttitudeConfig {
    fn degrees(&self) -> [(&'static str, f64); 3] {
        [("yaw", self.yaw), ("pitch", self.pitch), ("roll", self.roll)]
    }

    /// Rejects non-finite angles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.degrees().into_iter().find(|(_, value)| !value.is_finite()) {
            Some((angle, value)) => Err(ConfigError::NonFiniteAngle { angle, value }),
            None => Ok(()),
        }
    }

    /// The attitude to start from. Any non-finite angle starts out at zero instead.
    #[must_use]
    pub fn state(&self) -> AttitudeState {
        let finite_or_zero = |value: f64| if value.is_finite() { value } else { 0. };
        let mut state = AttitudeState::from_degrees(
            finite_or_zero(self.yaw),
            finite_or_zero(self.pitch),
            finite_or_zero(self.roll),
        );
        state.mode = self.mode;
        state
    }
}

/// Optional parts of the visualization.
///
/// Each feature gates something on top of the core attitude display; the panel toggles still
/// decide whether an enabled feature is actually shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Features {
    /// The airflow particle field.
    pub airflow: bool,
    /// The bottom, left, and right camera presets.
    pub extra_camera_presets: bool,
    /// The "(-)" markers next to negative angle labels.
    pub extended_sign_markers: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            airflow: true,
            extra_camera_presets: true,
            extended_sign_markers: true,
        }
    }
}

/// Everything an [`Engine`](crate::Engine) is configured with at start-up.
///
/// Every field has a default, so a configuration file only needs to name what it changes:
///
/// ```
/// # #[cfg(feature = "serde")]
/// # {
/// use ypr_viz::{EngineConfig, FlightMode};
///
/// let config = EngineConfig::from_yaml(
///     "attitude:\n  mode: phugoid\nfeatures:\n  airflow: false\n",
/// )
/// .unwrap();
/// assert_eq!(config.attitude.mode, FlightMode::Phugoid);
/// assert_eq!(config.attitude.yaw, 20.);
/// assert!(!config.features.airflow);
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EngineConfig {
    pub attitude: AttitudeConfig,
    pub toggles: DisplayToggles,
    pub features: Features,
    pub arc_policy: ArcPolicy,
    pub camera: CameraPreset,
    /// Seed for particle placement. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.attitude.validate()
    }

    /// Parses and validates a YAML configuration.
    #[cfg(feature = "serde")]
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}
