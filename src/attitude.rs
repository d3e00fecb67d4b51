use crate::error::ParseFlightModeError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uom::si::angle::degree;
use uom::si::f64::Angle;
use uom::ConstZero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the illustrative flight-mode animations.
///
/// The names match what the parameter panel shows (see [`FlightMode::name`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlightMode {
    /// No animation; attitude is whatever the panel says.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    None,
    /// Long, lightly damped pitch oscillation trading altitude for airspeed.
    #[cfg_attr(feature = "serde", serde(rename = "phugoid"))]
    Phugoid,
    /// Quick, heavily damped pitch oscillation.
    #[cfg_attr(feature = "serde", serde(rename = "short period", alias = "short-period"))]
    ShortPeriod,
    /// Slowly diverging bank.
    #[cfg_attr(feature = "serde", serde(rename = "spiral"))]
    Spiral,
    /// Roll subsidence after a step aileron input.
    #[cfg_attr(feature = "serde", serde(rename = "roll"))]
    Roll,
    /// Coupled yaw/roll oscillation.
    #[cfg_attr(feature = "serde", serde(rename = "dutch roll", alias = "dutch-roll"))]
    DutchRoll,
}

impl FlightMode {
    pub const ALL: [FlightMode; 6] = [
        FlightMode::None,
        FlightMode::Phugoid,
        FlightMode::ShortPeriod,
        FlightMode::Spiral,
        FlightMode::Roll,
        FlightMode::DutchRoll,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FlightMode::None => "none",
            FlightMode::Phugoid => "phugoid",
            FlightMode::ShortPeriod => "short period",
            FlightMode::Spiral => "spiral",
            FlightMode::Roll => "roll",
            FlightMode::DutchRoll => "dutch roll",
        }
    }

    /// Whether this mode drives the attitude (every mode but [`FlightMode::None`]).
    #[must_use]
    pub fn is_active(self) -> bool {
        self != FlightMode::None
    }
}

impl Display for FlightMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlightMode {
    type Err = ParseFlightModeError;

    /// Accepts the panel names as well as their hyphenated spelling (`"dutch-roll"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        FlightMode::ALL
            .into_iter()
            .find(|mode| mode.name() == normalized)
            .ok_or_else(|| ParseFlightModeError(s.to_owned()))
    }
}

/// Names one of the three Euler angles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EulerAngle {
    /// ψ
    Yaw,
    /// θ
    Pitch,
    /// φ
    Roll,
}

impl EulerAngle {
    pub const ALL: [EulerAngle; 3] = [EulerAngle::Yaw, EulerAngle::Pitch, EulerAngle::Roll];

    /// The Greek letter the angle is labelled with.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            EulerAngle::Yaw => 'ψ',
            EulerAngle::Pitch => 'θ',
            EulerAngle::Roll => 'φ',
        }
    }
}

/// The current yaw, pitch, and roll, and which (if any) flight mode is animating them.
///
/// This is the single source of truth for attitude. The parameter panel writes to it through
/// [`Engine::apply`](crate::Engine::apply) and an active flight mode overwrites it every tick.
/// Any finite angle is accepted; the panel's ±45° slider range is not enforced here.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttitudeState {
    pub yaw: Angle,
    pub pitch: Angle,
    pub roll: Angle,
    pub mode: FlightMode,
}

impl AttitudeState {
    #[must_use]
    pub fn new(
        yaw: impl Into<Angle>,
        pitch: impl Into<Angle>,
        roll: impl Into<Angle>,
        mode: FlightMode,
    ) -> Self {
        Self {
            yaw: yaw.into(),
            pitch: pitch.into(),
            roll: roll.into(),
            mode,
        }
    }

    /// Wings level, nose on the horizon, pointing along the earth forward axis.
    #[must_use]
    pub fn level() -> Self {
        Self::new(Angle::ZERO, Angle::ZERO, Angle::ZERO, FlightMode::None)
    }

    #[must_use]
    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::new(
            Angle::new::<degree>(yaw),
            Angle::new::<degree>(pitch),
            Angle::new::<degree>(roll),
            FlightMode::None,
        )
    }

    #[must_use]
    pub fn angle(&self, which: EulerAngle) -> Angle {
        match which {
            EulerAngle::Yaw => self.yaw,
            EulerAngle::Pitch => self.pitch,
            EulerAngle::Roll => self.roll,
        }
    }

    pub fn set_angle(&mut self, which: EulerAngle, angle: impl Into<Angle>) {
        let angle = angle.into();
        match which {
            EulerAngle::Yaw => self.yaw = angle,
            EulerAngle::Pitch => self.pitch = angle,
            EulerAngle::Roll => self.roll = angle,
        }
    }
}

impl Default for AttitudeState {
    fn default() -> Self {
        Self::level()
    }
}

impl Display for AttitudeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ψ = {:.1}°, θ = {:.1}°, φ = {:.1}° ({})",
            self.yaw.get::<degree>(),
            self.pitch.get::<degree>(),
            self.roll.get::<degree>(),
            self.mode
        )
    }
}
