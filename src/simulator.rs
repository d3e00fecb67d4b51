//! Closed-form flight-mode animations.
//!
//! None of this integrates equations of motion. Each mode is a hand-picked curve of elapsed time
//! that looks like the real thing, and a particle drift that goes with it.
//!
//! | mode         | attitude (degrees)                               | cycle   |
//! |--------------|--------------------------------------------------|---------|
//! | none         | untouched                                        | never   |
//! | phugoid      | θ = 5·sin(0.5t)                                  | never   |
//! | short period | θ = 35·sin(1.5t)·0.4^t                           | t > 5 s |
//! | roll         | φ = 0 for t < 2, else 15·ln(t − 1)                 | t > 8 s |
//! | spiral       | φ = 5·(t − 2)·1.2^(t − 2) for t > 2, else 0        | t > 8 s |
//! | dutch roll   | φ = 15·sin(0.5t), ψ = 15·sin(0.5(t − π/2))        | never   |
//!
//! Angles a mode does not mention are forced to zero on every tick while it is active.

use crate::attitude::{AttitudeState, FlightMode};
use crate::particles::{ParticleField, ParticleStep};
use rand::Rng;
use std::f64::consts::FRAC_PI_2;
use tracing::debug;
use uom::si::angle::degree;
use uom::si::f64::{Angle, Time};
use uom::si::time::second;
use uom::ConstZero;

/// Particle Z advance per tick for every mode except the phugoid.
pub const CRUISE_STEP: f64 = 2.;

/// Particles at or past this depth wrap around when no mode is active.
pub const IDLE_WRAP_DEPTH: f64 = 150.;

/// Particles at or past this depth wrap around while a mode is active.
pub const MODE_WRAP_DEPTH: f64 = 120.;

/// Elapsed time since the clock was last (re)started.
///
/// The clock only moves forward; [`ModeClock::restart`] is the only way back to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeClock {
    elapsed: Time,
}

impl Default for ModeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Time::ZERO,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Time {
        self.elapsed
    }

    /// Non-positive and non-finite steps are ignored.
    pub fn advance(&mut self, dt: Time) {
        if dt.get::<second>() > 0. && dt.is_finite() {
            self.elapsed += dt;
        }
    }

    pub fn restart(&mut self) {
        self.elapsed = Time::ZERO;
    }
}

/// Attitude a mode prescribes at elapsed time `t`, as `(yaw, pitch, roll)`.
///
/// Returns `None` for [`FlightMode::None`], which leaves attitude alone.
#[must_use]
pub fn attitude_at(mode: FlightMode, t: Time) -> Option<(Angle, Angle, Angle)> {
    let t = t.get::<second>();
    let (yaw, pitch, roll) = match mode {
        FlightMode::None => return None,
        FlightMode::Phugoid => (0., 5. * (0.5 * t).sin(), 0.),
        FlightMode::ShortPeriod => (0., 35. * (1.5 * t).sin() * 0.4f64.powf(t), 0.),
        FlightMode::Roll => {
            let roll = if t < 2. { 0. } else { 15. * (t - 1.).ln() };
            (0., 0., roll)
        }
        FlightMode::Spiral => {
            let roll = if t > 2. {
                5. * (t - 2.) * 1.2f64.powf(t - 2.)
            } else {
                0.
            };
            (0., 0., roll)
        }
        FlightMode::DutchRoll => (
            15. * (0.5 * (t - FRAC_PI_2)).sin(),
            0.,
            15. * (0.5 * t).sin(),
        ),
    };
    Some((
        Angle::new::<degree>(yaw),
        Angle::new::<degree>(pitch),
        Angle::new::<degree>(roll),
    ))
}

/// How far particles move in one tick of `mode` at elapsed time `t`.
#[must_use]
pub fn particle_step(mode: FlightMode, t: Time) -> ParticleStep {
    match mode {
        FlightMode::Phugoid => {
            let t = t.get::<second>();
            ParticleStep {
                dz: 1.5 + 0.8 * (0.5 * t).cos(),
                dy: -0.3 * (0.5 * t).sin(),
            }
        }
        _ => ParticleStep::along(CRUISE_STEP),
    }
}

/// Depth at which particles wrap back behind the aircraft.
#[must_use]
pub fn wrap_depth(mode: FlightMode) -> f64 {
    if mode.is_active() {
        MODE_WRAP_DEPTH
    } else {
        IDLE_WRAP_DEPTH
    }
}

/// The elapsed time past which a mode restarts its clock, if it ever does.
#[must_use]
pub fn cycle_length(mode: FlightMode) -> Option<Time> {
    match mode {
        FlightMode::ShortPeriod => Some(Time::new::<second>(5.)),
        FlightMode::Roll | FlightMode::Spiral => Some(Time::new::<second>(8.)),
        FlightMode::None | FlightMode::Phugoid | FlightMode::DutchRoll => None,
    }
}

/// Drives [`AttitudeState`] and the [`ParticleField`] from the mode clock.
///
/// Switching modes never touches the clock. The clock keeps running while no mode is active, so
/// a mode picked after a while starts wherever the clock is and only falls back to zero at the
/// end of its first cycle (for the modes that have one).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlightModeSimulator {
    clock: ModeClock,
}

impl FlightModeSimulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clock(&self) -> &ModeClock {
        &self.clock
    }

    /// Advances the clock by `dt` and applies the active mode.
    ///
    /// Attitude and particle motion use the clock reading _before_ any cycle restart this tick.
    /// `particles` is `None` when the airflow field is not part of the scene.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: Time,
        attitude: &mut AttitudeState,
        particles: Option<&mut ParticleField>,
        rng: &mut R,
    ) {
        self.clock.advance(dt);
        let mode = attitude.mode;
        let t = self.clock.elapsed();

        if let Some((yaw, pitch, roll)) = attitude_at(mode, t) {
            attitude.yaw = yaw;
            attitude.pitch = pitch;
            attitude.roll = roll;
        }

        if let Some(particles) = particles {
            let reseeded = particles.advance(particle_step(mode, t), wrap_depth(mode), rng);
            if reseeded > 0 {
                debug!(reseeded, "airflow particles wrapped");
            }
        }

        if let Some(cycle) = cycle_length(mode) {
            if t > cycle {
                debug!(%mode, t = t.get::<second>(), "flight mode cycle restarted");
                self.clock.restart();
            }
        }
    }
}
