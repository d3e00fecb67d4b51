//! This library computes everything needed to visualize aircraft attitude: the earth,
//! intermediate, and body reference frames produced by yaw, pitch, and roll, the arcs that sweep
//! out each of those angles, what should (and should not) be on screen, and a handful of
//! illustrative flight-mode animations that drive the attitude and an airflow particle field over
//! time.
//!
//! The library does no rendering of its own. A host owns the scene, the aircraft asset, and the
//! parameter panel; it feeds panel changes into an [`Engine`] with [`Engine::apply`], calls
//! [`Engine::tick`] once per animation frame, and hands the resulting [`FrameSnapshot`] to its
//! renderer through the [`RenderBridge`] trait.
//!
//! The attitude math is also usable on its own. [`FrameSet::compute`] turns a set of Euler angles
//! into the three reference frames, and [`math::Rotation`] keeps track (at the type level) of which
//! frames a rotation goes between:
//!
//! ```
//! use approx::assert_relative_eq;
//! use uom::si::{angle::degree, f64::Angle};
//! use ypr_viz::{frames::{Body, Earth}, math::Rotation, FrameTriad};
//!
//! // yaw first, then pitch, then roll; calling these out of order fails to compile.
//! let earth_to_body = Rotation::<Earth, Body>::tait_bryan_builder()
//!     .yaw(Angle::new::<degree>(30.))
//!     .pitch(Angle::new::<degree>(10.))
//!     .roll(Angle::new::<degree>(-5.))
//!     .build();
//!
//! let body = FrameTriad::earth().rotated_into(&earth_to_body);
//! assert!(body.is_orthonormal(1e-9));
//!
//! // roll never moves the nose, so the forward axis only depends on yaw and pitch.
//! let no_roll = Rotation::<Earth, Body>::tait_bryan_builder()
//!     .yaw(Angle::new::<degree>(30.))
//!     .pitch(Angle::new::<degree>(10.))
//!     .roll(Angle::new::<degree>(0.))
//!     .build();
//! assert_relative_eq!(
//!     body.forward(),
//!     FrameTriad::earth().rotated_into(&no_roll).forward(),
//!     epsilon = 1e-12
//! );
//! ```
//!
//! Driving a full engine looks like this:
//!
//! ```
//! use uom::si::{f64::Time, time::second};
//! use ypr_viz::{Engine, EngineConfig, FlightMode, NoBodyMesh, ParamUpdate};
//!
//! let mut engine = Engine::<NoBodyMesh>::new(EngineConfig::default());
//! engine.apply(ParamUpdate::Mode(FlightMode::DutchRoll));
//!
//! let snapshot = engine.tick(Time::new::<second>(1. / 60.));
//! assert_eq!(snapshot.attitude().mode, FlightMode::DutchRoll);
//! assert_eq!(snapshot.particles().len(), 100);
//! ```

#[macro_use]
pub mod frames;

mod attitude;
mod camera;
mod config;
mod engine;
mod error;
mod particles;
mod util;

pub mod arcs;
pub mod math;
pub mod simulator;
pub mod visibility;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

pub use arcs::{ArcGeometry, ArcPolicy};
pub use attitude::{AttitudeState, EulerAngle, FlightMode};
pub use camera::CameraPreset;
pub use config::{AttitudeConfig, EngineConfig, Features};
pub use engine::{
    ArcView, BodyMesh, Engine, FrameSnapshot, NoBodyMesh, ParamUpdate, RenderBridge,
};
pub use error::{
    ConfigError, ModelLoadError, ParseCameraPresetError, ParseFlightModeError, ParseToggleError,
};
pub use frames::{FrameSet, FrameTriad, ReferenceFrame};
pub use particles::{Particle, ParticleField, ParticleStep};
pub use simulator::FlightModeSimulator;
pub use util::DEADBAND_DEGREES;
pub use visibility::{DisplayToggles, Drawable, Toggle, VisibilitySet};
