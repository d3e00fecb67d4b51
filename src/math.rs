//! Rotations between reference frames, expressed in scene space.
//!
//! Scene space is the renderer's right-handed, Y-up space. The earth frame's forward axis points
//! along negative Z, its right axis along positive X, and its down axis along negative Y (see
//! [`FrameTriad::earth`](crate::FrameTriad::earth)). All rotations in this module act on vectors
//! expressed in scene space.
//!
//! The main type is [`Rotation`], a type-safe wrapper around a unit quaternion that remembers which
//! [`ReferenceFrame`] it rotates from and which it rotates into. Rotations chain with
//! [`Rotation::and_then`] (or `*`) only when the frames line up, so it is impossible to, say,
//! apply a pitch-then-roll rotation straight to the earth frame.
//!
//! Drawables that are oriented the way the renderer expects (three angles and an application
//! order) go through [`EulerOrder`] instead.

use crate::frames::{Body, Earth, Intermediate, ReferenceFrame};
use crate::{UnitQuaternion, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::Mul;
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defines a rotation that carries the axes of [`ReferenceFrame`] `From` onto the axes of
/// [`ReferenceFrame`] `To`.
///
/// Rotations are _intrinsic_: chaining `a.and_then(b)` applies `b` about the axes that `a`
/// produced, which is exactly how yaw, pitch, and roll compose. Mathematically that's the
/// quaternion product `a * b`.
///
/// There are generally two ways to get one:
///
/// 1. from [`FrameSet::compute`](crate::FrameSet::compute), which derives every rotation the
///    visualization needs from an attitude; or
/// 2. from [`Rotation::tait_bryan_builder`], which enforces yaw → pitch → roll at compile time.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require From/To: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rotation<From, To> {
    pub(crate) inner: UnitQuaternion,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) from: PhantomData<From>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) to: PhantomData<To>,
}

// manual impls of Clone and Copy to avoid requiring From/To: Copy + Clone
impl<From, To> Clone for Rotation<From, To> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<From, To> Copy for Rotation<From, To> {}

impl<From, To> PartialEq<Self> for Rotation<From, To> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<From, To> Display for Rotation<From, To>
where
    From: ReferenceFrame,
    To: ReferenceFrame,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let q = self.inner.quaternion();
        write!(
            f,
            "{} -> {}: w={} i={} j={} k={}",
            From::NAME,
            To::NAME,
            q.w,
            q.i,
            q.j,
            q.k
        )
    }
}

impl<From, To> Rotation<From, To> {
    pub(crate) fn from_inner(inner: UnitQuaternion) -> Self {
        Self {
            inner,
            from: PhantomData::<From>,
            to: PhantomData::<To>,
        }
    }

    pub(crate) fn identity() -> Self {
        Self::from_inner(UnitQuaternion::identity())
    }

    /// Returns the rotation that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Rotation<To, From> {
        Rotation::from_inner(self.inner.inverse())
    }

    /// Chains `rhs` after `self`, with `rhs` applied about the axes `self` produced.
    #[must_use]
    pub fn and_then<NewTo>(self, rhs: Rotation<To, NewTo>) -> Rotation<From, NewTo> {
        Rotation::from_inner(self.inner * rhs.inner)
    }

    /// Rotates a scene-space vector.
    #[must_use]
    pub fn apply(&self, vector: &Vector3) -> Vector3 {
        self.inner * vector
    }

    /// Returns the scene-space orientation as a unit quaternion.
    ///
    /// This is what a renderer wants when orienting a node whose rest pose is aligned with `From`.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion {
        self.inner
    }
}

impl Rotation<Earth, Intermediate> {
    /// The yaw-only rotation: about the vertical (scene Y) axis.
    #[must_use]
    pub fn yaw(yaw: impl Into<Angle>) -> Self {
        Self::from_inner(UnitQuaternion::from_axis_angle(
            &Vector3::y_axis(),
            yaw.into().get::<radian>(),
        ))
    }
}

impl Rotation<Intermediate, Body> {
    /// Pitch about the intermediate lateral axis (scene X), then roll about the resulting
    /// longitudinal axis (scene Z).
    ///
    /// Roll is applied with its sign inverted since scene Z points _backwards_ along the fuselage.
    /// Positive roll drops the right wing.
    #[must_use]
    pub fn pitch_then_roll(pitch: impl Into<Angle>, roll: impl Into<Angle>) -> Self {
        let pitch =
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch.into().get::<radian>());
        let roll =
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -roll.into().get::<radian>());
        Self::from_inner(pitch * roll)
    }
}

impl Rotation<Earth, Body> {
    /// Provides a type-safe builder for the full yaw → pitch → roll attitude rotation.
    ///
    /// ```rust
    /// use ypr_viz::{frames::{Body, Earth}, math::Rotation};
    /// use uom::si::{f64::Angle, angle::degree};
    ///
    /// let attitude = Rotation::<Earth, Body>::tait_bryan_builder()
    ///     .yaw(Angle::new::<degree>(20.0))
    ///     .pitch(Angle::new::<degree>(-10.0))
    ///     .roll(Angle::new::<degree>(5.0))
    ///     .build();
    /// ```
    ///
    /// Skipping or reordering angles does not compile:
    ///
    /// ```compile_fail
    /// # use ypr_viz::{frames::{Body, Earth}, math::Rotation};
    /// # use uom::si::{f64::Angle, angle::degree};
    /// let attitude = Rotation::<Earth, Body>::tait_bryan_builder()
    ///     .pitch(Angle::new::<degree>(-10.0))
    ///     .yaw(Angle::new::<degree>(20.0))
    ///     .roll(Angle::new::<degree>(5.0))
    ///     .build();
    /// ```
    pub fn tait_bryan_builder(
    ) -> tait_bryan_builder::TaitBryanBuilder<tait_bryan_builder::NeedsYaw> {
        tait_bryan_builder::TaitBryanBuilder::new()
    }
}

impl<From, Over, To> Mul<Rotation<Over, To>> for Rotation<From, Over> {
    type Output = Rotation<From, To>;

    fn mul(self, rhs: Rotation<Over, To>) -> Self::Output {
        self.and_then(rhs)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<From, To> AbsDiffEq<Self> for Rotation<From, To> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        UnitQuaternion::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // q and -q are the same rotation
        self.inner.abs_diff_eq(&other.inner, epsilon)
            || self
                .inner
                .into_inner()
                .abs_diff_eq(&-other.inner.into_inner(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<From, To> RelativeEq for Rotation<From, To> {
    fn default_max_relative() -> Self::Epsilon {
        UnitQuaternion::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
            || self.inner.into_inner().relative_eq(
                &-other.inner.into_inner(),
                epsilon,
                max_relative,
            )
    }
}

/// The order in which the renderer applies a node's three Euler angles.
///
/// Renderer Euler angles are intrinsic and named after the _first_ rotation applied, so
/// [`EulerOrder::Xyz`] is the matrix product `Rx · Ry · Rz` and [`EulerOrder::Yxz`] is
/// `Ry · Rx · Rz`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EulerOrder {
    Xyz,
    Yxz,
}

impl EulerOrder {
    /// Builds the orientation of a node whose Euler angles about scene X, Y, and Z are `x`, `y`,
    /// and `z`.
    #[must_use]
    pub fn orientation(self, x: Angle, y: Angle, z: Angle) -> UnitQuaternion {
        let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x.get::<radian>());
        let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y.get::<radian>());
        let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z.get::<radian>());
        match self {
            EulerOrder::Xyz => rx * ry * rz,
            EulerOrder::Yxz => ry * rx * rz,
        }
    }
}

pub mod tait_bryan_builder {
    use super::*;
    use uom::ConstZero;

    /// State marker indicating yaw angle is needed next
    pub struct NeedsYaw;

    /// State marker indicating pitch angle is needed next
    pub struct NeedsPitch;

    /// State marker indicating roll angle is needed next
    pub struct NeedsRoll;

    /// State marker indicating all angles are set and ready to build
    pub struct Complete;

    /// Builder for the earth-to-body attitude rotation with compile-time ordering enforcement.
    ///
    /// Angles must be provided in the intrinsic order the visualization uses: yaw (about the
    /// vertical axis), then pitch (about the lateral axis after yaw), then roll (about the
    /// longitudinal axis after yaw and pitch).
    pub struct TaitBryanBuilder<State> {
        yaw: Angle,
        pitch: Angle,
        roll: Angle,
        _state: PhantomData<State>,
    }

    impl<State> Clone for TaitBryanBuilder<State> {
        fn clone(&self) -> Self {
            *self
        }
    }

    impl<State> Copy for TaitBryanBuilder<State> {}

    impl std::fmt::Debug for TaitBryanBuilder<NeedsYaw> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TaitBryanBuilder<NeedsYaw>").finish()
        }
    }

    impl std::fmt::Debug for TaitBryanBuilder<NeedsPitch> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TaitBryanBuilder<NeedsPitch>")
                .field("yaw", &self.yaw)
                .finish()
        }
    }

    impl std::fmt::Debug for TaitBryanBuilder<NeedsRoll> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TaitBryanBuilder<NeedsRoll>")
                .field("yaw", &self.yaw)
                .field("pitch", &self.pitch)
                .finish()
        }
    }

    impl std::fmt::Debug for TaitBryanBuilder<Complete> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TaitBryanBuilder<Complete>")
                .field("yaw", &self.yaw)
                .field("pitch", &self.pitch)
                .field("roll", &self.roll)
                .finish()
        }
    }

    impl<State> TaitBryanBuilder<State> {
        fn into_state<Next>(self) -> TaitBryanBuilder<Next> {
            TaitBryanBuilder {
                yaw: self.yaw,
                pitch: self.pitch,
                roll: self.roll,
                _state: PhantomData,
            }
        }
    }

    impl TaitBryanBuilder<NeedsYaw> {
        pub(crate) fn new() -> Self {
            Self {
                yaw: Angle::ZERO,
                pitch: Angle::ZERO,
                roll: Angle::ZERO,
                _state: PhantomData,
            }
        }

        /// Sets the yaw angle (rotation about the vertical axis).
        pub fn yaw(mut self, angle: impl Into<Angle>) -> TaitBryanBuilder<NeedsPitch> {
            self.yaw = angle.into();
            self.into_state()
        }
    }

    impl TaitBryanBuilder<NeedsPitch> {
        /// Sets the pitch angle (rotation about the lateral axis after yaw is applied).
        ///
        /// Positive pitch raises the nose.
        pub fn pitch(mut self, angle: impl Into<Angle>) -> TaitBryanBuilder<NeedsRoll> {
            self.pitch = angle.into();
            self.into_state()
        }
    }

    impl TaitBryanBuilder<NeedsRoll> {
        /// Sets the roll angle (rotation about the longitudinal axis after yaw and pitch).
        ///
        /// Positive roll drops the right wing.
        pub fn roll(mut self, angle: impl Into<Angle>) -> TaitBryanBuilder<Complete> {
            self.roll = angle.into();
            self.into_state()
        }
    }

    impl TaitBryanBuilder<Complete> {
        /// Builds the earth-to-body [`Rotation`].
        pub fn build(self) -> Rotation<Earth, Body> {
            Rotation::<Earth, Intermediate>::yaw(self.yaw)
                .and_then(Rotation::<Intermediate, Body>::pitch_then_roll(
                    self.pitch, self.roll,
                ))
        }
    }
}
