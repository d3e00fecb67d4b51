//! The earth, intermediate, and body reference frames.
//!
//! Each frame is a zero-sized marker type implementing [`ReferenceFrame`], declared with the
//! [`frame!`](crate::frame) macro. The markers only exist at the type level so that a
//! [`FrameTriad`] or [`Rotation`] can't be used as though it belonged to a different frame.

use crate::attitude::AttitudeState;
use crate::math::{EulerOrder, Rotation};
use crate::{UnitQuaternion, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uom::si::f64::Angle;
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies one of the visualization's reference frames.
///
/// While you _can_ implement this trait directly, prefer using [`frame!`](crate::frame).
pub trait ReferenceFrame {
    /// Human-readable name of the frame.
    const NAME: &'static str;

    /// Subscript used on the frame's axis labels (eg, the `b` in `x_b`).
    const SUBSCRIPT: &'static str;
}

/// Defines a new [`ReferenceFrame`] marker type.
///
/// ```rust
/// ypr_viz::frame! {
///     /// The frame of the wind tunnel's balance.
///     pub struct Balance named "balance" with subscript "w"
/// }
/// # use ypr_viz::ReferenceFrame;
/// assert_eq!(Balance::SUBSCRIPT, "w");
/// ```
#[macro_export]
macro_rules! frame {
    {
        $(#[$attr:meta])*
        $vis:vis struct $name:ident named $label:literal with subscript $subscript:literal
    } => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::ReferenceFrame for $name {
            const NAME: &'static str = $label;
            const SUBSCRIPT: &'static str = $subscript;
        }
    };
}

frame! {
    /// The fixed earth frame: forward, right, and down of an un-rotated aircraft.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Earth named "earth" with subscript "0"
}

frame! {
    /// The earth frame with only yaw applied.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Intermediate named "intermediate" with subscript "i"
}

frame! {
    /// The aircraft's body axes: yaw, then pitch, then roll.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Body named "body" with subscript "b"
}

/// Three mutually orthogonal unit vectors (forward, right, down) in scene space describing the
/// orientation of [`ReferenceFrame`] `In`.
#[derive(Debug)]
pub struct FrameTriad<In> {
    forward: Vector3,
    right: Vector3,
    down: Vector3,
    frame: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for FrameTriad<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for FrameTriad<In> {}

impl<In> PartialEq<Self> for FrameTriad<In> {
    fn eq(&self, other: &Self) -> bool {
        self.axes() == other.axes()
    }
}

impl FrameTriad<Earth> {
    /// The earth frame in scene space: forward is `-Z`, right is `+X`, and down is `-Y`.
    #[must_use]
    pub fn earth() -> Self {
        Self {
            forward: Vector3::new(0., 0., -1.),
            right: Vector3::new(1., 0., 0.),
            down: Vector3::new(0., -1., 0.),
            frame: PhantomData,
        }
    }

    /// Rotates the earth axes into frame `To`.
    #[must_use]
    pub fn rotated_into<To>(&self, rotation: &Rotation<Earth, To>) -> FrameTriad<To> {
        FrameTriad {
            forward: rotation.apply(&self.forward),
            right: rotation.apply(&self.right),
            down: rotation.apply(&self.down),
            frame: PhantomData,
        }
    }
}

impl<In> FrameTriad<In> {
    /// The `x` axis.
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.forward
    }

    /// The `y` axis.
    #[must_use]
    pub fn right(&self) -> Vector3 {
        self.right
    }

    /// The `z` axis.
    #[must_use]
    pub fn down(&self) -> Vector3 {
        self.down
    }

    /// `[x, y, z]`
    #[must_use]
    pub fn axes(&self) -> [Vector3; 3] {
        [self.forward, self.right, self.down]
    }

    /// Checks that all three axes are unit length and mutually orthogonal within `tolerance`.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let unit = self
            .axes()
            .iter()
            .all(|axis| (axis.norm() - 1.).abs() <= tolerance);
        let orthogonal = self.forward.dot(&self.right).abs() <= tolerance
            && self.forward.dot(&self.down).abs() <= tolerance
            && self.right.dot(&self.down).abs() <= tolerance;
        unit && orthogonal
    }
}

impl<In> Display for FrameTriad<In>
where
    In: ReferenceFrame,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sub = In::SUBSCRIPT;
        let [x, y, z] = self.axes();
        write!(
            f,
            "x_{sub} = ({:.3}, {:.3}, {:.3}), y_{sub} = ({:.3}, {:.3}, {:.3}), z_{sub} = ({:.3}, {:.3}, {:.3})",
            x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for FrameTriad<In> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Vector3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.axes()
            .iter()
            .zip(other.axes().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for FrameTriad<In> {
    fn default_max_relative() -> Self::Epsilon {
        Vector3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.axes()
            .iter()
            .zip(other.axes().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// The three reference frames for one attitude, plus the orientations body-fixed drawables need.
///
/// Recomputed from scratch every tick; nothing in here outlives the frame it was computed for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSet {
    pub earth: FrameTriad<Earth>,
    pub intermediate: FrameTriad<Intermediate>,
    pub body: FrameTriad<Body>,
    pub earth_to_intermediate: Rotation<Earth, Intermediate>,
    pub earth_to_body: Rotation<Earth, Body>,
    pitched_intermediate: UnitQuaternion,
}

impl FrameSet {
    /// Composes yaw about the vertical axis, then pitch about the resulting lateral axis, then
    /// roll about the resulting longitudinal axis.
    ///
    /// Total over all finite angles; nothing is clamped.
    #[must_use]
    pub fn compute(yaw: impl Into<Angle>, pitch: impl Into<Angle>, roll: impl Into<Angle>) -> Self {
        let (yaw, pitch, roll) = (yaw.into(), pitch.into(), roll.into());
        let earth_to_intermediate = Rotation::<Earth, Intermediate>::yaw(yaw);
        let earth_to_body = earth_to_intermediate
            .and_then(Rotation::<Intermediate, Body>::pitch_then_roll(pitch, roll));

        let earth = FrameTriad::earth();
        Self {
            intermediate: earth.rotated_into(&earth_to_intermediate),
            body: earth.rotated_into(&earth_to_body),
            earth,
            earth_to_intermediate,
            earth_to_body,
            pitched_intermediate: EulerOrder::Yxz.orientation(pitch, yaw, Angle::ZERO),
        }
    }

    #[must_use]
    pub fn from_attitude(attitude: &AttitudeState) -> Self {
        Self::compute(attitude.yaw, attitude.pitch, attitude.roll)
    }

    /// Orientation of everything fixed to the airframe: the aircraft mesh, the `x_b`, `y_b`, and
    /// `z_b` vectors, and the aircraft reference planes and rings.
    #[must_use]
    pub fn body_orientation(&self) -> UnitQuaternion {
        self.earth_to_body.to_quaternion()
    }

    /// Orientation of the `x_i` and `y_i` vectors (yaw only).
    #[must_use]
    pub fn intermediate_orientation(&self) -> UnitQuaternion {
        self.earth_to_intermediate.to_quaternion()
    }

    /// Orientation of the `z_i` vector: yaw and then pitch, but no roll.
    ///
    /// With yaw alone `z_i` would sit on top of `z_0`; this is the down axis that roll then turns
    /// about.
    #[must_use]
    pub fn intermediate_down_orientation(&self) -> UnitQuaternion {
        self.pitched_intermediate
    }
}

#[cfg(test)]
mod tests {
    use super::{Body, Earth, FrameSet, FrameTriad, Intermediate};
    use crate::math::Rotation;
    use crate::Vector3;
    use approx::assert_relative_eq;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use rstest::rstest;
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[derive(Clone, Copy, Debug)]
    struct Ypr {
        yaw: f64,
        pitch: f64,
        roll: f64,
    }

    impl Arbitrary for Ypr {
        fn arbitrary(g: &mut Gen) -> Self {
            // quickcheck will give us awkward f64 values -- we ignore those
            let mut angle = || loop {
                match f64::arbitrary(g) {
                    0. => break 0.,
                    f if f.is_normal() => break f.rem_euclid(360.) - 180.,
                    _ => {}
                }
            };
            Self {
                yaw: angle(),
                pitch: angle(),
                roll: angle(),
            }
        }
    }

    quickcheck! {
        fn every_triad_is_orthonormal(ypr: Ypr) -> bool {
            let frames = FrameSet::compute(d(ypr.yaw), d(ypr.pitch), d(ypr.roll));
            frames.earth.is_orthonormal(1e-6)
                && frames.intermediate.is_orthonormal(1e-6)
                && frames.body.is_orthonormal(1e-6)
        }

        fn triads_stay_right_handed(ypr: Ypr) -> bool {
            // forward x right = down
            let frames = FrameSet::compute(d(ypr.yaw), d(ypr.pitch), d(ypr.roll));
            let body = frames.body;
            (body.forward().cross(&body.right()) - body.down()).norm() < 1e-9
        }

        fn roll_never_moves_the_nose(ypr: Ypr) -> bool {
            let rolled = FrameSet::compute(d(ypr.yaw), d(ypr.pitch), d(ypr.roll));
            let level = FrameSet::compute(d(ypr.yaw), d(ypr.pitch), d(0.));
            (rolled.body.forward() - level.body.forward()).norm() < 1e-9
        }
    }

    #[test]
    fn all_frames_coincide_at_zero() {
        let frames = FrameSet::compute(d(0.), d(0.), d(0.));
        assert_eq!(frames.earth, FrameTriad::earth());
        assert_relative_eq!(frames.intermediate.forward(), frames.earth.forward());
        assert_relative_eq!(frames.intermediate.right(), frames.earth.right());
        assert_relative_eq!(frames.intermediate.down(), frames.earth.down());
        assert_relative_eq!(frames.body.forward(), frames.earth.forward());
        assert_relative_eq!(frames.body.right(), frames.earth.right());
        assert_relative_eq!(frames.body.down(), frames.earth.down());
    }

    #[rstest]
    #[case(25., -10., 40.)]
    #[case(-45., 45., -45.)]
    #[case(170., -80., 123.)]
    fn earth_never_moves(#[case] yaw: f64, #[case] pitch: f64, #[case] roll: f64) {
        assert_eq!(
            FrameSet::compute(d(yaw), d(pitch), d(roll)).earth,
            FrameTriad::earth()
        );
    }

    #[rstest]
    #[case(30., 10., -20.)]
    #[case(-12., 44., 3.)]
    fn intermediate_depends_on_yaw_only(#[case] yaw: f64, #[case] pitch: f64, #[case] roll: f64) {
        let frames = FrameSet::compute(d(yaw), d(pitch), d(roll));
        let yaw_only = FrameSet::compute(d(yaw), d(0.), d(0.));
        assert_relative_eq!(frames.intermediate, yaw_only.intermediate, epsilon = 1e-12);
        // yaw is about the vertical, so the intermediate down axis is still earth down
        assert_relative_eq!(
            frames.intermediate.down(),
            Vector3::new(0., -1., 0.),
            epsilon = 1e-12
        );
    }

    #[test]
    fn body_is_intermediate_pitched_then_rolled() {
        let frames = FrameSet::compute(d(30.), d(20.), d(10.));
        let intermediate_to_body = Rotation::<Intermediate, Body>::pitch_then_roll(d(20.), d(10.));
        let via_intermediate = frames.earth_to_intermediate.and_then(intermediate_to_body);
        assert_relative_eq!(
            FrameTriad::earth().rotated_into(&via_intermediate),
            frames.body,
            epsilon = 1e-12
        );
        assert_relative_eq!(frames.earth_to_body, via_intermediate, epsilon = 1e-12);
    }

    #[test]
    fn drawable_orientations() {
        let frames = FrameSet::compute(d(30.), d(20.), d(10.));
        let nose = Vector3::new(0., 0., -1.);
        let down = Vector3::new(0., -1., 0.);

        assert_relative_eq!(
            frames.body_orientation() * nose,
            frames.body.forward(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            frames.intermediate_orientation() * nose,
            frames.intermediate.forward(),
            epsilon = 1e-12
        );

        // z_i is the body down axis without the roll
        let unrolled = FrameSet::compute(d(30.), d(20.), d(0.));
        assert_relative_eq!(
            frames.intermediate_down_orientation() * down,
            unrolled.body.down(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn rotation_into_earth_is_identity() {
        let identity = Rotation::<Earth, Earth>::identity();
        assert_eq!(FrameTriad::earth().rotated_into(&identity), FrameTriad::earth());
    }

    #[test]
    fn triad_display_uses_frame_subscript() {
        insta::assert_snapshot!(
            FrameTriad::earth(),
            @"x_0 = (0.000, 0.000, -1.000), y_0 = (1.000, 0.000, 0.000), z_0 = (0.000, -1.000, 0.000)"
        );
    }
}
