//! Arcs that sweep out each Euler angle.
//!
//! Every angle is drawn as a flat ring sector in its own local XY plane, starting on local +X and
//! sweeping counter-clockwise by the (signed) angle. [`place`] then orients that sector so that it
//! starts on the axis the angle is measured from and ends on the axis it rotates to:
//!
//! | angle | from                    | to                      |
//! |-------|-------------------------|-------------------------|
//! | ψ     | `x_0`                   | `x_i`                   |
//! | θ     | `x_i`                   | `x_b`                   |
//! | φ     | `y_i` (pitched with θ)  | `y_b`                   |
//!
//! Ring-sector primitives in common renderers do not draw negative sweeps reliably. By default
//! every angle therefore gets a second, mirrored mesh built from the same sweep at a different
//! fixed orientation ([`ArcPolicy::MirroredPair`]), so that one of the two always shows the
//! correct wedge. Renderers that handle negative sweeps can use [`ArcPolicy::SingleSigned`]
//! instead, which draws one mesh with a non-negative sweep and flips it over for negative angles.

use crate::attitude::{AttitudeState, EulerAngle};
use crate::math::EulerOrder;
use crate::util::below_negative_deadband;
use crate::{Point3, UnitQuaternion, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};
use uom::si::angle::radian;
use uom::si::f64::Angle;
use uom::ConstZero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const ARC_INNER_RADIUS: f64 = 74.;
pub const ARC_OUTER_RADIUS: f64 = 79.;
pub const ARC_SEGMENTS: u32 = 64;

/// The shape of one angle arc: a ring sector with fixed radii, starting at 0.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcDescriptor {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub segments: u32,
    /// Radians; always 0.
    pub start: f64,
    /// Radians, signed.
    pub sweep: f64,
}

impl ArcDescriptor {
    /// The arc for `angle`, with the sign preserved.
    #[must_use]
    pub fn for_angle(angle: Angle) -> Self {
        Self {
            inner_radius: ARC_INNER_RADIUS,
            outer_radius: ARC_OUTER_RADIUS,
            segments: ARC_SEGMENTS,
            start: 0.,
            sweep: angle.get::<radian>(),
        }
    }

    /// Same arc, but with a non-negative sweep.
    #[must_use]
    pub fn unsigned(self) -> Self {
        Self {
            sweep: self.sweep.abs(),
            ..self
        }
    }

    /// Local-space direction of the edge the sweep ends on.
    #[must_use]
    pub fn end_direction(&self) -> Vector3 {
        let end = self.start + self.sweep;
        Vector3::new(end.cos(), end.sin(), 0.)
    }
}

/// Shorthand for [`ArcDescriptor::for_angle`].
#[must_use]
pub fn arc(angle: Angle) -> ArcDescriptor {
    ArcDescriptor::for_angle(angle)
}

/// How an angle's arc is turned into meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArcPolicy {
    /// Two meshes per angle sharing one signed sweep, at a primary and a mirror orientation.
    #[default]
    MirroredPair,
    /// One mesh per angle with sweep `|angle|`, flipped about its local X axis when negative.
    SingleSigned,
}

/// Where and how to draw the arc for one angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPlacement {
    pub descriptor: ArcDescriptor,
    pub primary: UnitQuaternion,
    /// Only present under [`ArcPolicy::MirroredPair`].
    pub mirror: Option<UnitQuaternion>,
}

impl ArcPlacement {
    /// Scene-space direction of the edge the primary mesh ends on.
    #[must_use]
    pub fn end_direction(&self) -> Vector3 {
        self.primary * self.descriptor.end_direction()
    }
}

fn rad(value: f64) -> Angle {
    Angle::new::<radian>(value)
}

fn half_turn_about_x() -> UnitQuaternion {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI)
}

/// The (primary, mirror) orientations of the mirrored pair for `which`.
fn mirrored_orientations(
    which: EulerAngle,
    attitude: &AttitudeState,
) -> (UnitQuaternion, UnitQuaternion) {
    let psi = attitude.yaw.get::<radian>();
    let theta = attitude.pitch.get::<radian>();
    let phi = attitude.roll.get::<radian>();
    let zero = Angle::ZERO;
    match which {
        EulerAngle::Yaw => (
            EulerOrder::Xyz.orientation(rad(-FRAC_PI_2), zero, rad(FRAC_PI_2)),
            EulerOrder::Xyz.orientation(rad(-FRAC_PI_2), zero, zero),
        ),
        EulerAngle::Pitch => (
            EulerOrder::Xyz.orientation(zero, rad(FRAC_PI_2 + psi), zero),
            EulerOrder::Xyz.orientation(zero, rad(FRAC_PI_2 + psi), rad(-FRAC_PI_2)),
        ),
        EulerAngle::Roll => (
            EulerOrder::Yxz.orientation(rad(-PI + theta), rad(psi), zero),
            EulerOrder::Yxz.orientation(rad(theta), rad(psi), rad(-FRAC_PI_2 - phi)),
        ),
    }
}

/// Computes the arc for one angle of `attitude`, and where to put it.
#[must_use]
pub fn place(which: EulerAngle, attitude: &AttitudeState, policy: ArcPolicy) -> ArcPlacement {
    let descriptor = arc(attitude.angle(which));
    let (primary, mirror) = mirrored_orientations(which, attitude);
    match policy {
        ArcPolicy::MirroredPair => ArcPlacement {
            descriptor,
            primary,
            mirror: Some(mirror),
        },
        ArcPolicy::SingleSigned => {
            let primary = if descriptor.sweep < 0. {
                primary * half_turn_about_x()
            } else {
                primary
            };
            ArcPlacement {
                descriptor: descriptor.unsigned(),
                primary,
                mirror: None,
            }
        }
    }
}

/// Orientation of the node that carries an angle's label and sign marker.
///
/// The anchor's local +Z (ψ, θ) or local +X (φ) bisects the arc, so a label offset along that axis
/// sits halfway along the sweep.
#[must_use]
pub fn label_anchor(which: EulerAngle, attitude: &AttitudeState) -> UnitQuaternion {
    let psi = attitude.yaw.get::<radian>();
    let theta = attitude.pitch.get::<radian>();
    let phi = attitude.roll.get::<radian>();
    let zero = Angle::ZERO;
    match which {
        EulerAngle::Yaw => EulerOrder::Yxz.orientation(zero, rad(PI + psi / 2.), zero),
        EulerAngle::Pitch => EulerOrder::Yxz.orientation(rad(-theta / 2.), rad(PI + psi), zero),
        EulerAngle::Roll => EulerOrder::Yxz.orientation(rad(theta), rad(psi), rad(-phi / 2.)),
    }
}

/// Whether the "(-)" marker next to an angle's label should show.
///
/// Only for clearly negative angles (below −3°) whose display is on.
#[must_use]
pub fn sign_marker_visible(angle: Angle, display: bool) -> bool {
    display && below_negative_deadband(angle)
}

/// Vertex and index buffers for one ring-sector mesh.
///
/// Laid out like a renderer's ring geometry with a single radial segment: the `segments + 1`
/// inner-radius vertices come first, followed by the `segments + 1` outer-radius vertices, and
/// each segment is two triangles. [`ArcGeometry::rebuild`] refills the buffers in place, so one
/// geometry per mesh lives for the whole session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArcGeometry {
    descriptor: Option<ArcDescriptor>,
    positions: Vec<Point3>,
    indices: Vec<u32>,
}

impl ArcGeometry {
    #[must_use]
    pub fn new(descriptor: &ArcDescriptor) -> Self {
        let mut geometry = Self::default();
        geometry.rebuild(descriptor);
        geometry
    }

    /// The descriptor the buffers were last built from.
    #[must_use]
    pub fn descriptor(&self) -> Option<&ArcDescriptor> {
        self.descriptor.as_ref()
    }

    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangle list into [`ArcGeometry::positions`].
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Replaces the geometry with `descriptor`'s, reusing the existing allocations.
    pub fn rebuild(&mut self, descriptor: &ArcDescriptor) {
        let segments = descriptor.segments.max(1);
        let radii = [descriptor.inner_radius, descriptor.outer_radius];

        self.positions.clear();
        self.positions.extend(radii.into_iter().flat_map(|radius| {
            (0..=segments).map(move |i| {
                let theta = descriptor.start + f64::from(i) / f64::from(segments) * descriptor.sweep;
                Point3::new(radius * theta.cos(), radius * theta.sin(), 0.)
            })
        }));

        if self.descriptor.map(|d| d.segments.max(1)) != Some(segments) {
            self.indices.clear();
            self.indices.extend((0..segments).flat_map(|i| {
                let (a, b, c, d) = (i, i + segments + 1, i + segments + 2, i + 1);
                [a, b, d, b, c, d]
            }));
        }

        self.descriptor = Some(*descriptor);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        arc, label_anchor, place, sign_marker_visible, ArcDescriptor, ArcGeometry, ArcPolicy,
        ARC_INNER_RADIUS, ARC_OUTER_RADIUS, ARC_SEGMENTS,
    };
    use crate::attitude::{AttitudeState, EulerAngle};
    use crate::frames::FrameSet;
    use crate::Vector3;
    use approx::assert_relative_eq;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use rstest::rstest;
    use std::f64::consts::PI;
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[derive(Clone, Copy, Debug)]
    struct Attitude(AttitudeState);

    impl Arbitrary for Attitude {
        fn arbitrary(g: &mut Gen) -> Self {
            // quickcheck will give us awkward f64 values -- we ignore those
            let mut angle = || f64::from(i32::arbitrary(g) % 9000) / 100.;
            Self(AttitudeState::from_degrees(angle(), angle(), angle()))
        }
    }

    #[rstest]
    #[case(20.)]
    #[case(-20.)]
    #[case(0.)]
    #[case(-0.5)]
    #[case(45.)]
    #[case(-170.)]
    fn sweep_is_angle_in_radians(#[case] degrees: f64) {
        let descriptor = arc(d(degrees));
        assert_relative_eq!(descriptor.sweep, degrees * PI / 180., max_relative = 1e-15);
        assert_eq!(descriptor.sweep < 0., degrees < 0.);
        assert_eq!(descriptor.start, 0.);
        assert_eq!(descriptor.inner_radius, ARC_INNER_RADIUS);
        assert_eq!(descriptor.outer_radius, ARC_OUTER_RADIUS);
        assert_eq!(descriptor.segments, ARC_SEGMENTS);
    }

    #[rstest]
    #[case(-5., true, true)]
    #[case(-2., true, false)]
    #[case(-5., false, false)]
    #[case(-3., true, false)]
    #[case(5., true, false)]
    #[case(0., true, false)]
    fn sign_marker(#[case] degrees: f64, #[case] display: bool, #[case] visible: bool) {
        assert_eq!(sign_marker_visible(d(degrees), display), visible);
    }

    fn axis_it_sweeps_to(which: EulerAngle, frames: &FrameSet) -> Vector3 {
        match which {
            EulerAngle::Yaw => frames.intermediate.forward(),
            EulerAngle::Pitch => frames.body.forward(),
            EulerAngle::Roll => frames.body.right(),
        }
    }

    quickcheck! {
        fn primary_arc_ends_on_the_rotated_axis(attitude: Attitude) -> bool {
            let frames = FrameSet::from_attitude(&attitude.0);
            EulerAngle::ALL.into_iter().all(|which| {
                let placement = place(which, &attitude.0, ArcPolicy::MirroredPair);
                (placement.end_direction() - axis_it_sweeps_to(which, &frames)).norm() < 1e-9
            })
        }

        fn single_signed_ends_where_mirrored_pair_does(attitude: Attitude) -> bool {
            EulerAngle::ALL.into_iter().all(|which| {
                let pair = place(which, &attitude.0, ArcPolicy::MirroredPair);
                let single = place(which, &attitude.0, ArcPolicy::SingleSigned);
                single.descriptor.sweep >= 0.
                    && (pair.end_direction() - single.end_direction()).norm() < 1e-9
            })
        }
    }

    #[test]
    fn only_the_mirrored_pair_has_a_mirror() {
        let attitude = AttitudeState::from_degrees(-20., 10., -30.);
        for which in EulerAngle::ALL {
            let pair = place(which, &attitude, ArcPolicy::MirroredPair);
            assert!(pair.mirror.is_some());
            // both meshes share the signed sweep
            assert_eq!(pair.descriptor, arc(attitude.angle(which)));

            let single = place(which, &attitude, ArcPolicy::SingleSigned);
            assert!(single.mirror.is_none());
            assert_eq!(single.descriptor, arc(attitude.angle(which)).unsigned());
        }
    }

    #[test]
    fn yaw_arc_lies_in_the_horizontal_plane() {
        let attitude = AttitudeState::from_degrees(35., 20., 10.);
        let placement = place(EulerAngle::Yaw, &attitude, ArcPolicy::MirroredPair);
        let normal = placement.primary * Vector3::z();
        assert_relative_eq!(normal.x.abs() + normal.z.abs(), 0., epsilon = 1e-12);
    }

    #[rstest]
    #[case(EulerAngle::Yaw, Vector3::z())]
    #[case(EulerAngle::Pitch, Vector3::z())]
    #[case(EulerAngle::Roll, Vector3::x())]
    fn label_anchor_bisects_the_arc(#[case] which: EulerAngle, #[case] local: Vector3) {
        let attitude = AttitudeState::from_degrees(30., -16., 24.);
        let mut halved = attitude;
        halved.set_angle(which, attitude.angle(which) / 2.);
        let bisector = place(which, &halved, ArcPolicy::MirroredPair).end_direction();

        assert_relative_eq!(label_anchor(which, &attitude) * local, bisector, epsilon = 1e-9);
    }

    #[test]
    fn geometry_layout() {
        let geometry = ArcGeometry::new(&arc(d(90.)));
        let segments = ARC_SEGMENTS as usize;
        assert_eq!(geometry.positions().len(), (segments + 1) * 2);
        assert_eq!(geometry.indices().len(), segments * 6);

        let inner_start = geometry.positions()[0];
        let inner_end = geometry.positions()[segments];
        let outer_start = geometry.positions()[segments + 1];
        let outer_end = geometry.positions()[2 * segments + 1];
        assert_relative_eq!(inner_start.coords, Vector3::new(74., 0., 0.), epsilon = 1e-12);
        assert_relative_eq!(inner_end.coords, Vector3::new(0., 74., 0.), epsilon = 1e-12);
        assert_relative_eq!(outer_start.coords, Vector3::new(79., 0., 0.), epsilon = 1e-12);
        assert_relative_eq!(outer_end.coords, Vector3::new(0., 79., 0.), epsilon = 1e-12);

        assert_eq!(&geometry.indices()[..6], &[0, 65, 1, 65, 66, 1]);
        let max_index = geometry.indices().iter().copied().max();
        assert_eq!(max_index, Some(2 * ARC_SEGMENTS + 1));
    }

    #[test]
    fn rebuild_reuses_buffers() {
        let mut geometry = ArcGeometry::new(&arc(d(20.)));
        let positions = geometry.positions().as_ptr();
        let indices = geometry.indices().as_ptr();

        for degrees in [-45., 0., 12.5, 45.] {
            let descriptor = arc(d(degrees));
            geometry.rebuild(&descriptor);
            assert_eq!(geometry.descriptor(), Some(&descriptor));
            assert_eq!(geometry.positions().as_ptr(), positions);
            assert_eq!(geometry.indices().as_ptr(), indices);
        }

        let end = geometry.positions()[ARC_SEGMENTS as usize];
        assert_relative_eq!(end.coords, arc(d(45.)).end_direction() * 74., epsilon = 1e-12);
    }

    #[test]
    fn rebuild_tracks_segment_count() {
        let mut geometry = ArcGeometry::new(&arc(d(20.)));
        geometry.rebuild(&ArcDescriptor {
            segments: 4,
            ..arc(d(20.))
        });
        assert_eq!(geometry.positions().len(), 10);
        assert_eq!(geometry.indices().len(), 24);
    }
}
