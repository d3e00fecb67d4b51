//! What is on screen.
//!
//! Most drawables simply follow their panel toggle. Labels are the exception: a label whose
//! vector collapses onto another one near zero angles would only add clutter, so labels are
//! hidden while the angles they depend on are inside the ±3° deadband (see [`compute`]).

use crate::arcs::{sign_marker_visible, ArcPolicy};
use crate::attitude::{AttitudeState, EulerAngle};
use crate::config::Features;
use crate::error::ParseToggleError;
use crate::util::within_deadband;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! count {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

/// Declares [`DisplayToggles`] and [`Toggle`] from one `Variant => field = default` list.
///
/// The field name doubles as the toggle's panel name.
macro_rules! display_toggles {
    ($($variant:ident => $field:ident = $default:literal,)+) => {
        /// The panel's visibility switches, one per named element.
        ///
        /// Field names are the names the panel uses (and that [`Toggle`] parses).
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        pub struct DisplayToggles {
            $(pub $field: bool,)+
        }

        impl Default for DisplayToggles {
            /// All vectors and angles on; planes, rings, and airflow off.
            fn default() -> Self {
                Self {
                    $($field: $default,)+
                }
            }
        }

        impl DisplayToggles {
            #[must_use]
            pub fn get(&self, toggle: Toggle) -> bool {
                match toggle {
                    $(Toggle::$variant => self.$field,)+
                }
            }

            pub fn set(&mut self, toggle: Toggle, on: bool) {
                let flag = match toggle {
                    $(Toggle::$variant => &mut self.$field,)+
                };
                *flag = on;
            }
        }

        /// Names one of the [`DisplayToggles`].
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Toggle {
            $($variant,)+
        }

        impl Toggle {
            pub const ALL: [Toggle; count!($($variant)+)] = [$(Toggle::$variant,)+];

            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Toggle::$variant => stringify!($field),)+
                }
            }
        }
    };
}

display_toggles! {
    EarthXy => earth_xy = false,
    EarthXz => earth_xz = false,
    EarthYz => earth_yz = false,
    AcXy => ac_xy = false,
    AcXz => ac_xz = false,
    AcYz => ac_yz = false,
    X0 => x_0 = true,
    Y0 => y_0 = true,
    Z0 => z_0 = true,
    Xi => x_i = true,
    Yi => y_i = true,
    Zi => z_i = true,
    Xb => x_b = true,
    Yb => y_b = true,
    Zb => z_b = true,
    AcXyRing => ac_xy_ring = false,
    AcXzRing => ac_xz_ring = false,
    AcYzRing => ac_yz_ring = false,
    EarthXyRing => earth_xy_ring = false,
    EarthXzRing => earth_xz_ring = false,
    EarthYzRing => earth_yz_ring = false,
    Psi => psi = true,
    Theta => theta = true,
    Phi => phi = true,
    Airflow => airflow = false,
}

impl DisplayToggles {
    /// The display switch for one angle's arcs, label, and sign marker.
    #[must_use]
    pub fn angle(&self, which: EulerAngle) -> bool {
        self.get(Toggle::for_angle(which))
    }
}

impl Toggle {
    #[must_use]
    pub fn for_angle(which: EulerAngle) -> Self {
        match which {
            EulerAngle::Yaw => Toggle::Psi,
            EulerAngle::Pitch => Toggle::Theta,
            EulerAngle::Roll => Toggle::Phi,
        }
    }
}

impl Display for Toggle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Toggle {
    type Err = ParseToggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Toggle::ALL
            .into_iter()
            .find(|toggle| toggle.name() == name)
            .ok_or_else(|| ParseToggleError(s.to_owned()))
    }
}

/// Everything whose visibility the engine decides.
///
/// The aircraft mesh is not in here; it is shown whenever it has loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Drawable {
    EarthXyGrid,
    EarthXzGrid,
    EarthYzGrid,
    AircraftXyGrid,
    AircraftXzGrid,
    AircraftYzGrid,
    EarthXyRing,
    EarthXzRing,
    EarthYzRing,
    AircraftXyRing,
    AircraftXzRing,
    AircraftYzRing,
    X0,
    Y0,
    Z0,
    Xi,
    Yi,
    Zi,
    Xb,
    Yb,
    Zb,
    X0Label,
    Y0Label,
    Z0Label,
    XiLabel,
    YiLabel,
    ZiLabel,
    XbLabel,
    YbLabel,
    ZbLabel,
    PsiArc,
    PsiMirrorArc,
    ThetaArc,
    ThetaMirrorArc,
    PhiArc,
    PhiMirrorArc,
    PsiLabel,
    ThetaLabel,
    PhiLabel,
    PsiSignMarker,
    ThetaSignMarker,
    PhiSignMarker,
    Airflow,
}

impl Drawable {
    pub const COUNT: usize = 43;

    pub const ALL: [Drawable; Drawable::COUNT] = [
        Drawable::EarthXyGrid,
        Drawable::EarthXzGrid,
        Drawable::EarthYzGrid,
        Drawable::AircraftXyGrid,
        Drawable::AircraftXzGrid,
        Drawable::AircraftYzGrid,
        Drawable::EarthXyRing,
        Drawable::EarthXzRing,
        Drawable::EarthYzRing,
        Drawable::AircraftXyRing,
        Drawable::AircraftXzRing,
        Drawable::AircraftYzRing,
        Drawable::X0,
        Drawable::Y0,
        Drawable::Z0,
        Drawable::Xi,
        Drawable::Yi,
        Drawable::Zi,
        Drawable::Xb,
        Drawable::Yb,
        Drawable::Zb,
        Drawable::X0Label,
        Drawable::Y0Label,
        Drawable::Z0Label,
        Drawable::XiLabel,
        Drawable::YiLabel,
        Drawable::ZiLabel,
        Drawable::XbLabel,
        Drawable::YbLabel,
        Drawable::ZbLabel,
        Drawable::PsiArc,
        Drawable::PsiMirrorArc,
        Drawable::ThetaArc,
        Drawable::ThetaMirrorArc,
        Drawable::PhiArc,
        Drawable::PhiMirrorArc,
        Drawable::PsiLabel,
        Drawable::ThetaLabel,
        Drawable::PhiLabel,
        Drawable::PsiSignMarker,
        Drawable::ThetaSignMarker,
        Drawable::PhiSignMarker,
        Drawable::Airflow,
    ];

    fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn arc(which: EulerAngle) -> Self {
        match which {
            EulerAngle::Yaw => Drawable::PsiArc,
            EulerAngle::Pitch => Drawable::ThetaArc,
            EulerAngle::Roll => Drawable::PhiArc,
        }
    }

    #[must_use]
    pub fn mirror_arc(which: EulerAngle) -> Self {
        match which {
            EulerAngle::Yaw => Drawable::PsiMirrorArc,
            EulerAngle::Pitch => Drawable::ThetaMirrorArc,
            EulerAngle::Roll => Drawable::PhiMirrorArc,
        }
    }

    #[must_use]
    pub fn angle_label(which: EulerAngle) -> Self {
        match which {
            EulerAngle::Yaw => Drawable::PsiLabel,
            EulerAngle::Pitch => Drawable::ThetaLabel,
            EulerAngle::Roll => Drawable::PhiLabel,
        }
    }

    #[must_use]
    pub fn sign_marker(which: EulerAngle) -> Self {
        match which {
            EulerAngle::Yaw => Drawable::PsiSignMarker,
            EulerAngle::Pitch => Drawable::ThetaSignMarker,
            EulerAngle::Roll => Drawable::PhiSignMarker,
        }
    }
}

/// One visibility decision per [`Drawable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisibilitySet {
    visible: [bool; Drawable::COUNT],
}

impl VisibilitySet {
    #[must_use]
    pub fn is_visible(&self, drawable: Drawable) -> bool {
        self.visible[drawable.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Drawable, bool)> + '_ {
        Drawable::ALL
            .into_iter()
            .map(|drawable| (drawable, self.is_visible(drawable)))
    }

    fn set(&mut self, drawable: Drawable, visible: bool) {
        self.visible[drawable.index()] = visible;
    }
}

/// Decides visibility for every drawable.
///
/// With `|a| < 3°` read as "a is about zero":
///
/// - `x_0`, `y_0`, `z_0` labels hide when _both_ angles they depend on are about zero
///   (ψ and θ, ψ and φ, θ and φ respectively).
/// - `x_i`, `y_i`, `z_i` labels hide when _either_ of those same pairs is about zero.
/// - ψ, θ, φ labels hide when their own angle is about zero.
/// - every other label, vector, arc, ring and grid follows its toggle, and so do the labels
///   above whenever they are not hidden.
/// - a sign marker shows for an angle below −3° whose display is on, if `features` has them.
/// - mirror arcs only show under [`ArcPolicy::MirroredPair`].
/// - airflow needs both its toggle and the `airflow` feature.
#[must_use]
pub fn compute(
    attitude: &AttitudeState,
    toggles: &DisplayToggles,
    features: &Features,
    policy: ArcPolicy,
) -> VisibilitySet {
    let mut set = VisibilitySet {
        visible: [false; Drawable::COUNT],
    };
    let yaw = within_deadband(attitude.yaw);
    let pitch = within_deadband(attitude.pitch);
    let roll = within_deadband(attitude.roll);

    set.set(Drawable::EarthXyGrid, toggles.earth_xy);
    set.set(Drawable::EarthXzGrid, toggles.earth_xz);
    set.set(Drawable::EarthYzGrid, toggles.earth_yz);
    set.set(Drawable::AircraftXyGrid, toggles.ac_xy);
    set.set(Drawable::AircraftXzGrid, toggles.ac_xz);
    set.set(Drawable::AircraftYzGrid, toggles.ac_yz);

    set.set(Drawable::EarthXyRing, toggles.earth_xy_ring);
    set.set(Drawable::EarthXzRing, toggles.earth_xz_ring);
    set.set(Drawable::EarthYzRing, toggles.earth_yz_ring);
    set.set(Drawable::AircraftXyRing, toggles.ac_xy_ring);
    set.set(Drawable::AircraftXzRing, toggles.ac_xz_ring);
    set.set(Drawable::AircraftYzRing, toggles.ac_yz_ring);

    set.set(Drawable::X0, toggles.x_0);
    set.set(Drawable::Y0, toggles.y_0);
    set.set(Drawable::Z0, toggles.z_0);
    set.set(Drawable::Xi, toggles.x_i);
    set.set(Drawable::Yi, toggles.y_i);
    set.set(Drawable::Zi, toggles.z_i);
    set.set(Drawable::Xb, toggles.x_b);
    set.set(Drawable::Yb, toggles.y_b);
    set.set(Drawable::Zb, toggles.z_b);

    set.set(Drawable::X0Label, toggles.x_0 && !(yaw && pitch));
    set.set(Drawable::Y0Label, toggles.y_0 && !(yaw && roll));
    set.set(Drawable::Z0Label, toggles.z_0 && !(pitch && roll));
    set.set(Drawable::XiLabel, toggles.x_i && !(yaw || pitch));
    set.set(Drawable::YiLabel, toggles.y_i && !(yaw || roll));
    set.set(Drawable::ZiLabel, toggles.z_i && !(pitch || roll));
    set.set(Drawable::XbLabel, toggles.x_b);
    set.set(Drawable::YbLabel, toggles.y_b);
    set.set(Drawable::ZbLabel, toggles.z_b);

    for which in EulerAngle::ALL {
        let display = toggles.angle(which);
        let angle = attitude.angle(which);
        set.set(Drawable::arc(which), display);
        set.set(
            Drawable::mirror_arc(which),
            display && policy == ArcPolicy::MirroredPair,
        );
        set.set(
            Drawable::angle_label(which),
            display && !within_deadband(angle),
        );
        set.set(
            Drawable::sign_marker(which),
            features.extended_sign_markers && sign_marker_visible(angle, display),
        );
    }

    set.set(Drawable::Airflow, toggles.airflow && features.airflow);
    set
}

#[cfg(test)]
mod tests {
    use super::{compute, DisplayToggles, Drawable, Toggle, VisibilitySet};
    use crate::arcs::ArcPolicy;
    use crate::attitude::{AttitudeState, EulerAngle};
    use crate::config::Features;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use rstest::rstest;
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    fn visibility(yaw: f64, pitch: f64, roll: f64, toggles: &DisplayToggles) -> VisibilitySet {
        compute(
            &AttitudeState::from_degrees(yaw, pitch, roll),
            toggles,
            &Features::default(),
            ArcPolicy::MirroredPair,
        )
    }

    #[derive(Clone, Copy, Debug)]
    struct Scene {
        degrees: [f64; 3],
        toggles: DisplayToggles,
    }

    impl Arbitrary for Scene {
        fn arbitrary(g: &mut Gen) -> Self {
            // quickcheck will give us awkward f64 values -- we ignore those;
            // whole and half degrees land on the deadband edge often enough.
            let mut angle = || f64::from(i8::arbitrary(g) % 12) / 2.;
            let degrees = [angle(), angle(), angle()];
            let mut toggles = DisplayToggles::default();
            for toggle in Toggle::ALL {
                toggles.set(toggle, bool::arbitrary(g));
            }
            Self { degrees, toggles }
        }
    }

    quickcheck! {
        fn x0_label_hides_only_when_yaw_and_pitch_are_both_small(scene: Scene) -> bool {
            let [yaw, pitch, roll] = scene.degrees;
            let set = visibility(yaw, pitch, roll, &scene.toggles);
            let both_small = yaw.abs() < 3. && pitch.abs() < 3.;
            set.is_visible(Drawable::X0Label) == (scene.toggles.x_0 && !both_small)
        }

        fn vectors_always_follow_their_toggles(scene: Scene) -> bool {
            let [yaw, pitch, roll] = scene.degrees;
            let set = visibility(yaw, pitch, roll, &scene.toggles);
            [
                (Drawable::X0, Toggle::X0),
                (Drawable::Yi, Toggle::Yi),
                (Drawable::Zb, Toggle::Zb),
                (Drawable::XbLabel, Toggle::Xb),
                (Drawable::AircraftXzRing, Toggle::AcXzRing),
                (Drawable::EarthYzGrid, Toggle::EarthYz),
            ]
            .into_iter()
            .all(|(drawable, toggle)| set.is_visible(drawable) == scene.toggles.get(toggle))
        }

        fn hidden_toggle_hides_everything_it_owns(scene: Scene) -> bool {
            let [yaw, pitch, roll] = scene.degrees;
            let mut toggles = scene.toggles;
            toggles.theta = false;
            toggles.y_i = false;
            let set = visibility(yaw, pitch, roll, &toggles);
            !set.is_visible(Drawable::ThetaArc)
                && !set.is_visible(Drawable::ThetaMirrorArc)
                && !set.is_visible(Drawable::ThetaLabel)
                && !set.is_visible(Drawable::ThetaSignMarker)
                && !set.is_visible(Drawable::Yi)
                && !set.is_visible(Drawable::YiLabel)
        }
    }

    #[rstest]
    #[case(2., 2., 45., false)]
    #[case(2., 5., 0., true)]
    #[case(5., 2., 0., true)]
    #[case(-2.9, 2.9, -30., false)]
    #[case(3., 0., 0., true)]
    fn x0_label(#[case] yaw: f64, #[case] pitch: f64, #[case] roll: f64, #[case] shown: bool) {
        let set = visibility(yaw, pitch, roll, &DisplayToggles::default());
        assert_eq!(set.is_visible(Drawable::X0Label), shown);
    }

    #[rstest]
    // both label families depend on the same pairs, joined with AND for earth and OR for
    // intermediate
    #[case(2., 20., 20., [true, false], [true, false], [true, true])]
    #[case(20., 2., 20., [true, false], [true, true], [true, false])]
    #[case(20., 20., 2., [true, true], [true, false], [true, false])]
    #[case(2., 2., 20., [false, false], [true, false], [true, false])]
    #[case(20., 20., 20., [true, true], [true, true], [true, true])]
    fn earth_and_intermediate_labels(
        #[case] yaw: f64,
        #[case] pitch: f64,
        #[case] roll: f64,
        #[case] x: [bool; 2],
        #[case] y: [bool; 2],
        #[case] z: [bool; 2],
    ) {
        let set = visibility(yaw, pitch, roll, &DisplayToggles::default());
        assert_eq!(
            [set.is_visible(Drawable::X0Label), set.is_visible(Drawable::XiLabel)],
            x
        );
        assert_eq!(
            [set.is_visible(Drawable::Y0Label), set.is_visible(Drawable::YiLabel)],
            y
        );
        assert_eq!(
            [set.is_visible(Drawable::Z0Label), set.is_visible(Drawable::ZiLabel)],
            z
        );
        for label in [Drawable::XbLabel, Drawable::YbLabel, Drawable::ZbLabel] {
            assert!(set.is_visible(label));
        }
    }

    #[rstest]
    #[case(-5., true, true)]
    #[case(-2., true, false)]
    #[case(-5., false, false)]
    #[case(5., true, false)]
    fn yaw_sign_marker(#[case] yaw: f64, #[case] display: bool, #[case] shown: bool) {
        let mut toggles = DisplayToggles::default();
        toggles.psi = display;
        let set = visibility(yaw, 20., 20., &toggles);
        assert_eq!(set.is_visible(Drawable::PsiSignMarker), shown);
        assert!(!set.is_visible(Drawable::ThetaSignMarker));
    }

    #[test]
    fn sign_markers_need_the_feature() {
        let features = Features {
            extended_sign_markers: false,
            ..Features::default()
        };
        let set = compute(
            &AttitudeState::from_degrees(-10., -10., -10.),
            &DisplayToggles::default(),
            &features,
            ArcPolicy::MirroredPair,
        );
        for which in EulerAngle::ALL {
            assert!(!set.is_visible(Drawable::sign_marker(which)));
            assert!(set.is_visible(Drawable::angle_label(which)));
        }
    }

    #[rstest]
    #[case(0., false)]
    #[case(2.5, false)]
    #[case(-3., true)]
    #[case(30., true)]
    fn angle_labels_hide_near_zero(#[case] degrees: f64, #[case] shown: bool) {
        for which in EulerAngle::ALL {
            let mut attitude = AttitudeState::from_degrees(20., 20., 20.);
            attitude.set_angle(which, Angle::new::<degree>(degrees));
            let set = compute(
                &attitude,
                &DisplayToggles::default(),
                &Features::default(),
                ArcPolicy::MirroredPair,
            );
            assert_eq!(set.is_visible(Drawable::angle_label(which)), shown);
            // the arcs themselves do not care about the deadband
            assert!(set.is_visible(Drawable::arc(which)));
            assert!(set.is_visible(Drawable::mirror_arc(which)));
        }
    }

    #[test]
    fn single_signed_arcs_have_no_mirror() {
        let set = compute(
            &AttitudeState::from_degrees(20., -20., 20.),
            &DisplayToggles::default(),
            &Features::default(),
            ArcPolicy::SingleSigned,
        );
        for which in EulerAngle::ALL {
            assert!(set.is_visible(Drawable::arc(which)));
            assert!(!set.is_visible(Drawable::mirror_arc(which)));
        }
    }

    #[rstest]
    #[case(true, true, true)]
    #[case(true, false, false)]
    #[case(false, true, false)]
    #[case(false, false, false)]
    fn airflow(#[case] toggle: bool, #[case] feature: bool, #[case] shown: bool) {
        let toggles = DisplayToggles {
            airflow: toggle,
            ..DisplayToggles::default()
        };
        let features = Features {
            airflow: feature,
            ..Features::default()
        };
        let set = compute(&AttitudeState::level(), &toggles, &features, ArcPolicy::default());
        assert_eq!(set.is_visible(Drawable::Airflow), shown);
    }

    #[test]
    fn default_toggles() {
        let toggles = DisplayToggles::default();
        let on: Vec<_> = Toggle::ALL
            .into_iter()
            .filter(|&toggle| toggles.get(toggle))
            .map(Toggle::name)
            .collect();
        assert_eq!(
            on,
            ["x_0", "y_0", "z_0", "x_i", "y_i", "z_i", "x_b", "y_b", "z_b", "psi", "theta", "phi"]
        );
    }

    #[test]
    fn toggles_by_name() {
        let mut toggles = DisplayToggles::default();
        for toggle in Toggle::ALL {
            let parsed: Toggle = toggle.name().parse().unwrap();
            assert_eq!(parsed, toggle);
            toggles.set(parsed, true);
        }
        assert!(Toggle::ALL.into_iter().all(|toggle| toggles.get(toggle)));

        let err = "x_z".parse::<Toggle>().unwrap_err();
        assert_eq!(err.to_string(), r#"unknown display toggle "x_z""#);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn each_toggle_owns_the_field_of_its_name() {
        assert_eq!(Toggle::ALL.len(), 25);
        let defaults = serde_yaml::to_value(DisplayToggles::default()).unwrap();
        for toggle in Toggle::ALL {
            let mut toggles = DisplayToggles::default();
            toggles.set(toggle, !toggles.get(toggle));
            let flipped = serde_yaml::to_value(toggles).unwrap();
            let changed: Vec<_> = flipped
                .as_mapping()
                .unwrap()
                .iter()
                .filter(|(field, value)| defaults.get(*field) != Some(*value))
                .map(|(field, _)| field.as_str().unwrap().to_owned())
                .collect();
            assert_eq!(changed, [toggle.name()]);
        }
    }

    #[test]
    fn drawables_are_listed_in_index_order() {
        for (index, drawable) in Drawable::ALL.into_iter().enumerate() {
            assert_eq!(drawable as usize, index);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toggles_from_partial_yaml() {
        let toggles: DisplayToggles = serde_yaml::from_str("airflow: true\nx_0: false\n").unwrap();
        assert!(toggles.airflow);
        assert!(!toggles.x_0);
        assert!(toggles.y_0);
        assert!(!toggles.earth_xy);
    }
}
