use crate::config::Features;
use crate::error::ParseCameraPresetError;
use crate::Point3;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How far from the origin the fixed presets put the camera.
pub const PRESET_DISTANCE: f64 = 120.;

/// Where the camera sits at start-up, before anyone picks a preset.
#[must_use]
pub fn initial_free_position() -> Point3 {
    Point3::new(100., 25., 75.)
}

/// A named camera placement from the panel.
///
/// Every preset except [`CameraPreset::Free`] pins the camera to a fixed point on one of the scene
/// axes, looking at the aircraft. `Free` leaves the camera wherever the host's orbit controls put it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CameraPreset {
    #[default]
    Free,
    /// Ahead of the nose, looking back at the aircraft.
    Front,
    Back,
    Top,
    Bottom,
    Left,
    Right,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 7] = [
        CameraPreset::Free,
        CameraPreset::Front,
        CameraPreset::Back,
        CameraPreset::Top,
        CameraPreset::Bottom,
        CameraPreset::Left,
        CameraPreset::Right,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CameraPreset::Free => "free",
            CameraPreset::Front => "front",
            CameraPreset::Back => "back",
            CameraPreset::Top => "top",
            CameraPreset::Bottom => "bottom",
            CameraPreset::Left => "left",
            CameraPreset::Right => "right",
        }
    }

    /// The camera position this preset pins, or `None` for [`CameraPreset::Free`].
    #[must_use]
    pub fn position(self) -> Option<Point3> {
        let d = PRESET_DISTANCE;
        match self {
            CameraPreset::Free => None,
            CameraPreset::Front => Some(Point3::new(0., 0., -d)),
            CameraPreset::Back => Some(Point3::new(0., 0., d)),
            CameraPreset::Top => Some(Point3::new(0., d, 0.)),
            CameraPreset::Bottom => Some(Point3::new(0., -d, 0.)),
            CameraPreset::Left => Some(Point3::new(-d, 0., 0.)),
            CameraPreset::Right => Some(Point3::new(d, 0., 0.)),
        }
    }

    /// Whether this preset needs the `extra_camera_presets` feature.
    #[must_use]
    pub fn is_extra(self) -> bool {
        matches!(
            self,
            CameraPreset::Bottom | CameraPreset::Left | CameraPreset::Right
        )
    }

    /// The presets a panel should offer given `features`.
    pub fn offered(features: &Features) -> impl Iterator<Item = CameraPreset> {
        let extra = features.extra_camera_presets;
        CameraPreset::ALL
            .into_iter()
            .filter(move |preset| extra || !preset.is_extra())
    }

    /// This preset if `features` allows it, [`CameraPreset::Free`] otherwise.
    #[must_use]
    pub fn resolve(self, features: &Features) -> CameraPreset {
        if self.is_extra() && !features.extra_camera_presets {
            CameraPreset::Free
        } else {
            self
        }
    }
}

impl Display for CameraPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CameraPreset {
    type Err = ParseCameraPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        CameraPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| ParseCameraPresetError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::{initial_free_position, CameraPreset, PRESET_DISTANCE};
    use crate::config::Features;
    use rstest::rstest;

    #[rstest]
    #[case(CameraPreset::Front, [0., 0., -120.])]
    #[case(CameraPreset::Back, [0., 0., 120.])]
    #[case(CameraPreset::Top, [0., 120., 0.])]
    #[case(CameraPreset::Bottom, [0., -120., 0.])]
    #[case(CameraPreset::Left, [-120., 0., 0.])]
    #[case(CameraPreset::Right, [120., 0., 0.])]
    fn fixed_positions(#[case] preset: CameraPreset, #[case] expected: [f64; 3]) {
        let position = preset.position().unwrap();
        assert_eq!([position.x, position.y, position.z], expected);
        assert_eq!(position.coords.norm(), PRESET_DISTANCE);
    }

    #[test]
    fn free_is_left_to_the_host() {
        assert_eq!(CameraPreset::default(), CameraPreset::Free);
        assert_eq!(CameraPreset::Free.position(), None);
        let start = initial_free_position();
        assert_eq!([start.x, start.y, start.z], [100., 25., 75.]);
    }

    #[rstest]
    #[case(true, &["free", "front", "back", "top", "bottom", "left", "right"])]
    #[case(false, &["free", "front", "back", "top"])]
    fn offered_presets(#[case] extra: bool, #[case] expected: &[&str]) {
        let features = Features {
            extra_camera_presets: extra,
            ..Features::default()
        };
        let offered: Vec<_> = CameraPreset::offered(&features)
            .map(CameraPreset::name)
            .collect();
        assert_eq!(offered, expected);
    }

    #[test]
    fn extra_presets_fall_back_to_free() {
        let basic = Features {
            extra_camera_presets: false,
            ..Features::default()
        };
        assert_eq!(CameraPreset::Left.resolve(&basic), CameraPreset::Free);
        assert_eq!(CameraPreset::Top.resolve(&basic), CameraPreset::Top);
        assert_eq!(
            CameraPreset::Left.resolve(&Features::default()),
            CameraPreset::Left
        );
    }

    #[test]
    fn parse() {
        assert_eq!("Bottom".parse::<CameraPreset>(), Ok(CameraPreset::Bottom));
        for preset in CameraPreset::ALL {
            assert_eq!(preset.to_string().parse::<CameraPreset>(), Ok(preset));
        }
        let err = "iso".parse::<CameraPreset>().unwrap_err();
        assert_eq!(err.to_string(), r#"unknown camera preset "iso""#);
    }
}
