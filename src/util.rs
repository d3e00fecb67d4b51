use uom::si::angle::degree;
use uom::si::f64::Angle;

/// Magnitude (in degrees) below which an angle counts as "about zero" for display purposes.
///
/// Labels and sign markers for angles inside the deadband are hidden since whatever they annotate
/// collapses onto something else on screen.
pub const DEADBAND_DEGREES: f64 = 3.0;

pub(crate) fn degrees(angle: Angle) -> f64 {
    angle.get::<degree>()
}

/// `|angle| < 3°`
pub(crate) fn within_deadband(angle: Angle) -> bool {
    degrees(angle).abs() < DEADBAND_DEGREES
}

/// `angle < -3°`
pub(crate) fn below_negative_deadband(angle: Angle) -> bool {
    degrees(angle) < -DEADBAND_DEGREES
}
