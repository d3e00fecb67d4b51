use crate::Point3;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Particles per side of the airflow grid.
pub const GRID_SIDE: usize = 10;

/// Total number of airflow particles. Never changes after the field is created.
pub const PARTICLE_COUNT: usize = GRID_SIDE * GRID_SIDE;

const GRID_ORIGIN_X: f64 = -50.;
const GRID_SPACING_X: f64 = 10.;
const GRID_ORIGIN_Y: f64 = -75.;
const GRID_SPACING_Y: f64 = 15.;

/// Farthest depth (scene Z) a particle is ever (re)seeded at.
pub const RESEED_FAR: f64 = -300.;

/// Depth band a reseeded particle lands in: `[RESEED_FAR, RESEED_FAR + RESEED_SPAN)`.
pub const RESEED_SPAN: f64 = 180.;

/// One airflow marker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Particle {
    pub position: Point3,
    pub visible: bool,
}

/// How far every particle moves in one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleStep {
    /// Along scene Z, towards (and past) the aircraft.
    pub dz: f64,
    /// Along scene Y.
    pub dy: f64,
}

impl ParticleStep {
    #[must_use]
    pub fn along(dz: f64) -> Self {
        Self { dz, dy: 0. }
    }
}

/// A random depth in `[-300, -120)`, behind the aircraft.
pub fn reseed_depth<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    RESEED_FAR + rng.gen::<f64>() * RESEED_SPAN
}

/// A fixed 10×10 grid of markers streaming past the aircraft to show relative airflow.
///
/// Particles are laid out once at creation (x ∈ {-50, -40, …, 40}, y ∈ {-75, -60, …, 60}, random
/// depth) and only ever repositioned afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    pub(crate) particles: Vec<Particle>,
    visible: bool,
}

impl ParticleField {
    /// Lays out the grid column by column: particle `i * 10 + j` sits at column `i`, row `j`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let particles = (0..GRID_SIDE)
            .flat_map(|i| (0..GRID_SIDE).map(move |j| (i, j)))
            .map(|(i, j)| Particle {
                position: Point3::new(
                    GRID_ORIGIN_X + i as f64 * GRID_SPACING_X,
                    GRID_ORIGIN_Y + j as f64 * GRID_SPACING_Y,
                    reseed_depth(rng),
                ),
                visible: false,
            })
            .collect();
        Self {
            particles,
            visible: false,
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the whole field; there is no per-particle visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        for particle in &mut self.particles {
            particle.visible = visible;
        }
    }

    /// Moves every particle by `step`, except that a particle already at or past `wrap_depth` is
    /// sent back to a random depth behind the aircraft instead of moving along Z.
    ///
    /// Returns how many particles were reseeded.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        step: ParticleStep,
        wrap_depth: f64,
        rng: &mut R,
    ) -> usize {
        let mut reseeded = 0;
        for particle in &mut self.particles {
            if particle.position.z >= wrap_depth {
                particle.position.z = reseed_depth(rng);
                reseeded += 1;
            } else {
                particle.position.z += step.dz;
            }
            particle.position.y += step.dy;
        }
        reseeded
    }
}
