use crate::arcs::{label_anchor, place, ArcGeometry, ArcPlacement};
use crate::attitude::{AttitudeState, EulerAngle, FlightMode};
use crate::camera::CameraPreset;
use crate::config::EngineConfig;
use crate::error::ModelLoadError;
use crate::frames::FrameSet;
use crate::math::EulerOrder;
use crate::particles::{Particle, ParticleField};
use crate::simulator::FlightModeSimulator;
use crate::visibility::{compute, DisplayToggles, Drawable, Toggle, VisibilitySet};
use crate::{Point3, UnitQuaternion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::FRAC_PI_2;
use tracing::{error, info, warn};
use uom::si::angle::{degree, radian};
use uom::si::f64::{Angle, Time};
use uom::ConstZero;

/// The aircraft mesh, once the host has loaded it.
pub trait BodyMesh {
    /// Called once per tick with the full body orientation.
    fn set_orientation(&mut self, orientation: &UnitQuaternion);
}

/// A [`BodyMesh`] that can never be loaded, for hosts without an aircraft asset.
#[derive(Debug)]
pub enum NoBodyMesh {}

impl BodyMesh for NoBodyMesh {
    fn set_orientation(&mut self, _: &UnitQuaternion) {
        match *self {}
    }
}

/// Receives a [`FrameSnapshot`] and turns it into pixels.
///
/// Calls arrive in a fixed order: every visibility decision, then every orientation (with arc
/// geometry for arcs), then every particle, then the camera, then [`RenderBridge::render`].
///
/// Orientations are absolute scene rotations of each drawable's own node. They already include
/// any fixed turn the drawable needs, so a bridge applies them as-is to an unparented node.
pub trait RenderBridge {
    fn set_visible(&mut self, drawable: Drawable, visible: bool);

    fn set_orientation(&mut self, drawable: Drawable, orientation: &UnitQuaternion);

    /// Like [`RenderBridge::set_orientation`], but for arc meshes, whose shape changes every tick.
    fn set_arc(&mut self, drawable: Drawable, geometry: &ArcGeometry, orientation: &UnitQuaternion);

    fn set_particle(&mut self, index: usize, particle: &Particle);

    /// Only called for presets that pin the camera.
    fn set_camera(&mut self, _position: &Point3) {}

    fn render(&mut self);
}

/// One change from the parameter panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamUpdate {
    /// Degrees.
    Yaw(f64),
    /// Degrees.
    Pitch(f64),
    /// Degrees.
    Roll(f64),
    Mode(FlightMode),
    Toggle(Toggle, bool),
    Camera(CameraPreset),
}

#[derive(Debug)]
enum ModelSlot<M> {
    Pending,
    Loaded(M),
    Failed(ModelLoadError),
}

/// Fixed turn that lays a reference grid or ring into its plane.
///
/// Grids are modelled flat in the scene XZ plane (normal +Y) and rings in the scene XY plane
/// (normal +Z), both turned with [`EulerOrder::Xyz`] angles. The XY planes are horizontal, the XZ
/// planes contain the nose and the down axis, and the YZ planes contain the wing and the down
/// axis. Every other drawable gets the identity.
fn plane_turn(drawable: Drawable) -> UnitQuaternion {
    use Drawable::*;
    let rad = |value: f64| Angle::new::<radian>(value);
    let zero = Angle::ZERO;
    let (x, y, z) = match drawable {
        EarthXzGrid | AircraftXzGrid => (rad(FRAC_PI_2), zero, rad(FRAC_PI_2)),
        EarthYzGrid | AircraftYzGrid => (rad(FRAC_PI_2), zero, zero),
        EarthXyRing | AircraftXyRing => (rad(FRAC_PI_2), zero, zero),
        EarthXzRing | AircraftXzRing => (zero, rad(FRAC_PI_2), zero),
        EarthYzRing | AircraftYzRing => (zero, zero, rad(FRAC_PI_2)),
        _ => return UnitQuaternion::identity(),
    };
    EulerOrder::Xyz.orientation(x, y, z)
}

/// One angle's arc as of the last tick.
#[derive(Clone, Copy, Debug)]
pub struct ArcView<'a> {
    pub which: EulerAngle,
    pub placement: ArcPlacement,
    /// Shared by the primary and (if any) mirror mesh.
    pub geometry: &'a ArcGeometry,
    /// Orientation of the node carrying the angle's label and sign marker.
    pub label_anchor: UnitQuaternion,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameSnapshot<'a> {
    attitude: AttitudeState,
    frames: FrameSet,
    arcs: [ArcView<'a>; 3],
    visibility: VisibilitySet,
    particles: &'a ParticleField,
    camera: CameraPreset,
    elapsed: Time,
}

impl<'a> FrameSnapshot<'a> {
    #[must_use]
    pub fn attitude(&self) -> &AttitudeState {
        &self.attitude
    }

    #[must_use]
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    #[must_use]
    pub fn arc(&self, which: EulerAngle) -> &ArcView<'a> {
        match which {
            EulerAngle::Yaw => &self.arcs[0],
            EulerAngle::Pitch => &self.arcs[1],
            EulerAngle::Roll => &self.arcs[2],
        }
    }

    #[must_use]
    pub fn arcs(&self) -> &[ArcView<'a>; 3] {
        &self.arcs
    }

    #[must_use]
    pub fn visibility(&self) -> &VisibilitySet {
        &self.visibility
    }

    #[must_use]
    pub fn particles(&self) -> &'a [Particle] {
        self.particles.particles()
    }

    #[must_use]
    pub fn camera(&self) -> CameraPreset {
        self.camera
    }

    /// Flight-mode clock reading after this tick.
    #[must_use]
    pub fn elapsed(&self) -> Time {
        self.elapsed
    }

    /// Orientation for `drawable`, or `None` if it has none this frame.
    ///
    /// Earth-fixed vectors get the identity and earth-fixed grids and rings get only the fixed
    /// turn that lays them into their plane. Aircraft grids and rings get the same turn, carried
    /// by the body rotation. Airflow particles are positioned one by one instead, and mirror arcs
    /// only exist under [`ArcPolicy::MirroredPair`](crate::arcs::ArcPolicy::MirroredPair).
    #[must_use]
    pub fn orientation(&self, drawable: Drawable) -> Option<UnitQuaternion> {
        use Drawable::*;
        let frames = &self.frames;
        match drawable {
            EarthXyGrid | EarthXzGrid | EarthYzGrid | EarthXyRing | EarthXzRing | EarthYzRing => {
                Some(plane_turn(drawable))
            }
            AircraftXyGrid | AircraftXzGrid | AircraftYzGrid | AircraftXyRing | AircraftXzRing
            | AircraftYzRing => Some(frames.body_orientation() * plane_turn(drawable)),
            X0 | Y0 | Z0 | X0Label | Y0Label | Z0Label => Some(UnitQuaternion::identity()),
            Xb | Yb | Zb | XbLabel | YbLabel | ZbLabel => Some(frames.body_orientation()),
            Xi | Yi | XiLabel | YiLabel => Some(frames.intermediate_orientation()),
            Zi | ZiLabel => Some(frames.intermediate_down_orientation()),
            PsiArc => Some(self.arc(EulerAngle::Yaw).placement.primary),
            ThetaArc => Some(self.arc(EulerAngle::Pitch).placement.primary),
            PhiArc => Some(self.arc(EulerAngle::Roll).placement.primary),
            PsiMirrorArc => self.arc(EulerAngle::Yaw).placement.mirror,
            ThetaMirrorArc => self.arc(EulerAngle::Pitch).placement.mirror,
            PhiMirrorArc => self.arc(EulerAngle::Roll).placement.mirror,
            PsiLabel | PsiSignMarker => Some(self.arc(EulerAngle::Yaw).label_anchor),
            ThetaLabel | ThetaSignMarker => Some(self.arc(EulerAngle::Pitch).label_anchor),
            PhiLabel | PhiSignMarker => Some(self.arc(EulerAngle::Roll).label_anchor),
            Airflow => None,
        }
    }

    fn arc_geometry(&self, drawable: Drawable) -> Option<&'a ArcGeometry> {
        self.arcs
            .iter()
            .find(|view| {
                drawable == Drawable::arc(view.which) || drawable == Drawable::mirror_arc(view.which)
            })
            .map(|view| view.geometry)
    }

    /// Pushes this snapshot through `bridge` and asks it to render.
    pub fn present<B: RenderBridge + ?Sized>(&self, bridge: &mut B) {
        for (drawable, visible) in self.visibility.iter() {
            bridge.set_visible(drawable, visible);
        }
        for drawable in Drawable::ALL {
            let Some(orientation) = self.orientation(drawable) else {
                continue;
            };
            match self.arc_geometry(drawable) {
                Some(geometry) => bridge.set_arc(drawable, geometry, &orientation),
                None => bridge.set_orientation(drawable, &orientation),
            }
        }
        for (index, particle) in self.particles().iter().enumerate() {
            bridge.set_particle(index, particle);
        }
        if let Some(position) = self.camera.position() {
            bridge.set_camera(&position);
        }
        bridge.render();
    }
}

/// Owns all attitude-visualization state and advances it one animation frame at a time.
///
/// The host drives it from three places: panel changes go through [`Engine::apply`], the aircraft
/// asset arrives (once) through [`Engine::resolve_model`], and every animation frame calls
/// [`Engine::tick`] and presents the snapshot it returns.
#[derive(Debug)]
pub struct Engine<M> {
    config: EngineConfig,
    toggles: DisplayToggles,
    attitude: AttitudeState,
    camera: CameraPreset,
    simulator: FlightModeSimulator,
    particles: ParticleField,
    arc_geometry: [ArcGeometry; 3],
    placements: [ArcPlacement; 3],
    label_anchors: [UnitQuaternion; 3],
    frames: FrameSet,
    visibility: VisibilitySet,
    model: ModelSlot<M>,
    rng: ChaCha8Rng,
}

impl<M: BodyMesh> Engine<M> {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!(%e, "starting from a partially level attitude");
        }
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let attitude = config.attitude.state();
        let particles = ParticleField::new(&mut rng);
        let camera = config.camera.resolve(&config.features);
        let placements = EulerAngle::ALL.map(|which| place(which, &attitude, config.arc_policy));

        let mut engine = Self {
            toggles: config.toggles,
            attitude,
            camera,
            simulator: FlightModeSimulator::new(),
            particles,
            arc_geometry: placements.map(|placement| ArcGeometry::new(&placement.descriptor)),
            placements,
            label_anchors: EulerAngle::ALL.map(|which| label_anchor(which, &attitude)),
            frames: FrameSet::from_attitude(&attitude),
            visibility: compute(
                &attitude,
                &config.toggles,
                &config.features,
                config.arc_policy,
            ),
            model: ModelSlot::Pending,
            rng,
            config,
        };
        let shown = engine.airflow_shown();
        engine.particles.set_visible(shown);
        info!(
            attitude = %engine.attitude,
            camera = %engine.camera,
            arc_policy = ?engine.config.arc_policy,
            "attitude engine started"
        );
        engine
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn attitude(&self) -> &AttitudeState {
        &self.attitude
    }

    #[must_use]
    pub fn toggles(&self) -> &DisplayToggles {
        &self.toggles
    }

    #[must_use]
    pub fn camera(&self) -> CameraPreset {
        self.camera
    }

    /// The aircraft mesh, if it has loaded.
    #[must_use]
    pub fn model(&self) -> Option<&M> {
        match &self.model {
            ModelSlot::Loaded(model) => Some(model),
            ModelSlot::Pending | ModelSlot::Failed(_) => None,
        }
    }

    /// Why the aircraft mesh failed to load, if it did.
    #[must_use]
    pub fn model_error(&self) -> Option<&ModelLoadError> {
        match &self.model {
            ModelSlot::Failed(e) => Some(e),
            ModelSlot::Pending | ModelSlot::Loaded(_) => None,
        }
    }

    /// Applies one change from the parameter panel.
    ///
    /// Angle changes take effect on the next tick, and are overwritten by it if a flight mode is
    /// active. Non-finite angles are ignored.
    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::Yaw(value) => self.set_angle(EulerAngle::Yaw, value),
            ParamUpdate::Pitch(value) => self.set_angle(EulerAngle::Pitch, value),
            ParamUpdate::Roll(value) => self.set_angle(EulerAngle::Roll, value),
            ParamUpdate::Mode(mode) => {
                if mode != self.attitude.mode {
                    info!(from = %self.attitude.mode, to = %mode, "flight mode changed");
                    self.attitude.mode = mode;
                }
            }
            ParamUpdate::Toggle(toggle, on) => self.toggles.set(toggle, on),
            ParamUpdate::Camera(preset) => {
                let resolved = preset.resolve(&self.config.features);
                if resolved != preset {
                    warn!(%preset, "camera preset not enabled, using the free camera");
                }
                self.camera = resolved;
            }
        }
    }

    fn set_angle(&mut self, which: EulerAngle, degrees: f64) {
        if !degrees.is_finite() {
            warn!(angle = ?which, value = degrees, "ignoring non-finite angle");
            return;
        }
        self.attitude
            .set_angle(which, Angle::new::<degree>(degrees));
    }

    /// Hands over the outcome of loading the aircraft asset.
    ///
    /// Only the first call counts. A failure is logged and the engine carries on without a body
    /// mesh for the rest of the session.
    pub fn resolve_model(&mut self, result: Result<M, ModelLoadError>) {
        if !matches!(self.model, ModelSlot::Pending) {
            warn!("aircraft model already resolved; ignoring");
            return;
        }
        self.model = match result {
            Ok(mut model) => {
                info!("aircraft model loaded");
                model.set_orientation(&self.frames.body_orientation());
                ModelSlot::Loaded(model)
            }
            Err(e) => {
                error!(%e, "continuing without an aircraft model");
                ModelSlot::Failed(e)
            }
        };
    }

    fn airflow_shown(&self) -> bool {
        self.toggles.airflow && self.config.features.airflow
    }

    /// Advances one animation frame by `dt`.
    ///
    /// Runs the flight mode (if any), then recomputes frames and arcs from the resulting attitude,
    /// then visibility, then orients the aircraft mesh.
    pub fn tick(&mut self, dt: Time) -> FrameSnapshot<'_> {
        let airflow = self.config.features.airflow;
        let particles = airflow.then_some(&mut self.particles);
        self.simulator
            .tick(dt, &mut self.attitude, particles, &mut self.rng);
        let shown = self.airflow_shown();
        self.particles.set_visible(shown);

        let policy = self.config.arc_policy;
        self.frames = FrameSet::from_attitude(&self.attitude);
        for (i, which) in EulerAngle::ALL.into_iter().enumerate() {
            let placement = place(which, &self.attitude, policy);
            self.arc_geometry[i].rebuild(&placement.descriptor);
            self.placements[i] = placement;
            self.label_anchors[i] = label_anchor(which, &self.attitude);
        }

        self.visibility = compute(&self.attitude, &self.toggles, &self.config.features, policy);

        if let ModelSlot::Loaded(model) = &mut self.model {
            model.set_orientation(&self.frames.body_orientation());
        }

        self.snapshot()
    }

    /// The state as of the last tick (or start-up), without advancing anything.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        let view = |i: usize, which: EulerAngle| ArcView {
            which,
            placement: self.placements[i],
            geometry: &self.arc_geometry[i],
            label_anchor: self.label_anchors[i],
        };
        FrameSnapshot {
            attitude: self.attitude,
            frames: self.frames,
            arcs: [
                view(0, EulerAngle::Yaw),
                view(1, EulerAngle::Pitch),
                view(2, EulerAngle::Roll),
            ],
            visibility: self.visibility,
            particles: &self.particles,
            camera: self.camera,
            elapsed: self.simulator.clock().elapsed(),
        }
    }
}
