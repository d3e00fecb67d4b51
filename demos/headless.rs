//! Runs every flight mode for a few seconds without a window and logs what a renderer would be
//! told to draw.
//!
//! ```console
//! $ RUST_LOG=debug cargo run --example headless
//! ```

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uom::si::f64::Time;
use uom::si::time::second;
use ypr_viz::arcs::ArcGeometry;
use ypr_viz::{
    BodyMesh, Drawable, Engine, EngineConfig, FlightMode, ModelLoadError, ParamUpdate, Particle,
    RenderBridge, Toggle,
};

type UnitQuaternion = nalgebra::UnitQuaternion<f64>;
type Point3 = nalgebra::Point3<f64>;

const FRAME_RATE: f64 = 60.;
const SECONDS_PER_MODE: f64 = 4.;

/// Stands in for the aircraft mesh; only remembers its nose direction.
#[derive(Debug, Default)]
struct Aircraft {
    nose: nalgebra::Vector3<f64>,
}

impl BodyMesh for Aircraft {
    fn set_orientation(&mut self, orientation: &UnitQuaternion) {
        self.nose = orientation * -nalgebra::Vector3::z();
    }
}

/// Counts what it is asked to draw and logs a summary once per frame.
#[derive(Debug, Default)]
struct LoggingBridge {
    frame: usize,
    visible: usize,
    arc_vertices: usize,
    farthest_particle: f64,
}

impl RenderBridge for LoggingBridge {
    fn set_visible(&mut self, _: Drawable, visible: bool) {
        self.visible += usize::from(visible);
    }

    fn set_orientation(&mut self, _: Drawable, _: &UnitQuaternion) {}

    fn set_arc(&mut self, _: Drawable, geometry: &ArcGeometry, _: &UnitQuaternion) {
        self.arc_vertices += geometry.positions().len();
    }

    fn set_particle(&mut self, _: usize, particle: &Particle) {
        self.farthest_particle = self.farthest_particle.min(particle.position.z);
    }

    fn set_camera(&mut self, position: &Point3) {
        debug!(x = position.x, y = position.y, z = position.z, "camera pinned");
    }

    fn render(&mut self) {
        debug!(
            frame = self.frame,
            visible = self.visible,
            arc_vertices = self.arc_vertices,
            farthest_particle = self.farthest_particle,
            "render"
        );
        self.frame += 1;
        self.visible = 0;
        self.arc_vertices = 0;
        self.farthest_particle = 0.;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut engine = Engine::<Aircraft>::new(EngineConfig {
        seed: Some(0),
        ..EngineConfig::default()
    });
    engine.resolve_model(Ok::<_, ModelLoadError>(Aircraft::default()));
    engine.apply(ParamUpdate::Toggle(Toggle::Airflow, true));

    let mut bridge = LoggingBridge::default();
    let dt = Time::new::<second>(1. / FRAME_RATE);
    let frames_per_mode = (SECONDS_PER_MODE * FRAME_RATE) as usize;

    for mode in FlightMode::ALL {
        engine.apply(ParamUpdate::Mode(mode));
        for _ in 0..frames_per_mode {
            engine.tick(dt).present(&mut bridge);
        }
        let snapshot = engine.snapshot();
        info!(
            %mode,
            attitude = %snapshot.attitude(),
            elapsed = snapshot.elapsed().get::<second>(),
            "mode finished"
        );
        info!("{}", snapshot.frames().body);
        if let Some(aircraft) = engine.model() {
            info!(nose = ?aircraft.nose.as_slice(), "aircraft");
        }
    }
}
