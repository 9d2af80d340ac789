//! tinyraster: minimal software rendering pipeline
//!
//! - Model/view/projection transforms with perspective division
//! - Triangle rasterization into color and depth buffers
//! - Arbitrary-degree Bezier curves with anti-aliased plotting

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod curve;
mod logging;
mod output;
mod rasterizer;
mod scene;
mod window;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use app::{BezierSession, ControlPoints, TriangleViewer, MIN_CURVE_POINTS};
use curve::MAX_CONTROL_POINTS;
use logging::{init_logging, LoggingConfig};
use rasterizer::{HEIGHT, WIDTH};
use scene::{load_scene, save_scene, Scene};

#[derive(Parser)]
#[command(name = "tinyraster", version, about = "Minimal software rasterizer and Bezier curve renderer")]
struct Cli {
    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Scenes compiled into the binary
#[derive(Clone, Copy, ValueEnum)]
enum Builtin {
    Triangle,
    TwoTriangles,
}

impl Builtin {
    fn scene(self) -> Scene {
        match self {
            Builtin::Triangle => Scene::single_triangle(),
            Builtin::TwoTriangles => Scene::two_triangles(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render one frame of a scene and save it as an image
    Render {
        /// Scene file (RON); defaults to a single white triangle
        #[arg(short, long, conflicts_with = "builtin")]
        scene: Option<PathBuf>,

        /// Use a built-in scene instead of a file
        #[arg(long, value_enum)]
        builtin: Option<Builtin>,

        /// Model rotation in degrees (overrides the scene)
        #[arg(short = 'r', long, allow_hyphen_values = true)]
        angle: Option<f32>,

        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also write the rendered scene, rotation included, as RON
        #[arg(long)]
        dump_scene: Option<PathBuf>,
    },

    /// Show a scene in a window; A/D rotate, Escape quits
    View {
        /// Scene file (RON); defaults to a single white triangle
        #[arg(short, long, conflicts_with = "builtin")]
        scene: Option<PathBuf>,

        /// Use a built-in scene instead of a file
        #[arg(long, value_enum)]
        builtin: Option<Builtin>,

        /// Initial model rotation in degrees (overrides the scene)
        #[arg(short = 'r', long, allow_hyphen_values = true)]
        angle: Option<f32>,
    },

    /// Click to place Bezier control points; the curve appears from four points on
    Bezier {
        #[arg(long, default_value_t = WIDTH)]
        width: usize,

        #[arg(long, default_value_t = HEIGHT)]
        height: usize,

        /// Where the curve image is written
        #[arg(short, long, default_value = "my_bezier_curve.png")]
        output: PathBuf,

        /// Render these control points without a window: "x,y;x,y;..."
        #[arg(long, allow_hyphen_values = true)]
        points: Option<ControlPoints>,

        /// Also plot the closed-form cubic in red
        #[arg(long)]
        naive: bool,
    },
}

fn load_or_default(path: Option<&Path>, builtin: Option<Builtin>) -> Result<Scene> {
    match (path, builtin) {
        (Some(p), _) => load_scene(p).with_context(|| format!("loading scene {}", p.display())),
        (None, Some(b)) => Ok(b.scene()),
        (None, None) => Ok(Scene::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log,
        ..Default::default()
    });

    match cli.command {
        Commands::Render { scene, builtin, angle, output, dump_scene } => {
            let mut scene = load_or_default(scene.as_deref(), builtin)?;
            if let Some(angle) = angle {
                scene.rotation.angle = angle;
            }
            if let Some(path) = dump_scene {
                save_scene(&scene, &path).with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote scene to {}", path.display());
            }

            let mut viewer = TriangleViewer::new(scene, None);
            viewer.render().context("drawing scene")?;
            output::save_frame(viewer.rasterizer(), &output)
                .with_context(|| format!("writing {}", output.display()))?;
        }

        Commands::View { scene, builtin, angle } => {
            let viewer = TriangleViewer::new(load_or_default(scene.as_deref(), builtin)?, angle);
            let r = viewer.rasterizer();
            let conf = window::window_conf("Rasterizer", r.width(), r.height());
            log::info!("A/D rotate, Escape quits");
            macroquad::Window::from_config(conf, window::run_viewer(viewer));
        }

        Commands::Bezier { width, height, output, points: Some(ControlPoints(points)), naive } => {
            if points.len() < MIN_CURVE_POINTS {
                bail!("need at least {} control points, got {}", MIN_CURVE_POINTS, points.len());
            }
            if points.len() > MAX_CONTROL_POINTS {
                bail!("at most {} control points are supported, got {}", MAX_CONTROL_POINTS, points.len());
            }
            let mut session = BezierSession::new(width, height, Some(output), naive);
            for p in points {
                session.add_point(p);
            }
            session.redraw().context("drawing curve")?;
            session.save_if_changed().context("writing curve image")?;
        }

        Commands::Bezier { width, height, output, points: None, naive } => {
            let session = BezierSession::new(width, height, Some(output), naive);
            let conf = window::window_conf("Bezier Curve", width, height);
            log::info!("left click adds a control point, Escape quits");
            macroquad::Window::from_config(conf, window::run_bezier(session));
        }
    }

    Ok(())
}
