//! Session state for the two interactive tools
//!
//! Both sessions are plain state machines driven by the window loop (or by
//! the headless CLI paths), so they run without a display.

use std::path::PathBuf;
use std::str::FromStr;

use crate::curve::{
    draw_control_points, naive_bezier, render_curve, Canvas, CurveError, MAX_CONTROL_POINTS,
};
use crate::output::{save_canvas, OutputError};
use crate::rasterizer::{Color, RasterResult, Rasterizer, Vec2};
use crate::scene::{MeshHandles, Scene};

/// Degrees the viewer rotates per key press
pub const ROTATE_STEP: f32 = 10.0;

/// Control points needed before a curve is drawn
pub const MIN_CURVE_POINTS: usize = 4;

/// Renders a scene at an adjustable model rotation
pub struct TriangleViewer {
    scene: Scene,
    rasterizer: Rasterizer,
    meshes: Vec<MeshHandles>,
    angle: f32,
    frame_count: u64,
}

impl TriangleViewer {
    /// Upload the scene once. `angle` overrides the scene's rotation angle.
    pub fn new(scene: Scene, angle: Option<f32>) -> Self {
        let mut rasterizer = scene.rasterizer();
        let meshes = scene.upload(&mut rasterizer);
        let angle = angle.unwrap_or(scene.rotation.angle);
        Self {
            scene,
            rasterizer,
            meshes,
            angle,
            frame_count: 0,
        }
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.angle += degrees;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    /// Clear and redraw the whole scene
    pub fn render(&mut self) -> RasterResult<()> {
        self.scene.draw(&mut self.rasterizer, &self.meshes, self.angle)?;
        self.frame_count += 1;
        Ok(())
    }
}

/// Control points parsed from `"x,y;x,y;..."`
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints(pub Vec<Vec2>);

impl FromStr for ControlPoints {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| -> Result<Vec2, String> {
                let (x, y) = p
                    .split_once(',')
                    .ok_or_else(|| format!("expected \"x,y\", got \"{}\"", p))?;
                let parse = |v: &str| {
                    v.trim()
                        .parse::<f32>()
                        .map_err(|e| format!("bad coordinate \"{}\": {}", v.trim(), e))
                };
                Ok(Vec2::new(parse(x)?, parse(y)?))
            })
            .collect::<Result<Vec<_>, String>>()
            .map(ControlPoints)
    }
}

/// Interactive Bezier editing: owns the control point list and the canvas
pub struct BezierSession {
    control_points: Vec<Vec2>,
    canvas: Canvas,
    output: Option<PathBuf>,
    naive: bool,
    saved_count: usize,
}

impl BezierSession {
    /// `output`: where the canvas is written once a curve exists.
    /// `naive`: also plot the closed-form cubic on the red channel.
    pub fn new(width: usize, height: usize, output: Option<PathBuf>, naive: bool) -> Self {
        Self {
            control_points: Vec::new(),
            canvas: Canvas::new(width, height),
            output,
            naive,
            saved_count: 0,
        }
    }

    /// Append a control point. Returns false, keeping the current curve,
    /// once the control point limit is reached.
    pub fn add_point(&mut self, p: Vec2) -> bool {
        if self.control_points.len() >= MAX_CONTROL_POINTS {
            log::warn!(
                "ignoring point at ({:.1}, {:.1}): curves are limited to {} control points",
                p.x,
                p.y,
                MAX_CONTROL_POINTS
            );
            return false;
        }
        log::info!("control point {} at ({:.1}, {:.1})", self.control_points.len(), p.x, p.y);
        self.control_points.push(p);
        true
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn has_curve(&self) -> bool {
        self.control_points.len() >= MIN_CURVE_POINTS
    }

    /// Redraw markers and, once there are enough points, the curve
    pub fn redraw(&mut self) -> Result<(), CurveError> {
        self.canvas.clear(Color::BLACK);
        draw_control_points(&self.control_points, &mut self.canvas);

        if self.has_curve() {
            if self.naive {
                naive_bezier(&self.control_points, &mut self.canvas)?;
            }
            render_curve(&self.control_points, &mut self.canvas)?;
        }
        Ok(())
    }

    /// Write the canvas if the curve changed since the last write.
    /// Returns whether a file was written.
    pub fn save_if_changed(&mut self) -> Result<bool, OutputError> {
        let count = self.control_points.len();
        let Some(path) = &self.output else {
            return Ok(false);
        };
        if !self.has_curve() || count == self.saved_count {
            return Ok(false);
        }
        // A failed write is reported once, not retried every frame
        self.saved_count = count;
        save_canvas(&self.canvas, path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CURVE_CHANNEL;

    #[test]
    fn test_viewer_rotation_and_frames() {
        let mut viewer = TriangleViewer::new(Scene::single_triangle(), Some(30.0));
        assert_eq!(viewer.angle(), 30.0);
        viewer.rotate(ROTATE_STEP);
        viewer.rotate(-2.0 * ROTATE_STEP);
        assert_eq!(viewer.angle(), 20.0);

        viewer.render().unwrap();
        viewer.render().unwrap();
        assert_eq!(viewer.frame_count(), 2);
        assert!(viewer.rasterizer().depth_buffer().iter().any(|d| d.is_finite()));
    }

    #[test]
    fn test_viewer_uses_scene_angle_by_default() {
        let mut scene = Scene::single_triangle();
        scene.rotation.angle = 45.0;
        assert_eq!(TriangleViewer::new(scene, None).angle(), 45.0);
    }

    #[test]
    fn test_parse_control_points() {
        let pts: ControlPoints = "100,500; 200.5,100 ;450,600;".parse().unwrap();
        assert_eq!(
            pts.0,
            vec![Vec2::new(100.0, 500.0), Vec2::new(200.5, 100.0), Vec2::new(450.0, 600.0)]
        );
        assert!("100;200".parse::<ControlPoints>().is_err());
        assert!("a,1".parse::<ControlPoints>().is_err());
        assert!("".parse::<ControlPoints>().unwrap().0.is_empty());
    }

    #[test]
    fn test_curve_appears_at_four_points() {
        let mut session = BezierSession::new(200, 200, None, false);
        for p in [(20.0, 180.0), (60.0, 20.0), (140.0, 190.0)] {
            session.add_point(Vec2::new(p.0, p.1));
        }
        session.redraw().unwrap();
        assert!(!session.has_curve());
        // Only the white markers so far
        assert_eq!(session.canvas().channel(100, 100, CURVE_CHANNEL), Some(0));

        session.add_point(Vec2::new(180.0, 40.0));
        session.redraw().unwrap();
        assert!(session.has_curve());
        let green = session
            .canvas()
            .pixels
            .chunks_exact(4)
            .filter(|px| px[1] > 0 && px[0] == 0)
            .count();
        assert!(green > 100);
    }

    #[test]
    fn test_points_past_limit_are_refused() {
        let mut session = BezierSession::new(64, 64, None, false);
        for i in 0..MAX_CONTROL_POINTS {
            assert!(session.add_point(Vec2::new(i as f32 % 60.0, 30.0)));
        }
        session.redraw().unwrap();
        let before = session.canvas().pixels.clone();

        assert!(!session.add_point(Vec2::new(5.0, 5.0)));
        assert_eq!(session.control_points.len(), MAX_CONTROL_POINTS);
        session.redraw().unwrap();
        assert_eq!(session.canvas().pixels, before);
    }

    #[test]
    fn test_save_only_when_curve_changes() {
        let path = std::env::temp_dir().join(format!("tinyraster-session-{}.png", std::process::id()));
        let mut session = BezierSession::new(64, 64, Some(path.clone()), true);
        for i in 0..3 {
            session.add_point(Vec2::new(10.0 + i as f32 * 10.0, 20.0));
        }
        session.redraw().unwrap();
        assert!(!session.save_if_changed().unwrap());

        session.add_point(Vec2::new(50.0, 50.0));
        session.redraw().unwrap();
        assert!(session.save_if_changed().unwrap());
        assert!(!session.save_if_changed().unwrap());
        assert!(path.exists());
        let _ = std::fs::remove_file(path);
    }
}
