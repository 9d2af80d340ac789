//! Buffer-based immediate-mode triangle rasterizer
//!
//! Vertices go through `projection * view * model`, perspective division and
//! a viewport remap. Triangles are then filled with an edge-function coverage
//! test, linear (non perspective-correct) barycentric interpolation and a
//! keep-if-nearer depth test.

use super::error::{RasterError, RasterResult};
use super::geometry::{ColBufId, GeometryStore, IndBufId, PosBufId};
use super::math::{edge_function, Mat4, Vec2, Vec3};
use super::types::{Buffers, Primitive};

/// Color used for vertices when a draw call has no color buffer
pub const DEFAULT_VERTEX_COLOR: Vec3 = Vec3::new(255.0, 255.0, 255.0);

/// Default (near, far) range that NDC depth is remapped into
pub const DEFAULT_DEPTH_RANGE: (f32, f32) = (0.1, 50.0);

/// Triangle in screen space: x/y in pixels (top-left origin), z = depth.
/// Colors are 0.0-255.0 per channel.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v: [Vec3; 3],
    pub color: [Vec3; 3],
}

impl Triangle {
    pub fn new(v: [Vec3; 3], color: [Vec3; 3]) -> Self {
        Self { v, color }
    }
}

/// Owns the geometry store, the current transforms and the color/depth buffers
pub struct Rasterizer {
    width: usize,
    height: usize,
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    frame_buf: Vec<Vec3>,
    depth_buf: Vec<f32>,
    background: Vec3,
    depth_range: (f32, f32),
    store: GeometryStore,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            frame_buf: vec![Vec3::ZERO; width * height],
            depth_buf: vec![f32::INFINITY; width * height],
            background: Vec3::ZERO,
            depth_range: DEFAULT_DEPTH_RANGE,
            store: GeometryStore::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn load_positions(&mut self, positions: Vec<Vec3>) -> PosBufId {
        self.store.load_positions(positions)
    }

    pub fn load_indices(&mut self, indices: Vec<[usize; 3]>) -> IndBufId {
        self.store.load_indices(indices)
    }

    pub fn load_colors(&mut self, colors: Vec<Vec3>) -> ColBufId {
        self.store.load_colors(colors)
    }

    pub fn set_model(&mut self, m: Mat4) {
        self.model = m;
    }

    pub fn set_view(&mut self, v: Mat4) {
        self.view = v;
    }

    pub fn set_projection(&mut self, p: Mat4) {
        self.projection = p;
    }

    /// Color that `clear(Buffers::COLOR)` fills with
    pub fn set_background(&mut self, color: Vec3) {
        self.background = color;
    }

    /// Range that NDC depth [-1, 1] is remapped into
    pub fn set_depth_range(&mut self, near: f32, far: f32) {
        self.depth_range = (near, far);
    }

    pub fn clear(&mut self, buffers: Buffers) {
        if buffers.contains(Buffers::COLOR) {
            self.frame_buf.fill(self.background);
        }
        if buffers.contains(Buffers::DEPTH) {
            self.depth_buf.fill(f32::INFINITY);
        }
    }

    /// Row-major color buffer, top-left origin, 0.0-255.0 per channel
    pub fn frame_buffer(&self) -> &[Vec3] {
        &self.frame_buf
    }

    #[cfg(test)]
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buf
    }

    /// Draw indexed primitives. Handles and indices are validated before any
    /// pixel is written, so an error leaves both buffers untouched.
    pub fn draw(
        &mut self,
        pos: PosBufId,
        ind: IndBufId,
        col: Option<ColBufId>,
        primitive: Primitive,
    ) -> RasterResult<()> {
        if primitive != Primitive::Triangle {
            return Err(RasterError::UnsupportedPrimitive(primitive));
        }

        let positions = self.store.positions(pos)?;
        let indices = self.store.indices(ind)?;
        let colors = col.map(|id| self.store.colors(id)).transpose()?;

        if let Some(colors) = colors {
            if colors.len() != positions.len() {
                return Err(RasterError::ColorCountMismatch {
                    colors: colors.len(),
                    positions: positions.len(),
                });
            }
        }

        for (triangle, tri) in indices.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i >= positions.len()) {
                return Err(RasterError::IndexOutOfRange {
                    triangle,
                    index,
                    count: positions.len(),
                });
            }
        }

        let mvp = self.projection * self.view * self.model;
        let total = indices.len();
        let mut triangles = Vec::with_capacity(total);

        for tri in indices {
            let screen = [
                self.to_screen(&mvp, positions[tri[0]]),
                self.to_screen(&mvp, positions[tri[1]]),
                self.to_screen(&mvp, positions[tri[2]]),
            ];
            let [Some(v0), Some(v1), Some(v2)] = screen else {
                log::trace!("skipping triangle {:?}: vertex with w = 0", tri);
                continue;
            };

            let color = match colors {
                Some(c) => [c[tri[0]], c[tri[1]], c[tri[2]]],
                None => [DEFAULT_VERTEX_COLOR; 3],
            };
            triangles.push(Triangle::new([v0, v1, v2], color));
        }

        for t in &triangles {
            self.rasterize_triangle(t);
        }

        log::trace!("drew {} of {} triangles", triangles.len(), total);
        Ok(())
    }

    /// Object space -> screen space. `None` for degenerate homogeneous vertices.
    fn to_screen(&self, mvp: &Mat4, p: Vec3) -> Option<Vec3> {
        let ndc = (*mvp * p.to_point()).perspective_divide()?;
        let (near, far) = self.depth_range;

        Some(Vec3::new(
            0.5 * self.width as f32 * (ndc.x + 1.0),
            0.5 * self.height as f32 * (1.0 - ndc.y),
            ndc.z * (far - near) / 2.0 + (far + near) / 2.0,
        ))
    }

    /// Fill a screen-space triangle.
    ///
    /// A pixel is covered when its center is strictly inside all three edges.
    /// A center lying exactly on an edge belongs to only one of the two
    /// triangles sharing it, so shared edges are shaded once.
    pub fn rasterize_triangle(&mut self, t: &Triangle) {
        let [a, b, c] = t.v.map(|v| Vec2::new(v.x, v.y));
        let area = edge_function(a, b, c);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        let sign = area.signum();
        let area = area.abs();

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(self.width as f32) as usize;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(self.height as f32) as usize;

        let covers = |w: f32, from: Vec2, to: Vec2| {
            w > 0.0 || (w == 0.0 && if sign > 0.0 { owns_edge(from, to) } else { owns_edge(to, from) })
        };

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge_function(b, c, p) * sign;
                let w1 = edge_function(c, a, p) * sign;
                let w2 = edge_function(a, b, p) * sign;

                if !(covers(w0, b, c) && covers(w1, c, a) && covers(w2, a, b)) {
                    continue;
                }

                let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                let z = l0 * t.v[0].z + l1 * t.v[1].z + l2 * t.v[2].z;

                let idx = y * self.width + x;
                if z < self.depth_buf[idx] {
                    self.depth_buf[idx] = z;
                    self.frame_buf[idx] = t.color[0] * l0 + t.color[1] * l1 + t.color[2] * l2;
                }
            }
        }
    }
}

/// Tie-break for pixel centers exactly on an edge of a positively oriented
/// triangle. An edge and its reverse never both own a point.
fn owns_edge(from: Vec2, to: Vec2) -> bool {
    let d = to - from;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}
