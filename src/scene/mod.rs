//! Scene descriptions: meshes, camera and model rotation
//!
//! A scene is plain data that can be stored as RON. Uploading it to a
//! rasterizer loads every mesh once; drawing it sets the three transforms
//! and issues one draw call per mesh.

mod file;

pub use file::*;

use serde::{Serialize, Deserialize};

use crate::rasterizer::{
    look_at, model_matrix, projection_matrix, rotation, view_matrix, Buffers, ColBufId, IndBufId,
    Mat4, PosBufId, Primitive, RasterResult, Rasterizer, Vec3, HEIGHT, WIDTH,
};

fn default_up() -> Vec3 {
    Vec3::UP
}

fn default_axis() -> Vec3 {
    Vec3::Z
}

/// Perspective camera. Without a target it looks down -Z from `eye`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    #[serde(default)]
    pub target: Option<Vec3>,
    #[serde(default = "default_up")]
    pub up: Vec3,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        match self.target {
            Some(target) => look_at(self.eye, target, self.up),
            None => view_matrix(self.eye),
        }
    }

    pub fn projection(&self) -> Mat4 {
        projection_matrix(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            fov: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 50.0,
            target: None,
            up: Vec3::UP,
        }
    }
}

/// Model rotation: `angle` degrees about `axis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    #[serde(default = "default_axis")]
    pub axis: Vec3,
    #[serde(default)]
    pub angle: f32,
}

impl Rotation {
    pub fn matrix(&self, angle: f32) -> Mat4 {
        if self.axis == Vec3::Z {
            model_matrix(angle)
        } else {
            rotation(self.axis, angle)
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self { axis: Vec3::Z, angle: 0.0 }
    }
}

/// Indexed triangle mesh. Colors are optional, 0.0-255.0 per channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<[usize; 3]>,
    #[serde(default)]
    pub colors: Option<Vec<Vec3>>,
}

/// Buffer handles of an uploaded mesh
#[derive(Debug, Clone, Copy)]
pub struct MeshHandles {
    pub positions: PosBufId,
    pub indices: IndBufId,
    pub colors: Option<ColBufId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub background: Vec3,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub rotation: Rotation,
    pub meshes: Vec<Mesh>,
}

impl Scene {
    /// One white triangle in front of the camera
    pub fn single_triangle() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            background: Vec3::ZERO,
            camera: Camera::default(),
            rotation: Rotation::default(),
            meshes: vec![Mesh {
                positions: vec![
                    Vec3::new(2.0, 0.0, -2.0),
                    Vec3::new(0.0, 2.0, -2.0),
                    Vec3::new(-2.0, 0.0, -2.0),
                ],
                indices: vec![[0, 1, 2]],
                colors: None,
            }],
        }
    }

    /// Two overlapping flat-colored triangles at different depths
    pub fn two_triangles() -> Self {
        let green = Vec3::new(217.0, 238.0, 185.0);
        let blue = Vec3::new(185.0, 217.0, 238.0);
        Self {
            width: WIDTH,
            height: HEIGHT,
            background: Vec3::ZERO,
            camera: Camera::default(),
            rotation: Rotation::default(),
            meshes: vec![Mesh {
                positions: vec![
                    Vec3::new(2.0, 0.0, -2.0),
                    Vec3::new(0.0, 2.0, -2.0),
                    Vec3::new(-2.0, 0.0, -2.0),
                    Vec3::new(3.5, -1.0, -5.0),
                    Vec3::new(2.5, 1.5, -5.0),
                    Vec3::new(-1.0, 0.5, -5.0),
                ],
                indices: vec![[0, 1, 2], [3, 4, 5]],
                colors: Some(vec![green, green, green, blue, blue, blue]),
            }],
        }
    }

    /// Load every mesh into the rasterizer's geometry store
    pub fn upload(&self, r: &mut Rasterizer) -> Vec<MeshHandles> {
        self.meshes
            .iter()
            .map(|mesh| MeshHandles {
                positions: r.load_positions(mesh.positions.clone()),
                indices: r.load_indices(mesh.indices.clone()),
                colors: mesh.colors.clone().map(|c| r.load_colors(c)),
            })
            .collect()
    }

    /// Clear, set model/view/projection and draw every uploaded mesh
    pub fn draw(&self, r: &mut Rasterizer, meshes: &[MeshHandles], angle: f32) -> RasterResult<()> {
        r.clear(Buffers::COLOR | Buffers::DEPTH);
        r.set_model(self.rotation.matrix(angle));
        r.set_view(self.camera.view());
        r.set_projection(self.camera.projection());

        for mesh in meshes {
            r.draw(mesh.positions, mesh.indices, mesh.colors, Primitive::Triangle)?;
        }
        Ok(())
    }

    /// A rasterizer sized, colored and depth-ranged for this scene
    pub fn rasterizer(&self) -> Rasterizer {
        let mut r = Rasterizer::new(self.width, self.height);
        r.set_background(self.background);
        r.set_depth_range(self.camera.near, self.camera.far);
        r.clear(Buffers::COLOR | Buffers::DEPTH);
        r
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::single_triangle()
    }
}
