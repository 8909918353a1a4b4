//! Fixed look-at camera and its uniform.

use cgmath::{Deg, Matrix4, Point3, Vector3, perspective};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective { fovy: Deg<f32> },
    /// Orthographic view `half_height` world units above and below the target.
    Orthographic { half_height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub projection: Projection,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: impl Into<Point3<f32>>, target: impl Into<Point3<f32>>) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        let proj = match self.projection {
            Projection::Perspective { fovy } => perspective(fovy, aspect, self.znear, self.zfar),
            Projection::Orthographic { half_height } => {
                let half_width = half_height * aspect;
                cgmath::ortho(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.znear,
                    self.zfar,
                )
            }
        };
        OPENGL_TO_WGPU_MATRIX * proj
    }

    pub fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for Camera {
    /// Looks at the milestone table from the front and slightly above.
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 8.0, 22.0),
            target: Point3::new(0.0, 3.0, 0.0),
            up: Vector3::unit_y(),
            projection: Projection::Perspective { fovy: Deg(45.0) },
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, aspect: f32) {
        self.view_position = camera.eye.to_homogeneous().into();
        self.view_proj = camera.view_projection(aspect).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
