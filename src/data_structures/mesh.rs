//! Primitive shapes and the mesh provider seam.
//!
//! The composer never looks inside a mesh. It only asks a [`MeshProvider`] to
//! load a [`MeshKind`] once and to draw it as often as the scene needs. The
//! geometry generators below are what the wgpu provider uploads; they follow the
//! course mesh library's conventions so the milestone transforms line up:
//!
//! - plane: 2x2 square in XZ (`-1..1`), facing +Y
//! - box: unit cube centred at the origin (`-0.5..0.5`)
//! - cylinder: radius 1, base at `y = 0`, top at `y = 1`, capped
//! - cone: radius 1 base at `y = 0`, apex at `y = 1`
//! - sphere: radius 1 centred at the origin
//! - torus: major radius 1 in the XY plane, tube radius from [`MeshSettings`]
//! - quarter torus: the first 90 degrees (from +X towards +Y) of a torus

use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Every primitive the milestone scenes draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKind {
    Plane,
    Box,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    /// Second torus with its own tube thickness (the thinner top ring).
    ExtraTorus,
    QuarterTorus,
}

impl MeshKind {
    pub const ALL: [MeshKind; 8] = [
        MeshKind::Plane,
        MeshKind::Box,
        MeshKind::Cylinder,
        MeshKind::Cone,
        MeshKind::Sphere,
        MeshKind::Torus,
        MeshKind::ExtraTorus,
        MeshKind::QuarterTorus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MeshKind::Plane => "plane",
            MeshKind::Box => "box",
            MeshKind::Cylinder => "cylinder",
            MeshKind::Cone => "cone",
            MeshKind::Sphere => "sphere",
            MeshKind::Torus => "torus",
            MeshKind::ExtraTorus => "extra torus",
            MeshKind::QuarterTorus => "quarter torus",
        }
    }
}

/// Tessellation parameters shared by all meshes of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSettings {
    pub torus_thickness: f32,
    pub extra_torus_thickness: f32,
    pub quarter_torus_thickness: f32,
    /// Segments around the circumference of round shapes.
    pub radial_segments: u32,
    /// Segments around a torus tube and between sphere poles.
    pub ring_segments: u32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            torus_thickness: 0.3,
            extra_torus_thickness: 0.35,
            quarter_torus_thickness: 0.2,
            radial_segments: 48,
            ring_segments: 24,
        }
    }
}

/// Loads and draws primitive meshes on behalf of the composer.
///
/// `load_mesh` is called once per kind during scene preparation; `draw_mesh`
/// uses whatever model/appearance uniforms were uploaded last.
pub trait MeshProvider {
    fn load_mesh(&mut self, kind: MeshKind, settings: &MeshSettings);
    fn draw_mesh(&mut self, kind: MeshKind);
}

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Triangle-list geometry ready for upload.
#[derive(Clone, Debug, Default)]
pub struct GeometryData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3]) -> u32 {
        self.vertices.push(ModelVertex {
            position,
            tex_coords,
            normal,
        });
        (self.vertices.len() - 1) as u32
    }

    /// Indices for a `(columns + 1) x (rows + 1)` vertex grid starting at `base`.
    fn push_grid(&mut self, base: u32, columns: u32, rows: u32) {
        let stride = rows + 1;
        for c in 0..columns {
            for r in 0..rows {
                let a = base + c * stride + r;
                let b = base + (c + 1) * stride + r;
                self.indices.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
            }
        }
    }
}

/// Build the geometry of `kind` with the tessellation in `settings`.
pub fn generate(kind: MeshKind, settings: &MeshSettings) -> GeometryData {
    let radial = settings.radial_segments.max(3);
    let rings = settings.ring_segments.max(3);
    match kind {
        MeshKind::Plane => generate_plane(),
        MeshKind::Box => generate_box(),
        MeshKind::Cylinder => generate_cylinder(radial),
        MeshKind::Cone => generate_cone(radial),
        MeshKind::Sphere => generate_sphere(radial, rings),
        MeshKind::Torus => generate_torus(settings.torus_thickness, radial, rings, TAU),
        MeshKind::ExtraTorus => {
            generate_torus(settings.extra_torus_thickness, radial, rings, TAU)
        }
        MeshKind::QuarterTorus => generate_torus(
            settings.quarter_torus_thickness,
            (radial / 4).max(2),
            rings,
            FRAC_PI_2,
        ),
    }
}

pub fn generate_plane() -> GeometryData {
    let mut data = GeometryData::default();
    let up = [0.0, 1.0, 0.0];
    data.push([-1.0, 0.0, 1.0], [0.0, 0.0], up);
    data.push([1.0, 0.0, 1.0], [1.0, 0.0], up);
    data.push([1.0, 0.0, -1.0], [1.0, 1.0], up);
    data.push([-1.0, 0.0, -1.0], [0.0, 1.0], up);
    data.indices = vec![0, 1, 2, 2, 3, 0];
    data
}

pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::default();
    // (normal, u axis, v axis) per face; corners are normal/2 +- u/2 +- v/2
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| {
            [
                0.5 * (n[0] + su * u[0] + sv * v[0]),
                0.5 * (n[1] + su * u[1] + sv * v[1]),
                0.5 * (n[2] + su * u[2] + sv * v[2]),
            ]
        };
        let a = data.push(corner(-1.0, -1.0), [0.0, 1.0], n);
        data.push(corner(1.0, -1.0), [1.0, 1.0], n);
        data.push(corner(1.0, 1.0), [1.0, 0.0], n);
        data.push(corner(-1.0, 1.0), [0.0, 0.0], n);
        data.indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 3, a]);
    }
    data
}

fn push_disc(data: &mut GeometryData, y: f32, normal_y: f32, segments: u32) {
    let normal = [0.0, normal_y, 0.0];
    let center = data.push([0.0, y, 0.0], [0.5, 0.5], normal);
    for i in 0..=segments {
        let theta = i as f32 * TAU / segments as f32;
        let (s, c) = theta.sin_cos();
        data.push([c, y, s], [0.5 + 0.5 * c, 0.5 + 0.5 * s], normal);
    }
    for i in 0..segments {
        let a = center + 1 + i;
        if normal_y > 0.0 {
            data.indices.extend_from_slice(&[center, a + 1, a]);
        } else {
            data.indices.extend_from_slice(&[center, a, a + 1]);
        }
    }
}

pub fn generate_cylinder(segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    let base = data.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 * TAU / segments as f32;
        let (s, c) = theta.sin_cos();
        let u = i as f32 / segments as f32;
        data.push([c, 0.0, s], [u, 1.0], [c, 0.0, s]);
        data.push([c, 1.0, s], [u, 0.0], [c, 0.0, s]);
    }
    data.push_grid(base, segments, 1);
    push_disc(&mut data, 1.0, 1.0, segments);
    push_disc(&mut data, 0.0, -1.0, segments);
    data
}

pub fn generate_cone(segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    // Slant normal of a cone with radius 1 and height 1.
    let ny = std::f32::consts::FRAC_1_SQRT_2;
    let base = data.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 * TAU / segments as f32;
        let (s, c) = theta.sin_cos();
        let u = i as f32 / segments as f32;
        let normal = [c * ny, ny, s * ny];
        data.push([c, 0.0, s], [u, 1.0], normal);
        data.push([0.0, 1.0, 0.0], [u, 0.0], normal);
    }
    for i in 0..segments {
        let a = base + 2 * i;
        data.indices.extend_from_slice(&[a, a + 1, a + 2]);
    }
    push_disc(&mut data, 0.0, -1.0, segments);
    data
}

pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    for lon in 0..=longitude_segments {
        let phi = lon as f32 * TAU / longitude_segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for lat in 0..=latitude_segments {
            let theta = lat as f32 * PI / latitude_segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let p = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.push(
                p,
                [
                    lon as f32 / longitude_segments as f32,
                    lat as f32 / latitude_segments as f32,
                ],
                p,
            );
        }
    }
    data.push_grid(0, longitude_segments, latitude_segments);
    data
}

/// Torus of major radius 1 in the XY plane, swept from +X over `sweep` radians.
pub fn generate_torus(
    thickness: f32,
    major_segments: u32,
    tube_segments: u32,
    sweep: f32,
) -> GeometryData {
    let mut data = GeometryData::default();
    for i in 0..=major_segments {
        let phi = i as f32 * sweep / major_segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=tube_segments {
            let theta = j as f32 * TAU / tube_segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = [cos_theta * cos_phi, cos_theta * sin_phi, sin_theta];
            let position = [
                cos_phi + thickness * normal[0],
                sin_phi + thickness * normal[1],
                thickness * normal[2],
            ];
            data.push(
                position,
                [
                    i as f32 / major_segments as f32,
                    j as f32 / tube_segments as f32,
                ],
                normal,
            );
        }
    }
    data.push_grid(0, major_segments, tube_segments);
    data
}
