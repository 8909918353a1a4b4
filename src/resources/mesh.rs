use wgpu::util::DeviceExt;

use crate::data_structures::mesh::{self, GeometryData, MeshKind, MeshSettings};

/// A primitive mesh resident on the GPU.
#[derive(Debug)]
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

pub fn upload_geometry(device: &wgpu::Device, geometry: &GeometryData, name: &str) -> GpuMesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&geometry.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    GpuMesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: geometry.indices.len() as u32,
    }
}

/// Generate and upload the primitive `kind`.
pub fn load_primitive(device: &wgpu::Device, kind: MeshKind, settings: &MeshSettings) -> GpuMesh {
    let geometry = mesh::generate(kind, settings);
    log::debug!(
        "Generated {} mesh: {} vertices, {} triangles",
        kind.name(),
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    upload_geometry(device, &geometry, kind.name())
}
