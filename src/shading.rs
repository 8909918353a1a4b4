//! The shading seam: named uniform setters and the uniform block they fill.
//!
//! The composer only ever talks to a [`ShaderUniforms`]. It does not know how a
//! name such as `"objectColor"` ends up on the GPU. [`UniformState`] is the
//! wgpu-side answer: it routes every name listed in [`UniformNames`] to a field
//! of a `bytemuck` block that the renderer later copies into a uniform buffer.

use std::{cell::RefCell, rc::Rc};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use crate::config::UniformNames;

/// Named uniform setters, one per GLSL-style value type.
///
/// Unknown names are ignored by implementations; setting a uniform the shader
/// does not declare is not an error.
pub trait ShaderUniforms {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    /// Point the sampler `name` at texture unit `slot`.
    fn set_sampler(&mut self, name: &str, slot: i32);
}

/// Per-draw uniform block (`@group(1)` in the scene shader).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    /// rgb: material ambient colour, w: ambient strength
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// rgb: specular colour, w: shininess
    pub specular: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: i32,
    _padding: i32,
}

impl Default for ObjectUniform {
    fn default() -> Self {
        use cgmath::SquareMatrix;
        Self {
            model: Matrix4::identity().into(),
            object_color: [1.0, 1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2, 0.2],
            diffuse: [0.5, 0.5, 0.5, 0.0],
            specular: [0.2, 0.2, 0.2, 8.0],
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            _padding: 0,
        }
    }
}

/// Number of light sources the scene shader evaluates.
pub const MAX_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub ambient: [f32; 3],
    pub focal_strength: f32,
    pub diffuse: [f32; 3],
    pub specular_intensity: f32,
    pub specular: [f32; 3],
    _padding2: u32,
}

/// Scene lights (`@group(0) @binding(1)` in the scene shader).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub lights: [LightRaw; MAX_LIGHTS],
    pub count: u32,
    pub use_lighting: i32,
    _padding: [u32; 2],
}

/// Which part of a light a `lightSources[i].field` name addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightField {
    Position,
    Ambient,
    Diffuse,
    Specular,
    FocalStrength,
    SpecularIntensity,
}

impl LightField {
    fn parse(field: &str) -> Option<Self> {
        match field {
            "position" => Some(Self::Position),
            "ambientColor" => Some(Self::Ambient),
            "diffuseColor" => Some(Self::Diffuse),
            "specularColor" => Some(Self::Specular),
            "focalStrength" => Some(Self::FocalStrength),
            "specularIntensity" => Some(Self::SpecularIntensity),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Ambient => "ambientColor",
            Self::Diffuse => "diffuseColor",
            Self::Specular => "specularColor",
            Self::FocalStrength => "focalStrength",
            Self::SpecularIntensity => "specularIntensity",
        }
    }
}

/// Build the uniform name of one field of light `index`.
pub fn light_uniform_name(names: &UniformNames, index: usize, field: LightField) -> String {
    format!("{}[{index}].{}", names.light_sources, field.name())
}

/// CPU copy of everything the scene shader reads, addressed by uniform name.
#[derive(Debug, Clone)]
pub struct UniformState {
    names: UniformNames,
    pub object: ObjectUniform,
    pub lights: LightsUniform,
    /// Unit the texture sampler points at, `None` until a sampler is set.
    pub texture_slot: Option<usize>,
}

impl UniformState {
    pub fn new(names: UniformNames) -> Self {
        Self {
            names,
            object: ObjectUniform::default(),
            lights: LightsUniform::default(),
            texture_slot: None,
        }
    }

    fn light_target(&mut self, name: &str) -> Option<(&mut LightRaw, LightField)> {
        let rest = name.strip_prefix(self.names.light_sources.as_str())?;
        let rest = rest.strip_prefix('[')?;
        let (index, field) = rest.split_once("].")?;
        let index: usize = index.parse().ok()?;
        let field = LightField::parse(field)?;
        if index >= MAX_LIGHTS {
            log::warn!("Light {index} is out of range, only {MAX_LIGHTS} lights are supported");
            return None;
        }
        self.lights.count = self.lights.count.max(index as u32 + 1);
        Some((&mut self.lights.lights[index], field))
    }

    fn unknown(name: &str) {
        log::debug!("Uniform {name} is not part of the scene shader, ignored");
    }
}

impl ShaderUniforms for UniformState {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        if name == self.names.model {
            self.object.model = value.into();
        } else {
            Self::unknown(name);
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        if name == self.names.object_color {
            self.object.object_color = value.into();
        } else {
            Self::unknown(name);
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        let value: [f32; 3] = value.into();
        let n = &self.names;
        if name == n.ambient_color {
            self.object.ambient[..3].copy_from_slice(&value);
        } else if name == n.diffuse_color {
            self.object.diffuse[..3].copy_from_slice(&value);
        } else if name == n.specular_color {
            self.object.specular[..3].copy_from_slice(&value);
        } else if let Some((light, field)) = self.light_target(name) {
            match field {
                LightField::Position => light.position = value,
                LightField::Ambient => light.ambient = value,
                LightField::Diffuse => light.diffuse = value,
                LightField::Specular => light.specular = value,
                _ => Self::unknown(name),
            }
        } else {
            Self::unknown(name);
        }
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        if name == self.names.uv_scale {
            self.object.uv_scale = value.into();
        } else {
            Self::unknown(name);
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        let n = &self.names;
        if name == n.ambient_strength {
            self.object.ambient[3] = value;
        } else if name == n.shininess {
            self.object.specular[3] = value;
        } else if let Some((light, field)) = self.light_target(name) {
            match field {
                LightField::FocalStrength => light.focal_strength = value,
                LightField::SpecularIntensity => light.specular_intensity = value,
                _ => Self::unknown(name),
            }
        } else {
            Self::unknown(name);
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        if name == self.names.use_texture {
            self.object.use_texture = value;
        } else if name == self.names.use_lighting {
            self.lights.use_lighting = value;
        } else {
            Self::unknown(name);
        }
    }

    fn set_sampler(&mut self, name: &str, slot: i32) {
        if name == self.names.texture {
            self.texture_slot = usize::try_from(slot).ok();
        } else {
            Self::unknown(name);
        }
    }
}

/// wgpu shading collaborator handed to the composer.
///
/// Shares its [`UniformState`] with the mesh library, which snapshots the state
/// at every draw call.
#[derive(Debug, Clone)]
pub struct GpuShader {
    state: Rc<RefCell<UniformState>>,
}

impl GpuShader {
    pub fn new(state: Rc<RefCell<UniformState>>) -> Self {
        Self { state }
    }
}

impl ShaderUniforms for GpuShader {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.state.borrow_mut().set_mat4(name, value)
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.state.borrow_mut().set_vec4(name, value)
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.state.borrow_mut().set_vec3(name, value)
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.state.borrow_mut().set_vec2(name, value)
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.state.borrow_mut().set_float(name, value)
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.state.borrow_mut().set_int(name, value)
    }

    fn set_sampler(&mut self, name: &str, slot: i32) {
        self.state.borrow_mut().set_sampler(name, slot)
    }
}
