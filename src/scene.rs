//! Data-driven scene descriptions.
//!
//! A [`SceneDescription`] is everything the composer needs to prepare and draw a
//! scene: the textures to load (in slot order), the materials and lights to
//! define, the tessellation settings and the ordered list of objects.

use std::collections::BTreeSet;

use crate::data_structures::{
    material::ObjectMaterial,
    mesh::{MeshKind, MeshSettings},
    transform::Transform,
};

/// An image file and the tag it is registered under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureSource {
    /// Path relative to the asset root.
    pub path: String,
    pub tag: String,
}

impl TextureSource {
    pub fn new(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tag: tag.into(),
        }
    }
}

/// A point light in the course shader's terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub position: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Exponent of the specular highlight.
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl LightSource {
    /// A white light at `position` with moderate ambient and specular terms.
    pub fn white(position: [f32; 3]) -> Self {
        Self {
            position,
            ambient: [0.05, 0.05, 0.05],
            diffuse: [0.6, 0.6, 0.6],
            specular: [0.3, 0.3, 0.3],
            focal_strength: 32.0,
            specular_intensity: 0.2,
        }
    }
}

/// How an object is shaded: flat colour or texture, never both.
#[derive(Clone, Debug, PartialEq)]
pub enum Appearance {
    Color([f32; 4]),
    Texture {
        tag: String,
        material: Option<String>,
    },
}

impl Appearance {
    pub fn texture(tag: impl Into<String>) -> Self {
        Appearance::Texture {
            tag: tag.into(),
            material: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub label: String,
    pub mesh: MeshKind,
    pub transform: Transform,
    pub appearance: Appearance,
    /// `None` keeps whatever UV scale the previous object uploaded.
    pub uv_scale: Option<[f32; 2]>,
}

impl SceneObject {
    pub fn new(label: impl Into<String>, mesh: MeshKind, transform: Transform, appearance: Appearance) -> Self {
        Self {
            label: label.into(),
            mesh,
            transform,
            appearance,
            uv_scale: None,
        }
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Some([u, v]);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    pub name: String,
    pub textures: Vec<TextureSource>,
    pub materials: Vec<ObjectMaterial>,
    pub lights: Vec<LightSource>,
    pub mesh_settings: MeshSettings,
    pub objects: Vec<SceneObject>,
}

impl SceneDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Every mesh kind the objects use, each once, in a stable order.
    pub fn mesh_kinds(&self) -> Vec<MeshKind> {
        self.objects
            .iter()
            .map(|object| object.mesh)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn push(&mut self, object: SceneObject) -> &mut Self {
        self.objects.push(object);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_kinds_are_deduplicated() {
        let mut scene = SceneDescription::new("test");
        for mesh in [MeshKind::Cylinder, MeshKind::Plane, MeshKind::Cylinder, MeshKind::Torus] {
            scene.push(SceneObject::new("o", mesh, Transform::new(), Appearance::Color([1.0; 4])));
        }
        assert_eq!(
            scene.mesh_kinds(),
            vec![MeshKind::Plane, MeshKind::Cylinder, MeshKind::Torus]
        );
    }

    #[test]
    fn uv_scale_is_unset_by_default() {
        let object = SceneObject::new("o", MeshKind::Box, Transform::new(), Appearance::texture("t"));
        assert_eq!(object.uv_scale, None);
        assert_eq!(object.with_uv_scale(0.5, 0.5).uv_scale, Some([0.5, 0.5]));
    }
}
