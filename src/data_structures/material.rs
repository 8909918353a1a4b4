//! Phong materials and the tag-addressed material library.

use cgmath::Vector3;

/// Surface response of a textured object under the scene lights.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMaterial {
    pub tag: String,
    pub ambient_color: Vector3<f32>,
    pub ambient_strength: f32,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl ObjectMaterial {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ambient_color: Vector3::new(0.2, 0.2, 0.2),
            ambient_strength: 0.2,
            diffuse_color: Vector3::new(0.5, 0.5, 0.5),
            specular_color: Vector3::new(0.2, 0.2, 0.2),
            shininess: 8.0,
        }
    }

    pub fn with_ambient(mut self, color: [f32; 3], strength: f32) -> Self {
        self.ambient_color = color.into();
        self.ambient_strength = strength;
        self
    }

    pub fn with_diffuse(mut self, color: [f32; 3]) -> Self {
        self.diffuse_color = color.into();
        self
    }

    pub fn with_specular(mut self, color: [f32; 3], shininess: f32) -> Self {
        self.specular_color = color.into();
        self.shininess = shininess;
        self
    }
}

/// Materials defined for a scene, looked up by tag.
///
/// Populated once while the scene is prepared and read-only afterwards. Tags are
/// expected to be unique; if one is defined twice the first definition wins.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<ObjectMaterial>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, material: ObjectMaterial) {
        if self.find(&material.tag).is_some() {
            log::warn!(
                "Material {} is already defined, keeping the first definition",
                material.tag
            );
        }
        self.materials.push(material);
    }

    pub fn find(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl FromIterator<ObjectMaterial> for MaterialLibrary {
    fn from_iter<T: IntoIterator<Item = ObjectMaterial>>(iter: T) -> Self {
        let mut library = Self::new();
        iter.into_iter().for_each(|m| library.define(m));
        library
    }
}
