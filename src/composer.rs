//! The scene composer: transform, appearance and material binding on top of a
//! shading collaborator, a mesh library and a texture registry.
//!
//! Every call is stateless apart from what it uploads. A draw is always the
//! same sequence: transform, optional UV scale, colour or texture (plus
//! material), then the mesh. [`SceneComposer::render_scene`] runs that sequence
//! for each object of a [`SceneDescription`].

use std::path::Path;

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    config::UniformNames,
    data_structures::{
        material::{MaterialLibrary, ObjectMaterial},
        mesh::{MeshKind, MeshProvider},
        transform::{Transform, model_matrix},
    },
    error::TextureError,
    registry::{TextureBackend, TextureRegistry},
    resources::load_texture_files,
    scene::{Appearance, LightSource, SceneDescription},
    shading::{LightField, MAX_LIGHTS, ShaderUniforms, light_uniform_name},
};

/// What [`SceneComposer::prepare_scene`] managed to set up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub textures_loaded: usize,
    pub texture_failures: usize,
    pub meshes_loaded: usize,
}

pub struct SceneComposer<S: ShaderUniforms, M: MeshProvider, B: TextureBackend> {
    shader: Option<S>,
    meshes: M,
    textures: TextureRegistry<B>,
    materials: MaterialLibrary,
    names: UniformNames,
    prepared: bool,
}

impl<S, M, B> SceneComposer<S, M, B>
where
    S: ShaderUniforms,
    M: MeshProvider,
    B: TextureBackend,
{
    /// `shader` may be `None`; uploads are then skipped and only draws happen.
    pub fn new(shader: Option<S>, meshes: M, textures: B, names: UniformNames) -> Self {
        Self {
            shader,
            meshes,
            textures: TextureRegistry::new(textures),
            materials: MaterialLibrary::new(),
            names,
            prepared: false,
        }
    }

    fn upload(&mut self, f: impl FnOnce(&mut S, &UniformNames)) {
        match self.shader.as_mut() {
            Some(shader) => f(shader, &self.names),
            None => log::trace!("No shader attached, uniform upload skipped"),
        }
    }

    /// Upload `T(position) * Rx * Ry * Rz * S(scale)` as the model matrix.
    pub fn set_transform(
        &mut self,
        scale: Vector3<f32>,
        x_degrees: f32,
        y_degrees: f32,
        z_degrees: f32,
        position: Vector3<f32>,
    ) {
        let model = model_matrix(scale, x_degrees, y_degrees, z_degrees, position);
        self.upload(|shader, names| shader.set_mat4(&names.model, model));
    }

    pub fn apply_transform(&mut self, transform: &Transform) {
        let model = transform.to_matrix();
        self.upload(|shader, names| shader.set_mat4(&names.model, model));
    }

    /// Switch texturing off and draw with a flat colour.
    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.upload(|shader, names| {
            shader.set_int(&names.use_texture, 0);
            shader.set_vec4(&names.object_color, Vector4::new(r, g, b, a));
        });
    }

    /// Switch texturing on and point the sampler at the texture tagged `tag`.
    ///
    /// Returns the slot, or `None` when no texture has that tag. The "use
    /// texture" flag is uploaded either way.
    pub fn set_texture(&mut self, tag: &str) -> Option<usize> {
        let slot = self.textures.find_slot(tag);
        self.upload(|shader, names| {
            shader.set_int(&names.use_texture, 1);
            if let Some(slot) = slot {
                shader.set_sampler(&names.texture, slot as i32);
            }
        });
        if slot.is_none() {
            log::warn!("No texture tagged {tag}, sampler left unchanged");
        }
        slot
    }

    pub fn set_uv_scale(&mut self, u: f32, v: f32) {
        self.upload(|shader, names| shader.set_vec2(&names.uv_scale, Vector2::new(u, v)));
    }

    /// Upload the material tagged `tag`. On a miss nothing is uploaded.
    pub fn set_material(&mut self, tag: &str) -> bool {
        let Some(material) = self.materials.find(tag).cloned() else {
            log::debug!("No material tagged {tag}, material uniforms unchanged");
            return false;
        };
        self.upload(|shader, names| {
            shader.set_vec3(&names.ambient_color, material.ambient_color);
            shader.set_float(&names.ambient_strength, material.ambient_strength);
            shader.set_vec3(&names.diffuse_color, material.diffuse_color);
            shader.set_vec3(&names.specular_color, material.specular_color);
            shader.set_float(&names.shininess, material.shininess);
        });
        true
    }

    pub fn define_material(&mut self, material: ObjectMaterial) {
        self.materials.define(material);
    }

    /// Upload the scene lights and turn lighting on if there are any.
    pub fn define_lights(&mut self, lights: &[LightSource]) {
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} lights defined, only the first {MAX_LIGHTS} are used",
                lights.len()
            );
        }
        let lights: Vec<LightSource> = lights.iter().take(MAX_LIGHTS).copied().collect();
        self.upload(|shader, names| {
            for (i, light) in lights.iter().enumerate() {
                let name = |field| light_uniform_name(names, i, field);
                shader.set_vec3(&name(LightField::Position), light.position.into());
                shader.set_vec3(&name(LightField::Ambient), light.ambient.into());
                shader.set_vec3(&name(LightField::Diffuse), light.diffuse.into());
                shader.set_vec3(&name(LightField::Specular), light.specular.into());
                shader.set_float(&name(LightField::FocalStrength), light.focal_strength);
                shader.set_float(&name(LightField::SpecularIntensity), light.specular_intensity);
            }
            shader.set_int(&names.use_lighting, i32::from(!lights.is_empty()));
        });
    }

    /// Read the scene's texture files from `asset_root` and prepare the scene.
    pub async fn prepare_scene(
        &mut self,
        scene: &SceneDescription,
        asset_root: &Path,
    ) -> Option<PrepareSummary> {
        if self.prepared {
            log::warn!("Scene {} is already prepared, ignoring", scene.name);
            return None;
        }
        let files = load_texture_files(asset_root, &scene.textures).await;
        self.prepare_scene_with(scene, files)
    }

    /// Prepare the scene from already-read texture file contents.
    ///
    /// `files` lines up with `scene.textures`. Every texture that fails to read,
    /// decode or fit is logged and skipped; preparation carries on. Runs once,
    /// later calls log a warning and return `None`.
    pub fn prepare_scene_with(
        &mut self,
        scene: &SceneDescription,
        files: Vec<Result<Vec<u8>, TextureError>>,
    ) -> Option<PrepareSummary> {
        if self.prepared {
            log::warn!("Scene {} is already prepared, ignoring", scene.name);
            return None;
        }
        if files.len() != scene.textures.len() {
            log::warn!(
                "{} texture files given for {} texture sources",
                files.len(),
                scene.textures.len()
            );
        }
        let start = instant::Instant::now();
        let mut summary = PrepareSummary::default();

        for (source, file) in scene.textures.iter().zip(files) {
            match file.and_then(|bytes| self.textures.load_bytes(&bytes, &source.tag)) {
                Ok(slot) => {
                    log::debug!("Texture {} ({}) is in slot {slot}", source.tag, source.path);
                    summary.textures_loaded += 1;
                }
                Err(e) => {
                    log::error!("Texture {} not loaded: {e}", source.tag);
                    summary.texture_failures += 1;
                }
            }
        }
        self.textures.bind_all();

        for material in &scene.materials {
            self.materials.define(material.clone());
        }
        self.define_lights(&scene.lights);

        for kind in scene.mesh_kinds() {
            self.meshes.load_mesh(kind, &scene.mesh_settings);
            summary.meshes_loaded += 1;
        }

        self.prepared = true;
        log::info!(
            "Prepared scene {} in {:?}: {} textures, {} failed, {} meshes",
            scene.name,
            start.elapsed(),
            summary.textures_loaded,
            summary.texture_failures,
            summary.meshes_loaded
        );
        Some(summary)
    }

    /// Draw every object of `scene` in order.
    pub fn render_scene(&mut self, scene: &SceneDescription) {
        for object in &scene.objects {
            log::trace!("Drawing {}", object.label);
            self.apply_transform(&object.transform);
            if let Some([u, v]) = object.uv_scale {
                self.set_uv_scale(u, v);
            }
            match &object.appearance {
                Appearance::Color([r, g, b, a]) => self.set_color(*r, *g, *b, *a),
                Appearance::Texture { tag, material } => {
                    self.set_texture(tag);
                    if let Some(material) = material {
                        self.set_material(material);
                    }
                }
            }
            self.draw(object.mesh);
        }
    }

    pub fn draw(&mut self, kind: MeshKind) {
        self.meshes.draw_mesh(kind);
    }

    /// Destroy every loaded texture.
    pub fn release_textures(&mut self) {
        self.textures.release_all();
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn shader(&self) -> Option<&S> {
        self.shader.as_ref()
    }

    pub fn meshes(&self) -> &M {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut M {
        &mut self.meshes
    }

    pub fn textures(&self) -> &TextureRegistry<B> {
        &self.textures
    }
}
