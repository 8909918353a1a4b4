//! Configuration of the composer and of the headless host.

use std::path::PathBuf;

use crate::camera::Camera;

/// Environment variable that overrides the asset root at runtime.
pub const ASSET_DIR_VAR: &str = "SCENE_ASSET_DIR";

/// Names under which the composer uploads its uniforms.
///
/// The defaults match the course shaders. A different shader only needs a
/// different set of names, the composer itself does not change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformNames {
    pub model: String,
    pub object_color: String,
    pub texture: String,
    pub use_texture: String,
    pub use_lighting: String,
    pub uv_scale: String,
    pub ambient_color: String,
    pub ambient_strength: String,
    pub diffuse_color: String,
    pub specular_color: String,
    pub shininess: String,
    /// Array prefix of the light uniforms, e.g. `lightSources[0].position`.
    pub light_sources: String,
}

impl Default for UniformNames {
    fn default() -> Self {
        Self {
            model: "model".into(),
            object_color: "objectColor".into(),
            texture: "objectTexture".into(),
            use_texture: "bUseTexture".into(),
            use_lighting: "bUseLighting".into(),
            uv_scale: "UVscale".into(),
            ambient_color: "material.ambientColor".into(),
            ambient_strength: "material.ambientStrength".into(),
            diffuse_color: "material.diffuseColor".into(),
            specular_color: "material.specularColor".into(),
            shininess: "material.shininess".into(),
            light_sources: "lightSources".into(),
        }
    }
}

/// Everything the headless host needs to render a frame.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Directory texture paths are resolved against.
    pub asset_root: PathBuf,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    pub camera: Camera,
    pub uniform_names: UniformNames,
}

impl SceneConfig {
    /// Default configuration with the asset root taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(ASSET_DIR_VAR) {
            log::info!("Using asset root {dir} from {ASSET_DIR_VAR}");
            config.asset_root = PathBuf::from(dir);
        }
        config
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        let asset_root = option_env!("SCENE_ASSET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("assets"));
        Self {
            asset_root,
            width: 1000,
            height: 800,
            clear_colour: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            camera: Camera::default(),
            uniform_names: UniformNames::default(),
        }
    }
}
