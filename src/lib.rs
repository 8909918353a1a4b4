//! scene-composer
//!
//! Composes a fixed 3D scene of primitive shapes (planes, boxes, cylinders,
//! cones, spheres, tori) through a small shading façade. Each object is drawn
//! by composing a model matrix, uploading a flat colour or a texture unit plus
//! an optional material, and asking a mesh library to draw. The façade is
//! GPU-agnostic; the crate ships wgpu collaborators and a headless host that
//! renders a frame to an image.
//!
//! High-level modules
//! - `composer`: the transform/appearance/material façade and scene loop
//! - `registry`: tag-addressed texture table bounded at 16 units
//! - `shading`: named uniform setters and the uniform blocks they fill
//! - `data_structures`: transforms, materials, primitive meshes, textures
//! - `scene` / `milestones`: scene descriptions and the course scenes
//! - `config` / `camera`: host configuration and the fixed camera
//! - `context`, `pipelines`, `render`, `resources`: the wgpu backend
//! - `flow`: headless host that prepares a scene and renders one frame
//!

pub mod camera;
pub mod composer;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod milestones;
pub mod pipelines;
pub mod registry;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shading;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use composer::{PrepareSummary, SceneComposer};
pub use config::{SceneConfig, UniformNames};
pub use error::TextureError;
pub use scene::{Appearance, LightSource, SceneDescription, SceneObject, TextureSource};
