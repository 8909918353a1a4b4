//! Scene data types: transforms, materials, primitive meshes and textures.
//!
//! - `transform` holds per-draw scale/rotation/position and the model matrix
//! - `material` holds Phong materials and the tag-addressed library
//! - `mesh` holds the primitive kinds, their generators and the mesh provider seam
//! - `texture` holds decoded images and the GPU textures made from them

pub mod material;
pub mod mesh;
pub mod texture;
pub mod transform;
