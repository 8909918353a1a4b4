//! Render pipelines.
//!
//! - `scene`: the single pipeline every scene object is drawn with

pub mod scene;
