#![allow(dead_code)]

use std::{cell::RefCell, io::Cursor, rc::Rc};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use image::{DynamicImage, ImageFormat};
use scene_composer::{
    SceneComposer, TextureError, UniformNames,
    data_structures::{
        mesh::{MeshKind, MeshProvider, MeshSettings},
        texture::DecodedImage,
    },
    registry::TextureBackend,
    resources::texture::check_dimensions,
    shading::{ObjectUniform, ShaderUniforms, UniformState},
};

/// Records every uniform upload by name and keeps a routed copy of the values.
pub(crate) struct RecordingShader {
    pub(crate) state: Rc<RefCell<UniformState>>,
    pub(crate) uploads: Vec<String>,
}

impl RecordingShader {
    pub(crate) fn new(state: Rc<RefCell<UniformState>>) -> Self {
        Self {
            state,
            uploads: Vec::new(),
        }
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.uploads.iter().filter(|n| *n == name).count()
    }
}

impl ShaderUniforms for RecordingShader {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_mat4(name, value);
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_vec4(name, value);
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_vec3(name, value);
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_vec2(name, value);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_float(name, value);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_int(name, value);
    }

    fn set_sampler(&mut self, name: &str, slot: i32) {
        self.uploads.push(name.to_string());
        self.state.borrow_mut().set_sampler(name, slot);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RecordedDraw {
    pub(crate) mesh: MeshKind,
    pub(crate) uniform: ObjectUniform,
    pub(crate) texture_slot: Option<usize>,
}

/// Mesh library that snapshots the shared uniforms at every draw.
pub(crate) struct RecordingMeshes {
    pub(crate) state: Rc<RefCell<UniformState>>,
    pub(crate) loads: Vec<(MeshKind, MeshSettings)>,
    pub(crate) draws: Vec<RecordedDraw>,
}

impl RecordingMeshes {
    pub(crate) fn new(state: Rc<RefCell<UniformState>>) -> Self {
        Self {
            state,
            loads: Vec::new(),
            draws: Vec::new(),
        }
    }
}

impl MeshProvider for RecordingMeshes {
    fn load_mesh(&mut self, kind: MeshKind, settings: &MeshSettings) {
        self.loads.push((kind, *settings));
    }

    fn draw_mesh(&mut self, kind: MeshKind) {
        let state = self.state.borrow();
        self.draws.push(RecordedDraw {
            mesh: kind,
            uniform: state.object,
            texture_slot: state.texture_slot,
        });
    }
}

/// Texture backend handing out numbered handles, optionally refusing images
/// larger than `max_side`.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) max_side: Option<u32>,
    pub(crate) created: Vec<(u32, u32, u32)>,
    pub(crate) bound: Vec<(usize, u32)>,
    pub(crate) released: Vec<u32>,
}

impl TextureBackend for FakeBackend {
    type Handle = u32;

    fn create(&mut self, image: &DecodedImage) -> Result<u32, TextureError> {
        if let Some(max_side) = self.max_side {
            check_dimensions(image, max_side)?;
        }
        let handle = self.created.len() as u32 + 1;
        self.created.push((handle, image.width(), image.height()));
        Ok(handle)
    }

    fn bind(&mut self, slot: usize, handle: u32) {
        self.bound.push((slot, handle));
    }

    fn release(&mut self, handle: u32) {
        self.released.push(handle);
    }
}

pub(crate) type TestComposer = SceneComposer<RecordingShader, RecordingMeshes, FakeBackend>;

/// A composer wired to recording collaborators, plus the state they share.
pub(crate) fn composer_with(names: UniformNames) -> (TestComposer, Rc<RefCell<UniformState>>) {
    composer_with_backend(names, FakeBackend::default())
}

pub(crate) fn composer_with_backend(
    names: UniformNames,
    backend: FakeBackend,
) -> (TestComposer, Rc<RefCell<UniformState>>) {
    let state = Rc::new(RefCell::new(UniformState::new(names.clone())));
    let composer = SceneComposer::new(
        Some(RecordingShader::new(state.clone())),
        RecordingMeshes::new(state.clone()),
        backend,
        names,
    );
    (composer, state)
}

pub(crate) fn composer() -> (TestComposer, Rc<RefCell<UniformState>>) {
    composer_with(UniformNames::default())
}

pub(crate) fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, format)
        .expect("failed to encode test image");
    bytes.into_inner()
}

pub(crate) fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::new_rgb8(width, height), ImageFormat::Png)
}

pub(crate) fn grey_png(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::new_luma8(width, height), ImageFormat::Png)
}

pub(crate) fn assert_close(actual: [f32; 4], expected: [f32; 4]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
    }
}
