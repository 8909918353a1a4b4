//! Tag-addressed texture table with a fixed number of texture units.
//!
//! Textures are appended in load order; the position of an entry is its slot,
//! i.e. the texture unit it is bound to by [`TextureRegistry::bind_all`] and the
//! value the sampler uniform receives. The table never holds more than
//! [`TEXTURE_CAPACITY`] entries.

use std::path::Path;

use crate::{
    data_structures::texture::DecodedImage,
    error::TextureError,
    resources::texture::{decode_image, load_binary},
};

/// Number of texture units the scene shader can address.
pub const TEXTURE_CAPACITY: usize = 16;

/// Creates, binds and destroys textures for a [`TextureRegistry`].
pub trait TextureBackend {
    type Handle: Copy + PartialEq + std::fmt::Debug;

    fn create(&mut self, image: &DecodedImage) -> Result<Self::Handle, TextureError>;

    /// Make `handle` the texture sampled through unit `slot`.
    fn bind(&mut self, slot: usize, handle: Self::Handle);

    fn release(&mut self, handle: Self::Handle);
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
}

pub struct TextureRegistry<B: TextureBackend> {
    backend: B,
    entries: Vec<TextureEntry<B::Handle>>,
}

impl<B: TextureBackend> TextureRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            entries: Vec::with_capacity(TEXTURE_CAPACITY),
        }
    }

    /// Read, decode and register the image at `path` under `tag`.
    ///
    /// Returns the slot the texture occupies. On any failure the table is left
    /// exactly as it was.
    pub async fn load(&mut self, path: &Path, tag: &str) -> Result<usize, TextureError> {
        let bytes = load_binary(path.to_path_buf()).await?;
        self.load_bytes(&bytes, tag)
    }

    /// Decode already-read file contents and register them under `tag`.
    pub fn load_bytes(&mut self, bytes: &[u8], tag: &str) -> Result<usize, TextureError> {
        self.ensure_capacity(tag)?;
        let image = decode_image(bytes, tag)?;
        self.register(&image, tag)
    }

    /// Register an already decoded image under `tag`.
    pub fn register(&mut self, image: &DecodedImage, tag: &str) -> Result<usize, TextureError> {
        self.ensure_capacity(tag)?;
        if self.find_slot(tag).is_some() {
            log::warn!("Texture tag {tag} is already registered, lookups keep the first one");
        }
        let handle = self.backend.create(image)?;
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(self.entries.len() - 1)
    }

    fn ensure_capacity(&self, tag: &str) -> Result<(), TextureError> {
        if self.entries.len() >= TEXTURE_CAPACITY {
            return Err(TextureError::CapacityExceeded {
                tag: tag.to_string(),
                capacity: TEXTURE_CAPACITY,
            });
        }
        Ok(())
    }

    /// Bind every loaded texture to the unit matching its slot.
    pub fn bind_all(&mut self) {
        for (slot, entry) in self.entries.iter().enumerate() {
            self.backend.bind(slot, entry.handle);
        }
    }

    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == tag)
    }

    pub fn find_id(&self, tag: &str) -> Option<B::Handle> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.handle)
    }

    /// Destroy every texture and empty the table.
    pub fn release_all(&mut self) {
        for entry in self.entries.drain(..) {
            self.backend.release(entry.handle);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: TextureBackend> Drop for TextureRegistry<B> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::{cell::RefCell, rc::Rc};

    /// `released` is shared so it can be inspected after the registry is gone.
    #[derive(Default)]
    struct CountingBackend {
        created: u32,
        bound: Vec<(usize, u32)>,
        released: Rc<RefCell<Vec<u32>>>,
    }

    impl TextureBackend for CountingBackend {
        type Handle = u32;

        fn create(&mut self, _: &DecodedImage) -> Result<u32, TextureError> {
            self.created += 1;
            Ok(100 + self.created)
        }

        fn bind(&mut self, slot: usize, handle: u32) {
            self.bound.push((slot, handle));
        }

        fn release(&mut self, handle: u32) {
            self.released.borrow_mut().push(handle);
        }
    }

    fn image() -> DecodedImage {
        DecodedImage {
            label: "img".into(),
            channels: 4,
            rgba: RgbaImage::new(2, 2),
        }
    }

    #[test]
    fn unknown_tags_resolve_to_none() {
        let mut registry = TextureRegistry::new(CountingBackend::default());
        assert_eq!(registry.find_slot("oakWood"), None);
        registry.register(&image(), "oakWood").unwrap();
        assert_eq!(registry.find_slot("oakwood"), None);
        assert_eq!(registry.find_id("steel"), None);
    }

    #[test]
    fn slots_follow_load_order() {
        let mut registry = TextureRegistry::new(CountingBackend::default());
        let tags = ["oakWood", "metalTexture", "steelTexture", "letterA"];
        for (i, tag) in tags.iter().enumerate() {
            assert_eq!(registry.register(&image(), tag).unwrap(), i);
        }
        assert_eq!(registry.len(), tags.len());
        for (i, tag) in tags.iter().enumerate() {
            assert_eq!(registry.find_slot(tag), Some(i));
            assert_eq!(registry.find_id(tag), Some(101 + i as u32));
        }
    }

    #[test]
    fn duplicate_tag_resolves_to_first_entry() {
        let mut registry = TextureRegistry::new(CountingBackend::default());
        registry.register(&image(), "plastic").unwrap();
        registry.register(&image(), "wood").unwrap();
        registry.register(&image(), "plastic").unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.find_slot("plastic"), Some(0));
        assert_eq!(registry.find_id("plastic"), Some(101));
    }

    #[test]
    fn seventeenth_texture_is_rejected() {
        let mut registry = TextureRegistry::new(CountingBackend::default());
        for i in 0..TEXTURE_CAPACITY {
            registry.register(&image(), &format!("t{i}")).unwrap();
        }
        let err = registry.register(&image(), "one too many").unwrap_err();
        assert!(matches!(err, TextureError::CapacityExceeded { capacity: 16, .. }));
        assert_eq!(registry.len(), TEXTURE_CAPACITY);
        assert_eq!(registry.backend().created, TEXTURE_CAPACITY as u32);
    }

    #[test]
    fn bind_all_uses_slot_as_unit() {
        let mut registry = TextureRegistry::new(CountingBackend::default());
        registry.register(&image(), "a").unwrap();
        registry.register(&image(), "b").unwrap();
        registry.bind_all();
        assert_eq!(registry.backend().bound, vec![(0, 101), (1, 102)]);
    }

    #[test]
    fn release_all_hands_every_handle_back() {
        let mut registry = TextureRegistry::new(CountingBackend::default());
        registry.register(&image(), "a").unwrap();
        registry.register(&image(), "b").unwrap();
        registry.release_all();
        assert!(registry.is_empty());
        assert_eq!(*registry.backend().released.borrow(), vec![101, 102]);
        assert_eq!(registry.find_slot("a"), None);
        // Releasing twice is a no-op.
        registry.release_all();
        assert_eq!(registry.backend().released.borrow().len(), 2);
    }

    #[test]
    fn dropping_the_registry_releases_what_is_left() {
        let backend = CountingBackend::default();
        let released = backend.released.clone();
        let mut registry = TextureRegistry::new(backend);
        registry.register(&image(), "a").unwrap();
        registry.register(&image(), "b").unwrap();
        registry.register(&image(), "c").unwrap();
        drop(registry);
        assert_eq!(*released.borrow(), vec![101, 102, 103]);
    }

    #[test]
    fn drop_after_release_all_releases_nothing_twice() {
        let backend = CountingBackend::default();
        let released = backend.released.clone();
        let mut registry = TextureRegistry::new(backend);
        registry.register(&image(), "a").unwrap();
        registry.release_all();
        drop(registry);
        assert_eq!(*released.borrow(), vec![101]);
    }
}
