//! Opaque handle types
//!
//! Handles are versioned slotmap keys. A released handle never aliases a
//! resource created later, and the default value is the null handle.

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Handle to a scene owned by the renderer
    pub struct SceneHandle;

    /// Handle to a view owned by a scene
    pub struct ViewHandle;

    /// Handle to a material owned by the resource manager
    pub struct MaterialHandle;

    /// Handle to a material instance owned by the resource manager
    pub struct MaterialInstanceHandle;

    /// Handle to a texture owned by the resource manager
    pub struct TextureHandle;
}

/// Validity checks shared by every handle type
pub trait HandleExt: Key {
    /// Whether this handle refers to anything at all
    fn is_valid(&self) -> bool {
        !self.is_null()
    }
}

impl<K: Key> HandleExt for K {}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_default_handle_is_invalid() {
        assert!(!TextureHandle::default().is_valid());
        assert!(!MaterialInstanceHandle::default().is_valid());
    }

    #[test]
    fn test_released_handle_is_not_reused() {
        let mut textures: SlotMap<TextureHandle, &str> = SlotMap::with_key();
        let first = textures.insert("first");
        textures.remove(first);
        let second = textures.insert("second");

        assert!(second.is_valid());
        assert_ne!(first, second);
        assert!(textures.get(first).is_none());
    }
}
