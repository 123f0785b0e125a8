//! Render-target resource handles
//!
//! The command stream never touches GPU memory; it stores opaque texture
//! identifiers and keeps a strong handle alive for every target a stream
//! references. Actual texture contents live with whatever registry created
//! them (graphics backend, asset loader).

use std::sync::Arc;

/// Identifier for a render-target texture
///
/// Allocated by the external resource registry; the command stream only
/// stores and compares these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Invalid/null texture id
    pub const INVALID: TextureId = TextureId(0);
}

#[derive(Debug)]
struct TargetDescriptor {
    width: u32,
    height: u32,
}

/// Strong handle to a renderable texture
///
/// Cheap to clone (one `Arc` bump). The refcount is thread-safe because the
/// wider engine may hold the same resource from another thread (background
/// loaders); the command stream itself is single-writer.
#[derive(Debug, Clone)]
pub struct RenderTexture {
    id: TextureId,
    descriptor: Arc<TargetDescriptor>,
}

impl RenderTexture {
    pub fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self {
            id,
            descriptor: Arc::new(TargetDescriptor { width, height }),
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Number of live strong handles to this texture
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.descriptor)
    }
}

/// External collaborator supplying the default render target.
///
/// Every stream reset re-binds the current back buffer as the baseline
/// render target. Returning `None` is fatal for the reset: no valid stream
/// can be built without a target to draw into.
pub trait BackBufferProvider {
    fn back_buffer(&self) -> Option<RenderTexture>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_descriptor() {
        let texture = RenderTexture::new(TextureId(7), 256, 256);
        assert_eq!(texture.strong_count(), 1);
        let alias = texture.clone();
        assert_eq!(texture.strong_count(), 2);
        assert_eq!(alias.id(), TextureId(7));
        drop(alias);
        assert_eq!(texture.strong_count(), 1);
    }

    #[test]
    fn test_descriptor_accessors() {
        let texture = RenderTexture::new(TextureId(1), 960, 540);
        assert_eq!(texture.width(), 960);
        assert_eq!(texture.height(), 540);
    }
}
