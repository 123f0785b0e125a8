//! Strong-handle retention for targets referenced by a command stream
//!
//! A render-target instruction only carries a `TextureId`; nothing in the
//! byte buffer keeps the texture alive. This table holds one strong handle
//! per referenced id so every target stays valid until the stream is
//! consumed and reset. Records are never removed from a stream once
//! written, so there is no per-entry release, only clear-all.

use hashbrown::HashMap;

use crate::target::{RenderTexture, TextureId};

/// Id → strong handle table covering the current stream
#[derive(Debug, Default)]
pub struct RetainedTargets {
    targets: HashMap<TextureId, RenderTexture>,
}

impl RetainedTargets {
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    /// Retain a strong handle for `texture`'s id.
    ///
    /// Idempotent: a second call with the same id keeps the handle already
    /// held and does not replace it.
    pub fn retain(&mut self, texture: &RenderTexture) {
        self.targets
            .entry(texture.id())
            .or_insert_with(|| texture.clone());
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.targets.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Release every held handle
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_extends_lifetime() {
        let texture = RenderTexture::new(TextureId(3), 64, 64);
        let mut table = RetainedTargets::new();
        assert_eq!(texture.strong_count(), 1);

        table.retain(&texture);
        assert_eq!(texture.strong_count(), 2);
        assert!(table.contains(TextureId(3)));

        table.clear();
        assert_eq!(texture.strong_count(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_retain_is_idempotent() {
        let texture = RenderTexture::new(TextureId(9), 64, 64);
        let mut table = RetainedTargets::new();

        table.retain(&texture);
        table.retain(&texture);
        table.retain(&texture);

        assert_eq!(table.len(), 1);
        // One table entry, one caller handle
        assert_eq!(texture.strong_count(), 2);
    }

    #[test]
    fn test_retain_keeps_first_handle() {
        let first = RenderTexture::new(TextureId(5), 32, 32);
        // Distinct resource reusing the same id; the table must not swap to it
        let second = RenderTexture::new(TextureId(5), 128, 128);
        let mut table = RetainedTargets::new();

        table.retain(&first);
        table.retain(&second);

        assert_eq!(table.len(), 1);
        assert_eq!(first.strong_count(), 2);
        assert_eq!(second.strong_count(), 1);
    }
}
