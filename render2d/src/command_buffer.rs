//! 2D command stream: writer, state coalescing, draw merging
//!
//! `CommandStream` accumulates encoded drawing instructions for one frame
//! (or one logical batch cycle) and hands the backend a contiguous byte
//! buffer plus a record count. Redundant state changes are coalesced against
//! cached current state, and consecutive draws are merged by accumulating
//! index counts into the most recent record.
//!
//! # Lifecycle
//!
//! Empty → `reset` → baseline (NextBatch, BlendState, RenderTarget,
//! Viewport) → front-end push/set calls → backend consumes `buffer()` →
//! `reset` → ... A stream is strictly single-writer per cycle; nothing here
//! takes a lock, exclusive access comes from `&mut self`.
//!
//! # Storage
//!
//! Records are stored in a `Vec<u32>` word arena, not a `Vec<u8>`. Every
//! record size is a multiple of 4, so word storage keeps every record offset
//! 4-byte aligned and reinterpreting the last record for in-place mutation
//! stays within `bytemuck`'s alignment contract. The merger addresses the
//! last record by offset and reborrows on every access; no pointer is held
//! across appends, so buffer growth cannot invalidate it.

use thiserror::Error;
use tracing::trace;

use crate::blend::BlendState;
use crate::instruction::{
    BlendStateCommand, DrawCommand, EncodedCommand, NextBatchCommand, Opcode, RenderTargetCommand,
    ViewportCommand,
};
use crate::retention::RetainedTargets;
use crate::target::{BackBufferProvider, RenderTexture, TextureId};
use crate::viewport::Viewport;

/// Initial stream capacity (16KB)
///
/// Pre-reserves enough for a typical frame so per-frame appends do not
/// reallocate.
const INITIAL_STREAM_CAPACITY: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum CommandStreamError {
    /// The resource provider had no back buffer to re-establish the
    /// baseline render target with. Fatal: no valid stream can be built.
    #[error("resource provider supplied no back buffer")]
    BackBufferUnavailable,
}

/// Per-cycle command stream for the 2D renderer
pub struct CommandStream {
    /// Encoded records, contiguous, 4-byte aligned word storage
    words: Vec<u32>,
    /// Number of records in the stream
    count: usize,
    /// Opcode of the most recently written record
    last_opcode: Opcode,
    /// Word offset of the most recently written record
    last_word: usize,
    /// Cached blend state; mutated only when a blend instruction is emitted
    current_blend_state: BlendState,
    /// Cached viewport; `None` = full render target
    current_viewport: Option<Viewport>,
    /// Cached render target; `None` only before the first reset
    current_render_target: Option<RenderTexture>,
    /// Strong handles for every target the stream references
    retained: RetainedTargets,
}

impl CommandStream {
    pub fn new() -> Self {
        Self {
            words: Vec::with_capacity(INITIAL_STREAM_CAPACITY / 4),
            count: 0,
            last_opcode: Opcode::Nop,
            last_word: 0,
            current_blend_state: BlendState::default(),
            current_viewport: None,
            current_render_target: None,
            retained: RetainedTargets::new(),
        }
    }

    /// Append one encoded record and make it the "last instruction".
    fn write<C: EncodedCommand>(&mut self, command: &C) {
        let offset = self.words.len();
        let bytes = bytemuck::bytes_of(command);
        self.words.extend(
            bytes
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>),
        );
        self.count += 1;
        self.last_word = offset;
        self.last_opcode = C::OPCODE;
    }

    /// Reinterpret the most recent record for in-place mutation.
    ///
    /// Caller must have checked `last_opcode` first; the merger is the only
    /// user.
    fn last_mut<C: EncodedCommand>(&mut self) -> &mut C {
        debug_assert_eq!(self.last_opcode, C::OPCODE);
        let end = self.last_word + size_of::<C>() / 4;
        bytemuck::from_bytes_mut(bytemuck::cast_slice_mut(&mut self.words[self.last_word..end]))
    }

    /// Number of records in the stream
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Raw encoded stream for the backend interpreter
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Clear the stream and re-establish the baseline state.
    ///
    /// Writes, in order: a NextBatch marker, the cached blend state, the
    /// provider's current back buffer as render target (retained first),
    /// and the cached viewport. Every stream therefore starts fully
    /// specified regardless of how the previous frame ended.
    pub fn reset(
        &mut self,
        provider: &impl BackBufferProvider,
    ) -> Result<(), CommandStreamError> {
        let back_buffer = provider
            .back_buffer()
            .ok_or(CommandStreamError::BackBufferUnavailable)?;

        self.words.clear();
        self.count = 0;
        self.last_opcode = Opcode::Nop;
        self.last_word = 0;
        self.retained.clear();

        self.push_next_batch();

        let blend = self.current_blend_state;
        self.write(&BlendStateCommand::new(&blend));

        self.retained.retain(&back_buffer);
        self.write(&RenderTargetCommand::new(back_buffer.id()));
        self.current_render_target = Some(back_buffer);

        let viewport = self.current_viewport;
        self.write(&ViewportCommand::new(viewport));

        trace!(count = self.count, "command stream reset to baseline");
        Ok(())
    }

    /// Record an indexed draw.
    ///
    /// Merges into the previous record when that record is itself a draw:
    /// any intervening state change or batch marker breaks the run, so a
    /// merged draw is guaranteed to share all state.
    pub fn push_draw(&mut self, index_count: u32) {
        if self.last_opcode == Opcode::Draw {
            self.last_mut::<DrawCommand>().index_count += index_count;
            return;
        }

        self.write(&DrawCommand::new(index_count));
    }

    /// Force a batch boundary.
    ///
    /// Always appends; draws never merge across the marker. Used when an
    /// external constraint (vertex/index buffer capacity) requires a flush.
    pub fn push_next_batch(&mut self) {
        self.write(&NextBatchCommand::new());
    }

    /// Request a blend state change; coalesced when equal to the cached one.
    pub fn set_blend_state(&mut self, state: BlendState) {
        if state == self.current_blend_state {
            return;
        }

        self.write(&BlendStateCommand::new(&state));
        self.current_blend_state = state;
    }

    /// Request a viewport change; coalesced when equal to the cached one.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        if viewport == self.current_viewport {
            return;
        }

        self.write(&ViewportCommand::new(viewport));
        self.current_viewport = viewport;
    }

    /// Request a render target switch; coalesced by target identity.
    ///
    /// Retains the texture before writing the instruction, so the stream
    /// never references an id the retention table does not cover.
    pub fn set_render_target(&mut self, texture: &RenderTexture) {
        if self.current_target_id() == Some(texture.id()) {
            return;
        }

        self.retained.retain(texture);
        self.write(&RenderTargetCommand::new(texture.id()));
        self.current_render_target = Some(texture.clone());
    }

    /// Cached blend state (what the next coalescing compare runs against)
    pub fn current_blend_state(&self) -> BlendState {
        self.current_blend_state
    }

    /// Cached viewport
    pub fn current_viewport(&self) -> Option<Viewport> {
        self.current_viewport
    }

    /// Cached render target; `None` only before the first reset
    pub fn current_render_target(&self) -> Option<&RenderTexture> {
        self.current_render_target.as_ref()
    }

    /// Targets retained for the current stream
    pub fn retained_targets(&self) -> &RetainedTargets {
        &self.retained
    }

    fn current_target_id(&self) -> Option<TextureId> {
        self.current_render_target.as_ref().map(|t| t.id())
    }
}

impl Default for CommandStream {
    fn default() -> Self {
        Self::new()
    }
}
