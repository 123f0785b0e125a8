//! Ignis 2D renderer command stream
//!
//! Encodes high-level drawing operations (draw calls, blend-state changes,
//! viewport changes, render-target switches) into a compact, replayable
//! instruction stream for a graphics backend to consume.
//!
//! # Architecture
//!
//! **Drawing front end** → **CommandStream** (coalesce/merge + encode) →
//! **backend interpreter** (decode + GPU execution, external)
//!
//! - The front end issues `push_draw`/`set_*` calls in draw order
//! - `CommandStream` suppresses redundant state changes against cached
//!   current state and merges consecutive draws into one record
//! - Each cycle starts with `reset`, which rebuilds the baseline state from
//!   the externally supplied back buffer and keeps a strong handle to every
//!   render target the stream references
//! - The backend reads `count()` and `buffer()` once per cycle and walks the
//!   records with `CommandDecoder`
//!
//! One stream has exactly one writer per build-then-consume cycle; `&mut`
//! access is the synchronization.

mod blend;
mod command_buffer;
mod decode;
mod instruction;
mod retention;
mod target;
mod viewport;

pub use blend::{BlendFactor, BlendOp, BlendState};
pub use command_buffer::{CommandStream, CommandStreamError};
pub use decode::{CommandDecoder, DecodedCommand};
pub use instruction::{
    BlendStateCommand, DrawCommand, EncodedCommand, InstructionHeader, NextBatchCommand,
    NopCommand, Opcode, RenderTargetCommand, ViewportCommand,
};
pub use retention::RetainedTargets;
pub use target::{BackBufferProvider, RenderTexture, TextureId};
pub use viewport::Viewport;
