//! Instruction catalog for the 2D command stream
//!
//! Every record in the stream is `{ opcode: u16, size: u16, payload... }`,
//! native-endian, 4-byte aligned. `size` is the full encoded length of the
//! record including its header, so a consumer can walk the stream by reading
//! a header and skipping `size` bytes without knowing every opcode.
//!
//! Each record struct is plain-old-data and carries its own pre-filled
//! header; encoding is a straight `bytemuck::bytes_of` copy. Record sizes
//! are verified at compile time, wrong payload layout does not survive to
//! runtime.

use bytemuck::{Pod, Zeroable};

use crate::blend::BlendState;
use crate::target::TextureId;
use crate::viewport::Viewport;

/// Operation tag for one stream record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum Opcode {
    /// Zero-effect marker; consumers skip it
    #[default]
    Nop = 0,
    /// Indexed draw spanning `index_count` indices
    Draw = 1,
    /// Batch boundary; draws never merge across it
    NextBatch = 2,
    /// Blend state change
    BlendState = 3,
    /// Viewport change (optional rect)
    Viewport = 4,
    /// Render target switch
    RenderTarget = 5,
}

impl Opcode {
    /// Decode a raw tag; `None` for opcodes this build does not know,
    /// which consumers must treat as zero-effect records.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Opcode::Nop),
            1 => Some(Opcode::Draw),
            2 => Some(Opcode::NextBatch),
            3 => Some(Opcode::BlendState),
            4 => Some(Opcode::Viewport),
            5 => Some(Opcode::RenderTarget),
            _ => None,
        }
    }
}

/// Common header prefixing every encoded record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct InstructionHeader {
    /// Raw `Opcode` tag
    pub opcode: u16,
    /// Full record length in bytes, header included; always a multiple of 4
    pub size: u16,
}

impl InstructionHeader {
    const fn of<C: EncodedCommand>() -> Self {
        Self {
            opcode: C::OPCODE as u16,
            size: size_of::<C>() as u16,
        }
    }
}

/// A fixed-layout record the stream writer can append byte-for-byte.
///
/// One implementation per `Opcode`. The writer relies on `OPCODE` matching
/// the header the constructor filled in; the merger relies on it to
/// reinterpret the most recent record at its recorded offset.
pub trait EncodedCommand: Pod {
    const OPCODE: Opcode;
}

/// `Opcode::Nop` — reserved zero-effect record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct NopCommand {
    pub header: InstructionHeader,
}

impl NopCommand {
    pub const fn new() -> Self {
        Self {
            header: InstructionHeader::of::<Self>(),
        }
    }
}

impl Default for NopCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodedCommand for NopCommand {
    const OPCODE: Opcode = Opcode::Nop;
}

/// `Opcode::Draw` — indexed draw call
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawCommand {
    pub header: InstructionHeader,
    /// Number of indices to draw; consecutive draws accumulate here
    pub index_count: u32,
}

impl DrawCommand {
    pub const fn new(index_count: u32) -> Self {
        Self {
            header: InstructionHeader::of::<Self>(),
            index_count,
        }
    }
}

impl EncodedCommand for DrawCommand {
    const OPCODE: Opcode = Opcode::Draw;
}

/// `Opcode::NextBatch` — forced batch boundary
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct NextBatchCommand {
    pub header: InstructionHeader,
}

impl NextBatchCommand {
    pub const fn new() -> Self {
        Self {
            header: InstructionHeader::of::<Self>(),
        }
    }
}

impl Default for NextBatchCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodedCommand for NextBatchCommand {
    const OPCODE: Opcode = Opcode::NextBatch;
}

/// `Opcode::BlendState` — blend state change, packed wire form
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BlendStateCommand {
    pub header: InstructionHeader,
    /// `BlendState::pack()` word
    pub state: u32,
}

impl BlendStateCommand {
    pub fn new(state: &BlendState) -> Self {
        Self {
            header: InstructionHeader::of::<Self>(),
            state: state.pack(),
        }
    }

    pub fn state(&self) -> BlendState {
        BlendState::unpack(self.state)
    }
}

impl EncodedCommand for BlendStateCommand {
    const OPCODE: Opcode = Opcode::BlendState;
}

/// `Opcode::Viewport` — viewport change
///
/// Encodes `Option<Viewport>`: `present == 0` means the full render target,
/// with the rect fields zeroed and ignored.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ViewportCommand {
    pub header: InstructionHeader,
    /// 1 if a rect follows, 0 for "full target"
    pub present: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ViewportCommand {
    pub fn new(viewport: Option<Viewport>) -> Self {
        let rect = viewport.unwrap_or_default();
        Self {
            header: InstructionHeader::of::<Self>(),
            present: viewport.is_some() as u32,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        (self.present != 0).then(|| Viewport::new(self.x, self.y, self.width, self.height))
    }
}

impl EncodedCommand for ViewportCommand {
    const OPCODE: Opcode = Opcode::Viewport;
}

/// `Opcode::RenderTarget` — render target switch
///
/// The referenced id is guaranteed to have a live entry in the stream's
/// retention table; the writer retains before it writes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RenderTargetCommand {
    pub header: InstructionHeader,
    /// Raw `TextureId` of the target to bind
    pub texture_id: u32,
}

impl RenderTargetCommand {
    pub const fn new(id: TextureId) -> Self {
        Self {
            header: InstructionHeader::of::<Self>(),
            texture_id: id.0,
        }
    }

    pub fn texture_id(&self) -> TextureId {
        TextureId(self.texture_id)
    }
}

impl EncodedCommand for RenderTargetCommand {
    const OPCODE: Opcode = Opcode::RenderTarget;
}

// Compile-time layout verification: every record must be 4-byte aligned in
// the stream and its declared size must match its encoded size exactly.
const _: () = assert!(size_of::<InstructionHeader>() == 4);
const _: () = assert!(size_of::<NopCommand>() == 4);
const _: () = assert!(size_of::<DrawCommand>() == 8);
const _: () = assert!(size_of::<NextBatchCommand>() == 4);
const _: () = assert!(size_of::<BlendStateCommand>() == 8);
const _: () = assert!(size_of::<ViewportCommand>() == 24);
const _: () = assert!(size_of::<RenderTargetCommand>() == 8);
const _: () = assert!(size_of::<NopCommand>() % 4 == 0);
const _: () = assert!(size_of::<DrawCommand>() % 4 == 0);
const _: () = assert!(size_of::<NextBatchCommand>() % 4 == 0);
const _: () = assert!(size_of::<BlendStateCommand>() % 4 == 0);
const _: () = assert!(size_of::<ViewportCommand>() % 4 == 0);
const _: () = assert!(size_of::<RenderTargetCommand>() % 4 == 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip() {
        for opcode in [
            Opcode::Nop,
            Opcode::Draw,
            Opcode::NextBatch,
            Opcode::BlendState,
            Opcode::Viewport,
            Opcode::RenderTarget,
        ] {
            assert_eq!(Opcode::from_u16(opcode as u16), Some(opcode));
        }
        assert_eq!(Opcode::from_u16(6), None);
        assert_eq!(Opcode::from_u16(u16::MAX), None);
    }

    #[test]
    fn test_headers_self_describe() {
        let draw = DrawCommand::new(36);
        assert_eq!(draw.header.opcode, Opcode::Draw as u16);
        assert_eq!(draw.header.size as usize, size_of::<DrawCommand>());

        let batch = NextBatchCommand::new();
        assert_eq!(batch.header.opcode, Opcode::NextBatch as u16);
        assert_eq!(batch.header.size, 4);
    }

    #[test]
    fn test_viewport_command_encodes_option() {
        let none = ViewportCommand::new(None);
        assert_eq!(none.present, 0);
        assert_eq!(none.viewport(), None);

        let rect = Viewport::new(-8, 16, 800, 600);
        let some = ViewportCommand::new(Some(rect));
        assert_eq!(some.viewport(), Some(rect));
    }

    #[test]
    fn test_blend_state_command_round_trip() {
        let cmd = BlendStateCommand::new(&BlendState::ADDITIVE);
        assert_eq!(cmd.state(), BlendState::ADDITIVE);
    }

    #[test]
    fn test_render_target_command_id() {
        let cmd = RenderTargetCommand::new(TextureId(42));
        assert_eq!(cmd.texture_id(), TextureId(42));
    }

    #[test]
    fn test_record_bytes_start_with_header() {
        let draw = DrawCommand::new(6);
        let bytes = bytemuck::bytes_of(&draw);
        assert_eq!(bytes.len(), 8);
        let header: &InstructionHeader = bytemuck::from_bytes(&bytes[..4]);
        assert_eq!(header.opcode, Opcode::Draw as u16);
        assert_eq!(header.size, 8);
    }
}
