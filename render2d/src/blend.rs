//! Blend state for 2D draw batching
//!
//! Defines the blend factor/op enums and the `BlendState` value type that
//! the command stream caches and encodes. The wire form is a single packed
//! u32 word so a blend-state instruction stays at 8 bytes.

/// Source/destination blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlendFactor {
    #[default]
    Zero = 0,
    One = 1,
    SrcAlpha = 2,
    InvSrcAlpha = 3,
    SrcColor = 4,
    InvSrcColor = 5,
    DstAlpha = 6,
    InvDstAlpha = 7,
    DstColor = 8,
    InvDstColor = 9,
}

impl BlendFactor {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => BlendFactor::Zero,
            1 => BlendFactor::One,
            2 => BlendFactor::SrcAlpha,
            3 => BlendFactor::InvSrcAlpha,
            4 => BlendFactor::SrcColor,
            5 => BlendFactor::InvSrcColor,
            6 => BlendFactor::DstAlpha,
            7 => BlendFactor::InvDstAlpha,
            8 => BlendFactor::DstColor,
            9 => BlendFactor::InvDstColor,
            _ => BlendFactor::Zero,
        }
    }
}

/// Blend operation combining source and destination terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlendOp {
    #[default]
    Add = 0,
    Subtract = 1,
    ReverseSubtract = 2,
    Min = 3,
    Max = 4,
}

impl BlendOp {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => BlendOp::Add,
            1 => BlendOp::Subtract,
            2 => BlendOp::ReverseSubtract,
            3 => BlendOp::Min,
            4 => BlendOp::Max,
            _ => BlendOp::Add,
        }
    }
}

// Packed word layout (low to high):
// enabled(1) + src(4) + dst(4) + op(3) + src_alpha(4) + dst_alpha(4) + op_alpha(3)
const SRC_SHIFT: u32 = 1;
const DST_SHIFT: u32 = 5;
const OP_SHIFT: u32 = 9;
const SRC_ALPHA_SHIFT: u32 = 12;
const DST_ALPHA_SHIFT: u32 = 16;
const OP_ALPHA_SHIFT: u32 = 20;
const FACTOR_MASK: u32 = 0xF;
const OP_MASK: u32 = 0x7;

/// Full blend configuration for one draw batch
///
/// Compared by value when coalescing; a `set_blend_state` call with a state
/// equal to the cached one writes nothing to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// Blending enabled (false = opaque overwrite)
    pub enabled: bool,
    /// Color source factor
    pub src: BlendFactor,
    /// Color destination factor
    pub dst: BlendFactor,
    /// Color blend operation
    pub op: BlendOp,
    /// Alpha source factor
    pub src_alpha: BlendFactor,
    /// Alpha destination factor
    pub dst_alpha: BlendFactor,
    /// Alpha blend operation
    pub op_alpha: BlendOp,
}

impl BlendState {
    /// Standard alpha blending (the initial cached state)
    pub const ALPHA: BlendState = BlendState {
        enabled: true,
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::InvSrcAlpha,
        op: BlendOp::Add,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::InvSrcAlpha,
        op_alpha: BlendOp::Add,
    };

    /// Additive blending (glow, particles)
    pub const ADDITIVE: BlendState = BlendState {
        enabled: true,
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::One,
        op: BlendOp::Add,
        src_alpha: BlendFactor::Zero,
        dst_alpha: BlendFactor::One,
        op_alpha: BlendOp::Add,
    };

    /// Blending disabled, source overwrites destination
    pub const OPAQUE: BlendState = BlendState {
        enabled: false,
        src: BlendFactor::One,
        dst: BlendFactor::Zero,
        op: BlendOp::Add,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::Zero,
        op_alpha: BlendOp::Add,
    };

    /// Pack into the single-word wire form
    pub fn pack(&self) -> u32 {
        (self.enabled as u32)
            | (self.src as u32) << SRC_SHIFT
            | (self.dst as u32) << DST_SHIFT
            | (self.op as u32) << OP_SHIFT
            | (self.src_alpha as u32) << SRC_ALPHA_SHIFT
            | (self.dst_alpha as u32) << DST_ALPHA_SHIFT
            | (self.op_alpha as u32) << OP_ALPHA_SHIFT
    }

    /// Unpack from the single-word wire form
    pub fn unpack(word: u32) -> Self {
        Self {
            enabled: (word & 1) != 0,
            src: BlendFactor::from_u32((word >> SRC_SHIFT) & FACTOR_MASK),
            dst: BlendFactor::from_u32((word >> DST_SHIFT) & FACTOR_MASK),
            op: BlendOp::from_u32((word >> OP_SHIFT) & OP_MASK),
            src_alpha: BlendFactor::from_u32((word >> SRC_ALPHA_SHIFT) & FACTOR_MASK),
            dst_alpha: BlendFactor::from_u32((word >> DST_ALPHA_SHIFT) & FACTOR_MASK),
            op_alpha: BlendOp::from_u32((word >> OP_ALPHA_SHIFT) & OP_MASK),
        }
    }
}

impl Default for BlendState {
    fn default() -> Self {
        BlendState::ALPHA
    }
}
