//! Stream decoding for the backend interpreter
//!
//! Walks an encoded stream record-by-record: read a header, decode the
//! payload for opcodes we know, advance by `header.size`. Unknown opcodes
//! decode as `Nop` so a newer producer's records pass through an older
//! consumer as zero-effect markers.
//!
//! Reads are unaligned (`pod_read_unaligned`), so a decoder works on any
//! byte slice, not just one backed by `CommandStream`'s word storage.

use tracing::warn;

use crate::blend::BlendState;
use crate::instruction::{
    BlendStateCommand, DrawCommand, EncodedCommand, InstructionHeader, Opcode, RenderTargetCommand,
    ViewportCommand,
};
use crate::target::TextureId;
use crate::viewport::Viewport;

/// One decoded stream record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedCommand {
    /// Zero-effect record (reserved opcode, or one this build does not know)
    Nop,
    Draw { index_count: u32 },
    NextBatch,
    BlendState(BlendState),
    Viewport(Option<Viewport>),
    RenderTarget(TextureId),
}

/// Iterator over the records of an encoded stream.
///
/// A malformed tail (truncated record, zero or misaligned size) ends
/// iteration with a warning; a well-formed stream always decodes to exactly
/// `CommandStream::count()` records with offsets landing on the buffer end.
pub struct CommandDecoder<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> CommandDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Byte offset of the next unread record
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn read<C: EncodedCommand>(record: &[u8]) -> Option<C> {
        (record.len() == size_of::<C>()).then(|| bytemuck::pod_read_unaligned(record))
    }

    fn decode_record(record: &[u8], opcode: u16) -> Option<DecodedCommand> {
        let decoded = match Opcode::from_u16(opcode) {
            // Unknown opcodes are zero-effect by contract
            None | Some(Opcode::Nop) => DecodedCommand::Nop,
            Some(Opcode::NextBatch) => DecodedCommand::NextBatch,
            Some(Opcode::Draw) => {
                let cmd: DrawCommand = Self::read(record)?;
                DecodedCommand::Draw {
                    index_count: cmd.index_count,
                }
            }
            Some(Opcode::BlendState) => {
                let cmd: BlendStateCommand = Self::read(record)?;
                DecodedCommand::BlendState(cmd.state())
            }
            Some(Opcode::Viewport) => {
                let cmd: ViewportCommand = Self::read(record)?;
                DecodedCommand::Viewport(cmd.viewport())
            }
            Some(Opcode::RenderTarget) => {
                let cmd: RenderTargetCommand = Self::read(record)?;
                DecodedCommand::RenderTarget(cmd.texture_id())
            }
        };
        Some(decoded)
    }
}

impl Iterator for CommandDecoder<'_> {
    type Item = DecodedCommand;

    fn next(&mut self) -> Option<DecodedCommand> {
        let remaining = &self.bytes[self.offset..];
        if remaining.is_empty() {
            return None;
        }

        if remaining.len() < size_of::<InstructionHeader>() {
            warn!(
                offset = self.offset,
                "truncated command stream: partial header"
            );
            self.offset = self.bytes.len();
            return None;
        }

        let header: InstructionHeader =
            bytemuck::pod_read_unaligned(&remaining[..size_of::<InstructionHeader>()]);
        let size = header.size as usize;

        if size < size_of::<InstructionHeader>() || size % 4 != 0 || size > remaining.len() {
            warn!(
                offset = self.offset,
                opcode = header.opcode,
                size,
                "malformed command record"
            );
            self.offset = self.bytes.len();
            return None;
        }

        match Self::decode_record(&remaining[..size], header.opcode) {
            Some(decoded) => {
                self.offset += size;
                Some(decoded)
            }
            None => {
                warn!(
                    offset = self.offset,
                    opcode = header.opcode,
                    size,
                    "command record size does not match its opcode"
                );
                self.offset = self.bytes.len();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::NextBatchCommand;

    fn encode<C: EncodedCommand>(out: &mut Vec<u8>, command: &C) {
        out.extend_from_slice(bytemuck::bytes_of(command));
    }

    #[test]
    fn test_empty_stream_decodes_to_nothing() {
        assert_eq!(CommandDecoder::new(&[]).count(), 0);
    }

    #[test]
    fn test_decodes_mixed_records() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &NextBatchCommand::new());
        encode(&mut bytes, &BlendStateCommand::new(&BlendState::OPAQUE));
        encode(&mut bytes, &RenderTargetCommand::new(TextureId(3)));
        encode(
            &mut bytes,
            &ViewportCommand::new(Some(Viewport::new(0, 0, 320, 180))),
        );
        encode(&mut bytes, &DrawCommand::new(66));

        let decoded: Vec<_> = CommandDecoder::new(&bytes).collect();
        assert_eq!(
            decoded,
            vec![
                DecodedCommand::NextBatch,
                DecodedCommand::BlendState(BlendState::OPAQUE),
                DecodedCommand::RenderTarget(TextureId(3)),
                DecodedCommand::Viewport(Some(Viewport::new(0, 0, 320, 180))),
                DecodedCommand::Draw { index_count: 66 },
            ]
        );
    }

    #[test]
    fn test_unknown_opcode_skips_as_nop() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &DrawCommand::new(3));
        // Future record: opcode 9, 12-byte payload this build cannot parse
        let unknown = InstructionHeader { opcode: 9, size: 12 };
        bytes.extend_from_slice(bytemuck::bytes_of(&unknown));
        bytes.extend_from_slice(&[0u8; 8]);
        encode(&mut bytes, &DrawCommand::new(5));

        let decoded: Vec<_> = CommandDecoder::new(&bytes).collect();
        assert_eq!(
            decoded,
            vec![
                DecodedCommand::Draw { index_count: 3 },
                DecodedCommand::Nop,
                DecodedCommand::Draw { index_count: 5 },
            ]
        );
    }

    #[test]
    fn test_truncated_record_stops_iteration() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &DrawCommand::new(3));
        // Header claims 8 bytes but only the header itself is present
        let header = InstructionHeader {
            opcode: Opcode::Draw as u16,
            size: 8,
        };
        bytes.extend_from_slice(bytemuck::bytes_of(&header));

        let decoded: Vec<_> = CommandDecoder::new(&bytes).collect();
        assert_eq!(decoded, vec![DecodedCommand::Draw { index_count: 3 }]);
    }

    #[test]
    fn test_misaligned_size_stops_iteration() {
        let header = InstructionHeader {
            opcode: Opcode::Nop as u16,
            size: 6,
        };
        let mut bytes = Vec::new();
        bytes.extend_from_slice(bytemuck::bytes_of(&header));
        bytes.extend_from_slice(&[0u8; 4]);

        assert_eq!(CommandDecoder::new(&bytes).count(), 0);
    }

    #[test]
    fn test_wrong_size_for_known_opcode_stops_iteration() {
        // Draw record padded out to 12 bytes: size visible but not parseable
        let header = InstructionHeader {
            opcode: Opcode::Draw as u16,
            size: 12,
        };
        let mut bytes = Vec::new();
        bytes.extend_from_slice(bytemuck::bytes_of(&header));
        bytes.extend_from_slice(&[0u8; 8]);

        assert_eq!(CommandDecoder::new(&bytes).count(), 0);
    }

    #[test]
    fn test_offset_tracks_consumed_bytes() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &NextBatchCommand::new());
        encode(&mut bytes, &DrawCommand::new(1));

        let mut decoder = CommandDecoder::new(&bytes);
        assert_eq!(decoder.offset(), 0);
        decoder.next();
        assert_eq!(decoder.offset(), 4);
        decoder.next();
        assert_eq!(decoder.offset(), 12);
        assert_eq!(decoder.next(), None);
    }
}
