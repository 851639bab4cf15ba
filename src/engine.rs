use bytes::Bytes;
use flate2::{Compress, Compression, Crc, FlushCompress, Status};

use crate::codec::Encoding;
use crate::error::CompressionError;

/// Fixed gzip member header: deflate method, no flags, zero mtime, no extra
/// flags, OS unset. Keeping every field zero makes the framing deterministic.
const GZIP_HEADER: [u8; 10] = [0x1f, 0x8b, 0x08, 0, 0, 0, 0, 0, 0, 0];

/// Minimum spare output capacity reserved ahead of each deflate call.
const OUTPUT_RESERVE: usize = 64;

/// A streaming compressor with per-chunk flush semantics.
///
/// Each [`feed`](Compressor::feed) sync-flushes the deflate stream, so every
/// call produces a byte-aligned block that a decoder can consume up to that
/// point. This is what lets one input chunk become exactly one deliverable
/// output chunk. [`finish`](Compressor::finish) consumes the compressor,
/// emits the final deflate block and, for gzip, the CRC32 + length trailer.
///
/// Both encodings use a raw deflate stream at the default compression
/// level; gzip framing (header and trailer) is written here rather than by
/// the deflate layer so the header bytes never vary.
pub struct Compressor {
    encoding: Encoding,
    deflate: Compress,
    crc: Crc,
    header_pending: bool,
}

impl Compressor {
    /// Allocates compressor state for the given encoding.
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            deflate: Compress::new(Compression::default(), false),
            crc: Crc::new(),
            header_pending: encoding == Encoding::Gzip,
        }
    }

    /// Returns the encoding this compressor produces.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Compresses `input` and flushes a self-delimited block.
    ///
    /// The gzip header is prepended to the first block produced. A
    /// zero-length input still yields a valid flush marker.
    pub fn feed(&mut self, input: &[u8]) -> Result<Bytes, CompressionError> {
        if self.encoding == Encoding::Gzip {
            self.crc.update(input);
        }

        let mut out = self.begin_block(input.len() / 2 + OUTPUT_RESERVE);
        let mut consumed = 0;
        loop {
            out.reserve(OUTPUT_RESERVE);
            let before = self.deflate.total_in();
            self.deflate
                .compress_vec(&input[consumed..], &mut out, FlushCompress::Sync)?;
            consumed += (self.deflate.total_in() - before) as usize;
            // Spare output capacity after the call means the flush completed.
            if consumed == input.len() && out.len() < out.capacity() {
                break;
            }
        }

        Ok(out.into())
    }

    /// Finishes the stream, emitting the final deflate block and the gzip
    /// trailer where applicable.
    ///
    /// Consuming `self` makes the engine unusable afterwards; a fresh
    /// [`Compressor::new`] starts a new stream. Calling this without any
    /// prior [`feed`](Compressor::feed) still produces a complete stream
    /// (20 bytes for empty gzip).
    pub fn finish(mut self) -> Result<Bytes, CompressionError> {
        let mut out = self.begin_block(OUTPUT_RESERVE);
        loop {
            out.reserve(OUTPUT_RESERVE);
            let status = self
                .deflate
                .compress_vec(&[], &mut out, FlushCompress::Finish)?;
            if status == Status::StreamEnd {
                break;
            }
        }

        if self.encoding == Encoding::Gzip {
            out.extend_from_slice(&self.crc.sum().to_le_bytes());
            out.extend_from_slice(&self.crc.amount().to_le_bytes());
        }

        Ok(out.into())
    }

    fn begin_block(&mut self, capacity: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(capacity + GZIP_HEADER.len());
        if std::mem::take(&mut self.header_pending) {
            out.extend_from_slice(&GZIP_HEADER);
        }
        out
    }
}
