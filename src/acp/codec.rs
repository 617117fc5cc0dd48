//! Line framing for the ACP stdio stream.
//!
//! One frame is one newline-terminated UTF-8 line carrying exactly one JSON
//! value. Framing is delegated to [`tokio_util::codec::LinesCodec`] with a
//! maximum line length, so an agent that emits an unterminated or absurdly
//! large line cannot exhaust client memory.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

use crate::{ClientError, Result};

/// Maximum accepted frame length: 1 MiB.
///
/// Inbound lines beyond this limit make [`FrameCodec::decode`] return
/// [`ClientError::Protocol`] with `"frame too long"` instead of allocating.
pub const MAX_FRAME_BYTES: usize = 1_048_576;

/// Decoder for newline-delimited ACP frames.
///
/// Used as the codec parameter of [`tokio_util::codec::FramedRead`] over the
/// agent's stdout. Decoding is the only direction framed this way; outbound
/// frames are written directly by [`crate::acp::writer`].
#[derive(Debug)]
pub struct FrameCodec(LinesCodec);

impl FrameCodec {
    /// Create a codec with the default [`MAX_FRAME_BYTES`] limit.
    #[must_use]
    pub fn new() -> Self {
        Self(LinesCodec::new_with_max_length(MAX_FRAME_BYTES))
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = String;
    type Error = ClientError;

    /// Decode the next complete line from `src`, or `Ok(None)` while the
    /// buffer holds only a partial line.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode(src).map_err(map_codec_error)
    }

    /// Decode the final unterminated line once the stream hits EOF.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode_eof(src).map_err(map_codec_error)
    }
}

fn map_codec_error(err: LinesCodecError) -> ClientError {
    match err {
        LinesCodecError::MaxLineLengthExceeded => {
            ClientError::Protocol(format!("frame too long: exceeded {MAX_FRAME_BYTES} bytes"))
        }
        LinesCodecError::Io(io_err) => ClientError::Transport(format!("read failed: {io_err}")),
    }
}
