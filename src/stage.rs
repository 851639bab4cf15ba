use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, header};

use crate::codec::Encoding;
use crate::engine::Compressor;
use crate::error::CompressionError;
use crate::event::OutboundEvent;

/// Per-connection compression stage.
///
/// The stage observes inbound request heads to negotiate a content
/// encoding, then rewrites the matching outbound responses: full bodies are
/// compressed in one shot, streamed bodies chunk by chunk with trailer
/// preservation. Requests and responses are matched strictly FIFO, which is
/// what HTTP pipelining on a single connection requires; every inbound
/// request head enqueues one binding and every outbound response consumes
/// exactly one.
///
/// All work is synchronous and the stage assumes the ordered, single-
/// threaded event delivery of one connection. Use one instance per
/// connection.
pub struct CompressionStage {
    pending: VecDeque<Option<Encoding>>,
    body: BodyState,
}

/// Lifecycle of the outbound message currently crossing the stage.
#[derive(Default)]
enum BodyState {
    /// No response body is open; the next outbound event must be a head.
    #[default]
    Ready,
    /// A streamed body is being forwarded unmodified.
    PassThrough,
    /// A streamed body is being compressed; owns the compressor for the
    /// lifetime of this one body.
    Compressing(Compressor),
}

impl CompressionStage {
    /// Creates a stage with no pending exchanges.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            body: BodyState::Ready,
        }
    }

    /// Records the negotiated encoding for an observed inbound request head.
    ///
    /// An absent `Accept-Encoding` header negotiates to "no compression",
    /// but still enqueues a binding so responses stay paired with requests.
    pub fn on_request_head(&mut self, headers: &HeaderMap) {
        let accept_encoding = headers
            .get(header::ACCEPT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        let encoding = Encoding::negotiate(accept_encoding);
        tracing::debug!(?encoding, accept_encoding, "negotiated content encoding");
        self.pending.push_back(encoding);
    }

    /// Rewrites one outbound response event into the events to forward
    /// downstream, in order.
    ///
    /// Most events map to exactly one output event; the terminal event of a
    /// compressed stream maps to two (the compression footer chunk, then the
    /// trailer-bearing terminal event). Errors abort only the current
    /// exchange; the stage remains usable for the next one.
    pub fn encode(&mut self, event: OutboundEvent) -> Result<Vec<OutboundEvent>, CompressionError> {
        match event {
            OutboundEvent::FullResponse { headers, content } => self.encode_full(headers, content),
            OutboundEvent::ResponseHead { headers } => self.encode_head(headers),
            OutboundEvent::BodyChunk { content } => self.encode_chunk(content),
            OutboundEvent::LastChunk { trailers } => self.encode_last(trailers),
        }
    }

    /// Discards any in-flight body state without finalizing the compressed
    /// stream.
    ///
    /// For use when the transport aborts an exchange mid-body. Pending
    /// request bindings are kept; only the open body is dropped.
    pub fn reset(&mut self) {
        self.body = BodyState::Ready;
    }

    fn take_binding(&mut self) -> Result<Option<Encoding>, CompressionError> {
        self.pending
            .pop_front()
            .ok_or(CompressionError::ProtocolSequence)
    }

    fn encode_full(
        &mut self,
        mut headers: HeaderMap,
        content: Bytes,
    ) -> Result<Vec<OutboundEvent>, CompressionError> {
        if !matches!(self.body, BodyState::Ready) {
            return Err(CompressionError::InvalidState("full response"));
        }
        let binding = self.take_binding()?;

        // A zero-length body, a body the caller already encoded, and a
        // negotiation that chose identity all pass through untouched.
        let encoding = match binding {
            Some(encoding)
                if !headers.contains_key(header::CONTENT_ENCODING) && !content.is_empty() =>
            {
                encoding
            }
            _ => return Ok(vec![OutboundEvent::FullResponse { headers, content }]),
        };

        let mut compressor = Compressor::new(encoding);
        let mut compressed = BytesMut::new();
        compressed.extend_from_slice(&compressor.feed(&content)?);
        compressed.extend_from_slice(&compressor.finish()?);
        let content = compressed.freeze();

        headers.insert(
            header::CONTENT_ENCODING,
            HeaderValue::from_static(encoding.content_encoding()),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content.len()));
        Ok(vec![OutboundEvent::FullResponse { headers, content }])
    }

    fn encode_head(
        &mut self,
        mut headers: HeaderMap,
    ) -> Result<Vec<OutboundEvent>, CompressionError> {
        if !matches!(self.body, BodyState::Ready) {
            return Err(CompressionError::InvalidState("response head"));
        }
        let binding = self.take_binding()?;

        match binding {
            Some(encoding) if !headers.contains_key(header::CONTENT_ENCODING) => {
                // The compressed length is unknown up front, so the body
                // must go out chunked regardless of what the head declared.
                headers.remove(header::CONTENT_LENGTH);
                headers.insert(
                    header::TRANSFER_ENCODING,
                    HeaderValue::from_static("chunked"),
                );
                headers.insert(
                    header::CONTENT_ENCODING,
                    HeaderValue::from_static(encoding.content_encoding()),
                );
                tracing::debug!(
                    encoding = encoding.content_encoding(),
                    "compressing streamed response body"
                );
                self.body = BodyState::Compressing(Compressor::new(encoding));
            }
            _ => {
                self.body = BodyState::PassThrough;
            }
        }

        Ok(vec![OutboundEvent::ResponseHead { headers }])
    }

    fn encode_chunk(&mut self, content: Bytes) -> Result<Vec<OutboundEvent>, CompressionError> {
        match &mut self.body {
            BodyState::Ready => Err(CompressionError::InvalidState("body chunk")),
            BodyState::PassThrough => Ok(vec![OutboundEvent::BodyChunk { content }]),
            BodyState::Compressing(compressor) => match compressor.feed(&content) {
                Ok(compressed) => Ok(vec![OutboundEvent::BodyChunk {
                    content: compressed,
                }]),
                Err(err) => {
                    self.body = BodyState::Ready;
                    Err(err)
                }
            },
        }
    }

    fn encode_last(
        &mut self,
        trailers: HeaderMap,
    ) -> Result<Vec<OutboundEvent>, CompressionError> {
        match std::mem::take(&mut self.body) {
            BodyState::Ready => Err(CompressionError::InvalidState("last chunk")),
            BodyState::PassThrough => Ok(vec![OutboundEvent::LastChunk { trailers }]),
            BodyState::Compressing(compressor) => {
                // The footer goes out as an ordinary chunk; the terminal
                // event always follows with the original trailers untouched.
                let footer = compressor.finish()?;
                Ok(vec![
                    OutboundEvent::BodyChunk { content: footer },
                    OutboundEvent::LastChunk { trailers },
                ])
            }
        }
    }
}

impl Default for CompressionStage {
    fn default() -> Self {
        Self::new()
    }
}
