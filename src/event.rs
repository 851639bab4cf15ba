use bytes::Bytes;
use http::HeaderMap;

/// An outbound HTTP response event crossing the compression stage.
///
/// This is the closed set of message shapes the stage consumes and
/// produces; the transport layer upstream and downstream speaks the same
/// shapes. A message is either one [`FullResponse`](OutboundEvent::FullResponse)
/// event, or a [`ResponseHead`](OutboundEvent::ResponseHead) followed by any
/// number of [`BodyChunk`](OutboundEvent::BodyChunk) events and exactly one
/// [`LastChunk`](OutboundEvent::LastChunk).
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// A response head together with its entire body. The body length is
    /// statically known (possibly zero).
    FullResponse {
        /// Response headers.
        headers: HeaderMap,
        /// The complete response body.
        content: Bytes,
    },
    /// A response head that will be followed by chunk events.
    ResponseHead {
        /// Response headers.
        headers: HeaderMap,
    },
    /// One body chunk, possibly empty.
    BodyChunk {
        /// Chunk payload.
        content: Bytes,
    },
    /// The terminal marker closing a streamed body. Carries no content;
    /// trailer headers ride here when the stream has them.
    LastChunk {
        /// Trailer headers, empty when the stream has none.
        trailers: HeaderMap,
    },
}
