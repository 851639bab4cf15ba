//! Content-encoding negotiation and outbound response compression for HTTP
//! pipelines.
//!
//! This crate provides a per-connection stage that negotiates a content
//! encoding from each request's `Accept-Encoding` header and transparently
//! rewrites the matching outbound response into a compressed, correctly
//! framed equivalent, whether the body is a single buffer or a chunk
//! stream.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{HeaderMap, HeaderValue, header};
//! use http_content_compression::{CompressionStage, OutboundEvent};
//!
//! let mut stage = CompressionStage::new();
//!
//! let mut request = HeaderMap::new();
//! request.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
//! stage.on_request_head(&request);
//!
//! let rewritten = stage
//!     .encode(OutboundEvent::FullResponse {
//!         headers: HeaderMap::new(),
//!         content: Bytes::from_static(b"Hello, World"),
//!     })
//!     .unwrap();
//! # assert_eq!(rewritten.len(), 1);
//! ```
//!
//! # Compression Rules
//!
//! The stage will **not** compress a response when:
//! - the request's `Accept-Encoding` negotiated no supported encoding
//!   (gzip and deflate are supported; an explicit `q=0` excludes an
//!   encoding even against a wildcard)
//! - `Content-Encoding` is already set on the response
//! - the body is a full buffer of length exactly zero
//!
//! A streamed body of unknown length is always compressed when an encoding
//! was negotiated, even if it turns out to be empty.
//!
//! # Response Modifications
//!
//! When compressing a full body, `Content-Encoding` is set and
//! `Content-Length` is replaced with the compressed size. When compressing
//! a chunk stream, `Content-Length` is removed, `Transfer-Encoding:
//! chunked` and `Content-Encoding` are set, every chunk is rewritten to a
//! self-delimited compressed block, and the stream footer goes out as one
//! final chunk before the terminal event. Trailer headers are forwarded
//! unchanged.

#![deny(missing_docs)]

mod codec;
mod engine;
mod error;
mod event;
mod stage;

pub use codec::{AcceptEntry, Encoding, parse_accept_encoding};
pub use engine::Compressor;
pub use error::CompressionError;
pub use event::OutboundEvent;
pub use stage::CompressionStage;
