use thiserror::Error;

/// Errors surfaced by the compression stage.
///
/// All of these are scoped to a single exchange. The caller owns the
/// connection and decides whether to close it; the stage itself stays
/// usable for subsequent exchanges.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// A response started while no negotiated request was pending, i.e.
    /// more responses than requests were observed on the connection.
    #[error("response observed with no pending request to match")]
    ProtocolSequence,

    /// An event arrived that is not valid for the current body state,
    /// such as a body chunk with no open response body.
    #[error("unexpected {0} event for the current response state")]
    InvalidState(&'static str),

    /// The underlying deflate stream failed to flush or finish.
    #[error("compression engine failure: {0}")]
    Engine(#[from] flate2::CompressError),
}
