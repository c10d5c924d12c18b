//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Builds a gzip compression layer.
///
/// `text/event-stream` responses are left uncompressed by the default
/// predicate, so status streams flush frame by frame.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}
