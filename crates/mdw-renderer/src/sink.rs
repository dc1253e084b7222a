//! Serialization seam between rendering and the output container.

use crate::document::Document;

/// Serializes a rendered [`Document`] into a target container.
///
/// Rendering itself is infallible; sink failures (I/O, serialization) are the
/// only errors a conversion surfaces, and they are propagated to the caller
/// with their underlying cause. A sink that cannot represent a feature
/// (hyperlink relationships, embedded images) must still emit the degraded
/// text content carried by the runs — never drop it.
pub trait DocumentSink {
    /// Sink-specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize the document.
    fn serialize(&mut self, document: &Document) -> Result<(), Self::Error>;
}
