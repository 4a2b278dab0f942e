//! Error types for the document crate.

/// Errors that can occur while loading a document.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The input is not well-formed for our purposes.
    #[error("parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// The input contained no document element.
    #[error("document has no root element")]
    EmptyDocument,

    /// Error reported by the XML reader.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O failure while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for document results.
pub type DomResult<T> = Result<T, DomError>;
