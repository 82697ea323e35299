use quick_xml::events::attributes::AttrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkminError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    InvalidAttr(#[from] AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No minifier is registered for the media type. Callers fall back to
    /// writing the original bytes.
    #[error("no minifier registered for {0}")]
    NotExist(String),

    #[error("delegate minifier failed: {0}")]
    Delegate(Box<dyn std::error::Error + Send + Sync>),

    #[error("whitespace lookahead exceeded {0} tokens")]
    LookaheadExceeded(usize),
}
