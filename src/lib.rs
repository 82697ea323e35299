//! markmin - A streaming XML and SVG minifier
//!
//! markmin rewrites a token stream into the smallest equivalent serialization:
//! whitespace collapsed, attribute quotes normalized, empty elements
//! self-closed and CDATA sections turned into text when that is shorter.

mod buffer;
mod delegate;
mod error;
mod escape;
mod markup;
pub mod svg;
mod token;
mod tokenizer;
mod whitespace;
pub mod xml;

pub use buffer::*;
pub use delegate::*;
pub use error::*;
pub use escape::*;
pub use token::*;
pub use tokenizer::*;

/// Minify an XML string with default settings.
pub fn minify_xml(input: &str) -> Result<String, MarkminError> {
    let mut out = Vec::with_capacity(input.len());
    xml::minify(&mut out, input.as_bytes(), &Options::default())?;
    into_string(out)
}

/// Minify an SVG string with default settings and no stylesheet minifier.
pub fn minify_svg(input: &str) -> Result<String, MarkminError> {
    minify_svg_with(&Registry::new(), input, &Options::default())
}

/// Minify an SVG string, handing stylesheets to `m`.
pub fn minify_svg_with(
    m: &dyn Minifier,
    input: &str,
    options: &Options,
) -> Result<String, MarkminError> {
    let mut out = Vec::with_capacity(input.len());
    svg::minify(m, &mut out, input.as_bytes(), options)?;
    into_string(out)
}

fn into_string(out: Vec<u8>) -> Result<String, MarkminError> {
    String::from_utf8(out).map_err(|e| MarkminError::Utf8(e.utf8_error()))
}

/// Minification options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Drop processing instructions and the XML declaration (SVG only)
    pub remove_processing_instructions: bool,
    /// Drop the `version` attribute of `svg` elements (SVG only)
    pub remove_version: bool,
    /// How many tokens the whitespace collapser may look past a text token
    /// before giving up with [`MarkminError::LookaheadExceeded`]
    pub max_lookahead: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove_processing_instructions: true,
            remove_version: true,
            max_lookahead: 4096,
        }
    }
}
