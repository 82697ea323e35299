//! Dispatch of embedded content to minifiers for other media types.

use std::collections::HashMap;
use std::io::Write;

use crate::Options;
use crate::error::MarkminError;

/// Media type for `<style>` element content.
pub const CSS: &str = "text/css";
/// Media type for `style` attribute values.
pub const INLINE_CSS: &str = "text/css;inline=1";

/// Something that can minify content of a given media type.
pub trait Minifier {
    /// Minify `src` into `w`. Returns [`MarkminError::NotExist`] without
    /// writing anything when no minifier handles `mediatype`.
    fn minify(&self, mediatype: &str, w: &mut dyn Write, src: &[u8]) -> Result<(), MarkminError>;
}

/// Minify `src` through `m`, writing it unchanged if no minifier is registered.
pub fn minify_or_passthrough(
    m: &dyn Minifier,
    mediatype: &str,
    w: &mut dyn Write,
    src: &[u8],
) -> Result<(), MarkminError> {
    match m.minify(mediatype, w, src) {
        Err(MarkminError::NotExist(_)) => {
            w.write_all(src)?;
            Ok(())
        }
        result => result,
    }
}

type MinifyFn = dyn Fn(&Registry, &str, &mut dyn Write, &[u8]) -> Result<(), MarkminError>;

/// Minifiers keyed by media type.
///
/// Lookup ignores media type parameters (`text/css;inline=1` finds `text/css`);
/// the registered function still receives the full media type.
#[derive(Default)]
pub struct Registry {
    funcs: HashMap<String, Box<MinifyFn>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the XML and SVG rewriters registered.
    pub fn with_markup(options: Options) -> Self {
        let mut registry = Self::new();
        for mimetype in ["text/xml", "application/xml"] {
            let options = options.clone();
            registry.add_func(mimetype, move |_, _, w, src| crate::xml::minify(w, src, &options));
        }
        registry.add_func("image/svg+xml", move |m, _, w, src| {
            crate::svg::minify(m, w, src, &options)
        });
        registry
    }

    pub fn add_func<F>(&mut self, mimetype: impl Into<String>, f: F)
    where
        F: Fn(&Registry, &str, &mut dyn Write, &[u8]) -> Result<(), MarkminError> + 'static,
    {
        self.funcs.insert(mimetype.into(), Box::new(f));
    }
}

impl Minifier for Registry {
    fn minify(&self, mediatype: &str, w: &mut dyn Write, src: &[u8]) -> Result<(), MarkminError> {
        let mimetype = mediatype.split(';').next().unwrap_or(mediatype).trim();
        match self.funcs.get(mimetype) {
            Some(f) => f(self, mediatype, w, src),
            None => {
                log::debug!(target: "markmin::delegate", "no minifier for {mediatype}");
                Err(MarkminError::NotExist(mimetype.to_owned()))
            }
        }
    }
}
