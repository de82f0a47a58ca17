//! Export of a rendered figure and merging into a host SVG document.
//!
//! The figure is serialized, its global style rule removed, and the root
//! `<svg>` element cut out with an XML pull parser. A [`DocumentSink`] then
//! appends that fragment to the host document.

use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::output::figure::RenderedFigure;
use crate::output::svg::GLOBAL_STYLE_RULE;

/// Remove the global style rule, and the `<defs>` block if that leaves it
/// empty.
#[must_use]
pub fn strip_global_styles(svg: &str) -> String {
    let mut out = svg.replace(GLOBAL_STYLE_RULE, "");

    let mut search_from = 0;
    while let Some(offset) = out[search_from..].find("<defs>") {
        let start = search_from + offset;
        let body_start = start + "<defs>".len();
        let rest = &out[body_start..];
        let body_len = rest.len() - rest.trim_start().len();
        if rest[body_len..].starts_with("</defs>") {
            let mut end = body_start + body_len + "</defs>".len();
            if out[end..].starts_with('\n') {
                end += 1;
            }
            out.replace_range(start..end, "");
            search_from = start;
        } else {
            search_from = body_start;
        }
    }
    out
}

/// Byte ranges of a top-level element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementSpan {
    name: String,
    start: usize,
    /// Start of the end tag; `None` for an empty element (`<x/>`).
    close_start: Option<usize>,
    end: usize,
}

/// Find the first top-level element, optionally restricted to `name`.
fn find_root(xml: &str, name: Option<&[u8]>) -> Result<Option<ElementSpan>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<(String, usize)> = None;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if depth == 0 && open.is_none() && name.map_or(true, |n| e.local_name().as_ref() == n) {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    open = Some((tag, before));
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some((tag, start)) = open.take() {
                        return Ok(Some(ElementSpan {
                            name: tag,
                            start,
                            close_start: Some(before),
                            end: reader.buffer_position() as usize,
                        }));
                    }
                }
            }
            Event::Empty(ref e) => {
                if depth == 0 && name.map_or(true, |n| e.local_name().as_ref() == n) {
                    return Ok(Some(ElementSpan {
                        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        start: before,
                        close_start: None,
                        end: reader.buffer_position() as usize,
                    }));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match open {
        Some((tag, _)) => Err(Error::MalformedDocument(format!("element <{tag}> is never closed"))),
        None => Ok(None),
    }
}

/// Cut the root `<svg>` element (and everything inside it) out of `svg`.
///
/// # Errors
///
/// Returns [`Error::SvgRootNotFound`] if there is no top-level `<svg>`
/// element and [`Error::Xml`] if the markup does not parse.
pub fn extract_svg_root(svg: &str) -> Result<String> {
    let span = find_root(svg, Some(b"svg".as_slice()))?.ok_or(Error::SvgRootNotFound)?;
    Ok(svg[span.start..span.end].to_string())
}

/// Serialize a figure and return its embeddable `<svg>` fragment.
///
/// The figure is consumed whatever the outcome.
///
/// # Errors
///
/// Same as [`extract_svg_root`].
pub fn export_fragment(figure: RenderedFigure) -> Result<String> {
    let svg = figure.into_svg();
    extract_svg_root(&strip_global_styles(&svg))
}

/// A document that chart fragments can be appended to.
pub trait DocumentSink {
    /// Append `fragment` as the last child of the document root.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment or the document is malformed. The
    /// document is left untouched in that case.
    fn embed(&mut self, fragment: &str) -> Result<()>;
}

/// An SVG document held as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    source: String,
}

impl SvgDocument {
    /// An empty `<svg>` document of the given size in points.
    #[must_use]
    pub fn blank(width: f64, height: f64) -> Self {
        Self {
            source: format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}pt\" height=\"{height}pt\" viewBox=\"0 0 {width} {height}\"/>\n"
            ),
        }
    }

    /// Parse a document from text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDocument`] if there is no root element and
    /// [`Error::Xml`] if the markup does not parse.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        if find_root(&source, None)?.is_none() {
            return Err(Error::MalformedDocument("no root element".to_string()));
        }
        Ok(Self { source })
    }

    /// Read and parse a document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the path is not a file, and the
    /// errors of [`SvgDocument::parse`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        Self::parse(fs::read_to_string(path)?)
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.source)?;
        Ok(())
    }

    /// Document text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Consume into the document text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.source
    }
}

impl DocumentSink for SvgDocument {
    fn embed(&mut self, fragment: &str) -> Result<()> {
        let fragment_span = find_root(fragment, None)?
            .ok_or_else(|| Error::MalformedDocument("fragment has no element".to_string()))?;
        let fragment = &fragment[fragment_span.start..fragment_span.end];

        let root = find_root(&self.source, None)?
            .ok_or_else(|| Error::MalformedDocument("no root element".to_string()))?;

        let merged = match root.close_start {
            Some(close_start) => {
                let mut merged = String::with_capacity(self.source.len() + fragment.len() + 1);
                merged.push_str(&self.source[..close_start]);
                merged.push_str(fragment);
                merged.push('\n');
                merged.push_str(&self.source[close_start..]);
                merged
            }
            None => {
                let tag = &self.source[root.start..root.end];
                let open_tag = tag.trim_end_matches("/>").trim_end();
                format!(
                    "{}{open_tag}>\n{fragment}\n</{}>{}",
                    &self.source[..root.start],
                    root.name,
                    &self.source[root.end..]
                )
            }
        };

        tracing::debug!(bytes = fragment.len(), root = %root.name, "embedded fragment");
        self.source = merged;
        Ok(())
    }
}
