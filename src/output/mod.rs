//! Output: the SVG canvas, finished figures and host-document embedding.

mod embed;
mod figure;
mod svg;

pub use embed::{export_fragment, extract_svg_root, strip_global_styles, DocumentSink, SvgDocument};
pub use figure::{DataMark, MarkKind, RenderedFigure};
pub use svg::{
    num, Baseline, PathData, Stroke, SvgCanvas, SvgElement, TextAnchor, TextStyle, FONT_FAMILY,
    GLOBAL_STYLE_RULE,
};
