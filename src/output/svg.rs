//! SVG vector canvas.
//!
//! Layout engines draw into an [`SvgCanvas`] in points (y down). The canvas
//! keeps the elements as a tree (groups nest) and serializes them on demand.

use std::fmt::Write as FmtWrite;

use quick_xml::escape::escape;

use crate::color::Rgba;
use crate::geometry::{Point, Rect};

/// Global style rule every serialized figure starts with.
pub const GLOBAL_STYLE_RULE: &str =
    r#"<style type="text/css">*{stroke-linejoin: round; stroke-linecap: butt}</style>"#;

/// Font stack used for every text element.
pub const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";

/// Stroke paint for outlines and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in points.
    pub width: f64,
    /// Dash and gap lengths, `None` for a solid line.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    /// Solid stroke.
    #[must_use]
    pub const fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// Dashed stroke.
    #[must_use]
    pub const fn dashed(color: Rgba, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Vertical alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Baseline {
    /// The anchor is on the text baseline.
    #[default]
    Alphabetic,
    /// The anchor is at the vertical middle of the text block.
    Central,
    /// The anchor is at the top of the text.
    Hanging,
    /// The anchor is at the bottom of the text.
    Bottom,
}

impl Baseline {
    fn attribute(self) -> Option<&'static str> {
        match self {
            Self::Alphabetic => None,
            Self::Central => Some("central"),
            Self::Hanging => Some("hanging"),
            Self::Bottom => Some("text-after-edge"),
        }
    }
}

/// Font and placement options for a text element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    /// Text color.
    pub fill: Rgba,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical anchor.
    pub baseline: Baseline,
    /// Bold weight.
    pub bold: bool,
    /// Rotation in degrees around the anchor point (clockwise on screen).
    pub rotation: f64,
}

impl TextStyle {
    /// Black, left-aligned text of `font_size` points.
    #[must_use]
    pub const fn new(font_size: f64) -> Self {
        Self {
            font_size,
            fill: Rgba::BLACK,
            anchor: TextAnchor::Start,
            baseline: Baseline::Alphabetic,
            bold: false,
            rotation: 0.0,
        }
    }

    /// Centered on the anchor point both ways.
    #[must_use]
    pub const fn centered(font_size: f64) -> Self {
        Self::new(font_size)
            .anchor(TextAnchor::Middle)
            .baseline(Baseline::Central)
    }

    /// Set the text color.
    #[must_use]
    pub const fn fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Set the horizontal anchor.
    #[must_use]
    pub const fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the vertical anchor.
    #[must_use]
    pub const fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Use bold weight.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Rotate around the anchor point.
    #[must_use]
    pub const fn rotate(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

/// Incremental builder for SVG path data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    d: String,
}

impl PathData {
    /// Empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn command(&mut self, cmd: char) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(cmd);
    }

    /// Start a new subpath at `p`.
    #[must_use]
    pub fn move_to(mut self, p: Point) -> Self {
        self.command('M');
        let _ = write!(self.d, " {} {}", num(p.x), num(p.y));
        self
    }

    /// Straight segment to `p`.
    #[must_use]
    pub fn line_to(mut self, p: Point) -> Self {
        self.command('L');
        let _ = write!(self.d, " {} {}", num(p.x), num(p.y));
        self
    }

    /// Circular arc of radius `r` to `p`.
    #[must_use]
    pub fn arc_to(mut self, r: f64, large_arc: bool, sweep: bool, p: Point) -> Self {
        self.command('A');
        let _ = write!(
            self.d,
            " {r} {r} 0 {} {} {} {}",
            u8::from(large_arc),
            u8::from(sweep),
            num(p.x),
            num(p.y),
            r = num(r)
        );
        self
    }

    /// Close the current subpath.
    #[must_use]
    pub fn close(mut self) -> Self {
        self.command('Z');
        self
    }

    /// Whether no command has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// The `d` attribute value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.d
    }
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        rect: Rect,
        fill: Rgba,
        stroke: Option<Stroke>,
        class: Option<&'static str>,
    },
    /// Circle
    Circle {
        center: Point,
        r: f64,
        fill: Rgba,
        stroke: Option<Stroke>,
        class: Option<&'static str>,
    },
    /// Line
    Line { from: Point, to: Point, stroke: Stroke },
    /// Polyline (connected line segments)
    Polyline { points: Vec<Point>, stroke: Stroke },
    /// Path (SVG path data)
    Path {
        d: PathData,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
        class: Option<&'static str>,
    },
    /// Text, one `tspan` per line when it contains newlines
    Text {
        position: Point,
        text: String,
        style: TextStyle,
    },
    /// Group of elements
    Group {
        id: String,
        children: Vec<SvgElement>,
    },
}

#[derive(Debug, Clone)]
struct OpenGroup {
    id: String,
    children: Vec<SvgElement>,
}

/// Retained-mode SVG canvas measured in points.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    view_box: Rect,
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
    open: Vec<OpenGroup>,
}

impl SvgCanvas {
    /// Create a canvas `width` × `height` points with a white background.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            view_box: Rect::new(0.0, 0.0, width, height),
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Visible region; its size is also the physical size in points.
    #[must_use]
    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Replace the visible region.
    pub fn set_view_box(&mut self, view_box: Rect) {
        self.view_box = view_box;
    }

    /// Open a group; following elements go inside it until [`Self::end_group`].
    pub fn begin_group(&mut self, id: impl Into<String>) {
        self.open.push(OpenGroup {
            id: id.into(),
            children: Vec::new(),
        });
    }

    /// Close the innermost open group. Does nothing if none is open.
    pub fn end_group(&mut self) {
        if let Some(group) = self.open.pop() {
            self.add_element(SvgElement::Group {
                id: group.id,
                children: group.children,
            });
        }
    }

    /// Add a raw element to the innermost open group.
    pub fn add_element(&mut self, element: SvgElement) {
        match self.open.last_mut() {
            Some(group) => group.children.push(element),
            None => self.elements.push(element),
        }
    }

    /// Add a rectangle.
    pub fn rect(&mut self, rect: Rect, fill: Rgba, stroke: Option<Stroke>, class: Option<&'static str>) {
        self.add_element(SvgElement::Rect {
            rect,
            fill,
            stroke,
            class,
        });
    }

    /// Add a circle.
    pub fn circle(
        &mut self,
        center: Point,
        r: f64,
        fill: Rgba,
        stroke: Option<Stroke>,
        class: Option<&'static str>,
    ) {
        self.add_element(SvgElement::Circle {
            center,
            r,
            fill,
            stroke,
            class,
        });
    }

    /// Add a line.
    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.add_element(SvgElement::Line { from, to, stroke });
    }

    /// Add a polyline.
    pub fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.add_element(SvgElement::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    /// Add an SVG path.
    pub fn path(
        &mut self,
        d: PathData,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
        class: Option<&'static str>,
    ) {
        self.add_element(SvgElement::Path {
            d,
            fill,
            stroke,
            class,
        });
    }

    /// Add text. Newlines start new lines.
    pub fn text(&mut self, position: Point, text: &str, style: TextStyle) {
        self.add_element(SvgElement::Text {
            position,
            text: text.to_string(),
            style,
        });
    }

    /// Number of elements carrying `class`, searched through all groups.
    #[must_use]
    pub fn count_class(&self, class: &str) -> usize {
        fn count(elements: &[SvgElement], class: &str) -> usize {
            elements
                .iter()
                .map(|element| match element {
                    SvgElement::Rect { class: c, .. }
                    | SvgElement::Circle { class: c, .. }
                    | SvgElement::Path { class: c, .. } => usize::from(*c == Some(class)),
                    SvgElement::Group { children, .. } => count(children, class),
                    _ => 0,
                })
                .sum()
        }

        count(&self.elements, class)
            + self
                .open
                .iter()
                .map(|group| count(&group.children, class))
                .sum::<usize>()
    }

    /// Render a standalone SVG document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(8192);
        let vb = self.view_box;

        svg.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}pt" height="{}pt" viewBox="{} {} {} {}">"#,
            num(vb.width),
            num(vb.height),
            num(vb.x),
            num(vb.y),
            num(vb.width),
            num(vb.height)
        );
        let _ = writeln!(svg, " <defs>\n  {GLOBAL_STYLE_RULE}\n </defs>");

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#" <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                num(vb.x),
                num(vb.y),
                num(vb.width),
                num(vb.height),
                bg.to_css()
            );
        }

        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        // Groups still open are closed innermost-last.
        for (depth, group) in self.open.iter().enumerate() {
            let _ = writeln!(svg, "{}<g id=\"{}\">", indent(depth + 1), escape(group.id.as_str()));
            for child in &group.children {
                write_element(&mut svg, child, depth + 2);
            }
        }
        for depth in (0..self.open.len()).rev() {
            let _ = writeln!(svg, "{}</g>", indent(depth + 1));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Format a coordinate with at most three decimals.
#[must_use]
pub fn num(value: f64) -> String {
    let mut s = format!("{value:.3}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn indent(depth: usize) -> String {
    " ".repeat(depth)
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    let Some(stroke) = stroke else {
        return String::new();
    };
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color.to_css(),
        num(stroke.width)
    );
    if let Some((dash, gap)) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{},{}""#, num(dash), num(gap));
    }
    attrs
}

fn class_attr(class: Option<&'static str>) -> String {
    class.map(|c| format!(r#" class="{c}""#)).unwrap_or_default()
}

fn write_element(out: &mut String, element: &SvgElement, depth: usize) {
    let pad = indent(depth);
    match element {
        SvgElement::Rect {
            rect,
            fill,
            stroke,
            class,
        } => {
            let _ = writeln!(
                out,
                r#"{pad}<rect{} x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
                class_attr(*class),
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height),
                fill.to_css(),
                stroke_attrs(stroke.as_ref())
            );
        }
        SvgElement::Circle {
            center,
            r,
            fill,
            stroke,
            class,
        } => {
            let _ = writeln!(
                out,
                r#"{pad}<circle{} cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
                class_attr(*class),
                num(center.x),
                num(center.y),
                num(*r),
                fill.to_css(),
                stroke_attrs(stroke.as_ref())
            );
        }
        SvgElement::Line { from, to, stroke } => {
            let _ = writeln!(
                out,
                r#"{pad}<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                stroke_attrs(Some(stroke))
            );
        }
        SvgElement::Polyline { points, stroke } => {
            let points_str = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                out,
                r#"{pad}<polyline points="{points_str}" fill="none"{}/>"#,
                stroke_attrs(Some(stroke))
            );
        }
        SvgElement::Path {
            d,
            fill,
            stroke,
            class,
        } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), |f| f.to_css());
            let _ = writeln!(
                out,
                r#"{pad}<path{} d="{}" fill="{fill_attr}"{}/>"#,
                class_attr(*class),
                d.as_str(),
                stroke_attrs(stroke.as_ref())
            );
        }
        SvgElement::Text {
            position,
            text,
            style,
        } => write_text(out, &pad, *position, text, style),
        SvgElement::Group { id, children } => {
            let _ = writeln!(out, r#"{pad}<g id="{}">"#, escape(id.as_str()));
            for child in children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{pad}</g>");
        }
    }
}

fn write_text(out: &mut String, pad: &str, position: Point, text: &str, style: &TextStyle) {
    let (x, y) = (num(position.x), num(position.y));
    let _ = write!(
        out,
        r#"{pad}<text x="{x}" y="{y}" font-size="{}" font-family="{FONT_FAMILY}" fill="{}" text-anchor="{}""#,
        num(style.font_size),
        style.fill.to_css(),
        style.anchor.as_str()
    );
    if let Some(baseline) = style.baseline.attribute() {
        let _ = write!(out, r#" dominant-baseline="{baseline}""#);
    }
    if style.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    if style.rotation != 0.0 {
        let _ = write!(out, r#" transform="rotate({} {x} {y})""#, num(style.rotation));
    }
    out.push('>');

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() == 1 {
        out.push_str(&escape(text));
    } else {
        // Line height 1.2em; a centered block is shifted up by half its extra lines.
        let first_dy = match style.baseline {
            Baseline::Central => -0.6 * (lines.len() - 1) as f64,
            Baseline::Bottom => -1.2 * (lines.len() - 1) as f64,
            Baseline::Alphabetic | Baseline::Hanging => 0.0,
        };
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { first_dy } else { 1.2 };
            let _ = write!(
                out,
                r#"<tspan x="{x}" dy="{}em">{}</tspan>"#,
                num(dy),
                escape(*line)
            );
        }
    }
    out.push_str("</text>\n");
}
