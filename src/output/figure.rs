//! A finished chart: canvas plus the data marks drawn on it.

use crate::chart::ChartKind;
use crate::output::svg::SvgCanvas;

/// Kind of mark a data point was drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Pie or donut wedge.
    Wedge,
    /// Bar of a bar chart.
    Bar,
    /// Marker of a line chart.
    Point,
    /// Data cell of a table.
    Cell,
}

impl MarkKind {
    /// `class` attribute given to the SVG element of the mark.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Wedge => "wedge",
            Self::Bar => "bar",
            Self::Point => "point",
            Self::Cell => "cell",
        }
    }
}

/// One drawn data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataMark {
    /// Mark shape.
    pub kind: MarkKind,
    /// Series index (table column index for cells).
    pub series: usize,
    /// Data row index.
    pub row: usize,
    /// Numeric value, `None` for table cells.
    pub value: Option<f64>,
}

/// Output of a layout engine, consumed once by the export step.
#[derive(Debug)]
pub struct RenderedFigure {
    kind: ChartKind,
    canvas: SvgCanvas,
    marks: Vec<DataMark>,
    series_names: Vec<String>,
}

impl RenderedFigure {
    /// Wrap a finished canvas.
    #[must_use]
    pub fn new(kind: ChartKind, canvas: SvgCanvas) -> Self {
        Self {
            kind,
            canvas,
            marks: Vec::new(),
            series_names: Vec::new(),
        }
    }

    /// Attach the drawn marks.
    #[must_use]
    pub fn with_marks(mut self, marks: Vec<DataMark>) -> Self {
        self.marks = marks;
        self
    }

    /// Attach the names of the series that were drawn.
    #[must_use]
    pub fn with_series_names(mut self, names: Vec<String>) -> Self {
        self.series_names = names;
        self
    }

    /// Chart type that produced this figure.
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }

    /// The canvas.
    #[must_use]
    pub fn canvas(&self) -> &SvgCanvas {
        &self.canvas
    }

    /// Every data mark, in drawing order.
    #[must_use]
    pub fn marks(&self) -> &[DataMark] {
        &self.marks
    }

    /// Marks of series `index`.
    pub fn series_marks(&self, index: usize) -> impl Iterator<Item = &DataMark> + '_ {
        self.marks.iter().filter(move |mark| mark.series == index)
    }

    /// Names of the drawn series, in drawing order.
    #[must_use]
    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    /// Serialize to a standalone SVG document, releasing the canvas.
    #[must_use]
    pub fn into_svg(self) -> String {
        self.canvas.render()
    }
}
