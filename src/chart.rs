//! Chart kinds and the immutable description of one chart to render.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::SanitizationMode;
use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::units::FigureSize;

/// The five supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// One pie per series, stacked vertically.
    #[default]
    Pie,
    /// Concentric rings, one per series.
    Donut,
    /// Grouped vertical bars.
    Bar,
    /// One polyline per series.
    Line,
    /// Grid of cells.
    Table,
}

impl ChartKind {
    /// Every chart kind, in CLI order.
    pub const ALL: [Self; 5] = [Self::Pie, Self::Donut, Self::Bar, Self::Line, Self::Table];

    /// Lowercase name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Donut => "donut",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Table => "table",
        }
    }

    /// How raw cells are converted to numbers for this kind.
    ///
    /// Tables show cells verbatim and are never sanitized.
    #[must_use]
    pub const fn sanitization(self) -> Option<SanitizationMode> {
        SanitizationMode::for_chart(self)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| Error::InvalidChartType(s.to_string()))
    }
}

/// Everything a layout engine needs besides the data.
///
/// Built once per run with the builder methods and never mutated while
/// rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    kind: ChartKind,
    title: String,
    x_label: String,
    y_columns: Vec<String>,
    y_label: Option<String>,
    size: FigureSize,
    palette: Palette,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self::new(ChartKind::default())
    }
}

impl ChartSpec {
    /// A chart of `kind` with default size and palette.
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: String::new(),
            x_label: String::new(),
            y_columns: Vec::new(),
            y_label: None,
            size: FigureSize::default(),
            palette: Palette::default(),
        }
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the requested x column, also used as the x-axis caption.
    #[must_use]
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into().trim().to_string();
        self
    }

    /// Set the ordered y column filter. An empty list selects every column
    /// except x.
    #[must_use]
    pub fn y_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.y_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the y-axis caption override.
    #[must_use]
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.y_label = (!label.trim().is_empty()).then_some(label);
        self
    }

    /// Set the figure size.
    #[must_use]
    pub fn size(mut self, size: FigureSize) -> Self {
        self.size = size;
        self
    }

    /// Set the palette.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Chart type.
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Title text; empty means no title.
    #[must_use]
    pub fn title_text(&self) -> &str {
        &self.title
    }

    /// Requested x column.
    #[must_use]
    pub fn x_label_text(&self) -> &str {
        &self.x_label
    }

    /// Requested y columns, in request order.
    #[must_use]
    pub fn y_column_filter(&self) -> &[String] {
        &self.y_columns
    }

    /// Y-axis caption override.
    #[must_use]
    pub fn y_label_text(&self) -> Option<&str> {
        self.y_label.as_deref()
    }

    /// Figure size in inches.
    #[must_use]
    pub const fn figure_size(&self) -> FigureSize {
        self.size
    }

    /// Color palette.
    #[must_use]
    pub const fn color_palette(&self) -> Palette {
        self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteName;
    use crate::units::Unit;

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!("pie".parse::<ChartKind>().unwrap(), ChartKind::Pie);
        assert_eq!(" Donut ".parse::<ChartKind>().unwrap(), ChartKind::Donut);
        assert_eq!("TABLE".parse::<ChartKind>().unwrap(), ChartKind::Table);
        assert!(matches!(
            "scatter".parse::<ChartKind>(),
            Err(Error::InvalidChartType(name)) if name == "scatter"
        ));
    }

    #[test]
    fn test_chart_kind_display_roundtrip() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.to_string().parse::<ChartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_sanitization_by_kind() {
        assert_eq!(ChartKind::Pie.sanitization(), Some(SanitizationMode::Lenient));
        assert_eq!(ChartKind::Donut.sanitization(), Some(SanitizationMode::Lenient));
        assert_eq!(ChartKind::Bar.sanitization(), Some(SanitizationMode::Strict));
        assert_eq!(ChartKind::Line.sanitization(), Some(SanitizationMode::Strict));
        assert_eq!(ChartKind::Table.sanitization(), None);
    }

    #[test]
    fn test_spec_builder() {
        let spec = ChartSpec::new(ChartKind::Bar)
            .title("Sales")
            .x_label(" Category ")
            .y_columns(["Q1", "Q2"])
            .y_label("Units")
            .size(FigureSize::new(20.0, 10.0, Unit::Centimeter).unwrap())
            .palette(Palette::new(PaletteName::Pastel));

        assert_eq!(spec.kind(), ChartKind::Bar);
        assert_eq!(spec.title_text(), "Sales");
        assert_eq!(spec.x_label_text(), "Category");
        assert_eq!(spec.y_column_filter(), ["Q1".to_string(), "Q2".to_string()]);
        assert_eq!(spec.y_label_text(), Some("Units"));
        assert_eq!(spec.color_palette().name(), PaletteName::Pastel);
    }

    #[test]
    fn test_blank_y_label_is_none() {
        let spec = ChartSpec::new(ChartKind::Line).y_label("   ");
        assert!(spec.y_label_text().is_none());
    }

    #[test]
    fn test_spec_defaults() {
        let spec = ChartSpec::default();
        assert_eq!(spec.kind(), ChartKind::Pie);
        assert!(spec.title_text().is_empty());
        assert!(spec.y_column_filter().is_empty());
        assert_eq!(spec.color_palette().name(), PaletteName::Default);
    }
}
