//! Configuration file support.
//!
//! A YAML file can supply defaults for the chart options. Precedence is
//! CLI > file > built-in defaults; the binary applies CLI overrides on top
//! of the loaded [`Config`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chart::{ChartKind, ChartSpec};
use crate::error::{Error, Result};
use crate::palette::{Palette, PaletteName};
use crate::units::{FigureSize, Unit};

/// Chart defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDefaults {
    /// Chart type (pie, donut, bar, line, table).
    #[serde(default, rename = "type")]
    pub kind: ChartKind,

    /// Color palette name.
    #[serde(default)]
    pub palette: PaletteName,

    /// Chart title.
    #[serde(default)]
    pub title: String,
}

/// Figure size defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeDefaults {
    /// Width in `unit`.
    #[serde(default = "default_width")]
    pub width: f64,

    /// Height in `unit`.
    #[serde(default = "default_height")]
    pub height: f64,

    /// Unit of `width` and `height`.
    #[serde(default)]
    pub unit: Unit,
}

fn default_width() -> f64 {
    10.0
}
fn default_height() -> f64 {
    6.0
}

impl Default for SizeDefaults {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            unit: Unit::default(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartDefaults,

    /// Figure size settings.
    #[serde(default)]
    pub size: SizeDefaults,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            chart: ChartDefaults::default(),
            size: SizeDefaults::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Figure size described by the size section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for non-positive sizes.
    pub fn figure_size(&self) -> Result<FigureSize> {
        FigureSize::new(self.size.width, self.size.height, self.size.unit)
    }

    /// Chart spec carrying the configured kind, palette, size and title.
    ///
    /// # Errors
    ///
    /// Same as [`Config::figure_size`].
    pub fn to_spec(&self) -> Result<ChartSpec> {
        Ok(ChartSpec::new(self.chart.kind)
            .title(self.chart.title.clone())
            .palette(Palette::new(self.chart.palette))
            .size(self.figure_size()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_default() {
        let config = Config::new();

        assert_eq!(config.version, 1);
        assert_eq!(config.chart.kind, ChartKind::Pie);
        assert_eq!(config.chart.palette, PaletteName::Default);
        assert_relative_eq!(config.size.width, 10.0);
        assert_relative_eq!(config.size.height, 6.0);
        assert_eq!(config.size.unit, Unit::Inch);
    }

    #[test]
    fn test_config_parse_empty() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r#"
version: 1
chart:
  type: bar
  palette: vibrant
  title: Quarterly
size:
  width: 20
  height: 12
  unit: cm
"#;

        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.chart.kind, ChartKind::Bar);
        assert_eq!(config.chart.palette, PaletteName::Vibrant);
        assert_eq!(config.chart.title, "Quarterly");
        assert_eq!(config.size.unit, Unit::Centimeter);

        let spec = config.to_spec().unwrap();
        assert_eq!(spec.kind(), ChartKind::Bar);
        assert_eq!(spec.title_text(), "Quarterly");
        assert_relative_eq!(spec.figure_size().width_in(), 20.0 / 2.54);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
version: 1
chart:
  type: radar
"#;

        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { line: 4, .. }));
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_config_invalid_size() {
        let config = Config::parse("size:\n  width: 0\n").unwrap();
        assert!(matches!(
            config.figure_size(),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_config_load_missing() {
        assert!(matches!(
            Config::load("/nonexistent/path.yaml"),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_config_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.yaml");
        std::fs::write(&path, "chart:\n  type: donut\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.chart.kind, ChartKind::Donut);
    }
}
