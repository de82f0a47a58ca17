//! trueno-chart: draw a CSV as a chart and embed it into an SVG document.
//!
//! Run: `trueno-chart --csv-file sales.csv --chart-type bar host.svg > out.svg`

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trueno_chart::chart::{ChartKind, ChartSpec};
use trueno_chart::config::Config;
use trueno_chart::data::{split_label_list, CsvSource};
use trueno_chart::output::SvgDocument;
use trueno_chart::palette::{Palette, PaletteName};
use trueno_chart::pipeline;
use trueno_chart::units::{FigureSize, Unit};

/// trueno-chart: CSV to embedded SVG chart
#[derive(Parser, Debug)]
#[command(name = "trueno-chart")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Draw a CSV file as a chart and embed it into an SVG document", long_about = None)]
struct Cli {
    /// Host SVG document; a blank page of the figure size when omitted
    document: Option<PathBuf>,

    /// CSV file with a header row
    #[arg(long)]
    csv_file: PathBuf,

    /// Chart type: pie, donut, bar, line or table
    #[arg(long)]
    chart_type: Option<String>,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Column holding the categories (x axis)
    #[arg(long, default_value = "")]
    x_label: String,

    /// Comma-separated value columns (y axis); all other columns when empty
    #[arg(long, default_value = "")]
    y_label: String,

    /// Y-axis caption for bar and line charts
    #[arg(long)]
    y_axis_label: Option<String>,

    /// Color palette: default, pastel or vibrant
    #[arg(long)]
    color_palette: Option<String>,

    /// Figure width in --unit
    #[arg(long)]
    width: Option<f64>,

    /// Figure height in --unit
    #[arg(long)]
    height: Option<f64>,

    /// Size unit: in, cm or px
    #[arg(long)]
    unit: Option<String>,

    /// Tab name of the host dialog; accepted and ignored
    #[arg(long, hide = true)]
    name: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Some(tab) = &cli.name {
        tracing::trace!(tab, "ignoring host tab name");
    }

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let spec = build_spec(&cli, &config)?;
    tracing::debug!(?spec, "chart options");

    let mut document = match &cli.document {
        Some(path) => SvgDocument::load(path)
            .with_context(|| format!("reading host document {}", path.display()))?,
        None => {
            let size = spec.figure_size();
            SvgDocument::blank(size.width_pt(), size.height_pt())
        }
    };

    let report = pipeline::run(&CsvSource::new(), &cli.csv_file, &spec, &mut document)?;
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }

    match &cli.output {
        Some(path) => document
            .write_to_file(path)
            .with_context(|| format!("writing {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(document.as_str().as_bytes())
            .context("writing document to stdout")?,
    }
    Ok(())
}

/// CLI values over config file values over built-in defaults.
fn build_spec(cli: &Cli, config: &Config) -> Result<ChartSpec> {
    let kind = match &cli.chart_type {
        Some(name) => name.parse::<ChartKind>()?,
        None => config.chart.kind,
    };
    let palette = match &cli.color_palette {
        Some(name) => name.parse::<PaletteName>()?,
        None => config.chart.palette,
    };
    let unit = match &cli.unit {
        Some(name) => name.parse::<Unit>()?,
        None => config.size.unit,
    };
    let size = FigureSize::new(
        cli.width.unwrap_or(config.size.width),
        cli.height.unwrap_or(config.size.height),
        unit,
    )?;

    let mut spec = ChartSpec::new(kind)
        .title(cli.title.clone().unwrap_or_else(|| config.chart.title.clone()))
        .x_label(cli.x_label.as_str())
        .y_columns(split_label_list(&cli.y_label))
        .palette(Palette::new(palette))
        .size(size);
    if let Some(caption) = &cli.y_axis_label {
        spec = spec.y_label(caption.as_str());
    }
    Ok(spec)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("trueno_chart={default_level}").into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "trueno-chart",
            "--csv-file",
            "data.csv",
            "--chart-type",
            "Line",
            "--width",
            "20",
            "--unit",
            "cm",
            "--y-label",
            "Q1, Q2",
            "--name",
            "tab",
        ]);
        let config = Config::parse("chart:\n  type: bar\n  palette: pastel\n  title: From file\n").unwrap();
        let spec = build_spec(&cli, &config).unwrap();

        assert_eq!(spec.kind(), ChartKind::Line);
        assert_eq!(spec.color_palette().name(), PaletteName::Pastel);
        assert_eq!(spec.title_text(), "From file");
        assert_eq!(spec.y_column_filter(), ["Q1".to_string(), "Q2".to_string()]);
        assert!((spec.figure_size().width_in() - 20.0 / 2.54).abs() < 1e-9);
        assert!((spec.figure_size().height_in() - 6.0 / 2.54).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_chart_type() {
        let cli = Cli::parse_from(["trueno-chart", "--csv-file", "d.csv", "--chart-type", "radar"]);
        assert!(build_spec(&cli, &Config::default()).is_err());
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::parse_from(["trueno-chart", "--csv-file", "d.csv", "-vv", "host.svg"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.document, Some(PathBuf::from("host.svg")));
    }
}
