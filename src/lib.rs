//! # Trueno-Chart
//!
//! Turns a CSV table into a pie, donut, bar, line or table chart and embeds
//! the chart as an SVG fragment into a host vector document.
//!
//! Axis extents are computed with [trueno](https://crates.io/crates/trueno)
//! SIMD reductions. Everything else is plain Rust: the charts are laid out
//! in data coordinates and serialized straight to SVG markup.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use trueno_chart::prelude::*;
//!
//! let spec = ChartSpec::new(ChartKind::Bar)
//!     .title("Sales")
//!     .x_label("Category")
//!     .y_columns(["Q1", "Q2"]);
//!
//! let mut host = SvgDocument::blank(720.0, 432.0);
//! let report = run(&CsvSource::new(), Path::new("sales.csv"), &spec, &mut host)?;
//! println!("{} series embedded", report.series_names.len());
//! ```
//!
//! ## Pipeline
//!
//! 1. [`data::TableSource`] loads a [`data::Table`].
//! 2. [`data::ColumnSelection`] resolves the x and y columns.
//! 3. [`data::Series`] parses cells, leniently for pie/donut and strictly
//!    for bar/line.
//! 4. A [`plots`] engine lays out and draws a [`output::RenderedFigure`].
//! 5. [`output::export_fragment`] cuts out the root `<svg>` element and a
//!    [`output::DocumentSink`] appends it to the host document.

#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types.
pub mod color;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions for data-to-canvas mappings.
pub mod scale;

/// Fixed ten-color palettes.
pub mod palette;

/// Figure sizes and unit conversion.
pub mod units;

// ============================================================================
// Chart Modules
// ============================================================================

/// Chart kinds and chart options.
pub mod chart;

/// Tables, column selection and numeric sanitization.
pub mod data;

/// Layout engines for each chart kind.
pub mod plots;

// ============================================================================
// Output Modules
// ============================================================================

/// SVG canvas, rendered figures, export and embedding.
pub mod output;

// ============================================================================
// Runtime
// ============================================================================

/// YAML configuration file.
pub mod config;

/// End-to-end chart run.
pub mod pipeline;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-chart operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use trueno_chart::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chart::{ChartKind, ChartSpec};
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::data::{ColumnSelection, CsvSource, SanitizationMode, Series, Table, TableSource};
    pub use crate::error::{Diagnostics, Error, Result, Warning};
    pub use crate::output::{DocumentSink, RenderedFigure, SvgDocument};
    pub use crate::palette::{Palette, PaletteName};
    pub use crate::pipeline::{run, RunReport};
    pub use crate::units::{FigureSize, Unit};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
