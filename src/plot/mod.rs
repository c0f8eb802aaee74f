//! Plot module - Scatter plots of a population over 2 to 4 objectives.
//!
//! `plot_population` filters out infeasible solutions, builds a
//! `ScatterScene` of per-objective coordinate arrays and hands it to a
//! `PlotBackend`. The returned `PlotSession` maps picked points back to the
//! solutions they came from.

mod adapter;
mod svg;

pub use adapter::*;
pub use svg::SvgBackend;
