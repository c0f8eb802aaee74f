//! NSGA-II population reader - Typed access to outer-loop population files.
//!
//! This crate decodes the population files written by an NSGA-II outer-loop
//! trajectory optimizer and scatter-plots the feasible solutions across two to
//! four objectives.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Solution records, the row decoder, header vocabulary and plot configuration
//! - `population`: File loading and the population container
//! - `plot`: Scene building, pick resolution and the SVG backend
//!
//! # Example
//!
//! ```rust,no_run
//! use nsga_population::{
//!     plot::{SvgBackend, plot_population},
//!     population::Population,
//!     schema::PlotConfig,
//! };
//!
//! let population = Population::load("run/NSGAII_population.NSGAII")?;
//! println!("{} solutions", population.len());
//!
//! let config = PlotConfig::default();
//! let mut backend = SvgBackend::new("population.svg", config.clone());
//! let mut session = plot_population(&population, &[0, 1, 2], &config, &mut backend, |event| {
//!     println!("{}", event);
//! })?;
//! session.pick(0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod plot;
pub mod population;
pub mod schema;

// Re-export commonly used types
pub use plot::{PickEvent, PlotBackend, PlotError, PlotSession, ScatterScene, plot_population};
pub use population::{LoadError, Population};
pub use schema::{DecodeError, PlotConfig, Solution};
