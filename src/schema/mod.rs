//! Schema module - Solution records, header vocabulary and plot configuration.

mod config;
mod solution;
mod vocabulary;

pub use config::*;
pub use solution::*;
pub use vocabulary::*;
