//! Population module - Loading NSGA-II outer-loop population files.
//!
//! # File Format
//!
//! ```text
//! Lines 1-3: optimizer metadata (ignored)
//! Line 4:    global column headers, comma separated
//! Line 5:    gene column headers, comma separated
//! Line 6+:   one solution per line, cells aligned with line 4
//! ```

mod loader;

pub use loader::*;
