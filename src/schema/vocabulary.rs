//! Recognized column headers and the description-token vocabulary.
//!
//! Population files identify each case with a free-text description such as
//! `Case1_5kW_2nTh_NSTAR_AV401_(EarthMarsEarth)`. The `_`-separated tokens
//! encode power level, thruster count, thruster model and launch vehicle.
//! Name lookups go through a single table so new hardware is a data change.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Header of the column recording the generation a solution was found in.
pub const GENERATION_FOUND_HEADER: &str = "Generation found";

/// Header of the column recording seconds since optimizer start.
pub const TIMESTAMP_HEADER: &str = "timestamp";

/// Header of the free-text case description column.
pub const DESCRIPTION_HEADER: &str = "Description";

/// Marker identifying an outer-loop gene column (must not lead the header).
pub const GENE_MARKER: &str = "Gene ";

/// Objective column header that is maximized and therefore stored negated.
pub const DELIVERED_MASS_HEADER: &str = "Delivered mass to final target";

/// Objective headers stored as-is (the optimizer minimizes them).
pub const MINIMIZED_OBJECTIVE_HEADERS: [&str; 10] = [
    "BOL power at 1 AU (kW)",
    "Launch epoch (MJD)",
    "Flight time (days)",
    "Thruster preference",
    "Number of thrusters",
    "Launch vehicle preference",
    "Final journey mass increment (for maximizing sample return)",
    "First journey departure C3 (km^2/s^2)",
    "Final journey arrival C3 (km^2/s^2)",
    "Total delta-v (km/s)",
];

pub const LAUNCH_VEHICLE_NAMES: [&str; 16] = [
    "AV401", "AV411", "AV421", "AV431", "AV501", "AV511", "AV521", "AV531", "AV541", "AV551",
    "F910", "F911", "AV551s48", "F9H", "D4H", "SLSb1",
];

pub const THRUSTER_NAMES: [&str; 15] = [
    "NSTAR",
    "XIPS25",
    "BPT4000HIsp",
    "BPT4000Hthrust",
    "BPT4000XHIsp",
    "NEXTHIspv9",
    "VASIMRargon",
    "VSIxenonhall",
    "NEXTHIspv10",
    "NEXTHthrustv10",
    "BPT4000MALTO",
    "NEXIS",
    "H6MS",
    "BHT20K",
    "HiVHAc",
];

const POWER_MARKER: &str = "kW";
const THRUSTER_COUNT_MARKER: &str = "nTh";

/// How an objective column is stored in `Solution::objective_values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// Stored as read.
    Minimize,
    /// Stored negated so that every objective is minimized.
    Maximize,
}

impl ObjectiveSense {
    /// Convert a raw column value into its stored (minimized) form.
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ObjectiveSense::Minimize => value,
            ObjectiveSense::Maximize => -value,
        }
    }
}

/// Classify a header as an objective column.
pub fn objective_sense(header: &str) -> Option<ObjectiveSense> {
    if header == DELIVERED_MASS_HEADER {
        Some(ObjectiveSense::Maximize)
    } else if MINIMIZED_OBJECTIVE_HEADERS.contains(&header) {
        Some(ObjectiveSense::Minimize)
    } else {
        None
    }
}

/// Check whether a header names an objective column.
#[inline]
pub fn is_objective_header(header: &str) -> bool {
    objective_sense(header).is_some()
}

/// Check whether a header names an outer-loop gene column.
///
/// Only the first occurrence of the marker counts, and it must not start the
/// header.
#[inline]
pub fn is_gene_header(header: &str) -> bool {
    contains_after_start(header, GENE_MARKER)
}

fn contains_after_start(haystack: &str, needle: &str) -> bool {
    haystack.find(needle).is_some_and(|i| i > 0)
}

/// Kind of a named hardware token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LaunchVehicle,
    Thruster,
}

/// A field extracted from one description token.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionField<'a> {
    /// Power system size text with the `kW` marker trimmed (not yet parsed).
    PowerSystemSize(&'a str),
    /// Thruster count text with the `nTh` marker trimmed.
    NumberOfThrusters(&'a str),
    LaunchVehicle(&'a str),
    Thruster(&'a str),
}

/// Token lookup table for description parsing.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: HashMap<&'static str, TokenKind>,
}

static STANDARD: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::from_names(
        LAUNCH_VEHICLE_NAMES
            .iter()
            .map(|&n| (n, TokenKind::LaunchVehicle))
            .chain(THRUSTER_NAMES.iter().map(|&n| (n, TokenKind::Thruster))),
    )
});

impl Vocabulary {
    /// Build a vocabulary from `(name, kind)` pairs.
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, TokenKind)>,
    {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Launch vehicle and thruster names known to the outer loop.
    pub fn standard() -> &'static Vocabulary {
        &STANDARD
    }

    /// Look up an exact token.
    pub fn kind_of(&self, token: &str) -> Option<TokenKind> {
        self.names.get(token).copied()
    }

    /// Classify one `_`-separated token.
    ///
    /// A token may yield several fields (e.g. a malformed `5kWnTh`).
    pub fn classify<'a>(&self, token: &'a str) -> Vec<DescriptionField<'a>> {
        let mut fields = Vec::new();

        if contains_after_start(token, POWER_MARKER) {
            fields.push(DescriptionField::PowerSystemSize(
                token.trim_matches(|c| matches!(c, 'k' | 'W')),
            ));
        }
        if contains_after_start(token, THRUSTER_COUNT_MARKER) {
            fields.push(DescriptionField::NumberOfThrusters(
                token.trim_matches(|c| matches!(c, 'n' | 'T' | 'h')),
            ));
        }
        match self.kind_of(token) {
            Some(TokenKind::LaunchVehicle) => fields.push(DescriptionField::LaunchVehicle(token)),
            Some(TokenKind::Thruster) => fields.push(DescriptionField::Thruster(token)),
            None => {}
        }

        fields
    }

    /// Tokenize a description on `_` and classify every token in order.
    pub fn tokenize<'a>(&self, description: &'a str) -> impl Iterator<Item = DescriptionField<'a>> {
        description
            .split('_')
            .flat_map(move |token| self.classify(token))
    }
}

/// Extract the mission sequence: the text after the first `(`, with `)`
/// trimmed from both ends. Empty when the description has no `(`.
pub fn mission_sequence(description: &str) -> &str {
    match description.find('(') {
        Some(i) => description[i + 1..].trim_matches(')'),
        None => "",
    }
}
