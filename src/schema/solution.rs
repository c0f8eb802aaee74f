//! Decoding of one population row into a typed solution.

use std::str::FromStr;

use super::vocabulary::{
    DESCRIPTION_HEADER, DescriptionField, GENERATION_FOUND_HEADER, TIMESTAMP_HEADER, Vocabulary,
    is_gene_header, mission_sequence, objective_sense,
};

/// One decoded member of an NSGA-II outer-loop population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    /// Outer-loop decision vector (discrete genes).
    pub outer_decision_vector: Vec<i64>,
    /// Inner-loop decision vector (continuous variables).
    pub inner_decision_vector: Vec<f64>,
    /// Objective values in header order, all in minimized form.
    pub objective_values: Vec<f64>,
    /// Power system size in kW, if the description encodes one.
    pub power_system_size_kw: Option<f64>,
    pub thruster_name: Option<String>,
    /// Thruster count as written in the description.
    pub number_of_thrusters: Option<String>,
    pub launch_vehicle_name: Option<String>,
    /// Case name.
    pub description: String,
    /// Flyby sequence taken from the parenthesized part of the description.
    pub mission_sequence: String,
    /// Generation in which this solution was found.
    pub generation_found: Option<u64>,
    /// Seconds from optimizer start at which this solution was found.
    pub timestamp: Option<u64>,
}

impl Solution {
    /// Decode a comma-separated row against the population's global headers.
    pub fn decode<S: AsRef<str>>(line: &str, headers: &[S]) -> Result<Self, DecodeError> {
        Self::decode_with(line, headers, Vocabulary::standard())
    }

    /// Decode a row using a custom description vocabulary.
    pub fn decode_with<S: AsRef<str>>(
        line: &str,
        headers: &[S],
        vocabulary: &Vocabulary,
    ) -> Result<Self, DecodeError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let cells: Vec<&str> = line.split(',').collect();

        if cells.len() != headers.len() {
            return Err(DecodeError::SchemaMismatch {
                expected: headers.len(),
                found: cells.len(),
            });
        }

        let mut solution = Solution::default();

        for (header, &cell) in headers.iter().zip(&cells) {
            let header = header.as_ref();

            if header == GENERATION_FOUND_HEADER {
                solution.generation_found = Some(parse_cell(header, cell)?);
            } else if header == TIMESTAMP_HEADER {
                solution.timestamp = Some(parse_cell(header, cell)?);
            } else if header == DESCRIPTION_HEADER {
                solution.apply_description(cell, vocabulary)?;
            } else if let Some(sense) = objective_sense(header) {
                let value: f64 = parse_cell(header, cell)?;
                solution.objective_values.push(sense.apply(value));
            } else if is_gene_header(header) {
                solution
                    .outer_decision_vector
                    .push(parse_cell(header, cell)?);
            } else if !cell.is_empty() {
                solution
                    .inner_decision_vector
                    .push(parse_cell(header, cell)?);
            }
        }

        Ok(solution)
    }

    fn apply_description(&mut self, cell: &str, vocabulary: &Vocabulary) -> Result<(), DecodeError> {
        self.description = cell.to_string();
        self.mission_sequence = mission_sequence(cell).to_string();

        for field in vocabulary.tokenize(cell) {
            match field {
                DescriptionField::PowerSystemSize(text) => {
                    self.power_system_size_kw = Some(parse_cell(DESCRIPTION_HEADER, text)?);
                }
                DescriptionField::NumberOfThrusters(text) => {
                    self.number_of_thrusters = Some(text.to_string());
                }
                DescriptionField::LaunchVehicle(name) => {
                    self.launch_vehicle_name = Some(name.to_string());
                }
                DescriptionField::Thruster(name) => {
                    self.thruster_name = Some(name.to_string());
                }
            }
        }
        Ok(())
    }

    /// Largest objective value, or negative infinity when there are none.
    pub fn max_objective(&self) -> f64 {
        self.objective_values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Whether every objective is finite and below the infeasibility sentinel.
    #[inline]
    pub fn is_feasible(&self, threshold: f64) -> bool {
        self.objective_values
            .iter()
            .all(|v| v.is_finite() && *v < threshold)
    }
}

fn parse_cell<T: FromStr>(column: &str, raw: &str) -> Result<T, DecodeError> {
    raw.trim()
        .parse()
        .map_err(|_| DecodeError::ParseFailure {
            column: column.to_string(),
            raw_value: raw.to_string(),
        })
}

/// Row decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Row has {found} cells but the header declares {expected} columns")]
    SchemaMismatch { expected: usize, found: usize },
    #[error("Column '{column}' holds non-numeric value '{raw_value}'")]
    ParseFailure { column: String, raw_value: String },
}
