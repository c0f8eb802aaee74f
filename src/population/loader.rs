//! Population container and file loader.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::schema::{DecodeError, INFEASIBILITY_SENTINEL, Solution, is_objective_header};

/// Line holding the global column headers (1-indexed).
pub const GLOBAL_HEADER_LINE: usize = 4;

/// Line holding the gene column headers (1-indexed).
pub const GENE_HEADER_LINE: usize = 5;

/// Inclusive value range of one objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Compute bounds over the finite values of a sequence. `None` when there
    /// are none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| {
            Some(match acc {
                None => Bounds { min: v, max: v },
                Some(b) => Bounds {
                    min: b.min.min(v),
                    max: b.max.max(v),
                },
            })
        })
    }

    /// Width of the range.
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value into [0, 1]. A degenerate range maps everything to 0.5.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 || !span.is_finite() {
            0.5
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// A decoded NSGA-II population with its shared column schema.
#[derive(Debug, Clone, Default)]
pub struct Population {
    /// Full header row.
    pub global_column_headers: Vec<String>,
    /// Header row describing the outer-loop genes.
    pub gene_column_headers: Vec<String>,
    /// Objective headers in the order they appear in the global headers.
    pub objective_column_headers: Vec<String>,
    /// Decoded rows in file order.
    pub solutions: Vec<Solution>,
}

impl Population {
    /// Load a population file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Io(e),
        })?;

        debug!("Reading population file {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a population from any line source.
    ///
    /// The whole load fails on the first row that does not decode.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let mut population = Population::default();
        let mut lines_read = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let line = line.trim_end_matches('\r');
            lines_read = line_number;

            match line_number {
                GLOBAL_HEADER_LINE => population.set_global_headers(line),
                GENE_HEADER_LINE => {
                    population.gene_column_headers = split_headers(line);
                }
                n if n > GENE_HEADER_LINE => {
                    if line.trim().is_empty() {
                        debug!("Skipping blank line {}", line_number);
                        continue;
                    }
                    let solution = Solution::decode(line, &population.global_column_headers)
                        .map_err(|source| LoadError::RowDecodeFailed {
                            line_number,
                            source,
                        })?;
                    debug_assert_eq!(
                        solution.objective_values.len(),
                        population.objective_column_headers.len()
                    );
                    population.solutions.push(solution);
                }
                _ => {}
            }
        }

        if lines_read < GENE_HEADER_LINE {
            return Err(LoadError::MissingHeaders {
                found_lines: lines_read,
            });
        }

        info!(
            "Loaded {} solutions ({} feasible)",
            population.solutions.len(),
            population.number_of_feasible_solutions(INFEASIBILITY_SENTINEL)
        );

        Ok(population)
    }

    fn set_global_headers(&mut self, line: &str) {
        self.global_column_headers = split_headers(line);
        self.objective_column_headers = self
            .global_column_headers
            .iter()
            .filter(|h| is_objective_header(h))
            .cloned()
            .collect();
    }

    /// Number of solutions.
    #[inline]
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Solutions whose objectives are all finite and below `threshold`.
    pub fn feasible_solutions(&self, threshold: f64) -> impl Iterator<Item = &Solution> {
        self.solutions.iter().filter(move |s| s.is_feasible(threshold))
    }

    pub fn number_of_feasible_solutions(&self, threshold: f64) -> usize {
        self.feasible_solutions(threshold).count()
    }

    /// Range of one objective over the feasible solutions.
    pub fn objective_bounds(&self, objective: usize, threshold: f64) -> Option<Bounds> {
        Bounds::from_values(
            self.feasible_solutions(threshold)
                .filter_map(|s| s.objective_values.get(objective).copied()),
        )
    }
}

fn split_headers(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

/// Population loading errors.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Population file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error reading population: {0}")]
    Io(#[from] io::Error),
    #[error("Population file ends after {found_lines} lines, before the header rows")]
    MissingHeaders { found_lines: usize },
    #[error("Failed to decode row on line {line_number}")]
    RowDecodeFailed {
        line_number: usize,
        #[source]
        source: DecodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const HEADERS: &str = "Generation found,timestamp,Description,Delivered mass to final target,Flight time (days),Journey 0 Gene 0,Journey 0 Gene 1,x0,x1";
    const GENES: &str = "Journey 0 Gene 0,Journey 0 Gene 1";

    fn population_text(rows: &[&str]) -> String {
        let mut text = String::from("NSGAII population\ngeneration 40\nseed 12\n");
        text.push_str(HEADERS);
        text.push('\n');
        text.push_str(GENES);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("population.NSGAII");
        std::fs::write(
            &path,
            population_text(&[
                "3,120,Case1_5kW_2nTh_NSTAR_AV401_(EMJ),1500.0,900.0,1,4,0.1,0.2",
                "7,480,Case2_10kW_1nTh_BPT4000HIsp_F9H_(EVEJ),1700.0,1100.0,2,0,0.3,",
            ]),
        )
        .unwrap();

        let population = Population::load(&path).unwrap();
        assert_eq!(population.len(), 2);
        assert_eq!(
            population.objective_column_headers,
            vec!["Delivered mass to final target", "Flight time (days)"]
        );
        assert_eq!(population.gene_column_headers.len(), 2);
        assert_eq!(population.global_column_headers.len(), 9);

        let second = &population.solutions[1];
        assert_eq!(second.objective_values, vec![-1700.0, 1100.0]);
        assert_eq!(second.outer_decision_vector, vec![2, 0]);
        assert_eq!(second.inner_decision_vector, vec![0.3]);
        assert_eq!(second.thruster_name.as_deref(), Some("BPT4000HIsp"));
        assert_eq!(second.generation_found, Some(7));
    }

    #[test]
    fn test_objective_headers_follow_header_order() {
        let text = "a\nb\nc\nTotal delta-v (km/s),x0,BOL power at 1 AU (kW)\n\n1.0,2.0,3.0\n";
        let population = Population::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(
            population.objective_column_headers,
            vec!["Total delta-v (km/s)", "BOL power at 1 AU (kW)"]
        );
        assert_eq!(population.solutions[0].objective_values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Population::load(dir.path().join("absent.NSGAII")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_row_failure_reports_line() {
        let text = population_text(&[
            "3,120,Case1_(EMJ),1500.0,900.0,1,4,0.1,0.2",
            "7,480,Case2_(EJ),heavy,1100.0,2,0,0.3,0.4",
        ]);
        let err = Population::from_reader(Cursor::new(text)).unwrap_err();
        match err {
            LoadError::RowDecodeFailed {
                line_number,
                source,
            } => {
                assert_eq!(line_number, 7);
                assert!(matches!(source, DecodeError::ParseFailure { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_truncated_row_is_schema_mismatch() {
        let text = population_text(&["3,120,Case1_(EMJ),1500.0"]);
        let err = Population::from_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RowDecodeFailed {
                line_number: 6,
                source: DecodeError::SchemaMismatch { .. }
            }
        ));
    }

    #[test]
    fn test_missing_headers() {
        let err = Population::from_reader(Cursor::new("one\ntwo\nthree\n")).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeaders { found_lines: 3 }));
    }

    #[test]
    fn test_headers_only_and_blank_lines() {
        let text = population_text(&["", "3,120,Case1_(EMJ),1500.0,900.0,1,4,0.1,0.2", ""]);
        let population = Population::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(population.len(), 1);

        let empty = Population::from_reader(Cursor::new(population_text(&[]))).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let text = population_text(&["3,120,Case1_(EMJ),1500.0,900.0,1,4,0.1,0.2"]).replace('\n', "\r\n");
        let population = Population::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(population.global_column_headers.last().unwrap(), "x1");
        assert_eq!(population.solutions[0].inner_decision_vector, vec![0.1, 0.2]);
    }

    #[test]
    fn test_feasibility_and_bounds() {
        let text = population_text(&[
            "1,10,Case1_(EMJ),1500.0,900.0,1,4,0.1,0.2",
            "2,20,Case2_(EMJ),1600.0,1.0e99,1,4,0.1,0.2",
            "3,30,Case3_(EMJ),1200.0,700.0,1,4,0.1,0.2",
        ]);
        let population = Population::from_reader(Cursor::new(text)).unwrap();

        assert_eq!(population.number_of_feasible_solutions(1.0e99), 2);
        let mass = population.objective_bounds(0, 1.0e99).unwrap();
        assert_eq!(mass, Bounds { min: -1500.0, max: -1200.0 });
        let time = population.objective_bounds(1, 1.0e99).unwrap();
        assert_eq!(time, Bounds { min: 700.0, max: 900.0 });
        assert!(population.objective_bounds(5, 1.0e99).is_none());
    }

    #[test]
    fn test_non_finite_rows_are_infeasible() {
        let text = "a\nb\nc\nDelivered mass to final target,Flight time (days)\n\ninf,2\n5,6\nNaN,7\n";
        let population = Population::from_reader(Cursor::new(text)).unwrap();

        assert_eq!(population.len(), 3);
        assert_eq!(population.number_of_feasible_solutions(1.0e99), 1);
        assert_eq!(
            population.objective_bounds(0, 1.0e99),
            Some(Bounds { min: -5.0, max: -5.0 })
        );
    }

    #[test]
    fn test_bounds_normalize() {
        let bounds = Bounds { min: 10.0, max: 20.0 };
        assert_eq!(bounds.normalize(15.0), 0.5);
        assert_eq!(bounds.normalize(30.0), 1.0);
        assert_eq!(Bounds { min: 3.0, max: 3.0 }.normalize(3.0), 0.5);
        assert!(Bounds::from_values(std::iter::empty()).is_none());
        assert_eq!(
            Bounds::from_values([f64::NAN, 2.0, f64::INFINITY, -1.0]),
            Some(Bounds { min: -1.0, max: 2.0 })
        );
    }
}
