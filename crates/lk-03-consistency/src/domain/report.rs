//! # Validation Report

use serde::Serialize;

/// Why a key was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscrepancyKind {
    /// Present on A, absent on B.
    MissingInB,
    /// Present on both with different content.
    ValueMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub key: String,
    pub kind: DiscrepancyKind,
}

/// Outcome of comparing node A against node B.
///
/// Descriptive only: nothing is repaired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub count_a: usize,
    pub count_b: usize,
    /// Keys present on both sides and compared.
    pub checked: usize,
    pub missing_in_b: usize,
    pub mismatched: usize,
    /// The first discrepancies found, capped by `ValidatorConfig`.
    pub discrepancies: Vec<Discrepancy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Identical,
    /// Key counts differ; the key-by-key pass was skipped.
    CountMismatch { difference: usize },
    Diverged,
}

impl ValidationReport {
    pub fn verdict(&self) -> Verdict {
        if self.count_a != self.count_b {
            Verdict::CountMismatch {
                difference: self.count_a.abs_diff(self.count_b),
            }
        } else if self.missing_in_b == 0 && self.mismatched == 0 {
            Verdict::Identical
        } else {
            Verdict::Diverged
        }
    }

    pub fn is_identical(&self) -> bool {
        self.verdict() == Verdict::Identical
    }

    pub fn problems(&self) -> usize {
        self.missing_in_b + self.mismatched
    }
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Discrepancies kept in the report (all are counted).
    pub max_reported_discrepancies: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_reported_discrepancies: 100,
        }
    }
}
