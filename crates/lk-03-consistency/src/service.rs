//! # Consistency Validator Service

use std::ops::ControlFlow;

use shared_kv::is_system_key;
use tracing::{info, warn};

use crate::domain::compare::values_match;
use crate::domain::errors::ReplicationError;
use crate::domain::report::{Discrepancy, DiscrepancyKind, ValidationReport, ValidatorConfig, Verdict};
use crate::ports::inbound::ConsistencyValidatorApi;
use crate::ports::outbound::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct ConsistencyValidator {
    config: ValidatorConfig,
}

impl ConsistencyValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    fn record(&self, report: &mut ValidationReport, key: &[u8], kind: DiscrepancyKind) {
        let key = String::from_utf8_lossy(key).into_owned();
        warn!(key = %key, kind = ?kind, "Replication discrepancy");
        if report.discrepancies.len() < self.config.max_reported_discrepancies {
            report.discrepancies.push(Discrepancy { key, kind });
        }
    }
}

impl ConsistencyValidatorApi for ConsistencyValidator {
    fn count_keys(&self, store: &dyn KeyValueStore) -> Result<usize, ReplicationError> {
        let mut count = 0usize;
        store
            .visit_prefix(b"", &mut |key, _| {
                if !is_system_key(key) {
                    count += 1;
                }
                ControlFlow::Continue(())
            })
            .map_err(|e| ReplicationError::storage("count_keys", b"", e))?;
        Ok(count)
    }

    fn validate(
        &self,
        a: &dyn KeyValueStore,
        b: &dyn KeyValueStore,
    ) -> Result<ValidationReport, ReplicationError> {
        let mut report = ValidationReport {
            count_a: self.count_keys(a)?,
            count_b: self.count_keys(b)?,
            ..Default::default()
        };

        if let Verdict::CountMismatch { difference } = report.verdict() {
            warn!(
                count_a = report.count_a,
                count_b = report.count_b,
                difference,
                "Key counts differ; skipping key-by-key comparison"
            );
            return Ok(report);
        }

        let mut failure = None;
        a.visit_prefix(b"", &mut |key, value_a| {
            if is_system_key(key) {
                return ControlFlow::Continue(());
            }
            match b.get(key) {
                Ok(None) => {
                    report.missing_in_b += 1;
                    self.record(&mut report, key, DiscrepancyKind::MissingInB);
                }
                Ok(Some(value_b)) => {
                    if !values_match(key, value_a, &value_b) {
                        report.mismatched += 1;
                        self.record(&mut report, key, DiscrepancyKind::ValueMismatch);
                    }
                    report.checked += 1;
                }
                Err(e) => {
                    failure = Some(ReplicationError::storage("validate", key, e));
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        })
        .map_err(|e| ReplicationError::storage("validate", b"", e))?;

        if let Some(e) = failure {
            return Err(e);
        }

        info!(
            checked = report.checked,
            missing_in_b = report.missing_in_b,
            mismatched = report.mismatched,
            verdict = ?report.verdict(),
            "Validation complete"
        );
        Ok(report)
    }
}
