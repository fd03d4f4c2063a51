//! # Inbound Ports (Driving Ports)

use crate::domain::errors::ReplicationError;
use crate::domain::report::ValidationReport;
use crate::ports::outbound::KeyValueStore;

/// Detects divergence between two copies of a keyspace.
///
/// Single pass, no repair. A last-write-wins overwrite that happened during
/// import leaves no trace and is reported as identical.
pub trait ConsistencyValidatorApi {
    /// Non-system keys in `store`.
    fn count_keys(&self, store: &dyn KeyValueStore) -> Result<usize, ReplicationError>;

    /// Compare `a` against `b`.
    ///
    /// Stops after counting when the key counts differ. Otherwise every
    /// non-system key of `a` is looked up in `b`.
    fn validate(
        &self,
        a: &dyn KeyValueStore,
        b: &dyn KeyValueStore,
    ) -> Result<ValidationReport, ReplicationError>;
}
