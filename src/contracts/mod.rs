//! Contract checks run on synthesized pairs
//!
//! Checks run in a fixed order: equality sanity, hash consistency, accessor
//! round-trips, then string representation. Each consumes the pairs left by
//! the previous one; mutating checks advance both sides of a pair together so
//! the pair stays value-equal.

pub mod accessors;
pub mod equality;
pub mod extraction;
pub mod hashing;
pub mod strings;

pub use self::equality::Severity;
pub use self::extraction::ExtractionResult;

use crate::instance::Instance;
use crate::synthesis::InstancePair;

/// Both sides of a pair as object instances, or `None` for non-object pairs.
pub(crate) fn instances(pair: &InstancePair) -> Option<(&Instance, &Instance)> {
    Some((pair.left.as_instance()?, pair.right.as_instance()?))
}

/// Text for a report; falls back to the default form if conversion faults.
pub(crate) fn describe(instance: &Instance) -> String {
    instance.to_text().unwrap_or_else(|_| instance.default_text())
}
