//! Equality predicate sanity
//!
//! An equality predicate must reject null and unrelated objects, accept the
//! object itself, and accept the other side of a freshly built pair.

use crate::contracts::{describe, instances};
use crate::error::{Defect, InternalFailure, VerifyResult};
use crate::instance::Instance;
use crate::report::{Diagnostics, Warning};
use crate::synthesis::InstancePair;
use crate::value::Value;

/// How a broken contract is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The type under test itself: the defect fails verification.
    Fatal,
    /// A parameter object: the defect becomes a warning.
    Warning,
}

fn equals(instance: &Instance, other: &Value) -> VerifyResult<bool> {
    instance
        .equals(other)
        .map_err(|fault| InternalFailure::from_fault(instance.type_name(), "equals", fault).into())
}

fn report(defect: Defect, severity: Severity, diagnostics: &mut Diagnostics) -> VerifyResult<()> {
    match severity {
        Severity::Fatal => Err(defect.into()),
        Severity::Warning => {
            diagnostics.warn(Warning::ParameterEquality { defect });
            Ok(())
        }
    }
}

pub fn check_equality_sanity(
    pair: &InstancePair,
    severity: Severity,
    diagnostics: &mut Diagnostics,
) -> VerifyResult<()> {
    let (left, right) = match instances(pair) {
        Some(sides) => sides,
        None => return Ok(()),
    };
    let type_name = left.type_name().to_string();
    log::debug!("Checking equality sanity of {} ({:?})", type_name, severity);

    if equals(left, &Value::Null)? {
        report(
            Defect::EqualsMatchesNull {
                type_name: type_name.clone(),
            },
            severity,
            diagnostics,
        )?;
    }
    if !equals(left, &pair.left)? || !equals(right, &pair.right)? {
        report(
            Defect::NotReflexive {
                type_name: type_name.clone(),
            },
            severity,
            diagnostics,
        )?;
    }
    if equals(left, &Value::Object(Instance::unrelated()))? {
        report(
            Defect::EqualsEverything {
                type_name: type_name.clone(),
            },
            severity,
            diagnostics,
        )?;
    }
    if !equals(left, &pair.right)? {
        report(
            Defect::PairNotEqual {
                type_name,
                left: describe(left),
                right: describe(right),
            },
            severity,
            diagnostics,
        )?;
    }
    Ok(())
}
