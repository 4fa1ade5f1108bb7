//! Best-effort reads of fields and accessors

use crate::descriptor::{FieldDescriptor, MethodDescriptor};
use crate::error::{InternalFailure, VerifyResult};
use crate::fault::Fault;
use crate::instance::Instance;
use crate::report::{Diagnostics, Warning};
use crate::value::Value;

/// Outcome of reading state for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Found(Value),
    /// The read could not be performed; the comparison is skipped.
    NotFound,
}

impl ExtractionResult {
    pub fn value(&self) -> Option<&Value> {
        match self {
            ExtractionResult::Found(value) => Some(value),
            ExtractionResult::NotFound => None,
        }
    }
}

fn classify(
    instance: &Instance,
    member: &str,
    read: Result<Value, Fault>,
    diagnostics: &mut Diagnostics,
) -> VerifyResult<ExtractionResult> {
    match read {
        Ok(value) => Ok(ExtractionResult::Found(value)),
        Err(Fault::UninitializedState(detail)) => {
            diagnostics.warn(Warning::ExtractionFailed {
                type_name: instance.type_name().to_string(),
                accessor: member.to_string(),
                detail,
            });
            Ok(ExtractionResult::NotFound)
        }
        Err(fault @ Fault::Panicked(_)) => {
            Err(InternalFailure::from_fault(instance.type_name(), member, fault).into())
        }
        Err(fault) => {
            log::debug!("{} of {} faulted ({}); treating it as null", member, instance.type_name(), fault);
            Ok(ExtractionResult::Found(Value::Null))
        }
    }
}

pub fn extract_field(
    instance: &Instance,
    field: &FieldDescriptor,
    diagnostics: &mut Diagnostics,
) -> VerifyResult<ExtractionResult> {
    classify(instance, &field.name, instance.read_field(field), diagnostics)
}

pub fn extract_accessor(
    instance: &Instance,
    accessor: &MethodDescriptor,
    diagnostics: &mut Diagnostics,
) -> VerifyResult<ExtractionResult> {
    classify(instance, &accessor.name, instance.invoke(accessor, &[]), diagnostics)
}
