//! String representation equality
//!
//! Equal objects should render the same. Members whose text depends on hash
//! order or on the clock are blanked on copies before rendering.

use crate::contracts::instances;
use crate::descriptor::naming::is_string_conversion_name;
use crate::error::{invocation, Defect, VerifyResult};
use crate::fault::Fault;
use crate::instance::Instance;
use crate::report::{Diagnostics, Warning};
use crate::synthesis::InstancePair;
use crate::value::Value;

/// A copy of `instance` with run-dependent members set to null.
fn stable_copy(instance: &Instance) -> VerifyResult<Instance> {
    let type_name = instance.type_name();
    let copy = instance.duplicate().map_err(invocation(type_name, "clone"))?;
    let descriptor = copy.descriptor().clone();
    for field in descriptor.fields() {
        if field.ty.is_run_dependent() && field.is_writable() {
            copy.write_field(field, &Value::Null)
                .map_err(invocation(type_name, &field.name))?;
        }
    }
    Ok(copy)
}

fn render(instance: &Instance) -> VerifyResult<String> {
    instance.to_text().map_err(|fault| match fault {
        Fault::NullReference(detail) => Defect::BrokenStringConversion {
            type_name: instance.type_name().to_string(),
            detail,
        }
        .into(),
        fault => invocation(instance.type_name(), "to_string")(fault),
    })
}

/// Returns whether the pair was compared. Types without a declared string
/// conversion are skipped, with a warning when they declare a method that
/// looks like one.
pub fn check_string_representation(pair: &InstancePair, diagnostics: &mut Diagnostics) -> VerifyResult<bool> {
    let (left, right) = match instances(pair) {
        Some(sides) => sides,
        None => return Ok(false),
    };
    let descriptor = left.descriptor();

    if !descriptor.declares_string_conversion() {
        let malformed = descriptor
            .methods()
            .iter()
            .find(|m| m.declared_by == descriptor.name() && is_string_conversion_name(&m.name));
        if let Some(method) = malformed {
            diagnostics.warn(Warning::MalformedStringConversion {
                type_name: descriptor.name().to_string(),
                method: method.name.clone(),
            });
        }
        return Ok(false);
    }

    let left_text = render(&stable_copy(left)?)?;
    let right_text = render(&stable_copy(right)?)?;
    log::debug!("Comparing renderings of {}: {:?} / {:?}", descriptor.name(), left_text, right_text);
    if left_text != right_text {
        return Err(Defect::StringRepresentationDiverged {
            type_name: descriptor.name().to_string(),
            left: left_text,
            right: right_text,
        }
        .into());
    }
    Ok(true)
}
