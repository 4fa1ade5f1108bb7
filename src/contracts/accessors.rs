//! Mutator/accessor round-trips
//!
//! For each `set_<member>` mutator the backing field and accessor are read
//! before and after the call. A new argument must show up as a change; an
//! argument equal to the held value must not.

use crate::contracts::extraction::{extract_accessor, extract_field, ExtractionResult};
use crate::contracts::instances;
use crate::descriptor::naming::{accessor_candidates, field_candidates, mutator_member};
use crate::descriptor::{FieldDescriptor, MethodDescriptor, TypeDescriptor, Visibility};
use crate::error::{invocation, Defect, ReadPath, VerifyResult};
use crate::instance::Instance;
use crate::report::{Diagnostics, Warning};
use crate::synthesis::{InstancePair, Synthesizer};
use crate::value::Value;

fn find_field<'d>(descriptor: &'d TypeDescriptor, member: &str) -> Option<&'d FieldDescriptor> {
    field_candidates(member)
        .iter()
        .find_map(|name| descriptor.field(name))
}

fn find_accessor<'d>(descriptor: &'d TypeDescriptor, member: &str) -> Option<&'d MethodDescriptor> {
    accessor_candidates(member).iter().find_map(|name| {
        descriptor
            .methods_named(name)
            .find(|m| m.visibility == Visibility::Public && m.params.is_empty() && m.returns.is_some())
    })
}

/// Objects without declared equality come back as a fresh wrapper on every
/// read, so identity would call them changed every time. Those are compared
/// through their readable fields instead; field-less ones still fall back to
/// identity.
fn same_state(old: &Value, new: &Value) -> VerifyResult<bool> {
    if let (Value::Object(before), Value::Object(after)) = (old, new) {
        let descriptor = before.descriptor();
        if !descriptor.declares_equality()
            && !descriptor.fields().is_empty()
            && before.type_name() == after.type_name()
        {
            for field in descriptor.fields() {
                let read = |instance: &Instance| {
                    instance
                        .read_field(field)
                        .map_err(invocation(instance.type_name(), &field.name))
                };
                if has_changed(&read(before)?, &read(after)?)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }
    }
    old.equals(new).map_err(invocation(&old.kind_name(), "equals"))
}

fn has_changed(old: &Value, new: &Value) -> VerifyResult<bool> {
    match (old.is_null(), new.is_null()) {
        (true, true) => Ok(false),
        (true, false) | (false, true) => Ok(true),
        (false, false) => Ok(!same_state(old, new)?),
    }
}

struct RoundTrip<'m> {
    type_name: &'m str,
    mutator: &'m MethodDescriptor,
    member: &'m str,
}

impl<'m> RoundTrip<'m> {
    fn compare(&self, path: ReadPath, old: &Value, new: &Value, argument: &Value) -> VerifyResult<()> {
        let same_value = !has_changed(old, argument)?;
        let changed = has_changed(old, new)?;
        if !same_value && !changed {
            return Err(Defect::MutatorIgnored {
                type_name: self.type_name.to_string(),
                mutator: self.mutator.name.clone(),
                member: self.member.to_string(),
                path,
            }
            .into());
        }
        if same_value && changed {
            return Err(Defect::MutatorChangedOnSameValue {
                type_name: self.type_name.to_string(),
                mutator: self.mutator.name.clone(),
                member: self.member.to_string(),
                path,
            }
            .into());
        }
        Ok(())
    }

    fn run(
        &self,
        instance: &Instance,
        field: Option<&FieldDescriptor>,
        accessor: Option<&MethodDescriptor>,
        argument: &Value,
        diagnostics: &mut Diagnostics,
    ) -> VerifyResult<()> {
        let old_field = field.map(|f| extract_field(instance, f, diagnostics)).transpose()?;
        let old_read = accessor.map(|a| extract_accessor(instance, a, diagnostics)).transpose()?;

        instance
            .invoke(self.mutator, std::slice::from_ref(argument))
            .map_err(invocation(self.type_name, &self.mutator.name))?;

        let new_field = field.map(|f| extract_field(instance, f, diagnostics)).transpose()?;
        let new_read = accessor.map(|a| extract_accessor(instance, a, diagnostics)).transpose()?;

        if let (Some(ExtractionResult::Found(old)), Some(ExtractionResult::Found(new))) = (&old_field, &new_field) {
            self.compare(ReadPath::Field, old, new, argument)?;
        }
        if let (Some(ExtractionResult::Found(old)), Some(ExtractionResult::Found(new))) = (&old_read, &new_read) {
            self.compare(ReadPath::Accessor, old, new, argument)?;
        }
        Ok(())
    }
}

/// Returns the number of mutators exercised. Members named in `ignored` are
/// skipped.
pub fn check_accessors(
    pair: &InstancePair,
    synthesizer: &mut Synthesizer<'_>,
    ignored: &[String],
) -> VerifyResult<usize> {
    let (left, right) = match instances(pair) {
        Some(sides) => sides,
        None => return Ok(0),
    };
    let descriptor = left.descriptor().clone();
    let type_name = descriptor.name();
    let mut checked = 0;

    for mutator in descriptor.methods().iter().filter(|m| m.is_accessible()) {
        let member = match mutator_member(&mutator.name) {
            Some(member) => member,
            None => continue,
        };
        if ignored.iter().any(|i| *i == member || *i == mutator.name) {
            log::debug!("Ignoring {}::{}", type_name, mutator.name);
            continue;
        }
        match mutator.params.len() {
            1 => {}
            0 => {
                synthesizer.warn(Warning::NamingConvention {
                    type_name: type_name.to_string(),
                    method: mutator.name.clone(),
                    detail: "named like a mutator but takes no argument".to_string(),
                });
                continue;
            }
            arity => {
                synthesizer.warn(Warning::MultiArgumentMutator {
                    type_name: type_name.to_string(),
                    mutator: mutator.name.clone(),
                    arity,
                });
                continue;
            }
        }

        let field = find_field(&descriptor, &member);
        let accessor = find_accessor(&descriptor, &member);
        if field.is_none() {
            synthesizer.warn(Warning::MissingField {
                type_name: type_name.to_string(),
                mutator: mutator.name.clone(),
                field: member.clone(),
            });
        }
        if accessor.is_none() {
            synthesizer.warn(Warning::MissingAccessor {
                type_name: type_name.to_string(),
                mutator: mutator.name.clone(),
                member: member.clone(),
            });
        }

        let arguments = synthesizer.mutator_arguments(&mutator.params)?;
        let round_trip = RoundTrip {
            type_name,
            mutator,
            member: &member,
        };
        log::debug!("Round-tripping {}::{} through {}", type_name, mutator.name, member);
        round_trip.run(left, field, accessor, &arguments.left[0], synthesizer.diagnostics())?;
        round_trip.run(right, field, accessor, &arguments.right[0], synthesizer.diagnostics())?;
        checked += 1;
    }
    Ok(checked)
}
