//! Hash consistency under mutation
//!
//! Equal objects must have equal hashes. After a mutator runs on the left side
//! only, the hash may change exactly when equality with the untouched right
//! side breaks.

use crate::contracts::instances;
use crate::descriptor::naming::mutator_member;
use crate::descriptor::Visibility;
use crate::error::{invocation, Defect, VerifyResult};
use crate::instance::Instance;
use crate::synthesis::{InstancePair, Synthesizer};
use crate::value::Value;

fn hash_of(instance: &Instance) -> VerifyResult<i32> {
    instance.hash_code().map_err(invocation(instance.type_name(), "hash"))
}

fn render(arguments: &[Value]) -> String {
    arguments
        .iter()
        .map(|v| v.to_text().unwrap_or_else(|_| v.kind_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the number of mutators exercised.
pub fn check_hash_consistency(pair: &InstancePair, synthesizer: &mut Synthesizer<'_>) -> VerifyResult<usize> {
    let (left, right) = match instances(pair) {
        Some(sides) => sides,
        None => return Ok(0),
    };
    let descriptor = left.descriptor().clone();
    let type_name = descriptor.name();

    let (left_hash, right_hash) = (hash_of(left)?, hash_of(right)?);
    if left_hash != right_hash {
        return Err(Defect::UnequalHashes {
            type_name: type_name.to_string(),
            left: left_hash,
            right: right_hash,
        }
        .into());
    }

    let mut checked = 0;
    let mutators = descriptor
        .methods()
        .iter()
        .filter(|m| m.visibility == Visibility::Public && mutator_member(&m.name).is_some());
    for mutator in mutators {
        let arguments = synthesizer.mutator_arguments(&mutator.params)?;
        let before = hash_of(left)?;
        left.invoke(mutator, &arguments.left)
            .map_err(invocation(type_name, &mutator.name))?;
        let after = hash_of(left)?;
        let still_equal = left
            .equals(&pair.right)
            .map_err(invocation(type_name, "equals"))?;
        log::debug!(
            "{}::{}: hash {} -> {}, still equal: {}",
            type_name,
            mutator.name,
            before,
            after,
            still_equal
        );

        if before != after && still_equal {
            return Err(Defect::HashChangedEqualityDidNot {
                type_name: type_name.to_string(),
                mutator: mutator.name.clone(),
                argument: render(&arguments.left),
            }
            .into());
        }
        if before == after && !still_equal {
            return Err(Defect::EqualityChangedHashDidNot {
                type_name: type_name.to_string(),
                mutator: mutator.name.clone(),
                argument: render(&arguments.left),
            }
            .into());
        }

        right
            .invoke(mutator, &arguments.right)
            .map_err(invocation(type_name, &mutator.name))?;
        checked += 1;
    }
    Ok(checked)
}
