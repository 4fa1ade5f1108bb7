//! Verification entry point
//!
//! A [`Verifier`] owns the type registry, the configuration and the value
//! generator. `verify` builds every pair the type's initializers can produce
//! and runs the contract checks on each of them in turn.

use crate::config::VerifierConfig;
use crate::contracts::accessors::check_accessors;
use crate::contracts::equality::{check_equality_sanity, Severity};
use crate::contracts::hashing::check_hash_consistency;
use crate::contracts::strings::check_string_representation;
use crate::descriptor::{TypeDescriptor, Visibility};
use crate::error::{invocation, InternalFailure, UsageError, VerifyResult};
use crate::generation::ScalarGenerator;
use crate::instance::Instance;
use crate::overrides::{self, OverrideResolver};
use crate::registry::TypeRegistry;
use crate::report::{Diagnostics, VerificationReport};
use crate::synthesis::{InstancePair, Synthesizer};
use crate::types::TypeRef;
use crate::value::Value;

/// Per-call settings for [`Verifier::verify_with`].
#[derive(Default)]
pub struct VerifyOptions<'o> {
    /// Concrete types that may stand in for abstract parameter types.
    pub implementations: Vec<String>,
    /// Members (or mutator names) left out of the accessor check.
    pub ignored_members: Vec<String>,
    pub overrides: Option<&'o dyn OverrideResolver>,
}

impl<'o> VerifyOptions<'o> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_implementation(mut self, name: &str) -> Self {
        self.implementations.push(name.to_string());
        self
    }

    pub fn ignoring(mut self, member: &str) -> Self {
        self.ignored_members.push(member.to_string());
        self
    }

    pub fn with_overrides(mut self, overrides: &'o dyn OverrideResolver) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

pub struct Verifier {
    registry: TypeRegistry,
    config: VerifierConfig,
    generator: ScalarGenerator,
}

impl Verifier {
    pub fn new(registry: TypeRegistry, config: VerifierConfig) -> Self {
        let generator = ScalarGenerator::new(config.seed, config.max_array_len);
        Verifier {
            registry,
            config,
            generator,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Seed of the value generator, for replaying a failing run.
    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn set_warnings_enabled(&mut self, enabled: bool) {
        self.config.warnings = enabled;
    }

    pub fn warnings_enabled(&self) -> bool {
        self.config.warnings
    }

    /// Verify `type_name` with default options.
    pub fn verify(&mut self, type_name: &str) -> VerifyResult<VerificationReport> {
        self.verify_with(type_name, &VerifyOptions::default())
    }

    pub fn verify_with(&mut self, type_name: &str, options: &VerifyOptions<'_>) -> VerifyResult<VerificationReport> {
        log::info!("Verifying {}", type_name);
        let descriptor = self.registry.resolve(type_name)?;
        if descriptor.is_abstract() {
            return Err(UsageError::AbstractType {
                type_name: type_name.to_string(),
            }
            .into());
        }
        check_declared_pair(&descriptor)?;

        let mut diagnostics = Diagnostics::new(self.config.warnings);
        if let Some(resolver) = options.overrides {
            overrides::validate(resolver, &descriptor, &self.registry, &mut diagnostics);
        }

        let mut report = VerificationReport {
            type_name: type_name.to_string(),
            ..VerificationReport::default()
        };
        {
            let mut synthesizer = Synthesizer::new(
                &self.registry,
                &mut self.generator,
                &mut diagnostics,
                &options.implementations,
            );
            if let Some(resolver) = options.overrides {
                synthesizer = synthesizer.with_overrides(resolver);
            }

            let pairs = synthesizer.synthesize(type_name, true)?;
            if pairs.is_empty() {
                return Err(InternalFailure::NoInitializerCompleted {
                    type_name: type_name.to_string(),
                }
                .into());
            }
            report.pairs_constructed = pairs.len();
            log::debug!("Built {} pair(s) of {}", pairs.len(), type_name);

            let hashed = descriptor.declares_equality() && descriptor.declares_hash();
            for pair in &pairs {
                if hashed {
                    check_equality_sanity(pair, Severity::Fatal, synthesizer.diagnostics())?;
                    report.mutators_checked += check_hash_consistency(pair, &mut synthesizer)?;
                }
                report.accessors_checked += check_accessors(pair, &mut synthesizer, &options.ignored_members)?;
                if self.config.check_string_representation && check_string_representation(pair, synthesizer.diagnostics())? {
                    report.string_checks += 1;
                }
            }
        }
        report.warnings = diagnostics.into_warnings();
        log::info!("{}", report);
        Ok(report)
    }

    /// Build pairs through the type's protected and hidden initializers only.
    pub fn verify_hidden_initializer(&mut self, type_name: &str) -> VerifyResult<Vec<InstancePair>> {
        let descriptor = self.registry.resolve(type_name)?;
        if descriptor.is_enumeration() {
            return Err(UsageError::NotAnObjectType {
                type_name: type_name.to_string(),
            }
            .into());
        }
        if descriptor.is_abstract() {
            return Err(UsageError::AbstractType {
                type_name: type_name.to_string(),
            }
            .into());
        }
        let hidden: Vec<_> = descriptor
            .initializers()
            .iter()
            .filter(|init| init.visibility != Visibility::Public)
            .cloned()
            .collect();
        if hidden.is_empty() {
            return Err(UsageError::NoNonPublicInitializer {
                type_name: type_name.to_string(),
            }
            .into());
        }
        let mut diagnostics = Diagnostics::new(self.config.warnings);
        let implementations = Vec::new();
        let mut synthesizer = Synthesizer::new(&self.registry, &mut self.generator, &mut diagnostics, &implementations);
        let pairs = synthesizer.construct_with(&descriptor, &hidden, true)?;
        if pairs.is_empty() {
            return Err(InternalFailure::NoInitializerCompleted {
                type_name: type_name.to_string(),
            }
            .into());
        }
        Ok(pairs)
    }

    /// Call a method of any visibility, matched by name and argument count.
    pub fn invoke_hidden_method(&self, instance: &Instance, name: &str, args: &[Value]) -> VerifyResult<Value> {
        let method = instance
            .descriptor()
            .methods_named(name)
            .find(|m| m.params.len() == args.len())
            .ok_or_else(|| UsageError::MethodNotFound {
                type_name: instance.type_name().to_string(),
                method: name.to_string(),
                arity: args.len(),
            })?;
        instance.invoke(method, args).map_err(invocation(instance.type_name(), name))
    }

    /// Pairs for an arbitrary slot type, as synthesis would fill a parameter.
    pub fn synthesize(&mut self, ty: &TypeRef, options: &VerifyOptions<'_>) -> VerifyResult<Vec<InstancePair>> {
        let mut diagnostics = Diagnostics::new(self.config.warnings);
        let mut synthesizer = Synthesizer::new(
            &self.registry,
            &mut self.generator,
            &mut diagnostics,
            &options.implementations,
        );
        if let Some(resolver) = options.overrides {
            synthesizer = synthesizer.with_overrides(resolver);
        }
        match ty {
            TypeRef::Named(name) => synthesizer.synthesize(name, true),
            other => Ok(vec![synthesizer.fill(other)?]),
        }
    }
}

/// Equality and hash are declared together or not at all.
fn check_declared_pair(descriptor: &TypeDescriptor) -> VerifyResult<()> {
    let declared = match (descriptor.declares_equality(), descriptor.declares_hash()) {
        (true, false) => "an equality predicate",
        (false, true) => "a hash function",
        _ => return Ok(()),
    };
    Err(UsageError::PartialEqualityContract {
        type_name: descriptor.name().to_string(),
        declared: declared.to_string(),
    }
    .into())
}
