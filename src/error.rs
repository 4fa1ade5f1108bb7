//! Error taxonomy
//!
//! Verification fails for one of three reasons, and callers match on which:
//! the caller asked for something unsupported ([`UsageError`]), the type under
//! test broke a contract ([`Defect`]), or the engine could not complete the
//! run ([`InternalFailure`]).

use crate::fault::Fault;

pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VerifyError {
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("defect detected: {0}")]
    Defect(#[from] Defect),

    #[error("internal failure: {0}")]
    Internal(#[from] InternalFailure),
}

impl VerifyError {
    pub fn is_usage(&self) -> bool {
        matches!(self, VerifyError::Usage(_))
    }

    pub fn is_defect(&self) -> bool {
        matches!(self, VerifyError::Defect(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, VerifyError::Internal(_))
    }

    pub fn as_defect(&self) -> Option<&Defect> {
        match self {
            VerifyError::Defect(defect) => Some(defect),
            _ => None,
        }
    }
}

/// The caller asked for something that cannot be verified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UsageError {
    #[error("{type_name} is abstract or an interface and cannot be instantiated; verify one of its implementations instead")]
    AbstractType { type_name: String },

    #[error("no implementation found for abstract type {type_name}; supply one with the implementations list")]
    NoImplementationFound { type_name: String },

    #[error("{type_name} is an empty enumeration and cannot be verified; add an enumerator or exclude it")]
    EmptyEnumeration { type_name: String },

    #[error("invalid override coordinate (arity {arity}, ordinal {ordinal}): {reason}")]
    InvalidCoordinate {
        arity: usize,
        ordinal: usize,
        reason: String,
    },

    #[error("type {type_name} is not registered")]
    UnknownType { type_name: String },

    #[error("{type_name} declares only {declared}; equal objects must have equal hashes, so declare both or neither")]
    PartialEqualityContract { type_name: String, declared: String },

    #[error("{type_name} has no protected or hidden initializer; use verify for public ones")]
    NoNonPublicInitializer { type_name: String },

    #[error("{type_name} is not an object type")]
    NotAnObjectType { type_name: String },

    #[error("{type_name} has no method {method} taking {arity} argument(s)")]
    MethodNotFound {
        type_name: String,
        method: String,
        arity: usize,
    },
}

/// Which member a round-trip check read back through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPath {
    Field,
    Accessor,
}

impl std::fmt::Display for ReadPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadPath::Field => write!(f, "field"),
            ReadPath::Accessor => write!(f, "accessor"),
        }
    }
}

/// The type under test breaks a contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Defect {
    #[error("{type_name}: equality matches null")]
    EqualsMatchesNull { type_name: String },

    #[error("{type_name}: object is not equal to itself")]
    NotReflexive { type_name: String },

    #[error("{type_name}: equality returns true for an unrelated object")]
    EqualsEverything { type_name: String },

    #[error("{type_name}: objects built from equal arguments are not equal ({left} vs. {right}); time-dependent members are a common cause")]
    PairNotEqual {
        type_name: String,
        left: String,
        right: String,
    },

    #[error("{type_name}: equal objects have different hashes ({left} vs. {right})")]
    UnequalHashes { type_name: String, left: i32, right: i32 },

    #[error("{type_name}: calling {mutator} with {argument} changed the hash but not the result of equality; equal objects must have equal hashes")]
    HashChangedEqualityDidNot {
        type_name: String,
        mutator: String,
        argument: String,
    },

    #[error("{type_name}: calling {mutator} with {argument} changed the result of equality but not the hash; equal objects must have equal hashes")]
    EqualityChangedHashDidNot {
        type_name: String,
        mutator: String,
        argument: String,
    },

    #[error("{type_name}: called {mutator} but the {path} {member} did not change")]
    MutatorIgnored {
        type_name: String,
        mutator: String,
        member: String,
        path: ReadPath,
    },

    #[error("{type_name}: called {mutator} with the value it already held but the {path} {member} now differs")]
    MutatorChangedOnSameValue {
        type_name: String,
        mutator: String,
        member: String,
        path: ReadPath,
    },

    #[error("{type_name}: two equal objects render differently ({left:?} vs. {right:?}); the usual cause is a member without its own string conversion printing its address (SomeObject@383534aa)")]
    StringRepresentationDiverged {
        type_name: String,
        left: String,
        right: String,
    },

    #[error("{type_name} is placed in an ordered {container} but declares no ordering")]
    MissingOrdering { type_name: String, container: String },

    #[error("{type_name}: the string conversion dereferenced a missing value ({detail}), which points to a bug in it")]
    BrokenStringConversion { type_name: String, detail: String },
}

impl Defect {
    pub fn type_name(&self) -> &str {
        match self {
            Defect::EqualsMatchesNull { type_name }
            | Defect::NotReflexive { type_name }
            | Defect::EqualsEverything { type_name }
            | Defect::PairNotEqual { type_name, .. }
            | Defect::UnequalHashes { type_name, .. }
            | Defect::HashChangedEqualityDidNot { type_name, .. }
            | Defect::EqualityChangedHashDidNot { type_name, .. }
            | Defect::MutatorIgnored { type_name, .. }
            | Defect::MutatorChangedOnSameValue { type_name, .. }
            | Defect::StringRepresentationDiverged { type_name, .. }
            | Defect::MissingOrdering { type_name, .. }
            | Defect::BrokenStringConversion { type_name, .. } => type_name,
        }
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({})", hint),
        None => String::new(),
    }
}

/// The run could not be completed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InternalFailure {
    #[error("multi-dimensional arrays are not supported ({declared})")]
    MultiDimensionalArray { declared: String },

    #[error("no generator for platform type {path}")]
    UnsupportedBuiltin { path: String },

    #[error("{member} of {type_name} dereferenced a missing value ({detail}); this usually means a bug in the type")]
    NullDereference {
        type_name: String,
        member: String,
        detail: String,
    },

    #[error("invoking {member} of {type_name} failed: {fault}{}", hint_suffix(.hint))]
    InvocationFailed {
        type_name: String,
        member: String,
        fault: Fault,
        hint: Option<String>,
    },

    #[error("no initializer of {type_name} could be completed")]
    NoInitializerCompleted { type_name: String },
}

impl InternalFailure {
    /// Classify a fault raised while invoking `member`.
    pub fn from_fault(type_name: &str, member: &str, fault: Fault) -> InternalFailure {
        match fault {
            Fault::NullReference(detail) => InternalFailure::NullDereference {
                type_name: type_name.to_string(),
                member: member.to_string(),
                detail,
            },
            fault => {
                let hint = if fault.is_argument_related() {
                    Some("it seems to need a specific format; supply an override value".to_string())
                } else {
                    None
                };
                InternalFailure::InvocationFailed {
                    type_name: type_name.to_string(),
                    member: member.to_string(),
                    fault,
                    hint,
                }
            }
        }
    }
}

/// Adapter for `map_err` at invocation sites.
pub(crate) fn invocation<'a>(type_name: &'a str, member: &'a str) -> impl FnOnce(Fault) -> VerifyError + 'a {
    move |fault| InternalFailure::from_fault(type_name, member, fault).into()
}
