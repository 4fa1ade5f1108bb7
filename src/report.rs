//! Warnings and verification reports
//!
//! Non-fatal findings are logged through `log::warn!` and collected so callers
//! can inspect them. When warnings are disabled they are dropped entirely.

use std::fmt;

use crate::error::Defect;

/// A non-fatal finding.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A mutator-like method that does not follow the accessor conventions.
    NamingConvention {
        type_name: String,
        method: String,
        detail: String,
    },
    MissingField {
        type_name: String,
        mutator: String,
        field: String,
    },
    MissingAccessor {
        type_name: String,
        mutator: String,
        member: String,
    },
    /// Every initializer was skipped because it needs a type already under
    /// construction.
    CycleSkipped { type_name: String },
    ExtractionFailed {
        type_name: String,
        accessor: String,
        detail: String,
    },
    /// A contract broken by a parameter object rather than the type under test.
    ParameterEquality { defect: Defect },
    MultiArgumentMutator {
        type_name: String,
        mutator: String,
        arity: usize,
    },
    StreamParameter { declared: String },
    UnusedOverride { coordinate: String },
    MalformedStringConversion { type_name: String, method: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NamingConvention {
                type_name,
                method,
                detail,
            } => write!(f, "{}: {} is skipped: {}", type_name, method, detail),
            Warning::MissingField {
                type_name,
                mutator,
                field,
            } => write!(
                f,
                "{}: {} has no corresponding field ({}) and is skipped; follow the accessor naming convention",
                type_name, mutator, field
            ),
            Warning::MissingAccessor {
                type_name,
                mutator,
                member,
            } => write!(
                f,
                "{}: {} has no accessor ({} / get_{}) and is skipped; follow the accessor naming convention",
                type_name, mutator, member, member
            ),
            Warning::CycleSkipped { type_name } => write!(
                f,
                "none of the initializers of {} could be used due to creation cycle(s); consider revising the design",
                type_name
            ),
            Warning::ExtractionFailed {
                type_name,
                accessor,
                detail,
            } => write!(
                f,
                "{}: {} could not be invoked ({}); it probably relies on state that is not set up yet and is skipped",
                type_name, accessor, detail
            ),
            Warning::ParameterEquality { defect } => write!(f, "parameter object: {}", defect),
            Warning::MultiArgumentMutator {
                type_name,
                mutator,
                arity,
            } => write!(
                f,
                "{}: {} takes {} parameters and is skipped; only single-argument mutators are checked",
                type_name, mutator, arity
            ),
            Warning::StreamParameter { declared } => write!(
                f,
                "a {} parameter is filled with random bytes; the type may expect specific stream content",
                declared
            ),
            Warning::UnusedOverride { coordinate } => write!(
                f,
                "override {} matches no initializer or mutator parameter",
                coordinate
            ),
            Warning::MalformedStringConversion { type_name, method } => write!(
                f,
                "{} does not declare a string conversion although it has a {} method with another shape",
                type_name, method
            ),
        }
    }
}

/// Collects warnings for one verification run.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    enabled: bool,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new(enabled: bool) -> Self {
        Diagnostics {
            enabled,
            warnings: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn warn(&mut self, warning: Warning) {
        if !self.enabled {
            return;
        }
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub type_name: String,
    /// Instance pairs built, one per viable initializer.
    pub pairs_constructed: usize,
    /// Mutators exercised by the hash-consistency check.
    pub mutators_checked: usize,
    /// Mutators exercised by the accessor round-trip check.
    pub accessors_checked: usize,
    /// Pairs whose string representations were compared.
    pub string_checks: usize,
    pub warnings: Vec<Warning>,
}

impl VerificationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} pair(s), {} hash check(s), {} accessor check(s), {} string check(s), {} warning(s)",
            self.type_name,
            self.pairs_constructed,
            self.mutators_checked,
            self.accessors_checked,
            self.string_checks,
            self.warnings.len()
        )
    }
}
