//! # beancheck
//!
//! A contract oracle for data-holding types. Given nothing but a registered
//! description of a type (its initializers, fields, accessors and mutators) it
//! builds pairs of value-equal instances and checks that the type keeps the
//! usual data-object promises: sane equality, hashes that agree with
//! equality, mutators that are visible through accessors, and a string
//! representation that does not leak addresses.
//!
//! Types opt in by implementing [`DataObject`] or [`Enumeration`] and are
//! registered in a [`TypeRegistry`]; a [`Verifier`] then checks them by name.

pub mod config;
pub mod contracts;
pub mod descriptor;
pub mod error;
pub mod fault;
pub mod generation;
pub mod instance;
pub mod oracle;
pub mod overrides;
pub mod reflect;
pub mod registry;
pub mod report;
pub mod synthesis;
pub mod types;
pub mod value;

// Re-export core types for easy access
pub use config::VerifierConfig;
pub use descriptor::{Args, DataObject, Enumeration, TypeBuilder, TypeDescriptor, Visibility};
pub use error::{Defect, InternalFailure, ReadPath, UsageError, VerifyError, VerifyResult};
pub use fault::Fault;
pub use generation::ScalarGenerator;
pub use instance::Instance;
pub use oracle::{Verifier, VerifyOptions};
pub use overrides::{Coordinate, OverrideResolver, OverrideStore};
pub use reflect::{FromValue, IntoValue, Reflect};
pub use registry::TypeRegistry;
pub use report::{VerificationReport, Warning};
pub use synthesis::InstancePair;
pub use types::{BuiltinKind, CollectionKind, MapKind, ScalarKind, TypeRef};
pub use value::Value;
