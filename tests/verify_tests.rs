mod fixtures;

use beancheck::{
    Defect, InternalFailure, ReadPath, UsageError, Value, Verifier, VerifierConfig, VerifyError, VerifyOptions,
    Warning,
};

fn verifier() -> Verifier {
    Verifier::new(fixtures::registry(), VerifierConfig::default().with_seed(42))
}

fn defect_of(result: Result<beancheck::VerificationReport, VerifyError>) -> Defect {
    match result {
        Err(VerifyError::Defect(defect)) => defect,
        other => panic!("expected a defect, got {:?}", other),
    }
}

#[test]
fn test_well_formed_type_passes() {
    let report = verifier().verify("ExampleDto").unwrap();
    assert_eq!(report.pairs_constructed, 2);
    assert_eq!(report.mutators_checked, 4);
    assert_eq!(report.accessors_checked, 4);
    assert_eq!(report.string_checks, 2);
    assert!(!report.has_warnings(), "{:?}", report.warnings);
}

#[test]
fn test_hash_without_equality_is_rejected_before_construction() {
    let err = verifier().verify("OnlyHash").unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::PartialEqualityContract { .. })));

    let err = verifier().verify("OnlyEquals").unwrap_err();
    assert!(err.is_usage());
    assert!(err.to_string().contains("an equality predicate"));
}

#[test]
fn test_broken_equality_is_reported() {
    let mut verifier = verifier();
    assert!(matches!(
        defect_of(verifier.verify("NullLover")),
        Defect::EqualsMatchesNull { .. }
    ));
    assert!(matches!(defect_of(verifier.verify("Narcissist")), Defect::NotReflexive { .. }));
    assert!(matches!(
        defect_of(verifier.verify("Promiscuous")),
        Defect::EqualsEverything { .. }
    ));
}

#[test]
fn test_broken_parameter_equality_is_only_a_warning() {
    let report = verifier().verify("Holder").unwrap();
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        Warning::ParameterEquality {
            defect: Defect::EqualsEverything { .. }
        }
    )));
}

#[test]
fn test_mutator_without_matching_field_warns() {
    let report = verifier().verify("Misnamed").unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::MissingField { field, .. } if field == "name")));
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::MissingAccessor { member, .. } if member == "name")));
}

#[test]
fn test_disabled_warnings_are_not_collected() {
    let mut verifier = verifier();
    verifier.set_warnings_enabled(false);
    assert!(!verifier.warnings_enabled());
    let report = verifier.verify("Misnamed").unwrap();
    assert!(report.warnings.is_empty());
}

#[test]
fn test_ignored_members_are_skipped() {
    let options = VerifyOptions::new().ignoring("name");
    let report = verifier().verify_with("Misnamed", &options).unwrap();
    assert_eq!(report.accessors_checked, 0);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_self_referential_initializer_alone_cannot_complete() {
    let err = verifier().verify("Node").unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Internal(InternalFailure::NoInitializerCompleted { .. })
    ));
}

#[test]
fn test_self_referential_initializer_is_skipped_for_another() {
    let report = verifier().verify("LinkedNode").unwrap();
    assert_eq!(report.pairs_constructed, 1);
    assert_eq!(report.accessors_checked, 1);
}

#[test]
fn test_address_in_string_representation_is_a_defect() {
    let err = verifier().verify("Labelled").unwrap_err();
    assert!(err.to_string().contains("SomeObject@"));
    match err.as_defect() {
        Some(Defect::StringRepresentationDiverged { left, right, .. }) => {
            assert!(left.contains("Inner@"));
            assert_ne!(left, right);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_string_check_can_be_disabled() {
    let mut verifier = Verifier::new(
        fixtures::registry(),
        VerifierConfig::default().with_seed(42).with_string_checks(false),
    );
    let report = verifier.verify("Labelled").unwrap();
    assert_eq!(report.string_checks, 0);
}

#[test]
fn test_inherited_members_are_verified() {
    let report = verifier().verify("Timeout").unwrap();
    assert_eq!(report.pairs_constructed, 1);
    // set_code is protected: round-tripped but not part of the hash check
    assert_eq!(report.mutators_checked, 2);
    assert_eq!(report.accessors_checked, 3);
}

#[test]
fn test_enumerations_and_enum_members() {
    let mut verifier = verifier();
    let report = verifier.verify("Color").unwrap();
    assert_eq!(report.pairs_constructed, 1);

    let report = verifier.verify("Palette").unwrap();
    assert_eq!(report.accessors_checked, 1);

    let err = verifier.verify("Nothing").unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::EmptyEnumeration { .. })));
}

#[test]
fn test_containers_and_calendar_members() {
    let report = verifier().verify("Catalog").unwrap();
    assert_eq!(report.accessors_checked, 5);
    assert_eq!(report.string_checks, 1);
}

#[test]
fn test_abstract_parameters_need_an_implementation() {
    let mut verifier = verifier();
    let err = verifier.verify("Canvas").unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Usage(UsageError::NoImplementationFound { ref type_name }) if type_name == "Shape"
    ));

    let options = VerifyOptions::new().with_implementation("Triangle");
    let report = verifier.verify_with("Canvas", &options).unwrap();
    assert_eq!(report.pairs_constructed, 1);

    let err = verifier.verify("Shape").unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::AbstractType { .. })));
}

#[test]
fn test_multi_dimensional_arrays_are_unsupported() {
    let err = verifier().verify("Matrix").unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Internal(InternalFailure::MultiDimensionalArray { .. })
    ));
}

#[test]
fn test_unusual_shapes_are_warned_about() {
    let report = verifier().verify("Range").unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::MultiArgumentMutator { arity: 2, .. })));
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::MalformedStringConversion { method, .. } if method == "to_string")));
}

#[test]
fn test_ignored_mutator_argument_is_a_defect() {
    match defect_of(verifier().verify("Sticky")) {
        Defect::MutatorIgnored { mutator, path, .. } => {
            assert_eq!(mutator, "set_value");
            assert_eq!(path, ReadPath::Field);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_hash_and_equality_must_move_together() {
    let mut verifier = verifier();
    assert!(matches!(
        defect_of(verifier.verify("Counter")),
        Defect::HashChangedEqualityDidNot { .. }
    ));
    assert!(matches!(
        defect_of(verifier.verify("Sloppy")),
        Defect::EqualityChangedHashDidNot { .. }
    ));
}

#[test]
fn test_hidden_initializers_and_methods() {
    let mut verifier = verifier();
    let pairs = verifier.verify_hidden_initializer("Token").unwrap();
    assert_eq!(pairs.len(), 1);

    let token = pairs[0].left.as_instance().unwrap().clone();
    let expected = token.get::<fixtures::Token>().unwrap().id * 2;
    assert_eq!(
        verifier.invoke_hidden_method(&token, "doubled", &[]).unwrap(),
        Value::I64(expected)
    );

    let err = verifier.invoke_hidden_method(&token, "doubled", &[Value::I32(1)]).unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::MethodNotFound { arity: 1, .. })));

    let err = verifier.verify_hidden_initializer("Color").unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::NotAnObjectType { .. })));
}

#[test]
fn test_protected_initializers_count_as_hidden() {
    let mut verifier = verifier();
    let pairs = verifier.verify_hidden_initializer("Guarded").unwrap();
    assert_eq!(pairs.len(), 1);
    let left = pairs[0].left.as_instance().unwrap().get::<fixtures::Guarded>().unwrap();
    let right = pairs[0].right.as_instance().unwrap().get::<fixtures::Guarded>().unwrap();
    assert_eq!(left, right);

    let err = verifier.verify_hidden_initializer("ExampleDto").unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::NoNonPublicInitializer { .. })));
}

#[test]
fn test_unknown_types_are_usage_errors() {
    let err = verifier().verify("Missing").unwrap_err();
    assert!(matches!(err, VerifyError::Usage(UsageError::UnknownType { .. })));
}

#[test]
fn test_same_seed_same_report() {
    let first = verifier().verify("ExampleDto").unwrap();
    let second = verifier().verify("ExampleDto").unwrap();
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(verifier().seed(), 42);
}
