use std::sync::Arc;

use tyfam::{Family, FamilyBuilder, FieldSchema, TypeRef, Value};

// One variant per schema shape, as in `{A: T, B: [T, T], C: {x: T, y: T}}`.
fn mixed_family() -> Arc<Family> {
    FamilyBuilder::new("Mixed")
        .variant("A", TypeRef::Int)
        .variant("B", [TypeRef::Int, TypeRef::Int])
        .variant(
            "C",
            FieldSchema::named([("x", TypeRef::Int), ("y", TypeRef::Int)]),
        )
        .declare()
        .unwrap()
}

#[test]
fn every_shape_constructs_and_belongs_to_the_family() {
    let family = mixed_family();

    let a = family.construct("A", [Value::from(1)]).unwrap();
    let b = family.construct("B", [Value::from(1), Value::from(2)]).unwrap();
    let c = family.construct("C", [Value::from(1), Value::from(2)]).unwrap();

    for instance in [&a, &b, &c] {
        assert!(family.owns(instance));
        assert_eq!(instance.family_id(), family.id());
    }
}

#[test]
fn exactly_one_predicate_holds_per_instance() {
    let family = mixed_family();
    let instances = [
        family.construct("A", [Value::from(1)]).unwrap(),
        family.construct("B", [Value::from(1), Value::from(2)]).unwrap(),
        family.construct("C", [Value::from(1), Value::from(2)]).unwrap(),
    ];

    for instance in &instances {
        let holding: Vec<_> = family
            .predicates()
            .filter(|(name, _)| family.predicate(name).unwrap().test(instance))
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(
            holding.len(),
            1,
            "exactly one predicate must hold for {instance}"
        );
        assert_eq!(
            holding[0],
            format!("is_{}", instance.variant_name().to_lowercase())
        );
    }
}

#[test]
fn direct_family_instantiation_always_fails() {
    let family = mixed_family();
    assert!(family.instantiate([]).unwrap_err().is_abstract_family());
    assert!(
        family
            .instantiate([Value::from(1)])
            .unwrap_err()
            .is_abstract_family()
    );

    let empty = FamilyBuilder::new("Empty").declare().unwrap();
    assert!(empty.instantiate([]).unwrap_err().is_abstract_family());
}

#[test]
fn predicates_do_not_cross_families() {
    let first = mixed_family();
    let second = mixed_family();

    let a = first.construct("A", [Value::from(1)]).unwrap();
    assert!(first.predicate("is_a").unwrap().test(&a));
    assert!(
        !second.predicate("is_a").unwrap().test(&a),
        "a predicate of one family must not accept instances of another"
    );
}

#[test]
fn structural_equality_within_a_variant() {
    let family = mixed_family();

    let b1 = family.construct("B", [Value::from(1), Value::from(2)]).unwrap();
    let b2 = family.construct("B", [Value::from(1), Value::from(2)]).unwrap();
    let b3 = family.construct("B", [Value::from(1), Value::from(3)]).unwrap();

    assert_eq!(b1, b2);
    assert_ne!(b1, b3);
}

#[test]
fn different_variants_are_never_equal_even_with_matching_shapes() {
    let family = mixed_family();

    // B and C both hold two ints.
    let b = family.construct("B", [Value::from(1), Value::from(2)]).unwrap();
    let c = family.construct("C", [Value::from(1), Value::from(2)]).unwrap();
    assert_ne!(b, c);

    // Same shape, different family.
    let other = mixed_family();
    let b_other = other.construct("B", [Value::from(1), Value::from(2)]).unwrap();
    assert_ne!(b, b_other);
}

#[test]
fn arity_is_checked_at_construction() {
    let family = mixed_family();
    let err = family.construct("B", [Value::from(1)]).unwrap_err();
    assert!(err.is_arity_mismatch());

    let err = family.construct("Z", []).unwrap_err();
    assert!(err.is_unknown_variant());
}

#[test]
fn display_reflects_variant_name_and_declaration_order() {
    let family = mixed_family();

    let a = family.construct("A", [Value::from(1)]).unwrap();
    let b = family.construct("B", [Value::from(1), Value::from(2)]).unwrap();
    let c = family.construct("C", [Value::from(1), Value::from(2)]).unwrap();

    assert_eq!(a.to_string(), "A(1)");
    assert_eq!(b.to_string(), "B(1, 2)");
    assert_eq!(c.to_string(), "C(x: 1, y: 2)");

    // Representations are distinct per variant even for equal field values.
    assert_ne!(b.to_string(), c.to_string());
}

#[test]
fn positional_and_named_decomposition_agree() {
    let family = mixed_family();
    let c = family.construct("C", [Value::from(7), Value::from(9)]).unwrap();

    assert_eq!(c.get(0), Some(&Value::from(7)));
    assert_eq!(c.field("x"), Some(&Value::from(7)));
    assert_eq!(c.get(1), c.field("y"));
    assert_eq!(c.field("z"), None);

    let (name, values) = c.destructure();
    assert_eq!(name, "C");
    assert_eq!(values, [Value::from(7), Value::from(9)]);
}

#[test]
fn named_construction_fills_fields_in_any_order() {
    let family = mixed_family();
    let variant = family.variant("C").unwrap();

    let forward = variant
        .construct_named([("x", Value::from(1)), ("y", Value::from(2))])
        .unwrap();
    let backward = variant
        .construct_named([("y", Value::from(2)), ("x", Value::from(1))])
        .unwrap();
    assert_eq!(forward, backward);

    let err = variant
        .construct_named([("x", Value::from(1))])
        .unwrap_err();
    assert!(err.is_arity_mismatch());

    let err = variant
        .construct_named([("x", Value::from(1)), ("z", Value::from(2))])
        .unwrap_err();
    assert!(err.is_unknown_field());
}

#[test]
fn named_construction_rejects_repeated_fields() {
    let family = mixed_family();
    let variant = family.variant("C").unwrap();

    // A repeated field must fail, not win by last write.
    let err = variant
        .construct_named([
            ("x", Value::from(1)),
            ("x", Value::from(99)),
            ("y", Value::from(2)),
        ])
        .unwrap_err();
    assert!(err.is_duplicate_field_value());

    // Even when the repeat would mask a missing field.
    let err = variant
        .construct_named([("x", Value::from(1)), ("x", Value::from(99))])
        .unwrap_err();
    assert!(err.is_duplicate_field_value());
}

#[test]
fn mutation_is_allowed_by_default() {
    let family = mixed_family();
    let mut c = family.construct("C", [Value::from(1), Value::from(2)]).unwrap();

    c.set("x", Value::from(10)).unwrap();
    c.set_at(1, Value::from(20)).unwrap();
    assert_eq!(c.field("x"), Some(&Value::from(10)));
    assert_eq!(c.get(1), Some(&Value::from(20)));

    assert!(c.set("nope", Value::Unit).unwrap_err().is_unknown_field());
    assert!(
        c.set_at(5, Value::Unit)
            .unwrap_err()
            .is_index_out_of_bounds()
    );
}

#[test]
fn immutable_families_reject_reassignment() {
    let family = FamilyBuilder::new("Frozen")
        .immutable(true)
        .variant("Cell", TypeRef::Int)
        .declare()
        .unwrap();

    let mut cell = family.construct("Cell", [Value::from(1)]).unwrap();
    let err = cell.set("_1", Value::from(2)).unwrap_err();
    assert!(err.is_immutable_instance());
    let err = cell.set_at(0, Value::from(2)).unwrap_err();
    assert!(err.is_immutable_instance());

    // The original value is untouched.
    assert_eq!(cell.get(0), Some(&Value::from(1)));
}

#[test]
fn recursive_values_nest_through_self_references() {
    let tree = FamilyBuilder::new("Tree")
        .variant("Leaf", TypeRef::Int)
        .variant("Node", [TypeRef::SelfRef, TypeRef::SelfRef])
        .declare()
        .unwrap();

    let l1 = tree.construct("Leaf", [Value::from(1)]).unwrap();
    let l2 = tree.construct("Leaf", [Value::from(2)]).unwrap();
    let node = tree
        .construct("Node", [Value::from(l1.clone()), Value::from(l2)])
        .unwrap();

    assert!(tree.predicate("is_node").unwrap().test(&node));
    let left = node.get(0).and_then(|v| v.as_record()).unwrap();
    assert_eq!(*left, l1);
    assert_eq!(node.to_string(), "Node(Leaf(1), Leaf(2))");
}

#[test]
fn zero_field_instances_compare_equal() {
    let color = FamilyBuilder::new("Color")
        .variant("Red", FieldSchema::Positional(vec![]))
        .variant("Green", FieldSchema::Positional(vec![]))
        .declare()
        .unwrap();

    let r1 = color.construct("Red", []).unwrap();
    let r2 = color.construct("Red", []).unwrap();
    let g = color.construct("Green", []).unwrap();

    assert_eq!(r1, r2);
    assert_ne!(r1, g);
    assert_eq!(r1.to_string(), "Red()");
}

#[test]
fn value_kinds_classify_field_values() {
    use tyfam::ValueKind;

    let family = mixed_family();
    let a = family.construct("A", [Value::from(1)]).unwrap();

    assert_eq!(Value::from(1).kind(), ValueKind::Int);
    assert_eq!(Value::from(1.0).kind(), ValueKind::Float);
    assert_eq!(Value::from("s").kind(), ValueKind::Str);
    assert_eq!(Value::from(true).kind(), ValueKind::Bool);
    assert_eq!(Value::from(()).kind(), ValueKind::Unit);
    assert_eq!(Value::from(a.clone()).kind(), ValueKind::Record);

    assert!(Value::from(a.clone()).kind().is_record());
    assert_eq!(ValueKind::Record.to_string(), "record");
    assert_eq!(ValueKind::Int.to_string(), "int");

    assert!(Value::from(1).as_record().is_none());
    assert_eq!(Value::from(a.clone()).as_record(), Some(&a));
}

#[test]
fn exact_variant_check_via_variant_type() {
    let family = mixed_family();
    let a = family.construct("A", [Value::from(1)]).unwrap();

    assert!(a.is_variant(family.variant("A").unwrap()));
    assert!(!a.is_variant(family.variant("B").unwrap()));
}
