//! Property-based tests for the optic laws.
//!
//! Single-focus optics must satisfy:
//!
//! - **GetPut Law**: `optic.set(source, optic.get(&source)) == source`
//! - **PutGet Law**: `optic.get(&optic.set(source, value)) == value`
//! - **PutPut Law**: `optic.set(optic.set(source, v1), v2) == optic.set(source, v2)`
//!
//! Traversals must satisfy identity and composition of mapped functions,
//! and `set_all` must invert `get_all`.

use optica::optics::{Optic, Predicate};
use optica::value::{Record, Value};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6..1.0e6_f64).prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(|text: String| Value::from(text)),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|items| Value::seq(items)),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|items| Value::tuple(items)),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|entries| Value::map(entries)),
        ]
    })
}

fn point() -> impl Strategy<Value = Value> {
    (value(), value()).prop_map(|(x, y)| {
        Value::from(Record::builder("Point").field("x", x).field("y", y).build())
    })
}

/// A non-empty sequence and a valid position in it.
fn sequence_with_position() -> impl Strategy<Value = (Value, usize)> {
    prop::collection::vec(value(), 1..6).prop_flat_map(|items| {
        let len = items.len();
        (Just(Value::seq(items)), 0..len)
    })
}

/// A record holding a sequence, and a valid position in that sequence.
fn bag_with_position() -> impl Strategy<Value = (Value, usize)> {
    sequence_with_position().prop_map(|(items, position)| {
        let bag = Record::builder("Bag").field("items", items).build();
        (Value::from(bag), position)
    })
}

// =============================================================================
// Lens Laws for Field
// =============================================================================

proptest! {
    /// GetPut Law for Field
    #[test]
    fn prop_field_get_put_law(source in point()) {
        let x = Optic::field("x");
        let current = x.get(&source).unwrap();
        prop_assert_eq!(x.set(source.clone(), current).unwrap(), source);
    }

    /// PutGet Law for Field
    #[test]
    fn prop_field_put_get_law(source in point(), value in value()) {
        let y = Optic::field("y");
        let updated = y.set(source, value.clone()).unwrap();
        prop_assert_eq!(y.get(&updated).unwrap(), value);
    }

    /// PutPut Law for Field
    #[test]
    fn prop_field_put_put_law(source in point(), value1 in value(), value2 in value()) {
        let x = Optic::field("x");
        let left = x.set(x.set(source.clone(), value1).unwrap(), value2.clone()).unwrap();
        let right = x.set(source, value2).unwrap();
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Lens Laws for Index
// =============================================================================

proptest! {
    /// GetPut Law for Index
    #[test]
    fn prop_index_get_put_law((source, position) in sequence_with_position()) {
        let index = Optic::index(position);
        let current = index.get(&source).unwrap();
        prop_assert_eq!(index.set(source.clone(), current).unwrap(), source);
    }

    /// PutGet Law for Index
    #[test]
    fn prop_index_put_get_law((source, position) in sequence_with_position(), value in value()) {
        let index = Optic::index(position);
        let updated = index.set(source, value.clone()).unwrap();
        prop_assert_eq!(index.get(&updated).unwrap(), value);
    }

    /// PutPut Law for Index
    #[test]
    fn prop_index_put_put_law(
        (source, position) in sequence_with_position(),
        value1 in value(),
        value2 in value()
    ) {
        let index = Optic::index(position);
        let left = index.set(index.set(source.clone(), value1).unwrap(), value2.clone()).unwrap();
        let right = index.set(source, value2).unwrap();
        prop_assert_eq!(left, right);
    }

    /// PutGet Law for the final element
    #[test]
    fn prop_last_put_get_law((source, _) in sequence_with_position(), value in value()) {
        let last = Optic::last();
        let updated = last.set(source, value.clone()).unwrap();
        prop_assert_eq!(last.get(&updated).unwrap(), value);
    }
}

// =============================================================================
// Lens Laws for Composed Focused Optics
// =============================================================================

proptest! {
    /// GetPut Law for Field ∘ Index
    #[test]
    fn prop_composed_get_put_law((source, position) in bag_with_position()) {
        let path = Optic::field("items").then(Optic::index(position));
        let current = path.get(&source).unwrap();
        prop_assert_eq!(path.set(source.clone(), current).unwrap(), source);
    }

    /// PutGet Law for Field ∘ Index
    #[test]
    fn prop_composed_put_get_law((source, position) in bag_with_position(), value in value()) {
        let path = Optic::field("items").then(Optic::index(position));
        let updated = path.set(source, value.clone()).unwrap();
        prop_assert_eq!(path.get(&updated).unwrap(), value);
    }

    /// PutPut Law for Field ∘ Index
    #[test]
    fn prop_composed_put_put_law(
        (source, position) in bag_with_position(),
        value1 in value(),
        value2 in value()
    ) {
        let path = Optic::field("items").then(Optic::index(position));
        let left = path.set(path.set(source.clone(), value1).unwrap(), value2.clone()).unwrap();
        let right = path.set(source, value2).unwrap();
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Traversal Laws
// =============================================================================

fn wrap_in_tuple(value: Value) -> Value {
    Value::tuple([value])
}

fn wrap_in_seq(value: Value) -> Value {
    Value::seq([value])
}

fn nested_collections() -> Optic {
    Optic::recursive(Predicate::new(Value::is_composite), Optic::elements())
}

proptest! {
    /// Identity Law: mapping every focus through the identity changes nothing
    #[test]
    fn prop_elements_identity_law(items in prop::collection::vec(value(), 0..6)) {
        let source = Value::seq(items);
        prop_assert_eq!(Optic::elements().modify(source.clone(), |focus| focus).unwrap(), source);
    }

    /// Composition Law: two traversals equal one traversal of the composed function
    #[test]
    fn prop_elements_composition_law(items in prop::collection::vec(value(), 0..6)) {
        let source = Value::seq(items);
        let elements = Optic::elements();
        let twice = elements
            .modify(elements.modify(source.clone(), wrap_in_tuple).unwrap(), wrap_in_seq)
            .unwrap();
        let once = elements
            .modify(source, |focus| wrap_in_seq(wrap_in_tuple(focus)))
            .unwrap();
        prop_assert_eq!(twice, once);
    }

    /// Identity Law for recursive descent
    #[test]
    fn prop_recursive_identity_law(items in prop::collection::vec(value(), 0..6)) {
        let source = Value::seq(items);
        prop_assert_eq!(nested_collections().modify(source.clone(), |focus| focus).unwrap(), source);
    }

    /// set_all inverts get_all, and the arity equals the focus count
    #[test]
    fn prop_set_all_get_all_duality(items in prop::collection::vec(value(), 0..6)) {
        let source = Value::seq(items);
        let optic = nested_collections();
        let foci = optic.get_all(&source).unwrap();
        prop_assert_eq!(foci.len(), optic.count(&source).unwrap());
        prop_assert_eq!(optic.set_all(source.clone(), foci).unwrap(), source);
    }

    /// A focused optic viewed as a traversal has exactly one focus
    #[test]
    fn prop_focused_get_all_is_singleton(source in point()) {
        let x = Optic::field("x");
        prop_assert_eq!(x.get_all(&source).unwrap(), vec![x.get(&source).unwrap()]);
    }
}
