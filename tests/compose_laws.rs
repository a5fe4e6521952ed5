//! Property-based tests for optic composition.
//!
//! Composition must satisfy:
//!
//! - **Associativity**: `compose(compose(a, b), c) == compose(a, compose(b, c))`
//! - **Identity**: `compose(identity, o) == o == compose(o, identity)`
//!
//! Both laws are checked structurally and by the results of evaluating the
//! optics against arbitrary values.

use optica::optics::{Optic, Predicate, Style, compose, compose_all};
use optica::value::{Record, Value, ValueKind};
use proptest::prelude::*;
use rstest::rstest;

// =============================================================================
// Strategies
// =============================================================================

fn primitive_pool() -> Vec<Optic> {
    vec![
        Optic::identity(),
        Optic::field("a"),
        Optic::field("b"),
        Optic::index(0),
        Optic::last(),
        Optic::elements(),
        Optic::properties(),
        Optic::when(Predicate::is_kind(ValueKind::Int)),
        Optic::filter(Predicate::is_kind(ValueKind::Record)),
    ]
}

fn primitive() -> impl Strategy<Value = Optic> {
    prop::sample::select(primitive_pool())
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-100_i64..100).prop_map(Value::Int),
        "[a-z]{0,4}".prop_map(|text: String| Value::from(text)),
    ]
}

/// Values shaped so that the pool's optics have something to focus.
fn shaped_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(|items| Value::seq(items)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| {
                Value::from(Record::builder("Node").field("a", a).field("b", b).build())
            }),
            prop::collection::btree_map("[ab]", inner, 1..3).prop_map(|entries| Value::map(entries)),
        ]
    })
}

fn bump(value: Value) -> Value {
    match value {
        Value::Int(int) => Value::Int(int.wrapping_add(1)),
        other => Value::tuple([other]),
    }
}

// =============================================================================
// Associativity
// =============================================================================

proptest! {
    #[test]
    fn prop_compose_is_associative_structurally(
        a in primitive(),
        b in primitive(),
        c in primitive()
    ) {
        let left = compose(compose(a.clone(), b.clone()), c.clone());
        let right = compose(a, compose(b, c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_compose_is_associative_observably(
        a in primitive(),
        b in primitive(),
        c in primitive(),
        source in shaped_value()
    ) {
        let left = compose(compose(a.clone(), b.clone()), c.clone());
        let right = compose(a, compose(b, c));
        prop_assert_eq!(left.get_all(&source), right.get_all(&source));
        prop_assert_eq!(left.modify(source.clone(), bump), right.modify(source, bump));
    }

    #[test]
    fn prop_compose_all_matches_pairwise_composition(
        optics in prop::collection::vec(primitive(), 0..6)
    ) {
        let pairwise = optics
            .iter()
            .cloned()
            .fold(Optic::identity(), compose);
        prop_assert_eq!(compose_all(optics), pairwise);
    }
}

// =============================================================================
// Identity
// =============================================================================

proptest! {
    #[test]
    fn prop_identity_is_neutral(optic in primitive(), source in shaped_value()) {
        let before = compose(Optic::identity(), optic.clone());
        let after = compose(optic.clone(), Optic::identity());
        prop_assert_eq!(&before, &optic);
        prop_assert_eq!(&after, &optic);
        prop_assert_eq!(before.get_all(&source), optic.get_all(&source));
    }
}

// =============================================================================
// Style Resolution
// =============================================================================

proptest! {
    #[test]
    fn prop_composed_style_is_focused_only_when_every_part_is(
        optics in prop::collection::vec(primitive(), 1..6)
    ) {
        let all_focused = optics.iter().all(|optic| optic.style() == Style::Focused);
        let composed = compose_all(optics);
        prop_assert_eq!(composed.style() == Style::Focused, all_focused);
    }
}

#[rstest]
#[case(Optic::field("a"), Optic::index(0), Style::Focused)]
#[case(Optic::field("a"), Optic::elements(), Style::Traversal)]
#[case(Optic::elements(), Optic::field("a"), Style::Traversal)]
#[case(Optic::identity(), Optic::last(), Style::Focused)]
fn test_composed_style(#[case] outer: Optic, #[case] inner: Optic, #[case] expected: Style) {
    assert_eq!(outer.then(inner).style(), expected);
}

#[rstest]
fn test_path_rendering_is_independent_of_nesting() {
    let left = Optic::field("atoms")
        .then(Optic::elements())
        .then(Optic::field("pos").then(Optic::field("x")));
    let right = Optic::field("atoms").then(
        Optic::elements()
            .then(Optic::field("pos"))
            .then(Optic::field("x")),
    );
    assert_eq!(left.to_string(), "_.atoms |> Elements() |> _.pos.x");
    assert_eq!(left.to_string(), right.to_string());
}
