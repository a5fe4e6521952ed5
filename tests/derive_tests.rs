//! Integration tests for `#[derive(Record)]`.

#![cfg(feature = "derive")]
#![forbid(unsafe_code)]

use optica::optics::Optic;
use optica::value::ValueKind;
use optica::{FromValue, OpticError, Record, Value};
use rstest::rstest;

// =============================================================================
// Test Data
// =============================================================================

#[derive(Clone, Debug, PartialEq, Record)]
struct Position {
    x: i64,
    y: i64,
}

#[derive(Clone, Debug, PartialEq, Record)]
struct Atom {
    element: String,
    pos: Position,
}

#[derive(Clone, Debug, PartialEq, Record)]
struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    charge: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Record)]
struct Pair(i64, String);

#[derive(Clone, Debug, PartialEq, Record)]
struct Tagged<T> {
    tag: String,
    value: T,
}

#[derive(Clone, Debug, PartialEq, Record)]
struct Keyword {
    r#type: String,
}

fn water() -> Molecule {
    let atom = |element: &str, x, y| Atom {
        element: element.to_string(),
        pos: Position { x, y },
    };
    Molecule {
        name: "water".to_string(),
        atoms: vec![atom("H", 0, 1), atom("O", 0, 0), atom("H", 1, 0)],
        charge: None,
    }
}

// =============================================================================
// Conversion
// =============================================================================

#[rstest]
fn test_named_struct_becomes_record() {
    let value = Value::from(Position { x: 3, y: 4 });
    let record = value.as_record().unwrap();
    assert_eq!(record.name(), "Position");
    assert_eq!(record.field_names().collect::<Vec<_>>(), ["x", "y"]);
    assert_eq!(record.field("y"), Some(&Value::Int(4)));
}

#[rstest]
fn test_nested_struct_round_trips() {
    let value = Value::from(water());
    assert_eq!(Molecule::from_value(value), Ok(water()));
}

#[rstest]
fn test_tuple_struct_becomes_tuple() {
    let value = Value::from(Pair(1, "one".to_string()));
    assert_eq!(value, Value::tuple([Value::Int(1), Value::from("one")]));
    assert_eq!(Pair::from_value(value), Ok(Pair(1, "one".to_string())));
}

#[rstest]
fn test_generic_struct_round_trips() {
    let tagged = Tagged {
        tag: "origin".to_string(),
        value: Position { x: 0, y: 0 },
    };
    let value = Value::from(tagged.clone());
    assert_eq!(Tagged::<Position>::from_value(value), Ok(tagged));
}

#[rstest]
fn test_raw_identifiers_are_unescaped() {
    let value = Value::from(Keyword {
        r#type: "fn".to_string(),
    });
    assert_eq!(Optic::field("type").get(&value), Ok(Value::from("fn")));
}

#[rstest]
fn test_conversion_reports_wrong_kind() {
    assert_eq!(
        Position::from_value(Value::Int(1)),
        Err(OpticError::Conversion {
            target: "Position",
            found: ValueKind::Int,
        })
    );
    assert_eq!(
        Pair::from_value(Value::tuple([1])),
        Err(OpticError::Conversion {
            target: "Pair",
            found: ValueKind::Tuple,
        })
    );
}

#[rstest]
fn test_conversion_reports_missing_field() {
    let value = Value::from(optica::value::Record::builder("Position").field("x", 1).build());
    assert_eq!(
        Position::from_value(value),
        Err(OpticError::missing_field("y", "Position"))
    );
}

// =============================================================================
// Optics over Derived Values
// =============================================================================

#[rstest]
fn test_modify_derived_molecule() {
    let xs = Optic::field("atoms")
        .then(Optic::elements())
        .then(Optic::field("pos"))
        .then(Optic::field("x"));
    let shifted = xs
        .modify(Value::from(water()), |x| Value::Int(x.as_int().unwrap_or_default() + 1))
        .unwrap();

    let molecule = Molecule::from_value(shifted).unwrap();
    let positions: Vec<_> = molecule.atoms.iter().map(|atom| atom.pos.clone()).collect();
    assert_eq!(
        positions,
        [(1, 1), (1, 0), (2, 0)].map(|(x, y)| Position { x, y }).to_vec()
    );
    assert_eq!(molecule.name, "water");
}

#[rstest]
fn test_optional_field_is_null_until_set() {
    let charge = Optic::field("charge");
    let value = Value::from(water());
    assert_eq!(charge.get(&value), Ok(Value::Null));

    let charged = charge.set(value, Value::Int(-1)).unwrap();
    assert_eq!(Molecule::from_value(charged).unwrap().charge, Some(-1));
}
