//! Universal and round-trip properties of the parser

use fixed_json::schema::*;
use fixed_json::{parse_object, Status};
use pretty_assertions::assert_eq;

#[test]
fn defaults_are_idempotent_on_empty_object() {
	let mut count = -1i64;
	let mut name = [1u8; 8];
	let mut entries = [
		AttributeSchema::new("count", Kind::Integer, Destination::Integer(std::slice::from_mut(&mut count)), DefaultValue::Integer(7)),
		AttributeSchema::new("name", Kind::String, Destination::String(StringBank::single(&mut name)), DefaultValue::EmptyString),
	];
	let mut schema = ObjectSchema::new(&mut entries);
	parse_object(b"{}", &mut schema).unwrap();
	assert_eq!(count, 7);
	assert_eq!(name[0], 0);
}

#[test]
fn attribute_order_does_not_affect_outcome() {
	fn run(input: &[u8]) -> (i64, bool) {
		let mut count = 0i64;
		let mut flag = false;
		let mut entries = [
			AttributeSchema::new("count", Kind::Integer, Destination::Integer(std::slice::from_mut(&mut count)), DefaultValue::Integer(0)),
			AttributeSchema::new("flag", Kind::Boolean, Destination::Boolean(std::slice::from_mut(&mut flag)), DefaultValue::Boolean(false)),
		];
		let mut schema = ObjectSchema::new(&mut entries);
		parse_object(input, &mut schema).unwrap();
		(count, flag)
	}
	assert_eq!(run(br#"{"count":5,"flag":true}"#), run(br#"{"flag":true,"count":5}"#));
}

#[test]
fn attribute_name_too_long_is_rejected() {
	let mut entries: [AttributeSchema; 0] = [];
	let mut schema = ObjectSchema::new(&mut entries);
	let long_name = "a".repeat(40);
	let input = format!(r#"{{"{long_name}":1}}"#);
	let err = parse_object(input.as_bytes(), &mut schema).unwrap_err();
	assert_eq!(err, Status::AttributeNameTooLong);
}

#[test]
fn token_too_long_is_rejected() {
	let mut value = 0i64;
	let mut entries = [AttributeSchema::new(
		"n",
		Kind::Integer,
		Destination::Integer(std::slice::from_mut(&mut value)),
		DefaultValue::Integer(0),
	)];
	let mut schema = ObjectSchema::new(&mut entries);
	let long_token = "1".repeat(600);
	let input = format!(r#"{{"n":{long_token}}}"#);
	let err = parse_object(input.as_bytes(), &mut schema).unwrap_err();
	assert_eq!(err, Status::TokenValueTooLong);
}

#[test]
fn array_element_kind_mismatch_fails() {
	let mut storage = [0i64; 2];
	let mut count = 0usize;
	let mut schema = ArraySchema::new(Kind::Integer, ArrayBank::Integer(&mut storage), &mut count, 2);
	let err = fixed_json::parse_array(br#"[1,"two"]"#, &mut schema).unwrap_err();
	assert_eq!(err, Status::BadNumber);
}

#[test]
fn end_cursor_allows_sequential_parsing() {
	let mut entries: [AttributeSchema; 0] = [];
	let mut schema = ObjectSchema::new(&mut entries);
	let input = b"{} {}";
	let first = parse_object(input, &mut schema).unwrap();
	let mut entries2: [AttributeSchema; 0] = [];
	let mut schema2 = ObjectSchema::new(&mut entries2);
	let second = parse_object(&input[first.end..], &mut schema2).unwrap();
	assert_eq!(first.end + second.end, input.len());
}

#[test]
fn enum_map_resolves_name_to_integer() {
	const MAP: &[(&str, i64)] = &[("red", 1), ("green", 2), ("blue", 3)];
	let mut color = 0i64;
	let mut entry = AttributeSchema::new(
		"color",
		Kind::Integer,
		Destination::Integer(std::slice::from_mut(&mut color)),
		DefaultValue::Integer(0),
	);
	entry.enum_map = Some(MAP);
	let mut entries = [entry];
	let mut schema = ObjectSchema::new(&mut entries);
	parse_object(br#"{"color":"green"}"#, &mut schema).unwrap();
	assert_eq!(color, 2);
}

#[test]
fn enum_map_rejects_unknown_name() {
	const MAP: &[(&str, i64)] = &[("red", 1)];
	let mut color = 0i64;
	let mut entry = AttributeSchema::new(
		"color",
		Kind::Integer,
		Destination::Integer(std::slice::from_mut(&mut color)),
		DefaultValue::Integer(0),
	);
	entry.enum_map = Some(MAP);
	let mut entries = [entry];
	let mut schema = ObjectSchema::new(&mut entries);
	let err = parse_object(br#"{"color":"purple"}"#, &mut schema).unwrap_err();
	assert_eq!(err, Status::InvalidEnumValue);
}

#[test]
fn check_literal_must_match_exactly() {
	let mut entries = [AttributeSchema::new("version", Kind::Check, Destination::CheckLiteral("1.0"), DefaultValue::None)];
	let mut schema = ObjectSchema::new(&mut entries);
	parse_object(br#"{"version":"1.0"}"#, &mut schema).unwrap();

	let mut entries2 = [AttributeSchema::new("version", Kind::Check, Destination::CheckLiteral("1.0"), DefaultValue::None)];
	let mut schema2 = ObjectSchema::new(&mut entries2);
	let err = parse_object(br#"{"version":"2.0"}"#, &mut schema2).unwrap_err();
	assert_eq!(err, Status::CheckMismatch);
}
