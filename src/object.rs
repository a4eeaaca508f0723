//! The `{ ... }` state machine: default priming, attribute lookup, type
//! reconciliation, value conversion

use crate::array;
use crate::convert;
use crate::cursor::Cursor;
use crate::depth::AllowedDepth;
use crate::error::Status;
use crate::resolve::{self, ParentCtx, ScalarValue};
use crate::schema::{AttributeSchema, DefaultValue, Destination, Kind, ObjectSchema};

const MAX_ATTR_NAME: usize = 32;
const MAX_VALUE: usize = 513;

/// Parse a standalone top-level `{ ... }` document
pub(crate) fn parse_object(cursor: &mut Cursor<'_>, schema: &mut ObjectSchema<'_>, depth: AllowedDepth) -> Result<(), Status> {
	prime_defaults(schema, ParentCtx::None, 0)?;
	cursor.skip_ws();
	if !cursor.eat(b'{') {
		return Err(Status::ExpectedObjectStart);
	}
	run_body(cursor, schema, ParentCtx::None, 0, depth)
}

/// Parse a `{ ... }` value reached through array-element or nested-attribute
/// recursion
pub(crate) fn parse_object_with(cursor: &mut Cursor<'_>, schema: &mut ObjectSchema<'_>, parent: ParentCtx, index: usize, depth: AllowedDepth) -> Result<(), Status> {
	prime_defaults(schema, parent, index)?;
	cursor.skip_ws();
	if !cursor.eat(b'{') {
		return Err(Status::ExpectedObjectBrace);
	}
	run_body(cursor, schema, parent, index, depth)
}

fn prime_defaults(schema: &mut ObjectSchema<'_>, parent: ParentCtx, index: usize) -> Result<(), Status> {
	for entry in schema.entries.iter_mut() {
		if entry.suppress_default {
			continue;
		}
		let value = match entry.default {
			DefaultValue::Integer(v) => Some(ScalarValue::Integer(v)),
			DefaultValue::UInteger(v) => Some(ScalarValue::UInteger(v)),
			DefaultValue::Short(v) => Some(ScalarValue::Short(v)),
			DefaultValue::UShort(v) => Some(ScalarValue::UShort(v)),
			DefaultValue::Real(v) => Some(ScalarValue::Real(v)),
			#[cfg(feature = "time")]
			DefaultValue::Time(v) => Some(ScalarValue::Time(v)),
			DefaultValue::Boolean(v) => Some(ScalarValue::Boolean(v)),
			DefaultValue::Character(v) => Some(ScalarValue::Character(v)),
			DefaultValue::EmptyString => {
				resolve::write_string(&mut entry.destination, parent, index, b"")?;
				None
			}
			DefaultValue::None => None,
		};
		if let Some(value) = value {
			resolve::write_scalar(&mut entry.destination, parent, index, value)?;
		}
	}
	Ok(())
}

fn run_body(cursor: &mut Cursor<'_>, schema: &mut ObjectSchema<'_>, parent: ParentCtx, index: usize, depth: AllowedDepth) -> Result<(), Status> {
	loop {
		cursor.skip_ws();
		if cursor.eat(b'}') {
			return Ok(());
		}
		if !cursor.eat(b'"') {
			return Err(Status::ExpectedAttrStart);
		}
		let name_buf = read_bounded_quoted(cursor, MAX_ATTR_NAME, Status::AttributeNameTooLong)?;
		let name = std::str::from_utf8(name_buf.as_slice()).map_err(|_| Status::UnknownAttribute)?;
		let base_index = match schema.entries.iter().position(|e| e.name == name) {
			Some(i) => i,
			None => {
				#[cfg(feature = "debug")]
				crate::debug::trace(crate::debug::Severity::Warn, name);
				return Err(Status::UnknownAttribute);
			}
		};

		cursor.skip_ws();
		if !cursor.eat(b':') {
			return Err(Status::TrailingGarbage);
		}
		cursor.skip_ws();

		parse_value(cursor, schema, base_index, parent, index, depth)?;

		cursor.skip_ws();
		if cursor.eat(b'}') {
			return Ok(());
		}
		if cursor.eat(b',') {
			continue;
		}
		return Err(Status::TrailingGarbage);
	}
}

fn parse_value(cursor: &mut Cursor<'_>, schema: &mut ObjectSchema<'_>, base_index: usize, parent: ParentCtx, index: usize, depth: AllowedDepth) -> Result<(), Status> {
	// `structobject` is only meaningful as a struct-array element; reached
	// standalone (or as a plain object-array element, which always carries
	// `Kind::Object` instead) it is schema misuse, not a value to scan.
	if schema.entries[base_index].kind == Kind::StructObject {
		return Err(Status::ArrayElementObjectError);
	}
	match cursor.peek() {
		Some(b'[') => {
			if schema.entries[base_index].kind != Kind::Array {
				return Err(Status::UnexpectedArrayStart);
			}
			let entry = &mut schema.entries[base_index];
			let Destination::Array(arr) = &mut entry.destination else {
				return Err(Status::UnexpectedArrayStart);
			};
			let next_depth = depth.dec()?;
			array::parse_array(cursor, arr, next_depth)
		}
		Some(b'{') if schema.entries[base_index].kind == Kind::Object => {
			let next_depth = depth.dec()?;
			let entry = &mut schema.entries[base_index];
			let Destination::Nested(nested) = &mut entry.destination else {
				return Err(Status::ExpectedObjectBrace);
			};
			parse_object_with(cursor, nested, ParentCtx::None, 0, next_depth)
		}
		Some(b'"') => {
			cursor.bump();
			let value_buf = read_bounded_quoted(cursor, MAX_VALUE, Status::StringValueTooLong)?;
			commit_value(schema, base_index, parent, index, value_buf.as_slice(), true)
		}
		_ => {
			if schema.entries[base_index].kind == Kind::Array {
				return Err(Status::ExpectedArrayStart);
			}
			let value_buf = read_bounded_token(cursor)?;
			commit_value(schema, base_index, parent, index, value_buf.as_slice(), false)
		}
	}
}

/// A fixed-capacity byte buffer living on the stack
///
/// Attribute names and values are bounded (§5: ≤ 32 and ≤ 513 bytes), so one
/// array-backed buffer covers both cases without touching the heap.
struct ScratchBuf {
	data: [u8; MAX_VALUE],
	len: usize,
}

impl ScratchBuf {
	fn new() -> Self {
		Self { data: [0; MAX_VALUE], len: 0 }
	}

	fn push(&mut self, cap: usize, b: u8, overrun: Status) -> Result<(), Status> {
		if self.len >= cap {
			return Err(overrun);
		}
		self.data[self.len] = b;
		self.len += 1;
		Ok(())
	}

	fn as_slice(&self) -> &[u8] {
		&self.data[..self.len]
	}
}

/// Read bytes up to and including a closing (unescaped) `"`, decoding escape
/// sequences, into a stack buffer of capacity `cap`. Returns the decoded
/// bytes without the closing quote.
fn read_bounded_quoted(cursor: &mut Cursor<'_>, cap: usize, overrun: Status) -> Result<ScratchBuf, Status> {
	let mut out = ScratchBuf::new();
	loop {
		let b = cursor.bump().ok_or(overrun)?;
		match b {
			b'"' => return Ok(out),
			b'\\' => {
				let esc = cursor.bump().ok_or(overrun)?;
				let decoded = match esc {
					b'b' => 0x08,
					b'f' => 0x0c,
					b'n' => b'\n',
					b'r' => b'\r',
					b't' => b'\t',
					b'u' => {
						let mut code: u32 = 0;
						for _ in 0..4 {
							let h = cursor.bump().ok_or(overrun)?;
							code = code * 16 + hex_digit(h).ok_or(Status::StringParseError)?;
						}
						(code & 0xff) as u8
					}
					other => other,
				};
				out.push(cap, decoded, overrun)?;
			}
			other => out.push(cap, other, overrun)?,
		}
	}
}

fn hex_digit(b: u8) -> Option<u32> {
	match b {
		b'0'..=b'9' => Some((b - b'0') as u32),
		b'a'..=b'f' => Some((b - b'a' + 10) as u32),
		b'A'..=b'F' => Some((b - b'A' + 10) as u32),
		_ => None,
	}
}

/// Read bytes up to (not including) whitespace, `,`, or `}`; the delimiter
/// is left unconsumed.
fn read_bounded_token(cursor: &mut Cursor<'_>) -> Result<ScratchBuf, Status> {
	let mut out = ScratchBuf::new();
	loop {
		match cursor.peek() {
			None | Some(b' ' | b'\t' | b'\n' | b'\r' | b',' | b'}') => return Ok(out),
			Some(b) => {
				out.push(MAX_VALUE, b, Status::TokenValueTooLong)?;
				cursor.bump();
			}
		}
	}
}

/// A scanned unquoted token starts with a digit, with an optional leading
/// sign — the shape §4.4 requires before a numeric kind is considered
/// compatible (so `true`/`false` never reconciles against a numeric entry).
fn looks_numeric(value: &[u8]) -> bool {
	let value = match value.first() {
		Some(b'+' | b'-') => &value[1..],
		_ => value,
	};
	matches!(value.first(), Some(b'0'..=b'9'))
}

fn reconcile(entries: &[AttributeSchema<'_>], base_index: usize, quoted: bool, value: &[u8]) -> usize {
	let name = entries[base_index].name;
	let looks_real = value.contains(&b'.');
	let numeric = looks_numeric(value);
	for (offset, entry) in entries[base_index..].iter().enumerate() {
		if entry.name != name {
			break;
		}
		let compatible = match entry.kind {
			Kind::String => quoted,
			#[cfg(feature = "time")]
			Kind::Time => quoted,
			Kind::Boolean => !quoted && (value == b"true" || value == b"false"),
			Kind::Real => !quoted && numeric && looks_real,
			Kind::Integer | Kind::UInteger | Kind::Short | Kind::UShort => !quoted && numeric && !looks_real,
			_ => false,
		};
		if compatible {
			return base_index + offset;
		}
	}
	base_index
}

fn commit_value(schema: &mut ObjectSchema<'_>, base_index: usize, parent: ParentCtx, index: usize, value: &[u8], quoted: bool) -> Result<(), Status> {
	let entry_index = reconcile(schema.entries, base_index, quoted, value);
	let entry = &mut schema.entries[entry_index];

	let quotable = matches!(entry.kind, Kind::String | Kind::Character | Kind::Check | Kind::Ignore)
		|| entry.enum_map.is_some()
		|| entry.kind.kind_is_time();
	let requires_quote = matches!(entry.kind, Kind::String | Kind::Check) || entry.enum_map.is_some() || entry.kind.kind_is_time();

	if quoted && !quotable {
		return Err(Status::QuotingMismatch);
	}
	if !quoted && requires_quote {
		return Err(Status::QuotingMismatch);
	}

	if let Some(map) = entry.enum_map {
		let name = std::str::from_utf8(value).map_err(|_| Status::InvalidEnumValue)?;
		let mapped = map
			.iter()
			.find(|(n, _)| *n == name)
			.map(|(_, v)| *v)
			.ok_or(Status::InvalidEnumValue)?;
		return resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Integer(mapped));
	}

	match entry.kind {
		Kind::Integer => {
			let (v, consumed) = convert::scan_integer(value)?;
			if consumed != value.len() {
				return Err(Status::BadNumber);
			}
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Integer(v))
		}
		Kind::UInteger => {
			let (v, consumed) = convert::scan_uinteger(value)?;
			if consumed != value.len() {
				return Err(Status::BadNumber);
			}
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::UInteger(v))
		}
		Kind::Short => {
			let (v, consumed) = convert::scan_integer(value)?;
			if consumed != value.len() {
				return Err(Status::BadNumber);
			}
			let v = i16::try_from(v).map_err(|_| Status::BadNumber)?;
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Short(v))
		}
		Kind::UShort => {
			let (v, consumed) = convert::scan_uinteger(value)?;
			if consumed != value.len() {
				return Err(Status::BadNumber);
			}
			let v = u16::try_from(v).map_err(|_| Status::BadNumber)?;
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::UShort(v))
		}
		Kind::Real => {
			let (v, consumed) = convert::scan_real(value)?;
			if consumed != value.len() {
				return Err(Status::BadNumber);
			}
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Real(v))
		}
		Kind::Boolean => {
			let (v, consumed) = convert::scan_boolean(value)?;
			if consumed != value.len() {
				return Err(Status::ConversionError);
			}
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Boolean(v))
		}
		Kind::Character => {
			if value.len() != 1 {
				return Err(Status::StringValueTooLong);
			}
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Character(value[0]))
		}
		#[cfg(feature = "time")]
		Kind::Time => {
			let s = std::str::from_utf8(value).map_err(|_| Status::ConversionError)?;
			let seconds = convert::parse_iso8601(s)?;
			resolve::write_scalar(&mut entry.destination, parent, index, ScalarValue::Time(seconds))
		}
		Kind::Check => {
			let Destination::CheckLiteral(literal) = entry.destination else {
				return Err(Status::CheckMismatch);
			};
			if literal.as_bytes() != value {
				return Err(Status::CheckMismatch);
			}
			Ok(())
		}
		Kind::String => resolve::write_string(&mut entry.destination, parent, index, value),
		Kind::Ignore => Ok(()),
		Kind::Object | Kind::StructObject | Kind::Array => Err(Status::ConversionError),
	}
}

impl Kind {
	fn kind_is_time(&self) -> bool {
		#[cfg(feature = "time")]
		{
			matches!(self, Kind::Time)
		}
		#[cfg(not(feature = "time"))]
		{
			false
		}
	}
}

pub(crate) fn copy_quoted_string(cursor: &mut Cursor<'_>, slot: &mut [u8]) -> Result<(), Status> {
	let value = read_bounded_quoted(cursor, slot.len().saturating_sub(1), Status::StringValueTooLong)?;
	let value = value.as_slice();
	slot[..value.len()].copy_from_slice(value);
	slot[value.len()] = 0;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{AttributeSchema, DefaultValue, Destination};

	#[test]
	fn parses_flat_object() {
		let mut name_buf = [0u8; 16];
		let mut age = 0i64;
		let mut entries = [
			AttributeSchema::new("name", Kind::String, Destination::String(crate::schema::StringBank::single(&mut name_buf)), DefaultValue::EmptyString),
			AttributeSchema::new("age", Kind::Integer, Destination::Integer(std::slice::from_mut(&mut age)), DefaultValue::Integer(0)),
		];
		let mut schema = ObjectSchema::new(&mut entries);
		let mut cursor = Cursor::new(br#"{"name": "Ada", "age": 36}"#);
		parse_object(&mut cursor, &mut schema, AllowedDepth::new(8)).unwrap();
		assert_eq!(age, 36);
		assert_eq!(&name_buf[..3], b"Ada");
		assert_eq!(name_buf[3], 0);
	}

	#[test]
	fn unknown_attribute_fails() {
		let mut entries: [AttributeSchema; 0] = [];
		let mut schema = ObjectSchema::new(&mut entries);
		let mut cursor = Cursor::new(br#"{"x": 1}"#);
		assert_eq!(parse_object(&mut cursor, &mut schema, AllowedDepth::new(8)), Err(Status::UnknownAttribute));
	}

	#[test]
	fn missing_brace_fails() {
		let mut entries: [AttributeSchema; 0] = [];
		let mut schema = ObjectSchema::new(&mut entries);
		let mut cursor = Cursor::new(b"nope");
		assert_eq!(parse_object(&mut cursor, &mut schema, AllowedDepth::new(8)), Err(Status::ExpectedObjectStart));
	}

	#[test]
	fn default_applied_when_absent() {
		let mut age = -1i64;
		let mut entries = [AttributeSchema::new(
			"age",
			Kind::Integer,
			Destination::Integer(std::slice::from_mut(&mut age)),
			DefaultValue::Integer(99),
		)];
		let mut schema = ObjectSchema::new(&mut entries);
		let mut cursor = Cursor::new(b"{}");
		parse_object(&mut cursor, &mut schema, AllowedDepth::new(8)).unwrap();
		assert_eq!(age, 99);
	}

	#[test]
	fn standalone_structobject_attribute_is_schema_misuse() {
		let mut entries = [AttributeSchema::new(
			"row",
			Kind::StructObject,
			Destination::None,
			DefaultValue::None,
		)];
		let mut schema = ObjectSchema::new(&mut entries);
		let mut cursor = Cursor::new(br#"{"row":{"a":1}}"#);
		assert_eq!(parse_object(&mut cursor, &mut schema, AllowedDepth::new(8)), Err(Status::ArrayElementObjectError));
	}

	#[test]
	fn reconciliation_skips_numeric_entry_for_boolean_lexeme() {
		let mut x_int = -1i64;
		let mut x_flag = false;
		let mut entries = [
			AttributeSchema::new("x", Kind::Integer, Destination::Integer(std::slice::from_mut(&mut x_int)), DefaultValue::Integer(0)),
			AttributeSchema::new("x", Kind::Boolean, Destination::Boolean(std::slice::from_mut(&mut x_flag)), DefaultValue::Boolean(false)),
		];
		let mut schema = ObjectSchema::new(&mut entries);
		let mut cursor = Cursor::new(br#"{"x":true}"#);
		parse_object(&mut cursor, &mut schema, AllowedDepth::new(8)).unwrap();
		assert!(x_flag);
		assert_eq!(x_int, 0);
	}
}
