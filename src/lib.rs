//! Template-driven, allocation-free JSON parsing
//!
//! The caller describes the exact shape of the document it expects — which
//! attributes exist, what kind each one is, and where its value should be
//! written — as an [`ObjectSchema`] or [`ArraySchema`] built directly out of
//! references to caller-owned storage. [`parse_object`]/[`parse_array`] then
//! scan the input once, writing straight into that storage; there is no
//! intermediate tree, no heap allocation, and no generic deserialization
//! target type to infer a shape from.
//!
//! ```
//! use fixed_json::{parse_object, schema::*};
//!
//! let mut name = [0u8; 16];
//! let mut age = 0i64;
//! let mut entries = [
//!     AttributeSchema::new(
//!         "name",
//!         Kind::String,
//!         Destination::String(StringBank::single(&mut name)),
//!         DefaultValue::EmptyString,
//!     ),
//!     AttributeSchema::new(
//!         "age",
//!         Kind::Integer,
//!         Destination::Integer(std::slice::from_mut(&mut age)),
//!         DefaultValue::Integer(0),
//!     ),
//! ];
//! let mut schema = ObjectSchema::new(&mut entries);
//! fixed_json::parse_object(br#"{"name": "Ada", "age": 36}"#, &mut schema).unwrap();
//! assert_eq!(age, 36);
//! ```

mod array;
mod convert;
mod cursor;
mod depth;
pub mod schema;

pub mod config;
#[cfg(feature = "debug")]
pub mod debug;
pub mod error;
mod object;
mod resolve;

use cursor::Cursor;
use depth::AllowedDepth;

pub use config::ParserConfig;
pub use error::Status;
pub use schema::{ArraySchema, ObjectSchema};

/// The end-cursor of a successful parse
///
/// Exposes the byte offset just past the consumed document (after trailing
/// whitespace), so a caller can parse a sequence of adjacent top-level
/// documents out of one buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parsed {
	pub end: usize,
}

/// Parse a `{ ... }` document from `input` into the destinations described
/// by `schema`, using the default [`ParserConfig`]
pub fn parse_object(input: &[u8], schema: &mut ObjectSchema<'_>) -> Result<Parsed, Status> {
	parse_object_with_config(input, schema, &ParserConfig::default())
}

/// Like [`parse_object`], with an explicit [`ParserConfig`]
pub fn parse_object_with_config(input: &[u8], schema: &mut ObjectSchema<'_>, config: &ParserConfig) -> Result<Parsed, Status> {
	let mut cursor = Cursor::new(input);
	object::parse_object(&mut cursor, schema, AllowedDepth::new(config.max_depth))?;
	cursor.skip_ws();
	Ok(Parsed { end: cursor.pos() })
}

/// Parse a `[ ... ]` document from `input` into the destinations described
/// by `schema`, using the default [`ParserConfig`]
pub fn parse_array(input: &[u8], schema: &mut ArraySchema<'_>) -> Result<Parsed, Status> {
	parse_array_with_config(input, schema, &ParserConfig::default())
}

/// Like [`parse_array`], with an explicit [`ParserConfig`]
pub fn parse_array_with_config(input: &[u8], schema: &mut ArraySchema<'_>, config: &ParserConfig) -> Result<Parsed, Status> {
	let mut cursor = Cursor::new(input);
	array::parse_array(&mut cursor, schema, AllowedDepth::new(config.max_depth))?;
	cursor.skip_ws();
	Ok(Parsed { end: cursor.pos() })
}
