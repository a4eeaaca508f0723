//! The `[ ... ]` state machine
//!
//! Mirrors the object reader's "ask whether there's another element, then
//! delegate to the element converter" loop, but the array reader has no
//! attribute names to look up: element kind is fixed by the schema for the
//! whole array.

use crate::convert;
use crate::cursor::Cursor;
use crate::depth::AllowedDepth;
use crate::error::Status;
use crate::object;
use crate::resolve::{ParentCtx, StructArrayCtx};
use crate::schema::{ArrayBank, ArraySchema, Kind};

/// Parse a `[ ... ]` value into `schema`'s bank, starting at `cursor`'s
/// current position (which must be whitespace or `[`)
pub(crate) fn parse_array(cursor: &mut Cursor<'_>, schema: &mut ArraySchema<'_>, depth: AllowedDepth) -> Result<(), Status> {
	cursor.skip_ws();
	if !cursor.eat(b'[') {
		return Err(Status::MissingArrayStart);
	}
	cursor.skip_ws();
	if cursor.eat(b']') {
		*schema.count_out = 0;
		return Ok(());
	}

	let mut i = 0usize;
	loop {
		if i >= schema.max_len {
			return Err(Status::TooManyElements);
		}
		cursor.skip_ws();
		parse_element(cursor, schema, i, depth)?;
		cursor.skip_ws();
		if cursor.eat(b']') {
			*schema.count_out = i + 1;
			return Ok(());
		}
		if cursor.eat(b',') {
			i += 1;
			continue;
		}
		return Err(Status::ArrayTrailingGarbage);
	}
}

fn parse_element(cursor: &mut Cursor<'_>, schema: &mut ArraySchema<'_>, index: usize, depth: AllowedDepth) -> Result<(), Status> {
	match schema.element_kind {
		Kind::String => {
			if !cursor.eat(b'"') {
				return Err(Status::QuotingMismatch);
			}
			let ArrayBank::String(bank) = &mut schema.bank else {
				return Err(Status::ParallelStringUnsupported);
			};
			let slot = bank.slot_mut(index).ok_or(Status::NullDestination)?;
			object::copy_quoted_string(cursor, slot)?;
			Ok(())
		}
		Kind::Integer => {
			let ArrayBank::Integer(slots) = &mut schema.bank else {
				return Err(Status::ConversionError);
			};
			let rest = cursor.remaining();
			let (value, consumed) = convert::scan_integer(rest)?;
			cursor.advance(consumed);
			*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
			Ok(())
		}
		Kind::UInteger => {
			let ArrayBank::UInteger(slots) = &mut schema.bank else {
				return Err(Status::ConversionError);
			};
			let rest = cursor.remaining();
			let (value, consumed) = convert::scan_uinteger(rest)?;
			cursor.advance(consumed);
			*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
			Ok(())
		}
		Kind::Short => {
			let ArrayBank::Short(slots) = &mut schema.bank else {
				return Err(Status::ConversionError);
			};
			let rest = cursor.remaining();
			let (value, consumed) = convert::scan_integer(rest)?;
			cursor.advance(consumed);
			let value = i16::try_from(value).map_err(|_| Status::BadNumber)?;
			*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
			Ok(())
		}
		Kind::UShort => {
			let ArrayBank::UShort(slots) = &mut schema.bank else {
				return Err(Status::ConversionError);
			};
			let rest = cursor.remaining();
			let (value, consumed) = convert::scan_uinteger(rest)?;
			cursor.advance(consumed);
			let value = u16::try_from(value).map_err(|_| Status::BadNumber)?;
			*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
			Ok(())
		}
		Kind::Real => {
			let ArrayBank::Real(slots) = &mut schema.bank else {
				return Err(Status::ConversionError);
			};
			let rest = cursor.remaining();
			let (value, consumed) = convert::scan_real(rest)?;
			cursor.advance(consumed);
			*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
			Ok(())
		}
		Kind::Boolean => {
			let ArrayBank::Boolean(slots) = &mut schema.bank else {
				return Err(Status::ConversionError);
			};
			let rest = cursor.remaining();
			let (value, consumed) = convert::scan_boolean(rest)?;
			cursor.advance(consumed);
			*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
			Ok(())
		}
		Kind::Object => {
			let ArrayBank::Object(nested) = &mut schema.bank else {
				return Err(Status::ArrayElementObjectError);
			};
			let next_depth = depth.dec()?;
			// Propagate the nested parse's actual status rather than masking it:
			// a `ParallelStringUnsupported`/`UnknownAttribute`/etc. from inside an
			// element is more informative than a blanket element-object error.
			object::parse_object_with(cursor, nested, ParentCtx::ObjectArray, index, next_depth)
		}
		Kind::StructObject => {
			let ArrayBank::StructObject { base, stride, schema: nested } = &mut schema.bank else {
				return Err(Status::ArrayElementObjectError);
			};
			let ctx = StructArrayCtx { base: *base, stride: *stride };
			let next_depth = depth.dec()?;
			object::parse_object_with(cursor, nested, ParentCtx::StructArray(ctx), index, next_depth)
		}
		#[cfg(feature = "time")]
		Kind::Time => Err(Status::UnsupportedArrayElementKind),
		Kind::Character | Kind::Array | Kind::Check | Kind::Ignore => Err(Status::UnsupportedArrayElementKind),
	}
}
