//! Maps a schema entry, together with its enclosing array context (if any)
//! and element index, to an actual write
//!
//! This is the one module in the crate that touches raw pointers: a
//! struct-array destination is declared by the caller as a byte offset
//! within an opaque, caller-owned struct, and there is no generic Rust type
//! through which that offset could be expressed safely.

use crate::error::Status;
use crate::schema::{Destination, StringBank};

/// A scalar value ready to be committed to a destination
#[derive(Clone, Copy)]
pub(crate) enum ScalarValue {
	Integer(i64),
	UInteger(u64),
	Short(i16),
	UShort(u16),
	Real(f64),
	#[cfg(feature = "time")]
	Time(f64),
	Boolean(bool),
	Character(u8),
}

/// Base pointer and per-element stride of an enclosing struct-array
///
/// Only meaningful while writing an element of a
/// [`crate::schema::ArrayBank::StructObject`] bank.
#[derive(Clone, Copy)]
pub(crate) struct StructArrayCtx {
	pub(crate) base: *mut u8,
	pub(crate) stride: usize,
}

/// The enclosing array context a schema entry is being resolved under, if any
///
/// Distinguishing `ObjectArray` from `None` is what lets the resolver tell
/// "this is an object-array element" apart from "this is a standalone
/// object" — both reach the object reader with no struct-array base/stride,
/// but only the former is subject to the parallel-string restriction (§3.4).
#[derive(Clone, Copy)]
pub(crate) enum ParentCtx {
	/// Not reached through any array recursion (top-level document, or a
	/// plain nested-object attribute)
	None,
	/// Reached through an [`crate::schema::ArrayBank::Object`] element: each
	/// field stores into its own parallel array, so a string field is only
	/// valid at index 0
	ObjectArray,
	/// Reached through an [`crate::schema::ArrayBank::StructObject`] element
	StructArray(StructArrayCtx),
}

/// Write `value` to the scalar destination described by `destination`
///
/// `index` selects the element within a parallel-array destination, or is
/// ignored (must be 0) for a standalone scalar. `parent`, when a
/// [`ParentCtx::StructArray`], redirects an `Offset` destination to the
/// corresponding byte offset of element `index` of the enclosing struct-array.
pub(crate) fn write_scalar(destination: &mut Destination<'_>, parent: ParentCtx, index: usize, value: ScalarValue) -> Result<(), Status> {
	if let Destination::Offset(offset) = *destination {
		let ParentCtx::StructArray(ctx) = parent else {
			return Err(Status::NullDestination);
		};
		// SAFETY: `base` points at `len` contiguous elements of stride
		// `stride` (guaranteed by `ArrayBank::struct_object`'s caller
		// contract); `index` was bounds-checked by the array reader before
		// this call, and `offset` is a byte offset within one element
		// obtained from `std::mem::offset_of!` against the same `T`, so the
		// resulting pointer is in-bounds and correctly sized for `value`'s
		// type. `write_unaligned` is used instead of forming a `&mut`
		// reference because the memory was never initialized by Rust and a
		// reference would require it to already hold a valid value of the
		// field's type.
		unsafe {
			let field_ptr = ctx.base.add(index * ctx.stride + offset);
			match value {
				ScalarValue::Integer(v) => std::ptr::write_unaligned(field_ptr.cast::<i64>(), v),
				ScalarValue::UInteger(v) => std::ptr::write_unaligned(field_ptr.cast::<u64>(), v),
				ScalarValue::Short(v) => std::ptr::write_unaligned(field_ptr.cast::<i16>(), v),
				ScalarValue::UShort(v) => std::ptr::write_unaligned(field_ptr.cast::<u16>(), v),
				ScalarValue::Real(v) => std::ptr::write_unaligned(field_ptr.cast::<f64>(), v),
				#[cfg(feature = "time")]
				ScalarValue::Time(v) => std::ptr::write_unaligned(field_ptr.cast::<f64>(), v),
				ScalarValue::Boolean(v) => std::ptr::write_unaligned(field_ptr.cast::<bool>(), v),
				ScalarValue::Character(v) => std::ptr::write_unaligned(field_ptr, v),
			}
		}
		return Ok(());
	}

	match (destination, value) {
		(Destination::Integer(slots), ScalarValue::Integer(v)) => write_slot(slots, index, v),
		(Destination::UInteger(slots), ScalarValue::UInteger(v)) => write_slot(slots, index, v),
		(Destination::Short(slots), ScalarValue::Short(v)) => write_slot(slots, index, v),
		(Destination::UShort(slots), ScalarValue::UShort(v)) => write_slot(slots, index, v),
		(Destination::Real(slots), ScalarValue::Real(v)) => write_slot(slots, index, v),
		#[cfg(feature = "time")]
		(Destination::Time(slots), ScalarValue::Time(v)) => write_slot(slots, index, v),
		(Destination::Boolean(slots), ScalarValue::Boolean(v)) => write_slot(slots, index, v),
		(Destination::Character(slots), ScalarValue::Character(v)) => write_slot(slots, index, v),
		(Destination::None, _) => Ok(()),
		_ => Err(Status::ConversionError),
	}
}

fn write_slot<T: Copy>(slots: &mut [T], index: usize, value: T) -> Result<(), Status> {
	*slots.get_mut(index).ok_or(Status::NullDestination)? = value;
	Ok(())
}

pub(crate) fn string_slot<'a>(bank: &'a mut StringBank<'_>, index: usize) -> Result<&'a mut [u8], Status> {
	bank.slot_mut(index).ok_or(Status::NullDestination)
}

/// Write a NUL-terminated string into the destination described by
/// `destination`, at element `index`
///
/// A [`Destination::StringOffset`] is only reachable through an enclosing
/// struct-array: its `offset`/`capacity` describe a char buffer embedded
/// directly in the caller's struct, so the write goes through the same raw
/// pointer path as [`write_scalar`]'s `Offset` case.
///
/// A [`Destination::String`] reached through [`ParentCtx::ObjectArray`] at
/// `index > 0` is the parallel-string-array case §3.4 declares unsupported:
/// each element's string would alias the same destination buffer, so this is
/// rejected unconditionally rather than silently overwriting slot 0 or
/// reading out of bounds.
pub(crate) fn write_string(destination: &mut Destination<'_>, parent: ParentCtx, index: usize, value: &[u8]) -> Result<(), Status> {
	match *destination {
		Destination::StringOffset { offset, capacity } => {
			let ParentCtx::StructArray(ctx) = parent else {
				return Err(Status::NullDestination);
			};
			if value.len() + 1 > capacity {
				return Err(Status::StringValueTooLong);
			}
			// SAFETY: see `write_scalar`'s `Offset` case; `capacity` bytes
			// starting at `offset` are reserved for this field by the
			// caller's struct layout, and the bounds check above guarantees
			// `value` plus its terminator fit within `capacity`.
			unsafe {
				let field_ptr = ctx.base.add(index * ctx.stride + offset);
				std::ptr::copy_nonoverlapping(value.as_ptr(), field_ptr, value.len());
				std::ptr::write(field_ptr.add(value.len()), 0u8);
			}
			Ok(())
		}
		Destination::String(ref mut bank) => {
			if matches!(parent, ParentCtx::ObjectArray) && index > 0 {
				return Err(Status::ParallelStringUnsupported);
			}
			let slot = string_slot(bank, index)?;
			if value.len() + 1 > slot.len() {
				return Err(Status::StringValueTooLong);
			}
			slot[..value.len()].copy_from_slice(value);
			slot[value.len()] = 0;
			Ok(())
		}
		Destination::None => Ok(()),
		_ => Err(Status::ParallelStringUnsupported),
	}
}
