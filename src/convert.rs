//! Lexeme scanning and numeric/time conversion
//!
//! Token boundaries and grammar are hand-scanned here; once a lexeme is
//! known to be well-formed, the actual radix/IEEE-754 conversion is handed
//! off to `str::parse`/`from_str_radix`, which are locale-free in Rust and
//! so need no reimplementation.

use crate::error::Status;

const MAX_EXPONENT: i32 = 511;

/// Scan a decimal floating-point lexeme starting at `bytes[0]` and convert it
///
/// Returns the converted value and the number of bytes consumed.
pub(crate) fn scan_real(bytes: &[u8]) -> Result<(f64, usize), Status> {
	let mut i = 0;
	let start = 0;
	if matches!(bytes.get(i), Some(b'+' | b'-')) {
		i += 1;
	}
	let int_start = i;
	while matches!(bytes.get(i), Some(b'0'..=b'9')) {
		i += 1;
	}
	let has_int = i > int_start;

	let mut has_frac = false;
	let mut frac_digits = 0u32;
	if bytes.get(i) == Some(&b'.') {
		let dot = i;
		let mut j = i + 1;
		let frac_start = j;
		while matches!(bytes.get(j), Some(b'0'..=b'9')) {
			j += 1;
		}
		if j > frac_start {
			has_frac = true;
			frac_digits = (j - frac_start) as u32;
			i = j;
		} else {
			i = dot;
		}
	}

	if !has_int && !has_frac {
		return Err(Status::BadNumber);
	}

	let mut exponent: i64 = 0;
	if matches!(bytes.get(i), Some(b'e' | b'E')) {
		let mut j = i + 1;
		let mut exp_sign: i64 = 1;
		if matches!(bytes.get(j), Some(b'+' | b'-')) {
			if bytes[j] == b'-' {
				exp_sign = -1;
			}
			j += 1;
		}
		let exp_digit_start = j;
		let mut exp_value: i64 = 0;
		while matches!(bytes.get(j), Some(b'0'..=b'9')) {
			exp_value = exp_value.saturating_mul(10).saturating_add((bytes[j] - b'0') as i64);
			j += 1;
		}
		if j > exp_digit_start {
			exponent = exp_sign * exp_value;
			i = j;
		}
	}

	let combined_exponent = exponent - frac_digits as i64;
	let clamped = combined_exponent.clamp(-(MAX_EXPONENT as i64), MAX_EXPONENT as i64);
	let lexeme = std::str::from_utf8(&bytes[start..i]).map_err(|_| Status::BadNumber)?;
	let value: f64 = if clamped != combined_exponent {
		// Exponent saturated: defer to parse, which itself saturates to
		// +/-inf or 0.0 for extreme magnitudes rather than panicking.
		lexeme.parse().unwrap_or(if combined_exponent > 0 { f64::MAX } else { 0.0 })
	} else {
		lexeme.parse().map_err(|_| Status::BadNumber)?
	};
	Ok((value, i))
}

#[derive(Clone, Copy)]
enum Radix {
	Decimal,
	Hex,
	Octal,
}

fn scan_integer_lexeme(bytes: &[u8]) -> Result<(bool, Radix, usize, usize), Status> {
	let mut i = 0;
	let negative = match bytes.get(i) {
		Some(b'-') => {
			i += 1;
			true
		}
		Some(b'+') => {
			i += 1;
			false
		}
		_ => false,
	};
	let digits_start;
	let radix;
	if bytes.get(i) == Some(&b'0') && matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
		radix = Radix::Hex;
		i += 2;
		digits_start = i;
		while matches!(bytes.get(i), Some(b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')) {
			i += 1;
		}
	} else if bytes.get(i) == Some(&b'0') && matches!(bytes.get(i + 1), Some(b'0'..=b'7')) {
		radix = Radix::Octal;
		i += 1;
		digits_start = i;
		while matches!(bytes.get(i), Some(b'0'..=b'7')) {
			i += 1;
		}
	} else {
		radix = Radix::Decimal;
		digits_start = i;
		while matches!(bytes.get(i), Some(b'0'..=b'9')) {
			i += 1;
		}
	}
	if i == digits_start {
		return Err(Status::BadNumber);
	}
	Ok((negative, radix, digits_start, i))
}

pub(crate) fn scan_integer(bytes: &[u8]) -> Result<(i64, usize), Status> {
	let (negative, radix, digits_start, end) = scan_integer_lexeme(bytes)?;
	let digits = std::str::from_utf8(&bytes[digits_start..end]).map_err(|_| Status::BadNumber)?;
	let radix_n = match radix {
		Radix::Decimal => 10,
		Radix::Hex => 16,
		Radix::Octal => 8,
	};
	let magnitude = i64::from_str_radix(digits, radix_n).map_err(|_| Status::BadNumber)?;
	Ok((if negative { -magnitude } else { magnitude }, end))
}

pub(crate) fn scan_uinteger(bytes: &[u8]) -> Result<(u64, usize), Status> {
	let (negative, radix, digits_start, end) = scan_integer_lexeme(bytes)?;
	if negative {
		return Err(Status::BadNumber);
	}
	let digits = std::str::from_utf8(&bytes[digits_start..end]).map_err(|_| Status::BadNumber)?;
	let radix_n = match radix {
		Radix::Decimal => 10,
		Radix::Hex => 16,
		Radix::Octal => 8,
	};
	let value = u64::from_str_radix(digits, radix_n).map_err(|_| Status::BadNumber)?;
	Ok((value, end))
}

pub(crate) fn scan_boolean(bytes: &[u8]) -> Result<(bool, usize), Status> {
	if bytes.starts_with(b"true") {
		Ok((true, 4))
	} else if bytes.starts_with(b"false") {
		Ok((false, 5))
	} else {
		Err(Status::BadNumber)
	}
}

#[cfg(feature = "time")]
pub(crate) fn parse_iso8601(s: &str) -> Result<f64, Status> {
	use chrono::{DateTime, NaiveDateTime, Utc};

	let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| Status::ConversionError)?;
	let utc: DateTime<Utc> = DateTime::from_naive_utc_and_offset(naive, Utc);
	let seconds = utc.timestamp();
	let nanos = utc.timestamp_subsec_nanos();
	Ok(seconds as f64 + nanos as f64 / 1_000_000_000.0)
}
