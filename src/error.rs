//! The closed fault vocabulary returned by every parse call

/// Outcome of a parse call
///
/// The first fault encountered wins; there is no accumulation of multiple
/// errors. `Status::Success` is never constructed by the core — a successful
/// parse returns `Ok(Parsed { .. })` instead, so every variant here is an
/// actual fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Status {
	#[error("expected '{{' to start an object")]
	ExpectedObjectStart,
	#[error("expected a quoted attribute name")]
	ExpectedAttrStart,
	#[error("unknown attribute name")]
	UnknownAttribute,
	#[error("attribute name exceeds the maximum length")]
	AttributeNameTooLong,
	#[error("'[' where no array was expected")]
	UnexpectedArrayStart,
	#[error("expected '[' to start a declared array")]
	ExpectedArrayStart,
	#[error("string value exceeds the destination's capacity")]
	StringValueTooLong,
	#[error("token value exceeds the scratch buffer's capacity")]
	TokenValueTooLong,
	#[error("expected ',' or a closing bracket")]
	TrailingGarbage,
	#[error("missing '[' to start an array")]
	MissingArrayStart,
	#[error("error while parsing an object inside an array element")]
	ArrayElementObjectError,
	#[error("array has more elements than the destination can hold")]
	TooManyElements,
	#[error("expected ',' between array elements")]
	ArrayTrailingGarbage,
	#[error("this array element kind is not supported")]
	UnsupportedArrayElementKind,
	#[error("failed to parse a string value")]
	StringParseError,
	#[error("value does not match the expected literal")]
	CheckMismatch,
	#[error("string destinations are not supported in parallel arrays")]
	ParallelStringUnsupported,
	#[error("value is not one of the enumerated names")]
	InvalidEnumValue,
	#[error("quoting of the value does not match its declared kind")]
	QuotingMismatch,
	#[error("value could not be converted")]
	ConversionError,
	#[error("malformed numeric literal")]
	BadNumber,
	#[error("attribute has no destination to write to")]
	NullDestination,
	#[error("expected '{{' to start a nested object")]
	ExpectedObjectBrace,
	#[error("recursion depth limit exceeded")]
	RecursionLimitExceeded,
}

impl Status {
	/// Stable numeric identifier, for callers that want to switch on a code
	/// rather than match the enum directly
	pub fn code(self) -> u32 {
		self as u32
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_is_non_empty() {
		assert!(!Status::BadNumber.to_string().is_empty());
	}

	#[test]
	fn codes_are_distinct() {
		let all = [
			Status::ExpectedObjectStart,
			Status::ExpectedAttrStart,
			Status::UnknownAttribute,
			Status::AttributeNameTooLong,
			Status::UnexpectedArrayStart,
			Status::ExpectedArrayStart,
			Status::StringValueTooLong,
			Status::TokenValueTooLong,
			Status::TrailingGarbage,
			Status::MissingArrayStart,
			Status::ArrayElementObjectError,
			Status::TooManyElements,
			Status::ArrayTrailingGarbage,
			Status::UnsupportedArrayElementKind,
			Status::StringParseError,
			Status::CheckMismatch,
			Status::ParallelStringUnsupported,
			Status::InvalidEnumValue,
			Status::QuotingMismatch,
			Status::ConversionError,
			Status::BadNumber,
			Status::NullDestination,
			Status::ExpectedObjectBrace,
			Status::RecursionLimitExceeded,
		];
		for (i, a) in all.iter().enumerate() {
			for b in &all[i + 1..] {
				assert_ne!(a.code(), b.code());
			}
		}
	}
}
