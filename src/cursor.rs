//! Byte-at-a-time scanning over the input slice
//!
//! One token of lookahead is always available by peeking before committing
//! to a `bump`; there is no pushback/ungetc operation, since every state
//! that needs to "look at a byte and decide" peeks first.

pub(crate) struct Cursor<'a> {
	input: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	pub(crate) fn new(input: &'a [u8]) -> Self {
		Self { input, pos: 0 }
	}

	pub(crate) fn pos(&self) -> usize {
		self.pos
	}

	/// Byte at the current position, without consuming it
	pub(crate) fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	/// Consume and return the current byte
	pub(crate) fn bump(&mut self) -> Option<u8> {
		let b = self.peek()?;
		self.pos += 1;
		Some(b)
	}

	/// The unconsumed tail of the input, for lexeme scanners that need to
	/// look ahead by more than one byte
	pub(crate) fn remaining(&self) -> &'a [u8] {
		&self.input[self.pos..]
	}

	/// Advance the cursor by `n` bytes, as already scanned by a lexeme reader
	pub(crate) fn advance(&mut self, n: usize) {
		self.pos = (self.pos + n).min(self.input.len());
	}

	/// Consume the current byte only if it equals `b`
	pub(crate) fn eat(&mut self, b: u8) -> bool {
		if self.peek() == Some(b) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	pub(crate) fn skip_ws(&mut self) {
		while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
			self.pos += 1;
		}
	}

}
