//! Response classification.

// std
use std::ops::RangeInclusive;
// self
use crate::_prelude::*;

const SUCCESS_BAND: RangeInclusive<u16> = 200..=299;

/// Raw outcome of the network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
	/// HTTP status code.
	pub status: u16,
	/// Full response body.
	pub body: Vec<u8>,
}
impl ExecutionResult {
	/// Creates a result from a status and body.
	pub fn new(status: u16, body: Vec<u8>) -> Self {
		Self { status, body }
	}

	/// Returns the body as text on a 2xx status, [`Error::HttpStatus`] otherwise.
	///
	/// Invalid UTF-8 sequences are replaced rather than rejected.
	pub fn classify(self) -> Result<String> {
		if !is_success(self.status) {
			return Err(Error::HttpStatus { code: self.status });
		}

		Ok(match String::from_utf8(self.body) {
			Ok(text) => text,
			Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
		})
	}
}

/// Returns true for statuses in `200..=299`.
pub fn is_success(status: u16) -> bool {
	SUCCESS_BAND.contains(&status)
}
