use thiserror::Error;

/// Failure while fetching one of the chord resources.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FetchError {
	#[error("{what} request failed: {status} {body}")]
	Status {
		what: String,
		status: u16,
		body: String,
	},
	#[error("no signed URL returned for {0}")]
	MissingSignedUrl(String),
	#[error("failed to parse {what}: {message}")]
	Parse { what: String, message: String },
	#[error("network error fetching {what}: {message}")]
	Network { what: String, message: String },
	#[error("{what} has shape {rows}x{cols}, expected {expected}x{expected}")]
	Shape {
		what: String,
		rows: usize,
		cols: usize,
		expected: usize,
	},
}

impl FetchError {
	pub(crate) fn network(what: &str, err: impl std::fmt::Display) -> Self {
		Self::Network {
			what: what.to_string(),
			message: err.to_string(),
		}
	}

	pub(crate) fn parse(what: &str, err: impl std::fmt::Display) -> Self {
		Self::Parse {
			what: what.to_string(),
			message: err.to_string(),
		}
	}
}
