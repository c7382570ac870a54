pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid changes at {field}: expected {expected}.")]
	Validation { field: String, expected: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl From<advisor_storage::Error> for Error {
	fn from(err: advisor_storage::Error) -> Self {
		match err {
			advisor_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			advisor_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<advisor_domain::ValidationError> for Error {
	fn from(err: advisor_domain::ValidationError) -> Self {
		Self::Validation { field: err.field, expected: err.expected }
	}
}

impl From<advisor_providers::Error> for Error {
	fn from(err: advisor_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
