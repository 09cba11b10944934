pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Completion service failed after {attempts} attempts: {message}")]
	CompletionExhausted { attempts: u32, message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<scout_storage::Error> for Error {
	fn from(err: scout_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
