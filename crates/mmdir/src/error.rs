//! Error types.
use std::{borrow::Cow, io, path::Path};

use miette::Diagnostic;
use thiserror::Error;

/// Convenience return type.
pub type Result<T> = std::result::Result<T, Error>;

/// Combined return error type.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
	/// I/O error from the filesystem or a foreign archive reader.
	#[error(transparent)]
	Io(#[from] io::Error),

	/// Archive error.
	#[error(transparent)]
	Simple(#[from] SimpleError),
}

impl Error {
	/// The kind of this error, or `None` for plain I/O failures.
	pub fn kind(&self) -> Option<ErrorKind> {
		match self {
			Self::Io(_) => None,
			Self::Simple(err) => Some(err.kind),
		}
	}

	/// Returns `true` if this error is of the given kind.
	pub fn is(&self, kind: ErrorKind) -> bool {
		self.kind() == Some(kind)
	}

	pub(crate) fn already_exists(path: &Path) -> Self {
		ErrorKind::AlreadyExists
			.with_message(format!("destination already exists: {}", path.display()))
	}

	/// Turn a missing file into [`ErrorKind::NotFound`], leaving other I/O errors alone.
	pub(crate) fn from_missing(err: io::Error, what: impl FnOnce() -> String) -> Self {
		if err.kind() == io::ErrorKind::NotFound {
			ErrorKind::NotFound.with_message(what())
		} else {
			Self::Io(err)
		}
	}
}

/// Archive error.
#[derive(Error, Diagnostic, Debug)]
#[error("mmdir: {message}")]
pub struct SimpleError {
	/// Error kind.
	pub kind: ErrorKind,

	/// Error message.
	pub message: Cow<'static, str>,
}

impl SimpleError {
	/// New error with the default message for its kind.
	pub fn new(kind: ErrorKind) -> Self {
		Self {
			kind,
			message: kind.default_message(),
		}
	}

	/// Change the error message.
	pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
		self.message = message.into();
		self
	}
}

/// Archive error kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// A destination to be created is already there.
	AlreadyExists,

	/// Missing entry set, content slot, or manifest record.
	NotFound,

	/// Malformed or unreadable manifest, info record, or container.
	Format,

	/// Operation preconditions unmet, like fusing an archive without an info record.
	InvalidArchive,
}

impl ErrorKind {
	/// Get the default error message for this error kind.
	pub fn default_message(self) -> Cow<'static, str> {
		match self {
			ErrorKind::AlreadyExists => Cow::Borrowed("destination already exists"),
			ErrorKind::NotFound => Cow::Borrowed("not found"),
			ErrorKind::Format => Cow::Borrowed("malformed record"),
			ErrorKind::InvalidArchive => Cow::Borrowed("not a valid mmdir archive"),
		}
	}

	/// Make an error of this kind with a specific message.
	pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
		SimpleError::new(self).with_message(message).into()
	}
}

impl From<ErrorKind> for SimpleError {
	fn from(ek: ErrorKind) -> Self {
		Self::new(ek)
	}
}

impl From<ErrorKind> for Error {
	fn from(ek: ErrorKind) -> Self {
		Self::Simple(ek.into())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		if err.is_io() {
			Self::Io(err.into())
		} else {
			ErrorKind::Format.with_message(format!("malformed record: {err}"))
		}
	}
}

impl From<zip::result::ZipError> for Error {
	fn from(err: zip::result::ZipError) -> Self {
		use zip::result::ZipError;
		match err {
			ZipError::Io(err) => Self::Io(err),
			ZipError::FileNotFound => ErrorKind::NotFound.with_message("zip member not found"),
			other => ErrorKind::Format.with_message(format!("zip container: {other}")),
		}
	}
}

impl From<walkdir::Error> for Error {
	fn from(err: walkdir::Error) -> Self {
		Self::Io(err.into())
	}
}
