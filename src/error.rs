use core::fmt;

/// Errors reported by the sorted collections.
///
/// Every variant describes a broken precondition of the call that returned
/// it. The check happens before the collection is touched, so an `Err` never
/// leaves a partially applied mutation behind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An argument can never be valid, e.g. a node capacity below three.
    InvalidArgument(&'static str),
    /// A rank lies outside the collection.
    IndexOutOfRange {
        /// The offending rank.
        index: usize,
        /// The collection length at the time of the call.
        len: usize,
    },
    /// The operation is not allowed in the collection's current state.
    InvalidOperation(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            Self::IndexOutOfRange {
                index,
                len,
            } => write!(f, "index {index} out of range for length {len}"),
            Self::InvalidOperation(reason) => write!(f, "invalid operation: {reason}"),
        }
    }
}

impl core::error::Error for Error {}

/// `Result` specialized to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

pub(crate) const READ_ONLY: Error = Error::InvalidOperation("collection is read-only");
