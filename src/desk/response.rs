//! Serializable envelope for desk results.

use super::{DeskError, DeskResult};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Structured outcome of a desk operation.
///
/// Serializes as `{"ok": true, "data": …}` or
/// `{"ok": false, "error": {"kind": …, "message": …}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskResponse<T> {
    /// The operation succeeded.
    Success(T),
    /// The operation failed.
    Failure(DeskError),
}

impl<T> DeskResponse<T> {
    /// Returns `true` for a successful outcome.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts the envelope back into a result.
    ///
    /// # Errors
    ///
    /// Returns the wrapped [`DeskError`] for a failed outcome.
    pub fn into_result(self) -> DeskResult<T> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(err) => Err(err),
        }
    }
}

impl<T> From<DeskResult<T>> for DeskResponse<T> {
    fn from(result: DeskResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err),
        }
    }
}

impl<T: Serialize> Serialize for DeskResponse<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DeskResponse", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(err) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", err)?;
            }
        }
        state.end()
    }
}
