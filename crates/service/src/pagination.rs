//! Skip/limit resolution for list queries.

use crate::{Result, ServiceError};

/// Page size used when the caller gives none.
pub const DEFAULT_LIMIT: usize = 30;

/// A resolved window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    /// Resolves caller-supplied values against `default_limit`.
    ///
    /// Missing or negative values take their default (`0` for `skip`,
    /// `default_limit` for `limit`). A `skip` greater than the resolved
    /// `limit` is rejected.
    pub fn resolve(skip: Option<i64>, limit: Option<i64>, default_limit: usize) -> Result<Self> {
        let skip = non_negative(skip).unwrap_or(0);
        let limit = non_negative(limit).unwrap_or(default_limit);

        if skip > limit {
            return Err(ServiceError::IllegalArgument(format!(
                "skip ({skip}) must not exceed limit ({limit})"
            )));
        }
        Ok(Self { skip, limit })
    }

    /// Applies the window to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.limit).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn non_negative(value: Option<i64>) -> Option<usize> {
    value.and_then(|v| usize::try_from(v).ok())
}
