//! Error types for store operations

use std::fmt::Debug;

use thiserror::Error;

/// Errors returned by [`Store`](crate::store::Store) operations
///
/// A missing key is the only failure the store knows about. It is an
/// ordinary outcome callers branch on, never a fatal condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError<K: Debug> {
    /// The key was absent when the operation checked for it
    #[error("key not found: {0:?}")]
    NotFound(K),
}

impl<K: Debug> StoreError<K> {
    /// The key the failed operation was called with
    pub fn key(&self) -> &K {
        match self {
            StoreError::NotFound(key) => key,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound("foo".to_string());
        assert_eq!(err.to_string(), "key not found: \"foo\"");
    }

    #[test]
    fn test_not_found_key() {
        let err = StoreError::NotFound(42u64);
        assert!(err.is_not_found());
        assert_eq!(*err.key(), 42);
    }
}
