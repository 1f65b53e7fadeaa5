//! Error type shared by every hashing scheme

/// Errors raised while constructing or configuring a hashing scheme.
///
/// Insert, delete and reset never fail: deleting an absent key is a no-op, not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashingError {
    /// A bitmap index needs at least one bit
    #[error("invalid bitmap size {size}: the bitmap needs at least one bit")]
    InvalidBitmapSize {
        /// The rejected size
        size: usize,
    },

    /// Load factor thresholds live in the half-open range (0, 1]
    #[error("invalid load factor threshold {threshold}: expected a value in (0, 1]")]
    InvalidLoadFactor {
        /// The rejected threshold
        threshold: f64,
    },

    /// The scheme name does not match any known hashing scheme
    #[error("unknown hashing scheme `{name}`")]
    UnknownScheme {
        /// The name that failed to parse
        name: String,
    },
}

impl HashingError {
    /// Returns true if the error comes from a rejected configuration value
    /// rather than from an unknown scheme name.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidBitmapSize { .. } | Self::InvalidLoadFactor { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HashingError::InvalidBitmapSize { size: 0 };
        assert_eq!(err.to_string(), "invalid bitmap size 0: the bitmap needs at least one bit");

        let err = HashingError::InvalidLoadFactor { threshold: 1.5 };
        assert_eq!(err.to_string(), "invalid load factor threshold 1.5: expected a value in (0, 1]");

        let err = HashingError::UnknownScheme { name: "cuckoo".to_string() };
        assert_eq!(err.to_string(), "unknown hashing scheme `cuckoo`");
    }

    #[test]
    fn test_is_config_error() {
        assert!(HashingError::InvalidBitmapSize { size: 0 }.is_config_error());
        assert!(HashingError::InvalidLoadFactor { threshold: 0.0 }.is_config_error());
        assert!(!HashingError::UnknownScheme { name: String::new() }.is_config_error());
    }
}
