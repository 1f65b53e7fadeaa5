//! Configuration shared by the hashing schemes

use crate::HashingError;

/// Load factor threshold used by the control panel when nothing else is configured
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.7;

/// Bitmap size used by the control panel when nothing else is configured
pub const DEFAULT_BITMAP_SIZE: usize = 8;

/// Tunable parameters for the hashing schemes.
///
/// Only linear hashing reads the load factor threshold and only the bitmap index reads the
/// bitmap size. Extendible hashing has nothing to configure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeConfig {
    /// Multiplier applied to `2^level` to get the overflow trigger of a linear hashing bucket
    pub load_factor_threshold: f64,
    /// Number of bits in a bitmap index, fixed for the lifetime of the index
    pub bitmap_size: usize,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
            bitmap_size: DEFAULT_BITMAP_SIZE,
        }
    }
}

impl SchemeConfig {
    /// Returns a copy of the config with a different load factor threshold
    #[must_use]
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Returns a copy of the config with a different bitmap size
    #[must_use]
    pub fn with_bitmap_size(mut self, size: usize) -> Self {
        self.bitmap_size = size;
        self
    }

    /// Checks that every value lies in its domain.
    ///
    /// # Errors
    ///
    /// Returns [`HashingError::InvalidLoadFactor`] if the threshold is not in (0, 1] and
    /// [`HashingError::InvalidBitmapSize`] if the bitmap size is zero.
    pub fn validate(&self) -> Result<(), HashingError> {
        validate_load_factor(self.load_factor_threshold)?;
        validate_bitmap_size(self.bitmap_size)
    }
}

/// Rejects thresholds outside (0, 1], including NaN and infinities
pub(crate) fn validate_load_factor(threshold: f64) -> Result<(), HashingError> {
    if threshold.is_finite() && threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(HashingError::InvalidLoadFactor { threshold })
    }
}

/// Rejects an empty bitmap
pub(crate) fn validate_bitmap_size(size: usize) -> Result<(), HashingError> {
    if size == 0 { Err(HashingError::InvalidBitmapSize { size }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_control_panel() {
        let config = SchemeConfig::default();
        assert!((config.load_factor_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.bitmap_size, 8);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_load_factor_bounds() {
        let config = SchemeConfig::default();
        assert!(config.with_load_factor_threshold(1.0).validate().is_ok());
        assert!(config.with_load_factor_threshold(0.1).validate().is_ok());

        for threshold in [0.0, -0.5, 1.01, f64::NAN, f64::INFINITY] {
            let err = config.with_load_factor_threshold(threshold).validate();
            assert!(matches!(err, Err(HashingError::InvalidLoadFactor { .. })), "{threshold}");
        }
    }

    #[test]
    fn test_zero_bitmap_size_rejected() {
        let config = SchemeConfig::default().with_bitmap_size(0);
        assert_eq!(config.validate(), Err(HashingError::InvalidBitmapSize { size: 0 }));
        assert!(SchemeConfig::default().with_bitmap_size(1).validate().is_ok());
    }
}
