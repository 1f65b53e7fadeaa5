//! Fixed-size bitmap recording key presence by `key mod size`

use crate::{
    HashingError, HashingScheme, Key, Scheme, SchemeConfig,
    config::{DEFAULT_BITMAP_SIZE, validate_bitmap_size},
    utils::render_bits,
};
use log::trace;
use std::{any::Any, fmt};

/// The bitmap as it was right after one insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Key whose insertion produced this snapshot
    pub key: Key,
    /// Copy of the whole bitmap after the insertion
    pub bits: Box<[bool]>,
}

/// Presence bitmap over non-negative integer keys.
///
/// Each key sets bit `key mod size`. Every insertion appends a copy of the bitmap to the
/// history. Deleting a key clears its bit even when another stored key maps to the same bit.
#[derive(Debug, Clone)]
pub struct BitmapIndex {
    /// One bit per residue class; the length never changes
    bits: Box<[bool]>,
    /// Inserted keys in insertion order, duplicates included
    keys: Vec<Key>,
    /// One snapshot per insertion since the last reset
    history: Vec<Snapshot>,
}

impl Default for BitmapIndex {
    fn default() -> Self {
        Self {
            bits: vec![false; DEFAULT_BITMAP_SIZE].into_boxed_slice(),
            keys: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl BitmapIndex {
    /// Creates an all-zero bitmap of `size` bits.
    ///
    /// # Errors
    ///
    /// Returns [`HashingError::InvalidBitmapSize`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, HashingError> {
        validate_bitmap_size(size)?;
        Ok(Self {
            bits: vec![false; size].into_boxed_slice(),
            keys: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Number of bits
    #[must_use]
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Bit addressing a key
    #[allow(clippy::arithmetic_side_effects)]
    fn index_of(&self, key: Key) -> usize {
        // The size is never zero
        key % self.bits.len()
    }

    /// Sets the key's bit, records the key and a snapshot, and returns the bitmap
    pub fn insert(&mut self, key: Key) -> &[bool] {
        let index = self.index_of(key);
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = true;
        }
        self.keys.push(key);
        self.history.push(Snapshot { key, bits: self.bits.clone() });
        trace!("set bit {index} for {key}");

        &self.bits
    }

    /// Clears the key's bit and forgets one occurrence of the key. Keys never inserted are a
    /// no-op.
    pub fn delete(&mut self, key: Key) -> bool {
        let Some(position) = self.keys.iter().position(|&stored| stored == key) else {
            return false;
        };

        self.keys.remove(position);
        let index = self.index_of(key);
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = false;
        }
        trace!("cleared bit {index} for {key}");
        true
    }

    /// Clears the bitmap, the stored keys and the history
    pub fn reset(&mut self) {
        self.bits.fill(false);
        self.keys.clear();
        self.history.clear();
    }

    /// Returns true if the key was inserted and not deleted since
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Returns true if the bit addressed by the key is set
    #[must_use]
    pub fn is_set(&self, key: Key) -> bool {
        self.bits.get(self.index_of(key)).copied().unwrap_or(false)
    }

    /// Current bitmap
    #[must_use]
    pub fn bitmap(&self) -> &[bool] {
        &self.bits
    }

    /// Stored keys in insertion order
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Snapshots taken after each insertion, oldest first
    #[must_use]
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// History rendered as `After Inserting Key <k>: [..]` lines
    pub fn history_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.history.iter().map(|snapshot| {
            format!("After Inserting Key {}: {}", snapshot.key, render_bits(&snapshot.bits))
        })
    }
}

impl HashingScheme for BitmapIndex {
    fn scheme(&self) -> Scheme {
        Scheme::Bitmap
    }

    fn insert(&mut self, key: Key) {
        Self::insert(self, key);
    }

    fn delete(&mut self, key: Key) -> bool {
        Self::delete(self, key)
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    /// Validates the config. The size is fixed at construction, so a different
    /// `bitmap_size` only takes effect when the index is rebuilt.
    fn configure(&mut self, config: &SchemeConfig) -> Result<(), HashingError> {
        validate_bitmap_size(config.bitmap_size)
    }

    fn contains(&self, key: Key) -> bool {
        Self::contains(self, key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for BitmapIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap: {}", render_bits(&self.bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE: [Key; 8] = [3, 5, 7, 10, 12, 15, 20, 22];

    fn bits(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(BitmapIndex::new(0).unwrap_err(), HashingError::InvalidBitmapSize { size: 0 });
    }

    #[test]
    fn test_insert_returns_bitmap() {
        let mut index = BitmapIndex::new(4).unwrap();
        assert_eq!(index.insert(6), bits("0010").as_slice());
        assert_eq!(index.insert(1), bits("0110").as_slice());
    }

    #[test]
    fn test_reference_sequence_history() {
        let mut index = BitmapIndex::new(8).unwrap();
        for key in SEQUENCE {
            index.insert(key);
        }

        let expected = [
            "00010000", "00010100", "00010101", "00110101", "00111101", "00111101", "00111101",
            "00111111",
        ];
        assert_eq!(index.history().len(), SEQUENCE.len());
        for ((snapshot, key), pattern) in index.history().iter().zip(SEQUENCE).zip(expected) {
            assert_eq!(snapshot.key, key);
            assert_eq!(&*snapshot.bits, bits(pattern).as_slice());
        }
        assert_eq!(index.bitmap(), bits("00111111").as_slice());
    }

    #[test]
    fn test_delete_clears_shared_bit() {
        let mut index = BitmapIndex::new(8).unwrap();
        index.insert(7);
        index.insert(15);

        assert!(index.delete(15));
        // 7 survives but shares residue 7 with 15
        assert!(index.contains(7));
        assert!(!index.is_set(7));
        assert_eq!(index.keys(), &[7]);
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let mut index = BitmapIndex::new(8).unwrap();
        index.insert(3);

        // 11 maps to the same bit as 3 but was never inserted
        assert!(!index.delete(11));
        assert!(index.is_set(3));
        assert_eq!(index.keys(), &[3]);
        assert_eq!(index.history().len(), 1);
    }

    #[test]
    fn test_delete_keeps_history() {
        let mut index = BitmapIndex::new(8).unwrap();
        for key in SEQUENCE {
            index.insert(key);
        }
        index.delete(3);

        assert_eq!(index.history().len(), SEQUENCE.len());
        assert_eq!(index.history()[0].key, 3);
        assert_eq!(index.keys().len(), SEQUENCE.len() - 1);
    }

    #[test]
    fn test_reset() {
        let mut index = BitmapIndex::new(8).unwrap();
        for key in SEQUENCE {
            index.insert(key);
        }

        index.reset();
        index.reset();
        assert_eq!(index.bitmap(), &[false; 8]);
        assert!(index.keys().is_empty());
        assert!(index.history().is_empty());
        assert_eq!(index.size(), 8);
    }

    #[test]
    fn test_configure_does_not_resize() {
        let mut index = BitmapIndex::new(8).unwrap();
        let config = SchemeConfig::default().with_bitmap_size(16);

        assert!(HashingScheme::configure(&mut index, &config).is_ok());
        assert_eq!(index.size(), 8);
        assert!(HashingScheme::configure(&mut index, &config.with_bitmap_size(0)).is_err());
    }

    #[test]
    fn test_display_and_history_lines() {
        let mut index = BitmapIndex::new(4).unwrap();
        index.insert(5);
        index.insert(2);

        assert_eq!(index.to_string(), "Bitmap: [0, 1, 1, 0]");
        let lines: Vec<String> = index.history_lines().collect();
        assert_eq!(
            lines,
            vec!["After Inserting Key 5: [0, 1, 0, 0]", "After Inserting Key 2: [0, 1, 1, 0]"]
        );
    }
}
