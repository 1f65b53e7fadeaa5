use crate::{
    HashingError, HashingScheme, Key, Scheme, SchemeConfig,
    config::validate_load_factor,
    utils::{bucket_index, render_buckets},
};
use log::{debug, trace};
use std::{any::Any, fmt, mem};

/// Level of a freshly constructed table
pub const INITIAL_LEVEL: u32 = 1;

/// Load factor threshold of a table constructed with [`LinearHashing::new`]
const INITIAL_LOAD_FACTOR_THRESHOLD: f64 = 1.0;

/// Linear hashing over non-negative integer keys.
///
/// Buckets split one at a time in round-robin order: the bucket at the split pointer splits
/// when it holds more than `load_factor_threshold * 2^level` keys, whichever bucket the
/// triggering key landed in. A round ends when every bucket present at the start of the level
/// has split, at which point the level increases and the split pointer returns to zero.
///
/// A bucket other than the one at the split pointer can therefore grow without bound until the
/// pointer reaches it.
#[derive(Debug, Clone)]
pub struct LinearHashing {
    /// Current round; `2^level` buckets existed when the round started
    level: u32,
    /// Next bucket scheduled to split, always below `2^level`
    split_pointer: usize,
    /// Bucket storage, `2^level + split_pointer` entries
    buckets: Vec<Vec<Key>>,
    /// Multiplier applied to `2^level` to get the split trigger
    load_factor_threshold: f64,
}

impl Default for LinearHashing {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearHashing {
    /// Creates an empty table with two buckets and a load factor threshold of 1.0
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: INITIAL_LEVEL,
            split_pointer: 0,
            buckets: vec![Vec::new(); 1 << INITIAL_LEVEL],
            load_factor_threshold: INITIAL_LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Creates an empty table with the given load factor threshold.
    ///
    /// # Errors
    ///
    /// Returns [`HashingError::InvalidLoadFactor`] if the threshold is not in (0, 1].
    pub fn with_load_factor_threshold(threshold: f64) -> Result<Self, HashingError> {
        let mut table = Self::new();
        table.set_load_factor_threshold(threshold)?;
        Ok(table)
    }

    /// Changes the load factor threshold used by subsequent inserts.
    ///
    /// # Errors
    ///
    /// Returns [`HashingError::InvalidLoadFactor`] if the threshold is not in (0, 1]; the
    /// current threshold is kept.
    pub fn set_load_factor_threshold(&mut self, threshold: f64) -> Result<(), HashingError> {
        validate_load_factor(threshold)?;
        self.load_factor_threshold = threshold;
        Ok(())
    }

    /// Current load factor threshold
    #[must_use]
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Bucket addressing a key. Keys whose bucket already split this round use the finer
    /// modulus `2^(level + 1)`.
    #[must_use]
    pub fn address_of(&self, key: Key) -> usize {
        let index = bucket_index(key, self.level);
        if index < self.split_pointer { bucket_index(key, self.level.saturating_add(1)) } else { index }
    }

    /// Number of buckets that split during the current round, `2^level`
    fn round_length(&self) -> usize {
        1_usize.checked_shl(self.level).unwrap_or(usize::MAX)
    }

    /// Size above which the bucket at the split pointer splits
    fn split_threshold(&self) -> f64 {
        self.load_factor_threshold * f64::from(self.level).exp2()
    }

    /// Inserts a key, then splits the bucket at the split pointer if it overflows
    #[allow(clippy::cast_precision_loss)]
    pub fn insert(&mut self, key: Key) {
        let index = self.address_of(key);
        if let Some(bucket) = self.buckets.get_mut(index) {
            bucket.push(key);
            trace!("inserted {key} into bucket {index}");
        }

        let watched = self.buckets.get(self.split_pointer).map_or(0, Vec::len);
        if watched as f64 > self.split_threshold() {
            self.split();
        }
    }

    /// Splits the bucket at the split pointer into itself and a newly appended bucket, then
    /// advances the pointer, ending the round when it wraps.
    fn split(&mut self) {
        self.buckets.push(Vec::new());
        let keys = self.buckets.get_mut(self.split_pointer).map(mem::take).unwrap_or_default();
        let finer_level = self.level.saturating_add(1);
        debug!(
            "splitting bucket {} at level {} into bucket {}",
            self.split_pointer,
            self.level,
            self.buckets.len().saturating_sub(1)
        );

        for key in keys {
            // Keys of the split bucket land either back in it or in the appended bucket
            if let Some(bucket) = self.buckets.get_mut(bucket_index(key, finer_level)) {
                bucket.push(key);
            }
        }

        self.split_pointer = self.split_pointer.saturating_add(1);
        if self.split_pointer >= self.round_length() {
            self.level = finer_level;
            self.split_pointer = 0;
            debug!("round complete, level {} with {} buckets", self.level, self.buckets.len());
        }
    }

    /// Removes one occurrence of a key. Absent keys are a no-op.
    pub fn delete(&mut self, key: Key) -> bool {
        let index = self.address_of(key);
        let Some(bucket) = self.buckets.get_mut(index) else {
            return false;
        };

        match bucket.iter().position(|&stored| stored == key) {
            Some(position) => {
                bucket.remove(position);
                trace!("deleted {key} from bucket {index}");
                true
            }
            None => false,
        }
    }

    /// Returns true if the key is stored
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.buckets.get(self.address_of(key)).is_some_and(|bucket| bucket.contains(&key))
    }

    /// Number of stored keys, duplicates included
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns true if no key is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Returns the table to its freshly constructed state, keeping the load factor threshold
    pub fn reset(&mut self) {
        *self = Self { load_factor_threshold: self.load_factor_threshold, ..Self::new() };
    }

    /// Current round
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Next bucket scheduled to split
    #[must_use]
    pub fn split_pointer(&self) -> usize {
        self.split_pointer
    }

    /// Bucket contents in bucket order
    #[must_use]
    pub fn buckets(&self) -> &[Vec<Key>] {
        &self.buckets
    }

    /// Number of buckets, always `2^level + split_pointer`
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl HashingScheme for LinearHashing {
    fn scheme(&self) -> Scheme {
        Scheme::Linear
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

    fn configure(&mut self, config: &SchemeConfig) -> Result<(), HashingError> {
        self.set_load_factor_threshold(config.load_factor_threshold)
    }

    fn contains(&self, key: Key) -> bool {
        Self::contains(self, key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for LinearHashing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Level: {}, Next Split: {}", self.level, self.split_pointer)?;
        render_buckets(
            f,
            self.buckets.iter().enumerate().map(|(index, bucket)| (index.to_string(), bucket)),
        )
    }
}
