use crate::{
    HashingError, HashingScheme, Key, Scheme, SchemeConfig,
    utils::{binary_label, bucket_index, render_buckets},
};
use log::{debug, trace};
use std::{any::Any, fmt, mem};

/// Global depth of a freshly constructed directory
pub const INITIAL_GLOBAL_DEPTH: u32 = 1;

/// Extendible hashing over non-negative integer keys.
///
/// The directory has `2^global_depth` slots addressed by the low bits of the key. Slots refer to
/// buckets by id, so several slots share one bucket after the directory doubles until a split
/// gives them separate storage. A bucket splits once it holds more than `2^local_depth` keys.
///
/// Buckets are never merged: deleting keys does not shrink the directory.
#[derive(Debug, Clone)]
pub struct ExtendibleHashing {
    /// Number of low key bits used to address the directory
    global_depth: u32,
    /// Bucket id referenced by each directory slot
    directory: Vec<usize>,
    /// Local depth of each directory slot, parallel to `directory`
    local_depths: Vec<u32>,
    /// Bucket storage, indexed by bucket id
    buckets: Vec<Vec<Key>>,
}

impl Default for ExtendibleHashing {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendibleHashing {
    /// Creates an empty directory with two slots, each owning its own bucket
    #[must_use]
    pub fn new() -> Self {
        let slots = 1_usize << INITIAL_GLOBAL_DEPTH;

        Self {
            global_depth: INITIAL_GLOBAL_DEPTH,
            directory: (0..slots).collect(),
            local_depths: vec![INITIAL_GLOBAL_DEPTH; slots],
            buckets: vec![Vec::new(); slots],
        }
    }

    /// Directory slot addressing a key
    fn slot_of(&self, key: Key) -> usize {
        bucket_index(key, self.global_depth)
    }

    /// Bucket referenced by a directory slot
    fn bucket(&self, slot: usize) -> Option<&Vec<Key>> {
        let id = *self.directory.get(slot)?;
        self.buckets.get(id)
    }

    /// Mutable bucket referenced by a directory slot
    fn bucket_mut(&mut self, slot: usize) -> Option<&mut Vec<Key>> {
        let id = *self.directory.get(slot)?;
        self.buckets.get_mut(id)
    }

    /// Largest size the bucket behind a slot may reach before it splits
    fn capacity(&self, slot: usize) -> usize {
        self.local_depths
            .get(slot)
            .and_then(|&depth| 1_usize.checked_shl(depth))
            .unwrap_or(usize::MAX)
    }

    /// Inserts a key, splitting its bucket when it overflows
    pub fn insert(&mut self, key: Key) {
        let slot = self.slot_of(key);
        let Some(bucket) = self.bucket_mut(slot) else {
            return;
        };
        bucket.push(key);
        let size = bucket.len();
        trace!("inserted {key} into slot {slot} (size {size})");

        if size > self.capacity(slot) {
            self.split(slot);
        }
    }

    /// Splits the bucket behind `slot`, doubling the directory first if the bucket is already
    /// discriminated by every directory bit.
    ///
    /// The split bucket keeps the slots whose next bit matches `slot`; the remaining slots that
    /// shared it move to a new empty bucket. The drained keys go back through `insert`, which
    /// may split again.
    fn split(&mut self, slot: usize) {
        let Some(&local_depth) = self.local_depths.get(slot) else {
            return;
        };
        if local_depth >= self.global_depth {
            self.grow();
        }
        let Some(&bucket_id) = self.directory.get(slot) else {
            return;
        };

        let new_depth = local_depth.saturating_add(1);
        let sibling = slot ^ 1_usize.checked_shl(local_depth).unwrap_or(0);
        let sibling_bits = bucket_index(sibling, new_depth);
        let sibling_id = self.buckets.len();
        self.buckets.push(Vec::new());

        for (index, (target, depth)) in
            self.directory.iter_mut().zip(self.local_depths.iter_mut()).enumerate()
        {
            if *target != bucket_id {
                continue;
            }
            if bucket_index(index, new_depth) == sibling_bits {
                *target = sibling_id;
            }
            *depth = new_depth;
        }

        let keys = self.buckets.get_mut(bucket_id).map(mem::take).unwrap_or_default();
        debug!(
            "split slot {slot} (sibling {sibling}) to local depth {new_depth}, redistributing {} keys",
            keys.len()
        );

        for key in keys {
            self.insert(key);
        }
    }

    /// Doubles the directory. The upper half refers to the same buckets as the lower half, and
    /// copies their local depths.
    ///
    /// Giving the upper half fresh empty buckets instead ends the sequence
    /// `5, 7, 12, 14, 3, 9, 21, 27, 18, 23` at local depths `[1, 2, 1, 2]`, with `[12, 14]` left
    /// in bucket `00` and `[18]` alone in bucket `10`, so 14 can no longer be found from slot `10`.
    /// Sharing ends it at `[2, 2, 2, 2]` with every key in its own slot.
    fn grow(&mut self) {
        self.global_depth = self.global_depth.saturating_add(1);
        self.directory.extend_from_within(..);
        self.local_depths.extend_from_within(..);
        debug!(
            "directory doubled to {} slots (global depth {})",
            self.directory.len(),
            self.global_depth
        );
    }

    /// Removes one occurrence of a key. Absent keys are a no-op.
    pub fn delete(&mut self, key: Key) -> bool {
        let slot = self.slot_of(key);
        let Some(bucket) = self.bucket_mut(slot) else {
            return false;
        };

        match bucket.iter().position(|&stored| stored == key) {
            Some(position) => {
                bucket.remove(position);
                trace!("deleted {key} from slot {slot}");
                true
            }
            None => false,
        }
    }

    /// Returns true if the key is stored
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.bucket(self.slot_of(key)).is_some_and(|bucket| bucket.contains(&key))
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

    /// Returns the directory to its freshly constructed state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of low key bits used to address the directory
    #[must_use]
    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    /// Local depth of every directory slot
    #[must_use]
    pub fn local_depths(&self) -> &[u32] {
        &self.local_depths
    }

    /// Number of directory slots, always `2^global_depth`
    #[must_use]
    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Number of distinct buckets behind the directory
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if two directory slots refer to the same bucket
    #[must_use]
    pub fn shares_bucket(&self, a: usize, b: usize) -> bool {
        matches!((self.directory.get(a), self.directory.get(b)), (Some(x), Some(y)) if x == y)
    }

    /// The directory as `(binary slot label, bucket contents)` pairs.
    ///
    /// Labels are padded to the global depth. A shared bucket appears under every slot that
    /// refers to it.
    #[must_use]
    pub fn buckets(&self) -> Vec<(String, &[Key])> {
        (0..self.directory.len())
            .map(|slot| {
                let keys = self.bucket(slot).map_or(&[][..], Vec::as_slice);
                (binary_label(slot, self.global_depth), keys)
            })
            .collect()
    }

    /// Every stored key, each bucket visited once
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.buckets.iter().flatten().copied()
    }
}

impl HashingScheme for ExtendibleHashing {
    fn scheme(&self) -> Scheme {
        Scheme::Extendible
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

    fn configure(&mut self, _config: &SchemeConfig) -> Result<(), HashingError> {
        Ok(())
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

impl fmt::Display for ExtendibleHashing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_buckets(f, self.buckets())?;
        write!(f, "\nLocal Depths: {:?}", self.local_depths)
    }
}
