//! The capability interface every hashing scheme implements and the tag that selects one

use crate::{BitmapIndex, ExtendibleHashing, HashingError, Key, LinearHashing, SchemeConfig};
use std::{any::Any, fmt, str::FromStr};

/// Operations shared by every hashing scheme.
///
/// The schemes have unrelated internals; this trait only fixes the shape of the contract so a
/// session can hold any of them behind one box. `Display` renders the scheme's current state.
pub trait HashingScheme: fmt::Debug + fmt::Display {
    /// The tag of this scheme
    fn scheme(&self) -> Scheme;

    /// Inserts a key. Duplicates are accepted.
    fn insert(&mut self, key: Key);

    /// Removes one occurrence of the key. Returns false, leaving the state untouched, when the
    /// key is absent.
    fn delete(&mut self, key: Key) -> bool;

    /// Returns the scheme to its freshly constructed state
    fn reset(&mut self);

    /// Applies the parts of the config this scheme understands.
    ///
    /// # Errors
    ///
    /// Returns an error if a value this scheme reads is outside its domain.
    fn configure(&mut self, config: &SchemeConfig) -> Result<(), HashingError>;

    /// Returns true if at least one occurrence of the key is stored
    fn contains(&self, key: Key) -> bool;

    /// Number of stored keys, duplicates included
    fn len(&self) -> usize;

    /// Returns true if no key is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The concrete scheme, for downcasting to its own queries
    fn as_any(&self) -> &dyn Any;
}

/// The closed set of hashing schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Directory of buckets addressed by the low bits of the key
    Extendible,
    /// Growing bucket array split one bucket at a time in round-robin order
    Linear,
    /// Fixed-size presence bitmap
    Bitmap,
}

impl Scheme {
    /// Every scheme, in control panel order
    pub const ALL: [Self; 3] = [Self::Extendible, Self::Linear, Self::Bitmap];

    /// Name shown in the control panel
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Extendible => "Extendible Hashing",
            Self::Linear => "Linear Hashing",
            Self::Bitmap => "Bitmap Hashing",
        }
    }

    /// Builds a fresh, empty scheme of this kind configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn build(self, config: &SchemeConfig) -> Result<Box<dyn HashingScheme>, HashingError> {
        config.validate()?;

        let scheme: Box<dyn HashingScheme> = match self {
            Self::Extendible => Box::new(ExtendibleHashing::new()),
            Self::Linear => {
                Box::new(LinearHashing::with_load_factor_threshold(config.load_factor_threshold)?)
            }
            Self::Bitmap => Box::new(BitmapIndex::new(config.bitmap_size)?),
        };

        Ok(scheme)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = HashingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|scheme| {
                let long = scheme.name();
                let short = long.split(' ').next().unwrap_or(long);
                name.eq_ignore_ascii_case(long) || name.eq_ignore_ascii_case(short)
            })
            .ok_or_else(|| HashingError::UnknownScheme { name: s.to_string() })
    }
}
