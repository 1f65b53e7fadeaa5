//! # Bucket Hashing
//!
//! Three dynamic bucket-hashing schemes used by database storage engines to grow a hash index
//! without reorganizing it all at once:
//!
//! - `ExtendibleHashing`: a directory addressed by the low bits of the key that doubles when a
//!   bucket discriminated by every directory bit overflows
//! - `LinearHashing`: a bucket array that splits exactly one bucket at a time in round-robin
//!   order
//! - `BitmapIndex`: a fixed-size presence bitmap with a snapshot taken after every insertion
//!
//! Keys are non-negative integers addressed by modulo, not by a distributing hash function.
//! None of the schemes shrink on delete.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bucket_hashing::ExtendibleHashing;
//!
//! let mut table = ExtendibleHashing::new();
//! for key in [5, 7, 12, 14, 3] {
//!     table.insert(key);
//! }
//!
//! // The third key in slot 1 doubled the directory
//! assert_eq!(table.global_depth(), 2);
//! assert_eq!(table.local_depths(), &[1, 2, 1, 2]);
//!
//! assert!(table.delete(3));
//! assert!(!table.delete(3));
//! ```
//!
//! ## Sessions
//!
//! A control panel holds one scheme at a time through a [`Session`]:
//!
//! ```rust
//! use bucket_hashing::{Scheme, SchemeConfig, Session};
//!
//! let config = SchemeConfig::default().with_load_factor_threshold(0.7);
//! let mut session = Session::new("Linear Hashing".parse::<Scheme>()?, config)?;
//!
//! for key in [3, 2, 4, 1, 8] {
//!     session.insert(key);
//! }
//! println!("{}", session.render());
//!
//! // Switching schemes discards the previous state
//! session.select(Scheme::Bitmap)?;
//! assert!(session.engine().is_empty());
//! # Ok::<(), bucket_hashing::HashingError>(())
//! ```

/// Presence bitmap with per-insertion history
mod bitmap_index;
/// Scheme configuration and validation
mod config;
/// Error type
mod error;
/// Extendible hashing directory
mod extendible_hashing;
/// Linear hashing with a round-robin split pointer
mod linear_hashing;
/// Capability interface and scheme tag
mod scheme;
/// Active scheme holder
mod session;
/// Addressing and rendering helpers
pub mod utils;

/// Key type stored by every scheme
pub type Key = usize;

pub use bitmap_index::{BitmapIndex, Snapshot};
pub use config::{DEFAULT_BITMAP_SIZE, DEFAULT_LOAD_FACTOR_THRESHOLD, SchemeConfig};
pub use error::HashingError;
pub use extendible_hashing::{ExtendibleHashing, INITIAL_GLOBAL_DEPTH};
pub use linear_hashing::{INITIAL_LEVEL, LinearHashing};
pub use scheme::{HashingScheme, Scheme};
pub use session::Session;
