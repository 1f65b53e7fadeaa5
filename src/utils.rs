//! Addressing and rendering helpers shared by the hashing schemes

use crate::{HashingScheme, Key};
use std::fmt;

/// Returns `key mod 2^depth`, i.e. the low `depth` bits of the key.
///
/// Depths of at least `usize::BITS` keep the whole key.
#[must_use]
pub fn bucket_index(key: Key, depth: u32) -> usize {
    match 1_usize.checked_shl(depth) {
        Some(modulus) => key & modulus.wrapping_sub(1),
        None => key,
    }
}

/// Renders `index` as a binary string zero-padded to `width` digits
#[must_use]
pub fn binary_label(index: usize, width: u32) -> String {
    let width = usize::try_from(width).unwrap_or(usize::MAX);
    format!("{index:0width$b}")
}

/// Renders a bit sequence the way the control panel prints it: `[0, 1, 1]`
#[must_use]
pub fn render_bits(bits: &[bool]) -> String {
    let mut out = String::from("[");
    for (position, &bit) in bits.iter().enumerate() {
        if position > 0 {
            out.push_str(", ");
        }
        out.push(if bit { '1' } else { '0' });
    }
    out.push(']');
    out
}

/// Writes buckets as `Bucket <label>: [k1, k2]` lines separated by newlines, without a
/// trailing newline
pub(crate) fn render_buckets<I, B>(f: &mut fmt::Formatter<'_>, buckets: I) -> fmt::Result
where
    I: IntoIterator<Item = (String, B)>,
    B: AsRef<[Key]>,
{
    for (position, (label, keys)) in buckets.into_iter().enumerate() {
        if position > 0 {
            f.write_str("\n")?;
        }
        write!(f, "Bucket {label}: {:?}", keys.as_ref())?;
    }
    Ok(())
}

/// Builds a scheme by inserting every key of the iterator in order
pub fn from_keys<S, I>(iter: I) -> S
where
    S: HashingScheme + Default,
    I: IntoIterator<Item = Key>,
{
    let mut scheme = S::default();

    for key in iter {
        scheme.insert(key);
    }

    scheme
}
