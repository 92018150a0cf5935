//! Stable short digests for derived class names.
//!
//! The digest is a 32-bit FNV-1a hash computed over the UTF-16 code units of
//! the input, rendered in lowercase base 36 and cut to a fixed width of
//! [`DIGEST_WIDTH`] characters. The algorithm is fixed so that the same
//! canonical token set produces the same class name in every process and on
//! every platform.
//!
//! # Example
//!
//! ```
//! use compile_class::hash::digest;
//!
//! assert_eq!(digest("h-1 w-1"), "prhvrm");
//! assert_eq!(digest("h-1 w-1").len(), 6);
//! ```

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 0x0100_0193;

/// Alphabet used to render digests (base 36, lowercase).
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Width of a rendered digest in characters.
pub const DIGEST_WIDTH: usize = 6;

/// Compute the raw 32-bit FNV-1a hash of `input`'s UTF-16 code units.
pub fn fnv1a_utf16(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Render `value` in base 36, zero-padded and truncated to its last
/// [`DIGEST_WIDTH`] digits.
fn to_base36_fixed(mut value: u32) -> String {
    let mut digits = [b'0'; DIGEST_WIDTH];
    // Fill from the right; higher digits beyond the width are dropped.
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(value % 36) as usize];
        value /= 36;
    }
    digits.iter().map(|&b| b as char).collect()
}

/// Compute the short digest used for derived class names.
pub fn digest(input: &str) -> String {
    to_base36_fixed(fnv1a_utf16(input))
}
