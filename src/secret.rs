//! Shared secret decoding
//!
//! Secrets arrive as user-typed Base32 text. Decoding is tolerant: case is
//! ignored and every character outside `A-Z2-7` is skipped, so `"jbsw y3dp"`,
//! `"JBSW-Y3DP"` and `"JBSWY3DP===="` all yield the same key.

use core::fmt;
use data_encoding::BASE32_NOPAD;

use crate::Error;

/// 80 bits, the shortest secret common issuers hand out.
const MIN_STRICT_KEY_BYTES: usize = 10;
/// RFC 4226 R6
const RECOMMENDED_KEY_BYTES: usize = 16;

/// Shared secret container
///
/// Securely store keys with support for automatic memory zeroing (when `zeroize` feature is enabled)
#[derive(Clone)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub struct SecretKey(Box<[u8]>);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl SecretKey {
    /// Decodes a Base32 encoded shared secret, tolerating anything that is not Base32
    ///
    /// The input is uppercased and every character outside `A-Z2-7` is dropped.
    /// The remaining 5-bit groups are packed MSB-first; trailing bits that do not
    /// fill a whole byte are discarded.
    ///
    /// Never fails. A secret without valid characters decodes to an empty key,
    /// which still produces codes. Use [`SecretKey::from_base32_strict`] to reject it.
    pub fn from_base32<S: AsRef<str>>(secret: S) -> Self {
        let (bytes, _) = decode(secret.as_ref());
        Self(bytes.into_boxed_slice())
    }

    /// Decodes a Base32 secret, rejecting ones that are empty or shorter than 80 bits
    ///
    /// Character handling is identical to [`SecretKey::from_base32`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input contains no valid Base32 characters
    /// - The decoded key length is less than 80 bits (10 bytes)
    pub fn from_base32_strict<S: AsRef<str>>(secret: S) -> Result<Self, Error> {
        let (bytes, symbols) = decode(secret.as_ref());

        if symbols == 0 {
            tracing::debug!("rejecting secret without Base32 characters");
            return Err(Error::EmptySecret);
        }
        if bytes.len() < MIN_STRICT_KEY_BYTES {
            tracing::debug!(bits = bytes.len() * 8, "rejecting short secret");
            return Err(Error::KeyTooShort(bytes.len() * 8));
        }

        Ok(Self(bytes.into_boxed_slice()))
    }

    /// Byte array key
    ///
    /// No length validation is performed
    pub fn from_bytes<S: AsRef<[u8]>>(secret: S) -> Self {
        Self(secret.as_ref().to_vec().into_boxed_slice())
    }

    /// Re-encodes the key as unpadded RFC 4648 Base32
    #[must_use]
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(&self.0)
    }

    /// Reference to the shared secret byte array
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of elements in the slice (In bytes)
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the length of 0
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Cleans a secret and groups it in blocks of four for display
///
/// ```
/// assert_eq!(otpcore::format_secret("jbswy3dp-ehpk3pxp"), "JBSW Y3DP EHPK 3PXP");
/// ```
#[must_use]
pub fn format_secret(secret: &str) -> String {
    secret
        .to_uppercase()
        .chars()
        .filter(|&c| symbol_value(c).is_some())
        .enumerate()
        .fold(String::new(), |mut acc, (i, c)| {
            if i > 0 && i % 4 == 0 {
                acc.push(' ');
            }
            acc.push(c);
            acc
        })
}

/// Maps an uppercase character to its index in `ABCDEFGHIJKLMNOPQRSTUVWXYZ234567`
#[inline]
fn symbol_value(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(c as u8 - b'A'),
        '2'..='7' => Some(c as u8 - b'2' + 26),
        _ => None,
    }
}

/// Returns the decoded bytes and the number of Base32 symbols consumed
#[allow(clippy::cast_possible_truncation)]
fn decode(input: &str) -> (Vec<u8>, usize) {
    let upper = input.to_uppercase();
    let mut bytes = Vec::with_capacity(upper.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    let mut symbols = 0usize;
    let mut skipped = 0usize;

    for c in upper.chars() {
        let Some(value) = symbol_value(c) else {
            skipped += 1;
            continue;
        };
        symbols += 1;

        buffer = (buffer << 5) | u32::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            bytes.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    if skipped > 0 {
        tracing::trace!(skipped, "ignored non-Base32 characters in secret");
    }
    if bytes.len() < RECOMMENDED_KEY_BYTES {
        tracing::debug!(
            bits = bytes.len() * 8,
            "key is below the RFC 4226 recommended 128 bits"
        );
    }

    (bytes, symbols)
}
