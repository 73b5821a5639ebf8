//! RFC 4226 & RFC 6238 compatible OTP (One-Time Password) engine
//!
//! - **Tolerant secrets**: Base32 input is case-insensitive, separators and padding are skipped
//! - **Never fails on input**: a malformed secret decodes to a short or empty key and still yields a code
//! - **Injected time**: every operation has an explicit-timestamp form, wall clock reads are opt-in
//! - **Multiple Hash Algorithms**: SHA1 (default), SHA256, SHA512
//!
//! # Examples
//!
//! ```
//! use otpcore::{Algorithm, Totp};
//!
//! // RFC 6238 Appendix B, T = 59s
//! let totp = Totp::new("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
//! assert_eq!(totp.generate_at(59_000), "287082");
//! assert_eq!(totp.remaining_at(59_000), 1);
//!
//! // Custom config
//! let custom = Totp::new("jbsw y3dp ehpk 3pxp")
//!     .with_algorithm(Algorithm::Sha256)
//!     .with_digits(8)
//!     .with_period(60);
//! assert_eq!(custom.generate_at(0).len(), 8);
//! ```
//!
//! Free functions cover the common 30-second, 6-digit SHA1 case:
//!
//! ```
//! assert_eq!(otpcore::generate("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ", 1_111_111_109_000), "081804");
//! assert_eq!(otpcore::remaining_time(60_000, 30), 30);
//! ```

mod clock;
mod error;
mod secret;

pub use clock::{Clock, EXPIRY_WARNING_SECS, FixedClock, Snapshot, SystemClock};
pub use error::Error;
pub use secret::{SecretKey, format_secret};

use core::fmt;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

pub const DEFAULT_DIGITS: u8 = 6;
pub const DEFAULT_PERIOD: u64 = 30;
const MIN_DIGITS: u8 = 6;
const MAX_DIGITS: u8 = 8;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Hash algorithms supported by OTP
///
/// RFC 4226 requires HMAC-SHA-1, RFC 6238 extends support for HMAC-SHA-256 and HMAC-SHA-512
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Algorithm {
    /// HMAC-SHA-1 is the default algorithm for most OTP implementations
    #[default]
    Sha1,
    /// HMAC-SHA-256
    Sha256,
    /// HMAC-SHA-512
    Sha512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl From<&str> for Algorithm {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sha256" => Self::Sha256,
            "sha512" => Self::Sha512,
            _ => Self::Sha1,
        }
    }
}

/// Code generation settings
///
/// Out-of-range values are normalised when applied to a [`Totp`], not here,
/// so a config read from a settings file never fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TotpConfig {
    pub algorithm: Algorithm,
    pub digits: u8,
    /// Time step in seconds
    pub period: u64,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }
}

/// RFC 6238: Time-Based One-Time Password
/// TOTP = HOTP(K, T) where T = floor(Unix time / X)
#[derive(Debug, Clone)]
pub struct Totp {
    /// Decoded shared secret
    secret: SecretKey,
    /// RFC 6238 X, in seconds
    period: u64,
    /// The number of digits composing the auth code. [Datatracker](https://datatracker.ietf.org/doc/html/rfc4226#section-5.3)
    digits: u8,
    algorithm: Algorithm,
}

impl Default for Totp {
    fn default() -> Self {
        Self {
            secret: SecretKey::from_bytes(b""),
            period: DEFAULT_PERIOD,
            digits: DEFAULT_DIGITS,
            algorithm: Algorithm::default(),
        }
    }
}

impl Totp {
    /// Create TOTP instance with default config from a Base32 secret
    ///
    /// Default config: SHA1 algorithm, 6 digits, 30-second time step.
    /// Decoding is tolerant, see [`SecretKey::from_base32`].
    pub fn new<S: AsRef<str>>(secret: S) -> Self {
        Self::from_key(SecretKey::from_base32(secret))
    }

    /// Like [`Totp::new`], but refuses empty and sub-80-bit secrets
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySecret`] or [`Error::KeyTooShort`].
    pub fn new_strict<S: AsRef<str>>(secret: S) -> Result<Self, Error> {
        SecretKey::from_base32_strict(secret).map(Self::from_key)
    }

    /// Create TOTP instance directly from raw key bytes
    pub fn from_bytes<S: AsRef<[u8]>>(secret: S) -> Self {
        Self::from_key(SecretKey::from_bytes(secret))
    }

    /// Create TOTP instance from an already decoded key
    #[must_use]
    pub fn from_key(secret: SecretKey) -> Self {
        Self {
            secret,
            ..Default::default()
        }
    }

    /// Create TOTP instance from a Base32 secret and stored settings
    pub fn from_config<S: AsRef<str>>(secret: S, config: &TotpConfig) -> Self {
        Self::new(secret)
            .with_algorithm(config.algorithm)
            .with_digits(config.digits)
            .with_period(config.period)
    }

    /// Configure hash algorithm
    #[must_use]
    pub const fn with_algorithm(mut self, algo: Algorithm) -> Self {
        self.algorithm = algo;
        self
    }

    /// Configure the number of verification code digits, clamped to 6-8
    #[must_use]
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits.clamp(MIN_DIGITS, MAX_DIGITS);
        self
    }

    /// Configure time step in seconds, 0 is raised to 1
    #[must_use]
    pub const fn with_period(mut self, period: u64) -> Self {
        self.period = if period == 0 { 1 } else { period };
        self
    }

    /// Settings currently in effect
    #[must_use]
    pub const fn config(&self) -> TotpConfig {
        TotpConfig {
            algorithm: self.algorithm,
            digits: self.digits,
            period: self.period,
        }
    }

    #[must_use]
    pub const fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Generate the code for the current system time
    ///
    /// # Errors
    ///
    /// Returns an error when system time retrieval fails
    pub fn generate(&self) -> Result<String, Error> {
        Ok(self.generate_at(SystemClock.now_millis()?))
    }

    /// Generate the code valid at `time_millis` (Unix time in milliseconds)
    #[must_use]
    pub fn generate_at(&self, time_millis: u64) -> String {
        self.derive(&counter_bytes(time_millis, self.period))
    }

    /// RFC 4226 HOTP for an explicit counter value
    #[must_use]
    pub fn generate_hotp(&self, counter: u64) -> String {
        self.derive(&counter.to_be_bytes())
    }

    /// RFC 6238: T = floor(Unix time / X)
    #[must_use]
    pub const fn counter_at(&self, time_millis: u64) -> u64 {
        time_millis / 1000 / self.period
    }

    /// Seconds left in the period containing `time_millis`, in `1..=period`
    #[must_use]
    pub fn remaining_at(&self, time_millis: u64) -> u64 {
        remaining_time(time_millis, self.period)
    }

    /// Seconds left in the current period
    ///
    /// # Errors
    ///
    /// Returns an error when system time retrieval fails.
    pub fn remaining(&self) -> Result<u64, Error> {
        Ok(self.remaining_at(SystemClock.now_millis()?))
    }

    /// Code and timing metadata for one instant
    #[must_use]
    pub fn snapshot_at(&self, time_millis: u64) -> Snapshot {
        Snapshot {
            code: self.generate_at(time_millis),
            remaining: self.remaining_at(time_millis),
            period: self.period,
        }
    }

    /// Code and timing metadata for the instant reported by `clock`
    ///
    /// # Errors
    ///
    /// Propagates the clock's error.
    pub fn snapshot<C: Clock + ?Sized>(&self, clock: &C) -> Result<Snapshot, Error> {
        Ok(self.snapshot_at(clock.now_millis()?))
    }

    fn derive(&self, message: &[u8]) -> String {
        format_code(self.compute_hmac(message), self.digits)
    }

    /// RFC 4226: HOTP(K,C) = Truncate(HMAC(K,C))
    fn compute_hmac(&self, message: &[u8]) -> u32 {
        let key = self.secret.as_bytes();
        match self.algorithm {
            Algorithm::Sha1 => compute_with_mac(keyed::<HmacSha1>(key), message),
            Algorithm::Sha256 => compute_with_mac(keyed::<HmacSha256>(key), message),
            Algorithm::Sha512 => compute_with_mac(keyed::<HmacSha512>(key), message),
        }
    }
}

/// HMAC is defined for keys of any length, including empty ones
fn keyed<M: Mac + KeyInit>(key: &[u8]) -> M {
    match <M as KeyInit>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    }
}

#[inline]
fn compute_with_mac<M: Mac>(mut mac: M, message: &[u8]) -> u32 {
    mac.update(message);
    truncate(&mac.finalize().into_bytes())
}

/// Generate the 6-digit SHA1 code for a Base32 secret at `time_millis`
///
/// Never fails: a secret with no valid Base32 characters is an empty key.
#[must_use]
pub fn generate(secret: &str, time_millis: u64) -> String {
    Totp::new(secret).generate_at(time_millis)
}

/// [`generate`] at the current system time
///
/// # Errors
///
/// Returns an error when system time retrieval fails.
pub fn generate_now(secret: &str) -> Result<String, Error> {
    Totp::new(secret).generate()
}

/// 8-byte big-endian moving factor for `time_millis`
///
/// The counter occupies the low 4 bytes as an unsigned 32-bit value; the high
/// 4 bytes are always zero. Counters past `u32::MAX` (about year 6053 at 30s,
/// 2106 at 1s) wrap.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn counter_bytes(time_millis: u64, period: u64) -> [u8; 8] {
    let counter = (time_millis / 1000 / period.max(1)) as u32;
    let [a, b, c, d] = counter.to_be_bytes();
    [0, 0, 0, 0, a, b, c, d]
}

/// Seconds left in the period containing `now_millis`
///
/// `period - (floor(now_millis / 1000) mod period)`. At an exact multiple of
/// the period this is `period`, never 0.
#[must_use]
pub fn remaining_time(now_millis: u64, period: u64) -> u64 {
    let period = period.max(1);
    period - (now_millis / 1000) % period
}

/// [`remaining_time`] at the current system time
///
/// # Errors
///
/// Returns an error when system time retrieval fails.
pub fn remaining_time_now(period: u64) -> Result<u64, Error> {
    Ok(remaining_time(SystemClock.now_millis()?, period))
}

/// RFC 4226 §5.3: Dynamic truncation
///
/// The low nibble of the last digest byte selects 4 bytes, read big-endian
/// with the most significant bit masked off.
///
/// All supported digests are at least 20 bytes, so the window always fits.
#[must_use]
#[inline]
pub fn truncate(digest: &[u8]) -> u32 {
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;

    debug_assert!(
        offset + 4 <= digest.len(),
        "digest of {} bytes too short for offset {offset}",
        digest.len()
    );

    u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ])
}

/// Reduce a truncated value modulo 10^digits and zero-pad it
///
/// `digits` is clamped to 6-8.
#[must_use]
pub fn format_code(value: u32, digits: u8) -> String {
    let digits = digits.clamp(MIN_DIGITS, MAX_DIGITS);
    let code = value % 10u32.pow(u32::from(digits));
    format!("{code:0width$}", width = usize::from(digits))
}
