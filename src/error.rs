use std::time::SystemTimeError;

/// Error type
///
/// Code derivation itself never fails. Only reading the wall clock and the
/// strict secret checks can produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// System time is set to before the Unix epoch
    #[error(
        "System time error: {0}. The system time is set before the Unix epoch (1970-01-01 00:00:00 UTC)"
    )]
    SystemTime(#[from] SystemTimeError),
    /// Secret contains no Base32 characters at all
    #[error("Secret contains no valid Base32 characters (A-Z, 2-7)")]
    EmptySecret,
    /// Secret key is too short for secure TOTP generation
    #[error(
        "Secret key too short: {0} bits. Minimum required: 80 bits (10 bytes) for secure TOTP generation"
    )]
    KeyTooShort(usize),
}
