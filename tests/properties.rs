//! Property-based tests for code generation and timing.

use otpcore::{Totp, counter_bytes, generate, remaining_time};
use proptest::prelude::*;

fn secret_strategy() -> impl Strategy<Value = String> {
    "[A-Z2-7]{0,48}"
}

proptest! {
    /// Output is always exactly six ASCII digits.
    #[test]
    fn code_is_six_digits(secret in ".{0,40}", time in any::<u64>()) {
        let code = generate(&secret, time);
        prop_assert_eq!(code.len(), 6);
        prop_assert!(code.bytes().all(|b| b.is_ascii_digit()));
    }

    /// Same inputs always produce the same output.
    #[test]
    fn generation_is_deterministic(secret in secret_strategy(), time in any::<u64>()) {
        prop_assert_eq!(generate(&secret, time), generate(&secret, time));
    }

    /// Any two instants in one 30s window share a code.
    #[test]
    fn code_is_stable_within_window(
        secret in secret_strategy(),
        window in 0u64..u64::from(u32::MAX),
        a in 0u64..30_000,
        b in 0u64..30_000,
    ) {
        let start = window * 30_000;
        prop_assert_eq!(generate(&secret, start + a), generate(&secret, start + b));
    }

    /// The moving factor increments exactly at the period boundary.
    #[test]
    fn counter_increments_at_boundary(window in 0u64..u64::from(u32::MAX - 1)) {
        let start = window * 30_000;
        prop_assert_eq!(counter_bytes(start, 30), counter_bytes(start + 29_999, 30));
        prop_assert_ne!(counter_bytes(start + 29_999, 30), counter_bytes(start + 30_000, 30));
        prop_assert_eq!(&counter_bytes(start, 30)[..4], &[0u8; 4][..]);
    }

    /// Remaining time is in 1..=period and hits period only on exact multiples.
    #[test]
    fn remaining_time_range(now in any::<u64>(), period in 1u64..=300) {
        let remaining = remaining_time(now, period);
        prop_assert!((1..=period).contains(&remaining));
        prop_assert_eq!(remaining == period, (now / 1000) % period == 0);
    }

    /// Lowercase and separators do not change the code.
    #[test]
    fn separators_and_case_are_ignored(secret in "[A-Z2-7]{1,32}", time in any::<u64>()) {
        let messy: String = secret
            .to_lowercase()
            .chars()
            .enumerate()
            .flat_map(|(i, c)| {
                let sep = match i % 3 {
                    0 => Some(' '),
                    1 => Some('-'),
                    _ => None,
                };
                sep.into_iter().chain(Some(c))
            })
            .collect();
        prop_assert_eq!(generate(&messy, time), generate(&secret, time));
    }

    /// TOTP at time T equals HOTP at counter T / period.
    #[test]
    fn totp_equals_hotp_at_time_step(
        key in proptest::collection::vec(any::<u8>(), 0..64),
        window in 0u64..u64::from(u32::MAX),
    ) {
        let totp = Totp::from_bytes(&key);
        prop_assert_eq!(totp.generate_at(window * 30_000), totp.generate_hotp(window));
    }
}
