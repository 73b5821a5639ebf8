use std::thread;
use std::time::Duration;

use data_encoding::BASE32_NOPAD;
use otpcore::{Clock, SystemClock, Totp, format_secret};
use rand::{Rng, rng};
use tracing_subscriber::EnvFilter;

fn random_secret_bytes(byte_length: usize) -> Vec<u8> {
    let effective_length = byte_length.clamp(10, 128);
    let mut secret = vec![0u8; effective_length];
    rng().fill(&mut secret[..]);
    secret
}

fn main() -> Result<(), otpcore::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let demo_bytes = random_secret_bytes(20);
    let demo_secret = BASE32_NOPAD.encode(&demo_bytes).to_lowercase();
    println!("secret   : {}", format_secret(&demo_secret));

    let base32 = Totp::new(&demo_secret);
    let bytes = Totp::from_bytes(&demo_bytes);
    let now = SystemClock.now_millis()?;

    let x = base32.generate_at(now);
    let y = bytes.generate_at(now);
    if x == y {
        println!("success  : {x}");
    } else {
        println!("fail: Base32 {x} != Bytes {y}");
    }

    println!("hotp demo: {}", base32.generate_hotp(57_856_320));

    let custom = Totp::new(&demo_secret)
        .with_algorithm("Sha256".into())
        .with_digits(8)
        .with_period(60);
    println!("SHA256 8 60: {}", custom.generate()?);
    println!("remaining  : {}s", custom.remaining()?);

    // poll once per second, the way a display would
    for _ in 0..3 {
        let snap = base32.snapshot(&SystemClock)?;
        let marker = if snap.expires_soon() { " (expiring)" } else { "" };
        println!("{} {:>2}s{marker}", snap.code, snap.remaining);
        thread::sleep(Duration::from_secs(1));
    }

    Ok(())
}
