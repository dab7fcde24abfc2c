use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Returns a random alphanumeric string of a certain size.
#[must_use]
pub fn string(size: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(size).map(char::from).collect()
}

/// Returns `n` random bytes, for example to build an info-hash.
#[must_use]
pub fn bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    thread_rng().fill(&mut bytes[..]);
    bytes
}
