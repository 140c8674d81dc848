use rand::{CryptoRng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A freshly seeded RNG for randomized tests.
///
/// The seed is printed on construction so that a failing run can be
/// replayed with [`rng_from_seed`].
pub fn reproducible_rng() -> impl Rng + CryptoRng {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill(&mut seed);
    println!("RNG seed (pass to rng_from_seed to replay this run):");
    println!("let seed: [u8; 32] = {:?};", &seed);
    rng_from_seed(seed)
}

/// The deterministic generator behind [`reproducible_rng`], for replaying a
/// recorded seed.
pub fn rng_from_seed(seed: [u8; 32]) -> impl Rng + CryptoRng {
    ChaCha20Rng::from_seed(seed)
}
