//! Input patterns.
//!
//! Every random pattern draws from a generator seeded with [`random_init_seed`] and the
//! requested length, so a given seed reproduces the exact same inputs.

use std::env;
use std::ops::Range;

use once_cell::sync::Lazy;
use rand::prelude::*;
use zipf::ZipfDistribution;

static SEED: Lazy<u64> = Lazy::new(|| {
    let seed = env::var("SORT_TEST_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| thread_rng().gen());

    println!("\nSeed: {seed}\n");
    seed
});

/// Seed of this test run, from `SORT_TEST_SEED` if set.
pub fn random_init_seed() -> u64 {
    *SEED
}

fn rng_for(len: usize) -> StdRng {
    StdRng::seed_from_u64(random_init_seed() ^ (len as u64).rotate_left(32))
}

// --- Random ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    let mut rng = rng_for(len);
    (0..len).map(|_| rng.gen::<i32>()).collect()
}

/// Uniformly distributed values in `range`.
pub fn random_uniform(len: usize, range: Range<i32>) -> Vec<i32> {
    // :.:.:.::

    let mut rng = rng_for(len);
    let dist = rand::distributions::Uniform::from(range);
    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

/// Zipfian distributed values, a few values very common and a long tail of rare ones.
pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    // https://en.wikipedia.org/wiki/Zipf's_law

    let mut rng = rng_for(len);
    let dist = match ZipfDistribution::new(len.max(1), exponent) {
        Ok(dist) => dist,
        Err(()) => panic!("invalid zipf exponent {exponent}"),
    };
    (0..len).map(|_| dist.sample(&mut rng) as i32).collect()
}

// --- Sorted ---

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    (0..len).map(|_| 66).collect()
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

/// `saw_count` ascending runs of random values.
pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    let mut vals = random(len);
    for chunk in vals.chunks_mut((len / saw_count.max(1)).max(1)) {
        chunk.sort_unstable();
    }
    vals
}

/// `saw_count` descending runs of random values.
pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    let mut vals = random(len);
    for chunk in vals.chunks_mut((len / saw_count.max(1)).max(1)) {
        chunk.sort_unstable_by(|a, b| b.cmp(a));
    }
    vals
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut vals = random(len);
    let first_half = &mut vals[0..(len / 2)];
    first_half.sort_unstable();

    let second_half = &mut vals[(len / 2)..len];
    second_half.sort_unstable_by(|a, b| b.cmp(a));

    vals
}

/// Musser's sequence that drives a median-of-3 quicksort into quadratic time.
pub fn median3_killer(len: usize) -> Vec<i32> {
    let k = len / 2;
    let mut vals = vec![0; len];

    for i in (0..k).step_by(2) {
        vals[i] = (i + 1) as i32;
        vals[i + 1] = (k + i + 1) as i32;
    }
    for i in 0..k {
        vals[k + i] = (2 * (i + 1)) as i32;
    }
    if len % 2 == 1 {
        vals[len - 1] = len as i32;
    }

    vals
}
