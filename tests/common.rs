#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(14)
}

/// Sorted file-system-like paths sharing deep prefixes.
pub fn sorted_paths(rng: &mut StdRng, n: usize) -> Vec<Vec<u8>> {
    const PARTS: [&str; 8] = ["usr", "lib", "share", "bin", "local", "x86_64-linux-gnu", "doc", "a"];
    let mut paths: Vec<Vec<u8>> = (0..n)
        .map(|_| {
            let depth = rng.random_range(1..8);
            let mut path = Vec::new();
            for _ in 0..depth {
                path.push(b'/');
                path.extend_from_slice(PARTS[rng.random_range(0..PARTS.len())].as_bytes());
            }
            path
        })
        .collect();
    paths.sort();
    paths
}

/// Random strings over the whole non-zero byte range.
pub fn random_strings(rng: &mut StdRng, n: usize, max_len: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|_| {
            let len = rng.random_range(0..=max_len);
            (0..len).map(|_| rng.random_range(1..=u8::MAX)).collect()
        })
        .collect()
}

/// Strings whose prefix lengths jump across every delta tier, including
/// growths beyond the clamp and shrinks that force a reset.
pub fn tier_crossing_strings() -> Vec<Vec<u8>> {
    let lengths = [
        0, 5, 130, 10, 400, 2, 1_000, 40_000, 39_990, 70_000, 100, 33_200, 0, 382, 383, 0,
    ];
    lengths.iter().map(|&len| vec![b'k'; len]).collect()
}

/// The test cases shared by the round trip suites.
pub fn test_cases() -> Vec<(&'static str, Vec<Vec<u8>>)> {
    let mut rng = rng();
    vec![
        ("single empty string", vec![Vec::new()]),
        ("identical strings", vec![b"same".to_vec(); 50]),
        ("sorted paths", sorted_paths(&mut rng, 2_000)),
        ("random strings", random_strings(&mut rng, 500, 40)),
        ("tier crossings", tier_crossing_strings()),
        (
            "unsorted words",
            ["pear", "apple", "peach", "apricot", "", "banana", "band", "ban"]
                .iter()
                .map(|s| s.as_bytes().to_vec())
                .collect(),
        ),
    ]
}
