//! Bounded random samples of a resolved split.

use crate::{common::*, resolve::ResolvedImageSet};

/// Create the random generator for one run. Without a seed every run
/// draws a different sample.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draw `min(num_samples, images.len())` distinct paths by shuffling the
/// whole set and keeping the head.
pub fn sample_images<R>(images: &ResolvedImageSet, num_samples: usize, rng: &mut R) -> Vec<PathBuf>
where
    R: Rng + ?Sized,
{
    let mut paths = images.paths().to_vec();
    paths.shuffle(rng);
    paths.truncate(num_samples);
    paths
}
