//! Color clustering by k-means.
//!
//! This is batch k-means (a.k.a. Lloyd's algorithm) using squared Euclidean distance directly on
//! the `0..=255` sRGB channel values. No color space conversion takes place.
//!
//! Each iteration assigns every sample to its nearest centroid (ties go to the lowest index)
//! and then moves every centroid to the mean of its members. A centroid without members keeps
//! its previous position. Iteration stops once no centroid channel moves by more than
//! [`KmeansOptions::epsilon`] or after [`KmeansOptions::max_iterations`] iterations.
//!
//! The initial centroids are `k` distinct colors sampled at random from the input, so a color
//! is picked with a chance proportional to the number of samples it covers.
//! If the input has fewer than `k` distinct colors, the remaining centroids are duplicates of
//! existing colors. When a seed is provided, the output is reproducible bit for bit.

// Lloyd, S. Least squares quantization in PCM.
// IEEE Transactions on Information Theory, vol. 28, no. 2, 129–137, 1982.
// https://doi.org/10.1109/TIT.1982.1056489

use crate::{ColorSlice, Palette, PaletteError};
use log::{debug, trace, warn};
use ordered_float::OrderedFloat;
use palette::{cast, Srgb};
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::index,
    SeedableRng,
};
use rand_xoshiro::Xoroshiro128PlusPlus;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The number of color channels.
const N: usize = 3;

/// The various options for k-means clustering.
///
/// # Examples
/// ```
/// # use swatchify::kmeans::KmeansOptions;
/// KmeansOptions::new()
///     .max_iterations(100)
///     .epsilon(1e-3)
///     .seed(Some(42))
///     .pad_centroids(false);
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmeansOptions {
    /// The maximum number of assignment and update steps.
    max_iterations: u32,
    /// The largest per channel centroid movement still counted as converged.
    epsilon: OrderedFloat<f64>,
    /// The seed for the random number generator.
    seed: Option<u64>,
    /// Whether to allow more clusters than there are samples.
    pad_centroids: bool,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    pub const fn new() -> Self {
        Self {
            max_iterations: 300,
            epsilon: OrderedFloat(1e-4),
            seed: None,
            pad_centroids: true,
        }
    }

    /// Sets the maximum number of iterations. Values below `1` are treated as `1`.
    ///
    /// The default is `300`.
    pub const fn max_iterations(self, max_iterations: u32) -> Self {
        let max_iterations = if max_iterations == 0 { 1 } else { max_iterations };
        Self { max_iterations, ..self }
    }

    /// Sets the convergence threshold: iteration stops once no centroid channel
    /// moves by more than `epsilon` between two iterations.
    ///
    /// The default is `1e-4`.
    pub const fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon: OrderedFloat(epsilon), ..self }
    }

    /// Sets the seed for choosing the initial centroids.
    ///
    /// With `None`, the random number generator is seeded from the operating system
    /// and results may differ from run to run. The default is `None`.
    pub const fn seed(self, seed: Option<u64>) -> Self {
        Self { seed, ..self }
    }

    /// Sets whether `k` may exceed the number of samples, in which case
    /// some centroids are duplicates of others.
    ///
    /// The default is `true`.
    pub const fn pad_centroids(self, pad_centroids: bool) -> Self {
        Self { pad_centroids, ..self }
    }

    /// Returns the current maximum number of iterations.
    #[must_use]
    pub const fn get_max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Returns the current convergence threshold.
    #[must_use]
    pub const fn get_epsilon(&self) -> f64 {
        self.epsilon.0
    }

    /// Returns the current seed.
    #[must_use]
    pub const fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns whether padding centroids is allowed.
    #[must_use]
    pub const fn get_pad_centroids(&self) -> bool {
        self.pad_centroids
    }
}

/// The result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansOutput {
    /// The final centroids in cluster index order.
    pub palette: Palette,
    /// The number of samples assigned to each centroid in the last assignment step.
    ///
    /// The counts sum to the number of samples, but some may be zero.
    pub counts: Vec<u32>,
    /// The number of iterations that were run.
    pub iterations: u32,
    /// The total squared distance of the samples to their assigned centroids,
    /// one entry per iteration.
    pub inertia: Vec<f64>,
    /// Whether the centroids settled before reaching the iteration limit.
    pub converged: bool,
}

#[inline]
fn squared_euclidean_distance(x: [f64; N], y: [f64; N]) -> f64 {
    let mut dist = 0.0;
    for c in 0..N {
        let d = x[c] - y[c];
        dist += d * d;
    }
    dist
}

/// Returns the index of and the distance to the nearest centroid.
#[inline]
fn nearest(centroids: &[[f64; N]], color: [f64; N]) -> (usize, f64) {
    let mut min_index = 0;
    let mut min_distance = f64::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = squared_euclidean_distance(centroid, color);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    (min_index, min_distance)
}

/// Per cluster sums and counts for one assignment step.
#[derive(Debug, Clone)]
struct Accumulator {
    /// The channel sums of each cluster's members.
    sums: Vec<[u64; N]>,
    /// The number of members of each cluster.
    counts: Vec<u32>,
    /// The total squared distance from each sample to its centroid.
    inertia: f64,
}

impl Accumulator {
    fn new(k: usize) -> Self {
        Self {
            sums: vec![[0; N]; k],
            counts: vec![0; k],
            inertia: 0.0,
        }
    }

    fn assign(samples: &[[u8; N]], centroids: &[[f64; N]]) -> Self {
        let mut acc = Self::new(centroids.len());
        for &color in samples {
            let (i, distance) = nearest(centroids, color.map(f64::from));
            for c in 0..N {
                acc.sums[i][c] += u64::from(color[c]);
            }
            acc.counts[i] += 1;
            acc.inertia += distance;
        }
        acc
    }

    #[cfg(feature = "threads")]
    fn merge(mut self, other: Self) -> Self {
        for (sum, other) in self.sums.iter_mut().zip(other.sums) {
            for c in 0..N {
                sum[c] += other[c];
            }
        }
        for (count, other) in self.counts.iter_mut().zip(other.counts) {
            *count += other;
        }
        self.inertia += other.inertia;
        self
    }
}

/// Returns the distinct colors in `samples` in sorted order
/// alongside the number of times each color occurs.
fn color_counts(samples: &[[u8; N]]) -> (Vec<[u8; N]>, Vec<u32>) {
    // sorted so that the choice depends only on the multiset of colors and the seed
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let mut colors = Vec::new();
    let mut counts = Vec::<u32>::new();
    for color in sorted {
        match (colors.last(), counts.last_mut()) {
            (Some(&last), Some(count)) if last == color => *count += 1,
            _ => {
                colors.push(color);
                counts.push(1);
            }
        }
    }
    (colors, counts)
}

/// Picks the initial centroids from the distinct colors in `samples`,
/// weighting each color by its number of occurrences.
#[allow(clippy::unwrap_used)]
fn initial_centroids(
    samples: &[[u8; N]],
    k: usize,
    rng: &mut Xoroshiro128PlusPlus,
) -> Vec<[f64; N]> {
    let (colors, counts) = color_counts(samples);
    let to_f64 = |color: [u8; N]| color.map(f64::from);

    if colors.len() >= k {
        debug!("choosing {k} initial centroids from {} distinct colors", colors.len());
        // sample_weighted fails only on negative or NaN weights,
        // but every count is a positive integer
        index::sample_weighted(rng, colors.len(), |i| counts[i], k)
            .unwrap()
            .into_iter()
            .map(|i| to_f64(colors[i]))
            .collect()
    } else {
        warn!(
            "only {} distinct colors for {k} clusters, duplicating centroids",
            colors.len()
        );
        // WeightedIndex::new fails only if there are no weights or they sum to zero,
        // but samples is non-empty and every count is > 0
        let distribution = WeightedIndex::new(&counts).unwrap();
        let mut centroids = colors.iter().copied().map(to_f64).collect::<Vec<_>>();
        centroids.extend((colors.len()..k).map(|_| to_f64(colors[distribution.sample(rng)])));
        centroids
    }
}

/// The cluster state of a single k-means run.
struct State<'a> {
    /// The color samples being clustered.
    samples: &'a [[u8; N]],
    /// The current centroid of each cluster.
    centroids: Vec<[f64; N]>,
}

impl<'a> State<'a> {
    fn new(
        samples: ColorSlice<'a>,
        k: usize,
        options: KmeansOptions,
    ) -> Result<Self, PaletteError> {
        if samples.is_empty() {
            return Err(PaletteError::EmptyInput);
        }
        if k == 0 || (k > samples.len() && !options.pad_centroids) {
            return Err(PaletteError::InvalidClusterCount { k, num_samples: samples.len() });
        }

        let mut rng = match options.seed {
            Some(seed) => Xoroshiro128PlusPlus::seed_from_u64(seed),
            None => Xoroshiro128PlusPlus::from_entropy(),
        };

        let samples = cast::into_array_slice(<&[Srgb<u8>]>::from(samples));
        let centroids = initial_centroids(samples, k, &mut rng);

        Ok(Self { samples, centroids })
    }

    /// Moves each centroid to the mean of its members and returns the largest channel movement.
    fn update(&mut self, acc: &Accumulator) -> f64 {
        let mut max_shift = 0.0_f64;
        let clusters = self.centroids.iter_mut().zip(&acc.sums).zip(&acc.counts);
        for ((centroid, sum), &count) in clusters {
            if count == 0 {
                continue;
            }
            let count = f64::from(count);
            for c in 0..N {
                #[allow(clippy::cast_precision_loss)]
                let mean = sum[c] as f64 / count;
                max_shift = max_shift.max((mean - centroid[c]).abs());
                centroid[c] = mean;
            }
        }
        max_shift
    }

    fn run(
        mut self,
        options: KmeansOptions,
        assign: impl Fn(&[[u8; N]], &[[f64; N]]) -> Accumulator,
    ) -> KmeansOutput {
        let mut iterations = 0;
        let mut inertia = Vec::new();
        let mut counts = Vec::new();
        let mut converged = false;

        while iterations < options.max_iterations {
            let acc = assign(self.samples, &self.centroids);
            iterations += 1;
            inertia.push(acc.inertia);

            let shift = self.update(&acc);
            trace!(
                "k-means iteration {iterations}: inertia {:.3}, max shift {shift:.6}",
                acc.inertia
            );

            counts = acc.counts;
            if shift <= options.epsilon.0 {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("k-means converged after {iterations} iterations");
        } else {
            debug!("k-means stopped at the limit of {iterations} iterations");
        }

        let palette = self
            .centroids
            .into_iter()
            .map(cast::from_array::<Srgb<f64>>)
            .collect();

        KmeansOutput {
            palette: Palette::new_unchecked(palette),
            counts,
            iterations,
            inertia,
            converged,
        }
    }
}

/// Clusters `samples` into `k` clusters and returns the centroids along with run statistics.
///
/// # Errors
/// - [`PaletteError::EmptyInput`] if `samples` is empty.
/// - [`PaletteError::InvalidClusterCount`] if `k` is zero, or if `k` is larger than the number of
///   samples and [`KmeansOptions::pad_centroids`] is disabled.
///
/// # Examples
/// ```
/// # use swatchify::{kmeans::{self, KmeansOptions}, ColorSlice, PaletteError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let colors = vec![Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
/// let samples = ColorSlice::try_from(colors.as_slice())?;
/// let output = kmeans::cluster(samples, 2, KmeansOptions::new().seed(Some(0)))?;
/// assert_eq!(output.palette.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn cluster(
    samples: ColorSlice,
    k: usize,
    options: KmeansOptions,
) -> Result<KmeansOutput, PaletteError> {
    let state = State::new(samples, k, options)?;
    Ok(state.run(options, Accumulator::assign))
}

/// Clusters `samples` into `k` clusters and returns only the centroids.
///
/// See [`cluster`] for more details.
///
/// # Errors
/// See [`cluster`].
pub fn palette(
    samples: ColorSlice,
    k: usize,
    options: KmeansOptions,
) -> Result<Palette, PaletteError> {
    cluster(samples, k, options).map(|output| output.palette)
}

/// Runs the assignment step in parallel over chunks of the samples.
#[cfg(feature = "threads")]
fn assign_par(samples: &[[u8; N]], centroids: &[[f64; N]]) -> Accumulator {
    let chunk_size = samples.len().div_ceil(rayon::current_num_threads()).max(1);
    samples
        .par_chunks(chunk_size)
        .map(|chunk| Accumulator::assign(chunk, centroids))
        .reduce(|| Accumulator::new(centroids.len()), Accumulator::merge)
}

/// Clusters `samples` into `k` clusters, running the assignment step in parallel.
///
/// The centroids, counts, and iterations are identical to those of [`cluster`] for the
/// same input and seed. The reported inertia may differ by floating point rounding.
///
/// # Errors
/// See [`cluster`].
#[cfg(feature = "threads")]
pub fn cluster_par(
    samples: ColorSlice,
    k: usize,
    options: KmeansOptions,
) -> Result<KmeansOutput, PaletteError> {
    let state = State::new(samples, k, options)?;
    Ok(state.run(options, assign_par))
}

/// Clusters `samples` into `k` clusters in parallel and returns only the centroids.
///
/// # Errors
/// See [`cluster`].
#[cfg(feature = "threads")]
pub fn palette_par(
    samples: ColorSlice,
    k: usize,
    options: KmeansOptions,
) -> Result<Palette, PaletteError> {
    cluster_par(samples, k, options).map(|output| output.palette)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::tests::*;

    fn seeded(seed: u64) -> KmeansOptions {
        KmeansOptions::new().seed(Some(seed))
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let centroids = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
        assert_eq!(nearest(&centroids, [1.0, 0.0, 0.0]), (0, 1.0));
    }

    #[test]
    fn empty_input() {
        let samples = ColorSlice::from_truncated(&[]);
        let result = cluster(samples, 5, seeded(0));
        assert!(matches!(result, Err(PaletteError::EmptyInput)));
    }

    #[test]
    fn zero_clusters() {
        let colors = test_data_1024();
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();
        let result = cluster(samples, 0, seeded(0));
        assert!(matches!(
            result,
            Err(PaletteError::InvalidClusterCount { k: 0, num_samples: 1024 })
        ));
    }

    #[test]
    fn more_clusters_than_samples() {
        let colors = &test_data_1024()[..3];
        let samples = ColorSlice::try_from(colors).unwrap();

        let result = cluster(samples, 4, seeded(0).pad_centroids(false));
        assert!(matches!(
            result,
            Err(PaletteError::InvalidClusterCount { k: 4, num_samples: 3 })
        ));

        let output = cluster(samples, 4, seeded(0)).unwrap();
        assert_eq!(output.palette.len(), 4);
        assert_eq!(output.counts.iter().sum::<u32>(), 3);
    }

    #[test]
    fn k_centroids_in_range() {
        let colors = test_data_1024();
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();

        for k in 1..=16 {
            let output = cluster(samples, k, seeded(7)).unwrap();
            assert_eq!(output.palette.len(), k);
            assert_eq!(output.counts.len(), k);
            assert_eq!(output.counts.iter().sum::<u32>(), samples.num_samples());
            for centroid in output.palette.iter() {
                for c in [centroid.red, centroid.green, centroid.blue] {
                    assert!(c.is_finite());
                    assert!((0.0..=255.0).contains(&c));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_palette() {
        let colors = test_data_1024();
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();

        let a = cluster(samples, 8, seeded(42)).unwrap();
        let b = cluster(samples, 8, seeded(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn inertia_does_not_increase() {
        let colors = test_data_1024();
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();

        for max_iterations in [1, 3, 50] {
            let options = seeded(3).max_iterations(max_iterations);
            let output = cluster(samples, 6, options).unwrap();
            assert!(output.iterations <= max_iterations);
            assert_eq!(output.inertia.len(), output.iterations as usize);
            for pair in output.inertia.windows(2) {
                assert!(pair[1] <= pair[0] * (1.0 + 1e-9));
            }
        }
    }

    #[test]
    fn distinct_colors_are_counted() {
        let samples = [[3, 0, 0], [1, 2, 3], [3, 0, 0], [0, 0, 0], [3, 0, 0]];
        let (colors, counts) = color_counts(&samples);
        assert_eq!(colors, vec![[0, 0, 0], [1, 2, 3], [3, 0, 0]]);
        assert_eq!(counts, vec![1, 1, 3]);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn dominant_color_is_usually_the_first_centroid() {
        let mut samples = vec![[0, 0, 0]; 9900];
        samples.extend((0..100).map(|i| [i as u8 + 1, 0, 0]));

        let chosen = (0..1000)
            .filter(|&seed| {
                let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
                initial_centroids(&samples, 1, &mut rng) == vec![[0.0, 0.0, 0.0]]
            })
            .count();
        assert!(chosen > 950, "black chosen in only {chosen} of 1000 seeds");
    }

    #[test]
    fn initial_centroids_are_distinct() {
        let mut samples = vec![[9, 9, 9]; 500];
        samples.extend([[1, 1, 1], [2, 2, 2], [3, 3, 3]]);

        for seed in 0..50 {
            let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
            let mut centroids = initial_centroids(&samples, 4, &mut rng);
            centroids.sort_by(|a, b| a[0].total_cmp(&b[0]));
            assert_eq!(
                centroids,
                vec![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [3.0, 3.0, 3.0], [9.0, 9.0, 9.0]]
            );
        }
    }

    #[test]
    fn zero_max_iterations_runs_once() {
        let options = KmeansOptions::new().max_iterations(0);
        assert_eq!(options.get_max_iterations(), 1);
    }

    #[test]
    fn uniform_color_converges_immediately() {
        let colors = vec![Srgb::new(10, 20, 30); 200 * 200];
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();

        let output = cluster(samples, 5, seeded(0)).unwrap();
        assert!(output.converged);
        assert_eq!(output.iterations, 1);
        assert_eq!(output.palette.len(), 5);
        for &centroid in output.palette.iter() {
            assert_eq!(centroid, Srgb::new(10.0, 20.0, 30.0));
        }
        assert_eq!(output.counts[0], samples.num_samples());
        assert_eq!(output.inertia, vec![0.0]);
    }

    #[test]
    fn separated_groups_are_found() {
        let mut colors = vec![Srgb::new(0, 0, 0); 50];
        colors.extend(vec![Srgb::new(255, 255, 255); 30]);
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();

        let output = cluster(samples, 2, seeded(11)).unwrap();
        let mut found = output.palette.to_srgb_u8();
        found.sort_by_key(|c| c.red);
        assert_eq!(found, vec![Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)]);

        let mut counts = output.counts.clone();
        counts.sort_unstable();
        assert_eq!(counts, vec![30, 50]);
    }

    #[test]
    fn sample_order_does_not_matter() {
        let colors = test_data_1024();
        let mut reversed = colors.clone();
        reversed.reverse();

        let a = palette(ColorSlice::try_from(colors.as_slice()).unwrap(), 5, seeded(9)).unwrap();
        let b = palette(ColorSlice::try_from(reversed.as_slice()).unwrap(), 5, seeded(9)).unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_matches_serial() {
        let colors = test_data_1024();
        let samples = ColorSlice::try_from(colors.as_slice()).unwrap();

        for k in [1, 5, 13] {
            let serial = cluster(samples, k, seeded(5)).unwrap();
            let parallel = cluster_par(samples, k, seeded(5)).unwrap();
            assert_eq!(serial.palette, parallel.palette);
            assert_eq!(serial.counts, parallel.counts);
            assert_eq!(serial.iterations, parallel.iterations);
        }
    }
}
