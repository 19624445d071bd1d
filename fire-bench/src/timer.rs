//! Frames-per-second measurement over sampled images.

use crate::{common::*, detector::Detector};

/// Inference calls on a synthetic image before timing starts.
pub const WARMUP_ITERATIONS: usize = 10;

/// Throughput timer options.
#[derive(Debug, Clone)]
pub struct ThroughputTimerInit {
    /// Side length of the square synthetic warm-up image.
    pub image_size: u32,
    pub warmup_iterations: usize,
}

impl Default for ThroughputTimerInit {
    fn default() -> Self {
        Self {
            image_size: 640,
            warmup_iterations: WARMUP_ITERATIONS,
        }
    }
}

impl ThroughputTimerInit {
    pub fn build(self) -> Result<ThroughputTimer> {
        let Self {
            image_size,
            warmup_iterations,
        } = self;
        ensure!(image_size > 0, "image_size must be positive");

        Ok(ThroughputTimer {
            image_size,
            warmup_iterations,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ThroughputTimer {
    image_size: u32,
    warmup_iterations: usize,
}

/// Timing aggregated over the decodable samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Throughput {
    /// Number of timed inference calls.
    pub num_timed: usize,
    /// Samples that failed to decode.
    pub num_skipped: usize,
    /// Mean inference latency, absent when nothing was timed.
    pub mean_latency: Option<Duration>,
    pub fps: f64,
}

impl Throughput {
    /// The result of a run without any usable sample.
    pub fn empty() -> Self {
        Self {
            num_timed: 0,
            num_skipped: 0,
            mean_latency: None,
            fps: 0.0,
        }
    }

    /// Aggregate per-call latencies into the mean and its inverse.
    pub fn from_latencies(latencies: &[Duration], num_skipped: usize) -> Self {
        if latencies.is_empty() {
            return Self {
                num_skipped,
                ..Self::empty()
            };
        }

        let total: Duration = latencies.iter().sum();
        let mean = total / latencies.len() as u32;
        let fps = if total.is_zero() {
            warn!("inference is faster than the clock resolution, FPS is reported as 0");
            0.0
        } else {
            latencies.len() as f64 / total.as_secs_f64()
        };

        Self {
            num_timed: latencies.len(),
            num_skipped,
            mean_latency: Some(mean),
            fps,
        }
    }
}

impl ThroughputTimer {
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Warm the model up on random noise, then time one inference call per
    /// decodable sample. Decoding is not timed and undecodable samples are
    /// skipped.
    pub fn run<D, R>(&self, model: &mut D, samples: &[PathBuf], rng: &mut R) -> Result<Throughput>
    where
        D: Detector + ?Sized,
        R: Rng + ?Sized,
    {
        let dummy = {
            let size = self.image_size;
            let image = RgbImage::from_fn(size, size, |_, _| Rgb(rng.gen::<[u8; 3]>()));
            DynamicImage::ImageRgb8(image)
        };

        debug!("warm up with {} iterations", self.warmup_iterations);
        for _ in 0..self.warmup_iterations {
            model.infer(&dummy)?;
        }

        let mut latencies = Vec::with_capacity(samples.len());
        let mut num_skipped = 0;

        for path in samples {
            let image = match image::open(path) {
                Ok(image) => image,
                Err(err) => {
                    debug!("skip unreadable image '{}': {}", path.display(), err);
                    num_skipped += 1;
                    continue;
                }
            };

            let instant = Instant::now();
            model.infer(&image)?;
            latencies.push(instant.elapsed());
        }

        if num_skipped > 0 {
            warn!("{} of {} samples could not be decoded", num_skipped, samples.len());
        }

        Ok(Throughput::from_latencies(&latencies, num_skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn from_latencies_test() {
        let latencies = [
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(30),
        ];
        let throughput = Throughput::from_latencies(&latencies, 1);
        assert_eq!(throughput.num_timed, 3);
        assert_eq!(throughput.num_skipped, 1);
        assert_eq!(throughput.mean_latency, Some(Duration::from_millis(20)));
        assert_abs_diff_eq!(throughput.fps, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn no_latency_means_zero_fps() {
        let throughput = Throughput::from_latencies(&[], 4);
        assert_eq!(throughput.fps, 0.0);
        assert_eq!(throughput.mean_latency, None);
        assert_eq!(throughput.num_skipped, 4);
    }

    #[test]
    fn fps_stays_finite_below_clock_resolution() {
        let throughput = Throughput::from_latencies(&[Duration::ZERO; 3], 0);
        assert_eq!(throughput.mean_latency, Some(Duration::ZERO));
        assert_eq!(throughput.fps, 0.0);

        // a mean that truncates to zero nanoseconds
        let latencies = [Duration::from_nanos(1), Duration::ZERO, Duration::ZERO];
        let throughput = Throughput::from_latencies(&latencies, 0);
        assert_eq!(throughput.mean_latency, Some(Duration::ZERO));
        assert!(throughput.fps.is_finite());
        assert_abs_diff_eq!(throughput.fps, 3e9, epsilon = 1e-3);
    }

    #[test]
    fn zero_image_size_is_rejected() {
        let init = ThroughputTimerInit {
            image_size: 0,
            ..Default::default()
        };
        assert!(init.build().is_err());
    }
}
