use crate::{common::*, detector::Detector};

/// Parameter counts are reported in units of 2^20 elements, labelled "MB".
pub const PARAMS_PER_MB: f64 = (1u64 << 20) as f64;

/// Sum of the element counts divided by 2^20.
pub fn params_mb<I>(numels: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let total: u64 = numels.into_iter().map(|numel| numel as u64).sum();
    total as f64 / PARAMS_PER_MB
}

pub fn model_params_mb<D>(model: &D) -> Result<f64>
where
    D: Detector + ?Sized,
{
    Ok(params_mb(model.parameter_numels()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn params_mb_test() {
        assert_abs_diff_eq!(params_mb(vec![]), 0.0);
        assert_abs_diff_eq!(params_mb(vec![1 << 20]), 1.0);
        assert_abs_diff_eq!(params_mb(vec![1 << 19, 1 << 18, 1 << 18]), 1.0);
        assert_abs_diff_eq!(params_mb(vec![11_166_560]), 10.649_261_474_609_375);
    }

    #[test]
    fn doubling_numel_doubles_size() {
        [1usize, 3, 1000, 123_457, 7 << 20].iter().for_each(|&numel| {
            let single = params_mb(vec![numel, 64]);
            let double = params_mb(vec![numel * 2, 128]);
            assert_abs_diff_eq!(double, single * 2.0, epsilon = 1e-12);
        });
    }
}
