//! Random-walk candle sequences for the next-candle prediction exercise.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::domain::candle::{Candle, CandleSeries};
use crate::domain::error::QuizError;

pub const MIN_WALK_LENGTH: usize = 2;
pub const DEFAULT_WALK_LENGTH: usize = 10;

/// Parameters of the driftless Gaussian walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub start_price: f64,
    /// Standard deviation of each close-to-close increment.
    pub sigma: f64,
    pub shadow_min: f64,
    pub shadow_max: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            sigma: 0.6,
            shadow_min: 0.1,
            shadow_max: 0.5,
        }
    }
}

impl WalkParams {
    pub fn validate(&self) -> Result<(), QuizError> {
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(invalid("start_price", "must be positive"));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(invalid("sigma", "must be positive"));
        }
        if !self.shadow_min.is_finite() || self.shadow_min < 0.0 {
            return Err(invalid("shadow_min", "must be non-negative"));
        }
        if !self.shadow_max.is_finite() || self.shadow_max < self.shadow_min {
            return Err(invalid("shadow_max", "must not be below shadow_min"));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> QuizError {
    QuizError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Generate an `length`-candle walk with the default parameters.
pub fn generate_walk<R: Rng + ?Sized>(
    length: usize,
    rng: &mut R,
) -> Result<CandleSeries, QuizError> {
    generate_walk_with(length, &WalkParams::default(), rng)
}

/// Candle `i` opens at `p[i]` and closes at `p[i + 1]`, where `p[0]` is the
/// start price and each step adds an `N(0, sigma)` increment.
pub fn generate_walk_with<R: Rng + ?Sized>(
    length: usize,
    params: &WalkParams,
    rng: &mut R,
) -> Result<CandleSeries, QuizError> {
    if length < MIN_WALK_LENGTH {
        return Err(QuizError::InvalidLength {
            length,
            minimum: MIN_WALK_LENGTH,
        });
    }
    params.validate()?;

    let increment = Normal::new(0.0, params.sigma).map_err(|e| invalid("sigma", &e.to_string()))?;

    let mut candles = Vec::with_capacity(length);
    let mut price = params.start_price;
    for _ in 0..length {
        let open = price;
        let close = price + increment.sample(rng);
        let high = open.max(close) + rng.gen_range(params.shadow_min..=params.shadow_max);
        let low = open.min(close) - rng.gen_range(params.shadow_min..=params.shadow_max);
        candles.push(Candle::new(open, high, low, close)?);
        price = close;
    }

    debug!(length, sigma = params.sigma, "generated random walk");
    Ok(CandleSeries::new(candles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn length_one_is_rejected() {
        let err = generate_walk(1, &mut StdRng::seed_from_u64(1)).unwrap_err();
        match err {
            QuizError::InvalidLength { length, minimum } => {
                assert_eq!(length, 1);
                assert_eq!(minimum, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(generate_walk(0, &mut StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn length_two_succeeds() {
        let series = generate_walk(2, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn candles_chain_open_to_previous_close() {
        let series = generate_walk(DEFAULT_WALK_LENGTH, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(series.len(), DEFAULT_WALK_LENGTH);
        assert_eq!(series.candles()[0].open(), 100.0);
        for pair in series.candles().windows(2) {
            assert_eq!(pair[1].open(), pair[0].close());
        }
    }

    #[test]
    fn shadows_stay_within_bounds() {
        let params = WalkParams::default();
        let series = generate_walk_with(50, &params, &mut StdRng::seed_from_u64(11)).unwrap();
        for c in &series {
            assert!(c.upper_wick() >= params.shadow_min - 1e-9);
            assert!(c.upper_wick() <= params.shadow_max + 1e-9);
            assert!(c.lower_wick() >= params.shadow_min - 1e-9);
            assert!(c.lower_wick() <= params.shadow_max + 1e-9);
        }
    }

    #[test]
    fn custom_start_price() {
        let params = WalkParams {
            start_price: 42.0,
            ..WalkParams::default()
        };
        let series = generate_walk_with(3, &params, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(series.candles()[0].open(), 42.0);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let zero_sigma = WalkParams {
            sigma: 0.0,
            ..WalkParams::default()
        };
        assert!(matches!(
            generate_walk_with(5, &zero_sigma, &mut rng),
            Err(QuizError::InvalidParameter { .. })
        ));

        let inverted = WalkParams {
            shadow_min: 0.6,
            shadow_max: 0.2,
            ..WalkParams::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn same_seed_same_walk() {
        let a = generate_walk(10, &mut StdRng::seed_from_u64(21)).unwrap();
        let b = generate_walk(10, &mut StdRng::seed_from_u64(21)).unwrap();
        assert_eq!(a, b);
    }
}
