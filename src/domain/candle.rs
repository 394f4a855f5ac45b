//! OHLC candle and candle series representation.

use crate::domain::error::QuizError;

/// A single open/high/low/close candle.
///
/// Construction goes through [`Candle::new`], which enforces
/// `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Result<Self, QuizError> {
        if ![open, high, low, close].iter().all(|v| v.is_finite()) {
            return Err(QuizError::InvalidCandle {
                reason: format!(
                    "non-finite price in (open={open}, high={high}, low={low}, close={close})"
                ),
            });
        }
        if low > open.min(close) {
            return Err(QuizError::InvalidCandle {
                reason: format!("low {low} is above the body bottom {}", open.min(close)),
            });
        }
        if high < open.max(close) {
            return Err(QuizError::InvalidCandle {
                reason: format!("high {high} is below the body top {}", open.max(close)),
            });
        }
        Ok(Self {
            open,
            high,
            low,
            close,
        })
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    /// |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// high - max(open, close)
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// min(open, close) - low
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Chronologically ordered candles; index 0 is the earliest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// The trailing `n` candles (or all of them when fewer exist).
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    /// Splits into the visible prefix and the final (hidden) candle.
    pub fn split_last(&self) -> Option<(CandleSeries, Candle)> {
        let (last, rest) = self.candles.split_last()?;
        Some((CandleSeries::new(rest.to_vec()), *last))
    }

    /// Lowest low and highest high across the series.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.candles.is_empty() {
            return None;
        }
        let low = self
            .candles
            .iter()
            .map(|c| c.low)
            .fold(f64::INFINITY, f64::min);
        let high = self
            .candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((low, high))
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candle() -> Candle {
        Candle::new(100.0, 110.0, 90.0, 105.0).unwrap()
    }

    #[test]
    fn accessors() {
        let c = sample_candle();
        assert_eq!(c.open(), 100.0);
        assert_eq!(c.high(), 110.0);
        assert_eq!(c.low(), 90.0);
        assert_eq!(c.close(), 105.0);
    }

    #[test]
    fn body_and_wicks() {
        let c = sample_candle();
        assert!((c.body() - 5.0).abs() < f64::EPSILON);
        assert!((c.range() - 20.0).abs() < f64::EPSILON);
        // 110 - 105
        assert!((c.upper_wick() - 5.0).abs() < f64::EPSILON);
        // 100 - 90
        assert!((c.lower_wick() - 10.0).abs() < f64::EPSILON);
        assert!(c.is_bullish());
    }

    #[test]
    fn flat_candle_is_valid() {
        let c = Candle::new(100.0, 100.0, 100.0, 100.0).unwrap();
        assert_eq!(c.range(), 0.0);
        assert!(!c.is_bullish());
    }

    #[test]
    fn rejects_low_above_body() {
        let err = Candle::new(100.0, 102.0, 100.5, 101.0).unwrap_err();
        assert!(matches!(err, QuizError::InvalidCandle { .. }));
    }

    #[test]
    fn rejects_high_below_body() {
        let err = Candle::new(100.0, 100.5, 99.0, 101.0).unwrap_err();
        assert!(matches!(err, QuizError::InvalidCandle { .. }));
    }

    #[test]
    fn rejects_nan() {
        assert!(Candle::new(f64::NAN, 101.0, 99.0, 100.0).is_err());
        assert!(Candle::new(100.0, f64::INFINITY, 99.0, 100.0).is_err());
    }

    #[test]
    fn series_tail_and_split() {
        let candles: Vec<Candle> = (0..5)
            .map(|i| {
                let p = 100.0 + i as f64;
                Candle::new(p, p + 1.5, p - 0.5, p + 1.0).unwrap()
            })
            .collect();
        let series = CandleSeries::new(candles);

        assert_eq!(series.tail(3).len(), 3);
        assert_eq!(series.tail(3)[0].open(), 102.0);
        assert_eq!(series.tail(10).len(), 5);

        let (visible, hidden) = series.split_last().unwrap();
        assert_eq!(visible.len(), 4);
        assert_eq!(hidden.open(), 104.0);
    }

    #[test]
    fn empty_series() {
        let series = CandleSeries::default();
        assert!(series.is_empty());
        assert!(series.split_last().is_none());
        assert!(series.price_bounds().is_none());
    }

    #[test]
    fn price_bounds_span_all_candles() {
        let series = CandleSeries::new(vec![
            Candle::new(100.0, 101.0, 99.0, 100.5).unwrap(),
            Candle::new(100.5, 103.0, 100.0, 102.0).unwrap(),
        ]);
        assert_eq!(series.price_bounds(), Some((99.0, 103.0)));
    }
}
