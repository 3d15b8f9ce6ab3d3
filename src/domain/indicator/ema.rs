//! Exponential moving averages.
//!
//! Two flavours are used by the engine:
//! - recursive EMA, seeded with the first observation:
//!   EMA[0] = x[0], EMA[i] = a*x[i] + (1-a)*EMA[i-1], a = 2/(span+1),
//!   evaluated as EMA[i-1] + a*(x[i] - EMA[i-1]) so a flat input stays flat
//! - bias-adjusted exponential mean, where every observation carries weight
//!   (1-a)^age normalised by the sum of weights. With a = 1/n this is
//!   Wilder's smoothing as used by RSI.

/// Recursive EMA over `values`, one output per input.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    let Some(&seed) = iter.next() else {
        return out;
    };
    let mut ema = seed;
    out.push(ema);

    for &x in iter {
        ema += alpha * (x - ema);
        out.push(ema);
    }
    out
}

/// Final bias-adjusted exponential mean with smoothing factor `alpha`, or
/// `None` when fewer than `min_periods` observations are available.
pub fn adjusted_ewm_last(values: &[f64], alpha: f64, min_periods: usize) -> Option<f64> {
    if values.is_empty() || values.len() < min_periods || !(alpha > 0.0 && alpha <= 1.0) {
        return None;
    }

    let decay = 1.0 - alpha;
    let (weighted, weights) = values
        .iter()
        .fold((0.0_f64, 0.0_f64), |(num, den), &x| {
            (x + decay * num, 1.0 + decay * den)
        });
    Some(weighted / weights)
}
