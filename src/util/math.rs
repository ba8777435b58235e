//! Numeric helpers for sampling and score reporting.

/// Maps a sampling rate in `(0, 1]` to a pixel stride of `max(1, floor(1 / rate))`.
///
/// Rates at or above one, and rates that are not finite and positive, map to
/// stride 1 (every pixel).
pub(crate) fn sampling_stride(rate: f32) -> usize {
    if !rate.is_finite() || rate <= 0.0 || rate >= 1.0 {
        return 1;
    }
    let stride = (1.0 / rate).floor();
    if stride >= usize::MAX as f32 {
        return usize::MAX;
    }
    (stride as usize).max(1)
}

/// Scales a `[0, 1]` score to a percentage rounded to two decimals.
pub(crate) fn percent_2dp(score: f32) -> f64 {
    let pct = f64::from(score) * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Inclusive window `[center - radius, center + radius]` clamped to `[0, max]`.
pub(crate) fn clamped_window(center: usize, radius: usize, max: usize) -> (usize, usize) {
    let lo = center.saturating_sub(radius).min(max);
    let hi = center.saturating_add(radius).min(max);
    (lo, hi)
}
