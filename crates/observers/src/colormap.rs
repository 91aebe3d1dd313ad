//! Color scales for density plots.

/// Approximates matplotlib's viridis map (purple through teal to yellow).
///
/// `t` is clamped to `[0, 1]`.
#[must_use]
pub fn viridis(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let r = 0.267 + t * (0.329 - 0.267 + t * (0.984 - 0.329));
    let g = 0.005 + t * (0.569 - 0.005 + t * (0.906 - 0.569));
    let b = 0.329 + t * (0.758 - 0.329 - t * (0.758 - 0.121));

    [r, g, b].map(to_byte)
}

/// Colors a hexbin cell by its count relative to the fullest cell.
///
/// Counts are scaled linearly so that a single point maps to the bottom of the
/// scale and `max` to the top.
#[must_use]
pub fn count_color(count: usize, max: usize) -> [u8; 3] {
    if max <= 1 {
        return viridis(1.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let t = (count.saturating_sub(1)) as f64 / (max - 1) as f64;
    viridis(t)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}
