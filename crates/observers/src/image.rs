//! Conversion of inspected images to displayable pixels.

use ndarray::Array2;

/// An 8-bit grayscale image in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grayscale {
    /// `[width, height]` in pixels.
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Stretches `image` so its smallest finite value is black and its largest is
/// white.
///
/// A constant image maps to mid-gray; non-finite pixels map to black.
#[must_use]
pub fn grayscale(image: &Array2<f32>) -> Grayscale {
    let (height, width) = image.dim();
    let (lo, hi) = image
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;

    let pixels = image
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                0
            } else if range > 0.0 {
                to_byte((v - lo) / range)
            } else {
                128
            }
        })
        .collect();

    Grayscale {
        size: [width, height],
        pixels,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(level: f32) -> u8 {
    (level * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    #[test]
    fn stretches_to_full_range() {
        let image = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]];

        let gray = grayscale(&image);

        assert_eq!(gray.size, [3, 2]);
        assert_eq!(gray.pixels, [0, 128, 255, 255, 128, 0]);
    }

    #[test]
    fn constant_and_non_finite_pixels() {
        let image = array![[5.0, f32::NAN], [5.0, 5.0]];

        assert_eq!(grayscale(&image).pixels, [128, 0, 128, 128]);
    }
}
