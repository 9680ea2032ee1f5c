use crate::models::RasterMask;

/// Global threshold binarization of an 8-bit intensity buffer.
///
/// Pixels strictly above `threshold` become foreground. Used to remove the
/// fractional edge values a bilinear warp leaves behind.
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> RasterMask {
    let mut binary = RasterMask::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if gray[idx] > threshold {
                binary.set(x, y, true);
            }
        }
    }

    binary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = vec![100, 150, 200, 127]; // 2x2 image
        let binary = threshold_binarize(&gray, 2, 2, 127);

        assert!(!binary.get(0, 0)); // 100 <= 127
        assert!(binary.get(1, 0)); // 150 > 127
        assert!(binary.get(0, 1)); // 200 > 127
        assert!(!binary.get(1, 1)); // exactly at threshold stays background
    }

    #[test]
    fn test_output_is_strictly_binary() {
        let gray: Vec<u8> = (0..=255).collect();
        let binary = threshold_binarize(&gray, 16, 16, 127);
        assert_eq!(binary.count_ones(), 128);
    }
}
