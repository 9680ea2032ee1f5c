/// Bit-packed binary raster; every mask entering the scorer is one of these
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterMask {
    /// Create an all-background mask with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Get mask width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get mask height
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when both masks share dimensions
    pub fn same_shape(&self, other: &RasterMask) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Get pixel at (x, y); out of bounds reads as background
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set pixel at (x, y); out of bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Set every pixel in `[x0, x1) x [y0, y1)` to foreground, clipped to the mask
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let index = y * self.width + x;
                self.data[index / 8] |= 1 << (index % 8);
            }
        }
    }

    /// Number of foreground pixels
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// True when no pixel is foreground
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Foreground pixels present in both masks
    pub fn intersection_count(&self, other: &RasterMask) -> usize {
        debug_assert!(self.same_shape(other));
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Foreground pixels present in either mask
    pub fn union_count(&self, other: &RasterMask) -> usize {
        debug_assert!(self.same_shape(other));
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a | b).count_ones() as usize)
            .sum()
    }

    /// Bounding rectangle `(x0, y0, x1, y1)` of the foreground, half-open
    pub fn foreground_extent(&self) -> Option<(usize, usize, usize, usize)> {
        let mut extent: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                extent = Some(match extent {
                    None => (x, y, x + 1, y + 1),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
                });
            }
        }
        extent
    }
}

impl Default for RasterMask {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
