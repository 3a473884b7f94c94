#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Interleaved 3-channel 8-bit image.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h*3
}

impl RgbImageView<'_> {
    /// Expected buffer length for the declared dimensions.
    pub fn expected_len(width: usize, height: usize) -> Option<usize> {
        width.checked_mul(height)?.checked_mul(3)
    }

    pub fn is_consistent(&self) -> bool {
        Self::expected_len(self.width, self.height) == Some(self.data.len())
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let o = (y * self.width + x) * 3;
        [self.data[o], self.data[o + 1], self.data[o + 2]]
    }

    /// Luma conversion with BT.601 weights.
    pub fn to_gray(&self) -> GrayImage {
        let data = self
            .data
            .chunks_exact(3)
            .map(|c| {
                let l = 0.299 * c[0] as f32 + 0.587 * c[1] as f32 + 0.114 * c[2] as f32;
                l.round().clamp(0.0, 255.0) as u8
            })
            .collect();
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Inclusive pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl PixelRect {
    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let r = PixelRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        (r.x0 <= r.x1 && r.y0 <= r.y1).then_some(r)
    }
}

/// Binary raster with the dimensions of the source image.
///
/// Pixels are stored as 0 / 255. The bounding box of the set pixels is
/// computed once on construction so adjacency tests can skip distant pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
    bounds: Option<PixelRect>,
}

impl Mask {
    /// Empty mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
            bounds: None,
        }
    }

    /// Wrap a row-major buffer; any non-zero value counts as set.
    pub fn from_raw(width: usize, height: usize, mut data: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height)? != data.len() {
            return None;
        }
        for v in &mut data {
            if *v != 0 {
                *v = 255;
            }
        }
        let bounds = compute_bounds(width, height, &data);
        Some(Self {
            width,
            height,
            data,
            bounds,
        })
    }

    /// Pixels set in `outer` and not set in `inner`.
    pub fn ring(outer: &Mask, inner: &Mask) -> Option<Self> {
        if outer.width != inner.width || outer.height != inner.height {
            return None;
        }
        let data = outer
            .data
            .iter()
            .zip(&inner.data)
            .map(|(&o, &i)| if o != 0 && i == 0 { 255 } else { 0 })
            .collect();
        Self::from_raw(outer.width, outer.height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn bounds(&self) -> Option<PixelRect> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x] != 0
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// True when the masks share a pixel or a set pixel of one is an
    /// 8-neighbour of a set pixel of the other.
    ///
    /// Rings cut from the same edge loop meet along a shared boundary
    /// without sharing pixels, so adjacency has to count.
    pub fn touches(&self, other: &Mask) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        let (Some(a), Some(b)) = (self.bounds, other.bounds) else {
            return false;
        };
        let grown = PixelRect {
            x0: a.x0.saturating_sub(1),
            y0: a.y0.saturating_sub(1),
            x1: (a.x1 + 1).min(self.width - 1),
            y1: (a.y1 + 1).min(self.height - 1),
        };
        let Some(r) = grown.intersect(&b) else {
            return false;
        };
        (r.y0..=r.y1).any(|y| {
            (r.x0..=r.x1).any(|x| other.data[y * self.width + x] != 0 && self.any_near(x, y))
        })
    }

    fn any_near(&self, x: usize, y: usize) -> bool {
        let xs = x.saturating_sub(1)..=(x + 1).min(self.width - 1);
        (y.saturating_sub(1)..=(y + 1).min(self.height - 1)).any(|yy| {
            let row = yy * self.width;
            xs.clone().any(|xx| self.data[row + xx] != 0)
        })
    }

    /// Iterate over the coordinates of set pixels in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(move |(i, _)| (i % w, i / w))
    }
}

fn compute_bounds(width: usize, height: usize, data: &[u8]) -> Option<PixelRect> {
    let mut rect: Option<PixelRect> = None;
    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        let Some(first) = row.iter().position(|&v| v != 0) else {
            continue;
        };
        let last = row.iter().rposition(|&v| v != 0).unwrap_or(first);
        rect = Some(match rect {
            None => PixelRect {
                x0: first,
                y0: y,
                x1: last,
                y1: y,
            },
            Some(r) => PixelRect {
                x0: r.x0.min(first),
                y0: r.y0,
                x1: r.x1.max(last),
                y1: y,
            },
        });
    }
    rect
}
