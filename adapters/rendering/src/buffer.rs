//! Output resolution and RGBA8 pixel storage.

/// Smallest raster side; the field samples both edges of each axis.
pub const MIN_SIDE: u32 = 2;

/// Largest raster side accepted before requests are clamped.
pub const MAX_SIDE: u32 = 1024;

/// Highest device pixel ratio honoured when scaling a quality setting.
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

/// Raster dimensions, always clamped into `MIN_SIDE..=MAX_SIDE` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Creates a resolution, clamping each axis into the supported range.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_SIDE, MAX_SIDE),
            height: height.clamp(MIN_SIDE, MAX_SIDE),
        }
    }

    /// Creates a square resolution.
    #[must_use]
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Square resolution for a quality setting on a display with the given pixel ratio.
    ///
    /// The ratio is clamped into `1.0..=2.0` to bound the worst-case cost.
    #[must_use]
    pub fn scaled(quality: u32, device_pixel_ratio: f32) -> Self {
        let ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        let side = (quality as f32 * ratio).floor();
        Self::square(side.min(MAX_SIDE as f32) as u32)
    }

    /// Number of pixel columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of pixel rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Row-major RGBA8 raster with straight (non-premultiplied) alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub(crate) fn transparent(resolution: Resolution) -> Self {
        Self {
            width: resolution.width(),
            height: resolution.height(),
            data: vec![0; resolution.pixel_count() * 4],
        }
    }

    /// Number of pixel columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of pixel rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// RGBA channels of the pixel at the provided column and row.
    ///
    /// Returns `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[offset..offset + 4]);
        Some(rgba)
    }

    /// Raw bytes, `width × height × 4` long.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, yielding the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels whose alpha channel is non-zero.
    #[must_use]
    pub fn opaque_pixel_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|rgba| rgba[3] > 0).count()
    }

    pub(crate) fn row_stride(&self) -> usize {
        self.width as usize * 4
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
