//! Cheap bloom: a blurred, dimmed copy of the raster added over itself.

use crate::buffer::PixelBuffer;

/// Settings for the additive glow pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowParams {
    /// Blur radius as a fraction of the longer raster side.
    pub radius_fraction: f32,
    /// Opacity of the blurred copy when added back.
    pub opacity: f32,
}

impl GlowParams {
    /// Glow settings that leave the raster untouched.
    pub const DISABLED: Self = Self {
        radius_fraction: 0.0,
        opacity: 0.0,
    };
}

impl Default for GlowParams {
    fn default() -> Self {
        Self {
            radius_fraction: 0.03,
            opacity: 0.2,
        }
    }
}

/// Composites a box-blurred copy of `buffer` additively in premultiplied space.
pub(crate) fn apply(buffer: &mut PixelBuffer, params: &GlowParams) {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let longest = width.max(height) as f32;
    let radius = (params.radius_fraction * longest).round();
    if params.opacity <= 0.0 || !radius.is_finite() || radius < 1.0 {
        return;
    }
    let radius = radius as usize;

    let source = premultiply(buffer.as_bytes());
    let mut blurred = blur_rows(&source, width, height, radius);
    blurred = blur_columns(&blurred, width, height, radius);

    for ((rgba, base), glow) in buffer
        .bytes_mut()
        .chunks_exact_mut(4)
        .zip(&source)
        .zip(&blurred)
    {
        let mut combined = [0.0_f32; 4];
        for channel in 0..4 {
            combined[channel] = (base[channel] + glow[channel] * params.opacity).min(1.0);
        }
        rgba.copy_from_slice(&unpremultiply(combined));
    }
}

fn premultiply(bytes: &[u8]) -> Vec<[f32; 4]> {
    bytes
        .chunks_exact(4)
        .map(|rgba| {
            let alpha = f32::from(rgba[3]) / 255.0;
            [
                f32::from(rgba[0]) / 255.0 * alpha,
                f32::from(rgba[1]) / 255.0 * alpha,
                f32::from(rgba[2]) / 255.0 * alpha,
                alpha,
            ]
        })
        .collect()
}

fn unpremultiply(pixel: [f32; 4]) -> [u8; 4] {
    let alpha = pixel[3];
    if alpha <= 0.0 {
        return [0; 4];
    }
    let to_byte = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        to_byte(pixel[0] / alpha),
        to_byte(pixel[1] / alpha),
        to_byte(pixel[2] / alpha),
        to_byte(alpha),
    ]
}

/// Horizontal box blur; samples outside the raster count as transparent.
fn blur_rows(pixels: &[[f32; 4]], width: usize, height: usize, radius: usize) -> Vec<[f32; 4]> {
    let mut out = vec![[0.0; 4]; pixels.len()];
    for row in 0..height {
        let line = &pixels[row * width..(row + 1) * width];
        blur_line(
            |index| line[index],
            |index, value| out[row * width + index] = value,
            width,
            radius,
        );
    }
    out
}

/// Vertical box blur; samples outside the raster count as transparent.
fn blur_columns(pixels: &[[f32; 4]], width: usize, height: usize, radius: usize) -> Vec<[f32; 4]> {
    let mut out = vec![[0.0; 4]; pixels.len()];
    for column in 0..width {
        blur_line(
            |index| pixels[index * width + column],
            |index, value| out[index * width + column] = value,
            height,
            radius,
        );
    }
    out
}

fn blur_line(
    read: impl Fn(usize) -> [f32; 4],
    mut write: impl FnMut(usize, [f32; 4]),
    len: usize,
    radius: usize,
) {
    let window = (2 * radius + 1) as f32;
    let mut sum = [0.0_f32; 4];
    for index in 0..radius.min(len) {
        add(&mut sum, read(index), 1.0);
    }

    for index in 0..len {
        let entering = index + radius;
        if entering < len {
            add(&mut sum, read(entering), 1.0);
        }
        write(index, sum.map(|channel| channel.max(0.0) / window));
        if index >= radius {
            add(&mut sum, read(index - radius), -1.0);
        }
    }
}

fn add(sum: &mut [f32; 4], value: [f32; 4], sign: f32) {
    for (total, channel) in sum.iter_mut().zip(value) {
        *total += channel * sign;
    }
}
