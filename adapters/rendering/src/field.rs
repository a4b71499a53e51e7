//! Winner-take-all influence field evaluation.
//!
//! Every territory radiates a Gaussian blob of influence split according to
//! its control vector. Each pixel is painted in the colour of whichever side
//! scores highest there; colours are never blended, so adjacent factions
//! meet along hard, shimmering seams.

use std::f64::consts::TAU;

use glam::Vec2;
use rayon::prelude::*;
use turf_war_core::{FactionId, Rgb, TerritoryView, NEUTRAL_COLOR};

use crate::{
    buffer::{PixelBuffer, Resolution},
    glow::{self, GlowParams},
    RenderingError,
};

/// Tunable constants shaping the influence field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldParams {
    /// Standard deviation of each territory's blob in unit-square coordinates.
    /// Smaller values give tighter blobs and sharper borders. Must be positive
    /// and finite; see [`FieldParams::validate`].
    pub sigma: f32,
    /// Maximum flow-warp displacement as a fraction of the raster extent.
    pub warp_amplitude: f32,
    /// Influence unowned territories contribute to the neutral score.
    pub neutral_bias: f32,
    /// Multiplier turning the winning score into opacity.
    pub alpha_gain: f32,
    /// Opacity removed after scaling so faint regions fade out completely.
    pub alpha_offset: f32,
    /// Multiplier applied to the inter-faction score spread.
    pub edge_gain: f32,
    /// Upper bound of the border shimmer boost.
    pub edge_cap: f32,
    /// Opacity below which pixels are left fully transparent.
    pub min_alpha: f32,
    /// Global opacity scale applied to every written pixel.
    pub intensity: f32,
    /// Colour of neutral ground.
    pub neutral_color: Rgb,
    /// Bloom pass composited over the raster.
    pub glow: GlowParams,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            sigma: 0.175,
            warp_amplitude: 0.012,
            neutral_bias: 0.2,
            alpha_gain: 1.25,
            alpha_offset: 0.09,
            edge_gain: 0.12,
            edge_cap: 0.22,
            min_alpha: 0.04,
            intensity: 0.62,
            neutral_color: NEUTRAL_COLOR,
            glow: GlowParams::default(),
        }
    }
}

impl FieldParams {
    /// Checks the parameters the field evaluation divides by.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidSigma`] when `sigma` is not a
    /// positive, finite number.
    pub fn validate(&self) -> Result<(), RenderingError> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(RenderingError::InvalidSigma(self.sigma));
        }
        Ok(())
    }
}

/// Single influence emitter derived from a territory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSource {
    /// Position in the unit square.
    pub position: Vec2,
    /// Control fraction (0.0..=1.0) per faction, in canonical order.
    pub control: [f32; FactionId::COUNT],
    /// Whether a faction owns the territory.
    pub owned: bool,
}

/// Owned copy of everything the renderer needs from the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSnapshot {
    sources: Vec<FieldSource>,
}

impl FieldSnapshot {
    /// Creates a snapshot from explicit sources.
    #[must_use]
    pub fn new(sources: Vec<FieldSource>) -> Self {
        Self { sources }
    }

    /// Copies positions, control and ownership out of a territory view.
    #[must_use]
    pub fn from_view(view: &TerritoryView) -> Self {
        let sources = view
            .iter()
            .map(|snapshot| {
                let (x, y) = snapshot.position.normalized();
                let shares = *snapshot.control.as_array();
                FieldSource {
                    position: Vec2::new(x, y),
                    control: shares.map(|share| (share / 100.0) as f32),
                    owned: snapshot.owner.is_some(),
                }
            })
            .collect();
        Self { sources }
    }

    /// Sources captured by the snapshot.
    #[must_use]
    pub fn sources(&self) -> &[FieldSource] {
        &self.sources
    }
}

/// Animation phase driving the flow warp; advances by one per rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationPhase(u64);

impl AnimationPhase {
    /// Creates a phase from a frame counter.
    #[must_use]
    pub const fn new(frame: u64) -> Self {
        Self(frame)
    }

    /// Frame counter backing the phase.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn advance(&mut self, frames: u64) {
        self.0 = self.0.saturating_add(frames);
    }
}

/// Rasterises the influence field for one frame.
///
/// Pure function of its inputs: the same snapshot, phase and resolution always
/// produce the same pixels.
#[must_use]
pub fn rasterize(
    snapshot: &FieldSnapshot,
    phase: AnimationPhase,
    resolution: Resolution,
    params: &FieldParams,
) -> PixelBuffer {
    let mut buffer = evaluate_field(snapshot, phase, resolution, params);
    glow::apply(&mut buffer, &params.glow);
    buffer
}

/// Winner-take-all pass without the bloom composite.
///
/// Parameters rejected by [`FieldParams::validate`] yield a transparent buffer.
#[must_use]
pub fn evaluate_field(
    snapshot: &FieldSnapshot,
    phase: AnimationPhase,
    resolution: Resolution,
    params: &FieldParams,
) -> PixelBuffer {
    let mut buffer = PixelBuffer::transparent(resolution);
    if snapshot.sources.is_empty() || params.validate().is_err() {
        return buffer;
    }

    let width = resolution.width();
    let height = resolution.height();
    let x_step = 1.0 / (width - 1) as f32;
    let y_step = 1.0 / (height - 1) as f32;
    let flow = FlowPhase::new(phase);
    let inv_two_sigma_sq = 1.0 / (2.0 * params.sigma * params.sigma);
    let palette = Palette::new(params.neutral_color);
    let stride = buffer.row_stride();

    buffer
        .bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(row, pixels)| {
            let y0 = row as f32 * y_step;
            for (column, rgba) in pixels.chunks_exact_mut(4).enumerate() {
                let x0 = column as f32 * x_step;
                let sample = flow.warp(x0, y0, params.warp_amplitude);
                let scores = accumulate(&snapshot.sources, sample, inv_two_sigma_sq, params);
                if let Some((color, alpha)) = shade(&scores, params, &palette) {
                    rgba.copy_from_slice(&[color.red(), color.green(), color.blue(), alpha]);
                }
            }
        });

    buffer
}

/// Accumulated influence at one sample point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Scores {
    factions: [f32; FactionId::COUNT],
    neutral: f32,
}

fn accumulate(
    sources: &[FieldSource],
    sample: Vec2,
    inv_two_sigma_sq: f32,
    params: &FieldParams,
) -> Scores {
    let mut scores = Scores::default();
    for source in sources {
        let weight = (-sample.distance_squared(source.position) * inv_two_sigma_sq).exp();
        for (score, share) in scores.factions.iter_mut().zip(source.control) {
            *score += weight * share;
        }
        if !source.owned {
            scores.neutral += weight * params.neutral_bias;
        }
    }
    scores
}

/// Picks the winning colour and straight-alpha byte, or `None` for transparent pixels.
fn shade(scores: &Scores, params: &FieldParams, palette: &Palette) -> Option<(Rgb, u8)> {
    let mut winner = None;
    let mut best = scores.neutral;
    for (index, score) in scores.factions.iter().enumerate() {
        if *score > best {
            best = *score;
            winner = Some(index);
        }
    }

    let mut alpha = (best * params.alpha_gain).clamp(0.0, 1.0);
    alpha = (alpha - params.alpha_offset).max(0.0);

    let [a, b, c] = scores.factions;
    let edge = (a - b).abs() + (b - c).abs() + (c - a).abs();
    alpha = (alpha + (edge * params.edge_gain).min(params.edge_cap)).min(1.0);

    if alpha < params.min_alpha {
        return None;
    }

    let color = winner.map_or(palette.neutral, |index| palette.factions[index]);
    let byte = (255.0 * params.intensity * alpha).floor().clamp(0.0, 255.0) as u8;
    Some((color, byte))
}

struct Palette {
    factions: [Rgb; FactionId::COUNT],
    neutral: Rgb,
}

impl Palette {
    fn new(neutral: Rgb) -> Self {
        Self {
            factions: FactionId::ALL.map(FactionId::color),
            neutral,
        }
    }
}

/// Per-frame phase offsets of the two flow-noise lookups, reduced modulo 2π.
struct FlowPhase {
    primary: [f32; 3],
    secondary: [f32; 3],
}

impl FlowPhase {
    const SECONDARY_OFFSET: f64 = 7.0;

    fn new(phase: AnimationPhase) -> Self {
        let t = phase.get() as f64;
        Self {
            primary: Self::offsets(t),
            secondary: Self::offsets(t + Self::SECONDARY_OFFSET),
        }
    }

    fn offsets(t: f64) -> [f32; 3] {
        [
            (t * 0.13).rem_euclid(TAU) as f32,
            (-t * 0.11).rem_euclid(TAU) as f32,
            (t * 0.09).rem_euclid(TAU) as f32,
        ]
    }

    fn warp(&self, x0: f32, y0: f32, amplitude: f32) -> Vec2 {
        Vec2::new(
            x0 + flow_noise(x0, y0, &self.primary) * amplitude,
            y0 + flow_noise(y0, x0, &self.secondary) * amplitude,
        )
    }
}

/// Band-limited trigonometric noise in `-1.0..=1.0`.
fn flow_noise(x: f32, y: f32, offsets: &[f32; 3]) -> f32 {
    let a = (x * 8.3 + offsets[0]).sin() + (y * 7.1 + offsets[1]).cos();
    let b = ((x + y) * 5.7 + offsets[2]).sin();
    (a + b) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(x: f32, y: f32, control: [f32; 3], owned: bool) -> FieldSource {
        FieldSource {
            position: Vec2::new(x, y),
            control,
            owned,
        }
    }

    #[test]
    fn flow_noise_stays_within_unit_band() {
        for frame in [0_u64, 1, 17, 10_000, u64::from(u32::MAX)] {
            let flow = FlowPhase::new(AnimationPhase::new(frame));
            for step in 0..=20 {
                let v = step as f32 / 20.0;
                let warped = flow.warp(v, 1.0 - v, 0.012);
                assert!((warped.x - v).abs() <= 0.012 + 1e-6);
                assert!((warped.y - (1.0 - v)).abs() <= 0.012 + 1e-6);
            }
        }
    }

    #[test]
    fn ties_favour_neutral_then_enumeration_order() {
        let params = FieldParams::default();
        let palette = Palette::new(params.neutral_color);

        let neutral_tie = Scores {
            factions: [0.5, 0.5, 0.5],
            neutral: 0.5,
        };
        let (color, _) = shade(&neutral_tie, &params, &palette).expect("visible");
        assert_eq!(color, NEUTRAL_COLOR);

        let faction_tie = Scores {
            factions: [0.2, 0.6, 0.6],
            neutral: 0.1,
        };
        let (color, _) = shade(&faction_tie, &params, &palette).expect("visible");
        assert_eq!(color, FactionId::Hyperliquid.color());
    }

    #[test]
    fn alpha_shaping_matches_reference_curve() {
        let params = FieldParams::default();
        let palette = Palette::new(params.neutral_color);

        let strong = Scores {
            factions: [1.0, 0.0, 0.0],
            neutral: 0.0,
        };
        let (_, alpha) = shade(&strong, &params, &palette).expect("visible");
        assert_eq!(alpha, (255.0_f32 * 0.62).floor() as u8);

        let faint = Scores {
            factions: [0.05, 0.0, 0.0],
            neutral: 0.0,
        };
        assert!(shade(&faint, &params, &palette).is_none());
    }

    #[test]
    fn contested_blob_shows_only_faction_colours() {
        let snapshot = FieldSnapshot::new(vec![
            source(0.3, 0.5, [1.0, 0.0, 0.0], true),
            source(0.7, 0.5, [0.0, 0.0, 1.0], true),
        ]);
        let params = FieldParams::default();
        let buffer = evaluate_field(&snapshot, AnimationPhase::new(3), Resolution::square(32), &params);

        let base = FactionId::Base.color();
        let monad = FactionId::Monad.color();
        for rgba in buffer.as_bytes().chunks_exact(4).filter(|rgba| rgba[3] > 0) {
            let rgb = Rgb::from_rgb(rgba[0], rgba[1], rgba[2]);
            assert!(rgb == base || rgb == monad, "blended colour {rgb:?}");
        }

        let left = buffer.pixel(9, 16).expect("in bounds");
        let right = buffer.pixel(22, 16).expect("in bounds");
        assert_eq!(&left[..3], &[base.red(), base.green(), base.blue()]);
        assert_eq!(&right[..3], &[monad.red(), monad.green(), monad.blue()]);
    }

    #[test]
    fn non_positive_sigma_is_rejected_and_renders_nothing() {
        let snapshot = FieldSnapshot::new(vec![source(0.5, 0.5, [1.0, 0.0, 0.0], true)]);
        for sigma in [0.0, -0.2, f32::NAN, f32::INFINITY] {
            let params = FieldParams {
                sigma,
                ..FieldParams::default()
            };
            assert!(matches!(params.validate(), Err(RenderingError::InvalidSigma(_))));
            let buffer = evaluate_field(&snapshot, AnimationPhase::new(0), Resolution::square(16), &params);
            assert_eq!(buffer.opaque_pixel_count(), 0, "sigma {sigma}");
        }
        assert_eq!(FieldParams::default().validate(), Ok(()));
    }

    #[test]
    fn empty_snapshot_renders_transparent() {
        let snapshot = FieldSnapshot::new(Vec::new());
        let buffer = rasterize(
            &snapshot,
            AnimationPhase::default(),
            Resolution::square(8),
            &FieldParams::default(),
        );
        assert_eq!(buffer.opaque_pixel_count(), 0);
    }
}
