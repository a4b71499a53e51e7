#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Influence-field renderer shared by Turf War adapters.
//!
//! The renderer never touches the world directly. Adapters capture a
//! [`FieldSnapshot`] from a territory view, advance the [`AnimationClock`]
//! with wall-clock deltas, and hand the resulting [`PixelBuffer`] to a
//! [`FrameSink`] of their choosing.

mod buffer;
mod field;
mod glow;

use anyhow::Result as AnyResult;
use std::{error::Error, fmt, time::Duration};

pub use buffer::{PixelBuffer, Resolution, MAX_DEVICE_PIXEL_RATIO, MAX_SIDE, MIN_SIDE};
pub use field::{
    evaluate_field, rasterize, AnimationPhase, FieldParams, FieldSnapshot, FieldSource,
};
pub use glow::GlowParams;

/// Interval between animation frames when none is configured.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(110);

/// Converts elapsed wall-clock time into whole animation frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationClock {
    frame_interval: Duration,
    accumulator: Duration,
    phase: AnimationPhase,
}

impl AnimationClock {
    /// Creates a clock that advances one frame per `frame_interval`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::ZeroFrameInterval`] when the interval is zero.
    pub fn new(frame_interval: Duration) -> Result<Self, RenderingError> {
        if frame_interval.is_zero() {
            return Err(RenderingError::ZeroFrameInterval);
        }
        Ok(Self {
            frame_interval,
            accumulator: Duration::ZERO,
            phase: AnimationPhase::default(),
        })
    }

    /// Interval between consecutive frames.
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Phase reached so far.
    #[must_use]
    pub const fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Accumulates `dt` and returns how many frames elapsed.
    pub fn advance(&mut self, dt: Duration) -> u64 {
        self.accumulator = self.accumulator.saturating_add(dt);
        let mut frames = 0;
        while self.accumulator >= self.frame_interval {
            self.accumulator -= self.frame_interval;
            frames += 1;
        }
        self.phase.advance(frames);
        frames
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            accumulator: Duration::ZERO,
            phase: AnimationPhase::default(),
        }
    }
}

/// Stateful front end pairing field parameters with an animation clock.
#[derive(Clone, Debug, Default)]
pub struct InfluenceFieldRenderer {
    params: FieldParams,
    clock: AnimationClock,
}

impl InfluenceFieldRenderer {
    /// Creates a renderer with the provided parameters and the default frame interval.
    #[must_use]
    pub fn new(params: FieldParams) -> Self {
        Self {
            params,
            clock: AnimationClock::default(),
        }
    }

    /// Replaces the animation clock with one ticking at `frame_interval`.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderingError::ZeroFrameInterval`].
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Result<Self, RenderingError> {
        self.clock = AnimationClock::new(frame_interval)?;
        Ok(self)
    }

    /// Field parameters used for every frame.
    #[must_use]
    pub const fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Current animation phase.
    #[must_use]
    pub const fn phase(&self) -> AnimationPhase {
        self.clock.phase()
    }

    /// Advances the animation clock, returning the number of frames that elapsed.
    pub fn advance(&mut self, dt: Duration) -> u64 {
        self.clock.advance(dt)
    }

    /// Renders the snapshot at the current phase.
    #[must_use]
    pub fn render(&self, snapshot: &FieldSnapshot, resolution: Resolution) -> PixelBuffer {
        rasterize(snapshot, self.clock.phase(), resolution, &self.params)
    }
}

/// Destination for rendered frames, implemented by adapters.
pub trait FrameSink {
    /// Presents a finished frame.
    fn present(&mut self, frame: &PixelBuffer) -> AnyResult<()>;
}

/// Errors that can occur when configuring the renderer.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The animation clock needs a positive frame interval.
    ZeroFrameInterval,
    /// Blob spread must be a positive, finite number.
    InvalidSigma(f32),
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFrameInterval => write!(f, "frame interval must be positive"),
            Self::InvalidSigma(sigma) => {
                write!(f, "field sigma must be positive and finite (received {sigma})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_emits_one_frame_per_interval() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.advance(Duration::from_millis(100)), 0);
        assert_eq!(clock.advance(Duration::from_millis(20)), 1);
        assert_eq!(clock.advance(Duration::from_millis(330)), 3);
        assert_eq!(clock.phase(), AnimationPhase::new(4));
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let error = AnimationClock::new(Duration::ZERO).expect_err("zero interval rejected");
        assert_eq!(error, RenderingError::ZeroFrameInterval);
        assert_eq!(error.to_string(), "frame interval must be positive");
    }

    #[test]
    fn renderer_tracks_clock_phase() {
        let mut renderer = InfluenceFieldRenderer::new(FieldParams::default())
            .with_frame_interval(Duration::from_millis(50))
            .expect("positive interval");
        assert_eq!(renderer.advance(Duration::from_millis(120)), 2);
        assert_eq!(renderer.phase().get(), 2);
    }

    #[test]
    fn sink_receives_rendered_frame() {
        struct Counting(usize);

        impl FrameSink for Counting {
            fn present(&mut self, frame: &PixelBuffer) -> AnyResult<()> {
                self.0 += frame.as_bytes().len();
                Ok(())
            }
        }

        let renderer = InfluenceFieldRenderer::default();
        let frame = renderer.render(&FieldSnapshot::default(), Resolution::new(4, 3));
        let mut sink = Counting(0);
        sink.present(&frame).expect("present succeeds");
        assert_eq!(sink.0, 4 * 3 * 4);
    }
}
