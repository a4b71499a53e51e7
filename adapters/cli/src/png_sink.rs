//! Frame sink that writes influence-field frames to PNG files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use image::RgbaImage;
use turf_war_rendering::{FrameSink, PixelBuffer};

/// Writes every presented frame to the same PNG path.
#[derive(Debug)]
pub(crate) struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FrameSink for PngSink {
    fn present(&mut self, frame: &PixelBuffer) -> Result<()> {
        let image = RgbaImage::from_raw(frame.width(), frame.height(), frame.as_bytes().to_vec())
            .context("frame bytes do not match its dimensions")?;
        image
            .save(&self.path)
            .with_context(|| format!("failed to write frame to {}", self.path.display()))?;
        tracing::info!(
            path = %self.path.display(),
            width = frame.width(),
            height = frame.height(),
            "frame written"
        );
        Ok(())
    }
}
