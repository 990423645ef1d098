//! One separation run, end to end.
//!
//! A run walks `Quantizing -> BuildingChannels -> Ordering -> Done`. Each
//! step consumes the previous [`Run`] value, so a finished run cannot be
//! resumed. Only quantizing can fail the run; channel failures become report
//! data and are also handed to the pipeline's [`FailureSink`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::channel::{BuildChannel, Channel, ChannelBuilder};
use crate::config::SeparationConfig;
use crate::error::{ChannelBuildError, ConfigError};
use crate::image::RasterImage;
use crate::names::{ColorNameResolver, KnownColorTable};
use crate::order::SeparationOrderer;
use crate::palette::PaletteEntry;
use crate::quantize::{PaletteReducer, QuantizedImage};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Quantizing,
    BuildingChannels,
    Ordering,
    Done,
}

/// A palette entry whose channel could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFailure {
    pub palette_index: usize,
    pub color_hex: String,
    pub message: String,
}

impl ChannelFailure {
    fn new(entry: &PaletteEntry, error: &ChannelBuildError) -> Self {
        Self {
            palette_index: entry.index,
            color_hex: entry.hex(),
            message: error.to_string(),
        }
    }
}

/// Receives channel failures as they are recorded.
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: &ChannelFailure);
}

/// Logs each failure at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, failure: &ChannelFailure) {
        tracing::warn!(
            palette_index = failure.palette_index,
            color = %failure.color_hex,
            error = %failure.message,
            "Channel skipped"
        );
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationReport {
    /// Channels in print order.
    pub channels: Vec<Channel>,
    /// Failures in palette index order.
    pub failures: Vec<ChannelFailure>,
    /// The palette the run separated against.
    pub palette: Vec<PaletteEntry>,
}

impl SeparationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// In-flight run. Every transition consumes `self`.
enum Run<'a> {
    Quantizing(&'a RasterImage),
    BuildingChannels(QuantizedImage),
    Ordering {
        quantized: QuantizedImage,
        channels: Vec<Channel>,
        failures: Vec<ChannelFailure>,
    },
    Done(SeparationReport),
}

impl Run<'_> {
    fn state(&self) -> RunState {
        match self {
            Run::Quantizing(_) => RunState::Quantizing,
            Run::BuildingChannels(_) => RunState::BuildingChannels,
            Run::Ordering { .. } => RunState::Ordering,
            Run::Done(_) => RunState::Done,
        }
    }
}

/// Turns a raster into ordered, named spot-color channels.
///
/// ```
/// use spot_separation::{RasterImage, SeparationConfig, SeparationPipeline, Srgb};
///
/// let red = Srgb::new(255, 0, 0);
/// let image = RasterImage::new(2, 2, vec![red, red, Srgb::WHITE, Srgb::WHITE]).unwrap();
/// let pipeline = SeparationPipeline::new(SeparationConfig::default().color_count(2)).unwrap();
/// let report = pipeline.run(&image).unwrap();
///
/// assert_eq!(report.channels.len(), 2);
/// assert_eq!(report.channels[0].name, "PANTONE 186 C");
/// ```
pub struct SeparationPipeline {
    config: SeparationConfig,
    reducer: PaletteReducer,
    builder: Box<dyn BuildChannel>,
    resolver: ColorNameResolver,
    orderer: SeparationOrderer,
    sink: Box<dyn FailureSink>,
}

impl std::fmt::Debug for SeparationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeparationPipeline")
            .field("config", &self.config)
            .field("reducer", &self.reducer)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl SeparationPipeline {
    /// # Errors
    ///
    /// The config's validation error, if any.
    pub fn new(config: SeparationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            reducer: PaletteReducer::new(config.quantizer),
            builder: Box::new(ChannelBuilder::new(config.match_tolerance)),
            resolver: ColorNameResolver::new(KnownColorTable::default(), config.use_known_colors),
            orderer: SeparationOrderer,
            sink: Box::new(TracingSink),
            config,
        })
    }

    pub fn with_builder(mut self, builder: impl BuildChannel + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    pub fn with_sink(mut self, sink: impl FailureSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replace the known-color table used for naming.
    pub fn with_known_colors(mut self, table: KnownColorTable) -> Self {
        self.resolver = ColorNameResolver::new(table, self.config.use_known_colors);
        self
    }

    /// Separate `image`.
    ///
    /// # Errors
    ///
    /// Only configuration and palette reduction errors. No partial report is
    /// produced for them.
    pub fn run(&self, image: &RasterImage) -> Result<SeparationReport, ConfigError> {
        self.config.validate()?;

        let span = tracing::info_span!(
            "separation",
            colors = self.config.color_count,
            dither = self.config.dither_strength,
            quantizer = self.reducer.quantizer_name(),
        );
        let _guard = span.enter();

        let mut run = Run::Quantizing(image);
        loop {
            tracing::debug!(state = ?run.state(), "Run state");
            run = match run {
                Run::Done(report) => {
                    tracing::info!(
                        channels = report.channels.len(),
                        failures = report.failures.len(),
                        "Separation finished"
                    );
                    return Ok(report);
                }
                other => self.step(other)?,
            };
        }
    }

    fn step<'a>(&self, run: Run<'a>) -> Result<Run<'a>, ConfigError> {
        Ok(match run {
            Run::Quantizing(image) => {
                let quantized = self.reducer.reduce(
                    image,
                    self.config.color_count,
                    self.config.dither_strength,
                )?;
                Run::BuildingChannels(quantized)
            }
            Run::BuildingChannels(quantized) => {
                let (channels, failures) = self.build_channels(&quantized);
                Run::Ordering {
                    quantized,
                    channels,
                    failures,
                }
            }
            Run::Ordering {
                quantized,
                channels,
                failures,
            } => Run::Done(SeparationReport {
                channels: self.orderer.order(channels),
                failures,
                palette: quantized.entries,
            }),
            done @ Run::Done(_) => done,
        })
    }

    fn build_channels(&self, quantized: &QuantizedImage) -> (Vec<Channel>, Vec<ChannelFailure>) {
        let builder = self.builder.as_ref();
        let resolver = &self.resolver;
        let build = |entry: &PaletteEntry| builder.build(quantized, entry, resolver);

        // One slot per palette index, in index order
        let slots: Vec<Result<Channel, ChannelBuildError>> = if self.config.parallel {
            quantized.entries.par_iter().map(build).collect()
        } else {
            quantized.entries.iter().map(build).collect()
        };

        let mut channels = Vec::with_capacity(slots.len());
        let mut failures = Vec::new();
        for (entry, slot) in quantized.entries.iter().zip(slots) {
            match slot {
                Ok(channel) => channels.push(channel),
                Err(e) => {
                    let failure = ChannelFailure::new(entry, &e);
                    self.sink.record(&failure);
                    failures.push(failure);
                }
            }
        }
        (channels, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use std::sync::{Arc, Mutex};

    fn stripes(colors: &[Srgb], stripe_width: usize, height: usize) -> RasterImage {
        let width = colors.len() * stripe_width;
        let pixels = (0..width * height)
            .map(|i| colors[(i % width) / stripe_width])
            .collect();
        RasterImage::new(width, height, pixels).unwrap()
    }

    #[derive(Default, Clone)]
    struct Collecting(Arc<Mutex<Vec<ChannelFailure>>>);

    impl FailureSink for Collecting {
        fn record(&self, failure: &ChannelFailure) {
            self.0.lock().unwrap().push(failure.clone());
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let err = SeparationPipeline::new(SeparationConfig::default().color_count(20)).unwrap_err();
        assert_eq!(err, ConfigError::ColorCount(20));
    }

    #[test]
    fn test_failures_reach_sink() {
        struct RejectOdd;
        impl BuildChannel for RejectOdd {
            fn build(
                &self,
                q: &QuantizedImage,
                entry: &PaletteEntry,
                r: &ColorNameResolver,
            ) -> Result<Channel, ChannelBuildError> {
                if entry.index % 2 == 1 {
                    return Err(ChannelBuildError::EmptyMask { index: entry.index });
                }
                ChannelBuilder::default().build(q, entry, r)
            }
        }

        let sink = Collecting::default();
        let image = stripes(
            &[
                Srgb::new(255, 0, 0),
                Srgb::new(0, 0, 255),
                Srgb::new(0, 255, 0),
                Srgb::WHITE,
            ],
            4,
            4,
        );
        let pipeline = SeparationPipeline::new(SeparationConfig::default().color_count(4))
            .unwrap()
            .with_builder(RejectOdd)
            .with_sink(sink.clone());

        let report = pipeline.run(&image).unwrap();
        let recorded = sink.0.lock().unwrap().clone();
        assert_eq!(recorded, report.failures);
        assert_eq!(
            report.failures.iter().map(|f| f.palette_index).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let image = stripes(
            &[
                Srgb::new(255, 0, 0),
                Srgb::new(0, 255, 0),
                Srgb::new(0, 0, 255),
                Srgb::new(20, 20, 20),
            ],
            3,
            5,
        );
        let config = SeparationConfig::default().color_count(4);
        let parallel = SeparationPipeline::new(config.clone()).unwrap().run(&image).unwrap();
        let sequential = SeparationPipeline::new(config.parallel(false))
            .unwrap()
            .run(&image)
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_custom_known_colors() {
        let image = stripes(&[Srgb::new(0, 0, 255), Srgb::WHITE], 2, 2);
        let mut table = KnownColorTable::default();
        table.insert("0000FF", "Reflex Blue C");
        let report = SeparationPipeline::new(SeparationConfig::default().color_count(2))
            .unwrap()
            .with_known_colors(table)
            .run(&image)
            .unwrap();
        assert!(report.channels.iter().any(|c| c.name == "Reflex Blue C"));
    }
}
