use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spot_separation::{
    ChannelFailure, OutputFormat, QuantizerKind, SeparationConfig, SeparationReport,
};
use std::path::Path;

/// Production report written next to the channel files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionReport {
    pub generated_at: DateTime<Utc>,
    /// Input artwork path
    pub source: String,
    /// Directory holding channel files
    pub output_dir: String,
    pub width: usize,
    pub height: usize,
    pub color_count: u32,
    pub dither_strength: u32,
    pub quantizer: QuantizerKind,
    pub output_format: OutputFormat,
    /// Minimum stroke width in millimetres, carried through for the printer
    pub min_stroke_mm: f32,
    /// Palette in index order, as `#RRGGBB`
    pub palette: Vec<String>,
    /// Channels in print order
    pub channels: Vec<ChannelSummary>,
    pub failures: Vec<ChannelFailure>,
}

/// One exported channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelSummary {
    /// 1-based print position
    pub position: usize,
    pub name: String,
    pub palette_index: usize,
    /// `#RRGGBB`
    pub color: String,
    pub opacity: u8,
    pub knockout: bool,
    pub ink_density: u8,
    /// Inked share of the image, in percent
    pub coverage_percent: f64,
    /// File name inside the output directory
    pub file: String,
}

impl ProductionReport {
    /// Summarize a finished run. `size` is the artwork's width and height;
    /// `files` holds one file name per channel, in print order.
    pub fn new(
        source: &Path,
        output_dir: &Path,
        config: &SeparationConfig,
        size: (usize, usize),
        report: &SeparationReport,
        files: &[String],
    ) -> Self {
        let channels = report
            .channels
            .iter()
            .zip(files)
            .enumerate()
            .map(|(i, (channel, file))| ChannelSummary {
                position: i + 1,
                name: channel.name.clone(),
                palette_index: channel.palette_index,
                color: channel.color.to_string(),
                opacity: channel.opacity,
                knockout: channel.knockout,
                ink_density: channel.ink_density,
                coverage_percent: (channel.mask.coverage() * 10_000.0).round() / 100.0,
                file: file.clone(),
            })
            .collect();

        let (width, height) = size;

        Self {
            generated_at: Utc::now(),
            source: source.display().to_string(),
            output_dir: output_dir.display().to_string(),
            width,
            height,
            color_count: config.color_count,
            dither_strength: config.dither_strength,
            quantizer: config.quantizer,
            output_format: config.output_format,
            min_stroke_mm: config.min_stroke_mm,
            palette: report.palette.iter().map(|e| e.color.to_string()).collect(),
            channels,
            failures: report.failures.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
