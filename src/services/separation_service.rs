use spot_separation::{RasterImage, SeparationPipeline};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, SeparateError};
use crate::models::{AppConfig, ProductionReport};
use crate::rendering::{decode_png, export_channels};
use crate::services::{ErrorLog, ErrorLogSink};

/// Files produced by a successful run
#[derive(Debug)]
pub struct SeparationOutcome {
    pub report: ProductionReport,
    pub report_path: PathBuf,
    /// Channel file paths in print order
    pub channel_files: Vec<PathBuf>,
}

impl SeparationOutcome {
    pub fn failure_count(&self) -> usize {
        self.report.failures.len()
    }
}

/// Runs separation for the host: decode, separate, export, report
pub struct SeparationService {
    config: AppConfig,
    error_log: ErrorLog,
}

impl SeparationService {
    pub fn new(config: AppConfig) -> Self {
        let error_log = ErrorLog::new(config.output.error_log_path());
        Self { config, error_log }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// Separate the PNG at `input`.
    ///
    /// Fatal errors are appended to the error log before being returned;
    /// no channel file is written for them.
    pub fn separate_file(&self, input: &Path) -> Result<SeparationOutcome, SeparateError> {
        let result = self.build_pipeline().and_then(|pipeline| {
            let image = decode_png(input)?;
            self.separate(&pipeline, input, &image)
        });
        if let Err(ref e) = result {
            self.error_log
                .record(&format!("fatal: {} ({})", e, input.display()));
        }
        result
    }

    /// Separate an already decoded raster. `source` is recorded in the report.
    pub fn separate_image(
        &self,
        source: &Path,
        image: &RasterImage,
    ) -> Result<SeparationOutcome, SeparateError> {
        let result = self
            .build_pipeline()
            .and_then(|pipeline| self.separate(&pipeline, source, image));
        if let Err(ref e) = result {
            self.error_log.record(&format!("fatal: {}", e));
        }
        result
    }

    fn build_pipeline(&self) -> Result<SeparationPipeline, SeparateError> {
        let pipeline = SeparationPipeline::new(self.config.separation.clone())?
            .with_known_colors(self.config.known_color_table())
            .with_sink(ErrorLogSink::new(self.error_log.clone()));
        Ok(pipeline)
    }

    fn separate(
        &self,
        pipeline: &SeparationPipeline,
        source: &Path,
        image: &RasterImage,
    ) -> Result<SeparationOutcome, SeparateError> {
        let separation = pipeline.run(image)?;

        let dir = &self.config.output.dir;
        let files = export_channels(dir, &separation.channels, self.config.separation.output_format)?;

        let report = ProductionReport::new(
            source,
            dir,
            &self.config.separation,
            (image.width(), image.height()),
            &separation,
            &files,
        );
        let report_path = self.config.output.report_path();
        let json = report.to_json().map_err(ExportError::from)?;
        fs::write(&report_path, json).map_err(ExportError::from)?;

        tracing::info!(
            dir = %dir.display(),
            channels = report.channels.len(),
            failures = report.failures.len(),
            "Wrote separations"
        );

        Ok(SeparationOutcome {
            channel_files: files.iter().map(|f| dir.join(f)).collect(),
            report,
            report_path,
        })
    }
}
