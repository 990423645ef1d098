//! spotsep - spot-color separation for print production
//!
//! Host side of the `spot-separation` engine: artwork decoding, YAML
//! configuration, channel export, production report and error log.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
