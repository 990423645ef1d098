//! PNG decoding of artwork and encoding of separation channels.

pub mod decode;
pub mod export;

pub use decode::{decode_png, decode_png_bytes};
pub use export::{channel_file_name, encode_channel, export_channels, sanitize_name};
