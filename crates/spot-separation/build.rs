use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// IEC 61966-2-1 exact formula: sRGB to linear
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// IEC 61966-2-1 exact formula: linear to sRGB
fn linear_to_srgb_exact(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut file = BufWriter::new(File::create(&dest_path)?);

    // One entry per 8-bit code value; raster input is always 8-bit.
    writeln!(file, "/// Linear light value for every 8-bit sRGB code value")?;
    writeln!(file, "pub static SRGB8_TO_LINEAR: [f32; 256] = [")?;
    for i in 0..256 {
        let linear = srgb_to_linear_exact(i as f64 / 255.0);
        if i > 0 && i % 8 == 0 {
            writeln!(file)?;
        }
        write!(file, "    {:.9},", linear as f32)?;
    }
    writeln!(file, "\n];")?;
    writeln!(file)?;

    writeln!(file, "/// Lookup table for linear to sRGB conversion")?;
    writeln!(file, "/// Index: linear value * 4095.0, Value: sRGB value (0.0..=1.0)")?;
    writeln!(file, "pub static LINEAR_TO_SRGB: [f32; 4096] = [")?;
    for i in 0..4096 {
        let srgb = linear_to_srgb_exact(i as f64 / 4095.0);
        if i > 0 && i % 8 == 0 {
            writeln!(file)?;
        }
        write!(file, "    {:.9},", srgb as f32)?;
    }
    writeln!(file, "\n];")?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
