//! Assertion helpers for tests.

use std::path::Path;

use pretty_assertions::assert_eq;
use spotsep::models::ProductionReport;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert the file exists and starts with the PNG signature
pub fn assert_png_file(path: &Path) {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {}", path.display(), e));
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG signature in {}, got {:?}",
        path.display(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Read and parse a report.json
pub fn read_report(path: &Path) -> ProductionReport {
    let json = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Expected report at {}: {}", path.display(), e));
    serde_json::from_str(&json).unwrap()
}

/// Assert channels are in print order: opacity non-increasing, ties by
/// palette index, all above the floor, all knockout
pub fn assert_print_order(report: &ProductionReport) {
    for pair in report.channels.windows(2) {
        assert!(
            pair[0].opacity >= pair[1].opacity,
            "Opacity increases from {} to {}",
            pair[0].name,
            pair[1].name
        );
        if pair[0].opacity == pair[1].opacity {
            assert!(pair[0].palette_index < pair[1].palette_index);
        }
    }
    for (i, channel) in report.channels.iter().enumerate() {
        assert_eq!(channel.position, i + 1);
        assert!(channel.opacity >= 30, "{} below opacity floor", channel.name);
        assert!(channel.knockout, "{} does not knock out", channel.name);
    }
}

/// Count `.png` files directly inside `dir`
pub fn count_pngs(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "png"))
            .count(),
        Err(_) => 0,
    }
}
