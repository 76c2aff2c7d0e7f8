// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use procam::constants::{CaptureQuality, capture, transform};

#[test]
fn test_capture_quality_values() {
    assert_eq!(CaptureQuality::ALL.len(), 3);
    assert_eq!(CaptureQuality::Virtual.jpeg_quality(), 92);
    assert_eq!(CaptureQuality::Live.jpeg_quality(), 85);
    assert_eq!(CaptureQuality::Placeholder.jpeg_quality(), 80);
}

#[test]
fn test_capture_quality_ordering() {
    // Ordered from highest to lowest quality
    let mut prev = u8::MAX;
    for quality in CaptureQuality::ALL {
        assert!(
            quality.jpeg_quality() < prev,
            "Qualities should be ordered from highest to lowest"
        );
        prev = quality.jpeg_quality();
    }
}

#[test]
fn test_fraction_matches_jpeg_quality() {
    for quality in CaptureQuality::ALL {
        let percent = (quality.fraction() * 100.0).round() as u8;
        assert_eq!(percent, quality.jpeg_quality(), "{}", quality.display_name());
    }
}

#[test]
fn test_capture_quality_display_names() {
    for quality in CaptureQuality::ALL {
        assert!(
            !quality.display_name().is_empty(),
            "Quality should have a display name"
        );
    }
}

#[test]
fn test_zoom_bounds() {
    assert!(transform::MIN_SCALE < 1.0 && 1.0 < transform::MAX_SCALE);
    assert_eq!((capture::PLACEHOLDER_WIDTH, capture::PLACEHOLDER_HEIGHT), (640, 480));
}
