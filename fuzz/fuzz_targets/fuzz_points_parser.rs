#![no_main]

use libfuzzer_sys::fuzz_target;
use zigzag_core::parse::{MAX_INPUT_LEN, MAX_POINTS};
use zigzag_core::{Key, Layout, decoder, format_points, parse_points};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // parse_points must never panic, and is all-or-nothing.
    match parse_points(text) {
        Ok(points) => {
            assert!(points.len() <= MAX_POINTS);
            assert!(text.chars().count() <= MAX_INPUT_LEN);
            for p in &points {
                assert!(p.x.is_finite() && p.y.is_finite());
                assert!((0.0..=2000.0).contains(&p.x), "x out of range: {}", p.x);
                assert!((0.0..=5000.0).contains(&p.y), "y out of range: {}", p.y);
            }

            // Integer-rounded export parses back to the same count.
            let again = parse_points(&format_points(&points)).expect("formatted points reparse");
            assert_eq!(again.len(), points.len());

            // Decoding accepted input never panics and yields one letter per point.
            let decoded = decoder::decode(&points, &Key::alphabet(), &Layout::default());
            assert_eq!(decoded.chars().count(), points.len());
        }
        Err(errors) => {
            assert!(!errors.is_empty(), "rejection must carry at least one error");
        }
    }
});
