#![forbid(unsafe_code)]

//! WASM runner for the zigzag cipher lab.
//!
//! This crate provides [`CipherLabRunner`], a `wasm-bindgen`-exported struct
//! that wraps a `zigzag_runtime::CipherSession` and exposes it to JavaScript
//! for host-driven execution. The host owns the DOM and the clock: it calls
//! `advanceTime(ms)` from its animation loop, reads back SVG markup for each
//! view, and collects playback steps as JSON.
//!
//! The theme preference lives in `localStorage["zigzag-theme"]`, falling back
//! to `matchMedia("(prefers-color-scheme: dark)")`.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::CipherLabRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#[cfg(test)]
mod tests {
    use crate::runner_core::RunnerCore;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use zigzag_render::Theme;
    use zigzag_runtime::{MemoryStore, PreferenceStore, THEME_KEY};

    fn runner() -> RunnerCore {
        RunnerCore::new(7, Box::new(MemoryStore::new()), false)
    }

    fn events(core: &mut RunnerCore) -> Vec<Value> {
        match serde_json::from_str(&core.take_events_json()) {
            Ok(Value::Array(items)) => items,
            other => panic!("expected a JSON array, got {other:?}"),
        }
    }

    #[test]
    fn advance_ignores_noisy_host_time() {
        let mut core = runner();
        core.set_plaintext("abc");
        assert!(core.play_encode());
        for dt in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -16.0, 0.0] {
            assert_eq!(core.advance_time_ms(dt), 0);
        }
        assert!(core.encode_running());
        assert_eq!(core.advance_time_ms(300.0), 1);
    }

    #[test]
    fn huge_time_step_finishes_playback() {
        let mut core = runner();
        core.set_plaintext("ab");
        assert!(core.play_encode());
        assert_eq!(core.advance_time_ms(f64::MAX), 2);
        assert!(!core.encode_running());
    }

    #[test]
    fn encode_events_are_collected_once() {
        let mut core = runner();
        core.set_plaintext("ab");
        assert!(core.play_encode());
        core.advance_time_ms(600.0);

        let steps = events(&mut core);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0]["view"], "encode");
        assert_eq!(steps[0]["x"], 40.0);
        assert_eq!(steps[0]["y"], 100.0);
        assert_eq!(steps[0]["finished"], false);
        assert_eq!(steps[1]["finished"], true);

        assert!(events(&mut core).is_empty());
    }

    #[test]
    fn decode_events_carry_letters() {
        let mut core = runner();
        assert_eq!(core.play_decode("80,124 40,100"), Ok(true));
        core.advance_time_ms(900.0);

        let steps = events(&mut core);
        let letters: Vec<&str> = steps.iter().filter_map(|s| s["letter"].as_str()).collect();
        assert_eq!(letters, ["a", "b"]);
        assert_eq!(core.decoded_text(), "ab");
        assert!(!core.decode_running());
    }

    #[test]
    fn parse_errors_come_back_as_messages() {
        let mut core = runner();
        let errors = core.set_points_input("40,100 nope");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("nope"));
        assert!(core.decode_error().is_some());
        assert!(core.decode_now("1,2,3").is_err());
        assert!(core.play_decode("x").is_err());
    }

    #[test]
    fn copy_then_host_failure() {
        let mut core = runner();
        assert_eq!(core.copy_text(), None);
        assert_eq!(core.export_status().as_deref(), Some("Nothing to export."));

        core.set_plaintext("ab");
        assert_eq!(core.copy_text().as_deref(), Some("40,100 80,124"));
        assert_eq!(core.export_status().as_deref(), Some("Copied."));

        core.copy_failed("NotAllowedError");
        assert_eq!(core.export_status().as_deref(), Some("Copy failed."));

        core.advance_time_ms(1400.0);
        assert_eq!(core.export_status(), None);
    }

    #[test]
    fn sync_and_decode_round_trip() {
        let mut core = runner();
        assert_eq!(core.sync_from_encode(), None);
        assert_eq!(
            core.decode_error().as_deref(),
            Some("No ciphertext in the encode tab.")
        );

        core.set_plaintext("Zig zag");
        let coords = core.sync_from_encode().unwrap();
        assert_eq!(core.points_input(), coords);
        assert_eq!(core.decode_now(&coords), Ok("zigzag".to_owned()));
    }

    #[test]
    fn key_operations_return_the_active_key() {
        let mut core = runner();
        assert_eq!(core.apply_key("q w e"), "QWE");
        assert_eq!(core.key(), "QWE");

        let shuffled = core.shuffle_key("");
        let mut letters: Vec<char> = shuffled.chars().collect();
        letters.sort_unstable();
        assert_eq!(letters, ['E', 'Q', 'W']);

        assert_eq!(core.reset_key(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }

    #[test]
    fn key_stats_json_counts_letters() {
        let core = runner();
        let stats: Value = serde_json::from_str(&core.key_stats_json("aab")).unwrap();
        assert_eq!(stats["length"], 3);
        assert_eq!(stats["duplicates"], 1);
        assert_eq!(stats["missing"], 24);
    }

    #[test]
    fn views_render_as_svg() {
        let mut core = runner();
        core.set_plaintext("ab");
        let svg = core.encode_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline points=\"40,100 80,124\""));

        core.set_encode_guides_visible(false);
        assert!(core.encode_svg().contains("hidden-guides"));

        assert!(core.set_points_input("40,100 80,124").is_empty());
        assert!(core.decode_svg().contains("stroke-dasharray=\"none\""));
        assert!(!core.key_preview_svg().contains("<polyline"));
    }

    #[test]
    fn export_uses_current_theme() {
        let mut core = runner();
        assert_eq!(core.export_svg(), None);

        core.set_plaintext("ab");
        core.toggle_theme();
        let svg = core.export_svg().unwrap();
        assert!(svg.contains("#0f172a"));
    }

    #[test]
    fn theme_follows_store_then_ambient() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark").unwrap();
        let core = RunnerCore::new(0, Box::new(store), false);
        assert_eq!(core.theme(), Theme::Dark);

        let mut core = RunnerCore::new(0, Box::new(MemoryStore::new()), true);
        assert_eq!(core.theme(), Theme::Dark);
        assert_eq!(core.toggle_theme(), Theme::Light);
        assert_eq!(core.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn config_json_is_validated() {
        let core = RunnerCore::from_config_json(
            r#"{"key": "zyx", "tick_interval_ms": 100}"#,
            0,
            Box::new(MemoryStore::new()),
            false,
        )
        .unwrap();
        assert_eq!(core.key(), "ZYX");
        assert_eq!(core.session().config().tick_interval_ms, 100);

        assert!(
            RunnerCore::from_config_json(
                r#"{"tick_interval_ms": 0}"#,
                0,
                Box::new(MemoryStore::new()),
                false,
            )
            .is_err()
        );
        assert!(
            RunnerCore::from_config_json("{", 0, Box::new(MemoryStore::new()), false).is_err()
        );
    }

    #[test]
    fn stop_and_manual_redraw() {
        let mut core = runner();
        core.set_realtime(false);
        core.set_plaintext("abc");
        assert_eq!(core.copy_text(), None);
        core.redraw_encode();
        assert_eq!(core.copy_text().as_deref(), Some("40,100 80,124 120,148"));

        assert!(core.play_encode());
        core.advance_time_ms(300.0);
        core.stop_encode();
        assert!(!core.encode_running());
        assert!(core.encode_svg().contains("120,148"));

        assert_eq!(core.play_decode("40,100 80,124"), Ok(true));
        core.stop_decode();
        assert!(!core.decode_running());
        core.set_decode_guides_visible(false);
        assert!(!core.decode_svg().contains("guide-line"));
    }

    #[test]
    fn clear_views() {
        let mut core = runner();
        core.set_plaintext("abc");
        assert_eq!(core.encrypt_text(), "40,100 80,124 120,148");
        core.clear_encode();
        assert_eq!(core.copy_text(), None);

        core.decode_now("40,100").unwrap();
        core.clear_decode();
        assert_eq!(core.decoded_text(), "");
        assert_eq!(core.points_input(), "");
    }
}
