//! End-to-end: encode plaintext, draw the frame, check the SVG document.

use zigzag_core::{IndexResolver, Key, Layout, LowestPicker, encoder};
use zigzag_render::{GuideMode, PathStyle, SvgExporter, Theme, ViewFrame, render_svg};

fn encoded_frame(text: &str, guides: GuideMode) -> ViewFrame {
    let key = Key::alphabet();
    let layout = Layout::default();
    let mut resolver = IndexResolver::new(LowestPicker);
    let points = encoder::encode(text, &key, &mut resolver, &layout);
    ViewFrame::fitted(key, layout, points, guides, PathStyle::Encode)
}

#[test]
fn one_circle_per_plotted_letter() {
    let svg = render_svg(&encoded_frame("Hi there!", GuideMode::Visible));
    assert_eq!(svg.matches("class=\"point\"").count(), 7);
    assert_eq!(svg.matches("<polyline").count(), 1);
    assert_eq!(svg.matches("class=\"guide-line\"").count(), 26);
}

#[test]
fn long_text_grows_the_canvas() {
    let text = "a".repeat(40);
    let svg = render_svg(&encoded_frame(&text, GuideMode::Visible));
    // Last row at 100 + 39 * 24 = 1036, plus 80 padding.
    assert!(svg.contains("viewBox=\"0 0 1200 1116\""));
    assert!(svg.contains("y2=\"1086\""));
}

#[test]
fn empty_encode_still_shows_guides() {
    let svg = render_svg(&encoded_frame("", GuideMode::Visible));
    assert!(!svg.contains("<polyline"));
    assert!(svg.contains(">Z</text>"));
}

#[test]
fn export_keeps_hidden_guides_and_rule() {
    let doc = SvgExporter::new(Theme::Light).export(&encoded_frame("abc", GuideMode::Hidden));
    assert!(doc.contains(".hidden-guides .guide-line { display: none; }"));
    assert!(doc.contains("<g class=\"hidden-guides\">"));
    assert_eq!(doc.matches("fill=\"none\"/>").count(), 1);
}
