//! Rendering tests — a full measure through stave layout, justification and
//! SVG output.

use std::path::PathBuf;

use stavelayout::{
    layout_to_json, render_measure_to_svg, FormatterConfig, LayoutConfig, Modifier, Position,
    SignatureKind, Stave, StaveModifier, StaveTempoOptions, TextJustification, Tickable, Voice,
    VoiceTime, VoltaType,
};

fn output_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn melody() -> Voice {
    let mut voice = Voice::new(VoiceTime::default()).with_id("melody");
    let sharp = Tickable::note("q", 12.0)
        .unwrap()
        .with_glyph("\u{E0A4}")
        .with_modifier(Modifier::accidental("\u{E262}", 8.0), 0);
    voice
        .add_tickables([
            sharp,
            Tickable::note("8", 12.0).unwrap().with_glyph("\u{E0A4}"),
            Tickable::note("8", 12.0).unwrap().with_glyph("\u{E0A4}"),
            Tickable::note("h", 12.0).unwrap().with_glyph("\u{E0A3}"),
        ])
        .unwrap();
    voice
}

fn decorated_stave() -> Stave {
    let mut stave = Stave::new(10.0, 20.0, 360.0);
    stave
        .add_modifier(StaveModifier::signature(SignatureKind::Clef, "\u{E050}", 26.0, 3.0))
        .add_modifier(StaveModifier::signature(SignatureKind::TimeSignature, "\u{E084}", 18.0, 2.0))
        .add_modifier(StaveModifier::volta(VoltaType::Begin, "1.", 0.0))
        .add_modifier(StaveModifier::tempo(
            StaveTempoOptions { name: Some("Allegro".into()), ..StaveTempoOptions::metronome("q", 132) },
            0.0,
        ))
        .add_modifier(StaveModifier::text("dolce", Position::Below, TextJustification::Left));
    stave
}

#[test]
fn render_decorated_measure() {
    let mut stave = decorated_stave();
    let mut voices = [melody()];
    let svg = render_measure_to_svg(&mut stave, &mut voices, &FormatterConfig::default())
        .expect("render measure");

    assert!(svg.starts_with("<svg"), "output should be SVG");
    assert!(svg.contains("Allegro"), "tempo name is drawn");
    assert!(svg.contains("dolce"), "stave text is drawn");
    assert_eq!(svg.matches('\u{E0A4}').count(), 3, "one glyph per quarter/eighth note");

    let notes = voices[0].tickables();
    assert_eq!(
        notes[0].x(),
        10.0 + 26.0 + 15.0 + 18.0 + 8.0,
        "first note clears the clef, the padded time signature and its sharp"
    );
    assert!(notes.windows(2).all(|w| w[0].x() < w[1].x()));

    let path = output_dir().join("decorated_measure.svg");
    std::fs::write(&path, &svg).expect("write SVG");
}

#[test]
fn layout_json_lists_tick_positions() {
    let mut voices = [melody()];
    let json = layout_to_json(&mut voices, &LayoutConfig::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let contexts = value["contexts"].as_array().expect("contexts array");
    assert_eq!(contexts.len(), 4);
    assert_eq!(contexts[0]["left_px"], 8.0);
    assert_eq!(contexts[0]["modifiers"]["per_category_width"]["Accidental"], 8.0);
    assert!(value["min_total_width"].as_f64().unwrap() > 0.0);
}

#[test]
fn tick_padding_comes_from_config() {
    let config = LayoutConfig::from_json(r#"{"formatter": {"tick_padding": 5.0}}"#).unwrap();
    let mut voices = [melody()];
    let json = layout_to_json(&mut voices, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    // Glyphs 12 wide, sharp 8 before the first: 8 + 3 * (12 + 5) + 12.
    assert_eq!(value["min_total_width"], 71.0);
}
