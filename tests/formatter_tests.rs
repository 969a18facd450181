//! Formatter tests — shared timelines, meter checks, justification and
//! nested sub-groups.

use pretty_assertions::assert_eq;
use stavelayout::formatter::TickMember;
use stavelayout::tables::ticks;
use stavelayout::{
    FormatOptions, Formatter, LayoutConfig, LayoutError, Modifier, Position, SignatureKind, Stave,
    StaveGeometry, StaveModifier, Tickable, TickableKind, Voice, VoiceMode, VoiceTime, RESOLUTION,
};

fn note(duration: &str) -> Tickable {
    Tickable::note(duration, 10.0).expect("valid duration")
}

fn strict_voice(time: VoiceTime, tickables: Vec<Tickable>) -> Voice {
    let mut voice = Voice::new(time);
    voice.add_tickables(tickables).expect("fits the meter");
    voice
}

fn four_quarters() -> Voice {
    strict_voice(VoiceTime::default(), (0..4).map(|_| note("q")).collect())
}

fn xs(voice: &Voice) -> Vec<f64> {
    voice.tickables().iter().map(Tickable::x).collect()
}

#[test]
fn two_voices_share_every_position() {
    let mut voices = [four_quarters(), four_quarters()];
    let mut formatter = Formatter::new();
    formatter
        .format(&mut voices, Some(300.0), &FormatOptions::default())
        .expect("format two complete voices");

    let contexts = formatter.tick_contexts();
    assert_eq!(contexts.len(), 4, "four shared tick positions");
    for (i, ctx) in contexts.iter().enumerate() {
        assert_eq!(ctx.ticks, ticks(i as i64 * RESOLUTION / 4));
        assert_eq!(
            ctx.members,
            vec![TickMember { voice: 0, index: i }, TickMember { voice: 1, index: i }],
            "members in voice order at position {i}"
        );
    }
    assert_eq!(xs(&voices[0]), xs(&voices[1]), "aligned tickables get identical x");

    let xs = xs(&voices[0]);
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "positions strictly increase: {xs:?}");
}

#[test]
fn strict_meter_mismatch_fails_and_soft_succeeds() {
    let short = || (0..3).map(|_| note("q")).collect::<Vec<_>>();

    let mut incomplete = Voice::soft(VoiceTime::default(), short());
    incomplete.set_strict(true);
    let mut voices = [four_quarters(), incomplete];
    let err = Formatter::new()
        .format(&mut voices, None, &FormatOptions::default())
        .unwrap_err();
    assert!(
        matches!(&err, LayoutError::MeterMismatch { voice, .. } if voice == "#1"),
        "strict incomplete voice is reported: {err:?}"
    );

    voices[1].set_strict(false);
    let width = Formatter::new()
        .format(&mut voices, None, &FormatOptions::default())
        .expect("non-strict voices may be short");
    assert!(width > 0.0);
}

#[test]
fn strict_voices_must_share_a_total() {
    let three_four = strict_voice(VoiceTime::new(3, 4).unwrap(), (0..3).map(|_| note("q")).collect());
    let mut voices = [four_quarters(), three_four.with_id("waltz")];
    let err = Formatter::new().join_voices(&mut voices).map(|_| ()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MeterMismatch {
            voice: "'waltz'".into(),
            expected: ticks(RESOLUTION),
            actual: ticks(3 * RESOLUTION / 4),
        }
    );
}

#[test]
fn full_voice_may_fall_short_but_not_overflow() {
    let one_beat = VoiceTime::new(1, 4).unwrap();
    let mut voices = [Voice::soft(one_beat, vec![note("h")]).with_mode(VoiceMode::Full)];
    let err = Formatter::new()
        .format(&mut voices, None, &FormatOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::TooManyTicks { limit: ticks(RESOLUTION / 4), attempted: ticks(RESOLUTION / 2) }
    );

    let mut voices = [Voice::soft(VoiceTime::default(), vec![note("q")])];
    voices[0].set_mode(VoiceMode::Full);
    Formatter::new()
        .format(&mut voices, None, &FormatOptions::default())
        .expect("a short full voice is accepted");
}

#[test]
fn min_width_never_exceeds_justified_width() {
    let mut voices = [four_quarters()];
    let mut formatter = Formatter::new();
    formatter.format(&mut voices, None, &FormatOptions::default()).unwrap();
    let min = formatter.min_total_width();

    for target in [min, min + 1.0, 150.0, 400.0] {
        let justified = formatter
            .format(&mut voices, Some(target), &FormatOptions::default())
            .unwrap();
        assert!(min <= justified, "min {min} > justified {justified} for target {target}");
        assert_eq!(justified, target.max(min));
        assert_eq!(formatter.min_total_width(), min, "minimum is stable across passes");
    }
}

#[test]
fn pre_calculation_matches_format() {
    let mut voices = [four_quarters()];
    let mut formatter = Formatter::new();
    let pre = formatter.pre_calculate_min_total_width(&mut voices).unwrap();
    assert!(!voices[0].tickables()[0].is_pre_formatted(), "pre-calculation places nothing");

    formatter.format(&mut voices, Some(500.0), &FormatOptions::default()).unwrap();
    assert_eq!(formatter.min_total_width(), pre);
}

#[test]
fn triplets_align_with_straight_quarters() {
    let mut triplet = Vec::new();
    for _ in 0..3 {
        let mut t = note("8");
        t.set_tuplet(3, 2);
        triplet.push(t);
    }
    triplet.extend([note("q"), note("h")]);
    let mut voices = [
        strict_voice(VoiceTime::default(), triplet),
        strict_voice(VoiceTime::default(), vec![note("q"), note("q"), note("h")]),
    ];

    let mut formatter = Formatter::new();
    formatter.format(&mut voices, Some(250.0), &FormatOptions::default()).unwrap();

    assert_eq!(formatter.tick_contexts().len(), 5);
    assert_eq!(
        voices[0].tickables()[3].x(),
        voices[1].tickables()[1].x(),
        "the beat after the triplet lines up exactly"
    );
    assert_eq!(voices[0].tickables()[4].x(), voices[1].tickables()[2].x());
}

#[test]
fn zero_tick_tickables_share_the_next_position() {
    let mut voice = Voice::new(VoiceTime::default());
    voice
        .add_tickables([
            note("q"),
            note("q"),
            Tickable::placeholder(TickableKind::BarNote, 4.0),
            note("q"),
            note("q"),
        ])
        .unwrap();
    let mut voices = [voice];
    let mut formatter = Formatter::new();
    formatter.format(&mut voices, None, &FormatOptions::default()).unwrap();

    let t = voices[0].tickables();
    assert_eq!(formatter.tick_contexts().len(), 4);
    assert_eq!(t[2].x(), t[3].x());
}

#[test]
fn nested_sub_group_reports_inner_minimum() {
    let inner = vec![note("8"), note("8")];
    let mut principal = note("q");
    principal.add_modifier(Modifier::note_sub_group(inner.clone()), 0);
    let mut graced = note("q");
    graced.add_modifier(Modifier::grace_note_group(inner), 0);

    let mut voices = [strict_voice(
        VoiceTime::default(),
        vec![principal, note("q"), graced, note("q")],
    )];
    let mut formatter = Formatter::new();
    formatter.format(&mut voices, None, &FormatOptions::default()).unwrap();

    let sub = &voices[0].tickables()[0].modifiers()[0];
    let inner_min = sub.sub_group().expect("sub-group modifier").formatter().min_total_width();
    assert_eq!(inner_min, 21.0, "two 10px notes and one tick of padding");
    assert_eq!(sub.width(), inner_min);
    assert_eq!(formatter.tick_contexts()[0].left_px, 21.0);

    let grace = &voices[0].tickables()[2].modifiers()[0];
    assert_eq!(grace.width(), 25.0, "grace groups keep 4 units from their note");
    assert_eq!(formatter.tick_contexts()[2].left_px, 25.0);
}

#[test]
fn grace_spacing_comes_from_the_formatter_config() {
    let config = LayoutConfig::from_json(r#"{"formatter": {"grace_group_spacing": 12}}"#).unwrap();
    let mut graced = note("q");
    graced.add_modifier(Modifier::grace_note_group(vec![note("8")]), 0);
    let mut voices = [strict_voice(
        VoiceTime::default(),
        vec![graced, note("q"), note("q"), note("q")],
    )];

    let mut formatter = Formatter::with_config(config.formatter);
    formatter.format(&mut voices, None, &FormatOptions::default()).unwrap();
    let grace = &voices[0].tickables()[0].modifiers()[0];
    assert_eq!(grace.width(), 22.0, "one 10px grace note plus the configured 12");
    assert_eq!(formatter.tick_contexts()[0].left_px, 22.0);
}

#[test]
fn format_to_stave_fills_the_note_area() {
    let mut stave = Stave::new(20.0, 0.0, 400.0);
    stave.add_modifier(StaveModifier::signature(SignatureKind::Clef, "\u{E050}", 30.0, 3.0));
    stave.format().unwrap();
    assert_eq!(stave.note_start_x(), 50.0);

    let mut voices = [four_quarters()];
    let width = Formatter::new()
        .format_to_stave(&mut voices, &stave, &FormatOptions::default())
        .unwrap();
    assert_eq!(width, stave.note_end_x() - stave.note_start_x());
    assert_eq!(voices[0].tickables()[0].x(), 50.0);
    assert!(voices[0].tickables()[3].x() < stave.note_end_x());
    assert_eq!(stave.modifier_x_shift(Position::Above), 30.0);
}
