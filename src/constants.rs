//! Fixed drawing constants (all in user units). Tunable values live in
//! [`crate::config`].

// ── Stave decorations ───────────────────────────────────────────────
pub(crate) const DEFAULT_MODIFIER_PADDING: f64 = 10.0;
pub(crate) const TIME_SIGNATURE_PADDING: f64 = 15.0;
pub(crate) const UNPADDED_SLOTS: usize = 2; // leading slots that get no padding
pub(crate) const MUSIC_FONT_FAMILY: &str = "Bravura";
pub(crate) const SIGNATURE_FONT_SIZE: f64 = 30.0;

// ── Stave text placement ────────────────────────────────────────────
pub(crate) const TEXT_LATERAL_GAP: f64 = 24.0; // gap between stave edge and LEFT/RIGHT text
pub(crate) const TEXT_BASELINE_SHIFT: f64 = 4.0;
pub(crate) const TEXT_ABOVE_LINE: f64 = 2.0; // top-text line for ABOVE text
pub(crate) const TEXT_BELOW_LINE: f64 = 2.0;
pub(crate) const TEXT_LINE_WIDTH: f64 = 2.0;
pub(crate) const TEXT_FONT_SIZE: f64 = 12.0;
pub(crate) const TEXT_DEFAULT_WIDTH: f64 = 16.0;

// ── Volta ───────────────────────────────────────────────────────────
pub(crate) const VOLTA_END_INSET: f64 = 5.0;
pub(crate) const VOLTA_BEGIN_END_INSET: f64 = 3.0;
pub(crate) const VOLTA_MARK_WIDTH: f64 = 1.0;
pub(crate) const VOLTA_BAR_HEIGHT: f64 = 1.0;
pub(crate) const VOLTA_HOOK_SPACES: f64 = 1.5; // vertical mark height in line spaces
pub(crate) const VOLTA_LABEL_X: f64 = 5.0;
pub(crate) const VOLTA_LABEL_Y: f64 = 15.0;
pub(crate) const VOLTA_FONT_SIZE: f64 = 9.0;

// ── Section marker ──────────────────────────────────────────────────
pub(crate) const SECTION_BORDER_WIDTH: f64 = 2.0;
pub(crate) const SECTION_PADDING: f64 = 2.0;
pub(crate) const SECTION_TEXT_LINE: f64 = 1.5;
pub(crate) const SECTION_MIN_WIDTH: f64 = 16.0;
pub(crate) const SECTION_FONT_SIZE: f64 = 10.0;

// ── Tempo ───────────────────────────────────────────────────────────
pub(crate) const TEMPO_SPACING: f64 = 3.0; // gap after each tempo component
pub(crate) const TEMPO_X_SHIFT: f64 = 10.0;
pub(crate) const TEMPO_DOT_DROP: f64 = 2.0;
pub(crate) const TEMPO_TEXT_SIZE: f64 = 14.0;
pub(crate) const TEMPO_GLYPH_SIZE: f64 = 25.0;

// ── Text width estimation ───────────────────────────────────────────
pub(crate) const TEXT_CHAR_WIDTH_FACTOR: f64 = 0.55;
pub(crate) const GLYPH_CHAR_WIDTH_FACTOR: f64 = 1.0; // SMuFL private-use glyphs
pub(crate) const TEXT_DESCENT_FACTOR: f64 = 0.2;

// ── Colors ──────────────────────────────────────────────────────────
pub(crate) const NOTE_COLOR: &str = "#1a1a1a";
pub(crate) const STAFF_COLOR: &str = "#555555";
pub(crate) const STAFF_LINE_WIDTH: f64 = 0.8;
pub(crate) const BARLINE_WIDTH: f64 = 1.0;
