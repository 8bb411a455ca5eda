//! Centralized constants for canvas geometry, interaction tuning, and colors.
//!
//! This module consolidates the magic numbers used throughout the application
//! to improve maintainability and provide semantic meaning to values.

use egui::Color32;

// =============================================================================
// VIEWPORT CONSTANTS
// =============================================================================

/// Lower bound for the canvas zoom scale.
pub const MIN_SCALE: f32 = 0.2;

/// Upper bound for the canvas zoom scale.
pub const MAX_SCALE: f32 = 3.0;

/// Conversion factor from raw wheel delta to scale delta.
pub const ZOOM_SENSITIVITY: f32 = 0.001;

/// Scale step applied by the toolbar zoom in/out buttons.
pub const ZOOM_BUTTON_STEP: f32 = 0.2;

/// Default scale used by every canonical reset transform.
pub const DEFAULT_SCALE: f32 = 0.8;

/// Pan offset of the canonical reset transform for linear layouts.
pub const LINEAR_RESET_OFFSET: [f32; 2] = [40.0, 80.0];

// =============================================================================
// SECTION CARD GEOMETRY (world units)
// =============================================================================

/// Width of a section card.
pub const SECTION_WIDTH: f32 = 320.0;

/// Gap between adjacent section slots, horizontally and vertically.
pub const SECTION_GAP: f32 = 40.0;

/// Height of a section card header (title, badge, description).
pub const SECTION_HEADER_HEIGHT: f32 = 96.0;

/// Height of a section card footer (add-note and generate buttons).
pub const SECTION_FOOTER_HEIGHT: f32 = 48.0;

/// Minimum height of the notes area, so empty sections remain droppable.
pub const SECTION_BODY_MIN_HEIGHT: f32 = 180.0;

/// Maximum total height of a section card before its notes area clips.
pub const SECTION_MAX_HEIGHT: f32 = 560.0;

/// Vertical pitch between slot rows; must exceed `SECTION_MAX_HEIGHT`.
pub const SECTION_SLOT_PITCH: f32 = SECTION_MAX_HEIGHT + SECTION_GAP;

/// Corner radius for section cards.
pub const SECTION_CORNER_RADIUS: f32 = 12.0;

// =============================================================================
// NOTE CARD GEOMETRY (world units)
// =============================================================================

/// Height of a single sticky note card.
pub const NOTE_HEIGHT: f32 = 92.0;

/// Vertical spacing between stacked notes.
pub const NOTE_SPACING: f32 = 10.0;

/// Inner padding of a note card and of the section notes area.
pub const NOTE_PADDING: f32 = 10.0;

/// Thickness of the colored top edge of a note card.
pub const NOTE_ACCENT_HEIGHT: f32 = 4.0;

/// Corner radius for note cards.
pub const NOTE_CORNER_RADIUS: f32 = 3.0;

/// Font size for note content before zoom scaling.
pub const NOTE_FONT_SIZE: f32 = 13.0;

/// Base size for the small note controls (delete, recolor) before zoom scaling.
pub const NOTE_BUTTON_SIZE: f32 = 14.0;

// =============================================================================
// TEXT SIZES (world units, scaled by zoom at draw time)
// =============================================================================

/// Font size for section titles.
pub const TITLE_FONT_SIZE: f32 = 18.0;

/// Font size for section descriptions and badges.
pub const DETAIL_FONT_SIZE: f32 = 11.0;

/// Font size for the footer action labels.
pub const ACTION_FONT_SIZE: f32 = 12.0;

// =============================================================================
// AUTOSAVE
// =============================================================================

/// Quiescence delay before a dirty board is flushed to the save sink.
pub const AUTOSAVE_DELAY_MS: u64 = 1000;

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

/// Initial window width when the application starts.
pub const INITIAL_WINDOW_WIDTH: f32 = 1280.0;

/// Initial window height when the application starts.
pub const INITIAL_WINDOW_HEIGHT: f32 = 800.0;

// =============================================================================
// COLORS
// =============================================================================

/// Canvas background color.
pub const COLOR_CANVAS_BG: Color32 = Color32::from_rgb(244, 244, 244);

/// Color of the canvas background dot grid.
pub const COLOR_CANVAS_DOTS: Color32 = Color32::from_rgb(200, 196, 190);

/// Background color for the toolbar.
pub const COLOR_TOOLBAR_BG: Color32 = Color32::from_rgb(30, 30, 30);

/// Fill of the section notes area.
pub const COLOR_SECTION_BODY: Color32 = Color32::from_rgb(250, 250, 249);

/// Fill of the section footer strip.
pub const COLOR_SECTION_FOOTER: Color32 = Color32::from_rgb(255, 255, 255);

/// Ring drawn around the section currently highlighted as a drop target.
pub const COLOR_DROP_TARGET_RING: Color32 = Color32::from_rgb(99, 102, 241);

/// Dashed placeholder outline shown in an empty notes area.
pub const COLOR_EMPTY_HINT: Color32 = Color32::from_rgb(214, 211, 209);

/// Default text color on light surfaces.
pub const COLOR_INK: Color32 = Color32::from_rgb(41, 37, 36);

/// Muted text color for descriptions and hints.
pub const COLOR_MUTED: Color32 = Color32::from_rgb(120, 113, 108);
