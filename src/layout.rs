//! Section arrangement and per-section visual categories for each
//! framework layout kind.
//!
//! The engine is pure geometry/color math: given a layout kind and a slot
//! index it answers "where does this section sit in world space" and "which
//! category does it get". It never fails on unexpected section counts —
//! palettes cycle modulo their length.

use egui::{pos2, vec2, Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::constants::{SECTION_GAP, SECTION_MAX_HEIGHT, SECTION_SLOT_PITCH, SECTION_WIDTH};

/// How a framework arranges its sections. A closed set: adding a layout is
/// a compile-time-checked extension of every `match` below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Sections in one left-to-right row, in array order.
    Linear,
    /// Four quadrants in a 2-column grid.
    #[serde(rename = "matrix_2x2")]
    Matrix2x2,
    /// Six Thinking Hats in a 3-column grid.
    SixHats,
}

impl LayoutKind {
    /// Grid columns for this layout; `usize::MAX` marks the single row of
    /// the linear arrangement.
    fn columns(self) -> usize {
        match self {
            LayoutKind::Linear => usize::MAX,
            LayoutKind::Matrix2x2 => 2,
            LayoutKind::SixHats => 3,
        }
    }
}

/// World-space top-left corner of the slot at `index`.
pub fn slot_origin(layout: LayoutKind, index: usize) -> Pos2 {
    let columns = layout.columns();
    let (col, row) = if columns == usize::MAX {
        (index, 0)
    } else {
        (index % columns, index / columns)
    };
    pos2(
        col as f32 * (SECTION_WIDTH + SECTION_GAP),
        row as f32 * SECTION_SLOT_PITCH,
    )
}

/// Bounding box of all `count` slots at their maximum card height. Used for
/// centering grid layouts and fit-to-view.
pub fn content_bounds(layout: LayoutKind, count: usize) -> Rect {
    if count == 0 {
        return Rect::from_min_size(Pos2::ZERO, vec2(SECTION_WIDTH, SECTION_MAX_HEIGHT));
    }
    let mut bounds = Rect::NOTHING;
    for index in 0..count {
        let origin = slot_origin(layout, index);
        bounds = bounds.union(Rect::from_min_size(
            origin,
            vec2(SECTION_WIDTH, SECTION_MAX_HEIGHT),
        ));
    }
    bounds
}

/// Slot badge shown in a section header: quadrant number for the matrix,
/// zero-padded sequence number otherwise.
pub fn badge_label(layout: LayoutKind, index: usize) -> String {
    match layout {
        LayoutKind::Matrix2x2 => format!("Q{}", index + 1),
        LayoutKind::Linear | LayoutKind::SixHats => format!("{:02}", index + 1),
    }
}

/// Visual category of a section: accent/border, header fill, title and
/// badge colors. Deterministic per slot index (and, for six hats, title).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionStyle {
    pub accent: Color32,
    pub header_fill: Color32,
    pub title_color: Color32,
    pub badge_fill: Color32,
    pub badge_text: Color32,
}

const fn style(
    accent: Color32,
    header_fill: Color32,
    title_color: Color32,
    badge_fill: Color32,
    badge_text: Color32,
) -> SectionStyle {
    SectionStyle {
        accent,
        header_fill,
        title_color,
        badge_fill,
        badge_text,
    }
}

/// Neutral category used by the linear arrangement.
const LINEAR_STYLE: SectionStyle = style(
    Color32::from_rgb(231, 229, 228),
    Color32::from_rgb(255, 255, 255),
    Color32::from_rgb(41, 37, 36),
    Color32::from_rgb(245, 245, 244),
    Color32::from_rgb(87, 83, 78),
);

/// Quadrant palette for `matrix_2x2`, cycled by slot index.
const MATRIX_PALETTE: [SectionStyle; 4] = [
    // emerald
    style(
        Color32::from_rgb(167, 243, 208),
        Color32::from_rgb(236, 253, 245),
        Color32::from_rgb(6, 78, 59),
        Color32::from_rgb(167, 243, 208),
        Color32::from_rgb(6, 95, 70),
    ),
    // rose
    style(
        Color32::from_rgb(254, 205, 211),
        Color32::from_rgb(255, 241, 242),
        Color32::from_rgb(136, 19, 55),
        Color32::from_rgb(254, 205, 211),
        Color32::from_rgb(159, 18, 57),
    ),
    // blue
    style(
        Color32::from_rgb(191, 219, 254),
        Color32::from_rgb(239, 246, 255),
        Color32::from_rgb(30, 58, 138),
        Color32::from_rgb(191, 219, 254),
        Color32::from_rgb(30, 64, 175),
    ),
    // amber
    style(
        Color32::from_rgb(253, 230, 138),
        Color32::from_rgb(255, 251, 235),
        Color32::from_rgb(120, 53, 15),
        Color32::from_rgb(253, 230, 138),
        Color32::from_rgb(146, 64, 14),
    ),
];

/// The six canonical thinking hats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatCategory {
    White,
    Red,
    Black,
    Yellow,
    Green,
    Blue,
}

impl HatCategory {
    /// Canonical hat order, also the index-fallback cycle.
    pub const ALL: [HatCategory; 6] = [
        HatCategory::White,
        HatCategory::Red,
        HatCategory::Black,
        HatCategory::Yellow,
        HatCategory::Green,
        HatCategory::Blue,
    ];

    fn style(self) -> SectionStyle {
        match self {
            HatCategory::White => style(
                Color32::from_rgb(214, 211, 209),
                Color32::from_rgb(250, 250, 249),
                Color32::from_rgb(68, 64, 60),
                Color32::from_rgb(231, 229, 228),
                Color32::from_rgb(87, 83, 78),
            ),
            HatCategory::Red => style(
                Color32::from_rgb(254, 202, 202),
                Color32::from_rgb(254, 242, 242),
                Color32::from_rgb(153, 27, 27),
                Color32::from_rgb(254, 202, 202),
                Color32::from_rgb(185, 28, 28),
            ),
            HatCategory::Black => style(
                Color32::from_rgb(68, 64, 60),
                Color32::from_rgb(41, 37, 36),
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(87, 83, 78),
                Color32::from_rgb(245, 245, 244),
            ),
            HatCategory::Yellow => style(
                Color32::from_rgb(253, 224, 71),
                Color32::from_rgb(254, 252, 232),
                Color32::from_rgb(133, 77, 14),
                Color32::from_rgb(254, 240, 138),
                Color32::from_rgb(133, 77, 14),
            ),
            HatCategory::Green => style(
                Color32::from_rgb(134, 239, 172),
                Color32::from_rgb(240, 253, 244),
                Color32::from_rgb(22, 101, 52),
                Color32::from_rgb(187, 247, 208),
                Color32::from_rgb(22, 101, 52),
            ),
            HatCategory::Blue => style(
                Color32::from_rgb(147, 197, 253),
                Color32::from_rgb(239, 246, 255),
                Color32::from_rgb(30, 64, 175),
                Color32::from_rgb(191, 219, 254),
                Color32::from_rgb(30, 64, 175),
            ),
        }
    }
}

/// Maps a section title to a hat category. Isolated behind a trait so the
/// keyword heuristic can later be replaced by an explicit category supplied
/// by the idea collaborator without touching the engine's consumers.
pub trait HatResolver {
    fn resolve(&self, title: &str) -> Option<HatCategory>;
}

/// Best-effort keyword matcher. AI-generated section titles may reorder or
/// rename the canonical hats, so each hat is recognized by its color word or
/// its theme word, case-insensitively.
#[derive(Debug, Default)]
pub struct KeywordHatResolver;

impl HatResolver for KeywordHatResolver {
    fn resolve(&self, title: &str) -> Option<HatCategory> {
        let lower = title.to_lowercase();
        const KEYWORDS: [(HatCategory, [&str; 2]); 6] = [
            (HatCategory::White, ["white", "data"]),
            (HatCategory::Red, ["red", "emotion"]),
            (HatCategory::Black, ["black", "caution"]),
            (HatCategory::Yellow, ["yellow", "positive"]),
            (HatCategory::Green, ["green", "creat"]),
            (HatCategory::Blue, ["blue", "process"]),
        ];
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(hat, _)| *hat)
    }
}

/// Resolves the visual category for the section at `index`. Six-hats titles
/// are matched first; everything else (and any unmatched title) falls back
/// to a fixed palette cycle, so a wrong section count degrades instead of
/// failing.
pub fn section_style(
    layout: LayoutKind,
    index: usize,
    title: &str,
    hats: &dyn HatResolver,
) -> SectionStyle {
    match layout {
        LayoutKind::Linear => LINEAR_STYLE,
        LayoutKind::Matrix2x2 => MATRIX_PALETTE[index % MATRIX_PALETTE.len()],
        LayoutKind::SixHats => hats
            .resolve(title)
            .unwrap_or(HatCategory::ALL[index % HatCategory::ALL.len()])
            .style(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_slots_advance_left_to_right() {
        let a = slot_origin(LayoutKind::Linear, 0);
        let b = slot_origin(LayoutKind::Linear, 5);
        assert_eq!(a, pos2(0.0, 0.0));
        assert_eq!(b.y, 0.0);
        assert_eq!(b.x, 5.0 * (SECTION_WIDTH + SECTION_GAP));
    }

    #[test]
    fn matrix_slots_form_two_columns() {
        assert_eq!(slot_origin(LayoutKind::Matrix2x2, 0), pos2(0.0, 0.0));
        assert_eq!(
            slot_origin(LayoutKind::Matrix2x2, 1).x,
            SECTION_WIDTH + SECTION_GAP
        );
        assert_eq!(slot_origin(LayoutKind::Matrix2x2, 2).x, 0.0);
        assert_eq!(slot_origin(LayoutKind::Matrix2x2, 2).y, SECTION_SLOT_PITCH);
    }

    #[test]
    fn six_hats_slots_form_three_columns() {
        assert_eq!(slot_origin(LayoutKind::SixHats, 3).x, 0.0);
        assert_eq!(slot_origin(LayoutKind::SixHats, 3).y, SECTION_SLOT_PITCH);
        assert_eq!(
            slot_origin(LayoutKind::SixHats, 5).x,
            2.0 * (SECTION_WIDTH + SECTION_GAP)
        );
    }

    #[test]
    fn matrix_badges_are_quadrant_numbers() {
        assert_eq!(badge_label(LayoutKind::Matrix2x2, 0), "Q1");
        assert_eq!(badge_label(LayoutKind::Matrix2x2, 3), "Q4");
        assert_eq!(badge_label(LayoutKind::Linear, 0), "01");
        assert_eq!(badge_label(LayoutKind::SixHats, 5), "06");
    }

    #[test]
    fn matrix_assigns_four_distinct_categories() {
        let hats = KeywordHatResolver;
        let styles: Vec<SectionStyle> = (0..4)
            .map(|i| section_style(LayoutKind::Matrix2x2, i, "irrelevant", &hats))
            .collect();
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(styles[i], styles[j]);
            }
        }
        // a fifth quadrant cycles back to the first category
        assert_eq!(
            section_style(LayoutKind::Matrix2x2, 4, "", &hats),
            styles[0]
        );
    }

    #[test]
    fn hat_keywords_beat_index_fallback() {
        let hats = KeywordHatResolver;
        // slot 0 would be White by index, but the title names the green hat
        let by_title = section_style(LayoutKind::SixHats, 0, "Green Hat (Creativity)", &hats);
        assert_eq!(by_title, HatCategory::Green.style());

        let by_theme = section_style(LayoutKind::SixHats, 0, "Emotional Responses", &hats);
        assert_eq!(by_theme, HatCategory::Red.style());
    }

    #[test]
    fn unmatched_titles_cycle_the_hat_palette() {
        let hats = KeywordHatResolver;
        for index in 0..12 {
            let style = section_style(LayoutKind::SixHats, index, "Observations", &hats);
            assert_eq!(style, HatCategory::ALL[index % 6].style());
        }
    }

    #[test]
    fn short_six_hats_board_degrades_without_panicking() {
        let hats = KeywordHatResolver;
        // only four sections arrived for a six-slot layout
        for index in 0..4 {
            let _ = slot_origin(LayoutKind::SixHats, index);
            let _ = section_style(LayoutKind::SixHats, index, "Step", &hats);
            let _ = badge_label(LayoutKind::SixHats, index);
        }
        let bounds = content_bounds(LayoutKind::SixHats, 4);
        assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    }

    #[test]
    fn layout_kind_wire_names_match_saved_documents() {
        assert_eq!(
            serde_json::to_string(&LayoutKind::Matrix2x2).unwrap(),
            "\"matrix_2x2\""
        );
        assert_eq!(
            serde_json::to_string(&LayoutKind::SixHats).unwrap(),
            "\"six_hats\""
        );
        assert_eq!(
            serde_json::from_str::<LayoutKind>("\"linear\"").unwrap(),
            LayoutKind::Linear
        );
    }
}
