//! Sticky notes, sections, and user-saved section templates.

use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Available sticky note colors, in the order the recolor control cycles
/// through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    Yellow,
    Blue,
    Green,
    Pink,
    Orange,
    White,
}

impl NoteColor {
    pub const ALL: [NoteColor; 6] = [
        NoteColor::Yellow,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Pink,
        NoteColor::Orange,
        NoteColor::White,
    ];

    /// The next color in the palette cycle.
    pub fn next(self) -> NoteColor {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Card fill for this color.
    pub fn fill(self) -> Color32 {
        match self {
            NoteColor::Yellow => Color32::from_rgb(254, 249, 195),
            NoteColor::Blue => Color32::from_rgb(219, 234, 254),
            NoteColor::Green => Color32::from_rgb(220, 252, 231),
            NoteColor::Pink => Color32::from_rgb(252, 231, 243),
            NoteColor::Orange => Color32::from_rgb(255, 237, 213),
            NoteColor::White => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Accent color drawn along the top edge of the card.
    pub fn accent(self) -> Color32 {
        match self {
            NoteColor::Yellow => Color32::from_rgb(254, 240, 138),
            NoteColor::Blue => Color32::from_rgb(191, 219, 254),
            NoteColor::Green => Color32::from_rgb(187, 247, 208),
            NoteColor::Pink => Color32::from_rgb(251, 207, 232),
            NoteColor::Orange => Color32::from_rgb(254, 215, 170),
            NoteColor::White => Color32::from_rgb(231, 229, 228),
        }
    }

    /// Text color readable against `fill`.
    pub fn text(self) -> Color32 {
        match self {
            NoteColor::Yellow => Color32::from_rgb(113, 63, 18),
            NoteColor::Blue => Color32::from_rgb(30, 58, 138),
            NoteColor::Green => Color32::from_rgb(20, 83, 45),
            NoteColor::Pink => Color32::from_rgb(131, 24, 67),
            NoteColor::Orange => Color32::from_rgb(124, 45, 18),
            NoteColor::White => Color32::from_rgb(41, 37, 36),
        }
    }
}

impl Default for NoteColor {
    fn default() -> Self {
        NoteColor::White
    }
}

/// A single sticky note. Owned by exactly one [`Section`] at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub color: NoteColor,
    #[serde(default, rename = "isAiGenerated")]
    pub is_ai_generated: bool,
}

impl Note {
    /// A blank user note. Empty content signals the UI to open it in edit
    /// mode immediately.
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            content: String::new(),
            color: NoteColor::White,
            is_ai_generated: false,
        }
    }

    pub fn generated(content: String, color: NoteColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            color,
            is_ai_generated: true,
        }
    }
}

/// A titled container of notes corresponding to one framework step,
/// quadrant, or hat. Array order determines the layout slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub notes: Vec<Note>,
}

impl Section {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            notes: Vec::new(),
        }
    }

    pub fn note(&self, note_id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    pub fn note_mut(&mut self, note_id: Uuid) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == note_id)
    }
}

/// Note data stored inside a template: content and color only, ids are
/// minted on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNote {
    pub content: String,
    pub color: NoteColor,
}

/// The section snapshot a template carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateData {
    pub title: String,
    pub description: String,
    pub notes: Vec<TemplateNote>,
}

/// A user-saved copy of a section. A value type: inserting it into a board
/// always mints a brand-new section with fresh note ids, so the stored copy
/// shares nothing with the live canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub data: TemplateData,
}

impl SectionTemplate {
    /// Snapshots a live section under a user-chosen name.
    pub fn from_section(section: &Section, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: chrono::Utc::now(),
            data: TemplateData {
                title: section.title.clone(),
                description: section.description.clone(),
                notes: section
                    .notes
                    .iter()
                    .map(|n| TemplateNote {
                        content: n.content.clone(),
                        color: n.color,
                    })
                    .collect(),
            },
        }
    }

    /// Mints a fresh section from this template. Every id is new.
    pub fn instantiate(&self) -> Section {
        Section {
            id: Uuid::new_v4(),
            title: self.data.title.clone(),
            description: self.data.description.clone(),
            notes: self
                .data
                .notes
                .iter()
                .map(|n| Note {
                    id: Uuid::new_v4(),
                    content: n.content.clone(),
                    color: n.color,
                    is_ai_generated: false,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_note_opens_empty_and_white() {
        let note = Note::blank();
        assert!(note.content.is_empty());
        assert_eq!(note.color, NoteColor::White);
        assert!(!note.is_ai_generated);
    }

    #[test]
    fn color_cycle_visits_all_and_wraps() {
        let mut color = NoteColor::Yellow;
        let mut seen = vec![color];
        for _ in 0..5 {
            color = color.next();
            seen.push(color);
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(color.next(), NoteColor::Yellow);
    }

    #[test]
    fn template_instantiation_mints_fresh_ids() {
        let mut section = Section::new("Strengths".into(), "What we do well".into());
        section.notes.push(Note::generated("fast releases".into(), NoteColor::Green));
        section.notes.push(Note::blank());

        let template = SectionTemplate::from_section(&section, "swot strengths".into());
        let minted = template.instantiate();

        assert_ne!(minted.id, section.id);
        assert_eq!(minted.notes.len(), 2);
        for (fresh, original) in minted.notes.iter().zip(&section.notes) {
            assert_ne!(fresh.id, original.id);
            assert_eq!(fresh.content, original.content);
            assert_eq!(fresh.color, original.color);
            // template insertion never marks notes as AI output
            assert!(!fresh.is_ai_generated);
        }
    }

    #[test]
    fn note_color_serializes_lowercase() {
        let json = serde_json::to_string(&NoteColor::Pink).unwrap();
        assert_eq!(json, "\"pink\"");
    }
}
