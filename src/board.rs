//! The canvas board: session state, note operations, autosave debounce,
//! and the export snapshot.
//!
//! Sections and the viewport are mutated only here. UI children emit
//! intents (add/update/delete/move) that the board applies as single state
//! transitions, which is what makes the note-ownership invariant hold: a
//! note is never absent from, or present in, two sections at once.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use egui::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::AUTOSAVE_DELAY_MS;
use crate::drag::NoteDrag;
use crate::layout::LayoutKind;
use crate::library::Framework;
use crate::note::{Note, NoteColor, Section, SectionTemplate};
use crate::transform::CanvasTransform;

/// Schema version stamped into every export document.
pub const EXPORT_VERSION: u32 = 1;

/// The self-contained snapshot produced by the export action. Pure data,
/// independent of the autosave channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub problem: String,
    /// Framework display name; the full definition stays in the session.
    pub framework: String,
    pub date: DateTime<Utc>,
    pub sections: Vec<Section>,
    pub viewport: CanvasTransform,
}

pub struct Board {
    pub problem: String,
    pub framework: Framework,
    sections: Vec<Section>,
    pub viewport: CanvasTransform,
    /// Time of the most recent unsaved change; autosave fires once the
    /// quiescence delay elapses after the *latest* edit.
    dirty_since: Option<Instant>,
}

impl Board {
    /// A board awaiting generated sections.
    pub fn new(problem: String, framework: Framework) -> Self {
        Self {
            problem,
            framework,
            sections: Vec::new(),
            viewport: CanvasTransform::default(),
            dirty_since: None,
        }
    }

    /// Resumes a board from persisted state. The supplied viewport wins;
    /// without one the layout's canonical transform applies.
    pub fn resume(
        problem: String,
        framework: Framework,
        sections: Vec<Section>,
        viewport: Option<CanvasTransform>,
        container: Vec2,
    ) -> Self {
        let layout = framework.layout;
        let count = sections.len();
        Self {
            problem,
            framework,
            sections,
            viewport: viewport
                .unwrap_or_else(|| CanvasTransform::reset_for(layout, count, container)),
            dirty_since: None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn layout(&self) -> LayoutKind {
        self.framework.layout
    }

    pub fn section(&self, id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_mut(&mut self, id: Uuid) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Installs freshly generated sections and the canonical view for the
    /// layout. Used on both the success and the fallback path.
    pub fn install_sections(&mut self, sections: Vec<Section>, container: Vec2, now: Instant) {
        self.sections = sections;
        self.viewport =
            CanvasTransform::reset_for(self.framework.layout, self.sections.len(), container);
        self.mark_dirty(now);
    }

    /// Restores the canonical transform for the current layout.
    pub fn reset_view(&mut self, container: Vec2, now: Instant) {
        self.viewport =
            CanvasTransform::reset_for(self.framework.layout, self.sections.len(), container);
        self.mark_dirty(now);
    }

    /// Records a viewport mutation (pan or zoom) for autosave purposes.
    pub fn viewport_changed(&mut self, now: Instant) {
        self.mark_dirty(now);
    }

    // ─── note operations ─────────────────────────────────────────────────

    /// Appends a blank note and returns its id so the UI can open it in
    /// edit mode. `None` when the section is gone.
    pub fn add_note(&mut self, section_id: Uuid, now: Instant) -> Option<Uuid> {
        let section = self.section_mut(section_id)?;
        let note = Note::blank();
        let id = note.id;
        section.notes.push(note);
        self.mark_dirty(now);
        Some(id)
    }

    /// Replaces a note's content in place. Free text, no validation.
    pub fn update_note(&mut self, section_id: Uuid, note_id: Uuid, content: String, now: Instant) {
        if let Some(note) = self
            .section_mut(section_id)
            .and_then(|s| s.note_mut(note_id))
        {
            if note.content != content {
                note.content = content;
                self.mark_dirty(now);
            }
        }
    }

    /// Removes a note by id. A miss is a no-op: a concurrent drag-and-delete
    /// race must not fail.
    pub fn delete_note(&mut self, section_id: Uuid, note_id: Uuid, now: Instant) {
        if let Some(section) = self.section_mut(section_id) {
            let before = section.notes.len();
            section.notes.retain(|n| n.id != note_id);
            if section.notes.len() != before {
                self.mark_dirty(now);
            }
        }
    }

    pub fn set_note_color(&mut self, section_id: Uuid, note_id: Uuid, color: NoteColor, now: Instant) {
        if let Some(note) = self
            .section_mut(section_id)
            .and_then(|s| s.note_mut(note_id))
        {
            if note.color != color {
                note.color = color;
                self.mark_dirty(now);
            }
        }
    }

    /// Advances a note through the fixed color palette.
    pub fn cycle_note_color(&mut self, section_id: Uuid, note_id: Uuid, now: Instant) {
        if let Some(next) = self
            .section(section_id)
            .and_then(|s| s.note(note_id))
            .map(|n| n.color.next())
        {
            self.set_note_color(section_id, note_id, next, now);
        }
    }

    /// Bulk-appends collaborator output, preserving the section's existing
    /// notes and their order.
    pub fn append_generated(&mut self, section_id: Uuid, notes: Vec<Note>, now: Instant) {
        if let Some(section) = self.section_mut(section_id) {
            if !notes.is_empty() {
                section.notes.extend(notes);
                self.mark_dirty(now);
            }
        }
    }

    /// Moves a note between sections in one state transition: the note is
    /// looked up, detached from its source, and appended to the destination
    /// with no observable intermediate state. Returns false (and changes
    /// nothing) when the payload is stale: same section, unknown note, or
    /// unknown destination.
    pub fn move_note(&mut self, drag: NoteDrag, dest_section: Uuid, now: Instant) -> bool {
        if drag.source_section == dest_section {
            return false;
        }
        if self.section(dest_section).is_none() {
            return false;
        }
        let Some(source) = self.section_mut(drag.source_section) else {
            return false;
        };
        let Some(pos) = source.notes.iter().position(|n| n.id == drag.note_id) else {
            return false;
        };
        let note = source.notes.remove(pos);
        self.section_mut(dest_section)
            .expect("destination checked above")
            .notes
            .push(note);
        self.mark_dirty(now);
        true
    }

    /// Mints a brand-new section from a template and appends it to the
    /// board. The inserted instance shares no ids with the stored copy.
    pub fn insert_template(&mut self, template: &SectionTemplate, now: Instant) -> Uuid {
        let section = template.instantiate();
        let id = section.id;
        self.sections.push(section);
        self.mark_dirty(now);
        id
    }

    // ─── autosave debounce ───────────────────────────────────────────────

    fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// True exactly once per quiescent edit burst: when the delay has
    /// elapsed since the latest change, the dirty flag is consumed and the
    /// caller fires the save sink with the state as it is *now*.
    pub fn take_due_save(&mut self, now: Instant) -> bool {
        match self.dirty_since {
            Some(last) if now.duration_since(last) >= autosave_delay() => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }

    /// Consumes the dirty flag regardless of the delay, for explicit saves.
    pub fn take_save_now(&mut self) {
        self.dirty_since = None;
    }

    /// How long until the pending save is due, for repaint scheduling.
    pub fn time_until_save(&self, now: Instant) -> Option<Duration> {
        let last = self.dirty_since?;
        Some(autosave_delay().saturating_sub(now.duration_since(last)))
    }

    // ─── export ──────────────────────────────────────────────────────────

    /// Serializes the current state into a self-contained transferable
    /// document. Pure and synchronous; does not touch the autosave channel.
    pub fn export(&self, date: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            version: EXPORT_VERSION,
            problem: self.problem.clone(),
            framework: self.framework.name.clone(),
            date,
            sections: self.sections.clone(),
            viewport: self.viewport,
        }
    }
}

fn autosave_delay() -> Duration {
    Duration::from_millis(AUTOSAVE_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ideas::fallback_sections;
    use crate::library::builtin_frameworks;
    use egui::vec2;
    use std::collections::HashSet;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn swot_board() -> Board {
        let framework = builtin_frameworks()
            .into_iter()
            .find(|f| f.name == "SWOT Analysis")
            .unwrap();
        let sections = fallback_sections(&framework);
        Board::resume(
            "ship faster".into(),
            framework,
            sections,
            None,
            vec2(1280.0, 800.0),
        )
    }

    /// Every note id in the board belongs to exactly one section.
    fn assert_single_ownership(board: &Board) {
        let mut seen = HashSet::new();
        for section in board.sections() {
            for note in &section.notes {
                assert!(seen.insert(note.id), "note {} owned twice", note.id);
            }
        }
    }

    #[test]
    fn add_update_delete_round_trip() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let section = board.sections()[0].id;

        let note = board.add_note(section, t0).unwrap();
        assert_eq!(board.section(section).unwrap().notes.len(), 1);
        assert!(board.section(section).unwrap().note(note).unwrap().content.is_empty());

        board.update_note(section, note, "try trunk-based dev".into(), t0);
        assert_eq!(
            board.section(section).unwrap().note(note).unwrap().content,
            "try trunk-based dev"
        );

        board.delete_note(section, note, t0);
        assert!(board.section(section).unwrap().notes.is_empty());
        // deleting again is a silent no-op
        board.delete_note(section, note, t0);
    }

    #[test]
    fn move_is_atomic_and_preserves_order() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let q1 = board.sections()[0].id;
        let q3 = board.sections()[2].id;

        let a = board.add_note(q1, t0).unwrap();
        let b = board.add_note(q1, t0).unwrap();
        let c = board.add_note(q1, t0).unwrap();
        let existing = board.add_note(q3, t0).unwrap();

        let drag = NoteDrag {
            note_id: a,
            source_section: q1,
        };
        assert!(board.move_note(drag, q3, t0));

        let q1_ids: Vec<Uuid> = board.section(q1).unwrap().notes.iter().map(|n| n.id).collect();
        let q3_ids: Vec<Uuid> = board.section(q3).unwrap().notes.iter().map(|n| n.id).collect();
        assert_eq!(q1_ids, vec![b, c]);
        assert_eq!(q3_ids, vec![existing, a]);
        assert_single_ownership(&board);
    }

    #[test]
    fn same_section_move_is_a_cancel() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let q1 = board.sections()[0].id;
        let a = board.add_note(q1, t0).unwrap();
        let b = board.add_note(q1, t0).unwrap();
        board.take_save_now();

        let drag = NoteDrag {
            note_id: a,
            source_section: q1,
        };
        assert!(!board.move_note(drag, q1, t0));
        let ids: Vec<Uuid> = board.section(q1).unwrap().notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(!board.is_dirty());
    }

    #[test]
    fn stale_drag_payloads_are_noops() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let q1 = board.sections()[0].id;
        let q2 = board.sections()[1].id;
        let note = board.add_note(q1, t0).unwrap();

        // note already deleted
        board.delete_note(q1, note, t0);
        assert!(!board.move_note(
            NoteDrag {
                note_id: note,
                source_section: q1
            },
            q2,
            t0
        ));

        // unknown destination
        let survivor = board.add_note(q1, t0).unwrap();
        assert!(!board.move_note(
            NoteDrag {
                note_id: survivor,
                source_section: q1
            },
            Uuid::new_v4(),
            t0
        ));
        assert_eq!(board.section(q1).unwrap().notes.len(), 1);
        assert_single_ownership(&board);
    }

    #[test]
    fn ownership_holds_across_operation_sequences() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let ids: Vec<Uuid> = board.sections().iter().map(|s| s.id).collect();

        for (i, section) in ids.iter().enumerate() {
            for _ in 0..=i {
                board.add_note(*section, t0);
            }
        }
        board.append_generated(
            ids[1],
            vec![
                Note::generated("x".into(), NoteColor::Blue),
                Note::generated("y".into(), NoteColor::Green),
            ],
            t0,
        );

        // shuffle notes around
        for source in &ids {
            if let Some(first) = board.section(*source).unwrap().notes.first().map(|n| n.id) {
                let dest = ids[(ids.iter().position(|s| s == source).unwrap() + 1) % ids.len()];
                board.move_note(
                    NoteDrag {
                        note_id: first,
                        source_section: *source,
                    },
                    dest,
                    t0,
                );
            }
        }
        assert_single_ownership(&board);
    }

    #[test]
    fn append_generated_preserves_existing_notes() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let section = board.sections()[0].id;
        let manual = board.add_note(section, t0).unwrap();
        board.update_note(section, manual, "mine".into(), t0);

        board.append_generated(
            section,
            vec![Note::generated("theirs".into(), NoteColor::Yellow)],
            t0,
        );
        let notes = &board.section(section).unwrap().notes;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content, "mine");
        assert!(notes[1].is_ai_generated);
    }

    #[test]
    fn autosave_coalesces_rapid_edits_into_one_save() {
        let mut board = swot_board();
        let section = board.sections()[0].id;
        let t0 = Instant::now();

        // edits at t=0, 100, 200 within a single debounce window
        board.add_note(section, t0);
        board.add_note(section, t0 + ms(100));
        board.add_note(section, t0 + ms(200));

        // not due until the delay elapses after the LAST edit
        assert!(!board.take_due_save(t0 + ms(500)));
        assert!(!board.take_due_save(t0 + ms(1100)));
        // due exactly once, carrying the latest state
        assert!(board.take_due_save(t0 + ms(1200)));
        assert_eq!(board.section(section).unwrap().notes.len(), 3);
        assert!(!board.take_due_save(t0 + ms(5000)));
    }

    #[test]
    fn explicit_save_bypasses_the_debounce() {
        let mut board = swot_board();
        let t0 = Instant::now();
        board.add_note(board.sections()[0].id, t0);
        assert!(board.is_dirty());
        board.take_save_now();
        assert!(!board.is_dirty());
        assert!(!board.take_due_save(t0 + ms(2000)));
    }

    #[test]
    fn export_snapshot_matches_state() {
        let framework = builtin_frameworks()
            .into_iter()
            .find(|f| f.name == "First Principles")
            .unwrap();
        let sections = vec![
            Section::new("Identify Assumptions".into(), String::new()),
            Section::new("Break Down to Basics".into(), String::new()),
        ];
        let mut board = Board::resume(
            "ship faster".into(),
            framework,
            sections,
            None,
            vec2(1280.0, 800.0),
        );
        board.viewport = CanvasTransform {
            x: 10.0,
            y: 20.0,
            scale: 1.1,
        };
        let doc = board.export(Utc::now());
        assert_eq!(doc.version, EXPORT_VERSION);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.viewport.scale, 1.1);
        assert_eq!(doc.viewport.x, 10.0);
        assert_eq!(doc.framework, "First Principles");
        assert_eq!(doc.problem, "ship faster");
    }

    #[test]
    fn export_document_serializes_with_version_and_iso_date() {
        let board = swot_board();
        let date = chrono::DateTime::parse_from_rfc3339("2026-08-08T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let doc = board.export(date);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["date"]
            .as_str()
            .unwrap()
            .starts_with("2026-08-08T10:00:00"));
        assert_eq!(value["sections"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn template_insertion_mints_a_detached_section() {
        let mut board = swot_board();
        let t0 = Instant::now();
        let source = board.sections()[0].id;
        board.add_note(source, t0);
        let template =
            SectionTemplate::from_section(board.section(source).unwrap(), "tpl".into());

        let inserted = board.insert_template(&template, t0);
        assert_ne!(inserted, source);
        assert_eq!(board.sections().len(), 5);
        assert_single_ownership(&board);
    }
}
