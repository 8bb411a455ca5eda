//! Cross-section note relocation: the drag payload and the per-gesture
//! state machine.
//!
//! The payload is an explicit typed record, not loose key/value pairs: a
//! drop with a missing or stale payload is a no-op, never a crash. Exactly
//! one section may be highlighted as the drop target at any moment.

use uuid::Uuid;

/// What a note drag carries for its whole lifetime: which note left which
/// section. Recorded at drag start so the information survives no matter
/// which section receives the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteDrag {
    pub note_id: Uuid,
    pub source_section: Uuid,
}

/// Board-level view of an in-progress note drag.
///
/// Idle → Dragging (drag start) → Hovering (over a section) → drop/cancel →
/// Idle. Ending the gesture clears the highlight unconditionally.
#[derive(Debug, Default)]
pub struct DragState {
    payload: Option<NoteDrag>,
    hover: Option<Uuid>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<NoteDrag> {
        self.payload
    }

    /// The currently highlighted drop target, if any.
    pub fn hover_target(&self) -> Option<Uuid> {
        self.hover
    }

    pub fn begin(&mut self, note_id: Uuid, source_section: Uuid) {
        self.payload = Some(NoteDrag {
            note_id,
            source_section,
        });
        self.hover = None;
    }

    /// Updates the highlighted target while dragging. Entering a new section
    /// replaces the previous highlight; leaving all sections clears it.
    /// Ignored when no drag is active.
    pub fn set_hover(&mut self, target: Option<Uuid>) {
        if self.payload.is_some() {
            self.hover = target;
        }
    }

    /// Ends the gesture. Returns the move to perform when the drop landed on
    /// a section other than the note's source; a same-section drop, a drop
    /// outside every target, and a drop without a payload are all cancels.
    /// State is reset either way.
    pub fn finish(&mut self, dest: Option<Uuid>) -> Option<(NoteDrag, Uuid)> {
        let payload = self.payload.take();
        self.hover = None;
        let payload = payload?;
        let dest = dest?;
        if dest == payload.source_section {
            return None;
        }
        Some((payload, dest))
    }

    /// Cancels the gesture (escape, pointer lost) without producing a move.
    pub fn cancel(&mut self) {
        self.payload = None;
        self.hover = None;
    }
}
