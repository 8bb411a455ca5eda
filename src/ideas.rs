//! The idea-generation collaborator contract and the worker plumbing that
//! keeps requests off the UI thread.
//!
//! The UI never blocks on a source call: requests run on spawned threads and
//! results come back over channels polled once per frame. At most one
//! board-initialization request is in flight, and per-section requests are
//! serialized per section.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use uuid::Uuid;

use crate::library::Framework;
use crate::note::{Note, NoteColor, Section};

#[derive(Debug, Error)]
pub enum IdeaError {
    #[error("idea service unavailable: {0}")]
    Unavailable(String),
}

/// Transport-agnostic contract for the AI/template collaborator.
pub trait IdeaSource: Send + Sync {
    /// Produces the initial sections for a fresh board.
    fn initial_sections(
        &self,
        problem: &str,
        framework: &Framework,
    ) -> Result<Vec<Section>, IdeaError>;

    /// Produces additional notes for one section, given the contents the
    /// section already holds.
    fn section_notes(
        &self,
        problem: &str,
        framework: &Framework,
        section_title: &str,
        existing: &[String],
    ) -> Result<Vec<Note>, IdeaError>;
}

/// One empty section per framework step. The safety net when the
/// collaborator fails: the user is never blocked by service unavailability.
pub fn fallback_sections(framework: &Framework) -> Vec<Section> {
    framework
        .steps
        .iter()
        .map(|step| Section::new(step.clone(), "Add your thoughts here.".to_string()))
        .collect()
}

/// Deterministic offline source. Sections come straight from the framework
/// steps; per-section notes are numbered prompts so repeated generation
/// never repeats itself.
#[derive(Debug, Default)]
pub struct SeedIdeaSource;

impl IdeaSource for SeedIdeaSource {
    fn initial_sections(
        &self,
        _problem: &str,
        framework: &Framework,
    ) -> Result<Vec<Section>, IdeaError> {
        Ok(framework
            .steps
            .iter()
            .map(|step| {
                Section::new(
                    step.clone(),
                    format!("Collect thoughts for \"{step}\"."),
                )
            })
            .collect())
    }

    fn section_notes(
        &self,
        _problem: &str,
        _framework: &Framework,
        section_title: &str,
        existing: &[String],
    ) -> Result<Vec<Note>, IdeaError> {
        let palette = [NoteColor::Yellow, NoteColor::Blue, NoteColor::Green];
        let start = existing.len();
        Ok((0..3)
            .map(|i| {
                let n = start + i + 1;
                Note::generated(
                    format!("Prompt {n}: what else belongs under \"{section_title}\"?"),
                    palette[(start + i) % palette.len()],
                )
            })
            .collect())
    }
}

type SectionReply = Result<Vec<Section>, IdeaError>;
type NotesReply = Result<Vec<Note>, IdeaError>;

/// In-flight request tracking. Owned by the composition root; dropping it
/// abandons any outstanding workers (their sends fail harmlessly).
pub struct IdeaWorkers {
    source: Arc<dyn IdeaSource>,
    init: Option<Receiver<SectionReply>>,
    per_section: HashMap<Uuid, Receiver<NotesReply>>,
}

impl IdeaWorkers {
    pub fn new(source: Arc<dyn IdeaSource>) -> Self {
        Self {
            source,
            init: None,
            per_section: HashMap::new(),
        }
    }

    pub fn init_in_flight(&self) -> bool {
        self.init.is_some()
    }

    /// Kicks off board initialization. Returns false (and does nothing) if a
    /// request is already pending.
    pub fn request_initial(&mut self, problem: String, framework: Framework) -> bool {
        if self.init.is_some() {
            return false;
        }
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            let _ = tx.send(source.initial_sections(&problem, &framework));
        });
        self.init = Some(rx);
        true
    }

    /// Takes the initialization result if the worker has finished. A worker
    /// that died without replying is reported as unavailable.
    pub fn poll_initial(&mut self) -> Option<SectionReply> {
        let rx = self.init.as_ref()?;
        match rx.try_recv() {
            Ok(reply) => {
                self.init = None;
                Some(reply)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.init = None;
                Some(Err(IdeaError::Unavailable(
                    "idea worker exited without replying".to_string(),
                )))
            }
        }
    }

    /// Whether `section_id` already has a request in flight; the UI renders
    /// the generate action disabled while this holds.
    pub fn is_generating(&self, section_id: Uuid) -> bool {
        self.per_section.contains_key(&section_id)
    }

    /// Kicks off note generation for one section. Returns false if that
    /// section is already generating; other sections are unaffected.
    pub fn request_section(
        &mut self,
        section_id: Uuid,
        problem: String,
        framework: Framework,
        section_title: String,
        existing: Vec<String>,
    ) -> bool {
        if self.per_section.contains_key(&section_id) {
            return false;
        }
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            let _ = tx.send(source.section_notes(
                &problem,
                &framework,
                &section_title,
                &existing,
            ));
        });
        self.per_section.insert(section_id, rx);
        true
    }

    /// Drains every finished per-section request.
    pub fn poll_sections(&mut self) -> Vec<(Uuid, NotesReply)> {
        let mut finished = Vec::new();
        self.per_section.retain(|id, rx| match rx.try_recv() {
            Ok(reply) => {
                finished.push((*id, reply));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                finished.push((
                    *id,
                    Err(IdeaError::Unavailable(
                        "idea worker exited without replying".to_string(),
                    )),
                ));
                false
            }
        });
        finished
    }

    /// True while any request (init or per-section) is outstanding; used to
    /// keep the UI repainting while workers run.
    pub fn any_in_flight(&self) -> bool {
        self.init.is_some() || !self.per_section.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use crate::library::builtin_frameworks;
    use std::sync::mpsc::Sender;
    use std::sync::Mutex;
    use std::time::Duration;

    fn swot() -> Framework {
        builtin_frameworks()
            .into_iter()
            .find(|f| f.layout == LayoutKind::Matrix2x2)
            .unwrap()
    }

    /// Source that blocks until the test releases it, to make in-flight
    /// states observable.
    struct GatedSource {
        gate: Mutex<Receiver<()>>,
    }

    impl GatedSource {
        fn new() -> (Arc<Self>, Sender<()>) {
            let (tx, rx) = mpsc::channel();
            (
                Arc::new(Self {
                    gate: Mutex::new(rx),
                }),
                tx,
            )
        }

        fn wait(&self) {
            let gate = self.gate.lock().expect("gate poisoned");
            let _ = gate.recv_timeout(Duration::from_secs(5));
        }
    }

    impl IdeaSource for GatedSource {
        fn initial_sections(
            &self,
            _problem: &str,
            framework: &Framework,
        ) -> Result<Vec<Section>, IdeaError> {
            self.wait();
            Ok(fallback_sections(framework))
        }

        fn section_notes(
            &self,
            _problem: &str,
            _framework: &Framework,
            _section_title: &str,
            _existing: &[String],
        ) -> Result<Vec<Note>, IdeaError> {
            self.wait();
            Ok(vec![Note::generated("idea".into(), NoteColor::Yellow)])
        }
    }

    fn drain_initial(workers: &mut IdeaWorkers) -> SectionReply {
        for _ in 0..500 {
            if let Some(reply) = workers.poll_initial() {
                return reply;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("initial request never completed");
    }

    #[test]
    fn fallback_yields_one_empty_section_per_step() {
        let fw = swot();
        let sections = fallback_sections(&fw);
        assert_eq!(sections.len(), fw.steps.len());
        for (section, step) in sections.iter().zip(&fw.steps) {
            assert_eq!(&section.title, step);
            assert!(section.notes.is_empty());
        }
    }

    #[test]
    fn seed_source_numbers_prompts_past_existing_notes() {
        let fw = swot();
        let existing = vec!["one".to_string(), "two".to_string()];
        let notes = SeedIdeaSource
            .section_notes("problem", &fw, "Strengths", &existing)
            .unwrap();
        assert_eq!(notes.len(), 3);
        assert!(notes[0].content.starts_with("Prompt 3"));
        assert!(notes.iter().all(|n| n.is_ai_generated));
    }

    #[test]
    fn only_one_init_request_in_flight() {
        let (source, release) = GatedSource::new();
        let mut workers = IdeaWorkers::new(source);

        assert!(workers.request_initial("p".into(), swot()));
        assert!(workers.init_in_flight());
        // a second trigger while pending is refused, not queued
        assert!(!workers.request_initial("p".into(), swot()));

        release.send(()).unwrap();
        let reply = drain_initial(&mut workers);
        assert!(reply.is_ok());
        assert!(!workers.init_in_flight());
        // after completion a new request is allowed again
        assert!(workers.request_initial("p".into(), swot()));
        release.send(()).unwrap();
        drain_initial(&mut workers);
    }

    #[test]
    fn section_requests_serialize_per_section_only() {
        let (source, release) = GatedSource::new();
        let mut workers = IdeaWorkers::new(source);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(workers.request_section(a, "p".into(), swot(), "A".into(), vec![]));
        assert!(workers.is_generating(a));
        // same section: refused while pending
        assert!(!workers.request_section(a, "p".into(), swot(), "A".into(), vec![]));
        // a different section may run concurrently
        assert!(workers.request_section(b, "p".into(), swot(), "B".into(), vec![]));

        release.send(()).unwrap();
        release.send(()).unwrap();
        let mut finished = Vec::new();
        for _ in 0..500 {
            finished.extend(workers.poll_sections());
            if finished.len() == 2 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(finished.len(), 2);
        assert!(!workers.any_in_flight());
    }
}
