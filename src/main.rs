mod board;
mod constants;
mod drag;
mod ideas;
mod layout;
mod library;
mod note;
mod paths;
mod storage;
mod transform;

use std::sync::Arc;
use std::time::{Duration, Instant};

use board::Board;
use chrono::Utc;
use constants::*;
use drag::{DragState, NoteDrag};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use egui::{pos2, vec2};
use ideas::{fallback_sections, IdeaWorkers, SeedIdeaSource};
use layout::{badge_label, section_style, slot_origin, KeywordHatResolver, SectionStyle};
use library::{builtin_frameworks, Framework};
use note::{Note, Section, SectionTemplate};
use paths::AppPaths;
use storage::{SaveSink, SavedSession, SessionStore, TemplateStore};
use transform::{CanvasTransform, PanGesture};
use uuid::Uuid;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "ThinkBoard",
        options,
        Box::new(|_cc| Ok(Box::new(ThinkBoardApp::new()))),
    )
}

/// World-space geometry of one section card for the current frame.
struct CardGeom {
    id: Uuid,
    index: usize,
    world: Rect,
}

/// Intents collected while rendering the canvas, applied to the board once
/// the frame's immutable borrows are released.
enum CanvasAction {
    AddNote(Uuid),
    UpdateNote(Uuid, Uuid, String),
    DeleteNote(Uuid, Uuid),
    CycleColor(Uuid, Uuid),
    MoveNote(NoteDrag, Uuid),
    BeginDrag(Uuid, Uuid),
    BeginEdit(Uuid, Uuid),
    EndEdit,
    RequestIdeas(Uuid),
    OpenTemplatePrompt(Uuid),
}

/// The mutable slices of app state the card renderer needs, split out so the
/// board can stay immutably borrowed while a note editor is live.
struct CardCtx<'a> {
    editing: Option<(Uuid, Uuid)>,
    edit_buffer: &'a mut String,
    editor_needs_focus: &'a mut bool,
    dragged_note: Option<Uuid>,
    hover_target: Option<Uuid>,
}

struct ThinkBoardApp {
    // setup screen
    catalog: Vec<Framework>,
    problem_input: String,
    framework_choice: usize,

    // live session
    session_id: Uuid,
    board: Option<Board>,
    workers: IdeaWorkers,
    drag: DragState,
    pan: PanGesture,
    editing: Option<(Uuid, Uuid)>,
    edit_buffer: String,
    editor_needs_focus: bool,
    hats: KeywordHatResolver,

    // templates
    templates: Vec<SectionTemplate>,
    template_prompt: Option<(Uuid, String)>,

    // persistence
    session_store: Option<SessionStore>,
    template_store: Option<TemplateStore>,
    has_stored_session: bool,

    last_error: Option<String>,
}

impl ThinkBoardApp {
    fn new() -> Self {
        let paths = AppPaths::from_project_dirs();
        if let Some(paths) = &paths {
            if let Err(err) = paths.ensure_dirs_exist() {
                log::error!("failed to create data directories: {err}");
            }
        }
        let session_store = paths.as_ref().map(|p| SessionStore::new(p.session_file()));
        let template_store = paths.as_ref().map(|p| TemplateStore::new(p.templates_file()));
        let templates = template_store.as_ref().map(|s| s.load()).unwrap_or_default();
        let has_stored_session = session_store
            .as_ref()
            .is_some_and(|store| matches!(store.load(), Ok(Some(_))));

        Self {
            catalog: builtin_frameworks(),
            problem_input: String::new(),
            framework_choice: 0,
            session_id: Uuid::new_v4(),
            board: None,
            workers: IdeaWorkers::new(Arc::new(SeedIdeaSource)),
            drag: DragState::default(),
            pan: PanGesture::default(),
            editing: None,
            edit_buffer: String::new(),
            editor_needs_focus: false,
            hats: KeywordHatResolver,
            templates,
            template_prompt: None,
            session_store,
            template_store,
            has_stored_session,
            last_error: None,
        }
    }

    fn start_session(&mut self) {
        // a fresh session supersedes the stored one
        if let Some(store) = &self.session_store {
            store.clear();
        }
        self.has_stored_session = false;

        let framework = self.catalog[self.framework_choice].clone();
        let problem = self.problem_input.trim().to_string();
        self.session_id = Uuid::new_v4();
        self.board = Some(Board::new(problem.clone(), framework.clone()));
        self.workers.request_initial(problem, framework);
        self.last_error = None;
        self.editing = None;
        self.drag.cancel();
    }

    fn resume_session(&mut self, container: Vec2) {
        let Some(store) = &self.session_store else {
            return;
        };
        match store.load() {
            Ok(Some(saved)) => {
                self.session_id = saved.id;
                self.board = Some(Board::resume(
                    saved.problem,
                    saved.framework,
                    saved.sections,
                    saved.viewport,
                    container,
                ));
                self.last_error = None;
                log::info!("resumed session {}", self.session_id);
            }
            Ok(None) => self.has_stored_session = false,
            Err(err) => {
                log::error!("failed to resume session: {err}");
                self.last_error = Some("Could not load the saved session".to_string());
                self.has_stored_session = false;
            }
        }
    }

    fn persist_session(&mut self) {
        let Some(board) = &self.board else { return };
        let session = SavedSession {
            id: self.session_id,
            problem: board.problem.clone(),
            framework: board.framework.clone(),
            sections: board.sections().to_vec(),
            viewport: Some(board.viewport),
            last_modified: Utc::now(),
        };
        if let Some(store) = &self.session_store {
            store.save(&session);
            self.has_stored_session = true;
        }
    }

    fn save_now(&mut self) {
        self.persist_session();
        if let Some(board) = self.board.as_mut() {
            board.take_save_now();
        }
    }

    fn leave_workspace(&mut self) {
        self.save_now();
        self.board = None;
        self.editing = None;
        self.drag.cancel();
        self.pan.end();
    }

    fn export_board(&mut self) {
        let Some(board) = &self.board else { return };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Board export", &["json"])
            .set_file_name("think-board-export.json")
            .save_file()
        else {
            return;
        };
        let document = board.export(Utc::now());
        match storage::write_export(&path, &document) {
            Ok(()) => log::info!("exported board to {}", path.display()),
            Err(err) => {
                log::error!("export failed: {err}");
                self.last_error = Some("Export failed".to_string());
            }
        }
    }

    fn persist_templates(&mut self) {
        if let Some(store) = &self.template_store {
            if let Err(err) = store.store(&self.templates) {
                log::error!("failed to store templates: {err}");
                self.last_error = Some("Could not save templates".to_string());
            }
        }
    }

    fn poll_workers(&mut self, container: Vec2, now: Instant) {
        if let Some(reply) = self.workers.poll_initial() {
            if let Some(board) = self.board.as_mut() {
                match reply {
                    Ok(sections) if !sections.is_empty() => {
                        board.install_sections(sections, container, now);
                        log::info!("workspace generated");
                    }
                    Ok(_) => {
                        board.install_sections(
                            fallback_sections(&board.framework),
                            container,
                            now,
                        );
                        log::warn!("collaborator returned no sections, using framework steps");
                    }
                    Err(err) => {
                        board.install_sections(
                            fallback_sections(&board.framework),
                            container,
                            now,
                        );
                        log::error!("board generation failed: {err}");
                        self.last_error =
                            Some("Idea generation failed, starting from blank steps".to_string());
                    }
                }
            }
        }

        for (section_id, reply) in self.workers.poll_sections() {
            let Some(board) = self.board.as_mut() else { break };
            match reply {
                Ok(notes) => board.append_generated(section_id, notes, now),
                Err(err) => {
                    log::error!("idea generation failed for section {section_id}: {err}");
                    self.last_error = Some("Idea generation failed".to_string());
                }
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<CanvasAction>, now: Instant) {
        for action in actions {
            match action {
                CanvasAction::AddNote(section) => {
                    if let Some(board) = self.board.as_mut() {
                        if let Some(note) = board.add_note(section, now) {
                            self.editing = Some((section, note));
                            self.edit_buffer.clear();
                            self.editor_needs_focus = true;
                        }
                    }
                }
                CanvasAction::UpdateNote(section, note, content) => {
                    if let Some(board) = self.board.as_mut() {
                        board.update_note(section, note, content, now);
                    }
                }
                CanvasAction::DeleteNote(section, note) => {
                    if self.editing == Some((section, note)) {
                        self.editing = None;
                    }
                    if let Some(board) = self.board.as_mut() {
                        board.delete_note(section, note, now);
                    }
                }
                CanvasAction::CycleColor(section, note) => {
                    if let Some(board) = self.board.as_mut() {
                        board.cycle_note_color(section, note, now);
                    }
                }
                CanvasAction::MoveNote(payload, dest) => {
                    if let Some(board) = self.board.as_mut() {
                        board.move_note(payload, dest, now);
                    }
                }
                CanvasAction::BeginDrag(section, note) => {
                    if self.editing != Some((section, note)) {
                        self.drag.begin(note, section);
                    }
                }
                CanvasAction::BeginEdit(section, note) => {
                    let content = self
                        .board
                        .as_ref()
                        .and_then(|b| b.section(section))
                        .and_then(|s| s.note(note))
                        .map(|n| n.content.clone());
                    if let Some(content) = content {
                        self.editing = Some((section, note));
                        self.edit_buffer = content;
                        self.editor_needs_focus = true;
                    }
                }
                CanvasAction::EndEdit => self.editing = None,
                CanvasAction::RequestIdeas(section_id) => {
                    let request = self.board.as_ref().and_then(|board| {
                        board.section(section_id).map(|section| {
                            (
                                board.problem.clone(),
                                board.framework.clone(),
                                section.title.clone(),
                                section
                                    .notes
                                    .iter()
                                    .map(|n| n.content.clone())
                                    .collect::<Vec<_>>(),
                            )
                        })
                    });
                    if let Some((problem, framework, title, existing)) = request {
                        self.workers
                            .request_section(section_id, problem, framework, title, existing);
                    }
                }
                CanvasAction::OpenTemplatePrompt(section_id) => {
                    let title = self
                        .board
                        .as_ref()
                        .and_then(|b| b.section(section_id))
                        .map(|s| s.title.clone())
                        .unwrap_or_default();
                    self.template_prompt = Some((section_id, title));
                }
            }
        }
    }

    // ─── screens ─────────────────────────────────────────────────────────

    fn setup_ui(&mut self, ui: &mut egui::Ui, container: Vec2) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading(RichText::new("ThinkBoard").size(32.0).color(COLOR_INK));
            ui.label(
                RichText::new("Describe the problem, pick a framework, and think in space.")
                    .color(COLOR_MUTED),
            );
            ui.add_space(24.0);

            let width = 520.0_f32.min(ui.available_width() - 40.0);
            ui.allocate_ui(vec2(width, 0.0), |ui| {
                ui.label("Problem statement");
                ui.add(
                    egui::TextEdit::multiline(&mut self.problem_input)
                        .desired_rows(3)
                        .desired_width(width)
                        .hint_text("What are you trying to figure out?"),
                );
                ui.add_space(12.0);

                ui.label("Framework");
                let current_name = self.catalog[self.framework_choice].name.clone();
                egui::ComboBox::from_id_salt("framework_picker")
                    .width(width)
                    .selected_text(current_name)
                    .show_ui(ui, |ui| {
                        for (i, fw) in self.catalog.iter().enumerate() {
                            ui.selectable_value(&mut self.framework_choice, i, &fw.name);
                        }
                    });
                let chosen = &self.catalog[self.framework_choice];
                ui.label(RichText::new(&chosen.description).color(COLOR_MUTED).small());
                ui.label(
                    RichText::new(chosen.steps.join("  ·  "))
                        .color(COLOR_MUTED)
                        .small(),
                );
                ui.add_space(20.0);

                let can_start = !self.problem_input.trim().is_empty();
                if ui
                    .add_enabled(can_start, egui::Button::new("Start brainstorming"))
                    .clicked()
                {
                    self.start_session();
                }
                if self.has_stored_session && ui.button("Resume previous session").clicked() {
                    self.resume_session(container);
                }
            });

            if let Some(err) = &self.last_error {
                ui.add_space(12.0);
                ui.colored_label(Color32::from_rgb(185, 28, 28), err);
            }
        });
    }

    fn loading_ui(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 2.0 - 40.0);
            ui.spinner();
            ui.add_space(8.0);
            ui.label("Building workspace...");
        });
        ui.ctx().request_repaint_after(Duration::from_millis(100));
    }

    fn toolbar(&mut self, ctx: &egui::Context, container: Vec2, now: Instant) {
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(COLOR_TOOLBAR_BG)
                    .inner_margin(4.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let tool_button = |ui: &mut egui::Ui, icon: &str, tip: &str| {
                        ui.add(
                            egui::Button::new(RichText::new(icon).size(20.0))
                                .min_size(vec2(30.0, 30.0))
                                .frame(false),
                        )
                        .on_hover_text(tip.to_string())
                    };

                    if tool_button(ui, "⬅", "Back to setup (saves first)").clicked() {
                        self.leave_workspace();
                        return;
                    }
                    ui.separator();

                    if tool_button(ui, "💾", "Save now").clicked() {
                        self.save_now();
                    }
                    if tool_button(ui, "📤", "Export board as JSON").clicked() {
                        self.export_board();
                    }
                    ui.separator();

                    if tool_button(ui, "🎯", "Reset view").clicked() {
                        if let Some(board) = self.board.as_mut() {
                            board.reset_view(container, now);
                        }
                    }
                    if tool_button(ui, "➖", "Zoom out").clicked() {
                        if let Some(board) = self.board.as_mut() {
                            board.viewport.zoom_centered(container, -ZOOM_BUTTON_STEP);
                            board.viewport_changed(now);
                        }
                    }
                    if tool_button(ui, "➕", "Zoom in").clicked() {
                        if let Some(board) = self.board.as_mut() {
                            board.viewport.zoom_centered(container, ZOOM_BUTTON_STEP);
                            board.viewport_changed(now);
                        }
                    }
                    ui.separator();

                    ui.menu_button(RichText::new("📑").size(20.0), |ui| {
                        self.templates_menu(ui, now);
                    })
                    .response
                    .on_hover_text("Section templates");

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(err) = &self.last_error {
                            ui.colored_label(Color32::from_rgb(252, 165, 165), err.clone());
                        } else if let Some(board) = &self.board {
                            let status = if board.is_dirty() { "· editing" } else { "· saved" };
                            ui.colored_label(
                                Color32::GRAY,
                                format!("{} {}", board.framework.name, status),
                            );
                        }
                    });
                });
            });
    }

    fn templates_menu(&mut self, ui: &mut egui::Ui, now: Instant) {
        if self.templates.is_empty() {
            ui.label(RichText::new("No saved templates").color(COLOR_MUTED));
            ui.label(
                RichText::new("Use the 🔖 button on a section header to save one.")
                    .color(COLOR_MUTED)
                    .small(),
            );
            return;
        }

        let mut insert: Option<usize> = None;
        let mut remove: Option<usize> = None;
        for (i, template) in self.templates.iter().enumerate() {
            ui.horizontal(|ui| {
                if ui.button(&template.name).clicked() {
                    insert = Some(i);
                }
                ui.label(
                    RichText::new(format!("{} notes", template.data.notes.len()))
                        .color(COLOR_MUTED)
                        .small(),
                );
                if ui.small_button("🗑").on_hover_text("Delete template").clicked() {
                    remove = Some(i);
                }
            });
        }

        if let Some(i) = insert {
            let template = self.templates[i].clone();
            if let Some(board) = self.board.as_mut() {
                board.insert_template(&template, now);
            }
            ui.close_menu();
        }
        if let Some(i) = remove {
            self.templates.remove(i);
            self.persist_templates();
        }
    }

    fn template_prompt_window(&mut self, ctx: &egui::Context) {
        let Some((section_id, mut name)) = self.template_prompt.take() else {
            return;
        };
        let mut keep_open = true;
        let mut saved = false;
        egui::Window::new("Save section as template")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Template name");
                ui.text_edit_singleline(&mut name);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let can_save = !name.trim().is_empty();
                    if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                        saved = true;
                        keep_open = false;
                    }
                    if ui.button("Cancel").clicked() {
                        keep_open = false;
                    }
                });
            });

        if saved {
            let snapshot = self
                .board
                .as_ref()
                .and_then(|b| b.section(section_id))
                .map(|section| SectionTemplate::from_section(section, name.trim().to_string()));
            if let Some(template) = snapshot {
                self.templates.push(template);
                self.persist_templates();
            }
        } else if keep_open {
            self.template_prompt = Some((section_id, name));
        }
    }

    // ─── canvas ──────────────────────────────────────────────────────────

    fn canvas_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        let canvas_rect = ui.available_rect_before_wrap();
        let _ = ui.allocate_rect(canvas_rect, Sense::hover());
        let origin = canvas_rect.min;

        let input = ui.input(|i| i.clone());
        let pointer = input.pointer.hover_pos();

        // world geometry for the frame, from the pre-input board state
        let (cards, layout, viewport_before) = {
            let board = self.board.as_ref().expect("canvas needs a board");
            let layout = board.layout();
            let cards: Vec<CardGeom> = board
                .sections()
                .iter()
                .enumerate()
                .map(|(index, section)| CardGeom {
                    id: section.id,
                    index,
                    world: Rect::from_min_size(
                        slot_origin(layout, index),
                        vec2(SECTION_WIDTH, section_height(section)),
                    ),
                })
                .collect();
            (cards, layout, board.viewport)
        };
        let card_at = |p: Pos2| {
            cards
                .iter()
                .find(|c| world_to_screen_rect(&viewport_before, origin, c.world).contains(p))
                .map(|c| c.id)
        };

        // wheel-to-zoom, centered at the cursor, no modifier held
        if let Some(p) = pointer {
            let scroll = input.raw_scroll_delta.y;
            if scroll != 0.0 && input.modifiers.is_none() && canvas_rect.contains(p) {
                if let Some(board) = self.board.as_mut() {
                    let focal = (p - origin).to_pos2();
                    board.viewport.zoom(focal, scroll * ZOOM_SENSITIVITY);
                    board.viewport_changed(now);
                }
            }
        }

        // drag-to-pan: begins only on empty canvas, never inside a card
        let pan_pressed = input.pointer.button_pressed(egui::PointerButton::Primary)
            || input.pointer.button_pressed(egui::PointerButton::Middle);
        let pan_held = input.pointer.button_down(egui::PointerButton::Primary)
            || input.pointer.button_down(egui::PointerButton::Middle);
        if pan_pressed {
            if let Some(p) = pointer {
                if canvas_rect.contains(p) && card_at(p).is_none() && !self.drag.is_dragging() {
                    self.pan.begin(p);
                    self.editing = None;
                }
            }
        }
        if self.pan.is_active() {
            match (pan_held, pointer) {
                (true, Some(p)) if canvas_rect.contains(p) => {
                    if let Some(delta) = self.pan.update(p) {
                        if delta != Vec2::ZERO {
                            if let Some(board) = self.board.as_mut() {
                                board.viewport.pan(delta);
                                board.viewport_changed(now);
                            }
                        }
                    }
                }
                _ => self.pan.end(),
            }
        }

        if input.key_pressed(egui::Key::Escape) {
            self.drag.cancel();
            self.editing = None;
        }

        let mut actions: Vec<CanvasAction> = Vec::new();

        // note drag: keep a single target highlighted, settle on release
        if self.drag.is_dragging() {
            self.drag.set_hover(pointer.and_then(card_at));
            if input.pointer.button_released(egui::PointerButton::Primary) {
                let hover = self.drag.hover_target();
                if let Some((payload, dest)) = self.drag.finish(hover) {
                    actions.push(CanvasAction::MoveNote(payload, dest));
                }
            } else if !input.pointer.button_down(egui::PointerButton::Primary) {
                // release happened outside the window; nothing to drop onto
                self.drag.cancel();
            }
        }

        // paint with the post-input viewport so pan/zoom feel immediate
        let painter = ui.painter_at(canvas_rect);
        {
            let board = self.board.as_ref().expect("canvas needs a board");
            let viewport = board.viewport;
            let zoom = viewport.scale;
            draw_dot_grid(&painter, canvas_rect, &viewport);

            let mut card_ctx = CardCtx {
                editing: self.editing,
                edit_buffer: &mut self.edit_buffer,
                editor_needs_focus: &mut self.editor_needs_focus,
                dragged_note: self.drag.payload().map(|p| p.note_id),
                hover_target: self.drag.hover_target(),
            };

            for card in &cards {
                let rect = world_to_screen_rect(&viewport, origin, card.world);
                if !canvas_rect.intersects(rect) {
                    continue;
                }
                let Some(section) = board.section(card.id) else {
                    continue;
                };
                let style = section_style(layout, card.index, &section.title, &self.hats);
                let badge = badge_label(layout, card.index);
                let generating = self.workers.is_generating(card.id);

                draw_section_card(
                    ui,
                    &painter,
                    rect,
                    card.id,
                    section,
                    style,
                    &badge,
                    zoom,
                    generating,
                    &input,
                    &mut card_ctx,
                    &mut actions,
                );
            }

            // ghost of the dragged note follows the pointer
            if let (Some(payload), Some(p)) = (self.drag.payload(), pointer) {
                let ghost = board
                    .section(payload.source_section)
                    .and_then(|s| s.note(payload.note_id));
                if let Some(note) = ghost {
                    draw_note_ghost(&painter, p, note, zoom);
                }
            }
        }

        self.apply_actions(actions, now);
    }
}

impl eframe::App for ThinkBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let container = ctx.screen_rect().size();

        self.poll_workers(container, now);

        if self.board.is_some() {
            self.toolbar(ctx, container, now);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(COLOR_CANVAS_BG).inner_margin(0.0))
            .show(ctx, |ui| {
                if self.board.is_none() {
                    self.setup_ui(ui, container);
                } else if self.workers.init_in_flight() {
                    self.loading_ui(ui);
                } else {
                    self.canvas_ui(ui, now);
                }
            });

        self.template_prompt_window(ctx);

        // autosave: fire once the debounce window has been quiet
        let due = self
            .board
            .as_mut()
            .map(|b| b.take_due_save(now))
            .unwrap_or(false);
        if due {
            self.persist_session();
        }
        if let Some(wait) = self.board.as_ref().and_then(|b| b.time_until_save(now)) {
            ctx.request_repaint_after(wait);
        }
        if self.workers.any_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

// ─── canvas drawing ──────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn draw_section_card(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    rect: Rect,
    section_id: Uuid,
    section: &Section,
    style: SectionStyle,
    badge: &str,
    zoom: f32,
    generating: bool,
    input: &egui::InputState,
    ctx: &mut CardCtx<'_>,
    actions: &mut Vec<CanvasAction>,
) {
    let rounding = egui::Rounding::same(SECTION_CORNER_RADIUS * zoom);
    let mouse = input.pointer.hover_pos();
    let primary_clicked = input.pointer.button_clicked(egui::PointerButton::Primary);
    let is_drop_target = ctx.hover_target == Some(section_id);

    // card base and accent border
    painter.rect_filled(rect, rounding, COLOR_SECTION_BODY);
    let border = if is_drop_target {
        Stroke::new(3.0 * zoom, COLOR_DROP_TARGET_RING)
    } else {
        Stroke::new(1.5 * zoom, style.accent)
    };
    painter.rect_stroke(rect, rounding, border);

    // header
    let header_rect = Rect::from_min_size(rect.min, vec2(rect.width(), SECTION_HEADER_HEIGHT * zoom));
    painter.rect_filled(header_rect, rounding, style.header_fill);
    painter.text(
        header_rect.min + vec2(NOTE_PADDING * zoom, 10.0 * zoom),
        Align2::LEFT_TOP,
        &section.title,
        FontId::proportional(TITLE_FONT_SIZE * zoom),
        style.title_color,
    );

    // slot badge, right-aligned in the header next to the bookmark button
    let badge_font = FontId::proportional(DETAIL_FONT_SIZE * zoom);
    let badge_galley = painter.layout_no_wrap(badge.to_string(), badge_font, style.badge_text);
    let badge_pad = 5.0 * zoom;
    let bookmark_size = 18.0 * zoom;
    let badge_rect = Rect::from_min_size(
        pos2(
            rect.max.x - badge_galley.size().x - badge_pad * 2.0 - bookmark_size - 8.0 * zoom,
            rect.min.y + 10.0 * zoom,
        ),
        badge_galley.size() + vec2(badge_pad * 2.0, badge_pad),
    );
    painter.rect_filled(
        badge_rect,
        egui::Rounding::same(badge_rect.height() / 2.0),
        style.badge_fill,
    );
    painter.galley(
        badge_rect.min + vec2(badge_pad, badge_pad / 2.0),
        badge_galley,
        style.badge_text,
    );

    let bookmark_rect = Rect::from_min_size(
        pos2(rect.max.x - bookmark_size - 6.0 * zoom, rect.min.y + 8.0 * zoom),
        Vec2::splat(bookmark_size),
    );
    let bookmark_hovered = mouse.is_some_and(|p| bookmark_rect.contains(p));
    painter.text(
        bookmark_rect.center(),
        Align2::CENTER_CENTER,
        "🔖",
        FontId::proportional(DETAIL_FONT_SIZE * zoom),
        if bookmark_hovered {
            style.title_color
        } else {
            style.badge_text
        },
    );
    if primary_clicked && bookmark_hovered {
        actions.push(CanvasAction::OpenTemplatePrompt(section_id));
    }

    // description under the title
    let desc_galley = painter.layout(
        section.description.clone(),
        FontId::proportional(DETAIL_FONT_SIZE * zoom),
        COLOR_MUTED,
        rect.width() - NOTE_PADDING * 2.0 * zoom,
    );
    painter.galley(
        header_rect.min + vec2(NOTE_PADDING * zoom, 40.0 * zoom),
        desc_galley,
        COLOR_MUTED,
    );

    // notes area
    let footer_top = rect.max.y - SECTION_FOOTER_HEIGHT * zoom;
    let body_rect = Rect::from_min_max(
        pos2(rect.min.x, header_rect.max.y),
        pos2(rect.max.x, footer_top),
    );
    let body_painter = painter.with_clip_rect(body_rect.intersect(painter.clip_rect()));

    if section.notes.is_empty() && !is_drop_target {
        let hint = body_rect.shrink(NOTE_PADDING * 2.0 * zoom);
        body_painter.rect_stroke(
            hint,
            egui::Rounding::same(8.0 * zoom),
            Stroke::new(1.0 * zoom, COLOR_EMPTY_HINT),
        );
        body_painter.text(
            hint.center(),
            Align2::CENTER_CENTER,
            "Empty",
            FontId::proportional(DETAIL_FONT_SIZE * zoom),
            COLOR_EMPTY_HINT,
        );
    }

    let note_pitch = (NOTE_HEIGHT + NOTE_SPACING) * zoom;
    let mut hidden = 0usize;
    for (i, note) in section.notes.iter().enumerate() {
        let note_rect = Rect::from_min_size(
            pos2(
                body_rect.min.x + NOTE_PADDING * zoom,
                body_rect.min.y + NOTE_PADDING * zoom + i as f32 * note_pitch,
            ),
            vec2(rect.width() - NOTE_PADDING * 2.0 * zoom, NOTE_HEIGHT * zoom),
        );
        if note_rect.min.y > body_rect.max.y {
            hidden += 1;
            continue;
        }
        draw_note_card(
            ui,
            &body_painter,
            section_id,
            note,
            note_rect,
            zoom,
            input,
            ctx,
            actions,
        );
    }
    if hidden > 0 {
        painter.text(
            pos2(body_rect.center().x, body_rect.max.y - 4.0 * zoom),
            Align2::CENTER_BOTTOM,
            format!("+{hidden} more"),
            FontId::proportional(DETAIL_FONT_SIZE * zoom),
            COLOR_MUTED,
        );
    }

    // footer actions
    let footer_rect = Rect::from_min_max(pos2(rect.min.x, footer_top), rect.max);
    painter.rect_filled(footer_rect, rounding, COLOR_SECTION_FOOTER);
    let half = footer_rect.width() / 2.0;
    let add_rect = Rect::from_min_size(footer_rect.min, vec2(half, footer_rect.height()));
    let gen_rect = Rect::from_min_size(
        pos2(footer_rect.min.x + half, footer_rect.min.y),
        vec2(half, footer_rect.height()),
    );
    let add_hovered = mouse.is_some_and(|p| add_rect.contains(p));
    let gen_hovered = mouse.is_some_and(|p| gen_rect.contains(p));
    let action_font = FontId::proportional(ACTION_FONT_SIZE * zoom);

    painter.text(
        add_rect.center(),
        Align2::CENTER_CENTER,
        "＋ Note",
        action_font.clone(),
        if add_hovered { COLOR_INK } else { COLOR_MUTED },
    );
    let gen_label = if generating { "…" } else { "✨ Ideas" };
    let gen_color = if generating {
        COLOR_EMPTY_HINT
    } else if gen_hovered {
        COLOR_DROP_TARGET_RING
    } else {
        COLOR_MUTED
    };
    painter.text(
        gen_rect.center(),
        Align2::CENTER_CENTER,
        gen_label,
        action_font,
        gen_color,
    );

    if primary_clicked && add_hovered {
        actions.push(CanvasAction::AddNote(section_id));
    }
    if primary_clicked && gen_hovered && !generating {
        actions.push(CanvasAction::RequestIdeas(section_id));
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_note_card(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    section_id: Uuid,
    note: &Note,
    rect: Rect,
    zoom: f32,
    input: &egui::InputState,
    ctx: &mut CardCtx<'_>,
    actions: &mut Vec<CanvasAction>,
) {
    let rounding = egui::Rounding::same(NOTE_CORNER_RADIUS * zoom);
    let color = note.color;
    let is_editing = ctx.editing == Some((section_id, note.id));
    let being_dragged = ctx.dragged_note == Some(note.id);

    let fill = if being_dragged {
        color.fill().gamma_multiply(0.4)
    } else {
        color.fill()
    };
    painter.rect_filled(rect, rounding, fill);
    painter.rect_filled(
        Rect::from_min_size(rect.min, vec2(rect.width(), NOTE_ACCENT_HEIGHT * zoom)),
        rounding,
        color.accent(),
    );

    let mouse = input.pointer.hover_pos();
    let hovered = mouse.is_some_and(|p| rect.contains(p));

    if note.is_ai_generated {
        painter.text(
            pos2(rect.max.x - 6.0 * zoom, rect.min.y + 8.0 * zoom),
            Align2::RIGHT_TOP,
            "✨",
            FontId::proportional(DETAIL_FONT_SIZE * zoom),
            color.text().gamma_multiply(0.6),
        );
    }

    let inner = rect.shrink(NOTE_PADDING * zoom);
    if is_editing {
        let editor = egui::TextEdit::multiline(ctx.edit_buffer)
            .font(FontId::proportional(NOTE_FONT_SIZE * zoom))
            .text_color(color.text())
            .frame(false)
            .hint_text("Write your thought...");
        let response = ui.put(inner, editor);
        if *ctx.editor_needs_focus {
            response.request_focus();
            *ctx.editor_needs_focus = false;
        }
        if response.changed() {
            actions.push(CanvasAction::UpdateNote(
                section_id,
                note.id,
                ctx.edit_buffer.clone(),
            ));
        }
        if response.lost_focus() {
            actions.push(CanvasAction::EndEdit);
        }
        return;
    }

    let text = if note.content.is_empty() {
        "Empty note...".to_string()
    } else {
        note.content.clone()
    };
    let galley = painter.layout(
        text,
        FontId::proportional(NOTE_FONT_SIZE * zoom),
        color.text(),
        inner.width(),
    );
    let note_painter = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    note_painter.galley(inner.min, galley, color.text());

    // hover controls: delete and recolor
    let btn = NOTE_BUTTON_SIZE * zoom;
    let delete_rect = Rect::from_min_size(
        pos2(
            rect.max.x - btn - 4.0 * zoom,
            rect.min.y + (NOTE_ACCENT_HEIGHT + 2.0) * zoom,
        ),
        Vec2::splat(btn),
    );
    let recolor_rect = delete_rect.translate(vec2(-(btn + 4.0 * zoom), 0.0));
    let delete_hovered = mouse.is_some_and(|p| delete_rect.contains(p));
    let recolor_hovered = mouse.is_some_and(|p| recolor_rect.contains(p));

    if hovered {
        painter.text(
            delete_rect.center(),
            Align2::CENTER_CENTER,
            "✕",
            FontId::proportional(NOTE_FONT_SIZE * zoom),
            if delete_hovered {
                Color32::from_rgb(185, 28, 28)
            } else {
                color.text().gamma_multiply(0.5)
            },
        );
        painter.circle_filled(
            recolor_rect.center(),
            btn / 2.5,
            if recolor_hovered {
                color.next().accent()
            } else {
                color.next().accent().gamma_multiply(0.7)
            },
        );
    }

    let controls_hovered = delete_hovered || recolor_hovered;
    let primary_clicked = input.pointer.button_clicked(egui::PointerButton::Primary);
    if primary_clicked && hovered && delete_hovered {
        actions.push(CanvasAction::DeleteNote(section_id, note.id));
        return;
    }
    if primary_clicked && hovered && recolor_hovered {
        actions.push(CanvasAction::CycleColor(section_id, note.id));
    }

    let response = ui.interact(
        rect.intersect(painter.clip_rect()),
        ui.id().with(("note", note.id)),
        Sense::click_and_drag(),
    );
    if response.double_clicked() && !controls_hovered {
        actions.push(CanvasAction::BeginEdit(section_id, note.id));
    }
    if response.drag_started_by(egui::PointerButton::Primary) && !controls_hovered {
        actions.push(CanvasAction::BeginDrag(section_id, note.id));
    }
}

// ─── free helpers ────────────────────────────────────────────────────────

/// Card height grows with its notes up to the clamp; the notes area then
/// clips and reports the overflow.
fn section_height(section: &Section) -> f32 {
    let body = (section.notes.len() as f32 * (NOTE_HEIGHT + NOTE_SPACING) + NOTE_PADDING * 2.0)
        .max(SECTION_BODY_MIN_HEIGHT);
    (SECTION_HEADER_HEIGHT + body + SECTION_FOOTER_HEIGHT).min(SECTION_MAX_HEIGHT)
}

fn world_to_screen_rect(t: &CanvasTransform, origin: Pos2, world: Rect) -> Rect {
    let min = t.to_screen(world.min);
    let max = t.to_screen(world.max);
    Rect::from_min_max(origin + min.to_vec2(), origin + max.to_vec2())
}

fn draw_dot_grid(painter: &egui::Painter, rect: Rect, t: &CanvasTransform) {
    let spacing = 24.0 * t.scale;
    if spacing < 8.0 {
        return;
    }
    let radius = (1.5 * t.scale).min(2.0);
    let x0 = rect.min.x + t.x.rem_euclid(spacing) - spacing;
    let y0 = rect.min.y + t.y.rem_euclid(spacing) - spacing;
    let mut y = y0;
    while y <= rect.max.y + spacing {
        let mut x = x0;
        while x <= rect.max.x + spacing {
            painter.circle_filled(pos2(x, y), radius, COLOR_CANVAS_DOTS);
            x += spacing;
        }
        y += spacing;
    }
}

fn draw_note_ghost(painter: &egui::Painter, pointer: Pos2, note: &Note, zoom: f32) {
    let size = vec2(180.0, 48.0) * zoom.clamp(0.5, 1.2);
    let rect = Rect::from_min_size(pointer + vec2(8.0, 8.0), size);
    painter.rect_filled(
        rect,
        egui::Rounding::same(4.0),
        note.color.fill().gamma_multiply(0.9),
    );
    painter.rect_stroke(
        rect,
        egui::Rounding::same(4.0),
        Stroke::new(1.0, note.color.accent()),
    );
    let preview: String = note.content.chars().take(40).collect();
    painter.text(
        rect.left_center() + vec2(8.0, 0.0),
        Align2::LEFT_CENTER,
        if preview.is_empty() { "…" } else { preview.as_str() },
        FontId::proportional(12.0),
        note.color.text(),
    );
}
