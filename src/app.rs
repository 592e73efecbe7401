use crate::assets::HatAssets;
use crate::background::SwappableImage;
use crate::hats::{HatCollection, HatCommand};
use crate::hotkeys::{HOTKEY_HELP, TrackedKey, TrackedModifier};
use crate::io::{self, LoadResult};
use crate::ops::{clipboard, compose};
use crate::stage::Stage;
use eframe::egui;
use egui::Pos2;
use std::sync::mpsc;

/// How long a status line stays in the bottom bar.
const STATUS_SECONDS: f64 = 4.0;

pub struct HatStackApp {
    background: SwappableImage,
    hats: HatCollection,
    stage: Stage,
    assets: HatAssets,
    /// Stamp currently selected in the picker strip.
    selected_stamp: usize,

    // Hotkeys (edge-detected, repeat-suppressed)
    flip_key: TrackedKey,
    reset_key: TrackedKey,
    duplicate_key: TrackedKey,
    delete_key: TrackedKey,
    unfocus_key: TrackedKey,
    /// Shift inverts the focused hat's aspect lock while held.
    aspect_modifier: TrackedModifier,

    // Async photo decode (background thread → mpsc)
    load_sender: mpsc::Sender<LoadResult>,
    load_receiver: mpsc::Receiver<LoadResult>,
    /// Generation of the most recent upload; stale decodes are discarded.
    load_token: u64,
    /// When > 0, a decode is in flight; show a spinner.
    pending_loads: usize,

    /// Transient status line: message + time it was posted.
    status: Option<(String, f64)>,
}

impl HatStackApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (load_sender, load_receiver) = mpsc::channel();
        Self {
            background: SwappableImage::new(),
            hats: HatCollection::new(),
            stage: Stage::default(),
            assets: HatAssets::load(),
            selected_stamp: 0,
            flip_key: TrackedKey::new(egui::Key::F),
            reset_key: TrackedKey::new(egui::Key::R),
            duplicate_key: TrackedKey::new(egui::Key::D),
            delete_key: TrackedKey::new(egui::Key::Delete),
            unfocus_key: TrackedKey::new(egui::Key::Escape),
            aspect_modifier: TrackedModifier::new(),
            load_sender,
            load_receiver,
            load_token: 0,
            pending_loads: 0,
            status: None,
        }
    }

    fn set_status(&mut self, ctx: &egui::Context, message: impl Into<String>) {
        self.status = Some((message.into(), ctx.input(|i| i.time)));
    }

    /// Default placement for new and duplicated hats: the photo center.
    fn stage_center(&self) -> Pos2 {
        Pos2::new(
            self.background.natural_width() as f32 / 2.0,
            self.background.natural_height() as f32 / 2.0,
        )
    }

    fn begin_photo_load(&mut self) {
        if let Some(path) = io::pick_photo_path() {
            self.load_token += 1;
            self.pending_loads += 1;
            log_info!("Decoding {}", path.display());
            io::spawn_photo_load(path, self.load_token, self.load_sender.clone());
        }
    }

    /// Apply finished decodes.  Only the latest generation wins; an
    /// out-of-date result is dropped without touching the stage.
    fn poll_photo_loads(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.load_receiver.try_recv() {
            self.pending_loads = self.pending_loads.saturating_sub(1);
            match result {
                LoadResult::PhotoLoaded { image, path, token } => {
                    if token != self.load_token {
                        log_info!("Discarding superseded decode of {}", path.display());
                        continue;
                    }
                    self.background.set_image(image);
                }
                LoadResult::LoadFailed { error, token } => {
                    log_err!("{}", error);
                    if token == self.load_token {
                        self.set_status(ctx, error);
                    }
                }
            }
        }
    }

    fn route_hotkeys(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        self.flip_key.update(&events);
        self.reset_key.update(&events);
        self.duplicate_key.update(&events);
        self.delete_key.update(&events);
        self.unfocus_key.update(&events);
        let shift_down = ctx.input(|i| i.modifiers.shift);
        let (shift_pressed, shift_released) = self.aspect_modifier.update(shift_down);

        if !self.background.has_image() {
            return;
        }
        let center = self.stage_center();
        if self.flip_key.pressed() {
            self.hats.apply(HatCommand::FlipHorizontal, center);
        }
        if self.reset_key.pressed() {
            self.hats.apply(HatCommand::Reset, center);
        }
        if self.duplicate_key.pressed() {
            self.hats.apply(HatCommand::Duplicate, center);
        }
        if self.delete_key.pressed() {
            self.hats.apply(HatCommand::Delete, center);
        }
        if self.unfocus_key.pressed() {
            self.hats.apply(HatCommand::UnfocusAll, center);
        }
        if shift_pressed {
            self.hats.aspect_modifier_pressed();
        }
        if shift_released {
            self.hats.aspect_modifier_released();
        }
    }

    fn export_composite(&mut self, ctx: &egui::Context) {
        if !self.background.has_image() {
            return;
        }
        // Ask for the destination first; a canceled dialog skips the
        // rasterization entirely.
        let path = match io::pick_export_path() {
            Some(p) => p,
            None => return,
        };
        let photo = match self.background.image() {
            Some(p) => p,
            None => return,
        };
        let composite = compose::compose(photo, &self.hats);
        match io::save_composite(&composite, &path) {
            Ok(()) => {
                log_info!("Exported composite to {}", path.display());
                self.set_status(ctx, format!("Saved {}", path.display()));
            }
            Err(e) => {
                log_err!("{}", e);
                self.set_status(ctx, e);
            }
        }
    }

    fn copy_composite(&mut self, ctx: &egui::Context) {
        let photo = match self.background.image() {
            Some(p) => p,
            None => return,
        };
        let composite = compose::compose(photo, &self.hats);
        if clipboard::copy_to_system_clipboard(&composite) {
            self.set_status(ctx, "Copied to clipboard");
        } else {
            self.set_status(ctx, "Clipboard unavailable");
        }
    }

    fn hat_picker(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::horizontal()
            .id_source("hat_picker")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for index in 0..self.assets.len() {
                        let selected = index == self.selected_stamp;
                        if let Some(tex) = self.assets.thumbnail(ui.ctx(), index) {
                            let sized = egui::load::SizedTexture::from_handle(tex);
                            let img = egui::Image::from_texture(sized)
                                .fit_to_exact_size(egui::vec2(32.0, 24.0));
                            if ui
                                .add(egui::ImageButton::new(img).selected(selected))
                                .clicked()
                            {
                                self.selected_stamp = index;
                            }
                        }
                    }
                });
            });
    }

    fn add_selected_hat(&mut self) {
        if let Some(source) = self.assets.source(self.selected_stamp) {
            self.hats.add(source, self.stage_center());
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Photo…").clicked() {
                    self.begin_photo_load();
                }
                if self.pending_loads > 0 {
                    ui.spinner();
                }
                ui.separator();
                let has_photo = self.background.has_image();
                ui.add_enabled_ui(has_photo, |ui| {
                    self.hat_picker(ui);
                    if ui.button("Add Hat").clicked() {
                        self.add_selected_hat();
                    }
                });
            });
        });
    }

    fn bottom_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let has_photo = self.background.has_image();
                ui.add_enabled_ui(has_photo, |ui| {
                    if ui.button("Export…").clicked() {
                        self.export_composite(ctx);
                    }
                    if ui.button("Copy to Clipboard").clicked() {
                        self.copy_composite(ctx);
                    }
                });
                ui.label("Shortcuts").on_hover_ui(|ui| {
                    for help in HOTKEY_HELP {
                        ui.horizontal(|ui| {
                            ui.strong(help.label);
                            ui.label(help.description);
                        });
                    }
                });

                // Transient status line, dropped after a few seconds.
                let now = ui.input(|i| i.time);
                if let Some((message, posted)) = self.status.clone() {
                    if now - posted < STATUS_SECONDS {
                        ui.separator();
                        ui.label(message);
                    } else {
                        self.status = None;
                    }
                }
            });
        });
    }
}

impl eframe::App for HatStackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_photo_loads(ctx);
        self.route_hotkeys(ctx);
        self.top_bar(ctx);
        self.bottom_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if self.background.has_image() {
                    let response = self.stage.show(ui, &mut self.background, &mut self.hats);
                    if response.dragging {
                        ctx.request_repaint();
                    }
                } else {
                    // Start layout: nothing to stage yet.
                    ui.centered_and_justified(|ui| {
                        if ui.button("Open a photo to get started").clicked() {
                            self.begin_photo_load();
                        }
                    });
                }
            });

        if self.pending_loads > 0 {
            // Poll the decode channel again soon.
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
