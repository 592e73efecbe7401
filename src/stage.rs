//! Stage layout and pointer routing.
//!
//! The stage is the photo's coordinate space.  [`StageView`] maps stage
//! coordinates to screen pixels under the fit-to-window zoom, and
//! [`Stage::show`] draws the photo plus every hat and routes pointer input:
//! the focused hat's handles first, then body hits in reverse insertion
//! order (topmost drawn wins), and a press on bare photo unfocuses all.

use crate::background::SwappableImage;
use crate::gizmo::HandleKind;
use crate::hats::HatCollection;
use eframe::egui;
use egui::{Color32, Pos2, Rect, Vec2};

/// Letterbox fill behind and around the photo.
pub const STAGE_BACKGROUND: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);

/// Mapping between stage coordinates (photo pixels) and screen pixels.
#[derive(Clone, Copy, Debug)]
pub struct StageView {
    /// Screen position of the stage origin (photo top-left).
    pub origin: Pos2,
    /// Uniform fit-to-window scale factor.
    pub zoom: f32,
}

impl StageView {
    pub fn to_screen(&self, stage_pos: Pos2) -> Pos2 {
        self.origin + stage_pos.to_vec2() * self.zoom
    }

    pub fn to_stage(&self, screen_pos: Pos2) -> Pos2 {
        ((screen_pos - self.origin) / self.zoom).to_pos2()
    }
}

/// Fit scale for a photo inside the available area: shrink to fit, never
/// upscale beyond natural size.
pub fn fit_zoom(natural: (u32, u32), available: Vec2) -> f32 {
    let (w, h) = natural;
    if w == 0 || h == 0 {
        return 1.0;
    }
    (available.x / w as f32)
        .min(available.y / h as f32)
        .min(1.0)
}

/// What the stage did with this frame's input.
#[derive(Default)]
pub struct StageResponse {
    /// A handle drag is in flight; the app keeps repainting.
    pub dragging: bool,
}

pub struct Stage {
    pub accent: Color32,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            // Same selection accent family the rest of the UI uses.
            accent: Color32::from_rgb(0x4c, 0x9e, 0xe8),
        }
    }
}

impl Stage {
    /// Lay out, route input, and draw one frame of the stage.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        background: &mut SwappableImage,
        hats: &mut HatCollection,
    ) -> StageResponse {
        let avail = ui.available_rect_before_wrap();
        ui.painter().rect_filled(avail, 0.0, STAGE_BACKGROUND);

        if !background.has_image() {
            return StageResponse::default();
        }
        let natural = (background.natural_width(), background.natural_height());
        let zoom = fit_zoom(natural, avail.size());
        let stage_size = Vec2::new(natural.0 as f32 * zoom, natural.1 as f32 * zoom);
        let stage_rect = Rect::from_center_size(avail.center(), stage_size);
        let view = StageView {
            origin: stage_rect.min,
            zoom,
        };

        let _response = ui.allocate_rect(stage_rect, egui::Sense::click_and_drag());
        self.route_pointer(ui, avail, stage_rect, &view, hats);

        // Draw: photo first, hats in insertion order, focused handles on top.
        let painter = ui.painter_at(avail);
        if let Some(tex) = background.ensure_texture(ui.ctx()) {
            painter.image(
                tex.id(),
                stage_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        for hat in hats.iter_mut() {
            hat.ensure_texture(ui.ctx());
        }
        for hat in hats.iter() {
            hat.draw(&painter, &view);
        }
        let mut dragging = false;
        if let Some(hat) = hats.focused() {
            hat.draw_handles(&painter, &view, self.accent);
            dragging = hat.is_dragging();
        }

        StageResponse { dragging }
    }

    fn route_pointer(
        &self,
        ui: &egui::Ui,
        panel_rect: Rect,
        stage_rect: Rect,
        view: &StageView,
        hats: &mut HatCollection,
    ) {
        let pointer = ui.input(|i| i.pointer.interact_pos());
        let pos = match pointer {
            Some(p) => p,
            None => {
                // Pointer left the tracking surface: a drag must still
                // terminate cleanly rather than stick in Dragging.
                if let Some(hat) = hats.focused_mut() {
                    hat.end_drag();
                }
                return;
            }
        };
        let pressed = ui.input(|i| i.pointer.primary_pressed());
        let down = ui.input(|i| i.pointer.primary_down());
        let released = ui.input(|i| i.pointer.any_released());

        if pressed {
            match press_target(hats, pos, panel_rect, view) {
                Some((index, kind)) => {
                    // Focusing an unfocused hat starts moving it at once.
                    if hats.focused_index() != Some(index) {
                        hats.focus(index);
                    }
                    if let Some(hat) = hats.get_mut(index) {
                        hat.begin_drag(kind, pos);
                    }
                }
                None if stage_rect.contains(pos) => hats.unfocus_all(),
                None => {}
            }
        }

        if down {
            if let Some(hat) = hats.focused_mut() {
                if hat.is_dragging() {
                    hat.drag_to(pos, view);
                }
            }
        }

        if released || !down {
            if let Some(hat) = hats.focused_mut() {
                hat.end_drag();
            }
        }
    }
}

/// Resolve what a pointer-down grabs: the focused hat's knobs first, then
/// bodies in reverse insertion order.  A body hit on the focused hat yields
/// to a later-added hat covering the same point (topmost drawn wins, same
/// tie-break as drawing).  Presses outside the stage panel belong to other
/// widgets; the rotate knob can extend beyond the photo, so the gate is the
/// panel, not the photo rect.
fn press_target(
    hats: &HatCollection,
    pos: Pos2,
    panel_rect: Rect,
    view: &StageView,
) -> Option<(usize, HandleKind)> {
    if !panel_rect.contains(pos) {
        return None;
    }
    let body = hats.topmost_at(view.to_stage(pos));
    if let Some(index) = hats.focused_index() {
        match hats.get(index).and_then(|h| h.hit_test(pos, view)) {
            Some(HandleKind::Move) => {
                let target = body.filter(|&top| top > index).unwrap_or(index);
                return Some((target, HandleKind::Move));
            }
            Some(kind) => return Some((index, kind)),
            None => {}
        }
    }
    body.map(|index| (index, HandleKind::Move))
}
