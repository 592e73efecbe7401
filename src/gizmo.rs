//! The transform gizmo — a hat sprite wrapped with draggable handles.
//!
//! A [`HatSprite`] owns one overlay's position / rotation / scale and the
//! drag state machine that turns pointer motion into transform updates.
//! All per-frame drag math is computed relative to a [`DragSession`]
//! snapshot taken at pointer-down, so nothing accumulates per-frame
//! rounding error.  Handle hit-testing inverse-transforms the pointer into
//! the sprite's local frame, which is what keeps handles grabbable at any
//! rotation, scale, or stage zoom.

use crate::stage::StageView;
use eframe::egui;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use image::RgbaImage;
use std::sync::Arc;

/// Pixel radius around a handle that accepts a pointer-down (screen space).
const GRAB_RADIUS: f32 = 10.0;
/// Screen-space distance from the top edge midpoint to the rotate knob.
const ROTATE_STEM: f32 = 30.0;
/// Smallest representable scale magnitude.  Flip negates scale, drags may
/// sweep through the pivot, but a component must never reach exactly zero
/// or go non-finite.
pub const MIN_SCALE: f32 = 1e-3;

/// One draggable control point.  Corner and edge variants carry their
/// direction from the sprite center in the untransformed local frame
/// (x right, y down).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    Move,
    Rotate,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl HandleKind {
    /// Direction of the handle from the center in the local frame; zero on
    /// an axis the handle does not scale.
    fn local_sign(self) -> (f32, f32) {
        match self {
            HandleKind::TopLeft => (-1.0, -1.0),
            HandleKind::TopRight => (1.0, -1.0),
            HandleKind::BottomLeft => (-1.0, 1.0),
            HandleKind::BottomRight => (1.0, 1.0),
            HandleKind::Top => (0.0, -1.0),
            HandleKind::Bottom => (0.0, 1.0),
            HandleKind::Left => (-1.0, 0.0),
            HandleKind::Right => (1.0, 0.0),
            HandleKind::Move | HandleKind::Rotate => (0.0, 0.0),
        }
    }

    fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft
                | HandleKind::TopRight
                | HandleKind::BottomLeft
                | HandleKind::BottomRight
        )
    }

}

/// Snapshot taken at pointer-down over a handle; every frame of the drag is
/// computed relative to these values.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    pub handle: HandleKind,
    pub start_pointer: Pos2,
    pub start_center: Pos2,
    pub start_rotation: f32,
    pub start_scale: Vec2,
}

/// One placed hat: shared texture source plus its own transform and the
/// interaction state machine (unfocused / focused-idle / dragging).
pub struct HatSprite {
    /// Immutable decoded stamp pixels, shared with duplicates and the
    /// export compositor.
    pub source: Arc<RgbaImage>,
    /// Pivot / center position in stage coordinates.
    pub center: Pos2,
    /// Radians, unconstrained.
    pub rotation: f32,
    /// Independent x/y factors; negative x encodes a horizontal flip.
    /// Components are never exactly zero.
    pub scale: Vec2,
    pub is_focused: bool,
    /// When true, corner handles preserve the width:height ratio and edge
    /// handles are unavailable.
    pub maintain_aspect_ratio: bool,

    drag: Option<DragSession>,

    /// Uploaded texture of `source`; shared by clone with duplicates.
    texture: Option<egui::TextureHandle>,
}

impl HatSprite {
    pub fn new(source: Arc<RgbaImage>, center: Pos2) -> Self {
        Self {
            source,
            center,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            is_focused: false,
            maintain_aspect_ratio: true,
            drag: None,
            texture: None,
        }
    }

    // -----------------------------------------------------------------------
    //  Focus state
    // -----------------------------------------------------------------------

    pub fn focus(&mut self) {
        self.is_focused = true;
    }

    /// Drops any in-flight drag along with the focus.
    pub fn unfocus(&mut self) {
        self.is_focused = false;
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // -----------------------------------------------------------------------
    //  Commands
    // -----------------------------------------------------------------------

    /// Negate the x scale in place; position and rotation are untouched.
    pub fn flip_horizontal(&mut self) {
        self.scale.x = -self.scale.x;
    }

    /// Rotation back to 0, scale back to unit.  Position is kept.
    pub fn reset_adjustments(&mut self) {
        self.rotation = 0.0;
        self.scale = Vec2::new(1.0, 1.0);
    }

    // -----------------------------------------------------------------------
    //  Geometry
    // -----------------------------------------------------------------------

    /// Unscaled half extents of the source image, in stage units.
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(
            self.source.width() as f32 / 2.0,
            self.source.height() as f32 / 2.0,
        )
    }

    /// Stage position of a corner or edge handle: its local offset pushed
    /// through scale then rotation then translation.
    fn handle_stage_pos(&self, kind: HandleKind) -> Pos2 {
        let hs = self.half_size();
        let (sx, sy) = kind.local_sign();
        let local = Vec2::new(sx * hs.x * self.scale.x, sy * hs.y * self.scale.y);
        self.center + rotate_vec(local, self.rotation)
    }

    /// Screen position of the rotate knob: a fixed screen-space distance
    /// beyond the top edge midpoint, along the outward direction.
    fn rotate_knob_screen(&self, view: &StageView) -> Pos2 {
        let top_mid = view.to_screen(self.handle_stage_pos(HandleKind::Top));
        let center = view.to_screen(self.center);
        let out = top_mid - center;
        let dir = if out.length() > 0.1 {
            out.normalized()
        } else {
            Vec2::new(0.0, -1.0)
        };
        top_mid + dir * ROTATE_STEM
    }

    /// Inverse-transform a stage point into the sprite's local frame:
    /// undo translation, then rotation, then scale.
    fn to_local(&self, stage_pos: Pos2) -> Vec2 {
        let unrotated = rotate_vec(stage_pos - self.center, -self.rotation);
        Vec2::new(unrotated.x / self.scale.x, unrotated.y / self.scale.y)
    }

    // -----------------------------------------------------------------------
    //  Hit testing
    // -----------------------------------------------------------------------

    /// Which handle (if any) is under the given screen position.  Knobs win
    /// over the body so a small sprite stays scalable.
    pub fn hit_test(&self, screen_pos: Pos2, view: &StageView) -> Option<HandleKind> {
        if screen_pos.distance(self.rotate_knob_screen(view)) < GRAB_RADIUS {
            return Some(HandleKind::Rotate);
        }

        let corner_kinds = [
            HandleKind::TopLeft,
            HandleKind::TopRight,
            HandleKind::BottomLeft,
            HandleKind::BottomRight,
        ];
        for kind in corner_kinds {
            let p = view.to_screen(self.handle_stage_pos(kind));
            if screen_pos.distance(p) < GRAB_RADIUS {
                return Some(kind);
            }
        }

        // Edge handles only exist while the aspect ratio is unlocked.
        if !self.maintain_aspect_ratio {
            let edge_kinds = [
                HandleKind::Top,
                HandleKind::Bottom,
                HandleKind::Left,
                HandleKind::Right,
            ];
            for kind in edge_kinds {
                let p = view.to_screen(self.handle_stage_pos(kind));
                if screen_pos.distance(p) < GRAB_RADIUS {
                    return Some(kind);
                }
            }
        }

        if self.contains(view.to_stage(screen_pos)) {
            return Some(HandleKind::Move);
        }
        None
    }

    /// True when the stage point falls inside the rotated, scaled bounding
    /// box of the sprite.
    pub fn contains(&self, stage_pos: Pos2) -> bool {
        let hs = self.half_size();
        let local = self.to_local(stage_pos);
        local.x.abs() <= hs.x && local.y.abs() <= hs.y
    }

    // -----------------------------------------------------------------------
    //  Drag state machine
    // -----------------------------------------------------------------------

    /// Pointer-down over a handle: capture the session snapshot.
    pub fn begin_drag(&mut self, handle: HandleKind, pointer_screen: Pos2) {
        self.drag = Some(DragSession {
            handle,
            start_pointer: pointer_screen,
            start_center: self.center,
            start_rotation: self.rotation,
            start_scale: self.scale,
        });
    }

    /// Pointer-move while dragging: recompute the transform from the session
    /// snapshot and the current pointer.  A no-op when no drag is active.
    pub fn drag_to(&mut self, pointer_screen: Pos2, view: &StageView) {
        let session = match self.drag {
            Some(s) => s,
            None => return,
        };
        match session.handle {
            HandleKind::Move => {
                // Screen-pixel drag distance maps 1:1 onto the stage
                // regardless of zoom.
                let delta = (pointer_screen - session.start_pointer) / view.zoom;
                self.center = session.start_center + delta;
            }
            HandleKind::Rotate => {
                // Track the pointer's angular sweep around the pivot from
                // wherever the knob was grabbed.
                let pivot = view.to_screen(session.start_center);
                let start = session.start_pointer - pivot;
                let current = pointer_screen - pivot;
                let start_angle = start.y.atan2(start.x);
                let current_angle = current.y.atan2(current.x);
                self.rotation = session.start_rotation + (current_angle - start_angle);
            }
            kind => self.drag_scale(kind, pointer_screen, view, &session),
        }
    }

    /// Pointer-up (or pointer-up-equivalent after a lost pointer): the
    /// session is discarded and the sprite returns to focused-idle.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Corner / edge scale: project the pointer offset into the sprite's
    /// rotated frame and divide the local extents by the unscaled half-size,
    /// independently per axis.
    fn drag_scale(
        &mut self,
        kind: HandleKind,
        pointer_screen: Pos2,
        view: &StageView,
        session: &DragSession,
    ) {
        let hs = self.half_size();
        let offset = view.to_stage(pointer_screen) - session.start_center;
        let local = rotate_vec(offset, -session.start_rotation);
        let (sx, sy) = kind.local_sign();

        let mut new_scale = session.start_scale;
        if sx != 0.0 {
            new_scale.x = clamp_scale(local.x / (sx * hs.x.max(MIN_SCALE)), session.start_scale.x);
        }
        if sy != 0.0 {
            new_scale.y = clamp_scale(local.y / (sy * hs.y.max(MIN_SCALE)), session.start_scale.y);
        }

        // Aspect lock: the axis with the larger relative change drives both,
        // each axis keeping its own sign (a flip survives the drag).
        if self.maintain_aspect_ratio && kind.is_corner() {
            let rx = (new_scale.x / session.start_scale.x).abs();
            let ry = (new_scale.y / session.start_scale.y).abs();
            let ratio = rx.max(ry);
            new_scale.x = clamp_scale(
                session.start_scale.x.abs() * ratio * sign_of(new_scale.x),
                session.start_scale.x,
            );
            new_scale.y = clamp_scale(
                session.start_scale.y.abs() * ratio * sign_of(new_scale.y),
                session.start_scale.y,
            );
        }

        self.scale = new_scale;
    }

    // -----------------------------------------------------------------------
    //  Rendering
    // -----------------------------------------------------------------------

    /// Upload the stamp texture on demand; duplicates share the handle via
    /// clone.
    pub fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_none() {
            let size = [self.source.width() as usize, self.source.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, self.source.as_raw());
            self.texture = Some(ctx.load_texture(
                "hat_sprite",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    pub fn share_texture(&self) -> Option<egui::TextureHandle> {
        self.texture.clone()
    }

    pub fn set_shared_texture(&mut self, texture: Option<egui::TextureHandle>) {
        self.texture = texture;
    }

    /// Draw the sprite as a textured quad.  Rotation comes from the corner
    /// positions, a horizontal flip from the signed half extents mirroring
    /// the quad under the unchanged UV mapping.
    pub fn draw(&self, painter: &egui::Painter, view: &StageView) {
        let tex = match &self.texture {
            Some(t) => t,
            None => return,
        };

        let s_tl = view.to_screen(self.handle_stage_pos(HandleKind::TopLeft));
        let s_tr = view.to_screen(self.handle_stage_pos(HandleKind::TopRight));
        let s_bl = view.to_screen(self.handle_stage_pos(HandleKind::BottomLeft));
        let s_br = view.to_screen(self.handle_stage_pos(HandleKind::BottomRight));

        let white = Color32::WHITE;
        let mut mesh = egui::Mesh::with_texture(tex.id());
        mesh.vertices.push(egui::epaint::Vertex {
            pos: s_tl,
            uv: Pos2::new(0.0, 0.0),
            color: white,
        });
        mesh.vertices.push(egui::epaint::Vertex {
            pos: s_tr,
            uv: Pos2::new(1.0, 0.0),
            color: white,
        });
        mesh.vertices.push(egui::epaint::Vertex {
            pos: s_bl,
            uv: Pos2::new(0.0, 1.0),
            color: white,
        });
        mesh.vertices.push(egui::epaint::Vertex {
            pos: s_br,
            uv: Pos2::new(1.0, 1.0),
            color: white,
        });
        mesh.indices.extend_from_slice(&[0, 1, 2, 1, 3, 2]);
        painter.add(egui::Shape::mesh(mesh));
    }

    /// Draw the selection border and handles.  Only called while focused;
    /// everything is recomputed from the current transform each frame, so a
    /// handle can never render at a stale position.
    pub fn draw_handles(&self, painter: &egui::Painter, view: &StageView, accent: Color32) {
        let [ar, ag, ab, _] = accent.to_array();
        let accent_semi = Color32::from_rgba_unmultiplied(ar, ag, ab, 180);
        let accent_fill = Color32::from_rgba_unmultiplied(ar, ag, ab, 220);
        let handle_border = Color32::WHITE;

        let corners = [
            view.to_screen(self.handle_stage_pos(HandleKind::TopLeft)),
            view.to_screen(self.handle_stage_pos(HandleKind::TopRight)),
            view.to_screen(self.handle_stage_pos(HandleKind::BottomRight)),
            view.to_screen(self.handle_stage_pos(HandleKind::BottomLeft)),
        ];

        // Border: TL→TR→BR→BL→TL
        for i in 0..4 {
            painter.line_segment([corners[i], corners[(i + 1) % 4]], Stroke::new(1.5, accent));
        }

        // Corner handles (rounded accent squares with white border).
        let handle_size = 5.0;
        for &sc in &corners {
            let r = Rect::from_center_size(sc, Vec2::splat(handle_size * 2.0));
            painter.rect_filled(r, 3.0, accent_fill);
            painter.rect_stroke(r, 3.0, Stroke::new(1.5, handle_border));
        }

        // Edge midpoint handles, only while the aspect ratio is unlocked.
        if !self.maintain_aspect_ratio {
            let mid_size = 4.0;
            let edge_kinds = [
                HandleKind::Top,
                HandleKind::Bottom,
                HandleKind::Left,
                HandleKind::Right,
            ];
            for kind in edge_kinds {
                let sm = view.to_screen(self.handle_stage_pos(kind));
                let r = Rect::from_center_size(sm, Vec2::splat(mid_size * 2.0));
                painter.rect_filled(r, 2.0, accent_fill);
                painter.rect_stroke(r, 2.0, Stroke::new(1.0, handle_border));
            }
        }

        // Rotate knob: stem from the top edge midpoint plus a circle.
        let top_mid = view.to_screen(self.handle_stage_pos(HandleKind::Top));
        let knob = self.rotate_knob_screen(view);
        painter.line_segment([top_mid, knob], Stroke::new(1.0, accent_semi));
        painter.circle_filled(knob, 6.0, accent_fill);
        painter.circle_stroke(knob, 6.0, Stroke::new(1.5, handle_border));
        painter.text(
            knob,
            egui::Align2::CENTER_CENTER,
            "↻",
            egui::FontId::proportional(9.0),
            Color32::WHITE,
        );
    }
}

/// Rotate a vector by `angle` radians (y-down screen convention).
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let cos = angle.cos();
    let sin = angle.sin();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

fn sign_of(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Keep a scale component finite and at least `MIN_SCALE` in magnitude,
/// falling back to the previous component's sign when the raw value
/// collapses to zero (pointer dragged exactly onto the pivot).
fn clamp_scale(raw: f32, previous: f32) -> f32 {
    let sign = if raw != 0.0 {
        sign_of(raw)
    } else {
        sign_of(previous)
    };
    if !raw.is_finite() || raw.abs() < MIN_SCALE {
        MIN_SCALE * sign
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    fn test_sprite() -> HatSprite {
        // 200x120 source: half size (100, 60), big enough that handles
        // never overlap at zoom 1.
        let source = Arc::new(RgbaImage::new(200, 120));
        let mut hat = HatSprite::new(source, Pos2::new(300.0, 300.0));
        hat.focus();
        hat
    }

    fn unit_view() -> StageView {
        StageView {
            origin: Pos2::ZERO,
            zoom: 1.0,
        }
    }

    #[test]
    fn move_drag_shifts_by_pointer_delta() {
        let mut hat = test_sprite();
        let view = unit_view();
        let before = hat.center;

        hat.begin_drag(HandleKind::Move, Pos2::new(10.0, 10.0));
        hat.drag_to(Pos2::new(30.0, 25.0), &view);
        hat.end_drag();

        assert_eq!(hat.center, Pos2::new(before.x + 20.0, before.y + 15.0));
    }

    #[test]
    fn move_drag_divides_by_stage_zoom() {
        let mut hat = test_sprite();
        let view = StageView {
            origin: Pos2::ZERO,
            zoom: 0.5,
        };
        let before = hat.center;

        hat.begin_drag(HandleKind::Move, Pos2::new(0.0, 0.0));
        hat.drag_to(Pos2::new(10.0, 0.0), &view);

        // 10 screen pixels at half zoom is 20 stage units.
        assert_eq!(hat.center.x, before.x + 20.0);
    }

    #[test]
    fn rotate_tracks_angular_sweep_from_grab_point() {
        let mut hat = test_sprite();
        let view = unit_view();

        // Grab to the right of the pivot, sweep a quarter turn downward.
        let pivot = hat.center;
        hat.begin_drag(HandleKind::Rotate, Pos2::new(pivot.x + 50.0, pivot.y));
        hat.drag_to(Pos2::new(pivot.x, pivot.y + 50.0), &view);

        assert!((hat.rotation - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn corner_scale_projects_into_rotated_frame() {
        let mut hat = test_sprite();
        hat.maintain_aspect_ratio = false;
        hat.rotation = PI / 2.0;
        let view = unit_view();

        // With a quarter turn, the local +x axis points down on screen.
        // Dragging the bottom-right corner to 150 below and 30 left of the
        // center means local extents (150, 30) → scale (1.5, 0.5).
        let pointer = Pos2::new(hat.center.x - 30.0, hat.center.y + 150.0);
        hat.begin_drag(HandleKind::BottomRight, pointer);
        hat.drag_to(pointer, &view);

        assert!((hat.scale.x - 1.5).abs() < 1e-4);
        assert!((hat.scale.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn aspect_lock_takes_larger_relative_change() {
        // Scenario from the drag-math design: half size (20, 10), raw local
        // extents (30, 10) → uniform 1.5 on both axes, not (1.5, 1.0).
        let source = Arc::new(RgbaImage::new(40, 20));
        let mut hat = HatSprite::new(source, Pos2::new(100.0, 100.0));
        hat.focus();
        assert!(hat.maintain_aspect_ratio);
        let view = unit_view();

        let pointer = Pos2::new(130.0, 110.0);
        hat.begin_drag(HandleKind::BottomRight, pointer);
        hat.drag_to(pointer, &view);

        assert!((hat.scale.x - 1.5).abs() < 1e-4);
        assert!((hat.scale.y - 1.5).abs() < 1e-4);
    }

    #[test]
    fn edge_scale_touches_single_axis() {
        let mut hat = test_sprite();
        hat.maintain_aspect_ratio = false;
        let view = unit_view();

        let pointer = Pos2::new(hat.center.x + 150.0, hat.center.y);
        hat.begin_drag(HandleKind::Right, pointer);
        hat.drag_to(pointer, &view);

        assert!((hat.scale.x - 1.5).abs() < 1e-4);
        assert_eq!(hat.scale.y, 1.0);
    }

    #[test]
    fn scale_at_pivot_clamps_instead_of_zeroing() {
        let mut hat = test_sprite();
        hat.maintain_aspect_ratio = false;
        let view = unit_view();

        // Drag the corner exactly onto the pivot.
        hat.begin_drag(HandleKind::BottomRight, Pos2::new(400.0, 360.0));
        hat.drag_to(hat.center, &view);

        assert!(hat.scale.x.is_finite() && hat.scale.y.is_finite());
        assert!(hat.scale.x.abs() >= MIN_SCALE);
        assert!(hat.scale.y.abs() >= MIN_SCALE);
    }

    #[test]
    fn flip_horizontal_is_an_involution() {
        let mut hat = test_sprite();
        hat.scale = Vec2::new(1.25, 0.75);
        let original = hat.scale;

        hat.flip_horizontal();
        assert_eq!(hat.scale, Vec2::new(-1.25, 0.75));
        hat.flip_horizontal();
        assert_eq!(hat.scale, original);
    }

    #[test]
    fn reset_restores_defaults_independent_of_drag_history() {
        let mut hat = test_sprite();
        let view = unit_view();

        // Arbitrary sequence of rotate and scale drags.
        hat.begin_drag(HandleKind::Rotate, Pos2::new(350.0, 300.0));
        hat.drag_to(Pos2::new(300.0, 350.0), &view);
        hat.end_drag();
        hat.begin_drag(HandleKind::BottomRight, Pos2::new(400.0, 360.0));
        hat.drag_to(Pos2::new(500.0, 420.0), &view);
        hat.end_drag();
        hat.flip_horizontal();
        let kept_center = hat.center;

        hat.reset_adjustments();
        assert_eq!(hat.rotation, 0.0);
        assert_eq!(hat.scale, Vec2::new(1.0, 1.0));
        assert_eq!(hat.center, kept_center);
    }

    #[test]
    fn hit_test_finds_each_corner_under_any_rotation() {
        let view = unit_view();
        let corner_kinds = [
            HandleKind::TopLeft,
            HandleKind::TopRight,
            HandleKind::BottomLeft,
            HandleKind::BottomRight,
        ];
        // Sweep the whole circle in 16 steps.
        for step in 0..16 {
            let theta = step as f32 / 16.0 * TAU;
            let mut hat = test_sprite();
            hat.rotation = theta;
            hat.scale = Vec2::new(1.2, 0.8);
            for kind in corner_kinds {
                // Forward-transform the handle's local offset, then the
                // hit-test must resolve back to the same handle.
                let screen = view.to_screen(hat.handle_stage_pos(kind));
                assert_eq!(
                    hat.hit_test(screen, &view),
                    Some(kind),
                    "θ = {theta}, corner {kind:?}"
                );
            }
        }
    }

    #[test]
    fn hit_test_body_inside_rotated_box() {
        let view = unit_view();
        let mut hat = test_sprite();
        hat.rotation = PI / 4.0;

        assert_eq!(hat.hit_test(view.to_screen(hat.center), &view), Some(HandleKind::Move));
        // Far outside any handle region.
        assert_eq!(hat.hit_test(Pos2::new(700.0, 700.0), &view), None);
    }

    #[test]
    fn edge_handles_unavailable_while_aspect_locked() {
        let view = unit_view();
        let mut hat = test_sprite();
        hat.maintain_aspect_ratio = true;

        let right_edge = view.to_screen(hat.handle_stage_pos(HandleKind::Right));
        // The point sits on the bounding box, so the body may claim it, but
        // the edge handle itself must not.
        assert_ne!(hat.hit_test(right_edge, &view), Some(HandleKind::Right));

        hat.maintain_aspect_ratio = false;
        assert_eq!(hat.hit_test(right_edge, &view), Some(HandleKind::Right));
    }

    #[test]
    fn unfocus_terminates_an_active_drag() {
        let mut hat = test_sprite();
        hat.begin_drag(HandleKind::Move, Pos2::new(0.0, 0.0));
        assert!(hat.is_dragging());
        hat.unfocus();
        assert!(!hat.is_dragging());
    }
}
