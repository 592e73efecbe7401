//! Hat collection and focus coordination.
//!
//! [`HatCollection`] owns the ordered set of active hats.  Insertion order is
//! draw order (later hats draw on top); hit priority is the reverse, so the
//! topmost drawn hat wins where they overlap.  At most one hat is focused at
//! any time, and hotkey commands route to that hat — a command with nothing
//! focused is a silent no-op, never an error.

use crate::gizmo::HatSprite;
use eframe::egui::Pos2;
use image::RgbaImage;
use std::sync::Arc;

/// Typed hotkey commands routed to the focused hat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatCommand {
    FlipHorizontal,
    Reset,
    Duplicate,
    Delete,
    UnfocusAll,
}

#[derive(Default)]
pub struct HatCollection {
    hats: Vec<HatSprite>,
}

impl HatCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HatSprite> {
        self.hats.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut HatSprite> {
        self.hats.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&HatSprite> {
        self.hats.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut HatSprite> {
        self.hats.get_mut(index)
    }

    // -----------------------------------------------------------------------
    //  Focus
    // -----------------------------------------------------------------------

    pub fn focused_index(&self) -> Option<usize> {
        self.hats.iter().position(|h| h.is_focused)
    }

    pub fn focused(&self) -> Option<&HatSprite> {
        self.hats.iter().find(|h| h.is_focused)
    }

    pub fn focused_mut(&mut self) -> Option<&mut HatSprite> {
        self.hats.iter_mut().find(|h| h.is_focused)
    }

    /// Focus one hat, unfocusing every other member first.
    pub fn focus(&mut self, index: usize) {
        for (i, hat) in self.hats.iter_mut().enumerate() {
            if i != index {
                hat.unfocus();
            }
        }
        if let Some(hat) = self.hats.get_mut(index) {
            hat.focus();
        }
    }

    pub fn unfocus_all(&mut self) {
        for hat in &mut self.hats {
            hat.unfocus();
        }
    }

    /// Index of the topmost hat whose rotated bounding box contains the
    /// stage point — most recently added wins.
    pub fn topmost_at(&self, stage_pos: Pos2) -> Option<usize> {
        self.hats
            .iter()
            .enumerate()
            .rev()
            .find(|(_, hat)| hat.contains(stage_pos))
            .map(|(i, _)| i)
    }

    // -----------------------------------------------------------------------
    //  Lifecycle
    // -----------------------------------------------------------------------

    /// Create a hat centered at the default placement, focus it, append it,
    /// and return its index.
    pub fn add(&mut self, source: Arc<RgbaImage>, center: Pos2) -> usize {
        let hat = HatSprite::new(source, center);
        self.hats.push(hat);
        let index = self.hats.len() - 1;
        self.focus(index);
        log_info!("Hat added ({} total)", self.hats.len());
        index
    }

    /// Clone the focused hat: same texture, rotation, and scale; default
    /// placement.  The clone takes the focus.  No-op without a focus.
    pub fn duplicate_focused(&mut self, center: Pos2) -> Option<usize> {
        let src = self.focused()?;
        let source = Arc::clone(&src.source);
        let rotation = src.rotation;
        let scale = src.scale;
        let aspect = src.maintain_aspect_ratio;
        let texture = src.share_texture();

        let index = self.add(source, center);
        let clone = &mut self.hats[index];
        clone.rotation = rotation;
        clone.scale = scale;
        clone.maintain_aspect_ratio = aspect;
        clone.set_shared_texture(texture);
        Some(index)
    }

    /// Remove the focused hat.  Nothing becomes focused afterwards.
    /// Removal is by index so iteration elsewhere never skips an element.
    pub fn remove_focused(&mut self) -> bool {
        match self.focused_index() {
            Some(index) => {
                self.hats.remove(index);
                log_info!("Hat removed ({} left)", self.hats.len());
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    //  Command routing
    // -----------------------------------------------------------------------

    /// Route a hotkey command.  `default_center` is where a duplicate lands.
    pub fn apply(&mut self, command: HatCommand, default_center: Pos2) {
        match command {
            HatCommand::FlipHorizontal => {
                if let Some(hat) = self.focused_mut() {
                    hat.flip_horizontal();
                }
            }
            HatCommand::Reset => {
                if let Some(hat) = self.focused_mut() {
                    hat.reset_adjustments();
                }
            }
            HatCommand::Duplicate => {
                self.duplicate_focused(default_center);
            }
            HatCommand::Delete => {
                self.remove_focused();
            }
            HatCommand::UnfocusAll => self.unfocus_all(),
        }
    }

    // -----------------------------------------------------------------------
    //  Aspect-ratio modifier key
    // -----------------------------------------------------------------------
    //
    // The modifier inverts the aspect lock for the focused hat while held:
    // on press every hat is set locked and the focused one unlocked, on
    // release every hat is set unlocked and the focused one locked.  The
    // focused hat always ends opposite to the rest.

    pub fn aspect_modifier_pressed(&mut self) {
        for hat in &mut self.hats {
            hat.maintain_aspect_ratio = true;
        }
        if let Some(hat) = self.focused_mut() {
            hat.maintain_aspect_ratio = false;
        }
    }

    pub fn aspect_modifier_released(&mut self) {
        for hat in &mut self.hats {
            hat.maintain_aspect_ratio = false;
        }
        if let Some(hat) = self.focused_mut() {
            hat.maintain_aspect_ratio = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Vec2;

    fn stamp() -> Arc<RgbaImage> {
        Arc::new(RgbaImage::new(32, 16))
    }

    fn focused_count(hats: &HatCollection) -> usize {
        hats.iter().filter(|h| h.is_focused).count()
    }

    #[test]
    fn add_centers_focuses_and_defaults() {
        // Stage center of a 128x128 canvas.
        let mut hats = HatCollection::new();
        let index = hats.add(stamp(), Pos2::new(64.0, 64.0));

        let hat = hats.get(index).unwrap();
        assert_eq!(hat.center, Pos2::new(64.0, 64.0));
        assert_eq!(hat.scale, Vec2::new(1.0, 1.0));
        assert_eq!(hat.rotation, 0.0);
        assert!(hat.is_focused);
    }

    #[test]
    fn adding_second_hat_moves_focus() {
        let mut hats = HatCollection::new();
        let a = hats.add(stamp(), Pos2::ZERO);
        let b = hats.add(stamp(), Pos2::ZERO);

        assert!(!hats.get(a).unwrap().is_focused);
        assert!(hats.get(b).unwrap().is_focused);
        assert_eq!(focused_count(&hats), 1);
    }

    #[test]
    fn at_most_one_focused_across_operations() {
        let mut hats = HatCollection::new();
        for _ in 0..4 {
            hats.add(stamp(), Pos2::ZERO);
            assert!(focused_count(&hats) <= 1);
        }
        hats.focus(1);
        assert_eq!(focused_count(&hats), 1);
        hats.duplicate_focused(Pos2::ZERO);
        assert_eq!(focused_count(&hats), 1);
        hats.remove_focused();
        assert!(focused_count(&hats) <= 1);
    }

    #[test]
    fn unfocus_all_is_idempotent() {
        let mut hats = HatCollection::new();
        hats.add(stamp(), Pos2::ZERO);
        hats.add(stamp(), Pos2::ZERO);

        hats.unfocus_all();
        let after_once: Vec<bool> = hats.iter().map(|h| h.is_focused).collect();
        hats.unfocus_all();
        let after_twice: Vec<bool> = hats.iter().map(|h| h.is_focused).collect();

        assert_eq!(after_once, after_twice);
        assert_eq!(focused_count(&hats), 0);
    }

    #[test]
    fn duplicate_copies_rotation_and_scale_only() {
        let mut hats = HatCollection::new();
        let a = hats.add(stamp(), Pos2::new(10.0, 20.0));
        {
            let hat = hats.get_mut(a).unwrap();
            hat.rotation = 0.7;
            hat.scale = Vec2::new(-1.5, 2.0);
            hat.center = Pos2::new(99.0, 99.0);
        }

        let b = hats.duplicate_focused(Pos2::new(64.0, 64.0)).unwrap();
        let clone = hats.get(b).unwrap();
        assert_eq!(clone.rotation, 0.7);
        assert_eq!(clone.scale, Vec2::new(-1.5, 2.0));
        // Position is default placement, not the source's.
        assert_eq!(clone.center, Pos2::new(64.0, 64.0));
        assert!(clone.is_focused);
        assert!(!hats.get(a).unwrap().is_focused);
    }

    #[test]
    fn delete_focused_leaves_nothing_focused() {
        let mut hats = HatCollection::new();
        hats.add(stamp(), Pos2::ZERO);
        hats.add(stamp(), Pos2::ZERO);
        assert_eq!(hats.len(), 2);

        hats.apply(HatCommand::Delete, Pos2::ZERO);
        assert_eq!(hats.len(), 1);
        assert_eq!(focused_count(&hats), 0);
    }

    #[test]
    fn commands_without_focus_are_no_ops() {
        let mut hats = HatCollection::new();
        hats.add(stamp(), Pos2::ZERO);
        hats.unfocus_all();

        hats.apply(HatCommand::FlipHorizontal, Pos2::ZERO);
        hats.apply(HatCommand::Reset, Pos2::ZERO);
        hats.apply(HatCommand::Duplicate, Pos2::ZERO);
        hats.apply(HatCommand::Delete, Pos2::ZERO);

        assert_eq!(hats.len(), 1);
        assert_eq!(hats.get(0).unwrap().scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn topmost_hit_prefers_most_recent() {
        let mut hats = HatCollection::new();
        hats.add(stamp(), Pos2::new(50.0, 50.0));
        let top = hats.add(stamp(), Pos2::new(50.0, 50.0));

        assert_eq!(hats.topmost_at(Pos2::new(50.0, 50.0)), Some(top));
    }

    #[test]
    fn aspect_modifier_hold_and_release() {
        let mut hats = HatCollection::new();
        hats.add(stamp(), Pos2::ZERO);
        let focused = hats.add(stamp(), Pos2::ZERO);

        hats.aspect_modifier_pressed();
        for (i, hat) in hats.iter().enumerate() {
            assert_eq!(hat.maintain_aspect_ratio, i != focused);
        }

        hats.aspect_modifier_released();
        for (i, hat) in hats.iter().enumerate() {
            assert_eq!(hat.maintain_aspect_ratio, i == focused);
        }
    }
}
