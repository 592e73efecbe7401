//! Keyboard tracking — per-key press/release edge detection.
//!
//! A [`TrackedKey`] watches one logical key in the raw egui event stream and
//! reports clean edges: at most one press per physical key-down (OS
//! auto-repeat is suppressed) and one release per key-up.  Missed events
//! (e.g. focus loss while a key is held) are tolerated; tracking is
//! best-effort observation, never an error source.

use eframe::egui;

/// Edge-detected state of one logical key, observed per frame.
pub struct TrackedKey {
    key: egui::Key,
    is_down: bool,
    pressed_this_frame: bool,
    released_this_frame: bool,
}

impl TrackedKey {
    pub fn new(key: egui::Key) -> Self {
        Self {
            key,
            is_down: false,
            pressed_this_frame: false,
            released_this_frame: false,
        }
    }

    /// Consume this frame's raw events and recompute the edge flags.
    pub fn update(&mut self, events: &[egui::Event]) {
        self.pressed_this_frame = false;
        self.released_this_frame = false;
        for event in events {
            if let egui::Event::Key {
                key,
                pressed,
                repeat,
                ..
            } = event
            {
                if *key != self.key {
                    continue;
                }
                if *pressed {
                    // Auto-repeat retriggers carry repeat=true; also guard on
                    // is_down in case a platform misses the flag.
                    if !*repeat && !self.is_down {
                        self.pressed_this_frame = true;
                    }
                    self.is_down = true;
                } else {
                    if self.is_down {
                        self.released_this_frame = true;
                    }
                    self.is_down = false;
                }
            }
        }
    }

    /// True exactly once per physical press.
    pub fn pressed(&self) -> bool {
        self.pressed_this_frame
    }

    /// True exactly once per physical release.
    pub fn released(&self) -> bool {
        self.released_this_frame
    }

    /// True while the key is held.
    pub fn is_down(&self) -> bool {
        self.is_down
    }
}

/// Edge detection for a modifier (egui reports modifiers as level state,
/// not key events).  `update` returns `(pressed, released)` for this frame.
#[derive(Default)]
pub struct TrackedModifier {
    was_down: bool,
}

impl TrackedModifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, down: bool) -> (bool, bool) {
        let pressed = down && !self.was_down;
        let released = !down && self.was_down;
        self.was_down = down;
        (pressed, released)
    }
}

/// One entry in the shortcuts help popup.
pub struct HotkeyHelp {
    pub label: &'static str,
    pub description: &'static str,
}

/// The hotkey table shown in the shortcuts tooltip.
pub const HOTKEY_HELP: &[HotkeyHelp] = &[
    HotkeyHelp {
        label: "F",
        description: "flip horizontally",
    },
    HotkeyHelp {
        label: "R",
        description: "reset rotation and scale",
    },
    HotkeyHelp {
        label: "D",
        description: "duplicate",
    },
    HotkeyHelp {
        label: "SHIFT",
        description: "while scaling, unlock aspect ratio",
    },
    HotkeyHelp {
        label: "DEL",
        description: "remove selected hat",
    },
    HotkeyHelp {
        label: "ESC",
        description: "unfocus all",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(key: egui::Key, pressed: bool, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            pressed,
            repeat,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn press_and_release_edges_fire_once() {
        let mut tracked = TrackedKey::new(egui::Key::F);

        tracked.update(&[key_event(egui::Key::F, true, false)]);
        assert!(tracked.pressed());
        assert!(!tracked.released());
        assert!(tracked.is_down());

        // Held, no new events: no edges.
        tracked.update(&[]);
        assert!(!tracked.pressed());
        assert!(!tracked.released());
        assert!(tracked.is_down());

        tracked.update(&[key_event(egui::Key::F, false, false)]);
        assert!(!tracked.pressed());
        assert!(tracked.released());
        assert!(!tracked.is_down());
    }

    #[test]
    fn auto_repeat_does_not_retrigger_press() {
        let mut tracked = TrackedKey::new(egui::Key::D);
        tracked.update(&[key_event(egui::Key::D, true, false)]);
        assert!(tracked.pressed());

        tracked.update(&[
            key_event(egui::Key::D, true, true),
            key_event(egui::Key::D, true, true),
        ]);
        assert!(!tracked.pressed());
        assert!(tracked.is_down());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut tracked = TrackedKey::new(egui::Key::R);
        tracked.update(&[key_event(egui::Key::F, true, false)]);
        assert!(!tracked.pressed());
        assert!(!tracked.is_down());
    }

    #[test]
    fn release_without_observed_press_is_dropped() {
        // Key went down while the window was unfocused; the first thing we
        // see is the release.  That must not report a release edge.
        let mut tracked = TrackedKey::new(egui::Key::Escape);
        tracked.update(&[key_event(egui::Key::Escape, false, false)]);
        assert!(!tracked.released());
    }
}
