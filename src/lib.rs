//! HatStack — place, transform, and export decorative hat overlays on a photo.
//!
//! The interesting part lives in [`gizmo`]: an interactive transform gizmo
//! whose handles convert pointer drags into position / rotation / scale
//! updates with correct inverse-transform math under arbitrary rotation,
//! scale, and stage zoom.

#[macro_use]
pub mod logger;

pub mod app;
pub mod assets;
pub mod background;
pub mod gizmo;
pub mod hats;
pub mod hotkeys;
pub mod io;
pub mod ops;
pub mod stage;
