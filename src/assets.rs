//! Embedded hat stamps.
//!
//! The stamp PNGs ship inside the binary; they are decoded once at startup
//! into shared sources (used by sprites and the export compositor) and
//! uploaded lazily as picker thumbnails.

use eframe::egui;
use image::RgbaImage;
use std::sync::Arc;

const STAMP_PNGS: &[&[u8]] = &[
    include_bytes!("../assets/stamps/hat01.png"),
    include_bytes!("../assets/stamps/hat02.png"),
    include_bytes!("../assets/stamps/hat03.png"),
    include_bytes!("../assets/stamps/hat04.png"),
    include_bytes!("../assets/stamps/hat05.png"),
    include_bytes!("../assets/stamps/hat06.png"),
    include_bytes!("../assets/stamps/hat07.png"),
    include_bytes!("../assets/stamps/hat08.png"),
    include_bytes!("../assets/stamps/hat09.png"),
    include_bytes!("../assets/stamps/hat10.png"),
];

struct HatStamp {
    source: Arc<RgbaImage>,
    /// Picker thumbnail texture, uploaded on first use.
    thumbnail: Option<egui::TextureHandle>,
}

#[derive(Default)]
pub struct HatAssets {
    stamps: Vec<HatStamp>,
}

impl HatAssets {
    /// Decode all embedded stamps.  A stamp that fails to decode is skipped
    /// with a log line rather than producing a half-constructed entry.
    pub fn load() -> Self {
        let mut stamps = Vec::with_capacity(STAMP_PNGS.len());
        for (i, bytes) in STAMP_PNGS.iter().enumerate() {
            match image::load_from_memory(bytes) {
                Ok(img) => stamps.push(HatStamp {
                    source: Arc::new(img.to_rgba8()),
                    thumbnail: None,
                }),
                Err(e) => {
                    log_warn!("Embedded stamp {} failed to decode: {}", i, e);
                }
            }
        }
        log_info!("Loaded {} hat stamps", stamps.len());
        Self { stamps }
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Shared pixels of one stamp.
    pub fn source(&self, index: usize) -> Option<Arc<RgbaImage>> {
        self.stamps.get(index).map(|s| Arc::clone(&s.source))
    }

    /// Thumbnail texture for the picker strip, uploaded on demand.
    pub fn thumbnail(&mut self, ctx: &egui::Context, index: usize) -> Option<&egui::TextureHandle> {
        let stamp = self.stamps.get_mut(index)?;
        if stamp.thumbnail.is_none() {
            let img = stamp.source.as_ref();
            let size = [img.width() as usize, img.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
            stamp.thumbnail = Some(ctx.load_texture(
                format!("hat_stamp_{}", index),
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
        stamp.thumbnail.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_embedded_stamps_decode() {
        let assets = HatAssets::load();
        assert_eq!(assets.len(), STAMP_PNGS.len());
        for i in 0..assets.len() {
            let source = assets.source(i).unwrap();
            assert!(source.width() > 0 && source.height() > 0);
        }
    }
}
