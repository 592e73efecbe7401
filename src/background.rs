//! The uploaded photo behind the hats.
//!
//! [`SwappableImage`] is the single source of truth for "what size is the
//! stage content": swapping in a new photo atomically replaces the pixels and
//! the natural dimensions, and invalidates the uploaded GPU texture so the
//! next frame re-uploads the new image.

use eframe::egui;
use image::RgbaImage;

pub struct SwappableImage {
    image: Option<RgbaImage>,
    /// Uploaded texture of `image`; None until first draw after a swap.
    texture: Option<egui::TextureHandle>,
}

impl Default for SwappableImage {
    fn default() -> Self {
        Self::new()
    }
}

impl SwappableImage {
    pub fn new() -> Self {
        Self {
            image: None,
            texture: None,
        }
    }

    /// Replace the displayed photo.  The old image is fully replaced before
    /// any caller can observe the new dimensions.
    pub fn set_image(&mut self, image: RgbaImage) {
        log_info!(
            "Background swapped: {}x{} px",
            image.width(),
            image.height()
        );
        self.image = Some(image);
        self.texture = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Untransformed pixel width of the current photo (0 when none is set).
    pub fn natural_width(&self) -> u32 {
        self.image.as_ref().map_or(0, |i| i.width())
    }

    /// Untransformed pixel height of the current photo (0 when none is set).
    pub fn natural_height(&self) -> u32 {
        self.image.as_ref().map_or(0, |i| i.height())
    }

    /// Borrow the raw pixels for export compositing.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Upload the photo as a GPU texture on demand, reusing the handle until
    /// the next swap.
    pub fn ensure_texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        if self.texture.is_none() {
            let img = self.image.as_ref()?;
            let size = [img.width() as usize, img.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
            self.texture = Some(ctx.load_texture(
                "background_photo",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
        self.texture.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_reports_new_dimensions_synchronously() {
        let mut bg = SwappableImage::new();
        assert!(!bg.has_image());
        assert_eq!(bg.natural_width(), 0);

        bg.set_image(RgbaImage::new(128, 96));
        assert!(bg.has_image());
        assert_eq!(bg.natural_width(), 128);
        assert_eq!(bg.natural_height(), 96);

        // Second swap fully replaces the first.
        bg.set_image(RgbaImage::new(40, 30));
        assert_eq!((bg.natural_width(), bg.natural_height()), (40, 30));
    }
}
