//! OS clipboard export via `arboard`.

use image::RgbaImage;

/// Write an RGBA image to the system clipboard.  Returns false (and logs)
/// when the clipboard is unavailable; never fatal.
pub fn copy_to_system_clipboard(img: &RgbaImage) -> bool {
    // arboard wants ImageData { width, height, bytes: Cow<[u8]> } in RGBA order.
    match arboard::Clipboard::new() {
        Ok(mut clip) => {
            let data = arboard::ImageData {
                width: img.width() as usize,
                height: img.height() as usize,
                bytes: std::borrow::Cow::Borrowed(img.as_raw()),
            };
            match clip.set_image(data) {
                Ok(()) => {
                    log_info!("Composite copied to clipboard ({}x{})", img.width(), img.height());
                    true
                }
                Err(e) => {
                    log_err!("Clipboard write failed: {}", e);
                    false
                }
            }
        }
        Err(e) => {
            log_err!("Clipboard unavailable: {}", e);
            false
        }
    }
}
