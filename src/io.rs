// ============================================================================
// FILE IO — photo opening (async decode) and composite export
// ============================================================================

use image::RgbaImage;
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Result delivered from a background decode thread.
///
/// `token` is the monotonically increasing upload generation: the app only
/// applies the result matching its latest token, so a slow decode that was
/// superseded by a newer upload becomes a no-op on arrival
/// (last-write-wins; there is only one photo slot).
pub enum LoadResult {
    PhotoLoaded {
        image: RgbaImage,
        path: PathBuf,
        token: u64,
    },
    LoadFailed {
        error: String,
        token: u64,
    },
}

/// Show the native open dialog for a photo.
pub fn pick_photo_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Decode a photo on a background thread; the UI stays responsive and the
/// previous photo stays on the stage until the swap arrives.
pub fn spawn_photo_load(path: PathBuf, token: u64, sender: Sender<LoadResult>) {
    std::thread::spawn(move || {
        let result = match image::open(&path) {
            Ok(img) => LoadResult::PhotoLoaded {
                image: img.to_rgba8(),
                path,
                token,
            },
            Err(e) => LoadResult::LoadFailed {
                error: format!("Could not open {}: {}", path.display(), e),
                token,
            },
        };
        // The receiver may already be gone during shutdown.
        let _ = sender.send(result);
    });
}

/// Show the native save dialog for the composite.
pub fn pick_export_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .set_file_name("hatstack.png")
        .save_file()
}

/// Encode the composite at `path`, picking the format from the extension
/// (PNG unless a JPEG extension is given).
pub fn save_composite(img: &RgbaImage, path: &Path) -> Result<(), String> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let result = match ext.as_str() {
        // JPEG has no alpha channel.
        "jpg" | "jpeg" => image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .save(path),
        _ => img.save(path),
    };
    result.map_err(|e| format!("Could not save {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn decode_failure_is_reported_not_fatal() {
        let (tx, rx) = mpsc::channel();
        spawn_photo_load(PathBuf::from("/definitely/not/a/photo.png"), 7, tx);
        match rx.recv().unwrap() {
            LoadResult::LoadFailed { token, .. } => assert_eq!(token, 7),
            LoadResult::PhotoLoaded { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn save_and_reload_round_trip() {
        let mut img = RgbaImage::new(4, 3);
        img.put_pixel(1, 1, image::Rgba([200, 10, 30, 255]));
        let path = std::env::temp_dir().join("hatstack_io_test.png");

        save_composite(&img, &path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (4, 3));
        assert_eq!(*reloaded.get_pixel(1, 1), image::Rgba([200, 10, 30, 255]));

        let _ = std::fs::remove_file(&path);
    }
}
