// ============================================================================
// EXPORT COMPOSITOR — rasterize the photo plus every hat into one image
// ============================================================================
//
// The export never touches the on-screen painter: it re-renders from model
// state (background pixels + each hat's transform), so selection borders and
// handles cannot appear in the output.  Each hat is inverse-mapped per
// destination pixel inside its transformed bounding box, bilinear-sampled,
// and alpha-composited src-over; rows run in parallel.

use crate::gizmo::{HatSprite, rotate_vec};
use crate::hats::HatCollection;
use eframe::egui::Vec2;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// Composite the background photo and all hats, in draw order.
pub fn compose(background: &RgbaImage, hats: &HatCollection) -> RgbaImage {
    let mut out = background.clone();
    for hat in hats.iter() {
        rasterize_hat(&mut out, hat);
    }
    out
}

/// Draw one transformed hat onto the destination image.
fn rasterize_hat(dest: &mut RgbaImage, hat: &HatSprite) {
    let (dw, dh) = (dest.width(), dest.height());
    let src = hat.source.as_ref();
    let (sw, sh) = (src.width() as f32, src.height() as f32);
    if sw < 1.0 || sh < 1.0 || dw == 0 || dh == 0 {
        return;
    }

    // Tight bounding box of the rotated, scaled quad limits iteration.
    let hs = hat.half_size();
    let mut bb_min = Vec2::new(f32::MAX, f32::MAX);
    let mut bb_max = Vec2::new(f32::MIN, f32::MIN);
    for (cx, cy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        let local = Vec2::new(cx * hs.x * hat.scale.x, cy * hs.y * hat.scale.y);
        let corner = hat.center + rotate_vec(local, hat.rotation);
        bb_min = bb_min.min(corner.to_vec2());
        bb_max = bb_max.max(corner.to_vec2());
    }
    if bb_max.x < 0.0 || bb_max.y < 0.0 || bb_min.x >= dw as f32 || bb_min.y >= dh as f32 {
        return;
    }
    let col_start = bb_min.x.floor().max(0.0) as u32;
    let col_end = bb_max.x.ceil().min(dw as f32 - 1.0) as u32;
    let row_start = bb_min.y.floor().max(0.0) as u32;
    let row_end = bb_max.y.ceil().min(dh as f32 - 1.0) as u32;

    let cos = (-hat.rotation).cos();
    let sin = (-hat.rotation).sin();
    let center = hat.center;
    let scale = hat.scale;

    // Inverse-map rows in parallel, then apply the patches sequentially.
    let rows: Vec<u32> = (row_start..=row_end).collect();
    let patches: Vec<(u32, u32, Rgba<u8>)> = rows
        .par_iter()
        .flat_map(|&dy| {
            let mut row_patches = Vec::new();
            let py = dy as f32 + 0.5;
            for dx in col_start..=col_end {
                let px = dx as f32 + 0.5;
                // Undo translation and rotation, then scale (a negative x
                // scale mirrors the sampling).
                let r = Vec2::new(px - center.x, py - center.y);
                let unrot = Vec2::new(r.x * cos - r.y * sin, r.x * sin + r.y * cos);
                let u = unrot.x / scale.x + sw / 2.0;
                let v = unrot.y / scale.y + sh / 2.0;
                if u < 0.0 || v < 0.0 || u >= sw || v >= sh {
                    continue;
                }

                let src_px = sample_bilinear(src, u - 0.5, v - 0.5);
                if src_px[3] == 0 {
                    continue;
                }
                let dst = *dest.get_pixel(dx, dy);
                row_patches.push((dx, dy, alpha_blend(dst, src_px)));
            }
            row_patches
        })
        .collect();

    for (dx, dy, px) in patches {
        dest.put_pixel(dx, dy, px);
    }
}

/// Bilinear interpolation sample at fractional pixel-index coordinates,
/// clamping to the edge so borders don't blend with transparent black.
#[inline]
fn sample_bilinear(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = (img.width(), img.height());
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let sample = |sx: i32, sy: i32| -> [f32; 4] {
        let cx = sx.clamp(0, w as i32 - 1) as u32;
        let cy = sy.clamp(0, h as i32 - 1) as u32;
        let p = img.get_pixel(cx, cy).0;
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    };

    let p00 = sample(x0, y0);
    let p10 = sample(x0 + 1, y0);
    let p01 = sample(x0, y0 + 1);
    let p11 = sample(x0 + 1, y0 + 1);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let mix = |i: usize| -> u8 {
        (p00[i] * w00 + p10[i] * w10 + p01[i] * w01 + p11[i] * w11)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([mix(0), mix(1), mix(2), mix(3)])
}

/// Simple alpha-composite: src over dst.
fn alpha_blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 || dst[3] == 0 {
        return src;
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let blend = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        (((s * sa + d * da * (1.0 - sa)) / out_a) * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_src_replaces_dst() {
        let blended = alpha_blend(Rgba([10, 20, 30, 255]), Rgba([200, 100, 50, 255]));
        assert_eq!(blended, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn transparent_src_keeps_dst() {
        let blended = alpha_blend(Rgba([10, 20, 30, 255]), Rgba([200, 100, 50, 0]));
        assert_eq!(blended, Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn half_alpha_mixes() {
        let blended = alpha_blend(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        // ~50% white over black.
        assert!(blended[0] > 120 && blended[0] < 136);
        assert_eq!(blended[3], 255);
    }

    #[test]
    fn bilinear_at_pixel_center_is_exact() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([100, 0, 0, 255]));

        assert_eq!(sample_bilinear(&img, 0.0, 0.0), Rgba([0, 0, 0, 255]));
        assert_eq!(sample_bilinear(&img, 1.0, 0.0), Rgba([100, 0, 0, 255]));
        // Halfway between the two pixel centers.
        assert_eq!(sample_bilinear(&img, 0.5, 0.0), Rgba([50, 0, 0, 255]));
    }
}
