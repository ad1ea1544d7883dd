//! Image file I/O
//!
//! Decode and encode at the process boundary; the pipeline crates only
//! ever see `Raster`.

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ite_core::Raster;
use std::path::Path;

/// Load an image file into a raster (grayscale, RGB or RGBA).
pub fn load_raster(path: &Path) -> Result<Raster> {
    let img = image::open(path).with_context(|| format!("failed to load {}", path.display()))?;

    let raster = match img {
        DynamicImage::ImageLuma8(gray) => gray_to_raster(&gray)?,
        DynamicImage::ImageRgb8(rgb) => rgb_to_raster(&rgb)?,
        DynamicImage::ImageRgba8(rgba) => rgba_to_raster(&rgba)?,
        other => rgb_to_raster(&other.to_rgb8())?,
    };
    Ok(raster)
}

/// Save a raster to an image file; the format follows the extension.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<()> {
    let w = raster.width();
    let h = raster.height();

    let img: DynamicImage = match raster.channels() {
        1 => {
            let pixels: Vec<u8> = raster.plane(0).iter().map(|&v| v.min(255) as u8).collect();
            DynamicImage::ImageLuma8(
                GrayImage::from_raw(w, h, pixels).expect("plane size matches dimensions"),
            )
        }
        3 | 4 => {
            let r = raster.plane(0);
            let g = raster.plane(1);
            let b = raster.plane(2);
            let mut pixels = Vec::with_capacity(raster.plane_len() * 3);
            for i in 0..raster.plane_len() {
                pixels.push(r[i].min(255) as u8);
                pixels.push(g[i].min(255) as u8);
                pixels.push(b[i].min(255) as u8);
            }
            DynamicImage::ImageRgb8(
                RgbImage::from_raw(w, h, pixels).expect("plane size matches dimensions"),
            )
        }
        other => anyhow::bail!("unsupported channel count {other}"),
    };

    img.save(path)
        .with_context(|| format!("failed to save {}", path.display()))
}

fn gray_to_raster(img: &GrayImage) -> Result<Raster> {
    let data: Vec<u16> = img.as_raw().iter().map(|&v| u16::from(v)).collect();
    Ok(Raster::from_vec(img.width(), img.height(), 1, data)?)
}

fn rgb_to_raster(img: &RgbImage) -> Result<Raster> {
    let n = (img.width() * img.height()) as usize;
    let mut data = vec![0u16; n * 3];
    let (r_plane, rest) = data.split_at_mut(n);
    let (g_plane, b_plane) = rest.split_at_mut(n);

    for (i, px) in img.pixels().enumerate() {
        r_plane[i] = u16::from(px[0]);
        g_plane[i] = u16::from(px[1]);
        b_plane[i] = u16::from(px[2]);
    }
    Ok(Raster::from_vec(img.width(), img.height(), 3, data)?)
}

fn rgba_to_raster(img: &RgbaImage) -> Result<Raster> {
    let n = (img.width() * img.height()) as usize;
    let mut data = vec![0u16; n * 4];
    {
        let (r_plane, rest) = data.split_at_mut(n);
        let (g_plane, rest) = rest.split_at_mut(n);
        let (b_plane, a_plane) = rest.split_at_mut(n);
        for (i, px) in img.pixels().enumerate() {
            r_plane[i] = u16::from(px[0]);
            g_plane[i] = u16::from(px[1]);
            b_plane[i] = u16::from(px[2]);
            a_plane[i] = u16::from(px[3]);
        }
    }
    Ok(Raster::from_vec(img.width(), img.height(), 4, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_roundtrip_via_buffers() {
        let img = GrayImage::from_fn(4, 3, |x, y| image::Luma([(x * 10 + y) as u8]));
        let raster = gray_to_raster(&img).unwrap();
        assert_eq!(raster.channels(), 1);
        assert_eq!(raster.get(2, 1, 0), 21);
    }

    #[test]
    fn test_rgb_is_planar() {
        let img = RgbImage::from_fn(2, 2, |x, y| image::Rgb([x as u8, y as u8, 9]));
        let raster = rgb_to_raster(&img).unwrap();
        assert_eq!(raster.channels(), 3);
        assert_eq!(raster.get(1, 0, 0), 1);
        assert_eq!(raster.get(0, 1, 1), 1);
        assert_eq!(raster.get(1, 1, 2), 9);
    }
}
