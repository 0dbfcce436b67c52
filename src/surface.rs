use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{
    codecs::png::PngEncoder, imageops::FilterType, ExtendedColorType, ImageEncoder, ImageFormat,
    RgbaImage
};

use crate::error::SigError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Surface-local coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed-size RGBA8 pixel buffer. A blank raster is fully transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width:  u32,
    height: u32,
    pixels: Vec<u8>
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4]
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes, suitable for `ImageData`.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }

    /// True when nothing has been painted since the last clear.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Paint a round-capped segment of the given width. A zero-length segment
    /// paints a dot.
    pub fn stroke_segment(&mut self, from: Point, to: Point, rgba: [u8; 4], width: u32) {
        let r = width as f64 / 2.0;
        let min_x = (from.x.min(to.x) - r).floor().max(0.0);
        let min_y = (from.y.min(to.y) - r).floor().max(0.0);
        let max_x = (from.x.max(to.x) + r).ceil().min(self.width as f64 - 1.0);
        let max_y = (from.y.max(to.y) + r).ceil().min(self.height as f64 - 1.0);
        if max_x < min_x || max_y < min_y {
            return;
        }

        let r2 = r * r;
        for py in min_y as u32..=max_y as u32 {
            for px in min_x as u32..=max_x as u32 {
                let c = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if dist2_to_segment(c, from, to) <= r2 {
                    let i = self.index(px, py);
                    self.pixels[i..i + 4].copy_from_slice(&rgba);
                }
            }
        }
    }

    /// Replace this raster's content with `src` stretched to fill it.
    pub fn draw_scaled(&mut self, src: &Raster) -> Result<(), SigError> {
        if src.width == self.width && src.height == self.height {
            self.pixels.copy_from_slice(&src.pixels);
            return Ok(());
        }
        let scaled = image::imageops::resize(
            &src.to_image()?,
            self.width,
            self.height,
            FilterType::Triangle
        );
        self.pixels = scaled.into_raw();
        Ok(())
    }

    pub fn to_png(&self) -> Result<Vec<u8>, SigError> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgba8
        )?;
        Ok(out)
    }

    pub fn from_png(bytes: &[u8]) -> Result<Self, SigError> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgba8();
        Ok(Self {
            width:  img.width(),
            height: img.height(),
            pixels: img.into_raw()
        })
    }

    /// Export as PNG data URL (for `<img src="...">` or a download link).
    pub fn to_data_url(&self) -> Result<String, SigError> {
        Ok(png_data_url(&self.to_png()?))
    }

    pub fn from_data_url(data_url: &str) -> Result<Self, SigError> {
        Self::from_png(&png_bytes_from_data_url(data_url)?)
    }

    fn to_image(&self) -> Result<RgbaImage, SigError> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| SigError::OpFailed("raster size mismatch".into()))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png))
}

/// Strip the PNG data URL prefix and decode the payload.
pub fn png_bytes_from_data_url(data_url: &str) -> Result<Vec<u8>, SigError> {
    let b64 = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| SigError::DataUrl("expected data:image/png;base64 prefix".into()))?;
    Ok(STANDARD.decode(b64)?)
}

fn dist2_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (ex, ey) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
    ex * ex + ey * ey
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [0xFF, 0, 0, 0xFF];

    #[test]
    fn new_raster_is_blank() {
        let r = Raster::new(400, 200);
        assert!(r.is_blank());
        assert_eq!(r.as_rgba().len(), 400 * 200 * 4);
        assert_eq!(r.pixel(399, 199), Some([0, 0, 0, 0]));
        assert_eq!(r.pixel(400, 0), None);
    }

    #[test]
    fn horizontal_segment_has_pen_thickness() {
        let mut r = Raster::new(50, 50);
        r.stroke_segment(Point::new(10.0, 20.0), Point::new(40.0, 20.0), RED, 4);

        assert_eq!(r.pixel(25, 20), Some(RED));
        assert_eq!(r.pixel(25, 18), Some(RED));
        assert_eq!(r.pixel(25, 21), Some(RED));
        assert_eq!(r.pixel(25, 16), Some([0, 0, 0, 0]));
        assert_eq!(r.pixel(25, 23), Some([0, 0, 0, 0]));
    }

    #[test]
    fn zero_length_segment_paints_dot() {
        let mut r = Raster::new(20, 20);
        r.stroke_segment(Point::new(10.0, 10.0), Point::new(10.0, 10.0), RED, 6);
        assert_eq!(r.pixel(10, 10), Some(RED));
        assert_eq!(r.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn segment_outside_surface_is_clipped() {
        let mut r = Raster::new(20, 20);
        r.stroke_segment(Point::new(-30.0, -30.0), Point::new(-10.0, -10.0), RED, 2);
        assert!(r.is_blank());
        r.stroke_segment(Point::new(-5.0, 5.0), Point::new(25.0, 5.0), RED, 2);
        assert_eq!(r.pixel(0, 5), Some(RED));
        assert_eq!(r.pixel(19, 5), Some(RED));
    }

    #[test]
    fn clear_erases_everything() {
        let mut r = Raster::new(20, 20);
        r.stroke_segment(Point::new(1.0, 1.0), Point::new(18.0, 18.0), RED, 8);
        assert!(!r.is_blank());
        r.clear();
        assert!(r.is_blank());
    }

    #[test]
    fn data_url_carries_png_payload() {
        let mut r = Raster::new(30, 10);
        r.stroke_segment(Point::new(2.0, 5.0), Point::new(28.0, 5.0), RED, 2);

        let url = r.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let png = png_bytes_from_data_url(&url).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(Raster::from_data_url(&url).unwrap(), r);
    }

    #[test]
    fn data_url_rejects_other_payloads() {
        assert!(matches!(
            Raster::from_data_url("data:image/jpeg;base64,AAAA"),
            Err(SigError::DataUrl(_))
        ));
        assert!(matches!(
            png_bytes_from_data_url("data:image/png;base64,@@@"),
            Err(SigError::Base64(_))
        ));
    }

    #[test]
    fn draw_scaled_stretches_source() {
        let mut src = Raster::new(10, 10);
        src.stroke_segment(Point::new(0.0, 0.0), Point::new(10.0, 0.0), RED, 20);
        assert!(src.as_rgba().chunks(4).all(|px| px == RED));

        let mut dst = Raster::new(40, 20);
        dst.draw_scaled(&src).unwrap();
        assert_eq!(dst.pixel(39, 19), Some(RED));
        assert_eq!(dst.pixel(20, 10), Some(RED));
    }
}
