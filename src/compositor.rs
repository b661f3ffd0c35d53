//! Compositor.
//!
//! Paints a `PlacementList` into three transparent layers and flattens them
//! into one bitmap. Icon adjustments (resize, crop, brightness, masks and the
//! background tint) run on `image` buffers; vector shapes and pixmap
//! compositing run on `tiny_skia`.

use crate::asset::AssetProvider;
use crate::error::CardError;
use crate::font::{FontProvider, NORMAL};
use crate::placement::{
    BoundingBox, IconOp, IconPaint, LinePaint, Paint, PlacementList, PolygonPaint, RectPaint,
    Rgba, TextPaint, ZLayer,
};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tiny_skia::{
    FillRule, IntSize, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// Overlay blend of one channel, `base` drawn under `top`.
///
/// Dark `top` values multiply, light ones screen.
///
/// # Examples
///
/// ```rust
/// use buildcard::compositor::overlay_channel;
///
/// assert_eq!(overlay_channel(0, 200), 0);
/// assert_eq!(overlay_channel(255, 10), 255);
/// assert_eq!(overlay_channel(100, 255), 200);
/// ```
pub fn overlay_channel(top: u8, base: u8) -> u8 {
    let (top, base) = (top as u32, base as u32);
    let value = if top < 128 {
        2 * top * base / 255
    } else {
        255 - 2 * (255 - top) * (255 - base) / 255
    };
    value.min(255) as u8
}

/// Alpha of `pastes` stacked copies of a pixel with alpha `alpha`.
///
/// # Examples
///
/// ```rust
/// use buildcard::compositor::fold_emphasis;
///
/// assert_eq!(fold_emphasis(255, 3), 255);
/// assert_eq!(fold_emphasis(0, 4), 0);
/// assert_eq!(fold_emphasis(128, 1), 128);
/// assert!(fold_emphasis(128, 2) > 128);
/// ```
pub fn fold_emphasis(alpha: u8, pastes: u8) -> u8 {
    if pastes <= 1 || alpha == 0 || alpha == 255 {
        return alpha;
    }
    let clear = 1.0 - alpha as f32 / 255.0;
    let folded = 1.0 - clear.powi(pastes as i32);
    (folded * 255.0).round().clamp(0.0, 255.0) as u8
}

fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        if alpha == 0 {
            pixel[..3].fill(0);
            continue;
        }
        for channel in &mut pixel[..3] {
            *channel = ((*channel as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
}

/// Convert a straight-alpha image to a premultiplied pixmap.
///
/// Returns `None` for empty images.
fn to_pixmap(image: RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = image.into_raw();
    premultiply_rgba_in_place(&mut data);
    Pixmap::from_vec(data, size)
}

fn skia_paint(color: Rgba) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn rounded_rect(bounds: &BoundingBox, radius: f32) -> Option<Path> {
    let rect = Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)?;
    let r = radius.min(bounds.width / 2.0).min(bounds.height / 2.0).max(0.0);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.quad_to(right, top, right, top + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.quad_to(left, bottom, left, bottom - r);
    pb.line_to(left, top + r);
    pb.quad_to(left, top, left + r, top);
    pb.close();
    pb.finish()
}

/// The three paint layers of a card.
struct Layers {
    background: Pixmap,
    foreground: Pixmap,
    text: Pixmap,
}

impl Layers {
    fn new(width: u32, height: u32) -> Result<Self, CardError> {
        let alloc = || {
            Pixmap::new(width, height).ok_or_else(|| {
                CardError::InvalidInput(format!("cannot allocate a {width}x{height} canvas"))
            })
        };
        Ok(Self {
            background: alloc()?,
            foreground: alloc()?,
            text: alloc()?,
        })
    }

    fn get_mut(&mut self, layer: ZLayer) -> &mut Pixmap {
        match layer {
            ZLayer::Background => &mut self.background,
            ZLayer::Foreground => &mut self.foreground,
            ZLayer::Text => &mut self.text,
        }
    }

    /// Text over foreground, then the result over background.
    fn flatten(mut self) -> Result<RgbaImage, CardError> {
        let paint = PixmapPaint::default();
        self.foreground
            .draw_pixmap(0, 0, self.text.as_ref(), &paint, Transform::identity(), None);
        self.background
            .draw_pixmap(0, 0, self.foreground.as_ref(), &paint, Transform::identity(), None);

        let (width, height) = (self.background.width(), self.background.height());
        let mut data = self.background.take();
        unpremultiply_rgba_in_place(&mut data);
        RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| CardError::Encode("canvas buffer size mismatch".to_string()))
    }
}

/// Paints placement lists.
pub struct Compositor<'a> {
    assets: &'a dyn AssetProvider,
    fonts: &'a dyn FontProvider,
}

impl<'a> Compositor<'a> {
    pub fn new(assets: &'a dyn AssetProvider, fonts: &'a dyn FontProvider) -> Self {
        Self { assets, fonts }
    }

    /// Paint every placement and flatten the layers.
    ///
    /// The output has the list's canvas size.
    ///
    /// # Errors
    ///
    /// `CardError::AssetUnavailable` if any referenced image, including a
    /// mask, cannot be resolved. Nothing is returned in that case.
    pub fn compose(&self, placements: &PlacementList) -> Result<RgbaImage, CardError> {
        let mut layers = Layers::new(placements.width, placements.height)?;

        for placement in placements.iter() {
            let target = layers.get_mut(placement.layer);
            match &placement.paint {
                Paint::Icon(icon) => self.draw_icon(target, &placement.bounds, icon)?,
                Paint::Text(text) => self.draw_text(target, &placement.bounds, text)?,
                Paint::Rect(rect) => draw_rect(target, &placement.bounds, rect),
                Paint::Line(line) => draw_line(target, line),
                Paint::Polygon(polygon) => draw_polygon(target, polygon),
            }
        }

        layers.flatten()
    }

    /// Resolve an icon and run its adjustments.
    pub fn prepare_icon(&self, icon: &IconPaint) -> Result<RgbaImage, CardError> {
        let mut image = self.assets.resolve(&icon.asset)?;
        for op in &icon.ops {
            image = self.apply(image, op)?;
        }
        if icon.emphasis > 1 {
            for pixel in image.pixels_mut() {
                pixel.0[3] = fold_emphasis(pixel.0[3], icon.emphasis);
            }
        }
        Ok(image)
    }

    fn apply(&self, mut image: RgbaImage, op: &IconOp) -> Result<RgbaImage, CardError> {
        match op {
            IconOp::Resize { width, height } => {
                if image.dimensions() == (*width, *height) {
                    return Ok(image);
                }
                Ok(imageops::resize(&image, *width, *height, FilterType::CatmullRom))
            }
            IconOp::Crop {
                x,
                y,
                width,
                height,
            } => Ok(imageops::crop_imm(&image, *x, *y, *width, *height).to_image()),
            IconOp::Brightness(factor) => {
                for pixel in image.pixels_mut() {
                    for channel in &mut pixel.0[..3] {
                        *channel = (*channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
                    }
                }
                Ok(image)
            }
            IconOp::Mask { asset, invert } => {
                let mask = DynamicImage::ImageRgba8(self.assets.resolve(asset)?).to_luma8();
                let mask = imageops::resize(&mask, image.width(), image.height(), FilterType::Nearest);
                for (pixel, coverage) in image.pixels_mut().zip(mask.pixels()) {
                    let keep = if *invert { 255 - coverage.0[0] } else { coverage.0[0] };
                    pixel.0[3] = (pixel.0[3] as u16 * keep as u16 / 255) as u8;
                }
                Ok(image)
            }
            IconOp::Overlay(tint) => {
                for pixel in image.pixels_mut() {
                    for (channel, top) in pixel.0.iter_mut().zip(tint) {
                        *channel = overlay_channel(*top, *channel);
                    }
                }
                Ok(image)
            }
        }
    }

    fn draw_icon(&self, target: &mut Pixmap, bounds: &BoundingBox, icon: &IconPaint) -> Result<(), CardError> {
        let image = self.prepare_icon(icon)?;
        let Some(pixmap) = to_pixmap(image) else {
            tracing::debug!(path = %icon.asset.path, "Empty icon skipped");
            return Ok(());
        };
        target.draw_pixmap(
            bounds.x.round() as i32,
            bounds.y.round() as i32,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    fn draw_text(&self, target: &mut Pixmap, bounds: &BoundingBox, text: &TextPaint) -> Result<(), CardError> {
        let font = self.fonts.font(NORMAL, text.size)?;
        let mask = font.rasterize(&text.text);
        let [r, g, b, a] = text.color;
        let glyphs = RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
            let coverage = mask.get_pixel(x, y).0[0] as u16;
            image::Rgba([r, g, b, (coverage * a as u16 / 255) as u8])
        });

        if let Some(pixmap) = to_pixmap(glyphs) {
            target.draw_pixmap(
                bounds.x.round() as i32,
                bounds.y.round() as i32,
                pixmap.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }
}

fn draw_rect(target: &mut Pixmap, bounds: &BoundingBox, rect: &RectPaint) {
    let Some(path) = rounded_rect(bounds, rect.radius) else {
        return;
    };
    target.fill_path(&path, &skia_paint(rect.fill), FillRule::Winding, Transform::identity(), None);

    if let Some((color, width)) = rect.outline {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        target.stroke_path(&path, &skia_paint(color), &stroke, Transform::identity(), None);
    }
}

fn draw_line(target: &mut Pixmap, line: &LinePaint) {
    let mut pb = PathBuilder::new();
    pb.move_to(line.from.0, line.from.1);
    pb.line_to(line.to.0, line.to.1);
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width: line.width,
        ..Stroke::default()
    };
    target.stroke_path(&path, &skia_paint(line.color), &stroke, Transform::identity(), None);
}

fn draw_polygon(target: &mut Pixmap, polygon: &PolygonPaint) {
    let Some((first, rest)) = polygon.points.split_first() else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    pb.close();
    if let Some(path) = pb.finish() {
        target.fill_path(&path, &skia_paint(polygon.fill), FillRule::Winding, Transform::identity(), None);
    }
}
