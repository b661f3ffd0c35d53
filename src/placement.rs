//! Placement module.
//!
//! The layout engine's output: a flat list of positioned visual elements.
//! Each `Placement` carries its bounding box, the layer it is painted on and
//! what to paint. Placements within a layer are painted in list order.

use crate::snapshot::AssetRef;

/// Straight (non-premultiplied) RGBA color.
pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [255, 255, 255, 255];

/// Canvas layer, painted back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZLayer {
    Background,
    Foreground,
    Text,
}

/// Axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanning two corners.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Coarse kind of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Icon,
    Text,
    Rect,
    Line,
    Polygon,
}

/// Image adjustment applied before an icon is pasted, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum IconOp {
    /// Resample to an exact size.
    Resize { width: u32, height: u32 },
    /// Keep a sub-rectangle of the current image.
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Multiply RGB by a factor; `0.0` gives a black silhouette.
    Brightness(f32),
    /// Multiply alpha by a grayscale mask stretched to the image size.
    Mask { asset: AssetRef, invert: bool },
    /// Overlay-blend a solid color over the image, alpha included.
    Overlay(Rgba),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconPaint {
    pub asset: AssetRef,
    pub ops: Vec<IconOp>,
    /// Number of stacked pastes the icon's alpha is folded for. `1` is a
    /// plain paste.
    pub emphasis: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub text: String,
    pub size: u32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectPaint {
    pub fill: Rgba,
    pub radius: f32,
    pub outline: Option<(Rgba, f32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePaint {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPaint {
    pub points: Vec<(f32, f32)>,
    pub fill: Rgba,
}

/// What a placement draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Icon(IconPaint),
    Text(TextPaint),
    Rect(RectPaint),
    Line(LinePaint),
    Polygon(PolygonPaint),
}

/// One positioned element.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Stable, dotted identifier such as `artifact.2.sub.1.text`.
    pub id: String,
    pub bounds: BoundingBox,
    pub layer: ZLayer,
    pub paint: Paint,
}

impl Placement {
    pub fn kind(&self) -> PlacementKind {
        match self.paint {
            Paint::Icon(_) => PlacementKind::Icon,
            Paint::Text(_) => PlacementKind::Text,
            Paint::Rect(_) => PlacementKind::Rect,
            Paint::Line(_) => PlacementKind::Line,
            Paint::Polygon(_) => PlacementKind::Polygon,
        }
    }

    pub fn icon(&self) -> Option<&IconPaint> {
        match &self.paint {
            Paint::Icon(icon) => Some(icon),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextPaint> {
        match &self.paint {
            Paint::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn rect(&self) -> Option<&RectPaint> {
        match &self.paint {
            Paint::Rect(rect) => Some(rect),
            _ => None,
        }
    }
}

/// Ordered placements for one card.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementList {
    pub width: u32,
    pub height: u32,
    items: Vec<Placement>,
}

impl PlacementList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, placement: Placement) {
        self.items.push(placement);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.items.iter()
    }

    /// Placements on one layer, in paint order.
    pub fn layer(&self, layer: ZLayer) -> impl Iterator<Item = &Placement> {
        self.items.iter().filter(move |p| p.layer == layer)
    }

    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Placements whose id starts with `prefix`.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Placement> {
        self.items.iter().filter(move |p| p.id.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, layer: ZLayer) -> Placement {
        Placement {
            id: id.to_string(),
            bounds: BoundingBox::from_corners(10.0, 20.0, 30.0, 60.0),
            layer,
            paint: Paint::Rect(RectPaint {
                fill: WHITE,
                radius: 3.0,
                outline: None,
            }),
        }
    }

    #[test]
    fn test_bounding_box_corners() {
        let b = BoundingBox::from_corners(10.0, 20.0, 30.0, 60.0);
        assert_eq!(b.width, 20.0);
        assert_eq!(b.height, 40.0);
        assert_eq!(b.right(), 30.0);
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.center_x(), 20.0);
        assert_eq!(b.translate(1.0, 2.0).x, 11.0);
    }

    #[test]
    fn test_layer_filter_keeps_order() {
        let mut list = PlacementList::new(100, 100);
        list.push(rect("a", ZLayer::Text));
        list.push(rect("b", ZLayer::Foreground));
        list.push(rect("c", ZLayer::Text));

        let ids: Vec<_> = list.layer(ZLayer::Text).map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(list.get("b").map(Placement::kind), Some(PlacementKind::Rect));
        assert_eq!(list.with_prefix("a").count(), 1);
    }
}
