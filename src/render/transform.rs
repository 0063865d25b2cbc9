//! Pan/zoom view transform.
//!
//! A translate-then-scale affine map from topology coordinates to screen
//! coordinates: `screen = topology * k + (x, y)`. It is view state only and
//! never feeds back into node positions.

use std::time::Duration;

use serde::Serialize;

use crate::topology::Point;

/// Viewport dimensions in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Allowed zoom range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl ScaleExtent {
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self { min: 0.1, max: 4.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { x: 0.0, y: 0.0, k: 1.0 };

    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Topology point to screen point
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Screen point to topology point
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.k)
    }

    /// Scale by `factor` keeping the topology point under `anchor` fixed.
    pub fn zoom_about(self, anchor: Point, factor: f64, extent: ScaleExtent) -> Self {
        let k = extent.clamp(self.k * factor);
        let fixed = self.invert(anchor);
        Self::new(anchor.x - fixed.x * k, anchor.y - fixed.y * k, k)
    }

    /// Component-wise interpolation between two transforms.
    pub fn interpolate(self, to: ZoomTransform, t: f64) -> Self {
        Self::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.k + (to.k - self.k) * t,
        )
    }

    /// SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

/// Axis-aligned bounding box in topology coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every box in `boxes`; `None` when empty.
    pub fn union_all(boxes: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
        boxes.into_iter().reduce(|a, b| Bounds {
            min: Point::new(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: Point::new(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.lerp(self.max, 0.5)
    }
}

/// Transform that centres `bounds` in `viewport`, filling `fill` of it
/// along the tighter axis.
pub fn fit_transform(bounds: Bounds, viewport: Size, fill: f64, extent: ScaleExtent) -> ZoomTransform {
    let ratio = (bounds.width() / viewport.width).max(bounds.height() / viewport.height);
    let k = if ratio > 0.0 { extent.clamp(fill / ratio) } else { extent.max };
    let center = bounds.center();
    ZoomTransform::new(
        viewport.width / 2.0 - k * center.x,
        viewport.height / 2.0 - k * center.y,
        k,
    )
}

/// Cubic ease-in-out on `t` in [0, 1]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// An eased animation between two transforms
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransition {
    from: ZoomTransform,
    to: ZoomTransform,
    duration: Duration,
    elapsed: Duration,
}

impl ViewTransition {
    pub fn new(from: ZoomTransform, to: ZoomTransform, duration: Duration) -> Self {
        Self { from, to, duration, elapsed: Duration::ZERO }
    }

    /// Move the animation forward by `dt` and return the current transform.
    pub fn advance(&mut self, dt: Duration) -> ZoomTransform {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.current()
    }

    pub fn current(&self) -> ZoomTransform {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.interpolate(self.to, ease_cubic_in_out(t))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
