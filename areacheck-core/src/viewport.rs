use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Largest backing-store dimension we are willing to allocate, in device pixels.
const MAX_BACKING_PX: f64 = 10000.;

/// On-screen size of the drawing surface, re-derived before every render.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Logical (CSS) width
    pub width: f64,
    /// Logical (CSS) height
    pub height: f64,
    /// Device pixels per logical pixel
    pub pixel_density: f64,
}

/// Device-pixel dimensions of a canvas backing store.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Non-finite or non-positive densities fall back to 1.
    pub fn new(width: f64, height: f64, pixel_density: f64) -> Self {
        let pixel_density = if pixel_density.is_finite() && pixel_density > 0. {
            pixel_density
        } else {
            1.
        };
        Viewport {
            width: width.max(0.),
            height: height.max(0.),
            pixel_density,
        }
    }

    /// Backing-store size that keeps strokes crisp at this density.
    pub fn backing_size(&self) -> BackingSize {
        let px = |logical: f64| (logical * self.pixel_density).round().clamp(0., MAX_BACKING_PX) as u32;
        BackingSize {
            width: px(self.width),
            height: px(self.height),
        }
    }

    /// The new backing size, if `current` no longer matches this viewport.
    pub fn resize_for(&self, current: BackingSize) -> Option<BackingSize> {
        let target = self.backing_size();
        (target != current).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_size() {
        let v = Viewport::new(300., 200., 2.);
        assert_eq!(v.backing_size(), BackingSize { width: 600, height: 400 });
        let v = Viewport::new(301., 199., 1.5);
        assert_eq!(v.backing_size(), BackingSize { width: 452, height: 299 });
    }

    #[test]
    fn test_density_fallback() {
        assert_eq!(Viewport::new(10., 10., 0.).pixel_density, 1.);
        assert_eq!(Viewport::new(10., 10., f64::NAN).pixel_density, 1.);
    }

    #[test]
    fn test_resize_only_when_changed() {
        let v = Viewport::new(300., 200., 2.);
        assert_eq!(v.resize_for(BackingSize::default()), Some(BackingSize { width: 600, height: 400 }));
        assert_eq!(v.resize_for(BackingSize { width: 600, height: 400 }), None);
    }
}
