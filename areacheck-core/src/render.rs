//! Region renderer: turns R and a viewport into drawing commands.
//!
//! Output is a pure function of its inputs, so re-rendering on every resize or
//! R change is always safe.

use std::f64::consts::PI;

use log::trace;

use crate::draw::{DrawCommand, Drawing, Pen, TextAlign, TextBaseline};
use crate::region::{Region, RegionParameter, SubRegion};
use crate::transform::{AxisTransform, PAD};
use crate::viewport::{BackingSize, Viewport};

pub const REGION_FILL: &str = "#4EA3FF";
pub const AXIS_COLOR: &str = "#000";
pub const AXIS_LINE_WIDTH: f64 = 1.2;
pub const LABEL_FONT: &str = "12px sans-serif";

/// Arrowhead length and half-width.
const ARROW: (f64, f64) = (8., 4.);
/// Half-length of a tick mark.
const TICK: f64 = 4.;

/// Something that can display a [`Drawing`], e.g. a browser canvas.
pub trait Surface {
    /// Current on-screen size and pixel density.
    fn viewport(&self) -> Viewport;
    fn backing_size(&self) -> BackingSize;
    fn resize_backing(&mut self, size: BackingSize);
    fn execute(&mut self, commands: &[DrawCommand]);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: &'static str,
    /// Pixel position along the tick's axis.
    pub px: f64,
}

/// Tick marks at −R, −R/2, R/2, R on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub x: [Tick; 4],
    pub y: [Tick; 4],
}

impl Ticks {
    pub fn new(r: RegionParameter, viewport: &Viewport) -> Self {
        Self::with_transform(r, &AxisTransform::new(viewport))
    }

    fn with_transform(r: RegionParameter, t: &AxisTransform) -> Self {
        let r = r.value();
        let x = |value: f64, label| Tick { value, label, px: t.x(value) };
        let y = |value: f64, label| Tick { value, label, px: t.y(value) };
        Ticks {
            x: [x(-r, "\u{2212}R"), x(-r / 2., "\u{2212}R/2"), x(r / 2., "R/2"), x(r, "R")],
            y: [y(r, "R"), y(r / 2., "R/2"), y(-r / 2., "\u{2212}R/2"), y(-r, "\u{2212}R")],
        }
    }
}

/// Render the region for `r` into commands for a surface of the given `viewport`.
pub fn render(r: RegionParameter, viewport: &Viewport) -> Vec<DrawCommand> {
    let t = AxisTransform::new(viewport);
    let (w, h) = (viewport.width, viewport.height);
    let dpr = viewport.pixel_density;
    let backing = viewport.backing_size();
    let mut pen = Pen::new();

    pen.set_transform(dpr, 0., 0., dpr, 0., 0.)
        .clear_rect(0., 0., backing.width as f64, backing.height as f64);

    pen.fill_style(REGION_FILL);
    for part in Region::new(r).parts.iter() {
        draw_part(&mut pen, &t, part);
    }

    let (cx, cy) = (t.origin.x, t.origin.y);
    let (len, half) = ARROW;
    pen.stroke_style(AXIS_COLOR).line_width(AXIS_LINE_WIDTH);

    // x axis
    pen.begin_path().move_to(PAD / 2., cy).line_to(w - PAD / 2., cy).stroke();
    pen.begin_path()
        .move_to(w - PAD / 2., cy)
        .line_to(w - PAD / 2. - len, cy - half)
        .line_to(w - PAD / 2. - len, cy + half)
        .close_path()
        .fill_style(AXIS_COLOR)
        .fill();

    // y axis
    pen.begin_path().move_to(cx, h - PAD / 2.).line_to(cx, PAD / 2.).stroke();
    pen.begin_path()
        .move_to(cx, PAD / 2.)
        .line_to(cx - half, PAD / 2. + len)
        .line_to(cx + half, PAD / 2. + len)
        .close_path()
        .fill();

    pen.fill_style(AXIS_COLOR)
        .font(LABEL_FONT)
        .text_align(TextAlign::Center)
        .text_baseline(TextBaseline::Top);

    pen.fill_text("x", w - 26., cy + 8.);
    pen.save().translate(cx + 12., 26.).rotate(-PI / 2.).fill_text("y", 0., 0.).restore();

    let ticks = Ticks::with_transform(r, &t);
    for tick in ticks.x.iter() {
        pen.begin_path().move_to(tick.px, cy - TICK).line_to(tick.px, cy + TICK).stroke();
        pen.fill_text(tick.label, tick.px, cy + 6.);
    }
    for tick in ticks.y.iter() {
        pen.begin_path().move_to(cx - TICK, tick.px).line_to(cx + TICK, tick.px).stroke();
        pen.text_align(TextAlign::Left)
            .text_baseline(TextBaseline::Middle)
            .fill_text(tick.label, cx + 6., tick.px - 1.)
            .text_align(TextAlign::Center)
            .text_baseline(TextBaseline::Top);
    }

    let commands = pen.finish();
    trace!("rendered R={} at {}x{}@{}: {} commands", r, w, h, dpr, commands.len());
    commands
}

fn draw_part(pen: &mut Pen, t: &AxisTransform, part: &SubRegion) {
    pen.begin_path();
    match part {
        SubRegion::Rectangle { corner, opposite } => {
            let x0 = t.x(corner.x);
            let y0 = t.y(corner.y);
            pen.rect(x0, y0, t.x(opposite.x) - x0, t.y(opposite.y) - y0);
        }
        SubRegion::Wedge { center, radius, start, end } => {
            let c = t.apply(*center);
            pen.move_to(c.x, c.y)
                .ellipse(c.x, c.y, radius * t.scale.x, radius * t.scale.y, 0., *start, *end, false)
                .close_path();
        }
        SubRegion::Triangle { vertices: [a, b, c] } => {
            let (a, b, c) = (t.apply(*a), t.apply(*b), t.apply(*c));
            pen.move_to(a.x, a.y).line_to(b.x, b.y).line_to(c.x, c.y).close_path();
        }
    }
    pen.fill();
}

/// A full frame for a surface whose backing store is currently `current`.
pub fn frame(r: RegionParameter, viewport: &Viewport, current: BackingSize) -> Drawing {
    Drawing {
        resize: viewport.resize_for(current),
        commands: render(r, viewport),
    }
}

/// Render onto `surface`, resizing its backing store first if needed. No-op without a surface.
pub fn paint<S: Surface + ?Sized>(surface: Option<&mut S>, r: RegionParameter) {
    let Some(surface) = surface else {
        return;
    };
    let viewport = surface.viewport();
    let drawing = frame(r, &viewport, surface.backing_size());
    if let Some(size) = drawing.resize {
        surface.resize_backing(size);
    }
    surface.execute(&drawing.commands);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn r(v: f64) -> RegionParameter {
        RegionParameter::new(v).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        viewport: Option<Viewport>,
        backing: BackingSize,
        resizes: Vec<BackingSize>,
        frames: Vec<Vec<DrawCommand>>,
    }

    impl Surface for Recorder {
        fn viewport(&self) -> Viewport {
            self.viewport.unwrap_or(Viewport::new(400., 400., 1.))
        }
        fn backing_size(&self) -> BackingSize {
            self.backing
        }
        fn resize_backing(&mut self, size: BackingSize) {
            self.backing = size;
            self.resizes.push(size);
        }
        fn execute(&mut self, commands: &[DrawCommand]) {
            self.frames.push(commands.to_vec());
        }
    }

    #[test]
    fn test_ticks_symmetric() {
        let viewport = Viewport::new(420., 360., 2.);
        let t = AxisTransform::new(&viewport);
        for v in [2., 2.5, 3., 4.25, 5.] {
            let ticks = Ticks::new(r(v), &viewport);
            assert_relative_eq!(ticks.x[0].px + ticks.x[3].px, 2. * t.origin.x, epsilon = 1e-9);
            assert_relative_eq!(ticks.x[1].px + ticks.x[2].px, 2. * t.origin.x, epsilon = 1e-9);
            assert_relative_eq!(ticks.y[0].px + ticks.y[3].px, 2. * t.origin.y, epsilon = 1e-9);
            assert_relative_eq!(ticks.y[1].px + ticks.y[2].px, 2. * t.origin.y, epsilon = 1e-9);
            // R/2 sits halfway between the origin and R
            assert_relative_eq!(ticks.x[3].px - t.origin.x, 2. * (ticks.x[2].px - t.origin.x), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ticks_scale_linearly() {
        let small = Viewport::new(252., 252., 1.);
        let large = Viewport::new(452., 452., 1.);
        // Offsets from the origin are proportional to (size / 2 - PAD): 100 vs 200
        for v in [2., 3.5, 5.] {
            let a = Ticks::new(r(v), &small);
            let b = Ticks::new(r(v), &large);
            for (ta, tb) in a.x.iter().zip(b.x.iter()) {
                assert_relative_eq!(2. * (ta.px - 126.), tb.px - 226., epsilon = 1e-9);
            }
            for (ta, tb) in a.y.iter().zip(b.y.iter()) {
                assert_relative_eq!(2. * (ta.px - 126.), tb.px - 226., epsilon = 1e-9);
            }
            assert_relative_eq!(a.x[3].px - 126., v * 20., epsilon = 1e-9);
        }
    }

    #[test]
    fn test_render_idempotent() {
        let viewport = Viewport::new(333., 287., 1.25);
        assert_eq!(render(r(3.7), &viewport), render(r(3.7), &viewport));
    }

    #[test]
    fn test_render_starts_with_transform_and_clear() {
        let commands = render(r(3.), &Viewport::new(300., 200., 2.));
        assert_eq!(commands[0], DrawCommand::SetTransform { a: 2., b: 0., c: 0., d: 2., e: 0., f: 0. });
        assert_eq!(commands[1], DrawCommand::ClearRect { x: 0., y: 0., width: 600., height: 400. });
        assert_eq!(commands[2], DrawCommand::SetFillStyle { color: REGION_FILL.to_string() });
    }

    #[test]
    fn test_render_region_shapes() {
        // 252x252 → origin (126, 126), 20 px per unit
        let commands = render(r(4.), &Viewport::new(252., 252., 1.));
        let rect = commands.iter().find_map(|c| match c {
            DrawCommand::Rect { x, y, width, height } => Some((*x, *y, *width, *height)),
            _ => None,
        });
        assert_eq!(rect, Some((126., 126., 40., 80.)));

        let ellipse = commands.iter().find_map(|c| match c {
            DrawCommand::Ellipse { x, y, rx, ry, start, end, anticlockwise, .. } => Some((*x, *y, *rx, *ry, *start, *end, *anticlockwise)),
            _ => None,
        });
        assert_eq!(ellipse, Some((126., 126., 40., 40., 1.5 * PI, PI, false)));

        let fills = commands.iter().filter(|c| **c == DrawCommand::Fill).count();
        // 3 region pieces + 2 arrowheads
        assert_eq!(fills, 5);

        assert!(commands.contains(&DrawCommand::LineTo { x: 126., y: 46. }));
        assert!(commands.contains(&DrawCommand::LineTo { x: 206., y: 126. }));
    }

    #[test]
    fn test_render_labels() {
        let commands = render(r(2.), &Viewport::new(252., 252., 1.));
        let labels: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec!["x", "y", "\u{2212}R", "\u{2212}R/2", "R/2", "R", "R", "R/2", "\u{2212}R/2", "\u{2212}R"]
        );
        assert!(commands.contains(&DrawCommand::Rotate { angle: -PI / 2. }));
    }

    #[test]
    fn test_paint_resizes_once() {
        let mut surface = Recorder {
            viewport: Some(Viewport::new(300., 200., 2.)),
            ..Default::default()
        };
        paint(Some(&mut surface), r(3.));
        paint(Some(&mut surface), r(4.));
        assert_eq!(surface.resizes, vec![BackingSize { width: 600, height: 400 }]);
        assert_eq!(surface.frames.len(), 2);
    }

    #[test]
    fn test_paint_without_surface() {
        paint::<Recorder>(None, r(3.));
    }
}
