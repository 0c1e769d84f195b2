//! SVG rendering of the region.
//!
//! [`SvgSurface`] interprets drawing commands with canvas semantics (a current
//! transform, a save/restore stack and a single open path) and collects the
//! result as SVG elements in backing-store pixels.

use std::f64::consts::{PI, TAU};

use log::{debug, trace};

use areacheck_core::draw::{DrawCommand, TextAlign, TextBaseline};
use areacheck_core::{paint, BackingSize, RegionParameter, Surface, Ticks, Viewport};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Canvas defaults for a fresh context.
const DEFAULT_FONT: &str = "10px sans-serif";
const DEFAULT_COLOR: &str = "#000";

/// Affine matrix `[a, b, c, d, e, f]` in canvas order.
type Matrix = [f64; 6];

const IDENTITY: Matrix = [1., 0., 0., 1., 0., 0.];

fn apply(m: &Matrix, x: f64, y: f64) -> (f64, f64) {
    (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
}

/// Shortest decimal form with at most 3 fractional digits.
fn num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[derive(Debug, Clone)]
struct State {
    matrix: Matrix,
    fill: String,
    stroke: String,
    line_width: f64,
    font: String,
    align: Option<TextAlign>,
    baseline: Option<TextBaseline>,
}

impl Default for State {
    fn default() -> Self {
        State {
            matrix: IDENTITY,
            fill: DEFAULT_COLOR.to_string(),
            stroke: DEFAULT_COLOR.to_string(),
            line_width: 1.,
            font: DEFAULT_FONT.to_string(),
            align: None,
            baseline: None,
        }
    }
}

impl State {
    /// Uniform scale of the current transform.
    fn scale(&self) -> f64 {
        let m = &self.matrix;
        (m[0] * m[3] - m[1] * m[2]).abs().sqrt()
    }

    fn translate(&mut self, x: f64, y: f64) {
        let m = &mut self.matrix;
        m[4] += m[0] * x + m[2] * y;
        m[5] += m[1] * x + m[3] * y;
    }

    fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let [a, b, c, d, e, f] = self.matrix;
        self.matrix = [a * cos + c * sin, b * cos + d * sin, c * cos - a * sin, d * cos - b * sin, e, f];
    }
}

/// An in-memory drawing surface that produces an SVG document.
#[derive(Debug)]
pub struct SvgSurface {
    viewport: Viewport,
    size: BackingSize,
    state: State,
    stack: Vec<State>,
    path: Vec<String>,
    has_point: bool,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(viewport: Viewport) -> Self {
        SvgSurface {
            viewport,
            size: BackingSize::default(),
            state: State::default(),
            stack: Vec::new(),
            path: Vec::new(),
            has_point: false,
            elements: Vec::new(),
        }
    }

    fn point(&self, x: f64, y: f64) -> String {
        let (x, y) = apply(&self.state.matrix, x, y);
        format!("{} {}", num(x), num(y))
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let point = self.point(x, y);
        self.path.push(format!("M {}", point));
        self.has_point = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.has_point {
            let point = self.point(x, y);
            self.path.push(format!("L {}", point));
        } else {
            self.move_to(x, y);
        }
    }

    /// Close the current subpath, if there is one.
    fn close_path(&mut self) {
        if self.has_point {
            self.path.push("Z".to_string());
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64, anticlockwise: bool) {
        let (sin, cos) = rotation.sin_cos();
        let at = |theta: f64| {
            let (ex, ey) = (rx * theta.cos(), ry * theta.sin());
            (x + ex * cos - ey * sin, y + ex * sin + ey * cos)
        };

        let sweep = if anticlockwise { start - end } else { end - start };
        let sweep = if sweep >= TAU { TAU } else { sweep.rem_euclid(TAU) };
        let direction = if anticlockwise { -1. } else { 1. };

        let (sx, sy) = at(start);
        self.line_to(sx, sy);

        let m = self.state.matrix;
        let rx_px = rx * m[0].hypot(m[1]);
        let ry_px = ry * m[2].hypot(m[3]);
        let rotation_deg = (rotation + m[1].atan2(m[0])).to_degrees();
        // a mirrored transform flips the drawing direction
        let clockwise = (direction > 0.) == (m[0] * m[3] - m[1] * m[2] >= 0.);

        // SVG arcs cannot describe a full turn, so split long sweeps in two
        let pieces = if sweep > PI { 2 } else { 1 };
        let step = sweep / pieces as f64;
        for i in 1..=pieces {
            let (px, py) = at(start + direction * step * i as f64);
            let point = self.point(px, py);
            self.path.push(format!(
                "A {} {} {} 0 {} {}",
                num(rx_px),
                num(ry_px),
                num(rotation_deg),
                if clockwise { 1 } else { 0 },
                point,
            ));
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (px, py) = apply(&self.state.matrix, x, y);
        let (size, family) = match self.state.font.split_once("px ") {
            Some((size, family)) => (size.trim().parse::<f64>().unwrap_or(10.), family.trim()),
            None => (10., self.state.font.as_str()),
        };
        let anchor = match self.state.align {
            Some(TextAlign::Center) => "middle",
            Some(TextAlign::Left) | None => "start",
        };
        let baseline = match self.state.baseline {
            Some(TextBaseline::Top) => " dominant-baseline=\"hanging\"",
            Some(TextBaseline::Middle) => " dominant-baseline=\"middle\"",
            None => "",
        };
        let m = &self.state.matrix;
        let angle = m[1].atan2(m[0]).to_degrees();
        let rotate = if num(angle) == "0" {
            String::new()
        } else {
            format!(" transform=\"rotate({} {} {})\"", num(angle), num(px), num(py))
        };
        self.elements.push(format!(
            r#"<text x="{}" y="{}" fill="{}" font-family="{}" font-size="{}" text-anchor="{}"{}{}>{}</text>"#,
            num(px),
            num(py),
            escape(&self.state.fill),
            escape(family),
            num(size * self.state.scale()),
            anchor,
            baseline,
            rotate,
            escape(text),
        ));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, y0) = apply(&self.state.matrix, x, y);
        let (x1, y1) = apply(&self.state.matrix, x + width, y + height);
        let covers = x0.min(x1) <= 0.
            && y0.min(y1) <= 0.
            && x0.max(x1) >= self.size.width as f64
            && y0.max(y1) >= self.size.height as f64;
        if covers {
            self.elements.clear();
        } else {
            // SVG has no way to punch a transparent hole
            trace!("ignoring partial clear ({}, {}) {}x{}", x, y, width, height);
        }
    }

    fn apply_command(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::SetTransform { a, b, c, d, e, f } => self.state.matrix = [*a, *b, *c, *d, *e, *f],
            DrawCommand::ClearRect { x, y, width, height } => self.clear_rect(*x, *y, *width, *height),
            DrawCommand::SetFillStyle { color } => self.state.fill = color.clone(),
            DrawCommand::SetStrokeStyle { color } => self.state.stroke = color.clone(),
            DrawCommand::SetLineWidth { width } => self.state.line_width = *width,
            DrawCommand::SetFont { font } => self.state.font = font.clone(),
            DrawCommand::SetTextAlign { align } => self.state.align = Some(*align),
            DrawCommand::SetTextBaseline { baseline } => self.state.baseline = Some(*baseline),
            DrawCommand::BeginPath => {
                self.path.clear();
                self.has_point = false;
            }
            DrawCommand::MoveTo { x, y } => self.move_to(*x, *y),
            DrawCommand::LineTo { x, y } => self.line_to(*x, *y),
            DrawCommand::Rect { x, y, width, height } => {
                self.move_to(*x, *y);
                self.line_to(x + width, *y);
                self.line_to(x + width, y + height);
                self.line_to(*x, y + height);
                // closing returns the pen to (x, y), which starts the next subpath
                self.close_path();
            }
            DrawCommand::Ellipse { x, y, rx, ry, rotation, start, end, anticlockwise } => {
                self.ellipse(*x, *y, *rx, *ry, *rotation, *start, *end, *anticlockwise)
            }
            DrawCommand::ClosePath => self.close_path(),
            DrawCommand::Fill => {
                if !self.path.is_empty() {
                    self.elements.push(format!(
                        r#"<path d="{}" fill="{}"/>"#,
                        self.path.join(" "),
                        escape(&self.state.fill)
                    ));
                }
            }
            DrawCommand::Stroke => {
                if !self.path.is_empty() {
                    self.elements.push(format!(
                        r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                        self.path.join(" "),
                        escape(&self.state.stroke),
                        num(self.state.line_width * self.state.scale())
                    ));
                }
            }
            DrawCommand::FillText { text, x, y } => self.fill_text(text, *x, *y),
            DrawCommand::Save => self.stack.push(self.state.clone()),
            DrawCommand::Restore => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            DrawCommand::Translate { x, y } => self.state.translate(*x, *y),
            DrawCommand::Rotate { angle } => self.state.rotate(*angle),
        }
    }

    /// The SVG document: logical size on screen, backing pixels in the viewBox.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"{}\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n",
            SVG_NS,
            num(self.viewport.width),
            num(self.viewport.height),
            self.size.width,
            self.size.height,
        );
        for element in &self.elements {
            svg.push_str("  ");
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Surface for SvgSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn backing_size(&self) -> BackingSize {
        self.size
    }

    fn resize_backing(&mut self, size: BackingSize) {
        self.size = size;
        self.elements.clear();
        self.state = State::default();
        self.stack.clear();
    }

    fn execute(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.apply_command(command);
        }
    }
}

/// Render region parameter `r` at `viewport` to an SVG document.
pub fn render_svg(r: RegionParameter, viewport: Viewport) -> String {
    let ticks = Ticks::new(r, &viewport);
    debug!(
        "R={}: x ticks at {}, y ticks at {}",
        r,
        ticks.x.iter().map(|t| num(t.px)).collect::<Vec<_>>().join(" "),
        ticks.y.iter().map(|t| num(t.px)).collect::<Vec<_>>().join(" "),
    );
    let mut surface = SvgSurface::new(viewport);
    paint(Some(&mut surface), r);
    surface.to_svg()
}
