use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use areacheck_core::draw::DrawCommand;
use areacheck_core::{BackingSize, Surface, Viewport};

// Non-deprecated helpers to set canvas styles via property assignment.
fn set_style(ctx: &CanvasRenderingContext2d, property: &str, color: &str) {
    let _ = js_sys::Reflect::set(ctx, &JsValue::from_str(property), &JsValue::from_str(color));
}

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` if the canvas has no 2D context.
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(CanvasSurface { window, canvas, ctx })
    }

    fn apply(&self, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::SetTransform { a, b, c, d, e, f } => ctx.set_transform(*a, *b, *c, *d, *e, *f)?,
            DrawCommand::ClearRect { x, y, width, height } => ctx.clear_rect(*x, *y, *width, *height),
            DrawCommand::SetFillStyle { color } => set_style(ctx, "fillStyle", color),
            DrawCommand::SetStrokeStyle { color } => set_style(ctx, "strokeStyle", color),
            DrawCommand::SetLineWidth { width } => ctx.set_line_width(*width),
            DrawCommand::SetFont { font } => ctx.set_font(font),
            DrawCommand::SetTextAlign { align } => ctx.set_text_align(align.as_str()),
            DrawCommand::SetTextBaseline { baseline } => ctx.set_text_baseline(baseline.as_str()),
            DrawCommand::BeginPath => ctx.begin_path(),
            DrawCommand::MoveTo { x, y } => ctx.move_to(*x, *y),
            DrawCommand::LineTo { x, y } => ctx.line_to(*x, *y),
            DrawCommand::Rect { x, y, width, height } => ctx.rect(*x, *y, *width, *height),
            DrawCommand::Ellipse { x, y, rx, ry, rotation, start, end, anticlockwise } => {
                ctx.ellipse_with_anticlockwise(*x, *y, *rx, *ry, *rotation, *start, *end, *anticlockwise)?
            }
            DrawCommand::ClosePath => ctx.close_path(),
            DrawCommand::Fill => ctx.fill(),
            DrawCommand::Stroke => ctx.stroke(),
            DrawCommand::FillText { text, x, y } => ctx.fill_text(text, *x, *y)?,
            DrawCommand::Save => ctx.save(),
            DrawCommand::Restore => ctx.restore(),
            DrawCommand::Translate { x, y } => ctx.translate(*x, *y)?,
            DrawCommand::Rotate { angle } => ctx.rotate(*angle)?,
        }
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
            self.window.device_pixel_ratio(),
        )
    }

    fn backing_size(&self) -> BackingSize {
        BackingSize {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }

    fn resize_backing(&mut self, size: BackingSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn execute(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            if let Err(e) = self.apply(command) {
                warn!("canvas rejected {:?}: {:?}", command, e);
            }
        }
    }
}
