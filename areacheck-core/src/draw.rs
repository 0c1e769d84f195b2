//! Backend-neutral 2D drawing commands, modeled on the canvas 2D context API.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::viewport::BackingSize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
        }
    }
}

/// One drawing instruction. Coordinates are logical pixels under the current transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Replace the current transform with the matrix `[a c e; b d f]`.
    SetTransform { a: f64, b: f64, c: f64, d: f64, e: f64, f: f64 },
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    SetFillStyle { color: String },
    SetStrokeStyle { color: String },
    SetLineWidth { width: f64 },
    SetFont { font: String },
    SetTextAlign { align: TextAlign },
    SetTextBaseline { baseline: TextBaseline },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Ellipse {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    ClosePath,
    Fill,
    Stroke,
    FillText { text: String, x: f64, y: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { angle: f64 },
}

/// A complete frame: an optional backing-store resize followed by commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Drawing {
    pub resize: Option<BackingSize>,
    pub commands: Vec<DrawCommand>,
}

/// Accumulates commands with the same call shape as a canvas context.
#[derive(Debug, Default)]
pub struct Pen {
    commands: Vec<DrawCommand>,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<DrawCommand> {
        self.commands
    }

    fn push(&mut self, command: DrawCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.push(DrawCommand::SetTransform { a, b, c, d, e, f })
    }

    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.push(DrawCommand::ClearRect { x, y, width, height })
    }

    pub fn fill_style(&mut self, color: &str) -> &mut Self {
        self.push(DrawCommand::SetFillStyle { color: color.to_string() })
    }

    pub fn stroke_style(&mut self, color: &str) -> &mut Self {
        self.push(DrawCommand::SetStrokeStyle { color: color.to_string() })
    }

    pub fn line_width(&mut self, width: f64) -> &mut Self {
        self.push(DrawCommand::SetLineWidth { width })
    }

    pub fn font(&mut self, font: &str) -> &mut Self {
        self.push(DrawCommand::SetFont { font: font.to_string() })
    }

    pub fn text_align(&mut self, align: TextAlign) -> &mut Self {
        self.push(DrawCommand::SetTextAlign { align })
    }

    pub fn text_baseline(&mut self, baseline: TextBaseline) -> &mut Self {
        self.push(DrawCommand::SetTextBaseline { baseline })
    }

    pub fn begin_path(&mut self) -> &mut Self {
        self.push(DrawCommand::BeginPath)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(DrawCommand::MoveTo { x, y })
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(DrawCommand::LineTo { x, y })
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.push(DrawCommand::Rect { x, y, width, height })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64, anticlockwise: bool) -> &mut Self {
        self.push(DrawCommand::Ellipse { x, y, rx, ry, rotation, start, end, anticlockwise })
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.push(DrawCommand::ClosePath)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.push(DrawCommand::Fill)
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.push(DrawCommand::Stroke)
    }

    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) -> &mut Self {
        self.push(DrawCommand::FillText { text: text.to_string(), x, y })
    }

    pub fn save(&mut self) -> &mut Self {
        self.push(DrawCommand::Save)
    }

    pub fn restore(&mut self) -> &mut Self {
        self.push(DrawCommand::Restore)
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(DrawCommand::Translate { x, y })
    }

    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.push(DrawCommand::Rotate { angle })
    }
}
