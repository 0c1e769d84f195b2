use std::fmt::{self, Display, Formatter};

use crate::error::ValidationError;
use crate::input::{EditOutcome, NumericInput};
use crate::region::RegionParameter;
use crate::validate::{self, Point};

/// The free-text fields that can carry an invalid marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Y,
    R,
}

impl Field {
    /// Form control name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Y => "y",
            Field::R => "r",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XOption {
    pub value: f64,
    pub checked: bool,
}

/// The X options. [`ChoiceGroup::select`] keeps at most one checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceGroup {
    options: Vec<XOption>,
}

impl ChoiceGroup {
    pub fn new(values: &[f64]) -> Self {
        ChoiceGroup {
            options: values.iter().map(|&value| XOption { value, checked: false }).collect(),
        }
    }

    pub fn options(&self) -> &[XOption] {
        &self.options
    }

    /// Check or uncheck option `index`; checking clears every sibling.
    pub fn select(&mut self, index: usize, checked: bool) {
        if index >= self.options.len() {
            return;
        }
        if checked {
            for (i, option) in self.options.iter_mut().enumerate() {
                option.checked = i == index;
            }
        } else {
            self.options[index].checked = false;
        }
    }

    pub fn checked(&self) -> Vec<f64> {
        self.options.iter().filter(|o| o.checked).map(|o| o.value).collect()
    }
}

/// Form state: the X group plus the Y and R text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub x: ChoiceGroup,
    pub y: NumericInput,
    pub r: NumericInput,
}

impl Form {
    pub fn new(x_values: &[f64]) -> Self {
        Form {
            x: ChoiceGroup::new(x_values),
            y: NumericInput::default(),
            r: NumericInput::default(),
        }
    }

    pub fn input(&self, field: Field) -> &NumericInput {
        match field {
            Field::Y => &self.y,
            Field::R => &self.r,
        }
    }

    pub fn input_mut(&mut self, field: Field) -> &mut NumericInput {
        match field {
            Field::Y => &mut self.y,
            Field::R => &mut self.r,
        }
    }

    pub fn edit(&mut self, field: Field, raw: &str) -> EditOutcome {
        self.input_mut(field).edit(raw)
    }

    /// R as the renderer sees it: in range, or the default.
    pub fn region_parameter(&self) -> RegionParameter {
        RegionParameter::from_input(Some(self.r.text()))
    }

    pub fn validate(&self) -> Result<Point, ValidationError> {
        validate::validate(&self.x.checked(), self.y.text(), self.r.text())
    }
}
