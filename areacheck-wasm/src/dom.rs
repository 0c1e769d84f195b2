use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use areacheck_core::{paint, Field, RegionParameter, View};

use crate::canvas::CanvasSurface;

pub const MESSAGE_ID: &str = "message";
pub const CANVAS_ID: &str = "graph";
pub const RESULTS_ID: &str = "results";
pub const FORM_ID: &str = "pk";
pub const CLEAR_ID: &str = "clearTableBtn";
pub const X_SELECTOR: &str = "input[name=\"x\"]";

pub fn field_id(field: Field) -> &'static str {
    match field {
        Field::Y => "y",
        Field::R => "r",
    }
}

pub fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Every `input[name="x"]` in document order.
pub fn x_inputs(document: &Document) -> Vec<HtmlInputElement> {
    let Ok(nodes) = document.query_selector_all(X_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

/// The page's controls. Missing elements are skipped.
pub struct DomView {
    message: Option<HtmlElement>,
    results: Option<HtmlElement>,
    y: Option<HtmlInputElement>,
    r: Option<HtmlInputElement>,
    x: Vec<HtmlInputElement>,
    canvas: Option<CanvasSurface>,
}

impl DomView {
    pub fn new(window: &web_sys::Window, document: &Document) -> Self {
        let canvas = element(document, CANVAS_ID).and_then(|c| CanvasSurface::new(window.clone(), c));
        if canvas.is_none() {
            warn!("no #{} canvas, drawing disabled", CANVAS_ID);
        }
        DomView {
            message: element(document, MESSAGE_ID),
            results: element(document, RESULTS_ID),
            y: element(document, field_id(Field::Y)),
            r: element(document, field_id(Field::R)),
            x: x_inputs(document),
            canvas,
        }
    }

    fn input(&self, field: Field) -> Option<&HtmlInputElement> {
        match field {
            Field::Y => self.y.as_ref(),
            Field::R => self.r.as_ref(),
        }
    }
}

impl View for DomView {
    fn set_message(&mut self, message: &str) {
        if let Some(el) = &self.message {
            // keep the line's height when there is nothing to say
            el.set_text_content(Some(if message.is_empty() { "\u{a0}" } else { message }));
        }
    }

    fn set_invalid(&mut self, field: Field, invalid: bool) {
        if let Some(input) = self.input(field) {
            let flag = if invalid { "true" } else { "false" };
            if let Err(e) = input.dataset().set("invalid", flag) {
                debug!("dataset.invalid on #{}: {:?}", field_id(field), e);
            }
        }
    }

    fn set_text(&mut self, field: Field, text: &str) {
        if let Some(input) = self.input(field) {
            if input.value() != text {
                input.set_value(text);
            }
        }
    }

    fn set_x_checked(&mut self, index: usize, checked: bool) {
        if let Some(input) = self.x.get(index) {
            input.set_checked(checked);
        }
    }

    fn show_results(&mut self, html: &str) {
        if let Some(el) = &self.results {
            el.set_inner_html(html);
        }
    }

    fn redraw(&mut self, r: RegionParameter) {
        paint(self.canvas.as_mut(), r);
    }
}

/// Reads a control's current text, if present.
pub fn input_value(document: &Document, field: Field) -> Option<String> {
    element::<HtmlInputElement>(document, field_id(field)).map(|input| input.value())
}
