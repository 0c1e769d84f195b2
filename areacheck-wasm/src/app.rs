use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget, HtmlInputElement};

use areacheck_core::network::{clear_history, load_history, submit};
use areacheck_core::validate::parse_decimal;
use areacheck_core::{ClientConfig, Controller, Field};

use crate::dom::{self, DomView};
use crate::fetch::FetchEvaluator;

struct App {
    controller: RefCell<Controller<DomView>>,
    evaluator: FetchEvaluator,
}

/// Attach `handler` to `target` for the lifetime of the page.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// The X choices come from the page when every box carries a numeric value.
fn x_values(boxes: &[HtmlInputElement], config: &ClientConfig) -> Vec<f64> {
    let parsed: Vec<f64> = boxes.iter().filter_map(|b| parse_decimal(&b.value())).collect();
    if !boxes.is_empty() && parsed.len() == boxes.len() {
        parsed
    } else {
        if !boxes.is_empty() {
            warn!("{} of {} X boxes have no numeric value, using configured X values", boxes.len() - parsed.len(), boxes.len());
        }
        config.x_values.clone()
    }
}

/// Build the controller over the current document and wire its events.
pub fn mount(mut config: ClientConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let boxes = dom::x_inputs(&document);
    config.x_values = x_values(&boxes, &config);

    let view = DomView::new(&window, &document);
    let mut controller = Controller::new(&config, view);
    for (i, b) in boxes.iter().enumerate() {
        if b.checked() {
            controller.select_x(i, true);
        }
    }
    for field in [Field::Y, Field::R] {
        if let Some(text) = dom::input_value(&document, field).filter(|t| !t.is_empty()) {
            controller.edit(field, &text);
        }
    }
    controller.mount();

    let app = Rc::new(App {
        controller: RefCell::new(controller),
        evaluator: FetchEvaluator::new(window.clone()),
    });

    for (i, b) in boxes.into_iter().enumerate() {
        let app = app.clone();
        let input = b.clone();
        listen(&b, "change", move |_| {
            app.controller.borrow_mut().select_x(i, input.checked());
        })?;
    }

    for field in [Field::Y, Field::R] {
        if let Some(input) = dom::element::<HtmlInputElement>(&document, dom::field_id(field)) {
            let app = app.clone();
            let target = input.clone();
            listen(&input, "input", move |_| {
                app.controller.borrow_mut().edit(field, &target.value());
            })?;
        }
    }

    if let Some(form) = dom::element::<EventTarget>(&document, dom::FORM_ID) {
        let app = app.clone();
        listen(&form, "submit", move |e| {
            e.prevent_default();
            let app = app.clone();
            spawn_local(async move {
                if let Err(err) = submit(&app.controller, &app.evaluator).await {
                    debug!("not submitted: {}", err);
                }
            });
        })?;
    } else {
        warn!("no #{} form, submissions disabled", dom::FORM_ID);
    }

    if let Some(button) = dom::element::<EventTarget>(&document, dom::CLEAR_ID) {
        let app = app.clone();
        listen(&button, "click", move |e| {
            e.prevent_default();
            let app = app.clone();
            spawn_local(async move { clear_history(&app.controller, &app.evaluator).await });
        })?;
    }

    {
        let app = app.clone();
        listen(&window, "resize", move |_| app.controller.borrow_mut().redraw())?;
    }

    info!("mounted against {}", config.endpoint);
    spawn_local(async move { load_history(&app.controller, &app.evaluator).await });
    Ok(())
}
