use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use crate::controller::View;
use crate::error::EvaluatorError;
use crate::evaluator::{Evaluator, EvaluatorRequest, EvaluatorResponse};
use crate::form::Field;
use crate::region::RegionParameter;

/// Remembers the last value pushed to every part of the view.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub message: Option<String>,
    pub invalid: HashMap<Field, bool>,
    pub texts: HashMap<Field, String>,
    pub checked: HashMap<usize, bool>,
    pub results: Option<String>,
    pub redraws: Vec<RegionParameter>,
}

impl View for RecordingView {
    fn set_message(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }
    fn set_invalid(&mut self, field: Field, invalid: bool) {
        self.invalid.insert(field, invalid);
    }
    fn set_text(&mut self, field: Field, text: &str) {
        self.texts.insert(field, text.to_string());
    }
    fn set_x_checked(&mut self, index: usize, checked: bool) {
        self.checked.insert(index, checked);
    }
    fn show_results(&mut self, html: &str) {
        self.results = Some(html.to_string());
    }
    fn redraw(&mut self, r: RegionParameter) {
        self.redraws.push(r);
    }
}

pub fn response(status: u16, body: &str) -> EvaluatorResponse {
    EvaluatorResponse { status, body: body.to_string() }
}

/// Answers requests from a queue and records what was sent.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    pub replies: RefCell<VecDeque<Result<EvaluatorResponse, EvaluatorError>>>,
    pub sent: RefCell<Vec<EvaluatorRequest>>,
}

impl ScriptedEvaluator {
    pub fn new(replies: Vec<Result<EvaluatorResponse, EvaluatorError>>) -> Self {
        ScriptedEvaluator {
            replies: RefCell::new(replies.into()),
            sent: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl Evaluator for ScriptedEvaluator {
    async fn send(&self, request: &EvaluatorRequest) -> Result<EvaluatorResponse, EvaluatorError> {
        self.sent.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(EvaluatorError::Network("no scripted reply".to_string())))
    }
}
