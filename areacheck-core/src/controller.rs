//! The interaction controller: form state, the submission state machine, and
//! how evaluator responses land in the results table.
//!
//! The controller never awaits. Each network operation is split into a
//! synchronous start (build the request) and finish (apply the outcome), so a
//! front end can keep the controller in a `RefCell` without holding a borrow
//! while a request is in flight (see [`crate::network`]).

use log::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{EvaluatorError, ValidationError};
use crate::evaluator::{format_number, Endpoint, EvaluatorRequest, EvaluatorResponse};
use crate::form::{Field, Form};
use crate::input::EditOutcome;
use crate::region::RegionParameter;
use crate::results::{first_row, ResultsTable};

pub const CLEARED_MESSAGE: &str = "Results cleared.";

/// Handles to whatever displays the form, the status line, the results and the canvas.
pub trait View {
    /// Show a status message; the empty string clears it.
    fn set_message(&mut self, message: &str);
    fn set_invalid(&mut self, field: Field, invalid: bool);
    /// Write normalized field text back to its control.
    fn set_text(&mut self, field: Field, text: &str);
    fn set_x_checked(&mut self, index: usize, checked: bool);
    fn show_results(&mut self, html: &str);
    fn redraw(&mut self, r: RegionParameter);
}

/// Identifies one submission in logs. Outcomes are applied in completion order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Failed validation; nothing was sent.
    Invalid(ValidationError),
    /// The request failed or came back with a non-success status.
    Transport(Ticket, EvaluatorError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Clean,
    Submitting(Ticket),
    Accepted(Ticket),
    Rejected(Rejection),
}

/// A validated submission waiting to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    pub ticket: Ticket,
    pub request: EvaluatorRequest,
}

pub struct Controller<V> {
    form: Form,
    results: ResultsTable,
    message: String,
    phase: Phase,
    next_ticket: u64,
    endpoint: Endpoint,
    view: V,
}

impl<V: View> Controller<V> {
    pub fn new(config: &ClientConfig, view: V) -> Self {
        let mut form = Form::new(&config.x_values);
        form.edit(Field::R, &format_number(config.default_r));
        Controller {
            form,
            results: ResultsTable::new(),
            message: String::new(),
            phase: Phase::Clean,
            next_ticket: 0,
            endpoint: Endpoint::new(config.endpoint.clone()),
            view,
        }
    }

    /// Push the whole state to the view and draw the region.
    pub fn mount(&mut self) {
        for (i, option) in self.form.x.options().iter().enumerate() {
            self.view.set_x_checked(i, option.checked);
        }
        for field in [Field::Y, Field::R] {
            let input = self.form.input(field);
            self.view.set_text(field, input.text());
            self.view.set_invalid(field, input.is_invalid());
        }
        self.view.set_message(&self.message);
        self.view.show_results(&self.results.to_html());
        self.redraw();
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn results(&self) -> &ResultsTable {
        &self.results
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.view.set_message(&self.message);
    }

    fn show_results(&mut self) {
        self.view.show_results(&self.results.to_html());
    }

    /// An X option was toggled; checking one unchecks its siblings.
    pub fn select_x(&mut self, index: usize, checked: bool) {
        self.form.x.select(index, checked);
        for (i, option) in self.form.x.options().iter().enumerate() {
            self.view.set_x_checked(i, option.checked);
        }
    }

    /// A keystroke in a numeric field.
    pub fn edit(&mut self, field: Field, raw: &str) -> EditOutcome {
        let outcome = self.form.edit(field, raw);
        self.view.set_text(field, self.form.input(field).text());
        self.view.set_invalid(field, false);
        if field == Field::R {
            self.redraw();
        }
        outcome
    }

    pub fn redraw(&mut self) {
        self.view.redraw(self.form.region_parameter());
    }

    fn mark_invalid(&mut self, field: Field, invalid: bool) {
        self.form.input_mut(field).set_invalid(invalid);
        self.view.set_invalid(field, invalid);
    }

    /// Validate the form. On success the controller is `Submitting` and the
    /// returned request should be sent; on failure the message and field
    /// marker are already showing.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, ValidationError> {
        self.set_message("");
        self.mark_invalid(Field::Y, false);
        self.mark_invalid(Field::R, false);

        match self.form.validate() {
            Err(err) => {
                if let Some(field) = err.field() {
                    self.mark_invalid(field, true);
                }
                debug!("submit rejected: {}", err);
                self.set_message(err.to_string());
                self.phase = Phase::Rejected(Rejection::Invalid(err.clone()));
                Err(err)
            }
            Ok(point) => {
                let ticket = Ticket(self.next_ticket);
                self.next_ticket += 1;
                let request = self.endpoint.submit(&point);
                debug!("submit #{}: {:?}", ticket.0, request.body);
                self.phase = Phase::Submitting(ticket);
                Ok(PendingSubmit { ticket, request })
            }
        }
    }

    /// Apply the evaluator's answer to submission `ticket`.
    pub fn finish_submit(&mut self, ticket: Ticket, outcome: Result<EvaluatorResponse, EvaluatorError>) {
        let body = outcome.and_then(|response| {
            if response.ok() {
                Ok(response.body)
            } else {
                Err(EvaluatorError::Status(response.status))
            }
        });
        match body {
            Ok(body) => {
                match first_row(&body) {
                    Some(row) => {
                        self.results.prepend(row);
                        self.show_results();
                    }
                    None => debug!("submit #{}: response had no row", ticket.0),
                }
                self.phase = Phase::Accepted(ticket);
            }
            Err(err) => {
                warn!("submit #{} failed: {}", ticket.0, err);
                self.set_message(format!("Error: {}", err));
                self.phase = Phase::Rejected(Rejection::Transport(ticket, err));
            }
        }
    }

    pub fn history_request(&self) -> EvaluatorRequest {
        self.endpoint.history()
    }

    /// Replace the results with whatever body the evaluator answered; a request
    /// that got no answer leaves them alone.
    pub fn finish_history(&mut self, outcome: Result<EvaluatorResponse, EvaluatorError>) {
        match outcome {
            Ok(response) => {
                if !response.ok() {
                    debug!("history: status {}, showing body anyway", response.status);
                }
                self.results.replace(&response.body);
                self.show_results();
            }
            Err(err) => debug!("history: {}, keeping current results", err),
        }
    }

    pub fn clear_request(&self) -> EvaluatorRequest {
        self.endpoint.clear()
    }

    /// Empty the results whatever happened; confirm only if the server answered.
    pub fn finish_clear(&mut self, outcome: Result<EvaluatorResponse, EvaluatorError>) {
        self.results.clear();
        self.show_results();
        match outcome {
            Ok(_) => self.set_message(CLEARED_MESSAGE),
            Err(err) => debug!("clear: {}", err),
        }
    }
}
