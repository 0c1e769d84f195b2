//! The three evaluator flows, run against a shared controller.
//!
//! Borrows of the controller are released before each `.await`, so flows can
//! overlap on a single thread. Nothing coalesces, retries, cancels or orders
//! them: outcomes are applied in whichever order the requests complete.

use std::cell::RefCell;

use crate::controller::{Controller, View};
use crate::error::ValidationError;
use crate::evaluator::Evaluator;

/// Validate and, if valid, send the point and merge the returned row.
pub async fn submit<V: View, E: Evaluator + ?Sized>(
    controller: &RefCell<Controller<V>>,
    evaluator: &E,
) -> Result<(), ValidationError> {
    let pending = controller.borrow_mut().begin_submit()?;
    let outcome = evaluator.send(&pending.request).await;
    controller.borrow_mut().finish_submit(pending.ticket, outcome);
    Ok(())
}

/// Replace the results with the evaluator's stored history.
pub async fn load_history<V: View, E: Evaluator + ?Sized>(controller: &RefCell<Controller<V>>, evaluator: &E) {
    let request = controller.borrow().history_request();
    let outcome = evaluator.send(&request).await;
    controller.borrow_mut().finish_history(outcome);
}

/// Ask the evaluator to forget this session's history, then empty the results.
pub async fn clear_history<V: View, E: Evaluator + ?Sized>(controller: &RefCell<Controller<V>>, evaluator: &E) {
    let request = controller.borrow().clear_request();
    let outcome = evaluator.send(&request).await;
    controller.borrow_mut().finish_clear(outcome);
}
