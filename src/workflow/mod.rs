//! Per-view submission workflow
//!
//! A [`Workflow`] owns a form and the state of its latest submission. Edits
//! and resets bump a generation counter; a submission carries the
//! generation it started under as a [`Ticket`], and a result that comes back
//! under an older generation is dropped. In-flight requests are never
//! cancelled, only ignored.

mod state;

pub use state::WorkflowState;

use std::future::Future;

use serde::Serialize;
use tracing::debug;

use crate::client::ClientError;
use crate::forms::{Form, FormError, FormField};

/// Identifies the form generation a submission started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket(u64);

/// A validated query ready to send, plus its ticket.
#[derive(Debug)]
pub struct Submission<Q> {
    pub ticket: Ticket,
    pub query: Q,
}

/// Form + submission state for one recommendation view.
#[derive(Debug, Clone, Serialize)]
pub struct Workflow<F, R> {
    form: F,
    state: WorkflowState<R>,
    #[serde(skip)]
    generation: u64,
}

impl<F: Form, R> Default for Workflow<F, R> {
    fn default() -> Self {
        Self {
            form: F::default(),
            state: WorkflowState::Idle,
            generation: 0,
        }
    }
}

impl<F: Form, R> Workflow<F, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn state(&self) -> &WorkflowState<R> {
        &self.state
    }

    pub fn result(&self) -> Option<&R> {
        self.state.result()
    }

    /// Update one field. Any displayed result or error is discarded and an
    /// in-flight submission becomes stale.
    pub fn handle_input_change(&mut self, field: FormField, value: impl Into<String>) -> Result<(), FormError> {
        self.form.set_field(field, value.into())?;
        self.invalidate();
        Ok(())
    }

    /// Clear the form and return to `Idle`.
    pub fn reset(&mut self) {
        self.form.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if !matches!(self.state, WorkflowState::Idle) {
            debug!(form = F::NAME, from = %self.state, "Workflow back to idle");
        }
        self.state = WorkflowState::Idle;
    }

    /// Validate the form. On success the workflow enters `Submitting` and
    /// the caller gets the query to send; on failure it enters
    /// `ValidationFailed` and `None` is returned.
    pub fn begin_submit(&mut self) -> Option<Submission<F::Query>> {
        self.state = WorkflowState::Validating;
        match self.form.validate() {
            Ok(query) => {
                self.state = WorkflowState::Submitting;
                debug!(form = F::NAME, generation = self.generation, "Submitting");
                Some(Submission {
                    ticket: Ticket(self.generation),
                    query,
                })
            }
            Err(e) => {
                debug!(form = F::NAME, error = %e, "Validation failed");
                self.state = WorkflowState::ValidationFailed(e.to_string());
                None
            }
        }
    }

    /// Record the outcome of a submission.
    ///
    /// Returns `false` (and changes nothing) when the ticket is stale or
    /// no submission is pending.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<R, ClientError>) -> bool {
        if ticket.0 != self.generation || !self.state.is_submitting() {
            debug!(form = F::NAME, ticket = ticket.0, generation = self.generation, "Dropping stale result");
            return false;
        }

        self.state = match outcome {
            Ok(result) => WorkflowState::Succeeded(result),
            Err(e) => {
                debug!(form = F::NAME, error = %e, "Submission failed");
                WorkflowState::Failed(e.to_string())
            }
        };
        true
    }

    /// Validate, run `call` with the query, and record the outcome.
    pub async fn submit<C, Fut>(&mut self, call: C) -> &WorkflowState<R>
    where
        C: FnOnce(F::Query) -> Fut,
        Fut: Future<Output = Result<R, ClientError>>,
    {
        if let Some(Submission { ticket, query }) = self.begin_submit() {
            let outcome = call(query).await;
            self.complete(ticket, outcome);
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{CarbonForm, RegionalForm};
    use crate::types::RegionalQuery;

    type CarbonFlow = Workflow<CarbonForm, f64>;

    fn filled() -> CarbonFlow {
        let mut wf = CarbonFlow::new();
        wf.handle_input_change(FormField::Nitrogen, "1.2").unwrap();
        wf.handle_input_change(FormField::Phosphorus, "30").unwrap();
        wf.handle_input_change(FormField::SoilPh, "6.4").unwrap();
        wf.handle_input_change(FormField::Potassium, "0.6").unwrap();
        wf
    }

    #[test]
    fn test_validation_failure_never_submits() {
        let mut wf = CarbonFlow::new();
        assert!(wf.begin_submit().is_none());
        assert_eq!(
            wf.state(),
            &WorkflowState::ValidationFailed("Please fill in all fields".to_string())
        );
    }

    #[test]
    fn test_success_then_edit_clears_result() {
        let mut wf = filled();
        let sub = wf.begin_submit().unwrap();
        assert!(wf.state().is_submitting());
        assert!(wf.complete(sub.ticket, Ok(2.3)));
        assert_eq!(wf.result(), Some(&2.3));

        wf.handle_input_change(FormField::Nitrogen, "1.3").unwrap();
        assert_eq!(wf.state(), &WorkflowState::Idle);
        assert!(wf.result().is_none());
    }

    #[test]
    fn test_edit_after_failure_clears_error() {
        let mut wf = filled();
        let sub = wf.begin_submit().unwrap();
        wf.complete(sub.ticket, Err(ClientError::http(503)));
        assert_eq!(wf.state().error(), Some("HTTP error! status: 503"));

        wf.handle_input_change(FormField::SoilPh, "6.5").unwrap();
        assert_eq!(wf.state(), &WorkflowState::Idle);
    }

    #[test]
    fn test_result_after_reset_is_ignored() {
        let mut wf = filled();
        let sub = wf.begin_submit().unwrap();
        wf.reset();
        assert!(!wf.complete(sub.ticket, Ok(2.3)));
        assert_eq!(wf.state(), &WorkflowState::Idle);
        assert_eq!(wf.form(), &CarbonForm::default());
    }

    #[test]
    fn test_result_after_edit_is_ignored() {
        let mut wf = filled();
        let sub = wf.begin_submit().unwrap();
        wf.handle_input_change(FormField::Potassium, "0.7").unwrap();
        assert!(!wf.complete(sub.ticket, Ok(2.3)));
        assert!(wf.result().is_none());
    }

    #[test]
    fn test_double_completion_is_noop() {
        let mut wf = filled();
        let first = wf.begin_submit().unwrap();
        assert!(wf.complete(first.ticket, Ok(1.0)));
        // Completing twice is a no-op
        assert!(!wf.complete(first.ticket, Ok(9.0)));
        assert_eq!(wf.result(), Some(&1.0));
    }

    #[test]
    fn test_invalid_field_leaves_state_untouched() {
        let mut wf = filled();
        let sub = wf.begin_submit().unwrap();
        wf.complete(sub.ticket, Ok(2.0));
        assert!(wf.handle_input_change(FormField::County, "Meru").is_err());
        assert_eq!(wf.result(), Some(&2.0));
    }

    #[tokio::test]
    async fn test_submit_runs_call_with_normalized_query() {
        let mut wf: Workflow<RegionalForm, String> = Workflow::new();
        wf.handle_input_change(FormField::County, "kiambu").unwrap();
        wf.handle_input_change(FormField::Crop, "MAIZE").unwrap();

        let state = wf
            .submit(|q: RegionalQuery| async move { Ok(format!("{}/{}", q.county(), q.crop())) })
            .await;
        assert_eq!(state, &WorkflowState::Succeeded("Kiambu/maize".to_string()));
    }

    #[tokio::test]
    async fn test_submit_skips_call_on_validation_failure() {
        let mut wf: Workflow<RegionalForm, String> = Workflow::new();
        let mut called = false;
        wf.submit(|_q| {
            called = true;
            async { Ok(String::new()) }
        })
        .await;
        assert!(!called);
        assert!(matches!(wf.state(), WorkflowState::ValidationFailed(_)));
    }
}
