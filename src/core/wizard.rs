//! Call-order entry wizard.
//!
//! Four strictly linear steps, each a variant of [`WizardStep`] carrying only
//! the data that is valid at that point. A customer cannot be confirmed
//! before one was picked from a settled lookup, and order details cannot be
//! reviewed before they validate. Events that do not apply to the current
//! step are rejected with [`AdminError::InvalidTransition`] and leave the
//! session untouched.

use crate::core::order_form::{OrderDetails, OrderDraft};
use crate::core::CallOrderBackend;
use crate::domain::model::{Buyer, CallOrder, NewCallOrder};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{validate_non_empty_string, FieldErrors};

/// Identifies one buyer lookup; only the latest ticket may apply results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Idle,
    Pending(LookupTicket),
    /// At least one candidate came back.
    Settled,
    /// The lookup finished with no match.
    Empty,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Ready,
    Submitting,
    Failed { message: String },
}

/// Step-one data kept for the whole session so going back never re-fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchContext {
    pub query: String,
    pub results: Vec<Buyer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    SearchCustomer {
        search: SearchContext,
        lookup: LookupState,
    },
    ConfirmCustomer {
        search: SearchContext,
        customer: Buyer,
        /// Details entered before stepping back from step three.
        draft: Option<OrderDraft>,
    },
    EnterOrderDetails {
        search: SearchContext,
        customer: Buyer,
        draft: OrderDraft,
        errors: FieldErrors,
    },
    ReviewAndSubmit {
        search: SearchContext,
        customer: Buyer,
        draft: OrderDraft,
        order: OrderDetails,
        submission: SubmissionState,
    },
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::SearchCustomer {
            search: SearchContext::default(),
            lookup: LookupState::Idle,
        }
    }
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SearchCustomer { .. } => 1,
            WizardStep::ConfirmCustomer { .. } => 2,
            WizardStep::EnterOrderDetails { .. } => 3,
            WizardStep::ReviewAndSubmit { .. } => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::SearchCustomer { .. } => "search-customer",
            WizardStep::ConfirmCustomer { .. } => "confirm-customer",
            WizardStep::EnterOrderDetails { .. } => "enter-order-details",
            WizardStep::ReviewAndSubmit { .. } => "review-and-submit",
        }
    }

    pub fn search(&self) -> &SearchContext {
        match self {
            WizardStep::SearchCustomer { search, .. }
            | WizardStep::ConfirmCustomer { search, .. }
            | WizardStep::EnterOrderDetails { search, .. }
            | WizardStep::ReviewAndSubmit { search, .. } => search,
        }
    }

    pub fn customer(&self) -> Option<&Buyer> {
        match self {
            WizardStep::SearchCustomer { .. } => None,
            WizardStep::ConfirmCustomer { customer, .. }
            | WizardStep::EnterOrderDetails { customer, .. }
            | WizardStep::ReviewAndSubmit { customer, .. } => Some(customer),
        }
    }
}

/// Pure state machine; no I/O.
#[derive(Debug, Default)]
pub struct WizardSession {
    step: WizardStep,
    last_ticket: u64,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn step_number(&self) -> u8 {
        self.step.number()
    }

    fn reject(&self, event: &'static str) -> AdminError {
        tracing::warn!("Rejected '{}' at step {}", event, self.step.name());
        AdminError::InvalidTransition {
            from: self.step.name(),
            event,
        }
    }

    fn enter(&mut self, next: WizardStep) {
        tracing::debug!("Wizard {} -> {}", self.step.name(), next.name());
        self.step = next;
    }

    /// Edits the search box. Changed text invalidates the current lookup, so
    /// results listed for the old query can no longer be picked and an
    /// in-flight response for it becomes stale.
    pub fn set_query(&mut self, query: &str) -> Result<()> {
        match &mut self.step {
            WizardStep::SearchCustomer { search, lookup } => {
                if search.query != query {
                    search.query = query.to_string();
                    *lookup = LookupState::Idle;
                }
                Ok(())
            }
            _ => Err(self.reject("set-query")),
        }
    }

    pub fn begin_search(&mut self) -> Result<LookupTicket> {
        let WizardStep::SearchCustomer { search, lookup } = &mut self.step else {
            return Err(self.reject("search"));
        };

        let mut errors = FieldErrors::new();
        errors.check("query", validate_non_empty_string("query", &search.query));
        if !errors.is_empty() {
            return Err(errors.into_error());
        }

        self.last_ticket += 1;
        let ticket = LookupTicket(self.last_ticket);
        *lookup = LookupState::Pending(ticket);
        Ok(ticket)
    }

    /// Applies lookup results. Returns false when the response is stale: a
    /// newer lookup was started or the wizard has moved past step one.
    pub fn apply_search_results(&mut self, ticket: LookupTicket, results: Vec<Buyer>) -> bool {
        let WizardStep::SearchCustomer { search, lookup } = &mut self.step else {
            tracing::debug!("Discarding lookup results outside step one");
            return false;
        };
        if *lookup != LookupState::Pending(ticket) {
            tracing::debug!("Discarding stale lookup results {:?}", ticket);
            return false;
        }

        *lookup = if results.is_empty() {
            LookupState::Empty
        } else {
            LookupState::Settled
        };
        tracing::info!("Lookup '{}' returned {} buyer(s)", search.query, results.len());
        search.results = results;
        true
    }

    pub fn apply_search_failure(&mut self, ticket: LookupTicket, message: String) -> bool {
        let WizardStep::SearchCustomer { search, lookup } = &mut self.step else {
            return false;
        };
        if *lookup != LookupState::Pending(ticket) {
            return false;
        }
        search.results.clear();
        *lookup = LookupState::Failed { message };
        true
    }

    /// 1 -> 2: the agent picks exactly one candidate from a settled lookup.
    pub fn select_customer(&mut self, index: usize) -> Result<()> {
        let customer = match &self.step {
            WizardStep::SearchCustomer {
                search,
                lookup: LookupState::Settled,
            } => search.results.get(index).cloned(),
            _ => return Err(self.reject("select-customer")),
        };
        let Some(customer) = customer else {
            return Err(self.reject("select-customer"));
        };

        let search = self.step.search().clone();
        self.enter(WizardStep::ConfirmCustomer {
            search,
            customer,
            draft: None,
        });
        Ok(())
    }

    /// 2 -> 3, restoring any details entered earlier.
    pub fn confirm_customer(&mut self) -> Result<()> {
        let WizardStep::ConfirmCustomer {
            search,
            customer,
            draft,
        } = &mut self.step
        else {
            return Err(self.reject("confirm-customer"));
        };

        let next = WizardStep::EnterOrderDetails {
            search: std::mem::take(search),
            customer: customer.clone(),
            draft: draft.take().unwrap_or_default(),
            errors: FieldErrors::new(),
        };
        self.enter(next);
        Ok(())
    }

    pub fn update_draft<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut OrderDraft),
    {
        match &mut self.step {
            WizardStep::EnterOrderDetails { draft, .. } => {
                edit(draft);
                Ok(())
            }
            _ => Err(self.reject("update-draft")),
        }
    }

    /// 3 -> 4 when `draft` validates; otherwise stays on step three with
    /// per-field errors and the draft kept as typed.
    pub fn submit_details(&mut self, draft: OrderDraft) -> Result<()> {
        let WizardStep::EnterOrderDetails {
            search,
            customer,
            draft: current,
            errors,
        } = &mut self.step
        else {
            return Err(self.reject("submit-details"));
        };

        *current = draft;
        match current.validate() {
            Ok(order) => {
                let next = WizardStep::ReviewAndSubmit {
                    search: std::mem::take(search),
                    customer: customer.clone(),
                    draft: std::mem::take(current),
                    order,
                    submission: SubmissionState::Ready,
                };
                self.enter(next);
                Ok(())
            }
            Err(field_errors) => {
                *errors = field_errors.clone();
                Err(field_errors.into_error())
            }
        }
    }

    /// Marks the order as in flight and returns the payload to send.
    pub fn begin_submit(&mut self) -> Result<NewCallOrder> {
        match &mut self.step {
            WizardStep::ReviewAndSubmit {
                customer,
                order,
                submission,
                ..
            } if *submission != SubmissionState::Submitting => {
                *submission = SubmissionState::Submitting;
                Ok(order.to_new_order(&customer.id))
            }
            _ => Err(self.reject("submit")),
        }
    }

    /// 4 -> 1: the backend acknowledged the order; everything is cleared.
    pub fn complete_submit(&mut self) -> bool {
        match &self.step {
            WizardStep::ReviewAndSubmit {
                submission: SubmissionState::Submitting,
                ..
            } => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Keeps the session on step four so the agent can retry.
    pub fn fail_submit(&mut self, message: String) -> bool {
        match &mut self.step {
            WizardStep::ReviewAndSubmit { submission, .. }
                if *submission == SubmissionState::Submitting =>
            {
                *submission = SubmissionState::Failed { message };
                true
            }
            _ => false,
        }
    }

    /// Returns an in-flight submission to `Ready` when its request was
    /// dropped before the backend answered. The reviewed order is kept.
    pub fn abandon_submit(&mut self) -> bool {
        match &mut self.step {
            WizardStep::ReviewAndSubmit { submission, .. }
                if *submission == SubmissionState::Submitting =>
            {
                tracing::warn!("Call order submission abandoned before completion");
                *submission = SubmissionState::Ready;
                true
            }
            _ => false,
        }
    }

    pub fn back(&mut self) -> Result<()> {
        let previous = match &mut self.step {
            WizardStep::SearchCustomer { .. } => return Err(self.reject("back")),
            WizardStep::ConfirmCustomer { search, .. } => WizardStep::SearchCustomer {
                lookup: if search.results.is_empty() {
                    LookupState::Idle
                } else {
                    LookupState::Settled
                },
                search: std::mem::take(search),
            },
            WizardStep::EnterOrderDetails {
                search,
                customer,
                draft,
                ..
            } => WizardStep::ConfirmCustomer {
                search: std::mem::take(search),
                customer: customer.clone(),
                draft: Some(std::mem::take(draft)),
            },
            WizardStep::ReviewAndSubmit {
                submission: SubmissionState::Submitting,
                ..
            } => return Err(self.reject("back")),
            WizardStep::ReviewAndSubmit {
                search,
                customer,
                draft,
                ..
            } => WizardStep::EnterOrderDetails {
                search: std::mem::take(search),
                customer: customer.clone(),
                draft: std::mem::take(draft),
                errors: FieldErrors::new(),
            },
        };
        self.enter(previous);
        Ok(())
    }

    /// Abandons the session. Pending lookups become stale.
    pub fn reset(&mut self) {
        self.enter(WizardStep::default());
    }
}

/// Releases the `Submitting` state if the submit future is dropped mid-request.
struct InFlightSubmit<'a> {
    session: &'a mut WizardSession,
    settled: bool,
}

impl Drop for InFlightSubmit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.abandon_submit();
        }
    }
}

/// Drives a [`WizardSession`] against a backend.
pub struct CallOrderWizard<B: CallOrderBackend> {
    backend: B,
    session: WizardSession,
}

impl<B: CallOrderBackend> CallOrderWizard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: WizardSession::new(),
        }
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn step(&self) -> &WizardStep {
        self.session.step()
    }

    /// Runs a buyer lookup and returns how many candidates were found.
    pub async fn search(&mut self, query: &str) -> Result<usize> {
        self.session.set_query(query)?;
        let ticket = self.session.begin_search()?;

        match self.backend.search_buyers(query.trim()).await {
            Ok(results) => {
                let found = results.len();
                self.session.apply_search_results(ticket, results);
                Ok(found)
            }
            Err(e) => {
                self.session
                    .apply_search_failure(ticket, e.user_friendly_message());
                Err(e)
            }
        }
    }

    pub fn select_customer(&mut self, index: usize) -> Result<()> {
        self.session.select_customer(index)
    }

    pub fn confirm_customer(&mut self) -> Result<()> {
        self.session.confirm_customer()
    }

    pub fn submit_details(&mut self, draft: OrderDraft) -> Result<()> {
        self.session.submit_details(draft)
    }

    pub fn back(&mut self) -> Result<()> {
        self.session.back()
    }

    /// Sends the reviewed order. On success the wizard is back at step one.
    /// Dropping the future before it resolves leaves step four ready to retry.
    pub async fn submit(&mut self) -> Result<CallOrder> {
        let order = self.session.begin_submit()?;
        let mut in_flight = InFlightSubmit {
            session: &mut self.session,
            settled: false,
        };

        let outcome = self.backend.submit_call_order(&order).await;
        in_flight.settled = true;
        match outcome {
            Ok(created) => {
                in_flight.session.complete_submit();
                Ok(created)
            }
            Err(e) => {
                in_flight.session.fail_submit(e.user_friendly_message());
                Err(e)
            }
        }
    }
}
