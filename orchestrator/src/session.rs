use comms::{
    Request, RequestKind, Response, Verdict,
    specs::{DatasetSelection, ModelKind},
};

use crate::{
    configs::Adapter,
    error::{DispatchError, ErrorTag, RequestError, TransportError},
    state::ConfigStore,
    transport::Transport,
};

/// Where the session stands with respect to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending(RequestKind),
    /// The last request of this kind failed.
    Error(RequestKind, ErrorTag),
}

/// A started request. Hand it back to [`Session::complete`] with the outcome.
#[derive(Debug)]
pub struct Ticket {
    id: u64,
    model: ModelKind,
    dataset: DatasetSelection,
    target: Option<String>,
    request: Request,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.request.req
    }

    /// Model family captured when the request was built.
    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn request(&self) -> &Request {
        &self.request
    }
}

/// Result of [`Session::dispatch`].
#[derive(Debug)]
pub enum Dispatch {
    /// Nothing was sent; the request waits for [`Session::confirm`].
    AwaitingConfirmation,
    Ready(Ticket),
}

/// Result of [`Session::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AwaitingConfirmation,
    Finished(Phase),
}

/// Tracks the single in-flight request and routes responses into the store.
pub struct Session {
    adapter: Adapter,
    phase: Phase,
    in_flight: Option<u64>,
    issued: u64,
    confirming: bool,
    last_error: Option<RequestError>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            adapter: Adapter::new(),
            phase: Phase::Idle,
            in_flight: None,
            issued: 0,
            confirming: false,
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    /// Whether an optimize request waits for confirmation.
    pub fn awaiting_confirmation(&self) -> bool {
        self.confirming
    }

    /// Details of the failure behind the current `Phase::Error`.
    pub fn last_error(&self) -> Option<&RequestError> {
        self.last_error.as_ref()
    }

    /// The error tag to show next to the action of the given kind, if it failed.
    pub fn error_for(&self, kind: RequestKind) -> Option<ErrorTag> {
        match self.phase {
            Phase::Error(failed, tag) if failed == kind => Some(tag),
            _ => None,
        }
    }

    /// Starts a request of the given kind from the current configuration.
    ///
    /// An optimize request only opens the confirmation prompt, any other kind
    /// closes it. Dispatching a training request clears the previous
    /// training result.
    ///
    /// # Errors
    /// Returns `DispatchError::Busy` while another request is pending, leaving
    /// every state untouched, or `DispatchError::MissingTarget` if the kind
    /// needs a target column.
    pub fn dispatch(
        &mut self,
        kind: RequestKind,
        store: &mut ConfigStore,
    ) -> Result<Dispatch, DispatchError> {
        self.ensure_idle(kind)?;

        if kind == RequestKind::Optimize {
            self.adapter.adapt_request(kind, store)?;
            if !self.confirming {
                log::info!("{kind} awaits confirmation");
                self.confirming = true;
            }
            return Ok(Dispatch::AwaitingConfirmation);
        }

        self.confirming = false;
        self.start(kind, store).map(Dispatch::Ready)
    }

    /// Sends the optimize request behind the open confirmation prompt.
    ///
    /// # Errors
    /// Returns `DispatchError::NothingToConfirm` if no prompt is open.
    pub fn confirm(&mut self, store: &mut ConfigStore) -> Result<Ticket, DispatchError> {
        if !self.confirming {
            return Err(DispatchError::NothingToConfirm);
        }
        self.ensure_idle(RequestKind::Optimize)?;

        self.confirming = false;
        self.start(RequestKind::Optimize, store)
    }

    pub fn cancel_confirmation(&mut self) {
        if self.confirming {
            log::info!("{} cancelled", RequestKind::Optimize);
            self.confirming = false;
        }
    }

    /// Settles the pending request with the outcome of its exchange.
    ///
    /// An accepted response is decoded into the store and the session goes
    /// back to idle. Anything else moves it to `Phase::Error` without
    /// touching the results, including a response whose dataset or target
    /// was replaced while it was pending.
    ///
    /// # Returns
    /// The phase the session settled in.
    ///
    /// # Errors
    /// Returns `DispatchError::StaleTicket` if the ticket is not the pending one.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Response, TransportError>,
        store: &mut ConfigStore,
    ) -> Result<Phase, DispatchError> {
        let kind = ticket.kind();
        if self.in_flight != Some(ticket.id) {
            return Err(DispatchError::StaleTicket(kind));
        }

        self.in_flight = None;
        match self.settle(&ticket, result, store) {
            Ok(()) => {
                log::info!("{kind} completed");
                self.phase = Phase::Idle;
            }
            Err(e) => {
                log::warn!("{kind} failed: {e}");
                self.phase = Phase::Error(kind, e.tag());
                self.last_error = Some(e);
            }
        }
        Ok(self.phase)
    }

    /// Sends a started request through the transport and completes it.
    pub fn run<T: Transport>(
        &mut self,
        ticket: Ticket,
        store: &mut ConfigStore,
        transport: &mut T,
    ) -> Result<Phase, DispatchError> {
        let result = transport.send(ticket.request());
        self.complete(ticket, result, store)
    }

    /// Dispatches and runs a request in one step.
    pub fn execute<T: Transport>(
        &mut self,
        kind: RequestKind,
        store: &mut ConfigStore,
        transport: &mut T,
    ) -> Result<Outcome, DispatchError> {
        match self.dispatch(kind, store)? {
            Dispatch::AwaitingConfirmation => Ok(Outcome::AwaitingConfirmation),
            Dispatch::Ready(ticket) => self.run(ticket, store, transport).map(Outcome::Finished),
        }
    }

    /// Confirms the open optimize prompt and runs the request.
    pub fn execute_confirmed<T: Transport>(
        &mut self,
        store: &mut ConfigStore,
        transport: &mut T,
    ) -> Result<Phase, DispatchError> {
        let ticket = self.confirm(store)?;
        self.run(ticket, store, transport)
    }

    fn ensure_idle(&self, kind: RequestKind) -> Result<(), DispatchError> {
        match self.phase {
            Phase::Pending(pending) => {
                log::warn!("{kind} rejected, {pending} is pending");
                Err(DispatchError::Busy { pending })
            }
            _ => Ok(()),
        }
    }

    fn start(
        &mut self,
        kind: RequestKind,
        store: &mut ConfigStore,
    ) -> Result<Ticket, DispatchError> {
        let request = self.adapter.adapt_request(kind, store)?;
        let model = store.model().kind;
        let common = store.common();
        let (dataset, target) = (common.dataset, common.target.clone());

        if kind == RequestKind::Train {
            store.clear_training_result();
        }

        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.phase = Phase::Pending(kind);
        self.last_error = None;

        log::info!(
            "dispatching {kind} for {} with {} arg(s)",
            request.select_data,
            request.arg.as_ref().map_or(0, Vec::len)
        );
        Ok(Ticket {
            id: self.issued,
            model,
            dataset,
            target,
            request,
        })
    }

    /// Whether the store still holds the upstream state the ticket was built on.
    /// Imports only depend on the dataset.
    fn is_current(ticket: &Ticket, store: &ConfigStore) -> bool {
        let common = store.common();
        common.dataset == ticket.dataset
            && (ticket.kind() == RequestKind::Import || common.target == ticket.target)
    }

    fn settle(
        &self,
        ticket: &Ticket,
        result: Result<Response, TransportError>,
        store: &mut ConfigStore,
    ) -> Result<(), RequestError> {
        let (kind, model) = (ticket.kind(), ticket.model);
        let response = result?;
        match response.verdict(kind) {
            Verdict::Accepted if !Self::is_current(ticket, store) => {
                Err(RequestError::Superseded { kind })
            }
            Verdict::Accepted => self
                .adapter
                .apply_response(kind, model, response.arg, store)
                .map_err(|source| RequestError::Payload { kind, source }),
            Verdict::ValueError => Err(RequestError::ValueError { model }),
            Verdict::Mismatch => Err(RequestError::KindMismatch {
                expected: kind,
                got: response.res,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store() -> ConfigStore {
        let mut store = ConfigStore::new();
        store.set_target("Survived").unwrap();
        store
    }

    fn ok(res: &str, arg: serde_json::Value) -> Result<Response, TransportError> {
        Ok(Response {
            res: res.into(),
            arg,
        })
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut store = store();
        let mut a = Session::new();
        let mut b = Session::new();

        let Dispatch::Ready(ticket) = a.dispatch(RequestKind::Import, &mut store).unwrap() else {
            panic!("import needs no confirmation");
        };
        assert_eq!(
            b.complete(ticket, ok("Import", json!([])), &mut store),
            Err(DispatchError::StaleTicket(RequestKind::Import))
        );
        assert_eq!(a.phase(), Phase::Pending(RequestKind::Import));
    }

    #[test]
    fn mismatched_kind_is_a_generic_error() {
        let mut store = store();
        let mut session = Session::new();

        let Dispatch::Ready(ticket) = session.dispatch(RequestKind::Preprocess, &mut store).unwrap()
        else {
            panic!("preprocess needs no confirmation");
        };
        let phase = session
            .complete(ticket, ok("Import", json!([])), &mut store)
            .unwrap();

        assert_eq!(phase, Phase::Error(RequestKind::Preprocess, ErrorTag::Generic));
        assert!(matches!(
            session.last_error(),
            Some(RequestError::KindMismatch { .. })
        ));
        assert_eq!(session.error_for(RequestKind::Preprocess), Some(ErrorTag::Generic));
        assert_eq!(session.error_for(RequestKind::Train), None);
    }

    #[test]
    fn malformed_payload_is_a_generic_error() {
        let mut store = store();
        store.set_model_kind(ModelKind::NeuralNetwork);
        let mut session = Session::new();

        let Dispatch::Ready(ticket) = session.dispatch(RequestKind::Train, &mut store).unwrap() else {
            panic!("train needs no confirmation");
        };
        let phase = session
            .complete(ticket, ok("Learning", json!([[1.0]])), &mut store)
            .unwrap();

        assert_eq!(phase, Phase::Error(RequestKind::Train, ErrorTag::Generic));
        assert!(store.results().training.is_none());
    }

    #[test]
    fn new_dispatch_clears_previous_error() {
        let mut store = store();
        let mut session = Session::new();

        let Dispatch::Ready(ticket) = session.dispatch(RequestKind::Import, &mut store).unwrap() else {
            panic!("import needs no confirmation");
        };
        session
            .complete(ticket, ok("nope", json!(null)), &mut store)
            .unwrap();
        assert!(session.last_error().is_some());

        session.dispatch(RequestKind::Import, &mut store).unwrap();
        assert!(session.last_error().is_none());
        assert_eq!(session.phase(), Phase::Pending(RequestKind::Import));
    }

    #[test]
    fn other_dispatch_closes_confirmation() {
        let mut store = store();
        let mut session = Session::new();

        assert!(matches!(
            session.dispatch(RequestKind::Optimize, &mut store).unwrap(),
            Dispatch::AwaitingConfirmation
        ));
        session.dispatch(RequestKind::Import, &mut store).unwrap();

        assert!(!session.awaiting_confirmation());
        assert!(matches!(
            session.confirm(&mut store),
            Err(DispatchError::NothingToConfirm)
        ));
    }

    #[test]
    fn response_for_replaced_target_is_dropped() {
        let mut store = store();
        let mut session = Session::new();

        let Dispatch::Ready(ticket) = session.dispatch(RequestKind::Preprocess, &mut store).unwrap()
        else {
            panic!("preprocess needs no confirmation");
        };
        store.set_target("Age").unwrap();
        let phase = session
            .complete(
                ticket,
                ok(
                    "Preproc",
                    json!([["Survived"], [[0], [1]], [], ["classification", 2]]),
                ),
                &mut store,
            )
            .unwrap();

        assert_eq!(phase, Phase::Error(RequestKind::Preprocess, ErrorTag::Generic));
        assert!(matches!(
            session.last_error(),
            Some(RequestError::Superseded { kind: RequestKind::Preprocess })
        ));
        assert!(store.results().preprocess.is_none());
        assert_eq!(store.common().target.as_deref(), Some("Age"));
    }

    #[test]
    fn optimize_without_target_opens_nothing() {
        let mut store = ConfigStore::new();
        let mut session = Session::new();

        assert!(matches!(
            session.dispatch(RequestKind::Optimize, &mut store),
            Err(DispatchError::MissingTarget(RequestKind::Optimize))
        ));
        assert!(!session.awaiting_confirmation());
        assert_eq!(session.phase(), Phase::Idle);
    }
}
