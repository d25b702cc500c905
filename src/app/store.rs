//! The store: state, session and worker behind one handle.
//!
//! [`Store::dispatch`] runs the event handler and executes the resulting
//! actions. Requests are queued; [`Store::settle`] sends everything queued,
//! feeds each response back through the handler as soon as it resolves, and
//! keeps going until no request is left in flight. Responses resolve in any
//! order; slices drop the stale ones.

use crate::api::BlogApi;
use crate::app::handler::{handle_event, Event};
use crate::app::routes::Route;
use crate::app::session::SessionContext;
use crate::app::{Action, AppState};
use crate::domain::error::{BloglineError, Result};
use crate::worker::{ApiFailure, ApiRequest, ApiWorker, RequestId};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashMap, VecDeque};

pub struct Store<A> {
    state: AppState,
    session: SessionContext,
    worker: ApiWorker<A>,
    pending: VecDeque<ApiRequest>,
    /// Failure (or `None` for success) of each answered request, until taken.
    outcomes: HashMap<RequestId, Option<ApiFailure>>,
    /// Routes left behind, oldest first.
    history: Vec<Route>,
}

impl<A: BlogApi> Store<A> {
    /// A store whose auth slice starts from the session's stored token.
    #[must_use]
    pub fn new(api: A, session: SessionContext) -> Self {
        Self {
            state: AppState::new(session.token()),
            session,
            worker: ApiWorker::new(api),
            pending: VecDeque::new(),
            outcomes: HashMap::new(),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Direct access for form drafts and other UI-only fields.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        self.worker.api()
    }

    /// Number of requests waiting for [`settle`](Self::settle).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Handles one event and executes its actions.
    ///
    /// Returns the ids of the requests it queued.
    ///
    /// # Errors
    ///
    /// Returns the handler's error; in that case no action was executed.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<RequestId>> {
        let actions = handle_event(&mut self.state, event)?;
        Ok(apply_actions(
            &mut self.state,
            &mut self.session,
            &mut self.history,
            &mut self.pending,
            actions,
        ))
    }

    /// Sends every queued request and applies the responses as they arrive,
    /// including those of requests queued by earlier responses.
    ///
    /// # Errors
    ///
    /// Returns an error if handling a response fails.
    pub async fn settle(&mut self) -> Result<()> {
        let Self {
            state,
            session,
            worker,
            pending,
            outcomes,
            history,
        } = self;
        let worker = &*worker;

        let mut in_flight = FuturesUnordered::new();
        in_flight.extend(pending.drain(..).map(|request| worker.execute(request)));
        tracing::debug!(in_flight = in_flight.len(), "settling requests");

        while let Some(response) = in_flight.next().await {
            outcomes.insert(response.id, response.reply.failure().cloned());
            let actions = handle_event(state, Event::Response(response))?;
            apply_actions(state, session, history, pending, actions);
            in_flight.extend(pending.drain(..).map(|request| worker.execute(request)));
        }
        Ok(())
    }

    /// [`dispatch`](Self::dispatch) followed by [`settle`](Self::settle).
    ///
    /// # Errors
    ///
    /// Returns the handler's error.
    pub async fn run(&mut self, event: Event) -> Result<Vec<RequestId>> {
        let ids = self.dispatch(event)?;
        self.settle().await?;
        Ok(ids)
    }

    /// Moves to `route`, or to the login page if it needs a session.
    ///
    /// # Errors
    ///
    /// Returns the handler's error.
    pub fn navigate(&mut self, route: Route) -> Result<()> {
        self.dispatch(Event::Navigate(route)).map(|_| ())
    }

    /// Drops the outcome records nobody asked for.
    pub fn forget_outcomes(&mut self) {
        self.outcomes.clear();
    }

    /// Reports how an answered request went, consuming the record.
    ///
    /// # Errors
    ///
    /// Returns the request's failure rebuilt as an error, or a transport error
    /// if the request was never answered.
    pub fn take_outcome(&mut self, id: RequestId) -> Result<()> {
        match self.outcomes.remove(&id) {
            Some(None) => Ok(()),
            Some(Some(failure)) => Err(failure.into_error()),
            None => Err(BloglineError::Transport(format!(
                "request {id} was not answered"
            ))),
        }
    }
}

impl<A> std::fmt::Debug for Store<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("route", &self.state.route)
            .field("session", &self.session)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

fn apply_actions(
    state: &mut AppState,
    session: &mut SessionContext,
    history: &mut Vec<Route>,
    pending: &mut VecDeque<ApiRequest>,
    actions: Vec<Action>,
) -> Vec<RequestId> {
    let mut queued = Vec::new();
    for action in actions {
        match action {
            Action::Request(request) => {
                tracing::debug!(request_id = request.id, call = request.call.name(), "queued request");
                queued.push(request.id);
                pending.push_back(request);
            }
            Action::Navigate(route) => {
                if route != state.route {
                    tracing::debug!(from = %state.route, to = %route, "navigate");
                    history.push(std::mem::replace(&mut state.route, route));
                }
            }
            Action::PersistToken(token) => {
                if let Err(e) = session.establish(&token) {
                    tracing::error!(error = %e, "failed to persist session token");
                }
            }
            Action::ClearToken => {
                if let Err(e) = session.teardown() {
                    tracing::error!(error = %e, "failed to clear session token");
                }
            }
        }
    }
    queued
}
