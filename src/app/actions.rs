//! Side effects produced by the event handler.
//!
//! The handler never touches the network, the token file, or the route
//! history. It returns a `Vec<Action>` and the [`Store`](crate::app::Store)
//! executes them in order.

use crate::app::routes::Route;
use crate::worker::ApiRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Queues a request for the API worker.
    Request(ApiRequest),

    /// Moves to another page.
    Navigate(Route),

    /// Stores the bearer token durably and for outgoing requests.
    PersistToken(String),

    /// Removes the bearer token everywhere.
    ClearToken,
}
