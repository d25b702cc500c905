//! Request worker between the store and the REST API.
//!
//! Event handling never awaits. It emits [`ApiRequest`] messages, which the
//! worker executes and answers with [`ApiResponse`] messages that are fed back
//! into the store as events.
//!
//! # Architecture
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: worker implementation and call dispatch

pub mod handler;
pub mod messages;

pub use handler::ApiWorker;
pub use messages::{
    ApiCall, ApiFailure, ApiReply, ApiRequest, ApiResponse, FailureKind, Feed, Generation,
    Outcome, RequestId,
};
