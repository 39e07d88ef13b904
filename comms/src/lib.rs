//! Wire contract between the playground client and the compute backend.
//!
//! Every exchange is a single JSON `POST`: the client sends a [`msg::Request`]
//! and the backend answers with a [`msg::Response`] whose `arg` is decoded by
//! the types in [`payload`].

#[macro_use]
mod wire;

pub mod msg;
pub mod payload;
pub mod specs;

pub use msg::{Arg, Request, RequestKind, Response, Verdict};
