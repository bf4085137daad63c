//! Liaoyu is a small wellness companion: an HTTP relay in front of a hosted
//! chat-completion endpoint, plus a conversation pipeline that answers from a
//! canned table when it can and asks the model when it cannot.
//!
//! - [`relay`] forwards `POST /api/chat` bodies upstream with the headers the
//!   upstream expects and passes the answer back untouched.
//! - [`core`] owns the conversation: message identity, the append-only
//!   timeline, canned replies, the completion transport and the pipeline that
//!   ties them together.
//! - [`api`] defines the completion payloads exchanged with either endpoint.
//!
//! The binary routes through [`cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod relay;
pub mod utils;
