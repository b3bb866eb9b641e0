//! NATS transport: subject table, dispatcher and subscription loop
//!
//! The protocol itself lives in [`dispatcher`] and has no dependency on
//! a live bus connection; [`listener`] is the thin layer that feeds it
//! from NATS subscriptions and publishes replies.

pub mod dispatcher;
pub mod listener;

pub use dispatcher::{Dispatcher, Operation};
pub use listener::BusListener;
