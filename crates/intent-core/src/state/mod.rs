//! Signing state of an intent session.
//!
//! A session moves `Idle -> AwaitingSignature -> {Signed | Failed}`. Every
//! signing request carries a monotonic attempt number so that responses to
//! superseded requests can be recognized and dropped.

pub mod signing;

pub use signing::{SigningState, SigningStateKind};
