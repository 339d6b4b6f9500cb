//! Session lifecycle: token storage, route gating, OAuth callback handling.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route entry goes through `SessionProvider::guard`, which runs the
//! one `SessionGate`. Pages never re-implement the redirect tree; they only
//! receive a `GatedSession` once the gate has confirmed an onboarded user.

pub mod callback;
pub mod gate;
pub mod provider;
pub mod token;
