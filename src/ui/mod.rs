//! egui rendering. Every function here is a projection of [`AppState`];
//! mutations go through `AppState` methods.
//!
//! [`AppState`]: crate::state::AppState

pub mod panels;
pub mod plot;
