// Composition root.
//
// Responsibilities
// - Read settings from the environment.
// - Instantiate the concrete clock and repository and wire them into the session.
// - Provide the logging hooks the binary registers.

pub mod config;
pub mod observers;
pub mod state;
