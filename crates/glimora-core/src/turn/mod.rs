//! Turn lifecycle: context, mode strategies, and the controller.

mod context;
mod controller;
mod strategy;

pub use context::{PreparedTurn, TurnContext, TurnHandle};
pub use controller::TurnController;
pub use strategy::{EXTRACTION_FAILURE_MESSAGE, MODEL_FAILURE_MESSAGE, NO_RESULTS_MESSAGE};
