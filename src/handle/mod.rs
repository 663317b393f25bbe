mod endpoint;
mod trigger;

pub use endpoint::Endpoint;
pub use trigger::{TriggerLine, TriggerOutcome};
