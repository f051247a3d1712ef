//! Registration wizard: state store, step gate and flow orchestration

pub mod gate;
mod flow;
mod store;

pub use flow::{FlowEvent, RegistrationFlow};
pub use store::RegistrationStore;
