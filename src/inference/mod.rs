pub mod provider;
pub mod simulator;

pub use provider::{ProviderError, ResponseProvider, ResponseRequest};
pub use simulator::{SimulatedProvider, canned_response};
