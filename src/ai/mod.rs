//! AI integration layer: one completion contract, two adapters

pub mod direct;
pub mod profiles;
pub mod provider;
pub mod relay;

pub use direct::DirectProvider;
pub use profiles::{profile, ProviderProfile};
pub use provider::{AiError, CompletionProvider, GenerationParams};
pub use relay::RelayProvider;
