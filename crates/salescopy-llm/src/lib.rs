//! Model-provider adapters.
//!
//! Every backend is reached through the single [`Provider`] capability:
//! send one prompt, get raw text back. [`ProviderRegistry`] maps the wire
//! identifier a caller asks for (`"openai"`, `"gemini"`, `"grok"`) to an
//! adapter and resolves the credential before any network call is made.

pub mod credentials;
pub mod error;
pub mod providers;
pub mod registry;
pub mod types;

pub use credentials::{resolve_credential, ApiKey};
pub use error::ProviderError;
pub use providers::{GeminiProvider, OpenAiCompatibleProvider, Provider};
pub use registry::{ProviderRegistry, SelectedProvider};
pub use types::{Prompt, ResponseFormat};
