//! Language model backends
//!
//! The orchestrator talks to models through the `ModelBackend` trait.
//! `GenaiBackend` covers real services via the `genai` crate, which handles
//! streaming, provider-specific protocols and tool calling. `MockBackend`
//! is a scripted stand-in for tests.

mod error;
mod genai_adapter;
mod genai_backend;
mod mock;
mod traits;

pub use error::{BackendError, BackendResult};
pub use genai_backend::GenaiBackend;
pub use mock::{MockBackend, MockReply, RecordedRequest};
pub use traits::{ChatOptions, ModelBackend, ModelConfig, ModelReply, StreamResponse};
