//! Tool catalog and dispatch
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ToolCatalog                                 │
//! │    tool name → (descriptor, owning session)  │
//! │    built once by SessionManager::connect     │
//! └──────────────────────────────────────────────┘
//!           │ route(name)
//!           ▼
//! ┌──────────────────────────────────────────────┐
//! │  Dispatcher                                  │
//! │    one outcome per requested call            │
//! │    errors stay with their call               │
//! │    result text capped before use             │
//! └──────────────────────────────────────────────┘
//!           │ tools/call
//!           ▼
//!     ProviderSession (pdb, chembl, ...)
//! ```

mod catalog;
mod dispatcher;

pub use catalog::{CatalogEntry, ToolCatalog};
pub use dispatcher::{DispatchError, DispatchOutcome, Dispatcher, DEFAULT_RESULT_CHAR_LIMIT};
