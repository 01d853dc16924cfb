//! Stage configuration documents.
//!
//! A document maps stage names to entries, in execution order:
//!
//! ```yaml
//! load:
//!   attribute: model
//!   class: SampleClass
//!   arguments:
//!     param2: true
//! train:
//!   method: model.fit
//! ```
//!
//! Entry fields are `method`, `class`, `attribute` and `arguments`; at
//! least one of `method` or `class` is required. Class names are looked up
//! among the types of a [`Registry`](crate::registry::Registry).

mod loader;

pub use loader::{load_stages, parse_stages, ConfigFormat};
