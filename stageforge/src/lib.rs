//! # Stageforge
//!
//! Declarative stage pipelines with explicit name-to-callable resolution.
//!
//! A pipeline is an ordered list of stages. Each stage names a method,
//! optionally a type to construct or call the method on, keyword arguments,
//! and optionally an attribute to store the result under. Stages can be
//! declared loosely and are normalized into a canonical form:
//!
//! - **Stage normalization**: bare names and short tuples of names, type
//!   references and argument mappings, classified by element kind
//! - **Target resolution**: host methods, registered functions, type
//!   constructors, type methods and methods of stored objects
//! - **Argument binding**: declared signatures filled from the supplied
//!   arguments, host attributes, stored results and defaults
//! - **Execution**: strictly sequential, stopping at the first failure, with
//!   per-stage records and events
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stageforge::prelude::*;
//!
//! let registry = Registry::new()
//!     .with_function("add", Signature::empty().param("a").param("b"), |args| {
//!         Ok(Value::from(args.i64("a")? + args.i64("b")?))
//!     });
//!
//! let mut pipeline = Pipeline::new().with_registry(registry);
//! pipeline.add_stages([("total", "add", Arguments::new().with("a", 2).with("b", 3))])?;
//! pipeline.run()?;
//!
//! assert_eq!(pipeline.get_attribute("total")?, Value::from(5));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Arguments, MethodSpec, Object, PipelineState, SharedObject, Signature, StageStatus, TypeRef,
        Value,
    };
    pub use crate::errors::{
        AttributeNotFoundError, ConfigError, ForgeError, InvalidStateError, InvocationError,
        MalformedStageError, UnresolvedTargetError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{AttributeStore, Pipeline, PipelineOptions, StageRecord};
    pub use crate::registry::{Registry, RegistryEntry};
    pub use crate::resolve::ArgumentMode;
    pub use crate::stages::{normalize, RawStage, Stage, StageElement};
}
