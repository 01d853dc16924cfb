//! Core domain model types for stageforge.
//!
//! This module contains the fundamental types used throughout the engine:
//! - Dynamic values and named arguments
//! - The object model hosts and constructed instances share
//! - Type references used to construct instances
//! - Pipeline state and stage status enums

mod arguments;
mod object;
mod status;
mod type_ref;
mod value;

pub use arguments::Arguments;
pub use object::{MethodSpec, Object, Param, SharedObject, Signature};
pub use status::{PipelineState, StageStatus};
pub use type_ref::{Factory, TypeBuilder, TypeDescriptor, TypeRef};
pub use value::Value;
