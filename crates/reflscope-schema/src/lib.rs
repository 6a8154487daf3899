//! Schema-tolerant decoding of reflection snapshot payloads.
//!
//! Two layers, kept separate on purpose:
//!
//! - [`value`] — a recursive-descent parser over a generic value grammar
//!   (objects, arrays, strings, booleans, raw scalars). Structure is
//!   enforced; content is not.
//! - [`project`] — an allow-list projection from the generic tree into the
//!   typed reflection model. Recognized keys populate descriptor fields;
//!   everything else is discarded silently. Forward compatibility comes from
//!   omission, not versioning.
//!
//! A malformed root fails the whole decode. A malformed or missing field
//! inside a recognized object degrades to its default instead.

pub mod error;
pub mod model;
pub mod project;
pub mod value;

pub use error::{Result, SchemaError};
pub use model::{
    AssemblySnapshot, FieldDescriptor, MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
    TypeDescriptor, TypeKind,
};
pub use project::decode_snapshot;
pub use value::{parse_value, Value};
