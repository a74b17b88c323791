//! Material system
//!
//! Material descriptors, instances, and the modifier used to edit them.

pub mod material;
pub mod modifier;

pub use material::{MaterialDefinition, MaterialError, MaterialInstance, ParamValue, ParameterDecl, ParameterKind};
pub use modifier::MaterialModifier;
