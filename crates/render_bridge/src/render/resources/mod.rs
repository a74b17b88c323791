//! Resource types shared between the renderer and resource managers

pub mod materials;
pub mod textures;

pub use materials::{MaterialDefinition, MaterialInstance, MaterialModifier, ParamValue};
pub use textures::{FilterMode, SamplerParams, Texture, WrapMode};
