//! Material definitions and instances
//!
//! A [`MaterialDefinition`] declares the parameters a shading program
//! accepts. A [`MaterialInstance`] is one parameterization of it.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::api::{MaterialHandle, TextureHandle};
use crate::render::resources::textures::SamplerParams;

/// Material errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// Descriptor text could not be parsed
    #[error("Failed to parse material descriptor: {0}")]
    Parse(String),

    /// Descriptor has an empty name
    #[error("Material descriptor has no name")]
    MissingName,

    /// Two parameters share a name
    #[error("Material '{material}' declares parameter '{parameter}' twice")]
    DuplicateParameter {
        /// Material name
        material: String,
        /// Repeated parameter name
        parameter: String,
    },

    /// Parameter is not declared by the material
    #[error("Material '{material}' has no parameter '{parameter}'")]
    UnknownParameter {
        /// Material name
        material: String,
        /// Requested parameter name
        parameter: String,
    },

    /// Value does not match the declared parameter kind
    #[error("Parameter '{parameter}' expects {expected:?}, got {actual:?}")]
    KindMismatch {
        /// Parameter name
        parameter: String,
        /// Declared kind
        expected: ParameterKind,
        /// Kind of the supplied value
        actual: ParameterKind,
    },
}

/// Kinds of material parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Signed integer
    Int,
    /// Scalar float
    Float,
    /// Three-component float vector (also used for RGB colors)
    Float3,
    /// Four-component float vector (also used for RGBA colors)
    Float4,
    /// 2D texture with sampler
    Sampler2d,
}

/// A parameter declared by a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Parameter name as used by the shading program
    pub name: String,
    /// Value kind
    pub kind: ParameterKind,
}

/// Material descriptor
///
/// ```toml
/// name = "defaultLit"
/// double_sided = false
///
/// [[parameters]]
/// name = "baseColor"
/// kind = "float3"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDefinition {
    /// Material name
    pub name: String,
    /// Default face culling for new instances
    #[serde(default)]
    pub double_sided: bool,
    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
}

impl MaterialDefinition {
    /// Parse a TOML descriptor
    pub fn from_toml(text: &str) -> Result<Self, MaterialError> {
        let definition: Self = toml::from_str(text).map_err(|e| MaterialError::Parse(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Parse a RON descriptor
    pub fn from_ron(text: &str) -> Result<Self, MaterialError> {
        let definition: Self = ron::from_str(text).map_err(|e| MaterialError::Parse(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Look up a declared parameter
    pub fn parameter(&self, name: &str) -> Option<&ParameterDecl> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the material declares a parameter
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    fn validate(&self) -> Result<(), MaterialError> {
        if self.name.trim().is_empty() {
            return Err(MaterialError::MissingName);
        }

        let mut seen = HashSet::new();
        for decl in &self.parameters {
            if !seen.insert(decl.name.as_str()) {
                return Err(MaterialError::DuplicateParameter {
                    material: self.name.clone(),
                    parameter: decl.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A value assigned to a material parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Signed integer
    Int(i32),
    /// Scalar float
    Float(f32),
    /// Three-component vector
    Float3(Vector3<f32>),
    /// Four-component vector
    Float4(Vector4<f32>),
    /// Bound texture and how to sample it
    Texture {
        /// Texture to sample
        texture: TextureHandle,
        /// Sampling state
        sampler: SamplerParams,
    },
}

impl ParamValue {
    /// The parameter kind this value satisfies
    pub const fn kind(&self) -> ParameterKind {
        match self {
            Self::Int(_) => ParameterKind::Int,
            Self::Float(_) => ParameterKind::Float,
            Self::Float3(_) => ParameterKind::Float3,
            Self::Float4(_) => ParameterKind::Float4,
            Self::Texture { .. } => ParameterKind::Sampler2d,
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vector3<f32>> for ParamValue {
    fn from(value: Vector3<f32>) -> Self {
        Self::Float3(value)
    }
}

impl From<Vector4<f32>> for ParamValue {
    fn from(value: Vector4<f32>) -> Self {
        Self::Float4(value)
    }
}

/// One parameterization of a material
#[derive(Debug, Clone)]
pub struct MaterialInstance {
    material: MaterialHandle,
    definition: Rc<MaterialDefinition>,
    parameters: HashMap<String, ParamValue>,
    double_sided: bool,
}

impl MaterialInstance {
    /// Create an instance with the material's defaults
    pub fn new(material: MaterialHandle, definition: Rc<MaterialDefinition>) -> Self {
        let double_sided = definition.double_sided;
        Self {
            material,
            definition,
            parameters: HashMap::new(),
            double_sided,
        }
    }

    /// Material this instance was created from
    pub const fn material(&self) -> MaterialHandle {
        self.material
    }

    /// Declarations of the underlying material
    pub fn definition(&self) -> &MaterialDefinition {
        &self.definition
    }

    /// Assign a parameter, checking it against the material's declarations
    pub fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), MaterialError> {
        let decl = self.definition.parameter(name).ok_or_else(|| MaterialError::UnknownParameter {
            material: self.definition.name.clone(),
            parameter: name.to_string(),
        })?;

        if decl.kind != value.kind() {
            return Err(MaterialError::KindMismatch {
                parameter: name.to_string(),
                expected: decl.kind,
                actual: value.kind(),
            });
        }

        self.parameters.insert(name.to_string(), value);
        Ok(())
    }

    /// Current value of a parameter, if one was assigned
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    /// Number of assigned parameters
    pub fn assigned_count(&self) -> usize {
        self.parameters.len()
    }

    /// Toggle back-face culling
    pub fn set_double_sided(&mut self, double_sided: bool) {
        self.double_sided = double_sided;
    }

    /// Whether back faces are rendered
    pub const fn is_double_sided(&self) -> bool {
        self.double_sided
    }
}
