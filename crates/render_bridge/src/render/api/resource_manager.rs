//! Resource manager seam
//!
//! Materials, material instances and textures are created and owned by a
//! [`ResourceManager`]. The renderer only forwards requests and hands out the
//! resulting handles.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use super::handles::{MaterialHandle, MaterialInstanceHandle, TextureHandle};
use crate::render::resources::materials::{MaterialDefinition, MaterialInstance};
use crate::render::resources::textures::Texture;

/// Resource manager shared between the renderer and every scene it creates
pub type SharedResources = Rc<RefCell<dyn ResourceManager>>;

/// Result type for resource operations
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Callback invoked with `(request, code, message)` when a load fails
pub type ErrorCallback = Box<dyn Fn(&ResourceLoadRequest, i32, &str)>;

/// Resource manager errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Request carried neither a path nor in-memory data
    #[error("Resource request has neither a path nor data")]
    MissingSource,

    /// Reading the resource from disk failed
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Material descriptor could not be parsed
    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    /// Image decoding failed
    #[error("Failed to decode image {path}: {source}")]
    Image {
        /// File that could not be decoded
        path: PathBuf,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// Material handle does not name a live material
    #[error("Unknown material handle {0:?}")]
    UnknownMaterial(MaterialHandle),

    /// Material instance handle does not name a live instance
    #[error("Unknown material instance handle {0:?}")]
    UnknownMaterialInstance(MaterialInstanceHandle),

    /// Texture handle does not name a live texture
    #[error("Unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),

    /// Configured capacity reached
    #[error("Maximum number of {kind} reached: {max}")]
    CapacityExceeded {
        /// Resource kind that ran out
        kind: &'static str,
        /// Configured limit
        max: usize,
    },
}

impl ResourceError {
    /// Numeric code reported through [`ResourceLoadRequest`] error callbacks
    pub const fn code(&self) -> i32 {
        match self {
            Self::MissingSource => -1,
            Self::Io { .. } => -2,
            Self::InvalidMaterial(_) => -3,
            Self::Image { .. } => -4,
            Self::UnknownMaterial(_) => -5,
            Self::UnknownMaterialInstance(_) => -6,
            Self::UnknownTexture(_) => -7,
            Self::CapacityExceeded { .. } => -8,
        }
    }
}

/// Request to load a resource from a file or from memory
pub struct ResourceLoadRequest {
    /// Source file; empty when loading from `data`
    pub path: PathBuf,
    /// In-memory resource contents
    pub data: Option<Vec<u8>>,
    error_callback: ErrorCallback,
}

impl ResourceLoadRequest {
    /// Request loading from a file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
            error_callback: Box::new(log_load_error),
        }
    }

    /// Request loading from memory
    pub fn from_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: PathBuf::new(),
            data: Some(data.into()),
            error_callback: Box::new(log_load_error),
        }
    }

    /// Replace the error callback
    pub fn with_error_callback(mut self, callback: impl Fn(&Self, i32, &str) + 'static) -> Self {
        self.error_callback = Box::new(callback);
        self
    }

    /// Whether a file path was supplied
    pub fn has_path(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    /// Source file of this request
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Invoke the error callback
    pub fn report_error(&self, code: i32, message: &str) {
        (self.error_callback)(self, code, message);
    }
}

impl fmt::Debug for ResourceLoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoadRequest")
            .field("path", &self.path)
            .field("data_len", &self.data.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

fn log_load_error(request: &ResourceLoadRequest, code: i32, message: &str) {
    log::error!("Resource load failed ({}) for {:?}: {}", code, request.path, message);
}

/// Resource manager trait
///
/// Implementations own every material, instance and texture and keep them
/// alive until explicitly destroyed.
pub trait ResourceManager {
    /// Load a material from the request's file or data
    fn create_material(&mut self, request: &ResourceLoadRequest) -> ResourceResult<MaterialHandle>;

    /// Look up a loaded material
    fn material(&self, id: MaterialHandle) -> Option<Rc<MaterialDefinition>>;

    /// Create a new instance of a material with its default parameters
    fn create_material_instance(&mut self, material: MaterialHandle) -> ResourceResult<MaterialInstanceHandle>;

    /// Look up a material instance
    fn material_instance(&self, id: MaterialInstanceHandle) -> Option<Rc<RefCell<MaterialInstance>>>;

    /// Release a material instance
    fn destroy_material_instance(&mut self, id: MaterialInstanceHandle) -> ResourceResult<()>;

    /// Load a texture from a file
    fn create_texture(&mut self, path: &Path) -> ResourceResult<TextureHandle>;

    /// Look up a texture
    fn texture(&self, id: TextureHandle) -> Option<&Texture>;

    /// Release a texture immediately
    fn destroy_texture(&mut self, id: TextureHandle) -> ResourceResult<()>;
}
