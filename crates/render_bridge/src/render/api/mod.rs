//! Public rendering API
//!
//! This module contains the seams the renderer delegates through: the engine
//! traits, the resource manager trait and the opaque handle types.

pub mod engine;
pub mod handles;
pub mod resource_manager;

// Re-export commonly used types
pub use engine::{
    ClearOptions, EngineError, EngineResult, EngineSceneId, FrameRenderer, RenderEngine,
    SharedEngine, SwapChainFlags, SwapChainId, ViewId, Viewport,
};
pub use handles::{HandleExt, MaterialHandle, MaterialInstanceHandle, SceneHandle, TextureHandle, ViewHandle};
pub use resource_manager::{
    ErrorCallback, ResourceError, ResourceLoadRequest, ResourceManager, ResourceResult,
    SharedResources,
};
