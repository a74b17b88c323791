//! # Rendering Facade
//!
//! This module provides the host-facing rendering layer. It sequences frames,
//! owns scenes, and forwards material and texture requests to an injected
//! resource manager while the engine behind [`RenderEngine`] does the real
//! work.
//!
//! ## Architecture
//!
//! - **Renderer**: Frame lifecycle and scene ownership ([`Renderer`])
//! - **Scene**: Engine-side scene plus its views ([`Scene`])
//! - **API**: Engine and resource manager seams, handles ([`api`])
//! - **Resources**: Material instances, the modifier, texture sampling types
//! - **Backends**: Engine implementations (currently headless)

pub mod api;
pub mod backends;
pub mod resources;

mod renderer;
mod scene;

#[cfg(test)]
mod renderer_tests;

pub use api::{
    EngineError, EngineResult, EngineSceneId, FrameRenderer, MaterialHandle,
    MaterialInstanceHandle, RenderEngine, ResourceError, ResourceLoadRequest, ResourceManager,
    ResourceResult, SceneHandle, SharedEngine, SharedResources, SwapChainFlags, SwapChainId,
    TextureHandle, ViewHandle, ViewId, Viewport,
};
pub use renderer::{Renderer, RendererError, RendererResult};
pub use resources::materials::{
    MaterialDefinition, MaterialError, MaterialInstance, MaterialModifier, ParamValue,
    ParameterDecl, ParameterKind,
};
pub use resources::textures::{FilterMode, SamplerParams, Texture, WrapMode};
pub use scene::{Scene, View};
