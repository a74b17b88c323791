//! # Render Bridge
//!
//! A thin rendering facade that exposes scene, material and texture creation
//! to a host application while the actual rendering, shading and GPU resource
//! lifetime stay with an underlying 3D engine.
//!
//! ## Features
//!
//! - **Renderer Facade**: Frame lifecycle sequencing and scene ownership
//! - **Pluggable Engine**: Any engine implementing [`render::RenderEngine`]
//! - **Resource Seam**: Materials, instances and textures through [`render::ResourceManager`]
//! - **Headless Backend**: In-process engine and resource manager for tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use raw_window_handle::{RawWindowHandle, WebWindowHandle};
//! use render_bridge::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Rc::new(RefCell::new(HeadlessEngine::new()));
//!     let resources = Rc::new(RefCell::new(HeadlessResourceManager::new(ResourceConfig::default())));
//!
//!     let mut renderer = Renderer::new(
//!         engine,
//!         RawWindowHandle::Web(WebWindowHandle::empty()),
//!         resources,
//!         RendererConfig::default(),
//!     )?;
//!
//!     let scene = renderer.create_scene();
//!     if let Some(scene) = renderer.scene_mut(scene) {
//!         scene.add_view(Viewport::new(0, 0, 1280, 720))?;
//!     }
//!
//!     if renderer.begin_frame() {
//!         renderer.draw();
//!         renderer.end_frame();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RendererConfig, ResourceConfig},
        render::{
            backends::headless::{EngineEvent, HeadlessEngine, HeadlessResourceManager},
            FrameRenderer, MaterialHandle, MaterialInstanceHandle, MaterialModifier,
            RenderEngine, Renderer, RendererError, ResourceError, ResourceLoadRequest,
            ResourceManager, SamplerParams, Scene, SceneHandle, TextureHandle, ViewHandle,
            Viewport,
        },
    };
}
