//! # Renderer
//!
//! Host-facing facade over a [`RenderEngine`] and a [`ResourceManager`].
//!
//! The renderer sequences frames, owns every scene it creates, and forwards
//! material and texture requests. It does no rendering work of its own.
//!
//! ## Frame lifecycle
//!
//! ```text
//! idle --begin_frame (started)--> active --end_frame--> idle
//! ```
//!
//! `draw` and `end_frame` are inert while idle, including after a
//! `begin_frame` the engine asked to skip.
//!
//! ## Ownership
//!
//! Scenes live either in the general collection or in the single GUI slot,
//! never both. Scenes are released before the frame renderer and swap chain
//! go back to the engine.

use raw_window_handle::RawWindowHandle;
use slotmap::SlotMap;
use thiserror::Error;

use crate::config::RendererConfig;
use crate::render::api::{
    ClearOptions, EngineError, FrameRenderer, HandleExt, MaterialHandle, MaterialInstanceHandle,
    RenderEngine, ResourceError, ResourceLoadRequest, ResourceManager, SceneHandle, SharedEngine,
    SharedResources, SwapChainId, TextureHandle,
};
use crate::render::resources::materials::MaterialModifier;
use crate::render::scene::Scene;

/// Message reported when a texture request has no file path
const TEXTURE_PATH_REQUIRED: &str = "Texture can be loaded only from file";

/// Code reported when a texture request has no file path
const TEXTURE_PATH_REQUIRED_CODE: i32 = -1;

/// Renderer errors
#[derive(Debug, Error)]
pub enum RendererError {
    /// Engine refused an operation
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Resource manager refused an operation
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Scene handle does not name a scene in the general collection
    #[error("Unknown scene handle {0:?}")]
    UnknownScene(SceneHandle),
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Rendering facade
pub struct Renderer {
    engine: SharedEngine,
    resources: SharedResources,
    config: RendererConfig,

    swap_chain: SwapChainId,
    /// Only `None` while being dropped
    frame_renderer: Option<Box<dyn FrameRenderer>>,
    frame_started: bool,

    scenes: SlotMap<SceneHandle, Scene>,
    gui_scene: Option<Scene>,

    materials_modifier: MaterialModifier,
}

impl Renderer {
    /// Create a renderer presenting to `native_window`
    ///
    /// The engine and resource manager are shared with every scene the
    /// renderer creates and must outlive it.
    pub fn new(
        engine: SharedEngine,
        native_window: RawWindowHandle,
        resources: SharedResources,
        config: RendererConfig,
    ) -> RendererResult<Self> {
        let (swap_chain, mut frame_renderer) = {
            let mut eng = engine.borrow_mut();
            let swap_chain = eng.create_swap_chain(native_window, config.swap_chain_flags())?;
            match eng.create_renderer() {
                Ok(renderer) => (swap_chain, renderer),
                Err(e) => {
                    eng.destroy_swap_chain(swap_chain);
                    return Err(e.into());
                }
            }
        };

        frame_renderer.set_clear_options(ClearOptions {
            clear_color: config.clear_color,
            clear: config.clear,
        });

        log::info!("Renderer created with swap chain {:?}", swap_chain);

        Ok(Self {
            engine,
            resources,
            config,
            swap_chain,
            frame_renderer: Some(frame_renderer),
            frame_started: false,
            scenes: SlotMap::with_key(),
            gui_scene: None,
            materials_modifier: MaterialModifier::new(),
        })
    }

    /// Configuration the renderer was created with
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Change the clear color for subsequent frames
    ///
    /// Channels are clamped to `0.0..=1.0`.
    pub fn set_clear_color(&mut self, clear_color: [f32; 4]) {
        let clear_color = clear_color.map(|c| c.clamp(0.0, 1.0));
        self.config.clear_color = clear_color;
        let options = ClearOptions {
            clear_color,
            clear: self.config.clear,
        };
        if let Some(renderer) = self.frame_renderer.as_mut() {
            renderer.set_clear_options(options);
        }
    }

    // === Scenes ===

    /// Create a scene bound to the shared engine and resource manager
    pub fn create_scene(&mut self) -> SceneHandle {
        let scene = Scene::new(self.engine.clone(), self.resources.clone());
        let handle = self.scenes.insert(scene);
        log::debug!("Created scene {:?}", handle);
        handle
    }

    /// Look up a scene in the general collection
    pub fn scene(&self, handle: SceneHandle) -> Option<&Scene> {
        self.scenes.get(handle)
    }

    /// Look up a scene in the general collection for editing
    pub fn scene_mut(&mut self, handle: SceneHandle) -> Option<&mut Scene> {
        self.scenes.get_mut(handle)
    }

    /// Release a scene; unknown handles are ignored
    ///
    /// Returns whether a scene was released.
    pub fn destroy_scene(&mut self, handle: SceneHandle) -> bool {
        let removed = self.scenes.remove(handle).is_some();
        if !removed {
            log::debug!("destroy_scene: no scene for handle {:?}", handle);
        }
        removed
    }

    /// Number of scenes in the general collection
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The scene drawn in the GUI pass, if any
    pub const fn gui_scene(&self) -> Option<&Scene> {
        self.gui_scene.as_ref()
    }

    /// The GUI scene for editing
    pub fn gui_scene_mut(&mut self) -> Option<&mut Scene> {
        self.gui_scene.as_mut()
    }

    /// Move a scene out of the general collection into the GUI slot
    ///
    /// An existing GUI scene is released. After conversion the handle no
    /// longer resolves through [`Renderer::scene`].
    pub fn convert_to_gui_scene(&mut self, handle: SceneHandle) -> RendererResult<()> {
        let Some(scene) = self.scenes.remove(handle) else {
            log::warn!("convert_to_gui_scene: no scene for handle {:?}", handle);
            return Err(RendererError::UnknownScene(handle));
        };

        if self.gui_scene.is_some() && self.config.warn_on_gui_scene_replace {
            log::warn!("Replacing existing GUI scene with scene {:?}", handle);
        }
        self.gui_scene = Some(scene);
        Ok(())
    }

    // === Frames ===

    /// Begin a frame against the swap chain
    ///
    /// Returns whether the frame started. When it did not, `draw` and
    /// `end_frame` do nothing until the next successful call. Calling it
    /// while a frame is active keeps that frame open and returns `true`.
    pub fn begin_frame(&mut self) -> bool {
        if self.frame_started {
            log::warn!("begin_frame called while a frame is active; call end_frame first");
            return true;
        }
        self.frame_started = match self.frame_renderer.as_mut() {
            Some(renderer) => renderer.begin_frame(self.swap_chain),
            None => false,
        };
        if !self.frame_started {
            log::trace!("Frame skipped");
        }
        self.frame_started
    }

    /// Whether a frame is active
    pub const fn is_frame_active(&self) -> bool {
        self.frame_started
    }

    /// Draw every scene, then the GUI scene
    pub fn draw(&mut self) {
        if !self.frame_started {
            return;
        }
        let Some(renderer) = self.frame_renderer.as_deref_mut() else {
            return;
        };

        for scene in self.scenes.values() {
            scene.draw(renderer);
        }

        if let Some(gui) = &self.gui_scene {
            gui.draw(renderer);
        }
    }

    /// Finish and present the active frame
    pub fn end_frame(&mut self) {
        if !self.frame_started {
            return;
        }
        if let Some(renderer) = self.frame_renderer.as_mut() {
            renderer.end_frame();
        }
        self.frame_started = false;
    }

    // === Materials ===

    /// Load a material through the resource manager
    ///
    /// Failures are also reported through the request's error callback.
    pub fn add_material(&mut self, request: &ResourceLoadRequest) -> RendererResult<MaterialHandle> {
        let result = self.resources.borrow_mut().create_material(request);
        result.map_err(|e| {
            request.report_error(e.code(), &e.to_string());
            e.into()
        })
    }

    /// Start editing a fresh instance of `material`
    ///
    /// If the instance cannot be created the error is logged and the
    /// returned modifier is inert.
    pub fn modify_material(&mut self, material: MaterialHandle) -> &mut MaterialModifier {
        self.materials_modifier.reset();

        let instance = {
            let mut resources = self.resources.borrow_mut();
            let created = resources.create_material_instance(material);
            created.map(|id| (id, resources.material_instance(id)))
        };

        match instance {
            Ok((id, Some(instance))) => self.materials_modifier.init_with_material_instance(instance, id),
            Ok((id, None)) => {
                log::error!("Material instance {:?} for material {:?} vanished after creation", id, material);
            }
            Err(e) => {
                log::error!("Failed to create material instance for material handle {:?}: {}", material, e);
            }
        }

        &mut self.materials_modifier
    }

    /// Start editing an existing material instance
    ///
    /// Unknown handles are logged and yield an inert modifier.
    pub fn modify_material_instance(&mut self, id: MaterialInstanceHandle) -> &mut MaterialModifier {
        self.materials_modifier.reset();

        let instance = self.resources.borrow().material_instance(id);
        match instance {
            Some(instance) => self.materials_modifier.init_with_material_instance(instance, id),
            None => {
                log::error!("Failed to modify material instance: unknown instance handle {:?}", id);
            }
        }

        &mut self.materials_modifier
    }

    // === Textures ===

    /// Load a texture from the request's file
    ///
    /// Requests without a path never reach the resource manager. Every
    /// failure is reported through the request's error callback and yields
    /// the null handle.
    pub fn add_texture(&mut self, request: &ResourceLoadRequest) -> TextureHandle {
        if !request.has_path() {
            request.report_error(TEXTURE_PATH_REQUIRED_CODE, TEXTURE_PATH_REQUIRED);
            return TextureHandle::default();
        }

        let result = self.resources.borrow_mut().create_texture(request.path());
        match result {
            Ok(handle) => handle,
            Err(e) => {
                request.report_error(e.code(), &e.to_string());
                TextureHandle::default()
            }
        }
    }

    /// Release a texture immediately
    pub fn remove_texture(&mut self, handle: TextureHandle) -> RendererResult<()> {
        if !handle.is_valid() {
            return Err(ResourceError::UnknownTexture(handle).into());
        }
        self.resources.borrow_mut().destroy_texture(handle)?;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.scenes.clear();
        self.gui_scene = None;

        let mut engine = self.engine.borrow_mut();
        if let Some(renderer) = self.frame_renderer.take() {
            engine.destroy_renderer(renderer);
        }
        engine.destroy_swap_chain(self.swap_chain);
        log::info!("Renderer released swap chain {:?}", self.swap_chain);
    }
}
