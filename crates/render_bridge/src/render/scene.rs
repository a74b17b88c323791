//! Scene - engine-side scene plus the views that render it
//!
//! A scene is bound to the shared engine and resource manager it was created
//! with. It creates its engine objects on construction and releases them on
//! drop, so removing a scene from the renderer is enough to free it.

use slotmap::SlotMap;

use crate::render::api::{
    EngineResult, EngineSceneId, FrameRenderer, RenderEngine, SharedEngine, SharedResources,
    ViewHandle, ViewId, Viewport,
};

/// A view rendering this scene into part of the swap chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    /// Engine-side view
    pub id: ViewId,
    /// Target rectangle
    pub viewport: Viewport,
}

/// Renderable scene owned by the renderer
pub struct Scene {
    engine: SharedEngine,
    resources: SharedResources,
    engine_scene: EngineSceneId,
    views: SlotMap<ViewHandle, View>,
}

impl Scene {
    /// Create a scene bound to the given engine and resource manager
    pub fn new(engine: SharedEngine, resources: SharedResources) -> Self {
        let engine_scene = engine.borrow_mut().create_scene();
        log::debug!("Created engine scene {:?}", engine_scene);
        Self {
            engine,
            resources,
            engine_scene,
            views: SlotMap::with_key(),
        }
    }

    /// Engine-side scene identifier
    pub const fn engine_scene(&self) -> EngineSceneId {
        self.engine_scene
    }

    /// Resource manager this scene resolves materials and textures through
    pub const fn resources(&self) -> &SharedResources {
        &self.resources
    }

    /// Add a view rendering this scene into `viewport`
    pub fn add_view(&mut self, viewport: Viewport) -> EngineResult<ViewHandle> {
        let mut engine = self.engine.borrow_mut();
        let id = engine.create_view(self.engine_scene)?;
        if let Err(e) = engine.set_viewport(id, viewport) {
            engine.destroy_view(id);
            return Err(e);
        }
        Ok(self.views.insert(View { id, viewport }))
    }

    /// Remove a view; returns whether it existed
    pub fn remove_view(&mut self, handle: ViewHandle) -> bool {
        match self.views.remove(handle) {
            Some(view) => {
                self.engine.borrow_mut().destroy_view(view.id);
                true
            }
            None => false,
        }
    }

    /// Look up a view
    pub fn view(&self, handle: ViewHandle) -> Option<&View> {
        self.views.get(handle)
    }

    /// Move a view to a new rectangle
    pub fn set_viewport(&mut self, handle: ViewHandle, viewport: Viewport) -> EngineResult<bool> {
        let Some(view) = self.views.get_mut(handle) else {
            return Ok(false);
        };
        self.engine.borrow_mut().set_viewport(view.id, viewport)?;
        view.viewport = viewport;
        Ok(true)
    }

    /// Number of views
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Render every non-empty view into the current frame
    pub fn draw(&self, renderer: &mut dyn FrameRenderer) {
        for view in self.views.values().filter(|v| !v.viewport.is_empty()) {
            renderer.render(view.id);
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        let mut engine = self.engine.borrow_mut();
        for (_, view) in self.views.drain() {
            engine.destroy_view(view.id);
        }
        engine.destroy_scene(self.engine_scene);
        log::debug!("Released engine scene {:?}", self.engine_scene);
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("engine_scene", &self.engine_scene)
            .field("views", &self.views.len())
            .finish_non_exhaustive()
    }
}
