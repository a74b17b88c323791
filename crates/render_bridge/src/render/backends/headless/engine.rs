//! Headless engine and frame renderer

use std::cell::RefCell;
use std::rc::Rc;

use raw_window_handle::RawWindowHandle;
use slotmap::SlotMap;

use crate::render::api::{
    ClearOptions, EngineError, EngineResult, EngineSceneId, FrameRenderer, RenderEngine,
    SwapChainFlags, SwapChainId, ViewId, Viewport,
};

/// Everything the headless engine was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Swap chain created
    SwapChainCreated {
        /// New swap chain
        swap_chain: SwapChainId,
        /// Requested options
        flags: SwapChainFlags,
    },
    /// Swap chain released
    SwapChainDestroyed(SwapChainId),
    /// Frame renderer handed out
    RendererCreated,
    /// Frame renderer returned
    RendererDestroyed,
    /// Engine scene created
    SceneCreated(EngineSceneId),
    /// Engine scene released
    SceneDestroyed(EngineSceneId),
    /// View created for a scene
    ViewCreated {
        /// New view
        view: ViewId,
        /// Scene it renders
        scene: EngineSceneId,
    },
    /// View moved to a new rectangle
    ViewportChanged {
        /// Affected view
        view: ViewId,
        /// New rectangle
        viewport: Viewport,
    },
    /// View released
    ViewDestroyed(ViewId),
    /// Clear behaviour changed
    ClearOptionsSet(ClearOptions),
    /// Frame started
    FrameBegun {
        /// Target swap chain
        swap_chain: SwapChainId,
        /// Sequence number of the frame
        frame: u64,
    },
    /// Frame was refused
    FrameSkipped(SwapChainId),
    /// View rendered into the current frame
    ViewRendered {
        /// Rendered view
        view: ViewId,
        /// Scene the view shows
        scene: EngineSceneId,
    },
    /// Frame presented
    FrameEnded {
        /// Sequence number of the frame
        frame: u64,
    },
}

#[derive(Debug, Clone, Copy)]
struct HeadlessView {
    scene: EngineSceneId,
    viewport: Viewport,
}

#[derive(Debug)]
struct EngineState {
    swap_chains: SlotMap<SwapChainId, SwapChainFlags>,
    scenes: SlotMap<EngineSceneId, ()>,
    views: SlotMap<ViewId, HeadlessView>,
    outstanding_renderers: usize,
    renderer_available: bool,
    frame_ready: bool,
    frames_presented: u64,
    events: Vec<EngineEvent>,
}

impl EngineState {
    fn record(&mut self, event: EngineEvent) {
        log::trace!("headless: {:?}", event);
        self.events.push(event);
    }
}

/// GPU-less engine recording every call it receives
#[derive(Debug)]
pub struct HeadlessEngine {
    state: Rc<RefCell<EngineState>>,
}

impl HeadlessEngine {
    /// Create an engine that accepts every frame
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState {
                swap_chains: SlotMap::with_key(),
                scenes: SlotMap::with_key(),
                views: SlotMap::with_key(),
                outstanding_renderers: 0,
                renderer_available: true,
                frame_ready: true,
                frames_presented: 0,
                events: Vec::new(),
            })),
        }
    }

    /// Whether `begin_frame` succeeds; `false` simulates the engine skipping frames
    pub fn set_frame_ready(&self, ready: bool) {
        self.state.borrow_mut().frame_ready = ready;
    }

    /// Whether `create_renderer` succeeds
    pub fn set_renderer_available(&self, available: bool) {
        self.state.borrow_mut().renderer_available = available;
    }

    /// Copy of the event log
    pub fn events(&self) -> Vec<EngineEvent> {
        self.state.borrow().events.clone()
    }

    /// Forget recorded events
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Views rendered since the log was last cleared, in order
    pub fn rendered_views(&self) -> Vec<ViewId> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::ViewRendered { view, .. } => Some(*view),
                _ => None,
            })
            .collect()
    }

    /// Number of frames presented
    pub fn frames_presented(&self) -> u64 {
        self.state.borrow().frames_presented
    }

    /// Number of live swap chains
    pub fn live_swap_chains(&self) -> usize {
        self.state.borrow().swap_chains.len()
    }

    /// Number of live engine scenes
    pub fn live_scenes(&self) -> usize {
        self.state.borrow().scenes.len()
    }

    /// Number of live views
    pub fn live_views(&self) -> usize {
        self.state.borrow().views.len()
    }

    /// Number of frame renderers handed out and not yet returned
    pub fn outstanding_renderers(&self) -> usize {
        self.state.borrow().outstanding_renderers
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine for HeadlessEngine {
    fn create_swap_chain(&mut self, window: RawWindowHandle, flags: SwapChainFlags) -> EngineResult<SwapChainId> {
        log::debug!("headless: creating swap chain for {:?}", window);
        let mut state = self.state.borrow_mut();
        let swap_chain = state.swap_chains.insert(flags);
        state.record(EngineEvent::SwapChainCreated { swap_chain, flags });
        Ok(swap_chain)
    }

    fn destroy_swap_chain(&mut self, swap_chain: SwapChainId) {
        let mut state = self.state.borrow_mut();
        if state.swap_chains.remove(swap_chain).is_some() {
            state.record(EngineEvent::SwapChainDestroyed(swap_chain));
        } else {
            log::warn!("headless: destroying unknown swap chain {:?}", swap_chain);
        }
    }

    fn create_renderer(&mut self) -> EngineResult<Box<dyn FrameRenderer>> {
        let mut state = self.state.borrow_mut();
        if !state.renderer_available {
            return Err(EngineError::RendererCreationFailed("headless renderer disabled".to_string()));
        }
        state.outstanding_renderers += 1;
        state.record(EngineEvent::RendererCreated);
        Ok(Box::new(HeadlessFrameRenderer {
            state: Rc::clone(&self.state),
            current_frame: None,
        }))
    }

    fn destroy_renderer(&mut self, renderer: Box<dyn FrameRenderer>) {
        drop(renderer);
        let mut state = self.state.borrow_mut();
        state.outstanding_renderers = state.outstanding_renderers.saturating_sub(1);
        state.record(EngineEvent::RendererDestroyed);
    }

    fn create_scene(&mut self) -> EngineSceneId {
        let mut state = self.state.borrow_mut();
        let scene = state.scenes.insert(());
        state.record(EngineEvent::SceneCreated(scene));
        scene
    }

    fn destroy_scene(&mut self, scene: EngineSceneId) {
        let mut state = self.state.borrow_mut();
        if state.scenes.remove(scene).is_some() {
            state.views.retain(|_, view| view.scene != scene);
            state.record(EngineEvent::SceneDestroyed(scene));
        }
    }

    fn create_view(&mut self, scene: EngineSceneId) -> EngineResult<ViewId> {
        let mut state = self.state.borrow_mut();
        if !state.scenes.contains_key(scene) {
            return Err(EngineError::UnknownResource(format!("scene {scene:?}")));
        }
        let view = state.views.insert(HeadlessView {
            scene,
            viewport: Viewport::default(),
        });
        state.record(EngineEvent::ViewCreated { view, scene });
        Ok(view)
    }

    fn set_viewport(&mut self, view: ViewId, viewport: Viewport) -> EngineResult<()> {
        let mut state = self.state.borrow_mut();
        let entry = state
            .views
            .get_mut(view)
            .ok_or_else(|| EngineError::UnknownResource(format!("view {view:?}")))?;
        entry.viewport = viewport;
        state.record(EngineEvent::ViewportChanged { view, viewport });
        Ok(())
    }

    fn destroy_view(&mut self, view: ViewId) {
        let mut state = self.state.borrow_mut();
        if state.views.remove(view).is_some() {
            state.record(EngineEvent::ViewDestroyed(view));
        }
    }
}

/// Frame renderer handed out by [`HeadlessEngine`]
#[derive(Debug)]
pub struct HeadlessFrameRenderer {
    state: Rc<RefCell<EngineState>>,
    current_frame: Option<u64>,
}

impl FrameRenderer for HeadlessFrameRenderer {
    fn set_clear_options(&mut self, options: ClearOptions) {
        self.state.borrow_mut().record(EngineEvent::ClearOptionsSet(options));
    }

    fn begin_frame(&mut self, swap_chain: SwapChainId) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.frame_ready || !state.swap_chains.contains_key(swap_chain) {
            state.record(EngineEvent::FrameSkipped(swap_chain));
            return false;
        }
        let frame = state.frames_presented + 1;
        self.current_frame = Some(frame);
        state.record(EngineEvent::FrameBegun { swap_chain, frame });
        true
    }

    fn render(&mut self, view: ViewId) {
        let mut state = self.state.borrow_mut();
        if self.current_frame.is_none() {
            log::warn!("headless: render({:?}) outside of a frame", view);
            return;
        }
        let target = state.views.get(view).copied();
        match target {
            Some(HeadlessView { scene, .. }) => state.record(EngineEvent::ViewRendered { view, scene }),
            None => log::warn!("headless: render of unknown view {:?}", view),
        }
    }

    fn end_frame(&mut self) {
        let Some(frame) = self.current_frame.take() else {
            log::warn!("headless: end_frame without begin_frame");
            return;
        };
        let mut state = self.state.borrow_mut();
        state.frames_presented = frame;
        state.record(EngineEvent::FrameEnded { frame });
    }
}
