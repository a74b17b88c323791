//! Engine abstraction traits
//!
//! This module defines the traits an underlying rendering engine must
//! implement so the renderer facade can acquire swap chains, frame renderers,
//! scenes and views without knowing which engine is behind them.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use raw_window_handle::RawWindowHandle;
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Engine-side swap chain identifier
    pub struct SwapChainId;

    /// Engine-side scene identifier
    pub struct EngineSceneId;

    /// Engine-side view identifier
    pub struct ViewId;
}

/// Engine shared between the renderer and every scene it creates
pub type SharedEngine = Rc<RefCell<dyn RenderEngine>>;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// The native window handle cannot back a swap chain
    #[error("Swap chain creation failed: {0}")]
    SwapChainCreationFailed(String),

    /// The engine could not hand out a frame renderer
    #[error("Renderer creation failed: {0}")]
    RendererCreationFailed(String),

    /// Operation referenced a resource the engine does not know about
    #[error("Unknown engine resource: {0}")]
    UnknownResource(String),
}

bitflags! {
    /// Swap chain creation options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SwapChainFlags: u32 {
        /// Surface keeps an alpha channel for compositing
        const TRANSPARENT = 1 << 0;
        /// Rendered frames can be read back
        const READABLE = 1 << 1;
    }
}

/// Clear behaviour applied at the start of each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearOptions {
    /// Clear color [R, G, B, A]
    pub clear_color: [f32; 4],
    /// Whether the target is cleared at all
    pub clear: bool,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear: true,
        }
    }
}

/// Pixel rectangle a view renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: i32,
    /// Bottom edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the viewport covers any pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Main engine trait
///
/// Owns every engine-side object. The renderer facade and its scenes only
/// ever hold identifiers into it.
pub trait RenderEngine {
    /// Create a swap chain presenting to the given native window
    fn create_swap_chain(&mut self, window: RawWindowHandle, flags: SwapChainFlags) -> EngineResult<SwapChainId>;

    /// Release a swap chain
    fn destroy_swap_chain(&mut self, swap_chain: SwapChainId);

    /// Create the low-level frame renderer
    fn create_renderer(&mut self) -> EngineResult<Box<dyn FrameRenderer>>;

    /// Return a frame renderer to the engine
    fn destroy_renderer(&mut self, renderer: Box<dyn FrameRenderer>);

    /// Create an empty engine-side scene
    fn create_scene(&mut self) -> EngineSceneId;

    /// Release an engine-side scene
    fn destroy_scene(&mut self, scene: EngineSceneId);

    /// Create a view that renders the given scene
    fn create_view(&mut self, scene: EngineSceneId) -> EngineResult<ViewId>;

    /// Change the pixel rectangle a view renders into
    fn set_viewport(&mut self, view: ViewId, viewport: Viewport) -> EngineResult<()>;

    /// Release a view
    fn destroy_view(&mut self, view: ViewId);
}

/// Low-level per-frame renderer handed out by [`RenderEngine::create_renderer`]
pub trait FrameRenderer {
    /// Configure how each frame is cleared
    fn set_clear_options(&mut self, options: ClearOptions);

    /// Begin a frame against the swap chain; `false` means the frame must be skipped
    fn begin_frame(&mut self, swap_chain: SwapChainId) -> bool;

    /// Render one view into the current frame
    fn render(&mut self, view: ViewId);

    /// Finish the current frame and present it
    fn end_frame(&mut self);
}
