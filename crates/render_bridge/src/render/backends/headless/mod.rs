//! Headless backend
//!
//! Implements both engine seams without a GPU. The engine records every call
//! it receives as an [`EngineEvent`], which makes frame sequencing
//! observable; the resource manager parses material descriptors and reads
//! texture files for real, but never uploads anything.

mod engine;
mod resource_manager;

pub use engine::{EngineEvent, HeadlessEngine, HeadlessFrameRenderer};
pub use resource_manager::{HeadlessResourceManager, ResourceStats};
