//! Engine backend implementations
//!
//! Contains implementations of [`crate::render::RenderEngine`] and
//! [`crate::render::ResourceManager`]. Currently a headless backend that runs
//! in-process without a GPU, used by tools and tests.

pub mod headless;
