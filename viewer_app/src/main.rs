//! Headless viewer
//!
//! Drives the render bridge against the headless backend: builds a scene and
//! a GUI overlay, loads a material, edits an instance of it, tries a texture,
//! and renders a handful of frames.
//!
//! Usage: `headless_viewer [renderer.toml|renderer.ron] [texture.png]`
//!
//! Missing config files fall back to defaults. Resource limits are read from
//! `resources.toml` in the working directory when present.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;
use raw_window_handle::{RawWindowHandle, WebWindowHandle};
use render_bridge::prelude::*;

const FRAME_COUNT: u32 = 5;
const RESOURCE_CONFIG_PATH: &str = "resources.toml";

const LIT_MATERIAL: &str = r#"
name = "defaultLit"

[[parameters]]
name = "baseColor"
kind = "float3"

[[parameters]]
name = "roughness"
kind = "float"

[[parameters]]
name = "albedo"
kind = "sampler2d"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    render_bridge::foundation::logging::init(log::LevelFilter::Info);

    log::info!("Starting headless viewer");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RendererConfig::load_or_default(&path)?,
        None => RendererConfig::default(),
    };
    let texture_path = args.next();
    let resource_config = ResourceConfig::load_or_default(RESOURCE_CONFIG_PATH)?;

    let engine = Rc::new(RefCell::new(HeadlessEngine::new()));
    let resources = Rc::new(RefCell::new(HeadlessResourceManager::new(resource_config)));

    let mut renderer = Renderer::new(
        engine.clone(),
        RawWindowHandle::Web(WebWindowHandle::empty()),
        resources,
        config,
    )?;

    let world = renderer.create_scene();
    if let Some(scene) = renderer.scene_mut(world) {
        scene.add_view(Viewport::new(0, 0, 1280, 720))?;
    }

    let overlay = renderer.create_scene();
    if let Some(scene) = renderer.scene_mut(overlay) {
        scene.add_view(Viewport::new(0, 0, 1280, 720))?;
    }
    renderer.convert_to_gui_scene(overlay)?;

    let material = renderer.add_material(&ResourceLoadRequest::from_data(LIT_MATERIAL))?;

    let texture = match texture_path {
        Some(path) => renderer.add_texture(&ResourceLoadRequest::from_path(path).with_error_callback(
            |request, code, message| {
                log::warn!("Texture {:?} unavailable ({}): {}", request.path, code, message);
            },
        )),
        None => TextureHandle::default(),
    };

    let instance = renderer
        .modify_material(material)
        .set_color("baseColor", Vector3::new(0.8, 0.3, 0.2))
        .set_parameter("roughness", 0.6_f32)
        .set_texture("albedo", texture, SamplerParams::default())
        .finish();
    log::info!("Material instance ready: {:?}", instance);

    for _ in 0..FRAME_COUNT {
        if renderer.begin_frame() {
            renderer.draw();
            renderer.end_frame();
        }
    }

    log::info!(
        "Presented {} frame(s), rendered {} view(s)",
        engine.borrow().frames_presented(),
        engine.borrow().rendered_views().len()
    );

    drop(renderer);
    log::info!(
        "Shutdown complete: {} scene(s), {} swap chain(s) still alive",
        engine.borrow().live_scenes(),
        engine.borrow().live_swap_chains()
    );

    Ok(())
}
