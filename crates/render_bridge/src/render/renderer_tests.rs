//! Tests for the Renderer facade against the headless backend

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use nalgebra::Vector3;
use raw_window_handle::{RawWindowHandle, WebWindowHandle};

use super::backends::headless::{EngineEvent, HeadlessEngine, HeadlessResourceManager};
use super::*;
use crate::config::{RendererConfig, ResourceConfig};
use crate::foundation::logging;
use crate::render::api::{ClearOptions, HandleExt};

const LIT: &str = r#"
    name = "defaultLit"
    [[parameters]]
    name = "baseColor"
    kind = "float3"
    [[parameters]]
    name = "roughness"
    kind = "float"
"#;

struct Fixture {
    engine: Rc<RefCell<HeadlessEngine>>,
    resources: Rc<RefCell<HeadlessResourceManager>>,
    renderer: Renderer,
}

fn window() -> RawWindowHandle {
    RawWindowHandle::Web(WebWindowHandle::empty())
}

fn fixture_with(config: RendererConfig) -> Fixture {
    logging::init_for_tests();
    let engine = Rc::new(RefCell::new(HeadlessEngine::new()));
    let resources = Rc::new(RefCell::new(HeadlessResourceManager::new(ResourceConfig::default())));
    let renderer = Renderer::new(engine.clone(), window(), resources.clone(), config).unwrap();
    Fixture { engine, resources, renderer }
}

fn fixture() -> Fixture {
    fixture_with(RendererConfig::default())
}

/// Scene with a single full-screen view; returns the engine view it renders through
fn scene_with_view(renderer: &mut Renderer) -> (SceneHandle, ViewId) {
    let handle = renderer.create_scene();
    let scene = renderer.scene_mut(handle).unwrap();
    let view = scene.add_view(Viewport::new(0, 0, 320, 240)).unwrap();
    let id = scene.view(view).unwrap().id;
    (handle, id)
}

fn write_png(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("render_bridge_renderer_{}_{}", std::process::id(), name));
    image::RgbaImage::new(8, 8).save(&path).unwrap();
    path
}

fn recording_request(path: impl Into<PathBuf>) -> (ResourceLoadRequest, Rc<RefCell<Vec<(i32, String)>>>) {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let request = ResourceLoadRequest::from_path(path)
        .with_error_callback(move |_, code, message| sink.borrow_mut().push((code, message.to_string())));
    (request, errors)
}

// === Scenes ===

#[test]
fn test_created_scene_is_found() {
    let mut f = fixture();
    let handle = f.renderer.create_scene();

    assert!(f.renderer.scene(handle).is_some());
    assert!(f.renderer.scene(SceneHandle::default()).is_none());
    assert_eq!(f.engine.borrow().live_scenes(), 1);
}

#[test]
fn test_destroy_scene() {
    let mut f = fixture();
    let keep = f.renderer.create_scene();
    let handle = f.renderer.create_scene();

    assert!(f.renderer.destroy_scene(handle));
    assert!(f.renderer.scene(handle).is_none());
    assert_eq!(f.engine.borrow().live_scenes(), 1);

    assert!(!f.renderer.destroy_scene(handle));
    assert!(!f.renderer.destroy_scene(SceneHandle::default()));
    assert_eq!(f.renderer.scene_count(), 1);
    assert!(f.renderer.scene(keep).is_some());
}

#[test]
fn test_destroyed_handle_does_not_alias_new_scene() {
    let mut f = fixture();
    let old = f.renderer.create_scene();
    f.renderer.destroy_scene(old);
    let new = f.renderer.create_scene();

    assert_ne!(old, new);
    assert!(f.renderer.scene(old).is_none());
}

// === Frames ===

#[test]
fn test_frame_draws_all_scenes_then_gui() {
    let mut f = fixture();
    let (_, first) = scene_with_view(&mut f.renderer);
    let (_, second) = scene_with_view(&mut f.renderer);
    let (gui, gui_view) = scene_with_view(&mut f.renderer);
    f.renderer.convert_to_gui_scene(gui).unwrap();
    f.engine.borrow().clear_events();

    assert!(f.renderer.begin_frame());
    assert!(f.renderer.is_frame_active());
    f.renderer.draw();
    f.renderer.end_frame();
    assert!(!f.renderer.is_frame_active());

    let rendered = f.engine.borrow().rendered_views();
    assert_eq!(rendered.len(), 3);
    assert!(rendered[..2].contains(&first));
    assert!(rendered[..2].contains(&second));
    assert_eq!(rendered[2], gui_view);
    assert_eq!(f.engine.borrow().frames_presented(), 1);
}

#[test]
fn test_draw_without_begin_frame_is_inert() {
    let mut f = fixture();
    scene_with_view(&mut f.renderer);

    f.renderer.draw();
    f.renderer.end_frame();

    assert!(f.engine.borrow().rendered_views().is_empty());
    assert_eq!(f.engine.borrow().frames_presented(), 0);
}

#[test]
fn test_skipped_frame_is_inert() {
    let mut f = fixture();
    scene_with_view(&mut f.renderer);
    f.engine.borrow().set_frame_ready(false);

    assert!(!f.renderer.begin_frame());
    f.renderer.draw();
    f.renderer.end_frame();

    let events = f.engine.borrow().events();
    assert!(events.iter().any(|e| matches!(e, EngineEvent::FrameSkipped(_))));
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::ViewRendered { .. } | EngineEvent::FrameEnded { .. })));
}

#[test]
fn test_draw_after_end_frame_is_inert() {
    let mut f = fixture();
    scene_with_view(&mut f.renderer);

    assert!(f.renderer.begin_frame());
    f.renderer.end_frame();
    f.renderer.draw();

    assert!(f.engine.borrow().rendered_views().is_empty());
}

#[test]
fn test_begin_frame_while_active_keeps_open_frame() {
    let mut f = fixture();
    scene_with_view(&mut f.renderer);

    assert!(f.renderer.begin_frame());
    f.engine.borrow().set_frame_ready(false);
    assert!(f.renderer.begin_frame());
    assert!(f.renderer.is_frame_active());
    f.renderer.draw();
    f.renderer.end_frame();

    let events = f.engine.borrow().events();
    let begun = events.iter().filter(|e| matches!(e, EngineEvent::FrameBegun { .. })).count();
    let ended = events.iter().filter(|e| matches!(e, EngineEvent::FrameEnded { .. })).count();
    assert_eq!((begun, ended), (1, 1));
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::FrameSkipped(_))));
    assert_eq!(f.engine.borrow().rendered_views().len(), 1);
    assert!(!f.renderer.is_frame_active());
}

#[test]
fn test_frames_resume_after_skip() {
    let mut f = fixture();
    scene_with_view(&mut f.renderer);

    f.engine.borrow().set_frame_ready(false);
    assert!(!f.renderer.begin_frame());
    f.engine.borrow().set_frame_ready(true);
    assert!(f.renderer.begin_frame());
    f.renderer.draw();
    f.renderer.end_frame();

    assert_eq!(f.engine.borrow().rendered_views().len(), 1);
    assert_eq!(f.engine.borrow().frames_presented(), 1);
}

// === GUI scene ===

#[test]
fn test_convert_to_gui_scene_moves_ownership() {
    let mut f = fixture();
    let handle = f.renderer.create_scene();

    f.renderer.convert_to_gui_scene(handle).unwrap();

    assert!(f.renderer.scene(handle).is_none());
    assert!(f.renderer.gui_scene().is_some());
    assert_eq!(f.renderer.scene_count(), 0);
    assert_eq!(f.engine.borrow().live_scenes(), 1);
}

#[test]
fn test_convert_unknown_scene_is_reported() {
    let mut f = fixture();
    let handle = f.renderer.create_scene();
    f.renderer.destroy_scene(handle);

    let result = f.renderer.convert_to_gui_scene(handle);
    assert!(matches!(result, Err(RendererError::UnknownScene(h)) if h == handle));
    assert!(f.renderer.gui_scene().is_none());
}

#[test]
fn test_replacing_gui_scene_releases_previous() {
    let mut f = fixture();
    let first = f.renderer.create_scene();
    let second = f.renderer.create_scene();

    f.renderer.convert_to_gui_scene(first).unwrap();
    f.renderer.convert_to_gui_scene(second).unwrap();

    assert_eq!(f.engine.borrow().live_scenes(), 1);
    assert!(f.renderer.scene(second).is_none());
}

#[test]
fn test_converting_gui_scene_twice_fails() {
    let mut f = fixture();
    let handle = f.renderer.create_scene();
    f.renderer.convert_to_gui_scene(handle).unwrap();

    assert!(f.renderer.convert_to_gui_scene(handle).is_err());
    assert!(f.renderer.gui_scene().is_some());
}

// === Materials ===

#[test]
fn test_add_material_delegates() {
    let mut f = fixture();
    let handle = f.renderer.add_material(&ResourceLoadRequest::from_data(LIT)).unwrap();

    assert!(handle.is_valid());
    assert!(f.resources.borrow().material(handle).is_some());
}

#[test]
fn test_add_material_failure_reports_and_propagates() {
    let mut f = fixture();
    let (request, errors) = recording_request("");

    let result = f.renderer.add_material(&request);

    assert!(matches!(result, Err(RendererError::Resource(ResourceError::MissingSource))));
    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(errors.borrow()[0].0, ResourceError::MissingSource.code());
}

#[test]
fn test_modify_material_edits_new_instance() {
    let mut f = fixture();
    let material = f.renderer.add_material(&ResourceLoadRequest::from_data(LIT)).unwrap();

    let instance = f
        .renderer
        .modify_material(material)
        .set_color("baseColor", Vector3::new(0.8, 0.1, 0.1))
        .set_parameter("roughness", 0.3_f32)
        .finish();

    assert!(instance.is_valid());
    let shared = f.resources.borrow().material_instance(instance).unwrap();
    assert_eq!(shared.borrow().assigned_count(), 2);
    assert_eq!(shared.borrow().material(), material);
}

#[test]
fn test_modify_material_instance_edits_existing() {
    let mut f = fixture();
    let material = f.renderer.add_material(&ResourceLoadRequest::from_data(LIT)).unwrap();
    let instance = f.renderer.modify_material(material).finish();

    let again = f.renderer.modify_material_instance(instance).set_double_sided(true).finish();

    assert_eq!(again, instance);
    assert_eq!(f.resources.borrow().instance_count(), 1);
    let shared = f.resources.borrow().material_instance(instance).unwrap();
    assert!(shared.borrow().is_double_sided());
}

fn logged_error() -> bool {
    logging::take_records().iter().any(|(level, _)| *level == log::Level::Error)
}

#[test]
fn test_modify_unknown_instance_is_inert() {
    let mut f = fixture();
    let material = f.renderer.add_material(&ResourceLoadRequest::from_data(LIT)).unwrap();
    let instance = f.renderer.modify_material(material).finish();
    f.resources.borrow_mut().destroy_material_instance(instance).unwrap();
    logging::take_records();

    let modifier = f.renderer.modify_material_instance(instance);
    assert!(logged_error());
    assert!(!modifier.is_initialized());
    let finished = modifier.set_color("baseColor", Vector3::new(1.0, 1.0, 1.0)).finish();

    assert!(!finished.is_valid());
    assert_eq!(f.resources.borrow().instance_count(), 0);
}

#[test]
fn test_modify_unknown_material_is_inert() {
    let mut f = fixture();
    logging::take_records();

    let modifier = f.renderer.modify_material(MaterialHandle::default());

    assert!(!modifier.is_initialized());
    assert!(logged_error());
    assert_eq!(f.resources.borrow().instance_count(), 0);
}

#[test]
fn test_modifier_is_reset_between_calls() {
    let mut f = fixture();
    let material = f.renderer.add_material(&ResourceLoadRequest::from_data(LIT)).unwrap();
    logging::take_records();

    assert!(f.renderer.modify_material(material).is_initialized());
    assert!(!logged_error());
    assert!(!f.renderer.modify_material_instance(MaterialInstanceHandle::default()).is_initialized());
}

// === Textures ===

#[test]
fn test_add_texture_requires_path() {
    let mut f = fixture();
    let (request, errors) = recording_request("");

    let handle = f.renderer.add_texture(&request);

    assert!(!handle.is_valid());
    assert_eq!(
        errors.borrow().as_slice(),
        &[(-1, "Texture can be loaded only from file".to_string())]
    );
    assert_eq!(f.resources.borrow().stats().texture_requests, 0);
}

#[test]
fn test_add_and_remove_texture() {
    let mut f = fixture();
    let path = write_png("add_remove.png");
    let called = Rc::new(Cell::new(false));
    let flag = Rc::clone(&called);
    let request = ResourceLoadRequest::from_path(&path).with_error_callback(move |_, _, _| flag.set(true));

    let handle = f.renderer.add_texture(&request);
    std::fs::remove_file(&path).ok();

    assert!(handle.is_valid());
    assert!(!called.get());
    assert_eq!(f.resources.borrow().texture(handle).map(|t| t.width), Some(8));

    f.renderer.remove_texture(handle).unwrap();
    assert_eq!(f.resources.borrow().texture_count(), 0);
    assert!(matches!(
        f.renderer.remove_texture(handle),
        Err(RendererError::Resource(ResourceError::UnknownTexture(_)))
    ));
}

#[test]
fn test_add_texture_load_failure_reports_through_callback() {
    let mut f = fixture();
    let (request, errors) = recording_request("/nonexistent/render_bridge/brick.png");

    let handle = f.renderer.add_texture(&request);

    assert!(!handle.is_valid());
    assert_eq!(errors.borrow().len(), 1);
    assert!(errors.borrow()[0].0 < 0);
    assert_eq!(f.resources.borrow().stats().texture_requests, 1);
}

#[test]
fn test_remove_null_texture_never_reaches_resources() {
    let mut f = fixture();
    assert!(f.renderer.remove_texture(TextureHandle::default()).is_err());
    assert_eq!(f.resources.borrow().stats().textures_destroyed, 0);
}

// === Construction and teardown ===

#[test]
fn test_clear_options_follow_config() {
    let config = RendererConfig::default().with_clear_color([0.1, 0.2, 0.3, 1.0]).with_clear(false);
    let mut f = fixture_with(config);

    assert!(f.engine.borrow().events().contains(&EngineEvent::ClearOptionsSet(ClearOptions {
        clear_color: [0.1, 0.2, 0.3, 1.0],
        clear: false,
    })));

    f.renderer.set_clear_color([1.0, 1.0, 1.0, 1.0]);
    assert_eq!(f.renderer.config().clear_color, [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_set_clear_color_clamps_like_config() {
    let mut f = fixture();
    let requested = [2.0, -1.0, 0.5, 1.0];

    f.renderer.set_clear_color(requested);

    let expected = RendererConfig::default().with_clear_color(requested).clear_color;
    assert_eq!(expected, [1.0, 0.0, 0.5, 1.0]);
    assert_eq!(f.renderer.config().clear_color, expected);
    assert_eq!(
        f.engine.borrow().events().last(),
        Some(&EngineEvent::ClearOptionsSet(ClearOptions { clear_color: expected, clear: true }))
    );
}

#[test]
fn test_swap_chain_flags_follow_config() {
    let config = RendererConfig {
        readable_swap_chain: true,
        ..RendererConfig::default()
    };
    let f = fixture_with(config);

    assert!(f.engine.borrow().events().iter().any(|e| matches!(
        e,
        EngineEvent::SwapChainCreated { flags, .. } if *flags == SwapChainFlags::READABLE
    )));
}

#[test]
fn test_failed_construction_releases_swap_chain() {
    let engine = Rc::new(RefCell::new(HeadlessEngine::new()));
    engine.borrow().set_renderer_available(false);
    let resources = Rc::new(RefCell::new(HeadlessResourceManager::default()));

    let result = Renderer::new(engine.clone(), window(), resources, RendererConfig::default());

    assert!(matches!(result, Err(RendererError::Engine(EngineError::RendererCreationFailed(_)))));
    assert_eq!(engine.borrow().live_swap_chains(), 0);
}

#[test]
fn test_drop_releases_scenes_before_engine_objects() {
    let mut f = fixture();
    scene_with_view(&mut f.renderer);
    let gui = f.renderer.create_scene();
    f.renderer.convert_to_gui_scene(gui).unwrap();
    f.engine.borrow().clear_events();

    let Fixture { engine, renderer, .. } = f;
    drop(renderer);

    let events = engine.borrow().events();
    let position = |pred: fn(&EngineEvent) -> bool| events.iter().rposition(pred).unwrap();
    let last_scene = position(|e| matches!(e, EngineEvent::SceneDestroyed(_)));
    let renderer_gone = position(|e| matches!(e, EngineEvent::RendererDestroyed));
    let swap_chain_gone = position(|e| matches!(e, EngineEvent::SwapChainDestroyed(_)));

    assert!(last_scene < renderer_gone);
    assert!(renderer_gone < swap_chain_gone);
    assert_eq!(engine.borrow().live_scenes(), 0);
    assert_eq!(engine.borrow().live_views(), 0);
    assert_eq!(engine.borrow().live_swap_chains(), 0);
    assert_eq!(engine.borrow().outstanding_renderers(), 0);
}
