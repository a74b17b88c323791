//! Material modifier
//!
//! A reusable writer over one material instance. The renderer owns a single
//! modifier, resets it on every `modify_*` call and initializes it only when
//! the instance could be created or found. An uninitialized modifier accepts
//! every call and changes nothing.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Vector3, Vector4};

use super::{MaterialInstance, ParamValue};
use crate::render::api::{MaterialInstanceHandle, TextureHandle};
use crate::render::resources::textures::SamplerParams;

/// Chainable editor for a material instance
#[derive(Debug, Default)]
pub struct MaterialModifier {
    current: Option<(MaterialInstanceHandle, Rc<RefCell<MaterialInstance>>)>,
}

impl MaterialModifier {
    /// Create an inert modifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the instance being edited
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Start editing an instance
    pub fn init_with_material_instance(
        &mut self,
        instance: Rc<RefCell<MaterialInstance>>,
        id: MaterialInstanceHandle,
    ) {
        self.current = Some((id, instance));
    }

    /// Whether an instance is being edited
    pub const fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Handle of the instance being edited, null when inert
    pub fn instance_handle(&self) -> MaterialInstanceHandle {
        self.current.as_ref().map(|(id, _)| *id).unwrap_or_default()
    }

    /// Assign a parameter value
    pub fn set_parameter(&mut self, name: &str, value: impl Into<ParamValue>) -> &mut Self {
        let value = value.into();
        if let Some((id, instance)) = &self.current {
            if let Err(e) = instance.borrow_mut().set_parameter(name, value) {
                log::warn!("Ignoring parameter '{}' on material instance {:?}: {}", name, id, e);
            }
        }
        self
    }

    /// Assign an RGB color
    pub fn set_color(&mut self, name: &str, color: Vector3<f32>) -> &mut Self {
        self.set_parameter(name, color)
    }

    /// Assign an RGBA color
    pub fn set_color_alpha(&mut self, name: &str, color: Vector4<f32>) -> &mut Self {
        self.set_parameter(name, color)
    }

    /// Bind a texture to a sampler parameter
    pub fn set_texture(&mut self, name: &str, texture: TextureHandle, sampler: SamplerParams) -> &mut Self {
        self.set_parameter(name, ParamValue::Texture { texture, sampler })
    }

    /// Toggle back-face culling
    pub fn set_double_sided(&mut self, double_sided: bool) -> &mut Self {
        if let Some((_, instance)) = &self.current {
            instance.borrow_mut().set_double_sided(double_sided);
        }
        self
    }

    /// Stop editing and return the edited instance's handle
    pub fn finish(&mut self) -> MaterialInstanceHandle {
        let id = self.instance_handle();
        self.reset();
        id
    }
}
