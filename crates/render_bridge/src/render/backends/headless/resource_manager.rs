//! Headless resource manager
//!
//! Parses material descriptors and reads texture headers from disk, storing
//! everything in CPU-side arenas.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use slotmap::SlotMap;

use crate::config::ResourceConfig;
use crate::render::api::{
    MaterialHandle, MaterialInstanceHandle, ResourceError, ResourceLoadRequest, ResourceManager,
    ResourceResult, TextureHandle,
};
use crate::render::resources::materials::{MaterialDefinition, MaterialError, MaterialInstance};
use crate::render::resources::textures::Texture;

/// Counters for calls received, used to check delegation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// `create_material` calls
    pub material_requests: usize,
    /// `create_material_instance` calls
    pub instance_requests: usize,
    /// `create_texture` calls
    pub texture_requests: usize,
    /// Textures released
    pub textures_destroyed: usize,
}

/// CPU-only resource manager
#[derive(Debug)]
pub struct HeadlessResourceManager {
    config: ResourceConfig,
    materials: SlotMap<MaterialHandle, Rc<MaterialDefinition>>,
    instances: SlotMap<MaterialInstanceHandle, Rc<RefCell<MaterialInstance>>>,
    textures: SlotMap<TextureHandle, Texture>,
    stats: ResourceStats,
}

impl HeadlessResourceManager {
    /// Create an empty resource manager
    pub fn new(config: ResourceConfig) -> Self {
        log::info!("Creating HeadlessResourceManager with config: {:?}", config);
        Self {
            config,
            materials: SlotMap::with_key(),
            instances: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            stats: ResourceStats::default(),
        }
    }

    /// Calls received so far
    pub const fn stats(&self) -> ResourceStats {
        self.stats
    }

    /// Number of live materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of live material instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn check_capacity(kind: &'static str, len: usize, max: usize) -> ResourceResult<()> {
        if max != 0 && len >= max {
            return Err(ResourceError::CapacityExceeded { kind, max });
        }
        Ok(())
    }

    fn parse_material(request: &ResourceLoadRequest) -> ResourceResult<MaterialDefinition> {
        let text = match (&request.data, request.has_path()) {
            (Some(data), _) => String::from_utf8(data.clone())
                .map_err(|e| ResourceError::InvalidMaterial(format!("descriptor is not UTF-8: {e}")))?,
            (None, true) => std::fs::read_to_string(request.path()).map_err(|source| ResourceError::Io {
                path: request.path().to_path_buf(),
                source,
            })?,
            (None, false) => return Err(ResourceError::MissingSource),
        };

        let is_ron = request.path().extension().is_some_and(|ext| ext == "ron");
        let parsed = if is_ron {
            MaterialDefinition::from_ron(&text)
        } else {
            MaterialDefinition::from_toml(&text)
        };
        parsed.map_err(|e: MaterialError| ResourceError::InvalidMaterial(e.to_string()))
    }
}

impl Default for HeadlessResourceManager {
    fn default() -> Self {
        Self::new(ResourceConfig::default())
    }
}

impl ResourceManager for HeadlessResourceManager {
    fn create_material(&mut self, request: &ResourceLoadRequest) -> ResourceResult<MaterialHandle> {
        self.stats.material_requests += 1;
        Self::check_capacity("materials", self.materials.len(), self.config.max_materials)?;

        let definition = Self::parse_material(request)?;
        log::debug!(
            "Loaded material '{}' with {} parameter(s)",
            definition.name,
            definition.parameters.len()
        );
        Ok(self.materials.insert(Rc::new(definition)))
    }

    fn material(&self, id: MaterialHandle) -> Option<Rc<MaterialDefinition>> {
        self.materials.get(id).cloned()
    }

    fn create_material_instance(&mut self, material: MaterialHandle) -> ResourceResult<MaterialInstanceHandle> {
        self.stats.instance_requests += 1;
        let definition = self
            .materials
            .get(material)
            .cloned()
            .ok_or(ResourceError::UnknownMaterial(material))?;
        Self::check_capacity(
            "material instances",
            self.instances.len(),
            self.config.max_material_instances,
        )?;

        let instance = MaterialInstance::new(material, definition);
        Ok(self.instances.insert(Rc::new(RefCell::new(instance))))
    }

    fn material_instance(&self, id: MaterialInstanceHandle) -> Option<Rc<RefCell<MaterialInstance>>> {
        self.instances.get(id).cloned()
    }

    fn destroy_material_instance(&mut self, id: MaterialInstanceHandle) -> ResourceResult<()> {
        self.instances
            .remove(id)
            .map(|_| ())
            .ok_or(ResourceError::UnknownMaterialInstance(id))
    }

    fn create_texture(&mut self, path: &Path) -> ResourceResult<TextureHandle> {
        self.stats.texture_requests += 1;
        Self::check_capacity("textures", self.textures.len(), self.config.max_textures)?;

        let (width, height) = image::image_dimensions(path).map_err(|e| texture_error(path, e))?;
        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(self.textures.insert(Texture {
            path: path.to_path_buf(),
            width,
            height,
        }))
    }

    fn texture(&self, id: TextureHandle) -> Option<&Texture> {
        self.textures.get(id)
    }

    fn destroy_texture(&mut self, id: TextureHandle) -> ResourceResult<()> {
        let texture = self.textures.remove(id).ok_or(ResourceError::UnknownTexture(id))?;
        self.stats.textures_destroyed += 1;
        log::debug!("Released texture {}", texture.path.display());
        Ok(())
    }
}

fn texture_error(path: &Path, error: image::ImageError) -> ResourceError {
    let path: PathBuf = path.to_path_buf();
    match error {
        image::ImageError::IoError(source) => ResourceError::Io { path, source },
        source => ResourceError::Image { path, source },
    }
}
