//! GPU resource pool with stable, recyclable handles.

use tracing::{debug, warn};

use crate::backend::{BufferId, GeometryBuffers, GpuBackend, TextureImages};
use crate::error::{GpuError, GpuResult};
use crate::vertex::{DecodedImage, DecodedMesh};

/// Initial capacity of each resource family.
pub const INITIAL_POOL_CAPACITY: u32 = 4;

/// Handle to GPU-resident geometry issued by a [`ResourcePool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u32);

/// Handle to a GPU-resident texture issued by a [`ResourcePool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Pool of GPU-resident geometry and textures.
///
/// Handles are dense small integers, reused LIFO after a free. Backing
/// storage is parallel growable arrays per family; when a family is full
/// and no freed handle is available, capacity doubles and every parallel
/// array is resized before the allocation proceeds, preserving all prior
/// handle→data mappings.
///
/// A handle is valid between its allocation and its free call; its numeric
/// value may be reissued afterwards. Mutating the pool while a frame is
/// mid-recording is unsupported: load and free resources between frames
/// only.
pub struct ResourcePool {
    // Geometry family: decoded records and backing buffer sets, parallel.
    meshes: Vec<DecodedMesh>,
    geometry_buffers: Vec<GeometryBuffers>,
    geometry_count: u32,
    geometry_capacity: u32,
    free_geometries: Vec<u32>,

    // Texture family: backing image sets.
    textures: Vec<TextureImages>,
    texture_count: u32,
    texture_capacity: u32,
    free_textures: Vec<u32>,
}

impl ResourcePool {
    /// Create an empty pool with [`INITIAL_POOL_CAPACITY`] per family.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_POOL_CAPACITY)
    }

    /// Create an empty pool with the given initial capacity per family.
    pub fn with_capacity(capacity: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            meshes: vec![DecodedMesh::default(); capacity as usize],
            geometry_buffers: vec![GeometryBuffers::default(); capacity as usize],
            geometry_count: 0,
            geometry_capacity: capacity,
            free_geometries: Vec::new(),
            textures: vec![TextureImages::default(); capacity as usize],
            texture_count: 0,
            texture_capacity: capacity,
            free_textures: Vec::new(),
        }
    }

    /// Number of geometry slots ever allocated (including freed holes).
    #[inline]
    pub fn geometry_count(&self) -> u32 {
        self.geometry_count
    }

    /// Current geometry capacity.
    #[inline]
    pub fn geometry_capacity(&self) -> u32 {
        self.geometry_capacity
    }

    /// Number of texture slots ever allocated (including freed holes).
    #[inline]
    pub fn texture_count(&self) -> u32 {
        self.texture_count
    }

    /// Current texture capacity.
    #[inline]
    pub fn texture_capacity(&self) -> u32 {
        self.texture_capacity
    }

    /// Upload `mesh` and return its handle.
    ///
    /// Allocation policy: reuse the most recently freed handle if any,
    /// else the next sequential one, doubling capacity first when the
    /// family is full.
    pub fn load_geometry(
        &mut self,
        backend: &mut dyn GpuBackend,
        mesh: DecodedMesh,
    ) -> GpuResult<GeometryHandle> {
        if self.geometry_count >= self.geometry_capacity && self.free_geometries.is_empty() {
            let new_capacity = self.geometry_capacity * 2;
            self.meshes.resize(new_capacity as usize, DecodedMesh::default());
            self.geometry_buffers
                .resize(new_capacity as usize, GeometryBuffers::default());
            debug!(
                from = self.geometry_capacity,
                to = new_capacity,
                "Growing geometry pool"
            );
            self.geometry_capacity = new_capacity;
        }

        let id = match self.free_geometries.pop() {
            Some(id) => id,
            None => {
                let id = self.geometry_count;
                self.geometry_count += 1;
                id
            }
        };
        if id >= self.geometry_capacity {
            return Err(GpuError::PoolExhausted {
                id,
                capacity: self.geometry_capacity,
            });
        }

        let buffers = backend.upload_geometry(&mesh)?;
        self.meshes[id as usize] = mesh;
        self.geometry_buffers[id as usize] = buffers;
        debug!(id, "Loaded geometry");
        Ok(GeometryHandle(id))
    }

    /// Release the geometry behind `handle` and recycle the handle.
    ///
    /// The backing buffers are destroyed immediately; the handle must not
    /// be drawn again until reallocated and re-populated. Freeing a handle
    /// that is not currently allocated is ignored with a warning.
    pub fn free_geometry(&mut self, backend: &mut dyn GpuBackend, handle: GeometryHandle) {
        let id = handle.0;
        if id >= self.geometry_capacity
            || self.geometry_buffers[id as usize].vertex_buffer.is_null()
        {
            warn!(id, "Ignoring free of non-live geometry handle");
            return;
        }

        backend.destroy_geometry(&self.geometry_buffers[id as usize]);
        self.geometry_buffers[id as usize] = GeometryBuffers::default();
        self.meshes[id as usize] = DecodedMesh::default();
        self.free_geometries.push(id);
        debug!(id, "Freed geometry");
    }

    /// Upload `image` and return its texture handle.
    ///
    /// Same allocation policy as [`ResourcePool::load_geometry`].
    pub fn load_texture(
        &mut self,
        backend: &mut dyn GpuBackend,
        image: DecodedImage,
    ) -> GpuResult<TextureHandle> {
        if self.texture_count >= self.texture_capacity && self.free_textures.is_empty() {
            let new_capacity = self.texture_capacity * 2;
            self.textures
                .resize(new_capacity as usize, TextureImages::default());
            debug!(
                from = self.texture_capacity,
                to = new_capacity,
                "Growing texture pool"
            );
            self.texture_capacity = new_capacity;
        }

        let id = match self.free_textures.pop() {
            Some(id) => id,
            None => {
                let id = self.texture_count;
                self.texture_count += 1;
                id
            }
        };
        if id >= self.texture_capacity {
            return Err(GpuError::PoolExhausted {
                id,
                capacity: self.texture_capacity,
            });
        }

        let images = backend.upload_texture(&image)?;
        self.textures[id as usize] = images;
        debug!(id, "Loaded texture");
        Ok(TextureHandle(id))
    }

    /// Release the texture behind `handle` and recycle the handle.
    pub fn free_texture(&mut self, backend: &mut dyn GpuBackend, handle: TextureHandle) {
        let id = handle.0;
        if id >= self.texture_capacity || self.textures[id as usize].image.is_null() {
            warn!(id, "Ignoring free of non-live texture handle");
            return;
        }

        backend.destroy_texture(&self.textures[id as usize]);
        self.textures[id as usize] = TextureImages::default();
        self.free_textures.push(id);
        debug!(id, "Freed texture");
    }

    /// Vertex buffer behind `handle`; [`BufferId::NULL`] if not live.
    #[inline]
    pub fn vertex_buffer(&self, handle: GeometryHandle) -> BufferId {
        self.geometry_buffers
            .get(handle.0 as usize)
            .map(|b| b.vertex_buffer)
            .unwrap_or(BufferId::NULL)
    }

    /// Index buffer behind `handle`; [`BufferId::NULL`] if not live.
    #[inline]
    pub fn index_buffer(&self, handle: GeometryHandle) -> BufferId {
        self.geometry_buffers
            .get(handle.0 as usize)
            .map(|b| b.index_buffer)
            .unwrap_or(BufferId::NULL)
    }

    /// Index count behind `handle`; 0 if not live.
    #[inline]
    pub fn index_count(&self, handle: GeometryHandle) -> u32 {
        self.geometry_buffers
            .get(handle.0 as usize)
            .map(|b| b.index_count)
            .unwrap_or(0)
    }

    /// Decoded mesh record behind `handle`, if live.
    pub fn mesh(&self, handle: GeometryHandle) -> Option<&DecodedMesh> {
        if self.vertex_buffer(handle).is_null() {
            return None;
        }
        self.meshes.get(handle.0 as usize)
    }

    /// Texture image set behind `handle`, if live.
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureImages> {
        self.textures
            .get(handle.0 as usize)
            .filter(|t| !t.image.is_null())
    }

    /// Release every live resource, textures before geometries, each
    /// family in reverse allocation order.
    pub fn release_all(&mut self, backend: &mut dyn GpuBackend) {
        for id in (0..self.texture_count).rev() {
            if !self.textures[id as usize].image.is_null() {
                backend.destroy_texture(&self.textures[id as usize]);
                self.textures[id as usize] = TextureImages::default();
            }
        }
        for id in (0..self.geometry_count).rev() {
            if !self.geometry_buffers[id as usize].vertex_buffer.is_null() {
                backend.destroy_geometry(&self.geometry_buffers[id as usize]);
                self.geometry_buffers[id as usize] = GeometryBuffers::default();
                self.meshes[id as usize] = DecodedMesh::default();
            }
        }
        self.free_geometries.clear();
        self.free_textures.clear();
        self.geometry_count = 0;
        self.texture_count = 0;
        debug!("Released all pool resources");
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}
