//! Stored geometry: vertex arrays plus a primitive description.
//!
//! Three variants share one type:
//!
//! - **Array**: non-indexed, draws `count` vertices from `first`
//! - **Indexed**: draws through an index list whose values lie in `start..=end`
//! - **SkinnedIndexed**: indexed, with per-vertex bone indices and weights
//!
//! Array states and draw commands are derived lazily and cached in a
//! `GeometryBufferCache` under the geometry's and arrays' stable ids.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::renderer::{
    set_int_data, set_short_data, BufferTarget, DrawCommand, IndexData, IndexType,
    PrimitiveMode, Renderer,
};
use crate::scene::AABB;
use crate::state::{ArrayBuffer, ArrayState, ClientArray};
use super::array_config::{AttributeArrayConfig, ClientArrayConfig};
use super::buffer_cache::{ArrayStateKey, GeometryBufferCache};
use super::layout::InterleavedLayout;
use super::pass_summary::PassSummary;

/// Attribute name of per-vertex bone indices in skinned geometry
pub const BONE_INDICES: &str = "boneIndices";
/// Attribute name of per-vertex bone weights in skinned geometry
pub const BONE_WEIGHTS: &str = "boneWeights";

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a `StoredGeometry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl GeometryId {
    fn next() -> Self {
        GeometryId(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Vertex arrays of a geometry
#[derive(Debug, Clone)]
pub struct GeometryArrays {
    pub mode: PrimitiveMode,
    /// Positions (2 to 4 components)
    pub vertex: ClientArrayConfig,
    pub normal: Option<ClientArrayConfig>,
    pub color: Option<ClientArrayConfig>,
    /// Indexed by texture coordinate set
    pub tex_coords: Vec<Option<ClientArrayConfig>>,
    pub attributes: Vec<AttributeArrayConfig>,
}

impl GeometryArrays {
    pub fn new(mode: PrimitiveMode, vertex: ClientArrayConfig) -> Self {
        Self {
            mode,
            vertex,
            normal: None,
            color: None,
            tex_coords: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_normal(mut self, normal: ClientArrayConfig) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_color(mut self, color: ClientArrayConfig) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_tex_coords(mut self, set: u32, coords: ClientArrayConfig) -> Self {
        let set = set as usize;
        if self.tex_coords.len() <= set {
            self.tex_coords.resize(set + 1, None);
        }
        self.tex_coords[set] = Some(coords);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeArrayConfig) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&ClientArrayConfig> {
        self.attributes.iter().find(|a| a.name == name).map(|a| &a.array)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex.vertex_count()
    }

    fn all_arrays(&self) -> impl Iterator<Item = &ClientArrayConfig> {
        self.attributes.iter().map(|a| &a.array)
            .chain(self.tex_coords.iter().flatten())
            .chain(self.color.iter())
            .chain(self.normal.iter())
            .chain(std::iter::once(&self.vertex))
    }

    fn validate(&self) -> Result<()> {
        if self.vertex.size() < 2 {
            engine_bail!("lumen3d::StoredGeometry", "Vertex array needs at least 2 components, got {}",
                self.vertex.size());
        }
        if let Some(normal) = &self.normal {
            if normal.size() != 3 {
                engine_bail!("lumen3d::StoredGeometry", "Normal array needs 3 components, got {}",
                    normal.size());
            }
        }
        let count = self.vertex_count();
        for array in self.all_arrays() {
            if array.vertex_count() != count {
                engine_bail!("lumen3d::StoredGeometry",
                    "Array has {} vertices, vertex array has {}", array.vertex_count(), count);
            }
        }
        Ok(())
    }

    /// Bounds of the positions of vertices `range`
    fn bounds(&self, range: std::ops::Range<u32>) -> AABB {
        let mut bounds = AABB::EMPTY;
        for v in range {
            bounds.add_point(position(&self.vertex, v));
        }
        bounds
    }
}

fn position(array: &ClientArrayConfig, v: u32) -> Vec3 {
    let p = array.vertex(v);
    Vec3::new(p[0], p[1], p.get(2).copied().unwrap_or(0.0))
}

/// Where each array lands in an interleaved array state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArraySlot {
    Attribute(String),
    TexCoord(u32),
    Color,
    Normal,
    Vertex,
}

/// Primitive description of a stored geometry
#[derive(Debug, Clone)]
pub enum StoredKind {
    Array { first: u32, count: u32 },
    Indexed { start: u32, end: u32, indices: Arc<[u32]> },
    SkinnedIndexed { start: u32, end: u32, indices: Arc<[u32]>, bones: Vec<String> },
}

/// A geometry and the world transform to bake into it when merging
#[derive(Debug, Clone)]
pub struct TransformedGeometry {
    pub geometry: Arc<StoredGeometry>,
    pub transform: Mat4,
}

impl TransformedGeometry {
    pub fn new(geometry: Arc<StoredGeometry>, transform: Mat4) -> Self {
        Self { geometry, transform }
    }
}

// ============================================================================
// STORED GEOMETRY
// ============================================================================

#[derive(Debug)]
pub struct StoredGeometry {
    id: GeometryId,
    bounds: AABB,
    arrays: GeometryArrays,
    kind: StoredKind,
}

impl StoredGeometry {
    /// Non-indexed geometry drawing `count` vertices from `first`
    pub fn array(arrays: GeometryArrays, first: u32, count: u32) -> Result<Self> {
        arrays.validate()?;
        let end = first as u64 + count as u64;
        if end > arrays.vertex_count() as u64 {
            engine_bail!("lumen3d::StoredGeometry",
                "Vertex range {}..{} exceeds {} vertices", first, end, arrays.vertex_count());
        }
        let bounds = arrays.bounds(first..first + count);
        Ok(Self {
            id: GeometryId::next(),
            bounds,
            arrays,
            kind: StoredKind::Array { first, count },
        })
    }

    /// Indexed geometry; the vertex range is derived from the indices
    pub fn indexed(arrays: GeometryArrays, indices: Vec<u32>) -> Result<Self> {
        arrays.validate()?;
        let (start, end) = Self::index_range(&arrays, &indices)?;
        Ok(Self {
            id: GeometryId::next(),
            bounds: arrays.bounds(start..end + 1),
            arrays,
            kind: StoredKind::Indexed { start, end, indices: indices.into() },
        })
    }

    /// Indexed geometry deformed by `bones`.
    ///
    /// Requires `boneIndices` and `boneWeights` attribute arrays.
    pub fn skinned_indexed(
        arrays: GeometryArrays,
        indices: Vec<u32>,
        bones: Vec<String>,
    ) -> Result<Self> {
        arrays.validate()?;
        for name in [BONE_INDICES, BONE_WEIGHTS] {
            if arrays.attribute(name).is_none() {
                engine_bail!("lumen3d::StoredGeometry", "Skinned geometry is missing the '{}' attribute", name);
            }
        }
        if bones.is_empty() {
            engine_bail!("lumen3d::StoredGeometry", "Skinned geometry has no bones");
        }
        let (start, end) = Self::index_range(&arrays, &indices)?;
        Ok(Self {
            id: GeometryId::next(),
            bounds: arrays.bounds(start..end + 1),
            arrays,
            kind: StoredKind::SkinnedIndexed { start, end, indices: indices.into(), bones },
        })
    }

    fn index_range(arrays: &GeometryArrays, indices: &[u32]) -> Result<(u32, u32)> {
        let (Some(&start), Some(&end)) = (indices.iter().min(), indices.iter().max()) else {
            engine_bail!("lumen3d::StoredGeometry", "Indexed geometry has no indices");
        };
        if end >= arrays.vertex_count() {
            engine_bail!("lumen3d::StoredGeometry",
                "Index {} out of range for {} vertices", end, arrays.vertex_count());
        }
        Ok((start, end))
    }

    // ===== ACCESSORS =====

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn mode(&self) -> PrimitiveMode {
        self.arrays.mode
    }

    pub fn arrays(&self) -> &GeometryArrays {
        &self.arrays
    }

    pub fn kind(&self) -> &StoredKind {
        &self.kind
    }

    pub fn is_skinned(&self) -> bool {
        matches!(self.kind, StoredKind::SkinnedIndexed { .. })
    }

    /// Vertices referenced by the draw (`first..first+count` or `start..=end`)
    pub fn vertex_range(&self) -> std::ops::Range<u32> {
        match &self.kind {
            StoredKind::Array { first, count } => *first..*first + *count,
            StoredKind::Indexed { start, end, .. }
            | StoredKind::SkinnedIndexed { start, end, .. } => *start..*end + 1,
        }
    }

    pub fn indices(&self) -> Option<&[u32]> {
        match &self.kind {
            StoredKind::Array { .. } => None,
            StoredKind::Indexed { indices, .. }
            | StoredKind::SkinnedIndexed { indices, .. } => Some(&indices[..]),
        }
    }

    // ===== ARRAY STATES =====

    /// Arrays read by passes described by `summary`, in interleaving order:
    /// named attributes, texture coordinate sets, color, normal, vertex.
    ///
    /// Requested arrays the geometry lacks are skipped.
    pub fn required_arrays(&self, summary: &PassSummary) -> Vec<(ArraySlot, &ClientArrayConfig)> {
        let mut required = Vec::new();
        for attribute in &self.arrays.attributes {
            if summary.attributes.contains(&attribute.name) {
                required.push((ArraySlot::Attribute(attribute.name.clone()), &attribute.array));
            }
        }
        for &set in &summary.tex_coord_sets {
            if let Some(Some(coords)) = self.arrays.tex_coords.get(set as usize) {
                required.push((ArraySlot::TexCoord(set), coords));
            }
        }
        if summary.needs_color() {
            if let Some(color) = &self.arrays.color {
                required.push((ArraySlot::Color, color));
            }
        }
        if summary.needs_normal() {
            if let Some(normal) = &self.arrays.normal {
                required.push((ArraySlot::Normal, normal));
            }
        }
        required.push((ArraySlot::Vertex, &self.arrays.vertex));
        required
    }

    /// Interleaved array state for `summary`, shared through `cache`.
    ///
    /// The arrays are written into one buffer, a buffer object when the
    /// renderer supports them and client memory otherwise.
    pub fn create_array_state(
        &self,
        renderer: &mut dyn Renderer,
        cache: &mut GeometryBufferCache,
        summary: &PassSummary,
        aligned: bool,
    ) -> Result<Arc<ArrayState>> {
        let required = self.required_arrays(summary);
        let use_objects = renderer.capabilities().vertex_buffer_objects;
        let key = ArrayStateKey {
            aligned,
            buffer_objects: use_objects,
            arrays: required.iter().map(|(_, array)| array.id()).collect(),
        };
        if let Some(state) = cache.array_states.get(&key) {
            return Ok(Arc::clone(state));
        }

        let sizes: Vec<u32> = required.iter().map(|(_, array)| array.element_bytes()).collect();
        let layout = InterleavedLayout::compute(&sizes, aligned);
        let vertex_count = self.arrays.vertex_count();
        let mut data = vec![0u8; layout.buffer_size(vertex_count)];
        for ((_, array), &offset) in required.iter().zip(&layout.offsets) {
            array.populate(&mut data, offset, layout.stride);
        }

        let buffer = if use_objects {
            let object = renderer.create_buffer_object(BufferTarget::Array)?;
            object.set_data(&data)?;
            ArrayBuffer::Object(object)
        } else {
            ArrayBuffer::Client(data.into())
        };
        engine_debug!("lumen3d::StoredGeometry",
            "Built array state: {} arrays, stride {}, {} vertices", required.len(), layout.stride, vertex_count);

        let mut attribute_arrays = Vec::new();
        let mut tex_coord_arrays: Vec<Option<ClientArray>> = Vec::new();
        let mut color_array = None;
        let mut normal_array = None;
        let mut vertex_array = None;
        for ((slot, array), &offset) in required.into_iter().zip(&layout.offsets) {
            let client = ClientArray {
                size: array.size(),
                data_type: array.data_type(),
                normalized: array.normalized(),
                stride: layout.stride,
                offset,
                buffer: buffer.clone(),
            };
            match slot {
                ArraySlot::Attribute(name) => attribute_arrays.push((name, client)),
                ArraySlot::TexCoord(set) => {
                    let set = set as usize;
                    if tex_coord_arrays.len() <= set {
                        tex_coord_arrays.resize(set + 1, None);
                    }
                    tex_coord_arrays[set] = Some(client);
                }
                ArraySlot::Color => color_array = Some(client),
                ArraySlot::Normal => normal_array = Some(client),
                ArraySlot::Vertex => vertex_array = Some(client),
            }
        }

        let state = Arc::new(ArrayState::new(
            attribute_arrays,
            tex_coord_arrays,
            color_array,
            normal_array,
            vertex_array,
        ));
        cache.array_states.insert(key, Arc::clone(&state));
        Ok(state)
    }

    /// Draw command for this geometry, shared through `cache`.
    ///
    /// Indexed variants upload their indices into an element buffer object
    /// (16-bit when every index fits) or reference them client-side.
    pub fn create_draw_command(
        &self,
        renderer: &mut dyn Renderer,
        cache: &mut GeometryBufferCache,
    ) -> Result<DrawCommand> {
        let mode = self.arrays.mode;
        let (start, end, indices) = match &self.kind {
            StoredKind::Array { first, count } => {
                return Ok(DrawCommand::Arrays { mode, first: *first, count: *count });
            }
            StoredKind::Indexed { start, end, indices }
            | StoredKind::SkinnedIndexed { start, end, indices, .. } => (*start, *end, indices),
        };

        let use_objects = renderer.capabilities().vertex_buffer_objects;
        let key = (self.id, use_objects);
        if let Some(command) = cache.draw_commands.get(&key) {
            return Ok(command.clone());
        }

        let index_type = IndexType::for_max_index(end);
        let index_data = if use_objects {
            let object = renderer.create_buffer_object(BufferTarget::ElementArray)?;
            match index_type {
                IndexType::U16 => {
                    let shorts: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
                    set_short_data(object.as_ref(), &shorts)?;
                }
                IndexType::U32 => set_int_data(object.as_ref(), indices)?,
            }
            IndexData::Buffer(object)
        } else {
            IndexData::Client(Arc::clone(indices))
        };

        let command = DrawCommand::Elements {
            mode,
            start,
            end,
            count: indices.len() as u32,
            index_type,
            indices: index_data,
        };
        cache.draw_commands.insert(key, command.clone());
        Ok(command)
    }

    // ===== MERGING =====

    fn merge_signature(&self) -> Option<MergeSignature> {
        if !self.arrays.mode.is_list() {
            return None;
        }
        let indexed = match self.kind {
            StoredKind::Array { .. } => false,
            StoredKind::Indexed { .. } => true,
            StoredKind::SkinnedIndexed { .. } => return None,
        };
        let arrays = &self.arrays;
        Some(MergeSignature {
            mode: arrays.mode,
            indexed,
            vertex: ArrayLayout::of(&arrays.vertex),
            normal: arrays.normal.as_ref().map(ArrayLayout::of),
            color: arrays.color.as_ref().map(ArrayLayout::of),
            tex_coords: arrays.tex_coords.iter().map(|c| c.as_ref().map(ArrayLayout::of)).collect(),
            attributes: arrays.attributes.iter()
                .map(|a| (a.name.clone(), ArrayLayout::of(&a.array)))
                .collect(),
        })
    }

    /// Whether `self` and `other` can be combined into one geometry.
    ///
    /// Both must be list-mode, non-skinned, of the same variant, with the
    /// same arrays in the same layouts. The relation is symmetric and
    /// transitive.
    pub fn can_merge(&self, other: &StoredGeometry) -> bool {
        match (self.merge_signature(), other.merge_signature()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Merge the first entry of `list` with every entry compatible with it.
    ///
    /// Merged entries are removed from `list`; the rest stay. Positions are
    /// transformed as points and normals as directions by each entry's
    /// transform (normals are not renormalized). Returns `None` (leaving
    /// `list` untouched) when the list is empty or its first entry cannot
    /// merge at all.
    pub fn merge(list: &mut Vec<TransformedGeometry>) -> Result<Option<StoredGeometry>> {
        let Some(template) = list.first().map(|entry| Arc::clone(&entry.geometry)) else {
            return Ok(None);
        };
        if template.merge_signature().is_none() {
            return Ok(None);
        }

        let (merging, remaining): (Vec<_>, Vec<_>) =
            list.drain(..).partition(|entry| template.can_merge(&entry.geometry));
        *list = remaining;

        let source = &template.arrays;
        let mut vertex = Vec::new();
        let mut normal = source.normal.as_ref().map(|_| Vec::new());
        let mut color = source.color.as_ref().map(|_| Vec::new());
        let mut tex_coords: Vec<Option<Vec<f32>>> =
            source.tex_coords.iter().map(|c| c.as_ref().map(|_| Vec::new())).collect();
        let mut attributes: Vec<Vec<f32>> = source.attributes.iter().map(|_| Vec::new()).collect();
        let mut indices = Vec::new();
        let mut base = 0u32;

        for entry in &merging {
            let geometry = &entry.geometry;
            let arrays = &geometry.arrays;
            let range = geometry.vertex_range();

            for v in range.clone() {
                let p = arrays.vertex.vertex(v);
                let moved = entry.transform.transform_point3(position(&arrays.vertex, v));
                vertex.extend_from_slice(&moved.to_array()[..p.len().min(3)]);
                if p.len() == 4 {
                    vertex.push(p[3]);
                }
            }
            if let (Some(out), Some(array)) = (normal.as_mut(), arrays.normal.as_ref()) {
                for v in range.clone() {
                    let n = array.vertex(v);
                    let turned = entry.transform.transform_vector3(Vec3::new(n[0], n[1], n[2]));
                    out.extend_from_slice(&turned.to_array());
                }
            }
            if let (Some(out), Some(array)) = (color.as_mut(), arrays.color.as_ref()) {
                copy_range(out, array, range.clone());
            }
            for (out, array) in tex_coords.iter_mut().zip(&arrays.tex_coords) {
                if let (Some(out), Some(array)) = (out.as_mut(), array.as_ref()) {
                    copy_range(out, array, range.clone());
                }
            }
            for (out, attribute) in attributes.iter_mut().zip(&arrays.attributes) {
                copy_range(out, &attribute.array, range.clone());
            }
            if let Some(source_indices) = geometry.indices() {
                indices.extend(source_indices.iter().map(|&i| i - range.start + base));
            }
            base += range.end - range.start;
        }

        let mut merged = GeometryArrays::new(source.mode, source.vertex.with_floats(vertex)?);
        if let (Some(data), Some(array)) = (normal, source.normal.as_ref()) {
            merged.normal = Some(array.with_floats(data)?);
        }
        if let (Some(data), Some(array)) = (color, source.color.as_ref()) {
            merged.color = Some(array.with_floats(data)?);
        }
        for (data, array) in tex_coords.into_iter().zip(&source.tex_coords) {
            merged.tex_coords.push(match (data, array) {
                (Some(data), Some(array)) => Some(array.with_floats(data)?),
                _ => None,
            });
        }
        for (data, attribute) in attributes.into_iter().zip(&source.attributes) {
            merged.attributes.push(AttributeArrayConfig::new(
                attribute.name.clone(),
                attribute.array.with_floats(data)?,
            ));
        }

        engine_debug!("lumen3d::StoredGeometry",
            "Merged {} geometries into {} vertices, {} left unmerged", merging.len(), base, list.len());

        let geometry = match template.kind {
            StoredKind::Array { .. } => StoredGeometry::array(merged, 0, base)?,
            _ => StoredGeometry::indexed(merged, indices)?,
        };
        Ok(Some(geometry))
    }
}

fn copy_range(out: &mut Vec<f32>, array: &ClientArrayConfig, range: std::ops::Range<u32>) {
    let size = array.size() as usize;
    out.extend_from_slice(&array.floats()[range.start as usize * size..range.end as usize * size]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArrayLayout {
    size: u32,
    data_type: crate::state::ArrayDataType,
    normalized: bool,
}

impl ArrayLayout {
    fn of(array: &ClientArrayConfig) -> Self {
        Self { size: array.size(), data_type: array.data_type(), normalized: array.normalized() }
    }
}

/// Everything two geometries must share to be merged
#[derive(Debug, PartialEq, Eq)]
struct MergeSignature {
    mode: PrimitiveMode,
    indexed: bool,
    vertex: ArrayLayout,
    normal: Option<ArrayLayout>,
    color: Option<ArrayLayout>,
    tex_coords: Vec<Option<ArrayLayout>>,
    attributes: Vec<(String, ArrayLayout)>,
}

#[cfg(test)]
#[path = "stored_tests.rs"]
mod tests;
