/// Source vertex arrays of stored geometry.
///
/// Values are kept as tightly packed floats and converted to the array's
/// data type when written into an interleaved buffer. Each config carries a
/// process-unique `ArrayId` so derived array states can be cached by
/// identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use crate::error::Result;
use crate::engine_bail;
use crate::state::ArrayDataType;

static NEXT_ARRAY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a `ClientArrayConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(u64);

impl ArrayId {
    fn next() -> Self {
        ArrayId(NEXT_ARRAY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// One vertex attribute's source data
#[derive(Debug, Clone)]
pub struct ClientArrayConfig {
    id: ArrayId,
    size: u32,
    data_type: ArrayDataType,
    normalized: bool,
    floats: Arc<[f32]>,
}

impl ClientArrayConfig {
    /// Float array with `size` components per vertex
    pub fn new(size: u32, floats: Vec<f32>) -> Result<Self> {
        Self::with_type(size, ArrayDataType::Float, false, floats)
    }

    /// Array stored as `data_type` in interleaved buffers
    ///
    /// # Arguments
    ///
    /// * `size` - Components per vertex (1..=4)
    /// * `data_type` - Component type written to the buffer
    /// * `normalized` - For unsigned bytes, map 0.0..=1.0 onto 0..=255
    /// * `floats` - Tightly packed source values
    pub fn with_type(
        size: u32,
        data_type: ArrayDataType,
        normalized: bool,
        floats: Vec<f32>,
    ) -> Result<Self> {
        if !(1..=4).contains(&size) {
            engine_bail!("lumen3d::ClientArrayConfig", "Array size {} is outside 1..=4", size);
        }
        if floats.len() % size as usize != 0 {
            engine_bail!("lumen3d::ClientArrayConfig",
                "Array data length {} is not a multiple of size {}", floats.len(), size);
        }
        Ok(Self {
            id: ArrayId::next(),
            size,
            data_type,
            normalized,
            floats: floats.into(),
        })
    }

    pub fn id(&self) -> ArrayId {
        self.id
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn data_type(&self) -> ArrayDataType {
        self.data_type
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn vertex_count(&self) -> u32 {
        (self.floats.len() / self.size as usize) as u32
    }

    /// Bytes occupied by one vertex of this array
    pub fn element_bytes(&self) -> u32 {
        self.size * self.data_type.size_bytes()
    }

    /// Component `c` of vertex `v`
    pub fn component(&self, v: u32, c: u32) -> f32 {
        self.floats[(v * self.size + c) as usize]
    }

    /// Components of vertex `v`
    pub fn vertex(&self, v: u32) -> &[f32] {
        let start = (v * self.size) as usize;
        &self.floats[start..start + self.size as usize]
    }

    /// Same size, data type and normalization
    pub fn layout_matches(&self, other: &ClientArrayConfig) -> bool {
        self.size == other.size
            && self.data_type == other.data_type
            && self.normalized == other.normalized
    }

    /// A config with the same layout over new data (fresh id)
    pub fn with_floats(&self, floats: Vec<f32>) -> Result<Self> {
        Self::with_type(self.size, self.data_type, self.normalized, floats)
    }

    /// Scatter-write every vertex into `dest` at `offset + vertex * stride`
    pub fn populate(&self, dest: &mut [u8], offset: u32, stride: u32) {
        for v in 0..self.vertex_count() {
            let mut at = (offset + v * stride) as usize;
            for &value in self.vertex(v) {
                match self.data_type {
                    ArrayDataType::Float => {
                        dest[at..at + 4].copy_from_slice(bytemuck::bytes_of(&value));
                        at += 4;
                    }
                    ArrayDataType::UnsignedByte => {
                        let scaled = if self.normalized { value * 255.0 } else { value };
                        dest[at] = scaled.round().clamp(0.0, 255.0) as u8;
                        at += 1;
                    }
                }
            }
        }
    }
}

/// Named generic vertex attribute
#[derive(Debug, Clone)]
pub struct AttributeArrayConfig {
    pub name: String,
    pub array: ClientArrayConfig,
}

impl AttributeArrayConfig {
    pub fn new(name: impl Into<String>, array: ClientArrayConfig) -> Self {
        Self { name: name.into(), array }
    }
}
