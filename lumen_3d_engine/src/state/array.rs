/// Vertex array bindings.
///
/// Not interned: array states are produced by the geometry composer and
/// compare structurally (buffer objects by id, client memory by content).

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use crate::renderer::BufferObject;

/// Component type of a client array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayDataType {
    Float,
    UnsignedByte,
}

impl ArrayDataType {
    /// Size of one component in bytes
    pub fn size_bytes(&self) -> u32 {
        match self {
            ArrayDataType::Float => 4,
            ArrayDataType::UnsignedByte => 1,
        }
    }
}

/// Backing storage of a client array
#[derive(Debug, Clone)]
pub enum ArrayBuffer {
    /// Client-side memory (no buffer objects available)
    Client(Arc<[u8]>),
    /// GPU buffer object
    Object(Arc<dyn BufferObject>),
}

impl PartialEq for ArrayBuffer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArrayBuffer::Client(a), ArrayBuffer::Client(b)) => Arc::ptr_eq(a, b) || a[..] == b[..],
            (ArrayBuffer::Object(a), ArrayBuffer::Object(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl Eq for ArrayBuffer {}

impl Hash for ArrayBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ArrayBuffer::Client(bytes) => {
                0u8.hash(state);
                bytes[..].hash(state);
            }
            ArrayBuffer::Object(buffer) => {
                1u8.hash(state);
                buffer.id().hash(state);
            }
        }
    }
}

/// One bound attribute: a typed slice of a shared backing buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientArray {
    /// Components per vertex (1..=4)
    pub size: u32,
    pub data_type: ArrayDataType,
    pub normalized: bool,
    /// Bytes between consecutive vertices
    pub stride: u32,
    /// Byte offset of the first vertex
    pub offset: u32,
    pub buffer: ArrayBuffer,
}

/// Complete set of vertex array bindings for a draw
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArrayState {
    attribute_arrays: Vec<(String, ClientArray)>,
    tex_coord_arrays: Vec<Option<ClientArray>>,
    color_array: Option<ClientArray>,
    normal_array: Option<ClientArray>,
    vertex_array: Option<ClientArray>,
}

impl ArrayState {
    pub fn new(
        attribute_arrays: Vec<(String, ClientArray)>,
        tex_coord_arrays: Vec<Option<ClientArray>>,
        color_array: Option<ClientArray>,
        normal_array: Option<ClientArray>,
        vertex_array: Option<ClientArray>,
    ) -> Self {
        Self { attribute_arrays, tex_coord_arrays, color_array, normal_array, vertex_array }
    }

    /// No arrays bound
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn attribute_arrays(&self) -> &[(String, ClientArray)] {
        &self.attribute_arrays
    }

    pub fn attribute_array(&self, name: &str) -> Option<&ClientArray> {
        self.attribute_arrays.iter().find(|(n, _)| n == name).map(|(_, array)| array)
    }

    pub fn tex_coord_arrays(&self) -> &[Option<ClientArray>] {
        &self.tex_coord_arrays
    }

    pub fn color_array(&self) -> Option<&ClientArray> {
        self.color_array.as_ref()
    }

    pub fn normal_array(&self) -> Option<&ClientArray> {
        self.normal_array.as_ref()
    }

    pub fn vertex_array(&self) -> Option<&ClientArray> {
        self.vertex_array.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.vertex_array.is_none()
            && self.normal_array.is_none()
            && self.color_array.is_none()
            && self.tex_coord_arrays.iter().all(Option::is_none)
            && self.attribute_arrays.is_empty()
    }
}
