/// Draw commands produced by stored geometry

use std::sync::Arc;
use super::buffer::BufferObject;

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
}

impl PrimitiveMode {
    /// Independent primitives (safe to concatenate when merging)
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            PrimitiveMode::Points | PrimitiveMode::Lines | PrimitiveMode::Triangles | PrimitiveMode::Quads
        )
    }

    /// Number of primitives assembled from `vertices` vertices
    pub fn primitive_count(&self, vertices: u32) -> u32 {
        match self {
            PrimitiveMode::Points => vertices,
            PrimitiveMode::Lines => vertices / 2,
            PrimitiveMode::LineStrip => vertices.saturating_sub(1),
            PrimitiveMode::LineLoop => if vertices >= 2 { vertices } else { 0 },
            PrimitiveMode::Triangles => vertices / 3,
            PrimitiveMode::TriangleStrip | PrimitiveMode::TriangleFan => vertices.saturating_sub(2),
            PrimitiveMode::Quads => vertices / 4,
        }
    }
}

/// Index element width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }

    /// Narrowest type able to address `max_index`
    pub fn for_max_index(max_index: u32) -> Self {
        if max_index <= u16::MAX as u32 { IndexType::U16 } else { IndexType::U32 }
    }
}

/// Where the index data of an indexed draw lives
#[derive(Debug, Clone)]
pub enum IndexData {
    /// Client-side indices (no buffer objects available)
    Client(Arc<[u32]>),
    /// Element array buffer object
    Buffer(Arc<dyn BufferObject>),
}

impl PartialEq for IndexData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IndexData::Client(a), IndexData::Client(b)) => Arc::ptr_eq(a, b) || a[..] == b[..],
            (IndexData::Buffer(a), IndexData::Buffer(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

/// One draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Non-indexed draw of `count` vertices starting at `first`
    Arrays {
        mode: PrimitiveMode,
        first: u32,
        count: u32,
    },
    /// Indexed draw; indices lie in `start..=end`
    Elements {
        mode: PrimitiveMode,
        start: u32,
        end: u32,
        count: u32,
        index_type: IndexType,
        indices: IndexData,
    },
}

impl DrawCommand {
    pub fn mode(&self) -> PrimitiveMode {
        match self {
            DrawCommand::Arrays { mode, .. } | DrawCommand::Elements { mode, .. } => *mode,
        }
    }

    /// Vertices (or indices) submitted
    pub fn count(&self) -> u32 {
        match self {
            DrawCommand::Arrays { count, .. } | DrawCommand::Elements { count, .. } => *count,
        }
    }

    pub fn primitive_count(&self) -> u32 {
        self.mode().primitive_count(self.count())
    }

    /// Whether this command reads buffer objects
    pub fn uses_buffer_objects(&self) -> bool {
        matches!(self, DrawCommand::Elements { indices: IndexData::Buffer(_), .. })
    }
}
