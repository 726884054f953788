/// GPU buffer object trait and upload helpers

use std::fmt;
use crate::error::Result;

/// Binding target of a buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Interleaved vertex data
    Array,
    /// Index data
    ElementArray,
}

/// Buffer object trait
///
/// Implemented by backend-specific buffer types. The buffer is destroyed
/// when the last `Arc` is dropped.
pub trait BufferObject: Send + Sync + fmt::Debug {
    /// Backend identifier, unique among live buffers
    fn id(&self) -> u32;

    fn target(&self) -> BufferTarget;

    /// Replace the buffer contents
    ///
    /// # Arguments
    ///
    /// * `data` - New contents (the buffer is resized to `data.len()`)
    fn set_data(&self, data: &[u8]) -> Result<()>;

    /// Current size in bytes
    fn size(&self) -> u64;
}

/// Upload 32-bit floats
pub fn set_float_data(buffer: &dyn BufferObject, data: &[f32]) -> Result<()> {
    buffer.set_data(bytemuck::cast_slice(data))
}

/// Upload 16-bit indices
pub fn set_short_data(buffer: &dyn BufferObject, data: &[u16]) -> Result<()> {
    buffer.set_data(bytemuck::cast_slice(data))
}

/// Upload 32-bit indices
pub fn set_int_data(buffer: &dyn BufferObject, data: &[u32]) -> Result<()> {
    buffer.set_data(bytemuck::cast_slice(data))
}
