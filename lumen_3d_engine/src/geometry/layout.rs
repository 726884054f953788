/// Interleaved vertex layout computation.

/// Byte offsets of each array within one vertex, and the vertex stride
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterleavedLayout {
    pub offsets: Vec<u32>,
    pub stride: u32,
}

impl InterleavedLayout {
    /// Lay out arrays of `element_bytes` back to back.
    ///
    /// Offsets are the running sum of the preceding sizes. The stride is the
    /// sum of all sizes, rounded up to the next power of two when `aligned`.
    pub fn compute(element_bytes: &[u32], aligned: bool) -> Self {
        let mut offsets = Vec::with_capacity(element_bytes.len());
        let mut total = 0u32;
        for &bytes in element_bytes {
            offsets.push(total);
            total += bytes;
        }
        let stride = if aligned && total > 0 { total.next_power_of_two() } else { total };
        Self { offsets, stride }
    }

    /// Size of a buffer holding `vertex_count` vertices
    pub fn buffer_size(&self, vertex_count: u32) -> usize {
        self.stride as usize * vertex_count as usize
    }
}
