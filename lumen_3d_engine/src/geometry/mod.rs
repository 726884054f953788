//! Geometry buffer composer
//!
//! Stored geometry keeps its vertex data as separate source arrays. For each
//! combination of arrays a set of passes reads (a `PassSummary`) the arrays
//! are interleaved into one buffer and exposed as an `ArrayState`. Compatible
//! geometries can be merged into one to save draw calls.

mod array_config;
mod buffer_cache;
mod layout;
mod pass_summary;
mod stored;

pub use array_config::{ArrayId, AttributeArrayConfig, ClientArrayConfig};
pub use buffer_cache::GeometryBufferCache;
pub use layout::InterleavedLayout;
pub use pass_summary::{PassSummary, SummaryFlags};
pub use stored::{
    ArraySlot, GeometryArrays, GeometryId, StoredGeometry, StoredKind, TransformedGeometry,
    BONE_INDICES, BONE_WEIGHTS,
};

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
