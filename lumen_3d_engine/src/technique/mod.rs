//! Technique module: materials, techniques and render queues.
//!
//! A `Material` lists techniques in preference order. For a requested
//! scheme it selects one the renderer supports; the technique's enqueuer
//! turns a geometry into `Batch`es placed in `RenderQueues`, which sort
//! and draw them.

mod batch;
mod context;
mod enqueuer;
mod material;
mod pass;
mod render_queue;
mod scheme;
mod technique;

pub use batch::Batch;
pub use context::EnqueueContext;
pub use enqueuer::{CompiledEnqueuer, EnqueuerConfig};
pub use material::Material;
pub use pass::PassConfig;
pub use render_queue::{QueueGroup, RenderQueue, RenderQueues, SortMode};
pub use scheme::{RenderScheme, SchemeRegistry};
pub use technique::TechniqueConfig;

#[cfg(test)]
#[path = "technique_tests.rs"]
mod tests;
