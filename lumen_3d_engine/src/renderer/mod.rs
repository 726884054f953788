/// Renderer module - rendering context abstraction, buffer objects and draw commands

mod buffer;
mod draw_command;
mod renderer;
mod state_tracker;

#[cfg(test)]
pub(crate) mod mock_renderer;

pub use buffer::{BufferObject, BufferTarget, set_float_data, set_int_data, set_short_data};
pub use draw_command::{DrawCommand, IndexData, IndexType, PrimitiveMode};
pub use renderer::{Renderer, RendererCaps, RendererStats};
pub use state_tracker::StateTracker;
