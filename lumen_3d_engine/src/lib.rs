/*!
# Lumen 3D Engine

Client-side rendering core for a game engine: scene management, spatial
culling, render state management and geometry buffer composition.

The crate does not talk to a graphics API. Backends implement the
`Renderer` trait (state application, buffer objects, draws); everything
above it is platform-agnostic.

## Architecture

- **Scene**: owns elements, influences and viewer effects; culls through a
  multi-level spatial hash and drives per-frame ticking
- **RenderState / RenderStateSet**: the 13 state types, interned through a
  `RenderStateCache`, combined into full sets per batch
- **Geometry**: stored geometry, interleaved array states, element buffers
  and geometry merging
- **Technique**: materials, techniques, enqueuers and sorted render queues
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod camera;
pub mod renderer;
pub mod state;
pub mod geometry;
pub mod scene;
pub mod technique;
mod utils;

// Main lumen3d namespace module
pub mod lumen3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton and configuration
    pub use crate::engine::Engine;
    pub use crate::config::{BufferCacheConfig, EngineConfig, SceneConfig, SpatialConfig};

    // Rendering context trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    // Render sub-module: rendering context, buffers and draw commands
    pub mod render {
        pub use crate::renderer::*;
    }

    pub mod state {
        pub use crate::state::*;
    }

    pub mod geometry {
        pub use crate::geometry::*;
    }

    pub mod scene {
        pub use crate::scene::*;
    }

    pub mod technique {
        pub use crate::technique::*;
    }

    pub mod utils {
        pub use crate::utils::LruCache;
    }
}

// Re-export math library at crate root
pub use glam;
