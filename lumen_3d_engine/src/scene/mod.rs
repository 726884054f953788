//! Scene management module
//!
//! Provides the scene container, its spatial indices, and the members it
//! owns: elements (ticked and rendered), influences (fog and lighting
//! volumes) and viewer effects (camera-driven global changes).

mod bounds;
mod element;
mod hash_scene;
mod influence;
mod model;
mod scene;
mod scene_index;
mod transient;
mod viewer_effect;
mod visit;

pub use bounds::AABB;
pub use element::{ElementKey, SceneElement, TickContext, TickPolicy};
pub use hash_scene::{Cell, Coord, HashSceneIndex, Level};
pub use influence::{
    AmbientLightInfluence, FogInfluence, InfluenceContribution, InfluenceKey, InfluenceSet,
    LightInfluence, SceneInfluence,
};
pub use model::Model;
pub use scene::{EnqueueStats, Scene};
pub use scene_index::{BruteForceSceneIndex, QueryStats, SceneIndex};
pub use transient::{ConfigRef, ModelFactory, TransientPool};
pub use viewer_effect::{BackgroundColorEffect, EffectKey, ViewerEffect, ViewerState};
pub use visit::{VisitCounter, VisitStamp};
