//! Explorable, editable voxel landscape: picking, slide collision, and the
//! tick loop tying the engine crates together.
#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod event;
pub mod input;
pub mod picker;
pub mod player;
pub mod raycast;
pub mod scene;

pub use app::App;
pub use config::Config;
pub use picker::BlockPicker;
pub use player::{Body, Capabilities, CollisionResolver};
pub use raycast::{Intersection, MeshRaycaster, RayQuery};
