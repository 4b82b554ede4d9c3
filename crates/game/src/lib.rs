pub mod collision;
pub mod presence;

pub use collision::{Collision, CollisionGate, Obstacle};
pub use presence::{PresenceState, PresenceTracker};
