pub mod body_part;
pub mod person;

pub use body_part::{BodyPart, SKELETON_EDGES};
pub use person::{KeyPoint, Person, Point};
