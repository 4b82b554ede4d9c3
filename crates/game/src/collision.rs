use pose::{BodyPart, Person};

/// Axis-aligned hit region in view space.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub id: u32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Obstacle {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// One keypoint overlapping one obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub obstacle_id: u32,
    pub body_part: BodyPart,
}

/// Tests decoded keypoints against obstacle hit regions.
///
/// Keypoints below the confidence threshold are ignored: a garbage
/// low-confidence coordinate must not end a round.
pub struct CollisionGate {
    pub min_confidence: f32,
}

impl CollisionGate {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    pub fn check(&self, person: &Person, obstacles: &[Obstacle]) -> Vec<Collision> {
        let mut collisions = Vec::new();

        for kp in &person.key_points {
            if kp.score < self.min_confidence {
                continue;
            }
            // NaN coordinates fail every contains() comparison and fall out here.
            for obstacle in obstacles {
                if obstacle.contains(kp.coordinate.x, kp.coordinate.y) {
                    collisions.push(Collision {
                        obstacle_id: obstacle.id,
                        body_part: kp.body_part,
                    });
                }
            }
        }

        if !collisions.is_empty() {
            tracing::debug!(count = collisions.len(), "Obstacle collisions");
        }
        collisions
    }
}
