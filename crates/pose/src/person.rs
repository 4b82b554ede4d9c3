use crate::body_part::BodyPart;

/// 2D point in destination view space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One decoded keypoint: a body part, its view-space coordinate and the
/// sigmoid-activated confidence from the decode step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPoint {
    pub body_part: BodyPart,
    pub coordinate: Point,
    pub score: f32,
}

impl KeyPoint {
    pub fn new(body_part: BodyPart) -> Self {
        Self {
            body_part,
            coordinate: Point::default(),
            score: 0.0,
        }
    }
}

/// A full decoded pose: exactly one keypoint per canonical body part, in
/// canonical order. Built fresh for each successfully decoded frame and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Person {
    pub key_points: [KeyPoint; BodyPart::COUNT],
    pub score: f32,
}

impl Person {
    pub fn new(key_points: [KeyPoint; BodyPart::COUNT], score: f32) -> Self {
        Self { key_points, score }
    }

    pub fn key_point(&self, part: BodyPart) -> &KeyPoint {
        &self.key_points[part.index()]
    }
}
