//! Falling items and their bounding boxes

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::ItemTypeSpec;
use crate::consts::*;

/// Axis-aligned rectangle, `pos` is the top-left corner (screen space, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Inclusive overlap test: touching edges count as intersecting
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

/// A single in-flight item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    /// Index into the catalogue
    pub type_index: usize,
    pub rect: Rect,
    /// Pixels per tick, fixed at spawn
    pub fall_speed: f32,
    pub point_value: u32,
    pub is_final: bool,
}

impl FallingItem {
    /// Spawn just above the top edge at a random x inside the play area
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        type_index: usize,
        spec: &ItemTypeSpec,
        play_width: f32,
        item_size: f32,
        rng: &mut R,
    ) -> Self {
        let max_x = (play_width - item_size).max(0.0);
        let x = if max_x > 0.0 {
            rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        Self {
            id,
            type_index,
            rect: Rect::new(x, -item_size, item_size, item_size),
            fall_speed: draw_fall_speed(spec.is_final, rng),
            point_value: spec.point_value,
            is_final: spec.is_final,
        }
    }

    /// Advance one tick along the fall axis
    pub fn fall(&mut self) {
        self.rect.pos.y += self.fall_speed;
    }

    /// Top edge has passed the bottom of the play area
    pub fn is_past_bottom(&self, play_height: f32) -> bool {
        self.rect.top() > play_height
    }
}

/// Draw a fall speed.
///
/// Final item: [2, 3). Others: 30% fast [9, 11), 70% normal [5, 6).
pub fn draw_fall_speed<R: Rng + ?Sized>(is_final: bool, rng: &mut R) -> f32 {
    if is_final {
        return rng.random_range(FINAL_SPEED_BASE..FINAL_SPEED_BASE + FINAL_SPEED_SPREAD);
    }
    if rng.random_bool(FAST_ITEM_CHANCE) {
        rng.random_range(FAST_SPEED_BASE..FAST_SPEED_BASE + FAST_SPEED_SPREAD)
    } else {
        rng.random_range(NORMAL_SPEED_BASE..NORMAL_SPEED_BASE + NORMAL_SPEED_SPREAD)
    }
}
