mod transform;

pub use transform::{approach, approach_scalar, MapPlacement, APPROACH_FACTOR};

use crate::app::Vec2;
use crate::SpriteKey;

pub const OPAQUE_ALPHA: u8 = u8::MAX;

/// One 2D visual placed in map space for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawToken {
    pub sprite: SpriteKey,
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub angle_degrees: f32,
    pub alpha: u8,
}

impl DrawToken {
    pub fn square(sprite: SpriteKey, center: Vec2, size: f32) -> Self {
        Self {
            sprite,
            center,
            width: size,
            height: size,
            angle_degrees: 0.0,
            alpha: OPAQUE_ALPHA,
        }
    }
}

/// The draw backend: receives every live token once per frame, in draw order.
pub trait DrawSink {
    fn submit(&mut self, token: &DrawToken);
}

/// Sink that keeps a copy of everything submitted; used by headless runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    tokens: Vec<DrawToken>,
}

impl RecordingSink {
    pub fn tokens(&self) -> &[DrawToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn count_sprite(&self, sprite: &str) -> usize {
        self.tokens
            .iter()
            .filter(|token| token.sprite.as_str() == sprite)
            .count()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

impl DrawSink for RecordingSink {
    fn submit(&mut self, token: &DrawToken) {
        self.tokens.push(token.clone());
    }
}
