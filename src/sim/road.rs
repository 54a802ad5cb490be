//! Scrolling road offset
//!
//! Purely cosmetic: renderers shift the lane markings by `offset`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    offset: i32,
}

impl Road {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset, always in `0..height`
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Scroll forward by `speed`, wrapping at `height`
    pub fn advance(&mut self, speed: i32, height: i32) {
        if height <= 0 {
            self.offset = 0;
            return;
        }
        let wrapped = (i64::from(self.offset) + i64::from(speed)).rem_euclid(i64::from(height));
        self.offset = i32::try_from(wrapped).unwrap_or(0);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}
