//! Mock machine position source for testing

use crate::platform::traits::{PositionSource, N_LIVE_POSITION};

/// Mock position source with a settable snapshot
#[derive(Debug, Default)]
pub struct MockPosition {
    position: [f32; N_LIVE_POSITION],
}

impl MockPosition {
    /// Create a new mock at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position snapshot returned by `current_position`
    pub fn set_position(&mut self, position: [f32; N_LIVE_POSITION]) {
        self.position = position;
    }
}

impl PositionSource for MockPosition {
    fn current_position(&self) -> [f32; N_LIVE_POSITION] {
        self.position
    }
}
