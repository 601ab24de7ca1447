//! Heading state machine and arrow-key mapping

use log::debug;
use macroquad::prelude::*;
use shared::{Direction, SPAWN_DIRECTION};

/// Maps an arrow key to a candidate heading. Every other key is ignored.
pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Holds the current heading and validates transitions. A change takes
/// effect on the next simulation tick; it is never queued.
pub struct DirectionController {
    current: Direction,
}

impl DirectionController {
    pub fn new(initial: Direction) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    /// Adopts the requested heading immediately unless it is the geometric
    /// opposite of the current one; a reversal is rejected silently and the
    /// current heading is retained.
    pub fn try_change(&mut self, requested: Direction) -> bool {
        if requested == self.current.opposite() {
            debug!("rejected reversal {:?} -> {:?}", self.current, requested);
            return false;
        }
        self.current = requested;
        true
    }

    /// Samples the arrow keys pressed since the last poll and feeds them
    /// through `try_change` in key order.
    pub fn poll(&mut self) {
        for key in [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right] {
            if is_key_pressed(key) {
                if let Some(requested) = direction_for_key(key) {
                    self.try_change(requested);
                }
            }
        }
    }
}

impl Default for DirectionController {
    fn default() -> Self {
        Self::new(SPAWN_DIRECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal_rejected_for_every_heading() {
        for heading in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let mut controller = DirectionController::new(heading);
            assert!(!controller.try_change(heading.opposite()));
            assert_eq!(controller.current(), heading);
        }
    }

    #[test]
    fn test_perpendicular_change_adopted() {
        let mut controller = DirectionController::new(Direction::Right);
        assert!(controller.try_change(Direction::Up));
        assert_eq!(controller.current(), Direction::Up);
    }

    #[test]
    fn test_same_heading_is_a_valid_request() {
        let mut controller = DirectionController::new(Direction::Right);
        assert!(controller.try_change(Direction::Right));
        assert_eq!(controller.current(), Direction::Right);
    }

    #[test]
    fn test_turn_sequence_allows_eventual_reversal() {
        // RIGHT -> DOWN -> LEFT is legal even though RIGHT -> LEFT is not.
        let mut controller = DirectionController::new(Direction::Right);
        assert!(controller.try_change(Direction::Down));
        assert!(controller.try_change(Direction::Left));
        assert_eq!(controller.current(), Direction::Left);
    }

    #[test]
    fn test_arrow_keys_map_and_others_ignored() {
        assert_eq!(direction_for_key(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for_key(KeyCode::Down), Some(Direction::Down));
        assert_eq!(direction_for_key(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for_key(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for_key(KeyCode::W), None);
        assert_eq!(direction_for_key(KeyCode::Space), None);
    }
}
