//! Spotlight carousel navigation.
//!
//! Index arithmetic is modulo the item count; the rendering layer decides how
//! a wrap-around looks.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Horizontal swipe distance (px) below which a gesture is ignored
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Delay between automatic advances
pub const AUTO_PLAY_INTERVAL: Duration = Duration::from_millis(5000);

/// Length of one slide animation
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Transitioning { target: usize },
}

/// Which way a slide moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carousel {
    len: usize,
    index: usize,
    phase: Phase,
    direction: Direction,
    auto_play: bool,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            phase: Phase::Idle,
            direction: Direction::Forward,
            auto_play: true,
        }
    }

    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Item currently shown
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Direction of the last started transition
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    fn navigable(&self) -> bool {
        self.len > 1 && !self.is_transitioning()
    }

    fn start(&mut self, target: usize, direction: Direction) -> bool {
        self.phase = Phase::Transitioning { target };
        self.direction = direction;
        true
    }

    /// Returns whether a transition started
    pub fn next(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        self.start((self.index + 1) % self.len, Direction::Forward)
    }

    pub fn prev(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        self.start((self.index + self.len - 1) % self.len, Direction::Backward)
    }

    /// Jump to an item (taken modulo the item count)
    pub fn go_to(&mut self, target: usize) -> bool {
        if !self.navigable() {
            return false;
        }
        let target = target % self.len;
        if target == self.index {
            return false;
        }
        let direction = if target > self.index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.start(target, direction)
    }

    /// The slide animation ended; settle on the target
    pub fn finish_transition(&mut self) {
        if let Phase::Transitioning { target } = self.phase {
            self.index = target;
            self.phase = Phase::Idle;
        }
    }

    /// Auto-play step
    pub fn tick(&mut self) -> bool {
        self.auto_play && self.next()
    }

    /// Touch gesture from `start_x` to `end_x`; left swipes advance
    pub fn swipe(&mut self, start_x: f64, end_x: f64) -> bool {
        let distance = start_x - end_x;
        if distance > MIN_SWIPE_DISTANCE {
            self.next()
        } else if distance < -MIN_SWIPE_DISTANCE {
            self.prev()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(carousel: &mut Carousel) {
        carousel.finish_transition();
        assert_eq!(carousel.phase(), Phase::Idle);
    }

    #[test]
    fn test_next_wraps_around() {
        let mut carousel = Carousel::new(3);
        for expected in [1, 2, 0, 1] {
            assert!(carousel.next());
            settle(&mut carousel);
            assert_eq!(carousel.index(), expected);
        }
    }

    #[test]
    fn test_prev_wraps_around() {
        let mut carousel = Carousel::new(3);
        assert!(carousel.prev());
        assert_eq!(carousel.direction(), Direction::Backward);
        settle(&mut carousel);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_input_ignored_while_transitioning() {
        let mut carousel = Carousel::new(4);
        assert!(carousel.next());
        assert!(!carousel.next());
        assert!(!carousel.prev());
        assert!(!carousel.go_to(3));
        assert_eq!(carousel.phase(), Phase::Transitioning { target: 1 });
        settle(&mut carousel);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_single_item_never_moves() {
        let mut carousel = Carousel::new(1);
        assert!(!carousel.next());
        assert!(!carousel.tick());
        assert!(!carousel.swipe(200.0, 0.0));
        assert_eq!(carousel.index(), 0);

        let mut empty = Carousel::new(0);
        assert!(!empty.next());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_go_to() {
        let mut carousel = Carousel::new(5);
        assert!(!carousel.go_to(0));
        assert!(carousel.go_to(3));
        settle(&mut carousel);
        assert_eq!(carousel.index(), 3);

        assert!(carousel.go_to(6));
        assert_eq!(carousel.direction(), Direction::Backward);
        settle(&mut carousel);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_swipe_and_auto_play() {
        let mut carousel = Carousel::new(3);
        assert!(!carousel.swipe(100.0, 80.0));
        assert!(carousel.swipe(200.0, 100.0));
        settle(&mut carousel);
        assert_eq!(carousel.index(), 1);

        assert!(carousel.swipe(0.0, 120.0));
        settle(&mut carousel);
        assert_eq!(carousel.index(), 0);

        let mut manual = Carousel::new(3).with_auto_play(false);
        assert!(!manual.tick());
        assert!(carousel.tick());
    }

    #[test]
    fn test_finish_without_transition_is_noop() {
        let mut carousel = Carousel::new(3);
        carousel.finish_transition();
        assert_eq!(carousel.index(), 0);
    }
}
