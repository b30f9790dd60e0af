//! Star ratings: the read-only 5-star display and the interactive picker
//!
//! Ratings are integers in 0..=100, five stars in half-star steps of 10.

/// How a single star is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarState {
    Full,
    Half,
    Empty,
}

pub const STAR_COUNT: usize = 5;

/// Star pattern for a song rating.
///
/// Star `i` is full below `rating / 20`, half at `rating / 20` when the
/// remainder is at least 10, empty otherwise.
pub fn star_pattern(rating: i64) -> [StarState; STAR_COUNT] {
    let rating = rating.clamp(0, 100);
    let full = (rating / 20) as usize;
    let half = rating % 20 >= 10;

    let mut stars = [StarState::Empty; STAR_COUNT];
    for (i, star) in stars.iter_mut().enumerate() {
        if i < full {
            *star = StarState::Full;
        } else if i == full && half {
            *star = StarState::Half;
        }
    }
    stars
}

/// Values a picker icon can commit: the "clear" icon, then one per star.
pub const PICKER_VALUES: [u8; STAR_COUNT + 1] = [0, 20, 40, 60, 80, 100];

/// Star pattern shown by the picker for a preview value.
///
/// Star `k` (1-based) is full when `value / 20 >= k` and half when
/// `value / 20 >= k - 0.5`.
pub fn picker_pattern(value: u8) -> [StarState; STAR_COUNT] {
    let value = u32::from(value.min(100));
    let mut stars = [StarState::Empty; STAR_COUNT];
    for (i, star) in stars.iter_mut().enumerate() {
        let k = i as u32 + 1;
        if value >= 20 * k {
            *star = StarState::Full;
        } else if value + 10 >= 20 * k {
            *star = StarState::Half;
        }
    }
    stars
}

/// Hover/click star selector.
///
/// Hovering previews a value, leaving falls back to the committed value,
/// clicking commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatingPicker {
    committed: u8,
    preview: u8,
}

impl RatingPicker {
    pub fn new(value: u8) -> Self {
        let value = value.min(100);
        Self {
            committed: value,
            preview: value,
        }
    }

    pub fn committed(&self) -> u8 {
        self.committed
    }

    pub fn preview(&self) -> u8 {
        self.preview
    }

    pub fn is_previewing(&self) -> bool {
        self.preview != self.committed
    }

    pub fn hover(&mut self, value: u8) {
        self.preview = value.min(100);
    }

    pub fn leave(&mut self) {
        self.preview = self.committed;
    }

    pub fn click(&mut self, value: u8) {
        let value = value.min(100);
        self.committed = value;
        self.preview = value;
    }

    /// Move the preview to the neighbouring icon value.
    pub fn step_preview(&mut self, forward: bool) {
        let index = PICKER_VALUES
            .iter()
            .rposition(|v| *v <= self.preview)
            .unwrap_or(0);
        let next = if forward {
            (index + 1).min(PICKER_VALUES.len() - 1)
        } else if PICKER_VALUES[index] < self.preview {
            index
        } else {
            index.saturating_sub(1)
        };
        self.hover(PICKER_VALUES[next]);
    }

    pub fn stars(&self) -> [StarState; STAR_COUNT] {
        picker_pattern(self.preview)
    }
}

impl Default for RatingPicker {
    fn default() -> Self {
        Self::new(40)
    }
}
