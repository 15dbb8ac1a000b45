//! Fall damage: the peak-height watermark and the crack counter
//!
//! The watermark only rises while the egg moves up (or hangs at an apex), and
//! restarts from the landing height every time a surface claims the egg.
//! Fall distance is `peak - landing`; its length picks the damage tier.

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Highest center height reached since the last claimed landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallTracker {
    pub peak: f32,
}

impl FallTracker {
    pub fn new(y: f32) -> Self {
        Self { peak: y }
    }

    /// Raise the watermark while not descending
    #[inline]
    pub fn observe(&mut self, y: f32, velocity_y: f32) {
        if velocity_y >= 0.0 {
            self.peak = self.peak.max(y);
        }
    }

    /// Close the current arc at `landing_y`, returning how far the egg fell
    pub fn land(&mut self, landing_y: f32) -> f32 {
        let fall = (self.peak - landing_y).max(0.0);
        self.peak = landing_y;
        fall
    }

    /// Restart the watermark without measuring a fall
    #[inline]
    pub fn reset_to(&mut self, y: f32) {
        self.peak = y;
    }
}

/// How bad a fall was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallSeverity {
    Harmless,
    Crack,
    Fatal,
}

impl FallSeverity {
    pub fn classify(fall_distance: f32, tuning: &Tuning) -> Self {
        if fall_distance >= tuning.crash_threshold {
            FallSeverity::Fatal
        } else if fall_distance >= tuning.crack_threshold {
            FallSeverity::Crack
        } else {
            FallSeverity::Harmless
        }
    }
}

/// Result of applying damage to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed
    Unharmed,
    /// One more crack; the egg survives
    Cracked { cracks: u8 },
    /// The egg is destroyed; cracks are pinned at the maximum
    Shattered,
}

/// Crack counter for one life
///
/// Never decreases except through `repair` on a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shell {
    pub cracks: u8,
}

impl Shell {
    /// Add one crack; reaching `max_cracks` shatters the egg
    pub fn crack(&mut self, max_cracks: u8) -> DamageOutcome {
        self.cracks = self.cracks.saturating_add(1).min(max_cracks);
        if self.cracks >= max_cracks {
            DamageOutcome::Shattered
        } else {
            DamageOutcome::Cracked {
                cracks: self.cracks,
            }
        }
    }

    /// Pin cracks at the maximum
    pub fn shatter(&mut self, max_cracks: u8) -> DamageOutcome {
        self.cracks = self.cracks.max(max_cracks);
        DamageOutcome::Shattered
    }

    /// Apply the damage for a classified fall
    pub fn apply_fall(&mut self, severity: FallSeverity, max_cracks: u8) -> DamageOutcome {
        match severity {
            FallSeverity::Harmless => DamageOutcome::Unharmed,
            FallSeverity::Crack => self.crack(max_cracks),
            FallSeverity::Fatal => self.shatter(max_cracks),
        }
    }

    #[inline]
    pub fn is_shattered(&self, max_cracks: u8) -> bool {
        self.cracks >= max_cracks
    }

    pub fn repair(&mut self) {
        self.cracks = 0;
    }
}
