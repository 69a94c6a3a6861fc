//! Retraction tunables and their compiled-in defaults.
//!
//! Lengths are in mm, feedrates in mm/s. Updates arrive as typed patches
//! (`RetractUpdate`, `RecoverUpdate`) so a settings command layer can apply
//! only the parameters it was given.

use crate::error::{CoreError, Result};

pub const RETRACT_LENGTH: f32 = 3.0;
pub const RETRACT_LENGTH_SWAP: f32 = 13.0;
pub const RETRACT_FEEDRATE: f32 = 45.0;
pub const RETRACT_ZLIFT: f32 = 0.0;
pub const RETRACT_RECOVER_LENGTH: f32 = 0.0;
pub const RETRACT_RECOVER_LENGTH_SWAP: f32 = 0.0;
pub const RETRACT_RECOVER_FEEDRATE: f32 = 8.0;
pub const RETRACT_RECOVER_FEEDRATE_SWAP: f32 = 8.0;

/// A `retract_zlift` at or below this is treated as "no hop configured".
pub const ZLIFT_EPSILON: f32 = 0.01;

/// Process-wide retraction settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RetractionSettings {
    /// E-only moves become firmware retracts/recovers.
    pub autoretract_enabled: bool,
    pub retract_length: f32,
    pub retract_feedrate_mm_s: f32,
    pub retract_zlift: f32,
    /// Extra length pushed on recovery, on top of `retract_length`.
    pub recover_length: f32,
    pub recover_feedrate_mm_s: f32,
    pub swap_retract_length: f32,
    pub swap_recover_length: f32,
    pub swap_recover_feedrate_mm_s: f32,
}

impl Default for RetractionSettings {
    fn default() -> Self {
        Self {
            autoretract_enabled: false,
            retract_length: RETRACT_LENGTH,
            retract_feedrate_mm_s: RETRACT_FEEDRATE,
            retract_zlift: RETRACT_ZLIFT,
            recover_length: RETRACT_RECOVER_LENGTH,
            recover_feedrate_mm_s: RETRACT_RECOVER_FEEDRATE,
            swap_retract_length: RETRACT_LENGTH_SWAP,
            swap_recover_length: RETRACT_RECOVER_LENGTH_SWAP,
            swap_recover_feedrate_mm_s: RETRACT_RECOVER_FEEDRATE_SWAP,
        }
    }
}

impl RetractionSettings {
    /// True when a Z lift should accompany a retract.
    pub fn has_zhop(&self) -> bool {
        self.retract_zlift > ZLIFT_EPSILON
    }

    /// Withdrawal length for a primary or swap retract.
    pub fn retract_length_for(&self, swapping: bool) -> f32 {
        if swapping {
            self.swap_retract_length
        } else {
            self.retract_length
        }
    }

    /// Full E excursion restored by a recover: the retract plus the surplus push.
    pub fn recover_length_for(&self, swapping: bool) -> f32 {
        if swapping {
            self.swap_retract_length + self.swap_recover_length
        } else {
            self.retract_length + self.recover_length
        }
    }

    pub fn recover_feedrate_for(&self, swapping: bool) -> f32 {
        if swapping {
            self.swap_recover_feedrate_mm_s
        } else {
            self.recover_feedrate_mm_s
        }
    }

    /// Apply a retract-side patch. Nothing changes if any value is rejected.
    pub fn apply_retract(&mut self, update: RetractUpdate) -> Result<()> {
        check("retract_length", update.length)?;
        check("retract_feedrate_mm_s", update.feedrate_mm_s)?;
        check("retract_zlift", update.zlift)?;
        check("swap_retract_length", update.swap_length)?;

        set(&mut self.retract_length, update.length);
        set(&mut self.retract_feedrate_mm_s, update.feedrate_mm_s);
        set(&mut self.retract_zlift, update.zlift);
        set(&mut self.swap_retract_length, update.swap_length);
        Ok(())
    }

    /// Apply a recover-side patch. Nothing changes if any value is rejected.
    pub fn apply_recover(&mut self, update: RecoverUpdate) -> Result<()> {
        check("recover_length", update.length)?;
        check("recover_feedrate_mm_s", update.feedrate_mm_s)?;
        check("swap_recover_length", update.swap_length)?;
        check("swap_recover_feedrate_mm_s", update.swap_feedrate_mm_s)?;

        set(&mut self.recover_length, update.length);
        set(&mut self.recover_feedrate_mm_s, update.feedrate_mm_s);
        set(&mut self.swap_recover_length, update.swap_length);
        set(&mut self.swap_recover_feedrate_mm_s, update.swap_feedrate_mm_s);
        Ok(())
    }
}

/// Retract-side settings patch, as carried by `M207`. `None` leaves a field alone.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RetractUpdate {
    /// `S`: retract length (mm).
    pub length: Option<f32>,
    /// `F`: retract feedrate. G-code carries mm/min; callers convert.
    pub feedrate_mm_s: Option<f32>,
    /// `Z`: hop height (mm).
    pub zlift: Option<f32>,
    /// `W`: swap retract length (mm).
    pub swap_length: Option<f32>,
}

/// Recover-side settings patch, as carried by `M208`. The auto-retract switch
/// (`M209 S`) is not a setting; see `FwRetract::set_autoretract`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RecoverUpdate {
    /// `S`: extra length pushed on recover (mm).
    pub length: Option<f32>,
    /// `F`: recover feedrate (mm/s after conversion).
    pub feedrate_mm_s: Option<f32>,
    /// `W`: extra length pushed on swap recover (mm).
    pub swap_length: Option<f32>,
    /// `R`: swap recover feedrate (mm/s after conversion).
    pub swap_feedrate_mm_s: Option<f32>,
}

fn check(name: &'static str, value: Option<f32>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CoreError::invalid_setting(name, v)),
        _ => Ok(()),
    }
}

fn set(field: &mut f32, value: Option<f32>) {
    if let Some(v) = value {
        *field = v;
    }
}
