/// Retraction state of one extruder's filament.
///
/// - Recovered: filament at the nozzle, ready to extrude
/// - Retracted: withdrawn by a primary retract
/// - SwapRetracted: withdrawn by the longer tool-change (swap) retract
///
/// A swap retraction is always also a retraction; the enum keeps that true.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum ExtruderState {
    #[default]
    Recovered,
    Retracted,
    SwapRetracted,
}

impl ExtruderState {
    /// Compact id for logs and tables.
    pub const fn id(self) -> u8 {
        match self {
            ExtruderState::Recovered => 0,
            ExtruderState::Retracted => 1,
            ExtruderState::SwapRetracted => 2,
        }
    }

    /// The `retracted` flag of the status surface.
    pub const fn is_retracted(self) -> bool {
        !matches!(self, ExtruderState::Recovered)
    }

    /// The `swap_retracted` flag of the status surface.
    pub const fn is_swap_retracted(self) -> bool {
        matches!(self, ExtruderState::SwapRetracted)
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExtruderState::Recovered => "recovered",
            ExtruderState::Retracted => "retracted",
            ExtruderState::SwapRetracted => "swap-retracted",
        }
    }
}

/// Canonical list of extruder states.
pub const ALL_EXTRUDER_STATES: [ExtruderState; 3] = [
    ExtruderState::Recovered,
    ExtruderState::Retracted,
    ExtruderState::SwapRetracted,
];
