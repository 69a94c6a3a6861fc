use super::{ExtruderState, Request};

/// The motion a transition needs, before any lengths are applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stroke {
    /// Withdraw the full retract length, then hop if configured.
    Retract { swap: bool },
    /// Primary retract upgraded to swap: withdraw only the extra swap length.
    Escalate,
    /// Undo any owed hop, then restore retract + surplus.
    Recover { swap: bool },
}

/// What a caller learns from `FwRetract::retract`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// Redundant request; no moves were issued.
    Ignored,
    Retracted,
    SwapRetracted,
    Escalated,
    Recovered,
    SwapRecovered,
}

/// A non-redundant transition of one extruder.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Plan {
    pub start: ExtruderState,
    pub request: Request,
    pub stroke: Stroke,
    pub goal: ExtruderState,
}

impl Plan {
    pub const fn outcome(&self) -> Outcome {
        match self.stroke {
            Stroke::Retract { swap: false } => Outcome::Retracted,
            Stroke::Retract { swap: true } => Outcome::SwapRetracted,
            Stroke::Escalate => Outcome::Escalated,
            Stroke::Recover { swap: false } => Outcome::Recovered,
            Stroke::Recover { swap: true } => Outcome::SwapRecovered,
        }
    }
}

/// Decide what a request does to an extruder in `current` state.
///
/// Returns `None` for redundant requests (two retracts or two recovers in a row).
/// Rules:
/// - swap is honoured only when `swap_enabled` (more than one extruder)
/// - a swap-retract after a primary retract escalates
/// - a swap-recover needs an active swap retraction; after a primary retract it is redundant
/// - a plain recover matches the retraction that is active
pub fn plan(current: ExtruderState, request: Request, swap_enabled: bool) -> Option<Plan> {
    use ExtruderState::*;
    use Request::*;

    let request = if swap_enabled {
        request
    } else {
        request.without_swap()
    };

    let (stroke, goal) = match (current, request) {
        (Recovered, Retract) => (Stroke::Retract { swap: false }, Retracted),
        (Recovered, SwapRetract) => (Stroke::Retract { swap: true }, SwapRetracted),
        (Retracted, SwapRetract) => (Stroke::Escalate, SwapRetracted),

        (Retracted, Recover) => (Stroke::Recover { swap: false }, Recovered),
        (SwapRetracted, Recover | SwapRecover) => (Stroke::Recover { swap: true }, Recovered),

        _ => return None,
    };

    Some(Plan {
        start: current,
        request,
        stroke,
        goal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_retract_is_ignored() {
        assert!(plan(ExtruderState::Retracted, Request::Retract, true).is_none());
        assert!(plan(ExtruderState::SwapRetracted, Request::Retract, true).is_none());
        assert!(plan(ExtruderState::SwapRetracted, Request::SwapRetract, true).is_none());
    }

    #[test]
    fn double_recover_is_ignored_for_both_variants() {
        assert!(plan(ExtruderState::Recovered, Request::Recover, true).is_none());
        assert!(plan(ExtruderState::Recovered, Request::SwapRecover, true).is_none());
    }

    #[test]
    fn swap_retract_after_retract_escalates() {
        let p = plan(ExtruderState::Retracted, Request::SwapRetract, true).unwrap();
        assert_eq!(p.stroke, Stroke::Escalate);
        assert_eq!(p.goal, ExtruderState::SwapRetracted);
        assert_eq!(p.outcome(), Outcome::Escalated);
    }

    #[test]
    fn recover_follows_active_retraction_kind() {
        let p = plan(ExtruderState::SwapRetracted, Request::Recover, true).unwrap();
        assert_eq!(p.stroke, Stroke::Recover { swap: true });

        let p = plan(ExtruderState::Retracted, Request::Recover, true).unwrap();
        assert_eq!(p.stroke, Stroke::Recover { swap: false });
    }

    #[test]
    fn swap_recover_after_primary_retract_is_ignored() {
        assert!(plan(ExtruderState::Retracted, Request::SwapRecover, true).is_none());

        // Without a swap profile it is just a recover.
        let p = plan(ExtruderState::Retracted, Request::SwapRecover, false).unwrap();
        assert_eq!(p.stroke, Stroke::Recover { swap: false });
    }

    #[test]
    fn single_extruder_drops_swap() {
        let p = plan(ExtruderState::Recovered, Request::SwapRetract, false).unwrap();
        assert_eq!(p.request, Request::Retract);
        assert_eq!(p.goal, ExtruderState::Retracted);

        assert!(plan(ExtruderState::Retracted, Request::SwapRetract, false).is_none());
    }
}
