use super::{plan, ExtruderState, Request, ALL_EXTRUDER_STATES, ALL_REQUESTS};

/// Directed retraction transition edge.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransitionEdge {
    pub start: ExtruderState,
    pub request: Request,
    pub goal: ExtruderState,
}

/// Every non-redundant (state, request) pair and where it leads.
///
/// With `swap_enabled == false` swap requests collapse onto their primary
/// variant, so they appear with the primary request's goal, and the
/// unreachable `SwapRetracted` start state is left out.
pub fn transition_table(swap_enabled: bool) -> Vec<TransitionEdge> {
    let mut edges = Vec::new();

    for start in ALL_EXTRUDER_STATES {
        if !swap_enabled && start.is_swap_retracted() {
            continue;
        }
        for request in ALL_REQUESTS {
            if let Some(p) = plan(start, request, swap_enabled) {
                edges.push(TransitionEdge {
                    start,
                    request,
                    goal: p.goal,
                });
            }
        }
    }

    edges
}
