/// Retraction requests as issued by the command layer.
///
/// `retract(retracting, swapping)` maps onto one of these via [`Request::from_flags`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Request {
    Retract,
    SwapRetract,
    Recover,
    SwapRecover,
}

impl Request {
    pub const fn from_flags(retracting: bool, swapping: bool) -> Self {
        match (retracting, swapping) {
            (true, false) => Request::Retract,
            (true, true) => Request::SwapRetract,
            (false, false) => Request::Recover,
            (false, true) => Request::SwapRecover,
        }
    }

    pub const fn is_retract(self) -> bool {
        matches!(self, Request::Retract | Request::SwapRetract)
    }

    pub const fn is_swap(self) -> bool {
        matches!(self, Request::SwapRetract | Request::SwapRecover)
    }

    /// Same direction, primary variant. Single-extruder machines have no swap profile.
    pub const fn without_swap(self) -> Self {
        Request::from_flags(self.is_retract(), false)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Request::Retract => "retract",
            Request::SwapRetract => "swap-retract",
            Request::Recover => "recover",
            Request::SwapRecover => "swap-recover",
        }
    }
}

/// Canonical list of requests.
pub const ALL_REQUESTS: [Request; 4] = [
    Request::Retract,
    Request::SwapRetract,
    Request::Recover,
    Request::SwapRecover,
];
