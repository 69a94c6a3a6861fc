/// Carriage-level Z lift owed to the matching recover.
///
/// Zero means no hop is outstanding. At most one lift is ever owed: `lift`
/// refuses to stack a second one.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct HopState {
    amount: f32,
}

impl HopState {
    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn is_outstanding(&self) -> bool {
        self.amount != 0.0
    }

    /// Record a lift of `z`. Returns false (and records nothing) if one is already owed.
    pub fn lift(&mut self, z: f32) -> bool {
        if self.is_outstanding() {
            return false;
        }
        self.amount += z;
        true
    }

    /// Clear the owed lift, returning it if there was one.
    pub fn take(&mut self) -> Option<f32> {
        if !self.is_outstanding() {
            return None;
        }
        Some(std::mem::take(&mut self.amount))
    }
}
