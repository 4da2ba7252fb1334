//! Auto-rotation state for a globe session

/// Session-level auto-rotation state.
///
/// The only transition is `AutoRotating -> Stopped`. Nothing re-enables
/// rotation once it has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRotation {
    AutoRotating,
    Stopped,
}

impl AutoRotation {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self::AutoRotating
        } else {
            Self::Stopped
        }
    }

    #[cfg(test)]
    pub fn is_rotating(self) -> bool {
        matches!(self, Self::AutoRotating)
    }

    /// Stop rotating. Returns `true` only for the call that made the transition.
    pub fn stop(&mut self) -> bool {
        match self {
            Self::AutoRotating => {
                *self = Self::Stopped;
                true
            }
            Self::Stopped => false,
        }
    }
}
