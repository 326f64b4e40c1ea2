use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Phase of the checkout dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CheckoutPhase {
    /// Dialog not shown
    #[default]
    Closed,
    /// Items and total shown with Buy / Continue shopping
    Reviewing,
    /// Purchase acknowledged; closes on its own
    Succeeded,
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Reviewing => write!(f, "reviewing"),
            Self::Succeeded => write!(f, "succeeded"),
        }
    }
}

impl FromStr for CheckoutPhase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closed" => Ok(Self::Closed),
            "reviewing" | "review" => Ok(Self::Reviewing),
            "succeeded" | "success" => Ok(Self::Succeeded),
            _ => anyhow::bail!(
                "invalid checkout phase '{}' (expected: closed, reviewing, succeeded)",
                s
            ),
        }
    }
}

/// Checkout dialog state machine: `Closed -> Reviewing -> Succeeded -> Closed`,
/// with `Reviewing -> Closed` on cancel.
///
/// Every opening starts a new generation, so an auto-close scheduled for one
/// purchase cannot close a dialog opened afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDialog {
    phase: CheckoutPhase,
    generation: u64,
}

impl CheckoutDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.phase != CheckoutPhase::Closed
    }

    /// Closed -> Reviewing.
    pub fn open(&mut self) -> bool {
        if self.phase != CheckoutPhase::Closed {
            return false;
        }
        self.generation += 1;
        self.phase = CheckoutPhase::Reviewing;
        true
    }

    /// Reviewing -> Closed, or an early dismiss of the success panel.
    pub fn cancel(&mut self) -> bool {
        if self.phase == CheckoutPhase::Closed {
            return false;
        }
        self.phase = CheckoutPhase::Closed;
        true
    }

    /// Reviewing -> Succeeded. Returns the generation to hand to the
    /// auto-close timer.
    pub fn succeed(&mut self) -> Option<u64> {
        if self.phase != CheckoutPhase::Reviewing {
            return None;
        }
        self.phase = CheckoutPhase::Succeeded;
        Some(self.generation)
    }

    /// Succeeded -> Closed, only for the generation that succeeded.
    pub fn finish(&mut self, generation: u64) -> bool {
        if self.phase != CheckoutPhase::Succeeded || self.generation != generation {
            return false;
        }
        self.phase = CheckoutPhase::Closed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut dialog = CheckoutDialog::new();
        assert_eq!(dialog.phase(), CheckoutPhase::Closed);

        assert!(dialog.open());
        assert_eq!(dialog.phase(), CheckoutPhase::Reviewing);

        let generation = dialog.succeed().unwrap();
        assert_eq!(dialog.phase(), CheckoutPhase::Succeeded);

        assert!(dialog.finish(generation));
        assert_eq!(dialog.phase(), CheckoutPhase::Closed);
    }

    #[test]
    fn test_cannot_skip_reviewing() {
        let mut dialog = CheckoutDialog::new();
        assert_eq!(dialog.succeed(), None);
        assert!(!dialog.finish(0));
        assert_eq!(dialog.phase(), CheckoutPhase::Closed);
    }

    #[test]
    fn test_succeed_only_once() {
        let mut dialog = CheckoutDialog::new();
        dialog.open();
        assert!(dialog.succeed().is_some());
        assert!(dialog.succeed().is_none());
    }

    #[test]
    fn test_cancel_from_reviewing() {
        let mut dialog = CheckoutDialog::new();
        dialog.open();
        assert!(dialog.cancel());
        assert_eq!(dialog.phase(), CheckoutPhase::Closed);
        assert!(!dialog.cancel());
    }

    #[test]
    fn test_open_while_open_is_rejected() {
        let mut dialog = CheckoutDialog::new();
        assert!(dialog.open());
        assert!(!dialog.open());
        assert_eq!(dialog.generation(), 1);
    }

    #[test]
    fn test_stale_finish_ignored_after_reopen() {
        let mut dialog = CheckoutDialog::new();
        dialog.open();
        let first = dialog.succeed().unwrap();
        dialog.cancel();

        dialog.open();
        let second = dialog.succeed().unwrap();
        assert!(!dialog.finish(first));
        assert_eq!(dialog.phase(), CheckoutPhase::Succeeded);
        assert!(dialog.finish(second));
    }

    #[test]
    fn test_phase_round_trips_through_str() {
        for phase in [
            CheckoutPhase::Closed,
            CheckoutPhase::Reviewing,
            CheckoutPhase::Succeeded,
        ] {
            assert_eq!(phase.to_string().parse::<CheckoutPhase>().unwrap(), phase);
        }
        assert!("paid".parse::<CheckoutPhase>().is_err());
    }
}
