use std::ops::Range;

use blocks::board::{BoardProfile, PinRole};
use indexmap::IndexMap;

use crate::error::GenerationError;

/// One reservation of a physical pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinClaim {
    pub pin: String,
    pub role: PinRole,
    /// Human-readable use, e.g. "Servo Write".
    pub purpose: String,
    /// Block that made the claim, when known.
    pub claimant: Option<(String, Range<usize>)>,
}

impl PinClaim {
    pub fn new(pin: impl Into<String>, role: PinRole, purpose: impl Into<String>) -> Self {
        PinClaim {
            pin: pin.into(),
            role,
            purpose: purpose.into(),
            claimant: None,
        }
    }

    pub fn claimed_by(mut self, block_id: impl Into<String>, span: Range<usize>) -> Self {
        self.claimant = Some((block_id.into(), span));
        self
    }
}

/// Which role owns each pin for the duration of one pass.
/// Claims accumulate and are never released.
#[derive(Debug, Default)]
pub struct PinReservationTable {
    claims: IndexMap<String, PinClaim>,
}

impl PinReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(
        &mut self,
        board: &BoardProfile,
        pin: &str,
        role: PinRole,
        purpose: &str,
    ) -> Result<(), GenerationError> {
        self.claim(board, PinClaim::new(pin, role, purpose))
    }

    /// Record `claim`. The pin must be eligible for the role on `board`, and
    /// any earlier claim on it must hold the same role; a same-role claim is
    /// shared and leaves the first claim in place.
    pub fn claim(&mut self, board: &BoardProfile, claim: PinClaim) -> Result<(), GenerationError> {
        if !board.supports(claim.role, &claim.pin) {
            return Err(GenerationError::Capability {
                pin: claim.pin,
                role: claim.role,
                board: board.name.clone(),
            });
        }

        match self.claims.get(&claim.pin) {
            Some(existing) if existing.role != claim.role => Err(GenerationError::PinConflict {
                pin: claim.pin,
                existing_role: existing.role,
                existing_purpose: existing.purpose.clone(),
                role: claim.role,
                purpose: claim.purpose,
            }),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(claim.pin.clone(), claim);
                Ok(())
            }
        }
    }

    pub fn get(&self, pin: &str) -> Option<&PinClaim> {
        self.claims.get(pin)
    }

    /// Claims in the order they were first made.
    pub fn iter(&self) -> impl Iterator<Item = &PinClaim> {
        self.claims.values()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uno() -> BoardProfile {
        BoardProfile::builtin("uno").unwrap()
    }

    #[test]
    fn same_role_is_shared() {
        let board = uno();
        let mut table = PinReservationTable::new();
        table.reserve(&board, "9", PinRole::Servo, "Servo Write").unwrap();
        table.reserve(&board, "9", PinRole::Servo, "Servo Read").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("9").unwrap().purpose, "Servo Write");
    }

    #[test]
    fn different_role_conflicts() {
        let board = uno();
        let mut table = PinReservationTable::new();
        table.reserve(&board, "9", PinRole::Servo, "Servo Write").unwrap();
        let err = table
            .reserve(&board, "9", PinRole::DigitalOutput, "Digital Write")
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::PinConflict {
                pin: "9".into(),
                existing_role: PinRole::Servo,
                existing_purpose: "Servo Write".into(),
                role: PinRole::DigitalOutput,
                purpose: "Digital Write".into(),
            }
        );
        assert_eq!(table.get("9").unwrap().role, PinRole::Servo);
    }

    #[test]
    fn non_pwm_pin_cannot_drive_servo() {
        let board = uno();
        let mut table = PinReservationTable::new();
        let err = table.reserve(&board, "7", PinRole::Servo, "Servo Write").unwrap_err();
        assert_eq!(
            err,
            GenerationError::Capability {
                pin: "7".into(),
                role: PinRole::Servo,
                board: "uno".into(),
            }
        );
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_pin_fails_capability_before_conflict() {
        let board = uno();
        let mut table = PinReservationTable::new();
        table.reserve(&board, "13", PinRole::DigitalOutput, "Digital Write").unwrap();
        let err = table.reserve(&board, "13", PinRole::Servo, "Servo Write").unwrap_err();
        assert!(matches!(err, GenerationError::Capability { .. }));
    }

    #[test]
    fn claims_keep_first_use_order() {
        let board = uno();
        let mut table = PinReservationTable::new();
        table.reserve(&board, "A0", PinRole::AnalogInput, "Analogue Read").unwrap();
        table.reserve(&board, "3", PinRole::Pwm, "Analogue Write").unwrap();
        let pins: Vec<&str> = table.iter().map(|c| c.pin.as_str()).collect();
        assert_eq!(pins, vec!["A0", "3"]);
    }
}
