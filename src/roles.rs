// src/roles.rs - Maps detector handedness labels onto logical hand roles
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame::{Handedness, HandObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Drives cursor movement.
    Pointer,
    /// Drives click and drag gestures.
    Actor,
}

/// Single swap table from detector label to role.
///
/// The detector sees a mirror-flipped frame when `mirrored` is set, so its
/// "Left" is the user's physical right hand. Handedness is never re-derived
/// from geometry.
#[derive(Debug, Clone)]
pub struct RoleAssignor {
    pointer_label: Handedness,
    min_confidence: f64,
}

/// Hands selected for each role this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAssignment<'a> {
    pub pointer: Option<&'a HandObservation>,
    pub actor: Option<&'a HandObservation>,
}

impl RoleAssignor {
    /// `pointer_hand` is the user's physical hand that steers the cursor.
    pub fn new(mirrored: bool, pointer_hand: Handedness, min_confidence: f64) -> Self {
        let pointer_label = if mirrored {
            pointer_hand.opposite()
        } else {
            pointer_hand
        };
        Self {
            pointer_label,
            min_confidence,
        }
    }

    pub fn role_of(&self, label: Handedness) -> Role {
        if label == self.pointer_label {
            Role::Pointer
        } else {
            Role::Actor
        }
    }

    /// Assigns roles in frame order. A second hand carrying an already-used
    /// label is ignored for this frame; hands under the confidence floor are
    /// treated as absent.
    pub fn assign<'a>(&self, hands: &'a [HandObservation]) -> RoleAssignment<'a> {
        let mut assignment = RoleAssignment::default();

        for (i, hand) in hands.iter().enumerate() {
            if hand.confidence < self.min_confidence {
                debug!("Hand {} below confidence floor ({:.2})", i, hand.confidence);
                continue;
            }

            let slot = match self.role_of(hand.handedness) {
                Role::Pointer => &mut assignment.pointer,
                Role::Actor => &mut assignment.actor,
            };

            if slot.is_some() {
                debug!("Hand {} repeats label {:?}, ignored this frame", i, hand.handedness);
                continue;
            }
            *slot = Some(hand);
        }

        assignment
    }
}

impl<'a> RoleAssignment<'a> {
    pub fn get(&self, role: Role) -> Option<&'a HandObservation> {
        match role {
            Role::Pointer => self.pointer,
            Role::Actor => self.actor,
        }
    }
}
