use super::{Bound, BoundState};
use crate::algebra::FloatT;

/// Annotation of the action taken in an iteration.
///
/// Messages are recorded by the engine operations as they make decisions
/// and are displayed in the iteration log.  Only the most recent message
/// is retained.
#[derive(PartialEq, Clone, Debug, Copy)]
pub enum QpMessage<T> {
    /// the current iterate already violates a bound and the step does not improve it
    ViolatedAtZero { index: usize, bound: Bound },
    /// the primal step is blocked by a bound
    Enforcing { index: usize, bound: Bound },
    /// the dual infeasibility of a primal variable blocks the step
    DualBlocking(usize),
    /// a violated bound was activated
    AddedForPrimal(usize),
    /// an active bound was released
    RemovedForDual(usize),
    /// an inactive bound is to be activated to restore regularity
    EnforcedForRegularity { index: usize, bound: Bound },
    /// an active bound is to be released to restore regularity
    DroppedForRegularity { index: usize, bound: Bound },
    /// the active set was changed to restore regularity
    RegularityFlip { index: usize, state: BoundState },
    /// a second multiplier was changed to keep the KKT matrix regular
    CompanionFlip {
        index: usize,
        state: BoundState,
        companion: usize,
        lam: T,
    },
    /// activating the bound would make the KKT matrix singular
    CannotEnforce { index: usize, bound: Bound },
    /// singular KKT matrix without a rank restoring candidate
    NoSearchDirection,
}

impl<T: FloatT> std::fmt::Display for QpMessage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            QpMessage::ViolatedAtZero { index, bound } => {
                write!(f, "{}[{}] violated at 0", bound, index)
            }
            QpMessage::Enforcing { index, bound } => write!(f, "Enforcing {}[{}]", bound, index),
            QpMessage::DualBlocking(k) => write!(f, "du[{}] blocking", k),
            QpMessage::AddedForPrimal(i) => write!(f, "Added {} to reduce |pr|", i),
            QpMessage::RemovedForDual(i) => write!(f, "Removed {} to reduce |du|", i),
            QpMessage::EnforcedForRegularity { index, bound } => {
                write!(f, "Enforced {}[{}] for regularity", bound, index)
            }
            QpMessage::DroppedForRegularity { index, bound } => {
                write!(f, "Dropped {}[{}] for regularity", bound, index)
            }
            QpMessage::RegularityFlip { index, state } => {
                write!(f, "{}->{} for regularity", index, state)
            }
            QpMessage::CompanionFlip {
                index,
                state,
                companion,
                lam,
            } => write!(f, "{}->{}, {}->{}", index, state, companion, lam),
            QpMessage::CannotEnforce { index, bound } => {
                write!(f, "Cannot enforce {}[{}]", bound, index)
            }
            QpMessage::NoSearchDirection => write!(f, "No search direction"),
        }
    }
}

#[test]
fn test_message_display() {
    let msg = QpMessage::<f64>::Enforcing {
        index: 3,
        bound: Bound::Lower,
    };
    assert_eq!(msg.to_string(), "Enforcing lbz[3]");

    let msg = QpMessage::<f64>::DroppedForRegularity {
        index: 7,
        bound: Bound::Upper,
    };
    assert_eq!(msg.to_string(), "Dropped ubz[7] for regularity");

    let msg = QpMessage::<f64>::RegularityFlip {
        index: 2,
        state: BoundState::Lower,
    };
    assert_eq!(msg.to_string(), "2->-1 for regularity");

    let msg = QpMessage::CompanionFlip {
        index: 1,
        state: BoundState::Upper,
        companion: 4,
        lam: 0.0,
    };
    assert_eq!(msg.to_string(), "1->1, 4->0");

    assert_eq!(
        QpMessage::<f64>::AddedForPrimal(5).to_string(),
        "Added 5 to reduce |pr|"
    );
    assert_eq!(
        QpMessage::<f64>::NoSearchDirection.to_string(),
        "No search direction"
    );
}
