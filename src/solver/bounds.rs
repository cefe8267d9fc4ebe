use crate::algebra::FloatT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of an augmented variable by its bounds.
///
/// The kind determines which multiplier signs are ever permitted for the
/// component, and is computed once per solve from `lbz` and `ubz`.
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum BoundKind {
    /// both bounds absent
    #[default]
    Free,
    /// only the lower bound is present
    LowerOnly,
    /// only the upper bound is present
    UpperOnly,
    /// both bounds present and distinct
    Boxed,
    /// equal bounds (equality constraint)
    Fixed,
}

impl BoundKind {
    /// Classify a bound pair.  Returns `None` if the bounds are equal but
    /// absent, in which case no multiplier sign is admissible.
    pub fn classify<T: FloatT>(lb: T, ub: T, inf: T) -> Option<Self> {
        let no_lower = T::abs(lb) >= inf;
        let no_upper = T::abs(ub) >= inf;
        match (lb == ub, no_lower, no_upper) {
            (true, true, true) => None,
            (true, _, _) => Some(BoundKind::Fixed),
            (false, true, true) => Some(BoundKind::Free),
            (false, false, true) => Some(BoundKind::LowerOnly),
            (false, true, false) => Some(BoundKind::UpperOnly),
            (false, false, false) => Some(BoundKind::Boxed),
        }
    }

    /// the multiplier can never be zero
    #[inline]
    pub fn never_zero(&self) -> bool {
        matches!(self, BoundKind::Fixed)
    }

    /// the lower bound can never be active
    #[inline]
    pub fn never_lower(&self) -> bool {
        matches!(self, BoundKind::Free | BoundKind::UpperOnly)
    }

    /// the upper bound can never be active
    #[inline]
    pub fn never_upper(&self) -> bool {
        matches!(self, BoundKind::Free | BoundKind::LowerOnly)
    }

    /// true if the state is admissible for this kind
    pub fn admits(&self, state: BoundState) -> bool {
        match state {
            BoundState::Free => !self.never_zero(),
            BoundState::Lower => !self.never_lower(),
            BoundState::Upper => !self.never_upper(),
        }
    }
}

/// Active-set state of a component, encoded by the sign of its multiplier
#[repr(i8)]
#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy)]
pub enum BoundState {
    /// lower bound active, `lam < 0`
    Lower = -1,
    /// no bound active, `lam == 0`
    Free = 0,
    /// upper bound active, `lam > 0`
    Upper = 1,
}

impl BoundState {
    #[inline]
    pub fn of<T: FloatT>(lam: T) -> Self {
        if lam > T::zero() {
            BoundState::Upper
        } else if lam < T::zero() {
            BoundState::Lower
        } else {
            BoundState::Free
        }
    }

    /// the state with the opposite bound active
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            BoundState::Lower => BoundState::Upper,
            BoundState::Upper => BoundState::Lower,
            BoundState::Free => BoundState::Free,
        }
    }

    /// smallest multiplier representing this state
    #[inline]
    pub fn multiplier<T: FloatT>(self, dmin: T) -> T {
        match self {
            BoundState::Lower => -dmin,
            BoundState::Free => T::zero(),
            BoundState::Upper => dmin,
        }
    }

    /// clamp `lam` into the range representing this state
    #[inline]
    pub fn clamp<T: FloatT>(self, lam: T, dmin: T) -> T {
        match self {
            BoundState::Lower => T::min(lam, -dmin),
            BoundState::Free => T::zero(),
            BoundState::Upper => T::max(lam, dmin),
        }
    }

    /// the bound made active by this state, if any
    pub fn bound(self) -> Option<Bound> {
        match self {
            BoundState::Lower => Some(Bound::Lower),
            BoundState::Free => None,
            BoundState::Upper => Some(Bound::Upper),
        }
    }
}

impl std::fmt::Display for BoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", *self as i8)
    }
}

/// One side of a box bound
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bound {
    Lower,
    Upper,
}

impl From<Bound> for BoundState {
    fn from(b: Bound) -> Self {
        match b {
            Bound::Lower => BoundState::Lower,
            Bound::Upper => BoundState::Upper,
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Bound::Lower => write!(f, "lbz"),
            Bound::Upper => write!(f, "ubz"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify() {
        let inf = f64::INFINITY;
        assert_eq!(BoundKind::classify(-inf, inf, inf), Some(BoundKind::Free));
        assert_eq!(BoundKind::classify(0., inf, inf), Some(BoundKind::LowerOnly));
        assert_eq!(BoundKind::classify(-inf, 0., inf), Some(BoundKind::UpperOnly));
        assert_eq!(BoundKind::classify(-1., 1., inf), Some(BoundKind::Boxed));
        assert_eq!(BoundKind::classify(2., 2., inf), Some(BoundKind::Fixed));
        assert_eq!(BoundKind::classify(inf, inf, inf), None);
        assert_eq!(BoundKind::classify(-inf, -inf, inf), None);

        // crossed bounds are still a box
        assert_eq!(BoundKind::classify(5., 2., inf), Some(BoundKind::Boxed));

        // finite infinity
        assert_eq!(BoundKind::classify(-1e20, 1e20, 1e20), Some(BoundKind::Free));
    }

    #[test]
    fn test_admissible_states() {
        assert!(!BoundKind::Fixed.admits(BoundState::Free));
        assert!(BoundKind::Fixed.admits(BoundState::Lower));
        assert!(BoundKind::Fixed.admits(BoundState::Upper));
        assert!(BoundKind::Free.admits(BoundState::Free));
        assert!(!BoundKind::Free.admits(BoundState::Upper));
        assert!(!BoundKind::LowerOnly.admits(BoundState::Upper));
        assert!(!BoundKind::UpperOnly.admits(BoundState::Lower));
    }

    #[test]
    fn test_state_clamp() {
        let dmin = 1e-10;
        assert_eq!(BoundState::of(-3.0), BoundState::Lower);
        assert_eq!(BoundState::of(0.0), BoundState::Free);
        assert_eq!(BoundState::Upper.clamp(-1.0, dmin), dmin);
        assert_eq!(BoundState::Lower.clamp(2.0, dmin), -dmin);
        assert_eq!(BoundState::Lower.clamp(-2.0, dmin), -2.0);
        assert_eq!(BoundState::Free.clamp(2.0, dmin), 0.0);
        assert_eq!(BoundState::Lower.opposite(), BoundState::Upper);
        assert_eq!(BoundState::Upper.to_string(), "1");
        assert_eq!(Bound::Lower.to_string(), "lbz");
    }
}
