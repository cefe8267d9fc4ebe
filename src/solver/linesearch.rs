use super::{Bound, BoundState, QpData, QpMessage};
use crate::algebra::*;

impl<'a, T> QpData<'a, T>
where
    T: FloatT,
{
    /// A bound that is already violated by more than `e` and that the
    /// step would violate further.  The last such component wins.
    pub fn zero_blocking(&mut self, e: T) -> Option<(usize, Bound)> {
        let mut out = None;
        for i in 0..self.prob.nz {
            let (z, dz) = (self.z[i], self.dz[i]);
            if -dz > T::zero() && z <= self.lbz[i] - e {
                out = Some((i, Bound::Lower));
            } else if dz > T::zero() && z >= self.ubz[i] + e {
                out = Some((i, Bound::Upper));
            }
        }
        if let Some((index, bound)) = out {
            self.msg = Some(QpMessage::ViolatedAtZero { index, bound });
        }
        out
    }

    /// Shorten `tau` so that no bound is violated by more than `e`.
    ///
    /// Returns the bound that blocks the step if it is inactive and
    /// should be enforced.
    pub fn primal_blocking(&mut self, e: T) -> Option<(usize, BoundState)> {
        if let Some((i, bound)) = self.zero_blocking(e) {
            self.tau = T::zero();
            return Some((i, bound.into()));
        }

        let mut blocking = None;
        for i in 0..self.prob.nz {
            let dz = self.dz[i];
            if dz == T::zero() {
                continue;
            }
            let (z, lam) = (self.z[i], self.lam[i]);
            let trial = z + self.tau * dz;
            if dz < T::zero() && trial < self.lbz[i] - e {
                self.tau = (self.lbz[i] - e - z) / dz;
                blocking = (lam >= T::zero()).then_some((i, BoundState::Lower));
                self.msg = Some(QpMessage::Enforcing {
                    index: i,
                    bound: Bound::Lower,
                });
            } else if dz > T::zero() && trial > self.ubz[i] + e {
                self.tau = (self.ubz[i] + e - z) / dz;
                blocking = (lam <= T::zero()).then_some((i, BoundState::Upper));
                self.msg = Some(QpMessage::Enforcing {
                    index: i,
                    bound: Bound::Upper,
                });
            }
            if self.tau <= T::zero() {
                break;
            }
        }
        blocking
    }

    /// Sorted step lengths in `[0, tau]` at which an active multiplier
    /// crosses zero, stored in `w` with the components in `iw`.  The
    /// interval end `tau` is always the last entry.  Returns the number
    /// of entries.
    pub fn dual_breakpoints(&mut self, tau: T) -> usize {
        self.w[0] = tau;
        let mut n = 1;
        for i in 0..self.prob.nz {
            let (lam, dlam) = (self.lam[i], self.dlam[i]);
            if dlam == T::zero() || lam == T::zero() {
                continue;
            }
            let trial = lam + tau * dlam;
            let crosses = if lam > T::zero() {
                trial < T::zero()
            } else {
                trial > T::zero()
            };
            if !crosses {
                continue;
            }
            let new_tau = -lam / dlam;
            let loc = self.w[..n - 1]
                .iter()
                .position(|&t| new_tau < t)
                .unwrap_or(n - 1);
            self.w.copy_within(loc..n, loc + 1);
            self.iw.copy_within(loc..n, loc + 1);
            self.w[loc] = new_tau;
            self.iw[loc] = i;
            n += 1;
        }
        n
    }

    /// Shorten `tau` so that the dual infeasibility of no primal variable
    /// exceeds `e`, following the piecewise linear path through the
    /// multiplier sign changes.  Returns the blocking primal variable.
    ///
    /// `infeas` and `tinfeas` are advanced along the path and must be
    /// recomputed afterwards.
    pub fn dual_blocking(&mut self, e: T) -> Option<usize> {
        let nx = self.prob.nx;
        let n_tau = self.dual_breakpoints(self.tau);
        let mut blocking = None;
        let mut tau_k = T::zero();

        for j in 0..n_tau {
            let dtau = self.w[j] - tau_k;
            for k in 0..nx {
                let new_infeas = self.infeas[k] + dtau * self.tinfeas[k];
                if T::abs(new_infeas) > e {
                    let target = if new_infeas > T::zero() { e } else { -e };
                    let tau1 = T::max(
                        T::zero(),
                        tau_k + (target - self.infeas[k]) / self.tinfeas[k],
                    );
                    if tau1 < self.tau {
                        self.tau = tau1;
                        blocking = Some(k);
                    }
                }
            }
            self.infeas
                .axpby(T::min(self.tau - tau_k, dtau), &*self.tinfeas, T::one());

            if let Some(k) = blocking {
                self.msg = Some(QpMessage::DualBlocking(k));
                return blocking;
            }
            if j == n_tau - 1 {
                break;
            }

            // multiplier i changes sign at the breakpoint
            tau_k = self.w[j];
            let i = self.iw[j];
            if !self.kind[i].never_zero() {
                if i < nx {
                    self.tinfeas[i] -= self.dlam[i];
                } else {
                    let at = self.prob.AT.view(&*self.nz_at);
                    for (row, v) in at.col(i - nx) {
                        self.tinfeas[row] -= v * self.dlam[i];
                    }
                }
            }
        }
        blocking
    }

    /// Find the step length and take the step.
    ///
    /// The primal error may grow to `max(pr, du/du_to_pr)` and the dual
    /// error to `max(du_to_pr*pr, du)`.  Returns the bound to enforce if
    /// the step is blocked by an inactive primal bound.
    pub fn linesearch(&mut self) -> Option<(usize, BoundState)> {
        let du_to_pr = self.prob.du_to_pr;
        self.tau = T::one();
        let mut blocking = self.primal_blocking(T::max(self.pr, self.du / du_to_pr));
        if self.dual_blocking(T::max(self.pr * du_to_pr, self.du)).is_some() {
            blocking = None;
        }
        self.take_step();
        blocking
    }

    /// Advance `z` and `lam` by `tau` along the search direction without
    /// changing which multipliers are zero.  Multipliers of fixed
    /// components may switch sign.
    pub fn take_step(&mut self) {
        let (tau, dmin) = (self.tau, self.prob.dmin);
        for i in 0..self.prob.nz {
            let mut state = BoundState::of(self.lam[i]);
            self.z[i] += tau * self.dz[i];
            self.lam[i] += tau * self.dlam[i];
            if self.kind[i].never_zero() && BoundState::of(self.lam[i]) == state.opposite() {
                state = state.opposite();
            }
            self.lam[i] = state.clamp(self.lam[i], dmin);
        }
    }
}
