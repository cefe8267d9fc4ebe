use super::{BoundState, QpData, QpMessage};
use crate::algebra::*;
use itertools::izip;

impl<'a, T> QpData<'a, T>
where
    T: FloatT,
{
    /// Largest bound violation over all components and its index.
    /// A later component replaces the running maximum only if it is
    /// strictly larger.
    pub fn calc_pr(&mut self) {
        let mut pr = T::zero();
        let mut ipr = None;
        for (i, (&z, &lb, &ub)) in izip!(&*self.z, &*self.lbz, &*self.ubz).enumerate() {
            if z > ub + pr {
                pr = z - ub;
                ipr = Some(i);
            } else if z < lb - pr {
                pr = lb - z;
                ipr = Some(i);
            }
        }
        self.pr = pr;
        self.ipr = ipr;
    }

    /// Largest dual infeasibility over the primal variables and its index
    pub fn calc_du(&mut self) {
        let mut du = T::zero();
        let mut idu = None;
        for (i, &v) in self.infeas.iter().enumerate() {
            if v > du {
                du = v;
                idu = Some(i);
            } else if v < -du {
                du = -v;
                idu = Some(i);
            }
        }
        self.du = du;
        self.idu = idu;
    }

    /// Activate the most violated bound, if it is not active already
    pub fn pr_index(&mut self) -> Option<(usize, BoundState)> {
        let i = self.ipr?;
        if self.lam[i] != T::zero() {
            return None;
        }
        let state = if self.z[i] < self.lbz[i] {
            BoundState::Lower
        } else {
            BoundState::Upper
        };
        self.msg = Some(QpMessage::AddedForPrimal(i));
        Some((i, state))
    }

    /// Largest dual infeasibility that setting `lam[i] = 0` would cause
    /// among the affected primal variables
    pub fn du_check(&self, i: usize) -> T {
        let nx = self.prob.nx;
        if i < nx {
            T::abs(self.infeas[i] - self.lam[i])
        } else {
            let at = self.prob.AT.view(&*self.nz_at);
            at.col(i - nx).fold(T::zero(), |acc, (row, v)| {
                T::max(acc, T::abs(self.infeas[row] - v * self.lam[i]))
            })
        }
    }

    /// Release the active bound with the strongest influence on the
    /// largest dual infeasibility, among those whose release moves it
    /// in the right direction without exceeding the current `du`
    pub fn du_index(&mut self) -> Option<(usize, BoundState)> {
        let idu = self.idu?;
        let (nx, nz) = (self.prob.nx, self.prob.nz);

        // sensitivity of infeas[idu] to each multiplier
        let w = &mut self.w[0..nz];
        w.fill(T::zero());
        w[idu] = if self.infeas[idu] > T::zero() {
            -T::one()
        } else {
            T::one()
        };
        let (wx, wa) = w.split_at_mut(nx);
        self.prob.A.view(self.nz_a).gemv(wa, wx, T::one(), T::zero());

        let mut best: Option<usize> = None;
        let mut best_w = T::zero();
        for i in 0..nz {
            let wi = self.w[i];
            let lam = self.lam[i];
            if wi == T::zero() || self.kind[i].never_zero() {
                continue;
            }
            // removal must decrease the infeasibility
            if (wi > T::zero() && lam >= T::zero()) || (wi < T::zero() && lam <= T::zero()) {
                continue;
            }
            if self.du_check(i) > self.du {
                continue;
            }
            if T::abs(wi) > best_w {
                best_w = T::abs(wi);
                best = Some(i);
            }
        }

        let i = best?;
        self.msg = Some(QpMessage::RemovedForDual(i));
        Some((i, BoundState::Free))
    }
}
