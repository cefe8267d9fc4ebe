use super::{BoundKind, BoundState, KktView, QpData, QpError, QpMessage};
use crate::algebra::*;

/// Outcome of the rank test for a prospective active-set change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipCheck {
    /// the KKT matrix stays regular
    Regular,
    /// the KKT matrix would become singular.  Releasing the companion
    /// multiplier, if any, restores regularity.
    Singular(Option<usize>),
}

impl<'a, T> QpData<'a, T>
where
    T: FloatT,
{
    /// Prepare the state for a new solve.
    ///
    /// Classifies the bounds and moves the multipliers to the nearest
    /// admissible signs.  Fails if a component has equal but absent bounds.
    pub fn reset(&mut self) -> Result<(), QpError> {
        let p = self.prob;
        let dmin = p.dmin;
        self.msg = None;
        self.tau = T::zero();
        self.sing = false;

        for i in 0..p.nz {
            let (lb, ub, z) = (self.lbz[i], self.ubz[i], self.z[i]);
            let kind = BoundKind::classify(lb, ub, p.inf).ok_or(QpError::InfeasibleBounds(i))?;
            self.kind[i] = kind;

            let lam = self.lam[i];
            if kind.never_zero() && lam == T::zero() {
                self.lam[i] = if kind.never_upper() || z - lb <= ub - z {
                    -dmin
                } else {
                    dmin
                };
            } else if kind.never_upper() && lam > T::zero() {
                self.lam[i] = if kind.never_zero() { -dmin } else { T::zero() };
            } else if kind.never_lower() && lam < T::zero() {
                self.lam[i] = if kind.never_zero() { dmin } else { T::zero() };
            }
        }

        transpose_values(&p.at_map, self.nz_a, self.nz_at);
        Ok(())
    }

    /// Recompute the objective, the constraint values, the dual
    /// infeasibility and the errors from `z[:nx]` and `lam`.
    ///
    /// Multipliers of the simple bounds are set to the values that
    /// minimize the dual infeasibility, keeping their signs.
    pub fn calc_dependent(&mut self) {
        let p = self.prob;
        let (nx, dmin) = (p.nx, p.dmin);
        let H = p.H.view(self.nz_h);
        let A = p.A.view(self.nz_a);
        let half: T = (0.5).as_T();

        let (x, za) = self.z.split_at_mut(nx);
        self.f = half * H.bilinear(x, x) + x.dot(self.g);
        A.gemv(za, x, T::one(), T::zero());

        let infeas = &mut *self.infeas;
        infeas.copy_from(self.g);
        H.gemv(infeas, x, T::one(), T::one());
        A.gemv_t(infeas, &self.lam[nx..], T::one(), T::one());

        for (lam, v) in self.lam[..nx].iter_mut().zip(infeas.iter_mut()) {
            if *lam > T::zero() {
                *lam = T::max(-*v, dmin);
            } else if *lam < T::zero() {
                *lam = T::min(-*v, -dmin);
            }
            *v += *lam;
        }

        self.calc_pr();
        self.calc_du();
    }

    /// Test whether changing component `index` to `state` keeps the
    /// current KKT matrix regular.
    ///
    /// If the new column is a combination of the remaining ones, looks
    /// for an active multiplier whose release restores full rank,
    /// preferring the smallest resulting dual error not exceeding `e`.
    /// Requires a regular factorization of the current KKT matrix.
    pub fn flip_check(&mut self, index: usize, state: BoundState, e: T) -> FlipCheck {
        let p = self.prob;
        let nz = p.nz;
        let tol = p.sing_tol;
        let (nz_v, nz_r) = self.vr.split_at(p.qr.nnz_v());

        // express the new column through the current ones
        let kkt = KktView::new(p, self.nz_h, self.nz_a, &*self.nz_at);
        kkt.column(self.y, index, state);
        p.qr.solve(nz_v, nz_r, &*self.beta, self.y, self.qr_work);
        if T::abs(self.y[index]) >= tol {
            return FlipCheck::Regular;
        }

        // left null vector of the changed matrix
        let w = &mut self.w[..nz];
        w.fill(T::zero());
        w[index] = T::one();
        p.qr.solve_transposed(nz_v, nz_r, &*self.beta, w, self.qr_work);
        w.normalize();

        let kkt = self.kkt();
        let w = &self.w[..nz];
        let mut best = None;
        let mut best_du = T::infinity();
        for i in 0..nz {
            if i == index || self.lam[i] == T::zero() || self.kind[i].never_zero() {
                continue;
            }
            // column i takes part in the dependency
            if T::abs(self.y[i]) < tol {
                continue;
            }
            // and releasing it restores the rank
            if T::abs(kkt.dot2(w, i)) < tol {
                continue;
            }
            let new_du = self.du_check(i);
            if new_du <= e && new_du < best_du {
                best_du = new_du;
                best = Some(i);
            }
        }
        FlipCheck::Singular(best)
    }

    /// Change the active set.
    ///
    /// Applies, in order of preference, the regularity restoring change
    /// from [`calc_step`](QpData::calc_step), the blocking bound from
    /// [`linesearch`](QpData::linesearch), or a change that reduces the
    /// dominating error.  Returns `true` if the active set changed.
    ///
    /// A bound whose activation would make the KKT matrix singular, with
    /// no multiplier to release in exchange, is not activated.  The
    /// attempt is recorded as [`QpMessage::CannotEnforce`].
    pub fn flip(
        &mut self,
        blocking: Option<(usize, BoundState)>,
        regularity: Option<(usize, BoundState)>,
    ) -> bool {
        let p = self.prob;
        let e = T::max(p.du_to_pr * self.pr, self.du);
        let mut index = blocking;

        if let Some((i, state)) = regularity {
            if state != BoundState::Free || self.du_check(i) <= e {
                index = Some((i, state));
                self.msg = Some(QpMessage::RegularityFlip { index: i, state });
            }
        }

        if index.is_none() && !self.converged() && (self.ipr.is_some() || self.idu.is_some()) {
            index = if p.du_to_pr * self.pr >= self.du {
                self.pr_index()
            } else {
                self.du_index()
            };
        }

        let Some((i, state)) = index else {
            return false;
        };

        if !self.sing {
            if let FlipCheck::Singular(companion) = self.flip_check(i, state, e) {
                match (companion, state.bound()) {
                    (Some(r), _) => {
                        self.lam[r] = T::zero();
                        self.msg = Some(QpMessage::CompanionFlip {
                            index: i,
                            state,
                            companion: r,
                            lam: T::zero(),
                        });
                    }
                    (None, Some(bound)) => {
                        self.msg = Some(QpMessage::CannotEnforce { index: i, bound });
                        return false;
                    }
                    // releasing a bound cannot be prevented
                    (None, None) => {}
                }
            }
        }

        self.lam[i] = state.multiplier(p.dmin);
        self.calc_dependent();
        true
    }
}
