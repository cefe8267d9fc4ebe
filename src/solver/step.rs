#![allow(non_snake_case)]
use super::{Bound, BoundState, KktView, QpData, QpError, QpMessage};
use crate::algebra::*;
use crate::qr::QrRank;

// threshold for treating a search direction component as nonzero
const NONZERO_TOL: f64 = 1e-12;
// smallest admissible regularity step
const MIN_TAU: f64 = 1e-16;

impl<'a, T> QpData<'a, T>
where
    T: FloatT,
{
    /// Assemble and factorize the KKT matrix, then update the singularity
    /// indicators
    pub fn factorize(&mut self) {
        self.kkt_assemble();
        let rank = self.factor_kkt();
        self.sing = rank.nullity > 0;
        self.mina = rank.min_diag;
        self.imina = rank.min_col;
        self.sing_step = rank.min_step;
    }

    // factor the current contents of nz_kkt
    fn factor_kkt(&mut self) -> QrRank<T> {
        let p = self.prob;
        let (nz_v, nz_r) = self.vr.split_at_mut(p.qr.nnz_v());
        p.qr.factor(&*self.nz_kkt, nz_v, nz_r, self.beta, self.qr_work);
        p.qr.singular(&*nz_r, p.sing_tol)
    }

    /// Compute the primal-dual search direction.
    ///
    /// With a regular KKT matrix this is the Newton step, otherwise a
    /// null space direction scaled by [`scale_step`](QpData::scale_step).
    /// Returns the active-set change that restores regularity, if any.
    pub fn calc_step(&mut self) -> Result<Option<(usize, BoundState)>, QpError> {
        let p = self.prob;
        let nx = p.nx;

        if !self.sing {
            self.kkt_residual();
            let (nz_v, nz_r) = self.vr.split_at(p.qr.nnz_v());
            p.qr.solve_transposed(nz_v, nz_r, &*self.beta, self.dz, self.qr_work);
        } else {
            let nz_r = &self.vr[p.qr.nnz_v()..];
            p.qr.null_vector(nz_r, self.sing_step, p.sing_tol, self.dz);
        }

        let H = p.H.view(self.nz_h);
        let A = p.A.view(self.nz_a);

        // change in the Lagrangian gradient gives the step in lam[:nx]
        {
            let (dz_x, dz_a) = self.dz.split_at(nx);
            let dlam_x = &mut self.dlam[..nx];
            H.gemv(dlam_x, dz_x, -T::one(), T::zero());
            A.gemv_t(dlam_x, dz_a, -T::one(), T::one());
        }
        for (dl, &lam) in self.dlam[..nx].iter_mut().zip(&*self.lam) {
            if lam == T::zero() {
                *dl = T::zero();
            }
        }

        // step in lam[nx:] and z[nx:]
        {
            let (dz_x, dz_a) = self.dz.split_at_mut(nx);
            self.dlam[nx..].copy_from(dz_a);
            A.gemv(dz_a, dz_x, T::one(), T::zero());
        }
        self.dz.snap_to_zero(p.step_zero_tol);

        // tangent of the dual infeasibility
        let tinfeas = &mut *self.tinfeas;
        tinfeas.copy_from(&self.dlam[..nx]);
        H.gemv(tinfeas, &self.dz[..nx], T::one(), T::one());
        A.gemv_t(tinfeas, &self.dlam[nx..], T::one(), T::one());

        self.scale_step()
    }

    /// Scale a null space direction so that a unit step restores the
    /// regularity of the KKT matrix.
    ///
    /// Among the components whose flip increases the rank, picks the one
    /// reached by the shortest step along the direction without increasing
    /// `max(pr, du)`.  Quick return if the KKT matrix is regular.
    pub fn scale_step(&mut self) -> Result<Option<(usize, BoundState)>, QpError> {
        if !self.sing {
            return Ok(None);
        }
        let p = self.prob;
        let (nx, nz) = (p.nx, p.nz);
        let tol: T = NONZERO_TOL.as_T();
        let min_tau: T = MIN_TAU.as_T();

        // change in pr and du along the direction
        let tpr = match self.ipr {
            None => T::zero(),
            Some(i) if self.z[i] > self.ubz[i] => self.dz[i] / self.pr,
            Some(i) => -self.dz[i] / self.pr,
        };
        let tdu = match self.idu {
            None => T::zero(),
            Some(i) => self.tinfeas[i] / self.infeas[i],
        };

        // admissible signs of the step and change in max(pr, du)
        let (mut pos_ok, mut neg_ok) = (true, true);
        let terr;
        if self.pr > self.du {
            if tpr < T::zero() {
                neg_ok = false;
            } else if tpr > T::zero() {
                pos_ok = false;
            }
            terr = tpr;
        } else if self.pr < self.du {
            if tdu < T::zero() {
                neg_ok = false;
            } else if tdu > T::zero() {
                pos_ok = false;
            }
            terr = tdu;
        } else if (tpr > T::zero() && tdu < T::zero()) || (tpr < T::zero() && tdu > T::zero()) {
            pos_ok = false;
            neg_ok = false;
            terr = T::zero();
        } else if T::min(tpr, tdu) < T::zero() {
            neg_ok = false;
            terr = T::max(tpr, tdu);
        } else if T::max(tpr, tdu) > T::zero() {
            pos_ok = false;
            terr = T::min(tpr, tdu);
        } else {
            terr = T::zero();
        }

        // with a dominating primal error at an active bound, the
        // multiplier may only grow
        if p.du_to_pr * self.pr >= self.du {
            if let Some(i) = self.ipr {
                let (lam, dlam) = (self.lam[i], self.dlam[i]);
                if lam != T::zero() && T::abs(dlam) > tol {
                    if (lam > T::zero()) == (dlam > T::zero()) {
                        neg_ok = false;
                    } else {
                        pos_ok = false;
                    }
                }
            }
        }
        let wrong_way =
            |tt: T| (terr > T::zero() && tt > T::zero()) || (terr < T::zero() && tt < T::zero());

        // factorize the transpose to get left null vectors
        let nnz_kkt = p.kkt.nnz();
        transpose_values(&p.kkt_tmap, &*self.nz_kkt, &mut self.vr[..nnz_kkt]);
        self.nz_kkt.copy_from_slice(&self.vr[..nnz_kkt]);
        // the factorization of the KKT matrix itself is lost, but `sing` stays
        self.factor_kkt();

        let mut tau = p.inf;
        let mut best: Option<(usize, BoundState, QpMessage<T>)> = None;

        let (_, nz_r) = self.vr.split_at(p.qr.nnz_v());
        for step in p.qr.singular_steps(nz_r, p.sing_tol) {
            let w = &mut self.w[..nz];
            p.qr.null_vector(nz_r, step, p.sing_tol, w);
            let kkt = KktView::new(p, self.nz_h, self.nz_a, &*self.nz_at);

            for i in 0..nz {
                let lam = self.lam[i];
                let (dz, dlam) = (self.dz[i], self.dlam[i]);
                // the old column can be dropped without losing rank
                if T::abs(if i < nx { dz } else { dlam }) < tol {
                    continue;
                }
                // the rank increases only if w is not orthogonal to the change
                if T::abs(kkt.dot2(&*w, i)) < tol {
                    continue;
                }
                let kind = self.kind[i];

                if lam == T::zero() {
                    if T::abs(dz) < tol {
                        continue;
                    }
                    for bound in [Bound::Lower, Bound::Upper] {
                        let (never, target) = match bound {
                            Bound::Lower => (kind.never_lower(), self.lbz[i]),
                            Bound::Upper => (kind.never_upper(), self.ubz[i]),
                        };
                        if never {
                            continue;
                        }
                        let tt = (target - self.z[i]) / dz;
                        if wrong_way(tt) || T::abs(tt) < min_tau {
                            continue;
                        }
                        if T::abs(tt) < T::abs(tau) {
                            tau = tt;
                            let msg = QpMessage::EnforcedForRegularity { index: i, bound };
                            best = Some((i, bound.into(), msg));
                        }
                    }
                } else {
                    if T::abs(dlam) < tol || kind.never_zero() {
                        continue;
                    }
                    let tt = -lam / dlam;
                    if wrong_way(tt) {
                        continue;
                    }
                    if (tt > T::zero() && !pos_ok) || (tt < T::zero() && !neg_ok) {
                        continue;
                    }
                    if T::abs(tt) < T::abs(tau) {
                        tau = tt;
                        let bound = if lam > T::zero() {
                            Bound::Upper
                        } else {
                            Bound::Lower
                        };
                        let msg = QpMessage::DroppedForRegularity { index: i, bound };
                        best = Some((i, BoundState::Free, msg));
                    }
                }
            }
        }

        let Some((index, state, msg)) = best else {
            self.msg = Some(QpMessage::NoSearchDirection);
            return Err(QpError::NoSearchDirection);
        };
        self.msg = Some(msg);

        // a unit step now reaches the flip
        self.dz.scale(tau);
        self.dlam.scale(tau);
        self.tinfeas.scale(tau);
        Ok(Some((index, state)))
    }
}
