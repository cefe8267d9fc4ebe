#![allow(non_snake_case)]
use super::{BoundState, QpData, QpProblem};
use crate::algebra::*;

/// Read-only access to the columns of the KKT matrix for any active set.
///
/// Column `i` of the KKT matrix depends only on whether component `i` is
/// active:
///
/// ```text
///               inactive                 active
///  i <  nx   [H(:,i); A(:,i)]             e_i
///  i >= nx        -e_i            [AT(:,i-nx); 0]
/// ```
///
/// The system solved for a Newton step is the transpose of this matrix.
#[derive(Clone, Copy)]
pub struct KktView<'b, T> {
    prob: &'b QpProblem<T>,
    nz_h: &'b [T],
    nz_a: &'b [T],
    nz_at: &'b [T],
}

impl<'b, T> KktView<'b, T>
where
    T: FloatT,
{
    pub fn new(prob: &'b QpProblem<T>, nz_h: &'b [T], nz_a: &'b [T], nz_at: &'b [T]) -> Self {
        Self {
            prob,
            nz_h,
            nz_a,
            nz_at,
        }
    }

    /// Write column `i` for the active-set state `state` to `out`
    pub fn column(&self, out: &mut [T], i: usize, state: BoundState) {
        let p = self.prob;
        out.fill(T::zero());
        let active = state != BoundState::Free;
        if i < p.nx {
            if active {
                out[i] = T::one();
            } else {
                for (r, v) in p.H.view(self.nz_h).col(i) {
                    out[r] = v;
                }
                for (r, v) in p.A.view(self.nz_a).col(i) {
                    out[p.nx + r] = v;
                }
            }
        } else if active {
            for (r, v) in p.AT.view(self.nz_at).col(i - p.nx) {
                out[r] = v;
            }
        } else {
            out[i] = -T::one();
        }
    }

    /// Dot product of `v` with column `i` for the state `state`
    pub fn dot(&self, v: &[T], i: usize, state: BoundState) -> T {
        let p = self.prob;
        let active = state != BoundState::Free;
        if i < p.nx {
            if active {
                v[i]
            } else {
                p.H.view(self.nz_h).col_dot(i, v)
                    + p.A.view(self.nz_a).col_dot(i, &v[p.nx..])
            }
        } else if active {
            p.AT.view(self.nz_at).col_dot(i - p.nx, v)
        } else {
            -v[i]
        }
    }

    /// Dot product of `v` with the difference between the active and
    /// inactive variants of column `i`.  Flipping `i` changes the rank of
    /// a matrix with left null vector `v` only if this is nonzero.
    pub fn dot2(&self, v: &[T], i: usize) -> T {
        let p = self.prob;
        if i < p.nx {
            v[i] - p.H.view(self.nz_h).col_dot(i, v) - p.A.view(self.nz_a).col_dot(i, &v[p.nx..])
        } else {
            v[i] + p.AT.view(self.nz_at).col_dot(i - p.nx, v)
        }
    }
}

impl<'a, T> QpData<'a, T>
where
    T: FloatT,
{
    /// Column access to the KKT matrix with the current data
    pub fn kkt(&self) -> KktView<'_, T> {
        KktView::new(self.prob, self.nz_h, self.nz_a, &*self.nz_at)
    }

    /// Assemble the KKT matrix for the current active set
    pub fn kkt_assemble(&mut self) {
        let p = self.prob;
        let nz_kkt = &mut *self.nz_kkt;
        nz_kkt.fill(T::zero());

        for c in 0..p.nx {
            if self.lam[c] == T::zero() {
                for k in p.H.col_range(c) {
                    nz_kkt[p.h_to_kkt[k]] = self.nz_h[k];
                }
                for k in p.A.col_range(c) {
                    nz_kkt[p.a_to_kkt[k]] = self.nz_a[k];
                }
            } else {
                nz_kkt[p.kkt_diag[c]] = T::one();
            }
        }

        for j in 0..p.na {
            let i = p.nx + j;
            if self.lam[i] == T::zero() {
                nz_kkt[p.kkt_diag[i]] = -T::one();
            } else {
                for k in p.AT.col_range(j) {
                    nz_kkt[p.at_to_kkt[k]] = self.nz_at[k];
                }
            }
        }
    }

    /// Negative KKT residual, written to `dz`
    pub fn kkt_residual(&mut self) {
        let nx = self.prob.nx;
        for (i, r) in self.dz.iter_mut().enumerate() {
            let lam = self.lam[i];
            *r = if lam > T::zero() {
                self.ubz[i] - self.z[i]
            } else if lam < T::zero() {
                self.lbz[i] - self.z[i]
            } else if i < nx {
                lam - self.infeas[i]
            } else {
                lam
            };
        }
    }
}
