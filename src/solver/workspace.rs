use super::{BoundKind, QpMessage, QpProblem};
use crate::algebra::*;

/// Bump allocator handing out consecutive sub-slices of a flat buffer.
///
/// Each call to [`take`](Arena::take) splits the front off the remaining
/// storage, so all slices produced by one arena are disjoint and share the
/// buffer's lifetime.
pub struct Arena<'a, E> {
    rest: &'a mut [E],
}

impl<'a, E> Arena<'a, E> {
    pub fn new(buf: &'a mut [E]) -> Self {
        Self { rest: buf }
    }

    /// Next `n` elements of the buffer.
    ///
    /// # Panics
    /// Panics if fewer than `n` elements remain.
    pub fn take(&mut self, n: usize) -> &'a mut [E] {
        let (head, tail) = std::mem::take(&mut self.rest).split_at_mut(n);
        self.rest = tail;
        head
    }
}

/// Solver state of one solve.
///
/// All vectors are slices of caller-owned flat buffers sized by
/// [`QpProblem::work_size`].  The state is exclusively owned by the solve
/// loop and no operation on it allocates.
pub struct QpData<'a, T> {
    /// problem descriptor
    pub prob: &'a QpProblem<T>,
    /// Hessian nonzeros
    pub nz_h: &'a [T],
    /// constraint Jacobian nonzeros
    pub nz_a: &'a [T],
    /// linear objective term
    pub g: &'a [T],

    /// objective value
    pub f: T,
    /// iterate, primal variables followed by constraint values
    pub z: &'a mut [T],
    pub lbz: &'a mut [T],
    pub ubz: &'a mut [T],
    /// multipliers.  The sign encodes the active bound.
    pub lam: &'a mut [T],
    /// search directions
    pub dz: &'a mut [T],
    pub dlam: &'a mut [T],
    /// dual infeasibility (Lagrangian gradient) and its tangent
    pub infeas: &'a mut [T],
    pub tinfeas: &'a mut [T],
    /// bound classification, computed at reset
    pub kind: &'a mut [BoundKind],

    /// transposed constraint Jacobian nonzeros
    pub nz_at: &'a mut [T],
    /// KKT matrix nonzeros
    pub nz_kkt: &'a mut [T],
    /// Householder scalars of the KKT factorization
    pub beta: &'a mut [T],
    // [V, R] factor nonzeros, or the staged transposed KKT matrix
    pub(crate) vr: &'a mut [T],

    // scratch
    pub(crate) w: &'a mut [T],
    pub(crate) y: &'a mut [T],
    pub(crate) iw: &'a mut [usize],
    pub(crate) qr_work: &'a mut [T],

    /// step length
    pub tau: T,
    /// the current factorization is singular
    pub sing: bool,
    /// smallest |diag(R)| and the KKT column attaining it
    pub mina: T,
    pub imina: usize,
    pub(crate) sing_step: usize,
    /// largest primal error and its index
    pub pr: T,
    pub ipr: Option<usize>,
    /// largest dual error and its index
    pub du: T,
    pub idu: Option<usize>,
    /// last recorded action
    pub msg: Option<QpMessage<T>>,
}

impl<'a, T> QpData<'a, T>
where
    T: FloatT,
{
    /// Partition the flat buffers into the solver state.
    ///
    /// `fbuf` and `ibuf` must be at least as long as reported by
    /// [`QpProblem::work_size`], and `kind` must have length `nz`.  Buffer
    /// contents are kept, so that an iterate stored by a previous solve
    /// on the same buffers serves as a warm start.
    pub fn new(
        prob: &'a QpProblem<T>,
        nz_h: &'a [T],
        nz_a: &'a [T],
        g: &'a [T],
        fbuf: &'a mut [T],
        ibuf: &'a mut [usize],
        kind: &'a mut [BoundKind],
    ) -> Self {
        let size = prob.work_size();
        assert!(fbuf.len() >= size.nf, "float workspace too small");
        assert!(ibuf.len() >= size.ni, "integer workspace too small");
        assert_eq!(kind.len(), prob.nz);
        assert_eq!(nz_h.len(), prob.H.nnz());
        assert_eq!(nz_a.len(), prob.A.nnz());
        assert_eq!(g.len(), prob.nx);

        let (nx, nz) = (prob.nx, prob.nz);
        let nnz_kkt = prob.kkt.nnz();
        let nnz_vr = usize::max(prob.qr.nnz_v() + prob.qr.nnz_r(), nnz_kkt);

        let mut fa = Arena::new(fbuf);
        let mut ia = Arena::new(ibuf);

        Self {
            prob,
            nz_h,
            nz_a,
            g,
            f: T::zero(),
            nz_kkt: fa.take(nnz_kkt),
            z: fa.take(nz),
            lbz: fa.take(nz),
            ubz: fa.take(nz),
            lam: fa.take(nz),
            dz: fa.take(nz),
            dlam: fa.take(nz),
            vr: fa.take(nnz_vr),
            beta: fa.take(nz),
            nz_at: fa.take(prob.A.nnz()),
            infeas: fa.take(nx),
            tinfeas: fa.take(nx),
            w: fa.take(nz + 1),
            y: fa.take(nz),
            qr_work: fa.take(prob.qr.work_len()),
            iw: ia.take(nz + 1),
            kind,
            tau: T::zero(),
            sing: false,
            mina: T::zero(),
            imina: 0,
            sing_step: 0,
            pr: T::zero(),
            ipr: None,
            du: T::zero(),
            idu: None,
            msg: None,
        }
    }

    /// both errors are within the tolerances
    pub fn converged(&self) -> bool {
        self.pr <= self.prob.tol_pr && self.du <= self.prob.tol_du
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_arena() {
        let mut buf = [0, 1, 2, 3, 4, 5];
        let mut arena = Arena::new(&mut buf);
        let a = arena.take(2);
        let b = arena.take(3);
        a[0] = 10;
        b[2] = 40;
        assert_eq!(a, &[10, 1]);
        assert_eq!(b, &[2, 3, 40]);
        assert_eq!(arena.take(0).len(), 0);
    }

    #[test]
    #[should_panic]
    fn test_arena_overflow() {
        let mut buf = [0.0; 3];
        let mut arena = Arena::new(&mut buf);
        arena.take(4);
    }
}
