//! Per-run limiter state of the limited elements.

use crate::error::{LimiterError, Result};
use crate::mesh::LimitedPlusConnect;
use crate::operators::SubcellConnect;
use crate::types::{DofsDg, DofsSc, DofsSf, Extrema, LimitedIndex, RunMask, empty_extrema};

use super::kernels;

/// Limiting state of one (element, run) pair within a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Candidate accepted as-is.
    Dg,
    /// Candidate rejected; the run is recomputed with subcells.
    CandidateRejected,
    /// The projected subcell solution passed the admissibility check.
    LimitedAccepted,
    /// The projection failed the check; the run stays in subcell form.
    LimitedRetained,
    /// Locked runs stay in subcell form whatever the check says.
    LimitedLocked,
}

impl RunState {
    /// State at the start of a step. Locked runs always start rejected.
    #[inline]
    pub fn initial(adm_cand: bool, locked: bool) -> Self {
        if adm_cand && !locked {
            RunState::Dg
        } else {
            RunState::CandidateRejected
        }
    }

    /// Transition out of [`RunState::CandidateRejected`] after the
    /// admissibility check of the projection; other states are terminal.
    #[inline]
    pub fn resolve(self, adm_projection: bool, locked: bool) -> Self {
        match self {
            RunState::CandidateRejected if locked => RunState::LimitedLocked,
            RunState::CandidateRejected if adm_projection => RunState::LimitedAccepted,
            RunState::CandidateRejected => RunState::LimitedRetained,
            terminal => terminal,
        }
    }

    /// True if the step ends with a DG representation neighbors may trust.
    #[inline]
    pub fn is_admissible(self) -> bool {
        matches!(self, RunState::Dg | RunState::LimitedAccepted)
    }

    /// True if the run was limited this step.
    #[inline]
    pub fn is_limited(self) -> bool {
        !matches!(self, RunState::Dg)
    }
}

/// Subcell solutions, admissibility, extrema and counters of the limited
/// elements.
///
/// Tables are indexed by limited id, except the extrema, which are indexed by
/// extrema id.
#[derive(Clone, Debug)]
pub struct LimitedState<const F: usize, const SC: usize, const SF: usize, const Q: usize, const R: usize>
{
    /// Subcell solution.
    pub dofs_sc: Vec<DofsSc<Q, SC, R>>,
    /// Subcells adjacent to each face, as of the previous step.
    pub t_dofs_sc: Vec<[DofsSf<Q, SF, R>; F]>,
    /// Admissibility of the previous solution.
    pub adm_prev: Vec<RunMask<R>>,
    /// Admissibility of the candidate solution.
    pub adm_cand: Vec<RunMask<R>>,
    /// Admissibility of the limited solution.
    pub adm_limited: Vec<RunMask<R>>,
    /// Extrema of the previous solution.
    pub ext_prev: Vec<Extrema<Q, R>>,
    /// Extrema of the limited solution.
    pub ext_limited: Vec<Extrema<Q, R>>,
    /// Runs that must stay in subcell form.
    pub lock: Vec<RunMask<R>>,
    /// Limiting events since the last synchronization.
    pub lim_sync: Vec<[u32; R]>,
}

impl<const F: usize, const SC: usize, const SF: usize, const Q: usize, const R: usize>
    LimitedState<F, SC, SF, Q, R>
{
    /// Size the state for a limited-plus set.
    ///
    /// Every run starts admissible and unlocked, subcells at zero and extrema
    /// empty.
    pub fn new(conn: &LimitedPlusConnect<F>) -> Result<Self> {
        let n_li = conn.n_limited();
        let n_ex = conn.n_extrema();
        if conn.li_ex.len() != n_li {
            return Err(LimiterError::length_mismatch("li_ex", n_li, conn.li_ex.len()));
        }
        if conn.li_ve_ex.len() != n_li + 1 {
            return Err(LimiterError::length_mismatch(
                "li_ve_ex",
                n_li + 1,
                conn.li_ve_ex.len(),
            ));
        }
        if let Some(ex) = conn
            .li_ex
            .iter()
            .chain(&conn.ve_ex)
            .chain(conn.lp_ex.iter().flatten())
            .find(|ex| ex.get() >= n_ex)
        {
            return Err(LimiterError::InvalidConnectivity(format!(
                "extrema id {ex} exceeds {n_ex} records"
            )));
        }

        Ok(Self {
            dofs_sc: vec![[[[0.0; R]; SC]; Q]; n_li],
            t_dofs_sc: vec![[[[[0.0; R]; SF]; Q]; F]; n_li],
            adm_prev: vec![[true; R]; n_li],
            adm_cand: vec![[true; R]; n_li],
            adm_limited: vec![[true; R]; n_li],
            ext_prev: vec![empty_extrema(); n_ex],
            ext_limited: vec![empty_extrema(); n_ex],
            lock: vec![[false; R]; n_li],
            lim_sync: vec![[0; R]; n_li],
        })
    }

    /// Number of limited elements.
    pub fn n_limited(&self) -> usize {
        self.dofs_sc.len()
    }

    /// Candidate admissibility with locked runs treated as rejected.
    #[inline]
    pub fn effective_candidate(&self, li: LimitedIndex) -> RunMask<R> {
        let mut adm = self.adm_cand[li];
        for (a, &l) in adm.iter_mut().zip(&self.lock[li]) {
            *a &= !l;
        }
        adm
    }

    /// Lock run `run` of `li` into subcell form.
    pub fn lock_run(&mut self, li: LimitedIndex, run: usize) {
        self.lock[li][run] = true;
    }

    /// Zero the limiting counters at a synchronization point.
    pub fn reset_sync(&mut self) {
        self.lim_sync.iter_mut().for_each(|c| *c = [0; R]);
    }

    /// Copy the face-adjacent subcells of every limited element into
    /// `t_dofs_sc`.
    pub fn store_face_subcells(&mut self, connect: &SubcellConnect<F, SC, SF>) {
        for (dofs_sc, t_dofs_sc) in self.dofs_sc.iter().zip(self.t_dofs_sc.iter_mut()) {
            for (fa, face) in t_dofs_sc.iter_mut().enumerate() {
                for q in 0..Q {
                    for sf in 0..SF {
                        face[q][sf] = dofs_sc[q][connect.fa_sc[fa][sf]];
                    }
                }
            }
        }
    }

    /// Write the extrema of the DG solutions `dofs` (indexed by dense element
    /// id) to every extrema record of `ext_limited`.
    ///
    /// Called with the candidate solution before the limiter runs; the
    /// limiter then overwrites the records of the runs it limits or rolls
    /// back.
    pub fn record_extrema<const M: usize>(
        &mut self,
        conn: &LimitedPlusConnect<F>,
        dofs: &[DofsDg<Q, M, R>],
        scatter: &[[f64; SC]; M],
    ) {
        let mut scratch = [[[0.0; R]; SC]; Q];
        for (ext, &el) in self.ext_limited.iter_mut().zip(&conn.ex_el) {
            *ext = kernels::dg_extrema(&dofs[el], scatter, &mut scratch);
        }
    }

    /// Initialize previous and limited extrema from the DG solutions `dofs`.
    pub fn init_extrema<const M: usize>(
        &mut self,
        conn: &LimitedPlusConnect<F>,
        dofs: &[DofsDg<Q, M, R>],
        scatter: &[[f64; SC]; M],
    ) {
        self.record_extrema(conn, dofs, scatter);
        self.ext_prev.clone_from(&self.ext_limited);
    }

    /// Promote the limited admissibility and extrema to "previous" and
    /// refresh the stored face subcells, ready for the next step.
    pub fn advance(&mut self, connect: &SubcellConnect<F, SC, SF>) {
        self.adm_prev.clone_from(&self.adm_limited);
        self.ext_prev.clone_from(&self.ext_limited);
        self.store_face_subcells(connect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::LineMesh;
    use crate::operators::line_reference;

    fn conn() -> LimitedPlusConnect<2> {
        let mesh = LineMesh::uniform(0.0, 1.0, 4).unwrap().adjacency().unwrap();
        LimitedPlusConnect::build(&[false, true, true, false], &mesh).unwrap()
    }

    #[test]
    fn test_run_state_transitions() {
        assert_eq!(RunState::initial(true, false), RunState::Dg);
        assert_eq!(RunState::initial(false, false), RunState::CandidateRejected);
        assert_eq!(RunState::initial(true, true), RunState::CandidateRejected);

        let rejected = RunState::CandidateRejected;
        assert_eq!(rejected.resolve(true, false), RunState::LimitedAccepted);
        assert_eq!(rejected.resolve(false, false), RunState::LimitedRetained);
        assert_eq!(rejected.resolve(true, true), RunState::LimitedLocked);
        assert_eq!(RunState::Dg.resolve(false, true), RunState::Dg);

        assert!(RunState::LimitedAccepted.is_admissible());
        assert!(!RunState::LimitedLocked.is_admissible());
        assert!(!RunState::Dg.is_limited());
        assert!(RunState::LimitedRetained.is_limited());
    }

    #[test]
    fn test_sizes() {
        let conn = conn();
        let state = LimitedState::<2, 3, 1, 2, 4>::new(&conn).unwrap();
        assert_eq!(state.n_limited(), 2);
        assert_eq!(state.ext_prev.len(), 4);
        assert_eq!(state.lim_sync, vec![[0; 4]; 2]);
    }

    #[test]
    fn test_inconsistent_connect_rejected() {
        let mut conn = conn();
        conn.li_ex.pop();
        assert!(LimitedState::<2, 3, 1, 1, 1>::new(&conn).is_err());
    }

    #[test]
    fn test_effective_candidate() {
        let mut state = LimitedState::<2, 3, 1, 1, 3>::new(&conn()).unwrap();
        let li = LimitedIndex::new(1);
        state.adm_cand[li] = [true, false, true];
        state.lock_run(li, 2);
        assert_eq!(state.effective_candidate(li), [true, false, false]);
    }

    #[test]
    fn test_reset_sync() {
        let mut state = LimitedState::<2, 3, 1, 1, 2>::new(&conn()).unwrap();
        state.lim_sync[0] = [3, 1];
        state.reset_sync();
        assert_eq!(state.lim_sync[0], [0, 0]);
    }

    #[test]
    fn test_advance() {
        let conn = conn();
        let connect = line_reference::<2, 3>().unwrap().connect;
        let mut state = LimitedState::<2, 3, 1, 1, 1>::new(&conn).unwrap();
        let li = LimitedIndex::new(0);
        state.dofs_sc[li] = [[[1.0], [2.0], [3.0]]];
        state.adm_limited[li] = [false];
        let ex = conn.li_ex[li];
        state.ext_limited[ex] = [[[1.0]], [[3.0]]];

        state.advance(&connect);

        assert_eq!(state.adm_prev[li], [false]);
        assert_eq!(state.ext_prev[ex], [[[1.0]], [[3.0]]]);
        assert_eq!(state.t_dofs_sc[li][0], [[[1.0]]]);
        assert_eq!(state.t_dofs_sc[li][1], [[[3.0]]]);
    }

    #[test]
    fn test_init_extrema() {
        let conn = conn();
        let reference = line_reference::<2, 3>().unwrap();
        let mut state = LimitedState::<2, 3, 1, 1, 1>::new(&conn).unwrap();
        // element e holds the constant e
        let dofs: Vec<DofsDg<1, 2, 1>> = (0..4).map(|e| [[[e as f64], [0.0]]]).collect();

        state.init_extrema(&conn, &dofs, &reference.ops.scatter);

        for (ex, el) in conn.ex_el.iter().enumerate() {
            let c = el.get() as f64;
            assert!((state.ext_prev[ex][0][0][0] - c).abs() < 1e-14);
            assert!((state.ext_prev[ex][1][0][0] - c).abs() < 1e-14);
        }
        assert_eq!(state.ext_prev, state.ext_limited);
    }
}
