//! The a-posteriori subcell limiter.
//!
//! [`Limiter::a_post`] runs once per step, after the DG step has produced
//! candidate solutions and their admissibility:
//!
//! 1. Internal-boundary coupling: a limited element whose partner across a
//!    rupture face rejected its candidate rejects it as well.
//! 2. Every limited-plus element rolls back its DG face integrals towards
//!    limited neighbors with rejected runs.
//! 3. Every limited element with rejected runs recomputes them with subcells,
//!    projects back, re-checks admissibility and updates its extrema and
//!    counters.
//!
//! Elements in step 2/3 only write their own outputs, so they are processed
//! independently. With the `parallel` feature, [`Limiter::a_post_parallel`]
//! evaluates them on the rayon pool.

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{LimiterError, Result};
use crate::flux::ElementFluxSolvers;
use crate::mesh::{ElementType, LimitedPlusConnect, MeshAdjacency};
use crate::operators::{FluxMatrices, SubcellConnect, SubcellOps};
use crate::types::{
    DofsDg, DofsSc, ElementIndex, Extrema, ExtremaIndex, LimitedIndex, LimitedPlusIndex,
    RunMask, any_false, empty_extrema,
};

use super::detections::{Dmp, DmpConfig};
use super::kernels;
use super::rollback::{RollbackFace, surf_int_rb};
use super::state::{LimitedState, RunState};
use super::subcell::{FaceSource, LimitInput, SubcellScaling, limit};
use super::traits::{AdmissibilityOracle, SubcellSolver};

/// Configuration of the limiter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimiterConfig {
    /// Element topology; sets the face count and the flux scaling.
    pub element_type: ElementType,
    /// Relaxation of the default DMP oracle.
    pub dmp: DmpConfig,
}

impl LimiterConfig {
    /// Create a configuration with default DMP relaxation.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            dmp: DmpConfig::default(),
        }
    }

    /// Set the DMP relaxation.
    pub fn with_dmp(mut self, dmp: DmpConfig) -> Self {
        self.dmp = dmp;
        self
    }
}

/// DG solutions of all elements, indexed by dense element id.
pub struct DgDofs<'a, const Q: usize, const M: usize, const R: usize> {
    /// Time-integrated DOFs of the step.
    pub t_int: &'a [DofsDg<Q, M, R>],
    /// DOFs of the previous solution.
    pub prev: &'a [DofsDg<Q, M, R>],
    /// Candidate DOFs; replaced by the limited solution.
    pub cand: &'a mut [DofsDg<Q, M, R>],
}

/// Counters of one limiter call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LimiterStats {
    /// Faces whose DG integral was rolled back.
    pub rolled_back_faces: usize,
    /// Runs rejected through internal-boundary coupling.
    pub coupled_runs: usize,
    /// Runs recomputed with subcells.
    pub limited_runs: usize,
    /// Limited runs whose projection passed the admissibility check.
    pub readmitted_runs: usize,
    /// Limited runs kept in subcell form by their lock.
    pub locked_runs: usize,
}

impl LimiterStats {
    fn merge(&mut self, other: &LimiterStats) {
        self.rolled_back_faces += other.rolled_back_faces;
        self.coupled_runs += other.coupled_runs;
        self.limited_runs += other.limited_runs;
        self.readmitted_runs += other.readmitted_runs;
        self.locked_runs += other.locked_runs;
    }
}

/// Shared inputs of one limiter call.
struct Step<'a, const F: usize, const Q: usize, const M: usize, const R: usize> {
    dt: f64,
    scaling: SubcellScaling,
    mesh: &'a MeshAdjacency<F>,
    lp: &'a LimitedPlusConnect<F>,
    fs: &'a [ElementFluxSolvers<Q, F>],
    t_int: &'a [DofsDg<Q, M, R>],
    prev: &'a [DofsDg<Q, M, R>],
}

/// Outputs of a limited element.
struct LimitedUpdate<const Q: usize, const SC: usize, const R: usize> {
    li: LimitedIndex,
    ex: ExtremaIndex,
    dofs_sc: Option<DofsSc<Q, SC, R>>,
    adm_limited: RunMask<R>,
    limited_runs: RunMask<R>,
    ext: Extrema<Q, R>,
}

/// Extrema of runs that were rolled back but not limited.
struct RolledBackExtrema<const Q: usize, const R: usize> {
    ex: ExtremaIndex,
    runs: RunMask<R>,
    ext: Extrema<Q, R>,
}

/// Outputs of a limited-plus element.
struct ElementUpdate<const Q: usize, const M: usize, const SC: usize, const R: usize> {
    el: ElementIndex,
    dofs_dg: DofsDg<Q, M, R>,
    limited: Option<LimitedUpdate<Q, SC, R>>,
    rolled_back: Option<RolledBackExtrema<Q, R>>,
    stats: LimiterStats,
}

/// A-posteriori subcell limiter of one element type.
///
/// `S` advances subcells, `O` decides admissibility. Const parameters: `F`
/// faces, `M` modes, `SC` subcells, `SF` subfaces per face, `SG = SC + F·SF`
/// subgrid cells, `Q` quantities and `R` fused runs.
pub struct Limiter<
    S,
    O,
    const F: usize,
    const M: usize,
    const SC: usize,
    const SF: usize,
    const SG: usize,
    const Q: usize,
    const R: usize,
> {
    strategy: S,
    oracle: O,
    config: LimiterConfig,
    ops: SubcellOps<M, SC, SF, F>,
    flux_matrices: FluxMatrices<M>,
    connect: SubcellConnect<F, SC, SF>,
}

impl<
    S: SubcellSolver,
    const F: usize,
    const M: usize,
    const SC: usize,
    const SF: usize,
    const SG: usize,
    const Q: usize,
    const R: usize,
> Limiter<S, Dmp, F, M, SC, SF, SG, Q, R>
{
    /// Create a limiter with the DMP oracle configured by `config.dmp`.
    pub fn new(
        strategy: S,
        config: LimiterConfig,
        ops: SubcellOps<M, SC, SF, F>,
        flux_matrices: FluxMatrices<M>,
        connect: SubcellConnect<F, SC, SF>,
    ) -> Result<Self> {
        let oracle = Dmp::new(config.dmp);
        Self::with_oracle(strategy, oracle, config, ops, flux_matrices, connect)
    }
}

impl<
    S: SubcellSolver,
    O: AdmissibilityOracle,
    const F: usize,
    const M: usize,
    const SC: usize,
    const SF: usize,
    const SG: usize,
    const Q: usize,
    const R: usize,
> Limiter<S, O, F, M, SC, SF, SG, Q, R>
{
    /// Create a limiter with a custom admissibility oracle.
    ///
    /// Checks the extents against each other and the element type, and the
    /// reference tables for consistency.
    pub fn with_oracle(
        strategy: S,
        oracle: O,
        config: LimiterConfig,
        ops: SubcellOps<M, SC, SF, F>,
        flux_matrices: FluxMatrices<M>,
        connect: SubcellConnect<F, SC, SF>,
    ) -> Result<Self> {
        if SG != SC + F * SF {
            return Err(LimiterError::SubgridExtent {
                expected: SC + F * SF,
                actual: SG,
            });
        }
        if config.element_type.n_faces() != F {
            return Err(LimiterError::FaceCount {
                element_type: config.element_type,
                expected: config.element_type.n_faces(),
                actual: F,
            });
        }
        if flux_matrices.n_faces != F {
            return Err(LimiterError::length_mismatch(
                "flux matrix faces",
                F,
                flux_matrices.n_faces,
            ));
        }
        ops.validate()?;
        flux_matrices.validate()?;
        connect.validate()?;
        if flux_matrices.n_vertex_combos != ops.n_vertex_combos() {
            return Err(LimiterError::length_mismatch(
                "vertex combinations",
                ops.n_vertex_combos(),
                flux_matrices.n_vertex_combos,
            ));
        }

        log::debug!(
            "limiter for {:?}: {} modes, {} subcells, {} quantities, {} runs, solver {}",
            config.element_type,
            M,
            SC,
            Q,
            R,
            strategy.name()
        );

        Ok(Self {
            strategy,
            oracle,
            config,
            ops,
            flux_matrices,
            connect,
        })
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    pub fn ops(&self) -> &SubcellOps<M, SC, SF, F> {
        &self.ops
    }

    pub fn flux_matrices(&self) -> &FluxMatrices<M> {
        &self.flux_matrices
    }

    pub fn connect(&self) -> &SubcellConnect<F, SC, SF> {
        &self.connect
    }

    /// Apply the limiter to the limited-plus elements `lps`.
    ///
    /// Candidate DOFs of all elements in `lps` are rolled back and limited in
    /// place; limited admissibility, subcells, extrema and counters are
    /// written to `state`. `fs` holds the flux solvers per dense element.
    ///
    /// Expects `state.adm_cand` and the candidate extrema
    /// ([`LimitedState::record_extrema`]) to be up to date.
    #[allow(clippy::too_many_arguments)]
    pub fn a_post(
        &self,
        dt: f64,
        lps: Range<usize>,
        mesh: &MeshAdjacency<F>,
        lp: &LimitedPlusConnect<F>,
        fs: &[ElementFluxSolvers<Q, F>],
        dg: DgDofs<'_, Q, M, R>,
        state: &mut LimitedState<F, SC, SF, Q, R>,
    ) -> LimiterStats {
        let DgDofs { t_int, prev, cand } = dg;
        let step = Step {
            dt,
            scaling: SubcellScaling::new::<SC, SF>(dt, self.config.element_type),
            mesh,
            lp,
            fs,
            t_int,
            prev,
        };

        let mut stats = LimiterStats {
            coupled_runs: self.couple_ruptures(&lps, mesh, lp, state),
            ..LimiterStats::default()
        };

        for lp_id in lps.clone() {
            let update = self.compute(&step, LimitedPlusIndex::new(lp_id), cand, state);
            stats.merge(&update.stats);
            Self::apply(update, cand, state);
        }

        log::debug!("a_post over {} limited-plus elements: {:?}", lps.len(), stats);
        stats
    }

    /// Parallel [`Limiter::a_post`]; results are identical to the serial path.
    #[cfg(feature = "parallel")]
    #[allow(clippy::too_many_arguments)]
    pub fn a_post_parallel(
        &self,
        dt: f64,
        lps: Range<usize>,
        mesh: &MeshAdjacency<F>,
        lp: &LimitedPlusConnect<F>,
        fs: &[ElementFluxSolvers<Q, F>],
        dg: DgDofs<'_, Q, M, R>,
        state: &mut LimitedState<F, SC, SF, Q, R>,
    ) -> LimiterStats {
        let DgDofs { t_int, prev, cand } = dg;
        let step = Step {
            dt,
            scaling: SubcellScaling::new::<SC, SF>(dt, self.config.element_type),
            mesh,
            lp,
            fs,
            t_int,
            prev,
        };

        let mut stats = LimiterStats {
            coupled_runs: self.couple_ruptures(&lps, mesh, lp, state),
            ..LimiterStats::default()
        };

        let updates: Vec<_> = {
            let cand: &[DofsDg<Q, M, R>] = cand;
            let state: &LimitedState<F, SC, SF, Q, R> = state;
            lps.clone()
                .into_par_iter()
                .map(|lp_id| self.compute(&step, LimitedPlusIndex::new(lp_id), cand, state))
                .collect()
        };

        for update in updates {
            stats.merge(&update.stats);
            Self::apply(update, cand, state);
        }

        log::debug!(
            "a_post (parallel) over {} limited-plus elements: {:?}",
            lps.len(),
            stats
        );
        stats
    }

    /// Reject candidates across internal boundaries whose partner rejected.
    ///
    /// Decisions are taken on the candidate admissibility as it was before
    /// this phase, so the result does not depend on the element order.
    fn couple_ruptures(
        &self,
        lps: &Range<usize>,
        mesh: &MeshAdjacency<F>,
        lp: &LimitedPlusConnect<F>,
        state: &mut LimitedState<F, SC, SF, Q, R>,
    ) -> usize {
        let mut forced: Vec<(LimitedIndex, RunMask<R>)> = Vec::new();
        for lp_id in lps.clone().map(LimitedPlusIndex::new) {
            let Some(li) = lp.lp_li[lp_id] else { continue };
            let el = lp.lp_el[lp_id];
            let mut adm = state.adm_cand[li];
            for fa in 0..F {
                if !mesh.is_rupture(el, fa) {
                    continue;
                }
                if let Some(li_ad) = lp.limited_neighbor(lp_id, fa) {
                    for (a, ad) in adm.iter_mut().zip(state.effective_candidate(li_ad)) {
                        *a &= ad;
                    }
                }
            }
            if adm != state.adm_cand[li] {
                forced.push((li, adm));
            }
        }

        let mut coupled = 0;
        for (li, adm) in forced {
            coupled += state.adm_cand[li]
                .iter()
                .zip(&adm)
                .filter(|&(&before, &after)| before && !after)
                .count();
            state.adm_cand[li] = adm;
        }
        coupled
    }

    /// Rollback and limiting of one limited-plus element; reads only.
    fn compute(
        &self,
        step: &Step<'_, F, Q, M, R>,
        lp_id: LimitedPlusIndex,
        cand: &[DofsDg<Q, M, R>],
        state: &LimitedState<F, SC, SF, Q, R>,
    ) -> ElementUpdate<Q, M, SC, R> {
        let lp = step.lp;
        let mesh = step.mesh;
        let el = lp.lp_el[lp_id];
        let fs = &step.fs[el];
        let mut stats = LimiterStats::default();
        let mut dofs_dg = cand[el];
        let mut rolled_runs = [false; R];

        for fa in 0..F {
            let Some(li_ad) = lp.limited_neighbor(lp_id, fa) else {
                continue;
            };
            let Some(el_ad) = mesh.el_fa_el[el][fa] else {
                continue;
            };
            let f_id = mesh.f_id_el_fa_el[el][fa] as usize;
            let v_id = mesh.v_id_el_fa_el[el][fa] as usize;
            let adm_ad_cand = state.effective_candidate(li_ad);

            let face = RollbackFace {
                adm_ad_prev: &state.adm_prev[li_ad],
                adm_ad_cand: &adm_ad_cand,
                f_mat: &self.flux_matrices.local[fa],
                f_mat_ad: self.flux_matrices.neighbor(fa, v_id, f_id),
                scatter_sf: &self.ops.scatter_sf[fa],
                scatter_sf_ad: self.ops.scatter_ad(v_id, f_id),
                sf_int: &self.ops.sf_int[fa],
                fs: &fs.dg.own[fa],
                fs_ad: &fs.dg.neigh[fa],
                t_dofs: &step.t_int[el],
                t_dofs_ad: &step.t_int[el_ad],
                t_dofs_sc_ad: &state.t_dofs_sc[li_ad][f_id],
                dofs_prev: &step.prev[el],
                dofs_prev_ad: &step.prev[el_ad],
            };
            let rupture = mesh.is_rupture(el, fa);
            let rolled_back = surf_int_rb(
                step.scaling,
                &face,
                |own, adjacent, out| {
                    rupture && self.strategy.net_update(step.dt, el, fa, own, adjacent, out)
                },
                &mut dofs_dg,
            );
            if rolled_back {
                log::trace!("{el}: rolled back face {fa} towards {el_ad}");
                stats.rolled_back_faces += 1;
                for (rolled, adm) in rolled_runs.iter_mut().zip(adm_ad_cand) {
                    *rolled |= !adm;
                }
            }
        }

        let limited = lp.lp_li[lp_id]
            .map(|li| self.limit_element(step, lp_id, li, &mut dofs_dg, state, &mut stats));

        // runs changed by rollback alone are read by the next DMP check
        if let Some(limited) = &limited {
            for (rolled, &lim) in rolled_runs.iter_mut().zip(&limited.limited_runs) {
                *rolled &= !lim;
            }
        }
        let rolled_back = match lp.lp_ex[lp_id] {
            Some(ex) if rolled_runs.iter().any(|&r| r) => {
                let mut scratch = [[[0.0; R]; SC]; Q];
                Some(RolledBackExtrema {
                    ex,
                    runs: rolled_runs,
                    ext: kernels::dg_extrema(&dofs_dg, &self.ops.scatter, &mut scratch),
                })
            }
            _ => None,
        };

        ElementUpdate {
            el,
            dofs_dg,
            limited,
            rolled_back,
            stats,
        }
    }

    /// Subcell update, projection and re-check of a limited element.
    fn limit_element(
        &self,
        step: &Step<'_, F, Q, M, R>,
        lp_id: LimitedPlusIndex,
        li: LimitedIndex,
        dofs_dg: &mut DofsDg<Q, M, R>,
        state: &LimitedState<F, SC, SF, Q, R>,
        stats: &mut LimiterStats,
    ) -> LimitedUpdate<Q, SC, R> {
        let lp = step.lp;
        let mesh = step.mesh;
        let el = lp.lp_el[lp_id];
        let ex = lp.li_ex[li];
        let adm_cand = state.effective_candidate(li);

        let mut update = LimitedUpdate {
            li,
            ex,
            dofs_sc: None,
            adm_limited: adm_cand,
            limited_runs: [false; R],
            ext: empty_extrema(),
        };
        if !any_false(&adm_cand) {
            return update;
        }

        let faces = std::array::from_fn(|fa| match mesh.el_fa_el[el][fa] {
            None => FaceSource::Boundary,
            Some(el_ad) => {
                let f_id = mesh.f_id_el_fa_el[el][fa] as usize;
                let v_id = mesh.v_id_el_fa_el[el][fa] as usize;
                FaceSource::Neighbor {
                    dofs_dg: &step.prev[el_ad],
                    scatter: self.ops.scatter_ad(v_id, f_id),
                    stored: lp
                        .limited_neighbor(lp_id, fa)
                        .map(|li_ad| (&state.t_dofs_sc[li_ad][f_id], &state.adm_prev[li_ad])),
                }
            }
        });
        let input = LimitInput {
            element: el,
            dofs_prev: &step.prev[el],
            adm_prev: &state.adm_prev[li],
            faces,
            rupture: std::array::from_fn(|fa| mesh.is_rupture(el, fa)),
            solvers: &step.fs[el],
        };

        let mut dofs_sc = state.dofs_sc[li];
        let net_updates = limit::<S, F, M, SC, SF, SG, Q, R>(
            &self.strategy,
            step.dt,
            step.scaling,
            &self.ops,
            &self.connect,
            &input,
            &mut dofs_sc,
        );
        if net_updates.iter().any(|&n| n) {
            log::trace!("{el}: net-updates on faces {net_updates:?}");
        }

        let mut projection = [[[0.0; R]; M]; Q];
        kernels::gather(&dofs_sc, &self.ops.gather, &mut projection);
        for q in 0..Q {
            for m in 0..M {
                for r in 0..R {
                    if !adm_cand[r] {
                        dofs_dg[q][m][r] = projection[q][m][r];
                    }
                }
            }
        }

        let mut scratch = [[[0.0; R]; SC]; Q];
        let ext_dg = kernels::dg_extrema(dofs_dg, &self.ops.scatter, &mut scratch);
        let ext_sc = kernels::sc_extrema(&dofs_sc);
        let adm_dg =
            self.oracle
                .admissible(&ext_dg, &state.ext_prev[ex], &state.ext_prev, lp.stencil(li));

        for r in 0..R {
            if adm_cand[r] {
                continue;
            }
            let run_state = RunState::initial(false, state.lock[li][r])
                .resolve(adm_dg[r], state.lock[li][r]);
            match run_state {
                RunState::LimitedAccepted => stats.readmitted_runs += 1,
                RunState::LimitedLocked => stats.locked_runs += 1,
                _ => {}
            }
            stats.limited_runs += 1;
            update.limited_runs[r] = true;
            update.adm_limited[r] = run_state.is_admissible();

            let source = if run_state.is_admissible() { &ext_dg } else { &ext_sc };
            for k in 0..2 {
                for q in 0..Q {
                    update.ext[k][q][r] = source[k][q][r];
                }
            }
            log::trace!("{el} run {r}: {run_state:?}");
        }

        update.dofs_sc = Some(dofs_sc);
        update
    }

    fn apply(
        update: ElementUpdate<Q, M, SC, R>,
        cand: &mut [DofsDg<Q, M, R>],
        state: &mut LimitedState<F, SC, SF, Q, R>,
    ) {
        cand[update.el] = update.dofs_dg;
        if let Some(rolled_back) = update.rolled_back {
            Self::write_extrema(state, rolled_back.ex, &rolled_back.runs, &rolled_back.ext);
        }
        let Some(limited) = update.limited else {
            return;
        };
        let li = limited.li;
        state.adm_limited[li] = limited.adm_limited;
        if let Some(dofs_sc) = limited.dofs_sc {
            state.dofs_sc[li] = dofs_sc;
        }
        for r in 0..R {
            if limited.limited_runs[r] {
                state.lim_sync[li][r] += 1;
            }
        }
        Self::write_extrema(state, limited.ex, &limited.limited_runs, &limited.ext);
    }

    fn write_extrema(
        state: &mut LimitedState<F, SC, SF, Q, R>,
        ex: ExtremaIndex,
        runs: &RunMask<R>,
        ext: &Extrema<Q, R>,
    ) {
        let record = &mut state.ext_limited[ex];
        for r in (0..R).filter(|&r| runs[r]) {
            for k in 0..2 {
                for q in 0..Q {
                    record[k][q][r] = ext[k][q][r];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::{Advection, line_mesh_solvers};
    use crate::mesh::LineMesh;
    use crate::operators::line_reference;
    use crate::solver::limiters::AdvectionSubcellSolver;

    type LineLimiter<const R: usize> =
        Limiter<AdvectionSubcellSolver, Dmp, 2, 2, 3, 1, 5, 1, R>;

    fn limiter<const R: usize>() -> LineLimiter<R> {
        let reference = line_reference::<2, 3>().unwrap();
        Limiter::new(
            AdvectionSubcellSolver,
            LimiterConfig::new(ElementType::Line),
            reference.ops,
            reference.flux_matrices,
            reference.connect,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_wrong_subgrid_extent() {
        let reference = line_reference::<2, 3>().unwrap();
        let result: Result<Limiter<AdvectionSubcellSolver, Dmp, 2, 2, 3, 1, 6, 1, 1>> =
            Limiter::new(
                AdvectionSubcellSolver,
                LimiterConfig::new(ElementType::Line),
                reference.ops,
                reference.flux_matrices,
                reference.connect,
            );
        assert!(matches!(
            result,
            Err(LimiterError::SubgridExtent {
                expected: 5,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_rejects_wrong_element_type() {
        let reference = line_reference::<2, 3>().unwrap();
        let result: Result<LineLimiter<1>> = Limiter::new(
            AdvectionSubcellSolver,
            LimiterConfig::new(ElementType::Quad4),
            reference.ops,
            reference.flux_matrices,
            reference.connect,
        );
        assert!(matches!(result, Err(LimiterError::FaceCount { .. })));
    }

    #[test]
    fn test_config_builder() {
        let config = LimiterConfig::new(ElementType::Line).with_dmp(DmpConfig::new(0.0, 0.5));
        assert_eq!(config.dmp.delta_rel, 0.5);
        assert_eq!(limiter::<1>().config().element_type, ElementType::Line);
    }

    #[test]
    fn test_rupture_coupling_rejects_partner() {
        let line = LineMesh::uniform(0.0, 2.0, 2)
            .unwrap()
            .with_rupture(1)
            .unwrap();
        let mesh = line.adjacency().unwrap();
        let lp = LimitedPlusConnect::build(&[true, true], &mesh).unwrap();
        let mut state = LimitedState::<2, 3, 1, 1, 2>::new(&lp).unwrap();
        state.adm_cand[0] = [false, true];

        let coupled = limiter::<2>().couple_ruptures(&(0..2), &mesh, &lp, &mut state);

        assert_eq!(coupled, 1);
        assert_eq!(state.adm_cand[0], [false, true]);
        assert_eq!(state.adm_cand[1], [false, true]);
    }

    #[test]
    fn test_no_coupling_across_standard_faces() {
        let line = LineMesh::uniform(0.0, 2.0, 2).unwrap();
        let mesh = line.adjacency().unwrap();
        let lp = LimitedPlusConnect::build(&[true, true], &mesh).unwrap();
        let mut state = LimitedState::<2, 3, 1, 1, 2>::new(&lp).unwrap();
        state.adm_cand[0] = [false, true];

        assert_eq!(
            limiter::<2>().couple_ruptures(&(0..2), &mesh, &lp, &mut state),
            0
        );
        assert_eq!(state.adm_cand[1], [true, true]);
    }

    #[test]
    fn test_limited_run_replaced_by_projection() {
        let line = LineMesh::uniform(0.0, 3.0, 3).unwrap();
        let mesh = line.adjacency().unwrap();
        let lp = LimitedPlusConnect::build(&[false, true, false], &mesh).unwrap();
        let fs = line_mesh_solvers(&Advection::new([1.0]), &line);
        let limiter = limiter::<2>();
        let mut state = LimitedState::<2, 3, 1, 1, 2>::new(&lp).unwrap();

        let prev: Vec<DofsDg<1, 2, 2>> = vec![[[[1.0; 2], [0.0; 2]]]; 3];
        state.init_extrema(&lp, &prev, &limiter.ops().scatter);
        let t_int: Vec<_> = prev
            .iter()
            .map(|d| d.map(|q| q.map(|m| m.map(|v| 0.1 * v))))
            .collect();
        let mut cand = prev.clone();
        cand[1] = [[[1.0, 5.0], [0.0, 3.0]]];
        state.record_extrema(&lp, &cand, &limiter.ops().scatter);
        state.adm_cand[0] = [true, false];

        let stats = limiter.a_post(
            0.1,
            0..lp.n_limited_plus(),
            &mesh,
            &lp,
            &fs,
            DgDofs {
                t_int: &t_int,
                prev: &prev,
                cand: &mut cand,
            },
            &mut state,
        );

        assert_eq!(stats.limited_runs, 1);
        assert_eq!(stats.readmitted_runs, 1);
        assert_eq!(stats.rolled_back_faces, 2);
        assert_eq!(cand[1][0][0][0], 1.0);
        assert!((cand[1][0][0][1] - 1.0).abs() < 1e-13);
        assert!(cand[1][0][1][1].abs() < 1e-13);
        assert_eq!(state.adm_limited[0], [true, true]);
        assert_eq!(state.lim_sync[0], [0, 1]);
    }
}
