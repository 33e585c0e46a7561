//! Shared fixture: linear problems on line meshes with a surface-only DG step.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use dg_subcell::solver::limiters::{QuantityCoupling, SubcellStep, fv_step, kernels};
use dg_subcell::types::{DofsSc, DofsSf, ElementIndex, SubGrid};
use dg_subcell::{
    DgDofs, DofsDg, Dmp, ElementFluxSolvers, ElementType, FluxSplitting, LimitedPlusConnect,
    LimitedState, Limiter, LimiterConfig, LimiterStats, LineMesh, MeshAdjacency, SubcellSolver,
    line_mesh_solvers, line_reference,
};

pub const M: usize = 2;
pub const SC: usize = 3;
pub const SG: usize = 5;

pub type LineLimiter<S, const Q: usize, const R: usize> = Limiter<S, Dmp, 2, M, SC, 1, SG, Q, R>;
pub type LineState<const Q: usize, const R: usize> = LimitedState<2, SC, 1, Q, R>;
pub type Dofs<const Q: usize, const R: usize> = DofsDg<Q, M, R>;

/// A line mesh with a fixed limited set and a linear PDE.
pub struct LineProblem<S, const Q: usize, const R: usize> {
    pub line: LineMesh,
    pub mesh: MeshAdjacency<2>,
    pub lp: LimitedPlusConnect<2>,
    pub fs: Vec<ElementFluxSolvers<Q, 2>>,
    pub limiter: LineLimiter<S, Q, R>,
    pub state: LineState<Q, R>,
}

impl<S: SubcellSolver, const Q: usize, const R: usize> LineProblem<S, Q, R> {
    pub fn new(
        line: LineMesh,
        limited: &[bool],
        physics: &impl FluxSplitting<Q>,
        strategy: S,
    ) -> Self {
        let mesh = line.adjacency().unwrap();
        let lp = LimitedPlusConnect::build(limited, &mesh).unwrap();
        let fs = line_mesh_solvers(physics, &line);
        let reference = line_reference::<M, SC>().unwrap();
        let limiter = Limiter::new(
            strategy,
            LimiterConfig::new(ElementType::Line),
            reference.ops,
            reference.flux_matrices,
            reference.connect,
        )
        .unwrap();
        let state = LimitedState::new(&lp).unwrap();
        Self {
            line,
            mesh,
            lp,
            fs,
            limiter,
            state,
        }
    }

    /// Set the previous extrema from `prev`.
    pub fn init(&mut self, prev: &[Dofs<Q, R>]) {
        self.state
            .init_extrema(&self.lp, prev, &self.limiter.ops().scatter);
    }

    /// One forward-Euler DG step with surface terms only.
    ///
    /// Returns the time-integrated DOFs and the candidate. Boundary faces see
    /// the element's own trace.
    pub fn dg_step(&self, prev: &[Dofs<Q, R>], dt: f64) -> (Vec<Dofs<Q, R>>, Vec<Dofs<Q, R>>) {
        let t_int: Vec<Dofs<Q, R>> = prev
            .iter()
            .map(|d| d.map(|q| q.map(|m| m.map(|v| dt * v))))
            .collect();
        let fm = self.limiter.flux_matrices();
        let mut cand = prev.to_vec();
        for (el, out) in cand.iter_mut().enumerate() {
            let fs = &self.fs[el];
            for fa in 0..2 {
                kernels::surf_int(&fm.local[fa], &fs.dg.own[fa], &t_int[el], out);
                match self.mesh.el_fa_el[el][fa] {
                    Some(ad) => {
                        let f_id = self.mesh.f_id_el_fa_el[el][fa] as usize;
                        let v_id = self.mesh.v_id_el_fa_el[el][fa] as usize;
                        let f_mat = fm.neighbor(fa, v_id, f_id);
                        kernels::surf_int(f_mat, &fs.dg.neigh[fa], &t_int[ad], out);
                    }
                    None => kernels::surf_int(&fm.local[fa], &fs.dg.neigh[fa], &t_int[el], out),
                }
            }
        }
        (t_int, cand)
    }

    /// Record the candidate extrema and run the limiter over every
    /// limited-plus element.
    pub fn limit(
        &mut self,
        dt: f64,
        t_int: &[Dofs<Q, R>],
        prev: &[Dofs<Q, R>],
        cand: &mut [Dofs<Q, R>],
    ) -> LimiterStats {
        self.state
            .record_extrema(&self.lp, cand, &self.limiter.ops().scatter);
        self.limiter.a_post(
            dt,
            0..self.lp.n_limited_plus(),
            &self.mesh,
            &self.lp,
            &self.fs,
            DgDofs { t_int, prev, cand },
            &mut self.state,
        )
    }

    /// Reject the runs of limited element `li` where `adm` is false.
    pub fn reject(&mut self, li: usize, adm: [bool; R]) {
        self.state.adm_cand[li] = adm;
    }

    /// Ready the state for the next step.
    pub fn advance(&mut self) {
        self.state.advance(self.limiter.connect());
        self.state.adm_cand.iter_mut().for_each(|a| *a = [true; R]);
    }
}

/// Subcell solver that answers every internal boundary with a fixed
/// net-update and counts its super-cell corrections.
pub struct FixedNetUpdate {
    pub value: f64,
    super_cells: AtomicUsize,
}

impl FixedNetUpdate {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            super_cells: AtomicUsize::new(0),
        }
    }

    pub fn super_cells(&self) -> usize {
        self.super_cells.load(Ordering::Relaxed)
    }
}

impl SubcellSolver for FixedNetUpdate {
    fn net_update<const Q: usize, const SF: usize, const R: usize>(
        &self,
        _dt: f64,
        _element: ElementIndex,
        _face: usize,
        _own: &DofsSf<Q, SF, R>,
        _adjacent: &DofsSf<Q, SF, R>,
        out: &mut DofsSf<Q, SF, R>,
    ) -> bool {
        *out = [[[self.value; R]; SF]; Q];
        true
    }

    fn step<const F: usize, const SC: usize, const SG: usize, const Q: usize, const R: usize>(
        &self,
        ctx: &SubcellStep<'_, F, SC, Q>,
        sub_grid: &SubGrid<Q, SG, R>,
        dofs_sc: &mut DofsSc<Q, SC, R>,
    ) {
        fv_step(ctx, sub_grid, QuantityCoupling::Diagonal, dofs_sc);
    }

    fn super_cell<
        const F: usize,
        const SC: usize,
        const SG: usize,
        const Q: usize,
        const R: usize,
    >(
        &self,
        _ctx: &SubcellStep<'_, F, SC, Q>,
        _sub_grid: &SubGrid<Q, SG, R>,
        _dofs_sc: &mut DofsSc<Q, SC, R>,
    ) {
        self.super_cells.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "fixed net-update"
    }
}

/// Sum of cell means over all elements, per quantity and run.
pub fn total_mass<const Q: usize, const R: usize>(dofs: &[Dofs<Q, R>]) -> [[f64; R]; Q] {
    let mut total = [[0.0; R]; Q];
    for d in dofs {
        for q in 0..Q {
            for r in 0..R {
                total[q][r] += d[q][0][r];
            }
        }
    }
    total
}

/// A step profile: `high` on elements `[lo, hi)`, `low` elsewhere, with a
/// per-run offset so that runs differ.
pub fn step_profile<const Q: usize, const R: usize>(
    n: usize,
    lo: usize,
    hi: usize,
    low: f64,
    high: f64,
) -> Vec<Dofs<Q, R>> {
    (0..n)
        .map(|el| {
            let base = if (lo..hi).contains(&el) { high } else { low };
            let mut d = [[[0.0; R]; M]; Q];
            for q in 0..Q {
                for r in 0..R {
                    d[q][0][r] = base + 0.25 * r as f64 + 0.1 * q as f64;
                    d[q][1][r] = 0.05 * (el as f64 - 1.0) * (r as f64 + 1.0);
                }
            }
            d
        })
        .collect()
}
