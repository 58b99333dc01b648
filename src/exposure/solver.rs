//! Equivalent exposure solving with snapping to real camera values.
//!
//! Two entry points share one model. [`ExposureSolver::solve_equivalent`] keeps
//! the EV of a base triple after one parameter changes; [`ExposureSolver::solve_for_target_ev`]
//! drives the free parameter toward an explicit EV, typically a scene preset.
//! Either way the free parameter is snapped to its value set, so the achieved EV can
//! differ from the goal; the difference is returned as `residual_ev`.

use anyhow::Result;
use serde::Serialize;

use super::values::DiscreteValueSet;
use super::{ExposureParam, ExposureTriple};

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquivalentExposure {
    pub triple: ExposureTriple,
    /// The parameter that was computed
    pub free: ExposureParam,
    /// EV of `triple`, unrounded
    pub ev: f64,
    pub target_ev: f64,
    /// `ev - target_ev`; positive means less light than asked for
    pub residual_ev: f64,
}

impl EquivalentExposure {
    fn new(triple: ExposureTriple, free: ExposureParam, target_ev: f64) -> Self {
        let ev = triple.ev();
        Self {
            triple,
            free,
            ev,
            target_ev,
            residual_ev: ev - target_ev,
        }
    }

    pub fn is_exact(&self, tolerance: f64) -> bool {
        self.residual_ev.abs() <= tolerance
    }
}

/// Solver bound to one set of legal values per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureSolver {
    apertures: DiscreteValueSet,
    shutter_speeds: DiscreteValueSet,
    isos: DiscreteValueSet,
}

impl Default for ExposureSolver {
    fn default() -> Self {
        Self::new(
            DiscreteValueSet::standard_apertures(),
            DiscreteValueSet::standard_shutter_speeds(),
            DiscreteValueSet::standard_isos(),
        )
    }
}

impl ExposureSolver {
    pub fn new(
        apertures: DiscreteValueSet,
        shutter_speeds: DiscreteValueSet,
        isos: DiscreteValueSet,
    ) -> Self {
        Self {
            apertures,
            shutter_speeds,
            isos,
        }
    }

    pub fn values(&self, param: ExposureParam) -> &DiscreteValueSet {
        match param {
            ExposureParam::Aperture => &self.apertures,
            ExposureParam::Shutter => &self.shutter_speeds,
            ExposureParam::Iso => &self.isos,
        }
    }

    pub fn snap(&self, param: ExposureParam, value: f64) -> f64 {
        self.values(param).nearest(value)
    }

    fn free_param(
        changed: ExposureParam,
        new_value: f64,
        locked: ExposureParam,
    ) -> Result<ExposureParam> {
        if !(new_value.is_finite() && new_value > 0.0) {
            anyhow::bail!("New {changed} value must be positive (got {new_value})");
        }
        ExposureParam::remaining(changed, locked).ok_or_else(|| {
            anyhow::anyhow!("The changed parameter cannot also be locked ({changed})")
        })
    }

    /// Keep the EV of `base` after setting `changed` to `new_value` with `locked` held.
    ///
    /// Each parameter contributes a term to EV: `log2(N²)`, `-log2(t)` and
    /// `log2(S/100)`. The change in the changed parameter's term is measured in
    /// stops and the free parameter's term is moved by the same amount the other
    /// way, then snapped. The changed value itself is used as given.
    pub fn solve_equivalent(
        &self,
        base: &ExposureTriple,
        changed: ExposureParam,
        new_value: f64,
        locked: ExposureParam,
    ) -> Result<EquivalentExposure> {
        let free = Self::free_param(changed, new_value, locked)?;

        let stops = match changed {
            ExposureParam::Aperture => {
                (new_value * new_value / (base.aperture * base.aperture)).log2()
            }
            ExposureParam::Shutter => (base.shutter_seconds / new_value).log2(),
            ExposureParam::Iso => (new_value / base.iso as f64).log2(),
        };

        let raw = match free {
            ExposureParam::Aperture => base.aperture * 2f64.powf(-stops / 2.0),
            ExposureParam::Shutter => base.shutter_seconds * 2f64.powf(stops),
            ExposureParam::Iso => base.iso as f64 * 2f64.powf(-stops),
        };

        let triple = base
            .with(changed, new_value)
            .with(free, self.snap(free, raw));
        Ok(EquivalentExposure::new(triple, free, base.ev()))
    }

    /// Set `changed` to `new_value`, hold `locked`, and solve the free parameter for `target_ev`.
    pub fn solve_for_target_ev(
        &self,
        target_ev: f64,
        current: &ExposureTriple,
        changed: ExposureParam,
        new_value: f64,
        locked: ExposureParam,
    ) -> Result<EquivalentExposure> {
        let free = Self::free_param(changed, new_value, locked)?;
        let fixed = current.with(changed, new_value);

        let raw = match free {
            ExposureParam::Aperture => {
                let iso_term = (fixed.iso as f64 / 100.0).log2();
                (fixed.shutter_seconds * 2f64.powf(target_ev - iso_term)).sqrt()
            }
            ExposureParam::Shutter => {
                let iso_term = (fixed.iso as f64 / 100.0).log2();
                fixed.aperture * fixed.aperture / 2f64.powf(target_ev - iso_term)
            }
            ExposureParam::Iso => {
                let light_term = (fixed.aperture * fixed.aperture / fixed.shutter_seconds).log2();
                100.0 * 2f64.powf(target_ev - light_term)
            }
        };

        let triple = fixed.with(free, self.snap(free, raw));
        Ok(EquivalentExposure::new(triple, free, target_ev))
    }
}
