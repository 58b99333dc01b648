//! Exposure commands: `ev` and `equiv`.

use anyhow::Result;
use serde::Serialize;

use super::print_json;
use crate::args::{EvTarget, GlobalOptions};
use crate::config::Config;
use crate::exposure::format::format_shutter;
use crate::exposure::nd::{NdFilter, nd_shutter};
use crate::exposure::scenes::{EvScene, find_scene};
use crate::exposure::{EquivalentExposure, ExposureParam, ExposureTriple, round_ev};

#[derive(Serialize)]
struct NdReport {
    filter: &'static str,
    stops: u32,
    shutter_seconds: f64,
}

impl NdReport {
    fn new(filter: &NdFilter, shutter_seconds: f64) -> Self {
        Self {
            filter: filter.name,
            stops: filter.stops,
            shutter_seconds: nd_shutter(shutter_seconds, filter.stops as f64),
        }
    }
}

#[derive(Serialize)]
struct EvReport {
    triple: ExposureTriple,
    ev: f64,
    ev_rounded: f64,
    scene: Option<&'static EvScene>,
    nd: Option<NdReport>,
}

/// Nearest reference scene for an EV, if the EV is inside the table.
fn scene_for(ev: f64) -> Option<&'static EvScene> {
    find_scene(ev.round() as i32)
}

pub fn handle_ev_command(
    global: &GlobalOptions,
    triple: &ExposureTriple,
    nd: Option<&'static NdFilter>,
) -> Result<()> {
    let ev = triple.ev();
    let report = EvReport {
        triple: *triple,
        ev,
        ev_rounded: round_ev(ev),
        scene: scene_for(ev),
        nd: nd.map(|filter| NdReport::new(filter, triple.shutter_seconds)),
    };

    if global.json {
        return print_json(&report);
    }

    log_block_start!("{}", triple);
    log_indented!("EV {:.1}", report.ev_rounded);
    if let Some(scene) = report.scene {
        log_indented!("Typical scene: {}", scene.description);
    }
    if let Some(ref nd) = report.nd {
        log_indented!(
            "Behind {} (+{} stops): {}",
            nd.filter,
            nd.stops,
            format_shutter(nd.shutter_seconds)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct EquivReport {
    base: ExposureTriple,
    base_ev: f64,
    changed: ExposureParam,
    locked: ExposureParam,
    result: EquivalentExposure,
    exact: bool,
    scene: Option<&'static EvScene>,
    nd: Option<NdReport>,
}

#[allow(clippy::too_many_arguments)]
pub fn handle_equiv_command(
    global: &GlobalOptions,
    config: &Config,
    base: &ExposureTriple,
    changed: ExposureParam,
    value: f64,
    locked: ExposureParam,
    target: EvTarget,
    nd: Option<&'static NdFilter>,
) -> Result<()> {
    let solver = config.solver()?;

    let (result, scene) = match target {
        EvTarget::Preserve => (
            solver.solve_equivalent(base, changed, value, locked)?,
            None,
        ),
        EvTarget::Explicit(ev) => (
            solver.solve_for_target_ev(ev, base, changed, value, locked)?,
            None,
        ),
        EvTarget::Scene(ev) => {
            let scene = find_scene(ev).ok_or_else(|| {
                anyhow::anyhow!("No reference scene for EV {ev} (scenes cover EV -6 to 16)")
            })?;
            (
                solver.solve_for_target_ev(scene.ev as f64, base, changed, value, locked)?,
                Some(scene),
            )
        }
    };

    let exact = result.is_exact(config.ev_tolerance());
    let report = EquivReport {
        base: *base,
        base_ev: base.ev(),
        changed,
        locked,
        result,
        exact,
        scene,
        nd: nd.map(|filter| NdReport::new(filter, result.triple.shutter_seconds)),
    };

    if global.json {
        return print_json(&report);
    }

    log_block_start!("Base:   {} (EV {:.1})", base, round_ev(report.base_ev));
    if let Some(scene) = scene {
        log_indented!("Target: EV {} · {}", scene.ev, scene.description);
    } else if let EvTarget::Explicit(ev) = target {
        log_indented!("Target: EV {:.1}", ev);
    }
    log_decorated!(
        "Result: {} (EV {:.1})",
        result.triple,
        round_ev(result.ev)
    );
    log_indented!(
        "Changed {}, held {}, solved {}",
        changed,
        locked,
        result.free
    );

    if let Some(ref nd) = report.nd {
        log_indented!(
            "Behind {} (+{} stops): {}",
            nd.filter,
            nd.stops,
            format_shutter(nd.shutter_seconds)
        );
    }

    if !exact {
        log_pipe!();
        log_warning!(
            "No standard {} reaches the target; off by {:+.1} EV",
            result.free,
            result.residual_ev
        );
        let range = solver.values(result.free);
        log_indented!(
            "Available {} range: {} to {}",
            result.free,
            range.min(),
            range.max()
        );
    }

    if global.debug_enabled {
        log_pipe!();
        log_debug!(
            "Target EV {:.4}, achieved {:.4}, residual {:+.4}",
            result.target_ev,
            result.ev,
            result.residual_ev
        );
    }

    Ok(())
}
