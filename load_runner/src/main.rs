use std::sync::Arc;

use cfg::{Cfg, Command, DemoCfg, Implementation, StressCfg};
use clap::Parser;
use load_scheduler::{
    Scheduler,
    test::stress::{StressTestConfig, run_stress_test},
};
use naive::NaiveScheduler;
use scenario::Scenario;
use sync::{IndexedScheduler, RebuildScheduler};

pub mod cfg;
mod demo;
mod logging;
mod scenario;

fn main() {
    let cfg = Cfg::parse();
    logging::init(cfg.verbose);
    tracing::debug!(?cfg, "running configuration");

    let res = match cfg.command {
        Command::Demo(demo_cfg) => run_demo(demo_cfg),
        Command::Stress(stress_cfg) => run_stress(stress_cfg),
    };
    if let Err(e) = res {
        tracing::error!("{e:?}");
        std::process::exit(1);
    }
}

fn run_demo(cfg: DemoCfg) -> anyhow::Result<()> {
    let scenario = match &cfg.scenario {
        Some(path) => Scenario::from_path(path)?,
        None => Scenario::grid()?,
    };
    let timing = demo::Timing::from(&cfg);
    tracing::info!(
        implementation = %cfg.implementation,
        loads = scenario.loads.len(),
        "=== Smart Grid Load Scheduler ==="
    );

    let processed = match cfg.implementation {
        Implementation::Naive => demo::run(&NaiveScheduler::default(), &scenario, timing)?,
        Implementation::Rebuild => demo::run(&RebuildScheduler::default(), &scenario, timing)?,
        Implementation::Indexed => demo::run(&IndexedScheduler::default(), &scenario, timing)?,
    };

    let order: Vec<&str> = processed.iter().map(|load| load.id()).collect();
    tracing::info!(?order, "=== Demo completed ===");
    Ok(())
}

fn run_stress(cfg: StressCfg) -> anyhow::Result<()> {
    let capacity = cfg
        .load_num
        .checked_mul(cfg.producer_num)
        .ok_or_else(|| anyhow::anyhow!("Overflow while calculating scheduler capacity"))?;

    match cfg.implementation {
        Implementation::Naive => stress(Arc::new(NaiveScheduler::new(capacity)), &cfg),
        Implementation::Rebuild => stress(Arc::new(RebuildScheduler::new(capacity)), &cfg),
        Implementation::Indexed => stress(Arc::new(IndexedScheduler::new(capacity)), &cfg),
    }
    Ok(())
}

fn stress<S: Scheduler>(scheduler: Arc<S>, cfg: &StressCfg) {
    let config = StressTestConfig {
        num_producers: cfg.producer_num,
        num_loads: cfg.load_num,
        num_consumers: cfg.consumer_num,
        num_updaters: cfg.updater_num,
        power_range: (100.0, 10_000.0),
        priority_range: (-100, 100),
        drain_interval_ms: cfg.drain_interval_ms,
        drain_batch_size: cfg.drain_batch_size,
        run_duration_seconds: cfg.run_duration_seconds,
    };
    let results = run_stress_test(scheduler, config);
    results.print_summary();
}
