use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use anyhow::anyhow;
use load_scheduler::{Load, Scheduler};

use crate::{
    cfg::DemoCfg,
    scenario::{Adjustment, Scenario},
};

/// Watts of demand that translate into one millisecond of simulated processing.
const WATTS_PER_MS: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub add_delay: Duration,
    pub process_after: Duration,
    pub process_delay: Duration,
    pub adjust_after: Duration,
}

impl From<&DemoCfg> for Timing {
    fn from(cfg: &DemoCfg) -> Self {
        Self {
            add_delay: Duration::from_millis(cfg.add_delay_ms),
            process_after: Duration::from_millis(cfg.process_after_ms),
            process_delay: Duration::from_millis(cfg.process_delay_ms),
            adjust_after: Duration::from_millis(cfg.adjust_after_ms),
        }
    }
}

/// Runs an adder, a processor and an adjuster thread against one shared `scheduler` and returns
/// the loads in the order they were processed.
///
/// The processor keeps going until the adder is done and the scheduler is empty.
pub fn run<S: Scheduler>(
    scheduler: &S,
    scenario: &Scenario,
    timing: Timing,
) -> anyhow::Result<Vec<Load>> {
    let adding_done = AtomicBool::new(false);

    let processed = crossbeam::scope(|s| {
        s.spawn(|_| add_loads(scheduler, &scenario.loads, timing, &adding_done));
        s.spawn(|_| adjust_priorities(scheduler, &scenario.adjustments, timing));
        let processor = s.spawn(|_| process_loads(scheduler, timing, &adding_done));
        processor.join()
    })
    .map_err(|_| anyhow!("a demo thread panicked"))?
    .map_err(|_| anyhow!("the processing thread panicked"))?;

    tracing::info!(processed = processed.len(), "all loads processed");
    Ok(processed)
}

fn add_loads<S: Scheduler>(
    scheduler: &S,
    loads: &[Load],
    timing: Timing,
    adding_done: &AtomicBool,
) {
    for load in loads {
        tracing::info!(id = load.id(), "adding load to scheduler");
        if scheduler.add(load.clone()) {
            tracing::info!(id = load.id(), queued = scheduler.len(), "load added");
        } else {
            tracing::warn!(id = load.id(), "failed to add load, the id is queued already");
        }
        thread::sleep(timing.add_delay);
    }
    adding_done.store(true, Ordering::Release);
}

fn process_loads<S: Scheduler>(
    scheduler: &S,
    timing: Timing,
    adding_done: &AtomicBool,
) -> Vec<Load> {
    // Give the adder a head start
    thread::sleep(timing.process_after);

    let mut processed = vec![];
    loop {
        // Read the flag first: if it is set, every load is in the scheduler already
        let done = adding_done.load(Ordering::Acquire);
        match scheduler.pop_top() {
            Some(load) => {
                process(&load);
                processed.push(load);
            }
            None if done => break,
            None => tracing::debug!("no load available to process yet"),
        }
        thread::sleep(timing.process_delay);
    }
    processed
}

/// Simulates work that takes longer the more power a load draws.
fn process(load: &Load) {
    tracing::info!(
        id = load.id(),
        power_w = load.power_requirement(),
        priority = load.priority(),
        "processing load"
    );
    thread::sleep(Duration::from_secs_f64(
        load.power_requirement() / WATTS_PER_MS / 1_000.0,
    ));
}

fn adjust_priorities<S: Scheduler>(scheduler: &S, adjustments: &[Adjustment], timing: Timing) {
    thread::sleep(timing.adjust_after);

    for adjustment in adjustments {
        if scheduler.update_priority(&adjustment.id, adjustment.priority) {
            tracing::warn!(
                id = %adjustment.id,
                priority = adjustment.priority,
                "EMERGENCY: load priority updated"
            );
        } else {
            tracing::info!(
                id = %adjustment.id,
                "failed to update priority, the load may have been processed already"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, time::Duration};

    use load_scheduler::{Load, Scheduler};
    use naive::NaiveScheduler;
    use sync::{IndexedScheduler, RebuildScheduler};

    use super::{Timing, run};
    use crate::scenario::Scenario;

    /// Everything is added and adjusted long before the processor starts.
    const SETTLED: Timing = Timing {
        add_delay: Duration::ZERO,
        process_after: Duration::from_millis(300),
        process_delay: Duration::ZERO,
        adjust_after: Duration::from_millis(50),
    };

    fn assert_grid_order(processed: &[Load]) {
        let ids: Vec<&str> = processed.iter().map(Load::id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(
            ids[..2].iter().copied().collect::<HashSet<_>>(),
            HashSet::from(["Hospital", "Residential"])
        );
        assert_eq!(ids[2..], ["Factory", "School"]);
    }

    #[test]
    fn grid_demo_on_every_implementation() {
        let scenario = Scenario::grid().unwrap();

        let rebuild = RebuildScheduler::default();
        assert_grid_order(&run(&rebuild, &scenario, SETTLED).unwrap());
        assert!(rebuild.is_empty());

        let indexed = IndexedScheduler::default();
        assert_grid_order(&run(&indexed, &scenario, SETTLED).unwrap());
        assert!(indexed.is_empty());

        let naive = NaiveScheduler::default();
        assert_grid_order(&run(&naive, &scenario, SETTLED).unwrap());
        assert!(naive.is_empty());
    }

    /// The processor starts right away and must still wait for late loads.
    #[test]
    fn processor_waits_for_adder() {
        let scenario = Scenario::grid().unwrap();
        let timing = Timing {
            add_delay: Duration::from_millis(20),
            process_after: Duration::ZERO,
            process_delay: Duration::from_millis(1),
            adjust_after: Duration::ZERO,
        };

        let scheduler = RebuildScheduler::default();
        let processed = run(&scheduler, &scenario, timing).unwrap();
        let ids: HashSet<&str> = processed.iter().map(Load::id).collect();
        assert_eq!(
            ids,
            HashSet::from(["Hospital", "School", "Factory", "Residential"])
        );
        assert!(scheduler.is_empty());
    }
}
