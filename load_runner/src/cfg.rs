use std::path::PathBuf;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "load_runner", about = "Drives the grid load scheduler from several threads")]
pub struct Cfg {
    /// Raise the log level (-v debug, -vv trace). `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Adds, processes and re-prioritizes a small set of grid loads on three threads.
    Demo(DemoCfg),
    /// Hammers a scheduler with producer, consumer and updater threads.
    Stress(StressCfg),
}

#[derive(Debug, Clone, clap::Args)]
pub struct DemoCfg {
    /// The scheduler implementation to run the demo on.
    #[arg(short, long, value_enum, default_value_t = Implementation::Rebuild)]
    pub implementation: Implementation,
    /// JSON file with `loads` and `adjustments`. Runs the built-in grid scenario when omitted.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
    /// Delay between two added loads.
    #[arg(long, default_value_t = 300)]
    pub add_delay_ms: u64,
    /// Time the processor waits before it takes the first load.
    #[arg(long, default_value_t = 1_000)]
    pub process_after_ms: u64,
    /// Delay between two processed loads.
    #[arg(long, default_value_t = 500)]
    pub process_delay_ms: u64,
    /// Time the adjuster waits before it applies the priority adjustments.
    #[arg(long, default_value_t = 2_000)]
    pub adjust_after_ms: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StressCfg {
    /// The scheduler implementation to test.
    #[arg(value_enum)]
    pub implementation: Implementation,
    /// Number of Producers that will add loads to the scheduler.
    #[arg(short, long)]
    pub producer_num: usize,
    /// Number of loads each producer will add to the scheduler during the test.
    #[arg(short, long)]
    pub load_num: usize,
    /// Number of Consumers that will drain loads from the scheduler.
    #[arg(short, long, default_value_t = 1)]
    pub consumer_num: usize,
    /// Number of Updaters that keep changing the priority of the top load.
    #[arg(short, long, default_value_t = 0)]
    pub updater_num: usize,
    /// Delay between the start of each drain interval.
    #[arg(long, default_value_t = 5)]
    pub drain_interval_ms: u64,
    /// Number of loads that will be drained per batch.
    #[arg(short = 'b', long, default_value_t = 100)]
    pub drain_batch_size: usize,
    /// Hard cap on the test's execution time
    #[arg(long, default_value_t = 10)]
    pub run_duration_seconds: u64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
pub enum Implementation {
    #[strum(ascii_case_insensitive)]
    Naive,
    #[strum(ascii_case_insensitive)]
    Rebuild,
    #[strum(ascii_case_insensitive)]
    Indexed,
}
