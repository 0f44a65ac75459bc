//! Trace demonstration: run one workload per packet variant and let the
//! lifecycle ledgers tell the two strategies apart.

use relocation::workload;

// Enough pushes for five growth steps of the doubling schedule.
const PUSHES: usize = 32;

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .parse_default_env()
        .init();

    println!("duplicating packets, {} pushes", PUSHES);
    let duplicated = workload::run_clone(PUSHES);

    println!();
    println!();
    println!("doing move work");
    println!();
    println!();

    println!("transferring packets, {} pushes", PUSHES);
    let transferred = workload::run_box(PUSHES);

    println!("native container baseline, {} pushes", PUSHES);
    let native = workload::run_native_baseline(PUSHES);

    println!();
    println!("duplicating:  {}", duplicated);
    println!("transferring: {}", transferred);
    println!("native:       {}", native);
}
