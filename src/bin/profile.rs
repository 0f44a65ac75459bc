//! Times both driving routines across a range of sizes and reports how
//! much the handover path gains over the duplication path.

use std::time::{Duration, Instant};

use relocation::workload;

fn main() {
    // Trace lines per push would swamp the timing; leave the logger off
    // unless RUST_LOG asks for it.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Off)
        .parse_default_env()
        .init();

    println!("{:>8} {:>16} {:>16} {:>8}", "size", "duplicate", "transfer", "ratio");
    let mut size = 1;
    while size <= 4096 {
        let duplicate = time(|| {
            workload::run_clone(size);
        });
        let transfer = time(|| {
            workload::run_box(size);
        });
        println!(
            "{:>8} {:>16?} {:>16?} {:>8.2}",
            size,
            duplicate,
            transfer,
            duplicate.as_secs_f64() / transfer.as_secs_f64(),
        );
        size *= 2;
    }
}

fn time(mut work: impl FnMut()) -> Duration {
    let timer = Instant::now();
    for _ in 0..1000 {
        work();
    }
    timer.elapsed()
}
