use log::info;
use watch_trends::{Result, TrendsConfig};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrendsConfig::default();
    info!(
        "Computing movie watching trends from {} into {}",
        config.input_path.display(),
        config.output_path.display()
    );

    let summary = watch_trends::run(&config)?;
    info!(
        "Wrote {} years from {} records in {} ms",
        summary.distinct_years, summary.rows_read, summary.elapsed_ms
    );

    Ok(())
}
