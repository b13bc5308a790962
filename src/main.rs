use clap::Parser;
use kleinanzeigen_autos::output::CsvSink;
use kleinanzeigen_autos::{Error, ScraperConfig, Search, SearchQuery};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = run(&args).await {
        ::log::error!("Run failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), Error> {
    // Nothing is fetched until the query and configuration are known to be valid
    let query = SearchQuery::new(&args.make, &args.model_or_year)?;

    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };
    let config = args.apply(config.apply_env());
    config.paginator()?;

    ::log::info!("Searching for {:?}", query.slug());
    println!("Note: the result count is read through a WebDriver server (e.g. geckodriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default {}",
        config.webdriver_url
    );

    let stop = Arc::new(AtomicBool::new(false));
    let stop_on_signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, finishing the current page");
            stop_on_signal.store(true, Ordering::Relaxed);
        }
    });

    let mut sink = CsvSink::create(&config.output_path)?;
    let output_path = config.output_path.clone();

    let start_time = std::time::Instant::now();
    let report = Search::new(query)
        .with_config(config)
        .with_stop_flag(stop)
        .run(&mut sink)
        .await?;

    ::log::info!(
        "Harvest complete - {} listings from {} of {} pages in {:.2} seconds ({} skipped)",
        report.records_written,
        report.pages_processed,
        report.page_count,
        start_time.elapsed().as_secs_f64(),
        report.records_skipped
    );
    if report.cancelled {
        ::log::warn!("Run was interrupted before the last page");
    }
    println!("Saved {} listings to {}", sink.written(), output_path);

    Ok(())
}
