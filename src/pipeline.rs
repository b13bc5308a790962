use crate::error::Error;
use crate::fetchers::PageFetcher;
use crate::output::RecordSink;
use crate::paginator::Paginator;
use crate::parsers;
use crate::query::SearchQuery;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Stages of a run, logged as the pipeline moves through them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CountResults,
    NoResults,
    ComputePages,
    FetchPage(u32),
    ExtractPage(u32),
    EmitBatch(u32),
    Done,
}

/// Outcome of a run that reached `Done` or `NoResults`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub result_count: f64,
    pub page_count: u32,
    pub pages_processed: u32,
    pub records_written: usize,
    pub records_skipped: usize,
    /// The stop flag was raised before every page was processed
    pub cancelled: bool,
}

/// Drives count → paginate → fetch → extract → emit, one page at a time
///
/// The rendered fetcher is only used to read the result count; listing
/// pages go through the static fetcher. Page N+1 is not requested until
/// page N's records are in the sink.
pub struct Pipeline<'a> {
    paginator: Paginator,
    rendered: &'a dyn PageFetcher,
    listings: &'a dyn PageFetcher,
    delay: Duration,
    reuse_first_page: bool,
    stop: Option<Arc<AtomicBool>>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with a one second throttle that reuses the rendered first page
    pub fn new(
        paginator: Paginator,
        rendered: &'a dyn PageFetcher,
        listings: &'a dyn PageFetcher,
    ) -> Self {
        Self {
            paginator,
            rendered,
            listings,
            delay: Duration::from_secs(1),
            reuse_first_page: true,
            stop: None,
        }
    }

    /// Set the pause between successive page fetches
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Choose whether page 1's listings come from the rendered count page
    pub fn with_reuse_first_page(mut self, reuse: bool) -> Self {
        self.reuse_first_page = reuse;
        self
    }

    /// Stop before the next page once `stop` is set
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Run the search to completion, streaming every page into `sink`
    ///
    /// Returns the first unrecovered error. Batches already appended stay
    /// in the sink.
    pub async fn run(
        &self,
        query: &SearchQuery,
        sink: &mut dyn RecordSink,
    ) -> Result<RunReport, Error> {
        let mut report = RunReport::default();

        enter(Stage::CountResults);
        let first_url = self.paginator.build_url(query, 1)?;
        let first_page = self.rendered.fetch(&first_url).await?;
        report.result_count = parsers::count(&first_page)?;
        ::log::info!("Search matched {} listings", report.result_count);

        report.page_count = self.paginator.page_count(report.result_count);
        if report.page_count == 0 {
            enter(Stage::NoResults);
            return Ok(report);
        }

        enter(Stage::ComputePages);
        ::log::info!("Processing {} result pages", report.page_count);

        let mut reusable = if self.reuse_first_page {
            Some(first_page)
        } else {
            None
        };

        for page in self.paginator.pages(query, report.result_count) {
            if self.stop_requested() {
                ::log::warn!("Stop requested, ending before page {}", page.page_index);
                report.cancelled = true;
                break;
            }

            enter(Stage::FetchPage(page.page_index));
            let document = match reusable.take() {
                Some(document) => document,
                None => {
                    if page.page_index > 1 {
                        tokio::time::sleep(self.delay).await;
                    }
                    self.listings.fetch(&page.url).await?
                }
            };

            enter(Stage::ExtractPage(page.page_index));
            let batch = parsers::extract(&document, page.page_index);

            enter(Stage::EmitBatch(page.page_index));
            sink.append_records(&batch)?;

            report.pages_processed += 1;
            report.records_written += batch.records.len();
            report.records_skipped += batch.skipped.len();
            ::log::info!(
                "Page {}/{}: {} listings",
                page.page_index,
                report.page_count,
                batch.records.len()
            );
        }

        enter(Stage::Done);
        Ok(report)
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::Relaxed))
    }
}

fn enter(stage: Stage) {
    ::log::debug!("Pipeline stage: {:?}", stage);
}
