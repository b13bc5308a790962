use kleinanzeigen_autos::error::{Error, FetchError};
use kleinanzeigen_autos::fetchers::StaticFetcher;
use kleinanzeigen_autos::output::CsvSink;
use kleinanzeigen_autos::paginator::Paginator;
use kleinanzeigen_autos::{ListingRecord, Pipeline, SearchQuery};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn results_page(total: u32, listings: &[(&str, &str, &str, &str)]) -> String {
    let articles: String = listings
        .iter()
        .map(|(title, mileage, year, price)| {
            format!(
                r#"<article class="aditem">
                    <div class="aditem-image"></div>
                    <a href="/s-anzeige/1">{title}</a>
                    <span>{mileage}</span>
                    <span>{year}</span>
                    <strong>{price}</strong>
                </article>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
            <span class="breadcrump-summary">1 - 25 von {total} Ergebnissen für „vw golf“</span>
            <ul id="srchrslt-adtable">{articles}</ul>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, page: u32, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/s-autos/seite:{}/vw-golf/k0c216", page)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn fetcher() -> StaticFetcher {
    StaticFetcher::new("harvest-tests/1.0", Duration::from_secs(5)).unwrap()
}

fn read_csv(path: &std::path::Path) -> Vec<ListingRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.deserialize().map(|r| r.unwrap()).collect()
}

#[tokio::test]
async fn test_two_pages_written_in_order() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        200,
        results_page(40, &[("Golf VI, TÜV neu", "150.000 km", "EZ 2010", "5.500 €")]),
    )
    .await;
    mount_page(
        &server,
        2,
        200,
        results_page(
            40,
            &[
                ("Golf VII", "80.000 km", "EZ 2015", "11.000 €"),
                ("Golf V", "Abgeholt", "EZ 2006", "VB"),
            ],
        ),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    let mut sink = CsvSink::create(&out).unwrap();

    let query = SearchQuery::new("vw", "golf").unwrap();
    let paginator = Paginator::new(&server.uri(), 25, 50).unwrap();
    let count_fetcher = fetcher();
    let page_fetcher = fetcher();

    let report = Pipeline::new(paginator, &count_fetcher, &page_fetcher)
        .with_delay(Duration::ZERO)
        .with_reuse_first_page(false)
        .run(&query, &mut sink)
        .await
        .unwrap();

    assert_eq!(report.result_count, 40.0);
    assert_eq!(report.page_count, 2);
    assert_eq!(report.records_written, 3);

    let rows = read_csv(&out);
    assert_eq!(
        rows,
        vec![
            ListingRecord::new("Golf VI, TÜV neu", "150.000 km", "EZ 2010", "5.500 €"),
            ListingRecord::new("Golf VII", "80.000 km", "EZ 2015", "11.000 €"),
            ListingRecord::new("Golf V", "Abgeholt", "EZ 2006", "VB"),
        ]
    );

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "/s-autos/seite:1/vw-golf/k0c216",
            "/s-autos/seite:1/vw-golf/k0c216",
            "/s-autos/seite:2/vw-golf/k0c216",
        ]
    );
}

#[tokio::test]
async fn test_failed_page_keeps_earlier_output() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        200,
        results_page(60, &[("Golf IV", "220.000 km", "EZ 2001", "1.200 €")]),
    )
    .await;
    mount_page(&server, 2, 404, String::new()).await;
    mount_page(
        &server,
        3,
        200,
        results_page(60, &[("never", "fetched", "at", "all")]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    let mut sink = CsvSink::create(&out).unwrap();

    let query = SearchQuery::new("vw", "golf").unwrap();
    let paginator = Paginator::new(&server.uri(), 25, 50).unwrap();
    let count_fetcher = fetcher();
    let page_fetcher = fetcher();

    let err = Pipeline::new(paginator, &count_fetcher, &page_fetcher)
        .with_delay(Duration::ZERO)
        .run(&query, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch(FetchError::HttpStatus { status: 404, .. })
    ));

    let rows = read_csv(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Golf IV");

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .all(|r| !r.url.path().starts_with("/s-autos/seite:3/"))
    );
}

#[tokio::test]
async fn test_count_page_error_writes_only_header() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 500, String::new()).await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    let mut sink = CsvSink::create(&out).unwrap();

    let query = SearchQuery::new("vw", "golf").unwrap();
    let paginator = Paginator::new(&server.uri(), 25, 50).unwrap();
    let count_fetcher = fetcher();
    let page_fetcher = fetcher();

    let err = Pipeline::new(paginator, &count_fetcher, &page_fetcher)
        .run(&query, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch(FetchError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Title,Mileage,Year,Price\n"
    );
}
