use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reprice_shopify::CatalogPage;
use rust_decimal::Decimal;

use super::*;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn variant(id: i64, inventory_item_id: Option<i64>, weight: Option<&str>) -> Variant {
    Variant {
        id,
        inventory_item_id,
        weight: weight.map(dec),
        price: Some(dec("1.00")),
    }
}

fn product(id: i64, variants: Vec<Variant>) -> Product {
    Product {
        id,
        title: Some(format!("Product {id}")),
        variants,
    }
}

fn server_error() -> ShopifyError {
    ShopifyError::UnexpectedStatus {
        status: 500,
        url: "https://fake.test/".to_owned(),
        body: "boom".to_owned(),
    }
}

#[derive(Default)]
struct Calls {
    pages: Vec<Option<String>>,
    cost_lookups: Vec<i64>,
    writes: Vec<(i64, Decimal, Instant)>,
}

/// In-memory catalog. Page `n` links to page `n + 1` through cursor `"p{n+1}"`.
#[derive(Default)]
struct FakeCatalog {
    pages: Vec<Vec<Product>>,
    /// Keep returning a cursor after the last page.
    endless: bool,
    failing_page: Option<usize>,
    costs: HashMap<i64, Option<String>>,
    failing_cost_items: HashSet<i64>,
    failing_writes: HashSet<i64>,
    calls: Mutex<Calls>,
}

impl FakeCatalog {
    fn with_pages(pages: Vec<Vec<Product>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    fn cost(mut self, inventory_item_id: i64, cost: Option<&str>) -> Self {
        self.costs
            .insert(inventory_item_id, cost.map(str::to_owned));
        self
    }

    fn writes(&self) -> Vec<(i64, Decimal)> {
        self.calls
            .lock()
            .unwrap()
            .writes
            .iter()
            .map(|(id, price, _)| (*id, *price))
            .collect()
    }

    fn page_requests(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().pages.clone()
    }

    fn cost_lookups(&self) -> Vec<i64> {
        self.calls.lock().unwrap().cost_lookups.clone()
    }
}

impl CatalogApi for FakeCatalog {
    async fn next_page(&self, cursor: Option<&PageCursor>) -> Result<CatalogPage, ShopifyError> {
        self.calls
            .lock()
            .unwrap()
            .pages
            .push(cursor.map(|c| c.as_str().to_owned()));

        let index = cursor.map_or(0, |c| {
            c.as_str()
                .trim_start_matches('p')
                .parse::<usize>()
                .expect("fake cursor")
        });
        if self.failing_page == Some(index) {
            return Err(server_error());
        }

        let products = self
            .pages
            .get(index.min(self.pages.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_default();
        let has_next = self.endless || index + 1 < self.pages.len();
        Ok(CatalogPage {
            products,
            next_cursor: has_next.then(|| PageCursor::new(format!("p{}", index + 1))),
        })
    }

    async fn inventory_cost(&self, inventory_item_id: i64) -> Result<Option<String>, ShopifyError> {
        self.calls.lock().unwrap().cost_lookups.push(inventory_item_id);
        if self.failing_cost_items.contains(&inventory_item_id) {
            return Err(server_error());
        }
        Ok(self.costs.get(&inventory_item_id).cloned().flatten())
    }

    async fn update_variant_price(&self, variant_id: i64, price: Decimal) -> Result<(), ShopifyError> {
        if self.failing_writes.contains(&variant_id) {
            return Err(server_error());
        }
        self.calls
            .lock()
            .unwrap()
            .writes
            .push((variant_id, price, Instant::now()));
        Ok(())
    }
}

fn no_throttle() -> WriteThrottle {
    WriteThrottle::from_millis(0)
}

#[tokio::test]
async fn reprices_reference_scenarios_and_skips_zero_cost() {
    let api = FakeCatalog::with_pages(vec![
        vec![product(
            1,
            vec![
                variant(11, Some(110), Some("2")),
                variant(12, Some(120), Some("8")),
            ],
        )],
        vec![product(
            2,
            vec![
                variant(21, Some(210), Some("4.9")),
                variant(22, Some(220), Some("1")),
            ],
        )],
    ])
    .cost(110, Some("10.00"))
    .cost(120, Some("10.00"))
    .cost(210, Some("7.49"))
    .cost(220, Some("0"));

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(
        api.writes(),
        vec![(11, dec("23")), (12, dec("33")), (21, dec("20"))]
    );
    assert_eq!(
        summary,
        RunSummary {
            pages: 2,
            variants: 4,
            updated: 3,
            skipped: 1,
            failed: 0,
        }
    );
}

#[tokio::test]
async fn visits_every_page_once_and_stops_without_cursor() {
    let api = FakeCatalog::with_pages(vec![
        vec![product(1, vec![variant(11, Some(1), Some("1"))])],
        vec![product(2, vec![variant(21, Some(1), Some("1"))])],
        vec![product(3, vec![variant(31, Some(1), Some("1"))])],
    ])
    .cost(1, Some("5"));

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(
        api.page_requests(),
        vec![None, Some("p1".to_owned()), Some("p2".to_owned())]
    );
    let written: Vec<i64> = api.writes().into_iter().map(|(id, _)| id).collect();
    assert_eq!(written, vec![11, 21, 31]);
    assert_eq!(summary.pages, 3);
}

#[tokio::test]
async fn empty_catalog_completes_with_one_page_request() {
    let api = FakeCatalog::with_pages(vec![vec![]]);

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(api.page_requests().len(), 1);
    assert_eq!(summary, RunSummary { pages: 1, ..RunSummary::default() });
}

#[tokio::test]
async fn invalid_costs_are_skipped_without_writes() {
    let api = FakeCatalog::with_pages(vec![vec![product(
        1,
        vec![
            variant(11, Some(110), Some("1")),
            variant(12, Some(120), Some("1")),
            variant(13, Some(130), Some("1")),
            variant(14, Some(140), Some("1")),
            variant(15, None, Some("1")),
        ],
    )]])
    .cost(110, None)
    .cost(120, Some("n/a"))
    .cost(130, Some("-4.00"));
    // 140 has no cost record at all.

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert!(api.writes().is_empty());
    assert_eq!(summary.skipped, 5);
    assert_eq!(summary.updated, 0);
    assert_eq!(
        api.cost_lookups(),
        vec![110, 120, 130, 140],
        "a variant without an inventory item is never looked up"
    );
}

#[tokio::test]
async fn cost_lookup_failure_is_item_local() {
    let mut api = FakeCatalog::with_pages(vec![vec![product(
        1,
        vec![
            variant(11, Some(110), Some("1")),
            variant(12, Some(120), Some("1")),
        ],
    )]])
    .cost(120, Some("10"));
    api.failing_cost_items.insert(110);

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(api.writes(), vec![(12, dec("23"))]);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.updated, 1);
}

#[tokio::test]
async fn write_failure_is_item_local() {
    let mut api = FakeCatalog::with_pages(vec![vec![product(
        1,
        vec![
            variant(11, Some(110), Some("1")),
            variant(12, Some(120), Some("9")),
        ],
    )]])
    .cost(110, Some("10"))
    .cost(120, Some("10"));
    api.failing_writes.insert(11);

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(api.writes(), vec![(12, dec("33"))]);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.updated, 1);
}

#[tokio::test]
async fn page_failure_aborts_without_requesting_further_pages() {
    let mut api = FakeCatalog::with_pages(vec![
        vec![product(1, vec![variant(11, Some(110), Some("1"))])],
        vec![product(2, vec![variant(21, Some(110), Some("1"))])],
        vec![product(3, vec![variant(31, Some(110), Some("1"))])],
    ])
    .cost(110, Some("10"));
    api.failing_page = Some(1);

    let result = run_repricing(&api, &PricePolicy::default(), &no_throttle()).await;

    assert!(
        matches!(result, Err(ShopifyError::UnexpectedStatus { status: 500, .. })),
        "expected the page error to propagate"
    );
    assert_eq!(api.page_requests(), vec![None, Some("p1".to_owned())]);
    assert_eq!(api.writes(), vec![(11, dec("23"))]);
}

#[tokio::test]
async fn shared_inventory_item_is_looked_up_per_variant() {
    let api = FakeCatalog::with_pages(vec![vec![product(
        1,
        vec![
            variant(11, Some(500), Some("1")),
            variant(12, Some(500), Some("6")),
        ],
    )]])
    .cost(500, Some("10"));

    run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(api.cost_lookups(), vec![500, 500]);
    assert_eq!(api.writes(), vec![(11, dec("23")), (12, dec("33"))]);
}

#[tokio::test]
async fn overflowing_cost_skips_only_that_variant() {
    let api = FakeCatalog::with_pages(vec![vec![product(
        1,
        vec![
            variant(11, Some(110), Some("1")),
            variant(12, Some(120), Some("1")),
        ],
    )]])
    .cost(110, Some("79228162514264337593543950335"))
    .cost(120, Some("10"));

    let summary = run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(api.writes(), vec![(12, dec("23"))]);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn missing_weight_prices_in_heavy_band() {
    let api = FakeCatalog::with_pages(vec![vec![product(1, vec![variant(11, Some(110), None)])]])
        .cost(110, Some("10"));

    run_repricing(&api, &PricePolicy::default(), &no_throttle())
        .await
        .unwrap();

    assert_eq!(api.writes(), vec![(11, dec("33"))]);
}

#[tokio::test]
async fn legacy_light_multiplier_is_honoured() {
    let api = FakeCatalog::with_pages(vec![vec![product(1, vec![variant(11, Some(110), Some("2"))])]])
        .cost(110, Some("10"));
    let policy = PricePolicy {
        light_multiplier: dec("1.5"),
        ..PricePolicy::default()
    };

    run_repricing(&api, &policy, &no_throttle()).await.unwrap();

    assert_eq!(api.writes(), vec![(11, dec("25"))]);
}

#[tokio::test]
async fn successive_writes_are_spaced_by_the_throttle() {
    let delay = Duration::from_millis(30);
    let api = FakeCatalog::with_pages(vec![vec![product(
        1,
        (1..=4).map(|i| variant(i, Some(110), Some("1"))).collect(),
    )]])
    .cost(110, Some("10"));

    run_repricing(&api, &PricePolicy::default(), &WriteThrottle::new(delay))
        .await
        .unwrap();

    let calls = api.calls.lock().unwrap();
    assert_eq!(calls.writes.len(), 4);
    let first = calls.writes.first().unwrap().2;
    let last = calls.writes.last().unwrap().2;
    assert!(
        last.duration_since(first) >= delay * 3,
        "4 writes must span at least 3 throttle intervals"
    );
    for pair in calls.writes.windows(2) {
        assert!(pair[1].2.duration_since(pair[0].2) >= delay);
    }
}

#[tokio::test]
async fn cycling_cursors_hit_the_page_limit() {
    let mut api = FakeCatalog::with_pages(vec![vec![]]);
    api.endless = true;

    let result =
        run_repricing_with_page_limit(&api, &PricePolicy::default(), &no_throttle(), 3).await;

    assert!(matches!(
        result,
        Err(ShopifyError::PaginationLimit { max_pages: 3 })
    ));
    assert_eq!(api.page_requests().len(), 3);
}
