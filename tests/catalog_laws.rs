use estate_token_demo::domain::catalog::{
    CatalogEngine, Category, Financials, FilterCriteria, ListingId, ListingRecord, ListingStatus, Location, SortKey,
};
use estate_token_demo::domain::session::FavoritesSet;
use quickcheck_macros::quickcheck;

/// Records whose yields come from `yields` (tenths of a percent, so ties are common)
fn records(yields: &[u8]) -> Vec<ListingRecord> {
    yields
        .iter()
        .enumerate()
        .map(|(i, y)| ListingRecord {
            id: ListingId::new(format!("listing-{i}")),
            name: format!("Listing {i}"),
            symbol: None,
            location: Location {
                city: if i % 2 == 0 { "Oslo" } else { "Bergen" }.to_string(),
                country: "Norway".to_string(),
            },
            category: if i % 3 == 0 { Category::Residential } else { Category::Commercial },
            status: ListingStatus::Funding,
            financials: Financials {
                total_value: 1_000_000.0 + i as f64,
                token_price: 100.0,
                total_tokens: 10_000,
                available_tokens: 1_000,
                minimum_investment: 500.0,
                estimated_yield: f64::from(*y % 16) / 2.0,
                annual_rent: None,
                expenses: None,
            },
            market: None,
            funding_deadline: None,
            funding_progress: f64::from(*y % 101),
            network: "Polygon".to_string(),
            token_symbol: None,
            is_favorite: false,
        })
        .collect()
}

fn ids(view: &[&ListingRecord]) -> Vec<ListingId> {
    view.iter().map(|r| r.id.clone()).collect()
}

#[quickcheck]
fn yield_sort_is_descending(yields: Vec<u8>) -> bool {
    let listings = records(&yields);
    let view = CatalogEngine::new()
        .apply(&listings, &FilterCriteria::new(SortKey::Yield), &FavoritesSet::new())
        .unwrap();
    view.records()
        .windows(2)
        .all(|w| w[0].financials.estimated_yield >= w[1].financials.estimated_yield)
}

#[quickcheck]
fn sort_is_stable_for_ties(yields: Vec<u8>) -> bool {
    let listings = records(&yields);
    let view = CatalogEngine::new()
        .apply(&listings, &FilterCriteria::new(SortKey::Yield), &FavoritesSet::new())
        .unwrap();
    // ids are numbered in input order, so equal yields must keep ascending indices
    let index = |r: &ListingRecord| -> usize { r.id.trim_start_matches("listing-").parse().unwrap() };
    view.records().windows(2).all(|w| {
        w[0].financials.estimated_yield != w[1].financials.estimated_yield || index(w[0]) < index(w[1])
    })
}

#[quickcheck]
fn unfiltered_view_is_a_permutation(yields: Vec<u8>) -> bool {
    let listings = records(&yields);
    let view = CatalogEngine::new()
        .apply(&listings, &FilterCriteria::new(SortKey::FundingProgress), &FavoritesSet::new())
        .unwrap();
    let mut sorted = ids(view.records());
    sorted.sort();
    let mut expected: Vec<ListingId> = listings.iter().map(|r| r.id.clone()).collect();
    expected.sort();
    sorted == expected
}

#[quickcheck]
fn apply_is_idempotent(yields: Vec<u8>, search_oslo: bool) -> bool {
    let listings = records(&yields);
    let criteria = FilterCriteria::new(SortKey::Yield).with_search(if search_oslo { "oslo" } else { "" });
    let engine = CatalogEngine::new();
    let favorites = FavoritesSet::new();

    let once = engine.apply(&listings, &criteria, &favorites).unwrap().to_owned_records();
    let twice = engine.apply(&once, &criteria, &favorites).unwrap().to_owned_records();
    once == twice
}

#[quickcheck]
fn filtering_never_adds_records(yields: Vec<u8>, min_yield: u8) -> bool {
    let listings = records(&yields);
    let criteria = FilterCriteria::new(SortKey::Newest).with_min_yield(f64::from(min_yield % 10));
    let view = CatalogEngine::new()
        .apply(&listings, &criteria, &FavoritesSet::new())
        .unwrap();
    view.len() <= listings.len() && view.iter().all(|r| r.financials.estimated_yield >= f64::from(min_yield % 10))
}
