mod common;

use common::{day, record, setup, FailingNthUpsert, StaticPage};
use mandiprice::MandiPrice;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
fn test_upsert_same_key_twice_keeps_one_row() {
    let app = setup();
    let d = day(2025, 7, 4);

    app.upsert_all(&[record("Apple", "Kasmir/Shimla - II", 7860.0, 7800.0, d)])
        .unwrap();
    app.upsert_all(&[record("Apple", "Kasmir/Shimla - II", 8000.0, 7900.0, d)])
        .unwrap();

    let snap = app.latest_prices(d);
    assert_eq!(snap.total_items, 1);
    assert_eq!(snap.data[0].max_price.value(), 8000.0);
    assert_eq!(snap.data[0].min_price.value(), 7900.0);
}

#[test]
fn test_identical_batch_is_idempotent() {
    let app = setup();
    let d = day(2025, 7, 4);
    let batch = vec![
        record("Onion", "Red", 2200.0, 2000.0, d),
        record("Potato", "Jyoti", 1500.0, 1300.0, d),
    ];

    app.upsert_all(&batch).unwrap();
    app.upsert_all(&batch).unwrap();
    app.upsert_all(&batch).unwrap();

    let snap = app.latest_prices(d);
    assert_eq!(snap.total_items, 2);
    assert_eq!(snap.data, batch);
}

#[test]
fn test_key_includes_variety_and_date() {
    let app = setup();
    app.upsert_all(&[
        record("Onion", "Red", 2200.0, 2000.0, day(2025, 7, 4)),
        record("Onion", "White", 2500.0, 2300.0, day(2025, 7, 4)),
        record("Onion", "Red", 2100.0, 1900.0, day(2025, 7, 3)),
    ])
    .unwrap();

    assert_eq!(app.latest_prices(day(2025, 7, 4)).total_items, 2);
    assert_eq!(app.latest_prices(day(2025, 7, 3)).total_items, 1);
    assert_eq!(app.price_history(100).total_items, 3);
}

#[test]
fn test_rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.db");
    let path = path.to_str().unwrap();

    {
        let app = mandiprice::MandiPrice::with_source(path, std::sync::Arc::new(common::UnreachableSource)).unwrap();
        app.upsert_all(&[record("Wheat", "Dara", 2450.0, 2300.0, day(2025, 7, 4))])
            .unwrap();
    }

    let app = mandiprice::MandiPrice::with_source(path, std::sync::Arc::new(common::UnreachableSource)).unwrap();
    let snap = app.latest_prices(day(2025, 7, 4));
    assert_eq!(snap.total_items, 1);
    assert_eq!(snap.data[0].commodity, "Wheat");
}

#[test]
fn test_failed_upsert_stops_batch_and_keeps_earlier_rows() {
    let repo = Arc::new(FailingNthUpsert::new(3));
    let app = MandiPrice::with_parts(Arc::new(StaticPage::new("")), repo.clone()).unwrap();
    let d = day(2025, 7, 4);

    let result = app.upsert_all(&[
        record("Apple", "Delicious", 9000.0, 8500.0, d),
        record("Banana", "Robusta", 1800.0, 1600.0, d),
        record("Onion", "Red", 2200.0, 2000.0, d),
        record("Wheat", "Dara", 2450.0, 2300.0, d),
    ]);

    let err = result.unwrap_err();
    assert!(err.to_string().contains("UNIQUE constraint failed"));
    assert_eq!(repo.attempts.load(Ordering::SeqCst), 3);

    let names: Vec<_> = app
        .latest_prices(d)
        .data
        .into_iter()
        .map(|r| r.commodity)
        .collect();
    assert_eq!(names, vec!["Apple", "Banana"]);
}
