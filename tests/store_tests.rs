//! Event store behavior against a file-backed database.

mod harness;

use chrono::{DateTime, Duration, TimeZone, Utc};
use harness::temp_db::TempDb;
use peaklabel::adapter::outbound::sqlite::{SqliteEventStore, StoreConfig};
use peaklabel::domain::{
    Detection, EventKind, EventSource, FeatureSnapshot, FeatureVector, TimeRange, TrendLabel,
    Validation,
};
use peaklabel::port::outbound::store::EventStore;

fn t(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
}

fn manual(symbol: &str, at: DateTime<Utc>, price: f64) -> Detection {
    Detection::try_new(symbol, at, EventKind::Peak, price)
        .unwrap()
        .with_source(EventSource::ManualLabel)
}

#[test]
fn manual_detection_round_trips_through_query() {
    let db = TempDb::create("roundtrip");
    let store = db.store();

    store.record_detection(&manual("BTC", t(10), 45000.0)).unwrap();

    let joined = store
        .query_joined("BTC", TimeRange::between(t(9), t(11)))
        .unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].detection.price, 45000.0);
    assert_eq!(joined[0].detection.source, EventSource::ManualLabel);
}

#[test]
fn data_survives_reopen() {
    let db = TempDb::create("reopen");
    {
        let store = db.store();
        store.record_detection(&manual("ETH", t(11), 2800.0)).unwrap();
        store
            .upsert_validation(
                &Validation::try_new("ETH", t(11), Some(true), Some(TrendLabel::Uptrend)).unwrap(),
            )
            .unwrap();
    }

    let reopened = SqliteEventStore::open(&db.url(), &StoreConfig::default()).unwrap();
    let joined = reopened.query_joined("ETH", TimeRange::all()).unwrap();
    assert_eq!(joined.len(), 1);
    assert!(joined[0].is_valid());
}

#[test]
fn validation_upsert_keeps_latest_label() {
    let db = TempDb::create("upsert");
    let store = db.store();
    store.record_detection(&manual("BTC", t(10), 45000.0)).unwrap();

    for trend in [TrendLabel::Uptrend, TrendLabel::Sideways] {
        store
            .upsert_validation(&Validation::try_new("BTC", t(10), Some(true), Some(trend)).unwrap())
            .unwrap();
    }

    let joined = store.query_joined("BTC", TimeRange::all()).unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(
        joined[0].validation.as_ref().unwrap().trend_label,
        Some(TrendLabel::Sideways)
    );
}

#[test]
fn duplicate_detection_conflicts_only_when_enabled() {
    let db = TempDb::create("dedup");
    let strict = db.store_with(&StoreConfig {
        reject_duplicate_detections: true,
        ..StoreConfig::default()
    });
    let detection = manual("BTC", t(10), 45000.0);

    strict.record_detection(&detection).unwrap();
    assert!(strict.record_detection(&detection).unwrap_err().is_conflict());

    let lenient = SqliteEventStore::open(&db.url(), &StoreConfig::default()).unwrap();
    lenient.record_detection(&detection).unwrap();
    assert_eq!(lenient.query_joined("BTC", TimeRange::all()).unwrap().len(), 2);
}

#[test]
fn range_filter_is_half_open() {
    let db = TempDb::create("range");
    let store = db.store();
    for hour in [8, 10, 12] {
        store.record_detection(&manual("BTC", t(hour), 1.0)).unwrap();
    }

    let joined = store
        .query_joined("BTC", TimeRange::new(Some(t(10)), Some(t(12))))
        .unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].detection.detect_time, t(10));

    let open_start = store.query_joined("BTC", TimeRange::new(None, Some(t(12)))).unwrap();
    assert_eq!(open_start.len(), 2);
}

#[test]
fn sub_second_instants_keep_order() {
    let db = TempDb::create("order");
    let store = db.store();
    let base = t(10);
    let times = [
        base + Duration::milliseconds(5),
        base,
        base + Duration::seconds(1),
    ];
    for at in times {
        store.record_detection(&manual("BTC", at, 1.0)).unwrap();
    }

    let joined = store.query_joined("BTC", TimeRange::all()).unwrap();
    let got: Vec<_> = joined.iter().map(|e| e.detection.detect_time).collect();
    assert_eq!(got, vec![times[2], times[0], times[1]]);
}

#[test]
fn feature_snapshots_accumulate_per_key() {
    let db = TempDb::create("snapshots");
    let store = db.store();
    let snapshot = FeatureSnapshot {
        symbol: "BTC".into(),
        timestamp: t(10),
        price: 45000.0,
        features: FeatureVector {
            atr_14: Some(120.5),
            ..FeatureVector::empty()
        },
    };

    let first = store.append_feature_snapshot(&snapshot).unwrap();
    let second = store.append_feature_snapshot(&snapshot).unwrap();
    assert!(second > first);

    let stored = store.feature_snapshots("BTC", TimeRange::all()).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].features.atr_14, Some(120.5));
    assert_eq!(stored[0].features.rsi_14, None);
}

#[test]
fn writers_on_separate_stores_get_unique_ids() {
    let db = TempDb::create("concurrent");
    let a = db.store();
    let b = SqliteEventStore::open(&db.url(), &StoreConfig::default()).unwrap();

    let ids: Vec<i32> = std::thread::scope(|scope| {
        let handles: Vec<_> = [&a, &b]
            .into_iter()
            .enumerate()
            .map(|(n, store)| {
                scope.spawn(move || {
                    (0..20)
                        .map(|i| {
                            let at = t(0) + Duration::minutes((n * 100 + i) as i64);
                            store.record_detection(&manual("BTC", at, 1.0)).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 40);
    assert_eq!(a.query_joined("BTC", TimeRange::all()).unwrap().len(), 40);
}
