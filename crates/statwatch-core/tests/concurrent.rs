//! Concurrent ingest and query against one store.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use std::sync::Arc;
use std::thread;

use statwatch_core::MetricType;

use common::{one, open, tick};

const WINDOW: usize = 64;
const TICKS: i64 = 2_000;

#[test]
fn readers_never_see_torn_series() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(open(&dir.path().join("m.json"), WINDOW));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for ts in 0..TICKS {
                store.ingest(&tick(ts)).unwrap();
            }
        })
    };

    let readers: Vec<_> = MetricType::ALL
        .into_iter()
        .map(|m| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..500 {
                    let got = store.range_query(m, 0, TICKS);
                    assert!(got.len() <= WINDOW);
                    // contiguous run of ticks: a consistent cut of one series
                    for w in got.windows(2) {
                        assert_eq!(w[1].timestamp, w[0].timestamp + 1, "metric={m}");
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    for m in MetricType::ALL {
        let s = store.series(m);
        assert_eq!(s.len(), WINDOW);
        assert_eq!(s.first().unwrap().timestamp, TICKS - WINDOW as i64);
        assert_eq!(s.last().unwrap().timestamp, TICKS - 1);
    }
}

#[test]
fn persist_while_ingesting_writes_valid_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let store = Arc::new(open(&path, WINDOW));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for ts in 0..500 {
                store.ingest(&tick(ts)).unwrap();
            }
        })
    };
    let flusher = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..20 {
                store.persist().unwrap();
            }
        })
    };
    writer.join().unwrap();
    flusher.join().unwrap();
    store.persist().unwrap();

    let reopened = open(&path, WINDOW);
    for m in MetricType::ALL {
        assert_eq!(reopened.series(m), store.series(m));
    }
}

#[test]
fn writer_per_type_alongside_readers() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(open(&dir.path().join("m.json"), WINDOW));

    let writers: Vec<_> = MetricType::ALL
        .into_iter()
        .map(|m| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for ts in 0..TICKS {
                    store.ingest(&one(m, ts, ts as f64)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..300 {
                    for m in MetricType::ALL {
                        let got = store.range_query(m, 0, TICKS);
                        assert!(got.len() <= WINDOW, "metric={m}");
                        for w in got.windows(2) {
                            assert_eq!(w[1].timestamp, w[0].timestamp + 1, "metric={m}");
                            assert_eq!(w[1].value, w[1].timestamp as f64);
                        }
                    }
                }
            })
        })
        .collect();

    for h in writers.into_iter().chain(readers) {
        h.join().unwrap();
    }

    for m in MetricType::ALL {
        let s = store.series(m);
        assert_eq!(s.len(), WINDOW, "metric={m}");
        assert_eq!(s.first().unwrap().timestamp, TICKS - WINDOW as i64);
        assert_eq!(s.last().unwrap().timestamp, TICKS - 1);
    }
}
