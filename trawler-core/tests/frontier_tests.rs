// Tests for the shared frontier

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use trawler_core::frontier::Frontier;

// ============================================================================
// Stack Discipline Tests
// ============================================================================

#[test]
fn test_pop_returns_most_recent_first() {
    let frontier = Frontier::new();
    frontier.push("/a".to_string());
    frontier.push("/b".to_string());
    frontier.push("/c".to_string());

    assert_eq!(frontier.pop().as_deref(), Some("/c"));
    assert_eq!(frontier.pop().as_deref(), Some("/b"));
    assert_eq!(frontier.pop().as_deref(), Some("/a"));
    assert_eq!(frontier.pop(), None);
}

#[test]
fn test_empty_frontier() {
    let frontier = Frontier::new();
    assert!(frontier.is_empty());
    assert_eq!(frontier.len(), 0);
    assert!(frontier.drain_batch(4).is_empty());
}

#[test]
fn test_drain_batch_is_bounded_and_in_pop_order() {
    let frontier = Frontier::new();
    frontier.push_all((1..=5).map(|i| format!("/p{}", i)));

    let batch = frontier.drain_batch(3);
    assert_eq!(batch, vec!["/p5", "/p4", "/p3"]);
    assert_eq!(frontier.pending(), vec!["/p1", "/p2"]);

    let rest = frontier.drain_batch(3);
    assert_eq!(rest, vec!["/p2", "/p1"]);
    assert!(frontier.is_empty());
}

#[test]
fn test_drain_batch_zero_takes_nothing() {
    let frontier = Frontier::new();
    frontier.push("/".to_string());
    assert!(frontier.drain_batch(0).is_empty());
    assert_eq!(frontier.len(), 1);
}

// ============================================================================
// Deduplication Tests
// ============================================================================

#[test]
fn test_duplicates_accumulate_by_default() {
    let frontier = Frontier::new();
    assert!(!frontier.is_dedup());
    assert!(frontier.push("/same".to_string()));
    assert!(frontier.push("/same".to_string()));
    assert_eq!(frontier.len(), 2);
}

#[test]
fn test_dedup_drops_previously_accepted_paths() {
    let frontier = Frontier::with_dedup();
    assert!(frontier.is_dedup());
    assert!(frontier.push("/same".to_string()));
    assert!(!frontier.push("/same".to_string()));
    assert_eq!(frontier.len(), 1);

    // Still rejected after it has been popped.
    assert_eq!(frontier.pop().as_deref(), Some("/same"));
    assert!(!frontier.push("/same".to_string()));
    assert!(frontier.is_empty());
}

#[test]
fn test_push_all_counts_accepted() {
    let frontier = Frontier::with_dedup();
    let accepted = frontier.push_all(vec![
        "/a".to_string(),
        "/b".to_string(),
        "/a".to_string(),
        "/c".to_string(),
    ]);
    assert_eq!(accepted, 3);
    assert_eq!(frontier.len(), 3);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[test]
fn test_concurrent_pushes_lose_nothing() {
    const WORKERS: usize = 8;
    const ITEMS: usize = 500;

    let frontier = Frontier::new();

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let frontier = &frontier;
            scope.spawn(move || {
                for item in 0..ITEMS {
                    frontier.push(format!("/w{}/i{}", worker, item));
                }
            });
        }
    });

    assert_eq!(frontier.len(), WORKERS * ITEMS);

    let mut remaining = frontier.pending();
    remaining.sort();
    let mut expected: Vec<String> = (0..WORKERS)
        .flat_map(|w| (0..ITEMS).map(move |i| format!("/w{}/i{}", w, i)))
        .collect();
    expected.sort();
    assert_eq!(remaining, expected);
}

#[test]
fn test_concurrent_pushes_and_pops_balance() {
    const WORKERS: usize = 6;
    const ITEMS: usize = 400;

    let frontier = Frontier::new();
    let popped = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let frontier = &frontier;
            let popped = &popped;
            scope.spawn(move || {
                let mut mine = Vec::new();
                for item in 0..ITEMS {
                    frontier.push(format!("/w{}/i{}", worker, item));
                    if item % 3 == 0
                        && let Some(path) = frontier.pop()
                    {
                        mine.push(path);
                    }
                }
                for path in frontier.drain_batch(7) {
                    mine.push(path);
                }
                popped.lock().unwrap().extend(mine);
            });
        }
    });

    let popped = popped.into_inner().unwrap();
    let remaining = frontier.pending();

    assert_eq!(popped.len() + remaining.len(), WORKERS * ITEMS);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in popped.into_iter().chain(remaining) {
        *counts.entry(path).or_insert(0) += 1;
    }
    assert_eq!(counts.len(), WORKERS * ITEMS);
    assert!(counts.values().all(|&count| count == 1));
}

#[test]
fn test_concurrent_dedup_accepts_each_path_once() {
    const WORKERS: usize = 8;
    const ITEMS: usize = 200;

    let frontier = Frontier::with_dedup();

    let accepted: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                let frontier = &frontier;
                scope.spawn(move || {
                    frontier.push_all((0..ITEMS).map(|i| format!("/shared/{}", i)))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(accepted, ITEMS);
    assert_eq!(frontier.len(), ITEMS);
}
