//! End-to-end integration tests.

mod common;

use coactivation::output::{format_report, to_json};
use coactivation::{CoactivationDetector, Error, NullPolicy, StatisticMode};

/// A shared burst on half the nodes is found as an event peaking at the burst.
#[test]
fn detects_planted_burst() {
    let series = common::noise_with_burst(50, 10, 25, 0..5, 6.0, 2024);

    let result = CoactivationDetector::new()
        .num_trials(100)
        .critical_p_value(0.01)
        .seed(7)
        .detect(&series, NullPolicy::CircularShift)
        .unwrap();

    assert!(result.peaks().contains(&25), "peaks: {:?}", result.peaks());
    assert_eq!(result.report.p_values[25], 0.0);

    let strongest = result
        .events()
        .iter()
        .max_by(|a, b| a.peak_rss.total_cmp(&b.peak_rss))
        .unwrap();
    assert_eq!(strongest.peak, 25);
    assert!(strongest.start <= 25 && 25 <= strongest.end);
}

/// Same seed, same answer.
#[test]
fn seeded_runs_are_reproducible() {
    let series = common::noise_with_burst(40, 6, 10, 0..3, 5.0, 99);
    let detector = CoactivationDetector::quick().seed(123);

    let a = detector.detect(&series, NullPolicy::CircularShift).unwrap();
    let b = detector.detect(&series, NullPolicy::CircularShift).unwrap();

    assert_eq!(a.null.rss_matrix(), b.null.rss_matrix());
    assert_eq!(a.report.p_values, b.report.p_values);
    assert_eq!(a.report.events, b.report.events);
}

/// Different seeds give different surrogates.
#[test]
fn seed_changes_null_model() {
    let series = common::noise(40, 6, 5);
    let a = CoactivationDetector::quick()
        .seed(1)
        .detect(&series, NullPolicy::CircularShift)
        .unwrap();
    let b = CoactivationDetector::quick()
        .seed(2)
        .detect(&series, NullPolicy::CircularShift)
        .unwrap();
    assert_ne!(a.null.rss_matrix(), b.null.rss_matrix());
}

/// Observed RSS does not depend on the null model.
#[test]
fn observed_rss_is_independent_of_null() {
    let series = common::noise(30, 5, 8);
    let a = CoactivationDetector::quick().seed(1).detect(&series, NullPolicy::CircularShift).unwrap();
    let b = CoactivationDetector::quick().seed(9).detect(&series, NullPolicy::CircularShift).unwrap();
    assert_eq!(a.report.rss, b.report.rss);
    assert_eq!(a.edges, b.edges);
}

/// Zero trials is rejected before any work.
#[test]
fn zero_trials_rejected() {
    let series = common::noise(20, 4, 1);
    let result = CoactivationDetector::new()
        .num_trials(0)
        .detect(&series, NullPolicy::CircularShift);
    assert!(matches!(result, Err(Error::InvalidInputShape(_))));
}

/// A single node cannot form an edge.
#[test]
fn single_node_rejected() {
    let series = common::noise(20, 1, 1);
    let result = coactivation::detect(&series);
    assert!(matches!(result, Err(Error::InvalidInputShape(_))));
}

/// Area-under-curve series need external surrogates.
#[test]
fn auc_requires_surrogates() {
    let series = common::noise(20, 4, 1);
    let result = CoactivationDetector::quick()
        .statistic(StatisticMode::AreaUnderCurve)
        .detect(&series, NullPolicy::CircularShift);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

/// Unsegmented detection reports every significant frame as its own event.
#[test]
fn unsegmented_events_are_single_frames() {
    let mut series = common::noise(60, 8, 31);
    for node in 0..6 {
        series[(30, node)] += 6.0;
        series[(31, node)] += 6.0;
    }

    let result = CoactivationDetector::new()
        .num_trials(50)
        .critical_p_value(0.01)
        .segment_events(false)
        .seed(3)
        .detect(&series, NullPolicy::CircularShift)
        .unwrap();

    for event in result.events() {
        assert_eq!(event.start, event.end);
        assert_eq!(event.start, event.peak);
    }
    let significant: Vec<usize> = (0..60)
        .filter(|&t| result.report.p_values[t] < 0.01)
        .collect();
    assert_eq!(result.peaks(), significant.as_slice());
}

/// Test report serialization and rendering.
#[test]
fn report_serialization() {
    let series = common::noise_with_burst(40, 6, 20, 0..4, 6.0, 11);
    let result = CoactivationDetector::quick()
        .seed(5)
        .detect(&series, NullPolicy::CircularShift)
        .unwrap();

    let json = to_json(&result.report).expect("Should serialize");
    assert!(json.contains("\"p_values\""));
    assert!(json.contains("\"events\""));
    assert!(json.contains("\"metadata\""));

    let text = format_report(&result.report);
    assert!(text.contains("40 time points, 6 nodes, 15 edges"));
}
