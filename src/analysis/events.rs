//! Significant frames and event segmentation.
//!
//! A frame is significant when the empirical p-value of its RSS against the
//! pooled null distribution is below the critical value. Contiguous runs of
//! significant frames form one event, represented by the frame of maximum
//! RSS within the run.

use serde::{Deserialize, Serialize};

use crate::null_model::NullDistribution;

/// One detected co-fluctuation event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// First significant frame of the run.
    pub start: usize,
    /// Last significant frame of the run (inclusive).
    pub end: usize,
    /// Frame of maximum RSS within the run.
    pub peak: usize,
    /// RSS at the peak.
    pub peak_rss: f64,
}

impl Event {
    /// Number of frames in the run.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; an event spans at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Output of the event detection stage.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetection {
    /// Empirical p-value of every frame.
    pub p_values: Vec<f64>,
    /// Frames with p-value below the critical value, ascending.
    pub significant: Vec<usize>,
    /// Detected events, ascending by start.
    pub events: Vec<Event>,
    /// Peak frame of every event, ascending.
    pub peaks: Vec<usize>,
}

/// Empirical p-value of every observed RSS value against the pooled null.
///
/// `p[t]` is the fraction of pooled null values at least as large as
/// `rss[t]`, so p-values never increase as RSS grows.
pub fn empirical_p_values(rss: &[f64], null: &NullDistribution) -> Vec<f64> {
    null.p_values(rss)
}

/// Frames whose p-value is strictly below `critical_p`, ascending.
pub fn significant_frames(p_values: &[f64], critical_p: f64) -> Vec<usize> {
    p_values
        .iter()
        .enumerate()
        .filter(|(_, &p)| p < critical_p)
        .map(|(t, _)| t)
        .collect()
}

/// Index of the first maximum of `rss` over `frames`.
fn peak_of(frames: &[usize], rss: &[f64]) -> usize {
    let mut best = frames[0];
    for &t in &frames[1..] {
        if rss[t] > rss[best] {
            best = t;
        }
    }
    best
}

fn event_of(frames: &[usize], rss: &[f64]) -> Event {
    let peak = peak_of(frames, rss);
    Event {
        start: frames[0],
        end: frames[frames.len() - 1],
        peak,
        peak_rss: rss[peak],
    }
}

/// Collapse ascending `frames` into runs of consecutive indices.
///
/// A run breaks wherever `frames[k] != frames[k - 1] + 1`. Ties for the
/// maximum RSS within a run go to the earliest frame.
pub fn segment_events(frames: &[usize], rss: &[f64]) -> Vec<Event> {
    let mut events = Vec::new();
    let mut run_start = 0;

    for k in 1..=frames.len() {
        let breaks = k == frames.len() || frames[k] != frames[k - 1] + 1;
        if breaks && k > run_start {
            events.push(event_of(&frames[run_start..k], rss));
            run_start = k;
        }
    }

    events
}

/// Treat every frame as its own event.
pub fn single_frame_events(frames: &[usize], rss: &[f64]) -> Vec<Event> {
    frames
        .iter()
        .map(|&t| Event {
            start: t,
            end: t,
            peak: t,
            peak_rss: rss[t],
        })
        .collect()
}

/// Run the full detection stage on an observed RSS vector.
pub fn detect_events(
    rss: &[f64],
    null: &NullDistribution,
    critical_p: f64,
    segment: bool,
) -> EventDetection {
    let p_values = empirical_p_values(rss, null);
    let significant = significant_frames(&p_values, critical_p);

    let events = if segment {
        segment_events(&significant, rss)
    } else {
        single_frame_events(&significant, rss)
    };
    let peaks = events.iter().map(|e| e.peak).collect();

    EventDetection {
        p_values,
        significant,
        events,
        peaks,
    }
}
