use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One person's assignment as seen by the sweep: `[start, end)` in the
/// schedule at index `schedule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub schedule: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A maximal stretch during which the set of covering schedules is constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Schedule indices, ascending, no duplicates. Never empty.
    pub active: Vec<usize>,
}

/// Cut one person's spans into segments with a constant active set.
///
/// Boundaries are every distinct span start or end. Between two consecutive
/// boundaries nothing starts or ends, so the active set is constant there.
/// Uncovered gaps are not returned. Empty spans (`start >= end`) are ignored.
/// Two overlapping spans in the same schedule count that schedule once.
pub fn sweep(spans: &[Span]) -> Vec<ActiveSegment> {
    let mut events: Vec<(DateTime<Utc>, i32, usize)> = Vec::with_capacity(spans.len() * 2);
    for span in spans.iter().filter(|s| s.start < s.end) {
        events.push((span.start, 1, span.schedule));
        events.push((span.end, -1, span.schedule));
    }
    events.sort_unstable_by_key(|&(at, _, _)| at);

    // schedule index -> number of open spans
    let mut open: BTreeMap<usize, u32> = BTreeMap::new();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < events.len() {
        let at = events[i].0;
        while i < events.len() && events[i].0 == at {
            let (_, delta, schedule) = events[i];
            if delta > 0 {
                *open.entry(schedule).or_insert(0) += 1;
            } else if let Some(count) = open.get_mut(&schedule) {
                *count -= 1;
                if *count == 0 {
                    open.remove(&schedule);
                }
            }
            i += 1;
        }

        if let Some(&(next, _, _)) = events.get(i) {
            if !open.is_empty() {
                segments.push(ActiveSegment {
                    start: at,
                    end: next,
                    active: open.keys().copied().collect(),
                });
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, 0, 0).unwrap()
    }

    fn span(schedule: usize, start: u32, end: u32) -> Span {
        Span {
            schedule,
            start: t(start),
            end: t(end),
        }
    }

    #[test]
    fn single_span_is_one_segment() {
        let segs = sweep(&[span(0, 8, 12)]);
        assert_eq!(
            segs,
            vec![ActiveSegment {
                start: t(8),
                end: t(12),
                active: vec![0]
            }]
        );
    }

    #[test]
    fn partial_overlap_gives_three_segments() {
        let segs = sweep(&[span(1, 10, 14), span(0, 8, 12)]);
        let shapes: Vec<_> = segs.iter().map(|s| (s.start, s.end, s.active.clone())).collect();
        assert_eq!(
            shapes,
            vec![
                (t(8), t(10), vec![0]),
                (t(10), t(12), vec![0, 1]),
                (t(12), t(14), vec![1]),
            ]
        );
    }

    #[test]
    fn gaps_are_skipped() {
        let segs = sweep(&[span(0, 1, 2), span(0, 5, 6)]);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].end, t(2));
        assert_eq!(segs[1].start, t(5));
    }

    #[test]
    fn touching_spans_do_not_overlap() {
        let segs = sweep(&[span(0, 1, 3), span(1, 3, 5)]);
        assert!(segs.iter().all(|s| s.active.len() == 1));
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn nested_span_splits_outer() {
        let segs = sweep(&[span(0, 0, 10), span(2, 4, 6)]);
        let actives: Vec<_> = segs.iter().map(|s| s.active.clone()).collect();
        assert_eq!(actives, vec![vec![0], vec![0, 2], vec![0]]);
    }

    #[test]
    fn empty_spans_are_ignored() {
        assert!(sweep(&[span(0, 4, 4)]).is_empty());
        let segs = sweep(&[span(0, 2, 6), span(1, 4, 4)]);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].active, vec![0]);
    }

    #[test]
    fn same_schedule_overlap_counts_once() {
        let segs = sweep(&[span(0, 0, 4), span(0, 2, 6)]);
        assert!(segs.iter().all(|s| s.active == vec![0]));
        assert_eq!(segs.first().map(|s| s.start), Some(t(0)));
        assert_eq!(segs.last().map(|s| s.end), Some(t(6)));
    }

    #[test]
    fn no_spans_no_segments() {
        assert!(sweep(&[]).is_empty());
    }
}
