use std::cmp::Reverse;

use crate::model::Span;

/// Merges identical spans that touch or overlap.
///
/// `<strong>a</strong><strong>b</strong>` yields one strong span over `ab`.
/// The result is ordered by start ascending, end descending.
pub(crate) fn merge_adjacent(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| (s.start, Reverse(s.end)));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        // Same-kind spans already merged are disjoint, so at most one can reach `span`.
        if let Some(prev) = merged
            .iter_mut()
            .rev()
            .find(|prev| prev.kind == span.kind && prev.end >= span.start)
        {
            prev.end = prev.end.max(span.end);
            continue;
        }
        merged.push(span);
    }
    merged
}
