use std::collections::HashSet;

use crate::types::Post;

/// Merge freshly normalized records into a channel's stored history.
///
/// Records already present keep their stored content; an incoming record
/// with a known id is dropped even if its text or media changed at the
/// source. The result is sorted by timestamp descending and, when
/// `max_entries` is set, truncated to the newest entries. Running the
/// same batch twice changes nothing.
pub fn reconcile(existing: Vec<Post>, incoming: Vec<Post>, max_entries: Option<usize>) -> Vec<Post> {
    let seen: HashSet<i64> = existing.iter().map(|p| p.id).collect();

    let mut merged: Vec<Post> = incoming
        .into_iter()
        .filter(|p| !seen.contains(&p.id))
        .collect();
    merged.extend(existing);

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if let Some(max) = max_entries {
        merged.truncate(max);
    }

    merged
}
