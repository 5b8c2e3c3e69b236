use crate::alignment::tokenization::casefold;
use crate::types::ConnectorSet;

/// Search a bounded window of `target` around `entry` for a known connector.
///
/// The window is `[entry + start, entry + start + frame)`, clamped to the
/// sentence. Candidates of width `1..=max_window` are tried shortest first;
/// for each width the search alternates right and left of `entry`, right
/// first, moving one token outward per step:
///
/// ```text
///   width 1:  entry+1, entry, entry+2, entry-1, entry+3, entry-2, ...
///   width a:  the a tokens ending at each of those positions
/// ```
///
/// Returns the first candidate found in `connectors` (space-joined and
/// case-folded), or the empty string when the window holds none.
pub fn search_equivalent(
    target: &[String],
    entry: usize,
    frame: usize,
    start: isize,
    max_window: usize,
    connectors: &ConnectorSet,
) -> String {
    if target.is_empty() {
        return String::new();
    }

    let len = target.len() as i64;
    let entry = entry as i64;
    let frame = frame as i64;
    let first = (entry + start as i64).clamp(0, len);
    let last = (entry + start as i64 + frame).clamp(0, len);

    let mut joined = String::new();
    for width in 1..=max_window as i64 {
        // Next unvisited offset on each side; None once that side is exhausted.
        let mut right = Some(1i64);
        let mut left = Some(0i64);
        loop {
            if let Some(offset) = right {
                let end = entry + offset + 1;
                if offset >= frame || end > last {
                    right = None;
                } else {
                    let begin = end - width;
                    if begin >= first {
                        if let Some(hit) = matching_candidate(
                            &target[begin as usize..end as usize],
                            connectors,
                            &mut joined,
                        ) {
                            return hit;
                        }
                    }
                    right = Some(offset + 1);
                }
            } else if left.is_none() {
                break;
            }

            if let Some(offset) = left {
                let end = entry + offset + 1;
                let begin = end - width;
                if offset <= -frame || begin < first {
                    left = None;
                } else {
                    if end <= last {
                        if let Some(hit) = matching_candidate(
                            &target[begin as usize..end as usize],
                            connectors,
                            &mut joined,
                        ) {
                            return hit;
                        }
                    }
                    left = Some(offset - 1);
                }
            } else if right.is_none() {
                break;
            }
        }
    }

    String::new()
}

/// Join `window` with single spaces into `buf` and test it against `connectors`.
fn matching_candidate(
    window: &[String],
    connectors: &ConnectorSet,
    buf: &mut String,
) -> Option<String> {
    buf.clear();
    for (idx, token) in window.iter().enumerate() {
        if idx > 0 {
            buf.push(' ');
        }
        buf.push_str(token);
    }

    if connectors.contains(buf) {
        return Some(buf.clone());
    }
    // Tokens are normally folded once per line already; only re-fold if needed.
    if buf.chars().any(|c| c.is_uppercase() || c == 'ß') {
        let folded = casefold(buf);
        if connectors.contains(&folded) {
            return Some(folded);
        }
    }
    None
}
