//! Candidate ordering and final selection

use crate::element::ParsedElement;

/// Stable partition: clickable candidates first, input order kept within
/// each group.
pub fn sort_clickable_first<'a>(candidates: &[&'a ParsedElement]) -> Vec<&'a ParsedElement> {
    let (mut clickable, rest): (Vec<_>, Vec<_>) =
        candidates.iter().copied().partition(|c| c.clickable);
    clickable.extend(rest);
    clickable
}

/// Candidate with the greatest depth; the first one wins a tie.
pub fn deepest_matching_element<'a>(
    candidates: &[&'a ParsedElement],
) -> Option<&'a ParsedElement> {
    candidates
        .iter()
        .copied()
        .fold(None, |best: Option<&'a ParsedElement>, c| match best {
            Some(b) if b.depth >= c.depth => Some(b),
            _ => Some(c),
        })
}

/// Pick by `index` (negative counts from the end), falling back to the first
/// candidate when out of range.
pub fn select_by_index<'a>(
    candidates: &[&'a ParsedElement],
    index: i64,
) -> Option<&'a ParsedElement> {
    let len = candidates.len() as i64;
    let normalized = if index < 0 { len + index } else { index };
    if (0..len).contains(&normalized) {
        candidates.get(normalized as usize).copied()
    } else {
        candidates.first().copied()
    }
}

/// Rank candidates and pick one.
///
/// An `index` that does not parse as an integer is treated as unset.
pub fn select<'a>(
    candidates: &[&'a ParsedElement],
    index: Option<&str>,
) -> Option<&'a ParsedElement> {
    let ranked = sort_clickable_first(candidates);
    match index.and_then(|i| i.trim().parse::<i64>().ok()) {
        Some(i) => select_by_index(&ranked, i),
        None => deepest_matching_element(&ranked),
    }
}
