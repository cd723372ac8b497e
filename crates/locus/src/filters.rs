//! Relative-position and containment filters
//!
//! Every filter takes the candidates in snapshot order plus one anchor and
//! returns the qualifying subset. Directional filters sort by distance to the
//! anchor (stable, so equal distances keep snapshot order).

use crate::element::ParsedElement;
use crate::selector::Relation;

pub fn filter_below<'a>(
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    let edge = anchor.bounds.bottom();
    by_distance(candidates, |c| {
        let top = c.bounds.top();
        (top >= edge).then_some(top.saturating_sub(edge))
    })
}

pub fn filter_above<'a>(
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    let edge = anchor.bounds.top();
    by_distance(candidates, |c| {
        let bottom = c.bounds.bottom();
        (bottom <= edge).then_some(edge.saturating_sub(bottom))
    })
}

pub fn filter_left_of<'a>(
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    let edge = anchor.bounds.left();
    by_distance(candidates, |c| {
        let right = c.bounds.right();
        (right <= edge).then_some(edge.saturating_sub(right))
    })
}

pub fn filter_right_of<'a>(
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    let edge = anchor.bounds.right();
    by_distance(candidates, |c| {
        let left = c.bounds.left();
        (left >= edge).then_some(left.saturating_sub(edge))
    })
}

/// Candidates whose bounds lie fully inside the anchor's.
pub fn filter_child_of<'a>(
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    candidates
        .iter()
        .copied()
        .filter(|c| anchor.bounds.contains(&c.bounds))
        .collect()
}

/// Candidates whose bounds fully enclose the anchor's.
pub fn filter_contains_child<'a>(
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    candidates
        .iter()
        .copied()
        .filter(|c| c.bounds.contains(&anchor.bounds))
        .collect()
}

/// Dispatch to the filter for `relation`.
pub fn filter_relative<'a>(
    relation: Relation,
    candidates: &[&'a ParsedElement],
    anchor: &ParsedElement,
) -> Vec<&'a ParsedElement> {
    match relation {
        Relation::Below => filter_below(candidates, anchor),
        Relation::Above => filter_above(candidates, anchor),
        Relation::LeftOf => filter_left_of(candidates, anchor),
        Relation::RightOf => filter_right_of(candidates, anchor),
        Relation::ChildOf => filter_child_of(candidates, anchor),
        Relation::ContainsChild => filter_contains_child(candidates, anchor),
    }
}

/// Keep candidates that enclose at least one element of every set.
///
/// `descendant_sets` holds, per descendant selector, the snapshot elements
/// matching it. A candidate never counts as its own descendant.
pub fn filter_contains_descendants<'a>(
    candidates: &[&'a ParsedElement],
    descendant_sets: &[Vec<&ParsedElement>],
) -> Vec<&'a ParsedElement> {
    candidates
        .iter()
        .copied()
        .filter(|c| {
            descendant_sets.iter().all(|set| {
                set.iter()
                    .any(|d| d.index != c.index && c.bounds.contains(&d.bounds))
            })
        })
        .collect()
}

fn by_distance<'a>(
    candidates: &[&'a ParsedElement],
    distance: impl Fn(&ParsedElement) -> Option<i32>,
) -> Vec<&'a ParsedElement> {
    let mut kept: Vec<(i32, &'a ParsedElement)> = candidates
        .iter()
        .filter_map(|c| distance(c).map(|d| (d, *c)))
        .collect();
    kept.sort_by_key(|(d, _)| *d);
    kept.into_iter().map(|(_, c)| c).collect()
}
