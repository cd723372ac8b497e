use super::{at_depth, clickable, element, texts};
use crate::ranking::*;

#[test]
fn test_sort_clickable_first_is_stable_partition() {
    let a = clickable(element("A", 0, 0, 1, 1));
    let b = element("B", 0, 0, 1, 1);
    let c = clickable(element("C", 0, 0, 1, 1));
    let d = element("D", 0, 0, 1, 1);
    let sorted = sort_clickable_first(&[&a, &b, &c, &d]);
    assert_eq!(texts(&sorted), vec!["A", "C", "B", "D"]);
}

#[test]
fn test_deepest_wins_and_first_breaks_ties() {
    let shallow = at_depth(element("container", 0, 0, 100, 100), 1);
    let leaf = at_depth(element("leaf", 0, 0, 10, 10), 4);
    let twin = at_depth(element("twin", 0, 0, 10, 10), 4);
    let pick = deepest_matching_element(&[&shallow, &leaf, &twin]).unwrap();
    assert_eq!(pick.text, "leaf");
    assert!(deepest_matching_element(&[]).is_none());
}

#[test]
fn test_index_selection() {
    let items: Vec<_> = ["zero", "one", "two"]
        .iter()
        .map(|t| element(t, 0, 0, 1, 1))
        .collect();
    let refs: Vec<_> = items.iter().collect();

    assert_eq!(select_by_index(&refs, 1).unwrap().text, "one");
    assert_eq!(select_by_index(&refs, -1).unwrap().text, "two");
    assert_eq!(select_by_index(&refs, -3).unwrap().text, "zero");
    assert_eq!(select_by_index(&refs, 5).unwrap().text, "zero");
    assert_eq!(select_by_index(&refs, -4).unwrap().text, "zero");
    assert!(select_by_index(&[], 0).is_none());
}

#[test]
fn test_select_ranks_before_indexing() {
    let plain = at_depth(element("plain", 0, 0, 1, 1), 5);
    let button = clickable(at_depth(element("button", 0, 0, 1, 1), 2));

    // index applies to the clickable-first order
    assert_eq!(select(&[&plain, &button], Some("0")).unwrap().text, "button");
    // depth still beats clickability without an index
    assert_eq!(select(&[&plain, &button], None).unwrap().text, "plain");
    // unparseable index behaves as unset
    assert_eq!(select(&[&plain, &button], Some("first")).unwrap().text, "plain");
}
