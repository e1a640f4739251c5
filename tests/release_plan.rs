// tests/release_plan.rs

//! Conversion planning: the pending set is exactly the difference between
//! discovered releases and existing release tags.

use nbdc2rs::{pending, Release};
use std::collections::BTreeSet;

fn releases(names: &[&str]) -> Vec<Release> {
    names.iter().map(|n| Release::parse(n).unwrap()).collect()
}

fn tag_set(tags: &[&str]) -> BTreeSet<Release> {
    tags.iter().filter_map(|t| Release::from_tag(t)).collect()
}

#[test]
fn test_plan_is_exact_set_difference() {
    let available = releases(&["1.0", "2.0", "3.0"]);
    let converted = tag_set(&["v2.0"]);

    let plan = pending(&available, &converted);
    assert_eq!(plan, releases(&["1.0", "3.0"]));
}

#[test]
fn test_plan_with_no_tags_returns_everything() {
    let available = releases(&["2.0", "1.0"]);
    let plan = pending(&available, &BTreeSet::new());
    // Ascending order regardless of discovery order
    assert_eq!(plan, releases(&["1.0", "2.0"]));
}

#[test]
fn test_plan_ignores_unrelated_tags() {
    let available = releases(&["1.0"]);
    // Branch-style and annotated non-release tags must not mask releases
    let converted = tag_set(&["snapshot-2024", "v1.0-rc1", "latest"]);
    assert_eq!(pending(&available, &converted), releases(&["1.0"]));
}

#[test]
fn test_plan_orders_numerically_not_lexicographically() {
    let available = releases(&["10.0", "9.0", "1.0"]);
    let plan = pending(&available, &BTreeSet::new());
    assert_eq!(plan, releases(&["1.0", "9.0", "10.0"]));
}

#[test]
fn test_plan_empty_when_everything_converted() {
    let available = releases(&["1.0", "2.0"]);
    let converted = tag_set(&["v1.0", "v2.0"]);
    assert!(pending(&available, &converted).is_empty());
}
