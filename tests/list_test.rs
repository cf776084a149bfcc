//! Interceptor list mutation operations (§4.1).

use std::sync::Arc;

use relay_http::{ContentTypeInterceptor, InterceptorFn, InterceptorList};

fn named(name: &'static str) -> Arc<dyn relay_http::Interceptor> {
    Arc::new(InterceptorFn::new().named(name))
}

#[test]
fn new_list_carries_the_builtin_at_index_zero() {
    let list = InterceptorList::new();
    assert_eq!(list.len(), 1);
    assert!(list.has_builtin());
    assert_eq!(list.get(0).unwrap().name(), "content-type");
}

#[test]
fn empty_list_has_no_builtin() {
    let list = InterceptorList::empty();
    assert_eq!(list.len(), 0);
    assert!(!list.has_builtin());
}

#[test]
fn push_insert_set_remove() {
    let mut list = InterceptorList::empty();
    list.push(named("a"));
    list.push(named("c"));
    list.insert(1, named("b"));

    assert_eq!(list.len(), 3);
    assert_eq!(list.get(1).unwrap().name(), "b");

    let replaced = list.set(1, named("b2")).unwrap();
    assert_eq!(replaced.name(), "b");
    assert_eq!(list.get(1).unwrap().name(), "b2");

    let removed = list.remove(0).unwrap();
    assert_eq!(removed.name(), "a");
    assert_eq!(list.len(), 2);
}

#[test]
fn remove_by_value_uses_identity_not_structural_equality() {
    let mut list = InterceptorList::empty();
    let target = named("dup");
    list.push(target.clone());
    list.push(named("dup"));

    assert!(list.remove_by_value(&target));
    assert_eq!(list.len(), 1);
    // The remaining entry is a different `dup`-named Arc.
    assert!(!list.remove_by_value(&target));
}

#[test]
fn remove_by_predicate_counts_removed() {
    let mut list = InterceptorList::empty();
    list.push(named("keep"));
    list.push(named("drop"));
    list.push(named("drop"));

    let removed = list.remove_by_predicate(|i| i.name() == "drop");
    assert_eq!(removed, 2);
    assert_eq!(list.len(), 1);
}

#[test]
fn clear_keep_builtin_always_resets_regardless_of_prior_state() {
    let mut list = InterceptorList::empty();
    list.push(named("custom"));
    assert!(!list.has_builtin());

    list.clear(true);
    assert_eq!(list.len(), 1);
    assert!(list.has_builtin());

    list.clear(false);
    assert_eq!(list.len(), 0);
    assert!(!list.has_builtin());
}

#[test]
fn remove_builtin_only_drops_builtin_entries() {
    let mut list = InterceptorList::new();
    list.push(named("custom"));
    assert_eq!(list.len(), 2);

    list.remove_builtin();
    assert_eq!(list.len(), 1);
    assert!(!list.has_builtin());
    assert_eq!(list.get(0).unwrap().name(), "custom");
}

#[test]
fn assigning_over_slot_zero_replaces_the_builtin_non_stickily() {
    let mut list = InterceptorList::new();
    list.set(0, named("replacement"));
    assert!(!list.has_builtin());
    assert_eq!(list.get(0).unwrap().name(), "replacement");
}

#[test]
fn default_matches_new() {
    let default_list = InterceptorList::default();
    assert_eq!(default_list.len(), InterceptorList::new().len());
}

#[test]
fn content_type_interceptor_is_recognized_as_builtin() {
    let mut list = InterceptorList::empty();
    list.push(Arc::new(ContentTypeInterceptor::new()));
    assert!(list.has_builtin());
}
