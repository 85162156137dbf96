use serde_json::{json, Value};
use snappy_sift::{expanded_paths, filter, filter_document, should_expand, KeyPath, SearchTerm, Session};

fn sample() -> Value {
    json!({
        "name": "Widget Catalog",
        "options": {
            "color": ["Red", "Green", "Blue"],
            "size": {"small": 1, "large": 3},
        },
        "types": [
            {"id": 1, "label": "Reddish paint", "tags": ["warm", "red"]},
            {"id": 2, "label": "Ocean", "tags": ["cool"]},
        ],
        "pages": {"red_page": {"title": "Everything", "count": 9}},
    })
}

fn leaves(value: &Value, path: KeyPath, out: &mut Vec<(KeyPath, String)>) {
    match value {
        Value::String(s) => out.push((path, s.clone())),
        Value::Object(map) => map.iter().for_each(|(k, v)| leaves(v, path.child(k), out)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .for_each(|(i, v)| leaves(v, path.child(&i.to_string()), out)),
        _ => {}
    }
}

// Every key of `pruned` exists in `original` with the same relative order.
fn assert_structural_subset(pruned: &Value, original: &Value) {
    match (pruned, original) {
        (Value::Object(p), Value::Object(o)) => {
            let positions: Vec<usize> = p
                .keys()
                .map(|k| o.keys().position(|ok| ok == k).expect("invented key"))
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "reordered keys");
            for (k, v) in p {
                assert_structural_subset(v, &o[k]);
            }
        }
        (Value::Array(p), Value::Array(o)) => {
            let mut cursor = 0;
            for item in p {
                let found = o[cursor..]
                    .iter()
                    .position(|candidate| is_subset(item, candidate))
                    .expect("invented or reordered element");
                cursor += found + 1;
            }
        }
        (p, o) => assert_eq!(p, o),
    }
}

fn is_subset(pruned: &Value, original: &Value) -> bool {
    match (pruned, original) {
        (Value::Object(p), Value::Object(o)) => p.iter().all(|(k, v)| o.get(k).is_some_and(|ov| is_subset(v, ov))),
        (Value::Array(p), Value::Array(o)) => {
            let mut rest = o.iter();
            p.iter().all(|item| rest.any(|candidate| is_subset(item, candidate)))
        }
        (p, o) => p == o,
    }
}

#[test]
fn every_matching_leaf_is_found_and_kept() {
    let doc = sample();
    let mut all = Vec::new();
    leaves(&doc, KeyPath::root(), &mut all);

    for term in ["red", "e", "ocean", "WARM", "catalog"] {
        let term = SearchTerm::new(term);
        let out = filter_document(Some(&doc), &term);
        for (path, text) in &all {
            if text.to_lowercase().contains(term.as_str()) {
                assert!(out.matches.contains(path), "{term:?} missed {path}");
            }
        }
        assert_structural_subset(&out.tree, &doc);
    }
}

#[test]
fn red_search_prunes_and_orders_matches() {
    let out = filter_document(Some(&sample()), &SearchTerm::new("red"));
    assert_eq!(
        out.tree,
        json!({
            "options": {"color": ["Red"]},
            "types": [{"label": "Reddish paint", "tags": ["red"]}],
            "pages": {"red_page": {"title": "Everything", "count": 9}},
        })
    );
    let joined: Vec<String> = out.matches.iter().map(KeyPath::joined).collect();
    assert_eq!(
        joined,
        ["options.color.0", "types.0.label", "types.0.tags.1", "pages.red_page"]
    );
}

#[test]
fn leaves_without_the_term_are_dropped() {
    let doc = sample();
    let out = filter_document(Some(&doc), &SearchTerm::new("ocean"));
    let mut kept = Vec::new();
    leaves(&out.tree, KeyPath::root(), &mut kept);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].1, "Ocean");
}

#[test]
fn engine_contract_from_a_subtree_path() {
    let subtree = json!({"k": "needle"});
    let base = KeyPath::parse("outer.3");
    let out = filter(&subtree, "needle", &base);
    assert_eq!(out.value, Some(subtree.clone()));
    assert_eq!(out.matches, vec![KeyPath::parse("outer.3.k")]);
    assert_eq!(filter(&subtree, "hay", &base).value, None);
}

#[test]
fn expand_state_follows_match_paths() {
    let doc = sample();
    let out = filter_document(Some(&doc), &SearchTerm::new("everything"));
    assert!(should_expand(&KeyPath::parse("pages"), &out.matches));
    assert!(should_expand(&KeyPath::parse("pages.red_page"), &out.matches));
    assert!(!should_expand(&KeyPath::parse("types"), &out.matches));

    let expanded: Vec<String> = expanded_paths(&out.tree, &out.matches)
        .iter()
        .map(KeyPath::joined)
        .collect();
    assert_eq!(expanded, ["", "pages", "pages.red_page"]);
}

#[test]
fn concurrent_calls_share_one_document() {
    let doc = std::sync::Arc::new(sample());
    let expected = filter_document(Some(doc.as_ref()), &SearchTerm::new("r"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let doc = doc.clone();
            std::thread::spawn(move || filter_document(Some(doc.as_ref()), &SearchTerm::new("r")))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn session_lists_pruned_children_with_expand_flags() {
    let session = Session::default();
    session.replace_document(sample()).unwrap();
    session.set_term("warm");

    let page = session.load_children(&KeyPath::root(), 0, 10).unwrap();
    let keys: Vec<_> = page.nodes.iter().map(|n| n.key.clone().unwrap()).collect();
    assert_eq!(keys, ["types"]);
    assert!(page.nodes[0].expanded);

    let types = session.load_children(&KeyPath::parse("types"), 0, 10).unwrap();
    assert_eq!(types.total_count, 1);
    assert_eq!(types.nodes[0].preview, "{…} 1 keys");
    assert!(types.nodes[0].expanded);

    session.clear_search();
    let page = session.load_children(&KeyPath::root(), 0, 10).unwrap();
    assert_eq!(page.total_count, 4);
    assert!(page.nodes.iter().all(|n| !n.expanded));
}
