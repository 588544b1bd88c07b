/// Property-based tests for the path language, copy-on-write updates and diff.
///
/// Strategies generate:
/// - Keys drawn from an alphabet that includes the path delimiters, so the
///   escaping rules are exercised on every run
/// - Paths of up to six segments mixing keys and subscripts
/// - Trees up to three levels deep with finite floats only
use proptest::prelude::*;
use stree_core::{compare, field_paths, FieldComparison, FieldPath, Map, Segment, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z_][a-zA-Z0-9_]{0,7}",
        1 => "[a-z.\\[\\]\\\\ -]{1,6}",
    ]
}

fn arb_path() -> impl Strategy<Value = FieldPath> {
    let segment = prop_oneof![
        2 => arb_key().prop_map(Segment::Key),
        1 => (0usize..20).prop_map(Segment::Index),
    ];
    (arb_key(), prop::collection::vec(segment, 0..6)).prop_map(|(first, rest)| {
        std::iter::once(Segment::Key(first)).chain(rest).collect()
    })
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn arb_value(depth: u32) -> BoxedStrategy<Value> {
    if depth == 0 {
        return arb_leaf().boxed();
    }
    prop_oneof![
        4 => arb_leaf(),
        2 => prop::collection::vec((arb_key(), arb_value(depth - 1)), 0..4)
            .prop_map(|pairs| Value::Map(pairs.into_iter().collect::<Map>())),
        1 => prop::collection::vec(arb_value(depth - 1), 0..4).prop_map(Value::List),
    ]
    .boxed()
}

fn arb_tree() -> impl Strategy<Value = Value> {
    prop::collection::vec((arb_key(), arb_value(3)), 0..6)
        .prop_map(|pairs| Value::Map(pairs.into_iter().collect::<Map>()))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Rendering then parsing a path gives back the same segments.
    #[test]
    fn path_roundtrip(path in arb_path()) {
        let text = path.to_string();
        let parsed = FieldPath::parse(&text).unwrap();
        prop_assert_eq!(&parsed, &path, "text: {}", text);
        prop_assert_eq!(parsed.to_string(), text);
    }

    /// Parsing never panics, whatever the input.
    #[test]
    fn parse_never_panics(text in "\\PC{0,24}") {
        let _ = FieldPath::parse(&text);
    }

    /// Every enumerated leaf path resolves in its own tree.
    #[test]
    fn field_paths_resolve(tree in arb_tree()) {
        for path in field_paths(&tree) {
            let leaf = tree.get_path(&path).unwrap();
            prop_assert!(leaf.is_primitive(), "{} is not a leaf", path);
        }
    }

    /// Setting a leaf returns a tree holding the new value, with every other
    /// leaf and the original tree untouched.
    #[test]
    fn set_then_get(tree in arb_tree(), replacement in arb_leaf()) {
        let before = tree.clone();
        for path in field_paths(&tree) {
            let updated = tree.set_val(&path.to_string(), replacement.clone()).unwrap();
            prop_assert_eq!(updated.get_path(&path).unwrap(), &replacement);
            for other in field_paths(&tree) {
                if other != path {
                    prop_assert_eq!(updated.get_path(&other).unwrap(), tree.get_path(&other).unwrap());
                }
            }
        }
        prop_assert_eq!(tree, before);
    }

    /// Writing into a clone never shows through in the source.
    #[test]
    fn clone_is_independent(tree in arb_tree(), key in arb_key()) {
        let before = tree.clone();
        let mut copy = tree.clone();
        let path = FieldPath::root().key(key).key("__added__");
        copy.set_path(&path, Value::from("x")).ok();
        prop_assert_eq!(&tree, &before);
        prop_assert!(!tree.contains_path(&path));
    }

    /// Swapping subject and object swaps the two "lacks" classifications
    /// and leaves everything else as is.
    #[test]
    fn compare_is_symmetric(a in arb_tree(), b in arb_tree()) {
        let forward = compare(&a, &b);
        let backward = compare(&b, &a);
        prop_assert_eq!(forward.len(), backward.len());
        for (path, classification) in forward.iter() {
            prop_assert_eq!(backward.get(path), Some(classification.mirrored()));
        }
    }

    /// A tree compared with itself has no differences.
    #[test]
    fn compare_with_self(tree in arb_tree()) {
        let cmp = compare(&tree, &tree);
        prop_assert!(cmp.is_identical());
        prop_assert_eq!(cmp.len(), field_paths(&tree).len());
        prop_assert!(cmp.iter().all(|(_, c)| c == FieldComparison::NoDifference));
    }
}
