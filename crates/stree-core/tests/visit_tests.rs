/// Depth-first traversal: event order, paths, key ordering and early abort.
use std::cell::RefCell;
use stree_core::{decode_json, visit, visit_ordered, FieldPath, FnVisitor, Map, Value, Visitor};

/// Records every callback as a line of text.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Visitor for Recorder {
    type Error = String;

    fn visit_leaf(&mut self, path: &FieldPath, value: &Value) -> Result<(), String> {
        self.events.push(format!("leaf {path} = {value}"));
        Ok(())
    }

    fn visit_map_begin(&mut self, path: &FieldPath, map: &Map) -> Result<(), String> {
        self.events.push(format!("map+ '{path}' ({})", map.len()));
        Ok(())
    }

    fn visit_map_end(&mut self, path: &FieldPath, _map: &Map) -> Result<(), String> {
        self.events.push(format!("map- '{path}'"));
        Ok(())
    }

    fn visit_list_begin(&mut self, path: &FieldPath, items: &[Value]) -> Result<(), String> {
        self.events.push(format!("list+ '{path}' ({})", items.len()));
        Ok(())
    }

    fn visit_list_end(&mut self, path: &FieldPath, _items: &[Value]) -> Result<(), String> {
        self.events.push(format!("list- '{path}'"));
        Ok(())
    }
}

/// A visitor that only cares about leaves, relying on the default no-ops.
struct LeafCounter(usize);

impl Visitor for LeafCounter {
    type Error = ();

    fn visit_leaf(&mut self, _path: &FieldPath, _value: &Value) -> Result<(), ()> {
        self.0 += 1;
        Ok(())
    }
}

fn sample() -> Value {
    decode_json(r#"{"b": 1, "a": {"z": true, "y": [10, {"k": "v"}]}, "c": null}"#).unwrap()
}

// ============================================================================
// Event stream
// ============================================================================

#[test]
fn sorted_walk_produces_bracketed_events() {
    let mut recorder = Recorder::default();
    visit_ordered(&sample(), &mut recorder, |a, b| a.cmp(b)).unwrap();
    assert_eq!(
        recorder.events,
        [
            "map+ '' (3)",
            "map+ '.a' (2)",
            "list+ '.a.y' (2)",
            "leaf .a.y[0] = 10",
            "map+ '.a.y[1]' (1)",
            "leaf .a.y[1].k = v",
            "map- '.a.y[1]'",
            "list- '.a.y'",
            "leaf .a.z = true",
            "map- '.a'",
            "leaf .b = 1",
            "leaf .c = nil",
            "map- ''",
        ]
    );
}

#[test]
fn custom_order_applies_at_every_level() {
    let mut recorder = Recorder::default();
    visit_ordered(&sample(), &mut recorder, |a, b| b.cmp(a)).unwrap();
    let leaves: Vec<&str> = recorder
        .events
        .iter()
        .filter(|e| e.starts_with("leaf"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        leaves,
        [
            "leaf .c = nil",
            "leaf .b = 1",
            "leaf .a.z = true",
            "leaf .a.y[0] = 10",
            "leaf .a.y[1].k = v",
        ]
    );
}

#[test]
fn unordered_walk_visits_every_node() {
    let mut recorder = Recorder::default();
    visit(&sample(), &mut recorder).unwrap();
    assert_eq!(recorder.events.len(), 13);
    assert_eq!(recorder.events.first().unwrap(), "map+ '' (3)");
    assert_eq!(recorder.events.last().unwrap(), "map- ''");
}

#[test]
fn default_callbacks_are_no_ops() {
    let mut counter = LeafCounter(0);
    sample().visit(&mut counter).unwrap();
    assert_eq!(counter.0, 5);
}

#[test]
fn scalar_root_is_a_single_leaf() {
    let mut recorder = Recorder::default();
    visit(&Value::Int(7), &mut recorder).unwrap();
    assert_eq!(recorder.events, ["leaf  = 7"]);
}

#[test]
fn list_children_visited_in_index_order() {
    let tree = decode_json(r#"{"l": [3, 2, 1]}"#).unwrap();
    let mut recorder = Recorder::default();
    tree.visit(&mut recorder).unwrap();
    assert_eq!(
        &recorder.events[1..6],
        [
            "list+ '.l' (3)",
            "leaf .l[0] = 3",
            "leaf .l[1] = 2",
            "leaf .l[2] = 1",
            "list- '.l'",
        ]
    );
}

#[test]
fn floats_render_with_six_decimals() {
    let tree = decode_json(r#"{"f": -12.34}"#).unwrap();
    let mut recorder = Recorder::default();
    tree.visit(&mut recorder).unwrap();
    assert!(recorder.events.contains(&"leaf .f = -12.340000".to_string()));
}

// ============================================================================
// Abort
// ============================================================================

/// Fails on the first leaf whose path ends with the given key.
struct FailOn(&'static str, usize);

impl Visitor for FailOn {
    type Error = String;

    fn visit_leaf(&mut self, path: &FieldPath, _value: &Value) -> Result<(), String> {
        self.1 += 1;
        if path.last_key() == Some(self.0) {
            return Err(format!("stopped at {path}"));
        }
        Ok(())
    }
}

#[test]
fn error_stops_walk_and_propagates() {
    let mut visitor = FailOn("z", 0);
    let err = visit_ordered(&sample(), &mut visitor, |a, b| a.cmp(b)).unwrap_err();
    assert_eq!(err, "stopped at .a.z");
    // .a.y[0], .a.y[1].k and .a.z, nothing after
    assert_eq!(visitor.1, 3);
}

#[test]
fn error_from_begin_callback_skips_children() {
    let leaves = RefCell::new(0);
    let mut visitor = FnVisitor::new()
        .on_list_begin(|path, _| Err(format!("no lists please: {path}")))
        .on_leaf(|_, _| {
            *leaves.borrow_mut() += 1;
            Ok(())
        });
    let tree = decode_json(r#"{"l": [1, 2]}"#).unwrap();
    let err = tree.visit(&mut visitor).unwrap_err();
    assert_eq!(err, "no lists please: .l");
    drop(visitor);
    assert_eq!(leaves.into_inner(), 0);
}

// ============================================================================
// Closure visitor
// ============================================================================

#[test]
fn closure_visitor_with_subset_of_callbacks() {
    let events = RefCell::new(Vec::new());
    let mut visitor = FnVisitor::<()>::new()
        .on_map_begin(|path, _| {
            events.borrow_mut().push(format!("begin {path}"));
            Ok(())
        })
        .on_map_end(|path, _| {
            events.borrow_mut().push(format!("end {path}"));
            Ok(())
        });
    let tree = decode_json(r#"{"x": {"y": 1}}"#).unwrap();
    tree.visit(&mut visitor).unwrap();
    drop(visitor);
    assert_eq!(
        events.into_inner(),
        ["begin ", "begin .x", "end .x", "end "]
    );
}

#[test]
fn closure_visitor_list_end_sees_items() {
    let mut total = 0;
    let mut visitor = FnVisitor::<()>::new().on_list_end(|_, items| {
        total += items.len();
        Ok(())
    });
    let tree = decode_json(r#"{"a": [1, 2], "b": [[3], []]}"#).unwrap();
    tree.visit(&mut visitor).unwrap();
    drop(visitor);
    assert_eq!(total, 2 + 2 + 1);
}
