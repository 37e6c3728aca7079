//! Flat key space for nested locale JSON.
//!
//! A [`FlatMap`] maps dot-delimited paths (`common.hello`, `items.0`) to string
//! values. [`flatten`] walks an arbitrary JSON value into that form and
//! [`unflatten`] rebuilds a nested tree from it.

use std::collections::BTreeMap;

use serde_json::{
    Map,
    Number,
    Value,
};

/// Flattened translation key map (e.g., "common.hello" -> "Hello").
///
/// Ordered so that every projection of a document (display, export, share
/// token) is deterministic.
pub type FlatMap = BTreeMap<String, String>;

/// Separator between path segments.
pub const KEY_SEPARATOR: char = '.';

/// Largest array index [`unflatten`] will materialize.
///
/// Digit-only segments above this are treated as object keys so that a
/// hostile key such as `list.4294967295` cannot force a huge allocation.
pub const MAX_ARRAY_INDEX: usize = 1 << 20;

/// Most path segments [`unflatten`] will nest, the same limit `serde_json`
/// applies when parsing.
///
/// Deeper keys are skipped; the rebuilt tree would overflow the stack when
/// printed or dropped.
pub const MAX_KEY_DEPTH: usize = 128;

/// Flatten a JSON value into dot-path keys.
///
/// Scalars become their string form, `null` and empty containers become `""`,
/// array elements are addressed by their position.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use transedit::flat::flatten;
///
/// let flat = flatten(&json!({ "common": { "hello": "Hello" }, "items": ["a", "b"] }));
///
/// assert_eq!(flat.get("common.hello").map(String::as_str), Some("Hello"));
/// assert_eq!(flat.get("items.1").map(String::as_str), Some("b"));
/// ```
#[must_use]
pub fn flatten(value: &Value) -> FlatMap {
    let mut result = FlatMap::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_value(child, key, &mut result);
            }
        }
        other => flatten_value(other, "", &mut result),
    }
    result
}

/// Recursive worker for [`flatten`].
fn flatten_value(value: &Value, prefix: &str, result: &mut FlatMap) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_value(child, &join_path(prefix, key), result);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(child, &join_path(prefix, &index.to_string()), result);
            }
        }
        Value::String(s) => {
            result.insert(prefix.to_string(), s.clone());
        }
        Value::Number(n) => {
            result.insert(prefix.to_string(), number_to_string(n));
        }
        Value::Bool(b) => {
            result.insert(prefix.to_string(), b.to_string());
        }
        // null, [] and {} all collapse to an untranslated entry
        Value::Null | Value::Array(_) | Value::Object(_) => {
            result.insert(prefix.to_string(), String::new());
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{segment}")
    }
}

/// Integral floats print without a fractional part (`1.0` -> `"1"`,
/// `1e20` -> `"100000000000000000000"`).
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
pub(crate) fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ if n.is_f64() => {
            let text = n.to_string();
            match text.strip_suffix(".0") {
                Some(integral) => integral.to_string(),
                None => text,
            }
        }
        _ => n.to_string(),
    }
}

/// Whether a path segment addresses an array slot.
#[must_use]
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && segment.parse::<usize>().is_ok_and(|index| index <= MAX_ARRAY_INDEX)
}

/// Rebuild a nested JSON object from a [`FlatMap`].
///
/// A segment followed by a digit-only segment becomes an array, anything else
/// an object. When a later key needs a different container than the one
/// already present, the existing value is replaced. Values stay strings, the
/// empty path is skipped and so are keys with more than [`MAX_KEY_DEPTH`]
/// segments.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use transedit::flat::{FlatMap, unflatten};
///
/// let flat: FlatMap = [("items.0", "x"), ("items.1", "y")]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v.to_string()))
///     .collect();
///
/// assert_eq!(unflatten(&flat), json!({ "items": ["x", "y"] }));
/// ```
#[must_use]
pub fn unflatten(flat: &FlatMap) -> Value {
    let mut root = Value::Object(Map::new());
    for (path, value) in flat {
        if path.is_empty() {
            continue;
        }
        let segments: Vec<&str> = path.split(KEY_SEPARATOR).collect();
        if segments.len() > MAX_KEY_DEPTH {
            tracing::warn!(depth = segments.len(), max = MAX_KEY_DEPTH, "Skipping key nested too deeply");
            continue;
        }
        assign(&mut root, &segments, value);
    }
    root
}

/// Walks `segments` below `container`, creating or coercing containers on
/// the way, and stores `value` at the last segment.
fn assign(container: &mut Value, segments: &[&str], value: &str) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let Some(slot) = slot_mut(container, segment) else {
        return;
    };

    let Some(next) = rest.first() else {
        *slot = Value::String(value.to_string());
        return;
    };

    if is_index_segment(next) {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
    } else if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }

    assign(slot, rest, value);
}

/// Returns the child slot named by `segment`, growing arrays with `null`
/// padding as needed.
fn slot_mut<'a>(container: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match container {
        Value::Object(map) => Some(map.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = segment.parse::<usize>().ok().filter(|i| *i <= MAX_ARRAY_INDEX)?;
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use proptest::prelude::{
        Just,
        Strategy,
        any,
        prop,
    };
    use proptest::{
        prop_assert_eq,
        prop_oneof,
        proptest,
    };
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn flat(pairs: &[(&str, &str)]) -> FlatMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[googletest::test]
    fn test_flatten_nested() {
        let json = json!({
            "common": {
                "hello": "Hello",
                "goodbye": "Goodbye"
            },
            "errors": {
                "notFound": "Not found"
            }
        });

        let result = flatten(&json);

        expect_that!(result.get("common.hello"), some(eq(&"Hello".to_string())));
        expect_that!(result.get("common.goodbye"), some(eq(&"Goodbye".to_string())));
        expect_that!(result.get("errors.notFound"), some(eq(&"Not found".to_string())));
        expect_that!(result.len(), eq(3));
    }

    #[googletest::test]
    fn test_flatten_scalars_become_strings() {
        let json = json!({
            "number": 42,
            "float": 1.5,
            "integral_float": 3.0,
            "boolean": true,
            "null": null
        });

        let result = flatten(&json);

        expect_that!(result.get("number"), some(eq(&"42".to_string())));
        expect_that!(result.get("float"), some(eq(&"1.5".to_string())));
        expect_that!(result.get("integral_float"), some(eq(&"3".to_string())));
        expect_that!(result.get("boolean"), some(eq(&"true".to_string())));
        expect_that!(result.get("null"), some(eq(&String::new())));
    }

    #[googletest::test]
    fn test_flatten_empty_containers_are_empty_strings() {
        let result = flatten(&json!({ "list": [], "group": {}, "deep": { "inner": [] } }));

        assert_eq!(result, flat(&[("deep.inner", ""), ("group", ""), ("list", "")]));
    }

    #[googletest::test]
    fn test_flatten_arrays_use_positions() {
        let json = json!({
            "users": [
                { "name": "Alice" },
                { "name": "Bob" }
            ],
            "matrix": [["a", "b"], ["c"]]
        });

        let result = flatten(&json);

        expect_that!(result.get("users.0.name"), some(eq(&"Alice".to_string())));
        expect_that!(result.get("users.1.name"), some(eq(&"Bob".to_string())));
        expect_that!(result.get("matrix.0.1"), some(eq(&"b".to_string())));
        expect_that!(result.get("matrix.1.0"), some(eq(&"c".to_string())));
    }

    #[rstest]
    #[case::root_string(json!("hi"), &[("", "hi")])]
    #[case::root_null(json!(null), &[("", "")])]
    #[case::root_array(json!(["a", "b"]), &[("0", "a"), ("1", "b")])]
    #[case::root_empty_object(json!({}), &[])]
    fn test_flatten_root_shapes(#[case] input: Value, #[case] expected: &[(&str, &str)]) {
        assert_eq!(flatten(&input), flat(expected));
    }

    #[googletest::test]
    fn test_unflatten_builds_arrays_for_index_segments() {
        let result = unflatten(&flat(&[("items.0", "x"), ("items.1", "y")]));

        assert_eq!(result, json!({ "items": ["x", "y"] }));
    }

    #[googletest::test]
    fn test_unflatten_nested_objects_and_arrays() {
        let result = unflatten(&flat(&[
            ("a.b", "1"),
            ("a.c.0.d", "2"),
            ("a.c.1.d", "3"),
            ("top", "4"),
        ]));

        assert_eq!(result, json!({
                "a": { "b": "1", "c": [{ "d": "2" }, { "d": "3" }] },
                "top": "4"
            }));
    }

    #[googletest::test]
    fn test_unflatten_pads_sparse_indices() {
        let result = unflatten(&flat(&[("items.2", "z")]));

        assert_eq!(result, json!({ "items": [null, null, "z"] }));
    }

    #[googletest::test]
    fn test_unflatten_skips_keys_nested_too_deeply() {
        let deep = vec!["a"; 10_000].join(".");
        let at_limit = vec!["b"; MAX_KEY_DEPTH].join(".");

        let result = unflatten(&flat(&[(deep.as_str(), "x"), (at_limit.as_str(), "y"), ("c", "z")]));

        expect_that!(result.get("a"), none());
        expect_that!(result.pointer(&format!("/{}", at_limit.replace('.', "/"))), some(eq(&json!("y"))));
        expect_that!(result.get("c"), some(eq(&json!("z"))));
        let printed = serde_json::to_string_pretty(&result).unwrap();
        expect_that!(printed, contains_substring("\"z\""));
    }

    #[rstest]
    #[case::small(json!(3.0), "3")]
    #[case::negative(json!(-12.0), "-12")]
    #[case::above_exact_integers(json!(1e20), "100000000000000000000")]
    #[case::fraction(json!(0.25), "0.25")]
    #[case::integer(json!(9_007_199_254_740_993_u64), "9007199254740993")]
    fn test_number_to_string(#[case] input: Value, #[case] expected: &str) {
        let Value::Number(n) = input else {
            unreachable!("cases are numbers");
        };

        assert_eq!(number_to_string(&n), expected);
    }

    #[googletest::test]
    fn test_unflatten_orders_indices_numerically() {
        let pairs: Vec<(String, String)> =
            (0..12).map(|i| (format!("items.{i}"), format!("v{i}"))).collect();
        let map: FlatMap = pairs.into_iter().collect();

        let result = unflatten(&map);

        let items = result.get("items").and_then(Value::as_array).unwrap();
        assert_eq!(items.len(), 12);
        assert_eq!(items.get(10), Some(&json!("v10")));
        assert_eq!(items.get(2), Some(&json!("v2")));
    }

    #[googletest::test]
    fn test_unflatten_coerces_on_conflict() {
        // "a" is a string first, then needs to be an object: the string is discarded
        let result = unflatten(&flat(&[("a", "leaf"), ("a.b", "child")]));

        assert_eq!(result, json!({ "a": { "b": "child" } }));
    }

    #[googletest::test]
    fn test_unflatten_replaces_object_with_array() {
        let result = unflatten(&flat(&[("a.0", "first"), ("a.x", "named")]));

        // "a.0" sorts before "a.x": the array built for it is replaced by an object
        assert_eq!(result, json!({ "a": { "x": "named" } }));
    }

    #[googletest::test]
    fn test_unflatten_skips_empty_path() {
        let result = unflatten(&flat(&[("", "root"), ("k", "v")]));

        assert_eq!(result, json!({ "k": "v" }));
    }

    #[googletest::test]
    fn test_unflatten_huge_index_is_object_key() {
        let result = unflatten(&flat(&[("list.99999999999", "x")]));

        assert_eq!(result, json!({ "list": { "99999999999": "x" } }));
    }

    #[rstest]
    #[case("0", true)]
    #[case("42", true)]
    #[case("", false)]
    #[case("-1", false)]
    #[case("1a", false)]
    #[case("+1", false)]
    #[case("99999999999999999999999", false)]
    fn test_is_index_segment(#[case] segment: &str, #[case] expected: bool) {
        assert_eq!(is_index_segment(segment), expected);
    }

    /// Arbitrary locale-like JSON: string leaves, nested objects and arrays.
    fn locale_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            "[a-zA-Z0-9 ]{0,8}".prop_map(Value::String),
            any::<i32>().prop_map(|n| json!(n)),
            any::<bool>().prop_map(Value::Bool),
            Just(Value::Null),
        ];
        leaf.prop_recursive(4, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_flat_side_round_trip(value in prop::collection::btree_map("[a-z]{1,6}", locale_json(), 0..6)) {
            let value = Value::Object(value.into_iter().collect());
            let flat = flatten(&value);

            prop_assert_eq!(flatten(&unflatten(&flat)), flat);
        }
    }
}
