/// Builds a [`Value`](crate::Value) tree from JSON-like syntax.
///
/// Keys are string literals; values may be `null`, `true`, `false`, nested
/// arrays/objects, or any expression convertible into a `Value` (wrap
/// multi-token expressions in parentheses).
///
/// ```rust
/// use dtxt::{dtxt, to_string};
///
/// let doc = dtxt!({
///     "name": "Sample",
///     "count": 42,
///     "tags": ["a", "b"],
/// });
/// assert_eq!(
///     to_string(&doc).unwrap(),
///     "{count:42,name:`Sample`,tags:[`a`,`b`]}"
/// );
/// ```
#[macro_export]
macro_rules! dtxt {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::dtxt!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::dtxt!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Everything else goes through `From`. A value must be a single token
    // tree to reach the rules above, so wrap compound expressions in parens.
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Value};

    #[test]
    fn test_dtxt_macro_primitives() {
        assert_eq!(dtxt!(null), Value::Null);
        assert_eq!(dtxt!(true), Value::Bool(true));
        assert_eq!(dtxt!(false), Value::Bool(false));
        assert_eq!(dtxt!(42), Value::Number(42.0));
        assert_eq!(dtxt!(3.5), Value::Number(3.5));
        assert_eq!(dtxt!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_dtxt_macro_arrays() {
        assert_eq!(dtxt!([]), Value::Array(vec![]));

        let arr = dtxt!([1, 2, 3]);
        assert_eq!(
            arr,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
            ])
        );
    }

    #[test]
    fn test_dtxt_macro_objects() {
        assert_eq!(dtxt!({}), Value::Object(Map::new()));

        let obj = dtxt!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::Number(30.0)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_dtxt_macro_parenthesized_expressions() {
        let obj = dtxt!({ "bytes": (Value::Binary(vec![1, 2])) });
        assert_eq!(obj.get("bytes"), Some(&Value::Binary(vec![1, 2])));
    }
}
