//! Table-driven field mapping.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

/// Static `(internal_name, wire_name)` pairs describing an entity's fields.
///
/// An entity's full table is the union of the tables it is built from, so
/// shared fields live in one table and are listed alongside the entity's own.
pub type FieldTable = &'static [(&'static str, &'static str)];

/// Values pulled off one wire node, keyed by internal name.
///
/// Only fields present on the node are stored; lookups of anything else
/// return `None`.
#[derive(Debug, Clone, Default)]
pub struct MappedFields {
    values: HashMap<&'static str, Value>,
}

/// Extract every field named in `tables` from `node`.
///
/// JSON `null` is treated the same as a missing field. A node that is not an
/// object at all (including `null`) yields no fields.
pub fn map_fields(node: &Value, tables: &[FieldTable]) -> MappedFields {
    let mut values = HashMap::new();

    for table in tables {
        for &(internal, wire) in table.iter() {
            match node.get(wire) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    values.insert(internal, value.clone());
                }
            }
        }
    }

    MappedFields { values }
}

impl MappedFields {
    /// Raw wire value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the wire node carried `name`.
    pub fn is_present(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of fields found on the node.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the node carried none of the mapped fields.
    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field as display text.
    ///
    /// Numbers and booleans are rendered with their JSON spelling, so a
    /// numeric train length of 12 reads as `"12"`. Arrays and objects are not
    /// text and count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.values.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                debug!(field = name, value = %other, "ignoring non-scalar value in text field");
                None
            }
        }
    }

    /// Field as a flag.
    ///
    /// Accepts JSON booleans, the numbers `1`/`0`, and the `xs:boolean`
    /// lexical forms `"true"`/`"false"` (any case) and `"1"`/`"0"`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) if n.as_u64() == Some(1) => Some(true),
            Value::Number(n) if n.as_u64() == Some(0) => Some(false),
            Value::String(s) => match s.trim() {
                "1" => Some(true),
                "0" => Some(false),
                s if s.eq_ignore_ascii_case("true") => Some(true),
                s if s.eq_ignore_ascii_case("false") => Some(false),
                _ => {
                    debug!(field = name, value = %s, "ignoring unrecognised value in flag field");
                    None
                }
            },
            other => {
                debug!(field = name, value = %other, "ignoring unrecognised value in flag field");
                None
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Map;

    const TABLE: FieldTable = &[
        ("sta", "sta"),
        ("eta", "eta"),
        ("std", "std"),
        ("etd", "etd"),
        ("platform", "platform"),
        ("operator_name", "operator"),
    ];

    proptest! {
        /// Whatever subset of fields the wire carries, the missing ones map
        /// to `None` and the present ones to their exact value.
        #[test]
        fn absent_fields_map_to_none(
            present in proptest::collection::vec(any::<bool>(), TABLE.len()),
            value in "[ -~]{0,12}",
        ) {
            let mut node = Map::new();
            for (&(_, wire), &keep) in TABLE.iter().zip(&present) {
                if keep {
                    node.insert(wire.to_string(), Value::String(value.clone()));
                }
            }
            let fields = map_fields(&Value::Object(node), &[TABLE]);

            for (&(internal, _), &keep) in TABLE.iter().zip(&present) {
                if keep {
                    prop_assert_eq!(fields.text(internal), Some(value.clone()));
                } else {
                    prop_assert_eq!(fields.text(internal), None);
                }
            }
        }
    }
}
