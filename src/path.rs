use serde_json::{Map, Value};

/// A row the grid can read values out of.
///
/// The grid never knows the shape of a row; it only asks for the value at a
/// dotted path and treats `None` as absent.
pub trait Record {
    fn resolve(&self, path: &str) -> Option<&Value>;
}

impl Record for Value {
    fn resolve(&self, path: &str) -> Option<&Value> {
        resolve(self, path)
    }
}

// A bare map cannot hand itself out as a `Value`, so the empty path is absent.
impl Record for Map<String, Value> {
    fn resolve(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return None;
        }
        let mut segments = path.split('.');
        let first = self.get(segments.next()?)?;
        walk(first, segments)
    }
}

/// Resolve `path` against `record`, one `.`-separated segment at a time.
///
/// The empty path yields the record itself. Walking stops with `None` as soon
/// as a segment is missing, the current value is `null`, or the current value
/// is a scalar. Arrays are walked by numeric segment.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return present(record);
    }

    walk(record, path.split('.'))
}

fn walk<'a, 'p>(mut current: &'a Value, segments: impl Iterator<Item = &'p str>) -> Option<&'a Value> {
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    present(current)
}

// null counts as absent
fn present(value: &Value) -> Option<&Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}
