//! Multi-column sort state and the stable sort it drives.
//!
//! A [`SortState`] is an ordered list of keys: the first key decides, later
//! keys only break ties. Each column cycles through unsorted, ascending and
//! descending as it is toggled, without disturbing the other keys.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::column::{Columns, ValueType};
use crate::compare::compare;
use crate::path::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub path: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(path: &str) -> SortKey {
        SortKey {
            path: path.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(path: &str) -> SortKey {
        SortKey {
            path: path.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// Active sort keys in precedence order. No two keys share a path.
///
/// The only way to change a state is [`SortState::toggle`], which keeps the
/// paths unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn new() -> SortState {
        SortState { keys: Vec::new() }
    }

    /// Advance the column at `path` one step through its cycle.
    ///
    /// An unsorted path is appended as the lowest-precedence ascending key;
    /// an ascending key flips to descending in place; a descending key is
    /// removed and the keys after it move up.
    pub fn toggle(&mut self, path: &str) {
        match self.keys.iter().rposition(|k| k.path == path) {
            None => self.keys.push(SortKey::asc(path)),
            Some(i) => match self.keys[i].direction {
                SortDirection::Ascending => self.keys[i].direction = SortDirection::Descending,
                SortDirection::Descending => {
                    self.keys.remove(i);
                }
            },
        }
    }

    /// The state one toggle of `path` away from this one.
    pub fn toggled(&self, path: &str) -> SortState {
        let mut next = self.clone();
        next.toggle(path);
        next
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn direction_of(&self, path: &str) -> Option<SortDirection> {
        self.keys.iter().find(|k| k.path == path).map(|k| k.direction)
    }

    /// Zero-based precedence of the key for `path`, if it is sorted.
    pub fn precedence_of(&self, path: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.path == path)
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return write!(f, "natural order");
        }
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", key.path, key.direction.arrow())?;
        }
        Ok(())
    }
}

/// Source positions of `rows` in the order `state` puts them.
///
/// Keys whose path has no column are skipped. Rows every key considers equal
/// keep their original relative order.
pub fn sorted_indices<R: Record>(rows: &[R], state: &SortState, columns: &Columns) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    if state.is_empty() {
        return indices;
    }

    let active: Vec<(&str, SortDirection, ValueType)> = state
        .keys()
        .iter()
        .filter_map(|key| match columns.get(&key.path) {
            Some(column) => Some((key.path.as_str(), key.direction, column.value_type)),
            None => {
                debug!(path = %key.path, "no column for sort key, skipping");
                None
            }
        })
        .collect();
    if active.is_empty() {
        return indices;
    }

    // slice::sort_by is stable
    indices.sort_by(|&a, &b| {
        let (a, b) = (&rows[a], &rows[b]);
        for &(path, direction, value_type) in &active {
            let ordering = compare(a.resolve(path), b.resolve(path), value_type);
            if ordering != Ordering::Equal {
                return direction.apply(ordering);
            }
        }
        Ordering::Equal
    });
    indices
}

/// An ordered view of `rows` under `state`. `rows` itself is left untouched.
pub fn sort<'a, R: Record>(rows: &'a [R], state: &SortState, columns: &Columns) -> Vec<&'a R> {
    sorted_indices(rows, state, columns)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}
