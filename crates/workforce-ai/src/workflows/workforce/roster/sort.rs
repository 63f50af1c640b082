use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Column sort state for a table view.
///
/// Selecting the same column cycles unsorted, ascending, descending, then
/// back to unsorted; selecting another column starts at ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState<K> {
    pub key: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortState<K> {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: K, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    pub fn toggled(self, key: K) -> Self {
        match (self.key, self.direction) {
            (Some(current), SortDirection::Asc) if current == key => {
                Self::by(key, SortDirection::Desc)
            }
            (Some(current), SortDirection::Desc) if current == key => Self::unsorted(),
            _ => Self::by(key, SortDirection::Asc),
        }
    }

    pub fn toggle(&mut self, key: K) {
        *self = self.toggled(key);
    }

    /// Stable sort; equal keys keep their incoming relative order in both directions.
    pub fn sort_by<T, F>(&self, items: &mut [T], compare: F)
    where
        F: Fn(K, &T, &T) -> Ordering,
    {
        if let Some(key) = self.key {
            let direction = self.direction;
            items.sort_by(|a, b| direction.apply(compare(key, a, b)));
        }
    }
}

/// Equality filter with an explicit "all" option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}
