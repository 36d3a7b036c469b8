//! Variable name → index mapping along a sample's variable axis.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from variable name to its index in a field sample.
///
/// Iteration follows insertion order, and the aggregated result keeps the
/// same order. The default maps the 10 m wind components.
///
/// ```
/// use rapsd_core::VariableMap;
///
/// let vars = VariableMap::default();
/// assert_eq!(vars.index_of("u10"), Some(0));
/// assert_eq!(vars.index_of("v10"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap(IndexMap<String, usize>);

impl VariableMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace a variable; replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, index: usize) -> Option<usize> {
        self.0.insert(name.into(), index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, &idx)| (name.as_str(), idx))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for VariableMap {
    fn default() -> Self {
        [("u10", 0), ("v10", 1)].into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, idx)| (name.into(), idx)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_wind_components() {
        let vars = VariableMap::default();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.names().collect::<Vec<_>>(), vec!["u10", "v10"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let vars: VariableMap = [("t2m", 3), ("u10", 0), ("msl", 1)].into_iter().collect();
        assert_eq!(
            vars.iter().collect::<Vec<_>>(),
            vec![("t2m", 3), ("u10", 0), ("msl", 1)]
        );
    }

    #[test]
    fn duplicate_names_keep_one_entry() {
        let mut vars = VariableMap::new();
        vars.insert("u10", 0);
        vars.insert("v10", 1);
        assert_eq!(vars.insert("u10", 4), Some(0));
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.iter().next(), Some(("u10", 4)));
    }

    #[test]
    fn deserializes_from_json_object() {
        let vars: VariableMap = serde_json::from_str(r#"{"u10": 0, "v10": 1}"#).unwrap();
        assert_eq!(vars, VariableMap::default());
    }
}
