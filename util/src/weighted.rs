use rand::{
    distributions::{Distribution, WeightedError, WeightedIndex},
    Rng,
};
use serde::{Deserialize, Serialize};

/// Set of values with relative integer weights for random picking.
///
/// Serializes as a list of `(value, weight)` pairs. A table must have at
/// least one entry with a nonzero weight.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(T, u32)>",
    into = "Vec<(T, u32)>",
    bound(
        serialize = "T: Clone + Serialize",
        deserialize = "T: Deserialize<'de>"
    )
)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
    index: WeightedIndex<u32>,
}

impl<T> WeightedTable<T> {
    /// Build a table from `(value, weight)` pairs.
    ///
    /// Panics if there are no entries or all weights are zero. Use
    /// `try_from` for tables that come from user data.
    pub fn new(entries: impl IntoIterator<Item = (T, u32)>) -> Self {
        match Self::try_from(entries.into_iter().collect::<Vec<_>>()) {
            Ok(table) => table,
            Err(e) => panic!("WeightedTable::new: {e}"),
        }
    }

    /// Pick a reference to a random value.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.entries[self.index.sample(rng)].0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, u32)> {
        self.entries.iter().map(|(a, w)| (a, *w))
    }
}

impl<T> TryFrom<Vec<(T, u32)>> for WeightedTable<T> {
    type Error = WeightedError;

    fn try_from(entries: Vec<(T, u32)>) -> Result<Self, Self::Error> {
        let index = WeightedIndex::new(entries.iter().map(|(_, w)| *w))?;
        Ok(WeightedTable { entries, index })
    }
}

impl<T> From<WeightedTable<T>> for Vec<(T, u32)> {
    fn from(table: WeightedTable<T>) -> Self {
        table.entries
    }
}

impl<T> FromIterator<(T, u32)> for WeightedTable<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        WeightedTable::new(iter)
    }
}

impl<T: Clone> Distribution<T> for WeightedTable<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.pick(rng).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srng;

    #[test]
    fn single_entry() {
        let table = WeightedTable::new([('a', 1)]);
        let mut rng = srng(&1);
        for _ in 0..20 {
            assert_eq!(*table.pick(&mut rng), 'a');
        }
    }

    #[test]
    fn zero_weight_never_picked() {
        let table = WeightedTable::new([('a', 0), ('b', 5), ('c', 0)]);
        let mut rng = srng(&2);
        for _ in 0..200 {
            assert_eq!(rng.sample(&table), 'b');
        }
    }

    #[test]
    fn weights_are_relative() {
        let table = WeightedTable::new([(false, 1), (true, 3)]);
        let mut rng = srng(&3);
        let hits = (0..4000).filter(|_| *table.pick(&mut rng)).count();
        assert!((2800..3200).contains(&hits), "{hits}");
    }

    #[test]
    #[should_panic]
    fn empty_table() {
        WeightedTable::<char>::new([]);
    }

    #[test]
    fn bad_weights_are_errors() {
        assert!(WeightedTable::<char>::try_from(vec![]).is_err());
        assert!(WeightedTable::try_from(vec![('a', 0)]).is_err());
    }

    #[test]
    fn serialization() {
        let table: WeightedTable<String> =
            serde_json::from_str(r#"[["x", 2], ["y", 1]]"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().map(|(_, w)| w).sum::<u32>(), 3);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"[["x",2],["y",1]]"#
        );

        assert!(serde_json::from_str::<WeightedTable<String>>("[]").is_err());
    }
}
