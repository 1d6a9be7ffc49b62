use std::collections::HashMap;
use std::hash::Hash;

use crate::analyzers::types::Popular;

/// Counts each distinct value, most frequent first.
///
/// Values with equal counts stay in order of their first occurrence.
pub fn value_counts<T, I>(values: I) -> Vec<Popular<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<Popular<T>> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push(Popular { value, count: 1 });
            }
        }
    }

    // stable: ties keep first-occurrence order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Most frequent value; the earliest one wins a tie. `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<Popular<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next()
}
