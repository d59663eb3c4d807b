use alloc::{collections::BTreeSet, vec::Vec};

/// Removes repeated elements, keeping the first occurrence of each and the original order.
#[must_use]
pub(crate) fn uniq<T: Ord + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.clone()) {
            result.push(item);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::uniq;

    use alloc::{vec, vec::Vec};

    #[test]
    fn test_uniq_keeps_first_occurrence() {
        assert_eq!(uniq(vec!["a", "b", "a", "c", "b"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_uniq_empty() {
        assert!(uniq(Vec::<u8>::new()).is_empty());
    }
}
