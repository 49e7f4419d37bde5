//! Splits a link list into bounded, order-preserving groups
//!
//! Each group is dispatched as one unit of work, which bounds how many links a
//! single crawl task owns at a time.

use crate::{ConfigError, Link};

/// An ordered slice of the input links, dispatched together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchGroup {
    links: Vec<Link>,
}

impl BatchGroup {
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_links(self) -> Vec<Link> {
        self.links
    }
}

/// Splits `links` into contiguous groups of at most `size` links
///
/// Input order is preserved within and across groups; only the last group may be
/// shorter than `size`. An empty input yields no groups.
///
/// # Errors
///
/// Returns `ConfigError::InvalidGroupSize` when `size` is zero.
///
/// # Example
///
/// ```
/// use gleaner::crawler::group_links;
///
/// let links: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
/// let groups = group_links(&links, 2).unwrap();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[1].links(), &["c".to_string()]);
/// ```
pub fn group_links(links: &[Link], size: usize) -> Result<Vec<BatchGroup>, ConfigError> {
    if size == 0 {
        return Err(ConfigError::InvalidGroupSize(0));
    }

    Ok(links
        .chunks(size)
        .map(|chunk| BatchGroup {
            links: chunk.to_vec(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(n: usize) -> Vec<Link> {
        (0..n).map(|i| format!("https://example.com/{}", i)).collect()
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = group_links(&[], 1000).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_zero_size_is_an_error() {
        assert!(matches!(
            group_links(&links(3), 0),
            Err(ConfigError::InvalidGroupSize(0))
        ));
        assert!(matches!(
            group_links(&[], 0),
            Err(ConfigError::InvalidGroupSize(0))
        ));
    }

    #[test]
    fn test_exact_multiple() {
        let groups = group_links(&links(6), 3).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.len() == 3));
    }

    #[test]
    fn test_last_group_may_be_shorter() {
        let groups = group_links(&links(2500), 1000).unwrap();
        let sizes: Vec<usize> = groups.iter().map(BatchGroup::len).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
    }

    #[test]
    fn test_size_larger_than_input() {
        let groups = group_links(&links(4), 1000).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        for n in [1, 2, 7, 10, 33] {
            for size in [1, 2, 3, 10, 50] {
                let input = links(n);
                let groups = group_links(&input, size).unwrap();

                assert!(groups.iter().all(|g| g.len() <= size && !g.is_empty()));

                let rebuilt: Vec<Link> = groups.into_iter().flat_map(BatchGroup::into_links).collect();
                assert_eq!(rebuilt, input, "n={} size={}", n, size);
            }
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let input: Vec<Link> = vec!["a".into(), "b".into(), "a".into()];
        let groups = group_links(&input, 2).unwrap();
        assert_eq!(groups[0].links(), &["a".to_string(), "b".to_string()]);
        assert_eq!(groups[1].links(), &["a".to_string()]);
    }
}
