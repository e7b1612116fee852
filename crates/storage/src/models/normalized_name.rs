/// An archer's name in an order-insensitive, case-insensitive form, used to
/// recognise the same person across roster imports ("Jane Doe" vs "doe jane").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedArcherName {
    first: String,
    second: String,
}

impl NormalizedArcherName {
    /// Builds the normalized form from the two name parts in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage::models::NormalizedArcherName;
    ///
    /// let a = NormalizedArcherName::new("Jane", "Doe");
    /// let b = NormalizedArcherName::new("DOE", " jane ");
    ///
    /// assert_eq!(a, b);
    /// ```
    pub fn new(name1: impl AsRef<str>, name2: impl AsRef<str>) -> Self {
        let name1 = normalize_part(name1.as_ref());
        let name2 = normalize_part(name2.as_ref());

        if name1 <= name2 {
            Self {
                first: name1,
                second: name2,
            }
        } else {
            Self {
                first: name2,
                second: name1,
            }
        }
    }

    pub fn parts(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }
}

fn normalize_part(part: &str) -> String {
    part.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_same_order() {
        let name = NormalizedArcherName::new("Alice", "Smith");
        assert_eq!(name.parts(), ("alice", "smith"));
    }

    #[test]
    fn test_normalization_reversed_order() {
        let name = NormalizedArcherName::new("Smith", "Alice");
        assert_eq!(name.parts(), ("alice", "smith"));
    }

    #[test]
    fn test_normalization_case_and_whitespace_insensitive() {
        let name1 = NormalizedArcherName::new("SMITH", "  alice");
        let name2 = NormalizedArcherName::new("alice", "Smith ");
        assert_eq!(name1, name2);
    }

    #[test]
    fn test_inner_whitespace_collapsed() {
        let name = NormalizedArcherName::new("Mary  Ann", "Lee");
        assert_eq!(name.parts(), ("lee", "mary ann"));
    }

    #[test]
    fn test_empty_name() {
        assert!(NormalizedArcherName::new(" ", "").is_empty());
        assert!(!NormalizedArcherName::new("a", "").is_empty());
    }
}
