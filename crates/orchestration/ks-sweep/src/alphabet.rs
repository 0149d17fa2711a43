//! Keyspace partitioning over a fixed key alphabet.

/// Characters legal as the next byte of an object key.
///
/// https://docs.aws.amazon.com/AmazonS3/latest/userguide/object-keys.html
const SAFE_KEY_CHARS: &str = "!-_.*'()/";

/// A fixed, sorted, deduplicated set of characters over which the keyspace
/// is partitioned.
///
/// Appending each character in turn to a prefix produces that prefix's
/// sibling child partitions: deterministic, pairwise disjoint, and jointly
/// covering every key that continues past the prefix with a legal character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Default for Alphabet {
    /// The store's documented safe key-character set: ASCII letters, digits,
    /// and `!-_.*'()/`.
    fn default() -> Self {
        let chars = ('a'..='z')
            .chain('A'..='Z')
            .chain('0'..='9')
            .chain(SAFE_KEY_CHARS.chars());
        Self::from_chars(chars)
    }
}

impl Alphabet {
    /// Build an alphabet from arbitrary characters, sorting and removing
    /// duplicates.
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut chars: Vec<char> = chars.into_iter().collect();
        chars.sort_unstable();
        chars.dedup();
        Self { chars }
    }

    /// Split `prefix` into its sibling child prefixes, one per alphabet
    /// character, in lexicographic order.
    pub fn children(&self, prefix: &str) -> Vec<String> {
        self.chars
            .iter()
            .map(|c| {
                let mut child = String::with_capacity(prefix.len() + c.len_utf8());
                child.push_str(prefix);
                child.push(*c);
                child
            })
            .collect()
    }

    /// Number of characters in the alphabet.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the alphabet is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The characters of the alphabet, sorted ascending.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet_size() {
        // 26 lowercase + 26 uppercase + 10 digits + 9 specials
        assert_eq!(Alphabet::default().len(), 71);
    }

    #[test]
    fn test_default_alphabet_sorted() {
        let alphabet = Alphabet::default();
        let chars = alphabet.chars();
        assert!(chars.windows(2).all(|w| w[0] < w[1]));
        // '!' sorts first, lowercase letters last
        assert_eq!(chars[0], '!');
        assert_eq!(*chars.last().unwrap(), 'z');
    }

    #[test]
    fn test_from_chars_dedups() {
        let alphabet = Alphabet::from_chars("bbaacc".chars());
        assert_eq!(alphabet.chars(), &['a', 'b', 'c']);
    }

    #[test]
    fn test_children_cover_and_order() {
        let alphabet = Alphabet::from_chars("ab1".chars());
        let children = alphabet.children("x/");
        assert_eq!(children, vec!["x/1", "x/a", "x/b"]);
    }

    #[test]
    fn test_children_of_empty_prefix() {
        let alphabet = Alphabet::from_chars("ab".chars());
        assert_eq!(alphabet.children(""), vec!["a", "b"]);
    }

    #[test]
    fn test_children_pairwise_disjoint() {
        let alphabet = Alphabet::default();
        let children = alphabet.children("p");
        for pair in children.windows(2) {
            assert!(!pair[1].starts_with(&pair[0]));
        }
    }
}
