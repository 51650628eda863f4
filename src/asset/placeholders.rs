//! Placeholder substitution on asset path strings.
//!
//! A [`PlaceholderMapping`] is applied pair by pair, in insertion order. A
//! later pair sees the text produced by earlier pairs, so callers that chain
//! placeholders control the outcome through the order they insert them.

/// Ordered token -> replacement pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMapping {
    pairs: Vec<(String, String)>,
}

impl PlaceholderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair. Re-inserting a known token updates its value in place.
    pub fn insert(&mut self, token: impl Into<String>, replacement: impl Into<String>) {
        let token = token.into();
        let replacement = replacement.into();
        match self.pairs.iter_mut().find(|(known, _)| *known == token) {
            Some((_, value)) => *value = replacement,
            None => self.pairs.push((token, replacement)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(known, _)| known == token)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(t, r)| (t.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PlaceholderMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (token, replacement) in iter {
            mapping.insert(token, replacement);
        }
        mapping
    }
}

/// Replace every occurrence of every placeholder in `path`.
pub fn resolve(path: &str, mapping: &PlaceholderMapping) -> String {
    tracing::debug!(path, "processing path");
    let mut resolved = path.to_string();
    for (token, replacement) in mapping.iter() {
        // str::replace with an empty pattern would interleave the value.
        if token.is_empty() {
            continue;
        }
        resolved = resolved.replace(token, replacement);
    }
    tracing::debug!(path = %resolved, "processed path");
    resolved
}
