//! SQL text plus the parameters it introduces.

use indexmap::IndexMap;

use crate::value::ParamValue;

/// Ordered parameter map: generated key -> bound value.
///
/// Insertion order equals the textual order of placeholders because fragments
/// are always merged left to right.
pub type Parameters = IndexMap<String, ParamValue>;

/// An immutable piece of rendered SQL and the bindings it needs.
///
/// Fragments compose with [`Fragment::merge`], which joins text with a single
/// space and unions parameters. The empty fragment is the identity of merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    text: String,
    parameters: Parameters,
}

impl Fragment {
    /// The identity element for [`merge`](Self::merge).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fragment holding `text` and no parameters.
    pub fn with_fragment(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Parameters::new(),
        }
    }

    /// Add one binding.
    ///
    /// # Panics
    /// If `key` is already bound in this fragment.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        assert!(
            !self.parameters.contains_key(&key),
            "parameter key `{key}` bound twice in one fragment"
        );
        self.parameters.insert(key, value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Whether there is any SQL text to emit.
    pub fn is_renderable(&self) -> bool {
        !self.text.is_empty()
    }

    /// Concatenate with `other`, separated by one space when both sides have text.
    ///
    /// # Panics
    /// If the two parameter maps share a key. Keys are minted from one sequence per
    /// render pass, so an overlap means a renderer reused a key.
    pub fn merge(self, other: Fragment) -> Fragment {
        self.merge_with(" ", other)
    }

    /// Like [`merge`](Self::merge) but with an arbitrary separator.
    pub fn merge_with(mut self, separator: &str, other: Fragment) -> Fragment {
        if !other.text.is_empty() {
            if !self.text.is_empty() {
                self.text.push_str(separator);
            }
            self.text.push_str(&other.text);
        }
        for (key, value) in other.parameters {
            assert!(
                !self.parameters.contains_key(&key),
                "parameter key `{key}` collides while merging fragments"
            );
            self.parameters.insert(key, value);
        }
        self
    }

    /// Prepend a keyword, e.g. `where`. No-op on an empty fragment.
    pub fn prefixed(self, prefix: &str) -> Fragment {
        if self.text.is_empty() {
            return self;
        }
        Fragment::with_fragment(prefix).merge(self)
    }

    /// Wrap the text in parentheses. No-op on an empty fragment.
    pub fn parenthesized(mut self) -> Fragment {
        if !self.text.is_empty() {
            self.text = format!("({})", self.text);
        }
        self
    }

    pub fn into_parts(self) -> (String, Parameters) {
        (self.text, self.parameters)
    }
}

/// Accumulates fragments and joins them with a separator.
///
/// Non-renderable fragments are dropped so that optional pieces never leave a
/// dangling separator behind.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    fragments: Vec<Fragment>,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fragment: Fragment) {
        if fragment.is_renderable() {
            self.fragments.push(fragment);
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join all collected fragments with `separator`.
    pub fn join(self, separator: &str) -> Fragment {
        self.fragments
            .into_iter()
            .fold(Fragment::empty(), |acc, f| acc.merge_with(separator, f))
    }
}

impl FromIterator<Fragment> for FragmentCollector {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        let mut collector = Self::new();
        for fragment in iter {
            collector.add(fragment);
        }
        collector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_joins_text_and_unions_parameters() {
        let a = Fragment::with_fragment("a = :p1").with_parameter("p1", 1i64);
        let b = Fragment::with_fragment("b = :p2").with_parameter("p2", 2i64);

        let merged = a.merge(b);
        assert_eq!(merged.text(), "a = :p1 b = :p2");
        assert_eq!(merged.parameters().len(), 2);
        assert_eq!(merged.parameters()["p1"], ParamValue::Int(1));
        assert_eq!(merged.parameters()["p2"], ParamValue::Int(2));
        // Order follows the text.
        let keys: Vec<_> = merged.parameters().keys().cloned().collect();
        assert_eq!(keys, vec!["p1", "p2"]);
    }

    #[test]
    fn empty_is_identity() {
        let f = Fragment::with_fragment("x").with_parameter("p1", true);
        assert_eq!(Fragment::empty().merge(f.clone()), f);
        assert_eq!(f.clone().merge(Fragment::empty()), f);
        assert!(!Fragment::empty().is_renderable());
    }

    #[test]
    #[should_panic(expected = "collides")]
    fn merge_rejects_overlapping_keys() {
        let a = Fragment::with_fragment("a").with_parameter("p1", 1i64);
        let b = Fragment::with_fragment("b").with_parameter("p1", 1i64);
        let _ = a.merge(b);
    }

    #[test]
    #[should_panic(expected = "bound twice")]
    fn with_parameter_rejects_duplicate_key() {
        let _ = Fragment::with_fragment("a")
            .with_parameter("p1", 1i64)
            .with_parameter("p1", 2i64);
    }

    #[test]
    fn prefixed_and_parenthesized_skip_empty() {
        assert_eq!(Fragment::empty().prefixed("where"), Fragment::empty());
        assert_eq!(Fragment::empty().parenthesized(), Fragment::empty());
        assert_eq!(
            Fragment::with_fragment("a = 1").prefixed("where").text(),
            "where a = 1"
        );
        assert_eq!(Fragment::with_fragment("a").parenthesized().text(), "(a)");
    }

    #[test]
    fn collector_drops_empty_fragments() {
        let joined: Fragment = [
            Fragment::with_fragment("a"),
            Fragment::empty(),
            Fragment::with_fragment("b"),
        ]
        .into_iter()
        .collect::<FragmentCollector>()
        .join(", ");
        assert_eq!(joined.text(), "a, b");
    }
}
