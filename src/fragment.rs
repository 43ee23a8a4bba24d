//! Building blocks for the three query fragments: plain `key=value` tokens,
//! the single `sp=` spelling pattern, and the `md=` metadata flag set.

/// Which fragment received the very first parameter of a session. The first
/// fragment leads the assembled query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Generic,
    Pattern,
    Metadata,
}

/// Ordered sequence of `key=value` tokens, joined at assembly time.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    tokens: Vec<(String, String)>,
}

impl Fragment {
    pub fn push(&mut self, key: &str, value: &str) {
        self.tokens.push((key.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Render without a leading separator; the caller joins fragments with `&`.
    pub fn render(&self) -> String {
        self.tokens
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// State of the single `sp=` pattern token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatternFragment {
    #[default]
    Empty,
    /// Literal pattern from a spelled-like constraint; `*` and `?` wildcards
    /// pass through uninterpreted.
    Spelled(String),
    /// Prefix/suffix constraints, combined into one `start*end` value when the
    /// token is rendered.
    Affix {
        prefix: Option<String>,
        suffix: Option<String>,
    },
    /// Fully-built pattern such as `c???t`; replaces whatever was set before.
    Exact(String),
}

impl PatternFragment {
    pub fn is_empty(&self) -> bool {
        matches!(self, PatternFragment::Empty)
    }

    /// Install a prefix constraint, composing with the pattern already present.
    pub fn set_prefix(&mut self, prefix: &str) {
        *self = match std::mem::take(self) {
            PatternFragment::Affix { suffix, .. } => PatternFragment::Affix {
                prefix: Some(prefix.to_string()),
                suffix,
            },
            PatternFragment::Exact(value) => PatternFragment::Exact(format!("{prefix}*{value}")),
            _ => PatternFragment::Affix {
                prefix: Some(prefix.to_string()),
                suffix: None,
            },
        };
    }

    /// Install a suffix constraint, composing with the pattern already present.
    pub fn set_suffix(&mut self, suffix: &str) {
        *self = match std::mem::take(self) {
            PatternFragment::Affix { prefix, .. } => PatternFragment::Affix {
                prefix,
                suffix: Some(suffix.to_string()),
            },
            PatternFragment::Exact(value) => PatternFragment::Exact(format!("{value}*{suffix}")),
            _ => PatternFragment::Affix {
                prefix: None,
                suffix: Some(suffix.to_string()),
            },
        };
    }

    /// The `sp` value, or `None` when no pattern has been set.
    pub fn value(&self) -> Option<String> {
        match self {
            PatternFragment::Empty => None,
            PatternFragment::Spelled(value) | PatternFragment::Exact(value) => Some(value.clone()),
            PatternFragment::Affix { prefix, suffix } => {
                let prefix = prefix.as_deref().unwrap_or_default();
                let suffix = suffix.as_deref().unwrap_or_default();
                Some(format!("{prefix}*{suffix}"))
            }
        }
    }

    pub fn render(&self) -> Option<String> {
        self.value().map(|value| format!("sp={value}"))
    }
}

/// Single-character metadata flags understood by the `md` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaFlag {
    Definitions,
    PartsOfSpeech,
    SyllableCount,
    Pronunciation,
}

impl MetaFlag {
    /// Canonical order, used when every flag is requested at once.
    pub const ALL: [MetaFlag; 4] = [
        MetaFlag::Definitions,
        MetaFlag::PartsOfSpeech,
        MetaFlag::SyllableCount,
        MetaFlag::Pronunciation,
    ];

    pub fn as_char(self) -> char {
        match self {
            MetaFlag::Definitions => 'd',
            MetaFlag::PartsOfSpeech => 'p',
            MetaFlag::SyllableCount => 's',
            MetaFlag::Pronunciation => 'r',
        }
    }
}

/// Insertion-ordered set of metadata flags; each flag is kept at most once.
#[derive(Debug, Clone, Default)]
pub struct MetaFlags {
    order: Vec<MetaFlag>,
}

impl MetaFlags {
    /// Adds a flag. Returns false when the flag was already present.
    pub fn insert(&mut self, flag: MetaFlag) -> bool {
        if self.order.contains(&flag) {
            return false;
        }
        self.order.push(flag);
        true
    }

    pub fn contains(&self, flag: MetaFlag) -> bool {
        self.order.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Flag letters in insertion order, e.g. `dps`.
    pub fn letters(&self) -> String {
        self.order.iter().map(|flag| flag.as_char()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_render_joins_tokens_in_order() {
        let mut fragment = Fragment::default();
        fragment.push("ml", "ocean");
        fragment.push("topic", "sea");
        fragment.push("max", "10");

        assert_eq!(fragment.render(), "ml=ocean&topic=sea&max=10");
    }

    #[test]
    fn test_affix_renders_combined_token_regardless_of_slot_order() {
        let mut prefix_first = PatternFragment::default();
        prefix_first.set_prefix("re");
        prefix_first.set_suffix("ing");

        let mut suffix_first = PatternFragment::default();
        suffix_first.set_suffix("ing");
        suffix_first.set_prefix("re");

        assert_eq!(prefix_first.render().as_deref(), Some("sp=re*ing"));
        assert_eq!(suffix_first.render().as_deref(), Some("sp=re*ing"));
    }

    #[test]
    fn test_single_affix_slots() {
        let mut prefix_only = PatternFragment::default();
        prefix_only.set_prefix("re");
        assert_eq!(prefix_only.value().as_deref(), Some("re*"));

        let mut suffix_only = PatternFragment::default();
        suffix_only.set_suffix("ing");
        assert_eq!(suffix_only.value().as_deref(), Some("*ing"));
    }

    #[test]
    fn test_affix_composes_around_exact_pattern() {
        let mut pattern = PatternFragment::Exact("c???t".to_string());
        pattern.set_prefix("re");
        assert_eq!(pattern.value().as_deref(), Some("re*c???t"));

        let mut pattern = PatternFragment::Exact("c???t".to_string());
        pattern.set_suffix("ing");
        assert_eq!(pattern.value().as_deref(), Some("c???t*ing"));
    }

    #[test]
    fn test_meta_flags_keep_insertion_order_without_duplicates() {
        let mut flags = MetaFlags::default();
        assert!(flags.insert(MetaFlag::SyllableCount));
        assert!(flags.insert(MetaFlag::Definitions));
        assert!(!flags.insert(MetaFlag::SyllableCount));

        assert_eq!(flags.letters(), "sd");
    }

    #[test]
    fn test_meta_flags_canonical_order() {
        let mut flags = MetaFlags::default();
        for flag in MetaFlag::ALL {
            flags.insert(flag);
        }
        assert_eq!(flags.letters(), "dpsr");
    }
}
