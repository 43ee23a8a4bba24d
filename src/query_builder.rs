use crate::config;
use crate::error::{DatamuseError, Result};
use crate::fragment::{Fragment, FragmentKind, MetaFlag, MetaFlags, PatternFragment};
use crate::types::WordEntry;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result count applied when `num_results` is called without an explicit limit.
const DEFAULT_RESULT_LIMIT: u32 = 100;

/// Hard cap the API places on the `max` parameter.
const MAX_RESULT_LIMIT: u32 = 1000;

/// Result-count limit for a query.
#[derive(Debug, Clone, Copy)]
pub enum ResultLimit {
    Limited(u32),
    Default,
}

impl From<Option<u32>> for ResultLimit {
    fn from(opt: Option<u32>) -> Self {
        match opt {
            Some(limit) => ResultLimit::Limited(limit),
            None => ResultLimit::Default,
        }
    }
}

impl From<u32> for ResultLimit {
    fn from(limit: u32) -> Self {
        ResultLimit::Limited(limit)
    }
}

/// Chainable accumulator for one `/words` query.
///
/// Setter calls collect into three fragments: plain `key=value` parameters,
/// the single `sp=` spelling pattern, and the `md=` metadata flags. Whichever
/// fragment receives the first call leads the assembled query string. A
/// successful [`execute`](QueryBuilder::execute) sends the request and resets
/// the builder so the same instance can serve an unrelated query.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_url: String,
    generic: Fragment,
    pattern: PatternFragment,
    meta: MetaFlags,
    param_count: u32,
    first_fragment: Option<FragmentKind>,
    starts_with_active: bool,
    ends_with_active: bool,
    spelled_like_active: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// Creates a builder against the standard API root.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(config::DEFAULT_BASE_URL)
    }

    /// Creates a builder against the API root resolved from the environment.
    ///
    /// # Errors
    /// Returns `DatamuseError::InvalidBaseUrl` if the `DATAMUSE_BASE_URL`
    /// override is set but malformed.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_base_url(&config::resolve_base_url()?))
    }

    /// Creates a builder against an explicit API root.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        QueryBuilder {
            base_url: base_url.to_string(),
            generic: Fragment::default(),
            pattern: PatternFragment::default(),
            meta: MetaFlags::default(),
            param_count: 0,
            first_fragment: None,
            starts_with_active: false,
            ends_with_active: false,
            spelled_like_active: false,
        }
    }

    fn mark_first(&mut self, kind: FragmentKind) {
        if self.param_count == 0 {
            self.first_fragment = Some(kind);
        }
    }

    fn push_generic(&mut self, key: &str, value: &str) {
        self.mark_first(FragmentKind::Generic);
        self.generic.push(key, value);
        self.param_count += 1;
    }

    // Generic setters ========================================================

    /// Request words with a meaning similar to `word` (`ml`).
    pub fn similar_meaning(&mut self, word: &str) -> &mut Self {
        self.push_generic("ml", word);
        self
    }

    /// Request words that sound like `word` (`sl`).
    pub fn sounds_like(&mut self, word: &str) -> &mut Self {
        self.push_generic("sl", word);
        self
    }

    /// Bias results toward a topic (`topic`). Narrows other setters; on its
    /// own the API returns an empty result set.
    pub fn topic(&mut self, category: &str) -> &mut Self {
        self.push_generic("topic", category);
        self
    }

    /// Cap the number of results (`max`). Narrows other setters; on its own
    /// the API returns an empty result set.
    ///
    /// # Arguments
    /// * `limit` - The cap to apply. `None` applies the API default of 100.
    ///
    /// # Errors
    /// Returns `DatamuseError::Validation` for a limit above 1000; the builder
    /// is left untouched.
    pub fn num_results(&mut self, limit: impl Into<ResultLimit>) -> Result<&mut Self> {
        let count = match limit.into() {
            ResultLimit::Limited(count) => count,
            ResultLimit::Default => DEFAULT_RESULT_LIMIT,
        };
        if count > MAX_RESULT_LIMIT {
            return Err(DatamuseError::Validation(format!(
                "result limit {count} exceeds the API maximum of {MAX_RESULT_LIMIT}"
            )));
        }
        self.push_generic("max", &count.to_string());
        Ok(self)
    }

    // Relation setters =======================================================

    /// Request adjectives commonly used to modify `noun` (`rel_jjb`).
    pub fn adjectives(&mut self, noun: &str) -> &mut Self {
        self.push_generic("rel_jjb", noun);
        self
    }

    /// Request nouns commonly modified by `adjective` (`rel_jja`).
    pub fn words_modified_by_adjective(&mut self, adjective: &str) -> &mut Self {
        self.push_generic("rel_jja", adjective);
        self
    }

    /// Request synonyms of `word` (`rel_syn`).
    pub fn synonyms(&mut self, word: &str) -> &mut Self {
        self.push_generic("rel_syn", word);
        self
    }

    /// Request antonyms of `word` (`rel_ant`).
    pub fn antonyms(&mut self, word: &str) -> &mut Self {
        self.push_generic("rel_ant", word);
        self
    }

    /// Request homophones of `word` (`rel_hom`).
    pub fn homophones(&mut self, word: &str) -> &mut Self {
        self.push_generic("rel_hom", word);
        self
    }

    /// Request hyponyms of `word` (`rel_gen`).
    pub fn hyponyms(&mut self, word: &str) -> &mut Self {
        self.push_generic("rel_gen", word);
        self
    }

    /// Request hypernyms of `word` (`rel_spc`).
    pub fn hypernyms(&mut self, word: &str) -> &mut Self {
        self.push_generic("rel_spc", word);
        self
    }

    /// Request words statistically associated with `word` (`rel_trg`).
    pub fn triggers(&mut self, word: &str) -> &mut Self {
        self.push_generic("rel_trg", word);
        self
    }

    // Pattern setters ========================================================

    /// Constrain spelling to `pattern` (`sp`). The pattern may embed `*` and
    /// `?` wildcards; they are passed through uninterpreted.
    ///
    /// # Errors
    /// Returns `DatamuseError::Usage` when a starts-with or ends-with
    /// constraint is already active; the builder is left untouched.
    pub fn spelled_like(&mut self, pattern: &str) -> Result<&mut Self> {
        if self.starts_with_active || self.ends_with_active {
            return Err(DatamuseError::Usage(
                "spelled_like cannot be combined with starts_with or ends_with; \
                 use it alone, or combine the other two"
                    .to_string(),
            ));
        }
        self.mark_first(FragmentKind::Pattern);
        self.pattern = PatternFragment::Spelled(pattern.to_string());
        self.spelled_like_active = true;
        self.param_count += 1;
        Ok(self)
    }

    /// Constrain results to words starting with `prefix`. Combines with a
    /// prior `ends_with` into a single `prefix*suffix` pattern.
    ///
    /// # Errors
    /// Returns `DatamuseError::Usage` when a spelled-like constraint is
    /// already active; the builder is left untouched.
    pub fn starts_with(&mut self, prefix: &str) -> Result<&mut Self> {
        if self.spelled_like_active {
            return Err(Self::affix_conflict());
        }
        self.mark_first(FragmentKind::Pattern);
        self.pattern.set_prefix(prefix);
        self.starts_with_active = true;
        self.param_count += 1;
        Ok(self)
    }

    /// Constrain results to words ending with `suffix`. Combines with a prior
    /// `starts_with` into a single `prefix*suffix` pattern.
    ///
    /// # Errors
    /// Returns `DatamuseError::Usage` when a spelled-like constraint is
    /// already active; the builder is left untouched.
    pub fn ends_with(&mut self, suffix: &str) -> Result<&mut Self> {
        if self.spelled_like_active {
            return Err(Self::affix_conflict());
        }
        self.mark_first(FragmentKind::Pattern);
        self.pattern.set_suffix(suffix);
        self.ends_with_active = true;
        self.param_count += 1;
        Ok(self)
    }

    /// Constrain results to words starting with `start`, ending with `end`,
    /// with exactly `gap_count` letters in between. Overwrites any pattern set
    /// earlier in the session.
    pub fn start_end_between(&mut self, start: &str, end: &str, gap_count: usize) -> &mut Self {
        self.mark_first(FragmentKind::Pattern);
        let gaps = "?".repeat(gap_count);
        self.pattern = PatternFragment::Exact(format!("{start}{gaps}{end}"));
        self.param_count += 1;
        self
    }

    fn affix_conflict() -> DatamuseError {
        DatamuseError::Usage(
            "starts_with and ends_with cannot be combined with spelled_like; \
             use spelled_like by itself"
                .to_string(),
        )
    }

    // Metadata setters =======================================================

    fn add_meta(&mut self, flag: MetaFlag) -> &mut Self {
        // Repeat requests for a flag are complete no-ops.
        if self.meta.contains(flag) {
            return self;
        }
        self.mark_first(FragmentKind::Metadata);
        self.meta.insert(flag);
        self.param_count += 1;
        self
    }

    /// Request word definitions in the response (`md=d`).
    pub fn definitions(&mut self) -> &mut Self {
        self.add_meta(MetaFlag::Definitions)
    }

    /// Request parts of speech in the response (`md=p`).
    pub fn parts_of_speech(&mut self) -> &mut Self {
        self.add_meta(MetaFlag::PartsOfSpeech)
    }

    /// Request syllable counts in the response (`md=s`).
    pub fn syllable_count(&mut self) -> &mut Self {
        self.add_meta(MetaFlag::SyllableCount)
    }

    /// Request pronunciations in the response (`md=r`).
    pub fn pronunciation(&mut self) -> &mut Self {
        self.add_meta(MetaFlag::Pronunciation)
    }

    /// Request every metadata field at once. Flags already requested keep
    /// their position; later individual requests become no-ops.
    pub fn all_metadata(&mut self) -> &mut Self {
        self.mark_first(FragmentKind::Metadata);
        for flag in MetaFlag::ALL {
            self.meta.insert(flag);
        }
        self.param_count += 1;
        self
    }

    // Assembly and execution =================================================

    /// Assemble the final request URL from the accumulated fragments.
    ///
    /// The fragment that received the first parameter of the session leads;
    /// the remaining two follow in the fixed generic, pattern, metadata order.
    ///
    /// # Errors
    /// Returns `DatamuseError::Usage` when no parameter has been set.
    pub fn build_url(&self) -> Result<String> {
        let first = self.first_fragment.ok_or_else(|| {
            DatamuseError::Usage(
                "no parameters set; call at least one setter before executing".to_string(),
            )
        })?;

        let generic = (!self.generic.is_empty()).then(|| self.generic.render());
        let pattern = self.pattern.render();
        let metadata = (!self.meta.is_empty()).then(|| format!("md={}", self.meta.letters()));

        let ordered = match first {
            FragmentKind::Generic => [generic, pattern, metadata],
            FragmentKind::Pattern => [pattern, generic, metadata],
            FragmentKind::Metadata => [metadata, generic, pattern],
        };

        let query: Vec<String> = ordered.into_iter().flatten().collect();
        Ok(format!("{}?{}", self.base_url, query.join("&")))
    }

    /// Send the accumulated query and return the parsed JSON body as-is.
    ///
    /// On success all session state is cleared, leaving the builder ready for
    /// an unrelated query. On failure the state is preserved so the caller can
    /// retry. Taking `&mut self` keeps a second execute from starting while
    /// one is in flight.
    ///
    /// # Errors
    /// * `DatamuseError::Usage` - If no parameter has been set.
    /// * `DatamuseError::Api` - If the API returns a non-success status.
    /// * `DatamuseError::Http` - If the request or body decoding fails.
    pub async fn execute(&mut self) -> Result<Value> {
        self.fetch().await
    }

    /// Variant of [`execute`](QueryBuilder::execute) decoding the response
    /// into typed rows.
    ///
    /// # Errors
    /// Same as [`execute`](QueryBuilder::execute).
    pub async fn execute_words(&mut self) -> Result<Vec<WordEntry>> {
        self.fetch().await
    }

    /// Variant of [`execute`](QueryBuilder::execute) that pretty-prints the
    /// response to stdout instead of returning it.
    ///
    /// # Errors
    /// Same as [`execute`](QueryBuilder::execute).
    pub async fn execute_and_print(&mut self) -> Result<()> {
        let response = self.execute().await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&mut self) -> Result<T> {
        let url = self.build_url()?;

        let response = reqwest::get(&url).await?;
        if !response.status().is_success() {
            return Err(DatamuseError::Api(response.status()));
        }
        let parsed = response.json::<T>().await?;

        self.reset();
        Ok(parsed)
    }

    /// Return the builder to its initial state, as if freshly constructed.
    pub fn reset(&mut self) {
        self.generic.clear();
        self.pattern = PatternFragment::Empty;
        self.meta.clear();
        self.param_count = 0;
        self.first_fragment = None;
        self.starts_with_active = false;
        self.ends_with_active = false;
        self.spelled_like_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.test/words";

    fn builder() -> QueryBuilder {
        QueryBuilder::with_base_url(BASE)
    }

    #[test]
    fn test_generic_tokens_appear_in_call_order() {
        let mut b = builder();
        b.similar_meaning("ocean").topic("sea").num_results(10).unwrap();

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?ml=ocean&topic=sea&max=10"));
    }

    #[test]
    fn test_repeated_generic_setter_appends_duplicate_tokens() {
        let mut b = builder();
        b.synonyms("happy").synonyms("glad");

        assert_eq!(
            b.build_url().unwrap(),
            format!("{BASE}?rel_syn=happy&rel_syn=glad")
        );
    }

    #[test]
    fn test_relation_setters_use_their_api_keys() {
        let mut b = builder();
        b.adjectives("sea")
            .words_modified_by_adjective("blue")
            .antonyms("hot")
            .homophones("there")
            .hyponyms("boat")
            .hypernyms("vessel")
            .triggers("tide");

        assert_eq!(
            b.build_url().unwrap(),
            format!(
                "{BASE}?rel_jjb=sea&rel_jja=blue&rel_ant=hot&rel_hom=there\
                 &rel_gen=boat&rel_spc=vessel&rel_trg=tide"
            )
        );
    }

    #[test]
    fn test_num_results_defaults_to_one_hundred() {
        let mut b = builder();
        b.num_results(None).unwrap();

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?max=100"));
    }

    #[test]
    fn test_num_results_over_cap_fails_without_side_effects() {
        let mut b = builder();
        let err = b.num_results(1500).unwrap_err();

        assert!(matches!(err, DatamuseError::Validation(_)));
        // The failing call set nothing, not even the first-fragment tag.
        assert!(matches!(b.build_url(), Err(DatamuseError::Usage(_))));
    }

    #[test]
    fn test_definitions_twice_yields_one_flag() {
        let mut b = builder();
        b.definitions().definitions();

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?md=d"));
    }

    #[test]
    fn test_all_metadata_then_individual_is_noop() {
        let mut b = builder();
        b.all_metadata().definitions().pronunciation();

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?md=dpsr"));
    }

    #[test]
    fn test_individual_flags_keep_insertion_order() {
        let mut b = builder();
        b.syllable_count().definitions();

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?md=sd"));
    }

    #[test]
    fn test_spelled_like_conflicts_with_affix_setters() {
        let mut b = builder();
        b.starts_with("re").unwrap();
        let err = b.spelled_like("r??d").unwrap_err();

        assert!(matches!(err, DatamuseError::Usage(_)));
        // The failing call left the pattern untouched.
        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=re*"));
    }

    #[test]
    fn test_affix_setters_conflict_with_spelled_like() {
        let mut b = builder();
        b.spelled_like("r??d").unwrap();

        assert!(matches!(b.starts_with("re"), Err(DatamuseError::Usage(_))));
        assert!(matches!(b.ends_with("ing"), Err(DatamuseError::Usage(_))));
        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=r??d"));
    }

    #[test]
    fn test_affix_merge_is_order_independent() {
        let mut b = builder();
        b.starts_with("re").unwrap().ends_with("ing").unwrap();
        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=re*ing"));

        let mut b = builder();
        b.ends_with("ing").unwrap().starts_with("re").unwrap();
        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=re*ing"));
    }

    #[test]
    fn test_start_end_between_builds_gap_pattern() {
        let mut b = builder();
        b.start_end_between("c", "t", 3);

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=c???t"));
    }

    #[test]
    fn test_start_end_between_overwrites_prior_pattern() {
        let mut b = builder();
        b.starts_with("ca").unwrap();
        b.start_end_between("c", "t", 3);

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=c???t"));
    }

    #[test]
    fn test_generic_fragment_leads_when_first() {
        let mut b = builder();
        b.synonyms("happy").definitions();

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?rel_syn=happy&md=d"));
    }

    #[test]
    fn test_pattern_fragment_leads_when_first() {
        let mut b = builder();
        b.starts_with("ca").unwrap();
        b.synonyms("happy");

        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=ca*&rel_syn=happy"));
    }

    #[test]
    fn test_metadata_fragment_leads_when_first() {
        let mut b = builder();
        b.definitions().synonyms("happy").starts_with("ca").unwrap();

        assert_eq!(
            b.build_url().unwrap(),
            format!("{BASE}?md=d&rel_syn=happy&sp=ca*")
        );
    }

    #[test]
    fn test_build_url_without_parameters_is_a_usage_error() {
        let b = builder();
        assert!(matches!(b.build_url(), Err(DatamuseError::Usage(_))));
    }

    #[test]
    fn test_reset_clears_all_session_state() {
        let mut b = builder();
        b.spelled_like("r??d").unwrap();
        b.definitions().topic("sea");
        b.reset();

        assert!(matches!(b.build_url(), Err(DatamuseError::Usage(_))));
        // The exclusivity flag went away with the rest of the state.
        b.starts_with("re").unwrap();
        assert_eq!(b.build_url().unwrap(), format!("{BASE}?sp=re*"));
    }

    #[tokio::test]
    async fn test_execute_without_parameters_is_a_usage_error() {
        let mut b = builder();
        assert!(matches!(b.execute().await, Err(DatamuseError::Usage(_))));
    }

    #[tokio::test]
    async fn test_execute_returns_body_and_resets() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/words")
            .match_query(mockito::Matcher::UrlEncoded(
                "rel_syn".into(),
                "happy".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"word": "glad", "score": 1001}]"#)
            .create_async()
            .await;

        let mut b = QueryBuilder::with_base_url(&format!("{}/words", server.url()));
        b.synonyms("happy");

        let response = b.execute().await.unwrap();
        mock.assert_async().await;
        assert_eq!(response[0]["word"], "glad");

        // The builder behaves like a fresh instance afterwards.
        assert!(matches!(b.build_url(), Err(DatamuseError::Usage(_))));
        b.spelled_like("r??d").unwrap();
        assert!(b.build_url().unwrap().ends_with("?sp=r??d"));
    }

    #[tokio::test]
    async fn test_execute_words_decodes_typed_rows() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/words")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"word": "cheerful", "score": 927, "numSyllables": 2}]"#)
            .create_async()
            .await;

        let mut b = QueryBuilder::with_base_url(&format!("{}/words", server.url()));
        b.synonyms("happy").syllable_count();

        let words = b.execute_words().await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "cheerful");
        assert_eq!(words[0].num_syllables, Some(2));
    }

    #[tokio::test]
    async fn test_execute_failure_preserves_state_for_retry() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/words")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let mut b = QueryBuilder::with_base_url(&format!("{}/words", server.url()));
        b.synonyms("happy").definitions();
        let url_before = b.build_url().unwrap();

        let err = b.execute().await.unwrap_err();
        assert!(matches!(err, DatamuseError::Api(status) if status.as_u16() == 500));

        // The accumulated query survives the failure, ready for a retry.
        assert_eq!(b.build_url().unwrap(), url_before);
    }
}
