use glossa_index::{build_grouped_index, GroupedIndex};
use glossa_protocol::{
    GlossarySnapshot, Lang, MatchGroup, TermIndex, TermRef, TextToken, TranslationIndex, TranslationRef,
};

use crate::assembler::assemble_match_groups;

/// Identifies one in-flight text analysis. Only the most recently issued
/// ticket may deliver results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u32);

impl RequestTicket {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// For tickets that round-tripped through a foreign boundary as plain ids.
impl From<u32> for RequestTicket {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub term_rebuilds: u64,
    pub translation_rebuilds: u64,
    pub discarded: u64,
}

/// Memoized match pipeline for one consumer (a page, an editor pane).
///
/// Glossary updates and language switches rebuild the affected grouped index
/// from scratch, and only when the new input actually differs. Text analyses
/// are ticketed so a superseded tokenizer response is dropped instead of
/// being matched.
#[derive(Debug)]
pub struct MatchSession {
    lang: Lang,
    terms: Vec<TermIndex>,
    translations: Vec<TranslationIndex>,
    term_index: GroupedIndex<TermRef>,
    translation_index: GroupedIndex<TranslationRef>,
    latest: u32,
    stats: SessionStats,
}

impl MatchSession {
    pub fn new(lang: Lang) -> Self {
        Self {
            term_index: GroupedIndex::empty(lang.clone()),
            translation_index: GroupedIndex::empty(lang.clone()),
            lang,
            terms: Vec::new(),
            translations: Vec::new(),
            latest: 0,
            stats: SessionStats::default(),
        }
    }

    pub fn with_glossary(lang: Lang, terms: Vec<TermIndex>, translations: Vec<TranslationIndex>) -> Self {
        let mut session = Self::new(lang);
        session.set_terms(terms);
        session.set_translations(translations);
        session
    }

    pub fn from_snapshot(lang: Lang, snapshot: &GlossarySnapshot) -> Self {
        Self::with_glossary(lang, snapshot.term_entries(), snapshot.translation_entries())
    }

    pub fn lang(&self) -> &Lang {
        &self.lang
    }

    pub fn term_index(&self) -> &GroupedIndex<TermRef> {
        &self.term_index
    }

    pub fn translation_index(&self) -> &GroupedIndex<TranslationRef> {
        &self.translation_index
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Switches the language filter. Returns whether the indexes were rebuilt.
    pub fn set_language(&mut self, lang: Lang) -> bool {
        if lang == self.lang {
            return false;
        }
        self.lang = lang;
        self.rebuild_terms();
        self.rebuild_translations();
        true
    }

    /// Replaces the term entries. Returns whether the term index was rebuilt.
    pub fn set_terms(&mut self, terms: Vec<TermIndex>) -> bool {
        if terms == self.terms {
            return false;
        }
        self.terms = terms;
        self.rebuild_terms();
        true
    }

    /// Replaces the translation entries. Returns whether the translation
    /// index was rebuilt.
    pub fn set_translations(&mut self, translations: Vec<TranslationIndex>) -> bool {
        if translations == self.translations {
            return false;
        }
        self.translations = translations;
        self.rebuild_translations();
        true
    }

    pub fn load_snapshot(&mut self, snapshot: &GlossarySnapshot) {
        self.set_terms(snapshot.term_entries());
        self.set_translations(snapshot.translation_entries());
    }

    /// Runs the pipeline on `tokens` against the current indexes.
    pub fn match_tokens(&self, tokens: &[TextToken]) -> Vec<MatchGroup> {
        assemble_match_groups(tokens, &self.term_index, &self.translation_index)
    }

    /// Starts a new text analysis, superseding every earlier ticket.
    ///
    /// Ids wrap around; only equality with the latest id matters.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.latest = self.latest.wrapping_add(1);
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Delivers the tokens for `ticket`. Superseded tickets yield `None` and
    /// their tokens are never matched.
    pub fn complete(&mut self, ticket: RequestTicket, tokens: &[TextToken]) -> Option<Vec<MatchGroup>> {
        if !self.is_current(ticket) {
            self.stats.discarded += 1;
            tracing::debug!(ticket = ticket.0, latest = self.latest, "discarding stale analysis");
            return None;
        }
        Some(self.match_tokens(tokens))
    }

    fn rebuild_terms(&mut self) {
        self.term_index = build_grouped_index(&self.terms, &self.lang);
        self.stats.term_rebuilds += 1;
        tracing::debug!(
            lang = %self.lang,
            entries = self.term_index.entry_count(),
            buckets = self.term_index.bucket_count(),
            "rebuilt term index"
        );
    }

    fn rebuild_translations(&mut self) {
        self.translation_index = build_grouped_index(&self.translations, &self.lang);
        self.stats.translation_rebuilds += 1;
        tracing::debug!(
            lang = %self.lang,
            entries = self.translation_index.entry_count(),
            buckets = self.translation_index.bucket_count(),
            "rebuilt translation index"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_protocol::StoredEntry;

    fn term(id: &str, lang: &str, lemmas: &[&str]) -> TermIndex {
        TermIndex::new(
            TermRef::new(id),
            Lang::new(lang),
            vec![lemmas.iter().map(|l| l.to_string()).collect()],
        )
    }

    fn text() -> Vec<TextToken> {
        vec![TextToken::new("katze", 0, 5), TextToken::new("cat", 6, 9)]
    }

    #[test]
    fn test_unchanged_inputs_do_not_rebuild() {
        let terms = vec![term("t1", "de", &["katze"])];
        let mut session = MatchSession::with_glossary(Lang::new("de"), terms.clone(), vec![]);
        assert_eq!(session.stats().term_rebuilds, 1);
        // Empty translations equal the initial state
        assert_eq!(session.stats().translation_rebuilds, 0);

        assert!(!session.set_terms(terms));
        assert!(!session.set_language(Lang::new("de")));
        assert_eq!(session.stats().term_rebuilds, 1);
    }

    #[test]
    fn test_language_switch_rebuilds_both() {
        let terms = vec![term("t1", "de", &["katze"]), term("t2", "en", &["cat"])];
        let mut session = MatchSession::with_glossary(Lang::new("de"), terms, vec![]);

        let groups = session.match_tokens(&text());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].term_matches[0].reference, TermRef::new("t1"));

        assert!(session.set_language(Lang::new("en")));
        assert_eq!(session.stats().term_rebuilds, 2);
        assert_eq!(session.stats().translation_rebuilds, 1);

        let groups = session.match_tokens(&text());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].term_matches[0].reference, TermRef::new("t2"));
    }

    #[test]
    fn test_superseded_ticket_is_discarded() {
        let mut session = MatchSession::with_glossary(Lang::new("de"), vec![term("t1", "de", &["katze"])], vec![]);

        let first = session.begin_request();
        let second = session.begin_request();
        assert!(!session.is_current(first));

        // The slow response for the old text arrives last-but-one
        assert_eq!(session.complete(first, &text()), None);
        assert_eq!(session.stats().discarded, 1);

        let groups = session.complete(second, &text()).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(second.id() > first.id());
    }

    #[test]
    fn test_ticket_ids_wrap_around() {
        let mut session = MatchSession::with_glossary(Lang::new("de"), vec![term("t1", "de", &["katze"])], vec![]);
        session.latest = u32::MAX - 1;

        let last = session.begin_request();
        assert_eq!(last.id(), u32::MAX);
        let wrapped = session.begin_request();
        assert_eq!(wrapped.id(), 0);

        // Ids handed back as plain numbers still resolve after the wrap
        assert_eq!(session.complete(RequestTicket::from(last.id()), &text()), None);
        assert_eq!(session.complete(RequestTicket::from(wrapped.id()), &text()).map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_glossary_update_between_ticket_and_completion() {
        let mut session = MatchSession::new(Lang::new("de"));
        let ticket = session.begin_request();

        // Live subscription delivers the glossary while the tokenizer is busy
        session.set_terms(vec![term("t1", "de", &["katze"])]);

        let groups = session.complete(ticket, &text()).unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_from_snapshot() {
        let snapshot = GlossarySnapshot {
            version: 1,
            terms: vec![],
            translations: vec![StoredEntry {
                id: "tr1".to_string(),
                lang: "en".to_string(),
                text: "cat".to_string(),
                lemmas: vec![vec!["cat".to_string()]],
            }],
        };
        let session = MatchSession::from_snapshot(Lang::new("en"), &snapshot);

        let groups = session.match_tokens(&text());
        assert_eq!(groups.len(), 1);
        assert!(groups[0].term_matches.is_empty());
        assert_eq!(groups[0].translation_matches[0].reference, TranslationRef::new("tr1"));
    }

    #[test]
    fn test_independent_sessions_across_threads() {
        let de = MatchSession::with_glossary(Lang::new("de"), vec![term("t1", "de", &["katze"])], vec![]);
        let en = MatchSession::with_glossary(Lang::new("en"), vec![term("t2", "en", &["cat"])], vec![]);
        let tokens = text();

        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| de.match_tokens(&tokens));
            let b = s.spawn(|| en.match_tokens(&tokens));
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(a[0].pos, glossa_protocol::Span::new(0, 5));
        assert_eq!(b[0].pos, glossa_protocol::Span::new(6, 9));
    }
}
