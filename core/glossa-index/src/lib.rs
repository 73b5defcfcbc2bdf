#![no_std]

#[cfg_attr(test, macro_use)]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use glossa_protocol::{EntityRef, IndexedEntry, Lang};

/// First-lemma lookup over the glossary entries of one language.
///
/// Entries are held once in `entries`; each bucket lists slots into that
/// array, one slot per variant starting with the bucket's lemma. An entry
/// with two variants sharing a first lemma therefore occupies two slots of the
/// same bucket. The index is never updated in place: a changed glossary or
/// language means building a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedIndex<R> {
    lang: Lang,
    entries: Vec<IndexedEntry<R>>,
    buckets: BTreeMap<String, Vec<usize>>,
}

/// Builds the grouped index for `lang` from the full, all-language entry list.
pub fn build_grouped_index<R: EntityRef>(entries: &[IndexedEntry<R>], lang: &Lang) -> GroupedIndex<R> {
    let entries: Vec<IndexedEntry<R>> = entries.iter().filter(|e| &e.lang == lang).cloned().collect();

    let buckets = entries
        .iter()
        .enumerate()
        .flat_map(|(slot, entry)| {
            entry
                .lemmas
                .iter()
                // Zero-length variants are an upstream data error; they simply never match
                .filter_map(move |variant| variant.first().map(|first| (first.to_lowercase(), slot)))
        })
        .fold(BTreeMap::new(), |mut acc: BTreeMap<String, Vec<usize>>, (key, slot)| {
            acc.entry(key).or_default().push(slot);
            acc
        });

    GroupedIndex {
        lang: lang.clone(),
        entries,
        buckets,
    }
}

impl<R> GroupedIndex<R> {
    /// An index with no buckets, e.g. before the glossary has loaded.
    pub fn empty(lang: Lang) -> Self {
        Self {
            lang,
            entries: Vec::new(),
            buckets: BTreeMap::new(),
        }
    }

    pub fn lang(&self) -> &Lang {
        &self.lang
    }

    /// Entries whose variants start with `key`, once per such variant.
    /// `key` must already be lowercased.
    pub fn candidates<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a IndexedEntry<R>> + 'a {
        self.buckets
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.entries[slot])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Number of distinct first lemmas.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of retained entries (after the language filter).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Total bucket slots, counting duplicates.
    pub fn slot_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use glossa_protocol::{TermIndex, TermRef};
    use proptest::prelude::*;

    fn entry(id: &str, lang: &str, variants: &[&[&str]]) -> TermIndex {
        TermIndex::new(
            TermRef::new(id),
            Lang::new(lang),
            variants
                .iter()
                .map(|v| v.iter().map(|l| l.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_empty_input_yields_empty_index() {
        let index = build_grouped_index::<TermRef>(&[], &Lang::new("de"));
        assert!(index.is_empty());
        assert_eq!(index.entry_count(), 0);
        assert_eq!(index.lang(), &Lang::new("de"));
    }

    #[test]
    fn test_groups_by_lowercased_first_lemma() {
        let entries = vec![
            entry("t1", "de", &[&["Katze"]]),
            entry("t2", "de", &[&["katze", "klo"]]),
            entry("t3", "de", &[&["hund"]]),
        ];
        let index = build_grouped_index(&entries, &Lang::new("de"));

        assert_eq!(index.bucket_count(), 2);
        let ids: Vec<&str> = index.candidates("katze").map(|e| e.reference.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert!(!index.contains_key("Katze"));
        assert_eq!(index.candidates("maus").count(), 0);
    }

    #[test]
    fn test_filters_other_languages() {
        let entries = vec![entry("t1", "de", &[&["katze"]]), entry("t2", "en", &[&["cat"]])];
        let index = build_grouped_index(&entries, &Lang::new("en"));

        assert_eq!(index.entry_count(), 1);
        let keys: Vec<&str> = index.keys().collect();
        assert_eq!(keys, vec!["cat"]);
    }

    #[test]
    fn test_one_slot_per_variant_start() {
        // Both variants start with "alt": two slots in one bucket, one entry
        let entries = vec![entry("t1", "de", &[&["alt", "stadt"], &["alt"], &["alte"]])];
        let index = build_grouped_index(&entries, &Lang::new("de"));

        assert_eq!(index.entry_count(), 1);
        assert_eq!(index.slot_count(), 3);
        assert_eq!(index.candidates("alt").count(), 2);
        assert_eq!(index.candidates("alte").count(), 1);
    }

    #[test]
    fn test_empty_variant_is_skipped() {
        let entries = vec![entry("t1", "de", &[&[], &["katze"]])];
        let index = build_grouped_index(&entries, &Lang::new("de"));
        assert_eq!(index.slot_count(), 1);
    }

    fn arb_entries() -> impl Strategy<Value = Vec<TermIndex>> {
        let variant = prop::collection::vec("[a-cA-C]{1,3}", 1..4);
        let entry = ("[a-z]{1,4}", prop::sample::select(vec!["de", "en", "fr"]), prop::collection::vec(variant, 1..3))
            .prop_map(|(id, lang, lemmas)| TermIndex::new(TermRef::new(id), Lang::new(lang), lemmas));
        prop::collection::vec(entry, 0..20)
    }

    proptest! {
        #[test]
        fn test_buckets_only_hold_requested_language(entries in arb_entries()) {
            let lang = Lang::new("de");
            let index = build_grouped_index(&entries, &lang);
            let keys: Vec<String> = index.keys().map(|k| k.to_string()).collect();
            for key in keys {
                for candidate in index.candidates(&key) {
                    prop_assert_eq!(&candidate.lang, &lang);
                    prop_assert!(candidate.lemmas.iter().any(|v| v[0].to_lowercase() == key));
                }
            }
        }

        #[test]
        fn test_rebuild_is_deterministic(entries in arb_entries()) {
            let lang = Lang::new("en");
            prop_assert_eq!(build_grouped_index(&entries, &lang), build_grouped_index(&entries, &lang));
        }
    }
}
