use glossa_index::GroupedIndex;
use glossa_protocol::{EntityRef, Match, Span, TextToken};

/// Every alignment of a glossary variant starting at `token_index`.
///
/// `token` must be `tokens[token_index]`. Each matching variant yields its own
/// `Match`, so an entry can contribute several; duplicate bucket slots yield
/// duplicate matches as well.
pub fn find_matches_at<R: EntityRef>(
    token: &TextToken,
    token_index: usize,
    tokens: &[TextToken],
    index: &GroupedIndex<R>,
) -> Vec<Match<R>> {
    let key = token.lemma.to_lowercase();

    index
        .candidates(&key)
        .flat_map(|entry| {
            entry.lemmas.iter().filter_map(move |variant| {
                let end = match_variant(variant, token_index, tokens)?;
                Some(Match::new(Span::new(token.span.start, end), entry.reference.clone()))
            })
        })
        .collect()
}

/// End offset of the last aligned token, if the whole variant lines up.
fn match_variant(variant: &[String], start: usize, tokens: &[TextToken]) -> Option<usize> {
    let last = variant.len().checked_sub(1)?;
    // Running past the end of the text is a plain non-match
    let window = tokens.get(start..=start.checked_add(last)?)?;

    let aligned = window
        .iter()
        .zip(variant)
        .all(|(token, lemma)| lemma_eq(&token.lemma, lemma));

    aligned.then(|| window[last].span.end)
}

fn lemma_eq(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_index::build_grouped_index;
    use glossa_protocol::{Lang, TermIndex, TermRef};

    fn tokens(lemmas: &[&str]) -> Vec<TextToken> {
        // One space between words
        let mut offset = 0;
        lemmas
            .iter()
            .map(|lemma| {
                let len = lemma.chars().count();
                let token = TextToken::new(*lemma, offset, offset + len);
                offset += len + 1;
                token
            })
            .collect()
    }

    fn index(entries: &[(&str, &[&[&str]])]) -> GroupedIndex<TermRef> {
        let entries: Vec<TermIndex> = entries
            .iter()
            .map(|(id, variants)| {
                TermIndex::new(
                    TermRef::new(*id),
                    Lang::new("de"),
                    variants
                        .iter()
                        .map(|v| v.iter().map(|l| l.to_string()).collect())
                        .collect(),
                )
            })
            .collect();
        build_grouped_index(&entries, &Lang::new("de"))
    }

    #[test]
    fn test_absent_bucket() {
        let text = tokens(&["hund"]);
        let idx = index(&[("t1", &[&["katze"]])]);
        assert!(find_matches_at(&text[0], 0, &text, &idx).is_empty());
    }

    #[test]
    fn test_multi_word_span() {
        let text = tokens(&["die", "alte", "stadt"]);
        let idx = index(&[("t1", &[&["alte", "stadt"]])]);

        let matches = find_matches_at(&text[1], 1, &text, &idx);
        assert_eq!(matches, vec![Match::new(Span::new(4, 14), TermRef::new("t1"))]);
    }

    #[test]
    fn test_variant_past_end_never_matches() {
        let text = tokens(&["alte", "stadt"]);
        let idx = index(&[("t1", &[&["stadt", "mauer", "turm"]])]);
        assert!(find_matches_at(&text[1], 1, &text, &idx).is_empty());
    }

    #[test]
    fn test_partial_alignment_is_rejected() {
        let text = tokens(&["alte", "mauer"]);
        let idx = index(&[("t1", &[&["alte", "stadt"]])]);
        assert!(find_matches_at(&text[0], 0, &text, &idx).is_empty());
    }

    #[test]
    fn test_case_insensitive_on_both_sides() {
        let text = tokens(&["Alte", "STADT"]);
        let idx = index(&[("t1", &[&["aLTe", "Stadt"]])]);
        assert_eq!(find_matches_at(&text[0], 0, &text, &idx).len(), 1);
    }

    #[test]
    fn test_every_matching_variant_counts() {
        // Two variants starting with "alt": two slots, each checks both variants
        let text = tokens(&["alt", "stadt"]);
        let idx = index(&[("t1", &[&["alt"], &["alt", "stadt"]])]);

        let matches = find_matches_at(&text[0], 0, &text, &idx);
        assert_eq!(matches.len(), 4);
        assert!(matches.iter().any(|m| m.pos == Span::new(0, 3)));
        assert!(matches.iter().any(|m| m.pos == Span::new(0, 9)));
    }
}
