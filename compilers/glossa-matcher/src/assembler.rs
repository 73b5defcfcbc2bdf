use glossa_index::GroupedIndex;
use glossa_protocol::{Match, MatchGroup, Span, TermRef, TextToken, TranslationRef};

use crate::candidate::find_matches_at;

/// Scans `tokens` left to right and collapses overlapping term and
/// translation matches into display groups.
///
/// A group that is still open can absorb the next candidate; it is finalized
/// as soon as a candidate starts strictly after its end. Only the open group
/// is ever compared, so the scan is a single pass. Groups come out sorted by
/// strictly increasing start offset.
pub fn assemble_match_groups(
    tokens: &[TextToken],
    term_index: &GroupedIndex<TermRef>,
    translation_index: &GroupedIndex<TranslationRef>,
) -> Vec<MatchGroup> {
    let (mut groups, open) = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, token)| {
            candidate_group(
                token,
                find_matches_at(token, i, tokens, term_index),
                find_matches_at(token, i, tokens, translation_index),
            )
        })
        .fold(
            (Vec::new(), None::<MatchGroup>),
            |(mut groups, open), candidate| match open {
                // Touching counts as overlapping
                Some(prev) if prev.pos.end >= candidate.pos.start => (groups, Some(merge(prev, candidate))),
                Some(prev) => {
                    groups.push(prev);
                    (groups, Some(candidate))
                }
                None => (groups, Some(candidate)),
            },
        );

    groups.extend(open);

    tracing::trace!(tokens = tokens.len(), groups = groups.len(), "assembled match groups");
    groups
}

/// The group formed by all matches starting at `token`, widened to the
/// longest of them. `None` when nothing matched here.
fn candidate_group(
    token: &TextToken,
    term_matches: Vec<Match<TermRef>>,
    translation_matches: Vec<Match<TranslationRef>>,
) -> Option<MatchGroup> {
    let end = term_matches
        .iter()
        .map(|m| m.pos.end)
        .chain(translation_matches.iter().map(|m| m.pos.end))
        .max()?;

    Some(MatchGroup {
        pos: Span::new(token.span.start, end),
        term_matches,
        translation_matches,
    })
}

fn merge(prev: MatchGroup, next: MatchGroup) -> MatchGroup {
    let MatchGroup {
        pos,
        mut term_matches,
        mut translation_matches,
    } = prev;

    term_matches.extend(next.term_matches);
    translation_matches.extend(next.translation_matches);

    MatchGroup {
        pos: Span::new(pos.start, pos.end.max(next.pos.end)),
        term_matches,
        translation_matches,
    }
}
