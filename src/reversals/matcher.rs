//! Finds postings that are reversed by the posting they link to.

use std::collections::HashMap;

use log::{info, warn};

use crate::posting::Posting;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReversalPair {
    pub origin_id: String,
    pub linked_id: String,
}

/// Whether `linked` cancels `posting`: same amount, posting type and
/// effective date.
pub fn is_reversal(posting: &Posting, linked: &Posting) -> bool {
    posting.amount == linked.amount
        && posting.posting_type == linked.posting_type
        && posting.effective_date == linked.effective_date
}

/// Returns a pair for every posting whose linked posting reverses it, in
/// posting order. Pairs are not deduplicated, so two postings linking to the
/// same target both produce a pair.
pub fn find_reversal_pairs(postings: &[Posting]) -> Vec<ReversalPair> {
    // First posting wins when ids repeat.
    let mut by_id: HashMap<&str, &Posting> = HashMap::with_capacity(postings.len());
    for posting in postings {
        by_id.entry(posting.posting_id.as_str()).or_insert(posting);
    }

    let pairs: Vec<ReversalPair> = postings
        .iter()
        .filter_map(|posting| {
            let linked_id = posting.linked_id.as_deref()?;
            let linked = match by_id.get(linked_id) {
                Some(linked) => linked,
                None => {
                    warn!(
                        "No posting with id {} (linked from posting {}).",
                        linked_id, posting.posting_id
                    );
                    return None;
                }
            };
            is_reversal(posting, linked).then(|| ReversalPair {
                origin_id: posting.posting_id.clone(),
                linked_id: linked.posting_id.clone(),
            })
        })
        .collect();

    info!(
        "Identified {} reversal pairs among {} postings.",
        pairs.len(),
        postings.len()
    );
    pairs
}

/// Posting ids of all reversal pairs, flattened as `origin, linked, ...`.
pub fn find_reversals(postings: &[Posting]) -> Vec<String> {
    find_reversal_pairs(postings)
        .into_iter()
        .flat_map(|pair| [pair.origin_id, pair.linked_id])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::PostingBuilder;

    fn pair_ab() -> (PostingBuilder, PostingBuilder) {
        (
            PostingBuilder::new("1")
                .linked("2")
                .amount(100)
                .posting_type("X")
                .date(2024, 1, 1),
            PostingBuilder::new("2")
                .amount(100)
                .posting_type("X")
                .date(2024, 1, 1),
        )
    }

    #[test]
    fn matching_pair() {
        let (a, b) = pair_ab();
        assert_eq!(vec!["1", "2"], find_reversals(&[a.build(), b.build()]));
    }

    #[test]
    fn amount_mismatch() {
        let (a, b) = pair_ab();
        assert!(find_reversals(&[a.build(), b.amount(101).build()]).is_empty());
    }

    #[test]
    fn type_or_date_mismatch() {
        let (a, b) = pair_ab();
        assert!(find_reversals(&[a.build(), b.posting_type("Y").build()]).is_empty());
        let (a, b) = pair_ab();
        assert!(find_reversals(&[a.build(), b.date(2024, 1, 2).build()]).is_empty());
    }

    #[test]
    fn missing_reference_is_skipped() {
        let postings = vec![
            PostingBuilder::new("1").linked("404").build(),
            PostingBuilder::new("2").build(),
        ];
        assert!(find_reversals(&postings).is_empty());
    }

    #[test]
    fn both_directions_and_duplicates_kept() {
        let postings = vec![
            PostingBuilder::new("1").linked("2").build(),
            PostingBuilder::new("2").linked("1").build(),
            PostingBuilder::new("3").linked("2").build(),
        ];
        assert_eq!(
            vec![
                ReversalPair {
                    origin_id: "1".to_string(),
                    linked_id: "2".to_string()
                },
                ReversalPair {
                    origin_id: "2".to_string(),
                    linked_id: "1".to_string()
                },
                ReversalPair {
                    origin_id: "3".to_string(),
                    linked_id: "2".to_string()
                },
            ],
            find_reversal_pairs(&postings)
        );
    }

    #[test]
    fn first_posting_wins_for_repeated_ids() {
        let postings = vec![
            PostingBuilder::new("1").linked("2").amount(5).build(),
            PostingBuilder::new("2").amount(5).build(),
            PostingBuilder::new("2").amount(6).build(),
        ];
        assert_eq!(vec!["1", "2"], find_reversals(&postings));

        let postings = vec![
            PostingBuilder::new("1").linked("2").amount(6).build(),
            PostingBuilder::new("2").amount(5).build(),
            PostingBuilder::new("2").amount(6).build(),
        ];
        assert!(find_reversals(&postings).is_empty());
    }
}
