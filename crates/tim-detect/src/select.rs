//! Candidate ranking: merges matches from every detector and picks the one
//! to annotate.

use std::cmp::Ordering;

use tim_core::{currency, PriceMatch};

/// Candidates scoring below this are discarded before ranking.
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Ranked candidates for one element. `ranked` is kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ranked: Vec<PriceMatch>,
}

impl Selection {
    /// The top-ranked candidate, if any survived filtering.
    #[must_use]
    pub fn best(&self) -> Option<&PriceMatch> {
        self.ranked.first()
    }

    #[must_use]
    pub fn ranked(&self) -> &[PriceMatch] {
        &self.ranked
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    #[must_use]
    pub fn into_best(self) -> Option<PriceMatch> {
        self.ranked.into_iter().next()
    }
}

/// Drops weak candidates, ranks the rest by confidence then source priority,
/// and finally keeps only those whose currency can denote `target_currency`.
///
/// The sort is stable, so candidates that tie on both keys keep their input
/// order.
#[must_use]
pub fn select_candidates(
    candidates: impl IntoIterator<Item = PriceMatch>,
    target_currency: &str,
) -> Selection {
    let mut ranked: Vec<PriceMatch> = candidates
        .into_iter()
        .filter(|m| m.confidence() >= MIN_CONFIDENCE)
        .collect();

    ranked.sort_by(rank);
    ranked.retain(|m| currency::matches_target(m.currency(), target_currency));

    tracing::debug!(
        target_currency,
        kept = ranked.len(),
        "ranked price candidates"
    );
    Selection { ranked }
}

/// Merges several candidate batches, e.g. the pattern library's and the DOM
/// analyzer's, then selects as [`select_candidates`] does. Earlier batches
/// win exact ties.
#[must_use]
pub fn merge_and_select<I>(batches: I, target_currency: &str) -> Selection
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = PriceMatch>,
{
    select_candidates(batches.into_iter().flatten(), target_currency)
}

fn rank(a: &PriceMatch, b: &PriceMatch) -> Ordering {
    b.confidence()
        .total_cmp(&a.confidence())
        .then_with(|| b.source().priority().cmp(&a.source().priority()))
}
