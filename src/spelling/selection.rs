//! Progress-weighted practice selection
//!
//! Most of a session comes from items still being learned (score below the
//! mastery threshold), the rest from mastered items as review. Within each
//! pool the lowest scores go first, then the items seen longest ago.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::progress::ProgressBook;
use crate::catalog::CatalogItem;

/// Share of a session drawn from unmastered items, in tenths
const LEARNING_SHARE_TENTHS: usize = 7;

/// Uniform in-place permutation
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Pick `count` unique items for a session, shuffled.
///
/// Returns fewer than `count` only when the catalog has fewer unique items.
/// Duplicate ids in the catalog are ignored after their first occurrence.
pub fn select_session<R: Rng>(
    items: &[CatalogItem],
    book: &ProgressBook,
    count: usize,
    mastery_threshold: i32,
    rng: &mut R,
) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<&CatalogItem> = items.iter().filter(|item| seen.insert(item.id.as_str())).collect();

    ranked.sort_by(|a, b| {
        book.score(&a.id)
            .cmp(&book.score(&b.id))
            .then_with(|| book.last_seen(&a.id).cmp(&book.last_seen(&b.id)))
            .then_with(|| a.id.cmp(&b.id))
    });

    let count = count.min(ranked.len());
    let (learning, mastered): (Vec<&CatalogItem>, Vec<&CatalogItem>) = ranked
        .into_iter()
        .partition(|item| book.score(&item.id) < mastery_threshold);

    // ceil(70%) from the learning pool, the rest from the mastered pool
    let want_learning = (count * LEARNING_SHARE_TENTHS).div_ceil(10);
    let take_learning = want_learning.min(learning.len());
    let take_mastered = (count - take_learning).min(mastered.len());

    let mut picked: Vec<CatalogItem> = Vec::with_capacity(count);
    picked.extend(learning[..take_learning].iter().map(|&item| item.clone()));
    picked.extend(mastered[..take_mastered].iter().map(|&item| item.clone()));

    // Shortfall: fill from whatever is left, learning pool first
    let leftovers = learning[take_learning..].iter().chain(mastered[take_mastered..].iter());
    for &item in leftovers.take(count - picked.len()) {
        picked.push(item.clone());
    }

    log::debug!(
        "Session: {} items ({} learning, {} mastered available)",
        picked.len(),
        learning.len(),
        mastered.len()
    );

    shuffle(&mut picked, rng);
    picked
}
