//! Practice session: a shuffled list of words played one round at a time
//!
//! The session owns the progress book for its duration. Each finished round
//! is scored into the book; the caller persists the book after every
//! outcome.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::progress::ProgressBook;
use super::round::SpellingRound;
use super::selection::select_session;
use crate::catalog::{Catalog, CatalogItem};
use crate::settings::Settings;
use crate::sim::{Bounds, SimError};

/// Result of one finished word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub item_id: String,
    pub correct: bool,
    pub new_score: i32,
}

#[derive(Debug)]
pub struct SpellingSession {
    items: Vec<CatalogItem>,
    book: ProgressBook,
    settings: Settings,
    bounds: Bounds,
    rng: Pcg32,
    /// Index of the item the current round is for
    index: usize,
    round: Option<SpellingRound>,
    /// Current round already scored
    recorded: bool,
    results: Vec<RoundResult>,
}

impl SpellingSession {
    /// Select the session's words from the catalog.
    ///
    /// An empty catalog gives an empty session.
    pub fn start(catalog: &Catalog, book: ProgressBook, settings: Settings, bounds: Bounds, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let items = select_session(
            &catalog.cards,
            &book,
            settings.session_size,
            settings.mastery_threshold,
            &mut rng,
        );
        if items.is_empty() {
            log::warn!("No words available; session is empty");
        } else {
            log::info!("Session started with {} words", items.len());
        }

        Self {
            items,
            book,
            settings,
            bounds,
            rng,
            index: 0,
            round: None,
            recorded: false,
            results: Vec::new(),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn book(&self) -> &ProgressBook {
        &self.book
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn round(&self) -> Option<&SpellingRound> {
        self.round.as_ref()
    }

    pub fn round_mut(&mut self) -> Option<&mut SpellingRound> {
        self.round.as_mut()
    }

    pub fn current_item(&self) -> Option<&CatalogItem> {
        self.round.as_ref().and_then(|_| self.items.get(self.index))
    }

    /// No rounds left to play
    pub fn is_finished(&self) -> bool {
        self.round.is_none() && self.index >= self.items.len()
    }

    /// Start the round for the next word; `None` once the list is used up.
    ///
    /// Words that cannot be laid out (too long, or no letters) are skipped.
    pub fn next_round(&mut self) -> Option<&mut SpellingRound> {
        if self.round.is_some() {
            self.index += 1;
            self.round = None;
        }
        self.recorded = false;

        while let Some(item) = self.items.get(self.index) {
            let seed = self.rng.random();
            match SpellingRound::new(
                &item.word,
                self.bounds,
                self.settings.bubbles,
                self.settings.decoy_letters,
                seed,
            ) {
                Ok(round) => {
                    self.round = Some(round);
                    return self.round.as_mut();
                }
                Err(e @ (SimError::WorldFull(_) | SimError::EmptyWord)) => {
                    log::warn!("Skipping '{}': {}", item.word, e);
                    self.index += 1;
                }
                Err(e) => {
                    log::error!("Cannot start round for '{}': {}", item.word, e);
                    self.index += 1;
                }
            }
        }
        None
    }

    /// Score the current round if it is complete.
    ///
    /// Returns the result once per round; later calls return `None`.
    pub fn record_round(&mut self, now_ms: u64) -> Option<RoundResult> {
        if self.recorded {
            return None;
        }
        let correct = self.round.as_ref()?.outcome()?;
        let item_id = self.items.get(self.index)?.id.clone();
        self.recorded = true;

        let new_score = self.book.record_outcome(&item_id, correct, now_ms);
        let result = RoundResult {
            item_id,
            correct,
            new_score,
        };
        self.results.push(result.clone());
        Some(result)
    }

    /// End the session and hand back the updated progress
    pub fn into_book(self) -> ProgressBook {
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::spelling::round::TapOutcome;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"cards": [
                {"id": "cat", "word": "CAT"},
                {"id": "dog", "word": "DOG"},
                {"id": "sun", "word": "SUN"}
            ]}"#,
        )
        .unwrap()
    }

    fn play_perfectly(round: &mut SpellingRound) {
        let word: Vec<char> = round.word().chars().collect();
        for letter in word {
            let id = round
                .world
                .bodies()
                .iter()
                .find(|b| b.label == letter && b.is_free())
                .map(|b| b.id)
                .unwrap();
            assert!(matches!(round.tap(id), TapOutcome::Correct { .. }));
        }
        for _ in 0..300 {
            round.update(SIM_DT);
        }
    }

    #[test]
    fn test_empty_catalog_session() {
        let mut session = SpellingSession::start(
            &Catalog::new(),
            ProgressBook::new(),
            Settings::default(),
            Bounds::new(800.0, 600.0),
            1,
        );
        assert!(session.items().is_empty());
        assert!(session.next_round().is_none());
        assert!(session.is_finished());
        assert!(session.record_round(0).is_none());
    }

    #[test]
    fn test_full_session_updates_book() {
        let mut session = SpellingSession::start(
            &catalog(),
            ProgressBook::new(),
            Settings::default(),
            Bounds::new(800.0, 600.0),
            1,
        );
        assert_eq!(session.items().len(), 3);

        while let Some(round) = session.next_round() {
            play_perfectly(round);
            let result = session.record_round(1000).unwrap();
            assert!(result.correct);
            assert_eq!(result.new_score, 1);
            // Only once per round
            assert!(session.record_round(2000).is_none());
        }

        assert!(session.is_finished());
        let book = session.into_book();
        for id in ["cat", "dog", "sun"] {
            assert_eq!(book.score(id), 1);
            assert_eq!(book.last_seen(id), 1000);
        }
    }

    #[test]
    fn test_unfinished_round_not_recorded() {
        let mut session = SpellingSession::start(
            &catalog(),
            ProgressBook::new(),
            Settings::default(),
            Bounds::new(800.0, 600.0),
            1,
        );
        session.next_round();
        assert!(session.current_item().is_some());
        assert!(session.record_round(0).is_none());
        assert!(session.book().is_empty());
    }

    #[test]
    fn test_overlong_word_skipped() {
        let catalog = Catalog::from_json(
            r#"{"cards": [{"id": "long", "word": "SUPERCALIFRAGILISTIC"}, {"id": "ok", "word": "OK"}]}"#,
        )
        .unwrap();
        let mut session = SpellingSession::start(
            &catalog,
            ProgressBook::new(),
            Settings::default(),
            Bounds::new(800.0, 600.0),
            1,
        );
        let round = session.next_round().unwrap();
        assert_eq!(round.word(), "OK");
        assert!(session.next_round().is_none());
    }

    #[test]
    fn test_letterless_word_never_scored() {
        let catalog = Catalog::from_json(r#"{"cards": [{"id": "seven", "word": "7"}]}"#).unwrap();
        let mut session = SpellingSession::start(
            &catalog,
            ProgressBook::new(),
            Settings::default(),
            Bounds::new(800.0, 600.0),
            1,
        );
        assert_eq!(session.items().len(), 1);
        assert!(session.next_round().is_none());
        assert!(session.record_round(1000).is_none());
        assert!(session.is_finished());
        assert_eq!(session.book().score("seven"), 0);
    }
}
