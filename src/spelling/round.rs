//! One spelling round: the letters of a word floating as bubbles
//!
//! Tapping the next expected letter sends that bubble flying into its slot.
//! Tapping any other letter makes the bubble shake, pulls it out of play,
//! and drops it back in somewhere else a moment later.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BODIES, WRONG_REINSERT_SECS, WRONG_SHAKE_SECS};
use crate::settings::BubbleTuning;
use crate::sim::{BodyId, Bounds, BubbleWorld, SimError, WorldEvent};

/// Gap between neighbouring slots (pixels)
const SLOT_GAP: f32 = 8.0;

/// Destination of one letter of the word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub pos: Vec2,
    pub letter: char,
    /// Bubble that landed here
    pub body: Option<BodyId>,
}

impl Slot {
    pub fn is_filled(&self) -> bool {
        self.body.is_some()
    }
}

/// Result of tapping a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Right letter; the bubble is on its way to `slot`
    Correct { slot: usize },
    /// Wrong letter; the bubble shakes and is re-inserted later
    Wrong,
    /// Tap had no effect (bubble busy or unknown, or word complete)
    Ignored,
}

/// Something that happened during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    LetterPlaced { slot: usize },
    Reinserted { body: BodyId },
    WordComplete,
}

/// A wrong bubble waiting to come back
#[derive(Debug, Clone)]
struct Penalty {
    body: BodyId,
    elapsed: f32,
}

/// Context for one word
#[derive(Debug, Clone)]
pub struct SpellingRound {
    word: String,
    pub world: BubbleWorld,
    slots: Vec<Slot>,
    /// Index of the next slot to fill by tapping
    next_slot: usize,
    penalties: Vec<Penalty>,
    mistakes: u32,
    completed: bool,
    events: Vec<RoundEvent>,
}

impl SpellingRound {
    /// Set up a round. Non-letter characters of `word` are skipped.
    ///
    /// `decoys` extra letters not in the word are mixed in, as many as fit.
    pub fn new(word: &str, bounds: Bounds, tuning: BubbleTuning, decoys: usize, seed: u64) -> Result<Self, SimError> {
        let letters: Vec<char> = word
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_uppercase)
            .collect();
        if letters.is_empty() {
            return Err(SimError::EmptyWord);
        }
        if letters.len() > MAX_BODIES {
            return Err(SimError::WorldFull(MAX_BODIES));
        }

        let mut world = BubbleWorld::new(bounds, tuning, seed);
        let slots = layout_slots(&letters, &bounds, tuning.radius);

        let decoys = decoys.min(MAX_BODIES - letters.len());
        let mut labels = letters.clone();
        for _ in 0..decoys {
            labels.push(random_decoy(&letters, world.rng_mut()));
        }

        for label in labels {
            let pos = world.random_free_position();
            let vel = world.random_velocity();
            world.spawn(pos, vel, label)?;
        }

        let word: String = letters.iter().collect();
        log::info!("Spelling round '{}' with {} bubbles", word, world.bodies().len());

        Ok(Self {
            word,
            world,
            slots,
            next_slot: 0,
            penalties: Vec::new(),
            mistakes: 0,
            completed: false,
            events: Vec::new(),
        })
    }

    /// The word being spelled (upper case, letters only)
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Letter the next correct tap must have
    pub fn expected_letter(&self) -> Option<char> {
        self.slots.get(self.next_slot).map(|s| s.letter)
    }

    /// Every slot has its bubble
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Slot::is_filled)
    }

    /// Once complete: whether the word was spelled without mistakes
    pub fn outcome(&self) -> Option<bool> {
        self.is_complete().then_some(self.mistakes == 0)
    }

    /// Whether a bubble is currently pulled out after a wrong tap
    pub fn is_penalized(&self, body: BodyId) -> bool {
        self.penalties.iter().any(|p| p.body == body)
    }

    /// Horizontal wobble to draw on a shaking bubble (zero otherwise)
    pub fn shake_offset(&self, body: BodyId) -> Vec2 {
        self.penalties
            .iter()
            .find(|p| p.body == body && p.elapsed < WRONG_SHAKE_SECS)
            .map(|p| {
                let fade = 1.0 - p.elapsed / WRONG_SHAKE_SECS;
                Vec2::new((p.elapsed * 40.0).sin() * 6.0 * fade, 0.0)
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Handle a tap on a bubble
    pub fn tap(&mut self, id: BodyId) -> TapOutcome {
        let Some(expected) = self.expected_letter() else {
            return TapOutcome::Ignored;
        };
        let Some(body) = self.world.body(id) else {
            return TapOutcome::Ignored;
        };
        if !body.is_free() {
            // Flying, placed, or shaking
            return TapOutcome::Ignored;
        }

        if body.label == expected {
            let slot = self.next_slot;
            let dest = self.slots[slot].pos;
            match self.world.send_to_slot(id, dest, slot) {
                Ok(()) => {
                    self.next_slot += 1;
                    TapOutcome::Correct { slot }
                }
                Err(e) => {
                    log::warn!("Cannot send bubble {} to slot {}: {}", id, slot, e);
                    TapOutcome::Ignored
                }
            }
        } else {
            if let Err(e) = self.world.grab(id) {
                log::warn!("Cannot hold wrong bubble {}: {}", id, e);
                return TapOutcome::Ignored;
            }
            self.mistakes += 1;
            self.penalties.push(Penalty { body: id, elapsed: 0.0 });
            log::debug!("Wrong letter '{}' (expected '{}')", body_label(&self.world, id), expected);
            TapOutcome::Wrong
        }
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32) -> &[RoundEvent] {
        self.events.clear();

        let arrivals: Vec<(BodyId, usize)> = self
            .world
            .step()
            .iter()
            .filter_map(|e| match *e {
                WorldEvent::Arrived { body, slot } => Some((body, slot)),
                _ => None,
            })
            .collect();

        for (body, slot) in arrivals {
            // Park the bubble in its slot
            if let Err(e) = self.world.grab(body) {
                log::warn!("Cannot park bubble {}: {}", body, e);
            }
            if let Some(s) = self.slots.get_mut(slot) {
                s.body = Some(body);
                self.events.push(RoundEvent::LetterPlaced { slot });
            }
        }

        let mut due = Vec::new();
        self.penalties.retain_mut(|p| {
            p.elapsed += dt;
            if p.elapsed >= WRONG_REINSERT_SECS {
                due.push(p.body);
                false
            } else {
                true
            }
        });
        for body in due {
            if self.reinsert(body).is_ok() {
                self.events.push(RoundEvent::Reinserted { body });
            }
        }

        if !self.completed && self.is_complete() {
            self.completed = true;
            log::info!("Word '{}' complete with {} mistakes", self.word, self.mistakes);
            self.events.push(RoundEvent::WordComplete);
        }

        &self.events
    }

    fn reinsert(&mut self, body: BodyId) -> Result<(), SimError> {
        let pos = self.world.random_free_position();
        let vel = self.world.random_velocity();
        self.world.drag_to(body, pos)?;
        self.world.release(body, vel)
    }
}

fn body_label(world: &BubbleWorld, id: BodyId) -> char {
    world.body(id).map(|b| b.label).unwrap_or('?')
}

/// Random upper-case letter not in the word (any letter if none is left)
fn random_decoy<R: Rng>(letters: &[char], rng: &mut R) -> char {
    let pool: Vec<char> = ('A'..='Z').filter(|c| !letters.contains(c)).collect();
    if pool.is_empty() {
        return rng.random_range('A'..='Z');
    }
    pool[rng.random_range(0..pool.len())]
}

/// One slot per letter, centred in a row along the bottom edge
fn layout_slots(letters: &[char], bounds: &Bounds, radius: f32) -> Vec<Slot> {
    if letters.is_empty() {
        return Vec::new();
    }
    let n = letters.len() as f32;
    let pitch = (2.0 * radius + SLOT_GAP).min(bounds.width / n);
    let row_width = pitch * (n - 1.0);
    let start_x = bounds.width / 2.0 - row_width / 2.0;
    let y = bounds.max_y(radius);

    letters
        .iter()
        .enumerate()
        .map(|(i, &letter)| Slot {
            pos: bounds.clamp_center(Vec2::new(start_x + pitch * i as f32, y), radius),
            letter,
            body: None,
        })
        .collect()
}
