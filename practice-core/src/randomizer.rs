//! # Key/Mode Randomizer
//!
//! Stateful sampler behind the "Generate New Key & Scale" action. It
//! guarantees coverage-before-repeat: every combination of the 12 keys with
//! the active mode set is drawn exactly once, in a freshly shuffled order,
//! before any combination comes around again. Changing the active mode set
//! throws away the remaining pool and starts a new coverage pass.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::theory::{DEFAULT_MODE_COUNT, KEYS, Key, SCALE_FORMULAS};

/// Exhaustive, non-repeating sampler over key × mode combinations.
///
/// The pool holds index pairs into [`KEYS`] and [`SCALE_FORMULAS`], shuffled
/// with Fisher–Yates on every rebuild. Draws advance an index into the pool;
/// reaching the end rebuilds, reshuffles, and draws again immediately so the
/// caller never sees a stale selection.
#[derive(Debug)]
pub struct KeyModeRandomizer {
    /// Indexes of the user-selected modes, in selection order. May be empty;
    /// pool construction then falls back to all 14 modes.
    active_modes: Vec<usize>,
    pool: Vec<(usize, usize)>,
    index: usize,
    current_key: Key,
    current_mode: &'static str,
    rng: StdRng,
}

impl KeyModeRandomizer {
    /// Entropy-seeded randomizer with the default mode selection (the first
    /// seven canonical modes).
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut randomizer = Self {
            active_modes: (0..DEFAULT_MODE_COUNT).collect(),
            pool: Vec::new(),
            index: 0,
            current_key: KEYS[0],
            current_mode: SCALE_FORMULAS[0].name,
            rng,
        };
        randomizer.rebuild_pool();
        randomizer
    }

    /// The mode indexes the pool is built over: the active selection, or
    /// every mode when the user has deselected them all. The pool can never
    /// come out empty.
    fn pool_mode_indexes(&self) -> Vec<usize> {
        if self.active_modes.is_empty() {
            (0..SCALE_FORMULAS.len()).collect()
        } else {
            self.active_modes.clone()
        }
    }

    fn rebuild_pool(&mut self) {
        let modes = self.pool_mode_indexes();
        self.pool.clear();
        for key_index in 0..KEYS.len() {
            for &mode_index in &modes {
                self.pool.push((key_index, mode_index));
            }
        }
        self.pool.shuffle(&mut self.rng);
        self.index = 0;
    }

    /// Draws the next key/mode combination.
    ///
    /// When the current pool is exhausted it is rebuilt from the full cross
    /// product, reshuffled, and the draw proceeds from the new pool.
    pub fn next_combination(&mut self) -> (Key, &'static str) {
        if self.index >= self.pool.len() {
            self.rebuild_pool();
        }
        let (key_index, mode_index) = self.pool[self.index];
        self.index += 1;
        self.current_key = KEYS[key_index];
        self.current_mode = SCALE_FORMULAS[mode_index].name;
        (self.current_key, self.current_mode)
    }

    /// Replaces the active mode set and restarts coverage tracking.
    ///
    /// Unknown mode names are ignored; duplicates collapse. The current
    /// key/mode stay as they are until the next draw.
    pub fn set_active_modes(&mut self, modes: &[&str]) {
        self.active_modes.clear();
        for mode in modes {
            if let Some(i) = SCALE_FORMULAS.iter().position(|f| f.name == *mode) {
                if !self.active_modes.contains(&i) {
                    self.active_modes.push(i);
                }
            }
        }
        self.rebuild_pool();
    }

    /// Adds or removes one mode from the selection, restarting coverage.
    pub fn toggle_mode(&mut self, mode: &str) {
        let Some(i) = SCALE_FORMULAS.iter().position(|f| f.name == mode) else {
            return;
        };
        match self.active_modes.iter().position(|&m| m == i) {
            Some(pos) => {
                self.active_modes.remove(pos);
            }
            None => self.active_modes.push(i),
        }
        self.rebuild_pool();
    }

    /// Selects every mode, or deselects all of them when everything is
    /// already selected (the selection panel's "Select All" button).
    pub fn toggle_all(&mut self) {
        if self.active_modes.len() == SCALE_FORMULAS.len() {
            self.active_modes.clear();
        } else {
            self.active_modes = (0..SCALE_FORMULAS.len()).collect();
        }
        self.rebuild_pool();
    }

    pub fn current_key(&self) -> Key {
        self.current_key
    }

    pub fn current_mode(&self) -> &'static str {
        self.current_mode
    }

    /// Combinations left before the pool is exhausted. Informational only.
    pub fn remaining_count(&self) -> usize {
        self.pool.len() - self.index
    }

    /// Names of the actively selected modes, in selection order.
    pub fn active_modes(&self) -> Vec<&'static str> {
        self.active_modes
            .iter()
            .map(|&i| SCALE_FORMULAS[i].name)
            .collect()
    }
}

impl Default for KeyModeRandomizer {
    fn default() -> Self {
        Self::new()
    }
}
