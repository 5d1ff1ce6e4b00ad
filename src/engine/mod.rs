//! The draw engine: a candidate pool, one round in progress, and the ledger
//! of finished rounds.
//!
//! A round works toward a fixed number of winners. `start` sets a ticker
//! running that flips the displayed candidate every tick; `stop` locks in
//! whoever is displayed at that instant. Repeating start/stop fills the round
//! one winner at a time, and the stop that reaches the target writes a
//! [`ResultRecord`] to the ledger.

mod round;

use std::num::NonZeroUsize;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::config::DrawConfig;
use crate::error::DrawError;
use crate::models::{ResultRecord, StopOutcome};
use crate::tasks::ticker::Ticker;
use round::DrawState;

pub struct DrawEngine {
    state: Arc<Mutex<DrawState>>,
    ticker: Option<Ticker>,
    config: DrawConfig,
    runtime: Handle,
}

impl DrawEngine {
    /// Create an engine that schedules its ticker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, like [`Handle::current`].
    pub fn new(config: DrawConfig) -> Self {
        Self::with_runtime(config, Handle::current())
    }

    pub fn with_runtime(config: DrawConfig, runtime: Handle) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: Arc::new(Mutex::new(DrawState::new(rng))),
            ticker: None,
            config,
            runtime,
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    // --- Candidates ---

    pub fn add_candidate(&self, name: &str) {
        if self.lock().pool.add(name) {
            debug!("Added candidate {}", name.trim());
        }
    }

    pub fn add_candidates<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.lock().pool.add_many(names);
        debug!("Added {} candidate(s)", added);
    }

    /// Remove a candidate from the pool and from the pending round's winners.
    pub fn remove_candidate(&self, name: &str) {
        let mut state = self.lock();
        let removed = state.pool.remove(name);
        state.winners.retain(|w| w != name);
        if state.display == name {
            state.display.clear();
        }
        if removed {
            debug!("Removed candidate {}", name);
        }
    }

    /// Empty the pool and the pending round's winners. The ledger is kept.
    pub fn clear_candidates(&self) {
        let mut state = self.lock();
        state.pool.clear();
        state.winners.clear();
        state.display.clear();
        info!("Cleared all candidates");
    }

    // --- Round lifecycle ---

    /// Begin (or resume) drawing toward `target` winners.
    ///
    /// Calling this while already running does nothing. If a round is pending
    /// from an earlier stop and `target` exceeds the winners locked so far,
    /// drawing continues that round; otherwise a fresh round begins.
    pub fn start(&mut self, target: NonZeroUsize) -> Result<(), DrawError> {
        let requested = target.get();
        let generation = {
            let mut state = self.lock();
            if state.running {
                debug!("Start ignored: draw already running");
                return Ok(());
            }

            if state.pool.len() < requested {
                warn!(
                    "Cannot draw {} winner(s) from {} candidate(s)",
                    requested,
                    state.pool.len()
                );
                return Err(DrawError::InsufficientCandidates {
                    requested,
                    available: state.pool.len(),
                });
            }

            let fresh = state.target == 0 || requested <= state.winners.len();
            let retained: &[String] = if fresh { &[] } else { state.winners.as_slice() };
            if state.pool.available(retained).next().is_none() {
                warn!("Cannot draw: every candidate has already won this round");
                return Err(DrawError::NoAvailableCandidates);
            }

            if fresh {
                state.winners.clear();
            }
            state.target = requested;
            state.running = true;
            state.generation += 1;
            state.sample();

            info!(
                "Drawing toward {} winner(s), {} already locked",
                requested,
                state.winners.len()
            );
            state.generation
        };

        if let Some(old) = self.ticker.take() {
            old.cancel();
        }
        self.ticker = Some(self.spawn_ticker(generation));
        Ok(())
    }

    /// Stop the animation and lock in the displayed candidate. Does nothing
    /// unless a draw is running.
    pub fn stop(&mut self, title: &str) -> StopOutcome {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        self.lock().finish(title)
    }

    /// Abandon the pending round. Pool and ledger are untouched.
    pub fn reset(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }

        let mut state = self.lock();
        state.running = false;
        state.generation += 1;
        state.winners.clear();
        state.display.clear();
        state.target = 0;
        info!("Draw reset");
    }

    fn spawn_ticker(&self, generation: u64) -> Ticker {
        let state = Arc::clone(&self.state);
        let deadline = self.config.auto_stop_after.map(|after| Instant::now() + after);
        let auto_title = self.config.auto_stop_title.clone();

        Ticker::spawn(&self.runtime, self.config.tick_interval, move || {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.is_current(generation) {
                return ControlFlow::Break(());
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                info!("Auto-stopping draw");
                state.finish(&auto_title);
                return ControlFlow::Break(());
            }

            state.sample();
            ControlFlow::Continue(())
        })
    }

    // --- Observers ---

    pub fn candidates(&self) -> Vec<String> {
        self.lock().pool.list()
    }

    pub fn current_winners(&self) -> Vec<String> {
        self.lock().winners.clone()
    }

    /// The candidate the animation is showing, or an empty string.
    pub fn current_candidate(&self) -> String {
        self.lock().display.clone()
    }

    pub fn results(&self) -> Vec<ResultRecord> {
        self.lock().ledger.records()
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Winner count of the pending round, 0 if none.
    pub fn target_winners(&self) -> usize {
        self.lock().target
    }

    pub fn has_reached_target(&self) -> bool {
        let state = self.lock();
        state.winners.len() >= state.target
    }

    // --- Ledger ---

    pub fn export_results(&self) -> String {
        self.lock().ledger.export()
    }

    pub fn export_results_json(&self) -> Result<String, serde_json::Error> {
        self.lock().ledger.export_json()
    }

    pub fn clear_results(&self) {
        self.lock().ledger.clear();
        info!("Cleared draw history");
    }

    fn lock(&self) -> MutexGuard<'_, DrawState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn n(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    fn seeded() -> DrawConfig {
        DrawConfig { seed: Some(1234), ..DrawConfig::default() }
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_keeps_single_ticker() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B", "C"]);

        engine.start(n(2)).unwrap();
        let generation = engine.lock().generation;
        engine.start(n(2)).unwrap();
        assert_eq!(engine.lock().generation, generation);
        assert!(engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_failure_leaves_state_alone() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B"]);

        let err = engine.start(n(3)).unwrap_err();
        assert_eq!(err, DrawError::InsufficientCandidates { requested: 3, available: 2 });
        assert!(!engine.is_running());
        assert_eq!(engine.target_winners(), 0);
        assert!(engine.ticker.is_none());
        assert!(engine.current_candidate().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn start_samples_immediately() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B"]);
        engine.start(n(1)).unwrap();
        assert!(!engine.current_candidate().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_any_tick_locks_first_sample() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B", "C"]);
        engine.start(n(2)).unwrap();
        let shown = engine.current_candidate();

        let outcome = engine.stop("R1");
        assert_eq!(
            outcome,
            StopOutcome::Pending { locked: Some(shown.clone()), remaining: 1 }
        );
        assert_eq!(engine.current_winners(), vec![shown]);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_after_stop() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B", "C", "D", "E", "F"]);
        engine.start(n(3)).unwrap();
        tokio::time::sleep(Duration::from_millis(260)).await;

        engine.stop("R1");
        let frozen = engine.current_candidate();
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(engine.current_candidate(), frozen);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_ticker_and_round() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B", "C"]);
        engine.start(n(2)).unwrap();
        engine.stop("R1");
        engine.start(n(2)).unwrap();

        engine.reset();
        assert!(!engine.is_running());
        assert!(engine.ticker.is_none());
        assert!(engine.current_winners().is_empty());
        assert!(engine.current_candidate().is_empty());
        assert_eq!(engine.target_winners(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(engine.current_candidate().is_empty());
        assert_eq!(engine.candidates(), vec!["A", "B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn smaller_target_starts_fresh_round() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B", "C", "D"]);
        engine.start(n(3)).unwrap();
        engine.stop("");
        engine.start(n(3)).unwrap();
        engine.stop("");
        assert_eq!(engine.current_winners().len(), 2);

        engine.start(n(2)).unwrap();
        assert!(engine.current_winners().is_empty());
        assert_eq!(engine.target_winners(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_stop_locks_a_winner() {
        let config = DrawConfig {
            auto_stop_after: Some(Duration::from_millis(500)),
            auto_stop_title: "Auto".to_string(),
            ..seeded()
        };
        let mut engine = DrawEngine::new(config);
        engine.add_candidates(["A", "B", "C"]);
        engine.start(n(1)).unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(engine.is_running());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!engine.is_running());
        let results = engine.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Auto");
        assert_eq!(results[0].winners.len(), 1);

        // A manual stop afterwards has nothing to do
        assert_eq!(engine.stop("late"), StopOutcome::Ignored);
        assert_eq!(engine.results().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_candidates_keeps_ledger() {
        let mut engine = DrawEngine::new(seeded());
        engine.add_candidates(["A", "B"]);
        engine.start(n(1)).unwrap();
        engine.stop("R1");

        engine.clear_candidates();
        assert!(engine.candidates().is_empty());
        assert!(engine.current_winners().is_empty());
        assert_eq!(engine.results().len(), 1);

        engine.clear_results();
        assert!(engine.results().is_empty());
    }
}
