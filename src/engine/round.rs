// Round state shared between the engine and its ticker task.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::ledger::ResultsLedger;
use crate::models::{ResultRecord, StopOutcome};
use crate::pool::CandidatePool;

#[derive(Debug)]
pub(crate) struct DrawState {
    pub pool: CandidatePool,
    pub ledger: ResultsLedger,
    /// Winners locked in for the pending round, in lock-in order.
    pub winners: Vec<String>,
    /// Winner count for the pending round; 0 when no round is pending.
    pub target: usize,
    /// Candidate currently shown by the animation. Empty when none.
    pub display: String,
    pub running: bool,
    /// Bumped on every start and reset. Ticks carry the generation they were
    /// spawned with and do nothing once it is stale.
    pub generation: u64,
    rng: StdRng,
}

impl DrawState {
    pub fn new(rng: StdRng) -> Self {
        Self {
            pool: CandidatePool::new(),
            ledger: ResultsLedger::new(),
            winners: Vec::new(),
            target: 0,
            display: String::new(),
            running: false,
            generation: 0,
            rng,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    /// Pick a new display candidate uniformly from the pool minus this
    /// round's winners.
    pub fn sample(&mut self) {
        let available: Vec<&String> = self.pool.available(&self.winners).collect();
        match available.choose(&mut self.rng) {
            Some(name) => {
                debug!("Tick: showing {}", name);
                self.display = (*name).clone();
            }
            None => self.display.clear(),
        }
    }

    /// End the running phase, lock in the displayed candidate, and close the
    /// round if it has reached its target.
    pub fn finish(&mut self, title: &str) -> StopOutcome {
        if !self.running {
            debug!("Stop ignored: no draw running");
            return StopOutcome::Ignored;
        }
        self.running = false;

        let mut locked = None;
        if !self.display.is_empty()
            && self.pool.contains(&self.display)
            && !self.winners.contains(&self.display)
        {
            info!("Locked in winner {}", self.display);
            self.winners.push(self.display.clone());
            locked = Some(self.display.clone());
        }

        if self.winners.len() >= self.target {
            let record = ResultRecord::new(self.winners.clone(), title.to_string());
            info!(
                "Round complete ({} winner(s)): {}",
                record.winners.len(),
                record.winners.join(", ")
            );
            self.ledger.append(record.clone());
            self.target = 0;
            StopOutcome::Completed(record)
        } else {
            let remaining = self.target - self.winners.len();
            info!("Round paused, {} winner(s) still to draw", remaining);
            StopOutcome::Pending { locked, remaining }
        }
    }
}
