//! Monte-Carlo lottery over the actors present in the session.
//!
//! A selection does not make a single weighted choice. It runs a fixed
//! number of trials, each drawing one present actor uniformly at random
//! (with replacement), and tallies how often every actor was drawn. The
//! actor with the highest tally wins, and the full tally is reported as a
//! ranked breakdown.
//!
//! The engine is pure given `(actors, seed, trials)`: it owns its RNG,
//! performs no I/O, and records nothing. Persisting the winning event is
//! the caller's job.
//!
//! # Ranking
//!
//! Standings are ordered by win count, highest first. Equal counts are
//! ordered by slot, so the actor listed earlier in the input ranks higher
//! and wins a tie for first place.

use coffie_types::Actor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of trials drawn per selection unless configured otherwise.
pub const DEFAULT_TRIALS: u32 = 20_000;

/// Reasons a selection cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Nobody is present, so there is no outcome to draw from.
    #[error("no actors are present in the session")]
    EmptyRoster,

    /// A lottery with zero trials has no winner.
    #[error("trial count must be at least 1")]
    ZeroTrials,
}

/// A share of the trials, stored exactly in hundredths of a percent.
///
/// `Percent(3_345)` is 33.45%. Rounding is half-up at the second decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(pub u32);

impl Percent {
    /// Compute `wins / trials * 100`, rounded to two decimals.
    ///
    /// Returns `Percent(0)` when `trials` is zero.
    pub fn of(wins: u32, trials: u32) -> Self {
        let trials = u64::from(trials);
        let scaled = u64::from(wins)
            .saturating_mul(10_000)
            .saturating_add(trials / 2);
        let hundredths = scaled.checked_div(trials).unwrap_or(0);
        Self(u32::try_from(hundredths).unwrap_or(u32::MAX))
    }
}

impl core::fmt::Display for Percent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// One actor's line in the breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// The actor this line describes.
    pub actor: Actor,
    /// Number of trials the actor won.
    pub wins: u32,
    /// `wins` as a share of all trials.
    pub percent: Percent,
}

/// Outcome of one lottery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    trials: u32,
    breakdown: Vec<Standing>,
}

impl Selection {
    /// The top-ranked standing.
    pub fn winning(&self) -> Option<&Standing> {
        self.breakdown.first()
    }

    /// The winning actor.
    pub fn winner(&self) -> Option<&Actor> {
        self.winning().map(|s| &s.actor)
    }

    /// All standings, best first.
    pub fn breakdown(&self) -> &[Standing] {
        &self.breakdown
    }

    /// Number of trials that were drawn.
    pub const fn trials(&self) -> u32 {
        self.trials
    }

    /// Render the plain-text summary returned by the session API.
    ///
    /// ```text
    /// Ada at 50.12% of 20000 iterations
    ///
    /// breakdown:
    ///
    /// Ada @ 50.12% 10024/20000
    /// Bob @ 49.88% 9976/20000
    /// ```
    pub fn report(&self) -> String {
        let lines: Vec<String> = self
            .breakdown
            .iter()
            .map(|s| {
                format!(
                    "{} @ {}% {}/{}",
                    s.actor.name, s.percent, s.wins, self.trials
                )
            })
            .collect();

        let (name, percent) = self
            .winning()
            .map_or(("", Percent(0)), |s| (s.actor.name.as_str(), s.percent));

        format!(
            "{name} at {percent}% of {} iterations\n\nbreakdown:\n\n{}",
            self.trials,
            lines.join("\n")
        )
    }
}

/// A configured lottery. Holds only the trial count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lottery {
    trials: u32,
}

impl Lottery {
    /// Create a lottery drawing `trials` times per selection.
    pub const fn new(trials: u32) -> Result<Self, SelectionError> {
        if trials == 0 {
            return Err(SelectionError::ZeroTrials);
        }
        Ok(Self { trials })
    }

    /// Trials drawn per selection.
    pub const fn trials(&self) -> u32 {
        self.trials
    }

    /// Run one selection over `actors` with the given seed.
    pub fn draw(&self, actors: &[Actor], seed: u64) -> Result<Selection, SelectionError> {
        select(actors, seed, self.trials)
    }
}

impl Default for Lottery {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
        }
    }
}

/// Run `trials` uniform draws over `actors` and rank the result.
///
/// Fails before drawing anything if `actors` is empty or `trials` is zero.
/// A single actor still goes through every trial and ends at 100.00%.
pub fn select(actors: &[Actor], seed: u64, trials: u32) -> Result<Selection, SelectionError> {
    if actors.is_empty() {
        return Err(SelectionError::EmptyRoster);
    }
    if trials == 0 {
        return Err(SelectionError::ZeroTrials);
    }

    tracing::trace!(actors = actors.len(), seed, trials, "Drawing lottery");

    let counters = tally(actors.len(), seed, trials);
    let order = rank(&counters);

    let breakdown = order
        .into_iter()
        .filter_map(|slot| {
            let actor = actors.get(slot)?;
            let wins = counters.get(slot).copied()?;
            Some(Standing {
                actor: actor.clone(),
                wins,
                percent: Percent::of(wins, trials),
            })
        })
        .collect();

    Ok(Selection { trials, breakdown })
}

/// Draw `trials` slots uniformly from `0..slots` and count the hits.
///
/// `slots` must be non-zero.
fn tally(slots: usize, seed: u64, trials: u32) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut counters = vec![0_u32; slots];
    for _ in 0..trials {
        let slot = rng.random_range(0..slots);
        if let Some(count) = counters.get_mut(slot) {
            *count = count.saturating_add(1);
        }
    }
    counters
}

/// Slot indices ordered by count descending, lowest slot first on ties.
fn rank(counters: &[u32]) -> Vec<usize> {
    let mut order: Vec<(usize, u32)> = counters.iter().copied().enumerate().collect();
    order.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    order.into_iter().map(|(slot, _)| slot).collect()
}

#[cfg(test)]
mod tests {
    use coffie_types::ActorId;

    use super::*;

    fn roster(names: &[&str]) -> Vec<Actor> {
        names
            .iter()
            .zip(1_i64..)
            .map(|(name, id)| Actor {
                id: ActorId(id),
                name: (*name).to_owned(),
                in_session: true,
            })
            .collect()
    }

    fn total_wins(selection: &Selection) -> u64 {
        selection
            .breakdown()
            .iter()
            .map(|s| u64::from(s.wins))
            .sum()
    }

    #[test]
    fn counters_sum_to_trial_count() {
        for n in 1..=6 {
            for trials in [1, 2, 17, 1_000] {
                let actors = roster(&["a", "b", "c", "d", "e", "f"][..n]);
                let selection = select(&actors, 99, trials);
                assert!(selection.is_ok());
                let selection = selection.ok().unwrap_or_else(empty_selection);
                assert_eq!(total_wins(&selection), u64::from(trials));
                assert_eq!(selection.breakdown().len(), n);
            }
        }
    }

    #[test]
    fn winner_has_the_highest_count() {
        let actors = roster(&["Ada", "Bob", "Cy", "Dee"]);
        let selection = select(&actors, 7, DEFAULT_TRIALS).ok();
        let selection = selection.unwrap_or_else(empty_selection);

        let best = selection.winning().map_or(0, |s| s.wins);
        for standing in selection.breakdown() {
            assert!(standing.wins <= best);
            assert!(standing.wins <= DEFAULT_TRIALS);
        }
        assert_eq!(
            selection.winner().map(|a| a.id),
            selection.breakdown().first().map(|s| s.actor.id)
        );
    }

    #[test]
    fn same_seed_same_outcome() {
        let actors = roster(&["Ada", "Bob", "Cy"]);
        let first = select(&actors, 0xC0FF_EE, DEFAULT_TRIALS);
        let second = select(&actors, 0xC0FF_EE, DEFAULT_TRIALS);
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let actors = roster(&["Ada", "Bob", "Cy"]);
        let outcomes: Vec<Vec<u32>> = (0..5)
            .filter_map(|seed| select(&actors, seed, DEFAULT_TRIALS).ok())
            .map(|s| s.breakdown().iter().map(|st| st.wins).collect())
            .collect();
        let first = outcomes.first().cloned().unwrap_or_default();
        assert!(outcomes.iter().any(|o| *o != first));
    }

    #[test]
    fn single_actor_takes_every_trial() {
        let actors = roster(&["Solo"]);
        let selection = select(&actors, 1, DEFAULT_TRIALS)
            .ok()
            .unwrap_or_else(empty_selection);

        let standing = selection.winning();
        assert_eq!(standing.map(|s| s.wins), Some(20_000));
        assert_eq!(standing.map(|s| s.percent), Some(Percent(10_000)));
        assert_eq!(
            selection.report(),
            "Solo at 100.00% of 20000 iterations\n\nbreakdown:\n\nSolo @ 100.00% 20000/20000"
        );
    }

    #[test]
    fn empty_roster_is_refused() {
        assert_eq!(select(&[], 1, DEFAULT_TRIALS), Err(SelectionError::EmptyRoster));
        assert_eq!(
            Lottery::default().draw(&[], 1),
            Err(SelectionError::EmptyRoster)
        );
    }

    #[test]
    fn zero_trials_are_refused() {
        let actors = roster(&["Ada"]);
        assert_eq!(select(&actors, 1, 0), Err(SelectionError::ZeroTrials));
        assert_eq!(Lottery::new(0), Err(SelectionError::ZeroTrials));
    }

    #[test]
    fn breakdown_percentages_never_increase() {
        let actors = roster(&["a", "b", "c", "d", "e", "f", "g"]);
        for seed in 0..20 {
            let selection = select(&actors, seed, 3_000)
                .ok()
                .unwrap_or_else(empty_selection);
            let percents: Vec<Percent> =
                selection.breakdown().iter().map(|s| s.percent).collect();
            assert!(percents.windows(2).all(|w| w.first() >= w.last()));
        }
    }

    #[test]
    fn draws_are_roughly_uniform() {
        let actors = roster(&["a", "b", "c", "d"]);
        let selection = select(&actors, 2024, DEFAULT_TRIALS)
            .ok()
            .unwrap_or_else(empty_selection);
        // Expected 5000 each, standard deviation about 61.
        for standing in selection.breakdown() {
            assert!((4_500..=5_500).contains(&standing.wins), "{standing:?}");
        }
    }

    #[test]
    fn ties_rank_earlier_slot_first() {
        assert_eq!(rank(&[3, 5, 5, 1]), vec![1, 2, 0, 3]);
        assert_eq!(rank(&[2, 2, 2]), vec![0, 1, 2]);
        assert_eq!(rank(&[0, 4]), vec![1, 0]);
    }

    #[test]
    fn percent_rounds_half_up_to_two_decimals() {
        assert_eq!(Percent::of(1, 3).to_string(), "33.33");
        assert_eq!(Percent::of(2, 3).to_string(), "66.67");
        assert_eq!(Percent::of(1, 8).to_string(), "12.50");
        assert_eq!(Percent::of(1, 20_000).to_string(), "0.01");
        assert_eq!(Percent::of(0, 20_000).to_string(), "0.00");
        assert_eq!(Percent::of(5, 0), Percent(0));
    }

    #[test]
    fn report_lists_every_actor_in_rank_order() {
        let actors = roster(&["Ada", "Bob", "Cy"]);
        let selection = select(&actors, 5, 300)
            .ok()
            .unwrap_or_else(empty_selection);
        let report = selection.report();

        let winner = selection.winner().map(|a| a.name.clone()).unwrap_or_default();
        assert!(report.starts_with(&format!("{winner} at ")));
        assert!(report.contains(" of 300 iterations\n\nbreakdown:\n\n"));

        let lines: Vec<&str> = report.lines().skip(4).collect();
        assert_eq!(lines.len(), 3);
        for (line, standing) in lines.iter().zip(selection.breakdown()) {
            assert!(line.starts_with(&format!("{} @ ", standing.actor.name)));
            assert!(line.ends_with(&format!(" {}/300", standing.wins)));
        }
    }

    #[test]
    fn concurrent_selections_do_not_interfere() {
        let actors = roster(&["Ada", "Bob", "Cy"]);
        let results: Vec<Option<Selection>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8_u64)
                .map(|i| {
                    let actors = &actors;
                    scope.spawn(move || select(actors, i % 2, DEFAULT_TRIALS).ok())
                })
                .collect();
            handles.into_iter().map(|h| h.join().ok().flatten()).collect()
        });

        assert_eq!(results.len(), 8);
        for selection in results.iter().flatten() {
            assert_eq!(total_wins(selection), u64::from(DEFAULT_TRIALS));
        }
        assert!(results.iter().all(Option::is_some));

        // Runs sharing a seed agree regardless of scheduling.
        let evens: Vec<&Selection> = results.iter().step_by(2).flatten().collect();
        assert!(evens.windows(2).all(|w| w.first() == w.last()));
    }

    fn empty_selection() -> Selection {
        Selection {
            trials: 0,
            breakdown: Vec::new(),
        }
    }
}
