use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap},
    ops::Index,
};

use log::warn;

use crate::{
    error::{EnvError, Result},
    spaces::{BoxSpace, Discrete},
};

/// Auxiliary per-step information, keyed by metric name
pub type Info = HashMap<String, f64>;

/// The outcome of advancing an environment by one decision tick
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    /// Observation after the action was applied
    pub observation: S,
    /// Scalar reward for this tick
    pub reward: f64,
    /// The episode reached a terminal state
    pub done: bool,
    /// The episode was cut short by a time limit (never set by the bundled environments)
    pub truncated: bool,
    pub info: Info,
}

impl<S> Step<S> {
    pub fn new(observation: S, reward: f64, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
            truncated: false,
            info: Info::new(),
        }
    }

    /// Terminated or truncated
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done || self.truncated
    }
}

/// Represents a discrete-time Markov decision process with a single agent,
/// defining the dynamics of an environment in which an agent can operate.
///
/// Once [`step`](Environment::step) reports `done`, the environment must be
/// [`reset`](Environment::reset) before it can be stepped again.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Reset the environment to its initial state
    ///
    /// `seed` reseeds the environment's random source, which only affects
    /// [`random_action`](Environment::random_action); the dynamics are deterministic.
    /// `options` carries environment-specific reset settings. The bundled
    /// environments define none and ignore it.
    ///
    /// **Returns** `(observation, info)`
    fn reset(&mut self, seed: Option<u64>, options: Option<&Info>) -> (Self::State, Info);

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Errors** with [`EnvError::UseAfterTerminal`] if the episode has already ended
    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>>;

    /// Determine if the current episode is still running
    fn is_active(&self) -> bool;

    /// Sample a uniformly random action
    fn random_action(&mut self) -> Self::Action;

    /// The declared bounds of the observation vector
    fn observation_space(&self) -> BoxSpace;

    /// A human-readable dump of the current state, for debugging
    fn render(&self) -> String;
}

/// An environment whose actions form a finite set indexed from zero
pub trait DiscreteActionSpace: Environment {
    /// Get all actions, ordered by their index
    ///
    /// The returned vec should never be empty, instead specify an action that represents doing nothing if necessary.
    fn actions(&self) -> Vec<Self::Action>;

    fn action_space(&self) -> Discrete {
        Discrete::new(self.actions().len())
    }

    /// Map a raw action index onto the action it denotes
    fn action_from_index(&self, ix: usize) -> Result<Self::Action> {
        let mut actions = self.actions();
        let n = actions.len();
        if ix >= n {
            warn!("rejected action index {ix}, action space has {n} actions");
            return Err(EnvError::InvalidAction { action: ix, n });
        }
        Ok(actions.swap_remove(ix))
    }

    /// Step with a raw action index, as a numeric policy would produce
    fn step_index(&mut self, ix: usize) -> Result<Step<Self::State>> {
        let action = self.action_from_index(ix)?;
        self.step(action)
    }
}

/// Per-episode metric tallies
///
/// Values accumulate through [`entry`](Report::entry) and are drained with
/// [`take`](Report::take), which zeroes every key.
#[derive(Debug, Clone)]
pub struct Report {
    keys: Vec<&'static str>,
    values: HashMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let values = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, values }
    }

    /// The tracked keys in the same order as the map returned by [`take`](Report::take)
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = self.keys.clone();
        keys.sort_unstable();
        keys
    }

    pub fn entry(&mut self, key: &'static str) -> Entry<&'static str, f64> {
        self.values.entry(key)
    }

    /// Return the current tallies and reset them to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        self.values
            .iter_mut()
            .map(|(&k, v)| (k, std::mem::take(v)))
            .collect()
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_functional() {
        let mut report = Report::new(vec!["steps", "reward"]);
        assert_eq!(report.keys(), vec!["reward", "steps"], "keys are sorted");

        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("reward").and_modify(|x| *x -= 2.5);
        assert_eq!(report["steps"], 2.0, "steps tallied");

        let taken = report.take();
        assert_eq!(
            taken.values().copied().collect::<Vec<_>>(),
            vec![-2.5, 2.0],
            "values follow key order"
        );
        assert_eq!(report["reward"], 0.0, "take resets tallies");
    }

    #[test]
    fn step_is_done() {
        let mut step = Step::new([0.0; 2], 1.0, false);
        assert!(!step.is_done(), "fresh step is not done");
        step.truncated = true;
        assert!(step.is_done(), "truncation counts as done");
        assert!(step.info.is_empty(), "info starts empty");
    }
}
