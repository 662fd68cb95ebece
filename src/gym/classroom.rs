use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::{
    env::{DiscreteActionSpace, Environment, Info, Report, Step},
    error::{EnvError, Result},
    spaces::BoxSpace,
};

/// `[knowledge, boredom, energy]`
pub type Attributes = [f64; 3];

/// Actions for the [`Classroom`] environment
#[derive(FromRepr, EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassroomAction {
    Teach = 0,
    Test = 1,
    AssignHomework = 2,
}

impl ClassroomAction {
    /// The change this action applies to `[knowledge, boredom, energy]`
    pub const fn deltas(self) -> Attributes {
        match self {
            Self::Teach => [2.0, 1.0, -1.0],
            Self::Test => [1.0, 1.0, -2.0],
            Self::AssignHomework => [1.0, -1.0, -1.0],
        }
    }
}

impl TryFrom<usize> for ClassroomAction {
    type Error = EnvError;

    fn try_from(value: usize) -> Result<Self> {
        Self::from_repr(value).ok_or(EnvError::InvalidAction {
            action: value,
            n: Self::VARIANTS.len(),
        })
    }
}

/// Configuration for the [`Classroom`] environment
#[derive(Debug, Clone, PartialEq)]
pub struct ClassroomConfig {
    /// Episode length in steps
    pub max_steps: usize,
    pub initial_state: Attributes,
    /// Lower clamp bound shared by every attribute
    pub low: f64,
    /// Upper clamp bound shared by every attribute, also the energy level below which a penalty applies
    pub high: f64,
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            initial_state: [5.0; 3],
            low: 0.0,
            high: 10.0,
        }
    }
}

/// A classroom whose student is described by knowledge, boredom and energy
///
/// Every step applies a fixed per-action change to the attributes. The reward is
/// computed from the changed attributes *before* they are clamped back into
/// `[low, high]`, so an energy deficit below zero is still penalized in full.
pub struct Classroom {
    config: ClassroomConfig,
    state: Attributes,
    step_count: usize,
    done: bool,
    rng: StdRng,
    pub report: Report,
}

impl Classroom {
    pub fn new(config: ClassroomConfig) -> Self {
        assert!(
            config.low <= config.high,
            "Classroom lower bound must not exceed upper bound."
        );
        Self {
            state: config.initial_state,
            config,
            step_count: 0,
            done: false,
            rng: StdRng::from_entropy(),
            report: Report::new(vec!["reward", "steps"]),
        }
    }

    pub fn config(&self) -> &ClassroomConfig {
        &self.config
    }

    pub fn state(&self) -> Attributes {
        self.state
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn max_steps(&self) -> usize {
        self.config.max_steps
    }

    /// `knowledge - 0.5 * boredom - 0.5 * max(0, high - energy)`
    pub fn reward(&self, attributes: &Attributes) -> f64 {
        let [knowledge, boredom, energy] = *attributes;
        knowledge - 0.5 * boredom - 0.5 * (self.config.high - energy).max(0.0)
    }
}

impl Default for Classroom {
    fn default() -> Self {
        Self::new(ClassroomConfig::default())
    }
}

impl Environment for Classroom {
    type State = Attributes;
    type Action = ClassroomAction;

    fn reset(&mut self, seed: Option<u64>, _options: Option<&Info>) -> (Self::State, Info) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.state = self.config.initial_state;
        self.step_count = 0;
        self.done = false;
        debug!("classroom reset to {:?}", self.state);
        (self.state, Info::new())
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        if self.done {
            warn!("classroom stepped after the episode ended");
            return Err(EnvError::UseAfterTerminal);
        }

        let deltas = action.deltas();
        let mut raw = self.state;
        for (value, delta) in raw.iter_mut().zip(deltas) {
            *value += delta;
        }

        let reward = self.reward(&raw);
        let ClassroomConfig { low, high, .. } = self.config;
        self.state = raw.map(|v| v.clamp(low, high));

        self.step_count += 1;
        self.done = self.step_count >= self.config.max_steps;

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report.entry("reward").and_modify(|x| *x += reward);
        debug!(
            "classroom {action:?} -> {:?}, reward {reward}, step {}",
            self.state, self.step_count
        );

        Ok(Step::new(self.state, reward, self.done))
    }

    fn is_active(&self) -> bool {
        !self.done
    }

    fn random_action(&mut self) -> Self::Action {
        let actions = ClassroomAction::VARIANTS;
        actions[self.rng.gen_range(0..actions.len())]
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace::uniform(self.config.low, self.config.high, 3)
    }

    fn render(&self) -> String {
        format!("State: {:?}", self.state)
    }
}

impl DiscreteActionSpace for Classroom {
    fn actions(&self) -> Vec<Self::Action> {
        ClassroomAction::VARIANTS.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::approx_eq;

    #[test]
    fn reset_restores_initial_state() {
        let mut env = Classroom::default();
        let (obs, info) = env.reset(None, None);
        assert_eq!(obs, [5.0, 5.0, 5.0], "initial observation");
        assert!(info.is_empty(), "reset info is empty");

        env.step(ClassroomAction::Teach).unwrap();
        let (obs, _) = env.reset(Some(3), None);
        assert_eq!(obs, [5.0, 5.0, 5.0], "reset after stepping");
        assert_eq!(env.step_count(), 0, "step count cleared");

        let options = Info::from([("difficulty".to_string(), 2.0)]);
        env.step(ClassroomAction::Test).unwrap();
        let (obs, info) = env.reset(None, Some(&options));
        assert_eq!(obs, [5.0, 5.0, 5.0], "unknown options are ignored");
        assert!(info.is_empty(), "options are not echoed");
    }

    #[test]
    fn action_deltas_and_rewards() {
        let cases = [
            (ClassroomAction::Teach, [7.0, 6.0, 4.0], 1.0),
            (ClassroomAction::Test, [6.0, 6.0, 3.0], -0.5),
            (ClassroomAction::AssignHomework, [6.0, 4.0, 4.0], 1.0),
        ];

        for (action, expected_state, expected_reward) in cases {
            let mut env = Classroom::default();
            env.reset(None, None);
            let step = env.step(action).unwrap();
            assert_eq!(step.observation, expected_state, "{action:?} deltas");
            assert!(
                approx_eq(step.reward, expected_reward),
                "{action:?} reward was {}",
                step.reward
            );
            assert!(!step.done, "single step is not terminal");
            assert!(!step.truncated, "never truncated");
        }
    }

    #[test]
    fn reward_uses_pre_clamp_energy() {
        let mut env = Classroom::default();
        env.reset(None, None);

        // energy: 5 -> 3 -> 1 -> -1
        env.step(ClassroomAction::Test).unwrap();
        env.step(ClassroomAction::Test).unwrap();
        let step = env.step(ClassroomAction::Test).unwrap();

        assert_eq!(step.observation, [8.0, 8.0, 0.0], "energy clamped to zero");
        assert!(
            approx_eq(step.reward, 8.0 - 4.0 - 5.5),
            "penalty uses unclamped energy, reward was {}",
            step.reward
        );
        assert!(
            !approx_eq(step.reward, env.reward(&step.observation)),
            "reward differs from the clamped-state reward"
        );
    }

    #[test]
    fn attributes_stay_clamped() {
        let mut env = Classroom::default();
        env.reset(Some(42), None);
        let space = env.observation_space();

        while env.is_active() {
            let action = env.random_action();
            let step = env.step(action).unwrap();
            assert!(
                space.contains(&step.observation),
                "{:?} out of bounds",
                step.observation
            );
        }

        for action in [ClassroomAction::Teach, ClassroomAction::AssignHomework] {
            env.reset(None, None);
            for _ in 0..100 {
                let obs = env.step(action).unwrap().observation;
                assert!(obs.iter().all(|v| (0.0..=10.0).contains(v)), "{obs:?}");
            }
        }
    }

    #[test]
    fn teach_beats_homework_on_knowledge() {
        assert!(
            ClassroomAction::Teach.deltas()[0] > ClassroomAction::AssignHomework.deltas()[0],
            "teaching adds more knowledge than homework"
        );
    }

    #[test]
    fn episode_ends_on_hundredth_step() {
        let mut env = Classroom::default();
        env.reset(None, None);
        assert_eq!(env.max_steps(), 100, "default episode length");

        for i in 1..=100 {
            let step = env.step(ClassroomAction::AssignHomework).unwrap();
            assert_eq!(step.done, i == 100, "done flag at step {i}");
            assert!(env.step_count() <= env.max_steps(), "step count bounded");
        }
        assert!(!env.is_active(), "episode over");
        assert_eq!(env.report["steps"], 100.0, "report counted steps");
    }

    #[test]
    fn step_after_terminal_fails() {
        let mut env = Classroom::new(ClassroomConfig {
            max_steps: 1,
            ..Default::default()
        });
        env.reset(None, None);
        assert!(env.step(ClassroomAction::Teach).unwrap().done, "one step episode");

        let state = env.state();
        assert_eq!(
            env.step(ClassroomAction::Teach),
            Err(EnvError::UseAfterTerminal),
            "stepping a finished episode is rejected"
        );
        assert_eq!(env.state(), state, "state untouched by the rejected step");

        env.reset(None, None);
        assert!(env.step(ClassroomAction::Teach).is_ok(), "reset re-arms the env");
    }

    #[test]
    fn invalid_action_index_rejected() {
        let mut env = Classroom::default();
        env.reset(None, None);

        assert_eq!(env.action_space().n, 3, "three actions");
        assert_eq!(
            env.step_index(3),
            Err(EnvError::InvalidAction { action: 3, n: 3 }),
            "index out of range"
        );
        assert_eq!(env.step_count(), 0, "rejected action does not advance");
        assert_eq!(
            ClassroomAction::try_from(5),
            Err(EnvError::InvalidAction { action: 5, n: 3 }),
            "conversion rejects out of range"
        );

        let step = env.step_index(2).unwrap();
        assert_eq!(step.observation, [6.0, 4.0, 4.0], "index 2 is homework");
    }

    #[test]
    fn render_dumps_state() {
        let mut env = Classroom::default();
        env.reset(None, None);
        assert_eq!(env.render(), "State: [5.0, 5.0, 5.0]", "render format");
    }
}
