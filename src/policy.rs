use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    env::{DiscreteActionSpace, Environment},
    error::Result,
    gym::{side_scroller::Observation, ObjectKind, ScrollerAction, SideScroller},
};

/// A source of actions for an environment
///
/// This is the seam a trained model plugs into: the environment only ever asks
/// for the next action given the current observation.
pub trait Policy<E: Environment> {
    fn predict(&mut self, obs: &E::State) -> E::Action;
}

/// Chooses uniformly among an environment's actions
pub struct RandomPolicy<A> {
    actions: Vec<A>,
    rng: StdRng,
}

impl<A: Clone> RandomPolicy<A> {
    pub fn new<E>(env: &E, seed: Option<u64>) -> Self
    where
        E: DiscreteActionSpace<Action = A>,
    {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            actions: env.actions(),
            rng,
        }
    }
}

impl<E> Policy<E> for RandomPolicy<E::Action>
where
    E: Environment,
    E::Action: Clone,
{
    fn predict(&mut self, _obs: &E::State) -> E::Action {
        let ix = self.rng.gen_range(0..self.actions.len());
        self.actions[ix].clone()
    }
}

/// Always takes the same action
pub struct FixedAction<A>(pub A);

impl<E> Policy<E> for FixedAction<E::Action>
where
    E: Environment,
    E::Action: Copy,
{
    fn predict(&mut self, _obs: &E::State) -> E::Action {
        self.0
    }
}

/// Scripted side-scroller policy: jump when the pending object is an obstacle
/// between `near` and `far` units ahead
///
/// Height is not consulted. The environment ignores a jump while airborne.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpAhead {
    pub near: f64,
    pub far: f64,
}

impl Default for JumpAhead {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 1.3,
        }
    }
}

impl Policy<SideScroller> for JumpAhead {
    fn predict(&mut self, obs: &Observation) -> ScrollerAction {
        let [x, _, next_x, kind] = *obs;
        let gap = next_x - x;
        if kind == ObjectKind::Obstacle.code() && gap > self.near && gap < self.far {
            ScrollerAction::Jump
        } else {
            ScrollerAction::Noop
        }
    }
}

/// Totals for one episode run by [`rollout`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub total_reward: f64,
    /// `false` when the tick limit cut the episode short
    pub terminated: bool,
}

/// Reset `env` and let `policy` act until the episode ends or `max_ticks` is reached
pub fn rollout<E, P>(
    env: &mut E,
    policy: &mut P,
    seed: Option<u64>,
    max_ticks: usize,
) -> Result<EpisodeSummary>
where
    E: Environment,
    P: Policy<E>,
{
    let (mut obs, _) = env.reset(seed, None);
    let mut summary = EpisodeSummary::default();

    while summary.steps < max_ticks {
        let action = policy.predict(&obs);
        let step = env.step(action)?;
        let done = step.is_done();
        summary.steps += 1;
        summary.total_reward += step.reward;
        obs = step.observation;
        if done {
            summary.terminated = true;
            break;
        }
    }

    info!(
        "episode finished after {} steps with reward {:.2}{}",
        summary.steps,
        summary.total_reward,
        if summary.terminated { "" } else { " (tick limit)" }
    );
    Ok(summary)
}
