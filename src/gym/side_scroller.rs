use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::{
    env::{DiscreteActionSpace, Environment, Info, Report, Step},
    error::{EnvError, Result},
    spaces::BoxSpace,
    trigger::{Cursor, ProximityTrigger},
};

/// `[position_x, position_y, next_object_x, next_object_kind]`
pub type Observation = [f64; 4];

/// Actions for the [`SideScroller`] environment
#[derive(FromRepr, EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollerAction {
    /// Keep running
    Noop = 0,
    /// Start a jump if grounded, ignored while airborne
    Jump = 1,
}

impl TryFrom<usize> for ScrollerAction {
    type Error = EnvError;

    fn try_from(value: usize) -> Result<Self> {
        Self::from_repr(value).ok_or(EnvError::InvalidAction {
            action: value,
            n: Self::VARIANTS.len(),
        })
    }
}

#[derive(EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Obstacle = 1,
    Reward = 2,
    Goal = 3,
}

impl ObjectKind {
    /// The value reported in the last observation component
    pub const fn code(self) -> f64 {
        self as u8 as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldObject {
    pub x: f64,
    pub kind: ObjectKind,
}

impl WorldObject {
    pub const fn new(x: f64, kind: ObjectKind) -> Self {
        Self { x, kind }
    }
}

/// An immutable course of world objects ordered by horizontal position
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    objects: Vec<WorldObject>,
}

impl Level {
    /// **Errors** if a coordinate is not finite or the objects are not sorted by `x`
    pub fn new(objects: Vec<WorldObject>) -> Result<Self> {
        if let Some(obj) = objects.iter().find(|o| !o.x.is_finite()) {
            return Err(EnvError::InvalidLayout(format!(
                "{:?} has a non-finite position",
                obj.kind
            )));
        }
        if let Some(pair) = objects.windows(2).find(|w| w[1].x < w[0].x) {
            return Err(EnvError::InvalidLayout(format!(
                "object at {} comes after object at {}",
                pair[1].x, pair[0].x
            )));
        }
        Ok(Self { objects })
    }

    /// The longer course of the visual game, in world units of 100 pixels
    pub fn play_course() -> Self {
        use ObjectKind::*;
        let kinds = [
            Obstacle, Reward, Obstacle, Reward, Obstacle, Reward, Obstacle, Reward, Obstacle,
            Reward, Obstacle, Obstacle, Obstacle, Reward, Reward, Goal,
        ];
        let objects = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| WorldObject::new(3.0 * (i + 1) as f64, kind))
            .collect();
        Self { objects }
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn get(&self, ix: usize) -> Option<&WorldObject> {
        self.objects.get(ix)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Level {
    /// The five-object classroom course, its goal placed past the level end
    fn default() -> Self {
        use ObjectKind::*;
        Self {
            objects: vec![
                WorldObject::new(3.0, Obstacle),
                WorldObject::new(5.0, Reward),
                WorldObject::new(7.0, Obstacle),
                WorldObject::new(9.0, Reward),
                WorldObject::new(11.0, Goal),
            ],
        }
    }
}

/// Configuration for the [`SideScroller`] environment
#[derive(Debug, Clone, PartialEq)]
pub struct SideScrollerConfig {
    /// Horizontal distance covered every tick
    pub forward_speed: f64,
    /// Vertical velocity set when a jump starts
    pub jump_velocity: f64,
    /// Added to the vertical velocity every tick
    pub gravity: f64,
    /// Half-width of the window in which an object interacts with the agent
    pub trigger_radius: f64,
    /// Horizontal position at which the episode ends regardless of objects
    pub level_end: f64,
    pub obstacle_reward: f64,
    pub collect_reward: f64,
    pub goal_reward: f64,
    /// `[next_object_x, next_object_kind]` reported once every object is consumed
    pub exhausted_observation: [f64; 2],
    /// Declared per-component observation bounds
    pub observation_bounds: (f64, f64),
}

impl Default for SideScrollerConfig {
    fn default() -> Self {
        Self {
            forward_speed: 0.1,
            jump_velocity: -5.0,
            gravity: 1.0,
            trigger_radius: 0.2,
            level_end: 10.0,
            obstacle_reward: -5.0,
            collect_reward: 10.0,
            goal_reward: 50.0,
            exhausted_observation: [10.0, ObjectKind::Goal.code()],
            observation_bounds: (0.0, 10.0),
        }
    }
}

/// An agent running right through a course of obstacles, rewards and a goal
///
/// The agent advances a fixed distance every tick and can jump. Only the next
/// pending object of the [`Level`] can interact with it: an obstacle ends the
/// episode with a penalty, a reward is collected once and the cursor moves on,
/// the goal ends the episode with a bonus.
pub struct SideScroller {
    config: SideScrollerConfig,
    level: Level,
    trigger: ProximityTrigger,
    cursor: Cursor,
    position: [f64; 2],
    velocity_y: f64,
    airborne: bool,
    ticks: usize,
    done: bool,
    rng: StdRng,
    pub report: Report,
}

impl SideScroller {
    pub fn new(level: Level, config: SideScrollerConfig) -> Self {
        Self {
            trigger: ProximityTrigger::new(config.trigger_radius),
            cursor: Cursor::new(level.len()),
            level,
            config,
            position: [0.0, 0.0],
            velocity_y: 0.0,
            airborne: false,
            ticks: 0,
            done: false,
            rng: StdRng::from_entropy(),
            report: Report::new(vec!["reward", "score", "steps"]),
        }
    }

    /// The visual game's course, with the level end moved past its goal
    pub fn play() -> Self {
        let level = Level::play_course();
        let level_end = level.objects().last().map_or(10.0, |o| o.x + 1.0);
        Self::new(
            level,
            SideScrollerConfig {
                level_end,
                ..Default::default()
            },
        )
    }

    pub fn config(&self) -> &SideScrollerConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// `[x, y]` with `y >= 0`
    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.velocity_y
    }

    /// Set by a jump, cleared on the tick where `y <= 0` and the agent is clamped to the ground
    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Index of the next pending object, equal to the number of consumed objects
    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    /// Whether object `ix` has already had its effect this episode
    pub fn is_consumed(&self, ix: usize) -> bool {
        self.cursor.is_consumed(ix)
    }

    pub fn next_object(&self) -> Option<&WorldObject> {
        self.cursor.pending().and_then(|ix| self.level.get(ix))
    }

    /// Progress through the level: the number of consumed objects
    ///
    /// Never exceeds [`max_steps`](SideScroller::max_steps). Use
    /// [`ticks`](SideScroller::ticks) for elapsed time.
    pub fn step_count(&self) -> usize {
        self.cursor.index()
    }

    /// One step per object in the level
    pub fn max_steps(&self) -> usize {
        self.level.len()
    }

    /// Ticks taken since the last reset
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    fn observation(&self) -> Observation {
        let [x, y] = self.position;
        match self.next_object() {
            Some(next) => [x, y, next.x, next.kind.code()],
            None => {
                let [next_x, kind] = self.config.exhausted_observation;
                [x, y, next_x, kind]
            }
        }
    }

    fn integrate(&mut self, action: ScrollerAction) {
        let SideScrollerConfig {
            forward_speed,
            jump_velocity,
            gravity,
            ..
        } = self.config;

        self.position[0] += forward_speed;

        if action == ScrollerAction::Jump && !self.airborne {
            self.velocity_y = jump_velocity;
            self.airborne = true;
        }

        self.velocity_y += gravity;
        self.position[1] += self.velocity_y;

        // Ground
        if self.position[1] <= 0.0 {
            self.position[1] = 0.0;
            self.velocity_y = 0.0;
            self.airborne = false;
        }
    }

    /// Let the pending object act on the agent
    ///
    /// **Returns** `(reward, done)`
    fn interact(&mut self) -> (f64, bool) {
        let Some(ix) = self.cursor.pending() else {
            return (0.0, false);
        };
        let next = self.level.objects()[ix];
        let x = self.position[0];
        if !self.trigger.fires(x, next.x) {
            return (0.0, false);
        }

        match next.kind {
            ObjectKind::Obstacle => {
                debug!("hit obstacle {ix} at x = {x:.2}");
                (self.config.obstacle_reward, true)
            }
            ObjectKind::Reward => {
                if !self.cursor.consume(ix) {
                    return (0.0, false);
                }
                debug!("collected reward {ix} at x = {x:.2}");
                self.report.entry("score").and_modify(|s| *s += 1.0);
                (self.config.collect_reward, false)
            }
            ObjectKind::Goal => {
                debug!("reached goal {ix} at x = {x:.2}");
                (self.config.goal_reward, true)
            }
        }
    }
}

impl Default for SideScroller {
    fn default() -> Self {
        Self::new(Level::default(), SideScrollerConfig::default())
    }
}

impl Environment for SideScroller {
    type State = Observation;
    type Action = ScrollerAction;

    fn reset(&mut self, seed: Option<u64>, _options: Option<&Info>) -> (Self::State, Info) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.position = [0.0, 0.0];
        self.velocity_y = 0.0;
        self.airborne = false;
        self.cursor.rewind();
        self.ticks = 0;
        self.done = false;
        debug!("side scroller reset with {} objects", self.level.len());
        (self.observation(), Info::new())
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        if self.done {
            warn!("side scroller stepped after the episode ended");
            return Err(EnvError::UseAfterTerminal);
        }

        self.integrate(action);
        let (reward, mut done) = self.interact();

        if self.position[0] >= self.config.level_end {
            debug!("reached the end of the level at x = {:.2}", self.position[0]);
            done = true;
        }

        self.ticks += 1;
        self.done = done;
        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report.entry("reward").and_modify(|x| *x += reward);

        Ok(Step::new(self.observation(), reward, done))
    }

    fn is_active(&self) -> bool {
        !self.done
    }

    fn random_action(&mut self) -> Self::Action {
        let actions = ScrollerAction::VARIANTS;
        actions[self.rng.gen_range(0..actions.len())]
    }

    fn observation_space(&self) -> BoxSpace {
        let (low, high) = self.config.observation_bounds;
        BoxSpace::uniform(low, high, 4)
    }

    fn render(&self) -> String {
        let next = match self.next_object() {
            Some(obj) => format!("{:?} at {}", obj.kind, obj.x),
            None => String::from("none"),
        };
        format!("Agent Position: {:?}, Next Object: {next}", self.position)
    }
}

impl DiscreteActionSpace for SideScroller {
    fn actions(&self) -> Vec<Self::Action> {
        ScrollerAction::VARIANTS.to_vec()
    }
}
