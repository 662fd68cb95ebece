use std::error::Error;

use classroom_rl::{
    env::Environment,
    gym::{Classroom, ClassroomAction, SideScroller},
    policy::{rollout, FixedAction, JumpAhead, RandomPolicy},
};

const NUM_EPISODES: u64 = 5;
const MAX_TICKS: usize = 1_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut classroom = Classroom::default();
    let mut random = RandomPolicy::new(&classroom, Some(0));
    for seed in 0..NUM_EPISODES {
        rollout(&mut classroom, &mut random, Some(seed), MAX_TICKS)?;
        let report = classroom.report.take();
        println!("random episode {seed}: {report:?}");
    }

    for action in [
        ClassroomAction::Teach,
        ClassroomAction::Test,
        ClassroomAction::AssignHomework,
    ] {
        let summary = rollout(&mut classroom, &mut FixedAction(action), None, MAX_TICKS)?;
        println!("always {action:?}: {:.1}", summary.total_reward);
        println!("{}", classroom.render());
    }

    let mut scroller = SideScroller::default();
    let summary = rollout(&mut scroller, &mut JumpAhead::default(), None, MAX_TICKS)?;
    println!(
        "side scroller: {} steps, reward {:.1}",
        summary.steps, summary.total_reward
    );
    println!("{}", scroller.render());

    Ok(())
}
