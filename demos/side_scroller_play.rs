use std::error::Error;

use classroom_rl::{
    gym::SideScroller,
    policy::JumpAhead,
    viz::{self, App, RenderContext, SceneConfig},
};

fn main() -> Result<(), Box<dyn Error>> {
    viz::init()?;

    let config = SceneConfig {
        decision_interval: 2,
        ..Default::default()
    };
    let mut app = App::new(SideScroller::play(), JumpAhead::default(), config);

    let mut ctx = RenderContext::acquire()?;
    app.run(&mut ctx)?;
    drop(ctx);

    println!("Final score: {:.1}", app.total_reward());
    Ok(())
}
