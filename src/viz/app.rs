use std::{io, time::Duration};

use crossterm::event::{self, Event};
use log::info;
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, ClassroomPanel, Component, Logs, Scene, SceneConfig},
    input::{pressed_key, Command},
    tui::RenderContext,
};
use crate::{
    env::{Environment, Step},
    gym::{Classroom, ObjectKind, ScrollerAction, SideScroller},
    policy::Policy,
};

const TABS: [&str; 2] = ["Scene", "Logs"];

/// An environment the [`App`] knows how to draw
pub trait View: Environment {
    fn view(&self, area: Rect, buf: &mut Buffer, config: &SceneConfig);

    /// Fraction of the episode completed, in `[0, 1]`
    fn progress(&self) -> f64;

    /// Message shown after the episode ended on `last`
    fn banner(&self, last: &Step<Self::State>) -> &'static str;

    /// Action taken instead of the policy's when the player presses space
    fn manual_action(&self) -> Option<Self::Action> {
        None
    }
}

impl View for SideScroller {
    fn view(&self, area: Rect, buf: &mut Buffer, config: &SceneConfig) {
        Scene::new(self, config).render(area, buf);
    }

    fn progress(&self) -> f64 {
        (self.position()[0] / self.config().level_end).clamp(0.0, 1.0)
    }

    fn banner(&self, last: &Step<Self::State>) -> &'static str {
        match self.next_object().map(|o| o.kind) {
            Some(ObjectKind::Obstacle) if last.reward < 0.0 => "Game Over!",
            Some(ObjectKind::Goal) if last.reward > 0.0 => "You Win!",
            _ => "End of the level",
        }
    }

    fn manual_action(&self) -> Option<ScrollerAction> {
        Some(ScrollerAction::Jump)
    }
}

impl View for Classroom {
    fn view(&self, area: Rect, buf: &mut Buffer, _config: &SceneConfig) {
        ClassroomPanel::new(self).render(area, buf);
    }

    fn progress(&self) -> f64 {
        self.step_count() as f64 / self.max_steps().max(1) as f64
    }

    fn banner(&self, _last: &Step<Self::State>) -> &'static str {
        "Class dismissed"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Running,
    Finished(&'static str),
    Quit,
}

/// The root TUI component: drives an environment with a policy and draws it
///
/// Frames are drawn at [`SceneConfig::fps`] and the policy is queried once every
/// [`SceneConfig::decision_interval`] frames.
pub struct App<E: View, P: Policy<E>> {
    env: E,
    policy: P,
    config: SceneConfig,
    state: State,
    obs: E::State,
    frame: u64,
    total_reward: f64,
    queued: Option<E::Action>,
    selected_tab: usize,
    show_help: bool,
    logs: Logs,
}

impl<E: View, P: Policy<E>> App<E, P> {
    pub fn new(mut env: E, policy: P, config: SceneConfig) -> Self {
        let (obs, _) = env.reset(None, None);
        Self {
            env,
            policy,
            config,
            state: State::Running,
            obs,
            frame: 0,
            total_reward: 0.0,
            queued: None,
            selected_tab: 0,
            show_help: false,
            logs: Logs::new(),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    /// Advance by one frame, stepping the environment on decision frames
    pub fn tick(&mut self) -> crate::error::Result<()> {
        if self.state != State::Running {
            return Ok(());
        }
        self.frame += 1;
        if self.frame % self.config.decision_interval.max(1) != 0 {
            return Ok(());
        }

        let action = match self.queued.take() {
            Some(action) => action,
            None => self.policy.predict(&self.obs),
        };
        let step = self.env.step(action)?;
        self.total_reward += step.reward;

        if step.is_done() {
            let banner = self.env.banner(&step);
            info!("{banner} Final score: {:.1}", self.total_reward);
            self.state = State::Finished(banner);
        }
        self.obs = step.observation;
        Ok(())
    }

    /// Run the draw loop until the player quits
    pub fn run(&mut self, ctx: &mut RenderContext) -> io::Result<()> {
        let frame_time = Duration::from_millis(1000 / self.config.fps.max(1));

        while self.state != State::Quit {
            ctx.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(frame_time)? {
                let event = event::read()?;
                self.handle_ui_event(&event);
            }

            self.tick().map_err(io::Error::other)?;
        }

        Ok(())
    }

    fn handle_ui_event(&mut self, event: &Event) {
        if self.selected_tab == 1 && !self.show_help && self.logs.handle_ui_event(event) {
            return;
        }

        let Some(command) = pressed_key(event).and_then(Command::from_key) else {
            return;
        };

        match command {
            Command::Quit => self.state = State::Quit,
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::NextTab => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            Command::Override => self.queued = self.env.manual_action(),
        }
    }
}

fn render_banner(area: Rect, buf: &mut Buffer, banner: &str, score: f64) {
    let [_, center, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Fill(1),
    ])
    .areas(area);

    Clear.render(center, buf);
    Paragraph::new(vec![
        Line::styled(banner, Style::default().light_red().bold()),
        Line::from(format!("Final Score: {score:.1}")),
    ])
    .alignment(Alignment::Center)
    .block(Block::bordered().border_type(BorderType::Rounded))
    .render(center, buf);
}

impl<E: View, P: Policy<E>> Widget for &App<E, P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Layout
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        // Main
        match self.selected_tab {
            0 => self.env.view(main_area, buf, &self.config),
            1 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        if let State::Finished(banner) = self.state {
            render_banner(main_area, buf, banner, self.total_reward);
        }

        // Progress Bar
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Progress"),
            )
            .gauge_style(Color::Cyan)
            .ratio(self.env.progress())
            .label(format!("Reward {:.1}", self.total_reward))
            .render(progress_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::{
        gym::{ClassroomAction, Level, SideScrollerConfig},
        policy::{FixedAction, JumpAhead},
    };

    fn screen_text<W: Widget>(widget: W) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        widget.render(buf.area, &mut buf);
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn decisions_are_gated_by_interval() {
        let config = SceneConfig {
            decision_interval: 3,
            ..Default::default()
        };
        let mut app = App::new(SideScroller::default(), JumpAhead::default(), config);

        for _ in 0..2 {
            app.tick().unwrap();
        }
        assert_eq!(app.env().ticks(), 0, "no decision before the third frame");
        app.tick().unwrap();
        assert_eq!(app.env().ticks(), 1, "one decision every three frames");
    }

    #[test]
    fn obstacle_ends_the_game() {
        let mut app = App::new(
            SideScroller::default(),
            FixedAction(ScrollerAction::Noop),
            SceneConfig::default(),
        );
        while !app.is_finished() {
            app.tick().unwrap();
        }
        assert_eq!(app.total_reward(), -5.0, "obstacle penalty");

        app.tick().unwrap();
        assert_eq!(app.env().ticks(), 28, "finished app stops stepping");

        let text = screen_text(&app);
        assert!(text.contains("Game Over!"), "banner drawn");
        assert!(text.contains("Final Score: -5.0"), "final score drawn");
    }

    #[test]
    fn space_queues_manual_jump() {
        let upward = SideScrollerConfig {
            jump_velocity: 5.0,
            gravity: -1.0,
            ..Default::default()
        };
        let mut app = App::new(
            SideScroller::new(Level::default(), upward),
            FixedAction(ScrollerAction::Noop),
            SceneConfig::default(),
        );
        for _ in 0..3 {
            app.tick().unwrap();
        }

        let space = Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        app.handle_ui_event(&space);
        app.tick().unwrap();
        assert!(app.env().is_airborne(), "manual jump overrode the policy");

        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        app.handle_ui_event(&quit);
        assert_eq!(app.state, State::Quit, "q quits");
    }

    #[test]
    fn classroom_app_runs_to_dismissal() {
        let mut app = App::new(
            Classroom::default(),
            FixedAction(ClassroomAction::Teach),
            SceneConfig::default(),
        );
        while !app.is_finished() {
            app.tick().unwrap();
        }
        assert_eq!(app.env().step_count(), 100, "full episode");
        assert!(screen_text(&app).contains("Class dismissed"), "banner drawn");
    }
}
