use ratatui::{prelude::*, widgets::*};

use crate::gym::{ObjectKind, SideScroller, WorldObject};

/// Layout of the side-scrolling view
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Terminal columns per world unit
    pub scale: f64,
    /// Terminal rows per world unit of height
    pub height_scale: f64,
    /// Column at which the camera keeps the agent
    pub agent_column: u16,
    /// Frames drawn per second
    pub fps: u64,
    /// Frames between two decisions of the policy
    pub decision_interval: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scale: 10.0,
            height_scale: 0.5,
            agent_column: 8,
            fps: 30,
            decision_interval: 1,
        }
    }
}

/// How a kind of world object is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub glyph: &'static str,
    pub color: Color,
    /// Rows above the ground
    pub lift: u16,
}

impl Sprite {
    pub const AGENT: Sprite = Sprite {
        glyph: "@",
        color: Color::LightCyan,
        lift: 0,
    };

    pub const fn for_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Obstacle => Sprite {
                glyph: "#",
                color: Color::LightRed,
                lift: 0,
            },
            ObjectKind::Reward => Sprite {
                glyph: "*",
                color: Color::Yellow,
                lift: 1,
            },
            ObjectKind::Goal => Sprite {
                glyph: "G",
                color: Color::LightGreen,
                lift: 0,
            },
        }
    }
}

/// The side-scroller as seen by a camera that follows the agent
///
/// Everything drawn is derived from the environment: the camera position from
/// the agent's position and the set of remaining objects from the environment's
/// consumed query.
pub struct Scene<'a> {
    env: &'a SideScroller,
    config: &'a SceneConfig,
}

impl<'a> Scene<'a> {
    pub fn new(env: &'a SideScroller, config: &'a SceneConfig) -> Self {
        Self { env, config }
    }

    /// World x of the left edge of the view
    pub fn scroll_offset(&self) -> f64 {
        self.env.position()[0] - f64::from(self.config.agent_column) / self.config.scale
    }

    /// `(world_x - scroll_offset)` in columns
    pub fn screen_x(&self, world_x: f64) -> f64 {
        (world_x - self.scroll_offset()) * self.config.scale
    }

    /// Unconsumed objects inside a view `width` columns wide, with their column
    pub fn visible_objects(&self, width: u16) -> Vec<(u16, WorldObject)> {
        self.env
            .level()
            .objects()
            .iter()
            .enumerate()
            .filter(|&(ix, _)| !self.env.is_consumed(ix))
            .filter_map(|(_, obj)| {
                let col = self.screen_x(obj.x).round();
                (col >= 0.0 && col < f64::from(width)).then_some((col as u16, *obj))
            })
            .collect()
    }
}

impl Widget for Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Classroom");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width == 0 {
            return;
        }

        let ground_line = inner.bottom() - 1;
        let ground = ground_line - 1;
        let headroom = ground - inner.y;

        buf.set_string(
            inner.x,
            ground_line,
            "─".repeat(inner.width as usize),
            Style::default().dark_gray(),
        );

        for (col, obj) in self.visible_objects(inner.width) {
            let sprite = Sprite::for_kind(obj.kind);
            let row = ground - sprite.lift.min(headroom);
            buf.set_string(inner.x + col, row, sprite.glyph, Style::default().fg(sprite.color));
        }

        // float to int casts saturate, so a runaway height pins to the top row
        let lift = (self.env.position()[1] * self.config.height_scale).round() as u16;
        let col = self.config.agent_column.min(inner.width - 1);
        buf.set_string(
            inner.x + col,
            ground - lift.min(headroom),
            Sprite::AGENT.glyph,
            Style::default().fg(Sprite::AGENT.color).bold(),
        );

        buf.set_string(
            inner.x,
            inner.y,
            format!("Score: {}", self.env.report["score"]),
            Style::default().white().bold(),
        );
    }
}
