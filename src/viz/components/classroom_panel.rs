use ratatui::{prelude::*, widgets::*};

use crate::gym::Classroom;

const ATTRIBUTES: [(&str, Color); 3] = [
    ("Knowledge", Color::LightGreen),
    ("Boredom", Color::LightRed),
    ("Energy", Color::LightYellow),
];

/// Gauges for the student's attributes
pub struct ClassroomPanel<'a> {
    env: &'a Classroom,
}

impl<'a> ClassroomPanel<'a> {
    pub fn new(env: &'a Classroom) -> Self {
        Self { env }
    }
}

impl Widget for ClassroomPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Student");
        let inner = block.inner(area);
        block.render(area, buf);

        let [knowledge, boredom, energy, steps] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let config = self.env.config();
        let span = config.high - config.low;
        let state = self.env.state();
        for ((name, color), (value, gauge_area)) in ATTRIBUTES
            .into_iter()
            .zip(state.into_iter().zip([knowledge, boredom, energy]))
        {
            let ratio = if span > 0.0 {
                ((value - config.low) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            Gauge::default()
                .block(Block::bordered().title(name))
                .gauge_style(color)
                .ratio(ratio)
                .label(format!("{value:.1}"))
                .render(gauge_area, buf);
        }

        Paragraph::new(format!(
            "Step {} / {}",
            self.env.step_count(),
            self.env.max_steps()
        ))
        .render(steps, buf);
    }
}
