use ratatui::{prelude::*, widgets::*};

/// `(keys, description)`
type Binding = (&'static str, &'static str);

const GLOBAL: [Binding; 3] = [
    (" q/Q ", "Quit"),
    (" h/? ", "Toggle this popup"),
    (" Tab ", "Switch between the scene and the episode log"),
];

const SCENE: [Binding; 1] = [("Space", "Jump on the next decision instead of the policy")];

const LOGS: [Binding; 5] = [
    ("  s  ", "Show or hide the module selector"),
    ("  f  ", "Focus on the selected module only"),
    ("⬆ / ⬇", "Select a module"),
    (" +/- ", "Raise or lower the selected module's level"),
    ("PgUp ", "Page through history, Esc to leave"),
];

/// Draw the key bindings for `selected_tab` in a popup centered in `area`
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let tab_bindings: &[Binding] = match selected_tab {
        0 => &SCENE,
        1 => &LOGS,
        _ => &[],
    };

    let lines: Vec<Line> = GLOBAL
        .iter()
        .chain(tab_bindings)
        .map(|&(keys, description)| {
            Line::from(vec![
                Span::from(keys).light_cyan().bold(),
                Span::raw(format!(" : {description}")),
            ])
        })
        .collect();

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(64),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title("Keys"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_lists_tab_bindings() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 20));
        render_help(buf.area, &mut buf, 0);

        let text = (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Quit"), "global binding listed");
        assert!(text.contains("Jump on the next"), "scene binding listed");
        assert!(!text.contains("module selector"), "log bindings hidden on the scene tab");
    }
}
