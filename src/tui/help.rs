use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEYBINDS: &[(&str, &str)] = &[
    ("q / Ctrl-C", "Quit"),
    ("g", "Generate a new maze"),
    ("s", "Solve the current maze"),
    ("space", "Play/Pause"),
    ("p", "Pause"),
    ("n / →", "Step forward"),
    ("r", "Reset to the first step"),
    ("+ / -", "Grow/shrink the next maze"),
    ("m", "Cycle generation algorithm"),
    ("f", "Cycle pathfinding algorithm"),
    ("w", "Save the replay as JSON"),
    ("a", "Toggle auto-save"),
    ("tab", "Switch tabs"),
    ("?", "Show this help"),
];

pub fn draw_help(area: Rect, f: &mut Frame) {
    let mut lines = vec![Line::from("Keybinds:")];
    for (keys, action) in KEYBINDS {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{keys:<12}"), Style::default().fg(Color::Magenta)),
            Span::raw(*action),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Playback:"));
    lines.push(Line::from(
        "  Steps replay the search as the solver ran it. The final path is shown",
    ));
    lines.push(Line::from(
        "  once playback reaches the last step; stepping by hand never reveals it.",
    ));

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
