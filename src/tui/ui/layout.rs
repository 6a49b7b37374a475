use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::rc::Rc;

pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// `n` fixed-width columns of `width` cells, left-aligned in `area`.
pub(super) fn slots(area: Rect, n: usize, width: u16) -> Rc<[Rect]> {
    let mut constraints: Vec<Constraint> = (0..n).map(|_| Constraint::Length(width)).collect();
    constraints.push(Constraint::Min(0));
    Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area)
}
