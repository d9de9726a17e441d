//! Layout helpers for the terminal user interface.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rectangle centred in `r`, sized as a percentage of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

/// Horizontal scroll offset and cursor column for a single-line input `visible`
/// columns wide whose cursor sits `cursor_width` columns into the text.
///
/// The text scrolls just enough to keep the cursor on screen.
pub fn input_scroll(cursor_width: u16, visible: u16) -> (u16, u16) {
    let offset = cursor_width.saturating_sub(visible.saturating_sub(1));
    (offset, cursor_width - offset)
}

/// Canvas bounds that keep a unit circle round on an area of `width` x `height` cells.
///
/// Terminal cells are roughly twice as tall as they are wide.
pub fn circle_bounds(width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    if width == 0 || height == 0 {
        return ([-1.0, 1.0], [-1.0, 1.0]);
    }
    let ratio = width as f64 / (height as f64 * 2.0);
    if ratio >= 1.0 {
        ([-ratio, ratio], [-1.0, 1.0])
    } else {
        ([-1.0, 1.0], [-1.0 / ratio, 1.0 / ratio])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 20, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 10);
        assert_eq!(inner.x, 25);
        assert_eq!(inner.y, 20);
    }

    #[test]
    fn test_input_scroll_keeps_cursor_visible() {
        assert_eq!(input_scroll(5, 20), (0, 5));
        assert_eq!(input_scroll(19, 20), (0, 19));
        assert_eq!(input_scroll(25, 20), (6, 19));
        assert_eq!(input_scroll(3, 0), (3, 0));
    }

    #[test]
    fn test_circle_bounds() {
        assert_eq!(circle_bounds(40, 10), ([-2.0, 2.0], [-1.0, 1.0]));
        assert_eq!(circle_bounds(20, 10), ([-1.0, 1.0], [-1.0, 1.0]));
        assert_eq!(circle_bounds(10, 10), ([-1.0, 1.0], [-2.0, 2.0]));
        assert_eq!(circle_bounds(0, 10), ([-1.0, 1.0], [-1.0, 1.0]));
    }
}
