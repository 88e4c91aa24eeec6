use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions of the shell chrome.
///
/// `hero` is the single widget mount region; the footer splits into two
/// hint/status columns.
#[derive(Debug, Clone, Copy)]
pub struct ShellRects {
    pub top: Rect,
    pub hero: Rect,
    pub footer: Rect,
    pub footer_left: Rect,
    pub footer_right: Rect,
}

/// Mount-slot id of the hero region.
pub const HERO_SLOT: &str = "hero";

/// Compute the shell layout: one-line top bar, hero area, footer band.
pub fn shell_layout(area: Rect, footer_height: u16) -> ShellRects {
    let footer_height = footer_height
        .max(3)
        .min(area.height.saturating_sub(2).max(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // top bar
            Constraint::Min(1),                // hero
            Constraint::Length(footer_height), // footer
        ])
        .split(area);

    let footer = chunks[2];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(footer);

    ShellRects {
        top: chunks[0],
        hero: chunks[1],
        footer,
        footer_left: cols[0],
        footer_right: cols[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_tile_the_area() {
        let rects = shell_layout(Rect::new(0, 0, 80, 24), 6);
        assert_eq!(rects.top.height, 1);
        assert_eq!(rects.footer.height, 6);
        assert_eq!(
            rects.top.height + rects.hero.height + rects.footer.height,
            24
        );
    }

    #[test]
    fn footer_columns_split_the_band() {
        let rects = shell_layout(Rect::new(0, 0, 80, 24), 6);
        assert_eq!(
            rects.footer_left.width + rects.footer_right.width,
            rects.footer.width
        );
        assert_eq!(rects.footer_left.y, rects.footer.y);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let rects = shell_layout(Rect::new(0, 0, 10, 4), 9);
        assert!(rects.footer.height >= 3);
        assert!(rects.hero.height <= 4);
    }
}
