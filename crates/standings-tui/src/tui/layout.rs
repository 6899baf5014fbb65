// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into zones that follow the exported sheet:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Header: title, sub title, match day, date (4)     |
// +--------------------------------------------------+
// | Group 1 standings                                 |
// +--------------------------------------------------+
// | Group 2 standings  (one equal share per group)    |
// +--------------------------------------------------+
// | Footer: text and logos (5 rows)                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each editor zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub header: Rect,
    /// One area per group, top to bottom.
    pub groups: Vec<Rect>,
    pub footer: Rect,
    pub help_bar: Rect,
}

/// Build the editor layout for `group_count` groups.
pub fn build_layout(area: Rect, group_count: usize) -> AppLayout {
    // Vertical: status(1) | header(4) | groups(fill) | footer(5) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(4), // header
            Constraint::Min(3),    // groups
            Constraint::Length(5), // footer
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let groups = if group_count == 0 {
        Vec::new()
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Fill(1); group_count])
            .split(vertical[2])
            .to_vec()
    };

    AppLayout {
        status_bar: vertical[0],
        header: vertical[1],
        groups,
        footer: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area(), 2);
        let mut rects = vec![
            ("status_bar", layout.status_bar),
            ("header", layout.header),
            ("footer", layout.footer),
            ("help_bar", layout.help_bar),
        ];
        rects.extend(layout.groups.iter().map(|r| ("group", *r)));
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_heights() {
        let layout = build_layout(test_area(), 2);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.header.height, 4);
        assert_eq!(layout.footer.height, 5);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn groups_share_middle_and_stack() {
        let layout = build_layout(test_area(), 2);
        assert_eq!(layout.groups.len(), 2);
        let (a, b) = (layout.groups[0], layout.groups[1]);
        assert!(a.y < b.y);
        assert!(a.height.abs_diff(b.height) <= 1);
        assert_eq!(a.y, layout.header.y + layout.header.height);
        assert_eq!(b.y + b.height, layout.footer.y);
    }

    #[test]
    fn no_groups_before_first_snapshot() {
        let layout = build_layout(test_area(), 0);
        assert!(layout.groups.is_empty());
    }

    #[test]
    fn layout_fits_within_area() {
        let area = Rect::new(0, 0, 40, 16);
        let layout = build_layout(area, 3);
        let mut rects = vec![layout.status_bar, layout.header, layout.footer, layout.help_bar];
        rects.extend(layout.groups);
        for rect in &rects {
            assert!(rect.x + rect.width <= area.width);
            assert!(rect.y + rect.height <= area.height);
        }
    }
}
