// Feature board panel
//
// Renders the selector widget: each feature label followed by its type
// chips. Chips are tinted with the feature color at the type's shade. The
// title shows the widget mode and any drag in progress.

use super::formatters::truncate;
use crate::color::Rgb;
use crate::model::{Feature, FeatureType};
use crate::pages::{FeatureBoard, SelectionSet};
use crate::selector::{DragState, EditTarget, Mode};
use crate::tui::board::{rows, BoardCursor, Row};
use crate::tui::theme::{contrast_text, to_color, Theme};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Everything the panel needs to draw one board
pub struct BoardView<'a> {
    pub board: &'a FeatureBoard,
    pub selected: &'a SelectionSet,
    pub cursor: BoardCursor,
    pub focused: bool,
}

pub fn render(f: &mut Frame, area: Rect, view: BoardView<'_>, theme: &Theme) {
    let BoardView {
        board,
        selected,
        mut cursor,
        focused,
    } = view;
    let selector = &board.selector;
    let features = board.items();

    let title = match (selector.mode(), selector.drag()) {
        (Mode::Select, _) => " Features [select] ".to_string(),
        (Mode::Edit, DragState::Dragging { source }) => {
            let name = features
                .iter()
                .find(|f| f.id == source)
                .map(|f| f.name.as_str())
                .unwrap_or("?");
            format!(" Features [moving {}] ", name)
        }
        (Mode::Edit, _) => " Features [edit] ".to_string(),
    };
    let title_color = if selector.mode() == Mode::Edit {
        theme.edit_mode
    } else {
        theme.title
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(Span::styled(title, Style::default().fg(title_color)));

    if features.is_empty() {
        let empty = List::new([ListItem::new(Span::styled(
            "No features yet",
            theme.muted_style(),
        ))])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = rows(features)
        .into_iter()
        .filter_map(|row| match row {
            Row::Feature(id) => features
                .iter()
                .find(|f| f.id == id)
                .map(|feature| feature_line(feature, board, theme, width)),
            Row::Type { feature, ty } => features
                .iter()
                .find(|f| f.id == feature)
                .and_then(|parent| parent.find_type(ty).map(|t| (parent, t)))
                .map(|(parent, t)| type_line(parent, t, board, selected, theme, width)),
        })
        .map(ListItem::new)
        .collect();

    let highlight = if focused {
        theme.selected_style()
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if cursor.current(features).is_some() {
        state.select(Some(cursor.index()));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Text of a label, or the live edit value when it is being renamed
fn label(board: &FeatureBoard, target: EditTarget, name: &str) -> (String, bool) {
    if board.selector.editing() == Some(target) {
        (format!("{}▏", board.selector.edit_value()), true)
    } else {
        (name.to_string(), false)
    }
}

fn feature_line(feature: &Feature, board: &FeatureBoard, theme: &Theme, width: usize) -> Line<'static> {
    let (text, renaming) = label(board, EditTarget::Feature(feature.id), &feature.name);
    let swatch = Rgb::parse_hex(&feature.color)
        .map(to_color)
        .unwrap_or(theme.muted);

    let mut style = Style::default().fg(theme.fg).add_modifier(Modifier::BOLD);
    if renaming {
        style = style.fg(theme.edit_mode).add_modifier(Modifier::UNDERLINED);
    }
    if board.selector.drag().source() == Some(feature.id) {
        style = style.fg(theme.drag).add_modifier(Modifier::ITALIC);
    }

    Line::from(vec![
        Span::styled("■ ", Style::default().fg(swatch)),
        Span::styled(truncate(&text, width.saturating_sub(2)), style),
    ])
}

fn type_line(
    parent: &Feature,
    ty: &FeatureType,
    board: &FeatureBoard,
    selected: &SelectionSet,
    theme: &Theme,
    width: usize,
) -> Line<'static> {
    let (text, renaming) = label(board, EditTarget::Type(ty.id), &ty.name);
    let background = theme.tint(&parent.color, ty.shade.alpha());

    let mut chip = Style::default().bg(background).fg(contrast_text(background));
    if renaming {
        chip = chip.add_modifier(Modifier::UNDERLINED);
    }

    let marker = match board.selector.mode() {
        Mode::Select if selected.contains(ty.id) => "  [x] ",
        Mode::Select => "  [ ] ",
        Mode::Edit => "      ",
    };

    Line::from(vec![
        Span::styled(marker, theme.muted_style()),
        Span::styled(
            format!(" {} ", truncate(&text, width.saturating_sub(10))),
            chip,
        ),
        Span::styled(format!(" {}", ty.shade.initial()), theme.muted_style()),
    ])
}
