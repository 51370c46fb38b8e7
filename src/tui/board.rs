// Keyboard driver for the feature selector
//
// The selector expects pointer-style events (click a label, drag a feature
// onto another). Here a cursor walks a flattened list of rows and keys are
// translated into those events.

use crate::model::{Feature, Id};
use crate::selector::{DragState, FeatureSelector, Mode, SelectorEffect};
use crossterm::event::{KeyCode, KeyEvent};

/// One line of the rendered board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Feature(Id),
    Type { feature: Id, ty: Id },
}

impl Row {
    pub fn feature_id(&self) -> Id {
        match *self {
            Row::Feature(id) => id,
            Row::Type { feature, .. } => feature,
        }
    }
}

/// Features in display order, each followed by its types
pub fn rows(features: &[Feature]) -> Vec<Row> {
    features
        .iter()
        .flat_map(|f| {
            std::iter::once(Row::Feature(f.id)).chain(
                f.types
                    .iter()
                    .map(move |t| Row::Type { feature: f.id, ty: t.id }),
            )
        })
        .collect()
}

/// Result of a key press on the board
#[derive(Debug, Clone, PartialEq)]
pub enum BoardKey {
    /// Key consumed, maybe with work for the page
    Handled(Option<SelectorEffect>),
    /// Not a board key
    Ignored,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoardCursor {
    index: usize,
}

impl BoardCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Row under the cursor, clamped to the current rows
    pub fn current(&mut self, features: &[Feature]) -> Option<Row> {
        let rows = rows(features);
        if rows.is_empty() {
            self.index = 0;
            return None;
        }
        self.index = self.index.min(rows.len() - 1);
        rows.get(self.index).copied()
    }

    fn move_by(&mut self, features: &[Feature], delta: isize) {
        let len = rows(features).len();
        if len == 0 {
            self.index = 0;
            return;
        }
        let next = self.index as isize + delta;
        self.index = next.clamp(0, len as isize - 1) as usize;
    }

    /// Translate a key into selector events
    ///
    /// Moving the cursor while renaming blurs the input, which commits it.
    pub fn handle_key(
        &mut self,
        selector: &mut FeatureSelector,
        features: &[Feature],
        key: KeyEvent,
    ) -> BoardKey {
        let renaming = selector.editing().is_some();

        match key.code {
            KeyCode::Up | KeyCode::Down => {
                let blurred = selector.commit();
                let delta = if key.code == KeyCode::Up { -1 } else { 1 };
                self.move_by(features, delta);
                BoardKey::Handled(blurred)
            }
            KeyCode::Enter if renaming => BoardKey::Handled(selector.commit()),
            KeyCode::Esc if renaming => {
                selector.cancel_rename();
                BoardKey::Handled(None)
            }
            KeyCode::Backspace if renaming => {
                selector.pop_char();
                BoardKey::Handled(None)
            }
            KeyCode::Char(c) if renaming => {
                selector.push_char(c);
                BoardKey::Handled(None)
            }
            KeyCode::Esc if selector.drag() != DragState::Idle => {
                selector.drag_cancel();
                BoardKey::Handled(None)
            }
            KeyCode::Char('e') => {
                selector.toggle_mode();
                BoardKey::Handled(None)
            }
            KeyCode::Char('d') if selector.mode() == Mode::Edit => {
                if let Some(Row::Feature(id)) = self.current(features) {
                    selector.drag_start(id);
                }
                BoardKey::Handled(None)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(row) = self.current(features) else {
                    return BoardKey::Handled(None);
                };
                if let DragState::Dragging { .. } = selector.drag() {
                    return BoardKey::Handled(selector.drag_drop(features, row.feature_id()));
                }
                let effect = match row {
                    Row::Feature(id) => selector.click_feature(features, id),
                    Row::Type { ty, .. } => selector.click_type(features, ty),
                };
                BoardKey::Handled(effect)
            }
            _ => BoardKey::Ignored,
        }
    }

    /// Follow a feature after it moved
    pub fn focus_feature(&mut self, features: &[Feature], id: Id) {
        if let Some(idx) = rows(features).iter().position(|r| *r == Row::Feature(id)) {
            self.index = idx;
        }
    }
}
