//! Feature/feature-type selection and inline editing widget
//!
//! The selector is pure state: it never talks to the network. Every user
//! action returns an optional [`SelectorEffect`] that the hosting page
//! executes through its [`CatalogApi`](crate::client::CatalogApi).
//!
//! In Select mode clicking a type toggles it in the page's selection. In
//! Edit mode clicking a label starts an inline rename, and features can be
//! dragged onto each other to reorder them.

mod drag;

pub use drag::{reorder, DragState};

use crate::model::{Feature, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Select,
    Edit,
}

/// What an in-progress rename applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Feature(Id),
    Type(Id),
}

/// Work for the hosting page to carry out
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEffect {
    /// Add or remove a type id from the page's selection
    ToggleType(Id),
    RenameFeature { id: Id, name: String },
    RenameType { id: Id, name: String },
    /// Optimistic new ordering, plus the ordering it replaces
    Reorder {
        features: Vec<Feature>,
        previous: Vec<Feature>,
    },
}

impl SelectorEffect {
    /// Feature ids in the order a reorder should persist
    pub fn reorder_ids(&self) -> Option<Vec<Id>> {
        match self {
            SelectorEffect::Reorder { features, .. } => {
                Some(features.iter().map(|f| f.id).collect())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureSelector {
    mode: Mode,
    editing: Option<EditTarget>,
    edit_value: String,
    drag: DragState,
}

impl FeatureSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn editing(&self) -> Option<EditTarget> {
        self.editing
    }

    pub fn edit_value(&self) -> &str {
        &self.edit_value
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Switch between Select and Edit, abandoning any rename or drag
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Select => Mode::Edit,
            Mode::Edit => Mode::Select,
        };
        self.cancel_rename();
        self.drag.cancel();
    }

    /// Click on a feature label
    ///
    /// Returns the effect of a rename that the click blurred, if any.
    pub fn click_feature(&mut self, features: &[Feature], id: Id) -> Option<SelectorEffect> {
        if self.mode != Mode::Edit {
            return None;
        }
        let name = features.iter().find(|f| f.id == id)?.name.clone();
        let blurred = self.commit();
        self.begin_rename(EditTarget::Feature(id), name);
        blurred
    }

    /// Click on a type chip
    pub fn click_type(&mut self, features: &[Feature], type_id: Id) -> Option<SelectorEffect> {
        match self.mode {
            Mode::Select => Some(SelectorEffect::ToggleType(type_id)),
            Mode::Edit => {
                let name = features
                    .iter()
                    .find_map(|f| f.find_type(type_id))?
                    .name
                    .clone();
                let blurred = self.commit();
                self.begin_rename(EditTarget::Type(type_id), name);
                blurred
            }
        }
    }

    fn begin_rename(&mut self, target: EditTarget, current: String) {
        self.editing = Some(target);
        self.edit_value = current;
    }

    pub fn set_edit_value(&mut self, value: impl Into<String>) {
        if self.editing.is_some() {
            self.edit_value = value.into();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.editing.is_some() {
            self.edit_value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.editing.is_some() {
            self.edit_value.pop();
        }
    }

    /// Finish the rename (Enter or blur)
    ///
    /// A blank value ends the rename without an effect. Otherwise the
    /// trimmed name is emitted and the rename ends whatever the server says.
    pub fn commit(&mut self) -> Option<SelectorEffect> {
        let target = self.editing.take()?;
        let name = std::mem::take(&mut self.edit_value).trim().to_string();
        if name.is_empty() {
            return None;
        }

        Some(match target {
            EditTarget::Feature(id) => SelectorEffect::RenameFeature { id, name },
            EditTarget::Type(id) => SelectorEffect::RenameType { id, name },
        })
    }

    pub fn cancel_rename(&mut self) {
        self.editing = None;
        self.edit_value.clear();
    }

    /// Pick up a feature (Edit mode only)
    pub fn drag_start(&mut self, id: Id) {
        if self.mode == Mode::Edit {
            self.drag.start(id);
        }
    }

    /// Drop the dragged feature onto `target`
    ///
    /// Yields the reordered list for optimistic display and persistence.
    pub fn drag_drop(&mut self, features: &[Feature], target: Id) -> Option<SelectorEffect> {
        if self.mode != Mode::Edit {
            return None;
        }
        self.drag.drop_on(target);
        let (source, target) = self.drag.finish()?;
        let reordered = reorder(features, source, target)?;

        Some(SelectorEffect::Reorder {
            features: reordered,
            previous: features.to_vec(),
        })
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }
}
