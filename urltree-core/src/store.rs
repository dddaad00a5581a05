use crate::data::{LINK_TREE_SLOT, SELECTED_LINKS_SLOT, SlotStore};
use crate::error::StoreError;
use crate::model::{ExportedSelection, SelectedLink, SelectionTreeNode, UrlNode};
use crate::tree;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use urltree_scanner::Extraction;

/// What `restore` managed to load. Missing or unreadable slots leave the
/// corresponding state untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub tree_restored: bool,
    pub selections_restored: bool,
}

/// Owns the full link tree, the highlighted link and the selection list.
///
/// There is exactly one writer: whoever holds `&mut LinkTreeStore`. Handlers
/// get the store passed in instead of reaching for a global.
#[derive(Default)]
pub struct LinkTreeStore {
    link_tree: Vec<UrlNode>,
    highlighted: Option<UrlNode>,
    selections: Vec<SelectedLink>,
    selection_tree: Vec<SelectionTreeNode>,
    slots: Option<Box<dyn SlotStore>>,
}

impl LinkTreeStore {
    /// A store with no persistence medium; `persist`/`restore` do nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(slots: Box<dyn SlotStore>) -> Self {
        Self {
            slots: Some(slots),
            ..Self::default()
        }
    }

    /// Whether `persist` actually writes anywhere.
    pub fn has_medium(&self) -> bool {
        self.slots.is_some()
    }

    pub fn take_slots(&mut self) -> Option<Box<dyn SlotStore>> {
        self.slots.take()
    }

    // Getters

    pub fn tree(&self) -> &[UrlNode] {
        &self.link_tree
    }

    pub fn highlighted(&self) -> Option<&UrlNode> {
        self.highlighted.as_ref()
    }

    pub fn selections(&self) -> &[SelectedLink] {
        &self.selections
    }

    pub fn selection_tree(&self) -> &[SelectionTreeNode] {
        &self.selection_tree
    }

    pub fn selected_count(&self) -> usize {
        self.selections.len()
    }

    pub fn has_selections(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selections.iter().any(|link| link.id == id)
    }

    // Tree actions

    pub fn set_tree(&mut self, tree: Vec<UrlNode>) {
        self.link_tree = tree;
        self.highlighted = None;
        self.sync_tree_flags();
    }

    pub fn clear(&mut self) {
        self.link_tree.clear();
        self.highlighted = None;
    }

    /// Load the children of node `parent_id` from an extraction. Returns
    /// false when the tree has no such node.
    pub fn expand_node(&mut self, parent_id: &str, extraction: &Extraction) -> bool {
        if !tree::attach_extraction(&mut self.link_tree, parent_id, extraction) {
            return false;
        }
        self.sync_tree_flags();
        true
    }

    /// Highlight a single link. Independent of the selection list.
    pub fn select(&mut self, link: UrlNode) {
        self.highlighted = Some(link);
    }

    // Selection actions

    /// Remove the link if one with the same id is selected, otherwise
    /// append it. Returns whether the link is selected afterwards.
    pub fn toggle_selection(&mut self, link: SelectedLink) -> bool {
        let now_selected = match self.position(&link.id) {
            Some(index) => {
                self.selections.remove(index);
                false
            }
            None => {
                self.selections.push(link);
                true
            }
        };
        self.selections_changed();
        now_selected
    }

    pub fn remove_selection(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.selections.remove(index);
        self.selections_changed();
        true
    }

    pub fn clear_selections(&mut self) {
        self.selections.clear();
        self.selections_changed();
    }

    /// Append unless already present by id. Returns whether it was added.
    pub fn add_to_selection(&mut self, link: SelectedLink) -> bool {
        if self.is_selected(&link.id) {
            return false;
        }
        self.selections.push(link);
        self.selections_changed();
        true
    }

    pub fn export_selections(&self) -> Vec<ExportedSelection> {
        self.selections.iter().map(ExportedSelection::from).collect()
    }

    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        tree::set_selection_expanded(&mut self.selection_tree, id, expanded)
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        tree::set_all_selection_expanded(&mut self.selection_tree, expanded);
    }

    // Persistence

    /// Write the tree and the selection list to their slots.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let Some(slots) = self.slots.as_mut() else {
            debug!("No persistence medium, skipping persist");
            return Ok(());
        };

        let tree_json = serde_json::to_string(&self.link_tree)?;
        let selections_json = serde_json::to_string(&self.selections)?;
        slots.put(LINK_TREE_SLOT, &tree_json)?;
        slots.put(SELECTED_LINKS_SLOT, &selections_json)?;

        debug!(
            "Persisted {} tree nodes and {} selections",
            tree::count_nodes(&self.link_tree),
            self.selections.len()
        );
        Ok(())
    }

    /// Load the tree and selection list from their slots. Never fails: a
    /// missing slot or one that does not parse is logged and skipped.
    pub fn restore(&mut self) -> RestoreOutcome {
        let Some(slots) = self.slots.as_deref() else {
            debug!("No persistence medium, skipping restore");
            return RestoreOutcome::default();
        };

        let restored_tree: Option<Vec<UrlNode>> = read_slot(slots, LINK_TREE_SLOT);
        let restored_selections: Option<Vec<SelectedLink>> = read_slot(slots, SELECTED_LINKS_SLOT);

        let outcome = RestoreOutcome {
            tree_restored: restored_tree.is_some(),
            selections_restored: restored_selections.is_some(),
        };

        if let Some(tree) = restored_tree {
            self.link_tree = tree;
        }
        if let Some(selections) = restored_selections {
            self.selections = selections;
            self.selection_tree =
                tree::build_selection_tree(&self.selections, &self.selection_tree);
        }
        if outcome.tree_restored || outcome.selections_restored {
            self.sync_tree_flags();
        }
        outcome
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.selections.iter().position(|link| link.id == id)
    }

    fn selections_changed(&mut self) {
        self.selection_tree = tree::build_selection_tree(&self.selections, &self.selection_tree);
        self.sync_tree_flags();
    }

    fn sync_tree_flags(&mut self) {
        let selections = &self.selections;
        tree::for_each_mut(&mut self.link_tree, &mut |node| {
            node.is_selected = selections.iter().any(|link| link.id == node.id);
        });
    }
}

fn read_slot<T: DeserializeOwned>(slots: &dyn SlotStore, key: &str) -> Option<T> {
    match slots.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable {} slot: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read {} slot: {}", key, e);
            None
        }
    }
}
