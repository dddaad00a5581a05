// Tree helpers: the selection projection and the full link tree.

use crate::model::{SelectedLink, SelectionTreeNode, UrlNode};
use std::collections::HashMap;
use urltree_scanner::Extraction;

/// Build the nested selection view from the flat list.
///
/// An entry whose `parent_url` matches another selected entry's `url` is
/// nested under it; everything else is a root. Selection order is kept at
/// every level. Entries caught in a parent cycle are appended as roots.
/// Expansion state is carried over by id from `previous`; new nodes start
/// expanded.
pub fn build_selection_tree(
    selections: &[SelectedLink],
    previous: &[SelectionTreeNode],
) -> Vec<SelectionTreeNode> {
    let mut expanded = HashMap::new();
    collect_expansion(previous, &mut expanded);

    let mut index_by_url: HashMap<&str, usize> = HashMap::new();
    for (i, link) in selections.iter().enumerate() {
        index_by_url.entry(link.url.as_str()).or_insert(i);
    }

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); selections.len()];
    let mut roots = Vec::new();

    for (i, link) in selections.iter().enumerate() {
        let parent = link
            .parent_url
            .as_deref()
            .and_then(|url| index_by_url.get(url))
            .copied();
        match parent {
            Some(p) if p != i => children_of[p].push(i),
            _ => roots.push(i),
        }
    }

    let mut visited = vec![false; selections.len()];
    let mut tree: Vec<SelectionTreeNode> = roots
        .into_iter()
        .map(|i| build_node(i, selections, &children_of, &expanded, &mut visited))
        .collect();

    for i in 0..selections.len() {
        if !visited[i] {
            tree.push(build_node(i, selections, &children_of, &expanded, &mut visited));
        }
    }

    tree
}

fn build_node(
    index: usize,
    selections: &[SelectedLink],
    children_of: &[Vec<usize>],
    expanded: &HashMap<String, bool>,
    visited: &mut [bool],
) -> SelectionTreeNode {
    visited[index] = true;
    let link = &selections[index];

    let mut children = Vec::new();
    for &child in &children_of[index] {
        if !visited[child] {
            children.push(build_node(child, selections, children_of, expanded, visited));
        }
    }

    SelectionTreeNode {
        id: link.id.clone(),
        url: link.url.clone(),
        title: link.title.clone(),
        added_at: link.added_at,
        parent_url: link.parent_url.clone(),
        level: link.level,
        children,
        is_expanded: expanded.get(&link.id).copied().unwrap_or(true),
    }
}

fn collect_expansion(nodes: &[SelectionTreeNode], out: &mut HashMap<String, bool>) {
    for node in nodes {
        out.insert(node.id.clone(), node.is_expanded);
        collect_expansion(&node.children, out);
    }
}

/// Set `is_expanded` on the node with `id`. Returns false if not found.
pub fn set_selection_expanded(nodes: &mut [SelectionTreeNode], id: &str, expanded: bool) -> bool {
    for node in nodes.iter_mut() {
        if node.id == id {
            node.is_expanded = expanded;
            return true;
        }
        if set_selection_expanded(&mut node.children, id, expanded) {
            return true;
        }
    }
    false
}

pub fn set_all_selection_expanded(nodes: &mut [SelectionTreeNode], expanded: bool) {
    for node in nodes.iter_mut() {
        node.is_expanded = expanded;
        set_all_selection_expanded(&mut node.children, expanded);
    }
}

/// Root node for `url` with one child per extracted link.
pub fn build_link_tree(url: &str, extraction: &Extraction) -> UrlNode {
    let mut root = UrlNode::root(url);
    root.children = extraction
        .links
        .iter()
        .map(|record| UrlNode::from_record(record, &root))
        .collect();
    root
}

/// Depth-first lookup by id.
pub fn find<'a>(nodes: &'a [UrlNode], id: &str) -> Option<&'a UrlNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a>(nodes: &'a mut [UrlNode], id: &str) -> Option<&'a mut UrlNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Replace the children of node `parent_id` with the extracted links.
/// Returns false when no node has that id.
pub fn attach_extraction(nodes: &mut [UrlNode], parent_id: &str, extraction: &Extraction) -> bool {
    let Some(parent) = find_mut(nodes, parent_id) else {
        return false;
    };

    parent.children = extraction
        .links
        .iter()
        .map(|record| UrlNode::from_record(record, parent))
        .collect();
    parent.is_loading = false;
    parent.is_expanded = true;
    true
}

pub fn count_nodes(nodes: &[UrlNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_nodes(&node.children))
        .sum()
}

/// Visit every node, parents before children.
pub fn for_each_mut(nodes: &mut [UrlNode], f: &mut impl FnMut(&mut UrlNode)) {
    for node in nodes.iter_mut() {
        f(node);
        for_each_mut(&mut node.children, f);
    }
}
