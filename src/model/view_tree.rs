//! View tree - split panes over shared buffers
//!
//! Nodes live in an arena addressed by [`NodeId`]. Each split remembers
//! which child is active, so the focused leaf is found by following active
//! pointers from the root. Parents are plain index back-references.

use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::buffer::{BufferListener, Splice, TextBuffer};
use super::view::{BufferView, Rect};
use crate::error::EditorError;
use crate::render::{Color, Highlighter, Surface};

// ============================================================================
// Identifiers
// ============================================================================

/// Index into the view tree's buffer arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// Index into the view tree's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

// ============================================================================
// Nodes
// ============================================================================

/// Axis a split divides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitAxis {
    /// Stacked panes; divides rows
    Horizontal,
    /// Side-by-side panes; divides columns
    #[default]
    Vertical,
}

impl SplitAxis {
    /// Size of `rect` along this axis
    pub fn extent(self, rect: Rect) -> usize {
        match self {
            SplitAxis::Horizontal => rect.rows,
            SplitAxis::Vertical => rect.cols,
        }
    }
}

impl FromStr for SplitAxis {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(SplitAxis::Horizontal),
            "vertical" | "v" => Ok(SplitAxis::Vertical),
            _ => Err(EditorError::Parse(format!("unknown split axis: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub axis: SplitAxis,
    /// Size of the primary pane along `axis`
    pub position: usize,
    /// Extent along `axis` when `position` was chosen
    pub span: usize,
    pub primary: NodeId,
    pub secondary: NodeId,
    pub active: NodeId,
}

impl Split {
    fn other(&self, child: NodeId) -> NodeId {
        if child == self.primary {
            self.secondary
        } else {
            self.primary
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf(BufferView),
    Split(Split),
    /// Freed slot awaiting reuse
    Vacant,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub rect: Rect,
    pub kind: NodeKind,
}

// ============================================================================
// View Tree
// ============================================================================

#[derive(Debug, Clone)]
pub struct ViewTree {
    buffers: Vec<TextBuffer>,
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl ViewTree {
    /// A single full-size leaf over `buffer`
    pub fn new(buffer: TextBuffer, gutter_width: usize) -> Self {
        Self::with_view(buffer, BufferView::new(BufferId(0), gutter_width))
    }

    pub fn with_gutter_color(buffer: TextBuffer, gutter_width: usize, color: Color) -> Self {
        Self::with_view(
            buffer,
            BufferView::new(BufferId(0), gutter_width).with_gutter_color(color),
        )
    }

    fn with_view(buffer: TextBuffer, view: BufferView) -> Self {
        Self {
            buffers: vec![buffer],
            nodes: vec![Node {
                parent: None,
                rect: Rect::default(),
                kind: NodeKind::Leaf(view),
            }],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.0)
            .filter(|node| !matches!(node.kind, NodeKind::Vacant))
    }

    pub fn add_buffer(&mut self, buffer: TextBuffer) -> BufferId {
        self.buffers.push(buffer);
        BufferId(self.buffers.len() - 1)
    }

    pub fn buffer(&self, id: BufferId) -> Option<&TextBuffer> {
        self.buffers.get(id.0)
    }

    /// Point the active leaf at another buffer
    pub fn show_buffer(&mut self, id: BufferId) -> Result<(), EditorError> {
        if id.0 >= self.buffers.len() {
            return Err(EditorError::Lookup(format!("no buffer {}", id.0)));
        }
        let leaf = self.active_leaf();
        let buffer = &self.buffers[id.0];
        if let NodeKind::Leaf(view) = &mut self.nodes[leaf.0].kind {
            view.attach(id, buffer);
        }
        Ok(())
    }

    /// Follow active pointers from the root to the focused leaf
    pub fn active_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let NodeKind::Split(split) = &self.nodes[id.0].kind {
            id = split.active;
        }
        id
    }

    pub fn active_buffer_view(&self) -> &BufferView {
        match &self.nodes[self.active_leaf().0].kind {
            NodeKind::Leaf(view) => view,
            _ => unreachable!("active path always ends at a leaf"),
        }
    }

    pub fn active_buffer(&self) -> &TextBuffer {
        &self.buffers[self.active_buffer_view().buffer_id().0]
    }

    /// Mutable access to the focused view together with its buffer
    pub fn active_parts(&mut self) -> (&mut BufferView, &TextBuffer) {
        let leaf = self.active_leaf();
        match &mut self.nodes[leaf.0].kind {
            NodeKind::Leaf(view) => {
                let buffer = &self.buffers[view.buffer_id().0];
                (view, buffer)
            }
            _ => unreachable!("active path always ends at a leaf"),
        }
    }

    pub fn set_cursor(&mut self, line: isize, column: isize) {
        let (view, buffer) = self.active_parts();
        view.set_cursor(buffer, line, column);
    }

    /// Splice the focused view's buffer and notify every view over it
    pub fn splice(&mut self, line: isize, column: isize, insert: &str, delete: isize) -> Splice {
        let id = self.active_buffer_view().buffer_id();
        let buffer = &mut self.buffers[id.0];
        let mut listeners: Vec<&mut dyn BufferListener> = self
            .nodes
            .iter_mut()
            .filter_map(|node| match &mut node.kind {
                NodeKind::Leaf(view) if view.buffer_id() == id => {
                    Some(view as &mut dyn BufferListener)
                }
                _ => None,
            })
            .collect();
        buffer.splice_with(line, column, insert, delete, &mut listeners)
    }

    /// Leaves in depth-first order, primary before secondary
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.nodes[id.0].kind {
                NodeKind::Leaf(_) => leaves.push(id),
                NodeKind::Split(split) => {
                    stack.push(split.secondary);
                    stack.push(split.primary);
                }
                NodeKind::Vacant => {}
            }
        }
        leaves
    }

    pub fn view(&self, id: NodeId) -> Option<&BufferView> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Leaf(view) => Some(view),
            _ => None,
        }
    }

    /// The leaf whose rectangle holds the screen cell
    pub fn leaf_at(&self, row: usize, col: usize) -> Option<NodeId> {
        self.leaves()
            .into_iter()
            .find(|&id| self.nodes[id.0].rect.contains(row, col))
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Lay the whole tree out inside `rect`
    pub fn resize(&mut self, rect: Rect) {
        self.resize_node(self.root, rect);
        self.assert_invariants();
    }

    fn resize_node(&mut self, id: NodeId, rect: Rect) {
        self.nodes[id.0].rect = rect;
        let children = match &mut self.nodes[id.0].kind {
            NodeKind::Leaf(view) => {
                view.resize(rect);
                None
            }
            NodeKind::Split(split) => {
                let extent = split.axis.extent(rect);
                let position = if split.span == 0 {
                    extent / 2
                } else {
                    split.position * extent / split.span
                };
                let (first, second) = partition(rect, split.axis, position.min(extent));
                Some(((split.primary, first), (split.secondary, second)))
            }
            NodeKind::Vacant => None,
        };
        if let Some(((primary, first), (secondary, second))) = children {
            self.resize_node(primary, first);
            self.resize_node(secondary, second);
        }
    }

    /// Split the focused pane; the primary half keeps focus
    ///
    /// `position` is the size of the primary pane along `axis`, defaulting
    /// to half. It is clamped so both panes keep at least one cell when the
    /// pane is large enough.
    pub fn split(&mut self, axis: SplitAxis, position: Option<usize>) -> NodeId {
        let leaf = self.active_leaf();
        let rect = self.nodes[leaf.0].rect;
        let extent = axis.extent(rect);
        let position = position.unwrap_or(extent / 2);
        let position = if extent >= 2 {
            position.clamp(1, extent - 1)
        } else {
            position.min(extent)
        };

        let NodeKind::Leaf(view) = &self.nodes[leaf.0].kind else {
            unreachable!("active path always ends at a leaf");
        };
        let primary_view = view.clone();
        let mut secondary_view = view.clone();
        secondary_view.set_focus(false);

        let primary = self.alloc(Node {
            parent: Some(leaf),
            rect: Rect::default(),
            kind: NodeKind::Leaf(primary_view),
        });
        let secondary = self.alloc(Node {
            parent: Some(leaf),
            rect: Rect::default(),
            kind: NodeKind::Leaf(secondary_view),
        });

        self.nodes[leaf.0].kind = NodeKind::Split(Split {
            axis,
            position,
            span: extent,
            primary,
            secondary,
            active: primary,
        });
        self.resize_node(leaf, rect);
        tracing::debug!(?axis, position, extent, "split pane");
        self.assert_invariants();
        secondary
    }

    /// Collapse the focused pane's parent split into the focused pane
    ///
    /// Returns false at the root, where there is nothing to collapse.
    pub fn unsplit(&mut self) -> bool {
        let leaf = self.active_leaf();
        let Some(parent) = self.nodes[leaf.0].parent else {
            return false;
        };
        let NodeKind::Split(split) = &self.nodes[parent.0].kind else {
            return false;
        };
        let sibling = split.other(leaf);

        let kind = std::mem::replace(&mut self.nodes[leaf.0].kind, NodeKind::Vacant);
        self.free.push(leaf);
        self.release(sibling);
        self.nodes[parent.0].kind = kind;

        let rect = self.nodes[parent.0].rect;
        self.resize_node(parent, rect);
        tracing::debug!(node = parent.0, "collapsed split");
        self.assert_invariants();
        true
    }

    /// Move focus to the next leaf in depth-first order, wrapping around
    pub fn focus_next(&mut self) -> NodeId {
        let leaves = self.leaves();
        let current = self.active_leaf();
        let index = leaves.iter().position(|&id| id == current).unwrap_or(0);
        let next = leaves[(index + 1) % leaves.len()];
        self.focus(next);
        next
    }

    /// Make `target` the focused leaf, repointing every split on its path
    pub fn focus(&mut self, target: NodeId) -> bool {
        if !matches!(self.nodes.get(target.0).map(|n| &n.kind), Some(NodeKind::Leaf(_))) {
            return false;
        }
        for id in self.leaves() {
            if let NodeKind::Leaf(view) = &mut self.nodes[id.0].kind {
                view.set_focus(id == target);
            }
        }
        let mut child = target;
        while let Some(parent) = self.nodes[child.0].parent {
            if let NodeKind::Split(split) = &mut self.nodes[parent.0].kind {
                split.active = child;
            }
            child = parent;
        }

        // Edits made through another pane may have shortened the buffer
        let (view, buffer) = self.active_parts();
        let cursor = view.cursor();
        view.set_cursor(buffer, cursor.line as isize, cursor.column as isize);
        true
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Paint every row the views have scheduled
    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        highlighter: &dyn Highlighter,
    ) -> io::Result<()> {
        for node in &mut self.nodes {
            if let NodeKind::Leaf(view) = &mut node.kind {
                let buffer = &self.buffers[view.buffer_id().0];
                view.render(buffer, surface, highlighter)?;
            }
        }
        Ok(())
    }

    /// Schedule a full repaint of every pane
    pub fn invalidate(&mut self) {
        for node in &mut self.nodes {
            if let NodeKind::Leaf(view) = &mut node.kind {
                view.invalidate();
            }
        }
    }

    pub fn cursor_screen_position(&self) -> Option<(usize, usize)> {
        self.active_buffer_view().cursor_screen_position()
    }

    // ========================================================================
    // Arena
    // ========================================================================

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let kind = std::mem::replace(&mut self.nodes[id.0].kind, NodeKind::Vacant);
        self.nodes[id.0].parent = None;
        self.free.push(id);
        if let NodeKind::Split(split) = kind {
            self.release(split.primary);
            self.release(split.secondary);
        }
    }

    /// Verify layout and focus invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let leaves = self.leaves();
        let focused = leaves
            .iter()
            .filter(|&&id| self.view(id).is_some_and(BufferView::is_focused))
            .count();
        assert_eq!(focused, 1, "exactly one leaf must have focus");
        assert!(
            self.view(self.active_leaf()).is_some_and(BufferView::is_focused),
            "active path must end at the focused leaf"
        );

        for node in &self.nodes {
            if let NodeKind::Split(split) = &node.kind {
                let first = self.nodes[split.primary.0].rect;
                let second = self.nodes[split.secondary.0].rect;
                let total = split.axis.extent(first) + split.axis.extent(second);
                assert_eq!(
                    total,
                    split.axis.extent(node.rect),
                    "split children must partition their parent"
                );
            }
        }
    }

    #[cfg(not(debug_assertions))]
    pub fn assert_invariants(&self) {}
}

/// Divide `rect` at `position` along `axis`
fn partition(rect: Rect, axis: SplitAxis, position: usize) -> (Rect, Rect) {
    match axis {
        SplitAxis::Horizontal => (
            Rect { rows: position, ..rect },
            Rect {
                row: rect.row + position,
                rows: rect.rows - position,
                ..rect
            },
        ),
        SplitAxis::Vertical => (
            Rect { cols: position, ..rect },
            Rect {
                col: rect.col + position,
                cols: rect.cols - position,
                ..rect
            },
        ),
    }
}
