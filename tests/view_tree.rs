//! View tree tests - split geometry, focus and dirty-line fan-out

use quill::model::{NodeKind, Rect, SplitAxis, TextBuffer, ViewTree};
use quill::render::{MemorySurface, PlainHighlighter};

fn tree(text: &str, rows: usize, cols: usize) -> ViewTree {
    let mut tree = ViewTree::new(TextBuffer::from_text(text), 4);
    tree.resize(Rect::new(0, 0, rows, cols));
    tree
}

fn rect_of(tree: &ViewTree, index: usize) -> Rect {
    let leaf = tree.leaves()[index];
    tree.view(leaf).expect("leaf has a view").rect()
}

fn drain(tree: &mut ViewTree, rows: usize, cols: usize) {
    tree.render(&mut MemorySurface::new(rows, cols), &PlainHighlighter)
        .unwrap();
}

// ========================================================================
// Split geometry
// ========================================================================

#[test]
fn test_horizontal_split_divides_rows_in_half() {
    let mut tree = tree("text", 20, 80);
    let secondary = tree.split(SplitAxis::Horizontal, None);

    let leaves = tree.leaves();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[1], secondary);
    assert_eq!(rect_of(&tree, 0), Rect::new(0, 0, 10, 80));
    assert_eq!(rect_of(&tree, 1), Rect::new(10, 0, 10, 80));
}

#[test]
fn test_vertical_split_divides_columns() {
    let mut tree = tree("text", 20, 80);
    tree.split(SplitAxis::Vertical, Some(30));
    assert_eq!(rect_of(&tree, 0), Rect::new(0, 0, 20, 30));
    assert_eq!(rect_of(&tree, 1), Rect::new(0, 30, 20, 50));
}

#[test]
fn test_primary_keeps_focus_after_split() {
    let mut tree = tree("text", 20, 80);
    let secondary = tree.split(SplitAxis::Vertical, None);
    let primary = tree.leaves()[0];

    assert_eq!(tree.active_leaf(), primary);
    assert!(tree.view(primary).unwrap().is_focused());
    assert!(!tree.view(secondary).unwrap().is_focused());
}

#[test]
fn test_split_copies_cursor_and_buffer() {
    let mut tree = tree("one\ntwo\nthree", 20, 80);
    tree.set_cursor(2, 3);
    let secondary = tree.split(SplitAxis::Horizontal, None);

    let view = tree.view(secondary).unwrap();
    assert_eq!((view.cursor().line, view.cursor().column), (2, 3));
    assert_eq!(view.buffer_id(), tree.active_buffer_view().buffer_id());
}

#[test]
fn test_split_position_is_clamped() {
    let mut tree = tree("text", 20, 80);
    tree.split(SplitAxis::Vertical, Some(0));
    assert_eq!(rect_of(&tree, 0).cols, 1);
    assert_eq!(rect_of(&tree, 1).cols, 79);

    let mut tree = self::tree("text", 20, 80);
    tree.split(SplitAxis::Horizontal, Some(500));
    assert_eq!(rect_of(&tree, 0).rows, 19);
    assert_eq!(rect_of(&tree, 1).rows, 1);
}

#[test]
fn test_resize_scales_split_position() {
    let mut tree = tree("text", 20, 80);
    tree.split(SplitAxis::Vertical, Some(20));
    tree.resize(Rect::new(0, 0, 10, 40));

    assert_eq!(rect_of(&tree, 0), Rect::new(0, 0, 10, 10));
    assert_eq!(rect_of(&tree, 1), Rect::new(0, 10, 10, 30));

    tree.resize(Rect::new(1, 0, 10, 120));
    assert_eq!(rect_of(&tree, 0), Rect::new(1, 0, 10, 30));
    assert_eq!(rect_of(&tree, 1), Rect::new(1, 30, 10, 90));
}

#[test]
fn test_nested_splits_partition_the_screen() {
    let mut tree = tree("text", 20, 80);
    tree.split(SplitAxis::Vertical, None);
    tree.split(SplitAxis::Horizontal, None);

    assert_eq!(tree.leaves().len(), 3);
    assert_eq!(rect_of(&tree, 0), Rect::new(0, 0, 10, 40));
    assert_eq!(rect_of(&tree, 1), Rect::new(10, 0, 10, 40));
    assert_eq!(rect_of(&tree, 2), Rect::new(0, 40, 20, 40));

    let total: usize = tree
        .leaves()
        .iter()
        .map(|&id| {
            let rect = tree.view(id).unwrap().rect();
            rect.rows * rect.cols
        })
        .sum();
    assert_eq!(total, 20 * 80);
}

// ========================================================================
// Unsplit and focus
// ========================================================================

#[test]
fn test_unsplit_at_root_is_a_no_op() {
    let mut tree = tree("text", 20, 80);
    assert!(!tree.unsplit());
    assert_eq!(tree.leaves(), vec![tree.root()]);
}

#[test]
fn test_unsplit_keeps_the_focused_pane() {
    let mut tree = tree("one\ntwo", 20, 80);
    tree.split(SplitAxis::Vertical, None);
    let secondary = tree.focus_next();
    tree.set_cursor(1, 2);
    assert_eq!(tree.active_leaf(), secondary);

    assert!(tree.unsplit());
    let leaves = tree.leaves();
    assert_eq!(leaves, vec![tree.root()]);

    let view = tree.active_buffer_view();
    assert_eq!(view.rect(), Rect::new(0, 0, 20, 80));
    assert_eq!((view.cursor().line, view.cursor().column), (1, 2));
    assert!(view.is_focused());
    assert!(matches!(
        tree.node(tree.root()).map(|node| &node.kind),
        Some(NodeKind::Leaf(_))
    ));
}

#[test]
fn test_focus_next_wraps_in_depth_first_order() {
    let mut tree = tree("text", 20, 80);
    tree.split(SplitAxis::Vertical, None);
    tree.split(SplitAxis::Horizontal, None);
    let leaves = tree.leaves();

    assert_eq!(tree.active_leaf(), leaves[0]);
    assert_eq!(tree.focus_next(), leaves[1]);
    assert_eq!(tree.focus_next(), leaves[2]);
    assert_eq!(tree.focus_next(), leaves[0]);

    let focused: Vec<bool> = leaves
        .iter()
        .map(|&id| tree.view(id).unwrap().is_focused())
        .collect();
    assert_eq!(focused, vec![true, false, false]);
}

#[test]
fn test_focus_clamps_a_stale_cursor() {
    let mut tree = tree("a\nb\nc", 20, 80);
    tree.set_cursor(2, 0);
    tree.split(SplitAxis::Vertical, None);
    let primary = tree.leaves()[0];

    tree.focus_next();
    tree.splice(0, 1, "", 4);
    assert_eq!(tree.active_buffer().text(), "a");

    assert!(tree.focus(primary));
    let cursor = tree.active_buffer_view().cursor();
    assert_eq!((cursor.line, cursor.column), (0, 1));
}

#[test]
fn test_leaf_at_finds_pane_under_cell() {
    let mut tree = tree("text", 20, 80);
    let secondary = tree.split(SplitAxis::Vertical, None);
    let primary = tree.leaves()[0];

    assert_eq!(tree.leaf_at(5, 10), Some(primary));
    assert_eq!(tree.leaf_at(5, 40), Some(secondary));
    assert_eq!(tree.leaf_at(25, 10), None);
}

// ========================================================================
// Dirty-line fan-out
// ========================================================================

#[test]
fn test_splice_repaints_every_view_of_the_buffer() {
    let mut tree = tree("one\ntwo\nthree", 20, 80);
    let secondary = tree.split(SplitAxis::Horizontal, None);
    drain(&mut tree, 20, 80);

    tree.splice(1, 0, "X", 0);
    let primary = tree.leaves()[0];
    assert_eq!(tree.view(primary).unwrap().pending_rows().collect::<Vec<_>>(), vec![1]);
    assert_eq!(tree.view(secondary).unwrap().pending_rows().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_splice_leaves_other_buffers_alone() {
    let mut tree = tree("one\ntwo", 20, 80);
    let secondary = tree.split(SplitAxis::Horizontal, None);
    let other = tree.add_buffer(TextBuffer::from_text("elsewhere"));

    tree.focus(secondary);
    tree.show_buffer(other).unwrap();
    let primary = tree.leaves()[0];
    tree.focus(primary);
    drain(&mut tree, 20, 80);

    tree.splice(0, 0, "Z", 0);
    assert_eq!(tree.view(secondary).unwrap().pending_rows().count(), 0);
    assert_eq!(tree.buffer(other).unwrap().text(), "elsewhere");
    assert_eq!(tree.active_buffer().text(), "Zone\ntwo");
}

#[test]
fn test_show_unknown_buffer_is_a_lookup_error() {
    let mut tree = tree("text", 20, 80);
    let missing = tree.add_buffer(TextBuffer::new());
    let missing = quill::model::BufferId(missing.0 + 1);
    assert!(matches!(
        tree.show_buffer(missing),
        Err(quill::EditorError::Lookup(_))
    ));
}

#[test]
fn test_render_paints_each_pane_in_place() {
    let mut tree = tree("left side", 4, 40);
    tree.split(SplitAxis::Vertical, Some(20));
    let mut surface = MemorySurface::new(4, 40);
    tree.render(&mut surface, &PlainHighlighter).unwrap();

    assert_eq!(surface.row_text(0), "   1 left side         1 left side");
    assert_eq!(surface.row_text(1), "   ~                   ~");
    assert_eq!(tree.cursor_screen_position(), Some((0, 5)));
}
