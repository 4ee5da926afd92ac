//! Editing model - buffers, the views onto them, and the pane tree
//!
//! Views hold buffer ids rather than buffers; the view tree owns both and
//! routes dirty-line notifications from a buffer to every view showing it.

pub mod buffer;
pub mod view;
pub mod view_tree;

pub use buffer::{BufferListener, DirtyLines, Splice, TextBuffer};
pub use view::{BufferView, Cursor, Rect, Viewport};
pub use view_tree::{BufferId, Node, NodeId, NodeKind, Split, SplitAxis, ViewTree};
