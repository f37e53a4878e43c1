//! Video comments and the reply tree served to the frontend.

pub mod tree;
pub mod types;

pub use tree::build_tree;
pub use types::{ANONYMOUS_AUTHOR, Comment, CommentNode, NewComment};
