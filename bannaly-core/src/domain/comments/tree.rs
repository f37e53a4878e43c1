use std::collections::{HashMap, HashSet};

use super::types::{Comment, CommentNode};

/// Rebuild the reply tree from a flat comment list.
///
/// Roots are comments without a parent. A reply is attached under its parent
/// when the parent is in `flat`; replies whose parent is missing are dropped,
/// never promoted. Roots and every reply list are ordered by ascending
/// timestamp, ties keeping input order.
pub fn build_tree(flat: Vec<Comment>) -> Vec<CommentNode> {
    let known: HashSet<String> =
        flat.iter().map(|comment| comment.id.clone()).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<String, Vec<Comment>> = HashMap::new();

    for comment in flat {
        match comment.parent_id.clone() {
            None => roots.push(comment),
            Some(parent) if known.contains(&parent) && parent != comment.id => {
                children.entry(parent).or_default().push(comment);
            }
            Some(_) => {}
        }
    }

    roots.sort_by_key(|comment| comment.timestamp);
    roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect()
}

fn attach(
    comment: Comment,
    children: &mut HashMap<String, Vec<Comment>>,
) -> CommentNode {
    // Removing the entry before recursing makes each comment reachable at
    // most once, so parent cycles cannot recurse forever.
    let mut replies = children.remove(&comment.id).unwrap_or_default();
    replies.sort_by_key(|reply| reply.timestamp);

    CommentNode {
        comment,
        replies: replies
            .into_iter()
            .map(|reply| attach(reply, children))
            .collect(),
    }
}
