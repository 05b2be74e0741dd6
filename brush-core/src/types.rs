/// Identifier for a branch in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`. Ids are only meaningful within
/// the lifetime of a given `Tree` and are reassigned whenever the tree is
/// compacted after a prune.
pub type BranchId = usize;
