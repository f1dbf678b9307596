mod tree_part;

pub(crate) use tree_part::recursive_tree_part;
