mod algorithm;
mod ops;
mod partition;
mod partition_set;

pub(crate) use algorithm::recursive_tree_part;
pub(crate) use partition::Partition;
pub(self) use partition_set::PartitionSet;
