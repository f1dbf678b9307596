/// Total assignment of nodes to district labels, with O(1) moves and per-district member lists.
#[derive(Debug, Clone)]
pub(crate) struct PartitionSet {
    sets: Vec<Vec<usize>>,  // sets[d] = nodes currently in district d
    label: Vec<u32>,        // label[u] = d when u is in sets[d]
    position: Vec<usize>,   // position[u] = i when sets[d][i] is u
}

impl PartitionSet {
    /// Build from a complete slice of labels, each below `num_sets`.
    pub(crate) fn from_labels(num_sets: usize, labels: &[u32]) -> Self {
        assert!(num_sets > 0, "must have at least one set");

        let mut sets = vec![Vec::new(); num_sets];
        let mut position = vec![0; labels.len()];
        for (node, &set) in labels.iter().enumerate() {
            assert!((set as usize) < num_sets, "label {set} out of range [0, {num_sets})");
            position[node] = sets[set as usize].len();
            sets[set as usize].push(node);
        }

        Self { sets, label: labels.to_vec(), position }
    }

    /// Number of sets.
    #[inline] pub(crate) fn num_sets(&self) -> usize { self.sets.len() }

    /// Label of the set that `elem` is currently in.
    #[inline]
    pub(crate) fn find(&self, elem: usize) -> u32 {
        debug_assert!(elem < self.label.len(), "element out of range");
        self.label[elem]
    }

    /// Elements currently in `set`, in no particular order.
    #[inline]
    pub(crate) fn get(&self, set: u32) -> &[usize] {
        debug_assert!((set as usize) < self.sets.len(), "set out of range");
        &self.sets[set as usize]
    }

    /// Labels of every element, by element index.
    #[inline] pub(crate) fn labels(&self) -> &[u32] { &self.label }

    /// Move `elem` to `set`.
    pub(crate) fn move_to(&mut self, elem: usize, set: u32) {
        debug_assert!(elem < self.label.len(), "element out of range");
        debug_assert!((set as usize) < self.sets.len(), "set out of range");

        let (prev, pos) = (self.label[elem] as usize, self.position[elem]);
        if prev == set as usize { return }

        // Remove from previous set by swapping with last element.
        self.sets[prev].swap_remove(pos);
        if let Some(&moved) = self.sets[prev].get(pos) {
            self.position[moved] = pos;
        }

        self.label[elem] = set;
        self.position[elem] = self.sets[set as usize].len();
        self.sets[set as usize].push(elem);
    }
}
