//! Ground sets the continuous relaxations optimise over.

use bed_core::Intervention;

/// A finite ground set whose subsets map to intervention batches.
pub trait GroundSet {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns true when the ground set has no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Batch performed when exactly the elements flagged in `mask` are chosen.
    fn realise(&self, mask: &[bool]) -> Vec<Intervention>;
}

/// Nodes of the graph: a subset becomes one new intervention appended to
/// the interventions already fixed for the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerturbationTargets<'a> {
    nodes: usize,
    fixed: &'a [Intervention],
}

impl<'a> PerturbationTargets<'a> {
    /// Ground set over `nodes` nodes appended after `fixed`.
    pub fn new(nodes: usize, fixed: &'a [Intervention]) -> Self {
        Self { nodes, fixed }
    }
}

impl GroundSet for PerturbationTargets<'_> {
    fn len(&self) -> usize {
        self.nodes
    }

    fn realise(&self, mask: &[bool]) -> Vec<Intervention> {
        let mut batch = self.fixed.to_vec();
        batch.push(selected(mask));
        batch
    }
}

/// A menu of candidate interventions, such as a separating system; a subset
/// is performed as the batch of the chosen candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterventionMenu<'a> {
    candidates: &'a [Intervention],
}

impl<'a> InterventionMenu<'a> {
    /// Ground set over `candidates`.
    pub fn new(candidates: &'a [Intervention]) -> Self {
        Self { candidates }
    }
}

impl GroundSet for InterventionMenu<'_> {
    fn len(&self) -> usize {
        self.candidates.len()
    }

    fn realise(&self, mask: &[bool]) -> Vec<Intervention> {
        self.candidates
            .iter()
            .zip(mask)
            .filter(|(_, &chosen)| chosen)
            .map(|(candidate, _)| candidate.clone())
            .collect()
    }
}

/// Indices flagged in `mask`, in increasing order.
pub(crate) fn selected(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, &chosen)| chosen)
        .map(|(idx, _)| idx)
        .collect()
}
