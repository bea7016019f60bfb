use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::RngHandle;
use bed_graph::{Dag, Pdag};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::count::MecCounter;

/// How a component root is drawn while sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingMode {
    /// Roots drawn proportionally to their rooted class size; every member
    /// of the class is equally likely.
    #[default]
    Exact,
    /// Roots drawn uniformly. Always yields a class member and never needs
    /// class sizes, but is biased towards members of small rooted subclasses.
    Fast,
}

/// Draws DAGs from the equivalence class described by a [`Pdag`].
#[derive(Debug, Clone)]
pub struct MecSampler {
    counter: MecCounter,
    mode: SamplingMode,
}

impl MecSampler {
    /// Creates a sampler for the class of `pdag`.
    pub fn new(pdag: &Pdag, mode: SamplingMode) -> Self {
        Self {
            counter: MecCounter::new(pdag),
            mode,
        }
    }

    /// Returns the sampling mode.
    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// Returns the graph the sampler draws from.
    pub fn pdag(&self) -> &Pdag {
        self.counter.pdag()
    }

    /// Draws one member of the class.
    pub fn sample(&mut self, rng: &mut RngHandle) -> Result<Dag, BedError> {
        let pdag = self.counter.pdag();
        let n = pdag.num_nodes();
        let mut edges = pdag.directed_edges();
        for component in pdag.undirected_components() {
            self.sample_component(&component, rng, &mut edges)?;
        }
        Dag::from_edges(n, &edges)
    }

    /// Draws `count` independent members of the class.
    pub fn sample_many(&mut self, count: usize, rng: &mut RngHandle) -> Result<Vec<Dag>, BedError> {
        (0..count).map(|_| self.sample(rng)).collect()
    }

    fn sample_component(
        &mut self,
        component: &[usize],
        rng: &mut RngHandle,
        edges: &mut Vec<(usize, usize)>,
    ) -> Result<(), BedError> {
        if component.len() <= 1 {
            return Ok(());
        }
        let root = match self.mode {
            SamplingMode::Exact => self.weighted_root(component, rng)?,
            SamplingMode::Fast => component[rng.gen_range(0..component.len())],
        };
        let (directed, remaining) = self.counter.orient_from_root(component, root);
        edges.extend(directed);
        for sub in remaining {
            self.sample_component(&sub, rng, edges)?;
        }
        Ok(())
    }

    fn weighted_root(&mut self, component: &[usize], rng: &mut RngHandle) -> Result<usize, BedError> {
        let mut weights = Vec::with_capacity(component.len());
        let mut total: u128 = 0;
        for &root in component {
            let weight = self.counter.rooted_size(component, root)?;
            total = total.checked_add(weight).ok_or_else(|| {
                BedError::Mec(ErrorInfo::new("count-overflow", "rooted class sizes overflow"))
            })?;
            weights.push(weight);
        }
        if total == 0 {
            return Err(BedError::Mec(
                ErrorInfo::new("empty-class", "component admits no acyclic moral orientation")
                    .with_context("component_nodes", component.len())
                    .with_hint("the undirected part of an essential graph must be chordal"),
            ));
        }
        let mut draw = rng.gen_range(0..total);
        for (&root, &weight) in component.iter().zip(&weights) {
            if draw < weight {
                return Ok(root);
            }
            draw -= weight;
        }
        Ok(component[component.len() - 1])
    }
}
