//! Deterministic topological ordering of a [Program] (Kahn's algorithm).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, instrument};

use crate::error::CycleError;
use crate::types::{NodeId, Program, SourcePosition};

/// Orders every node so each value edge's `from` precedes its `to`.
///
/// Only data/return/input edges constrain the order. Nodes that become ready at the same time
/// run in source order (line, then column). Edges whose endpoints are missing are ignored here;
/// the validator reports them.
#[instrument(level = "trace", skip(program), fields(node_count = program.nodes.len()))]
pub fn schedule(program: &Program) -> Result<Vec<NodeId>, CycleError> {
  let mut positions: HashMap<NodeId, SourcePosition> = HashMap::new();
  for node in &program.nodes {
    positions.entry(node.id).or_insert(node.position);
  }

  let mut in_degree: HashMap<NodeId, usize> = positions.keys().map(|id| (*id, 0)).collect();
  let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
  for edge in &program.edges {
    if !edge.flow.carries_value()
      || !positions.contains_key(&edge.from)
      || !positions.contains_key(&edge.to)
    {
      continue;
    }
    successors.entry(edge.from).or_default().push(edge.to);
    *in_degree.entry(edge.to).or_default() += 1;
  }

  let mut ready: BinaryHeap<Reverse<(SourcePosition, NodeId)>> = in_degree
    .iter()
    .filter(|(_, degree)| **degree == 0)
    .map(|(id, _)| Reverse((positions[id], *id)))
    .collect();

  let mut order = Vec::with_capacity(positions.len());
  while let Some(Reverse((_, id))) = ready.pop() {
    order.push(id);
    for next in successors.get(&id).into_iter().flatten() {
      if let Some(degree) = in_degree.get_mut(next) {
        *degree -= 1;
        if *degree == 0 {
          ready.push(Reverse((positions[next], *next)));
        }
      }
    }
  }

  if order.len() != positions.len() {
    let mut stuck: Vec<(SourcePosition, NodeId)> = in_degree
      .iter()
      .filter(|(_, degree)| **degree > 0)
      .map(|(id, _)| (positions[id], *id))
      .collect();
    stuck.sort();
    let nodes: Vec<NodeId> = stuck.into_iter().map(|(_, id)| id).collect();
    debug!(unscheduled = nodes.len(), "cycle detected");
    return Err(CycleError { nodes });
  }

  debug!(scheduled = order.len(), "schedule computed");
  Ok(order)
}
