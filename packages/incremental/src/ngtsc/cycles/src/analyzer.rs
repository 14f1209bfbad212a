use crate::ngtsc::incremental::semantic_graph::src::api::{EdgeKind, SymbolId, SymbolKind};
use crate::ngtsc::incremental::semantic_graph::src::graph::SemanticDepGraph;

/// Finds the strongly connected components of a semantic graph.
///
/// Uses an explicit stack (Tarjan's algorithm without recursion) so deep
/// reference chains cannot overflow the call stack.
pub struct CycleAnalyzer {
    /// Strongly connected component index per symbol.
    component_of: Vec<usize>,
    component_sizes: Vec<usize>,
    self_loops: Vec<bool>,
}

impl CycleAnalyzer {
    /// Cycles over every edge of `graph`.
    pub fn new(graph: &SemanticDepGraph) -> Self {
        let adjacency = graph
            .ids()
            .map(|id| {
                graph
                    .edges(id)
                    .iter()
                    .filter_map(|edge| graph.id_of(&edge.target))
                    .map(SymbolId::index)
                    .collect()
            })
            .collect();
        Self::from_adjacency(adjacency)
    }

    /// Cycles of the remote-scope graph: each module points at what it
    /// declares, and every `RemoteScopeCycle` edge counts in both directions.
    /// A declared component shares a cycle with its module exactly when a
    /// chain of such edges leads back to the module.
    pub fn remote_scope(graph: &SemanticDepGraph) -> Self {
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); graph.len()];
        for (id, symbol) in graph.symbols() {
            if let SymbolKind::NgModule(module) = &symbol.kind {
                let declared = module.declarations.iter().filter_map(|key| graph.id_of(key));
                adjacency[id.index()].extend(declared.map(SymbolId::index));
            }
            for edge in graph.edges(id) {
                if edge.kind != EdgeKind::RemoteScopeCycle {
                    continue;
                }
                if let Some(target) = graph.id_of(&edge.target) {
                    adjacency[id.index()].push(target.index());
                    adjacency[target.index()].push(id.index());
                }
            }
        }
        Self::from_adjacency(adjacency)
    }

    fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Self {
        let mut analyzer = Self {
            component_of: vec![usize::MAX; adjacency.len()],
            component_sizes: Vec::new(),
            self_loops: vec![false; adjacency.len()],
        };
        analyzer.compute(&adjacency);
        analyzer
    }

    /// Whether `a` and `b` are part of the same reference cycle.
    pub fn in_same_cycle(&self, a: SymbolId, b: SymbolId) -> bool {
        if a == b {
            return self.is_cyclic(a);
        }
        self.component_of[a.index()] == self.component_of[b.index()]
    }

    /// Whether `id` lies on any reference cycle, including a self reference.
    pub fn is_cyclic(&self, id: SymbolId) -> bool {
        self.self_loops[id.index()] || self.component_sizes[self.component_of[id.index()]] > 1
    }

    fn compute(&mut self, adjacency: &[Vec<usize>]) {
        let n = adjacency.len();
        for (node, targets) in adjacency.iter().enumerate() {
            self.self_loops[node] = targets.contains(&node);
        }

        let mut index = vec![usize::MAX; n];
        let mut low_link = vec![0usize; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut next_index = 0usize;

        for root in 0..n {
            if index[root] != usize::MAX {
                continue;
            }
            // (node, position of the next edge to visit)
            let mut work: Vec<(usize, usize)> = vec![(root, 0)];
            while let Some(frame) = work.last_mut() {
                let (node, edge_pos) = *frame;
                if edge_pos == 0 && index[node] == usize::MAX {
                    index[node] = next_index;
                    low_link[node] = next_index;
                    next_index += 1;
                    stack.push(node);
                    on_stack[node] = true;
                }

                if let Some(&target) = adjacency[node].get(edge_pos) {
                    frame.1 += 1;
                    if index[target] == usize::MAX {
                        work.push((target, 0));
                    } else if on_stack[target] {
                        low_link[node] = low_link[node].min(index[target]);
                    }
                    continue;
                }

                work.pop();
                if let Some(&(parent, _)) = work.last() {
                    low_link[parent] = low_link[parent].min(low_link[node]);
                }

                if low_link[node] == index[node] {
                    let component = self.component_sizes.len();
                    let mut size = 0;
                    while let Some(member) = stack.pop() {
                        on_stack[member] = false;
                        self.component_of[member] = component;
                        size += 1;
                        if member == node {
                            break;
                        }
                    }
                    self.component_sizes.push(size);
                }
            }
        }
    }
}
