//! Clue Graph - the prerequisite relation between authored clues.
//!
//! Nodes are the distinct clue ids in definition order. Edges point from a
//! clue to each of its prerequisites and only exist when both ends are real
//! clues; dangling references are the validator's concern, not the graph's.

use std::collections::{HashMap, HashSet};

use story_model::{ClueDefinition, ClueId};

#[derive(Debug, Clone)]
struct Node {
    id: ClueId,
    /// Position of the defining clue in the story's clue list.
    position: usize,
    /// Indices of prerequisite nodes.
    prerequisites: Vec<usize>,
    /// Indices of nodes that list this one as a prerequisite.
    dependents: Vec<usize>,
}

/// DFS marks for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Index over the prerequisite relation of a story.
#[derive(Debug, Clone, Default)]
pub struct ClueGraph {
    nodes: Vec<Node>,
    index: HashMap<ClueId, usize>,
}

impl ClueGraph {
    /// Build the graph from a clue list.
    ///
    /// When an id is defined more than once the first definition wins.
    pub fn build(clues: &[ClueDefinition]) -> Self {
        let mut graph = Self::default();

        for (position, clue) in clues.iter().enumerate() {
            if graph.index.contains_key(&clue.id) {
                continue;
            }
            graph.index.insert(clue.id.clone(), graph.nodes.len());
            graph.nodes.push(Node {
                id: clue.id.clone(),
                position,
                prerequisites: Vec::new(),
                dependents: Vec::new(),
            });
        }

        for node in 0..graph.nodes.len() {
            let clue = &clues[graph.nodes[node].position];
            for prereq in &clue.prerequisites {
                if let Some(&target) = graph.index.get(prereq) {
                    graph.nodes[node].prerequisites.push(target);
                    graph.nodes[target].dependents.push(node);
                }
            }
        }

        graph
    }

    /// Number of distinct clues.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no clues.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a clue in the graph.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position in the story's clue list of the clue defining `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&node| self.nodes[node].position)
    }

    /// Existing prerequisites of a clue.
    pub fn prerequisites_of(&self, id: &str) -> Vec<&ClueId> {
        self.index
            .get(id)
            .map(|&node| {
                self.nodes[node]
                    .prerequisites
                    .iter()
                    .map(|&target| &self.nodes[target].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Clues that directly list `id` as a prerequisite.
    pub fn dependents_of(&self, id: &str) -> Vec<&ClueId> {
        self.index
            .get(id)
            .map(|&node| {
                self.nodes[node]
                    .dependents
                    .iter()
                    .map(|&source| &self.nodes[source].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find one prerequisite cycle, if any.
    ///
    /// Three-colour depth-first search over every clue in definition order.
    /// The first back-edge into an in-progress node ends the search; the
    /// returned path starts and ends on the same clue, each step pointing at
    /// a prerequisite of the previous one.
    pub fn find_cycle(&self) -> Option<Vec<ClueId>> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];

        for root in 0..self.nodes.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // (node, next prerequisite to visit)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            marks[root] = Mark::InProgress;

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&prereq) = self.nodes[node].prerequisites.get(frame.1) else {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[prereq] {
                    Mark::Unvisited => {
                        marks[prereq] = Mark::InProgress;
                        stack.push((prereq, 0));
                    }
                    Mark::InProgress => {
                        let start = stack
                            .iter()
                            .position(|&(entry, _)| entry == prereq)
                            .unwrap_or(0);
                        let mut cycle: Vec<ClueId> = stack[start..]
                            .iter()
                            .map(|&(entry, _)| self.nodes[entry].id.clone())
                            .collect();
                        cycle.push(self.nodes[prereq].id.clone());
                        return Some(cycle);
                    }
                    Mark::Done => {}
                }
            }
        }

        None
    }

    /// Whether every member can be unlocked when only prerequisites inside
    /// the group count.
    ///
    /// Prerequisites outside `members` are treated as satisfied. Members that
    /// are not clues of this graph can never unlock.
    pub fn completes_within(&self, members: &[ClueId]) -> bool {
        let group: HashSet<&str> = members.iter().map(ClueId::as_str).collect();
        if group.is_empty() {
            return false;
        }

        let mut unlocked: HashSet<usize> = HashSet::new();
        let mut progress = true;

        while progress {
            progress = false;
            for member in &group {
                let Some(&node) = self.index.get(*member) else {
                    continue;
                };
                if unlocked.contains(&node) {
                    continue;
                }

                let blocked = self.nodes[node].prerequisites.iter().any(|&prereq| {
                    group.contains(self.nodes[prereq].id.as_str()) && !unlocked.contains(&prereq)
                });

                if !blocked {
                    unlocked.insert(node);
                    progress = true;
                }
            }
        }

        unlocked.len() == group.len()
    }
}
