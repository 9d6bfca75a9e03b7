//! Dependency ordering for parameter definitions.
//!
//! Depth-first search with three marks per node. Roots are visited in input
//! order and dependencies in the order they are listed, so identical input
//! always yields the identical order.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;

use crate::error::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

#[derive(Debug, Clone)]
pub struct TopologicalSort {
    nodes: IndexMap<String, Vec<String>>,
    raise_on_cycle: bool,
}

impl TopologicalSort {
    /// `nodes` maps every name to the names it depends on. Dependencies that
    /// are not themselves keys are ignored.
    pub fn new(nodes: IndexMap<String, Vec<String>>, raise_on_cycle: bool) -> Self {
        Self {
            nodes,
            raise_on_cycle,
        }
    }

    /// Orders all names so that each one follows its dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] with the names not yet ordered when a
    /// cycle is found and the sort was built with `raise_on_cycle`. Without
    /// it, the edge closing the cycle is skipped and every name is still
    /// returned once; the order within a cycle is not meaningful.
    pub fn sort(&self) -> Result<Vec<String>> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.nodes.len());
        let mut sorted = Vec::with_capacity(self.nodes.len());

        for name in self.nodes.keys() {
            if !marks.contains_key(name.as_str()) {
                self.visit(name, &mut marks, &mut sorted)?;
            }
        }

        Ok(sorted)
    }

    /// Visits everything reachable from `root` with an explicit stack; a frame
    /// is a node and the index of its next dependency.
    fn visit<'a>(
        &'a self,
        root: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        sorted: &mut Vec<String>,
    ) -> Result<()> {
        marks.insert(root, Mark::InProgress);
        let mut stack: Vec<(&'a str, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (name, index) = *frame;
            frame.1 += 1;

            let Some(dependency) = self.nodes.get(name).and_then(|deps| deps.get(index)) else {
                stack.pop();
                marks.insert(name, Mark::Done);
                sorted.push(name.to_string());
                continue;
            };

            let Some((key, _)) = self.nodes.get_key_value(dependency.as_str()) else {
                continue;
            };

            match marks.get(key.as_str()) {
                Some(Mark::Done) => {}
                Some(Mark::InProgress) => {
                    if self.raise_on_cycle {
                        return Err(Error::CycleDetected(self.remaining(marks)));
                    }
                    trace!("Skipping dependency edge into `{}` that closes a cycle", key);
                }
                None => {
                    marks.insert(key.as_str(), Mark::InProgress);
                    stack.push((key.as_str(), 0));
                }
            }
        }

        Ok(())
    }

    fn remaining(&self, marks: &HashMap<&str, Mark>) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|name| marks.get(name.as_str()) != Some(&Mark::Done))
            .cloned()
            .collect()
    }
}
