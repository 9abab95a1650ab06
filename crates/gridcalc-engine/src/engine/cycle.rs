//! Affected-set computation with circular dependency detection.
//!
//! When a cell changes, every cell whose formula (transitively) mentions it
//! must be recomputed. We walk the "referenced by" edges depth-first while
//! tracking the current path; stepping back onto the path means the graph
//! has a cycle and evaluation could loop forever, so the walk is aborted.

use std::collections::HashSet;

use super::deps::DependencyIndex;
use super::error::CycleError;

struct Frame {
    name: String,
    pending: std::vec::IntoIter<String>,
}

impl Frame {
    fn enter(index: &DependencyIndex, name: &str) -> Frame {
        Frame {
            name: name.to_string(),
            pending: index.referencers(name).into_iter(),
        }
    }
}

/// Collect `start` and every name that transitively references it.
///
/// The result is in recalculation order: `start` comes first, and each name
/// appears after every other member its formula depends on. The walk uses an
/// explicit stack, so long reference chains cannot overflow the call stack.
/// Nothing is mutated; on a cycle the returned path lists names where each
/// one's formula mentions the next.
pub fn affected_set(index: &DependencyIndex, start: &str) -> Result<Vec<String>, CycleError> {
    let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
    let mut on_path: HashSet<String> = HashSet::from([start.to_string()]);
    let mut finished = Vec::new();
    let mut stack = vec![Frame::enter(index, start)];

    loop {
        let next = match stack.last_mut() {
            Some(frame) => frame.pending.next(),
            None => break,
        };

        match next {
            Some(name) if on_path.contains(&name) => {
                let from = stack.iter().position(|f| f.name == name).unwrap_or(0);
                let mut path: Vec<String> = stack[from..].iter().map(|f| f.name.clone()).collect();
                path.push(name);
                path.reverse();
                log::debug!("cycle detected while recalculating {}: {:?}", start, path);
                return Err(CycleError { path });
            }
            Some(name) => {
                if visited.insert(name.clone()) {
                    on_path.insert(name.clone());
                    stack.push(Frame::enter(index, &name));
                }
            }
            None => {
                if let Some(frame) = stack.pop() {
                    on_path.remove(&frame.name);
                    finished.push(frame.name);
                }
            }
        }
    }

    finished.reverse();
    Ok(finished)
}
