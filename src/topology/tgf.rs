//! Reader for the trivial graph format.
//!
//! ```text
//! 0 first
//! 1 second
//! 2
//! #
//! 0 1
//! 1 2 some label
//! ```
//! Node lines come first (`id` followed by an optional label), then a line holding only `#`,
//! then one `id1 id2` edge per line (an optional edge label is ignored). Node ids must be exactly
//! `0..N-1` in any order. Edges are undirected; self loops and repeated edges are dropped.
use std::{collections::BTreeSet, path::Path};

use crate::{PsoError, Result};

fn parse_id(token: &str, path: &Path, line_no: usize) -> Result<usize> {
    token.parse::<usize>().map_err(|_| {
        PsoError::topology(
            path,
            format!("line {line_no}: `{token}` is not a non-negative integer id"),
        )
    })
}

/// Parse TGF text into symmetric neighbour sets indexed by node id.
///
/// `path` is only used in error messages.
///
/// # Errors
///
/// Returns a [`PsoError::TopologyLoad`] if there is no `#` separator, no nodes, a malformed or
/// duplicate node id, node ids which are not dense, or an edge naming an undeclared node.
pub fn parse_tgf(text: &str, path: &Path) -> Result<Vec<BTreeSet<usize>>> {
    let mut nodes: Vec<usize> = Vec::new();
    let mut edges: Vec<(usize, usize, usize)> = Vec::new();
    let mut in_edges = false;
    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == "#" {
            if in_edges {
                return Err(PsoError::topology(
                    path,
                    format!("line {line_no}: second `#` separator"),
                ));
            }
            in_edges = true;
            continue;
        }
        let mut tokens = line.split_whitespace();
        if in_edges {
            let (Some(a), Some(b)) = (tokens.next(), tokens.next()) else {
                return Err(PsoError::topology(
                    path,
                    format!("line {line_no}: edge needs two node ids"),
                ));
            };
            edges.push((parse_id(a, path, line_no)?, parse_id(b, path, line_no)?, line_no));
        } else if let Some(id) = tokens.next() {
            nodes.push(parse_id(id, path, line_no)?);
        }
    }
    if !in_edges {
        return Err(PsoError::topology(path, "missing `#` edge section"));
    }
    if nodes.is_empty() {
        return Err(PsoError::topology(path, "no nodes declared"));
    }
    let n = nodes.len();
    let mut seen = vec![false; n];
    for &id in &nodes {
        if id >= n {
            return Err(PsoError::topology(
                path,
                format!("node id {id} out of range, ids must be 0..{n}"),
            ));
        }
        if seen[id] {
            return Err(PsoError::topology(path, format!("node id {id} declared twice")));
        }
        seen[id] = true;
    }
    let mut adjacency = vec![BTreeSet::new(); n];
    for (a, b, line_no) in edges {
        if a >= n || b >= n {
            return Err(PsoError::topology(
                path,
                format!("line {line_no}: edge {a} {b} references an undeclared node (have {n})"),
            ));
        }
        if a != b {
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        }
    }
    Ok(adjacency)
}
