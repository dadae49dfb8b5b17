//! Lineage graph accessor.
//!
//! A view over the directed "child derived from parent" relation. The
//! relation is many-to-many and DAG-shaped: a dataset may have several
//! parents and several children, but edge creation refuses anything that
//! would close a cycle, so traversals never need cycle detection.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::db::entities::{dataset, lineage_edge};
use crate::error::Result;

/// One dataset adjacent to the queried one
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineageEntry {
    pub name: String,
    pub hash: String,
}

/// Direct predecessors and successors of one dataset (one hop only;
/// deeper traversal is a caller responsibility)
#[derive(Clone, Debug, Default, Serialize)]
pub struct Lineage {
    pub parents: Vec<LineageEntry>,
    pub children: Vec<LineageEntry>,
}

/// Fetch the one-hop neighborhood of `hash`.
pub(crate) async fn neighbors<C: ConnectionTrait>(db: &C, hash: &str) -> Result<Lineage> {
    let parent_edges = lineage_edge::Entity::find()
        .filter(lineage_edge::Column::ChildHash.eq(hash))
        .all(db)
        .await?;
    let child_edges = lineage_edge::Entity::find()
        .filter(lineage_edge::Column::ParentHash.eq(hash))
        .all(db)
        .await?;

    // One lookup for every related dataset's display name
    let mut related: Vec<String> = parent_edges
        .iter()
        .map(|e| e.parent_hash.clone())
        .chain(child_edges.iter().map(|e| e.child_hash.clone()))
        .collect();
    related.sort();
    related.dedup();

    let names: HashMap<String, String> = dataset::Entity::find()
        .filter(dataset::Column::Hash.is_in(related))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.hash, d.name))
        .collect();

    let entry = |h: &str| LineageEntry {
        name: names.get(h).cloned().unwrap_or_default(),
        hash: h.to_string(),
    };

    Ok(Lineage {
        parents: parent_edges.iter().map(|e| entry(&e.parent_hash)).collect(),
        children: child_edges.iter().map(|e| entry(&e.child_hash)).collect(),
    })
}

/// Whether a path `from -> ... -> to` exists following derivation direction.
///
/// Breadth-first over the edge table. Used at edge-creation time: an edge
/// `parent -> child` may only be added if `child` does not already reach
/// `parent`.
pub(crate) async fn reaches<C: ConnectionTrait>(db: &C, from: &str, to: &str) -> Result<bool> {
    if from == to {
        return Ok(true);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    seen.insert(from.to_string());
    queue.push_back(from.to_string());

    while let Some(current) = queue.pop_front() {
        let edges = lineage_edge::Entity::find()
            .filter(lineage_edge::Column::ParentHash.eq(current.as_str()))
            .all(db)
            .await?;
        for edge in edges {
            if edge.child_hash == to {
                return Ok(true);
            }
            if seen.insert(edge.child_hash.clone()) {
                queue.push_back(edge.child_hash);
            }
        }
    }

    Ok(false)
}
