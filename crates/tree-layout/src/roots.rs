use crate::mirror::Mirror;
use crate::LayoutError;
use petgraph::graph::NodeIndex;
use std::fmt;
use std::hash::Hash;

/// Resolve the roots a layout starts from.
///
/// Configured ids are used verbatim and in order, a repeated id moving to
/// the place of its last occurrence. Without any, the node with
/// the highest degree is picked, the lowest index winning ties. The mirror
/// must not be empty.
pub(crate) fn select_roots<N, E>(
    mirror: &Mirror<N, E>,
    configured: &[N],
) -> Result<Vec<NodeIndex>, LayoutError<N>>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    if configured.is_empty() {
        let root = mirror
            .node_indices()
            .fold(None, |best: Option<(NodeIndex, usize)>, node| {
                let degree = mirror.degree(node);
                match best {
                    Some((_, max)) if degree <= max => best,
                    _ => Some((node, degree)),
                }
            })
            .map(|(node, _)| node);
        return Ok(root.into_iter().collect());
    }

    let mut roots: Vec<NodeIndex> = Vec::with_capacity(configured.len());
    for id in configured {
        let node = mirror
            .index_of(id)
            .ok_or_else(|| LayoutError::UnknownNode(id.clone()))?;
        roots.retain(|&root| root != node);
        roots.push(node);
    }

    Ok(roots)
}
