//! Index selection (§4.5 "Indices").
//!
//! Each `IndexDecl` on a table names one or more attribute subsequences
//! ("key sequences"); a query with some attribute positions already bound
//! (by a literal term or an earlier-bound variable) picks the most
//! selective declared key sequence, across all indices, whose positions
//! are a subset of the bound set — selectivity is approximated by the
//! number of bound attribute positions the sequence covers, with ties
//! broken by declaration order. No usable sequence falls back to a full
//! scan.

use flix_ir::Schema;

/// One selectable index key: the owning `IndexDecl`'s name plus the
/// resolved attribute positions of one of its key sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedIndex {
    pub index_name: String,
    pub positions: Vec<usize>,
}

fn position_of(schema: &Schema, attr: &str) -> Option<usize> {
    schema.attribute_names().iter().position(|n| *n == attr)
}

/// Picks the most selective index key sequence whose positions are
/// entirely covered by `bound`; ties break by declaration order.
/// `None` means fall back to a scan.
pub fn select_index(schema: &Schema, bound: &[usize]) -> Option<SelectedIndex> {
    let mut best: Option<SelectedIndex> = None;
    for index in &schema.indices {
        for key in &index.keys {
            let positions: Option<Vec<usize>> = key.iter().map(|attr| position_of(schema, attr)).collect();
            let Some(positions) = positions else { continue };
            if !positions.iter().all(|p| bound.contains(p)) {
                continue;
            }
            let better = match &best {
                None => true,
                Some(current) => positions.len() > current.positions.len(),
            };
            if better {
                best = Some(SelectedIndex { index_name: index.name.to_string(), positions });
            }
        }
    }
    best
}
