/// Duplicate detection and the plan for closing unwanted tabs
use std::collections::HashMap;

use crate::compare::similarity_cmp;
use crate::descriptor::TabDescriptor;
use crate::tab_data::TabId;

/// Decide which unpinned tabs to keep
///
/// Algorithm:
/// 1. Stable-sort the descriptors with the similarity order
/// 2. Walk runs of neighbours that compare equal
/// 3. Keep one survivor per run: the active tab if there is one, otherwise
///    the tab with the lowest original index
///
/// The result maps every unpinned tab id to its keep decision.
pub fn find_duplicates(descriptors: &[TabDescriptor]) -> HashMap<TabId, bool> {
    let mut by_similarity: Vec<&TabDescriptor> =
        descriptors.iter().filter(|d| !d.is_pinned).collect();
    by_similarity.sort_by(|a, b| similarity_cmp(a, b));

    let mut keep = HashMap::with_capacity(by_similarity.len());
    for run in by_similarity.chunk_by(|a, b| similarity_cmp(a, b).is_eq()) {
        let Some(survivor) = best_survivor(run.iter().copied()) else {
            continue;
        };
        for d in run {
            keep.insert(d.id, d.id == survivor);
        }
    }
    keep
}

/// Active first, then lowest index
fn best_survivor<'a, I>(candidates: I) -> Option<TabId>
where
    I: Iterator<Item = &'a TabDescriptor>,
{
    candidates
        .min_by_key(|d| (!d.is_active, d.index))
        .map(|d| d.id)
}

/// Tabs to remove at the end of a pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullPlan {
    pub remove: Vec<TabId>,
    /// Open a fresh blank tab before removing, so the window survives
    pub create_placeholder: bool,
}

impl CullPlan {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && !self.create_placeholder
    }
}

/// Work out which tabs to close
///
/// Duplicates always go; blank tabs go when `remove_blank` is set. If that
/// would leave the window without unpinned tabs, one tab stays: a fresh
/// placeholder when the unpinned tabs start at index 0 (closing them all would
/// close the window), otherwise the best existing blank tab.
pub fn plan_cull(
    descriptors: &[TabDescriptor],
    keep: &HashMap<TabId, bool>,
    remove_blank: bool,
) -> CullPlan {
    let unpinned: Vec<&TabDescriptor> = descriptors.iter().filter(|d| !d.is_pinned).collect();
    let doomed = |d: &TabDescriptor| {
        !keep.get(&d.id).copied().unwrap_or(true) || (remove_blank && d.is_blank)
    };

    let mut plan = CullPlan {
        remove: unpinned
            .iter()
            .copied()
            .filter(|&d| doomed(d))
            .map(|d| d.id)
            .collect(),
        create_placeholder: false,
    };

    if plan.remove.is_empty() || plan.remove.len() < unpinned.len() {
        return plan;
    }

    let starts_at_zero = unpinned.iter().map(|d| d.index).min() == Some(0);
    if starts_at_zero {
        plan.create_placeholder = true;
    } else {
        let blanks = unpinned.iter().copied().filter(|d| d.is_blank);
        if let Some(spared) = best_survivor(blanks) {
            plan.remove.retain(|id| *id != spared);
        }
    }
    plan
}
