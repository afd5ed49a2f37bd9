/// Per-window sort and dedupe passes
///
/// A pass runs through the stages Fetching → Building → Ordering →
/// Deduplicating → Culling. At most one pass runs per window; a request for a
/// window that is already being processed is dropped. Whatever happens inside
/// a pass, the window is released when it ends.
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, info, warn};

use crate::compare::order_cmp;
use crate::dedupe::{find_duplicates, plan_cull, CullPlan};
use crate::descriptor::{is_blank_url, ContainerIndex, PassCache, TabDescriptor};
use crate::error::{Result, SorterError};
use crate::host::TabHost;
use crate::prefs::{Preferences, SortMode};
use crate::tab_data::{TabId, TabQuery, TabRecord, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    Fetching,
    Building,
    Ordering,
    Deduplicating,
    Culling,
}

impl fmt::Display for PassStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassStage::Fetching => "fetching",
            PassStage::Building => "building",
            PassStage::Ordering => "ordering",
            PassStage::Deduplicating => "deduplicating",
            PassStage::Culling => "culling",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassSummary {
    pub moved: usize,
    pub removed: usize,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// Another pass already owns the window
    Skipped,
    /// The window has no unpinned tabs
    Empty,
    Completed(PassSummary),
    /// A browser call failed; the window was released regardless
    Aborted { stage: PassStage, error: SorterError },
}

impl fmt::Display for PassOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassOutcome::Skipped => f.write_str("skipped"),
            PassOutcome::Empty => f.write_str("empty"),
            PassOutcome::Completed(s) => write!(
                f,
                "completed: moved {}, removed {}, created {}",
                s.moved, s.removed, s.created
            ),
            PassOutcome::Aborted { stage, error } => write!(f, "aborted while {}: {}", stage, error),
        }
    }
}

/// Entry point for browser events
pub struct Sorter<H> {
    host: H,
    prefs: RefCell<Preferences>,
    processing: RefCell<HashSet<WindowId>>,
}

impl<H: TabHost> Sorter<H> {
    pub fn new(host: H, prefs: Preferences) -> Sorter<H> {
        Sorter {
            host,
            prefs: RefCell::new(prefs),
            processing: RefCell::new(HashSet::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs.borrow().clone()
    }

    /// Merge changed preference values; they apply from the next pass on
    pub fn on_preferences_changed(&self, changes: &HashMap<String, String>) {
        let applied = self.prefs.borrow_mut().apply_changes(changes);
        debug!("Applied {} of {} preference changes", applied, changes.len());
    }

    pub fn is_processing(&self, window_id: WindowId) -> bool {
        self.processing.borrow().contains(&window_id)
    }

    /// Toolbar button click
    pub async fn on_action(&self, window_id: WindowId) -> PassOutcome {
        self.run_pass(window_id).await
    }

    /// Tab update; only a finished load of an unpinned, non-blank tab
    /// triggers a pass, and only when enabled
    ///
    /// Blank tabs are skipped because a pass may itself open a placeholder,
    /// whose load would otherwise start the next pass.
    pub async fn on_tab_updated(&self, tab: &TabRecord) -> Option<PassOutcome> {
        if !tab.is_complete()
            || tab.pinned
            || is_blank_url(tab.url())
            || !self.prefs.borrow().sort_on_tab_complete
        {
            return None;
        }
        Some(self.run_pass(tab.window_id).await)
    }

    pub async fn run_pass(&self, window_id: WindowId) -> PassOutcome {
        let Some(_guard) = WindowGuard::acquire(&self.processing, window_id) else {
            debug!("Window {} is already being processed", window_id);
            return PassOutcome::Skipped;
        };

        let prefs = self.preferences();
        let mut pass = WindowPass::new(&self.host, window_id, prefs);
        let result = pass.run().await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("Window {} pass failed while {}: {}", window_id, pass.stage, error);
                PassOutcome::Aborted {
                    stage: pass.stage,
                    error,
                }
            }
        };
        info!("Window {} pass {}", window_id, outcome);
        outcome
    }
}

/// Marks a window as processing until dropped
struct WindowGuard<'a> {
    processing: &'a RefCell<HashSet<WindowId>>,
    window_id: WindowId,
}

impl<'a> WindowGuard<'a> {
    fn acquire(processing: &'a RefCell<HashSet<WindowId>>, window_id: WindowId) -> Option<Self> {
        if !processing.borrow_mut().insert(window_id) {
            return None;
        }
        Some(WindowGuard {
            processing,
            window_id,
        })
    }
}

impl Drop for WindowGuard<'_> {
    fn drop(&mut self) {
        self.processing.borrow_mut().remove(&self.window_id);
    }
}

/// State of one pass over one window; dropped when the pass ends
struct WindowPass<'a, H> {
    host: &'a H,
    window_id: WindowId,
    prefs: Preferences,
    cache: PassCache,
    stage: PassStage,
    summary: PassSummary,
}

impl<'a, H: TabHost> WindowPass<'a, H> {
    fn new(host: &'a H, window_id: WindowId, prefs: Preferences) -> Self {
        WindowPass {
            host,
            window_id,
            prefs,
            cache: PassCache::new(),
            stage: PassStage::Fetching,
            summary: PassSummary::default(),
        }
    }

    fn enter(&mut self, stage: PassStage) {
        debug!("Window {}: {}", self.window_id, stage);
        self.stage = stage;
    }

    async fn run(&mut self) -> Result<PassOutcome> {
        self.enter(PassStage::Fetching);
        let tabs = self.fetch().await?;
        if tabs.is_empty() {
            debug!("Window {} has no unpinned tabs", self.window_id);
            return Ok(PassOutcome::Empty);
        }

        self.enter(PassStage::Building);
        let descriptors = self.build(&tabs).await;

        self.enter(PassStage::Ordering);
        let descriptors = self.order(descriptors).await?;

        if self.prefs.remove_duplicates {
            self.enter(PassStage::Deduplicating);
            let keep = find_duplicates(&descriptors);
            let plan = plan_cull(&descriptors, &keep, self.prefs.remove_blank_tabs);

            self.enter(PassStage::Culling);
            self.cull(plan).await?;
        }

        Ok(PassOutcome::Completed(self.summary.clone()))
    }

    async fn fetch(&self) -> Result<Vec<TabRecord>> {
        let query = TabQuery {
            pinned: false,
            window_id: self.window_id,
        };
        let mut tabs = self.host.query_tabs(query).await?;
        // Pinned tabs must never be moved or removed
        tabs.retain(|t| !t.pinned);
        Ok(tabs)
    }

    async fn build(&mut self, tabs: &[TabRecord]) -> Vec<TabDescriptor> {
        let containers = self.containers().await;
        tabs.iter()
            .map(|t| TabDescriptor::build(t, &mut self.cache, &containers, &self.prefs))
            .collect()
    }

    async fn containers(&self) -> ContainerIndex {
        if !self.prefs.group_by_container {
            return ContainerIndex::default();
        }
        match self.host.query_containers().await {
            Ok(Some(containers)) => ContainerIndex::new(&containers),
            Ok(None) => ContainerIndex::default(),
            Err(e) => {
                warn!("Container lookup failed, ignoring containers: {}", e);
                ContainerIndex::default()
            }
        }
    }

    /// Sort the descriptors and move the tabs if their order changed
    async fn order(&mut self, mut descriptors: Vec<TabDescriptor>) -> Result<Vec<TabDescriptor>> {
        let mode = self.prefs.sort_mode;
        if mode == SortMode::None {
            return Ok(descriptors);
        }

        let before: Vec<TabId> = descriptors.iter().map(|d| d.id).collect();
        descriptors.sort_by(|a, b| order_cmp(mode, a, b));
        let after: Vec<TabId> = descriptors.iter().map(|d| d.id).collect();

        if before != after {
            let first_index = descriptors.iter().map(|d| d.index).min().unwrap_or(0);
            self.host.move_tabs(&after, first_index).await?;
            self.summary.moved = after.len();
        }
        Ok(descriptors)
    }

    async fn cull(&mut self, plan: CullPlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }
        if plan.create_placeholder {
            self.host.create_tab(self.window_id, true).await?;
            self.summary.created = true;
        }
        if !plan.remove.is_empty() {
            self.host.remove_tabs(&plan.remove).await?;
            self.summary.removed = plan.remove.len();
        }
        Ok(())
    }
}
