/// The browser's tab, window and container APIs as seen by the sorter
use crate::error::Result;
use crate::tab_data::{ContainerInfo, TabId, TabQuery, TabRecord, WindowId};

/// Tab manipulation provided by the host browser
///
/// Calls suspend only while the browser works; the sorter runs on a single
/// thread, so implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// Tabs matching `query`, ordered by index
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<TabRecord>>;

    /// Move `ids` as one contiguous block starting at `index`, keeping their order
    async fn move_tabs(&self, ids: &[TabId], index: i32) -> Result<()>;

    async fn create_tab(&self, window_id: WindowId, active: bool) -> Result<TabRecord>;

    async fn remove_tabs(&self, ids: &[TabId]) -> Result<()>;

    /// All containers in a stable order, or `None` without container support
    async fn query_containers(&self) -> Result<Option<Vec<ContainerInfo>>>;
}
