/// JavaScript bridge: browser APIs in, event handlers out
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::error::{Result, SorterError};
use crate::host::TabHost;
use crate::prefs::Preferences;
use crate::sorter::Sorter;
use crate::tab_data::{ContainerInfo, TabId, TabQuery, TabRecord, WindowId};

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveTabs(tab_ids: JsValue, index: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(window_id: i32, active: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTabs(tab_ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryContainers() -> Result<JsValue, JsValue>;
}

/// `TabHost` backed by the WebExtension `tabs` and `contextualIdentities` APIs
pub struct JsTabHost;

impl TabHost for JsTabHost {
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<TabRecord>> {
        let tabs_js = queryTabs(to_js(&query)?)
            .await
            .map_err(|e| host_error("tabs.query", e))?;
        from_js(tabs_js, "tabs")
    }

    async fn move_tabs(&self, ids: &[TabId], index: i32) -> Result<()> {
        moveTabs(to_js(&ids)?, index)
            .await
            .map_err(|e| host_error("tabs.move", e))
    }

    async fn create_tab(&self, window_id: WindowId, active: bool) -> Result<TabRecord> {
        let tab_js = createTab(window_id, active)
            .await
            .map_err(|e| host_error("tabs.create", e))?;
        from_js(tab_js, "created tab")
    }

    async fn remove_tabs(&self, ids: &[TabId]) -> Result<()> {
        removeTabs(to_js(&ids)?)
            .await
            .map_err(|e| host_error("tabs.remove", e))
    }

    async fn query_containers(&self) -> Result<Option<Vec<ContainerInfo>>> {
        let containers_js = queryContainers()
            .await
            .map_err(|e| host_error("contextualIdentities.query", e))?;
        if containers_js.is_null() || containers_js.is_undefined() {
            return Ok(None);
        }
        from_js(containers_js, "containers").map(Some)
    }
}

fn host_error(op: &'static str, e: JsValue) -> SorterError {
    SorterError::host(op, format!("{:?}", e))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| SorterError::Decode(format!("{:?}", e)))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| SorterError::Decode(format!("{}: {:?}", what, e)))
}

/// Preference maps from storage; a missing map means defaults
fn preference_map(value: JsValue) -> Result<HashMap<String, String>> {
    if value.is_null() || value.is_undefined() {
        return Ok(HashMap::new());
    }
    from_js(value, "preferences")
}

fn to_js_error(e: SorterError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle given to the background script
#[wasm_bindgen]
pub struct TabSorter {
    inner: Rc<Sorter<JsTabHost>>,
}

#[wasm_bindgen]
impl TabSorter {
    /// `preferences` is the stored string map (or nothing, for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(preferences: JsValue) -> Result<TabSorter, JsValue> {
        let prefs = Preferences::from_map(&preference_map(preferences).map_err(to_js_error)?);
        log::debug!("Starting with sort mode {}", prefs.sort_mode);
        Ok(TabSorter {
            inner: Rc::new(Sorter::new(JsTabHost, prefs)),
        })
    }

    #[wasm_bindgen(js_name = onActionClicked)]
    pub fn on_action_clicked(&self, window_id: i32) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let outcome = inner.on_action(window_id).await;
            Ok(JsValue::from_str(&outcome.to_string()))
        })
    }

    /// Resolves to the pass outcome, or `undefined` when the update does not
    /// trigger a pass
    #[wasm_bindgen(js_name = onTabUpdated)]
    pub fn on_tab_updated(&self, tab: JsValue) -> Result<js_sys::Promise, JsValue> {
        let tab: TabRecord = from_js(tab, "tab").map_err(to_js_error)?;
        let inner = Rc::clone(&self.inner);
        Ok(future_to_promise(async move {
            Ok(match inner.on_tab_updated(&tab).await {
                Some(outcome) => JsValue::from_str(&outcome.to_string()),
                None => JsValue::UNDEFINED,
            })
        }))
    }

    /// `changes` maps preference keys to their new string values
    #[wasm_bindgen(js_name = onPreferencesChanged)]
    pub fn on_preferences_changed(&self, changes: JsValue) -> Result<(), JsValue> {
        let changes = preference_map(changes).map_err(to_js_error)?;
        self.inner.on_preferences_changed(&changes);
        Ok(())
    }

    #[wasm_bindgen(js_name = isProcessing)]
    pub fn is_processing(&self, window_id: i32) -> bool {
        self.inner.is_processing(window_id)
    }
}
