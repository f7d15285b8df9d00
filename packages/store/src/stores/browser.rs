use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::models::{current_timestamp, new_id, BrowserTab, TabPatch};

const HOME_TAB_ID: &str = "t1";
const HOME_URL: &str = "https://example.org";

/// Tabs of the in-app browser, newest first, plus the active tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredBrowser", rename_all = "camelCase")]
pub struct BrowserState {
    tabs: Collection<BrowserTab>,
    /// Written as `null` once the last tab is closed.
    active_tab_id: Option<String>,
}

/// Blob shape on load. A blob without `tabs` is a fresh store; a missing
/// `activeTabId` means no tab is active.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBrowser {
    tabs: Option<Collection<BrowserTab>>,
    active_tab_id: Option<String>,
}

impl From<StoredBrowser> for BrowserState {
    fn from(stored: StoredBrowser) -> Self {
        match stored.tabs {
            Some(tabs) => Self {
                tabs,
                active_tab_id: stored.active_tab_id,
            },
            None => Self::default(),
        }
    }
}

impl Default for BrowserState {
    /// A single home tab, active.
    fn default() -> Self {
        let home = BrowserTab {
            id: HOME_TAB_ID.to_string(),
            url: HOME_URL.to_string(),
            title: None,
            created_at: current_timestamp(),
        };
        Self {
            tabs: Collection::from(vec![home]),
            active_tab_id: Some(HOME_TAB_ID.to_string()),
        }
    }
}

impl BrowserState {
    pub fn tabs(&self) -> &Collection<BrowserTab> {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn active(&self) -> Option<&BrowserTab> {
        self.tabs.get(self.active_tab_id.as_deref()?)
    }

    /// Open a tab in front of the others and make it active.
    pub fn add_tab(&mut self, url: impl Into<String>) -> String {
        let tab = BrowserTab {
            id: new_id(),
            url: url.into(),
            title: None,
            created_at: current_timestamp(),
        };
        let id = tab.id.clone();
        self.tabs.prepend(tab);
        self.active_tab_id = Some(id.clone());
        id
    }

    /// Close a tab. Closing the active tab activates the first remaining one.
    pub fn close_tab(&mut self, id: &str) -> Option<BrowserTab> {
        let closed = self.tabs.remove(id)?;
        if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = self.tabs.iter().next().map(|t| t.id.clone());
        }
        Some(closed)
    }

    /// Activate an existing tab. Unknown ids leave the active tab unchanged.
    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.tabs.contains(id) {
            return false;
        }
        self.active_tab_id = Some(id.to_string());
        true
    }

    pub fn update_tab(&mut self, id: &str, patch: TabPatch) -> bool {
        self.tabs.modify(id, |tab| {
            if let Some(url) = patch.url {
                tab.url = url;
            }
            if let Some(title) = patch.title {
                tab.title = Some(title);
            }
        })
    }
}
