use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::EndpointRecord;
use crate::services::{Catalog, SortKey};

/// Tab shown in the detail pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetailTab {
    Method,
    #[default]
    Details,
    Security,
}

impl DetailTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Details => "details",
            Self::Security => "security",
        }
    }
}

/// Browsing state of one user over one catalog snapshot.
///
/// Selection and visibility are independent: a selected record stays
/// selected even when the current query hides it from the visible list.
#[derive(Debug, Clone)]
pub struct ExplorerSession {
    catalog: Arc<Catalog>,
    query: String,
    sort: SortKey,
    selected: Option<u64>,
    /// Whether `selected` came from an explicit `select` call
    explicit: bool,
    tab: DetailTab,
    visible: Vec<u64>,
}

/// Read-only view of a session at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    pub query: &'a str,
    pub sort: SortKey,
    pub tab: DetailTab,
    pub visible: Vec<&'a EndpointRecord>,
    pub selected: Option<&'a EndpointRecord>,
}

impl ExplorerSession {
    /// Start a session over a freshly loaded catalog. The first record by
    /// name is selected; an empty catalog leaves nothing selected.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let mut session = Self {
            catalog,
            query: String::new(),
            sort: SortKey::default(),
            selected: None,
            explicit: false,
            tab: DetailTab::default(),
            visible: Vec::new(),
        };
        session.select_default();
        session.refresh();
        session
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.refresh();
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = key;
        self.refresh();
    }

    pub fn set_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    /// Select a record by id and switch to the details tab.
    ///
    /// An id the catalog does not know clears the selection and returns
    /// `false`; that is a normal outcome, not an error.
    pub fn select(&mut self, id: u64) -> bool {
        let found = self.catalog.find_by_id(id).is_some();
        self.selected = found.then_some(id);
        self.explicit = true;
        self.tab = DetailTab::Details;
        found
    }

    /// Swap in a reloaded catalog.
    ///
    /// An explicit selection survives if its id still exists; a default
    /// selection is recomputed against the new records.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;

        if self.explicit {
            if let Some(id) = self.selected {
                if self.catalog.find_by_id(id).is_none() {
                    self.selected = None;
                }
            }
        } else {
            self.select_default();
        }

        self.refresh();
    }

    pub fn current(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            query: &self.query,
            sort: self.sort,
            tab: self.tab,
            visible: self
                .visible
                .iter()
                .filter_map(|id| self.catalog.find_by_id(*id))
                .collect(),
            selected: self.selected.and_then(|id| self.catalog.find_by_id(id)),
        }
    }

    fn select_default(&mut self) {
        self.selected = self
            .catalog
            .view("", SortKey::default())
            .first()
            .map(|record| record.id);
    }

    fn refresh(&mut self) {
        self.visible = self
            .catalog
            .view(&self.query, self.sort)
            .into_iter()
            .map(|record| record.id)
            .collect();
    }
}
