use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppResult;
use crate::services::SortKey;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Case-insensitive substring of the endpoint name
    #[param(default = "")]
    pub q: Option<String>,
    /// `name_ascending`, `name_descending`, `id_ascending`, `latency_ascending`
    /// or a picker label such as `Name Z-A`
    #[param(default = "name_ascending")]
    pub sort: Option<String>,
}

impl ListParams {
    pub fn sort_key(&self) -> AppResult<SortKey> {
        match self.sort.as_deref() {
            None | Some("") => Ok(SortKey::default()),
            Some(s) => s.parse(),
        }
    }
}

