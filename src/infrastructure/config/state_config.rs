use serde::{Deserialize, Serialize};

/// UI state restored on the next start.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Title of the last open tab.
    #[serde(default)]
    pub last_tab: Option<String>,

    /// Last global company filter; `None` means all companies.
    #[serde(default)]
    pub last_company_id: Option<String>,
}
