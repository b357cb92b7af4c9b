use crate::providers::configs::non_empty_env;

pub const NEONPANEL_BASE_URL: &str = "https://api.neonpanel.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub base_url: String,
    /// Absent key means demo mode
    pub api_key: Option<String>,
    /// Region hint shown alongside panel data
    pub region: Option<String>,
}

impl PanelConfig {
    pub fn new<S: Into<String>>(base_url: S, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            region: None,
        }
    }

    /// Read `NEONPANEL_BASE_URL`, `NEONPANEL_API_KEY` and `NEONPANEL_REGION`
    pub fn from_env() -> Self {
        Self {
            base_url: non_empty_env("NEONPANEL_BASE_URL")
                .unwrap_or_else(|| NEONPANEL_BASE_URL.to_string()),
            api_key: non_empty_env("NEONPANEL_API_KEY"),
            region: non_empty_env("NEONPANEL_REGION"),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.api_key.is_none()
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(NEONPANEL_BASE_URL, None)
    }
}
