//! Client-side install hooks.

use crate::package::Package;

/// Script snippets the client runs when an install-style package lands.
///
/// Each hook is emitted only when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallHooks {
    pub menu_installed: String,
    pub menu_action: String,
    pub client_installed: String,
    pub client_action: String,
    pub server_installed: String,
    pub server_action: String,
}

impl InstallHooks {
    /// Hooks for a package delivered in install mode.
    ///
    /// Maps refresh the client's map list on download and launch by BSP
    /// name when selected. Other types carry no hooks.
    pub fn for_package(package: &Package) -> Self {
        if !package.package_type.is_map() {
            return Self::default();
        }

        Self {
            menu_installed: "OnMapDownloaded();".to_string(),
            menu_action: format!("OnMapSelected('{}');", package.map_name()),
            ..Self::default()
        }
    }

    /// Hooks as (manifest key, snippet) pairs in wire order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("luamenu_installed", self.menu_installed.as_str()),
            ("luamenu_action", self.menu_action.as_str()),
            ("luaclient_installed", self.client_installed.as_str()),
            ("luaclient_action", self.client_action.as_str()),
            ("luaserver_installed", self.server_installed.as_str()),
            ("luaserver_action", self.server_action.as_str()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, v)| v.is_empty())
    }
}
