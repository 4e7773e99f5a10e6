use serde::Deserialize;

/// Router settings, read from the `[app]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterOptions {
    /// Shown in the sidebar and appended to every document title.
    #[serde(rename = "name")]
    pub app_name: String,
    /// Mount point for the layout shell.
    pub root_selector: String,
    pub default_route: String,
    /// Target of unknown-route redirects. Receives `path=<requested key>`.
    pub not_found_route: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            app_name: "Dashboard".to_string(),
            root_selector: "#app".to_string(),
            default_route: "dashboard".to_string(),
            not_found_route: "not-found".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: RouterOptions = toml::from_str(r#"name = "Acme Console""#).unwrap();
        assert_eq!(options.app_name, "Acme Console");
        assert_eq!(options.root_selector, "#app");
        assert_eq!(options.not_found_route, "not-found");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<RouterOptions, _> = toml::from_str(r#"nmae = "typo""#);
        assert!(result.is_err());
    }
}
