/// Pickups for September 2014, one row per pickup.
pub const DEFAULT_DATA_URL: &str = "https://s3-jownao.s3.us-east-1.amazonaws.com/uber-raw-data-sep14.csv.gz";

/// Overrides [`DEFAULT_DATA_URL`].
pub const DATA_URL_VAR: &str = "PICKUPS_DATA_URL";
/// Mapbox access token; enables the dark basemap behind the heatmap.
pub const MAPBOX_TOKEN_VAR: &str = "MAPBOX_API_KEY";

/// Runtime settings resolved from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_url: String,
    pub mapbox_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Settings {
            data_url: get(DATA_URL_VAR).unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
            mapbox_token: get(MAPBOX_TOKEN_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.data_url, DEFAULT_DATA_URL);
        assert_eq!(s.mapbox_token, None);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[(DATA_URL_VAR, "file.csv.gz"), (MAPBOX_TOKEN_VAR, "pk.abc")]);
        assert_eq!(s.data_url, "file.csv.gz");
        assert_eq!(s.mapbox_token.as_deref(), Some("pk.abc"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let s = settings(&[(DATA_URL_VAR, ""), (MAPBOX_TOKEN_VAR, "   ")]);
        assert_eq!(s.data_url, DEFAULT_DATA_URL);
        assert_eq!(s.mapbox_token, None);
    }
}
