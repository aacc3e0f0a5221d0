use serde::{Deserialize, Serialize};

/// One incident from the upstream breach endpoint. Every field may be absent;
/// the normalizer fills in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreachRecord {
    pub date: Option<String>,
    pub source: Option<String>,
    pub severity: Option<String>,
}

/// Body of the upstream breach endpoint. A missing `breaches` key means no
/// entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreachResponse {
    #[serde(default)]
    pub breaches: Vec<BreachRecord>,
}

/// One entry from the upstream exposure endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExposureRecord {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub severity: Option<String>,
}

/// Body of the upstream exposure endpoint. A missing `exposures` key means no
/// entries, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExposureBundle {
    #[serde(default)]
    pub exposures: Vec<ExposureRecord>,
}

/// Uniform alert shown on the dashboard. Not persisted; produced fresh on
/// every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub date: String,
    pub description: String,
    pub severity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breach_response_tolerates_missing_keys() {
        let parsed: BreachResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.breaches.is_empty());

        let parsed: BreachResponse =
            serde_json::from_str(r#"{"breaches":[{"source":"SiteX"}]}"#).unwrap();
        assert_eq!(parsed.breaches.len(), 1);
        assert_eq!(parsed.breaches[0].source.as_deref(), Some("SiteX"));
        assert_eq!(parsed.breaches[0].date, None);
    }

    #[test]
    fn exposure_bundle_tolerates_missing_keys() {
        let parsed: ExposureBundle = serde_json::from_str("{}").unwrap();
        assert!(parsed.exposures.is_empty());

        let parsed: ExposureBundle =
            serde_json::from_str(r#"{"exposures":[{"type":"leak","date":"2023-06-01"}]}"#).unwrap();
        assert_eq!(parsed.exposures.len(), 1);
        assert_eq!(parsed.exposures[0].kind.as_deref(), Some("leak"));
    }
}
