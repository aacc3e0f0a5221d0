use super::dto::{Alert, BreachRecord, ExposureBundle};

/// Flattens upstream breach and exposure records into the dashboard alert
/// shape. Breach alerts come first, then exposure alerts, both in upstream
/// order; nothing is sorted, deduplicated or merged.
pub fn normalize(breaches: &[BreachRecord], exposures: &ExposureBundle) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(breaches.len() + exposures.exposures.len());

    for breach in breaches {
        alerts.push(Alert {
            date: breach.date.clone().unwrap_or_else(|| "Unknown".into()),
            description: format!(
                "Data breach detected in {}",
                breach.source.as_deref().unwrap_or("Unknown source")
            ),
            severity: breach.severity.clone().unwrap_or_else(|| "Medium".into()),
        });
    }

    for exposure in &exposures.exposures {
        alerts.push(Alert {
            date: exposure.date.clone().unwrap_or_else(|| "Unknown".into()),
            description: format!(
                "Data exposure detected: {}",
                exposure.kind.as_deref().unwrap_or("Unknown type")
            ),
            severity: exposure.severity.clone().unwrap_or_else(|| "High".into()),
        });
    }

    alerts
}
