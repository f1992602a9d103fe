// ABOUTME: KPI aggregation: status distribution, monthly buckets, per-plant counts
// ABOUTME: Pure recomputation over an in-memory record set, filtered by free text

use chrono::Datelike;
use std::collections::BTreeMap;

use llc_core::{LlcRecord, UserProfile, WorkflowStatus};

/// Bucket label for records whose plant is missing or blank.
pub const UNKNOWN_PLANT: &str = "Unknown";

/// Month names used for bucket labels. Indexing through this table keeps
/// the chronological sort independent of any locale.
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month bucket. Ordering is numeric on (year, month), never
/// on the rendered label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
}

impl MonthBucket {
    pub fn label(&self) -> String {
        // Both fields are public, so clamp rather than index past the table
        // on a hand-built out-of-range month.
        let name = MONTHS[(self.month as usize).saturating_sub(1).min(11)];
        format!("{name} {year}", year = self.year)
    }
}

fn bucket_of(record: &LlcRecord) -> Option<MonthBucket> {
    record.bucket_date().map(|dt| MonthBucket {
        year: dt.year(),
        month: dt.month(),
    })
}

fn plant_of(record: &LlcRecord) -> &str {
    match record.plant.as_deref().map(str::trim) {
        Some("") | None => UNKNOWN_PLANT,
        Some(p) => p,
    }
}

/// Whether a record counts as deployed for the accumulated KPIs: it has
/// either finished the workflow or had its deployment validated.
pub fn is_deployed(record: &LlcRecord) -> bool {
    matches!(
        record.status,
        WorkflowStatus::Closed | WorkflowStatus::DeploymentValidated
    )
}

/// Case-insensitive substring filter across the searchable fields.
/// A blank query keeps everything.
pub fn filter_records<'a>(records: &'a [LlcRecord], query: &str) -> Vec<&'a LlcRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| {
            let mut haystacks: Vec<&str> = vec![r.status.as_str()];
            for field in [
                &r.plant,
                &r.category,
                &r.llc_type,
                &r.customer,
                &r.product_family,
                &r.problem_short,
            ] {
                if let Some(v) = field.as_deref() {
                    haystacks.push(v);
                }
            }
            haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Count of records per workflow status, in catalog order. Statuses with
/// no records still appear with a zero count.
pub fn status_distribution(records: &[&LlcRecord]) -> Vec<(WorkflowStatus, usize)> {
    WorkflowStatus::ALL
        .into_iter()
        .map(|status| {
            let count = records.iter().filter(|r| r.status == status).count();
            (status, count)
        })
        .collect()
}

/// Counts grouped by plant, most frequent first. Ties keep plant-name order
/// so repeated runs render identically.
pub fn group_count_by_plant(records: &[&LlcRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(plant_of(r)).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(plant, n)| (plant.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Record totals per month, chronologically sorted. Records without any
/// usable date are skipped.
pub fn monthly_counts(records: &[&LlcRecord]) -> Vec<(MonthBucket, usize)> {
    let mut counts: BTreeMap<MonthBucket, usize> = BTreeMap::new();
    for r in records {
        if let Some(bucket) = bucket_of(r) {
            *counts.entry(bucket).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

/// One grouped-bar row: a month with a count per plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPlantRow {
    pub bucket: MonthBucket,
    pub counts: BTreeMap<String, usize>,
}

/// Deployed-record counts per month per plant, plus the sorted plant list
/// the chart legend iterates.
pub fn monthly_per_plant(records: &[&LlcRecord]) -> (Vec<MonthlyPlantRow>, Vec<String>) {
    let mut months: BTreeMap<MonthBucket, BTreeMap<String, usize>> = BTreeMap::new();
    let mut plants: BTreeMap<String, ()> = BTreeMap::new();
    for r in records {
        let Some(bucket) = bucket_of(r) else { continue };
        let plant = plant_of(r).to_string();
        plants.entry(plant.clone()).or_insert(());
        *months.entry(bucket).or_default().entry(plant).or_insert(0) += 1;
    }
    let rows = months
        .into_iter()
        .map(|(bucket, counts)| MonthlyPlantRow { bucket, counts })
        .collect();
    (rows, plants.into_keys().collect())
}

/// Stacked status counts per plant, plants in name order.
pub fn status_per_plant(records: &[&LlcRecord]) -> Vec<(String, Vec<(WorkflowStatus, usize)>)> {
    let mut per_plant: BTreeMap<&str, Vec<&LlcRecord>> = BTreeMap::new();
    for r in records {
        per_plant.entry(plant_of(r)).or_default().push(r);
    }
    per_plant
        .into_iter()
        .map(|(plant, rows)| (plant.to_string(), status_distribution(&rows)))
        .collect()
}

/// Per-plant charts computed only for admins.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCharts {
    pub deployed_per_plant: Vec<(String, usize)>,
    pub in_preparation_per_plant: Vec<(String, usize)>,
    pub monthly_deployed_per_plant: Vec<MonthlyPlantRow>,
    pub plants: Vec<String>,
    pub status_per_plant: Vec<(String, Vec<(WorkflowStatus, usize)>)>,
}

/// Everything one dashboard render needs, recomputed from scratch for the
/// current filter text.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total: usize,
    pub deployed_total: usize,
    pub in_preparation_total: usize,
    pub status_distribution: Vec<(WorkflowStatus, usize)>,
    pub monthly: Vec<(MonthBucket, usize)>,
    /// Present only when the viewer is an admin.
    pub admin: Option<AdminCharts>,
}

impl DashboardView {
    pub fn compute(records: &[LlcRecord], query: &str, viewer: &UserProfile) -> DashboardView {
        let filtered = filter_records(records, query);
        let deployed: Vec<&LlcRecord> = filtered.iter().copied().filter(|r| is_deployed(r)).collect();
        let in_prep: Vec<&LlcRecord> = filtered
            .iter()
            .copied()
            .filter(|r| r.status == WorkflowStatus::InPreparation)
            .collect();

        let admin = viewer.is_admin().then(|| {
            let (monthly_deployed, plants) = monthly_per_plant(&deployed);
            AdminCharts {
                deployed_per_plant: group_count_by_plant(&deployed),
                in_preparation_per_plant: group_count_by_plant(&in_prep),
                monthly_deployed_per_plant: monthly_deployed,
                plants,
                status_per_plant: status_per_plant(&filtered),
            }
        });

        DashboardView {
            total: filtered.len(),
            deployed_total: deployed.len(),
            in_preparation_total: in_prep.len(),
            status_distribution: status_distribution(&filtered),
            monthly: monthly_counts(&filtered),
            admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(json: serde_json::Value) -> LlcRecord {
        serde_json::from_value(json).unwrap()
    }

    fn sample_set() -> Vec<LlcRecord> {
        vec![
            record(serde_json::json!({
                "id": 1, "status": "CLOSED", "plant": "SCEET Plant",
                "deployed_at": "2024-06-15T10:00:00Z"
            })),
            record(serde_json::json!({
                "id": 2, "status": "CLOSED", "plant": "SCEET Plant",
                "deployed_at": "2025-01-05T10:00:00Z"
            })),
            record(serde_json::json!({
                "id": 3, "status": "DEPLOYMENT_VALIDATED", "plant": "TIANJIN Plant",
                "created_at": "2025-01-20T10:00:00Z"
            })),
            record(serde_json::json!({
                "id": 4, "status": "IN_PREPARATION", "plant": "TIANJIN Plant",
                "customer": "BOSCH", "problem_short": "Brush wear out of spec",
                "created_at": "2025-02-01T10:00:00Z"
            })),
            record(serde_json::json!({
                "id": 5, "status": "IN_PREPARATION",
                "created_at": "2025-02-10T10:00:00Z"
            })),
        ]
    }

    #[test]
    fn june_2024_sorts_before_january_2025() {
        let records = sample_set();
        let refs: Vec<&LlcRecord> = records.iter().collect();
        let monthly = monthly_counts(&refs);
        let labels: Vec<String> = monthly.iter().map(|(b, _)| b.label()).collect();
        assert_eq!(
            labels,
            vec!["June 2024", "January 2025", "February 2025"]
        );
        assert_eq!(monthly[1].1, 2);
    }

    #[test]
    fn out_of_range_months_clamp_instead_of_panicking() {
        assert_eq!(MonthBucket { year: 2024, month: 0 }.label(), "January 2024");
        assert_eq!(MonthBucket { year: 2024, month: 13 }.label(), "December 2024");
    }

    #[test]
    fn records_without_any_date_are_skipped_from_monthly() {
        let records = vec![record(serde_json::json!({"id": 9, "status": "CLOSED"}))];
        let refs: Vec<&LlcRecord> = records.iter().collect();
        assert!(monthly_counts(&refs).is_empty());
    }

    #[test]
    fn status_distribution_includes_zero_statuses() {
        let records = sample_set();
        let refs: Vec<&LlcRecord> = records.iter().collect();
        let dist = status_distribution(&refs);
        assert_eq!(dist.len(), 7);
        let get = |s: WorkflowStatus| dist.iter().find(|(st, _)| *st == s).unwrap().1;
        assert_eq!(get(WorkflowStatus::Closed), 2);
        assert_eq!(get(WorkflowStatus::InPreparation), 2);
        assert_eq!(get(WorkflowStatus::DeploymentRejected), 0);
    }

    #[test]
    fn missing_plants_bucket_under_unknown() {
        let records = sample_set();
        let refs: Vec<&LlcRecord> = records.iter().collect();
        let counts = group_count_by_plant(&refs);
        assert!(counts.iter().any(|(p, n)| p == UNKNOWN_PLANT && *n == 1));
        // Highest counts come first.
        assert_eq!(counts[0].1, 2);
    }

    #[test]
    fn filter_matches_across_fields_case_insensitively() {
        let records = sample_set();
        assert_eq!(filter_records(&records, "bosch").len(), 1);
        assert_eq!(filter_records(&records, "tianjin").len(), 2);
        assert_eq!(filter_records(&records, "closed").len(), 2);
        assert_eq!(filter_records(&records, "brush wear").len(), 1);
        assert_eq!(filter_records(&records, "").len(), records.len());
        assert_eq!(filter_records(&records, "no-such-thing").len(), 0);
    }

    #[test]
    fn deployed_counts_closed_and_validated() {
        let records = sample_set();
        let viewer = UserProfile::default();
        let view = DashboardView::compute(&records, "", &viewer);
        assert_eq!(view.total, 5);
        assert_eq!(view.deployed_total, 3);
        assert_eq!(view.in_preparation_total, 2);
    }

    #[test]
    fn admin_charts_only_for_admin_role() {
        let records = sample_set();
        let plain = DashboardView::compute(&records, "", &UserProfile::default());
        assert!(plain.admin.is_none());

        let admin = UserProfile {
            role: Some("admin".into()),
            ..Default::default()
        };
        let view = DashboardView::compute(&records, "", &admin);
        let charts = view.admin.expect("admin charts");
        assert_eq!(charts.plants, vec!["SCEET Plant", "TIANJIN Plant"]);
        assert_eq!(
            charts.deployed_per_plant,
            vec![("SCEET Plant".to_string(), 2), ("TIANJIN Plant".to_string(), 1)]
        );
        assert_eq!(charts.status_per_plant.len(), 3);
    }

    #[test]
    fn view_recomputes_under_filter() {
        let records = sample_set();
        let admin = UserProfile {
            role: Some("admin".into()),
            ..Default::default()
        };
        let view = DashboardView::compute(&records, "SCEET", &admin);
        assert_eq!(view.total, 2);
        assert_eq!(view.deployed_total, 2);
        assert_eq!(view.in_preparation_total, 0);
        let charts = view.admin.unwrap();
        assert_eq!(charts.plants, vec!["SCEET Plant"]);
    }
}
