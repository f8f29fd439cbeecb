use super::ChartSpec;
use crate::ai::ChartAdvisor;
use crate::pipeline::sample_rows;
use crate::types::{CleanedRow, Column, Dataset};
use serde::Serialize;
use tracing::{info, warn};

/// What an advisor is shown: the column metadata and a small row sample.
///
/// Serializes as `{ "columns": [{name, type}], "rows": [...] }`.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRequest<'a> {
    pub columns: &'a [Column],
    pub rows: Vec<&'a CleanedRow>,
}

impl<'a> ChartRequest<'a> {
    /// Borrow the columns of `dataset` and sample at most `sample_size` rows.
    pub fn from_dataset(dataset: &'a Dataset, sample_size: usize) -> Self {
        Self {
            columns: &dataset.columns,
            rows: sample_rows(&dataset.rows, sample_size),
        }
    }
}

/// Where a recommended spec came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRecommendation {
    pub spec: ChartSpec,
    pub source: RecommendationSource,
    /// Name of the advisor that was consulted, if any.
    pub advisor: Option<String>,
    /// Why the fallback was used after an advisor was consulted.
    pub warning: Option<String>,
}

impl ChartRecommendation {
    fn fallback(dataset: &Dataset, advisor: Option<String>, warning: Option<String>) -> Self {
        Self {
            spec: ChartSpec::fallback(&dataset.columns),
            source: RecommendationSource::Fallback,
            advisor,
            warning,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RecommendationSource::Fallback
    }
}

/// Ask `advisor` for a chart, falling back to [`ChartSpec::fallback`].
///
/// The advisor is called at most once. A failed call or a spec that does not
/// validate against the dataset's columns yields the fallback with a warning.
/// The dataset itself is never affected.
pub fn recommend_chart(
    dataset: &Dataset,
    advisor: Option<&dyn ChartAdvisor>,
    sample_size: usize,
) -> ChartRecommendation {
    let Some(advisor) = advisor else {
        info!("No chart advisor configured, using the default chart");
        return ChartRecommendation::fallback(dataset, None, None);
    };

    let request = ChartRequest::from_dataset(dataset, sample_size);
    let name = advisor.name().to_string();
    info!(
        "Requesting chart recommendation from {} ({} sample rows)",
        name,
        request.rows.len()
    );

    match advisor.recommend(&request) {
        Ok(spec) => match spec.validate(&dataset.columns) {
            Ok(()) => ChartRecommendation {
                spec,
                source: RecommendationSource::Model,
                advisor: Some(name),
                warning: None,
            },
            Err(e) => {
                warn!("{} returned an unusable chart spec: {}", name, e);
                let warning = format!("{} returned an unusable chart spec: {}", name, e);
                ChartRecommendation::fallback(dataset, Some(name), Some(warning))
            }
        },
        Err(e) => {
            warn!("Chart recommendation from {} failed: {}", name, e);
            let warning = format!("Chart recommendation from {} failed: {}", name, e);
            ChartRecommendation::fallback(dataset, Some(name), Some(warning))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartType;
    use crate::pipeline::ingest;
    use anyhow::{Result, anyhow};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedAdvisor {
        spec: ChartSpec,
        calls: AtomicUsize,
        seen_rows: AtomicUsize,
    }

    impl FixedAdvisor {
        fn new(spec: ChartSpec) -> Self {
            Self {
                spec,
                calls: AtomicUsize::new(0),
                seen_rows: AtomicUsize::new(0),
            }
        }
    }

    impl ChartAdvisor for FixedAdvisor {
        fn recommend(&self, request: &ChartRequest<'_>) -> Result<ChartSpec> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_rows.store(request.rows.len(), Ordering::SeqCst);
            Ok(self.spec.clone())
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    struct FailingAdvisor {
        calls: AtomicUsize,
    }

    impl ChartAdvisor for FailingAdvisor {
        fn recommend(&self, _request: &ChartRequest<'_>) -> Result<ChartSpec> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("network unreachable"))
        }

        fn name(&self) -> &str {
            "Failing"
        }
    }

    fn dataset() -> Dataset {
        let mut csv = String::from("month,sales,region\n");
        for i in 0..100 {
            csv.push_str(&format!("2024-{:02}-01,{},r{}\n", i % 12 + 1, i * 10, i % 3));
        }
        ingest(&csv).unwrap()
    }

    fn line_spec() -> ChartSpec {
        ChartSpec {
            chart_type: ChartType::Line,
            x: Some("month".to_string()),
            y: Some("sales".to_string()),
            y2: None,
            size: None,
            color: None,
            title: "Sales over time".to_string(),
            x_label: "Month".to_string(),
            y_label: "Sales".to_string(),
            reasoning: Some("Date on one axis.".to_string()),
        }
    }

    #[test]
    fn test_no_advisor_uses_fallback() {
        let dataset = dataset();
        let rec = recommend_chart(&dataset, None, 20);
        assert!(rec.is_fallback());
        assert_eq!(rec.advisor, None);
        assert_eq!(rec.warning, None);
        assert_eq!(rec.spec, ChartSpec::fallback(&dataset.columns));
    }

    #[test]
    fn test_advisor_spec_is_used_and_sample_is_bounded() {
        let dataset = dataset();
        let advisor = FixedAdvisor::new(line_spec());
        let rec = recommend_chart(&dataset, Some(&advisor), 20);

        assert_eq!(rec.source, RecommendationSource::Model);
        assert_eq!(rec.spec, line_spec());
        assert_eq!(rec.advisor.as_deref(), Some("Fixed"));
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(advisor.seen_rows.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_advisor_error_falls_back_after_one_attempt() {
        let dataset = dataset();
        let before = dataset.clone();
        let advisor = FailingAdvisor {
            calls: AtomicUsize::new(0),
        };
        let rec = recommend_chart(&dataset, Some(&advisor), 20);

        assert!(rec.is_fallback());
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
        assert!(rec.warning.unwrap().contains("network unreachable"));
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_invalid_column_reference_falls_back() {
        let dataset = dataset();
        let mut spec = line_spec();
        spec.y = Some("profit".to_string());
        let rec = recommend_chart(&dataset, Some(&FixedAdvisor::new(spec)), 20);

        assert!(rec.is_fallback());
        assert!(rec.warning.unwrap().contains("profit"));
        assert_eq!(rec.spec.x.as_deref(), Some("month"));
        assert_eq!(rec.spec.y.as_deref(), Some("sales"));
    }

    #[test]
    fn test_request_serialization() {
        let dataset = ingest("City,Pop\nNYC,\"$8,000,000\"\nLA,n/a\n").unwrap();
        let request = ChartRequest::from_dataset(&dataset, 20);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"columns":[{"name":"City","type":"categorical"},{"name":"Pop","type":"numeric"}],"rows":[{"City":"NYC","Pop":8000000.0},{"City":"LA","Pop":null}]}"#
        );
    }
}
