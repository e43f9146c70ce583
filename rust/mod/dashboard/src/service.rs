use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use kontor_core::{now_rfc3339, ServiceError};
use kontor_export::{Dataset, ExportError, ExportFormat, ExportMeta};
use kontor_sql::{SQLStore, Value};
use kontor_ui::SummaryCard;

use crate::range::TimeRange;

/// One point of the daily new-persons series. Days with no activity
/// are present with a zero count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    /// Calendar date, ISO `YYYY-MM-DD`.
    pub date: String,
    pub count: i64,
}

/// The aggregated dashboard payload for one time range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub range: TimeRange,
    pub generated_at: String,
    pub cards: Vec<SummaryCard>,
    pub daily_new_persons: Vec<DailyCount>,
}

/// Read-only aggregation over the CRM tables.
///
/// Card values count records created inside the selected window; the
/// trend compares against the preceding window of equal length.
/// Timestamps are RFC 3339 UTC text, so window edges compare as plain
/// strings.
pub struct DashboardService {
    sql: Arc<dyn SQLStore>,
}

impl DashboardService {
    pub fn new(sql: Arc<dyn SQLStore>) -> Self {
        Self { sql }
    }

    pub fn summary(&self, range: TimeRange) -> Result<DashboardSummary, ServiceError> {
        let now = Utc::now();
        let current_start = (now - Duration::days(range.days())).to_rfc3339();
        let previous_start = (now - Duration::days(2 * range.days())).to_rfc3339();

        let mut cards = Vec::new();
        for (label, table, extra) in [
            ("New persons", "persons", ""),
            ("New leads", "persons", " AND person_type_id = 1"),
            ("New clients", "persons", " AND person_type_id = 2"),
            ("New active persons", "persons", " AND active = 1"),
            ("New enterprises", "enterprises", ""),
            ("New requirements", "requirements", ""),
        ] {
            let current = self.count_since(table, extra, &current_start, None)?;
            let previous =
                self.count_since(table, extra, &previous_start, Some(&current_start))?;
            cards.push(SummaryCard::new(label, current as f64, previous as f64));
        }

        let daily_new_persons = self.daily_new_persons(range, &current_start)?;

        tracing::debug!(range = %range, cards = cards.len(), "dashboard summary built");
        Ok(DashboardSummary {
            range,
            generated_at: now_rfc3339(),
            cards,
            daily_new_persons,
        })
    }

    /// The summary flattened into an exportable dataset.
    pub fn dataset(&self, range: TimeRange) -> Result<Dataset, ServiceError> {
        let summary = self.summary(range)?;
        let mut rows: Vec<Vec<String>> = summary
            .cards
            .iter()
            .map(|c| {
                vec![
                    c.label.clone(),
                    format!("{}", c.value as i64),
                    format!("{}", c.delta as i64),
                ]
            })
            .collect();
        for point in &summary.daily_new_persons {
            rows.push(vec![
                format!("New persons on {}", point.date),
                point.count.to_string(),
                String::new(),
            ]);
        }
        Ok(Dataset {
            title: format!("Dashboard — {}", range.label()),
            columns: vec!["Metric".into(), "Value".into(), "Delta".into()],
            rows,
        })
    }

    /// Render the summary in the requested export format.
    pub fn export(&self, range: TimeRange, format: ExportFormat) -> Result<Vec<u8>, ServiceError> {
        let dataset = self.dataset(range)?;
        let meta = ExportMeta {
            generated_at: now_rfc3339(),
            range_label: range.label().to_string(),
        };
        match format {
            ExportFormat::Csv => kontor_export::to_csv(&dataset).map_err(|e| match e {
                ExportError::Csv(msg) => ServiceError::Internal(msg),
            }),
            ExportFormat::Document => Ok(kontor_export::to_document(&dataset, &meta)),
        }
    }

    fn count_since(
        &self,
        table: &str,
        extra: &str,
        start: &str,
        end: Option<&str>,
    ) -> Result<i64, ServiceError> {
        let mut sql = format!(
            "SELECT COUNT(*) as cnt FROM {table} WHERE created_at >= ?1{extra}"
        );
        let mut params = vec![Value::from(start)];
        if let Some(end) = end {
            sql.push_str(" AND created_at < ?2");
            params.push(Value::from(end));
        }
        let rows = self
            .sql
            .query(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }

    fn daily_new_persons(
        &self,
        range: TimeRange,
        start: &str,
    ) -> Result<Vec<DailyCount>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT substr(created_at, 1, 10) as day, COUNT(*) as cnt \
                 FROM persons WHERE created_at >= ?1 GROUP BY day",
                &[Value::from(start)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut by_day: HashMap<String, i64> = HashMap::new();
        for row in &rows {
            if let (Some(day), Some(cnt)) = (row.get_str("day"), row.get_i64("cnt")) {
                by_day.insert(day.to_string(), cnt);
            }
        }

        // Zero-fill every day of the window, oldest first.
        let today = Utc::now().date_naive();
        let mut series = Vec::with_capacity(range.days() as usize);
        for offset in (0..range.days()).rev() {
            let date = (today - Duration::days(offset)).to_string();
            let count = by_day.get(&date).copied().unwrap_or(0);
            series.push(DailyCount { date, count });
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm::service::CrmService;
    use kontor_sql::SqliteStore;
    use kontor_ui::Trend;

    fn setup() -> (Arc<CrmService>, DashboardService) {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let crm = Arc::new(CrmService::new(sql.clone()).unwrap());
        (crm, DashboardService::new(sql))
    }

    #[test]
    fn empty_store_yields_flat_zero_cards() {
        let (_, dash) = setup();
        let summary = dash.summary(TimeRange::Last7Days).unwrap();
        assert_eq!(summary.cards.len(), 6);
        for card in &summary.cards {
            assert_eq!(card.value, 0.0);
            assert_eq!(card.trend, Trend::Flat);
        }
        assert_eq!(summary.daily_new_persons.len(), 7);
        assert!(summary.daily_new_persons.iter().all(|d| d.count == 0));
    }

    #[test]
    fn fresh_records_count_toward_the_current_window() {
        let (crm, dash) = setup();
        crm.seed_demo(9, 11).unwrap();

        let summary = dash.summary(TimeRange::Last7Days).unwrap();
        let persons = &summary.cards[0];
        assert_eq!(persons.label, "New persons");
        assert_eq!(persons.value, 9.0);
        assert_eq!(persons.trend, Trend::Up);

        // Everything was created today, so today's bucket holds it all.
        let today = summary.daily_new_persons.last().unwrap();
        assert_eq!(today.count, 9);
        let total: i64 = summary.daily_new_persons.iter().map(|d| d.count).sum();
        assert_eq!(total, 9);
    }

    #[test]
    fn lead_and_client_cards_split_the_person_count() {
        let (crm, dash) = setup();
        crm.seed_demo(12, 11).unwrap();

        let summary = dash.summary(TimeRange::Last30Days).unwrap();
        let leads = summary.cards[1].value;
        let clients = summary.cards[2].value;
        assert_eq!(leads + clients, summary.cards[0].value);
        assert_eq!(clients, 4.0);
    }

    #[test]
    fn csv_export_contains_card_rows() {
        let (crm, dash) = setup();
        crm.seed_demo(4, 11).unwrap();

        let bytes = dash.export(TimeRange::Last7Days, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Metric,Value,Delta"));
        assert!(text.contains("New persons,4,4"));
        // Header + 6 cards + one daily row per day in the window.
        assert_eq!(text.lines().count(), 1 + 6 + 7);
    }

    #[test]
    fn document_export_is_paginated_text() {
        let (crm, dash) = setup();
        crm.seed_demo(4, 11).unwrap();

        let bytes = dash
            .export(TimeRange::Last90Days, ExportFormat::Document)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Last 90 days"));
        // 6 cards + 90 daily rows exceed one 40-row page.
        assert!(text.contains('\u{c}'));
    }
}
