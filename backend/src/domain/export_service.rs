//! CSV export of care records.
//!
//! Output columns are `id,type,timestamp,summary,notes`, oldest record first.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use shared::RecordType;

use crate::domain::commands::export::{ExportRecordsCommand, ExportRecordsResult};
use crate::domain::models::record::CareRecord;
use crate::domain::record_service::RecordService;

#[derive(Clone)]
pub struct ExportService {
    record_service: RecordService,
}

impl ExportService {
    pub fn new(record_service: RecordService) -> Self {
        Self { record_service }
    }

    pub async fn export_csv(&self, command: ExportRecordsCommand) -> Result<ExportRecordsResult> {
        info!("Exporting records to CSV: {:?}", command);

        let mut records: Vec<CareRecord> = self
            .record_service
            .all_records()
            .await
            .into_iter()
            .filter(|r| matches_command(r, &command))
            .collect();
        records.reverse();

        let csv_content = render_csv(&records)?;
        let filename = export_filename(Utc::now());

        info!("Exported {} records", records.len());
        Ok(ExportRecordsResult {
            csv_content,
            filename,
            record_count: records.len(),
        })
    }
}

fn matches_command(record: &CareRecord, command: &ExportRecordsCommand) -> bool {
    let timestamp = record.timestamp();
    command.start.map_or(true, |start| timestamp >= start)
        && command.end.map_or(true, |end| timestamp <= end)
        && command
            .record_types
            .as_ref()
            .map_or(true, |types: &Vec<RecordType>| types.contains(&record.record_type()))
}

/// Render `records` in the given order
pub fn render_csv(records: &[CareRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "type", "timestamp", "summary", "notes"])?;

    for record in records {
        writer.write_record([
            record.id().to_string(),
            record.record_type().to_string(),
            record.timestamp().to_rfc3339(),
            record.summary(),
            record.notes().unwrap_or_default().to_string(),
        ])?;
    }

    let bytes = writer.into_inner().context("Failed to finish CSV export")?;
    String::from_utf8(bytes).context("CSV export produced invalid UTF-8")
}

fn export_filename(now: DateTime<Utc>) -> String {
    format!("baby_tracker_export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
