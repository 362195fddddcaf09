//! Publishes the availability grid to a Google Sheet through the Sheets v4 REST API.
//!
//! Each team gets its own tab: member ids and names down columns A and B from row 8,
//! one column per match from column C, with a seven row header per match.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};

use super::layout::{serial_day, TeamSheet};
use super::ExportSummary;
use crate::errors::AppError;
use crate::models::AvailabilityStatus;

/// Columns before the first match column (member id, member name).
const COLUMN_OFFSET: usize = 2;
/// Header rows above the first member row.
const ROW_OFFSET: usize = 7;

/// Rate limited Sheets API client.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    token: String,
    limiter: DefaultDirectRateLimiter,
}

impl SheetsClient {
    /// `rate_limit` requests are allowed per `window`, spread evenly.
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        rate_limit: u32,
        window: Duration,
    ) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid Sheets API URL {}: {}", base_url, e)))?;

        let burst = NonZeroU32::new(rate_limit)
            .ok_or_else(|| AppError::Config("Sheets rate limit must be non-zero".to_string()))?;
        let quota = Quota::with_period(window / rate_limit)
            .ok_or_else(|| AppError::Config("Sheets rate window must be non-zero".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            client: Client::new(),
            base_url,
            token: token.into(),
            limiter: RateLimiter::direct(quota),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Invalid Sheets API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, AppError> {
        self.limiter.until_ready().await;

        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!(
                "Sheets API returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Value, AppError> {
        let url = self.url(&["spreadsheets", spreadsheet_id])?;
        self.send(self.client.get(url)).await
    }

    pub async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<Value, AppError> {
        let endpoint = format!("{}:batchUpdate", spreadsheet_id);
        let url = self.url(&["spreadsheets", endpoint.as_str()])?;
        self.send(self.client.post(url).json(&json!({ "requests": requests })))
            .await
    }

    pub async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        major_dimension: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<Value, AppError> {
        let endpoint = format!("{}:append", range);
        let url = self.url(&["spreadsheets", spreadsheet_id, "values", endpoint.as_str()])?;
        let body = json!({ "majorDimension": major_dimension, "values": values });
        self.send(
            self.client
                .post(url)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(&body),
        )
        .await
    }
}

/// Replace one tab per team in the spreadsheet.
///
/// Teams without selected matches are skipped. An error on one team is logged and
/// publishing moves on to the next team.
pub async fn update_google_sheet(
    client: &SheetsClient,
    spreadsheet_id: &str,
    sheets: &[TeamSheet],
) -> Result<ExportSummary, AppError> {
    let mut summary = ExportSummary::default();
    if sheets.is_empty() {
        return Ok(summary);
    }

    let spreadsheet = client.get_spreadsheet(spreadsheet_id).await?;

    for (index, sheet) in sheets.iter().enumerate() {
        if sheet.availabilities.is_empty() {
            tracing::debug!(team = %sheet.team.name, "No matches for team, skipping");
            continue;
        }

        match publish_team(client, spreadsheet_id, &spreadsheet, sheet, index).await {
            Ok(()) => {
                tracing::info!(team = %sheet.team.name, "Updated sheet for team");
                summary.written.push(sheet.team.name.clone());
            }
            Err(e) => {
                tracing::error!(team = %sheet.team.name, error = %e, "Error creating sheet for team");
                summary.failed.push(sheet.team.name.clone());
            }
        }
    }

    Ok(summary)
}

async fn publish_team(
    client: &SheetsClient,
    spreadsheet_id: &str,
    spreadsheet: &Value,
    sheet: &TeamSheet,
    index: usize,
) -> Result<(), AppError> {
    let mut requests = Vec::new();
    if let Some(existing) = find_sheet_id(spreadsheet, &sheet.team.name) {
        requests.push(json!({ "deleteSheet": { "sheetId": existing } }));
    }
    requests.push(json!({
        "addSheet": { "properties": { "title": sheet.team.name, "index": index } }
    }));

    let response = client.batch_update(spreadsheet_id, requests).await?;
    let sheet_id = response["replies"]
        .as_array()
        .and_then(|replies| replies.last())
        .and_then(|reply| reply["addSheet"]["properties"]["sheetId"].as_i64())
        .ok_or_else(|| AppError::Http("addSheet reply carries no sheet id".to_string()))?;

    let title = quote_title(&sheet.team.name);

    client
        .append_values(
            spreadsheet_id,
            &format!("{}!A{}:B", title, ROW_OFFSET + 1),
            "ROWS",
            member_rows(sheet),
        )
        .await?;

    client
        .append_values(
            spreadsheet_id,
            &format!("{}!{}1", title, column_letter(COLUMN_OFFSET)),
            "COLUMNS",
            availability_columns(sheet),
        )
        .await?;

    client
        .batch_update(spreadsheet_id, format_requests(sheet_id))
        .await?;

    Ok(())
}

fn find_sheet_id(spreadsheet: &Value, title: &str) -> Option<i64> {
    spreadsheet["sheets"]
        .as_array()?
        .iter()
        .map(|s| &s["properties"])
        .find(|p| p["title"].as_str() == Some(title))
        .and_then(|p| p["sheetId"].as_i64())
}

/// A1 notation sheet reference, with embedded quotes doubled.
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Zero based column index to A1 letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn counter(column: usize, status: AvailabilityStatus) -> String {
    let column = column_letter(column);
    format!(
        "=CONCAT(\"{label}: \", COUNTIF({column}{first}:{column}, \"{label}\"))",
        label = status.label(),
        column = column,
        first = ROW_OFFSET + 1,
    )
}

fn member_rows(sheet: &TeamSheet) -> Vec<Vec<Value>> {
    sheet
        .members
        .iter()
        .map(|member| vec![json!(member.id()), json!(member.display_name())])
        .collect()
}

fn availability_columns(sheet: &TeamSheet) -> Vec<Vec<Value>> {
    sheet
        .availabilities
        .iter()
        .enumerate()
        .map(|(index, availability)| {
            let column_index = COLUMN_OFFSET + index;
            let mut column = vec![Value::Null; sheet.members.len() + ROW_OFFSET];

            column[0] = json!(availability.match_id);
            column[1] = serial_day(&availability.date).map_or(Value::Null, |day| json!(day));
            column[2] = json!(availability.opponent_label());
            column[3] = availability
                .match_type()
                .map_or(Value::Null, |t| json!(t));
            column[4] = json!(counter(column_index, AvailabilityStatus::Accepted));
            column[5] = json!(counter(column_index, AvailabilityStatus::Unanswered));
            column[6] = json!(counter(column_index, AvailabilityStatus::Declined));

            for (row, status) in sheet.status_column(availability).into_iter().enumerate() {
                if let Some(status) = status {
                    column[ROW_OFFSET + row] = json!(status.label());
                }
            }

            column
        })
        .collect()
}

fn format_requests(sheet_id: i64) -> Vec<Value> {
    vec![
        json!({
            "updateSheetProperties": {
                "properties": {
                    "sheetId": sheet_id,
                    "gridProperties": {
                        "frozenColumnCount": COLUMN_OFFSET,
                        "frozenRowCount": ROW_OFFSET
                    }
                },
                "fields": "gridProperties.frozenColumnCount,gridProperties.frozenRowCount"
            }
        }),
        json!({
            "updateDimensionProperties": {
                "properties": { "hiddenByUser": true },
                "range": { "sheetId": sheet_id, "dimension": "COLUMNS", "startIndex": 0, "endIndex": 1 },
                "fields": "hiddenByUser"
            }
        }),
        json!({
            "updateDimensionProperties": {
                "properties": { "hiddenByUser": true },
                "range": { "sheetId": sheet_id, "dimension": "ROWS", "startIndex": 0, "endIndex": 1 },
                "fields": "hiddenByUser"
            }
        }),
        json!({
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startColumnIndex": COLUMN_OFFSET,
                    "startRowIndex": 1,
                    "endRowIndex": 2
                },
                "cell": {
                    "userEnteredFormat": {
                        "numberFormat": { "type": "DATE", "pattern": "dd/mm/yyyy" }
                    }
                },
                "fields": "userEnteredFormat.numberFormat.pattern,userEnteredFormat.numberFormat.type"
            }
        }),
        json!({
            "autoResizeDimensions": {
                "dimensions": { "sheetId": sheet_id, "dimension": "COLUMNS", "startIndex": 1 }
            }
        }),
    ]
}
