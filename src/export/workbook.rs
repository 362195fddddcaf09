//! Writes the availability grid to a local xlsx workbook.

use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::layout::{serial_date, TeamSheet};
use super::ExportSummary;
use crate::errors::AppError;

/// First member row; rows above hold date, opponent and match type.
const ROW_OFFSET: u32 = 3;
const MIN_COLUMN_WIDTH: usize = 10;
const DATE_FORMAT: &str = "dd/mm/yyyy hh:mm";

/// Render every team sheet and save the workbook at `path`.
///
/// A sheet that cannot be rendered is logged and left out; the remaining teams are
/// still written. Saving the file reports its error to the caller.
pub fn save_workbook(sheets: &[TeamSheet], path: &Path) -> Result<ExportSummary, AppError> {
    let mut workbook = Workbook::new();
    let mut summary = ExportSummary::default();
    let mut used_names: HashSet<String> = HashSet::new();

    for sheet in sheets {
        let result = if used_names.insert(sheet.team.name.to_lowercase()) {
            render_worksheet(sheet)
        } else {
            Err(AppError::Export(format!(
                "Duplicate sheet name {}",
                sheet.team.name
            )))
        };

        match result {
            Ok(worksheet) => {
                workbook.push_worksheet(worksheet);
                summary.written.push(sheet.team.name.clone());
            }
            Err(e) => {
                tracing::error!(team = %sheet.team.name, error = %e, "Error creating sheet for team");
                summary.failed.push(sheet.team.name.clone());
            }
        }
    }

    workbook.save(path)?;
    tracing::info!(
        file = %path.display(),
        sheets = summary.written.len(),
        failed = summary.failed.len(),
        "Saved workbook"
    );

    Ok(summary)
}

#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Text(String),
    Date(f64),
}

/// Cell values and column widths of one team's worksheet.
#[derive(Debug, Default)]
struct SheetCells {
    cells: Vec<(u32, u16, CellValue)>,
    widths: Vec<usize>,
}

impl SheetCells {
    fn text(&mut self, row: u32, column: u16, value: &str) {
        let width = &mut self.widths[column as usize];
        *width = (*width).max(value.chars().count());
        self.cells
            .push((row, column, CellValue::Text(value.to_string())));
    }
}

#[cfg(test)]
impl SheetCells {
    fn get(&self, row: u32, column: u16) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(r, c, _)| *r == row && *c == column)
            .map(|(_, _, value)| value)
    }
}

fn sheet_cells(sheet: &TeamSheet) -> SheetCells {
    let mut cells = SheetCells {
        cells: Vec::new(),
        widths: vec![MIN_COLUMN_WIDTH; sheet.availabilities.len() + 1],
    };

    for (index, member) in sheet.members.iter().enumerate() {
        cells.text(ROW_OFFSET + index as u32, 0, &member.display_name());
    }

    for (index, availability) in sheet.availabilities.iter().enumerate() {
        let column = (index + 1) as u16;

        match serial_date(&availability.date) {
            Some(serial) => cells.cells.push((0, column, CellValue::Date(serial))),
            None => cells.text(0, column, &availability.date),
        }

        cells.text(1, column, availability.opponent_label());
        if let Some(match_type) = availability.match_type() {
            cells.text(2, column, match_type);
        }

        for (row, status) in sheet.status_column(availability).into_iter().enumerate() {
            if let Some(status) = status {
                cells.text(ROW_OFFSET + row as u32, column, status.as_str());
            }
        }
    }

    cells
}

fn render_worksheet(sheet: &TeamSheet) -> Result<Worksheet, AppError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(&sheet.team.name)?;

    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let cells = sheet_cells(sheet);

    for (row, column, value) in &cells.cells {
        match value {
            CellValue::Text(text) => {
                worksheet.write_string(*row, *column, text)?;
            }
            CellValue::Date(serial) => {
                worksheet.write_number_with_format(*row, *column, *serial, &date_format)?;
            }
        }
    }

    for (column, width) in cells.widths.iter().enumerate() {
        worksheet.set_column_width(column as u16, (width + 1) as f64)?;
    }

    Ok(worksheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Repository;
    use crate::export::build_team_sheets;
    use crate::filters::Selection;
    use crate::models::{MatchAvailability, MatchInfo, Member, MemberRef, Team};
    use tempfile::TempDir;

    fn sheets(team_names: &[&str]) -> Vec<TeamSheet> {
        let mut repo = Repository::new();
        for (i, name) in team_names.iter().enumerate() {
            let team = Team::new(format!("T{}", i), *name);
            repo.upsert_team(
                &team,
                &[
                    Member::new("m1", "Amy", "Zed").into(),
                    MemberRef::Unresolved("m2".to_string()),
                ],
            );
            repo.upsert_availability(
                &team,
                MatchAvailability {
                    match_id: "X".to_string(),
                    subgroup_id: team.id.clone(),
                    heading: "League".to_string(),
                    match_info: None,
                    date: "2024-03-02T09:30:00Z".to_string(),
                    accepted_ids: vec!["m1".to_string()],
                    declined_ids: vec![],
                    unanswered_ids: vec!["m2".to_string()],
                    waiting_list_ids: vec![],
                    unconfirmed_ids: vec![],
                },
            );
        }
        build_team_sheets(&repo, &Selection::all()).unwrap()
    }

    #[test]
    fn test_save_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("availability.xlsx");

        let summary = save_workbook(&sheets(&["M1s", "M2s"]), &path).unwrap();

        assert_eq!(summary.written, vec!["M1s", "M2s"]);
        assert!(summary.failed.is_empty());
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_sheet_cells_layout() {
        let mut repo = Repository::new();
        let team = Team::new("T1", "M1s");
        repo.upsert_team(
            &team,
            &[
                Member::new("m1", "Amy", "Zed").into(),
                Member::new("m2", "Ben", "Young").into(),
                MemberRef::Unresolved("a-very-long-member-id".to_string()),
            ],
        );
        repo.upsert_availability(
            &team,
            MatchAvailability {
                match_id: "X".to_string(),
                subgroup_id: "T1".to_string(),
                heading: "League".to_string(),
                match_info: Some(MatchInfo {
                    team_name: None,
                    opponent_name: Some("Tigers".to_string()),
                    match_type: Some("HOME".to_string()),
                }),
                date: "2024-01-01T00:00:00Z".to_string(),
                accepted_ids: vec!["m1".to_string()],
                declined_ids: vec!["m2".to_string()],
                unanswered_ids: vec![],
                waiting_list_ids: vec!["a-very-long-member-id".to_string()],
                unconfirmed_ids: vec![],
            },
        );
        repo.upsert_availability(
            &team,
            MatchAvailability {
                match_id: "Y".to_string(),
                subgroup_id: "T1".to_string(),
                heading: "Friendly".to_string(),
                match_info: None,
                date: "not a date".to_string(),
                accepted_ids: vec![],
                declined_ids: vec![],
                unanswered_ids: vec!["m1".to_string()],
                waiting_list_ids: vec![],
                unconfirmed_ids: vec!["m2".to_string()],
            },
        );
        let sheets = build_team_sheets(&repo, &Selection::all()).unwrap();
        let cells = sheet_cells(&sheets[0]);
        let text = |row, column| match cells.get(row, column) {
            Some(CellValue::Text(text)) => Some(text.as_str()),
            _ => None,
        };

        // Members from row 3, resolved first
        assert_eq!(text(3, 0), Some("Amy Zed"));
        assert_eq!(text(4, 0), Some("Ben Young"));
        assert_eq!(text(5, 0), Some("a-very-long-member-id"));

        // "2024-..." sorts before "not a date"
        assert_eq!(cells.get(0, 1), Some(&CellValue::Date(45292.0)));
        assert_eq!(text(1, 1), Some("Tigers"));
        assert_eq!(text(2, 1), Some("HOME"));
        assert_eq!(text(3, 1), Some("ACCEPTED"));
        assert_eq!(text(4, 1), Some("DECLINED"));
        assert_eq!(text(5, 1), Some("WAITLIST"));

        // Unparseable dates stay text; no match info falls back to the heading
        assert_eq!(text(0, 2), Some("not a date"));
        assert_eq!(text(1, 2), Some("Friendly"));
        assert_eq!(cells.get(2, 2), None);
        assert_eq!(text(3, 2), Some("UNANSWERED"));
        assert_eq!(text(4, 2), Some("UNCONFIRMED"));
        assert_eq!(cells.get(5, 2), None);

        assert_eq!(cells.widths, vec![21, 10, 11]);
    }

    #[test]
    fn test_bad_sheet_does_not_stop_other_teams() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("availability.xlsx");

        // '[' is not allowed in a worksheet name; "M1s" clashes with "m1s"
        let summary = save_workbook(&sheets(&["M1s", "Bad[name]", "m1s"]), &path).unwrap();

        assert_eq!(summary.written, vec!["m1s"]);
        assert_eq!(summary.failed.len(), 2);
        assert!(path.exists());
    }
}
