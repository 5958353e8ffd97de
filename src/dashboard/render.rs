use comfy_table::{
    Attribute, Cell, ContentArrangement, Table, modifiers::UTF8_SOLID_INNER_BORDERS,
    presets::UTF8_FULL,
};

use crate::dashboard::{DashboardReport, SessionFilter};
use crate::dashboard::clash::ClashGroup;
use crate::model::SessionRecord;
use crate::schema::{Column, SESSION_COLUMNS};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

/// Sessions as a terminal table with the destination columns.
pub fn records_table(records: &[&SessionRecord]) -> Table {
    let mut table = new_table();
    table.set_header(
        SESSION_COLUMNS
            .iter()
            .map(|column| header_cell(column.header())),
    );
    for record in records {
        table.add_row(SESSION_COLUMNS.iter().map(|column| record.display(*column)));
    }
    table
}

fn clash_table(groups: &[ClashGroup<'_>]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Session Time"),
        header_cell("Mentor / Faculty"),
        header_cell("S. No"),
    ]);
    for group in groups {
        let serials: Vec<String> = group
            .records
            .iter()
            .filter_map(|record| record.serial_number)
            .map(|serial| serial.to_string())
            .collect();
        let first = group.records.first();
        table.add_row(vec![
            first
                .map(|record| record.display(Column::Date))
                .unwrap_or_default(),
            group.session_time.clone(),
            group.mentor.clone().unwrap_or_else(|| "-".to_string()),
            serials.join(", "),
        ]);
    }
    table
}

/// Full text report: the selected sessions, the aggregates and the clash
/// view.
pub fn render_text(report: &DashboardReport<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!("Session Details ({})\n", report.user));
    if !report.filter.is_empty() {
        out.push_str(&format!("Filters: {}\n", describe_filter(&report.filter)));
    }
    out.push_str(&records_table(&report.records).to_string());
    out.push_str("\n\nKey Performance Indicators\n");
    out.push_str(&format!("Total Sessions: {}\n", report.summary.sessions));
    out.push_str(&format!("Total Hours: {}\n", report.summary.total_hours));
    if report.summary.sessions_without_hours > 0 {
        out.push_str(&format!(
            "Sessions without hours: {}\n",
            report.summary.sessions_without_hours
        ));
    }

    out.push_str("\nSession Clashes\n");
    if report.clashes.is_empty() {
        out.push_str("No session clashes detected.\n");
    } else {
        out.push_str(&format!(
            "{} overlapping group(s) detected:\n",
            report.clashes.len()
        ));
        out.push_str(&clash_table(&report.clashes).to_string());
        out.push('\n');
    }
    out
}

fn describe_filter(filter: &SessionFilter) -> String {
    [
        ("month", &filter.months),
        ("mentor", &filter.mentors),
        ("program", &filter.programs),
        ("day", &filter.days),
        ("client", &filter.clients),
    ]
    .into_iter()
    .filter(|(_, values)| !values.is_empty())
    .map(|(label, values)| format!("{label}={}", values.join(", ")))
    .collect::<Vec<_>>()
    .join("; ")
}

/// JSON form of the report.
pub fn render_json(report: &DashboardReport<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::sample_table;
    use crate::dashboard::{DashboardQuery, build_report};

    #[test]
    fn active_filters_are_listed() {
        let table = sample_table();
        let query = DashboardQuery {
            filter: SessionFilter {
                months: vec!["January".into()],
                mentors: vec!["Arya".into(), "Dev".into()],
                ..SessionFilter::default()
            },
            ..DashboardQuery::default()
        };
        let text = render_text(&build_report(&table, "Arya".into(), &query));

        assert!(text.contains("Filters: month=January; mentor=Arya, Dev\n"), "{text}");
        assert!(text.contains("Total Sessions: 3"), "{text}");
    }

    #[test]
    fn unfiltered_report_has_no_filter_line() {
        let table = sample_table();
        let text = render_text(&build_report(&table, "Arya".into(), &DashboardQuery::default()));

        assert!(!text.contains("Filters:"), "{text}");
        assert!(text.contains("2 overlapping group(s) detected"), "{text}");
    }
}
