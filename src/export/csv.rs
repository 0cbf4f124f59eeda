use crate::core::types::ScenarioRecord;

pub const HEADERS: [&str; 8] = [
    "Test Group",
    "Test Scenario ID",
    "Steps - Question ID: Question text: Selected Response",
    "Expected Result",
    "Status",
    "Actioned By",
    "Date",
    "Notes",
];

const LINE_END: &str = "\r\n";
const SEPARATOR: char = ',';

pub fn serialize(records: &[ScenarioRecord], group_label: Option<&str>) -> String {
    let mut out = String::new();
    write_row(&mut out, HEADERS.into_iter().map(Cell::Plain));

    for (idx, record) in records.iter().enumerate() {
        let group = if idx == 0 { group_label.unwrap_or("") } else { "" };
        let steps = record
            .steps
            .iter()
            .map(|step| step.to_cell_line())
            .collect::<Vec<_>>()
            .join(LINE_END);

        write_row(
            &mut out,
            [
                Cell::Plain(group),
                Cell::Plain(&record.name),
                Cell::Quoted(&steps),
                Cell::Quoted(&record.expected_result.result),
                Cell::Plain(""),
                Cell::Plain(""),
                Cell::Plain(""),
                Cell::Plain(""),
            ],
        );
    }

    out
}

enum Cell<'a> {
    /// Quoted only when the content requires it.
    Plain(&'a str),
    Quoted(&'a str),
}

fn write_row<'a>(out: &mut String, cells: impl IntoIterator<Item = Cell<'a>>) {
    for (idx, cell) in cells.into_iter().enumerate() {
        if idx > 0 {
            out.push(SEPARATOR);
        }
        match cell {
            Cell::Plain(value) if !needs_quotes(value) => out.push_str(value),
            Cell::Plain(value) | Cell::Quoted(value) => push_quoted(out, value),
        }
    }
    out.push_str(LINE_END);
}

fn needs_quotes(value: &str) -> bool {
    value.contains([SEPARATOR, '"', '\r', '\n'])
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    out.push_str(&value.replace('"', "\"\""));
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ExpectedResult, QuestionStep};

    #[test]
    fn doubles_embedded_quotes() {
        let record = ScenarioRecord {
            name: "test scenario, \"quoted\"".to_string(),
            steps: vec![QuestionStep {
                id: "Q1".to_string(),
                question_text: "Say \"hi\"?".to_string(),
                selected_response: "Yes".to_string(),
            }],
            expected_result: ExpectedResult::new("Product \"A\""),
        };

        let csv = serialize(&[record], None);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(
            row,
            r#","test scenario, ""quoted""","Q1:Say ""hi""?:Yes","Product ""A""",,,,"#
        );
    }
}
