use scenario_export_lib::{
    core::types::{ExpectedResult, QuestionStep, ScenarioRecord},
    export::csv::{serialize, HEADERS},
};

// ── Test Helpers ──────────────────────────────────────────────────────────────

/// Minimal RFC 4180 reader: quoted fields may hold separators, doubled
/// quotes and CRLF line breaks.
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) => in_quotes = true,
            (',', false) => row.push(std::mem::take(&mut field)),
            ('\r', false) if chars.peek() == Some(&'\n') => {
                chars.next();
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (c, _) => field.push(c),
        }
    }
    rows
}

fn record(name: &str, steps: &[(&str, &str, &str)], result: &str) -> ScenarioRecord {
    ScenarioRecord {
        name: name.to_string(),
        steps: steps
            .iter()
            .map(|(id, question, response)| QuestionStep {
                id: id.to_string(),
                question_text: question.to_string(),
                selected_response: response.to_string(),
            })
            .collect(),
        expected_result: ExpectedResult::new(result),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn header_row_is_fixed() {
    let csv = serialize(&[], None);
    assert_eq!(
        csv,
        "Test Group,Test Scenario ID,Steps - Question ID: Question text: Selected Response,\
         Expected Result,Status,Actioned By,Date,Notes\r\n"
    );
    assert_eq!(HEADERS.len(), 8);
}

#[test]
fn group_label_is_written_on_first_row_only() {
    let records = vec![
        record("test scenario 1", &[("Q1", "Which color?", "Blue")], "Product A"),
        record("test scenario 2", &[("Q1", "Which size?", "any text")], "Product B"),
    ];

    let rows = parse_csv(&serialize(&records, Some("Checkout")));

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == 8));
    assert_eq!(rows[1][0], "Checkout");
    assert_eq!(rows[2][0], "");
    assert_eq!(rows[1][1], "test scenario 1");
    assert_eq!(rows[2][1], "test scenario 2");
}

#[test]
fn steps_share_one_quoted_multiline_cell() {
    let records = vec![record(
        "test scenario 1",
        &[("Q1", "Which color?", "Blue"), ("Q2", "Which size?", "Large")],
        "Product A",
    )];

    let csv = serialize(&records, None);
    assert!(csv.contains(
        ",test scenario 1,\"Q1:Which color?:Blue\r\nQ2:Which size?:Large\",\"Product A\",,,,\r\n"
    ));

    let rows = parse_csv(&csv);
    assert_eq!(rows[1][2], "Q1:Which color?:Blue\r\nQ2:Which size?:Large");
    assert_eq!(rows[1][3], "Product A");
    assert_eq!(&rows[1][4..], ["", "", "", ""]);
}

#[test]
fn parsed_output_has_one_row_per_record() {
    let records: Vec<_> = (1..=5)
        .map(|idx| {
            record(
                &format!("test scenario {idx}"),
                &[("Q1", "Say \"hello\", then?", "Hi"), ("Q2", "Next", "any text")],
                "Result, with \"quotes\"",
            )
        })
        .collect();

    let rows = parse_csv(&serialize(&records, Some("Greetings, formal")));

    assert_eq!(rows.len() - 1, records.len());
    assert_eq!(rows[1][0], "Greetings, formal");
    assert_eq!(rows[3][2], "Q1:Say \"hello\", then?:Hi\r\nQ2:Next:any text");
    assert_eq!(rows[5][3], "Result, with \"quotes\"");
}
