use chrono::{NaiveDate, NaiveTime};
use client_bank_exchange::sanitizers::sanitize;
use client_bank_exchange::{
    parse_statement, FormatError, ParseError, Section, Statement, Tax, ValidationError,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

fn read_statement(name: &str) -> String {
    let full_path = PathBuf::from(format!("tests/data/{}", name));
    fs::read_to_string(&full_path).unwrap()
}

fn amount(s: &str) -> Option<Decimal> {
    Some(Decimal::from_str(s).unwrap())
}

#[rstest]
#[case("from_bank.txt", 2)]
#[case("to_bank.txt", 1)]
#[case("to_bank_commercial.txt", 2)]
fn parse_fixture_statement(#[case] statement_path: &str, #[case] documents: usize) {
    let input_data = read_statement(statement_path);
    let statement = parse_statement(&input_data).unwrap();
    assert!(statement.header.format_name);
    assert_eq!(statement.header.format_version.as_deref(), Some("1.02"));
    assert_eq!(statement.count(), documents);
}

#[rstest]
#[case("from_bank.txt")]
#[case("to_bank.txt")]
#[case("to_bank_commercial.txt")]
fn rendering_is_stable(#[case] statement_path: &str) {
    let input_data = read_statement(statement_path);
    let statement = parse_statement(&input_data).unwrap();
    let rendered = statement.to_text(false).unwrap();
    let reparsed = parse_statement(&rendered).unwrap();
    assert_eq!(reparsed, statement);
    assert_eq!(reparsed.to_text(false).unwrap(), rendered);
}

#[rstest]
#[case("from_bank.txt")]
#[case("to_bank.txt")]
#[case("to_bank_commercial.txt")]
fn json_round_trip(#[case] statement_path: &str) {
    let statement = parse_statement(&read_statement(statement_path)).unwrap();
    let json = serde_json::to_string_pretty(&statement).unwrap();
    let from_json: Statement = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, statement);
}

#[test]
fn statement_from_the_bank() {
    let statement = parse_statement(&read_statement("from_bank.txt")).unwrap();

    let header = &statement.header;
    assert_eq!(header.sender, None);
    assert_eq!(
        header.receiver.as_deref(),
        Some("Бухгалтерия предприятия, редакция 3.0")
    );
    assert_eq!(header.creation_date, NaiveDate::from_ymd_opt(2019, 3, 5));
    assert_eq!(header.creation_time, NaiveTime::from_hms_opt(9, 15, 42));
    assert_eq!(header.filter_account_numbers, vec!["40702810400000000001"]);

    let balance = statement.balance.as_ref().unwrap();
    assert_eq!(balance.initial_balance, amount("100000.00"));
    assert_eq!(balance.total_income, amount("25000.00"));
    assert_eq!(balance.total_expense, amount("15000.50"));
    assert_eq!(balance.final_balance, amount("109999.50"));

    let outgoing = &statement.documents[0];
    assert_eq!(
        outgoing.document_type.as_deref(),
        Some("Платежное поручение")
    );
    assert_eq!(outgoing.number.as_deref(), Some("42"));
    assert_eq!(outgoing.payer_bic(), Some("044525225"));
    let receiver = outgoing.receiver.as_ref().unwrap();
    assert_eq!(receiver.date_received, None);
    assert_eq!(receiver.l1_name.as_deref(), Some("АО \"Лютик\""));
    let receipt = outgoing.receipt.as_ref().unwrap();
    assert_eq!(receipt.content.as_deref(), Some("Исполнено"));
    assert_eq!(receipt.time, NaiveTime::from_hms_opt(10, 0, 0));
    assert_eq!(outgoing.tax, Some(Tax::default()));

    let incoming = &statement.documents[1];
    assert_eq!(incoming.amount, amount("25000.00"));
    assert_eq!(incoming.receipt, None);
    assert_eq!(
        incoming.receiver.as_ref().unwrap().date_received,
        NaiveDate::from_ymd_opt(2019, 3, 4)
    );
    assert_eq!(incoming.special.as_ref().unwrap().priority.as_deref(), Some("5"));

    assert_eq!(statement.total_amount(), Decimal::from_str("40000.50").unwrap());
}

#[test]
fn statement_from_the_bank_fails_validation() {
    let statement = parse_statement(&read_statement("from_bank.txt")).unwrap();
    assert_eq!(
        statement.to_text(true),
        Err(ValidationError::MissingRequired {
            key: "Отправитель",
            description: "Программа-отправитель",
        })
    );
}

#[test]
fn statement_from_the_bank_validates_once_the_sender_is_known() {
    let mut statement = parse_statement(&read_statement("from_bank.txt")).unwrap();
    statement.header.sender = Some("Бухгалтерия предприятия, редакция 3.0".to_string());

    let validated = statement.to_text(true).unwrap();
    let reparsed = parse_statement(&validated).unwrap();
    assert_eq!(reparsed, statement);
    assert_eq!(reparsed.to_text(true).unwrap(), validated);
}

#[rstest]
#[case("to_bank.txt")]
#[case("to_bank_commercial.txt")]
fn outbound_statement_renders_verbatim(#[case] statement_path: &str) {
    let input_data = read_statement(statement_path);
    let statement = parse_statement(&input_data).unwrap();
    assert_eq!(statement.to_text(true).unwrap(), input_data.trim_end());
}

#[test]
fn commercial_payments_carry_no_tax_details() {
    let statement = parse_statement(&read_statement("to_bank_commercial.txt")).unwrap();
    for document in &statement.documents {
        assert!(document.tax.as_ref().unwrap().is_empty());
    }
    assert_eq!(statement.total_amount(), Decimal::from_str("49700.00").unwrap());
}

#[test]
fn statement_to_the_bank_renders_verbatim() {
    let input_data = read_statement("to_bank.txt");
    let statement = parse_statement(&input_data).unwrap();
    assert_eq!(statement.balance, None);
    assert_eq!(
        statement.header.filter_document_types,
        vec!["Платежное поручение"]
    );

    let tax = statement.documents[0].tax.as_ref().unwrap();
    assert_eq!(tax.kbk.as_deref(), Some("18210102010011000110"));
    assert_eq!(tax.payment_type, None);
    assert!(!tax.is_empty());

    assert_eq!(statement.to_text(true).unwrap(), input_data.trim_end());
}

#[test]
fn windows_file_needs_sanitizing() {
    let expected = parse_statement(&read_statement("from_bank.txt")).unwrap();
    let windows = read_statement("from_bank_windows.txt");

    let strict = parse_statement(&windows).unwrap();
    assert!(!strict.header.format_name);
    assert_eq!(strict.documents, expected.documents);

    let sanitized = parse_statement(&sanitize(&windows)).unwrap();
    assert_eq!(sanitized, expected);
}

#[test]
fn repeated_key_is_rejected() {
    let result = parse_statement(&read_statement("invalid/duplicate_key.txt"));
    match result {
        Err(ParseError::SchemaViolation(violation)) => assert_eq!(violation.key(), "Номер"),
        other => panic!("Expected a schema violation, got {:?}", other),
    }
}

#[rstest]
#[case("invalid/bad_date.txt", FormatError::Date("2019-03-01".to_string()))]
#[case("invalid/bad_amount.txt", FormatError::Amount("нет".to_string()))]
fn malformed_values_are_rejected(#[case] statement_path: &str, #[case] expected: FormatError) {
    let result = parse_statement(&read_statement(statement_path));
    assert_eq!(result, Err(ParseError::FormatError(expected)));
}

#[test]
fn statement_for_the_bank_from_documents() {
    let parsed = parse_statement(&read_statement("to_bank.txt")).unwrap();
    let created_at = NaiveDate::from_ymd_opt(2019, 2, 28)
        .unwrap()
        .and_hms_opt(17, 45, 3)
        .unwrap();
    let mut statement = Statement::from_documents_at(
        "Бухгалтерия предприятия, редакция 3.0",
        parsed.documents.clone(),
        created_at,
    )
    .unwrap();
    statement.header.filter_document_types = vec!["Платежное поручение".to_string()];
    assert_eq!(statement, parsed);

    let mut documents = parsed.documents.clone();
    documents.extend(
        parse_statement(&read_statement("from_bank.txt"))
            .unwrap()
            .documents,
    );
    assert!(matches!(
        Statement::from_documents("Бухгалтерия", documents),
        Err(ValidationError::MultipleBanks { .. })
    ));
}
