#![feature(test)]

extern crate test;

use client_bank_exchange::parse_statement;
use client_bank_exchange::sanitizers::sanitize;
use test::Bencher;

static FROM_BANK_STATEMENT: &str = include_str!("../tests/data/from_bank.txt");
static WINDOWS_STATEMENT: &str = include_str!("../tests/data/from_bank_windows.txt");
static TO_BANK_STATEMENT: &str = include_str!("../tests/data/to_bank.txt");

#[bench]
fn bench_windows_statement_with_sanitize(b: &mut Bencher) {
    b.iter(|| parse_statement(&sanitize(WINDOWS_STATEMENT)).unwrap());
}

#[bench]
fn bench_from_bank_statement(b: &mut Bencher) {
    b.iter(|| parse_statement(FROM_BANK_STATEMENT).unwrap());
}

#[bench]
fn bench_to_bank_statement(b: &mut Bencher) {
    b.iter(|| parse_statement(TO_BANK_STATEMENT).unwrap());
}

#[bench]
fn bench_render_from_bank_statement(b: &mut Bencher) {
    let statement = parse_statement(FROM_BANK_STATEMENT).unwrap();
    b.iter(|| statement.to_text(false).unwrap());
}
