use std::{cell::RefCell, rc::Rc, str::from_utf8};

use teller::{console::Console, processor::in_memory_processor::InMemoryBank};

const SCENARIO: &str = include_str!("scenario.csv");

fn run_script(bank: &mut InMemoryBank, script: &str) -> (String, Vec<String>) {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let mut output = Vec::new();
    let console = Console {
        input: script.as_bytes(),
        output: &mut output,
        bank,
        error_printer: Box::new(move |line, err| {
            eprintln!("Error at line {line}: {err}");
            sink.borrow_mut().push(err.to_string());
        }),
    };
    console.run().unwrap();
    let errors = errors.borrow().clone();
    (from_utf8(&output).unwrap().to_owned(), errors)
}

#[test]
fn run_scenario() {
    let mut bank = InMemoryBank::with_seed(2024);

    let (output, errors) = run_script(&mut bank, "register-client,Amina,Zerrouki,0555\n");
    assert!(errors.is_empty());
    let cin = output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("client "))
        .and_then(|line| line.strip_suffix(" registered"))
        .unwrap()
        .to_owned();
    assert_eq!(cin.len(), 6);

    let (output, errors) = run_script(&mut bank, &SCENARIO.replace("{cin}", &cin));
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 14, "unexpected output:\n{output}");

    assert_eq!(lines[0], format!("account 1 opened for client {cin}"));
    assert_eq!(lines[1], "welcome back, Amina");
    assert_eq!(lines[2], "account 1 balance 500");
    assert_eq!(
        lines[3],
        format!("Account #1 (owner {cin}): 500 DA")
    );
    assert!(lines[4].starts_with("  ["));
    assert!(lines[4].ends_with("] CREDIT: +500 DA (Deposit)"));
    assert_eq!(lines[5], format!("account 2 opened for client {cin}"));
    assert_eq!(
        lines[6],
        "transferred 200 DA from account 1 to account 2, account 1 balance 300"
    );
    assert_eq!(lines[7], "total accounts created: 2");
    assert_eq!(
        lines[8],
        format!("CIN: {cin}, Name: Amina Zerrouki, Tel: 0555")
    );
    assert_eq!(lines[9], format!("  Account #1 (owner {cin}): 300 DA"));
    assert_eq!(lines[10], format!("  Account #2 (owner {cin}): 200 DA"));
    assert_eq!(lines[11], "account,owner,balance,transactions");
    assert_eq!(lines[12], format!("1,{cin},300,4"));
    assert_eq!(lines[13], format!("2,{cin},200,2"));

    assert_eq!(
        errors,
        vec![
            "Incorrect password for account #1",
            "Insufficient funds: requested 1000, available 300",
            "Cannot transfer to the same account #1",
            "Amount must be positive, got -5",
        ]
    );

    // the scenario can be shown again from the same bank
    let (output, errors) = run_script(&mut bank, "show-account,2\n");
    assert!(errors.is_empty());
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[1].ends_with("] TRANSFER IN: +200 DA ← Account #1"));
    assert!(lines[2].ends_with("] FAILED CREDIT: -5 DA - Invalid amount"));
}

#[test]
fn overflowing_amounts_do_not_stop_the_script() {
    let mut bank = InMemoryBank::with_seed(7);
    let (output, _) = run_script(&mut bank, "register-client,Karim,Moh\n");
    let cin = output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("client "))
        .and_then(|line| line.strip_suffix(" registered"))
        .unwrap()
        .to_owned();

    let script = format!(
        "open-account,{cin},p
open-account,{cin},q
deposit,1,79228162514264337593543950335
deposit,1,1
deposit,2,10
transfer,2,{cin},1,5
withdraw,1,35
transfer,2,{cin},1,5
count-accounts
"
    );
    let (output, errors) = run_script(&mut bank, &script);
    assert_eq!(
        errors,
        vec![
            "Crediting 1 would overflow the balance of account #1",
            "Crediting 5 would overflow the balance of account #1",
        ]
    );

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[2], "account 1 balance 79228162514264337593543950335");
    assert_eq!(lines[3], "account 2 balance 10");
    assert_eq!(lines[4], "account 1 balance 79228162514264337593543950300");
    assert_eq!(
        lines[5],
        "transferred 5 DA from account 2 to account 1, account 2 balance 5"
    );
    assert_eq!(lines[6], "total accounts created: 2");
    assert_eq!(lines[7], "account,owner,balance,transactions");
    assert_eq!(lines[8], format!("1,{cin},79228162514264337593543950305,4"));
    assert_eq!(lines[9], format!("2,{cin},5,3"));
}
