use std::fs;
use std::path::Path;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_catering-quote"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

fn assert_pdf(name: &str) {
    let path = output_dir().join(name);
    assert!(path.exists(), "PDF file was not created");

    let bytes = fs::read(&path).expect("Failed to read PDF");
    assert!(bytes.starts_with(b"%PDF"), "Output is not a PDF");
    assert!(bytes.len() > 1000, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_client_quote() {
    setup();
    let output_file = "test-client-quote.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/quote.json",
            "-d", "2025-05-17",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated"), "Missing status line: {}", stdout);
    assert!(stdout.contains("Items: 3"), "Unselected product was included: {}", stdout);
}

#[test]
fn test_internal_analysis() {
    setup();
    let output_file = "test-internal-analysis.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/quote.json",
            "-k", "internal",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);
}

#[test]
fn test_menu_listing() {
    setup();
    let output_file = "test-menu.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/nothing-selected.json",
            "-k", "menu",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    // Menus list the whole catalog, selected or not.
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);
}

#[test]
fn test_large_quote_spans_pages() {
    setup();
    let output_file = "test-large-quote.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/large-quote.json",
            "-k", "internal",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Pages: 1\n"), "Expected several pages: {}", stdout);
}

#[test]
fn test_missing_logo_still_renders() {
    setup();
    let output_file = "test-missing-logo.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/quote.json",
            "--logo", "tests/fixtures/no-such-logo.png",
            "--logo-timeout-ms", "500",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);
}

#[test]
fn test_custom_company_profile() {
    setup();
    let output_file = "test-company.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/quote.json",
            "--company", "tests/fixtures/company.json",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);
}

#[test]
fn test_plan_prints_layout() {
    let output = cargo_bin()
        .args(["-i", "tests/fixtures/quote.json", "--company", "tests/fixtures/company.json", "--plan"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- page 1 ---"));
    assert!(stdout.contains("PREVENTIVO CATERING"));
    assert!(stdout.contains("Trattoria Da Mario"));
    assert!(stdout.contains("TOTALE COMPLESSIVO (IVA ESCLUSA):"));
    assert!(stdout.contains("€370.00"));
}

#[test]
fn test_nothing_selected() {
    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/nothing-selected.json",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for an empty selection");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No items selected"), "Unexpected error: {}", stderr);
}

#[test]
fn test_missing_input_file() {
    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/nonexistent.json",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing input");
}

#[test]
fn test_invalid_date_format() {
    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/quote.json",
            "-d", "not-a-date",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid date");
}
