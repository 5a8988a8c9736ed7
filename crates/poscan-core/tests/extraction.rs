//! End-to-end extraction behavior over tokenized rows and files.

use std::fs;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tempfile::TempDir;

use poscan_core::models::config::{PdfConfig, SourceConfig};
use poscan_core::{
    flatten_outcomes, tokenizer_for_path, DocumentOutcome, ExtractionResult, FailureKind,
    JsonRowTokenizer, PurchaseOrderExtractor,
};

fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn quick_source() -> SourceConfig {
    SourceConfig {
        max_attempts: 3,
        retry_delay_ms: 1,
    }
}

const PRODUCT: &[&str] = &["RED", "Red", "M", "123456789012", "10", "10", "0", "2.50", "25.00"];

#[test]
fn test_five_row_sheet() {
    let input = rows(&[
        &["PO: 12345"],
        &["style: ABC123"],
        &["Style Description: Test Item"],
        &["BRAND DESC: Acme"],
        PRODUCT,
    ]);

    let result = PurchaseOrderExtractor::new().extract_rows(&input);

    assert!(result.success);
    assert_eq!(result.header.po.as_deref(), Some("12345"));
    assert_eq!(result.metadata.style.as_deref(), Some("ABC123"));
    assert_eq!(result.metadata.style_description.as_deref(), Some("Test Item"));
    assert_eq!(result.metadata.brand_desc.as_deref(), Some("Acme"));
    assert_eq!(result.items.len(), 1);

    let item = &result.items[0];
    assert_eq!(item.upc, "123456789012");
    assert_eq!(item.unit_cost, Decimal::new(25, 1));
    assert_eq!(item.total_cost, Decimal::new(25, 0));
}

#[test]
fn test_extraction_is_repeatable() {
    let input = rows(&[
        &["Purchase Order 777"],
        &["Buyer:"],
        &["Jane Doe"],
        &["Acme Apparel"],
        &["DC 9"],
        PRODUCT,
        &["Total For Color: RED", "10", "10", "0", "$25.00"],
    ]);

    let extractor = PurchaseOrderExtractor::new();
    assert_eq!(extractor.extract_rows(&input), extractor.extract_rows(&input));
}

#[test]
fn test_first_label_wins_for_every_field() {
    let input = rows(&[
        &["PO: 111"],
        &["style: FIRST"],
        &["BRAND DESC: One"],
        &["Original CRD Date: 01/02/2024"],
        &["STYLE PROTO # P1"],
        &["PO: 222"],
        &["style: SECOND"],
        &["BRAND DESC: Two"],
        &["Original CRD Date: 03/04/2025"],
        &["STYLE PROTO # P2"],
    ]);

    let meta = PurchaseOrderExtractor::new().extract_rows(&input);
    assert_eq!(meta.header.po.as_deref(), Some("111"));
    assert_eq!(meta.metadata.style.as_deref(), Some("FIRST"));
    assert_eq!(meta.metadata.brand_desc.as_deref(), Some("One"));
    assert_eq!(meta.metadata.original_crd_date.as_deref(), Some("01/02/2024"));
    assert_eq!(meta.metadata.style_proto.as_deref(), Some("P1"));
}

#[test]
fn test_block_order_does_not_matter() {
    let style_block: &[&[&str]] = &[&["style: ABC123"], &["Style Description: Test Item"]];
    let brand_block: &[&[&str]] = &[&["BRAND DESC:"], &["Acme Outdoor"]];
    let goods_block: &[&[&str]] = &[&["COMMERCIAL GOODS"], &["Knit pullover"]];

    fn assemble(blocks: &[&[&[&str]]]) -> ExtractionResult {
        let mut lines: Vec<&[&str]> = Vec::new();
        lines.push(&["PO: 5"]);
        for block in blocks {
            lines.extend_from_slice(block);
        }
        lines.push(PRODUCT);
        PurchaseOrderExtractor::new().extract_rows(&rows(&lines))
    }

    let a = assemble(&[style_block, brand_block, goods_block]);
    let b = assemble(&[goods_block, brand_block, style_block]);
    let c = assemble(&[brand_block, style_block, goods_block]);

    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.metadata.brand_desc.as_deref(), Some("Acme Outdoor"));
    assert_eq!(a.metadata.commercial_goods.as_deref(), Some("Knit pullover"));
}

#[test]
fn test_emitted_upcs_are_long_digit_strings() {
    let input = rows(&[
        &["RED", "Red", "S", "UPC 1234-5678-9012", "1", "1", "0", "1.00", "1.00"],
        &["RED", "Red", "M", "12345678901", "1", "1", "0", "1.00", "1.00"],
        &["C001", "Navy", "L", "4", "4", "0", "2.00", "8.00"],
        &["Total For Color: RED", "2", "2", "0", "$2.00"],
    ]);

    let result = PurchaseOrderExtractor::new().extract_rows(&input);
    assert_eq!(result.items.len(), 3);
    for item in result.items.iter().filter(|i| !i.upc.is_empty()) {
        assert!(item.upc.len() >= 12);
        assert!(item.upc.chars().all(|c| c.is_ascii_digit()));
    }
    assert_eq!(result.items[0].upc, "123456789012");
    assert!(result.items[2].is_color_subtotal());
}

#[test]
fn test_malformed_numbers_are_zero() {
    let input = rows(&[&["RED", "Red", "M", "123456789012", "N/A", "-5", "n/a", "N/A", "-3.00"]]);

    let item = &PurchaseOrderExtractor::new().extract_rows(&input).items[0];
    assert_eq!(item.original_quantity, 0);
    assert_eq!(item.current_quantity, 0);
    assert_eq!(item.shipped_quantity, 0);
    assert_eq!(item.unit_cost, Decimal::ZERO);
    assert_eq!(item.total_cost, Decimal::ZERO);
}

#[test]
fn test_cost_cells_read_their_leading_number() {
    let input = rows(&[&["RED", "Red", "M", "123456789012", "10", "10", "0", "2.50-", "25.00 ea."]]);

    let item = &PurchaseOrderExtractor::new().extract_rows(&input).items[0];
    assert_eq!(item.unit_cost, Decimal::new(25, 1));
    assert_eq!(item.total_cost, Decimal::new(25, 0));
}

#[test]
fn test_empty_item_table_is_still_serialized() {
    let result = PurchaseOrderExtractor::new().extract_rows(&rows(&[&["PO: 1"]]));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["header"]["po"], "1");
    assert_eq!(json["items"], serde_json::json!([]));
}

#[test]
fn test_spaced_labels_resolve_like_single_spaced_ones() {
    let input = rows(&[
        &["style:  ABC123"],
        &["Style   Description: Crew Neck Tee"],
        &["COMMERCIAL  GOODS: Knit pullover"],
        &["BRAND  DESC: Acme"],
    ]);

    let result = PurchaseOrderExtractor::new().extract_rows(&input);
    assert_eq!(result.metadata.style_description.as_deref(), Some("Crew Neck Tee"));
    assert_eq!(result.metadata.commercial_goods.as_deref(), Some("Knit pullover"));
    assert_eq!(result.metadata.brand_desc.as_deref(), Some("Acme"));
}

#[test]
fn test_noise_rows_change_nothing() {
    let clean = rows(&[&["PO: 12345"], &["style: ABC123"], &["BRAND DESC: Acme"], PRODUCT]);
    let noisy = rows(&[
        &["Page 1 of 3"],
        &["PO: 12345"],
        &["", "  ", ""],
        &["style: ABC123"],
        &["Color", "Desc", "Size", "UPC", "Orig", "Curr", "Ship", "Unit", "Total"],
        &["BRAND DESC: Acme"],
        &["Printed 2024-03-01 10:15"],
        PRODUCT,
        &["Confidential"],
    ]);

    let extractor = PurchaseOrderExtractor::new();
    assert_eq!(extractor.extract_rows(&clean), extractor.extract_rows(&noisy));
}

#[test]
fn test_unreadable_path_fails_without_items() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never.json");

    let result = PurchaseOrderExtractor::new().extract_path(
        &path,
        &JsonRowTokenizer::new(),
        &quick_source(),
    );

    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::SourceUnreadable));
    assert!(result.error.unwrap().contains("after 3 attempts"));
    assert!(result.items.is_empty());
}

#[test]
fn test_file_arriving_late_is_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("late.json");

    let writer_path = path.clone();
    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        let partial = writer_path.with_extension("part");
        fs::write(&partial, r#"[["PO: 4242"]]"#).unwrap();
        fs::rename(partial, writer_path).unwrap();
    });

    let source = SourceConfig {
        max_attempts: 200,
        retry_delay_ms: 10,
    };
    let result =
        PurchaseOrderExtractor::new().extract_path(&path, &JsonRowTokenizer::new(), &source);
    writer.join().unwrap();

    assert!(result.success);
    assert_eq!(result.header.po.as_deref(), Some("4242"));
}

#[test]
fn test_json_rows_file_to_export() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("b.json");
    let second = dir.path().join("a.json");
    let broken = dir.path().join("c.json");

    fs::write(
        &first,
        r#"[["PO: 200"],
            ["RED","Red","L","123456789012","1","1","0","1.00","1.00"],
            ["RED","Red","XS","123456789013","1","1","0","1.00","1.00"],
            ["RED","Red","2XL","123456789014","1","1","0","1.00","1.00"],
            ["RED","Red","M","123456789015","1","1","0","1.00","1.00"]]"#,
    )
    .unwrap();
    fs::write(
        &second,
        r#"[["PO: 100"], ["RED","Red","S","123456789016",1,1,0,"1.00","1.00"], [null]]"#,
    )
    .unwrap();
    fs::write(&broken, r#"{"rows": []}"#).unwrap();

    let extractor = PurchaseOrderExtractor::new();
    let outcomes: Vec<DocumentOutcome> = [&first, &second, &broken]
        .iter()
        .map(|path| {
            let tokenizer = tokenizer_for_path(path, &PdfConfig::default()).unwrap();
            let result = extractor.extract_path(path, tokenizer.as_ref(), &quick_source());
            DocumentOutcome::new(path.file_name().unwrap().to_string_lossy(), result)
        })
        .collect();

    assert_eq!(outcomes[2].tables.failure, Some(FailureKind::TokenizationFailed));

    let report = flatten_outcomes(&outcomes);
    let sizes: Vec<(&str, &str)> = report
        .rows
        .iter()
        .map(|r| (r.po.as_str(), r.size.as_str()))
        .collect();
    assert_eq!(
        sizes,
        vec![("100", "S"), ("200", "XS"), ("200", "M"), ("200", "L"), ("200", "2XL")]
    );
    assert_eq!(report.processed_files, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("File 3 (c.json):"));
}
