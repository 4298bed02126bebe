//! Sample inbox generator for tiff-erator.
//!
//! Writes a folder holding one file of every supported kind, plus a few that
//! exercise the edge cases (wide and long sheets, legacy encodings, empty
//! documents, corrupt input, unsupported suffixes). Point the CLI at it:
//!
//! ```text
//! cargo run -p fixture-generator
//! cargo run -p tifferator-cli -- tests/fixtures/output /tmp/tiffs
//! ```

use anyhow::Result;
use docx_rs::{BreakType, Docx, Paragraph, Run};
use image::{Rgb, RgbImage};
use rust_xlsxwriter::Workbook;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    let output_dir = Path::new("tests/fixtures/output");
    fs::create_dir_all(output_dir)?;

    println!("Generating sample inbox...\n");

    // Word
    generate_letter_docx(output_dir)?;
    generate_empty_docx(output_dir)?;
    generate_corrupt_docx(output_dir)?;

    // Spreadsheets
    generate_simple_xlsx(output_dir)?;
    generate_wide_xlsx(output_dir)?;
    generate_long_xlsx(output_dir)?;
    generate_blank_xlsx(output_dir)?;
    generate_csv_files(output_dir)?;

    // Email and images
    generate_eml_files(output_dir)?;
    generate_images(output_dir)?;

    // Skipped by the converter
    generate_unsupported(output_dir)?;

    println!("\nAll fixtures generated successfully!");
    Ok(())
}

fn announce(path: &Path) {
    println!("  Creating: {}", path.display());
}

/// A short letter: one page per paragraph, including the blank ones.
fn generate_letter_docx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("letter.docx");
    announce(&path);

    let docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Dear customer,")))
        .add_paragraph(Paragraph::new())
        .add_paragraph(Paragraph::new().add_run(
            Run::new()
                .add_text("Your order has shipped.")
                .add_break(BreakType::TextWrapping)
                .add_text("Tracking details follow in a separate message."),
        ))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Item"))
                .add_run(Run::new().add_tab().add_text("Qty")),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Kind regards")));

    docx.build().pack(File::create(&path)?)?;
    Ok(())
}

/// No paragraphs at all, so no TIFF is written.
fn generate_empty_docx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("empty.docx");
    announce(&path);

    Docx::new().build().pack(File::create(&path)?)?;
    Ok(())
}

fn generate_corrupt_docx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("corrupt.docx");
    announce(&path);

    let mut file = File::create(&path)?;
    file.write_all(b"This is not a valid DOCX file. It's just garbage data.")?;
    Ok(())
}

fn generate_simple_xlsx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("simple.xlsx");
    announce(&path);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("People")?;
    sheet.write_string(0, 0, "Name")?;
    sheet.write_string(0, 1, "Age")?;
    sheet.write_string(0, 2, "City")?;

    let data = [
        ("Alice", 28, "New York"),
        ("Bob", 35, "Los Angeles"),
        ("Charlie", 42, "Chicago"),
    ];
    for (row, (name, age, city)) in data.iter().enumerate() {
        let r = (row + 1) as u32;
        sheet.write_string(r, 0, *name)?;
        sheet.write_number(r, 1, *age as f64)?;
        sheet.write_string(r, 2, *city)?;
    }

    let notes = workbook.add_worksheet().set_name("Notes")?;
    notes.write_string(0, 0, "Second sheet")?;
    notes.write_boolean(1, 0, true)?;

    workbook.save(&path)?;
    Ok(())
}

/// 40 columns: landscape needs fewer pages than portrait.
fn generate_wide_xlsx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("wide.xlsx");
    announce(&path);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for row in 0..5u32 {
        for col in 0..40u16 {
            sheet.write_number(row, col, (row * 100 + col as u32) as f64)?;
        }
    }
    workbook.save(&path)?;
    Ok(())
}

/// 400 rows in 3 columns: portrait wins.
fn generate_long_xlsx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("long.xlsx");
    announce(&path);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for row in 0..400u32 {
        sheet.write_number(row, 0, row as f64)?;
        sheet.write_string(row, 1, format!("item-{}", row))?;
        sheet.write_number(row, 2, row as f64 * 1.5)?;
    }
    workbook.save(&path)?;
    Ok(())
}

fn generate_blank_xlsx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("blank.xlsx");
    announce(&path);

    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path)?;
    Ok(())
}

fn generate_csv_files(output_dir: &Path) -> Result<()> {
    let utf8 = output_dir.join("orders.csv");
    announce(&utf8);
    fs::write(
        &utf8,
        "id,customer,total\n1,Zoë,12.50\n2,Łukasz,7.25\n3,,0\n",
    )?;

    // Windows-1252 bytes, no BOM.
    let legacy = output_dir.join("legacy.csv");
    announce(&legacy);
    fs::write(&legacy, b"Stra\xdfe,M\xfcnchen\nK\xf6ln,Z\xfcrich\n")?;

    let empty = output_dir.join("empty.csv");
    announce(&empty);
    fs::write(&empty, "")?;
    Ok(())
}

fn generate_eml_files(output_dir: &Path) -> Result<()> {
    let plain = output_dir.join("plain.eml");
    announce(&plain);
    fs::write(
        &plain,
        "From: sender@example.com\r\nTo: you@example.com\r\nSubject: Meeting\r\n\
Content-Type: text/plain; charset=utf-8\r\n\r\nSee you at 10.\r\nBring the report.\r\n",
    )?;

    let html = output_dir.join("html-only.eml");
    announce(&html);
    fs::write(
        &html,
        "From: news@example.com\r\nSubject: Newsletter\r\nContent-Type: text/html\r\n\r\n\
<html><body><h1>News</h1><p>Nothing new.</p></body></html>\r\n",
    )?;
    Ok(())
}

fn generate_images(output_dir: &Path) -> Result<()> {
    let gradient = RgbImage::from_fn(320, 200, |x, y| {
        Rgb([(x * 255 / 319) as u8, (y * 255 / 199) as u8, 128])
    });

    let png = output_dir.join("gradient.png");
    announce(&png);
    gradient.save(&png)?;

    let jpg = output_dir.join("Photo.JPG");
    announce(&jpg);
    gradient.save_with_format(&jpg, image::ImageFormat::Jpeg)?;
    Ok(())
}

fn generate_unsupported(output_dir: &Path) -> Result<()> {
    let txt = output_dir.join("readme.txt");
    announce(&txt);
    fs::write(&txt, "This file is skipped.")?;

    // Upper-case .PDF is not routed to the PDF converter.
    let pdf = output_dir.join("SCAN.PDF");
    announce(&pdf);
    fs::write(&pdf, "%PDF-1.4\n%%EOF\n")?;
    Ok(())
}
