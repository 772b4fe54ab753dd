use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::model::{Roster, COLUMN_HEADERS};

/// Default worksheet name, matching what spreadsheet tools create.
pub const SHEET_NAME: &str = "Sheet1";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Download formats offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn filter_name(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Csv => "CSV",
        }
    }

    pub fn render(self, roster: &Roster) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Xlsx => export_xlsx(roster),
            ExportFormat::Csv => export_csv(roster),
        }
    }
}

/// Render the full roster in `format` and write it to `path`.
/// Returns the number of bytes written.
pub fn write_export(path: &Path, format: ExportFormat, roster: &Roster) -> Result<usize> {
    let bytes = format.render(roster)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("failed to write export file {}", path.display()))?;
    Ok(bytes.len())
}

/// Serialize the full roster as an `.xlsx` workbook with a single sheet:
/// a header row followed by one row per record in roster order.
pub fn export_xlsx(roster: &Roster) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet
        .set_name(SHEET_NAME)
        .context("naming worksheet")?;
    for (col, header) in (0u16..).zip(COLUMN_HEADERS) {
        sheet
            .write_string_with_format(0, col, header, &bold)
            .with_context(|| format!("writing header {header}"))?;
    }

    for (row, r) in (1u32..).zip(roster.records()) {
        sheet
            .write_string(row, 0, &r.name)
            .and_then(|s| s.write_number(row, 1, f64::from(r.class_id.get())))
            .and_then(|s| s.write_number(row, 2, f64::from(r.score.get())))
            .and_then(|s| s.write_string(row, 3, r.status().label()))
            .with_context(|| format!("writing row for {}", r.name))?;
    }

    workbook
        .save_to_buffer()
        .context("failed to finalize workbook")
}

/// Same table as [`export_xlsx`], as UTF-8 CSV.
pub fn export_csv(roster: &Roster) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(COLUMN_HEADERS)
        .context("writing CSV header")?;
    for r in roster.records() {
        let class_id = r.class_id.to_string();
        let score = r.score.to_string();
        writer
            .write_record([
                r.name.as_str(),
                class_id.as_str(),
                score.as_str(),
                r.status().label(),
            ])
            .with_context(|| format!("writing CSV row for {}", r.name))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open xlsx archive");
        let mut text = String::new();
        archive
            .by_name(name)
            .expect("entry present")
            .read_to_string(&mut text)
            .expect("read entry");
        text
    }

    /// Characters XML 1.0 does not allow anywhere in a document.
    fn has_forbidden_xml_chars(text: &str) -> bool {
        text.chars()
            .any(|c| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r'))
    }

    #[test]
    fn xlsx_contains_required_parts() {
        let bytes = export_xlsx(&Roster::seeded()).expect("export");
        assert_eq!(&bytes[..4], &[0x50, 0x4B, 0x03, 0x04]);
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).expect("archive");
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
        assert!(read_entry(&bytes, "xl/workbook.xml").contains(r#"name="Sheet1""#));
    }

    #[test]
    fn sheet_rows_follow_roster_order() {
        let mut roster = Roster::seeded();
        roster.delete(&["丁一"]);
        roster.add("新生", 2, 45).unwrap();
        let bytes = export_xlsx(&roster).expect("export");
        let sheet = read_entry(&bytes, "xl/worksheets/sheet1.xml");
        let strings = read_entry(&bytes, "xl/sharedStrings.xml");

        assert_eq!(sheet.matches("<row ").count(), roster.len() + 1);
        assert!(sheet.contains(r#"<c r="C11""#));
        assert!(sheet.contains("<v>45</v>"));
        for expected in ["姓名", "状态", "刘二", "新生", "❌ 不及格"] {
            assert!(strings.contains(expected), "missing {expected}");
        }
        assert!(!strings.contains("丁一"));
        // Shared strings are stored in first-use order.
        let liu = strings.find("刘二").unwrap();
        let xin = strings.find("新生").unwrap();
        assert!(liu < xin);
    }

    #[test]
    fn names_are_xml_escaped() {
        let mut roster = Roster::default();
        roster.add("<Tom & Jerry>", 1, 60).unwrap();
        let bytes = export_xlsx(&roster).expect("export");
        let strings = read_entry(&bytes, "xl/sharedStrings.xml");
        assert!(strings.contains("&lt;Tom &amp; Jerry&gt;"));
    }

    #[test]
    fn control_characters_in_names_keep_xml_well_formed() {
        let mut roster = Roster::default();
        roster.add("a\u{1}b", 1, 70).unwrap();
        let bytes = export_xlsx(&roster).expect("export");

        let strings = read_entry(&bytes, "xl/sharedStrings.xml");
        let sheet = read_entry(&bytes, "xl/worksheets/sheet1.xml");
        assert!(!has_forbidden_xml_chars(&strings));
        assert!(!has_forbidden_xml_chars(&sheet));
        assert!(strings.contains("a_x0001_b"));
    }

    #[test]
    fn empty_roster_exports_header_only() {
        let bytes = export_xlsx(&Roster::default()).expect("export");
        let sheet = read_entry(&bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), 1);
    }

    #[test]
    fn write_export_creates_file() {
        let dir = std::env::temp_dir().join(format!(
            "grade-panda-export-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("成绩数据.xlsx");

        let written = write_export(&path, ExportFormat::Xlsx, &Roster::seeded()).expect("write");
        let on_disk = std::fs::read(&path).expect("read back");
        assert_eq!(on_disk.len(), written);
        assert!(read_entry(&on_disk, "xl/sharedStrings.xml").contains("郑十"));

        let missing = dir.join("no-such-dir").join("out.csv");
        assert!(write_export(&missing, ExportFormat::Csv, &Roster::seeded()).is_err());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn csv_matches_roster() {
        let roster = Roster::seeded();
        let bytes = export_csv(&roster).expect("export");
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, COLUMN_HEADERS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(&rows[3][0], "李四");
        assert_eq!(&rows[3][1], "3");
        assert_eq!(&rows[3][2], "55");
        assert_eq!(&rows[3][3], "❌ 不及格");
    }
}
