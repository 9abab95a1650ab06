use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use super::{Document, SheetConfig};
use crate::error::{ReadWriteError, Result};
use crate::storage::{parse_grd_content, read_grd_version, write_grd_content};

impl Document {
    /// Serialize the document as .grd text.
    fn to_grd(&self) -> String {
        let names = self.names_of_nonempty();
        let cells: Vec<(&str, _)> = names
            .iter()
            .filter_map(|name| self.cells.get(name).map(|cell| (name.as_str(), &cell.contents)))
            .collect();
        write_grd_content(self.version(), &cells)
    }

    /// Write the document to `writer` and mark it unmodified.
    pub fn save_to<W: Write>(&mut self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_grd().as_bytes())?;
        writer.flush()?;
        self.modified = false;
        log::info!("saved {} cells (version {})", self.cells.len(), self.version());
        Ok(())
    }

    /// Save to a file, replacing it if it exists.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        fs::write(path, self.to_grd())?;
        self.modified = false;
        log::info!("saved {}", path.display());
        Ok(())
    }

    /// Read a document saved with the same version tag as `config`.
    ///
    /// Every cell is replayed through `set_contents`, so a file that would
    /// not be accepted cell by cell (bad names, bad formulas, cycles) fails
    /// to load. The loaded document is unmodified.
    pub fn load_from<R: Read>(mut reader: R, config: SheetConfig) -> Result<Document> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::load_str(&content, config)
    }

    pub fn load(path: &Path, config: SheetConfig) -> Result<Document> {
        let content = fs::read_to_string(path)?;
        let doc = Self::load_str(&content, config)?;
        log::info!("loaded {} ({} cells)", path.display(), doc.cells.len());
        Ok(doc)
    }

    fn load_str(content: &str, config: SheetConfig) -> Result<Document> {
        let saved = parse_grd_content(content)?;
        if saved.version != config.version() {
            return Err(ReadWriteError::VersionMismatch {
                expected: config.version().to_string(),
                found: saved.version,
            }
            .into());
        }

        let mut doc = Document::with_config(config);
        for cell in saved.cells {
            log::trace!("line {}: {} = {:?}", cell.line, cell.name, cell.contents);
            if let Err(err) = doc.set_contents(&cell.name, &cell.contents) {
                log::warn!("load failed at line {} ({}): {}", cell.line, cell.name, err);
                return Err(ReadWriteError::InvalidCell {
                    cell: cell.name,
                    source: Box::new(err),
                }
                .into());
            }
        }
        doc.modified = false;
        Ok(doc)
    }

    /// Version tag of a saved file, without loading its cells.
    pub fn saved_version(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)?;
        Ok(read_grd_version(&content)?)
    }

    pub fn saved_version_from<R: Read>(mut reader: R) -> Result<String> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(read_grd_version(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CellContents, CellValue};
    use crate::error::GridcalcError;
    use proptest::prelude::*;

    fn config(version: &str) -> SheetConfig {
        SheetConfig::new().with_version(version)
    }

    fn saved(doc: &mut Document) -> String {
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_save_format() {
        let mut doc = Document::with_config(config("1.0"));
        doc.set_contents("B1", "=A1 * 2").unwrap();
        doc.set_contents("A1", "42").unwrap();
        doc.set_contents("A2", "say \"hi\"").unwrap();
        assert_eq!(
            saved(&mut doc),
            "# gridcalc spreadsheet\n@version: \"1.0\"\nA1: 42\nB1: =A1*2\nA2: \"say \\\"hi\\\"\"\n"
        );
    }

    #[test]
    fn test_save_clears_modified() {
        let mut doc = Document::new();
        doc.set_contents("A1", "1").unwrap();
        assert!(doc.is_modified());
        saved(&mut doc);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.grd");

        let mut doc = Document::with_config(config("2"));
        doc.set_contents("A1", "1.5").unwrap();
        doc.set_contents("A2", "label").unwrap();
        doc.set_contents("A3", "=A1*4").unwrap();
        doc.save(&path).unwrap();

        let mut loaded = Document::load(&path, config("2")).unwrap();
        assert!(!loaded.is_modified());
        assert_eq!(loaded.names_of_nonempty(), vec!["A1", "A2", "A3"]);
        assert_eq!(loaded.contents("A2").unwrap(), Some(&CellContents::Text("label".into())));
        assert_eq!(loaded.value("A3").unwrap(), CellValue::Number(6.0));
        assert_eq!(loaded.direct_referencers("A1").unwrap(), vec!["A3"]);
    }

    #[test]
    fn test_loaded_sheet_evaluates_the_same() {
        let mut doc = Document::new();
        let inputs = [
            ("A1", "1.5"),
            ("B1", "2"),
            ("C1", "=A1*B1"),
            ("D1", "=(C1+10)*7.3"),
            ("E1", "=D1/B1"),
            ("F9", "=E1*2+C1*47.37-A1"),
        ];
        for (name, input) in inputs {
            doc.set_contents(name, input).unwrap();
        }
        let expected = doc.value("F9").unwrap();

        let text = saved(&mut doc);
        let mut loaded = Document::load_from(text.as_bytes(), SheetConfig::default()).unwrap();
        assert_eq!(loaded.value("F9").unwrap(), expected);
    }

    #[test]
    fn test_mixed_sheet_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.grd");

        let mut doc = Document::with_config(config("1.0"));
        doc.set_contents("S1", "hello").unwrap();
        doc.set_contents("AB3", "45").unwrap();
        doc.set_contents("C2", "=AB3*5").unwrap();
        doc.set_contents("F9", "=C2+5.7").unwrap();
        doc.save(&path).unwrap();

        let mut loaded = Document::load(&path, config("1.0")).unwrap();
        assert_eq!(loaded.value("F9").unwrap(), CellValue::Number(230.7));
        assert_eq!(loaded.value("S1").unwrap(), CellValue::Text("hello".into()));
        assert_eq!(loaded.names_of_nonempty(), vec!["S1", "C2", "AB3", "F9"]);
    }

    #[test]
    fn test_version_mismatch() {
        let mut doc = Document::with_config(config("1.0"));
        doc.set_contents("A1", "1").unwrap();
        let text = saved(&mut doc);

        match Document::load_from(text.as_bytes(), config("2.0")) {
            Err(GridcalcError::ReadWrite(ReadWriteError::VersionMismatch { expected, found })) => {
                assert_eq!(expected, "2.0");
                assert_eq!(found, "1.0");
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(&dir.path().join("absent.grd"), SheetConfig::default()).unwrap_err();
        assert!(matches!(err, GridcalcError::ReadWrite(ReadWriteError::Io(_))));
    }

    #[test]
    fn test_invalid_cell_in_file() {
        let text = "@version: \"default\"\nA1: =B1+\n";
        match Document::load_from(text.as_bytes(), SheetConfig::default()) {
            Err(GridcalcError::ReadWrite(ReadWriteError::InvalidCell { cell, source })) => {
                assert_eq!(cell, "A1");
                assert!(matches!(*source, GridcalcError::FormulaFormat(_)));
            }
            other => panic!("expected invalid cell, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_in_file() {
        let text = "@version: \"default\"\nA1: =B1\nB1: =A1\n";
        match Document::load_from(text.as_bytes(), SheetConfig::default()) {
            Err(GridcalcError::ReadWrite(ReadWriteError::InvalidCell { cell, source })) => {
                assert_eq!(cell, "B1");
                assert!(matches!(*source, GridcalcError::CircularDependency(_)));
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_load_applies_name_rules() {
        let text = "@version: \"default\"\nb2: 5\n";
        let upper = SheetConfig::new().with_normalizer(|s| s.to_ascii_uppercase());
        let doc = Document::load_from(text.as_bytes(), upper).unwrap();
        assert_eq!(doc.names_of_nonempty(), vec!["B2"]);

        let strict = SheetConfig::new().with_validator(|s| s.starts_with('A'));
        assert!(Document::load_from(text.as_bytes(), strict).is_err());
    }

    #[test]
    fn test_saved_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.grd");
        let mut doc = Document::with_config(config("3.1"));
        doc.save(&path).unwrap();
        assert_eq!(Document::saved_version(&path).unwrap(), "3.1");

        let err = Document::saved_version_from("A1: 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GridcalcError::ReadWrite(ReadWriteError::MissingVersion)));
    }

    proptest! {
        #[test]
        fn prop_save_load_preserves_contents(
            numbers in prop::collection::vec(-1.0e20f64..1.0e20, 1..8),
            text in "[a-zA-Z][ -~\\n\\t]{0,20}",
        ) {
            let mut doc = Document::new();
            for (i, n) in numbers.iter().enumerate() {
                doc.set_contents(&format!("A{}", i + 1), &n.to_string()).unwrap();
            }
            doc.set_contents("B1", &format!("={}", (1..=numbers.len()).map(|i| format!("A{}", i)).collect::<Vec<_>>().join("+"))).unwrap();
            doc.set_contents("C1", &text).unwrap();

            let mut buf = Vec::new();
            doc.save_to(&mut buf).unwrap();
            let mut loaded = Document::load_from(buf.as_slice(), SheetConfig::default()).unwrap();

            prop_assert_eq!(loaded.names_of_nonempty(), doc.names_of_nonempty());
            for name in doc.names_of_nonempty() {
                prop_assert_eq!(loaded.contents(&name).unwrap(), doc.contents(&name).unwrap());
            }
            prop_assert_eq!(loaded.value("B1").unwrap(), doc.value("B1").unwrap());
        }
    }
}
