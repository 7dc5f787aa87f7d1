use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};

/// Text encoding of an input CSV file. This is explicit configuration rather
/// than a guess; the published gratification extracts are latin1 while the
/// municipality extracts are UTF-8.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    Latin1,
    Utf8,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            other => Err(format!("unknown encoding: {}", other)),
        }
    }
}

/// An in-memory CSV table with trimmed, upper-cased header names.
pub(crate) struct Table {
    columns: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl Table {
    pub(crate) fn from_reader<R: io::Read>(rdr: R, delimiter: u8) -> Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(rdr);
        let columns = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_uppercase(), idx))
            .collect();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns, records })
    }

    pub(crate) fn records(&self) -> &[StringRecord] {
        &self.records
    }

    /// Returns the trimmed value of `column` in `record`, or `None` when the
    /// column is absent or the cell is blank.
    pub(crate) fn field<'a>(&self, record: &'a StringRecord, column: &str) -> Option<&'a str> {
        let idx = *self.columns.get(column)?;
        let value = record.get(idx)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

pub(crate) fn read_table(
    path: &Path,
    delimiter: u8,
    encoding: Encoding,
) -> Result<Table, super::Error> {
    let bytes = fs::read(path)?;
    let text = match encoding {
        Encoding::Latin1 => encoding_rs::mem::decode_latin1(&bytes).into_owned(),
        Encoding::Utf8 => encoding_rs::UTF_8.decode(&bytes).0.into_owned(),
    };
    Table::from_reader(text.as_bytes(), delimiter).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_upper_cased() {
        let table = Table::from_reader(" cpf ;Nome_Servidor\n1;A\n".as_bytes(), b';')
            .expect("valid CSV");
        let record = &table.records()[0];
        assert_eq!(table.field(record, "CPF"), Some("1"));
        assert_eq!(table.field(record, "NOME_SERVIDOR"), Some("A"));
    }

    #[test]
    fn blank_and_missing_fields_are_none() {
        let table =
            Table::from_reader("CPF;NOME_SERVIDOR\n ;A\n".as_bytes(), b';').expect("valid CSV");
        let record = &table.records()[0];
        assert_eq!(table.field(record, "CPF"), None);
        assert_eq!(table.field(record, "UPAG"), None);
    }

    #[test]
    fn latin1_bytes_decode() {
        // "SAÚDE" in latin1: 0xDA is Ú
        let bytes = b"NOME\nSA\xDADE\n";
        let text = encoding_rs::mem::decode_latin1(bytes).into_owned();
        let table = Table::from_reader(text.as_bytes(), b';').expect("valid CSV");
        assert_eq!(table.field(&table.records()[0], "NOME"), Some("SA\u{da}DE"));
    }

    #[test]
    fn encoding_names_parse() {
        assert_eq!("latin1".parse::<Encoding>(), Ok(Encoding::Latin1));
        assert_eq!("UTF-8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert!("cp1252".parse::<Encoding>().is_err());
    }
}
