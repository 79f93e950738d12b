//! The intermediate file format
//!
//! Keys and values may hold newlines, quotes or anything else, so records can't be
//! written as plain `key value` lines. Each record is one JSON object followed by a
//! newline; JSON string escaping keeps every unit parseable on its own

use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::Path,
};

use serde_json::StreamDeserializer;

use crate::mr::{
    error::{MapError, MapResult},
    record::KeyValue,
};

/// Encodes records one by one onto `W`
pub struct RecordWriter<W: Write> {
    dest: W,
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(dest: W) -> Self {
        Self {
            dest,
            records_written: 0,
        }
    }

    /// Encode a single record, it reaches `W` right away
    pub fn write(&mut self, kv: &KeyValue) -> io::Result<()> {
        serde_json::to_writer(&mut self.dest, kv)?;
        self.dest.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.dest.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.dest
    }

    pub fn into_inner(self) -> W {
        self.dest
    }
}

/// Decodes a record stream written by `RecordWriter`
pub struct RecordReader<R: Read> {
    stream: StreamDeserializer<'static, serde_json::de::IoRead<R>, KeyValue>,
    records_read: u64,
}

impl<R: Read> RecordReader<R> {
    pub fn new(src: R) -> Self {
        Self {
            stream: serde_json::Deserializer::from_reader(src).into_iter(),
            records_read: 0,
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = MapResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.records_read;
        self.records_read += 1;
        self.stream
            .next()
            .map(|res| res.map_err(|source| MapError::Decode { index, source }))
    }
}

/// Read every record of one intermediate file
pub fn read_bucket(path: &Path) -> MapResult<Vec<KeyValue>> {
    let file = File::open(path).map_err(|source| MapError::OpenBucket {
        path: path.to_path_buf(),
        source,
    })?;
    RecordReader::new(BufReader::new(file)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(records: &[KeyValue]) -> Vec<u8> {
        let mut writer = RecordWriter::new(Vec::new());
        for kv in records {
            writer.write(kv).unwrap();
        }
        assert_eq!(writer.records_written(), records.len() as u64);
        writer.into_inner()
    }

    #[test]
    fn awkward_text_survives_the_stream() {
        let records = vec![
            KeyValue::new("line\nbreak", "with \"quotes\""),
            KeyValue::new("", ""),
            KeyValue::new("tab\tand\\backslash", "{\"Key\":\"fake\"}\n"),
            KeyValue::new("ünïcödé ✓", "\u{0}nul"),
        ];
        let bytes = encode(&records);
        let decoded = RecordReader::new(bytes.as_slice())
            .collect::<MapResult<Vec<_>>>()
            .unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn one_unit_per_line() {
        let bytes = encode(&[KeyValue::new("a\nb", "1"), KeyValue::new("c", "2")]);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "{\"Key\":\"a\\nb\",\"Value\":\"1\"}\n{\"Key\":\"c\",\"Value\":\"2\"}\n"
        );
    }

    #[test]
    fn empty_stream_has_no_records() {
        assert_eq!(RecordReader::new(&b""[..]).count(), 0);
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut bytes = encode(&[KeyValue::new("a", "1"), KeyValue::new("b", "2")]);
        bytes.truncate(bytes.len() - 5);
        let results = RecordReader::new(bytes.as_slice()).collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(MapError::Decode { index: 1, .. })));
    }
}
