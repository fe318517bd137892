use std::io::Read;

use csv::{StringRecord, StringRecordsIntoIter, Trim};

/// One script line: command name and its arguments.
#[derive(Debug, Clone)]
pub struct ScriptLine {
    pub line: u64,
    pub record: StringRecord,
}

impl ScriptLine {
    pub fn command(&self) -> &str {
        self.record.get(0).unwrap_or_default()
    }

    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.record.iter().skip(1)
    }
}

/// Reads console commands written as headerless CSV, one command per line.
/// Lines starting with `#` are comments.
pub struct CsvScriptParser<R> {
    iter: StringRecordsIntoIter<R>,
}

impl<R> CsvScriptParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);

        Self {
            iter: reader.into_records(),
        }
    }
}

impl<R> Iterator for CsvScriptParser<R>
where
    R: Read,
{
    type Item = csv::Result<ScriptLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|row| {
            row.map(|record| ScriptLine {
                line: record.position().map_or(0, |pos| pos.line()),
                record,
            })
        })
    }
}
