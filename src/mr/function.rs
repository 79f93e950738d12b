//! The built-in map functions, anything else can be handed to `MapWorker::map` as a closure

use std::sync::OnceLock;

use regex::Regex;

/// Words are maximal runs of letters, everything else separates them
fn words(contents: &str) -> impl Iterator<Item = &str> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\p{L}+").expect("word pattern is valid"))
        .find_iter(contents)
        .map(|m| m.as_str())
}

/// Word Count application
pub mod wc {
    use crate::mr::record::KeyValue;

    pub fn map(_file: &str, contents: &str) -> anyhow::Result<Vec<KeyValue>> {
        Ok(super::words(contents)
            .map(|x| KeyValue::new(x, 1.to_string()))
            .collect())
    }
}

/// Inverted Index application, every word points back at the shards it shows up in
pub mod ii {
    use std::collections::BTreeSet;

    use crate::mr::record::KeyValue;

    pub fn map(file: &str, contents: &str) -> anyhow::Result<Vec<KeyValue>> {
        Ok(super::words(contents)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|x| KeyValue::new(x, file))
            .collect())
    }
}
