use super::mapping::{mapping_for_normalized, ColumnMapping};
use super::normalizer::normalize_header;
use crate::risk::TabularFeature;
use std::collections::BTreeMap;
use std::io::Read;

/// Source column chosen for each canonical feature found in the header row.
#[derive(Debug, Default)]
pub(crate) struct HeaderLayout {
    columns: BTreeMap<TabularFeature, (usize, ColumnMapping)>,
}

impl HeaderLayout {
    pub(crate) fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut columns: BTreeMap<TabularFeature, (usize, ColumnMapping)> = BTreeMap::new();

        for (index, header) in headers.iter().enumerate() {
            let Some(mapping) = mapping_for_normalized(&normalize_header(header)) else {
                continue;
            };

            let replace = columns
                .get(&mapping.feature)
                .map(|(_, current)| mapping.priority < current.priority)
                .unwrap_or(true);
            if replace {
                columns.insert(mapping.feature, (index, mapping));
            }
        }

        Self { columns }
    }

    pub(crate) fn missing(&self) -> Vec<TabularFeature> {
        TabularFeature::ALL
            .into_iter()
            .filter(|feature| !self.columns.contains_key(feature))
            .collect()
    }

    /// Canonical value for a feature; absent columns and unparsable cells read as zero.
    pub(crate) fn value(&self, record: &csv::StringRecord, feature: TabularFeature) -> f64 {
        self.columns
            .get(&feature)
            .and_then(|(index, mapping)| {
                record
                    .get(*index)
                    .and_then(parse_number)
                    .map(|value| value * mapping.scale)
            })
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

pub(crate) struct ParsedRows {
    pub(crate) layout: HeaderLayout,
    pub(crate) records: Vec<csv::StringRecord>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedRows, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let layout = HeaderLayout::from_headers(csv_reader.headers()?);
    let mut records = Vec::new();
    for record in csv_reader.records() {
        records.push(record?);
    }

    Ok(ParsedRows { layout, records })
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
pub(crate) fn parse_number_for_tests(raw: &str) -> Option<f64> {
    parse_number(raw)
}
