//! Snapshot table readers.
//!
//! Each reader takes any `Read` plus a source name used in error messages, so
//! files and in-memory fixtures go through the same code. Malformed input is
//! a `Load` error carrying the 1-based line number; nothing is skipped
//! silently.
//!
//! Ranking CSVs come in two shapes, detected from the header:
//!
//! - long: `sale_uid,similar_sale_uid,dimension,similarity,rank`
//! - wide: `sale_uid,similar_sale_uid` then `<key>__similarity,<key>__rank` pairs

use salesim_core::{
    CatalogEntry, DimensionRegistry, Error, FeatureStore, FeatureVector, RankingRow, Result,
    SaleId, FEATURE_SEPARATOR,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

const SALE_COLUMN: &str = "sale_uid";
const PEER_COLUMN: &str = "similar_sale_uid";
const SIMILARITY_SUFFIX: &str = "similarity";
const RANK_SUFFIX: &str = "rank";

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn csv_error(source: &str, e: csv::Error) -> Error {
    let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
    Error::load_at(source, line, e.to_string())
}

/// Rank cells may be written as floats ("3.0") by dataframe exports.
fn parse_rank(cell: &str) -> std::result::Result<u32, String> {
    let value: f64 = cell
        .parse()
        .map_err(|_| format!("rank '{}' is not a number", cell))?;
    if value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
        return Err(format!("rank '{}' is not an integer >= 1", cell));
    }
    Ok(value as u32)
}

fn deserialize_rank<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_rank(s.trim()).map_err(serde::de::Error::custom)
}

/// Feature cells: numbers, or boolean spellings exported by dataframes.
fn parse_feature(cell: &str) -> std::result::Result<Option<f64>, String> {
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.to_lowercase().as_str() {
        "true" | "yes" => Ok(Some(1.0)),
        "false" | "no" => Ok(Some(0.0)),
        other => other
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("feature value '{}' is not numeric", cell)),
    }
}

#[derive(Debug, Deserialize)]
struct LongRankingRecord {
    sale_uid: String,
    similar_sale_uid: String,
    dimension: String,
    similarity: f64,
    #[serde(deserialize_with = "deserialize_rank")]
    rank: u32,
}

/// Read ranking rows in either the long or the wide layout.
///
/// Every dimension key must be registered. Rows keep file order.
pub fn read_rankings<R: Read>(
    reader: R,
    source: &str,
    registry: &DimensionRegistry,
) -> Result<Vec<RankingRow>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(source, e))?
        .clone();

    let rows = if headers.iter().any(|h| h == "dimension") {
        read_long_rankings(&mut csv_reader, source)?
    } else {
        read_wide_rankings(&mut csv_reader, &headers, source)?
    };

    for (idx, row) in rows.iter().enumerate() {
        if !registry.contains(&row.dimension) {
            return Err(Error::load_at(
                source,
                idx + 2,
                format!("unknown dimension '{}'", row.dimension),
            ));
        }
    }
    Ok(rows)
}

fn read_long_rankings<R: Read>(csv_reader: &mut csv::Reader<R>, source: &str) -> Result<Vec<RankingRow>> {
    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.deserialize::<LongRankingRecord>().enumerate() {
        let record = result.map_err(|e| csv_error(source, e))?;
        let row = RankingRow::new(
            record.sale_uid,
            record.similar_sale_uid,
            record.dimension,
            record.similarity,
            record.rank,
        );
        row.check()
            .map_err(|msg| Error::load_at(source, line_num + 2, msg))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Column positions of one dimension in a wide ranking table.
struct WideColumns {
    key: String,
    similarity: usize,
    rank: usize,
}

fn wide_columns(headers: &csv::StringRecord, source: &str) -> Result<(usize, usize, Vec<WideColumns>)> {
    let position = |name: &str| headers.iter().position(|h| h == name);
    let sale = position(SALE_COLUMN)
        .ok_or_else(|| Error::load_at(source, 1, format!("missing '{}' column", SALE_COLUMN)))?;
    let peer = position(PEER_COLUMN)
        .ok_or_else(|| Error::load_at(source, 1, format!("missing '{}' column", PEER_COLUMN)))?;

    let mut columns = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let Some((key, suffix)) = header.rsplit_once(FEATURE_SEPARATOR) else {
            continue;
        };
        if suffix != SIMILARITY_SUFFIX {
            continue;
        }
        let rank_header = format!("{}{}{}", key, FEATURE_SEPARATOR, RANK_SUFFIX);
        let rank = position(&rank_header).ok_or_else(|| {
            Error::load_at(source, 1, format!("'{}' has no matching '{}' column", header, rank_header))
        })?;
        columns.push(WideColumns {
            key: key.to_string(),
            similarity: idx,
            rank,
        });
    }

    if columns.is_empty() {
        return Err(Error::load_at(
            source,
            1,
            "no 'dimension' column and no '<key>__similarity' columns",
        ));
    }
    Ok((sale, peer, columns))
}

fn read_wide_rankings<R: Read>(
    csv_reader: &mut csv::Reader<R>,
    headers: &csv::StringRecord,
    source: &str,
) -> Result<Vec<RankingRow>> {
    let (sale_idx, peer_idx, columns) = wide_columns(headers, source)?;

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(source, e))?;
        let line = line_num + 2;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        for column in &columns {
            let similarity_cell = field(column.similarity);
            let rank_cell = field(column.rank);
            // Pair not ranked in this dimension.
            if similarity_cell.is_empty() && rank_cell.is_empty() {
                continue;
            }
            let similarity: f64 = similarity_cell.parse().map_err(|_| {
                Error::load_at(source, line, format!("similarity '{}' is not a number", similarity_cell))
            })?;
            let rank = parse_rank(rank_cell).map_err(|msg| Error::load_at(source, line, msg))?;

            let row = RankingRow::new(field(sale_idx), field(peer_idx), column.key.as_str(), similarity, rank);
            row.check().map_err(|msg| Error::load_at(source, line, msg))?;
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Read `(sale_uid, sale_display_name)` rows; duplicates are kept for the catalog to collapse.
pub fn read_display_names<R: Read>(reader: R, source: &str) -> Result<Vec<CatalogEntry>> {
    let mut csv_reader = csv_reader(reader);
    let mut entries = Vec::new();
    for result in csv_reader.deserialize::<CatalogEntry>() {
        entries.push(result.map_err(|e| csv_error(source, e))?);
    }
    Ok(entries)
}

/// Read the feature table: `sale_uid` then one column per qualified feature.
pub fn read_features<R: Read>(reader: R, source: &str) -> Result<FeatureStore> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(source, e))?
        .clone();

    let sale_idx = headers
        .iter()
        .position(|h| h == SALE_COLUMN)
        .ok_or_else(|| Error::load_at(source, 1, format!("missing '{}' column", SALE_COLUMN)))?;
    let feature_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != sale_idx)
        .map(|(idx, h)| (idx, h.to_string()))
        .collect();

    let mut store = FeatureStore::new(feature_columns.iter().map(|(_, c)| c.clone()).collect());
    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(source, e))?;
        let line = line_num + 2;
        let sale_id = record.get(sale_idx).unwrap_or("");
        if sale_id.is_empty() {
            return Err(Error::load_at(source, line, "empty sale_uid"));
        }
        if store.contains(sale_id) {
            return Err(Error::load_at(source, line, format!("duplicate row for sale '{}'", sale_id)));
        }

        let mut vector = FeatureVector::new();
        for (idx, column) in &feature_columns {
            let cell = record.get(*idx).unwrap_or("");
            if let Some(value) = parse_feature(cell).map_err(|msg| Error::load_at(source, line, msg))? {
                vector.insert(column.as_str(), value);
            }
        }
        store.insert(SaleId::new(sale_id), vector);
    }
    Ok(store)
}

/// Read the `dimension key -> [feature column, ...]` mapping.
pub fn read_feature_columns<R: Read>(reader: R, source: &str) -> Result<HashMap<String, Vec<String>>> {
    serde_json::from_reader(reader).map_err(|e| Error::load_at(source, e.line(), e.to_string()))
}

/// Read a dimension registry (JSON list of descriptors).
pub fn read_registry<R: Read>(mut reader: R, source: &str) -> Result<DimensionRegistry> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    DimensionRegistry::from_json_str(&text).map_err(|e| match e {
        Error::Serialization(msg) => Error::load(source, msg),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_CSV: &str = "\
sale_uid,similar_sale_uid,dimension,similarity,rank
fr_FR1,fr_FR2,pricing,0.91,1
fr_FR1,fr_FR3,pricing,0.55,2.0
fr_FR1,fr_FR3,location,0.70,1
";

    const WIDE_CSV: &str = "\
sale_uid,similar_sale_uid,location__similarity,location__rank,pricing__similarity,pricing__rank
fr_FR1,fr_FR2,0.8,1,0.9,1
fr_FR1,fr_FR3,0.6,2,,
";

    #[test]
    fn test_read_long_rankings() {
        let registry = DimensionRegistry::builtin();
        let rows = read_rankings(LONG_CSV.as_bytes(), "rankings.csv", &registry).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].peer_id.as_str(), "fr_FR2");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[2].dimension, "location");
    }

    #[test]
    fn test_read_wide_rankings() {
        let registry = DimensionRegistry::builtin();
        let rows = read_rankings(WIDE_CSV.as_bytes(), "rankings.csv", &registry).unwrap();
        // fr_FR3 has no pricing row
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], RankingRow::new("fr_FR1", "fr_FR2", "location", 0.8, 1));
        assert_eq!(rows[1], RankingRow::new("fr_FR1", "fr_FR2", "pricing", 0.9, 1));
        assert_eq!(rows[2].dimension, "location");
    }

    #[test]
    fn test_wide_rankings_need_rank_column() {
        let csv = "sale_uid,similar_sale_uid,location__similarity\nfr_FR1,fr_FR2,0.8\n";
        let registry = DimensionRegistry::builtin();
        assert!(matches!(
            read_rankings(csv.as_bytes(), "r.csv", &registry),
            Err(Error::Load { line: 1, .. })
        ));
    }

    #[test]
    fn test_rankings_reject_bad_values() {
        let registry = DimensionRegistry::builtin();
        let out_of_range = "sale_uid,similar_sale_uid,dimension,similarity,rank\na,b,pricing,1.3,1\n";
        assert!(matches!(
            read_rankings(out_of_range.as_bytes(), "r.csv", &registry),
            Err(Error::Load { line: 2, .. })
        ));

        let bad_rank = "sale_uid,similar_sale_uid,dimension,similarity,rank\na,b,pricing,0.3,1.5\n";
        assert!(read_rankings(bad_rank.as_bytes(), "r.csv", &registry).is_err());

        let unknown = "sale_uid,similar_sale_uid,dimension,similarity,rank\na,b,pricing,0.3,1\na,c,weather,0.3,1\n";
        assert!(matches!(
            read_rankings(unknown.as_bytes(), "r.csv", &registry),
            Err(Error::Load { line: 3, .. })
        ));
    }

    #[test]
    fn test_read_display_names_keeps_duplicates() {
        let csv = "sale_uid,sale_display_name\nfr_FR1,Villa Azur\nfr_FR1,Villa Azur\nfr_FR2,Chalet\n";
        let entries = read_display_names(csv.as_bytes(), "names.csv").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2], CatalogEntry::new("fr_FR2", "Chalet"));
    }

    #[test]
    fn test_read_features() {
        let csv = "\
sale_uid,location__beach,location__city,pricing__budget
fr_FR1,1,0,True
fr_FR2,0,,1.0
";
        let store = read_features(csv.as_bytes(), "features.csv").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.columns().len(), 3);
        let first = store.get("fr_FR1").unwrap();
        assert_eq!(first.value("pricing__budget"), 1.0);
        let second = store.get("fr_FR2").unwrap();
        assert!(!second.has("location__city"));
        assert_eq!(second.value("location__city"), 0.0);
    }

    #[test]
    fn test_read_features_rejects_garbage() {
        let csv = "sale_uid,location__beach\nfr_FR1,maybe\n";
        assert!(matches!(
            read_features(csv.as_bytes(), "features.csv"),
            Err(Error::Load { line: 2, .. })
        ));

        let dup = "sale_uid,location__beach\nfr_FR1,1\nfr_FR1,0\n";
        assert!(matches!(
            read_features(dup.as_bytes(), "features.csv"),
            Err(Error::Load { line: 3, .. })
        ));
    }

    #[test]
    fn test_read_feature_columns() {
        let json = r#"{"location": ["location__beach"], "pricing": []}"#;
        let mapping = read_feature_columns(json.as_bytes(), "cols.json").unwrap();
        assert_eq!(mapping["location"], vec!["location__beach".to_string()]);
        assert!(read_feature_columns("{".as_bytes(), "cols.json").is_err());
    }

    #[test]
    fn test_read_registry() {
        let json = r#"[{"label": "Location", "key": "location", "emoji": "📍"}]"#;
        let registry = read_registry(json.as_bytes(), "dims.json").unwrap();
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            read_registry("[".as_bytes(), "dims.json"),
            Err(Error::Load { .. })
        ));
    }
}
