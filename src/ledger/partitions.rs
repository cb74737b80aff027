/// Key layout and encoding utilities for Fjall partitions
///
/// Partition structure:
/// - `summaries`: {row_id:u64 BE} -> SummaryRow (JSON)
/// - `documents`: {row_id:u64 BE} -> raw voucher text (bytes, verbatim)
/// - `natural_keys`: nk:{date_len}:{date}:{id_len}:{id}:{row_id:020} -> (empty)
/// - `metadata`: meta:{key} -> value
///
/// Big-endian row keys sort in insertion order. Natural keys carry the byte
/// length of each component so that a prefix scan for `(date, id)` never
/// matches an id that merely starts with `id`.
use super::models::RowId;

const ROW_ID_DIGITS: usize = 20;

/// Encode a row key: u64 big-endian
pub fn encode_row_key(row_id: RowId) -> [u8; 8] {
    row_id.0.to_be_bytes()
}

/// Decode a row key back into a row id
pub fn decode_row_key(key: &[u8]) -> Option<RowId> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(RowId(u64::from_be_bytes(bytes)))
}

/// Encode the prefix shared by every row stored under `(date, id)`
pub fn encode_natural_prefix(date: &str, id: &str) -> Vec<u8> {
    format!("nk:{}:{}:{}:{}:", date.len(), date, id.len(), id).into_bytes()
}

/// Encode a natural-key index entry: nk:{date_len}:{date}:{id_len}:{id}:{row_id:020}
pub fn encode_natural_key(date: &str, id: &str, row_id: RowId) -> Vec<u8> {
    let mut key = encode_natural_prefix(date, id);
    key.extend_from_slice(format!("{:020}", row_id.0).as_bytes());
    key
}

/// Extract the row id from a natural-key index entry
pub fn decode_natural_key_row(key: &[u8]) -> Option<RowId> {
    if !key.starts_with(b"nk:") || key.len() < ROW_ID_DIGITS {
        return None;
    }
    let digits = std::str::from_utf8(&key[key.len() - ROW_ID_DIGITS..]).ok()?;
    digits.parse().ok().map(RowId)
}

/// Encode a metadata key: meta:{key}
pub fn encode_meta_key(key: &str) -> Vec<u8> {
    format!("meta:{}", key).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_encoding() {
        let key = encode_row_key(RowId(42));
        assert_eq!(key, [0, 0, 0, 0, 0, 0, 0, 42]);
        assert_eq!(decode_row_key(&key), Some(RowId(42)));
        assert_eq!(decode_row_key(b"short"), None);
    }

    #[test]
    fn test_row_keys_sort_numerically() {
        assert!(encode_row_key(RowId(9)) < encode_row_key(RowId(10)));
        assert!(encode_row_key(RowId(255)) < encode_row_key(RowId(256)));
    }

    #[test]
    fn test_natural_key_encoding() {
        let key = encode_natural_key("2024-01-01", "V1", RowId(7));
        assert_eq!(key, b"nk:10:2024-01-01:2:V1:00000000000000000007");
        assert_eq!(decode_natural_key_row(&key), Some(RowId(7)));
    }

    #[test]
    fn test_natural_prefix_does_not_match_longer_id() {
        let prefix = encode_natural_prefix("2024-01-01", "V1");
        let other = encode_natural_key("2024-01-01", "V1:x", RowId(1));
        assert!(!other.starts_with(&prefix));

        let same = encode_natural_key("2024-01-01", "V1", RowId(1));
        assert!(same.starts_with(&prefix));
    }

    #[test]
    fn test_natural_key_handles_separators_and_unicode() {
        let key = encode_natural_key("2024:01", "凭证:1", RowId(3));
        assert!(key.starts_with(&encode_natural_prefix("2024:01", "凭证:1")));
        assert_eq!(decode_natural_key_row(&key), Some(RowId(3)));
    }

    #[test]
    fn test_meta_key_encoding() {
        let key = encode_meta_key("next_row_id");
        assert_eq!(key, b"meta:next_row_id");
    }
}
