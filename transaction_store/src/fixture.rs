//! JSON fixture loading.
//!
//! A fixture is a JSON array of [`Transaction`] objects in the camelCase wire
//! shape (`totalAmount`, `createdAt`, `items[].productId`, ...).

use std::path::Path;

use snafu::ResultExt;

use crate::{
    models::Transaction,
    store::{FixtureFormatSnafu, FixtureReadSnafu, StoreError},
};

/// Read a JSON array of transactions from `path`.
pub fn load_json_file(path: impl AsRef<Path>) -> Result<Vec<Transaction>, StoreError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).context(FixtureReadSnafu { path })?;
    let txs: Vec<Transaction> =
        serde_json::from_str(&raw).context(FixtureFormatSnafu { path })?;
    tracing::debug!(path = %path.display(), rows = txs.len(), "loaded transaction fixture");
    Ok(txs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_array_and_rejects_garbage() {
        let mut ok = tempfile::NamedTempFile::new().unwrap();
        write!(
            ok,
            r#"[{{"id":"t1","customer":"Ada","totalAmount":5.5,"createdAt":"2024-02-03T04:05:06Z"}}]"#
        )
        .unwrap();
        let txs = load_json_file(ok.path()).unwrap();
        assert_eq!(txs.len(), 1);
        assert!(txs[0].items.is_empty());

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "{{not json").unwrap();
        let err = load_json_file(bad.path()).unwrap_err();
        assert!(matches!(err, StoreError::FixtureFormat { .. }));
    }
}
