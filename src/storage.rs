use crate::models::PostOpRecord;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/postop.json")
}

/// Reads an exported array of records. The file is never written back.
pub async fn load_records(path: &Path) -> Vec<PostOpRecord> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Vec<PostOpRecord>>(&bytes) {
            Ok(records) => {
                info!(count = records.len(), path = %path.display(), "loaded record snapshot");
                records
            }
            Err(err) => {
                error!("failed to parse record snapshot: {err}");
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no record snapshot, starting empty");
            Vec::new()
        }
        Err(err) => {
            error!("failed to read record snapshot: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("postop_storage_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_snapshot_is_empty() {
        let records = load_records(&temp_path("missing")).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn malformed_snapshot_is_empty() {
        let path = temp_path("malformed");
        fs::write(&path, b"{ not json").await.unwrap();
        assert!(load_records(&path).await.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn snapshot_records_are_decoded() {
        let path = temp_path("valid");
        let body = r#"[{"_id":"a1","fecha":"2026-01-22","or-ch":1,"or-vol":"1.5","or-mp":"no"}]"#;
        fs::write(&path, body).await.unwrap();

        let records = load_records(&path).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("a1"));
        assert_eq!(records[0].or_vol, 1.5);
        let _ = fs::remove_file(&path).await;
    }
}
