//! SQLite 키/값 저장소 어댑터.
//!
//! `LocalStore` 포트 구현. 재시작 후에도 유지된다.

use infrawatch_core::error::CoreError;
use infrawatch_core::ports::local_store::LocalStore;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::migration;

/// `LocalStore` 포트의 SQLite 구현
pub struct SqliteLocalStore {
    conn: Mutex<Connection>,
}

fn storage_err(context: &str, e: rusqlite::Error) -> CoreError {
    CoreError::Storage(format!("{context}: {e}"))
}

impl SqliteLocalStore {
    /// 파일 기반 저장소 생성 (상위 디렉토리가 없으면 생성)
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| storage_err("SQLite 열기 실패", e))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| storage_err("PRAGMA 설정 실패", e))?;

        migration::run_migrations(&conn).map_err(|e| storage_err("마이그레이션 실패", e))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| storage_err("인메모리 SQLite 생성 실패", e))?;

        migration::run_migrations(&conn).map_err(|e| storage_err("마이그레이션 실패", e))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl LocalStore for SqliteLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| storage_err("값 조회 실패", e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e| storage_err("값 저장 실패", e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| storage_err("값 삭제 실패", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_get_remove() {
        let store = SqliteLocalStore::open_in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("summary-All-All", "v1").unwrap();
        store.set("summary-All-All", "v2").unwrap();
        assert_eq!(store.get("summary-All-All").unwrap().as_deref(), Some("v2"));

        store.remove("summary-All-All").unwrap();
        assert_eq!(store.get("summary-All-All").unwrap(), None);
        // 없는 키 삭제도 성공
        store.remove("summary-All-All").unwrap();
    }

    #[test]
    fn survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("infrawatch.db");

        {
            let store = SqliteLocalStore::open(&path).unwrap();
            store.set("summary-Production-app1", "cached").unwrap();
        }

        let store = SqliteLocalStore::open(&path).unwrap();
        assert_eq!(
            store.get("summary-Production-app1").unwrap().as_deref(),
            Some("cached")
        );
    }
}
