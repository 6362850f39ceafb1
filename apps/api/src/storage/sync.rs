//! Redis-backed synchronized store, shared by every context that can reach it.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::{KeyValueStore, StorageError, StoreKind};

const KEY_PREFIX: &str = "resume-tailor:";

pub struct SyncStore {
    conn: MultiplexedConnection,
}

impl SyncStore {
    /// Opens a multiplexed connection and checks it with PING.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(Self { conn })
    }
}

fn namespaced(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[async_trait]
impl KeyValueStore for SyncStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Sync
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(namespaced(key)).await?;
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(namespaced(key), value).await?;
        Ok(())
    }

    async fn set_many_raw(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set(namespaced(&key), value).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(namespaced(key)).await?;
        Ok(())
    }
}
