//! Redis-backed session slot for multi-instance deployments.
//!
//! Each slot is a plain Redis string. TTL hints become `SET ... EX`, so Redis
//! evicts abandoned sessions on its own. `remove_if_eq` runs as a Lua script,
//! which Redis executes atomically.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};
use std::time::Duration;

use crate::ports::{SessionSlot, SlotError, SlotKey};

/// Delete KEYS[1] only while it still holds ARGV[1].
static COMPARE_AND_DELETE: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#,
    )
});

fn backend_error(e: redis::RedisError) -> SlotError {
    SlotError::BackendError(e.to_string())
}

/// Redis-backed session slot storage.
#[derive(Clone)]
pub struct RedisSessionSlot {
    conn: MultiplexedConnection,
}

impl RedisSessionSlot {
    /// Wrap an existing connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Open a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, SlotError> {
        let client = redis::Client::open(url).map_err(backend_error)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend_error)?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl SessionSlot for RedisSessionSlot {
    async fn get(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, SlotError> {
        let mut conn = self.conn.clone();
        conn.get(key.as_str()).await.map_err(backend_error)
    }

    async fn set(
        &self,
        key: &SlotKey,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), SlotError> {
        let mut conn = self.conn.clone();

        let mut cmd = redis::cmd("SET");
        cmd.arg(key.as_str()).arg(value);
        if let Some(ttl) = ttl {
            // EX 0 is rejected by Redis
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }

        cmd.query_async::<_, ()>(&mut conn)
            .await
            .map_err(backend_error)
    }

    async fn remove(&self, key: &SlotKey) -> Result<(), SlotError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key.as_str()).await.map_err(backend_error)
    }

    async fn remove_if_eq(&self, key: &SlotKey, expected: &[u8]) -> Result<bool, SlotError> {
        let mut conn = self.conn.clone();
        let removed: i64 = COMPARE_AND_DELETE
            .key(key.as_str())
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(backend_error)?;
        Ok(removed == 1)
    }
}
