use async_trait::async_trait;
use tracing::debug;

use crate::protocol::command::{arg_bytes, wrong_args, ByteStore, Command};
use crate::protocol::resp::Value;

/// GETDEL command: GETDEL key
///
/// Removes the key and replies with the value it held.
pub struct GetDelCmd;

#[async_trait]
impl Command for GetDelCmd {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value {
        if items.len() != 2 {
            return wrong_args("getdel");
        }
        let Some(key) = arg_bytes(&items[1]) else {
            return Value::error("ERR invalid key argument");
        };

        match store.delete(&key) {
            Ok(value) => Value::bulk(value),
            Err(err) => {
                debug!(
                    "GETDEL on missing key {:?}",
                    String::from_utf8_lossy(err.key())
                );
                Value::null()
            }
        }
    }
}
