use async_trait::async_trait;

use crate::protocol::command::{arg_bytes, wrong_args, ByteStore, Command};
use crate::protocol::resp::Value;

/// EXISTS command: EXISTS key [key ...]
///
/// Replies with how many of the given keys are present. A key named twice
/// is counted twice, as Redis does.
pub struct ExistsCmd;

#[async_trait]
impl Command for ExistsCmd {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value {
        if items.len() < 2 {
            return wrong_args("exists");
        }

        let mut present = 0;
        for item in &items[1..] {
            let Some(key) = arg_bytes(item) else {
                return Value::error("ERR invalid key argument");
            };
            if store.exists(&key) {
                present += 1;
            }
        }
        Value::Integer(present)
    }
}
