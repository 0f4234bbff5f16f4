use async_trait::async_trait;

use crate::protocol::command::{wrong_args, ByteStore, Command};
use crate::protocol::resp::Value;

/// DBSIZE command: number of keys in the store
pub struct DbSizeCmd;

#[async_trait]
impl Command for DbSizeCmd {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value {
        if items.len() != 1 {
            return wrong_args("dbsize");
        }
        Value::Integer(store.len() as i64)
    }
}
