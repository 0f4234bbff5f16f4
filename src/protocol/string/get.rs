use async_trait::async_trait;

use crate::error::StoreError;
use crate::protocol::command::{arg_bytes, wrong_args, ByteStore, Command};
use crate::protocol::resp::Value;

/// GET command: GET key
pub struct GetCmd;

#[async_trait]
impl Command for GetCmd {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value {
        if items.len() != 2 {
            return wrong_args("get");
        }
        let Some(key) = arg_bytes(&items[1]) else {
            return Value::error("ERR invalid key argument");
        };

        match store.get(&key) {
            Ok(value) => Value::bulk(value),
            // Null bulk string for key not found
            Err(StoreError::NotFound(_)) => Value::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[tokio::test]
    async fn test_get_cmd_execute() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        store.put(b"testkey".to_vec(), b"testvalue".to_vec());

        let result = GetCmd
            .execute(&[Value::bulk("GET"), Value::bulk("testkey")], &store)
            .await;

        assert_eq!(result, Value::bulk("testvalue"));
    }

    #[tokio::test]
    async fn test_get_cmd_execute_not_found() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let result = GetCmd
            .execute(&[Value::bulk("GET"), Value::bulk("nonexistent")], &store)
            .await;

        assert_eq!(result, Value::null());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_cmd_wrong_args() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let result = GetCmd.execute(&[Value::bulk("GET")], &store).await;

        assert_eq!(
            result,
            Value::error("ERR wrong number of arguments for 'get' command")
        );
    }
}
