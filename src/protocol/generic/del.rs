use async_trait::async_trait;

use crate::protocol::command::{arg_bytes, wrong_args, ByteStore, Command};
use crate::protocol::resp::Value;

/// DEL command: DEL key [key ...]
///
/// Replies with the number of keys that were removed.
pub struct DelCmd;

#[async_trait]
impl Command for DelCmd {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value {
        if items.len() < 2 {
            return wrong_args("del");
        }

        let mut removed = 0;
        for item in &items[1..] {
            let Some(key) = arg_bytes(item) else {
                return Value::error("ERR invalid key argument");
            };
            if store.delete(&key).is_ok() {
                removed += 1;
            }
        }
        Value::Integer(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[tokio::test]
    async fn test_del_counts_removed_keys() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        store.put(b"a".to_vec(), b"1".to_vec());
        store.put(b"b".to_vec(), b"2".to_vec());

        let items = Value::command(["DEL", "a", "missing", "b", "a"]);
        let Value::Array(Some(items)) = items else {
            unreachable!()
        };

        assert_eq!(DelCmd.execute(&items, &store).await, Value::Integer(2));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_del_wrong_args() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        assert_eq!(
            DelCmd.execute(&[Value::bulk("DEL")], &store).await,
            Value::error("ERR wrong number of arguments for 'del' command")
        );
    }
}
