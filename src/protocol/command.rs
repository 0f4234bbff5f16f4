use std::collections::HashMap;

use async_trait::async_trait;

use crate::protocol::generic::{DbSizeCmd, DelCmd, ExistsCmd};
use crate::protocol::resp::Value;
use crate::protocol::string::{GetCmd, GetDelCmd, SetCmd};
use crate::store::Storer;

/// The store type commands run against: binary-safe keys and values
pub type ByteStore = dyn Storer<Vec<u8>, Vec<u8>>;

/// A Redis command handler
///
/// `items` is the whole request array, command name included.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value;
}

/// Registry of supported commands, keyed by upper-case name
pub struct CommandFactory {
    commands: HashMap<&'static str, Box<dyn Command>>,
}

impl CommandFactory {
    /// Create a factory with every supported command registered
    pub fn init() -> Self {
        let mut factory = Self {
            commands: HashMap::new(),
        };
        factory.register("GET", GetCmd);
        factory.register("SET", SetCmd);
        factory.register("GETDEL", GetDelCmd);
        factory.register("DEL", DelCmd);
        factory.register("EXISTS", ExistsCmd);
        factory.register("DBSIZE", DbSizeCmd);
        factory
    }

    fn register(&mut self, name: &'static str, cmd: impl Command + 'static) {
        self.commands.insert(name, Box::new(cmd));
    }

    /// Parse and execute a RESP request against the given store
    pub async fn execute(&self, value: Value, store: &ByteStore) -> Value {
        let items = match value {
            Value::Array(Some(items)) if !items.is_empty() => items,
            _ => return Value::error("ERR failed to parse command"),
        };

        let cmd_name = match &items[0] {
            Value::BulkString(Some(data)) => String::from_utf8_lossy(data).to_uppercase(),
            Value::SimpleString(s) => s.to_uppercase(),
            _ => return Value::error("ERR invalid command format"),
        };

        match self.commands.get(cmd_name.as_str()) {
            Some(cmd) => cmd.execute(&items, store).await,
            None => Value::error(format!("ERR unknown command '{}'", cmd_name)),
        }
    }
}

/// Read a textual argument such as a command option
pub fn arg_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(Some(data)) => Some(String::from_utf8_lossy(data).into_owned()),
        Value::SimpleString(s) => Some(s.clone()),
        _ => None,
    }
}

/// Read a binary-safe key or value argument
pub fn arg_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::BulkString(Some(data)) => Some(data.clone()),
        Value::SimpleString(s) => Some(s.as_bytes().to_vec()),
        _ => None,
    }
}

pub fn wrong_args(name: &str) -> Value {
    Value::error(format!(
        "ERR wrong number of arguments for '{}' command",
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[tokio::test]
    async fn test_execute_get_not_found() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let factory = CommandFactory::init();

        let result = factory
            .execute(Value::command(["GET", "nonexistent"]), &store)
            .await;

        assert_eq!(result, Value::null());
    }

    #[tokio::test]
    async fn test_execute_set_and_get() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let factory = CommandFactory::init();

        let set_result = factory
            .execute(Value::command(["SET", "mykey", "myvalue"]), &store)
            .await;
        assert_eq!(set_result, Value::ok());

        let get_result = factory
            .execute(Value::command(["get", "mykey"]), &store)
            .await;
        assert_eq!(get_result, Value::bulk("myvalue"));
    }

    async fn run(factory: &CommandFactory, store: &ByteStore, words: &[&str]) -> Value {
        factory.execute(Value::command(words), store).await
    }

    #[tokio::test]
    async fn test_execute_scenario() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let f = CommandFactory::init();

        assert_eq!(run(&f, &store, &["SET", "foo", "bar"]).await, Value::ok());
        assert_eq!(run(&f, &store, &["GET", "foo"]).await, Value::bulk("bar"));
        assert_eq!(run(&f, &store, &["SET", "foo", "baz", "XX"]).await, Value::ok());
        assert_eq!(run(&f, &store, &["GET", "foo"]).await, Value::bulk("baz"));
        assert_eq!(run(&f, &store, &["GETDEL", "foo"]).await, Value::bulk("baz"));
        assert_eq!(run(&f, &store, &["GET", "foo"]).await, Value::null());
        assert_eq!(run(&f, &store, &["SET", "missing", "x", "XX"]).await, Value::null());
        assert_eq!(run(&f, &store, &["GET", "missing"]).await, Value::null());
        assert_eq!(run(&f, &store, &["DBSIZE"]).await, Value::Integer(0));
    }

    #[tokio::test]
    async fn test_execute_invalid_command() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let factory = CommandFactory::init();

        let result = factory.execute(Value::command(["UNKNOWN"]), &store).await;

        assert_eq!(result, Value::error("ERR unknown command 'UNKNOWN'"));
    }

    #[tokio::test]
    async fn test_execute_parse_error() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let factory = CommandFactory::init();

        let result = factory
            .execute(Value::SimpleString("not a command".to_string()), &store)
            .await;
        assert_eq!(result, Value::error("ERR failed to parse command"));

        let result = factory.execute(Value::Array(Some(vec![])), &store).await;
        assert_eq!(result, Value::error("ERR failed to parse command"));

        let result = factory
            .execute(Value::Array(Some(vec![Value::Integer(1)])), &store)
            .await;
        assert_eq!(result, Value::error("ERR invalid command format"));
    }

    fn raw(words: &[&[u8]]) -> Value {
        Value::command(words)
    }

    #[tokio::test]
    async fn test_binary_keys_stay_distinct() {
        let store: Store<Vec<u8>, Vec<u8>> = Store::new();
        let f = CommandFactory::init();

        let reply = f.execute(raw(&[b"SET", b"\xff", b"secret"]), &store).await;
        assert_eq!(reply, Value::ok());
        let reply = f.execute(raw(&[b"GET", b"\xfe"]), &store).await;
        assert_eq!(reply, Value::null());
        let reply = f.execute(raw(&[b"GET", b"\xff"]), &store).await;
        assert_eq!(reply, Value::bulk("secret"));

        assert_eq!(store.get(&[0xffu8][..]).unwrap(), b"secret".to_vec());
        assert!(!store.exists(&[0xfeu8][..]));
    }

    #[test]
    fn test_args() {
        assert_eq!(arg_string(&Value::bulk("k")), Some("k".to_string()));
        assert_eq!(arg_bytes(&Value::SimpleString("v".into())), Some(b"v".to_vec()));
        assert_eq!(arg_string(&Value::null()), None);
        assert_eq!(arg_bytes(&Value::Integer(1)), None);
    }
}
