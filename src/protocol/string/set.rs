use async_trait::async_trait;
use tracing::debug;

use crate::protocol::command::{arg_bytes, arg_string, wrong_args, ByteStore, Command};
use crate::protocol::resp::Value;

/// Which store write a SET maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Plain SET: insert or overwrite
    Always,
    /// SET ... XX: overwrite only an existing key
    IfExists,
}

/// Parameters for SET command
#[derive(Debug, Clone, PartialEq)]
pub struct SetParams {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub mode: SetMode,
}

impl SetParams {
    /// Parse SET command parameters from RESP array items
    ///
    /// NX is rejected: strict create is not a store operation.
    pub fn parse(items: &[Value]) -> Result<Self, Value> {
        if !(3..=4).contains(&items.len()) {
            return Err(wrong_args("set"));
        }

        let key = arg_bytes(&items[1]).ok_or_else(|| Value::error("ERR invalid key argument"))?;
        let value = arg_bytes(&items[2]).ok_or_else(|| Value::error("ERR invalid value argument"))?;

        let mode = match items.get(3) {
            None => SetMode::Always,
            Some(option) => match arg_string(option).map(|s| s.to_uppercase()).as_deref() {
                Some("XX") => SetMode::IfExists,
                _ => return Err(Value::error("ERR syntax error")),
            },
        };

        Ok(SetParams { key, value, mode })
    }
}

/// SET command executor: SET key value [XX]
pub struct SetCmd;

#[async_trait]
impl Command for SetCmd {
    async fn execute(&self, items: &[Value], store: &ByteStore) -> Value {
        let params = match SetParams::parse(items) {
            Ok(params) => params,
            Err(reply) => return reply,
        };

        match params.mode {
            SetMode::Always => {
                store.put(params.key, params.value);
                Value::ok()
            }
            SetMode::IfExists => match store.update(&params.key, params.value) {
                Ok(()) => Value::ok(),
                Err(err) => {
                    debug!(
                        "SET XX skipped, key {:?} not found",
                        String::from_utf8_lossy(err.key())
                    );
                    Value::null()
                }
            },
        }
    }
}
