use bytes::{BufMut, BytesMut};
use thiserror::Error;

/// Largest bulk string accepted from a client (same limit as Redis)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Longest type line (simple string, error, integer or length header)
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Most elements a single array may claim
pub const MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Deepest array nesting accepted; requests are flat arrays of bulk strings
pub const MAX_NESTING_DEPTH: usize = 8;

/// Upper bound on preallocated array slots, whatever count the client claims
const MAX_ARRAY_PREALLOC: usize = 1024;

/// RESP (REdis Serialization Protocol) data types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// Simple strings, used for simple responses like "OK"
  SimpleString(String),
  /// Errors
  Error(String),
  /// Integers
  Integer(i64),
  /// Bulk strings, used for binary-safe strings (can be null)
  BulkString(Option<Vec<u8>>),
  /// Arrays of other values (can be null)
  Array(Option<Vec<Value>>),
}

impl Value {
  /// Create a simple OK response
  pub fn ok() -> Self {
    Value::SimpleString("OK".to_string())
  }

  /// Create an error response
  pub fn error(msg: impl Into<String>) -> Self {
    Value::Error(msg.into())
  }

  /// Null bulk string, the reply for a missing key
  pub fn null() -> Self {
    Value::BulkString(None)
  }

  pub fn bulk(data: impl Into<Vec<u8>>) -> Self {
    Value::BulkString(Some(data.into()))
  }

  /// Build a request array from command words, as a client would send it
  pub fn command<I, T>(words: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
  {
    Value::Array(Some(
      words
        .into_iter()
        .map(|w| Value::bulk(w.as_ref()))
        .collect(),
    ))
  }

  /// Encode Value to RESP bytes
  pub fn encode(&self) -> BytesMut {
    let mut buf = BytesMut::new();
    self.encode_to(&mut buf);
    buf
  }

  fn encode_to(&self, buf: &mut BytesMut) {
    match self {
      Value::SimpleString(s) => {
        buf.put_u8(b'+');
        buf.put_slice(s.as_bytes());
        buf.put_slice(b"\r\n");
      }
      Value::Error(e) => {
        buf.put_u8(b'-');
        buf.put_slice(e.as_bytes());
        buf.put_slice(b"\r\n");
      }
      Value::Integer(i) => {
        buf.put_u8(b':');
        buf.put_slice(i.to_string().as_bytes());
        buf.put_slice(b"\r\n");
      }
      Value::BulkString(None) => buf.put_slice(b"$-1\r\n"),
      Value::BulkString(Some(data)) => {
        buf.put_u8(b'$');
        buf.put_slice(data.len().to_string().as_bytes());
        buf.put_slice(b"\r\n");
        buf.put_slice(data);
        buf.put_slice(b"\r\n");
      }
      Value::Array(None) => buf.put_slice(b"*-1\r\n"),
      Value::Array(Some(items)) => {
        buf.put_u8(b'*');
        buf.put_slice(items.len().to_string().as_bytes());
        buf.put_slice(b"\r\n");
        for item in items {
          item.encode_to(buf);
        }
      }
    }
  }
}

/// Malformed RESP input; the connection cannot be resynchronized after one
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
  #[error("invalid type byte {0:?}")]
  InvalidType(char),

  #[error("invalid length '{0}'")]
  InvalidLength(String),

  #[error("bulk length {0} exceeds limit")]
  BulkTooLarge(usize),

  #[error("bulk string not terminated by CRLF")]
  UnterminatedBulk,

  #[error("line exceeds {} bytes", MAX_LINE_LEN)]
  LineTooLong,

  #[error("array length {0} exceeds limit")]
  ArrayTooLarge(usize),

  #[error("arrays nested deeper than {}", MAX_NESTING_DEPTH)]
  NestingTooDeep,
}

/// `Ok(None)` means the buffer does not hold a complete value yet
type ParseResult<T> = Result<Option<T>, ProtocolError>;

/// Incremental parser for RESP protocol
pub struct Parser;

impl Parser {
  /// Parse one value from the front of the buffer, returning it with the
  /// number of bytes it occupied
  pub fn parse(buffer: &[u8]) -> ParseResult<(Value, usize)> {
    let mut pos = 0;
    Ok(Self::parse_value(buffer, &mut pos, 0)?.map(|value| (value, pos)))
  }

  fn parse_value(buffer: &[u8], pos: &mut usize, depth: usize) -> ParseResult<Value> {
    let Some(&type_byte) = buffer.get(*pos) else {
      return Ok(None);
    };
    *pos += 1;

    match type_byte {
      b'+' => Ok(Self::read_line(buffer, pos)?.map(|line| Value::SimpleString(lossy(line)))),
      b'-' => Ok(Self::read_line(buffer, pos)?.map(|line| Value::Error(lossy(line)))),
      b':' => match Self::read_line(buffer, pos)? {
        Some(line) => Ok(Some(Value::Integer(parse_int(line)?))),
        None => Ok(None),
      },
      b'$' => Self::parse_bulk_string(buffer, pos),
      b'*' => Self::parse_array(buffer, pos, depth + 1),
      other => Err(ProtocolError::InvalidType(char::from(other))),
    }
  }

  fn parse_bulk_string(buffer: &[u8], pos: &mut usize) -> ParseResult<Value> {
    let Some(line) = Self::read_line(buffer, pos)? else {
      return Ok(None);
    };
    let len = match parse_int(line)? {
      -1 => return Ok(Some(Value::BulkString(None))),
      n if n < 0 => return Err(ProtocolError::InvalidLength(n.to_string())),
      n => n as usize,
    };
    if len > MAX_BULK_LEN {
      return Err(ProtocolError::BulkTooLarge(len));
    }

    // Payload plus trailing \r\n
    let end = *pos + len;
    if end + 2 > buffer.len() {
      return Ok(None);
    }
    if &buffer[end..end + 2] != b"\r\n" {
      return Err(ProtocolError::UnterminatedBulk);
    }

    let data = buffer[*pos..end].to_vec();
    *pos = end + 2;
    Ok(Some(Value::BulkString(Some(data))))
  }

  fn parse_array(buffer: &[u8], pos: &mut usize, depth: usize) -> ParseResult<Value> {
    if depth > MAX_NESTING_DEPTH {
      return Err(ProtocolError::NestingTooDeep);
    }
    let Some(line) = Self::read_line(buffer, pos)? else {
      return Ok(None);
    };
    let count = match parse_int(line)? {
      -1 => return Ok(Some(Value::Array(None))),
      n if n < 0 => return Err(ProtocolError::InvalidLength(n.to_string())),
      n => n as usize,
    };
    if count > MAX_ARRAY_LEN {
      return Err(ProtocolError::ArrayTooLarge(count));
    }

    let mut items = Vec::with_capacity(count.min(MAX_ARRAY_PREALLOC));
    for _ in 0..count {
      match Self::parse_value(buffer, pos, depth)? {
        Some(item) => items.push(item),
        None => return Ok(None),
      }
    }

    Ok(Some(Value::Array(Some(items))))
  }

  /// Scans at most `MAX_LINE_LEN` bytes plus the CRLF for the line end
  fn read_line<'a>(buffer: &'a [u8], pos: &mut usize) -> ParseResult<&'a [u8]> {
    let start = *pos;
    let Some(rest) = buffer.get(start..) else {
      return Ok(None);
    };
    let window = &rest[..rest.len().min(MAX_LINE_LEN + 2)];

    match window.windows(2).position(|w| w == b"\r\n") {
      Some(offset) => {
        *pos = start + offset + 2;
        Ok(Some(&buffer[start..start + offset]))
      }
      None if window.len() == MAX_LINE_LEN + 2 => Err(ProtocolError::LineTooLong),
      None => Ok(None),
    }
  }
}

fn lossy(line: &[u8]) -> String {
  String::from_utf8_lossy(line).into_owned()
}

fn parse_int(line: &[u8]) -> Result<i64, ProtocolError> {
  std::str::from_utf8(line)
    .ok()
    .and_then(|s| s.parse::<i64>().ok())
    .ok_or_else(|| ProtocolError::InvalidLength(lossy(line)))
}
