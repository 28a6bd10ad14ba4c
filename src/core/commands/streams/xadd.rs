// src/core/commands/streams/xadd.rs

//! Implements the `XADD` command for adding entries to a stream.
//!
//! `XADD key <* | ms-* | ms | ms-seq> field value [field value ...]`
//!
//! The entry ID is resolved against the stream's current top entry; fully or
//! partially auto-generated IDs fill in the wall-clock milliseconds and the
//! next free sequence number. On success the reply is a bulk string holding
//! the resolved ID.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::{Stream, StreamIdSpec};
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct XAdd {
    pub key: Bytes,
    pub id_spec: StreamIdSpec,
    /// The field-value pairs of the entry, in argument order.
    pub fields: IndexMap<Bytes, Bytes>,
}

impl Default for XAdd {
    fn default() -> Self {
        Self {
            key: Bytes::new(),
            id_spec: StreamIdSpec::Auto,
            fields: IndexMap::new(),
        }
    }
}

impl ParseCommand for XAdd {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        if args.len() < 2 {
            return Err(PyropeError::InvalidArgument {
                cmd: "XADD",
                reason: "expected key, id".to_string(),
            });
        }
        let key = extract_bytes(&args[0])?;
        let id_spec: StreamIdSpec = extract_string(&args[1])?.parse()?;

        let field_args = &args[2..];
        if field_args.is_empty() || field_args.len() % 2 != 0 {
            return Err(PyropeError::InvalidArgument {
                cmd: "XADD",
                reason: "no value given for key".to_string(),
            });
        }
        let fields = field_args
            .chunks_exact(2)
            .map(|chunk| Ok((extract_bytes(&chunk[0])?, extract_bytes(&chunk[1])?)))
            .collect::<Result<_, PyropeError>>()?;

        Ok(XAdd {
            key,
            id_spec,
            fields,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XAdd {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let (_, guard) = ctx.get_single_shard_context_mut(&self.key)?;

        if guard.peek(&self.key).is_some_and(|entry| entry.is_expired()) {
            guard.pop(&self.key);
        }

        let created_here = guard.peek(&self.key).is_none();
        let entry = guard.get_or_insert_with_mut(self.key.clone(), || {
            StoredValue::new(DataValue::Stream(Stream::new()))
        });
        let DataValue::Stream(stream) = &mut entry.data else {
            return Err(PyropeError::WrongType);
        };

        match stream.add_entry(self.id_spec.clone(), self.fields.clone()) {
            Ok(new_id) => {
                entry.version = entry.version.wrapping_add(1);
                Ok(RespValue::BulkString(new_id.to_string().into()))
            }
            Err(e) => {
                // A rejected ID must not leave an empty stream behind.
                if created_here {
                    guard.pop(&self.key);
                }
                Err(e)
            }
        }
    }
}
