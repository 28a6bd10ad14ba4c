// src/core/commands/string/set.rs

//! Implements the `SET` command: `SET key value [PX milliseconds]`.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::ttl;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    /// Time-to-live in milliseconds, from the PX option.
    pub ttl_ms: Option<u64>,
}

impl ParseCommand for Set {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        if args.len() < 2 {
            return Err(PyropeError::InvalidArgument {
                cmd: "SET",
                reason: "expected key and value".to_string(),
            });
        }
        let key = extract_bytes(&args[0])?;
        let value = extract_bytes(&args[1])?;
        let mut ttl_ms = None;

        let mut i = 2;
        while i < args.len() {
            let opt = extract_string(&args[i])?;
            match opt.to_ascii_uppercase().as_str() {
                "PX" => {
                    let Some(ms_frame) = args.get(i + 1) else {
                        return Err(PyropeError::InvalidArgument {
                            cmd: "SET",
                            reason: "expected millis value for px option".to_string(),
                        });
                    };
                    let ms = extract_string(ms_frame)?.parse::<u64>().map_err(|_| {
                        PyropeError::InvalidArgument {
                            cmd: "SET",
                            reason: "PX option must be an integer".to_string(),
                        }
                    })?;
                    ttl_ms = Some(ms);
                    i += 2;
                }
                _ => {
                    return Err(PyropeError::InvalidArgument {
                        cmd: "SET",
                        reason: format!("unknown option {opt}"),
                    });
                }
            }
        }

        Ok(Set { key, value, ttl_ms })
    }
}

#[async_trait]
impl ExecutableCommand for Set {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let db = ctx.db.clone();
        let (_, guard) = ctx.get_single_shard_context_mut(&self.key)?;

        // SET always replaces, whatever the previous value held. The version
        // carries over incremented so stale expiry timers become no-ops.
        let version = guard
            .peek(&self.key)
            .map_or(1, |old| old.version.wrapping_add(1));
        let mut value = StoredValue::new(DataValue::String(self.value.clone()));
        value.version = version;

        // A PX option replaces any prior deadline; its absence clears it.
        if let Some(ms) = self.ttl_ms {
            let deadline = Instant::now() + Duration::from_millis(ms);
            value.expiry = Some(deadline);
            ttl::schedule_removal(db, self.key.clone(), deadline, version);
        }
        guard.put(self.key.clone(), value);

        Ok(RespValue::SimpleString("OK".into()))
    }
}
