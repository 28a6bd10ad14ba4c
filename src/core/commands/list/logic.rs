// src/core/commands/list/logic.rs

//! Shared storage logic for the list commands.

use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::{ExecutionContext, PushDirection};
use crate::core::{PyropeError, RespValue};
use bytes::Bytes;
use std::collections::VecDeque;

/// Shared logic for `LPUSH` and `RPUSH`.
///
/// Runs entirely under the key's shard lock. Values are first offered to
/// blocked `BLPOP` waiters in the order a pop sequence would yield them;
/// whatever the waiters consume never touches the list. The reported length
/// is the one a client would observe had the pushes and the waiters' pops
/// executed back to back.
pub(crate) fn list_push_logic(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    values: &[Bytes],
    direction: PushDirection,
) -> Result<RespValue, PyropeError> {
    let state = ctx.state.clone();
    let (_, guard) = ctx.get_single_shard_context_mut(key)?;

    // Lazy expiry before the type check.
    if guard.peek(key).is_some_and(|entry| entry.is_expired()) {
        guard.pop(key);
    }
    if let Some(entry) = guard.peek(key) {
        if !matches!(entry.data, DataValue::List(_)) {
            return Err(PyropeError::WrongType);
        }
    }

    // The head after pushing everything is the last LPUSH argument, so for a
    // left push the waiters see the arguments in reverse.
    let pop_order: Vec<Bytes> = match direction {
        PushDirection::Left => values.iter().rev().cloned().collect(),
        PushDirection::Right => values.to_vec(),
    };
    let consumed = state
        .blocker_manager
        .notify_and_consume_for_push(key, &pop_order);

    let leftovers: &[Bytes] = match direction {
        PushDirection::Left => &values[..values.len() - consumed],
        PushDirection::Right => &values[consumed..],
    };

    let len_in_store = if leftovers.is_empty() {
        match guard.peek(key).map(|entry| &entry.data) {
            Some(DataValue::List(list)) => list.len(),
            _ => 0,
        }
    } else {
        let entry = guard.get_or_insert_with_mut(key.clone(), || {
            StoredValue::new(DataValue::List(VecDeque::new()))
        });
        let DataValue::List(list) = &mut entry.data else {
            return Err(PyropeError::WrongType);
        };
        for value in leftovers {
            match direction {
                PushDirection::Left => list.push_front(value.clone()),
                PushDirection::Right => list.push_back(value.clone()),
            }
        }
        entry.version = entry.version.wrapping_add(1);
        list.len()
    };

    Ok(RespValue::Integer((len_in_store + consumed) as i64))
}

/// Pops the head element of the list at `key`, removing the key when the
/// list drains. Returns `None` for an absent, expired, or empty list.
pub(crate) fn list_pop_logic(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
) -> Result<Option<Bytes>, PyropeError> {
    let (_, guard) = ctx.get_single_shard_context_mut(key)?;

    let Some(entry) = guard.get_mut(key) else {
        return Ok(None);
    };
    if entry.is_expired() {
        guard.pop(key);
        return Ok(None);
    }

    let DataValue::List(list) = &mut entry.data else {
        return Err(PyropeError::WrongType);
    };
    let popped = list.pop_front();
    if popped.is_some() {
        entry.version = entry.version.wrapping_add(1);
        if list.is_empty() {
            guard.pop(key);
        }
    }
    Ok(popped)
}
