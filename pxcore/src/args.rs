//! Typed access to the argument bag of a record.
use pxinstr::{
    ctx::{ContextPath, ContextStep, ids},
    op::ExpOp,
    policy::{ListOrder, ListPolicy, ListWriteFlags, MapOrder, MapPolicy, MapWriteFlags},
    record::ArgumentBag,
    value::{HostValue, HostValueKind},
};

use crate::{
    coercion::ValueCoercion,
    magic::*,
    utils::error::{CompileError, CompileResult},
};

/// Convert a host integer, rejecting values beyond `i64`.
fn host_int(value: &HostValue) -> Option<CompileResult<i64>> {
    match value {
        HostValue::Int(i) => Some(i64::try_from(i).map_err(|_| CompileError::IntegerOverflow)),
        _ => None,
    }
}

/// Argument bag of one record, viewed through the operation it belongs to.
pub struct Args<'a> {
    op: ExpOp,
    bag: &'a ArgumentBag,
}

impl<'a> Args<'a> {
    pub fn new(op: ExpOp, bag: &'a ArgumentBag) -> Self {
        Self { op, bag }
    }

    pub fn get(&self, field: &str) -> Option<&'a HostValue> {
        self.bag.get(field)
    }

    fn missing(&self, field: &'static str) -> CompileError {
        CompileError::MissingField {
            op: self.op.to_string(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str, found: &HostValue) -> CompileError {
        CompileError::InvalidField {
            op: self.op.to_string(),
            field,
            expected,
            found: HostValueKind::from(found),
        }
    }

    /// Required integer argument.
    pub fn int(&self, field: &'static str) -> CompileResult<i64> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        host_int(value).unwrap_or_else(|| Err(self.invalid(field, "an integer", value)))
    }

    /// Optional integer argument.
    pub fn int_or(&self, field: &'static str, default: i64) -> CompileResult<i64> {
        match self.get(field) {
            None | Some(HostValue::Nil) => Ok(default),
            Some(_) => self.int(field),
        }
    }

    /// Required non-negative integer argument.
    pub fn uint(&self, field: &'static str) -> CompileResult<u64> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        match value {
            HostValue::Int(i) => u64::try_from(i).map_err(|_| CompileError::IntegerOverflow),
            other => Err(self.invalid(field, "a non-negative integer", other)),
        }
    }

    /// Required text argument.
    pub fn string(&self, field: &'static str) -> CompileResult<String> {
        match self.get(field) {
            Some(HostValue::Str(s)) => Ok(s.clone()),
            Some(other) => Err(self.invalid(field, "a string", other)),
            None => Err(self.missing(field)),
        }
    }

    /// Name of the bin the operation reads.
    pub fn bin_name(&self) -> CompileResult<String> {
        self.string(ARG_BIN)
    }

    /// Context path attached to the record, if any. An absent, nil or empty
    /// path means the operation applies to the top-level value.
    pub fn context(&self, coercion: &ValueCoercion<'_>) -> CompileResult<Option<ContextPath>> {
        let steps = match self.get(ARG_CTX) {
            None | Some(HostValue::Nil) => return Ok(None),
            Some(HostValue::List(steps)) => steps,
            Some(other) => {
                return Err(CompileError::InvalidContext {
                    step: 0,
                    reason: format!("expected a list of steps, found {:?}", HostValueKind::from(other)),
                });
            }
        };

        if steps.is_empty() {
            return Ok(None);
        }

        let mut path = ContextPath::new();
        for (index, step) in steps.iter().enumerate() {
            path.push(parse_context_step(index, step, coercion)?);
        }
        Ok(Some(path))
    }

    /// List policy attached to the record, if any.
    pub fn list_policy(&self) -> CompileResult<Option<ListPolicy>> {
        let Some(policy) = self.policy_map(ARG_LIST_POLICY, "list")? else {
            return Ok(None);
        };

        let order = policy_int(policy, ARG_LIST_ORDER, "list")?;
        let order = u32::try_from(order)
            .ok()
            .and_then(ListOrder::from_repr)
            .ok_or_else(|| invalid_policy("list", format!("unknown list order {}", order)))?;

        let flags = policy_int(policy, POLICY_WRITE_FLAGS, "list")?;
        let flags = u32::try_from(flags)
            .ok()
            .and_then(ListWriteFlags::from_bits)
            .ok_or_else(|| invalid_policy("list", format!("unknown write flags {:#x}", flags)))?;

        Ok(Some(ListPolicy::new(order, flags)))
    }

    /// Map policy attached to the record, if any.
    pub fn map_policy(&self) -> CompileResult<Option<MapPolicy>> {
        let Some(policy) = self.policy_map(ARG_MAP_POLICY, "map")? else {
            return Ok(None);
        };

        let order = policy_int(policy, POLICY_MAP_ORDER, "map")?;
        let order = u32::try_from(order)
            .ok()
            .and_then(MapOrder::from_repr)
            .ok_or_else(|| invalid_policy("map", format!("unknown map order {}", order)))?;

        let flags = policy_int(policy, POLICY_MAP_WRITE_FLAGS, "map")?;
        let flags = u32::try_from(flags)
            .ok()
            .and_then(MapWriteFlags::from_bits)
            .ok_or_else(|| invalid_policy("map", format!("unknown write flags {:#x}", flags)))?;

        let persist_index = match policy.get(POLICY_PERSIST_INDEX) {
            None | Some(HostValue::Nil) => false,
            Some(HostValue::Bool(b)) => *b,
            Some(other) => {
                return Err(invalid_policy(
                    "map",
                    format!("`persist_index` must be a boolean, found {:?}", HostValueKind::from(other)),
                ));
            }
        };

        let mut map_policy = MapPolicy::new(order, flags);
        map_policy.persist_index = persist_index;
        Ok(Some(map_policy))
    }

    /// Non-empty policy sub-map stored under `field`.
    fn policy_map(&self, field: &str, policy: &'static str) -> CompileResult<Option<&'a HostValue>> {
        match self.get(field) {
            None | Some(HostValue::Nil) => Ok(None),
            Some(HostValue::Map(entries)) if entries.is_empty() => Ok(None),
            Some(map @ HostValue::Map(_)) => Ok(Some(map)),
            Some(other) => Err(invalid_policy(
                policy,
                format!("expected a map, found {:?}", HostValueKind::from(other)),
            )),
        }
    }
}

fn invalid_policy(policy: &'static str, reason: String) -> CompileError {
    CompileError::InvalidPolicy { policy, reason }
}

fn policy_int(policy: &HostValue, key: &str, name: &'static str) -> CompileResult<i64> {
    match policy.get(key) {
        None | Some(HostValue::Nil) => Ok(0),
        Some(value) => host_int(value).unwrap_or_else(|| {
            Err(invalid_policy(
                name,
                format!("`{}` must be an integer, found {:?}", key, HostValueKind::from(value)),
            ))
        }),
    }
}

fn parse_context_step(
    index: usize,
    step: &HostValue,
    coercion: &ValueCoercion<'_>,
) -> CompileResult<ContextStep> {
    let invalid = |reason: String| CompileError::InvalidContext { step: index, reason };

    if !step.is_map() {
        return Err(invalid(format!(
            "expected a map, found {:?}",
            HostValueKind::from(step)
        )));
    }

    let id = match step.get(CTX_ID) {
        Some(id) => host_int(id)
            .unwrap_or_else(|| Err(invalid("`id` must be an integer".to_string())))?,
        None => return Err(invalid("missing `id`".to_string())),
    };

    let int_value = || -> CompileResult<i64> {
        match step.get(CTX_VALUE) {
            Some(value) => host_int(value)
                .unwrap_or_else(|| Err(invalid("`value` must be an integer".to_string()))),
            None => Err(invalid("missing `value`".to_string())),
        }
    };
    let literal_value = || coercion.coerce(step.get(CTX_VALUE));
    let extra = |key: &str| step.get(CTX_EXTRA_ARGS).and_then(|extra| extra.get(key));

    let parsed = match id {
        CTX_LIST_INDEX_CREATE_ID => {
            let order = match extra(ARG_LIST_ORDER) {
                None | Some(HostValue::Nil) => ListOrder::Unordered,
                Some(value) => {
                    let order = host_int(value)
                        .unwrap_or_else(|| Err(invalid("`list_order` must be an integer".to_string())))?;
                    u32::try_from(order)
                        .ok()
                        .and_then(ListOrder::from_repr)
                        .ok_or_else(|| invalid(format!("unknown list order {}", order)))?
                }
            };
            let pad = matches!(extra(CTX_PAD), Some(HostValue::Bool(true)));
            ContextStep::ListIndexCreate {
                index: int_value()?,
                order,
                pad,
            }
        }
        CTX_MAP_KEY_CREATE_ID => {
            let order = match extra(CTX_MAP_ORDER) {
                None | Some(HostValue::Nil) => MapOrder::Unordered,
                Some(value) => {
                    let order = host_int(value)
                        .unwrap_or_else(|| Err(invalid("`map_order` must be an integer".to_string())))?;
                    u32::try_from(order)
                        .ok()
                        .and_then(MapOrder::from_repr)
                        .ok_or_else(|| invalid(format!("unknown map order {}", order)))?
                }
            };
            ContextStep::MapKeyCreate {
                key: literal_value()?,
                order,
            }
        }
        id => match u8::try_from(id).unwrap_or(0) {
            ids::LIST_INDEX => ContextStep::ListIndex(int_value()?),
            ids::LIST_RANK => ContextStep::ListRank(int_value()?),
            ids::LIST_VALUE => ContextStep::ListValue(literal_value()?),
            ids::MAP_INDEX => ContextStep::MapIndex(int_value()?),
            ids::MAP_RANK => ContextStep::MapRank(int_value()?),
            ids::MAP_KEY => ContextStep::MapKey(literal_value()?),
            ids::MAP_VALUE => ContextStep::MapValue(literal_value()?),
            _ => return Err(invalid(format!("unknown step id {:#x}", id))),
        },
    };
    Ok(parsed)
}
