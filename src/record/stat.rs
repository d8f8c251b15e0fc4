//! Dictionary-driven record implementation

use super::{ActionSpec, FieldSpec, OffsetTable, TypedRecord};
use crate::core::types::{FieldValue, ProbeError, ProbeResult};
use crate::memory::MemoryContext;
use std::collections::HashSet;
use std::sync::Arc;

/// A record whose entire shape comes from its [`OffsetTable`].
///
/// Holds the last-observed value of every declared field; `refresh()`
/// re-reads all of them from the bound context in one pass.
#[derive(Debug)]
pub struct StatRecord {
    context: Arc<MemoryContext>,
    table: OffsetTable,
    values: Vec<FieldValue>,
}

impl StatRecord {
    /// Binds a record to a context and an offset dictionary.
    ///
    /// Rejects tables with duplicate field names or actions that target an
    /// undeclared field or carry a mismatched value kind; these are
    /// configuration bugs and surface before the first tick.
    pub fn bind(context: Arc<MemoryContext>, table: OffsetTable) -> ProbeResult<Self> {
        let mut names = HashSet::new();
        for field in &table.fields {
            if !names.insert(field.name.as_str()) {
                return Err(ProbeError::InvalidAddress(format!(
                    "duplicate field name {} in offset table",
                    field.name
                )));
            }
        }
        for action in &table.actions {
            let field = table
                .fields
                .iter()
                .find(|f| f.name == action.field)
                .ok_or_else(|| ProbeError::FieldNotFound(action.field.clone()))?;
            if action.value.kind() != field.kind {
                return Err(ProbeError::kind_mismatch(
                    &action.field,
                    field.kind,
                    action.value.kind(),
                ));
            }
        }

        let values = table.fields.iter().map(|f| f.kind.zero()).collect();
        Ok(StatRecord {
            context,
            table,
            values,
        })
    }

    pub fn table(&self) -> &OffsetTable {
        &self.table
    }

    fn field_index(&self, name: &str) -> ProbeResult<usize> {
        self.table
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| ProbeError::FieldNotFound(name.to_string()))
    }

    fn action_spec(&self, name: &str) -> ProbeResult<&ActionSpec> {
        self.table
            .actions
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| ProbeError::ActionNotFound(name.to_string()))
    }
}

/// Walks a field's pointer chain down to its final virtual address.
///
/// Each link dereferences an in-game pointer (declared width and byte order)
/// and adds the link offset. A chased pointer that lands outside every
/// mapped region has gone stale; that is detected here, lazily, on access.
fn resolve_field(ctx: &MemoryContext, table: &OffsetTable, spec: &FieldSpec) -> ProbeResult<u64> {
    let mut vaddr = spec.address;
    for (level, link) in spec.chain.iter().enumerate() {
        let pointer = ctx.read_game_pointer(vaddr, table.pointer_width, table.endian)?;
        if pointer == 0 {
            return Err(ProbeError::pointer_chain_broken(
                level,
                format!("null pointer at 0x{vaddr:08X}"),
            ));
        }
        vaddr = pointer.checked_add(*link).ok_or_else(|| {
            ProbeError::pointer_chain_broken(level, format!("link 0x{link:X} wraps"))
        })?;
        if ctx.locate(vaddr).is_err() {
            return Err(ProbeError::stale_region(
                spec.name.clone(),
                format!("0x{vaddr:08X}"),
            ));
        }
    }
    Ok(vaddr)
}

impl TypedRecord for StatRecord {
    fn refresh(&mut self) -> ProbeResult<()> {
        let ctx = &self.context;
        let table = &self.table;
        for (spec, slot) in table.fields.iter().zip(self.values.iter_mut()) {
            let vaddr = resolve_field(ctx, table, spec)?;
            *slot = ctx.read_value(vaddr, spec.kind, table.endian)?;
        }
        Ok(())
    }

    fn field_names(&self) -> Vec<&str> {
        self.table.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn value(&self, field: &str) -> ProbeResult<FieldValue> {
        let index = self.field_index(field)?;
        Ok(self.values[index])
    }

    fn set_value(&mut self, field: &str, value: FieldValue) -> ProbeResult<()> {
        let index = self.field_index(field)?;
        let spec = &self.table.fields[index];
        if value.kind() != spec.kind {
            return Err(ProbeError::kind_mismatch(field, spec.kind, value.kind()));
        }
        let vaddr = resolve_field(&self.context, &self.table, spec)?;
        self.context.write_value(vaddr, value, self.table.endian)?;
        self.values[index] = value;
        Ok(())
    }

    fn action_names(&self) -> Vec<&str> {
        self.table.actions.iter().map(|a| a.name.as_str()).collect()
    }

    fn invoke(&mut self, action: &str) -> ProbeResult<()> {
        let spec = self.action_spec(action)?;
        let (field, value) = (spec.field.clone(), spec.value);
        self.set_value(&field, value)
    }
}
