//! Section parser: one category report in, one [`CategoryMap`] out.

use log::trace;

use super::grammar::{Field, FieldValue, Grammar};
use crate::error::{DetectorError, Result};

/// Typed readings collected from one device block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceFields {
    pub id: u32,
    pub name: Option<String>,
    pub uuid: Option<String>,
    pub memory_total: Option<u64>,
    pub memory_used: Option<u64>,
    pub temperature: Option<f64>,
    pub utilization: Option<f64>,
}

impl DeviceFields {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::Name, FieldValue::Text(s)) => self.name = Some(s),
            (Field::Uuid, FieldValue::Text(s)) => self.uuid = Some(s),
            (Field::MemoryTotal, FieldValue::Bytes(n)) => self.memory_total = Some(n),
            (Field::MemoryUsed, FieldValue::Bytes(n)) => self.memory_used = Some(n),
            (Field::Temperature, FieldValue::Float(n)) => self.temperature = Some(n),
            (Field::Utilization, FieldValue::Float(n)) => self.utilization = Some(n),
            (field, value) => {
                return Err(DetectorError::grammar(format!(
                    "field `{}` cannot hold a {} value",
                    field.as_str(),
                    value.kind()
                )))
            }
        }
        Ok(())
    }
}

/// Device blocks of one category report, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    devices: Vec<DeviceFields>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block. A repeated id replaces the earlier block in place.
    pub fn insert(&mut self, fields: DeviceFields) {
        match self.devices.iter_mut().find(|d| d.id == fields.id) {
            Some(existing) => *existing = fields,
            None => self.devices.push(fields),
        }
    }

    pub fn get(&self, id: u32) -> Option<&DeviceFields> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.devices.iter().map(|d| d.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceFields> {
        self.devices.iter()
    }
}

/// Parse one category report into per-device fields.
///
/// Property lines seen before the first device boundary cannot be attributed and
/// are dropped. Blank and unrecognized lines are skipped.
pub fn parse_section(text: &str, grammar: &Grammar) -> Result<CategoryMap> {
    let mut devices = CategoryMap::new();
    let mut current: Option<DeviceFields> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(id) = grammar.boundary_id(line)? {
            if let Some(done) = current.take() {
                devices.insert(done);
            }
            current = Some(DeviceFields::new(id));
            continue;
        }

        let Some((key, raw)) = grammar.property(line) else {
            continue;
        };

        let Some(device) = current.as_mut() else {
            trace!("Dropping property `{}` outside any device block", key);
            continue;
        };

        let value = grammar.coerce(&key, raw)?;
        match grammar.binding(&key) {
            Some(field) => device.set(field, value)?,
            None => trace!("Ignoring unbound key `{}` on device {}", key, device.id),
        }
    }

    if let Some(done) = current.take() {
        devices.insert(done);
    }

    Ok(devices)
}
