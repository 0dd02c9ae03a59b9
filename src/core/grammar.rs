//! Output grammar of a line-oriented vendor diagnostic tool.
//!
//! A grammar describes how one category report is laid out: which line opens a
//! device block, how a `key : value` property line looks, how keys are normalized,
//! and how values are coerced into typed readings. The same section parser can be
//! pointed at a differently-worded tool by swapping the grammar.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DetectorError, Result};

static EFSMI_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*DEV ID\s+(\d+)").expect("valid boundary pattern"));

static EFSMI_PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\w+(?:[ \t]+\w+)*)\s*:\s*(.*)$").expect("valid property pattern")
});

const MIB: u64 = 1024 * 1024;

/// Recognized device fields. Keys bound to none of these are validated and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Uuid,
    MemoryTotal,
    MemoryUsed,
    Temperature,
    Utilization,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Uuid => "uuid",
            Field::MemoryTotal => "memory_total",
            Field::MemoryUsed => "memory_used",
            Field::Temperature => "temperature",
            Field::Utilization => "utilization",
        }
    }
}

/// A coerced property value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bytes(u64),
    Float(f64),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Float(_) => "float",
        }
    }
}

/// Optional overrides applied on top of the built-in efsmi grammar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_devices_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_suffix: Option<String>,
    /// Extra unit multipliers, e.g. `{"GiB": 1073741824}`. Unlisted labels read as MiB.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub units: BTreeMap<String, u64>,
    /// Extra or replacement key bindings, e.g. `{"Chip_Name": "name"}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, Field>,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    boundary: Regex,
    property: Regex,
    key_separator: char,
    size_suffix: String,
    default_unit_multiplier: u64,
    units: Vec<(String, u64)>,
    bindings: Vec<(String, Field)>,
    no_devices_marker: String,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::efsmi()
    }
}

impl Grammar {
    /// Grammar of Enflame's `efsmi -q -d <CATEGORY>` reports
    pub fn efsmi() -> Self {
        Self {
            boundary: Regex::clone(&EFSMI_BOUNDARY),
            property: Regex::clone(&EFSMI_PROPERTY),
            key_separator: '_',
            size_suffix: "_Size".to_string(),
            default_unit_multiplier: MIB,
            units: vec![("MiB".to_string(), MIB)],
            bindings: vec![
                ("Dev_Name".to_string(), Field::Name),
                ("Dev_UUID".to_string(), Field::Uuid),
                ("Total_Size".to_string(), Field::MemoryTotal),
                ("Used_Size".to_string(), Field::MemoryUsed),
                ("GCU_Temp".to_string(), Field::Temperature),
                ("GCU_Usage".to_string(), Field::Utilization),
            ],
            no_devices_marker: "no devices".to_string(),
        }
    }

    /// Apply configuration overrides on top of this grammar
    pub fn with_overrides(mut self, overrides: &GrammarOverrides) -> Result<Self> {
        if let Some(pattern) = &overrides.boundary_pattern {
            let re = compile(pattern, "boundary")?;
            if re.captures_len() < 2 {
                return Err(DetectorError::grammar(format!(
                    "boundary pattern {:?} must capture the device id",
                    pattern
                )));
            }
            self.boundary = re;
        }

        if let Some(pattern) = &overrides.property_pattern {
            let re = compile(pattern, "property")?;
            if re.captures_len() < 3 {
                return Err(DetectorError::grammar(format!(
                    "property pattern {:?} must capture a key and a value",
                    pattern
                )));
            }
            self.property = re;
        }

        if let Some(marker) = &overrides.no_devices_marker {
            if marker.trim().is_empty() {
                return Err(DetectorError::grammar("no-devices marker must not be empty"));
            }
            self.no_devices_marker = marker.clone();
        }

        if let Some(suffix) = &overrides.size_suffix {
            self.size_suffix = suffix.clone();
        }

        for (unit, multiplier) in &overrides.units {
            if *multiplier == 0 {
                return Err(DetectorError::grammar(format!(
                    "unit {:?} has a zero multiplier",
                    unit
                )));
            }
            upsert(&mut self.units, unit, *multiplier);
        }

        for (key, field) in &overrides.bindings {
            upsert(&mut self.bindings, key, *field);
        }

        Ok(self)
    }

    /// Device id announced by a block-opening line, if this is one
    pub fn boundary_id(&self, line: &str) -> Result<Option<u32>> {
        let Some(caps) = self.boundary.captures(line) else {
            return Ok(None);
        };
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        raw.parse::<u32>()
            .map(Some)
            .map_err(|e| DetectorError::parse("DEV ID", raw, e.to_string()))
    }

    /// Normalized key and untrimmed value of a property line
    pub fn property<'a>(&self, line: &'a str) -> Option<(String, &'a str)> {
        let caps = self.property.captures(line)?;
        let key = caps.get(1)?.as_str();
        let value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        Some((self.normalize_key(key), value))
    }

    pub fn normalize_key(&self, key: &str) -> String {
        let mut out = String::with_capacity(key.len());
        for (i, word) in key.split_whitespace().enumerate() {
            if i > 0 {
                out.push(self.key_separator);
            }
            out.push_str(word);
        }
        out
    }

    pub fn binding(&self, key: &str) -> Option<Field> {
        self.bindings
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, f)| *f)
    }

    fn is_size_key(&self, key: &str) -> bool {
        let suffix = self.size_suffix.as_bytes();
        let key = key.as_bytes();
        !suffix.is_empty()
            && key.len() >= suffix.len()
            && key[key.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    }

    /// Coerce a raw value according to its normalized key.
    ///
    /// Size keys become byte counts, temperature and usage readings become floats,
    /// everything else is kept as trimmed text. Malformed numbers are errors.
    pub fn coerce(&self, key: &str, raw: &str) -> Result<FieldValue> {
        let value = raw.trim();
        let field = self.binding(key);

        if self.is_size_key(key) || matches!(field, Some(Field::MemoryTotal | Field::MemoryUsed))
        {
            return self.parse_bytes(key, value).map(FieldValue::Bytes);
        }

        if matches!(field, Some(Field::Temperature | Field::Utilization)) {
            return parse_leading_float(key, value).map(FieldValue::Float);
        }

        Ok(FieldValue::Text(value.to_string()))
    }

    fn parse_bytes(&self, key: &str, value: &str) -> Result<u64> {
        let mut tokens = value.split_whitespace();
        let Some(amount) = tokens.next() else {
            return Err(DetectorError::parse(key, value, "missing numeric token"));
        };

        // Unlisted or missing unit labels read as the default unit (MiB for efsmi)
        let multiplier = tokens
            .next()
            .and_then(|unit| self.units.iter().find(|(u, _)| u.eq_ignore_ascii_case(unit)))
            .map(|(_, m)| *m)
            .unwrap_or(self.default_unit_multiplier);

        if let Ok(n) = amount.parse::<u64>() {
            return n
                .checked_mul(multiplier)
                .ok_or_else(|| DetectorError::parse(key, value, "size overflows u64"));
        }

        match amount.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => {
                let bytes = (n * multiplier as f64).round();
                if bytes >= u64::MAX as f64 {
                    return Err(DetectorError::parse(key, value, "size overflows u64"));
                }
                Ok(bytes as u64)
            }
            _ => Err(DetectorError::parse(
                key,
                value,
                format!("{:?} is not a size", amount),
            )),
        }
    }

    /// True when the report declares an empty category.
    ///
    /// The marker is matched case-insensitively and only honoured when no device
    /// block is present, so a device whose name contains the phrase is not lost.
    pub fn reports_no_devices(&self, text: &str) -> bool {
        if text.lines().any(|line| self.boundary.is_match(line)) {
            return false;
        }
        text.to_lowercase()
            .contains(&self.no_devices_marker.to_lowercase())
    }
}

fn compile(pattern: &str, what: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| DetectorError::grammar(format!("invalid {} pattern {:?}: {}", what, pattern, e)))
}

fn upsert<T>(entries: &mut Vec<(String, T)>, key: &str, value: T) {
    match entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
        Some(entry) => entry.1 = value,
        None => entries.push((key.to_string(), value)),
    }
}

fn parse_leading_float(key: &str, value: &str) -> Result<f64> {
    let Some(token) = value.split_whitespace().next() else {
        return Err(DetectorError::parse(key, value, "missing numeric token"));
    };
    match token.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(DetectorError::parse(
            key,
            value,
            format!("{:?} is not a number", token),
        )),
    }
}
