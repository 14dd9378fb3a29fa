// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Run provenance
//!
//! Each run of a cygnet records which toolkit and cygnet versions produced
//! the data, and when the run started, as a one-row `runtime_metadata` table.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::engine::Engine;
use crate::error::DatabaseResult;
use crate::frame::Frame;
use crate::write::{IfExists, insert};

pub const RUNTIME_METADATA_TABLE: &str = "runtime_metadata";

/// One run's provenance row
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeMetadata {
    pub cygnet_name: String,
    pub cygnet_version: String,
    pub started_at: DateTime<Utc>,
    pub extras: IndexMap<String, Value>,
}

impl RuntimeMetadata {
    pub fn new(
        cygnet_name: impl Into<String>,
        cygnet_version: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            cygnet_name: cygnet_name.into(),
            cygnet_version: cygnet_version.into(),
            started_at,
            extras: IndexMap::new(),
        }
    }

    /// Extra column; a key clashing with a standard column overrides it
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn to_frame(&self) -> Frame {
        let mut record = Map::new();
        record.insert(
            "geo_digital_tools".to_string(),
            Value::from(format!("geo_digital_tools@{}", env!("CARGO_PKG_VERSION"))),
        );
        record.insert(
            "cygnet".to_string(),
            Value::from(format!("{}@{}", self.cygnet_name, self.cygnet_version)),
        );
        record.insert(
            "utc_iso_start".to_string(),
            Value::from(self.started_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        record.extend(self.extras.iter().map(|(k, v)| (k.clone(), v.clone())));

        Frame::from_records(&[record])
    }
}

/// Replace the `runtime_metadata` table with this run's row
pub fn write_runtime_metadata(engine: &Engine, metadata: &RuntimeMetadata) -> DatabaseResult<()> {
    insert(engine, RUNTIME_METADATA_TABLE, &metadata.to_frame(), IfExists::Replace)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_frame_layout() {
        let started = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let frame = RuntimeMetadata::new("drillhole_loader", "1.2.0", started)
            .with_extra("source", "wamex")
            .to_frame();

        assert_eq!(
            frame.columns(),
            ["geo_digital_tools", "cygnet", "utc_iso_start", "source"]
        );
        assert_eq!(frame.rows()[0][1], json!("drillhole_loader@1.2.0"));
        assert_eq!(frame.rows()[0][2], json!("2024-03-01T08:30:00.000000Z"));
    }
}
