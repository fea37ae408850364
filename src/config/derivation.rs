//! # Storage Name Derivation
//!
//! Maps a service identity onto the PostgreSQL schema and Redis key
//! namespace it owns.
//!
//! A deployment is a *singleton* when the instance name is empty or equal
//! to the service name. Singletons share the service's first hyphen
//! segment; every other instance gets its own isolated names.
//!
//! | Service | Instance | Schema | Namespace |
//! |---------|----------|--------|-----------|
//! | `trading-system-engine` | *(empty)* | `trading` | `trading` |
//! | `trading-system-engine` | `trading-system-engine-LH` | `trading_system_engine_lh` | `trading_system:LH` |
//! | `trading-system-engine` | `trading-system-engine-Alpha-2` | `trading_system_engine_alpha_2` | `trading_system:Alpha-2` |
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::config::derivation::StorageNames;
//!
//! let names = StorageNames::derive("trading-system-engine", "trading-system-engine-LH");
//! assert_eq!(names.schema, "trading_system_engine_lh");
//! assert_eq!(names.namespace, "trading_system:LH");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema and namespace owned by one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageNames {
    /// Effective instance name (the service name in singleton mode).
    pub instance_name: String,
    /// PostgreSQL schema.
    pub schema: String,
    /// Redis key namespace.
    pub namespace: String,
}

impl StorageNames {
    /// Derives names from a service name and an optional instance name.
    ///
    /// An empty `instance_name` selects singleton mode.
    #[must_use]
    pub fn derive(service_name: &str, instance_name: &str) -> Self {
        let instance_name = if instance_name.is_empty() {
            service_name
        } else {
            instance_name
        };

        if instance_name == service_name {
            let base = first_segment(service_name).to_string();
            return Self {
                instance_name: instance_name.to_string(),
                schema: base.clone(),
                namespace: base,
            };
        }

        Self {
            instance_name: instance_name.to_string(),
            schema: instance_name.replace('-', "_").to_lowercase(),
            namespace: instance_namespace(instance_name),
        }
    }

    /// Replaces derived names with explicit overrides where given.
    ///
    /// Empty overrides are ignored.
    #[must_use]
    pub fn with_overrides(mut self, schema: Option<&str>, namespace: Option<&str>) -> Self {
        if let Some(schema) = schema.filter(|s| !s.is_empty()) {
            self.schema = schema.to_string();
        }
        if let Some(namespace) = namespace.filter(|s| !s.is_empty()) {
            self.namespace = namespace.to_string();
        }
        self
    }
}

impl fmt::Display for StorageNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (schema={}, namespace={})",
            self.instance_name, self.schema, self.namespace
        )
    }
}

fn first_segment(name: &str) -> &str {
    name.split('-').next().unwrap_or(name)
}

/// `p0-p1-rest` becomes `p0_p1:suffix`, where `suffix` drops the first
/// segment of `rest` when `rest` has more than one.
fn instance_namespace(instance_name: &str) -> String {
    let mut parts = instance_name.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(p0), Some(p1), Some(rest)) => {
            let suffix = rest.split_once('-').map_or(rest, |(_, tail)| tail);
            format!("{p0}_{p1}:{suffix}")
        }
        _ => instance_name.replace('-', "_"),
    }
}
