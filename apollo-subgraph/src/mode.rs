use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Which side of federation a composed schema is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// The schema a subgraph serves. Gets the `_entities` and `_service` query fields.
    #[default]
    Service,
    /// A gateway's partial view of a subgraph. Root types are always extensions, `@external`
    /// fields are dropped from extensions, and no federation fields are added.
    Gateway,
}

impl SchemaMode {
    pub fn is_gateway(self) -> bool {
        self == Self::Gateway
    }
}

impl Display for SchemaMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service => f.write_str("service"),
            Self::Gateway => f.write_str("gateway"),
        }
    }
}

impl FromStr for SchemaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(Self::Service),
            "gateway" => Ok(Self::Gateway),
            _ => Err(format!(
                r#"unknown schema mode "{s}", expected "service" or "gateway""#
            )),
        }
    }
}
