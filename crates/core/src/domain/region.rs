use serde::{Deserialize, Serialize};

/// Commercial region cluster a customer (or quote destination) belongs to.
/// Each cluster carries its own list-price column and overhead table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCluster {
    ClusterA,
    ClusterB,
}

impl RegionCluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClusterA => "cluster_a",
            Self::ClusterB => "cluster_b",
        }
    }
}

impl std::str::FromStr for RegionCluster {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cluster_a" | "a" => Ok(Self::ClusterA),
            "cluster_b" | "b" => Ok(Self::ClusterB),
            other => Err(format!("unknown region cluster `{other}` (expected cluster_a|cluster_b)")),
        }
    }
}

impl std::fmt::Display for RegionCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
