use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use margo_core::domain::region::RegionCluster;
use margo_core::pricing::authorization::ApproverRole;
use margo_core::snapshot::{ApprovalRule, ConfigSnapshot, EngineConfig, PricingConfig};

use super::CommandResult;

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    name: String,
    margin_min: Option<Decimal>,
    margin_max: Option<Decimal>,
    approver_role: ApproverRole,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct RulesReport {
    command: &'static str,
    status: &'static str,
    total: usize,
    active: usize,
    evaluation_order: Vec<String>,
    warnings: Vec<String>,
}

/// Parses an approval rule table and validates it the same way the
/// engine will at snapshot construction, reporting the evaluation order
/// and any overlapping bands.
pub fn run(file: &Path) -> CommandResult {
    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "rules",
                "io",
                format!("could not read `{}`: {error}", file.display()),
                1,
            )
        }
    };

    let parsed: RuleFile = match toml::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            return CommandResult::failure(
                "rules",
                "parse",
                format!("could not parse `{}`: {error}", file.display()),
                1,
            )
        }
    };

    let total = parsed.rules.len();
    let rules: Vec<ApprovalRule> = parsed
        .rules
        .into_iter()
        .map(|entry| ApprovalRule {
            name: entry.name,
            margin_min: entry.margin_min,
            margin_max: entry.margin_max,
            approver_role: entry.approver_role,
            is_active: entry.is_active,
        })
        .collect();

    // Region choice is irrelevant here; the snapshot only normalizes
    // and orders the rule table.
    let snapshot = match ConfigSnapshot::new(
        PricingConfig::fallback(RegionCluster::ClusterA),
        EngineConfig::fallback(),
        rules,
    ) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure("rules", "validation", error.to_string(), 1)
        }
    };

    let active = snapshot.approval_rules();
    let mut warnings = Vec::new();
    for pair in active.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let left_max = left.margin_max;
        let right_min = right.margin_min;
        let overlaps = match (left_max, right_min) {
            (Some(max), Some(min)) => min < max,
            (None, _) => true,
            (_, None) => true,
        };
        if overlaps {
            warnings.push(format!(
                "bands `{}` and `{}` overlap; `{}` wins on shared margins",
                left.name, right.name, left.name
            ));
        }
    }

    let report = RulesReport {
        command: "rules",
        status: "ok",
        total,
        active: active.len(),
        evaluation_order: active.iter().map(|rule| rule.name.clone()).collect(),
        warnings,
    };
    let output = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
    CommandResult { exit_code: 0, output }
}
