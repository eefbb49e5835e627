use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::snapshot::ApprovalRule;

/// Closed, ranked set of approver roles. Ordering is authority order:
/// `SalesRep` is the lowest rank (self-approval) and `Admin` the highest.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    SalesRep,
    Coordinator,
    Manager,
    Director,
    Admin,
}

impl ApproverRole {
    pub fn rank(&self) -> u8 {
        match self {
            Self::SalesRep => 1,
            Self::Coordinator => 2,
            Self::Manager => 3,
            Self::Director => 4,
            Self::Admin => 5,
        }
    }

    pub fn is_self_approval(&self) -> bool {
        matches!(self, Self::SalesRep)
    }
}

impl std::fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SalesRep => "sales rep",
            Self::Coordinator => "coordinator",
            Self::Manager => "manager",
            Self::Director => "director",
            Self::Admin => "admin",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for ApproverRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sales_rep" | "sales rep" => Ok(Self::SalesRep),
            "coordinator" => Ok(Self::Coordinator),
            "manager" => Ok(Self::Manager),
            "director" => Ok(Self::Director),
            "admin" => Ok(Self::Admin),
            other => Err(format!(
                "unknown approver role `{other}` (expected sales_rep|coordinator|manager|director|admin)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationVerdict {
    pub is_authorized: bool,
    pub required_approver: Option<ApproverRole>,
    pub matched_rule: Option<String>,
}

impl AuthorizationVerdict {
    fn authorized(matched_rule: Option<String>) -> Self {
        Self { is_authorized: true, required_approver: None, matched_rule }
    }

    fn escalate(role: ApproverRole, matched_rule: Option<String>) -> Self {
        Self { is_authorized: false, required_approver: Some(role), matched_rule }
    }
}

/// Resolves a margin percentage against the dynamic rule table.
///
/// The global threshold check always runs first and short-circuits rule
/// matching. Below it, the first active rule (ascending `margin_min`,
/// half-open band) wins; overlapping bands therefore resolve
/// deterministically to the lower `margin_min`. A matched rule naming
/// the lowest rank is an explicit business carve-out that re-authorizes
/// the band. No match falls through to the static ladder.
pub fn resolve(
    margin_percent: Decimal,
    approval_rules: &[ApprovalRule],
    authorized_threshold: Decimal,
) -> AuthorizationVerdict {
    if margin_percent >= authorized_threshold {
        return AuthorizationVerdict::authorized(None);
    }

    let mut active: Vec<&ApprovalRule> =
        approval_rules.iter().filter(|rule| rule.is_active).collect();
    active.sort_by(|left, right| match (left.margin_min, right.margin_min) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    });

    for rule in active {
        if !rule.contains(margin_percent) {
            continue;
        }

        if rule.approver_role.is_self_approval() {
            return AuthorizationVerdict::authorized(Some(rule.name.clone()));
        }

        return AuthorizationVerdict::escalate(rule.approver_role, Some(rule.name.clone()));
    }

    resolve_with_ladder(margin_percent, authorized_threshold)
}

/// Static fallback ladder, used when no rule table exists at all and
/// when the table yields no match: both cases funnel here.
pub fn resolve_with_ladder(
    margin_percent: Decimal,
    authorized_threshold: Decimal,
) -> AuthorizationVerdict {
    if margin_percent >= authorized_threshold {
        return AuthorizationVerdict::authorized(None);
    }
    if margin_percent >= authorized_threshold - Decimal::from(5) {
        return AuthorizationVerdict::escalate(ApproverRole::Coordinator, None);
    }
    if margin_percent >= authorized_threshold - Decimal::from(10) {
        return AuthorizationVerdict::escalate(ApproverRole::Manager, None);
    }

    AuthorizationVerdict::escalate(ApproverRole::Director, None)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::snapshot::ApprovalRule;

    use super::{resolve, resolve_with_ladder, ApproverRole};

    fn rule(name: &str, min: i64, max: i64, role: ApproverRole) -> ApprovalRule {
        ApprovalRule {
            name: name.to_string(),
            margin_min: Some(Decimal::from(min)),
            margin_max: Some(Decimal::from(max)),
            approver_role: role,
            is_active: true,
        }
    }

    #[test]
    fn threshold_short_circuits_rule_matching() {
        let rules = vec![rule("trap", -100, 100, ApproverRole::Director)];
        let verdict = resolve(Decimal::from(12), &rules, Decimal::from(10));
        assert!(verdict.is_authorized);
        assert!(verdict.matched_rule.is_none());
    }

    #[test]
    fn first_matching_band_wins_on_overlap() {
        let rules = vec![
            rule("wide", 0, 20, ApproverRole::Director),
            rule("narrow", 2, 8, ApproverRole::Coordinator),
        ];
        let verdict = resolve(Decimal::from(5), &rules, Decimal::from(25));
        assert_eq!(verdict.matched_rule.as_deref(), Some("wide"));
        assert_eq!(verdict.required_approver, Some(ApproverRole::Director));
    }

    #[test]
    fn band_bounds_are_half_open() {
        let rules = vec![
            rule("low", 0, 10, ApproverRole::Coordinator),
            rule("high", 10, 20, ApproverRole::Manager),
        ];

        let at_min = resolve(Decimal::from(10), &rules, Decimal::from(30));
        assert_eq!(at_min.matched_rule.as_deref(), Some("high"));

        let below_max = resolve(Decimal::new(999, 2), &rules, Decimal::from(30));
        assert_eq!(below_max.matched_rule.as_deref(), Some("low"));
    }

    #[test]
    fn sales_rep_band_reauthorizes_below_the_threshold() {
        let rules = vec![rule("rep-floor", 3, 10, ApproverRole::SalesRep)];
        let verdict = resolve(Decimal::from(4), &rules, Decimal::from(10));
        assert!(verdict.is_authorized);
        assert!(verdict.required_approver.is_none());
        assert_eq!(verdict.matched_rule.as_deref(), Some("rep-floor"));
    }

    #[test]
    fn inactive_rules_are_ignored() {
        let mut inactive = rule("off", 0, 10, ApproverRole::Director);
        inactive.is_active = false;

        let verdict = resolve(Decimal::from(5), &[inactive], Decimal::from(10));
        // Falls through to the ladder: 5 >= 10 - 5.
        assert_eq!(verdict.required_approver, Some(ApproverRole::Coordinator));
        assert!(verdict.matched_rule.is_none());
    }

    #[test]
    fn no_match_falls_back_to_static_ladder() {
        let rules = vec![rule("far-away", 50, 60, ApproverRole::Coordinator)];
        let verdict = resolve(Decimal::from(-20), &rules, Decimal::ZERO);
        assert_eq!(verdict.required_approver, Some(ApproverRole::Director));
    }

    #[test]
    fn ladder_steps_match_the_legacy_bands() {
        let threshold = Decimal::ZERO;
        assert!(resolve_with_ladder(Decimal::ZERO, threshold).is_authorized);
        assert_eq!(
            resolve_with_ladder(Decimal::from(-5), threshold).required_approver,
            Some(ApproverRole::Coordinator)
        );
        assert_eq!(
            resolve_with_ladder(Decimal::new(-501, 2), threshold).required_approver,
            Some(ApproverRole::Manager)
        );
        assert_eq!(
            resolve_with_ladder(Decimal::from(-11), threshold).required_approver,
            Some(ApproverRole::Director)
        );
    }

    #[test]
    fn resolve_is_deterministic_for_identical_inputs() {
        let rules = vec![
            rule("a", -10, 0, ApproverRole::Manager),
            rule("b", 0, 10, ApproverRole::Coordinator),
        ];
        let first = resolve(Decimal::from(-3), &rules, Decimal::from(10));
        let second = resolve(Decimal::from(-3), &rules, Decimal::from(10));
        assert_eq!(first, second);
    }
}
