//! Root resolution: which node of a tree stands for "the root" of a branch.
//!
//! Some extensions redefine what tier 1 means without renumbering the tree.
//! The synchronizer never special-cases them; it asks the active
//! [`RootResolutionPolicy`], chosen once at startup from a
//! [`CompatibilityProbe`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::model::{Branch, TierLimits, TroopNode, TroopTree};

pub trait RootResolutionPolicy: Send + Sync {
    /// Translate a branch root request into a concrete node of `tree`.
    fn resolve_root<'t>(
        &self,
        tree: &'t TroopTree,
        default_root: Option<&'t TroopNode>,
        want_elite: bool,
    ) -> Option<&'t TroopNode>;

    fn name(&self) -> &'static str;

    /// Resolve using the tree's own default root for the branch.
    fn root_for<'t>(&self, tree: &'t TroopTree, branch: Branch) -> Option<&'t TroopNode> {
        self.resolve_root(tree, tree.default_root(branch), branch.is_elite())
    }
}

/// Returns the default root unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRootPolicy;

impl RootResolutionPolicy for DefaultRootPolicy {
    fn resolve_root<'t>(
        &self,
        _tree: &'t TroopTree,
        default_root: Option<&'t TroopNode>,
        _want_elite: bool,
    ) -> Option<&'t TroopNode> {
        default_root
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

/// Treats the first node at a fixed tier on the branch as its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierOverridePolicy {
    pub basic_target: u8,
    pub elite_target: u8,
}

impl Default for TierOverridePolicy {
    fn default() -> Self {
        Self {
            basic_target: 1,
            elite_target: 2,
        }
    }
}

impl TierOverridePolicy {
    pub fn target_for(&self, want_elite: bool) -> u8 {
        if want_elite {
            self.elite_target
        } else {
            self.basic_target
        }
    }
}

impl RootResolutionPolicy for TierOverridePolicy {
    fn resolve_root<'t>(
        &self,
        tree: &'t TroopTree,
        default_root: Option<&'t TroopNode>,
        want_elite: bool,
    ) -> Option<&'t TroopNode> {
        let branch = if want_elite { Branch::Elite } else { Branch::Basic };
        let target = self.target_for(want_elite);
        tree.breadth_first()
            .into_iter()
            .find(|n| n.branch == branch && n.tier == target)
            .or(default_root)
    }

    fn name(&self) -> &'static str {
        "tier_override"
    }
}

/// Structural reinterpretation reported by the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StructuralOverride {
    #[default]
    None,
    RemappedTiers,
}

string_enum!(StructuralOverride {
    None => "none",
    RemappedTiers => "remapped_tiers",
});

/// What the host knows about installed extensions. The engine only consumes
/// the answers.
pub trait CompatibilityProbe {
    fn structural_override(&self) -> StructuralOverride;

    /// Whether an extension raises every branch's maximum tier by one.
    fn extends_max_tier(&self) -> bool;
}

/// Fixed probe answers, for hosts that detect extensions up front and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticProbe {
    #[serde(default)]
    pub structural_override: StructuralOverride,
    #[serde(default)]
    pub extended_tiers: bool,
}

impl CompatibilityProbe for StaticProbe {
    fn structural_override(&self) -> StructuralOverride {
        self.structural_override
    }

    fn extends_max_tier(&self) -> bool {
        self.extended_tiers
    }
}

/// Pick the root policy for this session.
pub fn select_root_policy(
    probe: &dyn CompatibilityProbe,
    config: &EngineConfig,
) -> Box<dyn RootResolutionPolicy> {
    let policy: Box<dyn RootResolutionPolicy> = match probe.structural_override() {
        StructuralOverride::None => Box::new(DefaultRootPolicy),
        StructuralOverride::RemappedTiers => Box::new(TierOverridePolicy {
            basic_target: config.override_basic_root_tier,
            elite_target: config.override_elite_root_tier,
        }),
    };
    info!(
        policy = policy.name(),
        probe = %probe.structural_override(),
        "root resolution policy selected"
    );
    policy
}

/// Tier limits for new trees: explicit config wins, otherwise the vanilla
/// limits raised when the probe reports the extended-tier extension.
pub fn select_tier_limits(probe: &dyn CompatibilityProbe, config: &EngineConfig) -> TierLimits {
    config
        .tier_limits
        .unwrap_or_else(|| TierLimits::standard(probe.extends_max_tier()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root tier 1 basic with an elite root at tier 2 under a tier-1 basic.
    fn tree() -> TroopTree {
        let mut t = TroopTree::default();
        t.insert_root("peasant", "Peasant", 1, Branch::Basic).unwrap();
        t.insert_child("peasant", "levy", "Levy", Branch::Basic).unwrap();
        t.insert_child("peasant", "squire", "Squire", Branch::Elite).unwrap();
        t.insert_child("levy", "spearman", "Spearman", Branch::Basic).unwrap();
        t
    }

    #[test]
    fn default_policy_passes_through() {
        let t = tree();
        let root = DefaultRootPolicy.root_for(&t, Branch::Basic).unwrap();
        assert_eq!(root.id.as_str(), "peasant");
        assert!(DefaultRootPolicy.resolve_root(&t, None, false).is_none());
    }

    #[test]
    fn override_finds_target_tier_on_branch() {
        let t = tree();
        let policy = TierOverridePolicy {
            basic_target: 2,
            elite_target: 2,
        };
        let basic = policy.root_for(&t, Branch::Basic).unwrap();
        assert_eq!(basic.id.as_str(), "levy");
        let elite = policy.root_for(&t, Branch::Elite).unwrap();
        assert_eq!(elite.id.as_str(), "squire");
    }

    #[test]
    fn override_without_match_returns_default_unchanged() {
        let t = tree();
        let policy = TierOverridePolicy {
            basic_target: 5,
            elite_target: 5,
        };
        let default = t.node("peasant");
        let resolved = policy.resolve_root(&t, default, false);
        assert_eq!(resolved.map(|n| n.id.as_str()), Some("peasant"));
        assert!(policy.resolve_root(&t, None, true).is_none());
    }

    #[test]
    fn probe_selects_policy() {
        let config = EngineConfig::default();
        let plain = select_root_policy(&StaticProbe::default(), &config);
        assert_eq!(plain.name(), "default");

        let probe = StaticProbe {
            structural_override: StructuralOverride::RemappedTiers,
            extended_tiers: true,
        };
        assert_eq!(select_root_policy(&probe, &config).name(), "tier_override");
        assert_eq!(select_tier_limits(&probe, &config), TierLimits::standard(true));
    }
}
