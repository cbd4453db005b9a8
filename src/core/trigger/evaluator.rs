//=========================================================================
// Outcome Trigger Evaluator
//=========================================================================
//
// Pure decision function: does this transition configuration apply to the
// current outcome?
//
// Called repeatedly as outcomes accumulate across a multi-feature stream,
// so evaluation never mutates anything and never fails; a missing pending
// map is simply "no".
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::outcome::{FeatureCategory, OutcomeContext};
use crate::core::bridge::PortalCatalog;

//=== TriggerKind =========================================================

/// How a transition decides whether to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Qualifying feature with a pending entry of the configured category.
    #[default]
    ByCategory,
    /// A pending feature's name is on the allow-list.
    ByName,
    /// A portal is attached or declared for the configured game.
    ByPortalProbe,
}

//=== TriggerConfig =======================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub kind: TriggerKind,
    /// Required for [`TriggerKind::ByCategory`].
    pub category: Option<FeatureCategory>,
    /// Allow-list for [`TriggerKind::ByName`].
    pub names: Vec<String>,
    /// Game looked up in the portal catalog for [`TriggerKind::ByPortalProbe`].
    pub game_id: String,
}

impl TriggerConfig {
    pub fn by_category(category: FeatureCategory) -> Self {
        Self {
            kind: TriggerKind::ByCategory,
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn by_name<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            kind: TriggerKind::ByName,
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn by_portal_probe(game_id: impl Into<String>) -> Self {
        Self {
            kind: TriggerKind::ByPortalProbe,
            game_id: game_id.into(),
            ..Self::default()
        }
    }
}

//=== OutcomeTriggerEvaluator =============================================

/// Evaluates one trigger configuration against outcomes.
#[derive(Debug, Clone)]
pub struct OutcomeTriggerEvaluator {
    config: TriggerConfig,
}

impl OutcomeTriggerEvaluator {
    pub fn new(config: TriggerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn should_fire(&self, outcome: &dyn OutcomeContext, portal: &dyn PortalCatalog) -> bool {
        should_fire(outcome, portal, &self.config)
    }
}

/// Decides whether `config` applies to `outcome`.
pub fn should_fire(
    outcome: &dyn OutcomeContext,
    portal: &dyn PortalCatalog,
    config: &TriggerConfig,
) -> bool {
    match config.kind {
        TriggerKind::ByCategory => fires_by_category(outcome, config.category),
        TriggerKind::ByName => fires_by_name(outcome, &config.names),
        TriggerKind::ByPortalProbe => fires_by_portal(portal, &config.game_id),
    }
}

//--- Policies ------------------------------------------------------------

fn fires_by_category(outcome: &dyn OutcomeContext, category: Option<FeatureCategory>) -> bool {
    let Some(category) = category else {
        return false;
    };
    if !outcome.is_qualifying_feature() {
        return false;
    }
    outcome
        .pending_features()
        .is_some_and(|pending| !pending.get(category).is_empty())
}

fn fires_by_name(outcome: &dyn OutcomeContext, allowed: &[String]) -> bool {
    let Some(pending) = outcome.pending_features() else {
        return false;
    };
    pending
        .names()
        .any(|name| allowed.iter().any(|allowed| allowed == name))
}

fn fires_by_portal(portal: &dyn PortalCatalog, game_id: &str) -> bool {
    portal.portal_attached() || portal.portal_prefab_path(game_id).is_some()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trigger::{OutcomeSnapshot, PendingFeatures, StaticPortalCatalog};

    fn no_portal() -> StaticPortalCatalog {
        StaticPortalCatalog::new()
    }

    //--- ByCategory -------------------------------------------------------

    #[test]
    fn category_fires_for_qualifying_feature_with_matching_entry() {
        let config = TriggerConfig::by_category(FeatureCategory::Gifting);
        let outcome = OutcomeSnapshot::named("spin")
            .feature()
            .with_pending(FeatureCategory::Gifting, "free_spins");

        assert!(should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn category_fires_for_nested_qualifying_layer() {
        let config = TriggerConfig::by_category(FeatureCategory::Challenge);
        let outcome = OutcomeSnapshot::named("spin")
            .with_layer(OutcomeSnapshot::new().feature())
            .with_pending(FeatureCategory::Challenge, "pick");

        assert!(should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn category_requires_qualifying_feature() {
        let config = TriggerConfig::by_category(FeatureCategory::Gifting);
        let outcome = OutcomeSnapshot::named("spin").with_pending(FeatureCategory::Gifting, "fs");

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn category_requires_matching_category() {
        let config = TriggerConfig::by_category(FeatureCategory::Scatter);
        let outcome = OutcomeSnapshot::new()
            .feature()
            .with_pending(FeatureCategory::Gifting, "free_spins");

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn category_without_configured_category_never_fires() {
        let config = TriggerConfig {
            kind: TriggerKind::ByCategory,
            ..TriggerConfig::default()
        };
        let outcome = OutcomeSnapshot::new()
            .feature()
            .with_pending(FeatureCategory::Gifting, "free_spins");

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    //--- ByName -----------------------------------------------------------

    #[test]
    fn name_fires_when_pending_name_allowed() {
        let config = TriggerConfig::by_name(["dragon_bonus", "pick_bonus"]);
        let outcome = OutcomeSnapshot::new().with_pending(FeatureCategory::Challenge, "pick_bonus");

        assert!(should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn name_is_false_for_absent_pending_map() {
        let config = TriggerConfig::by_name(["dragon_bonus"]);
        let outcome = OutcomeSnapshot::named("dragon_bonus");

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn name_is_false_for_empty_pending_map() {
        let config = TriggerConfig::by_name(["dragon_bonus"]);
        let outcome = OutcomeSnapshot {
            pending: Some(PendingFeatures::new()),
            ..OutcomeSnapshot::default()
        };

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn category_is_false_for_absent_pending_map() {
        let config = TriggerConfig::by_category(FeatureCategory::Gifting);
        let outcome = OutcomeSnapshot::named("free_spins").feature();

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn category_is_false_for_empty_pending_map() {
        let config = TriggerConfig::by_category(FeatureCategory::Gifting);
        let outcome = OutcomeSnapshot {
            pending: Some(PendingFeatures::new()),
            ..OutcomeSnapshot::named("free_spins").feature()
        };

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    #[test]
    fn name_ignores_unlisted_names() {
        let config = TriggerConfig::by_name(["dragon_bonus"]);
        let outcome = OutcomeSnapshot::new().with_pending(FeatureCategory::Gifting, "free_spins");

        assert!(!should_fire(&outcome, &no_portal(), &config));
    }

    //--- ByPortalProbe ----------------------------------------------------

    #[test]
    fn portal_fires_when_attached() {
        let config = TriggerConfig::by_portal_probe("dragon");
        let portal = StaticPortalCatalog::new().with_attached(true);

        assert!(should_fire(&OutcomeSnapshot::new(), &portal, &config));
    }

    #[test]
    fn portal_fires_when_catalog_declares_prefab() {
        let config = TriggerConfig::by_portal_probe("dragon");
        let portal = StaticPortalCatalog::new().with_prefab("dragon", "portals/dragon");

        assert!(should_fire(&OutcomeSnapshot::new(), &portal, &config));
    }

    #[test]
    fn portal_is_false_without_object_or_declaration() {
        let config = TriggerConfig::by_portal_probe("dragon");
        let portal = StaticPortalCatalog::new().with_prefab("tiger", "portals/tiger");

        assert!(!should_fire(&OutcomeSnapshot::new(), &portal, &config));
    }

    //--- Purity -----------------------------------------------------------

    #[test]
    fn repeated_evaluation_is_stable() {
        let evaluator = OutcomeTriggerEvaluator::new(TriggerConfig::by_category(
            FeatureCategory::Gifting,
        ));
        let outcome = OutcomeSnapshot::new()
            .feature()
            .with_pending(FeatureCategory::Gifting, "free_spins");
        let portal = no_portal();

        let first = evaluator.should_fire(&outcome, &portal);
        for _ in 0..10 {
            assert_eq!(evaluator.should_fire(&outcome, &portal), first);
        }
        assert!(first);
    }
}
