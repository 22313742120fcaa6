//! Routing actions to specialized NPC narrators.
//!
//! Ordered substring matching against per-NPC keyword sets: politics
//! and prophecy belong to the elder, trade and equipment to the
//! merchant, magic and divination to the sage. The first category with
//! a hit wins; an action matching nothing stays with the default
//! narrator.

use advent_types::NpcId;

/// Decides which NPC, if any, owns a turn's narrative.
#[derive(Debug, Clone, Default)]
pub struct DelegationRouter;

impl DelegationRouter {
    /// Create a router with the stock keyword sets.
    pub const fn new() -> Self {
        Self
    }

    /// Route an action to an NPC, or `None` for the default narrator.
    pub fn route(&self, action: &str) -> Option<NpcId> {
        let lower = action.to_lowercase();

        let categories: [(NpcId, &[&str]); 3] = [
            (
                NpcId::ElderMorgan,
                &[
                    "村長", "長老", "予言", "布告", "政治", "elder", "morgan", "prophecy",
                    "politic", "decree",
                ],
            ),
            (
                NpcId::MerchantGrom,
                &[
                    "商売",
                    "武器",
                    "装備",
                    "買い",
                    "取引",
                    "鍛冶",
                    "グロム",
                    "trade",
                    "shop",
                    "buy",
                    "weapon",
                    "equipment",
                    "grom",
                ],
            ),
            (
                NpcId::ElaraSage,
                &[
                    "魔法",
                    "占い",
                    "賢者",
                    "エララ",
                    "魔術",
                    "magic",
                    "divination",
                    "sage",
                    "elara",
                ],
            ),
        ];

        categories
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
            .map(|(npc, _)| *npc)
    }
}
