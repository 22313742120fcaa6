//! Role-based game start: initial stats, inventory, and relationships.

use std::collections::{BTreeMap, BTreeSet};

use advent_types::{
    GameState, InventoryItem, ItemKind, NpcId, NpcRelationship, PlayerRole, PlayerStats,
    STARTING_DAY,
};

/// Reasons a new game cannot be created.
#[derive(Debug, thiserror::Error)]
pub enum NewGameError {
    /// The player name was empty or whitespace-only.
    #[error("player name must not be empty")]
    EmptyPlayerName,
}

/// Build the starting state for a new game.
///
/// Validates the player name (an empty name is rejected with no state
/// created), then assembles role-specific stats and inventory plus the
/// three village NPC relationships.
pub fn new_game(player_name: &str, role: PlayerRole) -> Result<GameState, NewGameError> {
    let player_name = player_name.trim();
    if player_name.is_empty() {
        return Err(NewGameError::EmptyPlayerName);
    }

    Ok(GameState {
        current_day: STARTING_DAY,
        player_role: role,
        player_name: String::from(player_name),
        location: String::from("village_center"),
        stats: starting_stats(role),
        inventory: starting_inventory(role),
        flags: BTreeMap::new(),
        npc_relationships: starting_relationships(),
    })
}

/// Role-specific starting stats.
///
/// The hero starts strong and liked; the merchant rich; the coward
/// sturdy; the traitor clever but distrusted; the sage learned but
/// poor; the mercenary strong and well paid.
fn starting_stats(role: PlayerRole) -> PlayerStats {
    let base = PlayerStats {
        level: 1,
        health: 100,
        strength: 20,
        knowledge: 20,
        reputation: 0,
        wealth: 100,
        allies: BTreeSet::new(),
    };

    match role {
        PlayerRole::Hero => PlayerStats {
            strength: 35,
            reputation: 10,
            ..base
        },
        PlayerRole::Merchant => PlayerStats {
            wealth: 300,
            knowledge: 30,
            ..base
        },
        PlayerRole::Coward => PlayerStats {
            strength: 10,
            ..base
        },
        PlayerRole::Traitor => PlayerStats {
            knowledge: 35,
            reputation: -10,
            ..base
        },
        PlayerRole::Sage => PlayerStats {
            knowledge: 40,
            wealth: 50,
            ..base
        },
        PlayerRole::Mercenary => PlayerStats {
            strength: 40,
            wealth: 150,
            ..base
        },
        PlayerRole::Villager => base,
    }
}

/// Role-specific starting inventory. Everyone carries bread and water.
fn starting_inventory(role: PlayerRole) -> Vec<InventoryItem> {
    let mut items = vec![
        item("bread", "パン", ItemKind::Food, 5),
        item("water", "水", ItemKind::Food, 3),
    ];

    match role {
        PlayerRole::Hero => items.push(item("sword", "鉄の剣", ItemKind::Weapon, 50)),
        PlayerRole::Merchant => items.push(item("ledger", "商売帳", ItemKind::Item, 20)),
        PlayerRole::Coward => items.push(item("herbs", "薬草", ItemKind::Item, 15)),
        PlayerRole::Sage => items.push(item("tome", "古い書物", ItemKind::Item, 30)),
        PlayerRole::Traitor | PlayerRole::Villager | PlayerRole::Mercenary => {}
    }

    items
}

/// The three village NPCs, with their starting trust levels.
fn starting_relationships() -> BTreeMap<NpcId, NpcRelationship> {
    BTreeMap::from([
        (NpcId::ElderMorgan, NpcRelationship::with_trust(50)),
        (NpcId::MerchantGrom, NpcRelationship::with_trust(40)),
        (NpcId::ElaraSage, NpcRelationship::with_trust(30)),
    ])
}

fn item(id: &str, name: &str, kind: ItemKind, value: i64) -> InventoryItem {
    InventoryItem {
        id: String::from(id),
        name: String::from(name),
        kind,
        value,
    }
}
