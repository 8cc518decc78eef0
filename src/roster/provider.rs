//! Roster provider trait and static implementation

use crate::config::RosterSettings;
use crate::error::{LedgerError, Result};
use crate::ledger::GameLedger;
use crate::types::{Deck, Player, PlayerId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for supplying the fixed roster consumed by submission validation
pub trait RosterProvider: Send + Sync {
    /// All rostered players
    fn list_players(&self) -> Result<Vec<Player>>;

    /// Look up a single player by id
    fn player(&self, player_id: &str) -> Result<Option<Player>>;

    /// Decks available to the given player; empty for an unknown player
    fn list_decks(&self, player_id: &str) -> Result<Vec<Deck>>;
}

/// Static in-memory roster.
///
/// Any rostered player may pilot any deck in the catalog, so `list_decks`
/// returns the full catalog for known players.
#[derive(Debug, Default)]
pub struct StaticRosterProvider {
    players: RwLock<HashMap<PlayerId, Player>>,
    decks: RwLock<Vec<Deck>>,
}

impl StaticRosterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from configuration
    pub fn from_settings(settings: &RosterSettings) -> Result<Self> {
        let roster = Self::new();
        for player in &settings.players {
            roster.add_player(player.clone())?;
        }
        for deck in &settings.decks {
            roster.add_deck(deck.clone())?;
        }
        Ok(roster)
    }

    /// Register a player; display names must be unique across the roster
    pub fn add_player(&self, player: Player) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| Self::lock_error("players"))?;
        if players.contains_key(&player.id) {
            return Err(LedgerError::validation(format!(
                "player id already rostered: {}",
                player.id
            ))
            .into());
        }
        if players.values().any(|existing| existing.name == player.name) {
            return Err(LedgerError::validation(format!(
                "player name already rostered: {}",
                player.name
            ))
            .into());
        }
        players.insert(player.id.clone(), player);
        Ok(())
    }

    /// Register a deck in the shared catalog
    pub fn add_deck(&self, deck: Deck) -> Result<()> {
        let mut decks = self.decks.write().map_err(|_| Self::lock_error("decks"))?;
        if decks.iter().any(|existing| existing.id == deck.id) {
            return Err(
                LedgerError::validation(format!("deck id already rostered: {}", deck.id)).into(),
            );
        }
        decks.push(deck);
        Ok(())
    }

    /// Remove a player, refusing if any ledger record references them.
    ///
    /// Ledger entries must never point at a nonexistent player, so removal
    /// of a referenced player is rejected rather than cascaded.
    pub fn remove_player(&self, player_id: &str, ledger: &dyn GameLedger) -> Result<bool> {
        if !ledger.by_player(player_id)?.is_empty() {
            return Err(LedgerError::validation(format!(
                "player {} is referenced by the ledger and cannot be removed",
                player_id
            ))
            .into());
        }
        let mut players = self
            .players
            .write()
            .map_err(|_| Self::lock_error("players"))?;
        Ok(players.remove(player_id).is_some())
    }

    fn lock_error(what: &str) -> LedgerError {
        LedgerError::InternalError {
            message: format!("failed to acquire roster {} lock", what),
        }
    }
}

impl RosterProvider for StaticRosterProvider {
    fn list_players(&self) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| Self::lock_error("players"))?;
        let mut list: Vec<Player> = players.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }

    fn player(&self, player_id: &str) -> Result<Option<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| Self::lock_error("players"))?;
        Ok(players.get(player_id).cloned())
    }

    fn list_decks(&self, player_id: &str) -> Result<Vec<Deck>> {
        if self.player(player_id)?.is_none() {
            return Ok(Vec::new());
        }
        let decks = self.decks.read().map_err(|_| Self::lock_error("decks"))?;
        Ok(decks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryGameLedger;
    use crate::types::{GameDraft, Participant};
    use chrono::{NaiveDate, Utc};

    fn player(id: &str, name: &str) -> Player {
        Player {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn deck(id: &str, name: &str) -> Deck {
        Deck {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_add_and_list_players() {
        let roster = StaticRosterProvider::new();
        roster.add_player(player("p2", "Bob")).unwrap();
        roster.add_player(player("p1", "Alice")).unwrap();

        let players = roster.list_players().unwrap();
        assert_eq!(players.len(), 2);
        // Deterministic id order
        assert_eq!(players[0].id, "p1");
        assert_eq!(players[1].id, "p2");
    }

    #[test]
    fn test_duplicate_names_and_ids_rejected() {
        let roster = StaticRosterProvider::new();
        roster.add_player(player("p1", "Alice")).unwrap();
        assert!(roster.add_player(player("p1", "Other")).is_err());
        assert!(roster.add_player(player("p9", "Alice")).is_err());
    }

    #[test]
    fn test_deck_catalog_shared_across_players() {
        let roster = StaticRosterProvider::new();
        roster.add_player(player("p1", "Alice")).unwrap();
        roster.add_deck(deck("d1", "Dragons")).unwrap();
        roster.add_deck(deck("d2", "Elves")).unwrap();

        assert_eq!(roster.list_decks("p1").unwrap().len(), 2);
        // Unknown player yields an empty set, not an error
        assert!(roster.list_decks("ghost").unwrap().is_empty());
    }

    #[test]
    fn test_remove_player_guarded_by_ledger() {
        let roster = StaticRosterProvider::new();
        roster.add_player(player("p1", "Alice")).unwrap();
        roster.add_player(player("p2", "Bob")).unwrap();

        let ledger = InMemoryGameLedger::new();
        ledger
            .append(GameDraft {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                submitted_at: Utc::now(),
                participants: vec![
                    Participant {
                        player_id: "p1".to_string(),
                        deck_id: "d1".to_string(),
                        player_delta: 16.0,
                        deck_delta: 16.0,
                    },
                    Participant {
                        player_id: "p2".to_string(),
                        deck_id: "d2".to_string(),
                        player_delta: -16.0,
                        deck_delta: -16.0,
                    },
                ],
                winner_id: "p1".to_string(),
            })
            .unwrap();

        // p1 is referenced: removal rejected
        assert!(roster.remove_player("p1", &ledger).is_err());
        assert!(roster.player("p1").unwrap().is_some());

        // A never-referenced player can be removed
        roster.add_player(player("p3", "Carol")).unwrap();
        assert!(roster.remove_player("p3", &ledger).unwrap());
        assert!(!roster.remove_player("p3", &ledger).unwrap());
    }
}
