//! Player lookups: one joined scan, then history reconstruction.
//!
//! The scan returns one row per (player, history entry), ordered by player id
//! ascending and history sequence descending, so each player's rows arrive
//! together with the current faction first. [`assemble`] folds those rows
//! back into [`Player`] records.
//!
//! Name, game id and owning account narrow the scan in SQL. The faction
//! predicate cannot: joined against history it would match any past
//! affiliation, so it is checked against each player's head entry instead.

use roster_core::{Faction, Player, PlayerFilter};
use rusqlite::Connection;

use crate::{Error, Result, encode::RawPlayerRow};

const PLAYER_SCAN: &str = "
SELECT
  p.id, p.name, p.game_id, p.level, p.is_farm,
  a.id, a.name, a.external_id,
  h.faction_id, f.name
FROM players p
JOIN accounts a                    ON a.id = p.account_id
LEFT JOIN player_faction_history h ON h.player_id = p.id
LEFT JOIN factions f               ON f.id = h.faction_id
";

const PLAYER_ORDER: &str = "ORDER BY p.id ASC, h.seq DESC";

pub fn select_rows(
  conn: &Connection,
  filter: &PlayerFilter,
) -> rusqlite::Result<Vec<RawPlayerRow>> {
  let sql = format!(
    "{PLAYER_SCAN}
     WHERE (?1 IS NULL OR p.name = ?1)
       AND (?2 IS NULL OR p.game_id = ?2)
       AND (?3 IS NULL OR p.account_id = ?3)
     {PLAYER_ORDER}"
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(
      rusqlite::params![filter.name, filter.game_id, filter.user],
      RawPlayerRow::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn select_rows_for(
  conn: &Connection,
  player_id: i64,
) -> rusqlite::Result<Vec<RawPlayerRow>> {
  let sql = format!("{PLAYER_SCAN} WHERE p.id = ?1 {PLAYER_ORDER}");
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(rusqlite::params![player_id], RawPlayerRow::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn history_entry(row: &RawPlayerRow) -> Result<Faction> {
  match (row.faction_id, &row.faction_name) {
    (Some(id), Some(name)) => Ok(Faction { id, name: name.clone() }),
    (Some(id), None) => Err(Error::UnknownFaction(id)),
    (None, _) => Err(Error::MissingHistory(row.player_id)),
  }
}

/// Fold ordered scan rows into players, keeping only those whose current
/// faction is `faction` when one is given.
pub fn assemble(rows: Vec<RawPlayerRow>, faction: Option<i64>) -> Result<Vec<Player>> {
  let keep = |p: &Player| faction.is_none_or(|id| p.is_in_faction(id));

  let mut players = Vec::new();
  let mut current: Option<Player> = None;

  for row in rows {
    let entry = history_entry(&row)?;
    match current.as_mut() {
      Some(p) if p.id == row.player_id => p.faction_history.push(entry),
      _ => {
        if let Some(done) = current.take().filter(keep) {
          players.push(done);
        }
        let user = row.user();
        current = Some(Player {
          id: row.player_id,
          name: row.name,
          game_id: row.game_id,
          level: row.level,
          is_farm: row.is_farm,
          user,
          faction_history: vec![entry],
        });
      }
    }
  }

  if let Some(done) = current.filter(keep) {
    players.push(done);
  }
  Ok(players)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(player_id: i64, name: &str, faction: (i64, &str)) -> RawPlayerRow {
    RawPlayerRow {
      player_id,
      name: name.into(),
      game_id: None,
      level: 0,
      is_farm: false,
      user_id: 1,
      user_name: "NoUser".into(),
      external_id: 0,
      faction_id: Some(faction.0),
      faction_name: Some(faction.1.into()),
    }
  }

  fn history(p: &Player) -> Vec<&str> {
    p.faction_history.iter().map(|f| f.name.as_str()).collect()
  }

  #[test]
  fn groups_rows_per_player_in_scan_order() {
    let rows = vec![
      row(1, "Ann", (3, "Blue")),
      row(1, "Ann", (2, "Red")),
      row(2, "Bo", (2, "Red")),
    ];
    let players = assemble(rows, None).unwrap();

    assert_eq!(players.len(), 2);
    assert_eq!(history(&players[0]), ["Blue", "Red"]);
    assert_eq!(history(&players[1]), ["Red"]);
  }

  #[test]
  fn faction_filter_only_looks_at_head() {
    let rows = vec![
      row(1, "Ann", (3, "Blue")),
      row(1, "Ann", (2, "Red")),
      row(2, "Bo", (2, "Red")),
      row(3, "Cy", (2, "Red")),
      row(3, "Cy", (3, "Blue")),
    ];
    let players = assemble(rows, Some(2)).unwrap();

    let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Bo", "Cy"]);
    assert_eq!(history(&players[1]), ["Red", "Blue"]);
  }

  #[test]
  fn filtered_out_last_player_is_dropped() {
    let rows = vec![row(1, "Ann", (2, "Red")), row(2, "Bo", (3, "Blue"))];
    let players = assemble(rows, Some(2)).unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Ann");
  }

  #[test]
  fn empty_scan_yields_nothing() {
    assert!(assemble(Vec::new(), None).unwrap().is_empty());
  }

  #[test]
  fn player_without_history_is_an_error() {
    let mut r = row(4, "Dee", (1, "NoFaction"));
    r.faction_id = None;
    r.faction_name = None;
    assert!(matches!(assemble(vec![r], None), Err(Error::MissingHistory(4))));
  }

  #[test]
  fn dangling_faction_is_an_error() {
    let mut r = row(4, "Dee", (9, "Gone"));
    r.faction_name = None;
    assert!(matches!(assemble(vec![r], None), Err(Error::UnknownFaction(9))));
  }
}
