use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::code::SKILL_SLOTS;
use crate::{PlannerError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingStone {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blessing {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    pub name: String,
    pub skill: usize,
    pub skill_req: u8,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkList {
    pub id: u32,
    pub name: String,
    pub skill_names: Vec<String>,
    pub perks: Vec<Perk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMechanics {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    // References a perk list by its numeric id, not by array position.
    pub perks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub races: Vec<Race>,
    pub standing_stones: Vec<StandingStone>,
    pub blessings: Vec<Blessing>,
    pub perk_lists: Vec<PerkList>,
    pub game_mechanics: Vec<GameMechanics>,
    pub presets: Vec<Preset>,
}

impl GameData {
    pub fn perk_list_by_id(&self, id: u32) -> Option<&PerkList> {
        self.perk_lists.iter().find(|list| list.id == id)
    }

    pub fn perk_list_by_name(&self, name: &str) -> Option<&PerkList> {
        self.perk_lists.iter().find(|list| list.name == name)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for list in &self.perk_lists {
            if list.skill_names.len() != SKILL_SLOTS {
                return Err(PlannerError::Data(format!(
                    "perk list \"{}\" defines {} skill names, expected {}",
                    list.name,
                    list.skill_names.len(),
                    SKILL_SLOTS,
                )));
            }
        }
        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw)
        .map_err(|e| PlannerError::Data(format!("{}: {}", path.display(), e)))
}

/// Load the six catalog files from a data directory. Loading is eager;
/// the codec never reads from disk after construction.
pub fn load_game_data(dir: &Path) -> Result<GameData> {
    Ok(GameData {
        races: load_json(dir, "races.json")?,
        standing_stones: load_json(dir, "standing-stones.json")?,
        blessings: load_json(dir, "blessings.json")?,
        perk_lists: load_json(dir, "perk-lists.json")?,
        game_mechanics: load_json(dir, "game-mechanics.json")?,
        presets: load_json(dir, "presets.json")?,
    })
}

#[derive(Debug)]
pub(crate) struct NameTable {
    name_to_id: HashMap<String, u32>,
    id_to_name: HashMap<u32, String>,
}

impl NameTable {
    fn build<'a, I>(kind: &str, entries: I) -> Result<Self>
    where
        I: Iterator<Item = (u32, &'a str)>,
    {
        let mut name_to_id = HashMap::new();
        let mut id_to_name = HashMap::new();

        for (id, name) in entries {
            if name_to_id.insert(name.to_string(), id).is_some() {
                return Err(PlannerError::Data(format!(
                    "duplicate {} name \"{}\"",
                    kind, name
                )));
            }
            if id_to_name.insert(id, name.to_string()).is_some() {
                return Err(PlannerError::Data(format!("duplicate {} id {}", kind, id)));
            }
        }

        Ok(NameTable {
            name_to_id,
            id_to_name,
        })
    }

    pub(crate) fn id(&self, name: &str) -> Option<u32> {
        self.name_to_id.get(name).copied()
    }

    pub(crate) fn name(&self, id: u32) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }
}

// One bidirectional table per catalog kind. Race, standing stone and
// blessing ids are catalog array positions; perk list and game
// mechanics ids come from the entries themselves.
#[derive(Debug)]
pub(crate) struct DataTables {
    pub races: NameTable,
    pub standing_stones: NameTable,
    pub blessings: NameTable,
    pub perk_lists: NameTable,
    pub mechanics: NameTable,
}

impl DataTables {
    pub(crate) fn build(data: &GameData) -> Result<Self> {
        Ok(DataTables {
            races: NameTable::build(
                "race",
                data.races
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i as u32, r.name.as_str())),
            )?,
            standing_stones: NameTable::build(
                "standing stone",
                data.standing_stones
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (i as u32, s.name.as_str())),
            )?,
            blessings: NameTable::build(
                "blessing",
                data.blessings
                    .iter()
                    .enumerate()
                    .map(|(i, b)| (i as u32, b.name.as_str())),
            )?,
            perk_lists: NameTable::build(
                "perk list",
                data.perk_lists.iter().map(|l| (l.id, l.name.as_str())),
            )?,
            mechanics: NameTable::build(
                "game mechanics",
                data.game_mechanics.iter().map(|m| (m.id, m.name.as_str())),
            )?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IdName {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataMappings {
    pub races: Vec<IdName>,
    pub standing_stones: Vec<IdName>,
    pub blessings: Vec<IdName>,
    pub perk_lists: Vec<IdName>,
    pub game_mechanics: Vec<IdName>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerkInfo {
    pub id: usize,
    pub name: String,
    pub skill: String,
    pub skill_req: u8,
    pub description: String,
}

pub(crate) fn mappings(data: &GameData) -> DataMappings {
    fn indexed<'a, I: Iterator<Item = &'a str>>(names: I) -> Vec<IdName> {
        names
            .enumerate()
            .map(|(i, name)| IdName {
                id: i as u32,
                name: name.to_string(),
            })
            .collect()
    }

    DataMappings {
        races: indexed(data.races.iter().map(|r| r.name.as_str())),
        standing_stones: indexed(data.standing_stones.iter().map(|s| s.name.as_str())),
        blessings: indexed(data.blessings.iter().map(|b| b.name.as_str())),
        perk_lists: data
            .perk_lists
            .iter()
            .map(|l| IdName {
                id: l.id,
                name: l.name.clone(),
            })
            .collect(),
        game_mechanics: data
            .game_mechanics
            .iter()
            .map(|m| IdName {
                id: m.id,
                name: m.name.clone(),
            })
            .collect(),
    }
}

pub(crate) fn perks_for_list(data: &GameData, name: &str) -> Result<Vec<PerkInfo>> {
    let list = data
        .perk_list_by_name(name)
        .ok_or_else(|| PlannerError::Data(format!("unknown perk list \"{}\"", name)))?;

    Ok(list
        .perks
        .iter()
        .enumerate()
        .map(|(index, perk)| PerkInfo {
            id: index,
            name: perk.name.clone(),
            skill: list
                .skill_names
                .get(perk.skill)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            skill_req: perk.skill_req,
            description: perk.description.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_data;

    #[test]
    fn builds_tables_from_sample_data() {
        let data = sample_data();
        let tables = DataTables::build(&data).unwrap();

        assert_eq!(tables.races.id("Nord"), Some(0));
        assert_eq!(tables.races.id("Imperial"), Some(1));
        assert_eq!(tables.races.name(1), Some("Imperial"));
        assert_eq!(tables.perk_lists.name(0), Some("Warrior"));
        assert_eq!(tables.mechanics.id("Standard"), Some(7));
    }

    #[test]
    fn duplicate_race_name_is_rejected() {
        let mut data = sample_data();
        data.races.push(Race {
            name: "Nord".to_string(),
        });

        let err = DataTables::build(&data).unwrap_err();
        assert!(err.to_string().contains("duplicate race name \"Nord\""));
    }

    #[test]
    fn duplicate_perk_list_id_is_rejected() {
        let mut data = sample_data();
        let mut copy = data.perk_lists[0].clone();
        copy.name = "Warrior Copy".to_string();
        data.perk_lists.push(copy);

        let err = DataTables::build(&data).unwrap_err();
        assert!(err.to_string().contains("duplicate perk list id 0"));
    }

    #[test]
    fn wrong_skill_name_count_is_rejected() {
        let mut data = sample_data();
        data.perk_lists[0].skill_names.pop();

        let err = data.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Warrior"));
        assert!(msg.contains("17"));
    }

    #[test]
    fn mappings_cover_all_catalogs() {
        let data = sample_data();
        let mappings = mappings(&data);

        assert_eq!(mappings.races.len(), 2);
        assert_eq!(mappings.races[0].id, 0);
        assert_eq!(mappings.races[0].name, "Nord");
        assert_eq!(mappings.perk_lists.len(), 1);
        assert_eq!(mappings.game_mechanics[0].id, 7);
    }

    #[test]
    fn perks_for_list_resolves_skill_names() {
        let data = sample_data();
        let perks = perks_for_list(&data, "Warrior").unwrap();

        assert_eq!(perks.len(), 20);
        assert_eq!(perks[0].id, 0);
        assert_eq!(perks[0].skill, "Skill 0");
        assert_eq!(perks[3].skill, "Skill 3");
    }

    #[test]
    fn perks_for_list_marks_out_of_range_skill_unknown() {
        let mut data = sample_data();
        data.perk_lists[0].perks[0].skill = 99;

        let perks = perks_for_list(&data, "Warrior").unwrap();
        assert_eq!(perks[0].skill, "Unknown");
    }

    #[test]
    fn perks_for_unknown_list_fails() {
        let data = sample_data();
        let err = perks_for_list(&data, "Bard").unwrap_err();
        assert!(err.to_string().contains("Bard"));
    }

    #[test]
    fn loads_catalogs_from_directory() {
        let dir = std::env::temp_dir().join(format!("planner-data-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let data = sample_data();
        fs::write(
            dir.join("races.json"),
            serde_json::to_string(&data.races).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join("standing-stones.json"),
            serde_json::to_string(&data.standing_stones).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join("blessings.json"),
            serde_json::to_string(&data.blessings).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join("perk-lists.json"),
            serde_json::to_string(&data.perk_lists).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join("game-mechanics.json"),
            serde_json::to_string(&data.game_mechanics).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join("presets.json"),
            serde_json::to_string(&data.presets).unwrap(),
        )
        .unwrap();

        let loaded = load_game_data(&dir).unwrap();
        assert_eq!(loaded.races.len(), data.races.len());
        assert_eq!(loaded.perk_lists[0].name, "Warrior");
        assert_eq!(loaded.perk_lists[0].perks.len(), 20);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_catalog_file_is_an_io_error() {
        let dir = std::env::temp_dir().join("planner-data-missing");
        let err = load_game_data(&dir).unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }

    #[test]
    fn perk_list_json_uses_camel_case_keys() {
        let raw = r#"{
            "id": 3,
            "name": "Mage",
            "skillNames": ["A","B","C","D","E","F","G","H","I","J","K","L","M","N","O","P","Q","R"],
            "perks": [
                {"name": "Novice", "skill": 2, "skillReq": 15, "description": "Entry perk."}
            ]
        }"#;

        let list: PerkList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.skill_names.len(), 18);
        assert_eq!(list.perks[0].skill_req, 15);
    }
}
