use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::bits;
use crate::data::{DataTables, GameData, NameTable};
use crate::{PlannerError, Result};

// Fixed build-code layout, shared by both directions. Offsets 2 and 4
// are reserved list markers the reference tool writes but never reads.
const OFF_VERSION: usize = 0;
const OFF_PERK_LIST_ID: usize = 1;
const OFF_MECHANICS_ID: usize = 3;
const OFF_LEVEL: usize = 5;
const OFF_HEALTH: usize = 6;
const OFF_MAGICKA: usize = 7;
const OFF_STAMINA: usize = 8;
const OFF_SKILLS: usize = 9;
pub(crate) const SKILL_SLOTS: usize = 18;
const OFF_OGHMA: usize = OFF_SKILLS + SKILL_SLOTS;
const OFF_RACE: usize = 28;
const OFF_STONE: usize = 29;
const OFF_BLESSING: usize = 30;
const OFF_PERKS: usize = 31;

const CURRENT_VERSION: u8 = 2;
const UNKNOWN_NAME: &str = "Unknown";

// Version 2 appends this display-only row after the 18 real skills; the
// encoder reconstructs skill bytes from the named skills alone.
const LEVEL_ROW: &str = "Level";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OghmaChoice {
    None,
    Health,
    Magicka,
    Stamina,
}

impl OghmaChoice {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => OghmaChoice::Health,
            2 => OghmaChoice::Magicka,
            3 => OghmaChoice::Stamina,
            _ => OghmaChoice::None,
        }
    }

    fn index(self) -> u8 {
        match self {
            OghmaChoice::None => 0,
            OghmaChoice::Health => 1,
            OghmaChoice::Magicka => 2,
            OghmaChoice::Stamina => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmsIncreases {
    pub health: u8,
    pub magicka: u8,
    pub stamina: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub skill: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub perk_list: String,
    pub game_mechanics: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub level: u8,
    pub hms_increases: HmsIncreases,
    pub skill_levels: Vec<SkillLevel>,
    pub oghma_choice: OghmaChoice,
    pub race: String,
    pub standing_stone: String,
    pub blessing: String,
    pub perks: Vec<String>,
    pub configuration: Configuration,
}

fn resolve_or_unknown(table: &NameTable, id: u8) -> String {
    table
        .name(id as u32)
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

pub(crate) fn decode_build_code(
    data: &GameData,
    tables: &DataTables,
    code: &str,
) -> Result<Character> {
    let payload = URL_SAFE_NO_PAD
        .decode(code.trim())
        .map_err(|e| PlannerError::Code(format!("invalid base64 payload: {}", e)))?;

    if payload.len() < OFF_PERKS {
        return Err(PlannerError::Code(format!(
            "build code is truncated: {} bytes, expected at least {}",
            payload.len(),
            OFF_PERKS,
        )));
    }

    let version = payload[OFF_VERSION];

    // The perk list and game mechanics ids are load-bearing: without
    // them neither the skill slots nor the perk bitmap mean anything.
    let perk_list_id = payload[OFF_PERK_LIST_ID] as u32;
    let perk_list = data
        .perk_list_by_id(perk_list_id)
        .ok_or_else(|| PlannerError::Code(format!("unknown perk list id {}", perk_list_id)))?;

    let mechanics_id = payload[OFF_MECHANICS_ID] as u32;
    let game_mechanics = tables
        .mechanics
        .name(mechanics_id)
        .ok_or_else(|| PlannerError::Code(format!("unknown game mechanics id {}", mechanics_id)))?
        .to_string();

    let level = payload[OFF_LEVEL];

    let mut skill_levels: Vec<SkillLevel> = perk_list
        .skill_names
        .iter()
        .enumerate()
        .map(|(slot, skill)| SkillLevel {
            skill: skill.clone(),
            level: payload[OFF_SKILLS + slot],
        })
        .collect();

    if version == 2 {
        skill_levels.push(SkillLevel {
            skill: LEVEL_ROW.to_string(),
            level,
        });
    }

    // Version 2 packs the oghma choice into the high nibble; every
    // other version stores it raw.
    let oghma_raw = if version == 2 {
        payload[OFF_OGHMA] >> 4
    } else {
        payload[OFF_OGHMA]
    };

    let flags = bits::unpack_flags(&payload[OFF_PERKS..], perk_list.perks.len());
    let perks = perk_list
        .perks
        .iter()
        .zip(&flags)
        .filter(|(_, &taken)| taken)
        .map(|(perk, _)| perk.name.clone())
        .collect();

    Ok(Character {
        level,
        hms_increases: HmsIncreases {
            health: payload[OFF_HEALTH],
            magicka: payload[OFF_MAGICKA],
            stamina: payload[OFF_STAMINA],
        },
        skill_levels,
        oghma_choice: OghmaChoice::from_raw(oghma_raw),
        race: resolve_or_unknown(&tables.races, payload[OFF_RACE]),
        standing_stone: resolve_or_unknown(&tables.standing_stones, payload[OFF_STONE]),
        blessing: resolve_or_unknown(&tables.blessings, payload[OFF_BLESSING]),
        perks,
        configuration: Configuration {
            perk_list: perk_list.name.clone(),
            game_mechanics,
        },
    })
}

pub(crate) fn encode_build_code(
    data: &GameData,
    tables: &DataTables,
    character: &Character,
) -> Result<String> {
    let perk_list = data
        .perk_list_by_name(&character.configuration.perk_list)
        .ok_or_else(|| {
            PlannerError::Code(format!(
                "unknown perk list \"{}\"",
                character.configuration.perk_list
            ))
        })?;

    let mechanics_id = tables
        .mechanics
        .id(&character.configuration.game_mechanics)
        .ok_or_else(|| {
            PlannerError::Code(format!(
                "unknown game mechanics \"{}\"",
                character.configuration.game_mechanics
            ))
        })?;

    let mut payload = Vec::with_capacity(OFF_PERKS + (perk_list.perks.len() + 7) / 8);
    payload.push(CURRENT_VERSION);
    payload.push(perk_list.id as u8);
    payload.push(0); // reserved race list marker
    payload.push(mechanics_id as u8);
    payload.push(0); // reserved blessing list marker
    payload.push(character.level);
    payload.push(character.hms_increases.health);
    payload.push(character.hms_increases.magicka);
    payload.push(character.hms_increases.stamina);

    // Skill bytes follow the catalog's slot order; a skill the record
    // never mentions encodes as 0. The synthetic version-2 level row is
    // skipped here because its name matches no catalog skill.
    for skill in &perk_list.skill_names {
        let level = character
            .skill_levels
            .iter()
            .find(|entry| entry.skill == *skill)
            .map(|entry| entry.level)
            .unwrap_or(0);
        payload.push(level);
    }

    payload.push(character.oghma_choice.index() << 4);
    payload.push(cosmetic_id(&tables.races, &character.race));
    payload.push(cosmetic_id(&tables.standing_stones, &character.standing_stone));
    payload.push(cosmetic_id(&tables.blessings, &character.blessing));

    let flags: Vec<bool> = perk_list
        .perks
        .iter()
        .map(|perk| character.perks.contains(&perk.name))
        .collect();
    payload.extend_from_slice(&bits::pack_flags(&flags));

    Ok(URL_SAFE_NO_PAD.encode(&payload))
}

// Race, standing stone and blessing are cosmetic on encode: an
// unresolvable name falls back to id 0 instead of failing.
fn cosmetic_id(table: &NameTable, name: &str) -> u8 {
    table.id(name).map(|id| id as u8).unwrap_or(0)
}
