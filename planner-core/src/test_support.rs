use crate::code::{Character, Configuration, HmsIncreases, OghmaChoice, SkillLevel};
use crate::data::{
    Blessing, GameData, GameMechanics, Perk, PerkList, Preset, Race, StandingStone,
};

// Small but complete catalog set: one Warrior perk list with 18 skill
// slots and 20 perks, so the bitmap spans two full bytes plus a
// partial third.
pub(crate) fn sample_data() -> GameData {
    let skill_names: Vec<String> = (0..18).map(|i| format!("Skill {}", i)).collect();
    let perks: Vec<Perk> = (0..20)
        .map(|i| Perk {
            name: format!("Perk {}", i),
            skill: i % 18,
            skill_req: (i as u8) * 5,
            description: format!("Does warrior thing {}.", i),
        })
        .collect();

    GameData {
        races: vec![
            Race {
                name: "Nord".to_string(),
            },
            Race {
                name: "Imperial".to_string(),
            },
        ],
        standing_stones: vec![
            StandingStone {
                name: "The Warrior Stone".to_string(),
            },
            StandingStone {
                name: "The Lady Stone".to_string(),
            },
        ],
        blessings: vec![
            Blessing {
                name: "Akatosh".to_string(),
            },
            Blessing {
                name: "Mara".to_string(),
            },
        ],
        perk_lists: vec![PerkList {
            id: 0,
            name: "Warrior".to_string(),
            skill_names,
            perks,
        }],
        game_mechanics: vec![GameMechanics {
            id: 7,
            name: "Standard".to_string(),
        }],
        presets: vec![
            Preset {
                name: "Classic Warrior".to_string(),
                perks: 0,
            },
            Preset {
                name: "Orphaned Preset".to_string(),
                perks: 5,
            },
        ],
    }
}

// A character that exercises every field and round-trips exactly:
// skills in catalog order, perks in catalog order, resolvable names.
pub(crate) fn sample_character() -> Character {
    Character {
        level: 36,
        hms_increases: HmsIncreases {
            health: 14,
            magicka: 6,
            stamina: 15,
        },
        skill_levels: (0..18)
            .map(|i| SkillLevel {
                skill: format!("Skill {}", i),
                level: 15 + i as u8,
            })
            .collect(),
        oghma_choice: OghmaChoice::Stamina,
        race: "Imperial".to_string(),
        standing_stone: "The Lady Stone".to_string(),
        blessing: "Mara".to_string(),
        perks: vec![
            "Perk 0".to_string(),
            "Perk 7".to_string(),
            "Perk 8".to_string(),
            "Perk 19".to_string(),
        ],
        configuration: Configuration {
            perk_list: "Warrior".to_string(),
            game_mechanics: "Standard".to_string(),
        },
    }
}
