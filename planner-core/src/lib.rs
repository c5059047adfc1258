use serde::Serialize;
use thiserror::Error;

mod bits;
mod code;
mod data;

pub use bits::{pack_flags, unpack_flags};
pub use code::{Character, Configuration, HmsIncreases, OghmaChoice, SkillLevel};
pub use data::{
    load_game_data, Blessing, DataMappings, GameData, GameMechanics, IdName, Perk, PerkInfo,
    PerkList, Preset, Race, StandingStone,
};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("data error: {0}")]
    Data(String),
    #[error("build code error: {0}")]
    Code(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Clone, Serialize)]
pub struct DecodedUrl {
    pub preset: Option<String>,
    pub character: Character,
}

/// Bidirectional build-code codec over one loaded set of catalogs.
/// Construction builds the name/id tables once; afterwards the codec is
/// immutable and safe to share across threads.
#[derive(Debug)]
pub struct BuildCodec {
    data: GameData,
    tables: data::DataTables,
}

impl BuildCodec {
    pub fn new(data: GameData) -> Result<Self> {
        data.validate()?;
        let tables = data::DataTables::build(&data)?;
        Ok(BuildCodec { data, tables })
    }

    pub fn game_data(&self) -> &GameData {
        &self.data
    }

    pub fn decode_url(&self, url: &str) -> Result<DecodedUrl> {
        let code = query_param(url, "b").ok_or_else(|| {
            PlannerError::Code("share URL has no \"b\" build code parameter".to_string())
        })?;
        let character = self.decode_build_code(&code)?;

        // The preset is informational only: a missing, non-numeric or
        // out-of-range "p" never fails the decode.
        let preset = query_param(url, "p")
            .and_then(|raw| raw.parse::<usize>().ok())
            .and_then(|index| self.data.presets.get(index))
            .map(|preset| preset.name.clone());

        Ok(DecodedUrl { preset, character })
    }

    pub fn decode_build_code(&self, code: &str) -> Result<Character> {
        code::decode_build_code(&self.data, &self.tables, code)
    }

    pub fn encode_build_code(&self, character: &Character) -> Result<String> {
        code::encode_build_code(&self.data, &self.tables, character)
    }

    pub fn encode_url(&self, character: &Character, base_url: &str) -> Result<String> {
        let code = self.encode_build_code(character)?;
        let perk_list = self
            .data
            .perk_list_by_name(&character.configuration.perk_list)
            .ok_or_else(|| {
                PlannerError::Code(format!(
                    "unknown perk list \"{}\"",
                    character.configuration.perk_list
                ))
            })?;

        let mut url = format!("{}?b={}", base_url, code);
        if let Some(index) = self
            .data
            .presets
            .iter()
            .position(|preset| preset.perks == perk_list.id)
        {
            url.push_str(&format!("&p={}", index));
        }
        Ok(url)
    }

    pub fn data_mappings(&self) -> DataMappings {
        data::mappings(&self.data)
    }

    pub fn perks_for_list(&self, name: &str) -> Result<Vec<PerkInfo>> {
        data::perks_for_list(&self.data, name)
    }
}

fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    for pair in query.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            return Some(v.to_string());
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod test_support;
