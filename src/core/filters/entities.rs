//! Per-entity filter store configurations.
//!
//! One configuration per browsable entity type. All share the implicit
//! common fields (search, sort, sources); the declared fields below are
//! what varies between compendium pages.

use crate::core::filters::error::FilterResult;
use crate::core::filters::field::FieldDef;
use crate::core::filters::store::{FilterStore, FilterStoreConfig};

/// Browsable compendium entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Spell,
    Item,
    Monster,
    CharacterClass,
    Race,
    Background,
    Feat,
}

impl EntityKind {
    /// All entity kinds, in navigation order.
    pub const ALL: [EntityKind; 7] = [
        Self::Spell,
        Self::Item,
        Self::Monster,
        Self::CharacterClass,
        Self::Race,
        Self::Background,
        Self::Feat,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spell => "Spells",
            Self::Item => "Items",
            Self::Monster => "Monsters",
            Self::CharacterClass => "Classes",
            Self::Race => "Races",
            Self::Background => "Backgrounds",
            Self::Feat => "Feats",
        }
    }

    /// Persistence namespace; exclusively owned by this kind's store.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Spell => "filters.spells",
            Self::Item => "filters.items",
            Self::Monster => "filters.monsters",
            Self::CharacterClass => "filters.classes",
            Self::Race => "filters.races",
            Self::Background => "filters.backgrounds",
            Self::Feat => "filters.feats",
        }
    }

    /// The full filter store configuration for this entity type.
    pub fn filter_config(&self) -> FilterStoreConfig {
        let fields = match self {
            Self::Spell => vec![
                FieldDef::number_list("selected_levels", "level"),
                FieldDef::string("selected_school", "school"),
                FieldDef::string_list("selected_classes", "class"),
                FieldDef::string_list("selected_damage_types", "damage"),
                FieldDef::string_list("selected_saving_throws", "save"),
                FieldDef::string("concentration", "conc"),
                FieldDef::string("ritual", "ritual"),
            ],
            Self::Item => vec![
                FieldDef::string_list("selected_types", "type"),
                FieldDef::string_list("selected_properties", "prop"),
                FieldDef::string("selected_rarity", "rarity"),
                FieldDef::string("has_charges", "charges"),
                FieldDef::string("requires_attunement", "attune"),
            ],
            Self::Monster => vec![
                // challenge ratings stay strings: "1/2" is a legal CR
                FieldDef::string_list("selected_crs", "cr"),
                FieldDef::string("selected_type", "type"),
                FieldDef::string_list("selected_sizes", "size"),
                FieldDef::string_list("selected_alignments", "align"),
                FieldDef::string("legendary", "legendary"),
            ],
            Self::CharacterClass => vec![
                FieldDef::string_list("selected_primary_abilities", "ability"),
                FieldDef::string("spellcasting", "caster"),
                FieldDef::number_list("selected_hit_dice", "hd"),
            ],
            Self::Race => vec![
                FieldDef::string_list("selected_sizes", "size"),
                FieldDef::string_list("selected_ability_bonuses", "asi"),
                FieldDef::string("has_darkvision", "darkvision"),
            ],
            Self::Background => vec![
                FieldDef::string_list("selected_skills", "skill"),
                FieldDef::string_list("selected_tools", "tool"),
                FieldDef::string_list("selected_languages", "lang"),
            ],
            Self::Feat => vec![
                FieldDef::string("prerequisite", "prereq"),
                FieldDef::string_list("selected_ability_increases", "asi"),
                FieldDef::string("repeatable", "repeat"),
            ],
        };
        FilterStoreConfig::new(self.display_name(), self.storage_key(), fields)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FilterStore {
    /// Build the filter store for one entity type's list page.
    pub fn for_entity(kind: EntityKind) -> FilterResult<Self> {
        Self::new(kind.filter_config())
    }
}
