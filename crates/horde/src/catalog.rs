//! # Monster Catalog
//!
//! Named monster sets, each holding typed monster definitions. Loaded once
//! before the simulation starts, read-only afterwards.
//!
//! ```toml
//! [[sets]]
//! name = "undead"
//!
//! [[sets.monsters]]
//! name = "Skeleton"
//! sprite = "monsters/skeleton.png"
//!
//! [[sets.monsters]]
//! name = "Ghoul"
//! sprite = "monsters/ghoul.png"
//! ```
//!
//! Sprite references are resolved to texture indices by the asset
//! collaborator through a resolver callback; the simulation never sees
//! file names again.

use std::path::Path;

use horde_core::ArchetypeRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HordeError, HordeResult};
use crate::rng::SimRng;

/// Monster definition as written in the catalog file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    /// Display name.
    pub name: String,
    /// Sprite reference understood by the asset collaborator.
    pub sprite: String,
}

/// Monster set as written in the catalog file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSetDefinition {
    /// Set name.
    pub name: String,
    /// Monsters of the set.
    #[serde(default)]
    pub monsters: Vec<MonsterDefinition>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sets: Vec<MonsterSetDefinition>,
}

/// A monster type with its sprite resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterType {
    /// Display name.
    pub name: String,
    /// Sprite name as written in the catalog file.
    pub sprite: String,
    /// Texture table index.
    pub sprite_index: u32,
}

/// A named group of monster types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterSet {
    /// Set name.
    pub name: String,
    /// Types, never empty.
    pub types: Vec<MonsterType>,
}

/// Validated, resolved archetype table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterCatalog {
    sets: Vec<MonsterSet>,
}

impl MonsterCatalog {
    /// Resolves sprite references and validates the table.
    ///
    /// # Errors
    ///
    /// - [`HordeError::EmptyCatalog`] when there are no sets
    /// - [`HordeError::EmptyMonsterSet`] when a set has no monsters
    /// - [`HordeError::UnknownSprite`] when `resolve` returns `None`
    pub fn from_definitions(
        definitions: Vec<MonsterSetDefinition>,
        mut resolve: impl FnMut(&str) -> Option<u32>,
    ) -> HordeResult<Self> {
        if definitions.is_empty() {
            return Err(HordeError::EmptyCatalog);
        }

        let mut sets = Vec::with_capacity(definitions.len());
        for set in definitions {
            if set.monsters.is_empty() {
                return Err(HordeError::EmptyMonsterSet(set.name));
            }
            let mut types = Vec::with_capacity(set.monsters.len());
            for monster in set.monsters {
                let Some(sprite_index) = resolve(&monster.sprite) else {
                    return Err(HordeError::UnknownSprite {
                        monster: monster.name,
                        sprite: monster.sprite,
                    });
                };
                types.push(MonsterType {
                    name: monster.name,
                    sprite: monster.sprite,
                    sprite_index,
                });
            }
            debug!(set = %set.name, types = types.len(), "loaded monster set");
            sets.push(MonsterSet {
                name: set.name,
                types,
            });
        }

        Ok(Self { sets })
    }

    /// Parses a TOML catalog and resolves its sprites.
    ///
    /// # Errors
    ///
    /// [`HordeError::Parse`] on malformed TOML, otherwise the errors of
    /// [`MonsterCatalog::from_definitions`].
    pub fn from_toml_str(
        source: &str,
        resolve: impl FnMut(&str) -> Option<u32>,
    ) -> HordeResult<Self> {
        let file: CatalogFile = toml::from_str(source).map_err(|e| HordeError::Parse {
            what: "monster catalog",
            message: e.to_string(),
        })?;
        Self::from_definitions(file.sets, resolve)
    }

    /// Reads a TOML catalog from disk.
    ///
    /// # Errors
    ///
    /// [`HordeError::Io`] if the file cannot be read, otherwise the errors
    /// of [`MonsterCatalog::from_toml_str`].
    pub fn from_file(
        path: impl AsRef<Path>,
        resolve: impl FnMut(&str) -> Option<u32>,
    ) -> HordeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| HordeError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source, resolve)
    }

    /// A one-set, one-type catalog. Handy for tests and the headless harness.
    #[must_use]
    pub fn single(name: &str, sprite_index: u32) -> Self {
        Self {
            sets: vec![MonsterSet {
                name: name.to_string(),
                types: vec![MonsterType {
                    name: name.to_string(),
                    sprite: String::new(),
                    sprite_index,
                }],
            }],
        }
    }

    /// All sets.
    #[inline]
    #[must_use]
    pub fn sets(&self) -> &[MonsterSet] {
        &self.sets
    }

    /// Total number of monster types across sets.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.sets.iter().map(|set| set.types.len()).sum()
    }

    /// Looks up a type by reference.
    #[must_use]
    pub fn get(&self, archetype: ArchetypeRef) -> Option<&MonsterType> {
        self.sets
            .get(usize::from(archetype.set))?
            .types
            .get(usize::from(archetype.kind))
    }

    /// Picks a set uniformly, then a type uniformly within it.
    pub fn pick(&self, rng: &mut SimRng) -> (ArchetypeRef, &MonsterType) {
        let set_index = rng.index(self.sets.len());
        let set = &self.sets[set_index];
        let kind_index = rng.index(set.types.len());
        let archetype = ArchetypeRef {
            set: set_index as u16,
            kind: kind_index as u16,
        };
        (archetype, &set.types[kind_index])
    }
}
