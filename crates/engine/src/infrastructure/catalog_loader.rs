//! JSON template catalog loader.
//!
//! Accepts either a bare array of templates or `{ "templates": [...] }`.

use std::path::Path;

use serde::Deserialize;

use dnaforge_domain::{
    DnaName, DnaTemplate, DomainError, ElementType, Rarity, StatBlock, TemplateCatalog, TemplateId,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { templates: Vec<DnaTemplate> },
    Bare(Vec<DnaTemplate>),
}

pub async fn load_catalog(path: impl AsRef<Path>) -> Result<TemplateCatalog, CatalogLoadError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let catalog = parse_catalog(&raw)?;
    tracing::info!(path = %path.display(), templates = catalog.len(), "Loaded DNA catalog");
    Ok(catalog)
}

pub fn parse_catalog(raw: &str) -> Result<TemplateCatalog, CatalogLoadError> {
    let templates = match serde_json::from_str(raw)? {
        CatalogFile::Wrapped { templates } | CatalogFile::Bare(templates) => templates,
    };
    Ok(TemplateCatalog::new(templates)?)
}

/// Small built-in catalog used when no catalog file is configured.
pub fn starter_catalog() -> Result<TemplateCatalog, DomainError> {
    let entries = [
        ("dna_fire_01", "Ember Strand", ElementType::Fire, Rarity::Common, (40, 12, 6, 9)),
        ("dna_water_01", "Tide Coil", ElementType::Water, Rarity::Common, (45, 8, 10, 8)),
        ("dna_earth_01", "Bedrock Helix", ElementType::Earth, Rarity::Rare, (60, 9, 15, 4)),
        ("dna_wind_01", "Gale Thread", ElementType::Wind, Rarity::Rare, (35, 10, 5, 16)),
        ("dna_light_01", "Halo Sequence", ElementType::Light, Rarity::Elite, (50, 14, 10, 11)),
        ("dna_dark_01", "Umbral Chain", ElementType::Dark, Rarity::Legendary, (55, 18, 8, 12)),
    ];

    let templates = entries
        .into_iter()
        .map(|(id, name, element, rarity, (hp, attack, defense, speed))| {
            Ok(DnaTemplate::new(TemplateId::new(id)?, DnaName::new(name)?, element, rarity)
                .with_stats(StatBlock::new(hp, attack, defense, speed)))
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    TemplateCatalog::new(templates)
}
