//! DNA entities - catalog templates and the player-owned instances cut from them
//!
//! A template is a static catalog entry. An instance is a unique, player-owned
//! copy carrying its own `InstanceId`; it keeps a denormalized copy of the
//! template's display fields so containers can be rendered without a catalog
//! lookup. The `template_id` on an instance is a back-reference, not ownership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{InstanceId, TemplateId};
use crate::value_objects::{DnaName, ElementType, Rarity, StatBlock};

/// Immutable catalog definition of a DNA type.
///
/// # Simple Data Struct
///
/// Templates are loaded once and never change at runtime, so the fields are
/// public; any combination of values is a valid template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaTemplate {
    pub id: TemplateId,
    pub name: DnaName,
    pub element: ElementType,
    pub rarity: Rarity,
    #[serde(default)]
    pub base_stats: StatBlock,
}

impl DnaTemplate {
    pub fn new(id: TemplateId, name: DnaName, element: ElementType, rarity: Rarity) -> Self {
        Self {
            id,
            name,
            element,
            rarity,
            base_stats: StatBlock::default(),
        }
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.base_stats = stats;
        self
    }
}

/// A uniquely identified, player-owned copy of a template.
///
/// # Invariants
///
/// - `instance_id` never changes after creation; two instances of the same
///   template are equal in value but never in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaInstance {
    instance_id: InstanceId,
    template_id: TemplateId,
    name: DnaName,
    element: ElementType,
    rarity: Rarity,
    stats: StatBlock,
    acquired_at: DateTime<Utc>,
}

impl DnaInstance {
    /// Cut a fresh instance from a template with a newly generated identity.
    pub fn instantiate(template: &DnaTemplate, acquired_at: DateTime<Utc>) -> Self {
        Self::instantiate_with_id(template, InstanceId::new(), acquired_at)
    }

    /// Cut an instance with a caller-provided identity (hydration, tests).
    pub fn instantiate_with_id(
        template: &DnaTemplate,
        instance_id: InstanceId,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            instance_id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            element: template.element,
            rarity: template.rarity,
            stats: template.base_stats,
            acquired_at,
        }
    }

    #[inline]
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    #[inline]
    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    #[inline]
    pub fn name(&self) -> &DnaName {
        &self.name
    }

    #[inline]
    pub fn element(&self) -> ElementType {
        self.element
    }

    #[inline]
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    #[inline]
    pub fn stats(&self) -> StatBlock {
        self.stats
    }

    #[inline]
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}
