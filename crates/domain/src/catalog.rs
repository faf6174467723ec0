//! Template catalog - resolve templates and cut new instances

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::entities::{DnaInstance, DnaTemplate};
use crate::error::DomainError;
use crate::ids::TemplateId;

/// Static catalog of DNA templates keyed by id.
///
/// Building a catalog is the only place templates are validated as a set;
/// afterwards it is read-only.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: HashMap<TemplateId, DnaTemplate>,
}

impl TemplateCatalog {
    /// Build a catalog, rejecting duplicate template ids.
    pub fn new(templates: impl IntoIterator<Item = DnaTemplate>) -> Result<Self, DomainError> {
        let mut map = HashMap::new();
        for template in templates {
            if map.contains_key(&template.id) {
                return Err(DomainError::constraint(format!(
                    "duplicate template id: {}",
                    template.id
                )));
            }
            map.insert(template.id.clone(), template);
        }
        Ok(Self { templates: map })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn resolve(&self, id: &TemplateId) -> Result<&DnaTemplate, DomainError> {
        self.templates
            .get(id)
            .ok_or_else(|| DomainError::not_found("DnaTemplate", id.as_str()))
    }

    /// Resolve and instantiate in one step. The caller owns placement.
    pub fn instantiate_by_id(
        &self,
        id: &TemplateId,
        acquired_at: DateTime<Utc>,
    ) -> Result<DnaInstance, DomainError> {
        self.resolve(id)
            .map(|template| DnaInstance::instantiate(template, acquired_at))
    }

    pub fn templates(&self) -> impl Iterator<Item = &DnaTemplate> {
        self.templates.values()
    }
}
