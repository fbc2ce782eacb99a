//! Select Models use case
//!
//! Resolves the configured catalogue plus the user's selection into the
//! ordered set of targets for a run.

use crate::ports::api_keys::ApiKeyResolver;
use prism_domain::{ConfiguredModel, GroupInfo, ModelTarget, ModelsConfig, PrismError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How the user asked for models. Exactly one mode applies per run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelSelection {
    /// A single config key (`provider:model_id`)
    Specific(String),
    /// Every member of a named group
    Group(String),
    /// An explicit list of config keys, order preserved, duplicates dropped
    Explicit(Vec<String>),
    /// Every model with `enabled = true`
    #[default]
    AllEnabled,
}

/// Result of model selection
#[derive(Debug, Clone, Default)]
pub struct SelectionOutcome {
    /// Runnable targets in selection order
    pub models: Vec<ModelTarget>,
    pub warnings: Vec<String>,
    /// Config keys skipped because they are disabled
    pub disabled_models: Vec<String>,
    /// Config keys skipped because no API key could be resolved
    pub missing_api_key_models: Vec<String>,
}

/// Use case for selecting run targets
pub struct SelectModelsUseCase {
    keys: Arc<dyn ApiKeyResolver>,
}

impl SelectModelsUseCase {
    pub fn new(keys: Arc<dyn ApiKeyResolver>) -> Self {
        Self { keys }
    }

    pub fn execute(
        &self,
        config: &ModelsConfig,
        selection: &ModelSelection,
    ) -> Result<SelectionOutcome, PrismError> {
        let mut outcome = SelectionOutcome::default();
        let candidates = Self::candidates(config, selection, &mut outcome.warnings)?;
        let explicit = !matches!(selection, ModelSelection::AllEnabled);

        for (model, group) in candidates {
            let key = model.config_key();

            if !model.enabled {
                if explicit {
                    warn!("Skipping disabled model {}", key);
                    outcome.warnings.push(format!(
                        "Model '{}' is disabled in configuration; set enabled = true to use it",
                        key
                    ));
                }
                outcome.disabled_models.push(key);
                continue;
            }

            let target = model.to_target(group);
            if self.keys.api_key(&target).is_none() {
                warn!("Skipping {}: no API key", key);
                outcome.warnings.push(format!(
                    "Model '{}' has no API key configured; skipping it",
                    key
                ));
                outcome.missing_api_key_models.push(key);
                continue;
            }

            debug!("Selected {}", key);
            outcome.models.push(target);
        }

        if outcome.models.is_empty() {
            return Err(Self::nothing_selected(config, selection, &outcome));
        }

        info!("Selected {} model(s)", outcome.models.len());
        Ok(outcome)
    }

    fn candidates<'a>(
        config: &'a ModelsConfig,
        selection: &ModelSelection,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<(&'a ConfiguredModel, Option<GroupInfo>)>, PrismError> {
        match selection {
            ModelSelection::Specific(key) => match config.find(key) {
                Some(model) => Ok(vec![(model, None)]),
                None => Err(Self::unknown_model(config, key)),
            },
            ModelSelection::Group(name) => {
                let Some(group) = config.group(name) else {
                    let available: Vec<_> = config.group_names().collect();
                    let mut err = PrismError::model_selection(format!(
                        "Group '{}' is not defined in configuration",
                        name
                    ));
                    err = if available.is_empty() {
                        err.with_suggestion("Define groups under [groups.<name>] in prism.toml")
                    } else {
                        err.with_suggestion(format!("Available groups: {}", available.join(", ")))
                    };
                    return Err(err.with_example("prism --group coding \"Review this function\""));
                };

                let info = group.group_info();
                let mut seen = HashSet::new();
                let mut candidates = Vec::new();
                for key in &group.models {
                    if !seen.insert(key.as_str()) {
                        debug!("Group '{}' lists '{}' more than once", name, key);
                        continue;
                    }
                    match config.find(key) {
                        Some(model) => candidates.push((model, Some(info.clone()))),
                        None => warnings.push(format!(
                            "Group '{}' lists '{}', which is not a configured model",
                            name, key
                        )),
                    }
                }
                Ok(candidates)
            }
            ModelSelection::Explicit(keys) => {
                let mut seen = HashSet::new();
                let mut candidates = Vec::new();
                for key in keys {
                    if !seen.insert(key.as_str()) {
                        continue;
                    }
                    match config.find(key) {
                        Some(model) => candidates.push((model, None)),
                        None => warnings.push(format!(
                            "Model '{}' is not configured; skipping it",
                            key
                        )),
                    }
                }
                Ok(candidates)
            }
            ModelSelection::AllEnabled => {
                // First entry wins for a key configured twice
                let mut seen = HashSet::new();
                Ok(config
                    .models
                    .iter()
                    .filter(|m| seen.insert(m.config_key()))
                    .map(|m| (m, None))
                    .collect())
            }
        }
    }

    fn unknown_model(config: &ModelsConfig, key: &str) -> PrismError {
        let mut err =
            PrismError::model_selection(format!("Model '{}' is not configured", key));

        if prism_domain::split_config_key(key).is_none() {
            err = err.with_suggestion("Models are addressed as provider:model_id");
        }

        let needle = key.rsplit(':').next().unwrap_or(key).to_lowercase();
        let similar: Vec<String> = config
            .config_keys()
            .filter(|k| !needle.is_empty() && k.to_lowercase().contains(&needle))
            .collect();
        if !similar.is_empty() {
            err = err.with_suggestion(format!("Did you mean: {}", similar.join(", ")));
        }

        let available: Vec<String> = config.config_keys().collect();
        err = if available.is_empty() {
            err.with_suggestion("No models are configured; add [[models]] entries to prism.toml")
        } else {
            err.with_suggestion(format!("Configured models: {}", available.join(", ")))
        };
        err.with_example("prism -m openai:gpt-4o \"Explain lifetimes\"")
    }

    fn nothing_selected(
        config: &ModelsConfig,
        selection: &ModelSelection,
        outcome: &SelectionOutcome,
    ) -> PrismError {
        let scope = match selection {
            ModelSelection::Specific(key) => format!("model '{}'", key),
            ModelSelection::Group(name) => format!("group '{}'", name),
            ModelSelection::Explicit(_) => "the requested models".to_string(),
            ModelSelection::AllEnabled => "the configuration".to_string(),
        };
        let mut err = PrismError::model_selection(format!("No usable models in {}", scope));

        if config.models.is_empty() {
            err = err.with_suggestion("Add [[models]] entries to prism.toml");
        }
        if !outcome.disabled_models.is_empty() {
            err = err.with_suggestion(format!(
                "Disabled models: {} (set enabled = true)",
                outcome.disabled_models.join(", ")
            ));
        }
        if !outcome.missing_api_key_models.is_empty() {
            err = err.with_suggestion(format!(
                "Models missing an API key: {} (export the provider's API key variable)",
                outcome.missing_api_key_models.join(", ")
            ));
        }
        err.with_suggestions(outcome.warnings.iter().cloned())
    }
}
