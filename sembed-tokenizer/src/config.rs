use displaydoc::Display;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::vocab::LoadError;

/// The relevant parts of a model configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModelConfig {
    #[serde(default, alias = "task_names")]
    lora_adaptations: Option<Vec<String>>,
}

/// The potential errors of the task lookup.
#[derive(Debug, Display, Error, PartialEq)]
pub enum TaskError {
    /// Unknown task {0}
    Unknown(String),
}

impl ModelConfig {
    /// Parses the model configuration.
    pub fn parse(document: &[u8]) -> Result<Self, LoadError> {
        let config = serde_json::from_slice::<Self>(document).map_err(LoadError::Config)?;
        debug!("Loaded a model configuration with {} tasks", config.tasks().len());
        Ok(config)
    }

    /// Gets the named tasks.
    pub fn tasks(&self) -> &[String] {
        self.lora_adaptations.as_deref().unwrap_or_default()
    }

    /// Gets the index of the task.
    ///
    /// # Errors
    /// Fails if the task is not part of the task list.
    pub fn task_id(&self, name: &str) -> Result<usize, TaskError> {
        self.tasks()
            .iter()
            .position(|task| task == name)
            .ok_or_else(|| TaskError::Unknown(name.into()))
    }

    /// Gets the index of the task or the first index if the task is unknown.
    pub fn task_id_or_default(&self, name: &str) -> usize {
        self.task_id(name).unwrap_or_else(|error| {
            warn!("{}, defaulting to the first task", error);
            0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &[u8] = br#"{
        "model_type": "xlm-roberta",
        "hidden_size": 1024,
        "lora_adaptations": [
            "retrieval.query",
            "retrieval.passage",
            "separation",
            "classification",
            "text-matching"
        ]
    }"#;

    #[test]
    fn test_task_id() {
        let config = ModelConfig::parse(CONFIG).unwrap();
        assert_eq!(config.tasks().len(), 5);
        assert_eq!(config.task_id("retrieval.query").unwrap(), 0);
        assert_eq!(config.task_id("text-matching").unwrap(), 4);
    }

    #[test]
    fn test_task_id_unknown() {
        let config = ModelConfig::parse(CONFIG).unwrap();
        assert_eq!(
            config.task_id("summarization").unwrap_err(),
            TaskError::Unknown("summarization".into()),
        );
        assert_eq!(config.task_id_or_default("summarization"), 0);
        assert_eq!(config.task_id_or_default("separation"), 2);
    }

    #[test]
    fn test_task_names_alias() {
        let config = ModelConfig::parse(br#"{ "task_names": ["a", "b"] }"#).unwrap();
        assert_eq!(config.task_id("b").unwrap(), 1);
    }

    #[test]
    fn test_without_tasks() {
        let config = ModelConfig::parse(b"{}").unwrap();
        assert!(config.tasks().is_empty());
        assert!(config.task_id("retrieval.query").is_err());

        let config = ModelConfig::parse(br#"{ "lora_adaptations": null }"#).unwrap();
        assert!(config.tasks().is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            ModelConfig::parse(br#"{ "lora_adaptations": "retrieval" }"#),
            Err(LoadError::Config(_)),
        ));
    }
}
