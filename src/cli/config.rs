use crate::cli::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options that control the analysis driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerOptions {
    /// Cap on pipeline iterations before giving up on convergence (default: 20)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Implicit imports, e.g. `lang.*` or `math.BigInteger`
    #[serde(default = "default_imports")]
    pub default_imports: Vec<String>,

    /// Fully-qualified type of the external variable binding, if scripts run with one
    #[serde(default)]
    pub binding_type: Option<String>,

    /// Prefix of generated script class names (default: "Script")
    #[serde(default = "default_script_class_prefix")]
    pub script_class_prefix: String,

    /// Report bare names no scope can bind (default: true)
    #[serde(default = "default_true")]
    pub report_unresolved_names: bool,

    /// Pretty-print diagnostics (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_iterations() -> usize {
    crate::core::fixpoint::DEFAULT_MAX_ITERATIONS
}

fn default_imports() -> Vec<String> {
    crate::stdlib::default_imports()
}

fn default_script_class_prefix() -> String {
    "Script".to_string()
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            default_imports: default_imports(),
            binding_type: None,
            script_class_prefix: default_script_class_prefix(),
            report_unresolved_names: true,
            pretty: true,
        }
    }
}

/// Main analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub analyzer_options: AnalyzerOptions,
}

impl AnalyzerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, AnalysisError> {
        serde_yaml::from_str(content).map_err(|e| AnalysisError::ConfigError(e.to_string()))
    }

    /// Write the default configuration to `path`
    pub fn init_file(path: &Path) -> Result<(), AnalysisError> {
        let config = AnalyzerConfig::default();
        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AnalysisError::ConfigError(e.to_string()))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Merge this configuration with CLI overrides
    /// Only non-None CLI values override file config
    pub fn merge(&mut self, overrides: &CliOverrides) {
        let options = &mut self.analyzer_options;
        if let Some(max_iterations) = overrides.max_iterations {
            options.max_iterations = max_iterations;
        }
        if let Some(ref default_imports) = overrides.default_imports {
            options.default_imports = default_imports.clone();
        }
        if let Some(ref binding_type) = overrides.binding_type {
            options.binding_type = Some(binding_type.clone());
        }
        if let Some(ref prefix) = overrides.script_class_prefix {
            options.script_class_prefix = prefix.clone();
        }
        if let Some(report) = overrides.report_unresolved_names {
            options.report_unresolved_names = report;
        }
        if let Some(pretty) = overrides.pretty {
            options.pretty = pretty;
        }
    }
}

/// CLI overrides for configuration
/// All fields are optional - only specified flags override file config
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub max_iterations: Option<usize>,
    pub default_imports: Option<Vec<String>>,
    pub binding_type: Option<String>,
    pub script_class_prefix: Option<String>,
    pub report_unresolved_names: Option<bool>,
    pub pretty: Option<bool>,
}
