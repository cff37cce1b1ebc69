use config::{File, FileFormat, Source};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};

use crate::config::ConfigBuilder;
use crate::MVVM_CONFIG;
use crate::util::duration::ConfigDuration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MvvmConfig {
    pub aggregator: AggregatorConfig,
    pub dispatcher: DispatcherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(rename = "catch-panics")]
    pub catch_panics: bool,
    #[serde(rename = "slow-callback-warn")]
    pub slow_callback_warn: ConfigDuration,
    #[serde(rename = "publish-timeout", default)]
    pub publish_timeout: Option<ConfigDuration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    #[serde(rename = "thread-name")]
    pub thread_name: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            slow_callback_warn: ConfigDuration::from_millis(200),
            publish_timeout: None,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            thread_name: "mvvm-dispatcher".to_string(),
        }
    }
}

impl MvvmConfig {
    pub fn builder() -> MvvmConfigBuilder {
        MvvmConfigBuilder::default()
    }
}

/// Layers user sources over the embedded `mvvm.toml` defaults.
#[derive(Debug)]
pub struct MvvmConfigBuilder {
    builder: config::ConfigBuilder<DefaultState>,
}

impl Default for MvvmConfigBuilder {
    fn default() -> Self {
        let builder = config::Config::builder().add_source(File::from_str(MVVM_CONFIG, FileFormat::Toml));
        Self { builder }
    }
}

impl ConfigBuilder for MvvmConfigBuilder {
    type C = MvvmConfig;

    fn add_source<T>(self, source: T) -> anyhow::Result<Self> where T: Source + Send + Sync + 'static {
        Ok(Self { builder: self.builder.add_source(source) })
    }

    fn build(self) -> anyhow::Result<Self::C> {
        let mvvm_config = self.builder.build()?.try_deserialize::<Self::C>()?;
        Ok(mvvm_config)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use config::{File, FileFormat};

    use crate::config::ConfigBuilder;
    use crate::config::mvvm_config::MvvmConfig;

    #[test]
    fn test_embedded_defaults() -> anyhow::Result<()> {
        let config = MvvmConfig::builder().build()?;
        let default = MvvmConfig::default();
        assert_eq!(config.aggregator.catch_panics, default.aggregator.catch_panics);
        assert_eq!(config.aggregator.slow_callback_warn.to_std_duration(), Duration::from_millis(200));
        assert!(config.aggregator.publish_timeout.is_none());
        assert_eq!(config.dispatcher.thread_name, default.dispatcher.thread_name);
        Ok(())
    }

    #[test]
    fn test_override_source() -> anyhow::Result<()> {
        let overrides = r#"
            [aggregator]
            catch-panics = false
            publish-timeout = { seconds = 2 }

            [dispatcher]
            thread-name = "ui"
        "#;
        let config = MvvmConfig::builder()
            .add_source(File::from_str(overrides, FileFormat::Toml))?
            .build()?;
        assert!(!config.aggregator.catch_panics);
        assert_eq!(config.aggregator.publish_timeout.map(|d| d.to_std_duration()), Some(Duration::from_secs(2)));
        assert_eq!(config.aggregator.slow_callback_warn.to_std_duration(), Duration::from_millis(200));
        assert_eq!(config.dispatcher.thread_name, "ui");
        println!("{}", toml::to_string(&config)?);
        Ok(())
    }
}
