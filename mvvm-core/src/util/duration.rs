use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Human editable duration used by the configuration files, e.g.
/// `{ seconds = 1, milliseconds = 500 }`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDuration {
    minutes: Option<u64>,
    seconds: Option<u64>,
    milliseconds: Option<u64>,
}

impl ConfigDuration {
    pub fn to_std_duration(&self) -> Duration {
        let minutes = self.minutes.unwrap_or(0);
        let seconds = self.seconds.unwrap_or(0);
        let milliseconds = self.milliseconds.unwrap_or(0);
        Duration::from_secs(minutes * 60 + seconds) + Duration::from_millis(milliseconds)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self {
            milliseconds: Some(millis),
            ..Default::default()
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self {
            seconds: Some(secs),
            ..Default::default()
        }
    }
}

impl From<ConfigDuration> for Duration {
    fn from(value: ConfigDuration) -> Self {
        value.to_std_duration()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::util::duration::ConfigDuration;

    #[test]
    fn test_sum_of_units() -> anyhow::Result<()> {
        let duration: ConfigDuration = toml::from_str("minutes = 1\nseconds = 2\nmilliseconds = 250")?;
        assert_eq!(duration.to_std_duration(), Duration::from_millis(62_250));
        assert_eq!(Duration::from(ConfigDuration::default()), Duration::ZERO);
        assert_eq!(ConfigDuration::from_secs(3).to_std_duration(), Duration::from_secs(3));
        Ok(())
    }
}
