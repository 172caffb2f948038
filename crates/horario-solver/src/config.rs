// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! JSON filter configuration.
//!
//! ```json
//! {
//!     "subjects": ["Data Mining", "Computer Architecture"],
//!     "exclude-professors": ["Professor 1"],
//!     "require-professors": [],
//!     "exclude-offerings": [],
//!     "require-offerings": [58469],
//!     "forbidden-times": {
//!         "L": ["0700-0859", "1300-1459"],
//!         "V": ["0700-0859"]
//!     }
//! }
//! ```
//!
//! Only `subjects` is mandatory. The Spanish keys of older configuration
//! files (`materias`, `sin-profesores`, `con-profesores`, `sin-cursos`,
//! `con-cursos`, `sin-horarios`) are accepted as aliases.

use crate::error::ConfigError;
use horario_model::{offering::OfferingId, time::TimeInterval, weekday::Weekday};
use horario_search::{filter::CandidateFilter, post_filter::CombinationPostFilter};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// Default file name looked up when no configuration path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "schedule-config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduleConfig {
    /// Wanted subjects, in the order their offerings are chosen.
    #[serde(alias = "materias")]
    pub subjects: Vec<String>,
    #[serde(default, alias = "sin-profesores")]
    pub exclude_professors: Vec<String>,
    #[serde(default, alias = "con-profesores")]
    pub require_professors: Vec<String>,
    #[serde(default, alias = "sin-cursos")]
    pub exclude_offerings: Vec<OfferingId>,
    #[serde(default, alias = "con-cursos")]
    pub require_offerings: Vec<OfferingId>,
    /// Windows no chosen meeting may overlap, per weekday code.
    #[serde(default, alias = "sin-horarios")]
    pub forbidden_times: BTreeMap<Weekday, Vec<TimeInterval>>,
}

impl ScheduleConfig {
    /// Creates a configuration that only names the wanted subjects.
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subjects: subjects.into_iter().map(Into::into).collect(),
            exclude_professors: Vec::new(),
            require_professors: Vec::new(),
            exclude_offerings: Vec::new(),
            require_offerings: Vec::new(),
            forbidden_times: BTreeMap::new(),
        }
    }

    /// Returns the starter configuration written for first-time users.
    pub fn template() -> Self {
        let windows = [
            TimeInterval::hour_range(7, 8),
            TimeInterval::hour_range(13, 14),
        ];
        let forbidden_times = Weekday::ALL
            .iter()
            .filter(|&&day| day != Weekday::Saturday)
            .map(|&day| (day, windows.to_vec()))
            .collect();

        Self {
            subjects: vec!["Subject 1".to_string(), "Subject 2".to_string()],
            exclude_professors: vec!["Professor 1".to_string(), "Professor 2".to_string()],
            forbidden_times,
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Parses and validates a configuration from JSON text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScheduleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            subjects = config.subjects.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Serializes the configuration as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes [`ScheduleConfig::template`] to `path`.
    pub fn write_template<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = Self::template().to_json_pretty()?;
        std::fs::write(path, json + "\n").map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects configurations that cannot describe a schedule.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSubjects`] if `subjects` is empty and
    /// [`ConfigError::DuplicateSubject`] if a subject is listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subjects.is_empty() {
            return Err(ConfigError::NoSubjects);
        }
        for (i, subject) in self.subjects.iter().enumerate() {
            if self.subjects[..i].contains(subject) {
                return Err(ConfigError::DuplicateSubject(subject.clone()));
            }
        }
        Ok(())
    }

    /// Builds the candidate filter described by this configuration.
    pub fn candidate_filter(&self) -> CandidateFilter {
        self.forbidden_times.iter().fold(
            CandidateFilter::new(self.subjects.iter().cloned())
                .exclude_professors(self.exclude_professors.iter().cloned())
                .exclude_offerings(self.exclude_offerings.iter().copied()),
            |filter, (&day, windows)| filter.forbid_all(day, windows.iter().copied()),
        )
    }

    /// Builds the post filter described by this configuration.
    pub fn post_filter(&self) -> CombinationPostFilter {
        CombinationPostFilter::new()
            .require_offerings(self.require_offerings.iter().copied())
            .require_professors(self.require_professors.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(text: &str) -> TimeInterval {
        TimeInterval::parse(text).unwrap()
    }

    #[test]
    fn test_minimal_config() {
        let config = ScheduleConfig::from_str(r#"{ "subjects": ["A", "B"] }"#).unwrap();
        assert_eq!(config, ScheduleConfig::new(["A", "B"]));
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "subjects": ["A"],
            "exclude-professors": ["X"],
            "require-professors": ["Y"],
            "exclude-offerings": [1, 2],
            "require-offerings": [3],
            "forbidden-times": { "L": ["0700-0859"], "V": ["1300-1459", "0700-0759"] }
        }"#;
        let config = ScheduleConfig::from_str(json).unwrap();
        assert_eq!(config.exclude_professors, vec!["X"]);
        assert_eq!(config.require_professors, vec!["Y"]);
        assert_eq!(
            config.exclude_offerings,
            vec![OfferingId::new(1), OfferingId::new(2)]
        );
        assert_eq!(config.require_offerings, vec![OfferingId::new(3)]);
        assert_eq!(config.forbidden_times[&Weekday::Monday], vec![t("0700-0859")]);
        assert_eq!(config.forbidden_times[&Weekday::Friday].len(), 2);
    }

    #[test]
    fn test_legacy_keys_are_accepted() {
        let json = r#"{
            "materias": ["Minería de Datos"],
            "sin-profesores": ["Profesor 1"],
            "con-profesores": ["Profesor 2"],
            "sin-cursos": [10],
            "con-cursos": [20],
            "sin-horarios": { "A": ["0700-0859"] }
        }"#;
        let config = ScheduleConfig::from_str(json).unwrap();
        assert_eq!(config.subjects, vec!["Minería de Datos"]);
        assert_eq!(config.exclude_professors, vec!["Profesor 1"]);
        assert_eq!(config.require_professors, vec!["Profesor 2"]);
        assert_eq!(config.exclude_offerings, vec![OfferingId::new(10)]);
        assert_eq!(config.require_offerings, vec![OfferingId::new(20)]);
        assert_eq!(config.forbidden_times[&Weekday::Tuesday], vec![t("0700-0859")]);
    }

    #[test]
    fn test_invalid_window_or_weekday_is_rejected() {
        let bad_time = r#"{ "subjects": ["A"], "forbidden-times": { "L": ["7-9"] } }"#;
        assert!(matches!(ScheduleConfig::from_str(bad_time), Err(ConfigError::Json(_))));

        let bad_day = r#"{ "subjects": ["A"], "forbidden-times": { "X": ["0700-0859"] } }"#;
        assert!(matches!(ScheduleConfig::from_str(bad_day), Err(ConfigError::Json(_))));

        assert!(matches!(ScheduleConfig::from_str("{}"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ScheduleConfig::new(Vec::<String>::new()).validate(),
            Err(ConfigError::NoSubjects)
        ));
        assert!(matches!(
            ScheduleConfig::new(["A", "B", "A"]).validate(),
            Err(ConfigError::DuplicateSubject(s)) if s == "A"
        ));
        assert!(ScheduleConfig::new(["A", "B"]).validate().is_ok());
    }

    #[test]
    fn test_template_round_trips_and_forbids_weekdays() {
        let template = ScheduleConfig::template();
        assert!(template.validate().is_ok());
        assert_eq!(template.forbidden_times.len(), 5);
        assert!(!template.forbidden_times.contains_key(&Weekday::Saturday));
        assert_eq!(
            template.forbidden_times[&Weekday::Wednesday],
            vec![t("0700-0859"), t("1300-1459")]
        );

        let json = template.to_json_pretty().unwrap();
        assert!(json.contains("\"forbidden-times\""));
        assert!(json.contains("\"0700-0859\""));
        assert_eq!(ScheduleConfig::from_str(&json).unwrap(), template);
    }

    #[test]
    fn test_write_template_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        ScheduleConfig::write_template(&path).unwrap();
        assert_eq!(
            ScheduleConfig::from_path(&path).unwrap(),
            ScheduleConfig::template()
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScheduleConfig::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_filters_follow_config() {
        let mut config = ScheduleConfig::new(["A", "B"]);
        config.exclude_professors.push("X".into());
        config
            .forbidden_times
            .insert(Weekday::Monday, vec![t("0700-0859")]);
        config.require_offerings.push(OfferingId::new(9));

        let filter = config.candidate_filter();
        assert_eq!(filter.subjects(), &["A".to_string(), "B".to_string()]);
        assert_eq!(filter.forbidden(Weekday::Monday), &[t("0700-0859")]);
        assert!(filter.forbidden(Weekday::Tuesday).is_empty());
        assert!(!config.post_filter().is_empty());
        assert!(ScheduleConfig::new(["A"]).post_filter().is_empty());
    }
}
