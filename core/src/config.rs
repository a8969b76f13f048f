use crate::error::MatchingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Matching,
    Question,
    Recommend,
    Answer,
}

impl Table {
    pub fn env_var(self) -> &'static str {
        match self {
            Table::Matching => "MATCHING_TABLE_NAME",
            Table::Question => "QUESTION_TABLE_NAME",
            Table::Recommend => "RECOMMEND_TABLE_NAME",
            Table::Answer => "ANSWER_TABLE_NAME",
        }
    }

    /// Table names used by the deployed stack, for local runs.
    pub fn local_default(self) -> &'static str {
        match self {
            Table::Matching => "matching-table",
            Table::Question => "question-table",
            Table::Recommend => "recommend-table",
            Table::Answer => "answer-table",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableNames {
    pub matching: Option<String>,
    pub question: Option<String>,
    pub recommend: Option<String>,
    pub answer: Option<String>,
}

impl TableNames {
    pub fn get(&self, table: Table) -> Result<&str, MatchingError> {
        let name = match table {
            Table::Matching => &self.matching,
            Table::Question => &self.question,
            Table::Recommend => &self.recommend,
            Table::Answer => &self.answer,
        };

        name.as_deref()
            .ok_or_else(|| MatchingError::Config(format!("{} environment variable is missing", table.env_var())))
    }

    fn slot(&mut self, table: Table) -> &mut Option<String> {
        match table {
            Table::Matching => &mut self.matching,
            Table::Question => &mut self.question,
            Table::Recommend => &mut self.recommend,
            Table::Answer => &mut self.answer,
        }
    }
}

const ALL_TABLES: [Table; 4] = [Table::Matching, Table::Question, Table::Recommend, Table::Answer];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub tables: TableNames,
    /// Include the debug rendering of internal errors in response bodies.
    pub expose_trace: bool,
    /// DynamoDB Local or another compatible endpoint.
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut tables = TableNames::default();
        for table in ALL_TABLES {
            *tables.slot(table) = lookup(table.env_var()).filter(|v| !v.trim().is_empty());
        }

        let expose_trace = lookup("MATCHING_EXPOSE_TRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            tables,
            expose_trace,
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT_URL").filter(|v| !v.trim().is_empty()),
        }
    }

    /// Fills every unset table name with its local default.
    pub fn with_local_defaults(mut self) -> Self {
        for table in ALL_TABLES {
            let slot = self.tables.slot(table);
            if slot.is_none() {
                *slot = Some(table.local_default().to_string());
            }
        }
        self
    }

    /// Fails when any of `tables` has no configured name. Handlers call this at
    /// cold start so a misconfigured function never serves requests.
    pub fn require(&self, tables: &[Table]) -> Result<(), MatchingError> {
        for table in tables {
            self.tables.get(*table)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_table_names_and_trace_flag() {
        let config = Config::from_lookup(lookup(&[
            ("MATCHING_TABLE_NAME", "m-table"),
            ("RECOMMEND_TABLE_NAME", "r-table"),
            ("MATCHING_EXPOSE_TRACE", "TRUE"),
            ("DYNAMODB_ENDPOINT_URL", "http://localhost:8000"),
        ]));

        assert_eq!(config.tables.get(Table::Matching).unwrap(), "m-table");
        assert_eq!(config.tables.get(Table::Recommend).unwrap(), "r-table");
        assert!(config.tables.get(Table::Question).is_err());
        assert!(config.expose_trace);
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn require_names_the_missing_variable() {
        let config = Config::from_lookup(lookup(&[("MATCHING_TABLE_NAME", "m-table")]));

        assert!(config.require(&[Table::Matching]).is_ok());
        let err = config
            .require(&[Table::Matching, Table::Answer])
            .unwrap_err();
        assert!(err.to_string().contains("ANSWER_TABLE_NAME"));
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = Config::from_lookup(lookup(&[("QUESTION_TABLE_NAME", "  ")]));
        assert!(config.tables.question.is_none());
        assert!(!config.expose_trace);
    }

    #[test]
    fn local_defaults_only_fill_gaps() {
        let config =
            Config::from_lookup(lookup(&[("MATCHING_TABLE_NAME", "custom")])).with_local_defaults();

        assert_eq!(config.tables.get(Table::Matching).unwrap(), "custom");
        assert_eq!(config.tables.get(Table::Answer).unwrap(), "answer-table");
    }
}
