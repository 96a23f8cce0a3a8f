//! JSON import and export of catalogues.

use std::path::Path;

use serde_json::Map;
use serde_json::Value;

use super::Catalogue;
use super::CatalogueError;
use crate::domain::category::QueryCategory;
use crate::domain::test_case::TestCase;
use crate::domain::test_case::TestCaseGroup;

impl Catalogue {
    /// Parses and validates a catalogue of the form `{"<group>": [<case>, ...], ...}`.
    pub fn from_json_str(input: &str) -> Result<Catalogue, CatalogueError> {
        let value: Value = serde_json::from_str(input)?;
        let Value::Object(object) = value else {
            return Err(CatalogueError::NotAnObject);
        };

        let mut groups = Vec::with_capacity(object.len());
        for (key, cases) in object {
            let category = key
                .parse::<QueryCategory>()
                .map_err(|err| CatalogueError::UnknownCategory(err.0))?;
            let cases: Vec<TestCase> = serde_json::from_value(cases)?;
            groups.push(TestCaseGroup::new(category, cases));
        }

        let catalogue = Catalogue::from_groups(groups);
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn from_json_file(path: &Path) -> Result<Catalogue, CatalogueError> {
        let input = std::fs::read_to_string(path).map_err(|err| CatalogueError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Catalogue::from_json_str(&input)
    }

    pub fn to_json_value(&self) -> Result<Value, CatalogueError> {
        let mut object = Map::new();
        for group in self.groups() {
            object.insert(
                group.category().as_str().to_string(),
                serde_json::to_value(group.cases())?,
            );
        }
        Ok(Value::Object(object))
    }
}
