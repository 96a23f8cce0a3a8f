//! Scripted system under test for harness tests.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use crate::domain::Payload;
use crate::domain::QueryCategory;
use crate::usecases::ports::QueryOutcome;
use crate::usecases::ports::SutError;
use crate::usecases::ports::SystemUnderTest;

#[derive(Debug, Clone)]
pub enum Scripted {
    Succeed,
    Fail(String),
    Error(SutError),
    SucceedWithoutData,
    /// Sleeps, then succeeds. Used to trip the harness timeout.
    Hang(Duration),
    Panic,
}

struct Rule {
    category: QueryCategory,
    key: Option<(String, String)>,
    response: Scripted,
}

pub struct ScriptedSystem {
    default: Scripted,
    rules: Vec<Rule>,
    calls: Mutex<Vec<(QueryCategory, Payload)>>,
}

impl ScriptedSystem {
    pub fn new(default: Scripted) -> Self {
        Self {
            default,
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, category: QueryCategory, response: Scripted) -> Self {
        self.rules.push(Rule {
            category,
            key: None,
            response,
        });
        self
    }

    /// Matches payloads whose `key` holds the string `value`.
    pub fn on_value(
        mut self,
        category: QueryCategory,
        key: &str,
        value: &str,
        response: Scripted,
    ) -> Self {
        self.rules.push(Rule {
            category,
            key: Some((key.to_string(), value.to_string())),
            response,
        });
        self
    }

    pub fn calls(&self) -> Vec<(QueryCategory, Payload)> {
        self.calls.lock().unwrap().clone()
    }

    fn response_for(&self, category: QueryCategory, payload: &Payload) -> Scripted {
        let keyed = self.rules.iter().find(|rule| {
            rule.category == category
                && rule
                    .key
                    .as_ref()
                    .is_some_and(|(key, value)| payload.str_value(key) == Some(value.as_str()))
        });
        let by_category = || {
            self.rules
                .iter()
                .find(|rule| rule.category == category && rule.key.is_none())
        };
        keyed
            .or_else(by_category)
            .map(|rule| rule.response.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

impl SystemUnderTest for ScriptedSystem {
    fn execute(
        &self,
        category: QueryCategory,
        payload: &Payload,
    ) -> Result<QueryOutcome, SutError> {
        self.calls.lock().unwrap().push((category, payload.clone()));
        match self.response_for(category, payload) {
            Scripted::Succeed => Ok(QueryOutcome::success(json!({"category": category}))),
            Scripted::Fail(message) => Ok(QueryOutcome::failure(message)),
            Scripted::Error(err) => Err(err),
            Scripted::SucceedWithoutData => Ok(QueryOutcome {
                ok: true,
                data: None,
                error: None,
            }),
            Scripted::Hang(delay) => {
                std::thread::sleep(delay);
                Ok(QueryOutcome::success(json!({})))
            }
            Scripted::Panic => panic!("scripted panic"),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
