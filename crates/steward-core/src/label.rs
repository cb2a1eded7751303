use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Reverse-DNS style identity of a service, e.g. `com.example.indexer`.
/// The application part doubles as the event source and the service name
/// registered with the OS.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Label {
    pub qualifier: String,
    pub organization: String,
    pub application: String,
}

impl Label {
    pub fn qualified_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.qualifier, self.organization, self.application
        )
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Label {0} was not in the correct format. Labels are formatted as '{{qualifier}}.{{organization}}.{{application}}'."
    )]
    InvalidLabel(String),
}

impl FromStr for Label {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('.').collect::<Vec<_>>().as_slice() {
            [qualifier, organization, application]
                if [qualifier, organization, application]
                    .iter()
                    .all(|p| !p.is_empty()) =>
            {
                Ok(Label {
                    qualifier: (*qualifier).to_owned(),
                    organization: (*organization).to_owned(),
                    application: (*application).to_owned(),
                })
            }
            _ => Err(ParseError::InvalidLabel(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[path = "./label_test.rs"]
mod label_test;
