use crate::element::Element;
use crate::error::{ElementError, ElementResult};
use crate::schema::{Described, ElementSchema};
use elementkv_store::SharedStore;
use elementkv_types::{ElementId, State};
use serde_json::Value;

/// A vote counter stored under `candidate_<name>`.
///
/// `increment` reads the current count and then writes count + 1. The two
/// steps are separate store calls, so concurrent increments against the same
/// key can both read the same count and one vote is lost.
#[derive(Debug)]
pub struct VotingCandidate {
    name: String,
    element: Element,
}

impl VotingCandidate {
    pub const ID_PREFIX: &'static str = "candidate_";

    /// Creates a candidate with an in-memory count of zero. No I/O is
    /// performed; an existing stored count is picked up on the first read.
    pub fn new(store: SharedStore, name: impl Into<String>) -> ElementResult<Self> {
        let name = name.into();
        let id = ElementId::new(format!("{}{name}", Self::ID_PREFIX))?;
        let mut initial = State::new();
        initial.insert("votes".to_string(), Value::from(0));
        Ok(Self {
            name,
            element: Element::with_id(store, id, initial),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &ElementId {
        self.element.identifier()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    /// Refreshes from the store and returns the vote count.
    ///
    /// A missing `votes` field counts as zero.
    pub async fn votes(&mut self) -> ElementResult<i64> {
        match self.element.field::<Value>("votes").await? {
            None => Ok(0),
            Some(value) => value.as_i64().ok_or_else(|| ElementError::InvalidField {
                field: "votes".to_string(),
                reason: format!("expected an integer, found {value}"),
            }),
        }
    }

    /// Adds one vote and returns the new count.
    ///
    /// A count already at `i64::MAX` fails with [`ElementError::InvalidField`]
    /// and nothing is written.
    pub async fn increment(&mut self) -> ElementResult<i64> {
        let votes = self
            .votes()
            .await?
            .checked_add(1)
            .ok_or_else(|| ElementError::InvalidField {
                field: "votes".to_string(),
                reason: "vote count overflowed".to_string(),
            })?;
        self.element.set_field("votes", votes).await?;
        Ok(votes)
    }
}

impl Described for VotingCandidate {
    const SCHEMA: ElementSchema =
        ElementSchema::new("VotingCandidate", &["name"], &["name", "votes", "increment"]);
}
