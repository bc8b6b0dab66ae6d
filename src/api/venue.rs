use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

use super::Id;

pub const VENUES_PATH: &str = "/venues";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Id,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VenueList {
    #[serde(default)]
    pub venues: Vec<Venue>,
}

impl TerminalDisplay for Venue {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Name", "Address"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name,
            self.address.unwrap_or_default(),
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["id", "name", "address"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        let mut row = HashMap::new();
        row.insert("id", self.id.to_string());
        row.insert("name", self.name);
        row.insert("address", self.address.unwrap_or_default());
        row
    }
}
