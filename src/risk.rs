// src/risk.rs
// Disease-risk categories and the label-to-advice table

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RiskError};

/// One of the six disease-risk categories a water sample can be assigned.
///
/// The serialized names are the labels stored in model and advice artifacts,
/// so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Safe")]
    Safe,
    #[serde(rename = "Diarrheal_Disease")]
    DiarrhealDisease,
    #[serde(rename = "Enteric_Diseases_Typhoid_Cholera_HepA")]
    EntericDiseases,
    #[serde(rename = "Chemical_Fluoride_Arsenic_Risk")]
    ChemicalFluorideArsenicRisk,
    #[serde(rename = "Bacterial_Risk_from_Poor_Disinfection")]
    BacterialRiskFromPoorDisinfection,
    #[serde(rename = "Metal_Leaching_Risk")]
    MetalLeachingRisk,
}

impl RiskCategory {
    /// Every category, in label order.
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Safe,
        RiskCategory::DiarrhealDisease,
        RiskCategory::EntericDiseases,
        RiskCategory::ChemicalFluorideArsenicRisk,
        RiskCategory::BacterialRiskFromPoorDisinfection,
        RiskCategory::MetalLeachingRisk,
    ];

    /// The five categories assigned to samples outside the safe range.
    pub const UNSAFE: [RiskCategory; 5] = [
        RiskCategory::DiarrhealDisease,
        RiskCategory::EntericDiseases,
        RiskCategory::ChemicalFluorideArsenicRisk,
        RiskCategory::BacterialRiskFromPoorDisinfection,
        RiskCategory::MetalLeachingRisk,
    ];

    /// Label string used in artifacts and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "Safe",
            RiskCategory::DiarrhealDisease => "Diarrheal_Disease",
            RiskCategory::EntericDiseases => "Enteric_Diseases_Typhoid_Cholera_HepA",
            RiskCategory::ChemicalFluorideArsenicRisk => "Chemical_Fluoride_Arsenic_Risk",
            RiskCategory::BacterialRiskFromPoorDisinfection => {
                "Bacterial_Risk_from_Poor_Disinfection"
            }
            RiskCategory::MetalLeachingRisk => "Metal_Leaching_Risk",
        }
    }

    /// Built-in remediation advice for this category
    pub fn advice(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "Water is safe to drink. Maintain regular monitoring.",
            RiskCategory::DiarrhealDisease => {
                "Boil water before consumption; maintain proper sanitation."
            }
            RiskCategory::EntericDiseases => "Chlorinate water; wash hands regularly.",
            RiskCategory::ChemicalFluorideArsenicRisk => {
                "Use appropriate filters (RO/Activated Alumina)."
            }
            RiskCategory::BacterialRiskFromPoorDisinfection => {
                "Improve chlorination; avoid stagnant storage."
            }
            RiskCategory::MetalLeachingRisk => "Check pipelines and avoid corrosive plumbing.",
        }
    }

    /// Position of this category in [`RiskCategory::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        RiskCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RiskError::InvalidInput(format!("unknown risk category: {s}")))
    }
}

/// Label-to-advice mapping persisted next to the trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdviceTable {
    entries: BTreeMap<RiskCategory, String>,
}

impl AdviceTable {
    /// Table holding the built-in advice for every category
    pub fn standard() -> Self {
        let entries = RiskCategory::ALL
            .iter()
            .map(|c| (*c, c.advice().to_string()))
            .collect();
        Self { entries }
    }

    /// Advice text for a category.
    ///
    /// Falls back to the built-in advice, so every category always has an answer.
    pub fn get(&self, category: RiskCategory) -> &str {
        self.entries
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.advice())
    }

    /// Categories present in the table
    pub fn categories(&self) -> impl Iterator<Item = RiskCategory> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the table as indented JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        fs::write(path, buf)?;
        debug!(path = %path.display(), entries = self.len(), "Saved advice table");
        Ok(())
    }

    /// Load a table, requiring an entry for every category
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RiskError::ModelNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let table: AdviceTable = serde_json::from_str(&contents)?;

        let missing: Vec<&str> = RiskCategory::ALL
            .iter()
            .filter(|c| !table.entries.contains_key(c))
            .map(RiskCategory::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(RiskError::InvalidInput(format!(
                "advice table {} is missing entries for: {}",
                path.display(),
                missing.join(", ")
            )));
        }

        debug!(path = %path.display(), "Loaded advice table");
        Ok(table)
    }
}

impl Default for AdviceTable {
    fn default() -> Self {
        Self::standard()
    }
}
