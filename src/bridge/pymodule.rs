use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::Path;

use crate::data::loader::{load_pokedex, Pokedex};
use crate::data::reference::{BST_THRESHOLDS, EGG_GROUPS, TYPES};
use crate::data::team::{Team, TEAM_SIZE};
use crate::dex::coverage::coverage;
use crate::dex::filter::{filter, FilterCriteria};
use crate::dex::render::render_team;

/// Python-facing catalog with a working team.
#[pyclass]
pub struct PyPokedex {
    pokedex: Pokedex,
    team: Team,
}

#[pymethods]
impl PyPokedex {
    /// Load the catalog from a pokedex.json file.
    #[new]
    fn new(pokedex_json_path: &str) -> PyResult<Self> {
        let pokedex = load_pokedex(Path::new(pokedex_json_path))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyPokedex {
            pokedex,
            team: Team::new(),
        })
    }

    /// Ids of the records matching every given criterion, ascending.
    #[pyo3(signature = (text="", region=None, type_tag=None, min_bst=None, egg_group=None))]
    fn filter(
        &self,
        text: &str,
        region: Option<u8>,
        type_tag: Option<String>,
        min_bst: Option<u32>,
        egg_group: Option<String>,
    ) -> Vec<u32> {
        let criteria = FilterCriteria {
            text: text.to_string(),
            region,
            type_tag,
            min_bst,
            egg_group,
        };
        filter(self.pokedex.records(), &criteria)
            .iter()
            .map(|r| r.id)
            .collect()
    }

    fn add_to_team(&mut self, id: u32) -> PyResult<()> {
        let record = self
            .pokedex
            .get(id)
            .ok_or_else(|| PyValueError::new_err(format!("Record not found: {}", id)))?;
        self.team
            .add(record)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn remove_from_team(&mut self, id: u32) -> bool {
        self.team.remove(id)
    }

    fn team(&self) -> Vec<u32> {
        self.team.ids().to_vec()
    }

    /// (weaknesses, resistances) of the current team.
    fn coverage(&self) -> (Vec<String>, Vec<String>) {
        let result = coverage(&self.team.resolve(&self.pokedex));
        (result.weaknesses, result.resistances)
    }

    fn num_records(&self) -> usize {
        self.pokedex.len()
    }

    /// A record serialized as JSON.
    fn record_json(&self, id: u32) -> PyResult<String> {
        let record = self
            .pokedex
            .get(id)
            .ok_or_else(|| PyValueError::new_err(format!("Record not found: {}", id)))?;
        serde_json::to_string(record).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Text rendering of the team slots and coverage.
    fn render_team(&self) -> String {
        render_team(&self.pokedex, &self.team)
    }
}

/// Install the tracing subscriber (e.g. `init_logging("debug")`).
#[pyfunction]
#[pyo3(signature = (filter="info"))]
fn init_logging(filter: &str) {
    crate::logging::init(filter);
}

/// Register the PyO3 module.
#[pymodule]
pub fn neo_pokedex(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPokedex>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add("TEAM_SIZE", TEAM_SIZE)?;
    m.add("TYPES", TYPES.to_vec())?;
    m.add("EGG_GROUPS", EGG_GROUPS.to_vec())?;
    m.add("BST_THRESHOLDS", BST_THRESHOLDS.to_vec())?;
    Ok(())
}
