//! Solver backend registry (mirrors `gat_core::solver::registry`): lets
//! callers register additional backends (e.g. a future CMA-ES backend)
//! without `ti-exsearch`/`ti-sweep` ever naming a concrete backend type.

use std::collections::HashMap;
use std::sync::Arc;

use ti_core::{TiError, TiResult};

use crate::traits::SolverBackend;

type BackendConstructor = fn() -> Arc<dyn SolverBackend>;

pub struct SolverRegistry {
    constructors: HashMap<String, BackendConstructor>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, constructor: BackendConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    pub fn build(&self, name: &str) -> TiResult<Arc<dyn SolverBackend>> {
        self.constructors
            .get(name)
            .map(|ctor| ctor())
            .ok_or_else(|| TiError::Config(format!("unknown solver backend '{name}'")))
    }

    pub fn available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("differential_evolution", || {
            Arc::new(crate::backends::differential_evolution::DifferentialEvolutionBackend)
        });
        registry
    }
}
