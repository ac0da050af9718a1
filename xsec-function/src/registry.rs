//! Function Registry

use crate::{Function, FunctionMeta};
use std::collections::HashMap;
use xsec_core::XsecError;

const SUGGESTION_THRESHOLD: f64 = 0.8;

type Factory = Box<dyn Fn() -> Box<dyn Function> + Send + Sync>;

struct Entry {
    meta: FunctionMeta,
    factory: Factory,
}

/// Named Function factories; every component gets its own instance
pub struct FunctionRegistry {
    functions: HashMap<String, Entry>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    /// Register a factory under the name its Functions report
    pub fn with_function<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Function> + Send + Sync + 'static,
    {
        let meta = factory().metadata();
        let name = meta.name.to_lowercase();
        self.functions.insert(name, Entry { meta, factory: Box::new(factory) });
        self
    }

    pub fn get_meta(&self, name: &str) -> Option<FunctionMeta> {
        self.functions.get(&name.to_lowercase()).map(|e| e.meta)
    }

    /// Build a fresh Function. Unknown names suggest close matches.
    pub fn create(&self, name: &str) -> Result<Box<dyn Function>, XsecError> {
        match self.functions.get(&name.to_lowercase()) {
            Some(entry) => Ok((entry.factory)()),
            None => {
                let similar = self.find_similar_functions(name);
                let mut err = XsecError::unknown_function(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!("Similar: {}", suggestions.join(", ")));
                }
                Err(err)
            }
        }
    }

    /// Metadata of every Function, optionally filtered by category, sorted by name
    pub fn list_functions(&self, category: Option<&str>) -> Vec<FunctionMeta> {
        let mut metas: Vec<FunctionMeta> = self
            .functions
            .values()
            .filter(|e| category.map_or(true, |c| e.meta.category.eq_ignore_ascii_case(c)))
            .map(|e| e.meta)
            .collect();
        metas.sort_by(|a, b| a.name.cmp(b.name));
        metas
    }

    pub fn categories(&self) -> Vec<&'static str> {
        let mut cats: Vec<&'static str> = self.functions.values().map(|e| e.meta.category).collect();
        cats.sort_unstable();
        cats.dedup();
        cats
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names close to `name`, best match first.
    ///
    /// A name qualifies when it contains the query or when its Jaro-Winkler
    /// similarity reaches `SUGGESTION_THRESHOLD`.
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let query = name.to_lowercase();
        let mut ranked: Vec<(&str, f64)> = self
            .functions
            .iter()
            .filter_map(|(key, entry)| {
                let closeness = strsim::jaro_winkler(&query, key);
                let related = key.contains(&query) || closeness >= SUGGESTION_THRESHOLD;
                related.then_some((entry.meta.name, closeness))
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.into_iter().map(|(name, _)| name.to_string()).collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, ComputeOutcome};
    use xsec_core::Messages;

    struct Nop {
        name: &'static str,
        category: &'static str,
        messages: Messages,
    }

    impl Function for Nop {
        fn metadata(&self) -> FunctionMeta {
            FunctionMeta {
                name: self.name,
                nick_name: self.name,
                description: "Does nothing",
                category: self.category,
                sub_category: "",
            }
        }
        fn input_attributes(&self) -> Vec<&dyn Attribute> {
            Vec::new()
        }
        fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
            Vec::new()
        }
        fn output_attributes(&self) -> Vec<&dyn Attribute> {
            Vec::new()
        }
        fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
            Vec::new()
        }
        fn messages(&self) -> &Messages {
            &self.messages
        }
        fn messages_mut(&mut self) -> &mut Messages {
            &mut self.messages
        }
        fn compute(&mut self) -> Result<(), XsecError> {
            Ok(())
        }
    }

    fn nop(name: &'static str, category: &'static str) -> impl Fn() -> Box<dyn Function> + Send + Sync {
        move || Box::new(Nop { name, category, messages: Messages::new() })
    }

    fn registry() -> FunctionRegistry {
        FunctionRegistry::new()
            .with_function(nop("SolveLoad", "Analysis"))
            .with_function(nop("SolveDeformation", "Analysis"))
            .with_function(nop("CreateLoad", "Loads"))
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let reg = registry();
        let mut f = reg.create("solveload").unwrap();
        assert_eq!(f.metadata().name, "SolveLoad");
        assert_eq!(f.solve(), ComputeOutcome::Done);
    }

    #[test]
    fn test_unknown_suggests_similar() {
        let err = registry().create("Solve").err().unwrap();
        assert_eq!(err.message, "Unknown function: Solve");
        let suggestion = err.suggestion.unwrap();
        assert!(suggestion.starts_with("Similar: "));
        assert!(suggestion.contains("SolveLoad"));
    }

    #[test]
    fn test_typo_ranks_closest_first() {
        let err = registry().create("CreateLod").err().unwrap();
        assert_eq!(err.suggestion.as_deref(), Some("Similar: CreateLoad"));
        assert!(registry().create("Qwerty").err().unwrap().suggestion.is_none());
    }

    #[test]
    fn test_list_by_category() {
        let reg = registry();
        let names: Vec<&str> = reg.list_functions(Some("analysis")).iter().map(|m| m.name).collect();
        assert_eq!(names, ["SolveDeformation", "SolveLoad"]);
        assert_eq!(reg.list_functions(None).len(), 3);
        assert_eq!(reg.categories(), ["Analysis", "Loads"]);
    }
}
