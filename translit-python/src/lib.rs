//! Python bindings for the translit engine
//!
//! This module exposes rule sets to Python input method hosts. Rules are
//! passed as tuples `(input, replacement)`, `(input, replacement, context)` or
//! `(input, replacement, context, alt_gr)`, with `context` allowed to be
//! `None`.

use pyo3::exceptions::{PyLookupError, PyValueError};
use pyo3::prelude::*;
use translit_core::{PatternRule, RuleSetLibrary, TranslitError};

fn to_py_err(err: TranslitError) -> PyErr {
    if err.is_not_found() {
        PyLookupError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

/// A rule as accepted from Python
#[derive(FromPyObject)]
enum RuleArg {
    Full(String, String, Option<String>, bool),
    WithContext(String, String, Option<String>),
    Plain(String, String),
}

impl RuleArg {
    fn compile(self) -> Result<PatternRule, TranslitError> {
        let (input, replacement, context, alt_gr) = match self {
            RuleArg::Full(input, replacement, context, alt_gr) => (input, replacement, context, alt_gr),
            RuleArg::WithContext(input, replacement, context) => (input, replacement, context, false),
            RuleArg::Plain(input, replacement) => (input, replacement, None, false),
        };
        let rule = PatternRule::new(&input, &replacement)?.with_alt_gr(alt_gr);
        match context {
            Some(context) => rule.with_context(&context),
            None => Ok(rule),
        }
    }
}

/// An immutable, ordered rule set
#[pyclass(name = "RuleSet", frozen)]
pub struct PyRuleSet {
    inner: std::sync::Arc<translit_core::RuleSet>,
}

#[pymethods]
impl PyRuleSet {
    /// Compile a rule set
    #[new]
    #[pyo3(signature = (id, rules, name=String::new(), description=String::new(), author=String::new(), version=String::new(), max_key_length=1, context_length=0))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: &str,
        rules: Vec<RuleArg>,
        name: String,
        description: String,
        author: String,
        version: String,
        max_key_length: usize,
        context_length: usize,
    ) -> PyResult<Self> {
        let mut builder = translit_core::RuleSet::builder(id)
            .name(name)
            .description(description)
            .author(author)
            .version(version)
            .max_key_length(max_key_length)
            .context_length(context_length);

        for (index, rule) in rules.into_iter().enumerate() {
            let rule = rule
                .compile()
                .map_err(|e| to_py_err(e.in_definition(id, Some(index))))?;
            builder.push_rule(rule);
        }

        Ok(PyRuleSet {
            inner: std::sync::Arc::new(builder.build()),
        })
    }

    /// Transliterate a buffer
    #[pyo3(signature = (input, context="", alt_gr=false))]
    fn transliterate(&self, input: &str, context: &str, alt_gr: bool) -> String {
        self.inner.transliterate(input, context, alt_gr)
    }

    /// Append a keystroke to a buffer and transliterate the tail
    #[pyo3(signature = (buffer, key, context="", alt_gr=false))]
    fn transliterate_keystroke(&self, buffer: &str, key: &str, context: &str, alt_gr: bool) -> String {
        self.inner.transliterate_keystroke(buffer, key, context, alt_gr)
    }

    /// Rule set id
    #[getter]
    fn id(&self) -> &str {
        self.inner.id()
    }

    /// Display name
    #[getter]
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Description
    #[getter]
    fn description(&self) -> &str {
        self.inner.description()
    }

    /// Author
    #[getter]
    fn author(&self) -> &str {
        self.inner.author()
    }

    /// Version
    #[getter]
    fn version(&self) -> &str {
        self.inner.version()
    }

    /// Maximum key length
    #[getter]
    fn max_key_length(&self) -> usize {
        self.inner.max_key_length()
    }

    /// Context length
    #[getter]
    fn context_length(&self) -> usize {
        self.inner.context_length()
    }

    /// Rules as `(input, replacement, context, alt_gr)` tuples
    #[getter]
    fn rules(&self) -> Vec<(String, String, Option<String>, bool)> {
        self.inner
            .rules()
            .iter()
            .map(|rule| {
                (
                    rule.input().to_string(),
                    rule.replacement().to_string(),
                    rule.context().map(str::to_string),
                    rule.alt_gr(),
                )
            })
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!("RuleSet(id={:?}, rules={})", self.inner.id(), self.inner.len())
    }
}

/// Rule sets resolvable by id
#[pyclass(name = "Library")]
#[derive(Default)]
pub struct PyLibrary {
    inner: RuleSetLibrary,
}

#[pymethods]
impl PyLibrary {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Register a rule set under its id
    fn add(&mut self, rule_set: &PyRuleSet) {
        self.inner.insert((*rule_set.inner).clone());
    }

    /// Resolve a rule set; raises `LookupError` when the id is unknown
    fn get(&self, name: &str) -> PyResult<PyRuleSet> {
        self.inner
            .get(name)
            .map(|inner| PyRuleSet { inner })
            .map_err(to_py_err)
    }

    /// Registered ids in sorted order
    fn ids(&self) -> Vec<String> {
        self.inner.ids().map(str::to_string).collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, name: &str) -> bool {
        self.inner.contains(name)
    }
}

/// Transliterate with a rule set in one call
#[pyfunction]
#[pyo3(signature = (rule_set, input, context="", alt_gr=false))]
fn transliterate(rule_set: &PyRuleSet, input: &str, context: &str, alt_gr: bool) -> String {
    rule_set.transliterate(input, context, alt_gr)
}

/// Translit Python module
#[pymodule(name = "translit")]
fn translit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRuleSet>()?;
    m.add_class::<PyLibrary>()?;
    m.add_function(wrap_pyfunction!(transliterate, m)?)?;
    Ok(())
}
