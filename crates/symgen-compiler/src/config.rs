//! Generation options.

/// Options consumed by the graph builder, template resolver and emitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Render type references without their namespace
    pub(crate) truncate_namespaces: bool,
    /// Degrade dangling references to `Variable` instead of failing the build
    pub(crate) allow_partial_graph: bool,
    /// Try to cover template instantiations with one generic declaration
    pub(crate) template_grouping: bool,
    /// Emit `///` lines above declarations
    pub(crate) doc_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            truncate_namespaces: false,
            allow_partial_graph: false,
            template_grouping: true,
            doc_comments: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn truncate_namespaces(mut self, value: bool) -> Self {
        self.truncate_namespaces = value;
        self
    }

    pub fn allow_partial_graph(mut self, value: bool) -> Self {
        self.allow_partial_graph = value;
        self
    }

    /// Disabling forces one specialized declaration per instantiation.
    pub fn template_grouping(mut self, value: bool) -> Self {
        self.template_grouping = value;
        self
    }

    pub fn doc_comments(mut self, value: bool) -> Self {
        self.doc_comments = value;
        self
    }

    pub fn truncates_namespaces(&self) -> bool {
        self.truncate_namespaces
    }

    pub fn allows_partial_graph(&self) -> bool {
        self.allow_partial_graph
    }

    pub fn groups_templates(&self) -> bool {
        self.template_grouping
    }
}
