use thiserror::Error;

/// Domain failures raised by the library.
///
/// Public functions return `anyhow::Result`; these variants can be recovered
/// with `downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("node {node} is missing attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    #[error("node {node} has non-numeric attribute '{attribute}'")]
    NonNumericAttribute { node: String, attribute: String },

    #[error("node id {0} appears more than once")]
    DuplicateNode(String),

    #[error("edge references unknown node id {0}")]
    UnknownNode(String),

    #[error("graph has no adjacency: expected an 'adjacency' or 'links' array")]
    MissingAdjacency,

    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    #[error("series '{0}' is not present in node weights")]
    UnknownSeries(String),

    #[error("graph is not connected ({components} components)")]
    Disconnected { components: usize },

    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("could not build a balanced {districts}-district seed plan after {attempts} attempts")]
    SeedPartition { districts: u32, attempts: usize },

    #[error("initial state violates constraint '{0}'")]
    InvalidInitialState(String),

    #[error("no valid proposal at step {step} after {attempts} attempts")]
    ProposalExhausted { step: usize, attempts: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
