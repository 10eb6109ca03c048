use thiserror::Error;

/// Errors surfaced when wiring the channel graph.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("derived channel constructed with no upstream channels")]
	NoUpstreams,
}
