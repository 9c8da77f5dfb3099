use crate::graph::Node;

/// Sink for the operations a tensor computation performs.
///
/// [`crate::graph::Graph`] records for inspection only; [`crate::tape::Tape`]
/// records so the computation can be differentiated.
pub trait Recorder {
    fn record(&mut self, node: Node);
    fn nodes(&self) -> &Vec<Node>;
}
