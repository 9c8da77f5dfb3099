use crate::recorder::Recorder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EOp {
    Add,
    Sub,
    Mul,
    MulScalar,
    Pow,
    MatMul,
    AddBroadcast,
    Relu,
    LogSoftmax,
    Gather,
    ReduceSum,
}

/// One recorded operation: `out = op(a, b)`, by tensor id.
///
/// Unary ops set `b` to the id of a constant operand (a scalar, an exponent
/// or an index list) or to `a` when they have none.
#[derive(Clone, Debug)]
pub struct Node {
    pub op: EOp,
    pub a: usize,
    pub b: usize,
    pub out: usize,
}

/// Forward-only recorder used for acting in the environment.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Recorder for Graph {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &Vec<Node> {
        &self.nodes
    }
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }
}
