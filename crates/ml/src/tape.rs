use crate::error::MlError;
use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use crate::Tensor;
use std::collections::HashMap;

/// A tape that records operations for automatic differentiation.
#[derive(Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Recorder for Tape {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &Vec<Node> {
        &self.nodes
    }
}

fn slot<'g>(grads: &'g mut HashMap<usize, Vec<f32>>, id: usize, len: usize) -> &'g mut Vec<f32> {
    grads.entry(id).or_insert_with(|| vec![0.0; len])
}

impl Tape {
    /// Creates a new, empty tape.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Computes the gradients of `loss` with respect to every recorded tensor.
    ///
    /// Operations are visited in reverse recording order. Nodes whose output
    /// never received a gradient (branches that do not reach `loss`) are
    /// skipped. Results are written to `grad` of the tensors in `tensors`
    /// that require grad; tensors that received no gradient keep `None`.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::MissingTensor`] if `loss` or an operand of a node
    /// on the path to it is not in `tensors`.
    pub fn backward(&self, loss: &Tensor, tensors: &mut HashMap<usize, Tensor>) -> Result<(), MlError> {
        if !tensors.contains_key(&loss.id) {
            return Err(MlError::MissingTensor(loss.id));
        }
        let mut grads: HashMap<usize, Vec<f32>> = HashMap::new();
        grads.insert(loss.id, vec![1.0; loss.len()]);

        for node in self.nodes.iter().rev() {
            let Some(out_grad) = grads.get(&node.out).cloned() else {
                continue;
            };
            let a = tensors.get(&node.a).ok_or(MlError::MissingTensor(node.a))?;
            let b = tensors.get(&node.b).ok_or(MlError::MissingTensor(node.b))?;

            match node.op {
                EOp::Add | EOp::Sub => {
                    let sign = if node.op == EOp::Add { 1.0 } else { -1.0 };
                    for (g, og) in slot(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    for (g, og) in slot(&mut grads, node.b, b.len()).iter_mut().zip(&out_grad) {
                        *g += sign * og;
                    }
                }
                EOp::Mul => {
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(b.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                    let b_grad = slot(&mut grads, node.b, b.len());
                    for (g, (d, og)) in b_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                }
                EOp::MulScalar => {
                    let scalar = b.data[0];
                    for (g, og) in slot(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += scalar * og;
                    }
                }
                EOp::Pow => {
                    let exp = b.data[0];
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += exp * d.powf(exp - 1.0) * og;
                    }
                }
                EOp::MatMul => {
                    let out_dim = a.shape[0];
                    let in_dim = a.shape[1];
                    let batch = b.len() / in_dim;

                    let w_grad = slot(&mut grads, node.a, a.len());
                    for i in 0..out_dim {
                        for j in 0..in_dim {
                            for k in 0..batch {
                                w_grad[i * in_dim + j] += out_grad[k * out_dim + i] * b.data[k * in_dim + j];
                            }
                        }
                    }

                    let x_grad = slot(&mut grads, node.b, b.len());
                    for k in 0..batch {
                        for j in 0..in_dim {
                            for i in 0..out_dim {
                                x_grad[k * in_dim + j] += out_grad[k * out_dim + i] * a.data[i * in_dim + j];
                            }
                        }
                    }
                }
                EOp::AddBroadcast => {
                    for (g, og) in slot(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    let dim = b.len();
                    let b_grad = slot(&mut grads, node.b, dim);
                    for (i, og) in out_grad.iter().enumerate() {
                        b_grad[i % dim] += og;
                    }
                }
                EOp::Relu => {
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        if *d > 0.0 {
                            *g += og;
                        }
                    }
                }
                EOp::LogSoftmax => {
                    let out = tensors.get(&node.out).ok_or(MlError::MissingTensor(node.out))?;
                    let width = a.shape.last().copied().unwrap_or(1);
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for ((g_row, og_row), out_row) in a_grad
                        .chunks_mut(width)
                        .zip(out_grad.chunks(width))
                        .zip(out.data.chunks(width))
                    {
                        let total: f32 = og_row.iter().sum();
                        for ((g, og), lp) in g_row.iter_mut().zip(og_row).zip(out_row) {
                            *g += og - lp.exp() * total;
                        }
                    }
                }
                EOp::Gather => {
                    let width = a.shape.last().copied().unwrap_or(1);
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for (row, (idx, og)) in b.data.iter().zip(&out_grad).enumerate() {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let i = *idx as usize;
                        a_grad[row * width + i] += og;
                    }
                }
                EOp::ReduceSum => {
                    for g in slot(&mut grads, node.a, a.len()).iter_mut() {
                        *g += out_grad[0];
                    }
                }
            }
        }

        for (id, grad) in grads {
            if let Some(tensor) = tensors.get_mut(&id) {
                if tensor.requires_grad {
                    tensor.grad = Some(grad);
                }
            }
        }

        Ok(())
    }
}
