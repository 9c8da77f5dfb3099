//! # Tensors
//!
//! Dense `f32` buffers with a shape and a process-unique id.
//!
//! Every operation computes its result eagerly, records a [`Node`] on the
//! given [`Recorder`] and stores its operands and result in the caller's
//! tensor map so a [`crate::tape::Tape`] can walk the computation backwards.
//! Cloning a tensor keeps its id; parameters therefore keep the same id
//! across episodes while their data is updated in place.

use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Debug)]
pub struct Tensor {
    pub id: usize,
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
    pub requires_grad: bool,
    pub grad: Option<Vec<f32>>,
}

impl Tensor {
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { id: next_id(), data, shape, requires_grad: false, grad: None }
    }

    #[must_use]
    pub fn scalar(value: f32) -> Self {
        Self::from_vec(vec![1], vec![value])
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_requires_grad(&mut self) {
        self.requires_grad = true;
    }

    #[must_use]
    pub fn with_grad(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    /// Copies the tensor under a fresh id with no recorded history.
    ///
    /// Nothing upstream of the copy receives gradient through it.
    pub fn detach(&self, tensors: &mut HashMap<usize, Tensor>) -> Tensor {
        let out = Tensor::from_vec(self.shape.clone(), self.data.clone());
        tensors.insert(out.id, out.clone());
        out
    }

    fn emit(
        op: EOp,
        a: &Tensor,
        b: &Tensor,
        out: Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        tensors.entry(a.id).or_insert_with(|| a.clone());
        tensors.entry(b.id).or_insert_with(|| b.clone());
        tensors.insert(out.id, out.clone());
        recorder.record(Node { op, a: a.id, b: b.id, out: out.id });
        out
    }

    fn zip_with(&self, other: &Tensor, f: impl Fn(f32, f32) -> f32) -> Tensor {
        assert_eq!(self.len(), other.len(), "element-wise operands differ in length");
        let data = self.data.iter().zip(&other.data).map(|(&x, &y)| f(x, y)).collect();
        Tensor::from_vec(self.shape.clone(), data)
    }

    pub fn add(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let out = self.zip_with(other, |x, y| x + y);
        Self::emit(EOp::Add, self, other, out, recorder, tensors)
    }

    pub fn sub(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let out = self.zip_with(other, |x, y| x - y);
        Self::emit(EOp::Sub, self, other, out, recorder, tensors)
    }

    pub fn mul(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let out = self.zip_with(other, |x, y| x * y);
        Self::emit(EOp::Mul, self, other, out, recorder, tensors)
    }

    pub fn mul_scalar(
        &self,
        scalar: f32,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let s = Tensor::scalar(scalar);
        let data = self.data.iter().map(|&x| x * scalar).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        Self::emit(EOp::MulScalar, self, &s, out, recorder, tensors)
    }

    pub fn pow(
        &self,
        exponent: f32,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let e = Tensor::scalar(exponent);
        let data = self.data.iter().map(|&x| x.powf(exponent)).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        Self::emit(EOp::Pow, self, &e, out, recorder, tensors)
    }

    /// `self` is a `[out, in]` weight matrix, `x` a `[batch, in]` batch;
    /// the result is `[batch, out]`.
    pub fn matmul(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        assert_eq!(self.shape.len(), 2, "matmul weight must be 2-D");
        let (out_dim, in_dim) = (self.shape[0], self.shape[1]);
        assert_eq!(x.len() % in_dim, 0, "matmul input width must match weight");
        let batch = x.len() / in_dim;

        let mut y = vec![0.0f32; batch * out_dim];
        for k in 0..batch {
            let row = &x.data[k * in_dim..(k + 1) * in_dim];
            for o in 0..out_dim {
                let w = &self.data[o * in_dim..(o + 1) * in_dim];
                y[k * out_dim + o] = w.iter().zip(row).map(|(w, x)| w * x).sum();
            }
        }
        let out = Tensor::from_vec(vec![batch, out_dim], y);
        Self::emit(EOp::MatMul, self, x, out, recorder, tensors)
    }

    /// Adds the vector `bias` to every row of `self`.
    pub fn add_broadcast(
        &self,
        bias: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let dim = bias.len();
        assert_eq!(self.len() % dim, 0, "bias width must divide the input");
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| v + bias.data[i % dim])
            .collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        Self::emit(EOp::AddBroadcast, self, bias, out, recorder, tensors)
    }

    pub fn relu(&self, recorder: &mut impl Recorder, tensors: &mut HashMap<usize, Tensor>) -> Tensor {
        let data = self.data.iter().map(|&v| v.max(0.0)).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        Self::emit(EOp::Relu, self, self, out, recorder, tensors)
    }

    /// Row-wise log-softmax over the last dimension.
    pub fn log_softmax(
        &self,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let width = self.shape.last().copied().unwrap_or(1);
        let mut data = Vec::with_capacity(self.len());
        for row in self.data.chunks(width) {
            data.extend(log_softmax_row(row));
        }
        let out = Tensor::from_vec(self.shape.clone(), data);
        Self::emit(EOp::LogSoftmax, self, self, out, recorder, tensors)
    }

    /// Picks `self[row, indices[row]]` for every row of a `[batch, n]` tensor.
    ///
    /// # Panics
    ///
    /// Panics if `indices` does not hold one in-range index per row.
    pub fn gather(
        &self,
        indices: &[usize],
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let width = self.shape.last().copied().unwrap_or(1);
        assert_eq!(self.len(), indices.len() * width, "one index per row");
        let data = indices
            .iter()
            .enumerate()
            .map(|(row, &i)| {
                assert!(i < width, "gather index {i} out of range {width}");
                self.data[row * width + i]
            })
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let idx = Tensor::from_vec(vec![indices.len()], indices.iter().map(|&i| i as f32).collect());
        let out = Tensor::from_vec(vec![indices.len(), 1], data);
        Self::emit(EOp::Gather, self, &idx, out, recorder, tensors)
    }

    pub fn reduce_sum(
        &self,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let out = Tensor::scalar(self.data.iter().sum());
        Self::emit(EOp::ReduceSum, self, self, out, recorder, tensors)
    }
}

/// Numerically stable log-softmax of one row of logits.
pub(crate) fn log_softmax_row(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let log_sum = logits.iter().map(|&v| (v - max).exp()).sum::<f32>().ln() + max;
    logits.iter().map(|&v| v - log_sum).collect()
}
